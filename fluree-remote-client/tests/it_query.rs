//! HTTP exchange tests against a mock endpoint
//!
//! The mock server runs on the test's tokio runtime; the blocking client is
//! driven from `spawn_blocking` so it never blocks a runtime worker.

use flate2::write::GzEncoder;
use flate2::Compression;
use fluree_remote_client::{
    ClientConfig, NativeType, NativeValue, Node, QueryClient, QueryError, SpillConfig,
};
use std::io::Write;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TABULAR: &str = "application/sparql-results+json";
const TRIPLES: &str = "application/rdf+json";

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/fluree/query", server.uri())
}

fn client(endpoint: String) -> QueryClient {
    QueryClient::new(ClientConfig::new(endpoint)).unwrap()
}

async fn mount(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/fluree/query"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn run_query(endpoint: String) -> Result<Vec<Vec<Option<Node>>>, QueryError> {
    let client = client(endpoint);
    let response = client.execute_query("SELECT * WHERE { ?s ?p ?o }", Vec::<(&str, Node)>::new(), None)?;
    Ok(response.collect::<Result<Vec<_>, _>>()?)
}

fn tabular_doc(rows: usize) -> String {
    let mut doc = String::from(r#"{"head": {"vars": ["s", "n"]}, "results": {"bindings": ["#);
    for i in 0..rows {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"s": {{"type": "uri", "value": "http://example.org/item/{i}"}},
                "n": {{"type": "literal", "value": "{i}", "datatype": "http://www.w3.org/2001/XMLSchema#long"}}}}"#
        ));
    }
    doc.push_str("]}}");
    doc
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tabular_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fluree/query"))
        .and(|req: &Request| {
            req.headers.get("accept").and_then(|v| v.to_str().ok())
                == Some("application/rdf+json, application/sparql-results+json")
        })
        .and(header("accept-encoding", "gzip"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("query=SELECT"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(tabular_doc(3), TABULAR))
        .expect(1)
        .mount(&server)
        .await;

    let ep = endpoint(&server);
    let (columns, rows, total) = blocking(move || {
        let client = client(ep);
        let response = client
            .execute_query("SELECT ?s ?n WHERE { ?s ?p ?n }", Vec::<(&str, Node)>::new(), None)
            .unwrap();
        let columns: Vec<String> = response.columns().iter().map(|c| c.name.clone()).collect();
        let rows: Vec<_> = response.collect::<Result<_, _>>().unwrap();
        let conv = client.converter();
        let total: i64 = rows
            .iter()
            .map(|r: &Vec<Option<Node>>| match conv.to_native(r[1].as_ref().unwrap(), NativeType::Long) {
                Ok(NativeValue::Long(n)) => n,
                other => panic!("unexpected {other:?}"),
            })
            .sum();
        (columns, rows, total)
    })
    .await;

    assert_eq!(columns, vec!["s", "n"]);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2][0], Some(Node::iri("http://example.org/item/2")));
    assert_eq!(total, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_triples_response_with_charset() {
    let server = MockServer::start().await;
    let doc = r#"{"_:a": {"<http://p>": [{"type": "uri", "value": "http://o"}]}}"#;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_raw(doc, &format!("{TRIPLES}; charset=utf-8")),
    )
    .await;

    let rows = blocking({
        let ep = endpoint(&server);
        move || run_query(ep)
    })
    .await
    .unwrap();
    assert_eq!(
        rows,
        vec![vec![
            Some(Node::blank("a")),
            Some(Node::iri("http://p")),
            Some(Node::iri("http://o")),
        ]]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_response() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_raw(r#"{"head": {}, "boolean": true}"#, TABULAR),
    )
    .await;

    let ep = endpoint(&server);
    let answer = blocking(move || {
        let client = client(ep);
        let response = client
            .execute_query("ASK { ?s ?p ?o }", Vec::<(&str, Node)>::new(), Some(5))
            .unwrap();
        assert!(response.columns().is_empty());
        response.boolean_result()
    })
    .await;
    assert_eq!(answer, Some(true));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unsupported_content_type_is_protocol_error() {
    for content_type in ["application/json", "application/sparql-results+xml", "text/turtle"] {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_raw(r#"{"boolean": true}"#, content_type),
        )
        .await;

        let ep = endpoint(&server);
        let err = blocking(move || run_query(ep)).await.unwrap_err();
        assert!(
            matches!(err, QueryError::Protocol(ref m) if m.contains(content_type)),
            "{content_type}: {err:?}"
        );
    }

    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_bytes(b"{}".to_vec())).await;
    let ep = endpoint(&server);
    let err = blocking(move || run_query(ep)).await.unwrap_err();
    assert!(matches!(err, QueryError::Protocol(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gzip_body_is_decoded() {
    let server = MockServer::start().await;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(tabular_doc(50).as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_raw(compressed, TABULAR)
            .insert_header("content-encoding", "gzip"),
    )
    .await;

    let ep = endpoint(&server);
    let rows = blocking(move || run_query(ep)).await.unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[49][1], Some(Node::typed("49", "http://www.w3.org/2001/XMLSchema#long")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_multi_member_gzip_body_is_read_to_the_end() {
    let server = MockServer::start().await;
    let doc = tabular_doc(20);
    let (head, tail) = doc.split_at(doc.len() / 2);
    let mut body = Vec::new();
    for part in [head, tail] {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(part.as_bytes()).unwrap();
        body.extend(encoder.finish().unwrap());
    }
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_raw(body, TABULAR)
            .insert_header("content-encoding", "gzip"),
    )
    .await;

    let ep = endpoint(&server);
    let rows = blocking(move || run_query(ep)).await.unwrap();
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[19][0], Some(Node::iri("http://example.org/item/19")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_uses_json_message() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(400).set_body_raw(
            r#"{"message": "bad query", "error": "db/invalid-query"}"#,
            "application/json",
        ),
    )
    .await;

    let ep = endpoint(&server);
    let err = blocking(move || run_query(ep)).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::HttpStatus { status: 400, ref message } if message == "bad query"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_html_error_page_uses_reason_phrase() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(502)
            .set_body_raw("<html><body><h1>502</h1>upstream gone</body></html>", "text/html"),
    )
    .await;

    let ep = endpoint(&server);
    let err = blocking(move || run_query(ep)).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::HttpStatus { status: 502, ref message } if message == "Bad Gateway"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_text_error_is_trimmed() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(500).set_body_raw("  index unavailable\n", "text/plain"),
    )
    .await;

    let ep = endpoint(&server);
    let err = blocking(move || run_query(ep)).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::HttpStatus { status: 500, ref message } if message == "index unavailable"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_200_success_and_redirect_are_fatal() {
    for status in [204u16, 302] {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(status).insert_header("location", "http://elsewhere.invalid/"),
        )
        .await;

        let ep = endpoint(&server);
        let err = blocking(move || run_query(ep)).await.unwrap_err();
        assert_eq!(err.status(), Some(status), "{err:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parameters_and_bearer_token_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fluree/query"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_string_contains("%24s=%3Chttp%3A%2F%2Fexample.org%2Fa%3E"))
        .and(body_string_contains("%24label=%22x%22"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"boolean": false}"#, TABULAR))
        .expect(1)
        .mount(&server)
        .await;

    let ep = endpoint(&server);
    let answer = blocking(move || {
        let client = QueryClient::new(ClientConfig::new(ep).with_auth_token("tok-123")).unwrap();
        let params = vec![
            ("$s", Node::iri("http://example.org/a")),
            ("$label", Node::string("x")),
        ];
        client
            .execute_query("ASK { $s ?p $label }", params, None)
            .unwrap()
            .boolean_result()
    })
    .await;
    assert_eq!(answer, Some(false));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_parameter_name_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"boolean": true}"#, TABULAR))
        .expect(0)
        .mount(&server)
        .await;

    let ep = endpoint(&server);
    let err = blocking(move || {
        client(ep)
            .execute_query("ASK {}", [("$", Node::string("x"))], None)
            .unwrap_err()
    })
    .await;
    assert!(matches!(err, QueryError::InvalidParameter(ref n) if n == "$"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_timeout_is_transport_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_raw(r#"{"boolean": true}"#, TABULAR)
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let ep = endpoint(&server);
    let (err, elapsed) = blocking(move || {
        let client = client(ep);
        let start = Instant::now();
        let err = client
            .execute_query("ASK {}", Vec::<(&str, Node)>::new(), Some(1))
            .unwrap_err();
        (err, start.elapsed())
    })
    .await;
    assert!(matches!(err, QueryError::Transport(_)), "{err:?}");
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_large_response_spills_and_cleans_up() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_raw(tabular_doc(2_000), TABULAR)).await;

    let dir = tempfile::tempdir().unwrap();
    let spill_dir = dir.path().to_path_buf();
    let ep = endpoint(&server);
    let count = blocking(move || {
        let config = ClientConfig::new(ep).with_spill(
            SpillConfig::default()
                .with_memory_limit(4 * 1024)
                .with_chunk_size(1024)
                .with_temp_dir(spill_dir),
        );
        let client = QueryClient::new(config).unwrap();
        let response = client
            .execute_query("SELECT * WHERE { ?s ?p ?o }", Vec::<(&str, Node)>::new(), None)
            .unwrap();
        let mut count = 0;
        for row in response {
            let row = row.unwrap();
            assert_eq!(row.len(), 2);
            count += 1;
        }
        count
    })
    .await;
    assert_eq!(count, 2_000);

    let start = Instant::now();
    while std::fs::read_dir(dir.path()).unwrap().count() > 0 {
        assert!(start.elapsed() < Duration::from_secs(5), "spill file left behind");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[test]
fn test_connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = run_query(format!("http://127.0.0.1:{port}/fluree/query")).unwrap_err();
    assert!(matches!(err, QueryError::Transport(_)), "{err:?}");
}
