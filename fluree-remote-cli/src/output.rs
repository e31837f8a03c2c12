use crate::cli::OutputFormat;
use crate::error::CliResult;
use comfy_table::{ContentArrangement, Table};
use fluree_remote_client::{
    Column, Converter, NativeType, NativeValue, Node, QueryError, Response, Row, TypeRegistry,
};
use std::io::Write;

/// Write a response in the requested format; returns the number of rows
pub fn render(
    response: Response,
    format: OutputFormat,
    registry: &TypeRegistry,
    out: &mut dyn Write,
) -> CliResult<usize> {
    if let Some(answer) = response.boolean_result() {
        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::json!({ "boolean": answer }))?,
            OutputFormat::Table | OutputFormat::Csv => writeln!(out, "{answer}")?,
        }
        return Ok(0);
    }

    let conv = Converter::new(registry);
    match format {
        OutputFormat::Table => render_table(response, registry, &conv, out),
        OutputFormat::Json => render_json(response, out),
        OutputFormat::Csv => render_csv(response, &conv, out),
    }
}

fn next_rows(response: Response) -> impl Iterator<Item = CliResult<Row>> {
    response.map(|row| row.map_err(|e| QueryError::from(e).into()))
}

/// Column name with the wire type its datatype maps to, when declared
fn column_header(column: &Column, registry: &TypeRegistry) -> String {
    match &column.datatype_iri {
        Some(dt) => format!(
            "{}\n{}",
            column.name,
            registry.standard_or_custom(dt).wire_type.name()
        ),
        None => column.name.clone(),
    }
}

/// Display text of a cell: the string conversion, falling back to term syntax
fn cell_text(conv: &Converter<'_>, node: Option<&Node>) -> String {
    let Some(node) = node else {
        return String::new();
    };
    match conv.to_native(node, NativeType::String) {
        Ok(NativeValue::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => node.to_string(),
    }
}

fn render_table(
    response: Response,
    registry: &TypeRegistry,
    conv: &Converter<'_>,
    out: &mut dyn Write,
) -> CliResult<usize> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let headers: Vec<String> = response
        .columns()
        .iter()
        .map(|c| column_header(c, registry))
        .collect();
    table.set_header(headers);

    let mut count = 0;
    for row in next_rows(response) {
        let row = row?;
        table.add_row(row.iter().map(|n| cell_text(conv, n.as_ref())).collect::<Vec<_>>());
        count += 1;
    }
    if count == 0 {
        writeln!(out, "(empty result set)")?;
    } else {
        writeln!(out, "{table}")?;
    }
    Ok(count)
}

fn render_json(response: Response, out: &mut dyn Write) -> CliResult<usize> {
    let columns = serde_json::to_value(response.columns())?;
    let mut rows = Vec::new();
    for row in next_rows(response) {
        let row = row?;
        let cells: Vec<serde_json::Value> = row
            .iter()
            .map(|n| match n {
                Some(node) => serde_json::Value::String(node.to_string()),
                None => serde_json::Value::Null,
            })
            .collect();
        rows.push(serde_json::Value::Array(cells));
    }
    let count = rows.len();
    let doc = serde_json::json!({ "columns": columns, "rows": rows });
    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    Ok(count)
}

/// Escape a value for CSV output.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(response: Response, conv: &Converter<'_>, out: &mut dyn Write) -> CliResult<usize> {
    let header: Vec<String> = response.columns().iter().map(|c| csv_escape(&c.name)).collect();
    writeln!(out, "{}", header.join(","))?;
    let mut count = 0;
    for row in next_rows(response) {
        let row = row?;
        let cells: Vec<String> = row
            .iter()
            .map(|n| csv_escape(&cell_text(conv, n.as_ref())))
            .collect();
        writeln!(out, "{}", cells.join(","))?;
        count += 1;
    }
    Ok(count)
}
