//! Query response: columns plus lazy rows, or a boolean result

use crate::decode::Column;
use crate::error::Result;
use fluree_remote_term::Node;
use std::fmt;

/// One result row; `None` marks an unbound cell
pub type Row = Vec<Option<Node>>;

/// Source of rows behind a [`Response`]
pub trait RowDecoder: Send {
    /// Decode the next row, or `None` at the end of the result
    fn next_row(&mut self) -> Result<Option<Row>>;
}

enum Body {
    Rows(Box<dyn RowDecoder>),
    Boolean(bool),
    Closed,
}

/// A decoded query result.
///
/// Either a column list with a lazy row sequence, or a single boolean (ASK).
/// The response owns its decoder and, through it, the transport stream;
/// draining the rows, hitting an error, calling [`close`](Self::close) or
/// dropping the response releases them.
pub struct Response {
    columns: Vec<Column>,
    body: Body,
}

impl Response {
    pub fn rows(columns: Vec<Column>, decoder: Box<dyn RowDecoder>) -> Self {
        Self {
            columns,
            body: Body::Rows(decoder),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            columns: Vec::new(),
            body: Body::Boolean(value),
        }
    }

    /// Result columns (empty for a boolean result)
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of the column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The ASK result, if this is a boolean response
    pub fn boolean_result(&self) -> Option<bool> {
        match self.body {
            Body::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Next row in wire order; `None` once the rows are exhausted or closed.
    ///
    /// The response closes itself on the last row and on the first error.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let Body::Rows(decoder) = &mut self.body else {
            return Ok(None);
        };
        match decoder.next_row() {
            Ok(Some(row)) => {
                debug_assert_eq!(row.len(), self.columns.len());
                Ok(Some(row))
            }
            Ok(None) => {
                self.close();
                Ok(None)
            }
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }

    /// Release the decoder and its stream. Idempotent.
    pub fn close(&mut self) {
        if matches!(self.body, Body::Rows(_)) {
            tracing::trace!("closing response row stream");
            self.body = Body::Closed;
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.body, Body::Closed)
    }
}

impl Iterator for Response {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl Drop for Response {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match self.body {
            Body::Rows(_) => "rows",
            Body::Boolean(_) => "boolean",
            Body::Closed => "closed",
        };
        f.debug_struct("Response")
            .field("columns", &self.columns)
            .field("body", &body)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResultsError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        rows: Vec<Result<Option<Row>>>,
        dropped: Arc<AtomicUsize>,
    }

    impl RowDecoder for Scripted {
        fn next_row(&mut self) -> Result<Option<Row>> {
            if self.rows.is_empty() {
                Ok(None)
            } else {
                self.rows.remove(0)
            }
        }
    }

    impl Drop for Scripted {
        fn drop(&mut self) {
            self.dropped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn response(rows: Vec<Result<Option<Row>>>) -> (Response, Arc<AtomicUsize>) {
        let dropped = Arc::new(AtomicUsize::new(0));
        let dec = Scripted {
            rows,
            dropped: dropped.clone(),
        };
        (
            Response::rows(vec![Column::named(0, "x")], Box::new(dec)),
            dropped,
        )
    }

    #[test]
    fn test_closes_at_end_of_rows() {
        let (mut resp, dropped) = response(vec![Ok(Some(vec![Some(Node::string("a"))]))]);
        assert!(resp.next_row().unwrap().is_some());
        assert_eq!(dropped.load(Ordering::SeqCst), 0);
        assert!(resp.next_row().unwrap().is_none());
        assert!(resp.is_closed());
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
        assert!(resp.next_row().unwrap().is_none());
    }

    #[test]
    fn test_closes_on_error() {
        let (resp, dropped) = response(vec![
            Ok(Some(vec![None])),
            Err(ResultsError::protocol("boom")),
            Ok(Some(vec![None])),
        ]);
        let items: Vec<_> = resp.collect();
        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases_decoder() {
        let (resp, dropped) = response(vec![Ok(Some(vec![None]))]);
        drop(resp);
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_boolean_response() {
        let mut resp = Response::boolean(true);
        assert_eq!(resp.boolean_result(), Some(true));
        assert!(resp.columns().is_empty());
        assert!(resp.next_row().unwrap().is_none());
    }
}
