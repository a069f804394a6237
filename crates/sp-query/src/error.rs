//! Query-façade error type.

use thiserror::Error;

use sp_graph::GraphError;

/// Errors raised while loading records or building a graph.
///
/// Path queries never return these; see [`crate::PathResult`].
#[derive(Debug, Error)]
pub enum QueryError {
    /// A required field or column is missing, empty, or of the wrong type.
    #[error("malformed input at {location}: `{field}` {reason}")]
    MalformedInput {
        location: String,
        field: String,
        reason: String,
    },

    /// Graph construction rejected a record (negative weight, dangling edge).
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    pub(crate) fn malformed(location: impl Into<String>, field: &str, reason: impl Into<String>) -> Self {
        QueryError::MalformedInput {
            location: location.into(),
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
