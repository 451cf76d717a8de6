//! Errors raised by graph stores and by typed row access.

use thiserror::Error;

/// Everything a graph store or a result row can fail with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The store could not be reached or refused the session
    #[error("graph store unavailable: {0}")]
    Unavailable(String),

    /// A query was run without one of the parameters its pattern needs
    #[error("query `{pattern}` is missing parameter ${name}")]
    MissingParameter {
        pattern: &'static str,
        name: &'static str,
    },

    /// The store accepted the query but failed while executing it
    #[error("query execution failed: {0}")]
    Execution(String),

    /// A row does not carry a column the caller asked for
    #[error("row has no column `{0}`")]
    MissingColumn(String),

    /// A column holds a value of another type
    #[error("column `{column}` holds {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, GraphError>;
