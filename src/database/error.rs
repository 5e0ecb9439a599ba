use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The statement was rejected before execution (syntax, unknown table, ...).
    #[error(transparent)]
    Prepare(rusqlite::Error),

    /// Stepping the statement or reading a row failed.
    #[error(transparent)]
    Step(rusqlite::Error),

    #[error("no such table: {0}")]
    NoSuchTable(String),

    #[error("{context}: {source}")]
    Metadata {
        context: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl DbError {
    pub(crate) fn metadata(context: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> Self {
        let context = context.into();
        move |source| DbError::Metadata { context, source }
    }
}
