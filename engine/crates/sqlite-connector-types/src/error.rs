#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error connecting to the database: {0}")]
    Connection(String),
    #[error("error in query: {0}")]
    Query(String),
    #[error("error decoding a row: {0}")]
    Decode(String),
    #[error("unsupported query parameter: {0}")]
    InvalidParameter(String),
}

impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Configuration(_) | sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Connection(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => Self::Decode(error.to_string()),
            error => Self::Query(error.to_string()),
        }
    }
}
