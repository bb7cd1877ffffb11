//! Unified error types for search-tool.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the library crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A search engine could not complete the search.
    #[error("SEARCH_ENGINE_ERROR: {0}")]
    SearchEngine(String),

    /// Result page content could not be parsed.
    #[error("PARSING_ERROR: {0}")]
    Parsing(String),

    /// Browser launch, navigation or page interaction failed.
    #[error("BROWSER_ERROR: {0}")]
    Browser(String),

    /// Invalid search or application configuration.
    #[error("CONFIGURATION_ERROR: {0}")]
    Configuration(String),

    /// The engine served a CAPTCHA or block page instead of results.
    #[error("BLOCKED: {0}")]
    Blocked(String),

    /// A URL could not be built or parsed.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Cached payload could not be (de)serialized.
    #[error("CACHE_ERROR: invalid payload: {0}")]
    InvalidPayload(String),
}

impl Error {
    /// Whether this error was raised by the cache layer.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, Error::Database(_) | Error::MigrationFailed(_) | Error::InvalidPayload(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidPayload(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}
