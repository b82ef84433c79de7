//! Error types for the linkgrab application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // Network errors
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    // Input parsing errors (page ranges, URL templates)
    #[error("Parse error: {0}")]
    Parse(String),

    // File system errors
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Job errors
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {id} is {status}, not completed")]
    JobState { id: String, status: String },

    #[error("Archive error: {0}")]
    Archive(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    // Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Build a filesystem error for the given path.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the error was caused by the caller's input rather than by us.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Parse(_)
                | Error::UrlParse(_)
                | Error::JobNotFound(_)
                | Error::JobState { .. }
        )
    }

    /// Whether the user aborted an interactive prompt (Ctrl-C / Esc).
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Prompt(
                inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted
            )
        )
    }
}

/// Process exit codes for the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FETCH_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const NOTHING_FOUND: i32 = 6;
}
