//! Loader error types and exit codes

use realmsync_sheet::SheetError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Exit codes for the loader
/// - 0: Success
/// - 1: General error (configuration, I/O, failed rows with --strict)
/// - 2: Authentication failed
/// - 3: Network error
/// - 4: Invalid input (spreadsheet)
/// - 5: Server error
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Irrecoverable errors that abort the run.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Check that the identity provider is running\n  - Verify the HOST setting\n  - Try again in a few moments")]
    ConnectionFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{failed} row(s) failed")]
    RowsFailed { failed: usize },
}

impl LoaderError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LoaderError::Config(_) | LoaderError::Io(_) | LoaderError::RowsFailed { .. } => 1,
            LoaderError::AuthenticationFailed(_) => 2,
            LoaderError::ConnectionFailed(_) | LoaderError::Network(_) => 3,
            LoaderError::Sheet(_) => 4,
            LoaderError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            LoaderError::AuthenticationFailed(_) => {
                Some("Check ADMIN_NAME and ADMIN_PASSWORD for the master realm.")
            }
            LoaderError::Sheet(SheetError::FileNotFound(_)) => {
                Some("Pass the spreadsheet with --file or set REALMSYNC_FILE.")
            }
            LoaderError::RowsFailed { .. } => Some("See the log file for per-row errors."),
            _ => None,
        }
    }
}

impl From<ApiError> for LoaderError {
    fn from(e: ApiError) -> Self {
        if let Some(status) = e.status() {
            return LoaderError::Api {
                status,
                message: e.to_string(),
            };
        }

        match e {
            ApiError::Auth(message) => LoaderError::AuthenticationFailed(message),
            ApiError::Connection(message) => LoaderError::ConnectionFailed(message),
            ApiError::Timeout(message) => {
                LoaderError::Network(format!("Request timed out: {message}"))
            }
            other => LoaderError::Network(other.to_string()),
        }
    }
}

impl From<ConfigError> for LoaderError {
    fn from(e: ConfigError) -> Self {
        LoaderError::Config(e.to_string())
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        LoaderError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(e: serde_json::Error) -> Self {
        LoaderError::Io(format!("JSON error: {}", e))
    }
}

/// Errors confined to a single spreadsheet row.
///
/// The reconciler logs these and moves on to the next row.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("missing key in data: {0}")]
    KeyMissing(String),

    #[error("data format error: {0}")]
    Format(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<SheetError> for RowError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::KeyMissing(fields) => RowError::KeyMissing(fields.join(", ")),
            other => RowError::Format(other.to_string()),
        }
    }
}
