//! CLI error type.

use std::fmt;

use chunkmap::config::ConfigError;
use chunkmap::coord::CoordError;
use chunkmap::logging::LoggingError;
use chunkmap::workspace::WorkspaceError;

/// Errors reported to the user before exiting non-zero.
#[derive(Debug)]
pub enum CliError {
    /// Bad or missing setting.
    Config(String),
    /// The areas file couldn't be read or parsed.
    Areas(String),
    Coordinate(CoordError),
    Logging(LoggingError),
    Workspace(WorkspaceError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Areas(_) => 2,
            CliError::Workspace(WorkspaceError::Assemble(e)) if e.is_configuration_error() => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Areas(msg) => write!(f, "Invalid areas file: {}", msg),
            CliError::Coordinate(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "Logging setup failed: {}", e),
            CliError::Workspace(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Coordinate(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Workspace(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coordinate(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<WorkspaceError> for CliError {
    fn from(e: WorkspaceError) -> Self {
        CliError::Workspace(e)
    }
}
