use log::{ log, Level };
use thiserror::Error;

use crate::implementations::config::ConfigError;

/// Custom error types for the Flowscribe pipeline
#[derive(Debug, Error)]
pub enum FlowscribeError {
    #[error("Requirements input missing: {0}")]
    MissingInput(String),

    #[error("Failed to write artifact {path}: {message}")]
    WriteFailure { path: String, message: String },

    #[error("No image renderer available: {0}")]
    RenderUnavailable(String),

    #[error("Remote renderer returned HTTP {status} for {artifact}")]
    RemoteRenderFailure { artifact: String, status: u16 },

    #[error("Failed to install renderer: {0}")]
    InstallFailure(String),

    #[error("Renderer {tool} failed with {status}: {stderr}")]
    LocalRenderFailure { tool: String, status: String, stderr: String },

    #[error("Rendering {artifact} timed out after {seconds}s")]
    RenderTimeout { artifact: String, seconds: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result type specific to Flowscribe operations
pub type FlowscribeResult<T> = Result<T, FlowscribeError>;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Fatal,
    Error,
    Warning,
    Info,
}

impl ErrorSeverity {
    /// Log level used when an error of this severity is reported
    pub fn log_level(&self) -> Level {
        match self {
            ErrorSeverity::Fatal | ErrorSeverity::Error => Level::Error,
            ErrorSeverity::Warning => Level::Warn,
            ErrorSeverity::Info => Level::Info,
        }
    }
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
    fn severity(&self) -> ErrorSeverity;
}

impl RecoverableError for FlowscribeError {
    fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            FlowscribeError::Config(_) | FlowscribeError::InvalidInput(_) | FlowscribeError::Io(_)
        )
    }

    fn recovery_strategy(&self) -> Option<String> {
        let strategy = match self {
            FlowscribeError::MissingInput(_) => "using built-in default requirements",
            FlowscribeError::WriteFailure { .. } => "continuing with remaining artifacts",
            FlowscribeError::RenderUnavailable(_) => "skipping image stage, text artifacts kept",
            FlowscribeError::RemoteRenderFailure { .. }
            | FlowscribeError::LocalRenderFailure { .. }
            | FlowscribeError::RenderTimeout { .. }
            | FlowscribeError::Network(_) => "image skipped for this artifact",
            FlowscribeError::InstallFailure(_) => "falling back to the next rendering tier",
            _ => return None,
        };
        Some(strategy.to_string())
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            FlowscribeError::MissingInput(_) | FlowscribeError::RenderUnavailable(_) => {
                ErrorSeverity::Warning
            }
            FlowscribeError::InstallFailure(_) => ErrorSeverity::Info,
            e if e.is_recoverable() => ErrorSeverity::Error,
            _ => ErrorSeverity::Fatal,
        }
    }
}

/// Log `err` at its severity's level, followed by the recovery taken
pub fn log_with_recovery(context: &str, err: &FlowscribeError) {
    let level = err.severity().log_level();
    match err.recovery_strategy() {
        Some(recovery) => log!(level, "{}: {}; {}", context, err, recovery),
        None => log!(level, "{}: {}", context, err),
    }
}
