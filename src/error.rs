/// Error types for design-intel
///
/// The public engine entry point never surfaces these to callers; they exist
/// for the orchestrator seam (module failures become degraded results) and
/// for the CLI front end. Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for design-intel operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// I/O errors (reading spec files in the CLI, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An analyzer module failed; caught at the orchestrator call site
    #[error("Analyzer '{module}' failed: {reason}")]
    Module { module: String, reason: String },

    /// Input that cannot be interpreted at all (CLI-level only)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Shorthand for a module-local failure
    pub fn module(module: &str, reason: impl Into<String>) -> Self {
        EngineError::Module {
            module: module.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for design-intel operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_error_display() {
        let err = EngineError::module("semantic", "bad vocabulary");
        let display = format!("{}", err);
        assert!(display.contains("semantic"));
        assert!(display.contains("bad vocabulary"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = EngineError::InvalidInput("no file given".to_string());
        assert!(format!("{}", err).contains("no file given"));
    }
}
