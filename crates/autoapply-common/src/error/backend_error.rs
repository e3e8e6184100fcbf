/// Errors surfaced by a browser backend or by the in-page scanner.
///
/// Element variants carry the scanner handle so callers can tell which field of a
/// snapshot went stale.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    // ============================================================
    // Navigation Errors
    // ============================================================
    #[error("Navigation failed: {0}")]
    Navigation(String),

    // ============================================================
    // Element Errors
    // ============================================================
    #[error("Element {id} not found")]
    ElementNotFound { id: u32 },

    #[error("Element {id} is stale (removed from DOM)")]
    ElementStale { id: u32 },

    #[error("Element {id} is not visible")]
    ElementNotVisible { id: u32 },

    #[error("Element {id} is disabled")]
    ElementDisabled { id: u32 },

    #[error("Option not found: {value}")]
    OptionNotFound { value: String },

    #[error("Invalid selector: {selector}")]
    SelectorInvalid { selector: String },

    #[error("File upload to element {id} failed: {reason}")]
    Upload { id: u32, reason: String },

    // ============================================================
    // Execution Errors
    // ============================================================
    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("Timeout: {operation}")]
    TimeoutWithContext { operation: String },

    #[error("Timeout")]
    Timeout,

    // ============================================================
    // Protocol Errors
    // ============================================================
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ============================================================
    // System Errors
    // ============================================================
    #[error("Scanner execution failed: {0}")]
    Scanner(String),

    #[error("Not ready")]
    NotReady,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl BackendError {
    /// Scanner protocol error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Navigation(_) => "NAVIGATION_ERROR",
            BackendError::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            BackendError::ElementStale { .. } => "ELEMENT_STALE",
            BackendError::ElementNotVisible { .. } => "ELEMENT_NOT_VISIBLE",
            BackendError::ElementDisabled { .. } => "ELEMENT_DISABLED",
            BackendError::OptionNotFound { .. } => "OPTION_NOT_FOUND",
            BackendError::SelectorInvalid { .. } => "SELECTOR_INVALID",
            BackendError::Upload { .. } => "UPLOAD_FAILED",
            BackendError::ScriptError(_) => "SCRIPT_ERROR",
            BackendError::TimeoutWithContext { .. } | BackendError::Timeout => "TIMEOUT",
            BackendError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            BackendError::InvalidRequest(_) => "INVALID_REQUEST",
            BackendError::Scanner(_) => "SCANNER_ERROR",
            BackendError::NotReady => "NOT_READY",
            BackendError::Io(_) => "IO_ERROR",
            BackendError::Serialization(_) => "SERIALIZATION_ERROR",
            BackendError::Other(_) => "INTERNAL_ERROR",
            BackendError::NotSupported(_) => "NOT_SUPPORTED",
        }
    }

    /// Transient DOM state: the element went away, is hidden, or is not yet enabled.
    /// A fresh snapshot may well succeed.
    pub fn is_element_unavailable(&self) -> bool {
        matches!(
            self,
            BackendError::ElementNotFound { .. }
                | BackendError::ElementStale { .. }
                | BackendError::ElementNotVisible { .. }
                | BackendError::ElementDisabled { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            BackendError::Timeout | BackendError::TimeoutWithContext { .. }
        )
    }
}
