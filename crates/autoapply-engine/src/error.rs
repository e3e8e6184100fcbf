use autoapply_common::error::backend_error::BackendError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Unexpected scanner response: expected {expected}, got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Invalid search URL: {0}")]
    SearchUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure taxonomy used when reporting a listing that could not be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Element went away, is hidden or disabled.
    ElementUnavailable,
    /// A bounded wait ran out.
    Timeout,
    /// The resume did not attach.
    UploadFailed,
    Unclassified,
}

impl EngineError {
    pub fn class(&self) -> FailureClass {
        match self {
            EngineError::Backend(err) if err.is_element_unavailable() => {
                FailureClass::ElementUnavailable
            }
            EngineError::Backend(err) if err.is_timeout() => FailureClass::Timeout,
            EngineError::Backend(BackendError::Upload { .. }) => FailureClass::UploadFailed,
            _ => FailureClass::Unclassified,
        }
    }

    pub fn is_element_unavailable(&self) -> bool {
        self.class() == FailureClass::ElementUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_backend_errors() {
        let hidden = EngineError::from(BackendError::ElementNotVisible { id: 2 });
        assert_eq!(hidden.class(), FailureClass::ElementUnavailable);

        let waited = EngineError::from(BackendError::TimeoutWithContext {
            operation: "wait_for".into(),
        });
        assert_eq!(waited.class(), FailureClass::Timeout);

        let upload = EngineError::from(BackendError::Upload {
            id: 4,
            reason: "no such node".into(),
        });
        assert_eq!(upload.class(), FailureClass::UploadFailed);

        let odd = EngineError::UnexpectedResponse {
            expected: "snapshot",
            got: "text",
        };
        assert_eq!(odd.class(), FailureClass::Unclassified);
    }
}
