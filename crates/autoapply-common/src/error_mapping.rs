//! Maps scanner error codes (raised by the in-page JavaScript) onto `BackendError`.

use crate::error::backend_error::BackendError;
use serde_json::Value;

/// Maps a scanner protocol error code and message to a `BackendError`.
///
/// `details` carries structured context such as `{"id": 12}` for element errors or
/// `{"value": "Full-time"}` for a missing select option.
pub fn map_scanner_error(code: &str, message: &str, details: Option<&Value>) -> BackendError {
    match code {
        "ELEMENT_NOT_FOUND" => BackendError::ElementNotFound {
            id: extract_id(details),
        },
        "ELEMENT_STALE" => BackendError::ElementStale {
            id: extract_id(details),
        },
        "ELEMENT_NOT_VISIBLE" => BackendError::ElementNotVisible {
            id: extract_id(details),
        },
        "ELEMENT_DISABLED" => BackendError::ElementDisabled {
            id: extract_id(details),
        },
        "OPTION_NOT_FOUND" => BackendError::OptionNotFound {
            value: extract_str(details, "value"),
        },
        "SELECTOR_INVALID" => BackendError::SelectorInvalid {
            selector: extract_str(details, "selector"),
        },
        "SCRIPT_ERROR" => BackendError::ScriptError(message.to_string()),
        "TIMEOUT" => BackendError::TimeoutWithContext {
            operation: message.to_string(),
        },
        "UNKNOWN_COMMAND" => BackendError::UnknownCommand(message.to_string()),
        "INVALID_REQUEST" => BackendError::InvalidRequest(message.to_string()),
        "INTERNAL_ERROR" => BackendError::Scanner(message.to_string()),
        _ => BackendError::Scanner(format!("[{}] {}", code, message)),
    }
}

/// Recovery hint for an error code, used when reporting a failed listing.
pub fn hint_for_code(code: &str) -> Option<&'static str> {
    match code {
        "ELEMENT_NOT_FOUND" | "ELEMENT_STALE" => Some("Take a fresh snapshot"),
        "ELEMENT_NOT_VISIBLE" => Some("Scroll element into view or wait"),
        "ELEMENT_DISABLED" => Some("Wait for element to become enabled"),
        "OPTION_NOT_FOUND" => Some("Check available options in select element"),
        "SELECTOR_INVALID" => Some("Verify the site selectors in the configuration"),
        "TIMEOUT" => Some("Increase the timing values in the configuration"),
        "UPLOAD_FAILED" => Some("Verify the resume path exists and is readable"),
        _ => None,
    }
}

fn extract_id(details: Option<&Value>) -> u32 {
    details
        .and_then(|d| d.get("id"))
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32
}

fn extract_str(details: Option<&Value>, key: &str) -> String {
    details
        .and_then(|d| d.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
