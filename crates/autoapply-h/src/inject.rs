use autoapply_scanner::SCANNER_JS;
use chromiumoxide::Page;
use std::error::Error;
use std::time::Duration;

/// Default bound on one evaluation; a blocking dialog would otherwise hang the run.
pub const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retries for context errors while the page is navigating.
const MAX_CONTEXT_RETRIES: u32 = 10;

const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Whether the page context is unavailable (e.g. mid-navigation).
fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

enum EvalError {
    Timeout,
    Context(String),
    Other(String),
}

impl From<String> for EvalError {
    fn from(err: String) -> Self {
        if is_context_error(&err) {
            EvalError::Context(err)
        } else {
            EvalError::Other(err)
        }
    }
}

/// Inject the scanner unless this document already has it.
async fn ensure_scanner(page: &Page) -> Result<(), EvalError> {
    let is_loaded: bool = page
        .evaluate("typeof window.AutoApply !== 'undefined'")
        .await
        .map_err(|e| EvalError::from(e.to_string()))?
        .into_value()
        .map_err(|e| EvalError::Other(format!("Failed to get bool value: {}", e)))?;

    if !is_loaded {
        page.evaluate(SCANNER_JS)
            .await
            .map_err(|e| EvalError::from(format!("Failed to inject scanner: {}", e)))?;
    }
    Ok(())
}

/// Send one command to `window.AutoApply.process` and return the raw response.
///
/// Navigations replace the document, so the scanner is re-injected and the call is
/// retried on context errors.
pub async fn execute_command(
    page: &Page,
    params: serde_json::Value,
    timeout: Duration,
) -> Result<serde_json::Value, Box<dyn Error + Send + Sync>> {
    let expression = format!("window.AutoApply.process({})", serde_json::to_string(&params)?);
    tracing::debug!("Evaluating: {}", expression);

    let mut last_error = None;
    for attempt in 0..MAX_CONTEXT_RETRIES {
        let result = match ensure_scanner(page).await {
            Ok(()) => evaluate_with_timeout(page, &expression, timeout).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(value) => return Ok(value),
            Err(EvalError::Timeout) => {
                return Err("Command timed out - possibly blocked by a dialog".into());
            }
            Err(EvalError::Context(err)) => {
                tracing::debug!(
                    "Context error (attempt {}/{}), retrying",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            Err(EvalError::Other(err)) => {
                return Err(format!("Evaluation failed: {}", err).into());
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| "Failed to execute command after retries".to_string())
        .into())
}

async fn evaluate_with_timeout(
    page: &Page,
    expression: &str,
    timeout: Duration,
) -> Result<serde_json::Value, EvalError> {
    match tokio::time::timeout(timeout, page.evaluate(expression)).await {
        Err(_) => Err(EvalError::Timeout),
        Ok(Err(e)) => Err(EvalError::from(e.to_string())),
        Ok(Ok(remote_object)) => remote_object
            .into_value::<serde_json::Value>()
            .map_err(|e| EvalError::Other(format!("Failed to get result: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_context_errors() {
        assert!(is_context_error("Cannot find context with specified id"));
        assert!(is_context_error("Execution context was destroyed."));
        assert!(!is_context_error("ReferenceError: foo is not defined"));
        assert!(matches!(
            EvalError::from("Execution context was destroyed".to_string()),
            EvalError::Context(_)
        ));
    }
}
