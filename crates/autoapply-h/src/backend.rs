use crate::cdp::CdpClient;
use crate::inject::{EVAL_TIMEOUT, execute_command};
use async_trait::async_trait;
use autoapply_engine::backend::{Backend, BackendError, NavigationResult};
use autoapply_engine::config::BrowserConfig;
use autoapply_engine::protocol::{ScannerAction, ScannerProtocolResponse};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Headroom over an in-page wait so the scanner reports its own TIMEOUT first.
const WAIT_EVAL_MARGIN: Duration = Duration::from_secs(2);

/// Chromium driven over CDP.
pub struct HeadlessBackend {
    client: Option<CdpClient>,
    profile: BrowserConfig,
}

impl HeadlessBackend {
    pub fn new(profile: BrowserConfig) -> Self {
        Self {
            client: None,
            profile,
        }
    }

    async fn get_navigation_result(
        page: &chromiumoxide::Page,
    ) -> Result<NavigationResult, BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult { url, title })
    }
}

/// Evaluation bound for `command`; waits get their own timeout plus a margin.
fn eval_timeout(command: &ScannerAction) -> Duration {
    match command {
        ScannerAction::Wait(req) => {
            EVAL_TIMEOUT.max(Duration::from_millis(req.timeout_ms) + WAIT_EVAL_MARGIN)
        }
        _ => EVAL_TIMEOUT,
    }
}

/// Windows virtual key code for keys that listeners commonly check by `keyCode`.
fn virtual_key_code(key: &str) -> Option<i64> {
    match key {
        "Escape" => Some(27),
        "Enter" => Some(13),
        "Tab" => Some(9),
        _ => None,
    }
}

fn modifier_flags(modifiers: &[String]) -> i64 {
    modifiers.iter().fold(0, |flags, m| {
        flags
            | match m.to_lowercase().as_str() {
                "alt" => 1,
                "ctrl" | "control" => 2,
                "meta" | "cmd" | "command" => 4,
                "shift" => 8,
                _ => 0,
            }
    })
}

fn key_event(
    kind: DispatchKeyEventType,
    key: &str,
    modifiers: i64,
) -> Result<DispatchKeyEventParams, BackendError> {
    let mut builder = DispatchKeyEventParams::builder()
        .r#type(kind)
        .key(key)
        .code(key)
        .modifiers(modifiers);
    if let Some(code) = virtual_key_code(key) {
        builder = builder.windows_virtual_key_code(code);
    }
    builder
        .build()
        .map_err(|e| BackendError::Other(format!("Failed to build key event: {:?}", e)))
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Chromium backend...");
        let client = CdpClient::launch(&self.profile)
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        info!("Navigating to: {}", url);
        client
            .page
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::get_navigation_result(&client.page).await
    }

    async fn execute_scanner(
        &mut self,
        command: ScannerAction,
    ) -> Result<ScannerProtocolResponse, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;
        let timeout = eval_timeout(&command);
        let value = serde_json::to_value(&command)?;

        let result_value = execute_command(&client.page, value, timeout)
            .await
            .map_err(|e| BackendError::Scanner(e.to_string()))?;

        let response: ScannerProtocolResponse = serde_json::from_value(result_value)?;
        Ok(response)
    }

    async fn set_input_files(&mut self, id: u32, paths: &[PathBuf]) -> Result<(), BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;
        let upload_error = |reason: String| BackendError::Upload { id, reason };

        let element = client
            .page
            .find_element(format!("[data-autoapply-id='{}']", id))
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        let files = paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        let mut params = SetFileInputFilesParams::new(files);
        params.backend_node_id = Some(element.backend_node_id);

        client
            .page
            .execute(params)
            .await
            .map_err(|e| upload_error(e.to_string()))?;
        debug!("Set {} file(s) on element {}", paths.len(), id);
        Ok(())
    }

    async fn press_key(&mut self, key: &str, modifiers: &[String]) -> Result<(), BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;
        let flags = modifier_flags(modifiers);

        for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let event = key_event(kind, key, flags)?;
            client
                .page
                .execute(event)
                .await
                .map_err(|e| BackendError::Other(format!("press_key failed: {}", e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoapply_engine::protocol::{SnapshotRequest, WaitRequest};

    #[test]
    fn waits_extend_the_evaluation_bound() {
        let short = ScannerAction::Snapshot(SnapshotRequest::default());
        assert_eq!(eval_timeout(&short), EVAL_TIMEOUT);

        let long = ScannerAction::Wait(WaitRequest {
            selector: ".jobs-description".into(),
            timeout_ms: 15_000,
        });
        assert_eq!(eval_timeout(&long), Duration::from_secs(17));
    }

    #[test]
    fn folds_modifiers() {
        let mods = vec!["Shift".to_string(), "ctrl".to_string(), "hyper".to_string()];
        assert_eq!(modifier_flags(&mods), 10);
        assert_eq!(modifier_flags(&[]), 0);
    }
}
