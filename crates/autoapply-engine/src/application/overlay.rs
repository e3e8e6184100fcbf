//! Closing whatever modal an abandoned application leaves behind.

use crate::backend::Backend;
use crate::config::TimingConfig;
use crate::error::EngineError;
use crate::ops;
use autoapply_common::protocol::LocateRequest;
use tracing::{debug, warn};

const DISCARD_LABEL: &str = "Discard";

pub async fn escape<B: Backend + ?Sized>(backend: &mut B) -> Result<(), EngineError> {
    backend.press_key("Escape", &[]).await?;
    Ok(())
}

/// Escape, settle, then confirm "Discard" if the site asks. Never fails.
pub async fn dismiss<B: Backend + ?Sized>(backend: &mut B, timing: &TimingConfig) {
    if let Err(e) = escape(backend).await {
        warn!("Escape during dismissal failed: {}", e);
    }
    tokio::time::sleep(timing.overlay_settle()).await;

    match ops::locate(backend, LocateRequest::by_text(DISCARD_LABEL)).await {
        Ok(Some(control)) => {
            debug!("Discarding draft application");
            if let Err(e) = ops::click(backend, control.id, false).await {
                warn!("Discard click failed: {}", e);
            }
        }
        Ok(None) => {}
        Err(e) => warn!("Discard lookup failed: {}", e),
    }
}
