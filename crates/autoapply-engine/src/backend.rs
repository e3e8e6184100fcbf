use async_trait::async_trait;
pub use autoapply_common::error::backend_error::BackendError;
use autoapply_common::protocol::{ScannerAction, ScannerProtocolResponse};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

/// The Backend trait is the interface every browser driver implements.
///
/// The engine never touches the page directly: it reads state through scanner snapshots
/// and mutates it through scanner actions, plus the two operations that need the
/// driver's own protocol (file attachment and key presses).
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, attach to profile, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Execute a raw scanner command.
    async fn execute_scanner(
        &mut self,
        command: ScannerAction,
    ) -> Result<ScannerProtocolResponse, BackendError>;

    /// Attach local files to the file input identified by a scanner handle.
    async fn set_input_files(&mut self, _id: u32, _paths: &[PathBuf]) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("set_input_files".into()))
    }

    /// Press a key (with optional modifiers).
    async fn press_key(&mut self, _key: &str, _modifiers: &[String]) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("press_key".into()))
    }
}
