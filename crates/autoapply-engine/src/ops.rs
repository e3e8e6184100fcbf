//! Typed wrappers over scanner actions.
//!
//! Every helper sends one `ScannerAction`, maps scanner error responses onto
//! `BackendError`, and checks the payload kind.

use crate::backend::{Backend, BackendError};
use crate::error::EngineError;
use autoapply_common::error_mapping::{hint_for_code, map_scanner_error};
use autoapply_common::protocol::{
    CardsRequest, CheckRequest, ClickRequest, Control, FormSnapshot, GetTextRequest,
    ListingCard, LocateRequest, ScannerAction, ScannerData, ScannerProtocolResponse,
    ScrollRequest, SelectRequest, SnapshotRequest, TypeRequest, WaitRequest,
};
use std::time::Duration;
use tracing::debug;

/// Extra time granted on top of an in-page wait before the engine gives up on the backend.
const WAIT_GRACE: Duration = Duration::from_secs(3);

/// Which option of a select to pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionChoice {
    Label(String),
    Index(usize),
}

async fn run<B: Backend + ?Sized>(
    backend: &mut B,
    action: ScannerAction,
) -> Result<ScannerData, EngineError> {
    let name = action.name();
    match backend.execute_scanner(action).await? {
        ScannerProtocolResponse::Ok { data, warnings } => {
            for warning in warnings {
                debug!("scanner warning ({}): {}", name, warning);
            }
            Ok(*data)
        }
        ScannerProtocolResponse::Error {
            code,
            message,
            details,
            hint,
        } => {
            if let Some(hint) = hint.as_deref().or_else(|| hint_for_code(&code)) {
                debug!("{} failed with {}: {}", name, code, hint);
            }
            Err(map_scanner_error(&code, &message, details.as_ref()).into())
        }
    }
}

async fn run_action<B: Backend + ?Sized>(
    backend: &mut B,
    action: ScannerAction,
) -> Result<(), EngineError> {
    match run(backend, action).await? {
        ScannerData::Action(result) if result.success => Ok(()),
        ScannerData::Action(result) => Err(BackendError::Scanner(
            result.message.unwrap_or_else(|| "action reported failure".into()),
        )
        .into()),
        other => Err(EngineError::UnexpectedResponse {
            expected: "action",
            got: other.kind(),
        }),
    }
}

pub async fn snapshot<B: Backend + ?Sized>(backend: &mut B) -> Result<FormSnapshot, EngineError> {
    match run(backend, ScannerAction::Snapshot(SnapshotRequest::default())).await? {
        ScannerData::Snapshot(snapshot) => Ok(*snapshot),
        other => Err(EngineError::UnexpectedResponse {
            expected: "snapshot",
            got: other.kind(),
        }),
    }
}

pub async fn cards<B: Backend + ?Sized>(
    backend: &mut B,
    request: CardsRequest,
) -> Result<Vec<ListingCard>, EngineError> {
    match run(backend, ScannerAction::Cards(request)).await? {
        ScannerData::Cards(list) => Ok(list.cards),
        other => Err(EngineError::UnexpectedResponse {
            expected: "cards",
            got: other.kind(),
        }),
    }
}

/// First visible element matching the request, if any.
pub async fn locate<B: Backend + ?Sized>(
    backend: &mut B,
    request: LocateRequest,
) -> Result<Option<Control>, EngineError> {
    match run(backend, ScannerAction::Locate(request)).await? {
        ScannerData::Lookup(lookup) if lookup.found => Ok(lookup.control),
        ScannerData::Lookup(_) => Ok(None),
        other => Err(EngineError::UnexpectedResponse {
            expected: "lookup",
            got: other.kind(),
        }),
    }
}

pub async fn click<B: Backend + ?Sized>(
    backend: &mut B,
    id: u32,
    force: bool,
) -> Result<(), EngineError> {
    run_action(backend, ScannerAction::Click(ClickRequest { id, force })).await
}

pub async fn fill<B: Backend + ?Sized>(
    backend: &mut B,
    id: u32,
    text: &str,
) -> Result<(), EngineError> {
    run_action(
        backend,
        ScannerAction::Type(TypeRequest {
            id,
            text: text.to_string(),
            clear: true,
        }),
    )
    .await
}

pub async fn select<B: Backend + ?Sized>(
    backend: &mut B,
    id: u32,
    choice: &OptionChoice,
) -> Result<(), EngineError> {
    let (label, index) = match choice {
        OptionChoice::Label(label) => (Some(label.clone()), None),
        OptionChoice::Index(index) => (None, Some(*index)),
    };
    run_action(
        backend,
        ScannerAction::Select(SelectRequest { id, label, index }),
    )
    .await
}

pub async fn check<B: Backend + ?Sized>(backend: &mut B, id: u32) -> Result<(), EngineError> {
    run_action(backend, ScannerAction::Check(CheckRequest { id })).await
}

pub async fn scroll_into_view<B: Backend + ?Sized>(
    backend: &mut B,
    id: u32,
) -> Result<(), EngineError> {
    run_action(backend, ScannerAction::Scroll(ScrollRequest { id })).await
}

/// Wait for `selector` to become visible, bounded by `timeout` even if the backend hangs.
pub async fn wait_for_visible<B: Backend + ?Sized>(
    backend: &mut B,
    selector: &str,
    timeout: Duration,
) -> Result<(), EngineError> {
    let action = ScannerAction::Wait(WaitRequest {
        selector: selector.to_string(),
        timeout_ms: timeout.as_millis() as u64,
    });
    match tokio::time::timeout(timeout + WAIT_GRACE, run_action(backend, action)).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::TimeoutWithContext {
            operation: format!("wait_for {}", selector),
        }
        .into()),
    }
}

pub async fn get_text<B: Backend + ?Sized>(
    backend: &mut B,
    selector: &str,
) -> Result<String, EngineError> {
    let request = GetTextRequest {
        selector: selector.to_string(),
    };
    match run(backend, ScannerAction::GetText(request)).await? {
        ScannerData::Text(content) => Ok(content.text),
        other => Err(EngineError::UnexpectedResponse {
            expected: "text",
            got: other.kind(),
        }),
    }
}
