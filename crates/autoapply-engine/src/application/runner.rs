use super::{AbandonReason, ApplicationOutcome, ApplicationState, overlay};
use crate::applog::ApplicationLog;
use crate::backend::Backend;
use crate::config::AutoApplyConfig;
use crate::error::EngineError;
use crate::form::{FieldAnswer, FieldResolver};
use crate::ops;
use autoapply_common::protocol::{FieldDescriptor, FieldKind, FormSnapshot, LocateRequest};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const SUBMIT_LABEL: &str = "Submit application";

/// Forward controls in preference order.
pub const FORWARD_CONTROLS: [&str; 3] = ["Next", "Review", SUBMIT_LABEL];

const DONE_LABEL: &str = "Done";

enum Step {
    Continue,
    Finished(ApplicationOutcome),
}

/// Drives one application from the Apply click to a terminal outcome.
pub struct ApplicationRunner<'a> {
    config: &'a AutoApplyConfig,
    title: String,
    state: ApplicationState,
}

impl<'a> ApplicationRunner<'a> {
    pub fn new(config: &'a AutoApplyConfig, title: impl Into<String>) -> Self {
        Self {
            config,
            title: title.into(),
            state: ApplicationState::Idle,
        }
    }

    pub fn state(&self) -> ApplicationState {
        self.state
    }

    /// Run to completion. Every path ends in exactly one outcome; anything other than a
    /// submission leaves the page with its overlay dismissed.
    pub async fn run<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        log: &mut dyn ApplicationLog,
    ) -> ApplicationOutcome {
        let outcome = match self.drive(backend, log).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Application for '{}' failed: {}", self.title, e);
                ApplicationOutcome::Error {
                    cause: e.to_string(),
                    class: e.class(),
                }
            }
        };

        self.state = match &outcome {
            ApplicationOutcome::Submitted { .. } => ApplicationState::Submitted,
            ApplicationOutcome::Abandoned { .. } => ApplicationState::Abandoned,
            ApplicationOutcome::Error { .. } => ApplicationState::Error,
        };

        if !outcome.is_submitted() {
            overlay::dismiss(backend, &self.config.timing).await;
        }
        outcome
    }

    async fn drive<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        log: &mut dyn ApplicationLog,
    ) -> Result<ApplicationOutcome, EngineError> {
        let apply = LocateRequest::by_selector(&self.config.site.apply_button);
        let Some(button) = ops::locate(backend, apply).await? else {
            info!("No apply button for '{}'", self.title);
            return Ok(abandoned(AbandonReason::NoApplyButton));
        };

        ops::click(backend, button.id, false).await?;
        self.state = ApplicationState::Applying;
        tokio::time::sleep(self.config.timing.apply_settle()).await;

        for iteration in 1..=self.config.timing.max_steps {
            self.state = ApplicationState::StepLoop { iteration };
            debug!("Step {} of '{}'", iteration, self.title);
            if let Step::Finished(outcome) = self.step(backend, log).await? {
                return Ok(outcome);
            }
        }

        warn!(
            "Gave up on '{}' after {} steps",
            self.title, self.config.timing.max_steps
        );
        Ok(abandoned(AbandonReason::StepLimitExceeded))
    }

    async fn step<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        log: &mut dyn ApplicationLog,
    ) -> Result<Step, EngineError> {
        let resolver = FieldResolver::new(&self.config.answers);
        let mut snapshot = ops::snapshot(backend).await?;

        let attached = match self.attach_uploads(backend, &resolver, &snapshot).await? {
            Some(ids) => ids,
            None => return Ok(Step::Finished(abandoned(AbandonReason::UploadFailed))),
        };
        if !attached.is_empty() {
            tokio::time::sleep(self.config.timing.upload_settle()).await;
            snapshot = ops::snapshot(backend).await?;
            let still_empty = attached.iter().find(|id| {
                snapshot
                    .field(**id)
                    .is_some_and(|field| field.kind == FieldKind::FileUpload && !field.has_file)
            });
            if let Some(id) = still_empty {
                warn!("Upload field {} still has no file", id);
                return Ok(Step::Finished(abandoned(AbandonReason::UploadFailed)));
            }
        }

        if fill_fields(backend, &resolver, &snapshot).await? {
            snapshot = ops::snapshot(backend).await?;
        }

        let Some((label, control_id)) = forward_control(&snapshot) else {
            info!("No forward control for '{}'", self.title);
            return Ok(Step::Finished(abandoned(AbandonReason::NoForwardControl)));
        };

        debug!("Clicking '{}'", label);
        ops::click(backend, control_id, false).await?;
        tokio::time::sleep(self.config.timing.step_settle()).await;

        if label != SUBMIT_LABEL {
            return Ok(Step::Continue);
        }

        info!("Submitted application: {}", self.title);
        if let Err(e) = log.record(&self.title) {
            warn!("Could not record submission of '{}': {}", self.title, e);
        }
        self.close_confirmation(backend).await;
        Ok(Step::Finished(ApplicationOutcome::Submitted {
            title: self.title.clone(),
        }))
    }

    /// Attach the resume to every pending upload the resolver claims.
    ///
    /// Returns the attached handles, or `None` when an attachment could not be made.
    async fn attach_uploads<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        resolver: &FieldResolver<'_>,
        snapshot: &FormSnapshot,
    ) -> Result<Option<Vec<u32>>, EngineError> {
        let mut attached = Vec::new();
        for field in snapshot.pending_uploads() {
            let path = match resolver.resolve_field(field) {
                FieldAnswer::Attach(path) => path,
                other => {
                    debug!("Leaving upload '{}' alone ({:?})", field.label, other);
                    continue;
                }
            };
            if !attach(backend, field, path).await {
                return Ok(None);
            }
            attached.push(field.id);
        }
        Ok(Some(attached))
    }

    async fn close_confirmation<B: Backend + ?Sized>(&self, backend: &mut B) {
        let snapshot = match ops::snapshot(backend).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Could not inspect confirmation dialog: {}", e);
                return;
            }
        };
        if let Some(done) = snapshot.visible_control(DONE_LABEL) {
            if let Err(e) = ops::click(backend, done.id, false).await {
                warn!("Could not close confirmation dialog: {}", e);
            }
        }
    }
}

fn abandoned(reason: AbandonReason) -> ApplicationOutcome {
    ApplicationOutcome::Abandoned { reason }
}

async fn attach<B: Backend + ?Sized>(backend: &mut B, field: &FieldDescriptor, path: PathBuf) -> bool {
    if !path.is_file() {
        warn!("Resume not found at {}", path.display());
        return false;
    }
    match backend.set_input_files(field.id, &[path]).await {
        Ok(()) => {
            debug!("Attached resume to '{}'", field.label);
            true
        }
        Err(e) => {
            warn!("Attaching resume to '{}' failed: {}", field.label, e);
            false
        }
    }
}

/// Apply resolver answers to every non-upload field. Returns whether anything changed.
async fn fill_fields<B: Backend + ?Sized>(
    backend: &mut B,
    resolver: &FieldResolver<'_>,
    snapshot: &FormSnapshot,
) -> Result<bool, EngineError> {
    let mut mutated = false;
    for field in snapshot
        .interactive_fields()
        .filter(|field| field.kind != FieldKind::FileUpload)
    {
        let answer = resolver.resolve_field(field);
        debug!("Field '{}' ({:?}) -> {:?}", field.label, field.kind, answer);
        let result = match &answer {
            FieldAnswer::Fill(text) => ops::fill(backend, field.id, text).await,
            FieldAnswer::Select(choice) => ops::select(backend, field.id, choice).await,
            FieldAnswer::Check if field.checked => continue,
            FieldAnswer::Check => ops::check(backend, field.id).await,
            FieldAnswer::Attach(_) | FieldAnswer::Skip => continue,
        };
        match result {
            Ok(()) => mutated = true,
            Err(e) if e.is_element_unavailable() => {
                warn!("Skipping field '{}': {}", field.label, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(mutated)
}

fn forward_control(snapshot: &FormSnapshot) -> Option<(&'static str, u32)> {
    FORWARD_CONTROLS.iter().find_map(|label| {
        snapshot
            .visible_control(label)
            .map(|control| (*label, control.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoapply_common::protocol::Control;

    #[test]
    fn next_is_preferred_over_submit() {
        let snapshot = FormSnapshot {
            fields: vec![],
            controls: vec![Control::new(5, "Submit application"), Control::new(6, "Next")],
        };
        assert_eq!(forward_control(&snapshot), Some(("Next", 6)));
    }

    #[test]
    fn hidden_controls_are_ignored() {
        let mut hidden = Control::new(5, "Review");
        hidden.visible = false;
        let snapshot = FormSnapshot {
            fields: vec![],
            controls: vec![hidden],
        };
        assert_eq!(forward_control(&snapshot), None);
    }
}
