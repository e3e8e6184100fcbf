#![allow(dead_code)]

use async_trait::async_trait;
use autoapply_engine::backend::{Backend, BackendError, NavigationResult};
use autoapply_engine::config::{AutoApplyConfig, TimingConfig};
use autoapply_engine::protocol::{
    ActionResult, CardList, Control, ControlLookup, FieldDescriptor, FieldKind, FormSnapshot,
    ListingCard, ScannerAction, ScannerData, ScannerProtocolResponse, SelectRequest, TextContent,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const APPLY_BUTTON_ID: u32 = 100;
pub const DISCARD_ID: u32 = 900;
pub const DONE_ID: u32 = 901;

/// Backend that plays a scripted results feed and application wizard.
///
/// Clicking a card link opens that listing and resets the wizard. Clicking "Next" or
/// "Review" advances one step; clicking "Submit application" switches the snapshot to
/// the confirmation dialog.
#[derive(Debug)]
pub struct ScriptedBackend {
    pub cards: Vec<ListingCard>,
    /// Description text keyed by the handle clicked to open the listing.
    pub descriptions: HashMap<u32, String>,
    pub description_missing: bool,
    pub fail_cards: bool,

    pub apply_button: bool,
    pub steps: Vec<FormSnapshot>,
    pub advance_on_forward: bool,
    pub confirmation: FormSnapshot,
    pub upload_sticks: bool,
    pub upload_error: bool,
    /// Scanner error code returned when touching these field handles.
    pub field_errors: HashMap<u32, &'static str>,
    pub discard_prompt: bool,

    pub step: usize,
    pub submitted: bool,
    pub opened: Option<u32>,
    attached: HashSet<u32>,
    ticked: HashSet<u32>,

    pub actions: Vec<ScannerAction>,
    pub clicks: Vec<u32>,
    pub filled: Vec<(u32, String)>,
    pub selected: Vec<SelectRequest>,
    pub checked: Vec<u32>,
    pub uploads: Vec<(u32, Vec<PathBuf>)>,
    pub keys: Vec<String>,
    pub navigations: Vec<String>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            cards: vec![],
            descriptions: HashMap::new(),
            description_missing: false,
            fail_cards: false,
            apply_button: true,
            steps: vec![],
            advance_on_forward: true,
            confirmation: FormSnapshot {
                fields: vec![],
                controls: vec![Control::new(DONE_ID, "Done")],
            },
            upload_sticks: true,
            upload_error: false,
            field_errors: HashMap::new(),
            discard_prompt: false,
            step: 0,
            submitted: false,
            opened: None,
            attached: HashSet::new(),
            ticked: HashSet::new(),
            actions: vec![],
            clicks: vec![],
            filled: vec![],
            selected: vec![],
            checked: vec![],
            uploads: vec![],
            keys: vec![],
            navigations: vec![],
        }
    }
}

impl ScriptedBackend {
    pub fn with_steps(steps: Vec<FormSnapshot>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Number of snapshots taken so far.
    pub fn snapshots_taken(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, ScannerAction::Snapshot(_)))
            .count()
    }

    fn current_snapshot(&self) -> FormSnapshot {
        if self.submitted {
            return self.confirmation.clone();
        }
        let Some(step) = self.steps.get(self.step) else {
            return FormSnapshot::default();
        };
        let mut snapshot = step.clone();
        for field in &mut snapshot.fields {
            if self.upload_sticks && self.attached.contains(&field.id) {
                field.has_file = true;
            }
            if self.ticked.contains(&field.id) {
                field.checked = true;
            }
        }
        snapshot
    }

    fn open_listing(&mut self, id: u32) {
        self.opened = Some(id);
        self.step = 0;
        self.submitted = false;
        self.attached.clear();
        self.ticked.clear();
    }

    fn click(&mut self, id: u32) {
        if self.descriptions.contains_key(&id) {
            self.open_listing(id);
            return;
        }
        if self.submitted {
            return;
        }
        let text = self
            .steps
            .get(self.step)
            .and_then(|s| s.controls.iter().find(|c| c.id == id))
            .map(|c| c.text.clone());
        match text.as_deref() {
            Some(t) if t.contains("Submit application") => self.submitted = true,
            Some(t) if (t.contains("Next") || t.contains("Review")) && self.advance_on_forward => {
                self.step = (self.step + 1).min(self.steps.len().saturating_sub(1));
            }
            _ => {}
        }
    }

    fn field_error(&self, id: u32) -> Option<ScannerProtocolResponse> {
        self.field_errors.get(&id).map(|code| element_error(code, id))
    }
}

pub fn ok(data: ScannerData) -> ScannerProtocolResponse {
    ScannerProtocolResponse::ok(data)
}

pub fn action_ok() -> ScannerProtocolResponse {
    ok(ScannerData::Action(ActionResult::ok()))
}

pub fn element_error(code: &str, id: u32) -> ScannerProtocolResponse {
    ScannerProtocolResponse::Error {
        code: code.to_string(),
        message: format!("{} on {}", code, id),
        details: Some(json!({ "id": id })),
        hint: None,
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.navigations.push(url.to_string());
        Ok(NavigationResult {
            url: url.to_string(),
            title: "Jobs".into(),
        })
    }

    async fn execute_scanner(
        &mut self,
        command: ScannerAction,
    ) -> Result<ScannerProtocolResponse, BackendError> {
        self.actions.push(command.clone());
        let response = match command {
            ScannerAction::Cards(_) if self.fail_cards => {
                ScannerProtocolResponse::error("SCRIPT_ERROR", "feed not rendered")
            }
            ScannerAction::Cards(_) => ok(ScannerData::Cards(CardList {
                cards: self.cards.clone(),
            })),
            ScannerAction::Snapshot(_) => {
                ok(ScannerData::Snapshot(Box::new(self.current_snapshot())))
            }
            ScannerAction::Locate(req) => {
                let control = if req.selector.is_some() {
                    self.apply_button
                        .then(|| Control::new(APPLY_BUTTON_ID, "Easy Apply"))
                } else if req.text.as_deref() == Some("Discard") && self.discard_prompt {
                    Some(Control::new(DISCARD_ID, "Discard"))
                } else {
                    None
                };
                ok(ScannerData::Lookup(ControlLookup {
                    found: control.is_some(),
                    control,
                }))
            }
            ScannerAction::Click(req) => {
                self.clicks.push(req.id);
                self.click(req.id);
                action_ok()
            }
            ScannerAction::Type(req) => match self.field_error(req.id) {
                Some(err) => err,
                None => {
                    self.filled.push((req.id, req.text));
                    action_ok()
                }
            },
            ScannerAction::Select(req) => match self.field_error(req.id) {
                Some(err) => err,
                None => {
                    self.selected.push(req);
                    action_ok()
                }
            },
            ScannerAction::Check(req) => match self.field_error(req.id) {
                Some(err) => err,
                None => {
                    self.checked.push(req.id);
                    self.ticked.insert(req.id);
                    action_ok()
                }
            },
            ScannerAction::Scroll(_) => action_ok(),
            ScannerAction::Wait(req) if self.description_missing => {
                ScannerProtocolResponse::error("TIMEOUT", format!("wait_for {}", req.selector))
            }
            ScannerAction::Wait(_) => action_ok(),
            ScannerAction::GetText(_) => {
                let text = self
                    .opened
                    .and_then(|id| self.descriptions.get(&id))
                    .cloned()
                    .unwrap_or_default();
                ok(ScannerData::Text(TextContent { text }))
            }
        };
        Ok(response)
    }

    async fn set_input_files(&mut self, id: u32, paths: &[PathBuf]) -> Result<(), BackendError> {
        self.uploads.push((id, paths.to_vec()));
        if self.upload_error {
            return Err(BackendError::Upload {
                id,
                reason: "node detached".into(),
            });
        }
        self.attached.insert(id);
        Ok(())
    }

    async fn press_key(&mut self, key: &str, _modifiers: &[String]) -> Result<(), BackendError> {
        self.keys.push(key.to_string());
        Ok(())
    }
}

pub fn step(fields: Vec<FieldDescriptor>, controls: Vec<Control>) -> FormSnapshot {
    FormSnapshot { fields, controls }
}

pub fn text_field(id: u32, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(id, FieldKind::Text, label)
}

pub fn upload_field(id: u32, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(id, FieldKind::FileUpload, label)
}

pub fn card(id: u32, title: &str, company: &str) -> ListingCard {
    ListingCard {
        id,
        link_id: Some(id + 1),
        company: company.to_string(),
        title: title.to_string(),
        url: Some(format!("https://www.linkedin.com/jobs/view/{}/?trk=feed", id)),
    }
}

/// Defaults with no settle delays and the given resume.
pub fn fast_config(resume: &Path) -> AutoApplyConfig {
    let mut config = AutoApplyConfig::default();
    config.timing = TimingConfig::immediate();
    config.answers.resume_path = resume.to_path_buf();
    config
}

/// The "Sr Automation QA" single-step form: experience, resume, submit.
pub fn sr_automation_qa_form() -> Vec<FormSnapshot> {
    vec![step(
        vec![text_field(1, "Years of experience"), upload_field(2, "Resume")],
        vec![Control::new(10, "Submit application")],
    )]
}
