use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Commands evaluated by the in-page scanner (`window.AutoApply.process`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScannerAction {
    Cards(CardsRequest),
    Snapshot(SnapshotRequest),
    Locate(LocateRequest),
    Click(ClickRequest),
    Type(TypeRequest),
    Select(SelectRequest),
    Check(CheckRequest),
    Scroll(ScrollRequest),
    #[serde(rename = "wait_for")]
    Wait(WaitRequest),
    #[serde(rename = "get_text")]
    GetText(GetTextRequest),
}

impl ScannerAction {
    /// Wire name of the action, as sent in the `action` field.
    pub fn name(&self) -> &'static str {
        match self {
            ScannerAction::Cards(_) => "cards",
            ScannerAction::Snapshot(_) => "snapshot",
            ScannerAction::Locate(_) => "locate",
            ScannerAction::Click(_) => "click",
            ScannerAction::Type(_) => "type",
            ScannerAction::Select(_) => "select",
            ScannerAction::Check(_) => "check",
            ScannerAction::Scroll(_) => "scroll",
            ScannerAction::Wait(_) => "wait_for",
            ScannerAction::GetText(_) => "get_text",
        }
    }
}

/// Enumerate listing cards in the results feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardsRequest {
    /// Selector matching one card.
    pub card: String,
    /// Selector (relative to the card) of the company text node.
    pub company: String,
    /// Selector (relative to the card) of the title anchor.
    pub title_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    /// Root to scan. When absent the scanner uses the topmost visible dialog, or the
    /// whole document when no dialog is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub include_hidden: bool,
}

/// Find one visible clickable element, by selector or by its text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub exact: bool,
}

impl LocateRequest {
    pub fn by_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Self::default()
        }
    }

    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickRequest {
    pub id: u32,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRequest {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectRequest {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub id: u32,
}

/// Wait until the first element matching `selector` is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitRequest {
    pub selector: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetTextRequest {
    pub selector: String,
}

/// Responses received from the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScannerProtocolResponse {
    Ok {
        #[serde(flatten)]
        data: Box<ScannerData>,
        #[serde(default)]
        warnings: Vec<String>,
    },
    Error {
        code: String,
        message: String,
        #[serde(default)]
        details: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

impl ScannerProtocolResponse {
    pub fn ok(data: ScannerData) -> Self {
        ScannerProtocolResponse::Ok {
            data: Box::new(data),
            warnings: vec![],
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ScannerProtocolResponse::Error {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }
}

/// Payload of a successful response. Variant order matters: each variant has a required
/// field the later ones lack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScannerData {
    Snapshot(Box<FormSnapshot>),
    Cards(CardList),
    Lookup(ControlLookup),
    Text(TextContent),
    Action(ActionResult),
    Value(serde_json::Value),
}

impl ScannerData {
    pub fn kind(&self) -> &'static str {
        match self {
            ScannerData::Snapshot(_) => "snapshot",
            ScannerData::Cards(_) => "cards",
            ScannerData::Lookup(_) => "lookup",
            ScannerData::Text(_) => "text",
            ScannerData::Action(_) => "action",
            ScannerData::Value(_) => "value",
        }
    }
}

/// Point-in-time view of one form step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub fields: Vec<FieldDescriptor>,
    pub controls: Vec<Control>,
}

impl FormSnapshot {
    pub fn field(&self, id: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Fields that can currently be interacted with.
    pub fn interactive_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_interactive())
    }

    /// Visible upload inputs that do not hold a file yet.
    pub fn pending_uploads(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.interactive_fields()
            .filter(|f| f.kind == FieldKind::FileUpload && !f.has_file)
    }

    /// First visible, enabled control whose text contains `text`.
    pub fn visible_control(&self, text: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|c| c.visible && !c.disabled && c.text.contains(text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Radio,
    FileUpload,
    #[serde(other)]
    Other,
}

/// One interactive element of a snapshot with its associated label text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Scanner handle, valid until the element leaves the DOM.
    pub id: u32,
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Option texts in document order (select only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldDescriptor {
    pub fn new(id: u32, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            value: None,
            options: vec![],
            checked: false,
            has_file: false,
            visible: true,
            disabled: false,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.visible && !self.disabled
    }
}

/// A clickable element (button or button-like) with its visible text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl Control {
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            visible: true,
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardList {
    pub cards: Vec<ListingCard>,
}

/// One card of the results feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingCard {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<u32>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlLookup {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Control>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}
