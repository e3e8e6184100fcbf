pub mod resolver;

pub use resolver::{FieldResolver, Rule, RULES};

use crate::ops::OptionChoice;
use std::path::PathBuf;

/// What to do with one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAnswer {
    Fill(String),
    Select(OptionChoice),
    Check,
    Attach(PathBuf),
    Skip,
}

impl FieldAnswer {
    pub fn is_skip(&self) -> bool {
        matches!(self, FieldAnswer::Skip)
    }
}
