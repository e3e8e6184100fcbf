//! Label heuristics that answer an unknown form.
//!
//! The rules are checked in [`RULES`] order and the first one that produces an answer
//! wins. Label and radio texts are compared lowercased; select options are compared
//! as displayed.

use super::FieldAnswer;
use crate::config::AnswerConfig;
use crate::ops::OptionChoice;
use autoapply_common::protocol::{FieldDescriptor, FieldKind};

const EXPERIENCE_TERMS: &[&str] = &["experience", "years"];
const SOFT_SKILL_TERMS: &[&str] = &["communication", "team", "collaborat", "skills"];
const AUTHORIZATION_TERMS: &[&str] = &["authorized", "visa"];
const RESUME_TERMS: &[&str] = &["resume", "cv"];
const AFFIRMATIVE_TERMS: &[&str] = &["yes", "authorized"];
const PREFERRED_OPTIONS: &[&str] = &["Yes", "Full-time"];

const EXPERIENCE_ANSWER: &str = "5";
const SOFT_SKILL_ANSWER: &str = "Excellent";
const AUTHORIZATION_ANSWER: &str = "Yes";
const DEFAULT_ANSWER: &str = "3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Experience,
    SoftSkills,
    WorkAuthorization,
    ResumeUpload,
    AffirmativeChoice,
    DropdownPreference,
    DefaultFiller,
}

pub const RULES: [Rule; 7] = [
    Rule::Experience,
    Rule::SoftSkills,
    Rule::WorkAuthorization,
    Rule::ResumeUpload,
    Rule::AffirmativeChoice,
    Rule::DropdownPreference,
    Rule::DefaultFiller,
];

impl Rule {
    fn answer(
        self,
        descriptor: &FieldDescriptor,
        label: &str,
        answers: &AnswerConfig,
    ) -> Option<FieldAnswer> {
        let lower = label.to_lowercase();
        let textual = matches!(descriptor.kind, FieldKind::Text | FieldKind::Number);
        match self {
            Rule::Experience => {
                let mentions = mentions_any(&lower, EXPERIENCE_TERMS)
                    || answers
                        .technology_terms
                        .iter()
                        .filter(|term| !term.trim().is_empty())
                        .any(|term| lower.contains(&term.to_lowercase()));
                (textual && mentions).then(|| FieldAnswer::Fill(EXPERIENCE_ANSWER.into()))
            }
            Rule::SoftSkills => (textual && mentions_any(&lower, SOFT_SKILL_TERMS))
                .then(|| FieldAnswer::Fill(SOFT_SKILL_ANSWER.into())),
            Rule::WorkAuthorization => (textual && mentions_any(&lower, AUTHORIZATION_TERMS))
                .then(|| FieldAnswer::Fill(AUTHORIZATION_ANSWER.into())),
            Rule::ResumeUpload => {
                let resume_like = lower.trim().is_empty() || mentions_any(&lower, RESUME_TERMS);
                (descriptor.kind == FieldKind::FileUpload && resume_like)
                    .then(|| FieldAnswer::Attach(answers.resume_path.clone()))
            }
            Rule::AffirmativeChoice => (descriptor.kind == FieldKind::Radio
                && mentions_any(&lower, AFFIRMATIVE_TERMS))
            .then_some(FieldAnswer::Check),
            Rule::DropdownPreference => {
                if descriptor.kind != FieldKind::Select {
                    return None;
                }
                preferred_option(&descriptor.options)
            }
            Rule::DefaultFiller => textual.then(|| FieldAnswer::Fill(DEFAULT_ANSWER.into())),
        }
    }
}

fn mentions_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| lower.contains(term))
}

fn preferred_option(options: &[String]) -> Option<FieldAnswer> {
    for preferred in PREFERRED_OPTIONS {
        if let Some(option) = options.iter().find(|o| o.trim() == *preferred) {
            return Some(FieldAnswer::Select(OptionChoice::Label(option.clone())));
        }
    }
    // Index 0 is usually a "Select an option" placeholder.
    (options.len() >= 2).then_some(FieldAnswer::Select(OptionChoice::Index(1)))
}

pub struct FieldResolver<'a> {
    answers: &'a AnswerConfig,
}

impl<'a> FieldResolver<'a> {
    pub fn new(answers: &'a AnswerConfig) -> Self {
        Self { answers }
    }

    /// The rule that decides `descriptor`, if any does.
    pub fn matching_rule(&self, descriptor: &FieldDescriptor, label: &str) -> Option<Rule> {
        if !descriptor.is_interactive() {
            return None;
        }
        RULES
            .into_iter()
            .find(|rule| rule.answer(descriptor, label, self.answers).is_some())
    }

    pub fn resolve(&self, descriptor: &FieldDescriptor, label: &str) -> FieldAnswer {
        if !descriptor.is_interactive() {
            return FieldAnswer::Skip;
        }
        RULES
            .into_iter()
            .find_map(|rule| rule.answer(descriptor, label, self.answers))
            .unwrap_or(FieldAnswer::Skip)
    }

    /// Resolve using the label captured in the snapshot.
    pub fn resolve_field(&self, descriptor: &FieldDescriptor) -> FieldAnswer {
        self.resolve(descriptor, &descriptor.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_fixed() {
        assert_eq!(RULES[0], Rule::Experience);
        assert_eq!(RULES[RULES.len() - 1], Rule::DefaultFiller);
    }

    #[test]
    fn experience_beats_soft_skills() {
        let answers = AnswerConfig::default();
        let resolver = FieldResolver::new(&answers);
        let field = FieldDescriptor::new(1, FieldKind::Text, "Years of team leadership");
        assert_eq!(resolver.matching_rule(&field, &field.label), Some(Rule::Experience));
    }

    #[test]
    fn select_without_choices_is_skipped() {
        let answers = AnswerConfig::default();
        let resolver = FieldResolver::new(&answers);
        let field =
            FieldDescriptor::new(3, FieldKind::Select, "Shift").with_options(["Select an option"]);
        assert_eq!(resolver.resolve_field(&field), FieldAnswer::Skip);
    }
}
