//! Listing filter pipeline.
//!
//! Checks run in a fixed priority order and the first rejection wins. The two cheap
//! checks (company and title) only need the card, so the session can [`screen`] a
//! listing before paying for the description inspection.

pub mod classifiers;
pub mod salary;

pub use crate::config::FilterCriteria;

use crate::listing::JobListing;
use salary::SalaryFigure;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Blacklisted,
    ForbiddenTitle,
    LowSalary,
    NoRelevantContext,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::Blacklisted => "blacklisted company",
            RejectReason::ForbiddenTitle => "forbidden title",
            RejectReason::LowSalary => "low salary",
            RejectReason::NoRelevantContext => "no relevant context",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected {
        reason: RejectReason,
        /// The matched entry or offending figure.
        detail: String,
    },
}

impl Verdict {
    fn rejected(reason: RejectReason, detail: impl Into<String>) -> Self {
        Verdict::Rejected {
            reason,
            detail: detail.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected { reason, .. } => Some(*reason),
        }
    }
}

/// One pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Blacklist,
    ForbiddenTitle,
    Salary,
    Relevance,
}

/// Evaluation order for [`classify`].
pub const CHECK_ORDER: [Check; 4] = [
    Check::Blacklist,
    Check::ForbiddenTitle,
    Check::Salary,
    Check::Relevance,
];

/// The prefix of [`CHECK_ORDER`] that needs no description.
pub const SCREEN_CHECKS: [Check; 2] = [Check::Blacklist, Check::ForbiddenTitle];

impl Check {
    /// `Some` rejection when this stage fails the listing.
    fn evaluate(
        self,
        listing: &JobListing,
        description: &str,
        criteria: &FilterCriteria,
    ) -> Option<Verdict> {
        match self {
            Check::Blacklist => {
                classifiers::blacklisted_entry(&listing.company, &criteria.blacklisted_companies)
                    .map(|entry| Verdict::rejected(RejectReason::Blacklisted, entry))
            }
            Check::ForbiddenTitle => {
                classifiers::forbidden_term(&listing.title, &criteria.forbidden_titles)
                    .map(|term| Verdict::rejected(RejectReason::ForbiddenTitle, term))
            }
            Check::Salary => salary::first_low_figure(
                description,
                criteria.min_hourly_salary,
                criteria.min_yearly_salary,
            )
            .map(|figure| Verdict::rejected(RejectReason::LowSalary, describe_figure(figure))),
            Check::Relevance => {
                let relevant = classifiers::title_override(&listing.title, &criteria.title_overrides)
                    .or_else(|| classifiers::matched_keyword(description, &criteria.keywords))
                    .is_some();
                if relevant {
                    None
                } else {
                    Some(Verdict::rejected(
                        RejectReason::NoRelevantContext,
                        "no keyword in description and no title override",
                    ))
                }
            }
        }
    }
}

fn describe_figure(figure: SalaryFigure) -> String {
    match figure {
        SalaryFigure::Hourly(v) => format!("${}/hr", v),
        SalaryFigure::Yearly(v) => format!("${}/yr", v),
        SalaryFigure::Unclassified(v) => format!("${}", v),
    }
}

/// Run the full pipeline. A missing description counts as empty text.
pub fn classify(listing: &JobListing, description: Option<&str>, criteria: &FilterCriteria) -> Verdict {
    let description = description.unwrap_or("");
    CHECK_ORDER
        .iter()
        .find_map(|check| check.evaluate(listing, description, criteria))
        .unwrap_or(Verdict::Accepted)
}

/// Run only the card-level checks. `None` means the listing survives them.
pub fn screen(listing: &JobListing, criteria: &FilterCriteria) -> Option<Verdict> {
    SCREEN_CHECKS
        .iter()
        .find_map(|check| check.evaluate(listing, "", criteria))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_is_a_prefix_of_the_full_order() {
        assert_eq!(&CHECK_ORDER[..SCREEN_CHECKS.len()], &SCREEN_CHECKS[..]);
    }

    #[test]
    fn rejection_detail_names_the_figure() {
        let listing = JobListing::new("1", "QA Engineer", "Acme");
        let verdict = classify(&listing, Some("Rate: $30 per hour"), &FilterCriteria::default());
        assert_eq!(
            verdict,
            Verdict::Rejected {
                reason: RejectReason::LowSalary,
                detail: "$30/hr".into(),
            }
        );
    }
}
