//! Dollar-figure extraction and salary floor checks.
//!
//! The hourly/annual split is a heuristic over bare numbers: anything strictly between
//! 10 and 1000 is read as an hourly rate, anything strictly above 1000 as a yearly
//! salary. Values of exactly 10 or 1000 fall in neither band.

use regex::Regex;
use std::sync::LazyLock;

/// `$NN`, `$NNN`, `$N,NNN`, `$NN,NNN` or `$NNN,NNN`.
static SALARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d{2,3}(?:,\d{3})?|\d,\d{3})").unwrap());

const HOURLY_LOWER: u64 = 10;
const HOURLY_UPPER: u64 = 1000;
const YEARLY_LOWER: u64 = 1000;

/// How a figure was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryFigure {
    Hourly(u64),
    Yearly(u64),
    /// Outside both bands, ignored.
    Unclassified(u64),
}

impl SalaryFigure {
    pub fn classify(value: u64) -> Self {
        if value > HOURLY_LOWER && value < HOURLY_UPPER {
            SalaryFigure::Hourly(value)
        } else if value > YEARLY_LOWER {
            SalaryFigure::Yearly(value)
        } else {
            SalaryFigure::Unclassified(value)
        }
    }

    pub fn value(self) -> u64 {
        match self {
            SalaryFigure::Hourly(v) | SalaryFigure::Yearly(v) | SalaryFigure::Unclassified(v) => v,
        }
    }

    /// Whether this figure sits below the matching floor.
    pub fn is_below(self, min_hourly: u64, min_yearly: u64) -> bool {
        match self {
            SalaryFigure::Hourly(v) => v < min_hourly,
            SalaryFigure::Yearly(v) => v < min_yearly,
            SalaryFigure::Unclassified(_) => false,
        }
    }
}

/// Every dollar amount in `text`, thousands separators removed, in order of appearance.
pub fn extract_amounts(text: &str) -> Vec<u64> {
    SALARY_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
        .collect()
}

/// The first figure in `text` that falls below its floor.
pub fn first_low_figure(text: &str, min_hourly: u64, min_yearly: u64) -> Option<SalaryFigure> {
    extract_amounts(text)
        .into_iter()
        .map(SalaryFigure::classify)
        .find(|figure| figure.is_below(min_hourly, min_yearly))
}
