use autoapply_common::protocol::ListingCard;
use serde::Serialize;

/// One job posting from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobListing {
    /// Posting URL when the card exposes one, otherwise `card-<handle>`.
    pub id: String,
    pub title: String,
    pub company: String,
}

impl JobListing {
    pub fn new(id: impl Into<String>, title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: company.into(),
        }
    }

    /// Build a listing from a scanned card.
    ///
    /// Card anchors often repeat the title on a second line (e.g. a verification badge
    /// caption), so only the first non-empty line is kept.
    pub fn from_card(card: &ListingCard) -> Self {
        let id = match card.url.as_deref() {
            Some(url) if !url.trim().is_empty() => strip_tracking(url.trim()).to_string(),
            _ => format!("card-{}", card.id),
        };
        Self {
            id,
            title: first_line(&card.title).to_string(),
            company: first_line(&card.company).to_string(),
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Drop the query string; result pages decorate the same posting URL with tracking ids.
fn strip_tracking(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
