//! Walks the results feed one listing at a time.
//!
//! Each card is screened on its title and company, opened, read, classified and, when
//! accepted, handed to an [`ApplicationRunner`]. Per-listing failures are captured as
//! [`ListingDisposition::Failed`] and the walk continues; only navigation and card
//! enumeration abort a run.

use crate::application::{AbandonReason, ApplicationOutcome, ApplicationRunner, overlay};
use crate::applog::ApplicationLog;
use crate::backend::Backend;
use crate::config::AutoApplyConfig;
use crate::error::{EngineError, FailureClass};
use crate::filter::{self, RejectReason, Verdict};
use crate::listing::JobListing;
use crate::ops;
use crate::search::build_search_url;
use autoapply_common::protocol::{CardsRequest, ListingCard};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Classify only; accepted listings are reported as [`ListingDisposition::Matched`].
    pub dry_run: bool,
    /// Process at most this many cards.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum ListingDisposition {
    Rejected { reason: RejectReason, detail: String },
    Matched,
    Attempted { outcome: ApplicationOutcome },
    Failed { cause: String, class: FailureClass },
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingRecord {
    pub listing: JobListing,
    pub disposition: ListingDisposition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispositionCounts {
    pub rejected: usize,
    pub matched: usize,
    pub submitted: usize,
    pub abandoned: usize,
    pub errored: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub records: Vec<ListingRecord>,
    /// Cards skipped because their listing was already processed this run.
    pub duplicates: usize,
}

impl RunSummary {
    pub fn counts(&self) -> DispositionCounts {
        let mut counts = DispositionCounts::default();
        for record in &self.records {
            match &record.disposition {
                ListingDisposition::Rejected { .. } => counts.rejected += 1,
                ListingDisposition::Matched => counts.matched += 1,
                ListingDisposition::Attempted { outcome } => match outcome {
                    ApplicationOutcome::Submitted { .. } => counts.submitted += 1,
                    ApplicationOutcome::Abandoned { .. } => counts.abandoned += 1,
                    ApplicationOutcome::Error { .. } => counts.errored += 1,
                },
                ListingDisposition::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    /// Titles of submitted applications, in processing order.
    pub fn submitted_titles(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|record| match &record.disposition {
                ListingDisposition::Attempted {
                    outcome: ApplicationOutcome::Submitted { title },
                } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn abandoned_with(&self, reason: AbandonReason) -> usize {
        self.records
            .iter()
            .filter(|record| {
                matches!(
                    &record.disposition,
                    ListingDisposition::Attempted {
                        outcome: ApplicationOutcome::Abandoned { reason: r },
                    } if *r == reason
                )
            })
            .count()
    }
}

pub struct Session<'a> {
    config: &'a AutoApplyConfig,
    log: &'a mut dyn ApplicationLog,
    options: SessionOptions,
    seen: HashSet<String>,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &'a AutoApplyConfig,
        log: &'a mut dyn ApplicationLog,
        options: SessionOptions,
    ) -> Self {
        Self {
            config,
            log,
            options,
            seen: HashSet::new(),
        }
    }

    /// Open the results page and wait for it to settle.
    pub async fn navigate_to_search<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<Url, EngineError> {
        let url = build_search_url(&self.config.search)?;
        info!("Opening search: {}", url);
        backend.navigate(url.as_str()).await?;
        tokio::time::sleep(self.config.timing.page_load()).await;
        Ok(url)
    }

    /// Navigate to the search page and process its feed.
    pub async fn run<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<RunSummary, EngineError> {
        self.navigate_to_search(backend).await?;
        self.process_feed(backend).await
    }

    /// Process the cards currently on the page.
    pub async fn process_feed<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<RunSummary, EngineError> {
        let site = &self.config.site;
        let request = CardsRequest {
            card: site.card.clone(),
            company: site.company.clone(),
            title_link: site.title_link.clone(),
        };
        let mut cards = ops::cards(backend, request).await?;
        info!("Found {} listing cards", cards.len());
        if let Some(limit) = self.options.limit {
            cards.truncate(limit);
        }

        let mut summary = RunSummary::default();
        for card in &cards {
            let listing = JobListing::from_card(card);
            if !self.seen.insert(listing.id.clone()) {
                debug!("Already processed {}", listing.id);
                summary.duplicates += 1;
                continue;
            }

            let disposition = self.process_listing(backend, card, &listing).await;
            report(&listing, &disposition);
            if matches!(disposition, ListingDisposition::Failed { .. }) {
                if let Err(e) = overlay::escape(backend).await {
                    warn!("Escape after failed listing did not go through: {}", e);
                }
            }
            summary.records.push(ListingRecord {
                listing,
                disposition,
            });
        }

        let counts = summary.counts();
        info!(
            "Run finished: {} submitted, {} abandoned, {} rejected, {} failed",
            counts.submitted,
            counts.abandoned,
            counts.rejected,
            counts.failed + counts.errored
        );
        Ok(summary)
    }

    async fn process_listing<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        card: &ListingCard,
        listing: &JobListing,
    ) -> ListingDisposition {
        match self.inspect(backend, card, listing).await {
            Ok(disposition) => disposition,
            Err(e) => ListingDisposition::Failed {
                cause: e.to_string(),
                class: e.class(),
            },
        }
    }

    async fn inspect<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        card: &ListingCard,
        listing: &JobListing,
    ) -> Result<ListingDisposition, EngineError> {
        let config = self.config;
        let criteria = &config.filter;
        ops::scroll_into_view(backend, card.id).await?;

        if let Some(verdict) = filter::screen(listing, criteria) {
            return Ok(rejection(verdict));
        }

        ops::click(backend, card.link_id.unwrap_or(card.id), true).await?;
        let description_selector = &config.site.description;
        ops::wait_for_visible(
            backend,
            description_selector,
            config.timing.description_timeout(),
        )
        .await?;
        let description = ops::get_text(backend, description_selector).await?;

        let verdict = filter::classify(listing, Some(&description), criteria);
        if !verdict.is_accepted() {
            return Ok(rejection(verdict));
        }
        if self.options.dry_run {
            return Ok(ListingDisposition::Matched);
        }

        info!("Applying to '{}' at {}", listing.title, listing.company);
        let mut runner = ApplicationRunner::new(config, listing.title.clone());
        let outcome = runner.run(backend, &mut *self.log).await;
        Ok(ListingDisposition::Attempted { outcome })
    }
}

fn rejection(verdict: Verdict) -> ListingDisposition {
    match verdict {
        Verdict::Rejected { reason, detail } => ListingDisposition::Rejected { reason, detail },
        Verdict::Accepted => ListingDisposition::Matched,
    }
}

fn report(listing: &JobListing, disposition: &ListingDisposition) {
    match disposition {
        ListingDisposition::Rejected { reason, detail } => {
            info!("Skipping '{}' ({}): {}", listing.title, reason, detail)
        }
        ListingDisposition::Matched => info!("Match: '{}' at {}", listing.title, listing.company),
        ListingDisposition::Attempted { outcome } => match outcome {
            ApplicationOutcome::Submitted { title } => info!("Applied: {}", title),
            ApplicationOutcome::Abandoned { reason } => {
                info!("Abandoned '{}': {}", listing.title, reason)
            }
            ApplicationOutcome::Error { cause, .. } => {
                warn!("Error applying to '{}': {}", listing.title, cause)
            }
        },
        ListingDisposition::Failed { cause, class } => {
            warn!("Failed on '{}' ({:?}): {}", listing.title, class, cause)
        }
    }
}
