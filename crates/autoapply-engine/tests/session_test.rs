mod common;

use autoapply_engine::application::{AbandonReason, ApplicationOutcome};
use autoapply_engine::applog::MemoryApplicationLog;
use autoapply_engine::error::{EngineError, FailureClass};
use autoapply_engine::filter::RejectReason;
use autoapply_engine::protocol::ScannerAction;
use autoapply_engine::session::{ListingDisposition, Session, SessionOptions};
use common::*;
use tempfile::NamedTempFile;

fn feed_backend() -> ScriptedBackend {
    let mut backend = ScriptedBackend::with_steps(sr_automation_qa_form());
    backend.cards = vec![
        card(10, "Sr Automation QA\nSr Automation QA", "Acme Corp"),
        card(20, "SDET", "Bad Company Inc"),
        card(30, "Account Executive", "Globex"),
        card(40, "Hardware Tester", "Initech"),
    ];
    backend.descriptions.insert(11, "5+ years automation, python, $95,000 salary".into());
    backend.descriptions.insert(21, "python".into());
    backend.descriptions.insert(31, "Close deals and grow revenue.".into());
    backend.descriptions.insert(41, "python".into());
    backend
}

#[tokio::test]
async fn processes_feed_end_to_end() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    let mut log = MemoryApplicationLog::new();

    let summary = {
        let mut session = Session::new(&config, &mut log, SessionOptions::default());
        session.run(&mut backend).await.unwrap()
    };

    assert_eq!(backend.navigations.len(), 1);
    assert!(backend.navigations[0].contains("f_AL=true"));

    let dispositions: Vec<_> = summary
        .records
        .iter()
        .map(|r| r.disposition.clone())
        .collect();
    assert_eq!(
        dispositions[0],
        ListingDisposition::Attempted {
            outcome: ApplicationOutcome::Submitted {
                title: "Sr Automation QA".into()
            }
        }
    );
    assert!(matches!(
        dispositions[1],
        ListingDisposition::Rejected {
            reason: RejectReason::Blacklisted,
            ..
        }
    ));
    assert!(matches!(
        dispositions[2],
        ListingDisposition::Rejected {
            reason: RejectReason::NoRelevantContext,
            ..
        }
    ));
    assert!(matches!(
        dispositions[3],
        ListingDisposition::Rejected {
            reason: RejectReason::ForbiddenTitle,
            ..
        }
    ));

    let counts = summary.counts();
    assert_eq!(counts.submitted, 1);
    assert_eq!(counts.rejected, 3);
    assert_eq!(summary.submitted_titles(), vec!["Sr Automation QA"]);

    assert_eq!(log.lines.len(), 1);
    assert!(log.lines[0].contains("Sr Automation QA"));
}

#[tokio::test]
async fn screened_listings_are_never_opened() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    let mut log = MemoryApplicationLog::new();

    let mut session = Session::new(&config, &mut log, SessionOptions::default());
    session.process_feed(&mut backend).await.unwrap();

    // Blacklisted (20) and forbidden-title (40) cards are scrolled to but not clicked.
    assert!(!backend.clicks.contains(&21));
    assert!(!backend.clicks.contains(&41));
    assert!(backend.clicks.contains(&31));
}

#[tokio::test]
async fn dry_run_reports_matches_without_applying() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    let mut log = MemoryApplicationLog::new();

    let options = SessionOptions {
        dry_run: true,
        limit: None,
    };
    let summary = {
        let mut session = Session::new(&config, &mut log, options);
        session.process_feed(&mut backend).await.unwrap()
    };

    assert_eq!(summary.records[0].disposition, ListingDisposition::Matched);
    assert_eq!(summary.counts().matched, 1);
    assert!(!backend.clicks.contains(&APPLY_BUTTON_ID));
    assert!(backend.uploads.is_empty());
    assert!(log.lines.is_empty());
}

#[tokio::test]
async fn limit_caps_processed_cards() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    let mut log = MemoryApplicationLog::new();

    let options = SessionOptions {
        dry_run: true,
        limit: Some(2),
    };
    let mut session = Session::new(&config, &mut log, options);
    let summary = session.process_feed(&mut backend).await.unwrap();

    assert_eq!(summary.records.len(), 2);
}

#[tokio::test]
async fn duplicate_cards_are_processed_once() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    let mut repeat = card(10, "Sr Automation QA", "Acme Corp");
    repeat.id = 50;
    repeat.link_id = Some(51);
    repeat.url = Some("https://www.linkedin.com/jobs/view/10/?trk=other".into());
    backend.cards.push(repeat);
    let mut log = MemoryApplicationLog::new();

    let options = SessionOptions {
        dry_run: true,
        limit: None,
    };
    let mut session = Session::new(&config, &mut log, options);
    let summary = session.process_feed(&mut backend).await.unwrap();

    assert_eq!(summary.records.len(), 4);
    assert_eq!(summary.duplicates, 1);
    assert!(!backend.clicks.contains(&51));
}

#[tokio::test]
async fn description_timeout_fails_only_that_listing() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    backend.description_missing = true;
    let mut log = MemoryApplicationLog::new();

    let mut session = Session::new(&config, &mut log, SessionOptions::default());
    let summary = session.process_feed(&mut backend).await.unwrap();

    assert_eq!(summary.records.len(), 4);
    match &summary.records[0].disposition {
        ListingDisposition::Failed { class, .. } => assert_eq!(*class, FailureClass::Timeout),
        other => panic!("expected failure, got {:?}", other),
    }
    // Screened listings never wait, so only the two opened ones fail.
    assert_eq!(summary.counts().failed, 2);
    assert_eq!(summary.counts().rejected, 2);
    assert_eq!(backend.keys, vec!["Escape".to_string(), "Escape".to_string()]);
}

#[tokio::test]
async fn missing_apply_button_is_an_abandonment() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    backend.apply_button = false;
    let mut log = MemoryApplicationLog::new();

    let mut session = Session::new(&config, &mut log, SessionOptions::default());
    let summary = session.process_feed(&mut backend).await.unwrap();

    assert_eq!(summary.abandoned_with(AbandonReason::NoApplyButton), 1);
    assert_eq!(summary.counts().failed, 0);
}

#[tokio::test]
async fn card_enumeration_failure_is_fatal() {
    let resume = NamedTempFile::new().unwrap();
    let config = fast_config(resume.path());
    let mut backend = feed_backend();
    backend.fail_cards = true;
    let mut log = MemoryApplicationLog::new();

    let mut session = Session::new(&config, &mut log, SessionOptions::default());
    let err = session.process_feed(&mut backend).await.unwrap_err();

    assert!(matches!(err, EngineError::Backend(_)));
    assert!(
        !backend
            .actions
            .iter()
            .any(|a| matches!(a, ScannerAction::Scroll(_)))
    );
}
