use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoApplyConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub filter: FilterCriteria,
    #[serde(default)]
    pub answers: AnswerConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub site: SiteSelectors,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Inputs for the job search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_titles")]
    pub titles: Vec<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_easy_apply_only")]
    pub easy_apply_only: bool,
    /// Only listings posted within this many seconds (`f_TPR=r<secs>`).
    #[serde(default = "default_posted_within_secs")]
    pub posted_within_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            titles: default_titles(),
            location: default_location(),
            easy_apply_only: default_easy_apply_only(),
            posted_within_secs: default_posted_within_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.linkedin.com/jobs/search/".to_string()
}

fn default_titles() -> Vec<String> {
    vec![
        "Automation Engineer".to_string(),
        "QA Automation".to_string(),
        "SDET".to_string(),
    ]
}

fn default_location() -> String {
    "Chicago, Lombard, USA".to_string()
}

fn default_easy_apply_only() -> bool {
    true
}

fn default_posted_within_secs() -> Option<u64> {
    Some(604_800)
}

/// Rule set the listing filter pipeline evaluates, read-only after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-sensitive substrings of company names to skip.
    #[serde(default = "default_blacklisted_companies")]
    pub blacklisted_companies: Vec<String>,
    /// Case-insensitive substrings of titles to skip.
    #[serde(default = "default_forbidden_titles")]
    pub forbidden_titles: Vec<String>,
    #[serde(default = "default_min_yearly_salary")]
    pub min_yearly_salary: u64,
    #[serde(default = "default_min_hourly_salary")]
    pub min_hourly_salary: u64,
    /// Case-insensitive terms, one of which must appear in the description.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Title terms that make a listing relevant without any keyword match.
    #[serde(default = "default_title_overrides")]
    pub title_overrides: Vec<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            blacklisted_companies: default_blacklisted_companies(),
            forbidden_titles: default_forbidden_titles(),
            min_yearly_salary: default_min_yearly_salary(),
            min_hourly_salary: default_min_hourly_salary(),
            keywords: default_keywords(),
            title_overrides: default_title_overrides(),
        }
    }
}

fn default_blacklisted_companies() -> Vec<String> {
    vec!["Staffing Agency X".to_string(), "Bad Company Inc".to_string()]
}

fn default_forbidden_titles() -> Vec<String> {
    [
        "electrical engineer",
        "mechanical",
        "civil",
        "construction",
        "nurse",
        "hardware",
        "technician",
        "telecommunication",
        "voice",
        "communications",
        "phone",
        "support",
        "help desk",
        "manufacturing",
        "industrial",
        "warehouse",
        "robotic",
        "sortation",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_min_yearly_salary() -> u64 {
    90_000
}

fn default_min_hourly_salary() -> u64 {
    45
}

fn default_keywords() -> Vec<String> {
    [
        "automation",
        "java",
        "python",
        "software",
        "test",
        "playwright",
        "selenium",
        "qa",
        "aws",
        "devops",
        "html",
        "web",
        "js",
        "css",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_title_overrides() -> Vec<String> {
    vec!["automation".to_string()]
}

/// Inputs to the form field resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerConfig {
    #[serde(default = "default_resume_path")]
    pub resume_path: PathBuf,
    /// Technologies whose mention in a label means "years of experience with X".
    #[serde(default = "default_technology_terms")]
    pub technology_terms: Vec<String>,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            resume_path: default_resume_path(),
            technology_terms: default_technology_terms(),
        }
    }
}

fn default_resume_path() -> PathBuf {
    PathBuf::from("./resume.docx")
}

fn default_technology_terms() -> Vec<String> {
    ["java", "python", "selenium", "playwright"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Settle delays and bounded waits, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_page_load_ms")]
    pub page_load_ms: u64,
    #[serde(default = "default_apply_settle_ms")]
    pub apply_settle_ms: u64,
    #[serde(default = "default_step_settle_ms")]
    pub step_settle_ms: u64,
    #[serde(default = "default_upload_settle_ms")]
    pub upload_settle_ms: u64,
    #[serde(default = "default_overlay_settle_ms")]
    pub overlay_settle_ms: u64,
    #[serde(default = "default_description_timeout_ms")]
    pub description_timeout_ms: u64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl TimingConfig {
    /// Every delay set to zero; keeps the step bound.
    pub fn immediate() -> Self {
        Self {
            page_load_ms: 0,
            apply_settle_ms: 0,
            step_settle_ms: 0,
            upload_settle_ms: 0,
            overlay_settle_ms: 0,
            description_timeout_ms: 0,
            max_steps: default_max_steps(),
        }
    }

    pub fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }

    pub fn apply_settle(&self) -> Duration {
        Duration::from_millis(self.apply_settle_ms)
    }

    pub fn step_settle(&self) -> Duration {
        Duration::from_millis(self.step_settle_ms)
    }

    pub fn upload_settle(&self) -> Duration {
        Duration::from_millis(self.upload_settle_ms)
    }

    pub fn overlay_settle(&self) -> Duration {
        Duration::from_millis(self.overlay_settle_ms)
    }

    pub fn description_timeout(&self) -> Duration {
        Duration::from_millis(self.description_timeout_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_load_ms: default_page_load_ms(),
            apply_settle_ms: default_apply_settle_ms(),
            step_settle_ms: default_step_settle_ms(),
            upload_settle_ms: default_upload_settle_ms(),
            overlay_settle_ms: default_overlay_settle_ms(),
            description_timeout_ms: default_description_timeout_ms(),
            max_steps: default_max_steps(),
        }
    }
}

fn default_page_load_ms() -> u64 {
    5000
}

fn default_apply_settle_ms() -> u64 {
    2000
}

fn default_step_settle_ms() -> u64 {
    2000
}

fn default_upload_settle_ms() -> u64 {
    2000
}

fn default_overlay_settle_ms() -> u64 {
    1000
}

fn default_description_timeout_ms() -> u64 {
    7000
}

fn default_max_steps() -> usize {
    10
}

/// CSS selectors for the site-specific parts of the results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSelectors {
    #[serde(default = "default_card_selector")]
    pub card: String,
    #[serde(default = "default_company_selector")]
    pub company: String,
    #[serde(default = "default_title_link_selector")]
    pub title_link: String,
    #[serde(default = "default_description_selector")]
    pub description: String,
    #[serde(default = "default_apply_button_selector")]
    pub apply_button: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            company: default_company_selector(),
            title_link: default_title_link_selector(),
            description: default_description_selector(),
            apply_button: default_apply_button_selector(),
        }
    }
}

fn default_card_selector() -> String {
    ".job-card-container, .jobs-search-results-list__item".to_string()
}

fn default_company_selector() -> String {
    ".job-card-container__primary-description".to_string()
}

fn default_title_link_selector() -> String {
    "a[href*='/jobs/view/']".to_string()
}

fn default_description_selector() -> String {
    ".jobs-description".to_string()
}

fn default_apply_button_selector() -> String {
    "button.jobs-apply-button".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Persistent profile directory; carries the logged-in session between runs.
    #[serde(default = "default_user_data_dir")]
    pub user_data_dir: PathBuf,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_bin: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_data_dir: default_user_data_dir(),
            visible: default_visible(),
            chrome_bin: None,
        }
    }
}

fn default_user_data_dir() -> PathBuf {
    PathBuf::from("./automation_session")
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from("applied_jobs.txt")
}
