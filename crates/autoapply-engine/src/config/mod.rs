pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    AnswerConfig, AutoApplyConfig, BrowserConfig, FilterCriteria, LogConfig, SearchConfig,
    SiteSelectors, TimingConfig,
};
