use autoapply_engine::config::BrowserConfig as ProfileConfig;
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Keeps `navigator.webdriver` unset.
const STEALTH_ARG: &str = "--disable-blink-features=AutomationControlled";

pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
}

impl CdpClient {
    /// Launch Chromium on the persistent profile so an existing login is reused.
    pub async fn launch(
        profile: &ProfileConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&profile.user_data_dir)?;

        let mut config_builder = BrowserConfig::builder()
            .user_data_dir(&profile.user_data_dir)
            .arg(STEALTH_ARG);
        tracing::info!("Using profile at {}", profile.user_data_dir.display());

        if profile.visible {
            tracing::info!("Launching browser in visible mode");
            config_builder = config_builder.with_head();
        } else {
            tracing::info!("Launching browser in headless mode");
            config_builder = config_builder.no_sandbox();
        }

        // Explicit config wins over CHROME_BIN.
        let chrome_bin = profile
            .chrome_bin
            .clone()
            .or_else(|| std::env::var_os("CHROME_BIN").map(Into::into));
        if let Some(chrome_bin) = chrome_bin {
            tracing::info!("Using custom Chrome binary: {}", chrome_bin.display());
            config_builder = config_builder.chrome_executable(chrome_bin);
        }

        let (browser, mut handler) = Browser::launch(
            config_builder
                .build()
                .map_err(|e| format!("Failed to build browser config: {}", e))?,
        )
        .await
        .map_err(|e| format!("Failed to launch browser: {}", e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::debug!("Browser handler error (ignoring): {}", e);
                }
            }
            tracing::info!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to create page: {}", e))?;

        let mut console_events = page
            .event_listener::<EventConsoleApiCalled>()
            .await
            .map_err(|e| format!("Failed to subscribe to console events: {}", e))?;
        tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let args: Vec<String> = event
                    .args
                    .iter()
                    .map(|arg| arg.description.clone().unwrap_or_default())
                    .collect();
                tracing::debug!("Browser console [{:?}]: {}", event.r#type, args.join(" "));
            }
        });

        // Open dialogs block evaluation.
        let mut dialog_events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| format!("Failed to subscribe to dialog events: {}", e))?;
        let dialog_page = page.clone();
        tokio::spawn(async move {
            while let Some(event) = dialog_events.next().await {
                tracing::info!("Accepting {:?} dialog: {}", event.r#type, event.message);
                if let Err(e) = dialog_page
                    .execute(HandleJavaScriptDialogParams::new(true))
                    .await
                {
                    tracing::warn!("Failed to accept dialog: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    pub async fn close(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.browser
            .close()
            .await
            .map_err(|e| format!("Error closing browser: {}", e))?;
        self.handler_task
            .await
            .map_err(|e| format!("Error awaiting handler: {}", e))?;
        Ok(())
    }
}
