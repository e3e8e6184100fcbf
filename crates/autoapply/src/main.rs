use anyhow::Context;
use autoapply_engine::applog::{ApplicationLog, FileApplicationLog, MemoryApplicationLog};
use autoapply_engine::backend::Backend;
use autoapply_engine::config::{AutoApplyConfig, ConfigLoader};
use autoapply_engine::search::build_search_url;
use autoapply_engine::session::{Session, SessionOptions};
use autoapply_h::backend::HeadlessBackend;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autoapply", version, about = "Job feed filter and application runner")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs)]
struct ConfigArg {
    /// Configuration file (default: ./autoapply.yaml, then ~/.autoapply/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the search results once, applying to matching listings
    Run {
        #[command(flatten)]
        config: ConfigArg,
        /// Run the browser without a window
        #[arg(long)]
        headless: bool,
        /// Classify listings without applying
        #[arg(long)]
        dry_run: bool,
        /// Process at most N cards
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        /// Debug logging
        #[arg(long, short)]
        verbose: bool,
    },
    /// Validate and print the effective configuration
    CheckConfig {
        #[command(flatten)]
        config: ConfigArg,
    },
    /// Print the search URL built from the configuration
    SearchUrl {
        #[command(flatten)]
        config: ConfigArg,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries the run summary
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(arg: &ConfigArg) -> anyhow::Result<AutoApplyConfig> {
    ConfigLoader::load(arg.config.as_deref())
        .await
        .context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            headless,
            dry_run,
            limit,
            verbose,
        } => {
            init_tracing(verbose);
            let mut config = load_config(&config).await?;
            if headless {
                config.browser.visible = false;
            }
            run(&config, SessionOptions { dry_run, limit }).await
        }
        Command::CheckConfig { config } => {
            init_tracing(false);
            let config = load_config(&config).await?;
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        Command::SearchUrl { config } => {
            init_tracing(false);
            let config = load_config(&config).await?;
            println!("{}", build_search_url(&config.search)?);
            Ok(())
        }
    }
}

async fn run(config: &AutoApplyConfig, options: SessionOptions) -> anyhow::Result<()> {
    let mut log: Box<dyn ApplicationLog> = if options.dry_run {
        info!("Dry run: nothing will be submitted");
        Box::new(MemoryApplicationLog::new())
    } else {
        let log = FileApplicationLog::open(&config.log.path).with_context(|| {
            format!(
                "Failed to open application log {}",
                config.log.path.display()
            )
        })?;
        Box::new(log)
    };

    let mut backend = HeadlessBackend::new(config.browser.clone());
    backend
        .launch()
        .await
        .context("Failed to launch browser")?;

    let result = {
        let mut session = Session::new(config, &mut *log, options);
        session.run(&mut backend).await
    };

    if let Err(e) = backend.close().await {
        warn!("Failed to close browser: {}", e);
    }

    let summary = result.context("Run aborted")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
