use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use price_scraper::config::LoggingConfig;
use price_scraper::log_sink::TracingLogSink;
use price_scraper::plugins::ParserRegistry;
use price_scraper::scheduler::{ScrapeTrigger, UpdateScheduler};
use price_scraper::store::SqliteStore;
use price_scraper::{AppConfig, ScrapeOrchestrator};

#[derive(Parser)]
#[command(name = "price-scraper", version, about = "Scrapes vendor listing prices politely")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the background scheduler until Ctrl-C
    Serve,
    /// Run the scrape pipeline once and print the summary
    RunOnce,
    /// Check whether robots.txt admits a URL
    CheckRobots { url: Url },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("loading configuration")?;
    let _log_guard = init_tracing(&config.logging)?;

    if config.metrics.enabled {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics.port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("installing Prometheus exporter")?;
        info!(%addr, "metrics exporter listening");
    }

    let store = Arc::new(SqliteStore::connect(&config.database).await?);
    let orchestrator = Arc::new(ScrapeOrchestrator::new(
        &config.scraper,
        store.clone(),
        store,
        ParserRegistry::with_default_parsers(),
        Arc::new(TracingLogSink),
    )?);

    match cli.command {
        Command::Serve => {
            info!("Starting price scraper...");
            let mut scheduler = UpdateScheduler::new(orchestrator, config.scheduler.clone()).await?;
            scheduler.start().await?;

            tokio::signal::ctrl_c().await?;
            info!("Shutting down...");
            scheduler.shutdown().await?;
        }
        Command::RunOnce => {
            let trigger = ScrapeTrigger::new(orchestrator, config.scheduler.update_threshold());
            let summary = trigger.run_now().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::CheckRobots { url } => {
            let allowed = orchestrator.robots().check_allowed(&url).await?;
            println!("{} {}", if allowed { "allowed" } else { "disallowed" }, url);
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("price_scraper=info"))?;

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}
