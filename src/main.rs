use anyhow::Result;
use clap::Parser;
use tracing::info;

use price_sentry::config::Channel;
use price_sentry::monitor::PriceMonitor;
use price_sentry::notify::notifier_for;
use price_sentry::sources::SourceRegistry;
use price_sentry::store::ObservationStore;
use price_sentry::AppConfig;

/// Performs exactly one monitoring pass and exits; run it from cron or a
/// systemd timer for recurring checks.
#[derive(Parser)]
#[command(name = "price-sentry", version, about = "Trailing-low price tracking agent")]
struct Cli {
    /// Force console notifications even when SMS credentials are configured
    #[arg(long)]
    console: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_sentry=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    // Failing to open the store is the only fatal condition; everything
    // after this point degrades to per-product log lines.
    let store =
        ObservationStore::connect(&config.database.url, config.database.max_connections).await?;

    let registry = SourceRegistry::from_bindings(&config.sources);
    let channel = if cli.console {
        Channel::Console
    } else {
        config.notifications.channel()
    };
    let channel_label = match &channel {
        Channel::Sms(_) => "sms",
        Channel::Console => "console",
    };
    info!(
        channel = channel_label,
        products = config.watch.products.len(),
        window_days = config.watch.window_days,
        "starting monitoring pass"
    );

    let monitor = PriceMonitor::new(
        store,
        registry,
        notifier_for(channel),
        chrono::Duration::days(config.watch.window_days),
    );
    monitor.run_once(&config.watch.products).await;

    Ok(())
}
