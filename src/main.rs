use inli_watch::domain::ports::Notifier;
use inli_watch::utils::{logger, validation::Validate};
use inli_watch::{EnvConfig, InliSource, JsonFileStore, TelegramNotifier, Watcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_logger();

    tracing::info!("Starting inli-watch");

    let config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let source = InliSource::new(&config.source_url)?;
    let notifier = TelegramNotifier::new(&config.telegram_token, &config.chat_id)?;
    let store = JsonFileStore::new(&config.seen_file);

    tracing::info!(
        "🚀 Watching {} (budget ≤ {}€, every {}s)",
        config.source_url,
        config.budget_max,
        config.poll_interval_secs
    );

    // Startup ping; like every other delivery, failure is logged and ignored.
    let startup = format!(
        "🚀 inli-watch started, polling every {}s.",
        config.poll_interval_secs
    );
    if let Err(e) = notifier.notify(&startup).await {
        tracing::error!("❌ Telegram error: {}", e);
    }

    // Runs until the process is killed.
    Watcher::new(source, notifier, store, config).run().await;

    Ok(())
}
