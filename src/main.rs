mod api;
mod app;
mod config;
mod integrations;
mod modals;
mod registry;
mod upload;
mod utils;

use anyhow::Context;
use api::ApiClient;
use app::CreativeManager;
use config::AppConfig;
use eframe::CreationContext;

fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_filter = if cfg!(debug_assertions) {
        "info,creative_manager=debug"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    init_logging()?;
    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env file"),
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api_base_url,
        timeout = ?config.request_timeout,
        "configuration loaded"
    );

    let client = ApiClient::new(config).context("could not build the HTTP client")?;
    let runtime = tokio::runtime::Runtime::new().context("could not start the async runtime")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Creative Manager",
        options,
        Box::new(move |cc: &CreationContext| Box::new(CreativeManager::new(cc, client, runtime))),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}
