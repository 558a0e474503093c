use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mecab_api_config::Config;
use tokio_util::sync::CancellationToken;

pub mod cli;
pub mod listener;
pub mod logging;
pub mod params;
pub mod server;
pub mod shutdown;
pub mod state;


use self::cli::Args;
use self::state::AppState;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::new();
    args.apply(&mut config);

    logging::init(&config.log);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let result = runtime.block_on(run(config));
    shutdown::release_runtime(runtime);

    if let Err(e) = result {
        tracing::error!("mecab-api exited: {e:#}");
        return Err(e);
    }
    Ok(())
}

async fn run(config: Config) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let signals = shutdown::spawn_signal_listener(token.clone());

    let (listener, source) = listener::acquire(&config.network)
        .await
        .context("failed to acquire listening socket")?;
    tracing::debug!("Listener source: {:?}", source);

    let dictionary = config.dictionary.clone();
    let registry = tokio::task::spawn_blocking(move || mecab_api_japanese::load_registry(&dictionary))
        .await
        .context("dictionary loading task failed")?
        .context("failed to load dictionaries")?;

    let state = Arc::new(AppState::new(registry));
    let result = server::serve(listener, state, token.clone(), config.shutdown.grace_period()).await;

    token.cancel();
    signals.await.ok();

    result
}
