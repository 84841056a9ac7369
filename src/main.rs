use std::io;
use std::sync::Arc;

use color_eyre::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use keyward::adapters::TerminalNotifier;
use keyward::cli::{parse_args, run_command};
use keyward::config::Config;
use keyward::key::{KeyState, PromptCoordinator, RemoteValidator};
use keyward::traits::Notifier;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = parse_args(std::env::args());
    let config = Config::from_env();
    debug!(?config, ?command, "Starting");

    let store = config.key_store()?;
    let validator = Arc::new(RemoteValidator::with_base_url(config.api_base_url.clone()));
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier::new());
    let state = Arc::new(KeyState::load(Box::new(store), validator).with_notifier(notifier.clone()));

    if command.needs_startup_validation() {
        let _ = state.startup_validation();
    }

    let prompt = PromptCoordinator::new(state, notifier).with_timeout(config.prompt_timeout);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_command(command, &prompt, stdin, &mut io::stdout()).await?;

    Ok(())
}
