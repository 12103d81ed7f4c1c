//! EmotiCare entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use emoticare::cli::{
    app::{load_merged_config, run_ask, run_history, run_serve, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use emoticare::domain::config::AppConfig;
use emoticare::domain::duration::Duration;
use emoticare::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    // A missing .env file is fine; the key may come from elsewhere
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(matches!(cli.command, None | Some(Commands::Serve(_))));

    let presenter = Presenter::new();

    let Cli {
        journal,
        no_journal,
        model,
        timeout,
        serve,
        command,
    } = cli;

    if let Some(Commands::Config { action }) = command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    if let Some(Err(e)) = timeout.as_deref().map(str::parse::<Duration>) {
        presenter.error(&format!("Invalid timeout: {}", e));
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let (host, port) = match &command {
        Some(Commands::Serve(args)) => (
            args.host.clone().or(serve.host),
            args.port.or(serve.port),
        ),
        _ => (serve.host, serve.port),
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        model,
        timeout,
        host,
        port,
        // --no-journal wins over --journal
        journal: no_journal.then_some(false),
        journal_path: journal.map(|p| p.to_string_lossy().to_string()),
        ..Default::default()
    };

    let config = load_merged_config(cli_config).await;

    match command {
        None | Some(Commands::Serve(_)) => run_serve(config).await,
        Some(Commands::Ask { text }) => run_ask(config, &text).await,
        Some(Commands::History { limit, export }) => {
            run_history(config, limit, export.as_deref()).await
        }
        Some(Commands::Config { .. }) => ExitCode::SUCCESS,
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter
fn init_tracing(serving: bool) {
    let default_filter = if serving { "info,emoticare=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
