//! Veritas - terminal client for the comment classification server.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use veritas_client::AnalyzerClient;
use veritas_core::{FileThemeStore, FormController, VeritasConfig};
use veritas_tui::{App, Cli, Commands, commands, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // CLI flags > environment > config file > defaults
    let mut config = VeritasConfig::load().context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    match cli.command {
        Some(Commands::Analyze { ref text, json }) => {
            logging::init_stderr_logging(&cli.log_level, cli.debug);
            let client = build_client(&config)?;
            let ok = commands::run_analyze(
                &client,
                config.model_loaded,
                text,
                json,
                &mut io::stdout(),
                &mut io::stderr(),
            )
            .await?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Some(Commands::Theme { action }) => {
            logging::init_stderr_logging(&cli.log_level, cli.debug);
            commands::run_theme(&VeritasConfig::state_path()?, action, &mut io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let _log_guard =
                logging::init_file_logging(&VeritasConfig::log_dir()?, &cli.log_level, cli.debug)?;
            tracing::info!(
                version = veritas_core::VERSION,
                server = %config.server_url,
                "Starting Veritas terminal UI"
            );

            let client = build_client(&config)?;
            let store = FileThemeStore::new(VeritasConfig::state_path()?);
            let form = FormController::new(config.model_loaded, store);

            let mut app = App::new(form, Arc::new(client), config.server_url.clone());
            app.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_client(config: &VeritasConfig) -> Result<AnalyzerClient> {
    AnalyzerClient::with_timeout(&config.server_url, config.request_timeout())
        .context("Failed to build HTTP client")
}
