use std::process::ExitCode;

use anyhow::Context;
use citycast_core::{Config, RunStatus, SearchFlow, SearchSession};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::presenter::TerminalPresenter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Current, forecast and daily weather for a city")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print each section as a JSON line instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and display settings.
    Configure,

    /// Show current, forecast and daily weather for a city.
    Search {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// Prompt for cities repeatedly; press Enter to search, Esc to quit.
    Interactive,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
            Command::Search { city } => {
                let session = open_session(self.json)?;
                let status = session.on_search_clicked(&city).await;
                Ok(exit_code(status))
            }
            Command::Interactive => {
                let session = open_session(self.json)?;
                interactive(&session).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn open_session(json: bool) -> anyhow::Result<SearchSession<TerminalPresenter>> {
    let config = Config::load()?;
    let api = config.api_config()?;
    debug!(base_url = %api.base_url, lang = %api.lang, "Loaded configuration");

    let flow = SearchFlow::from_config(api).context("Failed to initialize HTTP client")?;
    Ok(SearchSession::new(flow, TerminalPresenter::new(json)))
}

fn succeeded(status: RunStatus) -> bool {
    matches!(status, RunStatus::Rendered { .. } | RunStatus::Superseded)
}

fn exit_code(status: RunStatus) -> ExitCode {
    if succeeded(status) { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let lang = Text::new("Response language:")
        .with_default(&config.lang)
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.lang = lang.trim().to_string();

    // Validate before writing so a bad key or format never lands on disk.
    config.resolve(None)?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn interactive(session: &SearchSession<TerminalPresenter>) -> anyhow::Result<()> {
    loop {
        let input = match Text::new("City:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        // The prompt only returns once Enter has been pressed.
        session.on_key_pressed("Enter", &input).await;
    }
}
