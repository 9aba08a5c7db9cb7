//! Command line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use veritas_core::{Theme, VeritasConfig};

/// Veritas - fake comment and sentiment analyzer
#[derive(Debug, Parser)]
#[command(name = "veritas")]
#[command(about = "Classify comments as fake or genuine from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the classification server
    #[arg(long, global = true, value_name = "URL")]
    pub server_url: Option<String>,

    /// Whether the server reports its model as loaded
    #[arg(long, global = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    pub model_loaded: Option<bool>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log everything at trace level
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one comment and print the result
    Analyze {
        /// Comment text
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the stored theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

impl ThemeAction {
    /// Theme that results from applying this action to `current`.
    pub fn apply(self, current: Theme) -> Theme {
        match self {
            ThemeAction::Toggle => current.toggled(),
            ThemeAction::Light => Theme::Light,
            ThemeAction::Dark => Theme::Dark,
        }
    }
}

impl Cli {
    /// Overlay flags on a config loaded from file and environment.
    pub fn apply_to(&self, config: &mut VeritasConfig) {
        if let Some(url) = &self.server_url {
            config.server_url = url.clone();
        }
        if let Some(loaded) = self.model_loaded {
            config.model_loaded = Some(loaded);
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}
