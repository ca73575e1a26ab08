//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod inspect;
mod key;
mod last;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ethiscan::config::Config;

#[derive(Parser)]
#[command(name = "ethiscan")]
#[command(about = "Score website privacy policies against a fixed rubric")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a page: find its privacy policy and score it
    Analyze {
        /// Page URL (http/https) or path to a saved HTML file
        target: String,
        /// URL used to resolve relative links when the target is a file
        #[arg(long)]
        base_url: Option<String>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
        /// Scoring model (overrides config)
        #[arg(long)]
        model: Option<String>,
    },

    /// Answer one JSON request read from stdin with one JSON response on stdout
    Message {
        /// Target used when the request does not name one
        #[arg(long)]
        target: Option<String>,
        /// URL used to resolve relative links when the target is a file
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show which document would be scored for a page
    Locate {
        /// Page URL (http/https) or path to a saved HTML file
        target: String,
        /// URL used to resolve relative links when the target is a file
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the scoring prompt that would be sent for a page
    Prompt {
        /// Page URL (http/https) or path to a saved HTML file
        target: String,
        /// URL used to resolve relative links when the target is a file
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Manage the scoring API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Show the most recent analysis result
    Last {
        /// Print the stored result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Store the API key (reads stdin when omitted)
    Set {
        /// API key value
        key: Option<String>,
    },
    /// Show where the key comes from, masked
    Show,
    /// Remove the stored key
    Clear,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from_path(&path).await?,
        None => Config::load().await,
    };

    match cli.command {
        Commands::Analyze {
            target,
            base_url,
            json,
            model,
        } => {
            analyze::cmd_analyze(config, &target, base_url.as_deref(), json, model.as_deref())
                .await
        }
        Commands::Message { target, base_url } => {
            analyze::cmd_message(&config, target.as_deref(), base_url.as_deref()).await
        }
        Commands::Locate { target, base_url } => {
            inspect::cmd_locate(&config, &target, base_url.as_deref()).await
        }
        Commands::Prompt { target, base_url } => {
            inspect::cmd_prompt(&config, &target, base_url.as_deref()).await
        }
        Commands::Key { command } => match command {
            KeyCommands::Set { key: value } => key::cmd_key_set(value).await,
            KeyCommands::Show => key::cmd_key_show().await,
            KeyCommands::Clear => key::cmd_key_clear().await,
        },
        Commands::Last { json } => last::cmd_last(json).await,
    }
}
