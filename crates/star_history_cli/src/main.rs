//! star-history CLI - print the star growth curve of a GitHub repository.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::history::HistoryArgs;

#[derive(Parser)]
#[command(name = "star-history")]
#[command(version)]
#[command(about = "Approximate the star history of a GitHub repository")]
#[command(
    long_about = "star-history reconstructs how a GitHub repository's star count grew over \
time. Small repositories are rebuilt exactly from their stargazer list; large ones are \
sampled with at most 15 page requests and anchored at the live star count."
)]
#[command(after_long_help = r#"EXAMPLES
    Show the star history of a repository:
        $ star-history history rust-lang/rust

    Print the curve as JSON:
        $ star-history history tokio-rs/tokio --output json

    Generate shell completions:
        $ star-history completions bash > ~/.local/share/bash-completion/completions/star-history

CONFIGURATION
    star-history reads configuration from:
      1. ~/.config/star-history/config.toml (or $XDG_CONFIG_HOME/star-history/config.toml)
      2. ./star-history.toml
      3. Environment variables (STAR_HISTORY_* prefix, e.g., STAR_HISTORY_GITHUB_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    STAR_HISTORY_GITHUB_TOKEN   GitHub personal access token
    GITHUB_TOKEN                Used when no other token is configured
    STAR_HISTORY_GITHUB_URL     GitHub API base URL (default: https://api.github.com)
    STAR_HISTORY_HTTP_TIMEOUT   Request timeout in seconds
"#)]
struct Cli {
    /// Log to stderr even when attached to a terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the star history of a repository
    History(HistoryArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Structured logging for non-TTY output, or on request
    if cli.verbose || !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("star_history=info,star_history_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
        Commands::History(args) => {
            // Load configuration (config file -> env vars -> defaults)
            let config = config::Config::load();
            commands::history::handle_history(args, &config).await?;
        }
    }

    Ok(())
}
