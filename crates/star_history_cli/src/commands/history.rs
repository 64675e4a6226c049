use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use star_history::http::reqwest_transport::ReqwestTransport;
use star_history::{HistorySampler, SampleRequest, StarHistory};

use crate::config::Config;

/// Output format for the star history.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HistoryArgs {
    /// Repository as owner/name
    pub(crate) repo: String,

    /// GitHub token (overrides config and environment)
    #[arg(short, long)]
    pub(crate) token: Option<String>,

    /// GitHub API base URL (default from config or https://api.github.com)
    #[arg(long)]
    pub(crate) api_url: Option<String>,

    /// Request timeout in seconds (default from config, none otherwise)
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) output: OutputFormat,
}

/// One curve point, as shown to the user.
#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
pub(crate) struct PointRow {
    #[tabled(rename = "Date")]
    pub(crate) date: String,
    #[tabled(rename = "Stars")]
    pub(crate) count: u64,
}

/// JSON document printed with `--output json`.
#[derive(Debug, serde::Serialize)]
struct HistoryDocument<'a> {
    repo: &'a str,
    strategy: star_history::Strategy,
    points: &'a [star_history::StarPoint],
}

fn render(history: &StarHistory, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<PointRow> = history
                .points
                .iter()
                .map(|p| PointRow {
                    date: p.date.to_string(),
                    count: p.count,
                })
                .collect();
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            Ok(format!(
                "{} ({}, {} points)\n{}",
                console::style(&history.repo).bold(),
                history.strategy,
                history.points.len(),
                table
            ))
        }
        OutputFormat::Json => serde_json::to_string_pretty(&HistoryDocument {
            repo: &history.repo,
            strategy: history.strategy,
            points: &history.points,
        }),
    }
}

pub(crate) async fn handle_history(
    args: HistoryArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = args
        .timeout_secs
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
        .or_else(|| config.timeout());
    let transport = match timeout {
        Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
        None => ReqwestTransport::default(),
    };

    let api_url = args.api_url.unwrap_or_else(|| config.api_url());
    let sampler = HistorySampler::new(Arc::new(transport)).with_base_url(api_url);

    let mut request = SampleRequest::new(args.repo.as_str());
    match args.token.or_else(|| config.github_token()) {
        Some(token) => request = request.with_token(token),
        None => tracing::info!(
            "No GitHub token configured; large repositories are dated from contributor activity"
        ),
    }

    let history = sampler
        .sample(&request)
        .await
        .map_err(|e| format!("could not load star history for {}: {}", args.repo, e))?;

    println!("{}", render(&history, args.output)?);
    Ok(())
}
