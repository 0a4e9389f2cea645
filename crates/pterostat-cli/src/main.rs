mod args;
mod client;
mod config;
mod error;
mod output;

use anyhow::{Context, Result};
use clap::Parser;

use pterostat_common::telemetry::init_tracing;
use pterostat_common::{AggregatedUsage, Node};
use serde_json::Value;

use crate::args::{Args, Format};
use crate::client::{fetch_all, fetch_attributes, ApiClient, PageSource};
use crate::config::{page_params, ApiConfig};
use crate::output::{build_rows, render_html, render_text};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("pterostat");
    let args = Args::parse();
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ApiConfig::from_args(&args);
    tracing::info!(base_url = %config.base_url, "building node memory report");

    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    let params = page_params(args.per_page);
    let report = build_report(&client, &params, args.format).await?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, report)
                .await
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{report}"),
    }
    Ok(())
}

/// Fetch nodes, then servers, aggregate, and render. Nothing is rendered if
/// either fetch fails.
async fn build_report<S>(source: &S, params: &[(String, String)], format: Format) -> Result<String>
where
    S: PageSource + ?Sized,
{
    let nodes: Vec<Node> = fetch_attributes(source, "/nodes", params)
        .await
        .context("failed to fetch nodes")?;
    // Server records are checked one by one so a malformed entry is skipped, not fatal.
    let servers: Vec<Value> = fetch_all(source, "/servers", params)
        .await
        .context("failed to fetch servers")?;

    let usage = AggregatedUsage::from_records(&servers);
    tracing::info!(
        nodes = nodes.len(),
        servers = servers.len(),
        skipped = usage.diagnostics().len(),
        "aggregated memory allocation"
    );

    let rows = build_rows(&nodes, &usage);
    let report = match format {
        Format::Html => render_html(&rows, usage.diagnostics()).context("failed to render report")?,
        Format::Text => render_text(&rows, usage.diagnostics()),
    };
    Ok(report)
}
