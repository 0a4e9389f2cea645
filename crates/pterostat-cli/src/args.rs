use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "pterostat")]
#[command(about = "Per-node memory allocation report for a Pterodactyl panel", long_about = None)]
pub struct Args {
    /// Application API base URL, e.g. https://panel.example.com/api/application
    #[arg(long, env = "PTERODACTYL_API_URL")]
    pub api_url: String,

    /// Application API key (Authorization: Bearer). Needs read access to nodes and servers.
    #[arg(long, env = "PTERODACTYL_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Page size requested from list endpoints (panel default when unset)
    #[arg(long, env = "PTERODACTYL_PER_PAGE")]
    pub per_page: Option<u32>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    pub format: Format,

    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Html,
    Text,
}
