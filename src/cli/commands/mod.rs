//! CLI parser and command dispatch.

mod check;
mod config_cmd;
mod scan;
mod tools;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sitecheck::Config;

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(about = "Compare live web content against a locally collected corpus")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Corpus directory (overrides config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// SOCKS proxy for hidden-service hosts, e.g. socks5h://127.0.0.1:9050
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Route every request through the proxy, not only hidden services
    #[arg(long, global = true)]
    proxy_all: bool,

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
    /// Fetch a URL and compare its text against the corpus
    Check {
        /// Page to check (hidden-service hosts go through the proxy)
        url: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List which corpus files yield text
    Scan {
        /// Print the inventory as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check if external extraction tools are installed
    Tools,

    /// Print the effective configuration
    Config,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_cli_overrides(
        cli.data_dir,
        cli.proxy,
        cli.proxy_all,
    );
    config.validate()?;

    match cli.command {
        Commands::Check { url, json } => check::cmd_check(&config, &url, json).await,
        Commands::Scan { json } => scan::cmd_scan(&config, json),
        Commands::Tools => tools::cmd_tools(&config),
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}
