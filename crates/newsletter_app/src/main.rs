//! `newsletter`: preview and send the author newsletter.

mod app;
mod logging;
mod persistence;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use logging::LogDestination;

/// Turn an exported document into a newsletter and deliver it.
#[derive(Parser)]
#[command(name = "newsletter")]
#[command(about = "Author newsletter pipeline")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Where log output goes
    #[arg(long, global = true, value_enum, default_value = "terminal")]
    log: LogDestination,

    /// JSON book catalog used for the featured books block
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where the issue's document comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Exported HTML file
    #[arg(long)]
    input: Option<PathBuf>,

    /// URL of the exported HTML document
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the issue to HTML and text files without sending
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory for the preview files
        #[arg(long, default_value = "./preview")]
        out: PathBuf,
    },

    /// Send the issue to every confirmed subscriber
    Send {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON export of the subscriber list
        #[arg(long)]
        subscribers: PathBuf,

        /// Directory holding the send history
        #[arg(long, default_value = ".")]
        records: PathBuf,
    },

    /// Send the issue to a single address
    TestSend {
        #[command(flatten)]
        source: SourceArgs,

        /// Recipient address
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    app::run(cli.command, cli.catalog).await
}
