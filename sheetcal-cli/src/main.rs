mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sheetcal")]
#[command(about = "Publish a spreadsheet's CSV export as subscribable iCalendar feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the source CSV and write all feeds, the manifest, and the
    /// subscribe page
    Build {
        /// Path to the config file
        #[arg(short, long, default_value = "sheetcal.toml")]
        config: PathBuf,

        /// Override the source CSV URL from the config
        #[arg(long)]
        url: Option<String>,

        /// Override the output directory from the config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch and map the sheet, report what would be written, write nothing
    Check {
        /// Path to the config file
        #[arg(short, long, default_value = "sheetcal.toml")]
        config: PathBuf,

        /// Override the source CSV URL from the config
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            url,
            output,
        } => commands::build::run(&config, url, output).await,
        Commands::Check { config, url } => commands::check::run(&config, url).await,
    }
}
