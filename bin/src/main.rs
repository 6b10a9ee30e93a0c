//! exfin CLI - monthly tick archive downloader.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use exfin_lib::ClientConfig;
use exfin_lib::url::{BASE_URL, FILE_PREFIX};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "exfin")]
#[command(about = "Monthly tick archive downloader", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Archive root URL
    #[arg(long, env = "EXFIN_BASE_URL", default_value = BASE_URL, global = true)]
    base_url: String,

    /// Prefix of archive file names
    #[arg(long, default_value = FILE_PREFIX, global = true)]
    prefix: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "60", global = true)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Download tick data for a pair
    Download {
        /// Pair identifier (e.g., eurusd, xauusd)
        pair: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        end: Option<String>,

        /// Output file path. Defaults to <pair>.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Also extract each month's table into this directory
        #[arg(long)]
        save_path: Option<PathBuf>,

        /// Maximum concurrent month downloads
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },

    /// List available pairs
    List {
        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the verbosity.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = ClientConfig::default()
        .with_base_url(cli.base_url)
        .with_file_prefix(cli.prefix)
        .with_timeout(Duration::from_secs(cli.timeout));

    match command {
        Commands::Download {
            pair,
            start,
            end,
            output,
            format,
            save_path,
            concurrency,
        } => {
            let request = commands::download::DownloadRequest {
                pair,
                start,
                end,
                output,
                format,
                save_path,
            };
            commands::download::download(config.with_concurrency(concurrency), request, cli.quiet)
                .await
        }
        Commands::List { search } => commands::list::list_pairs(config, search.as_deref()).await,
    }
}
