mod catalog;
mod convert;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "callvalue")]
#[command(about = "Value tracked phone calls as offline ad conversions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch calls for a lookback window and emit valued conversions
    Convert {
        /// Lookback in hours (default 24)
        #[arg(long)]
        hours: Option<i64>,
        /// Lookback in days; wins over --hours
        #[arg(long)]
        days: Option<i64>,
        /// Output sink
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Write the CSV here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Compute and report without writing to the sink
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the loaded product catalog
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Csv,
    Sheet,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = callvalue_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Convert {
            hours,
            days,
            format,
            output,
            dry_run,
        } => {
            let lookback = callvalue_core::Lookback::from_parts(hours, days)?;
            convert::run_convert(&config, lookback, format, output.as_deref(), dry_run).await?;
        }
        Commands::Catalog => catalog::run_catalog(&config)?,
    }

    Ok(())
}
