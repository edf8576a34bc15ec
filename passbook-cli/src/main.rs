use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use passbook_ingest::{StatementLayout, StatementParser};
use std::path::PathBuf;
use tracing::debug;

mod config;
mod convert;
mod logging;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PASSBOOK_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "passbook", version = VERSION, about = "Convert bank statement text to CSV")]
struct Cli {
    /// Config file (default: ~/.passbook/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse extracted statement text files and write one CSV per file
    Convert {
        /// Text files extracted from statement PDFs (pages separated by form feeds)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the CSV files (default: next to each input)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Statement year for layouts whose dates carry none
        #[arg(long)]
        year: Option<i32>,
    },

    /// Print how each line of a statement is classified
    Inspect {
        input: PathBuf,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Write a default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json_logs);

    match cli.command {
        Command::Convert {
            inputs,
            out_dir,
            year,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let parser = build_parser(cfg.layout, year)?;

            if let Some(dir) = &out_dir {
                if !dir.is_dir() {
                    bail!("output directory not found: {}", dir.display());
                }
            }

            let written = convert::convert_all(parser, inputs, out_dir, cfg.output).await?;
            for path in written {
                println!("{}", path.display());
            }
        }

        Command::Inspect { input, year } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let parser = build_parser(cfg.layout, year)?;
            convert::inspect_file(&parser, &input)?;
        }

        Command::InitConfig => {
            config::init_config(cli.config.as_deref())?;
        }
    }

    Ok(())
}

fn build_parser(mut layout: StatementLayout, year: Option<i32>) -> Result<StatementParser> {
    if let Some(year) = year {
        layout.statement_year = Some(year);
    }
    debug!(?layout, "statement layout");
    StatementParser::new(layout).context("invalid statement layout in config")
}
