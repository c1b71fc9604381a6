mod compare;
mod exit_codes;
mod export;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "extaudit")]
#[command(about = "Compare extension privacy policies against store data disclosures")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare policy and disclosure evidence for a batch of extensions
    #[command(after_help = "\
Examples:
  extaudit run evidence.json
  extaudit run evidence.json --json
  extaudit run evidence.json --output table.json --csv table.csv
  extaudit run evidence.json --html table.html
  extaudit run evidence.json --taxonomy custom.toml --strict")]
    Run {
        /// JSON batch: an array of extensions or {"extensions": [...]}
        input: PathBuf,

        /// Taxonomy TOML file (default: built-in taxonomy)
        #[arg(long, short = 't', env = "EXTAUDIT_TAXONOMY")]
        taxonomy: Option<PathBuf>,

        /// Print the JSON table to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON table to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write a CSV table to a file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write a colour-coded HTML table to a file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Use D / P / D+P / - in the text table
        #[arg(long)]
        symbols: bool,

        /// Exit 3 when any category is policy_only or disclosure_only
        #[arg(long)]
        strict: bool,

        /// No human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a taxonomy file without running
    #[command(after_help = "\
Examples:
  extaudit validate custom.toml")]
    Validate {
        /// Path to the taxonomy TOML file
        taxonomy: PathBuf,
    },

    /// Show which categories a piece of text falls into
    #[command(after_help = "\
Examples:
  extaudit categorize \"precise GPS location\"
  extaudit categorize \"your IP address\" --json")]
    Categorize {
        /// Text to categorize
        text: String,

        /// Taxonomy TOML file (default: built-in taxonomy)
        #[arg(long, short = 't', env = "EXTAUDIT_TAXONOMY")]
        taxonomy: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the active taxonomy
    Taxonomy {
        /// Taxonomy TOML file (default: built-in taxonomy)
        #[arg(long, short = 't', env = "EXTAUDIT_TAXONOMY")]
        taxonomy: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("EXTAUDIT_GIT_HASH"), ")",
        "\ntarget:    ", env!("EXTAUDIT_TARGET"),
        "\ncontract_version(table): 1",
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // Also picks up `log` records from the engine crate.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { input, taxonomy, json, output, csv, html, symbols, strict, quiet } => {
            compare::cmd_run(input, taxonomy, json, output, csv, html, symbols, strict, quiet)
        }
        Commands::Validate { taxonomy } => compare::cmd_validate(taxonomy),
        Commands::Categorize { text, taxonomy, json } => compare::cmd_categorize(text, taxonomy, json),
        Commands::Taxonomy { taxonomy } => compare::cmd_taxonomy(taxonomy),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
