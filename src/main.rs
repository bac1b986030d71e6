//! semicsv - typed delimited-text codec

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use semicsv::logging::{self, LogOptions};
use semicsv::output::{render_to_stdout, JsonOutput, SummaryOutput};
use semicsv::{CellValue, Csv, CsvConfig};

/// Read, normalize and convert semicolon-style delimited text
#[derive(Parser, Debug)]
#[command(name = "semicsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also log to this file ($DATE$, $TIME$ and $CONF$ are expanded)
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// Log debug events
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a file, optionally in another dialect or encoding
    Convert {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Output separator (defaults to the input separator)
        #[arg(long)]
        out_separator: Option<char>,

        /// Output quote character (defaults to the input quote)
        #[arg(long)]
        out_quote: Option<char>,

        /// Output encoding label (defaults to the input encoding)
        #[arg(long)]
        out_encoding: Option<String>,

        /// Remove every empty cell from every row
        #[arg(long)]
        trim_empty: bool,

        /// Pad rows to the length of the longest row
        #[arg(long)]
        normalize: bool,

        /// Text used to pad rows with --normalize (empty cells by default)
        #[arg(long, requires = "normalize")]
        fill: Option<String>,
    },

    /// Print a file as a JSON array of rows
    Json {
        input: PathBuf,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Print row count, row width and column types
    Inspect {
        input: PathBuf,

        #[command(flatten)]
        dialect: DialectArgs,
    },
}

#[derive(Args, Debug)]
struct DialectArgs {
    /// Field separator
    #[arg(short, long, default_value_t = ';')]
    separator: char,

    /// Quote character
    #[arg(short, long, default_value_t = '"')]
    quote: char,

    /// Encoding label, e.g. utf-8 or windows-1252
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,
}

impl DialectArgs {
    fn to_config(&self) -> Result<CsvConfig> {
        let config = CsvConfig::new()
            .with_separator(self.separator)
            .with_quote(self.quote)
            .with_encoding_label(&self.encoding)?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut log_options = LogOptions::default();
    if let Some(file) = &cli.log_file {
        log_options = log_options.with_file(file.clone());
    }
    if cli.verbose {
        log_options = log_options.with_directive("debug");
    }
    logging::init(&log_options);

    match cli.command {
        Command::Convert {
            input,
            output,
            dialect,
            out_separator,
            out_quote,
            out_encoding,
            trim_empty,
            normalize,
            fill,
        } => {
            let in_config = dialect.to_config()?;
            let csv = read_input(&input, in_config)?;

            let mut out_config = in_config
                .with_separator(out_separator.unwrap_or(in_config.separator))
                .with_quote(out_quote.unwrap_or(in_config.quote));
            if let Some(label) = out_encoding {
                out_config = out_config.with_encoding_label(&label)?;
            }

            let mut out = Csv::with_config(out_config).context("Invalid output dialect")?;
            *out.table_mut() = csv.into_table();
            if trim_empty {
                out.trim_empty_values();
            }
            if normalize {
                out.normalize_row_lengths(fill.map(CellValue::Text).unwrap_or(CellValue::Null));
            }

            out.write_file(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(
                rows = out.table().row_count(),
                output = %output.display(),
                "conversion finished"
            );
        }
        Command::Json {
            input,
            dialect,
            compact,
        } => {
            let csv = read_input(&input, dialect.to_config()?)?;
            let formatter = if compact {
                JsonOutput::compact()
            } else {
                JsonOutput::new()
            };
            render_to_stdout(&formatter, csv.table())?;
        }
        Command::Inspect { input, dialect } => {
            let csv = read_input(&input, dialect.to_config()?)?;
            let formatter = SummaryOutput::new(input.display().to_string());
            render_to_stdout(&formatter, csv.table())?;
        }
    }

    Ok(())
}

fn read_input(path: &Path, config: CsvConfig) -> Result<Csv> {
    let mut csv = Csv::with_config(config).context("Invalid input dialect")?;
    csv.read_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(csv)
}
