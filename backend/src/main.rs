//! Grantprep CLI - prepare grant application data for reporting
//!
//! # Main Command
//!
//! ```bash
//! grantprep                                   # data/raw/Cancer.xlsx -> data/processed
//! grantprep --input apps.csv --format xlsx    # override input and artifact format
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! grantprep inspect apps.csv                  # show how a file is read and mapped
//! ```
//!
//! Defaults can also be set through `GRANTPREP_*` environment variables or a
//! `.env` file; flags win over both.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use grantprep::config::parse_sheet;
use grantprep::logs::init_logging;
use grantprep::validation::{resolve_columns, SourceField};
use grantprep::{load, run, OutputFormat, PipelineConfig, SheetSelector};

#[derive(Parser)]
#[command(name = "grantprep")]
#[command(about = "Clean grant application exports and derive reporting views", long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RunArgs {
    /// Raw dataset (.xlsx, .xls, .ods, .csv, .tsv, .txt)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving the artifacts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Worksheet name or zero-based index (workbooks only)
    #[arg(short, long, value_parser = parse_sheet)]
    sheet: Option<SheetSelector>,

    /// Artifact format: csv or xlsx
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Skip the data_quality artifact
    #[arg(long)]
    no_diagnostics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file and report its encoding, layout and column mapping
    Inspect {
        /// Input file
        input: PathBuf,

        /// Worksheet name or zero-based index (workbooks only)
        #[arg(short, long, value_parser = parse_sheet)]
        sheet: Option<SheetSelector>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_logging("info");

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Inspect { input, sheet }) => cmd_inspect(&input, sheet.as_ref()),
        None => cmd_run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::from_env()?;
    if let Some(input) = args.input {
        config.input_path = input;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.sheet.is_some() {
        config.sheet = args.sheet;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.no_diagnostics {
        config.diagnostics = false;
    }

    let summary = run(&config)?;
    eprintln!(
        "\n✨ Done: {} rows, {} artifacts in {}",
        summary.rows,
        summary.artifacts.len(),
        config.output_dir.display()
    );
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    sheet: Option<&SheetSelector>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = load(input, sheet)?;

    println!("📄 {}", input.display());
    println!("   Source: {}", table.origin);
    println!("   Rows: {}", table.len());
    println!("   Columns: {}", table.headers.join(", "));

    match resolve_columns(&table.headers) {
        Ok(index) => {
            println!("\n✔️  Column mapping:");
            for field in SourceField::ALL {
                match index.get(field) {
                    Some(i) => println!("   {:?} <- {}", field, table.headers[i]),
                    None => println!("   {:?} (absent)", field),
                }
            }
        }
        Err(e) => println!("\n⚠️  {}", e),
    }

    Ok(())
}
