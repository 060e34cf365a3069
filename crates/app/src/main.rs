use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ledgerscan::{Conversion, ConvertConfig, StatementConverter};
use ledgerscan_core::BankTag;
use ledgerscan_import::{write_csv, write_json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ledgerscan", version, about = "Convert bank statement PDFs into transaction CSV")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one or more statements; each input gets its own output file
    Convert {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for output files (default: next to each input)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Write to stdout instead of files
        #[arg(long)]
        stdout: bool,

        #[command(flatten)]
        options: ConvertOptions,
    },

    /// Show detected bank, strategy, OCR pages and skipped rows as JSON
    Inspect {
        input: PathBuf,

        #[command(flatten)]
        options: ConvertOptions,
    },
}

#[derive(Args, Debug)]
struct ConvertOptions {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip bank detection (standard, fnb, hbz, absa, nedbank, capitec, unknown)
    #[arg(long)]
    bank: Option<BankTag>,

    /// Leave pages without a text layer empty instead of running OCR
    #[arg(long)]
    no_ocr: bool,

    /// OCR rasterization resolution (clamped to 300..=1200)
    #[arg(long)]
    dpi: Option<u32>,
}

impl ConvertOptions {
    fn load(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ConvertConfig::default(),
        };
        if let Some(bank) = self.bank {
            config.bank = Some(bank);
        }
        if self.no_ocr {
            config.ocr.enabled = false;
        }
        if let Some(dpi) = self.dpi {
            config.ocr.dpi = dpi;
        }
        Ok(config)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

enum FileResult {
    Written,
    Empty,
    Failed,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Convert { inputs, out_dir, format, stdout, options } => {
            let converter = Arc::new(StatementConverter::with_defaults(&options.load()?));
            if let Some(dir) = &out_dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }

            // One blocking task per file; results are reported in input order.
            let tasks: Vec<_> = inputs
                .into_iter()
                .map(|input| {
                    let converter = Arc::clone(&converter);
                    tokio::task::spawn_blocking(move || {
                        let result = convert_file(&converter, &input);
                        (input, result)
                    })
                })
                .collect();

            let mut results = Vec::new();
            for task in tasks {
                let (input, conversion) = task.await.context("conversion task panicked")?;
                let result = match conversion {
                    Ok(conversion) => emit(&input, &conversion, out_dir.as_deref(), format, stdout),
                    Err(e) => {
                        error!(input = %input.display(), "{e:#}");
                        eprintln!("{}: {e:#}", input.display());
                        FileResult::Failed
                    }
                };
                results.push(result);
            }
            Ok(exit_code(&results))
        }

        Command::Inspect { input, options } => {
            let converter = StatementConverter::with_defaults(&options.load()?);
            let conversion = tokio::task::spawn_blocking(move || convert_file(&converter, &input))
                .await
                .context("conversion task panicked")??;
            println!("{}", serde_json::to_string_pretty(&conversion)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn convert_file(converter: &StatementConverter, input: &Path) -> Result<Conversion> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    converter
        .convert(&bytes)
        .with_context(|| format!("converting {}", input.display()))
}

fn emit(
    input: &Path,
    conversion: &Conversion,
    out_dir: Option<&Path>,
    format: Format,
    stdout: bool,
) -> FileResult {
    if conversion.is_empty() {
        eprintln!("{}: no transactions found", input.display());
        return FileResult::Empty;
    }

    let written = if stdout {
        write_output(std::io::stdout().lock(), conversion, format)
    } else {
        let path = output_path(input, out_dir, format);
        std::fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))
            .and_then(|file| write_output(std::io::BufWriter::new(file), conversion, format))
            .map(|()| {
                info!(
                    input = %input.display(),
                    output = %path.display(),
                    bank = %conversion.bank,
                    transactions = conversion.transactions.len(),
                    "wrote transactions"
                );
            })
    };

    match written {
        Ok(()) => FileResult::Written,
        Err(e) => {
            eprintln!("{}: {e:#}", input.display());
            FileResult::Failed
        }
    }
}

fn write_output<W: Write>(mut writer: W, conversion: &Conversion, format: Format) -> Result<()> {
    match format {
        Format::Csv => write_csv(&mut writer, &conversion.transactions)?,
        Format::Json => write_json(&mut writer, &conversion.transactions)?,
    }
    writer.flush()?;
    Ok(())
}

fn output_path(input: &Path, out_dir: Option<&Path>, format: Format) -> PathBuf {
    let stem = input.file_stem().map_or_else(|| "statement".into(), |s| s.to_os_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(stem).with_extension(format.extension())
}

/// 1 if any input failed, 2 if none failed but some had no transactions.
fn exit_code(results: &[FileResult]) -> ExitCode {
    if results.iter().any(|r| matches!(r, FileResult::Failed)) {
        ExitCode::from(1)
    } else if results.iter().any(|r| matches!(r, FileResult::Empty)) {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}
