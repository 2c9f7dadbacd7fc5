use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bitcalc::{evaluate_file, tokenize_file, OutputFormat};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

mod logger;

/// Evaluate a program of assignments and `print` statements over binary
/// literals combined with `and`, `or` and `xor`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Program to run
    file: PathBuf,

    /// How printed values are written
    #[arg(short, long, value_enum, default_value_t = Format::Decimal)]
    format: Format,

    /// Print the token stream instead of running the program
    #[arg(long)]
    tokens: bool,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write log records to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Decimal,
    Binary,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Decimal => Self::Decimal,
            Format::Binary => Self::Binary,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = logger::init(level, cli.log_file.as_deref()) {
        eprintln!("I/O Error: could not set up logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = if cli.tokens {
        dump_tokens(&cli)
    } else {
        run_script(&cli)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::info!("run aborted: {e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(cli: &Cli) -> Result<(), bitcalc::Error> {
    log::info!("running {}", cli.file.display());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = evaluate_file(&cli.file, &mut out, cli.format.into());
    // Whatever was printed before a failure is still shown.
    let flushed = out.flush();
    let symbols = settle(result, flushed)?;
    for (name, value) in symbols.iter() {
        log::debug!("{name} = {value}");
    }
    Ok(())
}

/// A failed run outranks a failed flush of its output.
fn settle<T>(
    result: Result<T, bitcalc::Error>,
    flushed: io::Result<()>,
) -> Result<T, bitcalc::Error> {
    match (result, flushed) {
        (Err(e), Err(flush)) => {
            log::warn!("could not flush output: {flush}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(_), Err(flush)) => Err(flush.into()),
        (Ok(value), Ok(())) => Ok(value),
    }
}

fn dump_tokens(cli: &Cli) -> Result<(), bitcalc::Error> {
    let tokens = tokenize_file(&cli.file)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for token in &tokens {
        writeln!(out, "{} {}", token.span.start, token)?;
    }
    Ok(())
}
