//! `pastekit` command-line front end
//!
//! Loads the reference tables, starts a compute module and drives it through
//! a host session. Logging goes to stderr; results go to stdout.

mod output;
mod tables;

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pastekit_host::Session;
use pastekit_module::{Module, ModuleConfig};
use pastekit_spec::MemoryConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pastekit")]
#[command(about = "Parse, validate and seal team pastes", long_about = None)]
struct Cli {
    #[command(flatten)]
    tables: TableArgs,

    /// Seed for cosmetic randomness
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Maximum module memory in 64 KiB pages
    #[arg(long, default_value_t = MemoryConfig::DEFAULT.max_pages, global = true)]
    max_pages: u32,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct TableArgs {
    /// Species table (JSON object keyed by lookup key)
    #[arg(long, value_name = "PATH", global = true)]
    species: Option<PathBuf>,

    /// Move table (JSON)
    #[arg(long, value_name = "PATH", global = true)]
    moves: Option<PathBuf>,

    /// Item table (JSON)
    #[arg(long, value_name = "PATH", global = true)]
    items: Option<PathBuf>,

    /// Binary snapshot of all three tables (instead of the JSON files)
    #[arg(long, value_name = "PATH", global = true, conflicts_with_all = ["species", "moves", "items"])]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a paste and print the result
    Parse {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Use flat 2-D sprite paths
        #[arg(long)]
        two_d: bool,

        /// Strip EVs, IVs and nature as for an open team sheet
        #[arg(long)]
        ots: bool,

        /// Input is an opened payload that may start with a metadata header
        #[arg(long)]
        framed: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        output: OutputFormat,
    },

    /// Count the creature sets in a paste
    Validate {
        #[arg(default_value = "-")]
        input: String,
    },

    /// Seal a paste under a passphrase
    Seal {
        #[arg(long)]
        passphrase: String,

        #[arg(default_value = "-")]
        input: String,
    },

    /// Open a sealed paste
    Open {
        #[arg(long)]
        passphrase: String,

        #[arg(default_value = "-")]
        input: String,
    },

    /// Write the loaded tables as a binary snapshot
    Snapshot {
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read paste from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("read paste: {input}"))
    }
}

fn run(cli: Cli) -> Result<()> {
    let tables = tables::load(&cli.tables)?;
    info!(
        species = tables.species.len(),
        moves = tables.moves.len(),
        items = tables.items.len(),
        "reference tables loaded"
    );

    if let Command::Snapshot { out } = &cli.command {
        let bytes = tables.to_snapshot()?;
        std::fs::write(out, &bytes).with_context(|| format!("write {}", out.display()))?;
        debug!(bytes = bytes.len(), "snapshot written");
        return Ok(());
    }

    let config = ModuleConfig {
        memory: MemoryConfig::new(MemoryConfig::DEFAULT.initial_pages, cli.max_pages)?,
        seed: cli.seed,
        ..ModuleConfig::default()
    };
    let mut module = Module::new(Arc::new(tables), config)?;
    let mut session = Session::new(&mut module);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Parse {
            input,
            two_d,
            ots,
            framed,
            output,
        } => {
            let text = read_input(&input)?;
            let mut session = session.with_two_d_images(two_d);
            let mut paste = if framed {
                session.parse_framed(&text)?
            } else {
                session.parse_paste(&text)?
            };
            if ots && !paste.is_ots {
                paste.mark_ots();
            }
            match output {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut stdout, &paste)?;
                    writeln!(stdout)?;
                }
                OutputFormat::Summary => write!(stdout, "{}", output::summary(&paste))?,
            }
        }
        Command::Validate { input } => {
            let count = session.validate(&read_input(&input)?)?;
            writeln!(stdout, "{count}")?;
        }
        Command::Seal { passphrase, input } => {
            let sealed = session.seal(&passphrase, &read_input(&input)?)?;
            writeln!(stdout, "{sealed}")?;
        }
        Command::Open { passphrase, input } => {
            let sealed = read_input(&input)?;
            match session.open(&passphrase, sealed.trim()) {
                Ok(message) => write!(stdout, "{message}")?,
                Err(e) if e.is_retryable() => bail!("{e}; check the passphrase and try again"),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Snapshot { .. } => {}
    }
    Ok(())
}
