//! Label station command-line entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use labelforge_core::{LabelSpec, StickerKind};
use labelforge_render::{CommandPrinter, CommandRenderer};
use labelforge_station::types::{InventoryRequest, PlainRequest};
use labelforge_station::{ConsoleStatus, PrintStation};
use labelforge_store::{
    DEFAULT_OVERFLOW_FILE, DurableAppender, Ledger, OverflowSink, SerialCounter,
};

/// Durable label printing station.
#[derive(Parser, Debug)]
#[command(name = "labelforge")]
#[command(about = "Durable label printing station", long_about = None)]
struct Cli {
    #[command(flatten)]
    files: FileArgs,

    #[command(subcommand)]
    command: Command,
}

/// Shared durable-state files. Several stations may point at the same paths.
#[derive(Args, Debug)]
struct FileArgs {
    /// Counter file holding the last issued serial
    #[arg(long, env = "LABELFORGE_COUNTER", default_value = "counter.txt")]
    counter: PathBuf,

    /// Ledger file holding inventory records
    #[arg(long, env = "LABELFORGE_LEDGER", default_value = "inventory.txt")]
    ledger: PathBuf,

    /// Overflow sink for records that could not be committed
    #[arg(long, env = "LABELFORGE_OVERFLOW", default_value = DEFAULT_OVERFLOW_FILE)]
    overflow: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print inventory labels (renders, records, dispatches)
    Print {
        #[arg(long)]
        category: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        subtitle: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Labels requested (rounded up to whole stickers)
        #[arg(long, default_value_t = 1)]
        labels: u32,

        #[arg(long, value_enum, default_value_t = KindArg::NormalSingle)]
        kind: KindArg,

        /// Allocate a serial and suffix it to the title
        #[arg(long)]
        serial: bool,

        #[command(flatten)]
        collaborators: CollaboratorArgs,
    },

    /// Print plain free-text labels (no serial, no inventory record)
    Plain {
        text: String,

        #[arg(long, default_value_t = 1)]
        labels: u32,

        #[arg(long, value_enum, default_value_t = KindArg::NormalSingle)]
        kind: KindArg,

        #[command(flatten)]
        collaborators: CollaboratorArgs,
    },

    /// Serial counter operations
    Counter {
        #[command(subcommand)]
        op: CounterOp,
    },

    /// Inventory ledger operations
    Ledger {
        #[command(subcommand)]
        op: LedgerOp,
    },
}

#[derive(Args, Debug)]
struct CollaboratorArgs {
    /// External label creator program
    #[arg(long, env = "LABELFORGE_CREATOR")]
    creator: PathBuf,

    /// Print queue destination name
    #[arg(long, env = "LABELFORGE_PRINTER")]
    printer: String,

    /// Spooler command used to dispatch copies
    #[arg(long, env = "LABELFORGE_SPOOLER", default_value = CommandPrinter::DEFAULT_PROGRAM)]
    spooler: PathBuf,
}

#[derive(Subcommand, Debug)]
enum CounterOp {
    /// Show the last issued serial
    Get,
    /// Issue and show the next serial
    Next,
    /// Provision the counter file with a value
    Seed { value: u64 },
}

#[derive(Subcommand, Debug)]
enum LedgerOp {
    /// Count records
    Count,
    /// List records in append order
    List,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum KindArg {
    NormalSingle,
    NormalDouble,
    HighDurabilitySingle,
    HighDurabilityDouble,
}

impl From<KindArg> for StickerKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::NormalSingle => StickerKind::NormalSingle,
            KindArg::NormalDouble => StickerKind::NormalDouble,
            KindArg::HighDurabilitySingle => StickerKind::HighDurabilitySingle,
            KindArg::HighDurabilityDouble => StickerKind::HighDurabilityDouble,
        }
    }
}

fn build_station(files: &FileArgs, collaborators: &CollaboratorArgs) -> PrintStation {
    let renderer = Arc::new(CommandRenderer::new(&collaborators.creator));
    PrintStation::new(
        SerialCounter::new(&files.counter),
        DurableAppender::new(
            Ledger::new(&files.ledger),
            OverflowSink::new(&files.overflow),
        ),
        renderer.clone(),
        renderer,
        Arc::new(CommandPrinter::with_program(&collaborators.spooler)),
        Arc::new(ConsoleStatus),
        collaborators.printer.clone(),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    labelforge_observability::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Print {
            category,
            title,
            subtitle,
            description,
            labels,
            kind,
            serial,
            collaborators,
        } => {
            let station = build_station(&cli.files, &collaborators);
            let request = InventoryRequest {
                spec: LabelSpec::new(category, title, subtitle, description),
                kind: kind.into(),
                labels,
                serialized: serial,
            };
            let receipt = station
                .print_inventory(&request)
                .await
                .context("inventory print job failed")?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }

        Command::Plain {
            text,
            labels,
            kind,
            collaborators,
        } => {
            let station = build_station(&cli.files, &collaborators);
            let request = PlainRequest {
                text,
                kind: kind.into(),
                labels,
            };
            let receipt = station
                .print_plain(&request)
                .await
                .context("plain print job failed")?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }

        Command::Counter { op } => {
            let counter = SerialCounter::new(&cli.files.counter);
            match op {
                CounterOp::Get => println!("{}", counter.get()?),
                CounterOp::Next => println!("{}", counter.increment()?),
                CounterOp::Seed { value } => {
                    counter.seed(value)?;
                    tracing::info!(value, path = %counter.path().display(), "counter seeded");
                }
            }
        }

        Command::Ledger { op } => {
            let ledger = Ledger::new(&cli.files.ledger);
            match op {
                LedgerOp::Count => println!("{}", ledger.count()?),
                LedgerOp::List => {
                    for record in ledger.contents()? {
                        println!("{record}");
                    }
                }
            }
        }
    }

    Ok(())
}
