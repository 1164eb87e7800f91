//! # Microline CLI
//!
//! Command-line interface for the dot-matrix printer driver.
//!
//! ## Usage
//!
//! ```bash
//! # Poll the job queue forever, printing as jobs arrive
//! microline watchdog --server https://golem.example.com
//!
//! # Same, without touching hardware (emulator output to stdout)
//! microline watchdog --server https://golem.example.com --emulate
//!
//! # One-shot: print a text file as a block
//! microline print letter.txt
//!
//! # One-shot from stdin, dry run
//! echo "hello" | microline print --emulate
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use microline::printer::Printer;
use microline::transport::{DeviceTransport, EmulatorSink, device::DEFAULT_DEVICE};
use microline::watchdog::{self, DEFAULT_INTERVAL_SECS, WatchdogConfig};
use microline::MicrolineError;

/// Microline - OKI dot-matrix printer driver
#[derive(Parser, Debug)]
#[command(name = "microline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll the remote queue and print jobs as they arrive
    Watchdog {
        /// Base URL of the queue server
        #[arg(long)]
        server: String,

        /// Seconds between polls
        #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
        interval: u64,

        /// Print to the emulator instead of hardware
        #[arg(long)]
        emulate: bool,

        /// Printer device path
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,
    },

    /// Print one text block from a file (or stdin)
    Print {
        /// File to print; reads stdin when omitted
        file: Option<PathBuf>,

        /// Print to the emulator instead of hardware
        #[arg(long)]
        emulate: bool,

        /// Printer device path
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MicrolineError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watchdog {
            server,
            interval,
            emulate,
            device,
        } => {
            watchdog::watchdog_loop(WatchdogConfig {
                server_url: server,
                interval: Duration::from_secs(interval),
                emulate,
                device,
            })
            .await
        }

        Commands::Print {
            file,
            emulate,
            device,
        } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            if emulate {
                let (_, sink) =
                    Printer::with_session(EmulatorSink::new(), |printer| {
                        printer.print_block(&text)
                    })?;
                print!("{}", sink.printed_text());
            } else {
                let sink = DeviceTransport::open(&device)?;
                Printer::with_session(sink, |printer| printer.print_block(&text))?;
            }
            Ok(())
        }
    }
}
