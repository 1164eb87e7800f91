//! # Microline - Dot-Matrix Printer Driver
//!
//! Microline drives OKI Microline 321 9-pin printers over a character
//! device, translating high-level requests ("write this line", "go to the
//! page top", "set margins") into raw escape codes while keeping a local
//! model of where the paper is. The printer never reports its position, so
//! the driver's line/page tracker is the single source of truth: it skips
//! over margin zones automatically and rolls pages over as text advances.
//!
//! ## Quick Start
//!
//! ```no_run
//! use microline::printer::Printer;
//! use microline::transport::DeviceTransport;
//!
//! let sink = DeviceTransport::open_default()?;
//! Printer::with_session(sink, |printer| {
//!     printer.print_block("INVOICE #1042\n\nThree reams of paper ... 12.50")
//! })?;
//! # Ok::<(), microline::MicrolineError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Escape-code command builders (fonts, pitch, margins, skips) |
//! | [`printer`] | The stateful session: geometry, position tracking, writing |
//! | [`transport`] | Byte sinks: real device and in-memory emulator |
//! | [`job`] | Print job shape and queue sources |
//! | [`watchdog`] | Queue-polling daemon loop |
//! | [`error`] | Error types |

pub mod error;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod transport;
pub mod watchdog;

// Re-exports for convenience
pub use error::MicrolineError;
pub use job::PrintJob;
pub use printer::Printer;
pub use protocol::{Cpi, Font};
pub use transport::{DeviceTransport, EmulatorSink, Sink};
