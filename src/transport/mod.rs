//! # Printer Transport Layer
//!
//! Byte sinks for getting escape codes and text to a printer.
//!
//! ## Available Sinks
//!
//! - [`device`]: a parallel/USB printer character device (Linux)
//! - [`emulator`]: in-memory capture for tests and dry runs
//!
//! The two are peers behind the same [`Sink`] contract; everything above
//! this layer is identical whether bytes land on paper or in a buffer.

pub mod device;
pub mod emulator;

pub use device::DeviceTransport;
pub use emulator::EmulatorSink;

use thiserror::Error;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device did not become writable in time. On the Microline this
    /// almost always means the printer is deselected and the operator
    /// needs to press SEL.
    #[error("write timed out waiting for the printer to accept data")]
    Timeout,

    /// Any other device I/O failure
    #[error("{0}")]
    Io(String),
}

/// A byte sink the printer session writes into.
///
/// Implementations must transmit `bytes` unmodified; the escape-code
/// layout is bit-exact for hardware compatibility.
pub trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}
