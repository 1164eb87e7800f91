//! # Error Types
//!
//! This module defines error types used throughout the microline library.
//!
//! All configuration and protocol errors are raised synchronously at the
//! offending call. Transport timeouts are the one exception: the session
//! logs them with operator guidance and keeps going, because the protocol
//! has no acknowledgment channel to resynchronize against (see
//! [`crate::printer`]).

use thiserror::Error;

use crate::transport::TransportError;

/// Main error type for microline operations
#[derive(Debug, Error)]
pub enum MicrolineError {
    /// Paper dimensions that the geometry model cannot represent
    #[error("invalid paper geometry: {width_in}in x {height_in}in (dimensions must be positive)")]
    InvalidGeometry { width_in: f64, height_in: f64 },

    /// Font name outside the fixed table (parse boundary only)
    #[error("unknown font mode '{0}' (expected NLQ, NLQ_GOTHIC, UTIL or HSD)")]
    UnknownFont(String),

    /// CPI name outside the fixed table (parse boundary only)
    #[error("unknown CPI setting '{0}' (expected 10CPI, 12CPI, 15CPI, 17.1CPI or 20CPI)")]
    UnknownCpi(String),

    /// Margin column that does not fit its decimal field width
    #[error("margin column {col} does not fit in {digits} decimal digits")]
    MarginOutOfRange { col: i64, digits: u32 },

    /// Line skip beyond the 2-digit protocol field
    #[error("cannot skip {0} lines in one command (protocol limit is 99)")]
    SkipTooLarge(u32),

    /// Target line past the end of the page
    #[error("cannot go to line {target}: past end of page ({page_lines} lines)")]
    TargetOutOfRange { target: u32, page_lines: u32 },

    /// Line wider than the printable width under current margins and CPI
    #[error("line is {len} chars wide but the printable width is {width} chars")]
    LineTooWide { len: usize, width: u32 },

    /// Transport-level errors (device I/O)
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Job queue fetch errors (watchdog)
    #[error("job queue error: {0}")]
    Queue(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
