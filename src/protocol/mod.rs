//! # Microline Escape-Code Protocol
//!
//! Command builders for the OKI Microline 9-pin control codes: font and
//! character-pitch selection, horizontal margins via absolute column codes,
//! and vertical movement via an N-line skip code.
//!
//! Everything in here is a pure mapping from a configuration change to a
//! byte sequence. Paper-position bookkeeping lives in [`crate::printer`].

pub mod commands;

pub use commands::{Cpi, Font};
