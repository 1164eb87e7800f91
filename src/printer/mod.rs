//! # Printer Session
//!
//! The stateful core of the driver. A [`Printer`] owns a byte sink plus
//! the complete local model of the machine: paper geometry, the line/page
//! position tracker, and the active font, pitch and margins. Every paper
//! movement and every printed line flows through it so the tracked
//! position stays in lockstep with the physical platen.
//!
//! ## Sessions
//!
//! Print through [`Printer::with_session`]: it applies the power-on
//! defaults, runs your closure, and rolls the paper to the next page top
//! on every exit path so the next job starts on a fresh sheet.
//!
//! ```no_run
//! use microline::printer::Printer;
//! use microline::transport::EmulatorSink;
//!
//! let (_, sink) = Printer::with_session(EmulatorSink::new(), |printer| {
//!     printer.print_block("Hello from the dot matrix\n\nSecond paragraph")
//! })?;
//! print!("{}", sink.printed_text());
//! # Ok::<(), microline::MicrolineError>(())
//! ```
//!
//! ## Error Posture
//!
//! Configuration and protocol errors are fatal to the current operation
//! and propagate. A transport *timeout* is different: it is logged with
//! operator guidance (press SEL) and the session keeps going, still
//! assuming the write landed. The protocol has no acknowledgment channel,
//! so past a timeout the session is best effort; the position model is
//! deliberately not resynchronized because there is nothing to
//! resynchronize against.

pub mod geometry;
pub mod position;

pub use geometry::PageGeometry;
pub use position::PositionTracker;

use tracing::{debug, error, info};

use crate::error::MicrolineError;
use crate::job::PrintJob;
use crate::protocol::commands::{self, CR, Cpi, Font, LF, MAX_LINE_SKIP};
use crate::transport::{Sink, TransportError};

/// Power-on defaults applied by every new session, matching the front
/// panel configuration the hardware expects.
const DEFAULT_FONT: Font = Font::Util;
const DEFAULT_CPI: Cpi = Cpi::Cpi12;
const DEFAULT_MARGIN_IN: f64 = 0.5;

/// A live printer session.
///
/// Exclusively owned by one caller for its whole lifetime; there is no
/// internal locking and no operation may run concurrently. Callers with
/// concurrent jobs serialize them externally (the watchdog processes one
/// job at a time).
pub struct Printer<S: Sink> {
    sink: S,
    geometry: PageGeometry,
    position: PositionTracker,
    font: Font,
    cpi: Cpi,
    // Margin state retained so the text width can be recomputed when the
    // pitch changes. The columns themselves were already sent.
    left_col: u32,
    right_col: u32,
    vmargin_lines: u32,
    line_width_chars: u32,
}

impl<S: Sink> Printer<S> {
    /// Construct a session and send the default configuration: UTIL font,
    /// 12 CPI, half-inch margins on all sides.
    ///
    /// Assumes the paper is sitting at the top of a page; the tracker
    /// starts at line 0 of page 0.
    pub fn new(sink: S) -> Result<Self, MicrolineError> {
        let mut printer = Self {
            sink,
            geometry: PageGeometry::default(),
            position: PositionTracker::new(),
            font: DEFAULT_FONT,
            cpi: DEFAULT_CPI,
            left_col: 0,
            right_col: 0,
            vmargin_lines: 0,
            line_width_chars: 0,
        };
        printer.set_font(DEFAULT_FONT)?;
        printer.set_cpi(DEFAULT_CPI)?;
        printer.set_margins(DEFAULT_MARGIN_IN, DEFAULT_MARGIN_IN)?;
        Ok(printer)
    }

    /// Run `f` in a scoped session.
    ///
    /// The finishing action — advancing to the next page top — runs on
    /// every exit path, success or error, so a failed job never leaves the
    /// paper mid-page. The closure's error wins over a finisher error.
    ///
    /// Returns the closure's value together with the sink, so emulator
    /// output can be inspected after the session ends.
    pub fn with_session<T, F>(sink: S, f: F) -> Result<(T, S), MicrolineError>
    where
        F: FnOnce(&mut Printer<S>) -> Result<T, MicrolineError>,
    {
        let mut printer = Printer::new(sink)?;
        let result = f(&mut printer);
        let finish = printer.page_new();
        let value = result?;
        finish?;
        Ok((value, printer.sink))
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Select a font mode.
    pub fn set_font(&mut self, font: Font) -> Result<(), MicrolineError> {
        self.port_write(font.code())?;
        self.font = font;
        Ok(())
    }

    /// Select a character pitch. The printable text width depends on the
    /// pitch, so it is recomputed against the current margin columns.
    pub fn set_cpi(&mut self, cpi: Cpi) -> Result<(), MicrolineError> {
        self.port_write(cpi.code())?;
        self.cpi = cpi;
        self.line_width_chars = width_chars(self.left_col, self.right_col, cpi);
        Ok(())
    }

    /// Set symmetric horizontal and vertical margins, in inches.
    ///
    /// Horizontal margins are the printer's problem: they are converted to
    /// absolute column codes and sent immediately. The vertical margin is
    /// ours: the hardware has no notion of it, so it is kept as a line
    /// count and enforced by [`Printer::write_line`].
    pub fn set_margins(&mut self, hmargin_in: f64, vmargin_in: f64) -> Result<(), MicrolineError> {
        let (left, right) = self.geometry.margin_columns(hmargin_in)?;
        self.port_write(&commands::left_margin(left)?)?;
        self.port_write(&commands::right_margin(right)?)?;

        self.left_col = left;
        self.right_col = right;
        self.line_width_chars = width_chars(left, right, self.cpi);
        self.vmargin_lines = self.geometry.vmargin_lines(vmargin_in);

        info!(
            left_col = left,
            right_col = right,
            vmargin_lines = self.vmargin_lines,
            line_width_chars = self.line_width_chars,
            "margins set"
        );
        Ok(())
    }

    /// Replace the paper dimensions. Purely local; re-set the margins
    /// afterwards if the width changed, so the column codes match.
    pub fn set_paper_type(&mut self, width_in: f64, height_in: f64) -> Result<(), MicrolineError> {
        self.geometry.set_paper_type(width_in, height_in)
    }

    /// Lines on one page under the current paper type.
    pub fn page_line_count(&self) -> u32 {
        self.geometry.page_line_count()
    }

    /// Printable width in characters under the current margins and pitch.
    pub fn line_width_chars(&self) -> u32 {
        self.line_width_chars
    }

    /// The font last selected. The hardware keeps no queryable state, so
    /// this is the session's record of what it sent.
    pub fn font(&self) -> Font {
        self.font
    }

    /// The character pitch last selected.
    pub fn cpi(&self) -> Cpi {
        self.cpi
    }

    /// The tracked paper position.
    pub fn position(&self) -> &PositionTracker {
        &self.position
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Roll forward one line.
    pub fn line_feed(&mut self) -> Result<(), MicrolineError> {
        self.port_write(&[LF])?;
        self.position.advance(1, self.page_line_count());
        Ok(())
    }

    /// Return the print head to the left stop without rolling.
    pub fn line_return(&mut self) -> Result<(), MicrolineError> {
        self.port_write(&[CR])
    }

    /// Skip `n` lines, splitting into multiple commands where `n` exceeds
    /// the protocol's 2-digit field. Each chunk advances the tracker
    /// before the next is sent, so the model never runs ahead of the wire.
    pub fn skip_lines(&mut self, n: u32) -> Result<(), MicrolineError> {
        let mut remaining = n;
        while remaining > 0 {
            let chunk = remaining.min(MAX_LINE_SKIP);
            debug!(lines = chunk, "skipping");
            let bytes = commands::line_skip(chunk)?;
            self.port_write(&bytes)?;
            self.position.advance(chunk, self.page_line_count());
            remaining -= chunk;
        }
        Ok(())
    }

    /// Move to a line on this page, rolling through to the next page when
    /// the target is behind the current position (the platen only turns
    /// one way). A no-op when already there.
    pub fn goto_line(&mut self, target: u32) -> Result<(), MicrolineError> {
        let distance = self.position.distance_to(target, self.page_line_count())?;
        if distance > 0 {
            self.skip_lines(distance)?;
        }
        Ok(())
    }

    /// Roll to the top of the next page (or stay put if already at a page
    /// top).
    pub fn page_new(&mut self) -> Result<(), MicrolineError> {
        self.goto_line(0)
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Print one line of text. This is the only path that puts readable
    /// text on paper, which is what keeps the position model honest.
    ///
    /// If the current position is inside a margin zone the paper is first
    /// skipped to the next printable line, so text never lands in a
    /// margin. Fails with `LineTooWide` — before touching any state — if
    /// the text exceeds the printable width.
    pub fn write_line(&mut self, text: &str) -> Result<(), MicrolineError> {
        let len = text.chars().count();
        if len as u64 > self.line_width_chars as u64 {
            return Err(MicrolineError::LineTooWide {
                len,
                width: self.line_width_chars,
            });
        }

        let pending = self
            .position
            .lines_out_of_margin(self.page_line_count(), self.vmargin_lines);
        if pending > 0 {
            self.skip_lines(pending)?;
        }

        let mut buf = Vec::with_capacity(text.len() + 1);
        buf.extend_from_slice(text.as_bytes());
        buf.push(LF);
        self.port_write(&buf)?;
        self.position.advance(1, self.page_line_count());
        Ok(())
    }

    /// Print a block of text starting at the top of a page.
    ///
    /// The block is split on line breaks; empty segments are printed as
    /// blank lines (intentional spacing is never collapsed) and the rest
    /// are greedily word-wrapped to the printable width. Words are never
    /// split — a single word wider than the line surfaces `LineTooWide`.
    /// Ends back at line 0, so position is page-top-relative before and
    /// after every block regardless of how far it rolled internally.
    pub fn print_block(&mut self, text: &str) -> Result<(), MicrolineError> {
        self.goto_line(0)?;
        self.line_return()?;

        for segment in text.lines() {
            if segment.is_empty() {
                self.write_line("")?;
            } else {
                for line in wrap_words(segment, self.line_width_chars as usize) {
                    self.write_line(&line)?;
                }
            }
        }

        self.goto_line(0)
    }

    /// Print a queued job, one block per page sequence.
    pub fn print_job(&mut self, job: &PrintJob) -> Result<(), MicrolineError> {
        info!(job = %job.name, blocks = job.blocks.len(), "printing job");
        for block in &job.blocks {
            self.print_block(block)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------

    /// Send bytes to the sink.
    ///
    /// A timeout is reported but not propagated: the printer is most
    /// likely deselected and needs the operator, and aborting mid-job
    /// would not make the position model any truer. Everything else
    /// bubbles up.
    fn port_write(&mut self, bytes: &[u8]) -> Result<(), MicrolineError> {
        match self.sink.write(bytes) {
            Ok(()) => Ok(()),
            Err(TransportError::Timeout) => {
                error!(
                    "write timed out. The SEL button likely needs to be pressed on the \
                     physical printer; SEL should be lit along with a PRINT QUALITY and \
                     CHARACTER PITCH option."
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Printable width in characters between two margin columns at a given
/// pitch, using exact rational math (`floor(cols/120 * cpi)`).
fn width_chars(left_col: u32, right_col: u32, cpi: Cpi) -> u32 {
    let (num, den) = cpi.chars_per_inch();
    let cols = right_col.saturating_sub(left_col) as u64;
    (cols * num as u64 / (120 * den as u64)) as u32
}

/// Greedy word wrap. Tabs and other whitespace become spaces, interior
/// space runs keep their length, and whitespace at line boundaries is
/// dropped. Words are never split, so a word longer than `width` comes
/// back as an overlong line for the caller to reject.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let normalized: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    // Empty tokens from split(' ') count the extra spaces in a run
    let mut empties = 0usize;

    for token in normalized.split(' ') {
        if token.is_empty() {
            empties += 1;
            continue;
        }
        let word_len = token.chars().count();
        if current.is_empty() {
            current.push_str(token);
            current_len = word_len;
        } else {
            let gap = empties + 1;
            if current_len + gap + word_len <= width {
                for _ in 0..gap {
                    current.push(' ');
                }
                current.push_str(token);
                current_len += gap + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(token);
                current_len = word_len;
            }
        }
        empties = 0;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// TESTS
// ============================================================================
