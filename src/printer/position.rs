//! # Paper Position Tracking
//!
//! The printer has no way to report where the paper is, so the driver
//! keeps its own line/page model and trusts it. Every paper movement goes
//! through [`PositionTracker`]; as long as nothing else moves the platen,
//! the model stays in lockstep with the hardware.
//!
//! Each page has three zones: the top margin, the printable body, and the
//! bottom margin (same size as the top). The tracker can answer how far
//! the paper must advance to leave a margin zone, and how far to reach an
//! arbitrary line — always forwards, because the paper mechanism cannot
//! reverse.

use crate::error::MicrolineError;

/// Line/page position within the paper feed.
///
/// Invariant: after any advance, `line_number` is in `[0, page_lines)`.
/// `page_number` only ever grows; a fresh session is the only way back to
/// page zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionTracker {
    line_number: u32,
    page_number: u32,
}

impl PositionTracker {
    /// Start of page zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line within the page, `0 <= line < page_lines`.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Pages rolled past since session start.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Advance `n` lines, rolling over page boundaries as needed.
    ///
    /// A single call may cross several pages, so this loops rather than
    /// checking once.
    pub fn advance(&mut self, n: u32, page_lines: u32) {
        debug_assert!(page_lines > 0, "page must have at least one line");
        self.line_number += n;
        while self.line_number >= page_lines {
            self.page_number += 1;
            self.line_number -= page_lines;
        }
    }

    /// Lines to advance before text may be printed.
    ///
    /// Returns 0 in the printable body. In the top margin it is the
    /// distance to the first body line; in the bottom margin it is the
    /// rest of this page plus the next page's top margin.
    pub fn lines_out_of_margin(&self, page_lines: u32, vmargin_lines: u32) -> u32 {
        if self.line_number < vmargin_lines {
            vmargin_lines - self.line_number
        } else if self.line_number >= page_lines.saturating_sub(vmargin_lines) {
            (page_lines - self.line_number) + vmargin_lines
        } else {
            0
        }
    }

    /// Forward distance to `target`, wrapping through the next page top
    /// when the target lies behind the current position.
    ///
    /// Returns 0 when already there. `target == page_lines` is allowed and
    /// means line 0 of the next page.
    pub fn distance_to(&self, target: u32, page_lines: u32) -> Result<u32, MicrolineError> {
        if target > page_lines {
            return Err(MicrolineError::TargetOutOfRange { target, page_lines });
        }
        if self.line_number == target {
            return Ok(0);
        }
        if self.line_number < target {
            Ok(target - self.line_number)
        } else {
            Ok((page_lines - self.line_number) + target)
        }
    }
}
