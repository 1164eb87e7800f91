//! # Paper Geometry
//!
//! The physical paper model: page dimensions, line density, and the
//! conversion from inch measurements to the protocol's column units.
//!
//! Geometry is a purely local model. Changing it emits no bytes; the
//! printer only ever hears about it indirectly, through the margin column
//! codes and skip counts derived from it.

use crate::error::MicrolineError;

/// Column units per inch for the margin commands. Fixed for this protocol
/// family.
pub const COLUMNS_PER_INCH: f64 = 120.0;

/// Physical paper model for one printer session.
///
/// The vertical density is a hardware constant: the Microline 321 prints
/// 6 lines per inch and this does not appear to be changeable. An 11in
/// sheet therefore has exactly 66 lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Lines per inch (fixed at 6 for this printer family)
    pub lines_per_inch: u32,
    /// Paper width in inches
    pub page_width_in: f64,
    /// Paper height in inches
    pub page_height_in: f64,
    /// Calibration offset of the carriage home position relative to the
    /// physical left paper edge, in inches. Determined experimentally.
    pub carriage_home_offset_in: f64,
}

impl Default for PageGeometry {
    /// US letter paper in the stock carriage position.
    fn default() -> Self {
        Self {
            lines_per_inch: 6,
            page_width_in: 8.5,
            page_height_in: 11.0,
            carriage_home_offset_in: -0.3,
        }
    }
}

impl PageGeometry {
    /// Replace the paper dimensions.
    ///
    /// Emits nothing; the caller is expected to re-send margins afterwards
    /// so the column codes match the new width.
    pub fn set_paper_type(&mut self, width_in: f64, height_in: f64) -> Result<(), MicrolineError> {
        if width_in <= 0.0 || height_in <= 0.0 {
            return Err(MicrolineError::InvalidGeometry { width_in, height_in });
        }
        // The position tracker divides by the page line count; a page
        // shorter than one line has no valid position at all, so reject it
        // here rather than let a zero count reach the tracker.
        if (height_in * self.lines_per_inch as f64).floor() < 1.0 {
            return Err(MicrolineError::InvalidGeometry { width_in, height_in });
        }
        self.page_width_in = width_in;
        self.page_height_in = height_in;
        Ok(())
    }

    /// Number of printable lines on one page: `floor(height * lpi)`.
    ///
    /// Re-derived on every call so it can never go stale against the
    /// current paper type.
    pub fn page_line_count(&self) -> u32 {
        (self.page_height_in * self.lines_per_inch as f64).floor() as u32
    }

    /// Absolute margin columns for a symmetric horizontal margin.
    ///
    /// `left = round((home + margin) * 120)`,
    /// `right = round((home + width - margin) * 120)`. A margin small
    /// enough to push the left column past the carriage home position
    /// would round negative, which the column field cannot encode.
    pub fn margin_columns(&self, hmargin_in: f64) -> Result<(u32, u32), MicrolineError> {
        let left = ((self.carriage_home_offset_in + hmargin_in) * COLUMNS_PER_INCH).round();
        let right = ((self.carriage_home_offset_in + self.page_width_in - hmargin_in)
            * COLUMNS_PER_INCH)
            .round();

        if left < 0.0 {
            return Err(MicrolineError::MarginOutOfRange {
                col: left as i64,
                digits: 3,
            });
        }
        if right < 0.0 {
            return Err(MicrolineError::MarginOutOfRange {
                col: right as i64,
                digits: 4,
            });
        }
        Ok((left as u32, right as u32))
    }

    /// Vertical margin size in whole lines, rounding up.
    pub fn vmargin_lines(&self, vmargin_in: f64) -> u32 {
        (vmargin_in * self.lines_per_inch as f64).ceil() as u32
    }
}
