//! Terminal device classification.
//!
//! One predicate drives two adaptations: on compact terminals corner popups
//! do not fit, so they coerce to the bottom banner, and pointer motion is
//! not a reliable signal, so exit intent degrades to a timed fallback.

use crate::constants::COMPACT_WIDTH_COLS;

/// Class of terminal the engine is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Full-width terminal with usable pointer reporting.
    Pointer,
    /// Narrow terminal; corner positions coerce to the bottom banner and
    /// exit intent degrades to a timed fallback.
    Compact,
}

impl DeviceClass {
    /// Detects the class from the current terminal size.
    ///
    /// When the size cannot be queried the terminal is assumed full-width.
    #[must_use]
    pub fn detect() -> Self {
        match crossterm::terminal::size() {
            Ok((width, _)) => Self::classify(width),
            Err(_) => Self::Pointer,
        }
    }

    /// Classifies a terminal by column count.
    #[must_use]
    pub const fn classify(width: u16) -> Self {
        if width < COMPACT_WIDTH_COLS {
            Self::Compact
        } else {
            Self::Pointer
        }
    }

    /// Returns `true` for compact terminals.
    #[must_use]
    pub const fn is_compact(self) -> bool {
        matches!(self, Self::Compact)
    }
}

// ============================================================================
// Tests
// ============================================================================
