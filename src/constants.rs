//! Timing and behavior constants for the popup engine.
//!
//! Layout dimensions live next to the layout math in [`crate::ui::layout`];
//! this module centralizes the lifecycle and trigger numbers so the manager,
//! popup state machine, and tests agree on them.

use std::time::Duration;

// ============================================================================
// Lifecycle Timing
// ============================================================================

/// Duration of the entry transition before a popup is fully visible.
pub const ENTER_DURATION: Duration = Duration::from_millis(150);

/// Duration of the exit transition before a popup detaches.
///
/// The close hook fires only after this elapses, never earlier.
pub const EXIT_DURATION: Duration = Duration::from_millis(200);

/// How long the transient copy success/failure message stays visible.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

// ============================================================================
// Triggers
// ============================================================================

/// Scroll threshold applied when a scroll trigger omits one, in percent.
pub const DEFAULT_SCROLL_THRESHOLD_PCT: f64 = 50.0;

/// Timed fallback used for exit-intent on terminals without pointer events.
pub const EXIT_INTENT_FALLBACK_DELAY: Duration = Duration::from_secs(10);

/// Rows from the top edge that count as "leaving" for exit intent.
///
/// The pointer crossing into this band is the terminal analog of the cursor
/// heading for the browser chrome.
pub const EXIT_INTENT_ROWS: u16 = 1;

// ============================================================================
// Frequency Cap
// ============================================================================

/// Default reappear interval for the frequency cap, in hours.
pub const DEFAULT_REAPPEAR_HOURS: u64 = 4;

// ============================================================================
// Device Classification
// ============================================================================

/// Terminals narrower than this are classified as compact.
///
/// Compact terminals get the banner layout instead of corner popups, which
/// do not fit next to the content at that width.
pub const COMPACT_WIDTH_COLS: u16 = 80;
