//! Display triggers and their one-shot watcher state machine.
//!
//! A [`TriggerSpec`] describes the condition that defers a popup's display;
//! the manager compiles it into a [`TriggerWatcher`] fed from the host event
//! loop. Every watcher is one-shot: after it fires once it disarms itself,
//! so a shown popup cannot be re-triggered by the same listener.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position as Cell, Rect};

use crate::constants::{DEFAULT_SCROLL_THRESHOLD_PCT, EXIT_INTENT_ROWS};

// ============================================================================
// Trigger Spec
// ============================================================================

/// Condition deferring a popup's display. Exactly one per invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerSpec {
    /// Fire once after a delay; `None` means immediately on the next tick.
    Time {
        /// Delay before firing.
        delay: Option<Duration>,
    },
    /// Fire the first time the host's scroll fraction reaches a threshold.
    Scroll {
        /// Threshold in percent; `None` means the 50% default.
        threshold_pct: Option<f64>,
    },
    /// Fire when the pointer heads for the top edge of the terminal.
    ExitIntent,
    /// Fire on the first press inside the named host click target.
    Click {
        /// Id of a click target registered on the manager.
        target: String,
    },
}

impl TriggerSpec {
    /// Time trigger with the given delay.
    #[must_use]
    pub const fn time(delay: Duration) -> Self {
        Self::Time { delay: Some(delay) }
    }

    /// Scroll trigger with the given percentage threshold.
    #[must_use]
    pub const fn scroll(threshold_pct: f64) -> Self {
        Self::Scroll {
            threshold_pct: Some(threshold_pct),
        }
    }

    /// Click trigger bound to the given target id.
    #[must_use]
    pub fn click(target: impl Into<String>) -> Self {
        Self::Click {
            target: target.into(),
        }
    }
}

// ============================================================================
// Scroll Metrics
// ============================================================================

/// Host-reported scroll state, in terminal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Rows scrolled past the top of the content.
    pub offset: u16,
    /// Total content height.
    pub content_height: u16,
    /// Visible viewport height.
    pub viewport_height: u16,
}

impl ScrollMetrics {
    /// Returns the scrolled fraction as a percentage.
    ///
    /// Content that fits entirely in the viewport has no scrollable track
    /// and counts as fully scrolled.
    #[must_use]
    pub fn fraction_pct(self) -> f64 {
        let track = self.content_height.saturating_sub(self.viewport_height);
        if track == 0 {
            return 100.0;
        }
        f64::from(self.offset.min(track)) / f64::from(track) * 100.0
    }
}

// ============================================================================
// Trigger Watcher
// ============================================================================

/// Compiled, armed form of a [`TriggerSpec`].
///
/// The manager builds watchers at registration time (applying device
/// fallbacks and target resolution there) and feeds them from the event
/// loop. `fired` methods return `true` at most once per watcher.
#[derive(Debug)]
pub struct TriggerWatcher {
    kind: WatcherKind,
    armed: bool,
}

#[derive(Debug)]
enum WatcherKind {
    Deadline { at: Instant },
    Scroll { threshold_pct: f64 },
    ExitIntent,
    Click { target: String },
}

impl TriggerWatcher {
    /// Watcher that fires once `now` reaches the given instant.
    ///
    /// Used for time triggers and for the exit-intent timed fallback.
    #[must_use]
    pub const fn deadline(at: Instant) -> Self {
        Self {
            kind: WatcherKind::Deadline { at },
            armed: true,
        }
    }

    /// Watcher that fires at the given scroll percentage.
    #[must_use]
    pub fn scroll(threshold_pct: Option<f64>) -> Self {
        Self {
            kind: WatcherKind::Scroll {
                threshold_pct: threshold_pct.unwrap_or(DEFAULT_SCROLL_THRESHOLD_PCT),
            },
            armed: true,
        }
    }

    /// Watcher that fires on pointer motion along the top edge.
    #[must_use]
    pub const fn exit_intent() -> Self {
        Self {
            kind: WatcherKind::ExitIntent,
            armed: true,
        }
    }

    /// Watcher that fires on a press inside the named click target.
    #[must_use]
    pub fn click(target: impl Into<String>) -> Self {
        Self {
            kind: WatcherKind::Click {
                target: target.into(),
            },
            armed: true,
        }
    }

    /// Returns `true` while the watcher can still fire.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advances deadline watchers; fires once the deadline passes.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.armed {
            return false;
        }
        match self.kind {
            WatcherKind::Deadline { at } if now >= at => self.fire(),
            _ => false,
        }
    }

    /// Feeds a scroll report; fires the first time the threshold is met.
    pub fn observe_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if !self.armed {
            return false;
        }
        match self.kind {
            WatcherKind::Scroll { threshold_pct } if metrics.fraction_pct() >= threshold_pct => {
                self.fire()
            }
            _ => false,
        }
    }

    /// Feeds a mouse event; fires exit-intent and click watchers.
    pub fn observe_mouse(
        &mut self,
        event: &MouseEvent,
        targets: &HashMap<String, Rect>,
    ) -> bool {
        if !self.armed {
            return false;
        }
        match &self.kind {
            WatcherKind::ExitIntent
                if matches!(event.kind, MouseEventKind::Moved)
                    && event.row < EXIT_INTENT_ROWS =>
            {
                self.fire()
            }
            WatcherKind::Click { target }
                if matches!(event.kind, MouseEventKind::Down(MouseButton::Left))
                    && targets
                        .get(target)
                        .is_some_and(|rect| rect.contains(Cell::new(event.column, event.row))) =>
            {
                self.fire()
            }
            _ => false,
        }
    }

    fn fire(&mut self) -> bool {
        self.armed = false;
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use rstest::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[rstest]
    #[case::top(0, 100, 20, 0.0)]
    #[case::halfway(40, 100, 20, 50.0)]
    #[case::bottom(80, 100, 20, 100.0)]
    #[case::past_track(200, 100, 20, 100.0)]
    #[case::no_track(0, 10, 20, 100.0)]
    fn scroll_fraction(
        #[case] offset: u16,
        #[case] content_height: u16,
        #[case] viewport_height: u16,
        #[case] expected: f64,
    ) {
        let metrics = ScrollMetrics {
            offset,
            content_height,
            viewport_height,
        };
        assert!((metrics.fraction_pct() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn scroll_watcher_fires_once_at_threshold() {
        let mut watcher = TriggerWatcher::scroll(Some(50.0));
        let below = ScrollMetrics {
            offset: 30,
            content_height: 100,
            viewport_height: 20,
        };
        let at = ScrollMetrics {
            offset: 40,
            content_height: 100,
            viewport_height: 20,
        };
        let beyond = ScrollMetrics {
            offset: 80,
            content_height: 100,
            viewport_height: 20,
        };

        assert!(!watcher.observe_scroll(below));
        assert!(watcher.observe_scroll(at));
        assert!(!watcher.is_armed());
        assert!(!watcher.observe_scroll(beyond));
    }

    #[test]
    fn scroll_watcher_uses_default_threshold() {
        let mut watcher = TriggerWatcher::scroll(None);
        let at_half = ScrollMetrics {
            offset: 40,
            content_height: 100,
            viewport_height: 20,
        };
        assert!(watcher.observe_scroll(at_half));
    }

    #[test]
    fn deadline_watcher_respects_instant() {
        let now = Instant::now();
        let mut watcher = TriggerWatcher::deadline(now + Duration::from_secs(5));

        assert!(!watcher.poll(now));
        assert!(!watcher.poll(now + Duration::from_secs(4)));
        assert!(watcher.poll(now + Duration::from_secs(5)));
        assert!(!watcher.poll(now + Duration::from_secs(6)));
    }

    #[test]
    fn exit_intent_fires_on_top_row_motion_only() {
        let mut watcher = TriggerWatcher::exit_intent();

        assert!(!watcher.observe_mouse(&mouse(MouseEventKind::Moved, 10, 5), &HashMap::new()));
        assert!(!watcher.observe_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 10, 0),
            &HashMap::new()
        ));
        assert!(watcher.observe_mouse(&mouse(MouseEventKind::Moved, 10, 0), &HashMap::new()));
        assert!(!watcher.observe_mouse(&mouse(MouseEventKind::Moved, 10, 0), &HashMap::new()));
    }

    #[test]
    fn click_watcher_needs_press_inside_target() {
        let mut targets = HashMap::new();
        targets.insert("subscribe".to_string(), Rect::new(10, 10, 20, 3));
        let mut watcher = TriggerWatcher::click("subscribe");

        assert!(!watcher.observe_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 5, 5),
            &targets
        ));
        assert!(!watcher.observe_mouse(&mouse(MouseEventKind::Moved, 15, 11), &targets));
        assert!(watcher.observe_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 15, 11),
            &targets
        ));
        assert!(!watcher.observe_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 15, 11),
            &targets
        ));
    }

    #[test]
    fn click_watcher_with_unknown_target_never_fires() {
        let mut watcher = TriggerWatcher::click("missing");
        let fired = watcher.observe_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 15, 11),
            &HashMap::new(),
        );
        assert!(!fired);
        assert!(watcher.is_armed());
    }
}
