//! Popup manager: owns the active popup, the frequency cap, device
//! classification, and trigger registration.
//!
//! The manager is the public entry point of the engine. It holds at most one
//! active popup — a new show request always replaces the current one — plus
//! the retiring popups still finishing their exit transitions, the armed
//! trigger watchers, and the host's registered click targets. Everything is
//! instance state; independent managers never interfere.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_REAPPEAR_HOURS, EXIT_INTENT_FALLBACK_DELAY};
use crate::domain::{
    PopupConfig, Position, ScrollMetrics, TriggerSpec, TriggerWatcher, derive_popup_id,
};
use crate::popup::Popup;
use crate::state::{DeviceClass, DisplayRecord, DisplayStore, JsonFileStore, MemoryStore};

// ============================================================================
// Settings
// ============================================================================

/// Construction-time settings for a [`Manager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Hours before the same popup id may reappear.
    pub reappear_interval_hours: u64,
    /// Position used when a config does not request one.
    pub default_position: Position,
    /// Device class override; `None` detects from the terminal.
    pub device_class: Option<DeviceClass>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            reappear_interval_hours: DEFAULT_REAPPEAR_HOURS,
            default_position: Position::Center,
            device_class: None,
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of a show request. Suppression is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The popup is showing.
    Shown,
    /// The popup is active but waits on its trigger.
    Deferred,
    /// The frequency cap suppressed the request; nothing changed.
    Suppressed,
}

// ============================================================================
// Manager
// ============================================================================

/// Owner of at most one active popup plus cap and trigger bookkeeping.
pub struct Manager {
    settings: ManagerSettings,
    device_class: DeviceClass,
    store: Box<dyn DisplayStore>,
    active: Option<Popup>,
    retiring: Vec<Popup>,
    watchers: Vec<TriggerWatcher>,
    targets: HashMap<String, Rect>,
}

impl Manager {
    /// Creates a manager persisting the display record at the platform
    /// default location.
    ///
    /// When no persistent location is available the cap degrades to
    /// process-lifetime memory with a warning.
    #[must_use]
    pub fn new(settings: ManagerSettings) -> Self {
        let store: Box<dyn DisplayStore> = match JsonFileStore::at_default_location() {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!(%err, "display store unavailable, frequency cap is in-memory only");
                Box::new(MemoryStore::new())
            }
        };
        Self::from_parts(settings, store)
    }

    /// Creates a manager with an injected display store.
    #[must_use]
    pub fn with_store(settings: ManagerSettings, store: impl DisplayStore + 'static) -> Self {
        Self::from_parts(settings, Box::new(store))
    }

    fn from_parts(settings: ManagerSettings, store: Box<dyn DisplayStore>) -> Self {
        let device_class = settings.device_class.unwrap_or_else(DeviceClass::detect);
        Self {
            settings,
            device_class,
            store,
            active: None,
            retiring: Vec::new(),
            watchers: Vec::new(),
            targets: HashMap::new(),
        }
    }

    /// Returns the device class the manager resolved at construction.
    #[must_use]
    pub const fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Returns the active popup, shown or still trigger-deferred.
    #[must_use]
    pub fn active_popup(&self) -> Option<&Popup> {
        self.active.as_ref()
    }

    /// Registers or moves a host click target that click triggers can bind
    /// to. Call again whenever the host layout moves the element.
    pub fn register_click_target(&mut self, id: impl Into<String>, rect: Rect) {
        self.targets.insert(id.into(), rect);
    }

    // ========================================================================
    // Show / Hide
    // ========================================================================

    /// Requests display of a popup.
    ///
    /// Derives the popup id from the title and consults the frequency cap;
    /// a suppressed request changes nothing and reports
    /// [`Outcome::Suppressed`]. Otherwise any current popup is hidden
    /// (last-requested wins), the effective position is resolved with the
    /// compact-device override, and the popup either shows immediately or
    /// waits on its trigger.
    pub fn show(&mut self, config: PopupConfig) -> Outcome {
        self.show_at(config, Instant::now())
    }

    fn show_at(&mut self, config: PopupConfig, now: Instant) -> Outcome {
        let popup_id = derive_popup_id(&config.title);
        let now_ms = Utc::now().timestamp_millis();
        if is_suppressed(
            self.store.load().as_ref(),
            &popup_id,
            now_ms,
            self.reappear_interval(),
        ) {
            debug!(popup_id = %popup_id, title = %config.title, "popup suppressed by frequency cap");
            return Outcome::Suppressed;
        }

        self.retire_active(now);

        let position = self.resolve_position(config.position);
        let trigger = config.trigger.clone();
        self.active = Some(Popup::new(config, position, popup_id));

        match trigger {
            None => {
                self.show_active(now);
                Outcome::Shown
            }
            Some(spec) => {
                if let Some(watcher) = self.register_trigger(&spec, now) {
                    self.watchers.push(watcher);
                }
                Outcome::Deferred
            }
        }
    }

    /// Hides the active popup if there is one; no-op otherwise.
    pub fn hide_active_popup(&mut self) {
        self.retire_active(Instant::now());
    }

    fn retire_active(&mut self, now: Instant) {
        if let Some(mut popup) = self.active.take() {
            popup.hide(now);
            // A popup that never showed has no exit transition to finish.
            if popup.is_renderable() {
                self.retiring.push(popup);
            }
        }
    }

    fn resolve_position(&self, requested: Option<Position>) -> Position {
        let position = requested.unwrap_or(self.settings.default_position);
        if self.device_class.is_compact()
            && matches!(position, Position::BottomRight | Position::BottomLeft)
        {
            return Position::BottomBanner;
        }
        position
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    fn register_trigger(&mut self, spec: &TriggerSpec, now: Instant) -> Option<TriggerWatcher> {
        match spec {
            TriggerSpec::Time { delay } => {
                Some(TriggerWatcher::deadline(now + delay.unwrap_or_default()))
            }
            TriggerSpec::Scroll { threshold_pct } => Some(TriggerWatcher::scroll(*threshold_pct)),
            TriggerSpec::ExitIntent => {
                if self.device_class.is_compact() {
                    warn!(
                        "exit-intent is not supported on compact terminals; \
                         using a timed fallback"
                    );
                    Some(TriggerWatcher::deadline(now + EXIT_INTENT_FALLBACK_DELAY))
                } else {
                    Some(TriggerWatcher::exit_intent())
                }
            }
            TriggerSpec::Click { target } => {
                if self.targets.contains_key(target) {
                    Some(TriggerWatcher::click(target.clone()))
                } else {
                    warn!(selector = %target, "click trigger target not registered; trigger never fires");
                    None
                }
            }
        }
    }

    /// A firing watcher shows whatever popup is active at that moment, not
    /// necessarily the one it was registered for; pending watchers survive
    /// popup replacement. Inherited behavior, kept as-is.
    fn show_active(&mut self, now: Instant) {
        if let Some(popup) = self.active.as_mut() {
            popup.show(now);
        }
    }

    // ========================================================================
    // Event Loop Hooks
    // ========================================================================

    /// Advances time triggers, transitions, and transient state.
    pub fn tick(&mut self, now: Instant) {
        let mut fired = false;
        for watcher in &mut self.watchers {
            fired |= watcher.poll(now);
        }
        self.watchers.retain(TriggerWatcher::is_armed);
        if fired {
            self.show_active(now);
        }

        if self.active.as_mut().is_some_and(|popup| popup.tick(now))
            && let Some(popup) = self.active.take()
        {
            self.complete_dismissal(popup);
        }

        let mut index = 0;
        while index < self.retiring.len() {
            if self.retiring[index].tick(now) {
                let popup = self.retiring.swap_remove(index);
                self.complete_dismissal(popup);
            } else if self.retiring[index].is_closed() {
                self.retiring.swap_remove(index);
            } else {
                index += 1;
            }
        }
    }

    /// Routes a key press. Returns `true` if the popup consumed it.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        self.active
            .as_mut()
            .is_some_and(|popup| popup.handle_key(key, now))
    }

    /// Feeds a mouse event to armed watchers and the active popup.
    /// Returns `true` if the popup consumed it.
    pub fn handle_mouse(&mut self, event: &MouseEvent, area: Rect, now: Instant) -> bool {
        let mut fired = false;
        for watcher in &mut self.watchers {
            fired |= watcher.observe_mouse(event, &self.targets);
        }
        self.watchers.retain(TriggerWatcher::is_armed);
        if fired {
            self.show_active(now);
        }

        self.active
            .as_mut()
            .is_some_and(|popup| popup.handle_mouse(event, area, now))
    }

    /// Reports the host's scroll state to armed scroll watchers.
    pub fn update_scroll(&mut self, metrics: ScrollMetrics, now: Instant) {
        let mut fired = false;
        for watcher in &mut self.watchers {
            fired |= watcher.observe_scroll(metrics);
        }
        self.watchers.retain(TriggerWatcher::is_armed);
        if fired {
            self.show_active(now);
        }
    }

    /// Draws the active popup and any popups still exiting.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        for popup in &self.retiring {
            popup.render(frame, area);
        }
        if let Some(popup) = &self.active {
            popup.render(frame, area);
        }
    }

    // ========================================================================
    // Dismissal
    // ========================================================================

    /// Records the display, fires the caller's close hook, in that order.
    /// The active reference was cleared by the caller where applicable.
    fn complete_dismissal(&mut self, mut popup: Popup) {
        self.record_shown(popup.id());
        if let Some(mut hook) = popup.take_close_hook() {
            hook();
        }
    }

    fn record_shown(&mut self, popup_id: &str) {
        let record = DisplayRecord {
            last_shown_at: Utc::now().timestamp_millis(),
            popup_id: popup_id.to_string(),
        };
        if let Err(err) = self.store.save(&record) {
            warn!(%err, popup_id = %popup_id, "failed to persist display record");
        }
    }

    fn reappear_interval(&self) -> Duration {
        Duration::from_secs(self.settings.reappear_interval_hours * 60 * 60)
    }
}

// ============================================================================
// Frequency Cap
// ============================================================================

/// Returns `true` when the cap blocks this popup id.
///
/// Suppression needs both an id match and a record younger than the
/// interval; no record, or a record for a different id, permits showing.
fn is_suppressed(
    record: Option<&DisplayRecord>,
    popup_id: &str,
    now_ms: i64,
    interval: Duration,
) -> bool {
    let Some(record) = record else {
        return false;
    };
    let interval_ms = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX);
    record.popup_id == popup_id && now_ms - record.last_shown_at < interval_ms
}

// ============================================================================
// Tests
// ============================================================================
