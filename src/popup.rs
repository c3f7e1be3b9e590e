//! Popup runtime: lifecycle phase machine, input routing, and rendering.
//!
//! A [`Popup`] is constructed by the manager on a show request and advances
//! through `Pending → Entering → Visible → Exiting → Closed`. Detachment and
//! the close hook happen only when the exit transition completes, so the
//! hook fires exactly once per hide no matter how many times — or from how
//! many entry points — `hide` was requested.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Frame, layout::Rect};
use tracing::warn;

use crate::constants::{COPY_FEEDBACK_DURATION, ENTER_DURATION, EXIT_DURATION};
use crate::domain::{CloseHook, FeedbackKind, PopupConfig, PopupKind, Position};
use crate::state::platform::clipboard;
use crate::theme::TRANSITION_STYLE;
use crate::ui::layout::{BodyFrame, PopupFrame};
use crate::ui::popups::coupon::CopyNotice;
use crate::ui::popups::{self, LeadFormState};

// ============================================================================
// Phase
// ============================================================================

/// Lifecycle phase of a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Constructed, waiting on a trigger.
    Pending,
    /// Entry transition running.
    Entering { since: Instant },
    /// Fully visible and interactive.
    Visible,
    /// Exit transition running; still rendered, no longer interactive.
    Exiting { since: Instant },
    /// Detached. Terminal state.
    Closed,
}

// ============================================================================
// Input Actions
// ============================================================================

/// What a routed input resolved to, computed before any mutation so the
/// borrow of the config ends first.
enum Action {
    Close,
    CopyCode(String),
    Launch(String),
    FormInsert(char),
    FormBackspace,
    FormFocusNext,
    FormFocusPrev,
    FormFocusAt(usize),
    SubmitLead,
    SubmitFeedback(usize),
}

// ============================================================================
// Popup
// ============================================================================

/// A single popup instance owned by the manager.
pub struct Popup {
    id: String,
    config: PopupConfig,
    position: Position,
    phase: Phase,
    form: Option<LeadFormState>,
    copy_notice: Option<(CopyNotice, Instant)>,
}

impl Popup {
    pub(crate) fn new(config: PopupConfig, position: Position, id: String) -> Self {
        let form = match &config.kind {
            PopupKind::LeadCapture { fields, .. } => Some(LeadFormState::new(*fields)),
            _ => None,
        };
        Self {
            id,
            config,
            position,
            phase: Phase::Pending,
            form,
            copy_notice: None,
        }
    }

    /// Returns the derived frequency-cap id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resolved position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns `true` while the popup is entering or visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Entering { .. } | Phase::Visible)
    }

    /// Returns `true` while the popup occupies screen space.
    #[must_use]
    pub const fn is_renderable(&self) -> bool {
        matches!(
            self.phase,
            Phase::Entering { .. } | Phase::Visible | Phase::Exiting { .. }
        )
    }

    pub(crate) const fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Closed)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Begins the entry transition. Only meaningful from `Pending`; showing
    /// an already-visible popup is a no-op, so a late trigger firing cannot
    /// restart the transition.
    pub(crate) fn show(&mut self, now: Instant) {
        if matches!(self.phase, Phase::Pending) {
            self.phase = Phase::Entering { since: now };
        }
    }

    /// Begins the exit transition. Idempotent: repeated hides while exiting
    /// or after closing do nothing, which is what keeps the close hook at
    /// one invocation.
    pub(crate) fn hide(&mut self, now: Instant) {
        if self.is_open() {
            self.phase = Phase::Exiting { since: now };
        }
    }

    /// Advances transitions and transient state.
    ///
    /// Returns `true` exactly once, on the tick the exit transition
    /// completes and the popup detaches.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        if let Some((_, until)) = self.copy_notice
            && now >= until
        {
            self.copy_notice = None;
        }

        match self.phase {
            Phase::Entering { since } if now.duration_since(since) >= ENTER_DURATION => {
                self.phase = Phase::Visible;
                false
            }
            Phase::Exiting { since } if now.duration_since(since) >= EXIT_DURATION => {
                self.phase = Phase::Closed;
                true
            }
            _ => false,
        }
    }

    /// Hands the close hook to the manager at dismissal time.
    pub(crate) fn take_close_hook(&mut self) -> Option<CloseHook> {
        self.config.on_close.take()
    }

    // ========================================================================
    // Input Routing
    // ========================================================================

    /// Routes a key press. Returns `true` if the popup consumed it.
    pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release || !self.is_open() {
            return false;
        }
        if key.code == KeyCode::Esc {
            self.apply(Action::Close, now);
            return true;
        }
        let Some(action) = self.key_action(key.code) else {
            return false;
        };
        self.apply(action, now);
        true
    }

    fn key_action(&self, code: KeyCode) -> Option<Action> {
        match &self.config.kind {
            PopupKind::Coupon { code: coupon_code } => match code {
                KeyCode::Char('c' | 'C') => Some(Action::CopyCode(coupon_code.clone())),
                _ => None,
            },
            PopupKind::CallToAction { target_url, .. } => match code {
                KeyCode::Enter => Some(Action::Launch(target_url.clone())),
                _ => None,
            },
            PopupKind::LeadCapture { .. } => match code {
                KeyCode::Enter => Some(Action::SubmitLead),
                KeyCode::Tab | KeyCode::Down => Some(Action::FormFocusNext),
                KeyCode::BackTab | KeyCode::Up => Some(Action::FormFocusPrev),
                KeyCode::Backspace => Some(Action::FormBackspace),
                KeyCode::Char(c) => Some(Action::FormInsert(c)),
                _ => None,
            },
            PopupKind::Feedback { kind, .. } => match code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let index = (c as usize).checked_sub('1' as usize)?;
                    (index < kind.choice_count()).then_some(Action::SubmitFeedback(index))
                }
                _ => None,
            },
        }
    }

    /// Routes a mouse event against the current layout. Returns `true` if
    /// the popup consumed it.
    pub(crate) fn handle_mouse(&mut self, event: &MouseEvent, area: Rect, now: Instant) -> bool {
        if !self.is_open() || !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return false;
        }

        let frame = PopupFrame::compute(&self.config, self.position, area);
        let cell = ratatui::layout::Position::new(event.column, event.row);

        // A press on the overlay outside the container closes, same as the
        // close control and Escape.
        if !frame.container.contains(cell) {
            self.apply(Action::Close, now);
            return true;
        }
        if frame.close.contains(cell) {
            self.apply(Action::Close, now);
            return true;
        }

        let action = match &frame.body {
            BodyFrame::Coupon { copy_button, .. } if copy_button.contains(cell) => {
                match &self.config.kind {
                    PopupKind::Coupon { code } => Some(Action::CopyCode(code.clone())),
                    _ => None,
                }
            }
            BodyFrame::CallToAction { button } if button.contains(cell) => {
                match &self.config.kind {
                    PopupKind::CallToAction { target_url, .. } => {
                        Some(Action::Launch(target_url.clone()))
                    }
                    _ => None,
                }
            }
            BodyFrame::LeadCapture { fields, submit } => {
                if submit.contains(cell) {
                    Some(Action::SubmitLead)
                } else {
                    fields
                        .iter()
                        .position(|(_, rect)| rect.contains(cell))
                        .map(Action::FormFocusAt)
                }
            }
            BodyFrame::Feedback { choices } => choices
                .iter()
                .position(|rect| rect.contains(cell))
                .map(Action::SubmitFeedback),
            _ => None,
        };

        if let Some(action) = action {
            self.apply(action, now);
        }
        // Presses inside the container never fall through to the host.
        true
    }

    fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Close => self.hide(now),
            Action::CopyCode(code) => {
                let notice = match clipboard::copy_text(&code) {
                    Ok(()) => CopyNotice::Copied,
                    Err(err) => {
                        warn!(%err, "coupon copy failed");
                        CopyNotice::Failed
                    }
                };
                self.copy_notice = Some((notice, now + COPY_FEEDBACK_DURATION));
            }
            Action::Launch(target) => {
                if let Err(err) = open::that(&target) {
                    warn!(%err, url = %target, "call-to-action launch failed");
                }
                self.hide(now);
            }
            Action::FormInsert(c) => {
                if let Some(form) = self.form.as_mut() {
                    form.type_char(c);
                }
            }
            Action::FormBackspace => {
                if let Some(form) = self.form.as_mut() {
                    form.backspace();
                }
            }
            Action::FormFocusNext => {
                if let Some(form) = self.form.as_mut() {
                    form.focus_next();
                }
            }
            Action::FormFocusPrev => {
                if let Some(form) = self.form.as_mut() {
                    form.focus_prev();
                }
            }
            Action::FormFocusAt(index) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_focus(index);
                }
            }
            Action::SubmitLead => {
                let data = match (&self.config.kind, self.form.as_ref()) {
                    (PopupKind::LeadCapture { fields, .. }, Some(form)) => {
                        form.assemble(*fields)
                    }
                    _ => return,
                };
                if let PopupKind::LeadCapture {
                    on_submit: Some(hook),
                    ..
                } = &mut self.config.kind
                {
                    hook(data);
                }
                self.hide(now);
            }
            Action::SubmitFeedback(index) => {
                let data = match &self.config.kind {
                    PopupKind::Feedback { kind, .. } => kind.choice(index),
                    _ => return,
                };
                if let PopupKind::Feedback {
                    on_submit: Some(hook),
                    ..
                } = &mut self.config.kind
                {
                    hook(data);
                }
                self.hide(now);
            }
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draws the popup into the host area.
    pub(crate) fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.is_renderable() {
            return;
        }

        let popup_frame = PopupFrame::compute(&self.config, self.position, area);
        popups::render_chrome(frame, &popup_frame, &self.config, self.help_text());

        match &self.config.kind {
            PopupKind::Coupon { code } => {
                if let BodyFrame::Coupon {
                    code: code_rect,
                    copy_button,
                    notice,
                } = &popup_frame.body
                {
                    popups::coupon::render(
                        frame,
                        *code_rect,
                        *copy_button,
                        *notice,
                        code,
                        self.copy_notice.map(|(n, _)| n),
                    );
                }
            }
            PopupKind::CallToAction { button_label, .. } => {
                if let BodyFrame::CallToAction { button } = &popup_frame.body {
                    popups::call_to_action::render(frame, *button, button_label);
                }
            }
            PopupKind::LeadCapture { button_label, .. } => {
                if let (BodyFrame::LeadCapture { fields, submit }, Some(form)) =
                    (&popup_frame.body, self.form.as_ref())
                {
                    let label = button_label
                        .as_deref()
                        .unwrap_or(crate::domain::DEFAULT_SUBMIT_LABEL);
                    popups::lead_form::render(frame, fields, *submit, label, form);
                }
            }
            PopupKind::Feedback { kind, .. } => {
                if let BodyFrame::Feedback { choices } = &popup_frame.body {
                    popups::feedback::render(frame, choices, *kind);
                }
            }
        }

        if matches!(self.phase, Phase::Entering { .. } | Phase::Exiting { .. }) {
            frame
                .buffer_mut()
                .set_style(popup_frame.container, TRANSITION_STYLE);
        }
    }

    const fn help_text(&self) -> &'static str {
        match &self.config.kind {
            PopupKind::Coupon { .. } => "C: Copy | Esc: Close",
            PopupKind::CallToAction { .. } => "Enter: Open | Esc: Close",
            PopupKind::LeadCapture { .. } => "Tab: Next | Enter: Send | Esc: Close",
            PopupKind::Feedback { kind, .. } => match kind {
                FeedbackKind::Stars => "1-5: Rate | Esc: Close",
                FeedbackKind::Emoji => "1-3: Choose | Esc: Close",
                FeedbackKind::Thumbs => "1-2: Choose | Esc: Close",
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedbackData, LeadFields, TriggerSpec};
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn coupon_popup() -> Popup {
        Popup::new(
            PopupConfig::new(
                "Sale",
                PopupKind::Coupon {
                    code: "SAVE20".to_string(),
                },
            ),
            Position::Center,
            "sale".to_string(),
        )
    }

    fn shown(mut popup: Popup, now: Instant) -> Popup {
        popup.show(now);
        popup.tick(now + ENTER_DURATION);
        popup
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn lifecycle_runs_through_transitions() {
        let t0 = Instant::now();
        let mut popup = coupon_popup();
        assert!(!popup.is_open());

        popup.show(t0);
        assert!(popup.is_open());
        assert!(popup.is_renderable());

        // Entry completes only after the transition duration.
        assert!(!popup.tick(t0 + Duration::from_millis(1)));
        popup.tick(t0 + ENTER_DURATION);
        assert!(matches!(popup.phase, Phase::Visible));

        popup.hide(t0 + ENTER_DURATION);
        assert!(!popup.is_open());
        assert!(popup.is_renderable());

        // Dismissal signals exactly when the exit transition elapses.
        assert!(!popup.tick(t0 + ENTER_DURATION + Duration::from_millis(1)));
        assert!(popup.tick(t0 + ENTER_DURATION + EXIT_DURATION));
        assert!(popup.is_closed());
        assert!(!popup.is_renderable());
    }

    #[test]
    fn repeated_hides_signal_dismissal_once() {
        let t0 = Instant::now();
        let mut popup = shown(coupon_popup(), t0);

        popup.hide(t0 + Duration::from_secs(1));
        popup.hide(t0 + Duration::from_secs(1)); // double-click on close
        popup.handle_key(key(KeyCode::Esc), t0 + Duration::from_secs(1)); // Escape after click

        let mut dismissals = 0;
        for ms in 0..1_000 {
            if popup.tick(t0 + Duration::from_secs(1) + Duration::from_millis(ms)) {
                dismissals += 1;
            }
        }
        assert_eq!(dismissals, 1);
    }

    #[test]
    fn show_is_ignored_once_visible() {
        let t0 = Instant::now();
        let mut popup = shown(coupon_popup(), t0);
        popup.show(t0 + Duration::from_secs(2));
        assert!(matches!(popup.phase, Phase::Visible));
    }

    #[test]
    fn pending_popup_ignores_input() {
        let t0 = Instant::now();
        let mut popup = coupon_popup();
        assert!(!popup.handle_key(key(KeyCode::Esc), t0));
        assert!(matches!(popup.phase, Phase::Pending));
    }

    #[test]
    fn overlay_press_outside_container_closes() {
        let t0 = Instant::now();
        let mut popup = shown(coupon_popup(), t0);
        let area = Rect::new(0, 0, 120, 40);

        let press = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(popup.handle_mouse(&press, area, t0));
        assert!(!popup.is_open());
    }

    #[test]
    fn press_inside_container_is_consumed_without_closing() {
        let t0 = Instant::now();
        let mut popup = shown(coupon_popup(), t0);
        let area = Rect::new(0, 0, 120, 40);
        let frame = PopupFrame::compute(&popup.config, popup.position, area);

        let press = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: frame.title.x,
            row: frame.title.y,
            modifiers: KeyModifiers::NONE,
        };
        assert!(popup.handle_mouse(&press, area, t0));
        assert!(popup.is_open());
    }

    #[test]
    fn feedback_digit_submits_and_hides() {
        let t0 = Instant::now();
        let captured = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&captured);

        let popup = Popup::new(
            PopupConfig::new(
                "Rate us",
                PopupKind::Feedback {
                    kind: FeedbackKind::Stars,
                    on_submit: Some(Box::new(move |data| {
                        *sink.borrow_mut() = Some(data);
                    })),
                },
            ),
            Position::Center,
            "rate-us".to_string(),
        );
        let mut popup = shown(popup, t0);

        assert!(popup.handle_key(key(KeyCode::Char('4')), t0));
        assert_eq!(
            captured.borrow().clone(),
            Some(FeedbackData::Stars { value: 4 })
        );
        assert!(!popup.is_open());
    }

    #[test]
    fn feedback_out_of_range_digit_is_ignored() {
        let t0 = Instant::now();
        let popup = Popup::new(
            PopupConfig::new(
                "Rate us",
                PopupKind::Feedback {
                    kind: FeedbackKind::Thumbs,
                    on_submit: None,
                },
            ),
            Position::Center,
            "rate-us".to_string(),
        );
        let mut popup = shown(popup, t0);

        assert!(!popup.handle_key(key(KeyCode::Char('3')), t0));
        assert!(popup.is_open());
    }

    #[test]
    fn lead_submit_assembles_requested_fields_only() {
        let t0 = Instant::now();
        let captured = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&captured);

        let popup = Popup::new(
            PopupConfig::new(
                "Join us",
                PopupKind::LeadCapture {
                    fields: LeadFields {
                        email: true,
                        ..LeadFields::default()
                    },
                    button_label: None,
                    on_submit: Some(Box::new(move |data| {
                        *sink.borrow_mut() = Some(data);
                    })),
                },
            ),
            Position::Center,
            "join-us".to_string(),
        );
        let mut popup = shown(popup, t0);

        for c in "a@b.co".chars() {
            popup.handle_key(key(KeyCode::Char(c)), t0);
        }
        popup.handle_key(key(KeyCode::Enter), t0);

        let data = captured.borrow().clone().expect("submit hook fired");
        assert_eq!(data.email.as_deref(), Some("a@b.co"));
        assert!(data.name.is_none());
        assert!(data.phone.is_none());
        assert!(!popup.is_open());
    }

    #[test]
    fn copy_notice_expires_after_its_window() {
        let t0 = Instant::now();
        let mut popup = shown(coupon_popup(), t0);
        popup.copy_notice = Some((CopyNotice::Copied, t0 + COPY_FEEDBACK_DURATION));

        popup.tick(t0 + Duration::from_secs(1));
        assert!(popup.copy_notice.is_some());
        popup.tick(t0 + COPY_FEEDBACK_DURATION);
        assert!(popup.copy_notice.is_none());
    }

    #[test]
    fn render_draws_the_matching_variant_only() {
        let t0 = Instant::now();
        let popup = shown(
            coupon_popup(),
            t0,
        );

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| popup.render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Sale"));
        assert!(text.contains("SAVE20"));
        assert!(text.contains("Copy"));
        assert!(!text.contains("Your Email"));
        assert!(!text.contains("★"));
    }

    #[test]
    fn render_lead_form_builds_requested_inputs_only() {
        let t0 = Instant::now();
        let popup = Popup::new(
            PopupConfig::new(
                "Join us",
                PopupKind::LeadCapture {
                    fields: LeadFields {
                        email: true,
                        ..LeadFields::default()
                    },
                    button_label: None,
                    on_submit: None,
                },
            ),
            Position::Center,
            "join-us".to_string(),
        );
        let popup = shown(popup, t0);

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| popup.render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Your Email"));
        assert!(!text.contains("Your Name"));
        assert!(!text.contains("Your Phone"));
        assert!(text.contains("Send"));
    }

    #[test]
    fn render_feedback_draws_all_choices() {
        let t0 = Instant::now();
        let popup = Popup::new(
            PopupConfig::new(
                "Rate us",
                PopupKind::Feedback {
                    kind: FeedbackKind::Stars,
                    on_submit: None,
                },
            ),
            Position::Center,
            "rate-us".to_string(),
        );
        let popup = shown(popup, t0);

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| popup.render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);

        assert_eq!(text.matches('★').count(), 5);
    }

    #[test]
    fn pending_popup_renders_nothing() {
        let popup = coupon_popup();
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| popup.render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(!text.contains("SAVE20"));
    }

    #[test]
    fn config_with_trigger_still_constructs_pending() {
        let config = PopupConfig::new(
            "Sale",
            PopupKind::Coupon {
                code: "SAVE20".to_string(),
            },
        )
        .with_trigger(TriggerSpec::time(Duration::from_secs(3)));
        let popup = Popup::new(config, Position::Center, "sale".to_string());
        assert!(matches!(popup.phase, Phase::Pending));
    }
}
