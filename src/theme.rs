//! Shared palette and style constants for popup rendering.
//!
//! Every renderer pulls from this module so all popup variants stay visually
//! consistent. This is the single restyling point for hosts that fork the
//! default look.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Color Constants
// ============================================================================

/// Primary accent color for popup borders and highlights.
pub const PRIMARY_COLOR: Color = Color::Cyan;

/// Success indicator color (copy confirmation, submitted forms).
pub const SUCCESS_COLOR: Color = Color::Green;

/// Error indicator color (copy failure).
pub const ERROR_COLOR: Color = Color::Red;

/// Emphasis color (coupon codes, star ratings).
pub const ACCENT_COLOR: Color = Color::Yellow;

/// Muted text color for help lines and placeholders.
pub const MUTED_COLOR: Color = Color::Gray;

// ============================================================================
// Style Constants
// ============================================================================

/// Border style for the popup container.
pub const POPUP_BORDER_STYLE: Style = Style::new().fg(PRIMARY_COLOR);

/// Border style for unfocused form fields.
pub const FIELD_BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Border style for the focused form field.
pub const FOCUSED_FIELD_BORDER_STYLE: Style = Style::new().fg(Color::Blue);

/// Style for the popup title line.
pub const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

/// Style for action buttons (call-to-action, copy, submit).
pub const BUTTON_STYLE: Style = Style::new().bg(Color::Blue).fg(Color::White);

/// Style for the close control in the top-right corner.
pub const CLOSE_STYLE: Style = Style::new().fg(MUTED_COLOR);

/// Style applied on top of content while a popup is entering or exiting.
pub const TRANSITION_STYLE: Style = Style::new().add_modifier(Modifier::DIM);
