//! Call-to-action popup body: a single action button.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    widgets::Paragraph,
};

use crate::theme::BUTTON_STYLE;

/// Renders the action button into its frame rect.
pub fn render(frame: &mut Frame, button: Rect, label: &str) {
    let widget = Paragraph::new(format!(" {label} "))
        .style(BUTTON_STYLE)
        .alignment(Alignment::Center);
    frame.render_widget(widget, button);
}
