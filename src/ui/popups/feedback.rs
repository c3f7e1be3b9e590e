//! Feedback popup body: one of three fixed rating control sets.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::domain::{EMOJI_CHOICES, FeedbackKind, THUMBS_CHOICES};
use crate::theme::ACCENT_COLOR;

/// Renders the rating controls into their frame rects.
pub fn render(frame: &mut Frame, choices: &[Rect], kind: FeedbackKind) {
    for (index, rect) in choices.iter().enumerate() {
        let glyph = match kind {
            FeedbackKind::Stars => "★",
            FeedbackKind::Emoji => EMOJI_CHOICES.get(index).copied().unwrap_or_default(),
            FeedbackKind::Thumbs => THUMBS_CHOICES.get(index).copied().unwrap_or_default(),
        };
        let style = match kind {
            FeedbackKind::Stars => Style::default().fg(ACCENT_COLOR),
            _ => Style::default(),
        };
        frame.render_widget(
            Paragraph::new(glyph).style(style).alignment(Alignment::Center),
            *rect,
        );
    }
}
