//! Coupon popup body: read-only code field, copy button, transient notice.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::border,
    widgets::{Block, Borders, Paragraph},
};

use crate::theme::{ACCENT_COLOR, BUTTON_STYLE, ERROR_COLOR, FIELD_BORDER_STYLE, SUCCESS_COLOR};

/// Transient outcome of the last copy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyNotice {
    /// The code reached the clipboard.
    Copied,
    /// The clipboard rejected the write.
    Failed,
}

impl CopyNotice {
    /// Returns the message shown on the notice line.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Copied => "Copied!",
            Self::Failed => "Copy failed",
        }
    }
}

/// Renders the coupon body into its frame rects.
pub fn render(
    frame: &mut Frame,
    code_rect: Rect,
    copy_button: Rect,
    notice_rect: Rect,
    code: &str,
    notice: Option<CopyNotice>,
) {
    let field = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(FIELD_BORDER_STYLE)
        .title(" Code ");
    let inner = field.inner(code_rect);
    frame.render_widget(field, code_rect);

    let display = Paragraph::new(code)
        .style(
            Style::default()
                .fg(ACCENT_COLOR)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(display, inner);

    let button = Paragraph::new("[ Copy ]")
        .style(BUTTON_STYLE)
        .alignment(Alignment::Center);
    frame.render_widget(button, copy_button);

    if let Some(notice) = notice {
        let style = match notice {
            CopyNotice::Copied => Style::default().fg(SUCCESS_COLOR),
            CopyNotice::Failed => Style::default().fg(ERROR_COLOR),
        };
        let message = Paragraph::new(notice.message()).style(style);
        frame.render_widget(message, notice_rect);
    }
}
