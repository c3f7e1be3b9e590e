//! Popup rendering.
//!
//! The shared chrome (container, close control, artwork strip, title, text,
//! help line) renders here; the variant body renders in exactly one of the
//! four submodules, dispatched by the popup runtime on the config kind.

pub mod call_to_action;
pub mod coupon;
pub mod feedback;
pub mod lead_form;

use ratatui::{
    Frame,
    layout::Alignment,
    symbols::border,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::domain::PopupConfig;
use crate::theme::{CLOSE_STYLE, MUTED_COLOR, POPUP_BORDER_STYLE, TITLE_STYLE};
use crate::ui::layout::PopupFrame;

pub use lead_form::LeadFormState;

/// Renders the container and the shared header/help rows.
pub fn render_chrome(
    frame: &mut Frame,
    popup_frame: &PopupFrame,
    config: &PopupConfig,
    help: &str,
) {
    frame.render_widget(Clear, popup_frame.container);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(POPUP_BORDER_STYLE);
    frame.render_widget(block, popup_frame.container);

    frame.render_widget(
        Paragraph::new("[×]").style(CLOSE_STYLE),
        popup_frame.close,
    );

    if let (Some(rect), Some(image)) = (popup_frame.image, config.image.as_deref()) {
        let strip = Paragraph::new(format!("⟦ {image} ⟧"))
            .style(ratatui::style::Style::default().fg(MUTED_COLOR))
            .alignment(Alignment::Center);
        frame.render_widget(strip, rect);
    }

    let title = Paragraph::new(config.title.as_str())
        .style(TITLE_STYLE)
        .alignment(Alignment::Center);
    frame.render_widget(title, popup_frame.title);

    if let (Some(rect), Some(text)) = (popup_frame.text, config.text.as_deref()) {
        let body = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(body, rect);
    }

    let help_line = Paragraph::new(help)
        .style(ratatui::style::Style::default().fg(MUTED_COLOR))
        .alignment(Alignment::Center);
    frame.render_widget(help_line, popup_frame.help);
}
