//! Lead-capture popup body: bordered inputs and form state.
//!
//! The form only builds the inputs the config requested, and submission only
//! assembles those same fields — an unrequested field can never leak into
//! the captured record, whatever the surface contained.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Text,
    widgets::{Block, Borders, Paragraph},
    symbols::border,
};

use crate::domain::{LeadData, LeadField, LeadFields};
use crate::theme::{BUTTON_STYLE, FIELD_BORDER_STYLE, FOCUSED_FIELD_BORDER_STYLE};

// ============================================================================
// Form State
// ============================================================================

/// Interactive state of a lead-capture form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFormState {
    entries: Vec<(LeadField, String)>,
    focused: usize,
}

impl LeadFormState {
    /// Builds form state with one entry per requested field.
    #[must_use]
    pub fn new(fields: LeadFields) -> Self {
        Self {
            entries: fields
                .enabled()
                .into_iter()
                .map(|field| (field, String::new()))
                .collect(),
            focused: 0,
        }
    }

    /// Returns the currently focused field, if the form has any inputs.
    #[must_use]
    pub fn focused_field(&self) -> Option<LeadField> {
        self.entries.get(self.focused).map(|(field, _)| *field)
    }

    /// Returns the entered value for a field the form carries.
    #[must_use]
    pub fn value(&self, field: LeadField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value.as_str())
    }

    /// Appends a character to the focused input.
    pub fn type_char(&mut self, c: char) {
        if let Some((_, value)) = self.entries.get_mut(self.focused) {
            value.push(c);
        }
    }

    /// Removes the last character from the focused input.
    pub fn backspace(&mut self) {
        if let Some((_, value)) = self.entries.get_mut(self.focused) {
            value.pop();
        }
    }

    /// Moves focus to the next input, wrapping.
    pub fn focus_next(&mut self) {
        if !self.entries.is_empty() {
            self.focused = (self.focused + 1) % self.entries.len();
        }
    }

    /// Moves focus to the previous input, wrapping.
    pub fn focus_prev(&mut self) {
        if !self.entries.is_empty() {
            self.focused = (self.focused + self.entries.len() - 1) % self.entries.len();
        }
    }

    /// Focuses the input at `index` in render order; out-of-range is a no-op.
    pub fn set_focus(&mut self, index: usize) {
        if index < self.entries.len() {
            self.focused = index;
        }
    }

    /// Assembles the submission record from the requested fields only.
    #[must_use]
    pub fn assemble(&self, requested: LeadFields) -> LeadData {
        LeadData {
            name: requested
                .name
                .then(|| self.value(LeadField::Name).unwrap_or_default().to_string()),
            email: requested
                .email
                .then(|| self.value(LeadField::Email).unwrap_or_default().to_string()),
            phone: requested
                .phone
                .then(|| self.value(LeadField::Phone).unwrap_or_default().to_string()),
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders the form inputs and submit button into their frame rects.
pub fn render(
    frame: &mut Frame,
    fields: &[(LeadField, Rect)],
    submit: Rect,
    submit_label: &str,
    form: &LeadFormState,
) {
    for (field, rect) in fields {
        let is_focused = form.focused_field() == Some(*field);
        let border_style = if is_focused {
            FOCUSED_FIELD_BORDER_STYLE
        } else {
            FIELD_BORDER_STYLE
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(border_style)
            .title(format!(" {} ", field.label()));
        let inner = block.inner(*rect);
        frame.render_widget(block, *rect);

        let value = form.value(*field).unwrap_or_default();
        let display = if is_focused {
            format!("{value}\u{2588}")
        } else {
            value.to_string()
        };
        frame.render_widget(
            Paragraph::new(Text::from(display)).alignment(Alignment::Left),
            inner,
        );
    }

    let button = Paragraph::new(format!(" {submit_label} "))
        .style(BUTTON_STYLE)
        .alignment(Alignment::Center);
    frame.render_widget(button, submit);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL_ONLY: LeadFields = LeadFields {
        name: false,
        email: true,
        phone: false,
    };

    const ALL_FIELDS: LeadFields = LeadFields {
        name: true,
        email: true,
        phone: true,
    };

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = LeadFormState::new(ALL_FIELDS);
        assert_eq!(form.focused_field(), Some(LeadField::Name));

        form.type_char('a');
        form.focus_next();
        form.type_char('b');
        form.type_char('c');
        form.backspace();

        assert_eq!(form.value(LeadField::Name), Some("a"));
        assert_eq!(form.value(LeadField::Email), Some("b"));
        assert_eq!(form.value(LeadField::Phone), Some(""));
    }

    #[test]
    fn focus_wraps_both_directions() {
        let mut form = LeadFormState::new(ALL_FIELDS);
        form.focus_prev();
        assert_eq!(form.focused_field(), Some(LeadField::Phone));
        form.focus_next();
        assert_eq!(form.focused_field(), Some(LeadField::Name));
    }

    #[test]
    fn assemble_contains_only_requested_fields() {
        let mut form = LeadFormState::new(EMAIL_ONLY);
        for c in "a@b.co".chars() {
            form.type_char(c);
        }

        let data = form.assemble(EMAIL_ONLY);
        assert_eq!(data.email.as_deref(), Some("a@b.co"));
        assert!(data.name.is_none());
        assert!(data.phone.is_none());
    }

    #[test]
    fn assemble_keeps_requested_empty_fields_present() {
        let form = LeadFormState::new(ALL_FIELDS);
        let data = form.assemble(ALL_FIELDS);
        assert_eq!(data.name.as_deref(), Some(""));
        assert_eq!(data.email.as_deref(), Some(""));
        assert_eq!(data.phone.as_deref(), Some(""));
    }

    #[test]
    fn empty_form_is_inert() {
        let mut form = LeadFormState::new(LeadFields::default());
        assert_eq!(form.focused_field(), None);
        form.type_char('x');
        form.focus_next();
        form.backspace();
        assert_eq!(form.assemble(LeadFields::default()), LeadData::default());
    }
}
