//! Popup layout resolution.
//!
//! [`PopupFrame::compute`] turns a config, a resolved position, and the host
//! area into every rect the popup occupies: container, close control, shared
//! header rows, and the variant-specific body controls. Rendering and mouse
//! hit-testing both consume the same frame, so what is drawn is exactly what
//! is clickable.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::domain::{
    DEFAULT_SUBMIT_LABEL, LeadField, PopupConfig, PopupKind, Position,
};

// ============================================================================
// Dimension Constants
// ============================================================================

/// Width of centered and corner popups, in columns.
pub const POPUP_WIDTH: u16 = 46;

/// Padding between corner popups and the host area edges.
pub const CORNER_PADDING: u16 = 2;

/// Width of the close control on the top border row.
pub const CLOSE_WIDTH: u16 = 3;

/// Rows reserved for body text when present.
const TEXT_ROWS: u16 = 2;

/// Rows of one bordered form/code field.
const FIELD_ROWS: u16 = 3;

/// Cell width of one feedback choice.
const CHOICE_WIDTH: u16 = 4;

/// Gap between feedback choices.
const CHOICE_GAP: u16 = 1;

/// Width of the coupon copy button.
const COPY_BUTTON_WIDTH: u16 = 10;

// ============================================================================
// Frame Types
// ============================================================================

/// Every rect a rendered popup occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupFrame {
    /// The bordered container.
    pub container: Rect,
    /// Close control on the top border row.
    pub close: Rect,
    /// Artwork banner strip, when the config carries an image reference.
    pub image: Option<Rect>,
    /// Title row.
    pub title: Rect,
    /// Body text rows, when the config carries text.
    pub text: Option<Rect>,
    /// Variant-specific controls.
    pub body: BodyFrame,
    /// Help line at the bottom of the container.
    pub help: Rect,
}

/// Variant-specific control rects. Exactly one variant per config kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyFrame {
    /// Coupon: read-only code field, copy button, transient notice line.
    Coupon {
        /// Bordered read-only code field.
        code: Rect,
        /// Copy action button.
        copy_button: Rect,
        /// Transient success/failure message area.
        notice: Rect,
    },
    /// Call-to-action: the single action button.
    CallToAction {
        /// Action button.
        button: Rect,
    },
    /// Lead capture: one bordered input per requested field plus submit.
    LeadCapture {
        /// Requested inputs in render order.
        fields: Vec<(LeadField, Rect)>,
        /// Submit button.
        submit: Rect,
    },
    /// Feedback: one cell per rating control.
    Feedback {
        /// Choice cells in value order.
        choices: Vec<Rect>,
    },
}

impl PopupFrame {
    /// Computes the frame for a config at a position within the host area.
    #[must_use]
    pub fn compute(config: &PopupConfig, position: Position, area: Rect) -> Self {
        let width = match position {
            Position::TopBanner | Position::BottomBanner => area.width,
            _ => POPUP_WIDTH.min(area.width),
        };

        let has_image = config.image.is_some();
        let has_text = config.text.is_some();
        let body_height = body_height(&config.kind);
        // image + title + optional text + spacer + body + help, inside borders
        let inner_height = u16::from(has_image)
            + 1
            + if has_text { TEXT_ROWS } else { 0 }
            + 1
            + body_height
            + 1;
        let height = (inner_height + 2).min(area.height);

        let container = place_container(position, area, width, height);
        let close = Rect::new(
            (container.x + container.width).saturating_sub(CLOSE_WIDTH + 1),
            container.y,
            CLOSE_WIDTH,
            1,
        );

        let inner = Rect::new(
            container.x + 1,
            container.y + 1,
            container.width.saturating_sub(2),
            container.height.saturating_sub(2),
        );

        let mut y = inner.y;
        let image = has_image.then(|| {
            let rect = Rect::new(inner.x, y, inner.width, 1);
            y += 1;
            rect
        });
        let title = Rect::new(inner.x, y, inner.width, 1);
        y += 1;
        let text = has_text.then(|| {
            let rect = Rect::new(inner.x, y, inner.width, TEXT_ROWS);
            y += TEXT_ROWS;
            rect
        });
        y += 1; // spacer

        let body_area = Rect::new(inner.x, y, inner.width, body_height);
        let body = compute_body(&config.kind, body_area);

        let help = Rect::new(
            inner.x,
            (inner.y + inner.height).saturating_sub(1),
            inner.width,
            1,
        );

        Self {
            container,
            close,
            image,
            title,
            text,
            body,
            help,
        }
    }

    /// Returns `true` if the cell at `(column, row)` lies inside the
    /// container.
    #[must_use]
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.container
            .contains(ratatui::layout::Position::new(column, row))
    }
}

// ============================================================================
// Placement
// ============================================================================

fn place_container(position: Position, area: Rect, width: u16, height: u16) -> Rect {
    match position {
        Position::Center => centered_rect(area, width, height),
        Position::BottomRight => Rect::new(
            (area.x + area.width).saturating_sub(width + CORNER_PADDING),
            (area.y + area.height).saturating_sub(height + CORNER_PADDING),
            width,
            height,
        ),
        Position::BottomLeft => Rect::new(
            area.x + CORNER_PADDING.min(area.width.saturating_sub(width)),
            (area.y + area.height).saturating_sub(height + CORNER_PADDING),
            width,
            height,
        ),
        Position::TopBanner => Rect::new(area.x, area.y, width, height),
        Position::BottomBanner => Rect::new(
            area.x,
            (area.y + area.height).saturating_sub(height),
            width,
            height,
        ),
    }
}

/// Creates a centered fixed-size rect within the given area.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

// ============================================================================
// Body Layout
// ============================================================================

fn body_height(kind: &PopupKind) -> u16 {
    match kind {
        PopupKind::Coupon { .. } => FIELD_ROWS + 1,
        PopupKind::CallToAction { .. } | PopupKind::Feedback { .. } => 1,
        PopupKind::LeadCapture { fields, .. } => {
            let count = u16::try_from(fields.count()).unwrap_or(3);
            count * FIELD_ROWS + 1
        }
    }
}

fn compute_body(kind: &PopupKind, area: Rect) -> BodyFrame {
    match kind {
        PopupKind::Coupon { .. } => {
            let code = Rect::new(area.x, area.y, area.width, FIELD_ROWS);
            let action_y = area.y + FIELD_ROWS;
            let copy_button = Rect::new(
                area.x,
                action_y,
                COPY_BUTTON_WIDTH.min(area.width),
                1,
            );
            let notice = Rect::new(
                area.x + COPY_BUTTON_WIDTH + 1,
                action_y,
                area.width.saturating_sub(COPY_BUTTON_WIDTH + 1),
                1,
            );
            BodyFrame::Coupon {
                code,
                copy_button,
                notice,
            }
        }
        PopupKind::CallToAction { button_label, .. } => BodyFrame::CallToAction {
            button: centered_button(area, area.y, button_label),
        },
        PopupKind::LeadCapture {
            fields,
            button_label,
            ..
        } => {
            let mut rects = Vec::new();
            let mut y = area.y;
            for field in fields.enabled() {
                rects.push((field, Rect::new(area.x, y, area.width, FIELD_ROWS)));
                y += FIELD_ROWS;
            }
            let label = button_label.as_deref().unwrap_or(DEFAULT_SUBMIT_LABEL);
            BodyFrame::LeadCapture {
                fields: rects,
                submit: centered_button(area, y, label),
            }
        }
        PopupKind::Feedback { kind, .. } => {
            let count = u16::try_from(kind.choice_count()).unwrap_or(5);
            let total = count * CHOICE_WIDTH + count.saturating_sub(1) * CHOICE_GAP;
            let start = area.x + area.width.saturating_sub(total) / 2;
            let choices = (0..count)
                .map(|i| Rect::new(start + i * (CHOICE_WIDTH + CHOICE_GAP), area.y, CHOICE_WIDTH, 1))
                .collect();
            BodyFrame::Feedback { choices }
        }
    }
}

fn centered_button(area: Rect, y: u16, label: &str) -> Rect {
    let width = u16::try_from(label.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    Rect::new(x, y, width, 1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedbackKind, LeadFields};

    fn coupon_config() -> PopupConfig {
        PopupConfig::new(
            "Sale",
            PopupKind::Coupon {
                code: "SAVE20".to_string(),
            },
        )
    }

    fn area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn container_placement_variants() {
        struct TestCase {
            name: &'static str,
            position: Position,
            full_width: bool,
            at_top: bool,
            at_bottom: bool,
        }

        let cases = [
            TestCase {
                name: "center",
                position: Position::Center,
                full_width: false,
                at_top: false,
                at_bottom: false,
            },
            TestCase {
                name: "top banner",
                position: Position::TopBanner,
                full_width: true,
                at_top: true,
                at_bottom: false,
            },
            TestCase {
                name: "bottom banner",
                position: Position::BottomBanner,
                full_width: true,
                at_top: false,
                at_bottom: true,
            },
        ];

        for case in &cases {
            let frame = PopupFrame::compute(&coupon_config(), case.position, area());
            let container = frame.container;

            assert!(
                container.x + container.width <= area().width,
                "{}: x bounds",
                case.name
            );
            assert!(
                container.y + container.height <= area().height,
                "{}: y bounds",
                case.name
            );
            if case.full_width {
                assert_eq!(container.width, area().width, "{}: width", case.name);
            } else {
                assert_eq!(container.width, POPUP_WIDTH, "{}: width", case.name);
            }
            if case.at_top {
                assert_eq!(container.y, 0, "{}: top", case.name);
            }
            if case.at_bottom {
                assert_eq!(
                    container.y + container.height,
                    area().height,
                    "{}: bottom",
                    case.name
                );
            }
        }
    }

    #[test]
    fn corner_popups_keep_edge_padding() {
        let right = PopupFrame::compute(&coupon_config(), Position::BottomRight, area()).container;
        assert_eq!(right.x + right.width + CORNER_PADDING, area().width);
        assert_eq!(right.y + right.height + CORNER_PADDING, area().height);

        let left = PopupFrame::compute(&coupon_config(), Position::BottomLeft, area()).container;
        assert_eq!(left.x, CORNER_PADDING);
    }

    #[test]
    fn close_control_sits_on_top_border_inside_container() {
        let frame = PopupFrame::compute(&coupon_config(), Position::Center, area());
        assert_eq!(frame.close.y, frame.container.y);
        assert_eq!(frame.close.height, 1);
        assert!(frame.close.x > frame.container.x);
        assert!(frame.close.x + frame.close.width < frame.container.x + frame.container.width);
    }

    #[test]
    fn body_frame_matches_kind() {
        let coupon = PopupFrame::compute(&coupon_config(), Position::Center, area());
        assert!(matches!(coupon.body, BodyFrame::Coupon { .. }));

        let cta = PopupConfig::new(
            "Visit",
            PopupKind::CallToAction {
                button_label: "Go".to_string(),
                target_url: "https://example.com".to_string(),
            },
        );
        let cta = PopupFrame::compute(&cta, Position::Center, area());
        assert!(matches!(cta.body, BodyFrame::CallToAction { .. }));

        let lead = PopupConfig::new(
            "Join",
            PopupKind::LeadCapture {
                fields: LeadFields {
                    email: true,
                    ..LeadFields::default()
                },
                button_label: None,
                on_submit: None,
            },
        );
        let lead = PopupFrame::compute(&lead, Position::Center, area());
        match lead.body {
            BodyFrame::LeadCapture { fields, .. } => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].0, LeadField::Email);
            }
            other => panic!("expected lead capture body, got {other:?}"),
        }

        let feedback = PopupConfig::new(
            "Rate",
            PopupKind::Feedback {
                kind: FeedbackKind::Stars,
                on_submit: None,
            },
        );
        let feedback = PopupFrame::compute(&feedback, Position::Center, area());
        match feedback.body {
            BodyFrame::Feedback { choices } => assert_eq!(choices.len(), 5),
            other => panic!("expected feedback body, got {other:?}"),
        }
    }

    #[test]
    fn optional_rows_reserved_only_when_configured() {
        let bare = PopupFrame::compute(&coupon_config(), Position::Center, area());
        assert!(bare.image.is_none());
        assert!(bare.text.is_none());

        let full = coupon_config()
            .with_text("Limited time offer")
            .with_image("sale-art");
        let full = PopupFrame::compute(&full, Position::Center, area());
        assert!(full.image.is_some());
        assert!(full.text.is_some());
        assert!(full.container.height > bare.container.height);
    }

    #[test]
    fn contains_tracks_container() {
        let frame = PopupFrame::compute(&coupon_config(), Position::Center, area());
        let inside = (
            frame.container.x + 1,
            frame.container.y + 1,
        );
        assert!(frame.contains(inside.0, inside.1));
        assert!(!frame.contains(0, 0));
    }
}
