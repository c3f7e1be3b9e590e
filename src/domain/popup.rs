//! Popup configuration model.
//!
//! A [`PopupConfig`] carries the fields shared by every popup (title, body
//! text, artwork reference, position, trigger, close hook) plus a
//! [`PopupKind`] describing which of the four variants to render. The kind is
//! a sum type so every renderer and input handler dispatches with an
//! exhaustive `match` — a config can never reach zero or two renderers.

use std::fmt;

use crate::domain::trigger::TriggerSpec;

// ============================================================================
// Hooks
// ============================================================================

/// Hook invoked exactly once when a popup finishes its hide transition.
pub type CloseHook = Box<dyn FnMut()>;

/// Hook invoked with the captured form record when a lead form submits.
pub type LeadHook = Box<dyn FnMut(LeadData)>;

/// Hook invoked with the chosen rating when a feedback control activates.
pub type FeedbackHook = Box<dyn FnMut(FeedbackData)>;

// ============================================================================
// Position
// ============================================================================

/// Where the popup container is anchored within the host area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Centered in the host area.
    #[default]
    Center,
    /// Anchored to the bottom-right corner.
    BottomRight,
    /// Anchored to the bottom-left corner.
    BottomLeft,
    /// Full-width banner along the top edge.
    TopBanner,
    /// Full-width banner along the bottom edge.
    BottomBanner,
}

impl Position {
    /// Returns the position name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopBanner => "top-banner",
            Self::BottomBanner => "bottom-banner",
        }
    }
}

// ============================================================================
// Lead Capture
// ============================================================================

/// Field-selection flags for the lead-capture form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadFields {
    /// Include a name input.
    pub name: bool,
    /// Include an email input.
    pub email: bool,
    /// Include a phone input.
    pub phone: bool,
}

impl LeadFields {
    /// Returns the enabled fields in render order.
    #[must_use]
    pub fn enabled(self) -> Vec<LeadField> {
        let mut fields = Vec::with_capacity(3);
        if self.name {
            fields.push(LeadField::Name);
        }
        if self.email {
            fields.push(LeadField::Email);
        }
        if self.phone {
            fields.push(LeadField::Phone);
        }
        fields
    }

    /// Returns the number of enabled fields.
    #[must_use]
    pub fn count(self) -> usize {
        usize::from(self.name) + usize::from(self.email) + usize::from(self.phone)
    }
}

/// One input of the lead-capture form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    /// Free-form name input.
    Name,
    /// Email input.
    Email,
    /// Phone/WhatsApp input.
    Phone,
}

impl LeadField {
    /// Returns the field label shown as the input title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Your Name",
            Self::Email => "Your Email",
            Self::Phone => "Your Phone/WhatsApp",
        }
    }
}

/// Captured lead-capture submission.
///
/// Only fields that were requested by the config are populated; everything
/// else stays `None` regardless of what the form surface contained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadData {
    /// Captured name, if the config requested one.
    pub name: Option<String>,
    /// Captured email, if the config requested one.
    pub email: Option<String>,
    /// Captured phone, if the config requested one.
    pub phone: Option<String>,
}

/// Fallback label for the lead-capture submit button.
pub const DEFAULT_SUBMIT_LABEL: &str = "Send";

// ============================================================================
// Feedback
// ============================================================================

/// Glyphs offered by the emoji feedback modality.
pub const EMOJI_CHOICES: [&str; 3] = ["😠", "😐", "😊"];

/// Glyphs offered by the thumbs feedback modality.
pub const THUMBS_CHOICES: [&str; 2] = ["👍", "👎"];

/// Which fixed control set a feedback popup renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// 5-way star rating.
    Stars,
    /// 3-way emoji choice.
    Emoji,
    /// 2-way thumbs choice.
    Thumbs,
}

impl FeedbackKind {
    /// Returns how many controls this modality offers.
    #[must_use]
    pub const fn choice_count(self) -> usize {
        match self {
            Self::Stars => 5,
            Self::Emoji => EMOJI_CHOICES.len(),
            Self::Thumbs => THUMBS_CHOICES.len(),
        }
    }

    /// Builds the submission record for the control at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..choice_count()`; callers produce the
    /// index from the same modality so this cannot happen in routing code.
    #[must_use]
    pub fn choice(self, index: usize) -> FeedbackData {
        match self {
            Self::Stars => FeedbackData::Stars {
                value: u8::try_from(index + 1).expect("star index fits in u8"),
            },
            Self::Emoji => FeedbackData::Emoji {
                value: EMOJI_CHOICES[index].to_string(),
            },
            Self::Thumbs => FeedbackData::Thumbs {
                value: THUMBS_CHOICES[index].to_string(),
            },
        }
    }
}

/// A feedback submission: the modality together with the chosen value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackData {
    /// Star rating, 1 through 5.
    Stars {
        /// Number of stars chosen.
        value: u8,
    },
    /// Chosen emoji glyph.
    Emoji {
        /// The glyph itself.
        value: String,
    },
    /// Chosen thumb glyph.
    Thumbs {
        /// The glyph itself.
        value: String,
    },
}

impl FeedbackData {
    /// Returns the modality this submission came from.
    #[must_use]
    pub const fn kind(&self) -> FeedbackKind {
        match self {
            Self::Stars { .. } => FeedbackKind::Stars,
            Self::Emoji { .. } => FeedbackKind::Emoji,
            Self::Thumbs { .. } => FeedbackKind::Thumbs,
        }
    }
}

// ============================================================================
// Popup Kind
// ============================================================================

/// The variant-specific part of a popup configuration.
pub enum PopupKind {
    /// Read-only coupon code with a copy action.
    Coupon {
        /// The code offered to the user.
        code: String,
    },
    /// Single action button that launches a target and closes.
    CallToAction {
        /// Button caption.
        button_label: String,
        /// Target handed to the platform opener.
        target_url: String,
    },
    /// Form capturing a subset of {name, email, phone}.
    LeadCapture {
        /// Which inputs to build.
        fields: LeadFields,
        /// Submit button caption; defaults to [`DEFAULT_SUBMIT_LABEL`].
        button_label: Option<String>,
        /// Submission hook.
        on_submit: Option<LeadHook>,
    },
    /// One-shot rating controls.
    Feedback {
        /// Which control set to render.
        kind: FeedbackKind,
        /// Submission hook.
        on_submit: Option<FeedbackHook>,
    },
}

impl PopupKind {
    /// Returns the variant name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Coupon { .. } => "coupon",
            Self::CallToAction { .. } => "call-to-action",
            Self::LeadCapture { .. } => "lead-capture",
            Self::Feedback { .. } => "feedback",
        }
    }
}

impl fmt::Debug for PopupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coupon { code } => f.debug_struct("Coupon").field("code", code).finish(),
            Self::CallToAction {
                button_label,
                target_url,
            } => f
                .debug_struct("CallToAction")
                .field("button_label", button_label)
                .field("target_url", target_url)
                .finish(),
            Self::LeadCapture {
                fields,
                button_label,
                on_submit,
            } => f
                .debug_struct("LeadCapture")
                .field("fields", fields)
                .field("button_label", button_label)
                .field("on_submit", &on_submit.is_some())
                .finish(),
            Self::Feedback { kind, on_submit } => f
                .debug_struct("Feedback")
                .field("kind", kind)
                .field("on_submit", &on_submit.is_some())
                .finish(),
        }
    }
}

// ============================================================================
// Popup Config
// ============================================================================

/// Complete configuration for one popup invocation.
///
/// Immutable once handed to the manager; built with the `with_*` helpers.
pub struct PopupConfig {
    /// Title line; also the source of the derived popup id.
    pub title: String,
    /// Optional body text under the title.
    pub text: Option<String>,
    /// Optional artwork reference rendered as a banner strip.
    pub image: Option<String>,
    /// Requested position; falls back to the manager default.
    pub position: Option<Position>,
    /// Optional display trigger; absent means show immediately.
    pub trigger: Option<TriggerSpec>,
    /// Hook fired once the popup finishes hiding.
    pub on_close: Option<CloseHook>,
    /// Variant-specific content.
    pub kind: PopupKind,
}

impl PopupConfig {
    /// Creates a config with the given title and kind; everything else unset.
    #[must_use]
    pub fn new(title: impl Into<String>, kind: PopupKind) -> Self {
        Self {
            title: title.into(),
            text: None,
            image: None,
            position: None,
            trigger: None,
            on_close: None,
            kind,
        }
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the artwork reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets an explicit position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Defers display behind the given trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerSpec) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Registers the close hook.
    #[must_use]
    pub fn with_on_close(mut self, hook: CloseHook) -> Self {
        self.on_close = Some(hook);
        self
    }
}

impl fmt::Debug for PopupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupConfig")
            .field("title", &self.title)
            .field("text", &self.text)
            .field("image", &self.image)
            .field("position", &self.position)
            .field("trigger", &self.trigger)
            .field("on_close", &self.on_close.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

// ============================================================================
// Popup Id
// ============================================================================

/// Derives the frequency-cap identifier from a popup title.
///
/// Lowercases the title and collapses every whitespace run into a single
/// hyphen, including leading and trailing runs. Distinct titles can collide
/// after normalization and then share one frequency-cap slot; that is
/// accepted behavior, not corrected here.
#[must_use]
pub fn derive_popup_id(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('-');
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            id.extend(c.to_lowercase());
        }
    }
    id
}

// ============================================================================
// Tests
// ============================================================================
