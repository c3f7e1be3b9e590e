//! Domain model for the popup engine.
//!
//! Plain data types shared by the manager, the popup runtime, and the
//! renderers: popup configurations, trigger specifications, and the
//! records produced by user interaction.

pub mod popup;
pub mod trigger;

pub use popup::{
    CloseHook, DEFAULT_SUBMIT_LABEL, EMOJI_CHOICES, FeedbackData, FeedbackHook, FeedbackKind,
    LeadData, LeadField, LeadFields, LeadHook, PopupConfig, PopupKind, Position, THUMBS_CHOICES,
    derive_popup_id,
};
pub use trigger::{ScrollMetrics, TriggerSpec, TriggerWatcher};
