//! popkit — popup and modal overlays for ratatui terminal applications.
//!
//! The engine renders one of four popup variants — coupon, call-to-action,
//! lead-capture form, feedback rating — inside a host TUI, wires close and
//! trigger interactions, and throttles repeat display through a persisted
//! frequency cap.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Manager                         │
//! ├────────────────┬────────────────┬────────────────────┤
//! │  frequency cap │ active Popup   │  trigger watchers  │
//! │  (DisplayStore)│ (+ retiring)   │  (one-shot)        │
//! └────────────────┴────────────────┴────────────────────┘
//! ```
//!
//! The host drives the manager from its event loop: `handle_key`,
//! `handle_mouse`, `update_scroll`, `tick(now)`, and `render(frame, area)`.
//! Everything runs single-threaded on that loop.
//!
//! # Example
//!
//! ```ignore
//! use popkit::{Manager, ManagerSettings, PopupConfig, PopupKind, TriggerSpec};
//!
//! let mut manager = Manager::new(ManagerSettings::default());
//! manager.show(
//!     PopupConfig::new("Summer Sale", PopupKind::Coupon { code: "SAVE20".into() })
//!         .with_trigger(TriggerSpec::scroll(50.0)),
//! );
//! ```

pub mod constants;
pub mod domain;
pub mod manager;
pub mod popup;
pub mod state;
pub mod theme;
pub mod tui;
pub mod ui;

pub use domain::{
    CloseHook, FeedbackData, FeedbackHook, FeedbackKind, LeadData, LeadField, LeadFields,
    LeadHook, PopupConfig, PopupKind, Position, ScrollMetrics, TriggerSpec, derive_popup_id,
};
pub use manager::{Manager, ManagerSettings, Outcome};
pub use popup::Popup;
pub use state::{DeviceClass, DisplayRecord, DisplayStore, JsonFileStore, MemoryStore, StoreError};
