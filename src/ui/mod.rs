//! Rendering layer: layout resolution and the popup renderers.

pub mod layout;
pub mod popups;

pub use layout::{BodyFrame, PopupFrame};
pub use popups::LeadFormState;
