//! Platform capability seams: clipboard access and device classification.

pub mod clipboard;
pub mod device;

pub use clipboard::{ClipboardError, copy_text};
pub use device::DeviceClass;
