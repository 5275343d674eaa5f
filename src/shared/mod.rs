//! Geteilte Typen für layer-übergreifende Verträge.

pub mod options;

pub use options::{FarAttachMode, InteractionOptions};
pub use options::{ATTACH_EASE_SPEED, DEFAULT_FAR_CAST_LENGTH, DEFAULT_NEAR_RADIUS};
