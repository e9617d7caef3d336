//! # Controller Module
//!
//! Turntable input handling.
//!
//! This module handles:
//! - Input device listing and selection via evdev
//! - Mapping axis letters (X, Y, Z, R, U, V) to evdev axes
//! - Polling the selected axis and rescaling it onto the 16-bit circle

pub mod axis;
pub mod source;
pub mod turntable;

pub use axis::AxisSelector;
pub use source::AxisSource;
pub use turntable::TurntableDevice;
