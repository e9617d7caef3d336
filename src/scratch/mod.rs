//! # Scratch Module
//!
//! Turntable motion to key action translation.
//!
//! This module handles:
//! - Shortest-rotation deltas on the wrapping 16-bit axis
//! - Tick debouncing before a direction engages
//! - Releasing on reversal or after a run of still samples

pub mod detector;
pub mod wrap;

pub use detector::{Action, DetectorConfig, Direction, ScratchDetector};
pub use wrap::AxisSample;
