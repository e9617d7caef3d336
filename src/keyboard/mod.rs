//! # Keyboard Module
//!
//! Synthetic key output.
//!
//! This module handles:
//! - Tracking which scratch key is held
//! - Creating a uinput virtual keyboard with the two scratch keys
//! - Emitting key-down/key-up events for detector actions

pub mod sink;
pub mod tracker;
pub mod virtual_keyboard;

pub use sink::ActionSink;
pub use tracker::KeyTracker;
pub use virtual_keyboard::VirtualKeyboard;
