//! # Turntable Keys Library
//!
//! Turn a DJ controller jog wheel into clockwise/counter-clockwise key presses.
//!
//! This library provides the core functionality for reading a turntable axis
//! through evdev, debouncing its rotation into scratch actions, and typing
//! those actions on a uinput virtual keyboard.

pub mod config;
pub mod error;
pub mod controller;
pub mod keyboard;
pub mod scratch;
pub mod session;
