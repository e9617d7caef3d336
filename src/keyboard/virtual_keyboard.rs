//! # Virtual Keyboard
//!
//! uinput keyboard that types the two scratch keys.
//!
//! | Direction | Key |
//! |-----------|-----|
//! | Clockwise | A |
//! | Counter-clockwise | S |
//!
//! Creating the device needs write access to `/dev/uinput` (root, or a udev
//! rule granting the `input` group).

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::debug;

use super::sink::ActionSink;
use super::tracker::{KeyTracker, KeyTransition};
use crate::error::{Result, ScratchError};
use crate::scratch::{Action, Direction};

/// Name the virtual keyboard registers with.
pub const DEVICE_NAME: &str = "Turntable Keys";

/// Key typed for a direction.
#[must_use]
pub fn key_for(direction: Direction) -> Key {
    match direction {
        Direction::Clockwise => Key::KEY_A,
        Direction::CounterClockwise => Key::KEY_S,
    }
}

/// Printable label of the key typed for a direction.
#[must_use]
pub fn key_label(direction: Direction) -> char {
    match direction {
        Direction::Clockwise => 'A',
        Direction::CounterClockwise => 'S',
    }
}

fn to_event(transition: KeyTransition) -> InputEvent {
    InputEvent::new(
        EventType::KEY,
        key_for(transition.direction).code(),
        i32::from(transition.pressed),
    )
}

/// uinput keyboard fed by detector actions.
pub struct VirtualKeyboard {
    device: VirtualDevice,
    tracker: KeyTracker,
}

impl std::fmt::Debug for VirtualKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualKeyboard")
            .field("held", &self.tracker.held())
            .finish_non_exhaustive()
    }
}

impl VirtualKeyboard {
    /// Creates the virtual keyboard under [`DEVICE_NAME`].
    ///
    /// # Errors
    ///
    /// Returns `VirtualKeyboard` if `/dev/uinput` cannot be opened or the
    /// device cannot be registered.
    pub fn new() -> Result<Self> {
        Self::with_name(DEVICE_NAME)
    }

    /// Creates the virtual keyboard under a custom name.
    pub fn with_name(name: &str) -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(key_for(Direction::Clockwise));
        keys.insert(key_for(Direction::CounterClockwise));

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| ScratchError::VirtualKeyboard(format!("Failed to open uinput: {}", e)))?
            .name(name)
            .with_keys(&keys)
            .map_err(|e| ScratchError::VirtualKeyboard(format!("Failed to register keys: {}", e)))?
            .build()
            .map_err(|e| ScratchError::VirtualKeyboard(format!("Failed to create device: {}", e)))?;

        Ok(Self {
            device,
            tracker: KeyTracker::new(),
        })
    }

    /// Direction whose key is currently down.
    pub fn held(&self) -> Option<Direction> {
        self.tracker.held()
    }
}

impl ActionSink for VirtualKeyboard {
    fn apply(&mut self, action: Action) -> Result<()> {
        let transitions = self.tracker.transitions(action);
        if transitions.is_empty() {
            return Ok(());
        }

        // The held key only changes once the events are written
        let events: Vec<InputEvent> = transitions.iter().copied().map(to_event).collect();
        self.device
            .emit(&events)
            .map_err(|e| ScratchError::VirtualKeyboard(format!("Failed to emit keys: {}", e)))?;
        self.tracker.commit(action);

        for transition in transitions {
            debug!(
                "Key {} {}",
                key_label(transition.direction),
                if transition.pressed { "down" } else { "up" }
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_for(Direction::Clockwise), Key::KEY_A);
        assert_eq!(key_for(Direction::CounterClockwise), Key::KEY_S);
        assert_eq!(key_label(Direction::Clockwise), 'A');
        assert_eq!(key_label(Direction::CounterClockwise), 'S');
    }

    #[test]
    fn test_transition_events() {
        let down = to_event(KeyTransition::press(Direction::Clockwise));
        assert_eq!(down.event_type(), EventType::KEY);
        assert_eq!(down.code(), Key::KEY_A.code());
        assert_eq!(down.value(), 1);

        let up = to_event(KeyTransition::release(Direction::CounterClockwise));
        assert_eq!(up.code(), Key::KEY_S.code());
        assert_eq!(up.value(), 0);
    }

    // Integration test - requires uinput access
    #[test]
    #[ignore]
    fn test_create_virtual_keyboard() {
        let mut keyboard = VirtualKeyboard::with_name("Turntable Keys Test").expect("uinput");
        keyboard.apply(Action::PressClockwise).unwrap();
        assert_eq!(keyboard.held(), Some(Direction::Clockwise));
        keyboard.apply(Action::Release).unwrap();
        assert_eq!(keyboard.held(), None);
    }
}
