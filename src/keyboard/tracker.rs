//! # Held Key Tracking
//!
//! Detector actions are asymmetric: a press names its direction, a release
//! does not. [`KeyTracker`] remembers which direction is down and expands
//! each action into the concrete key transitions to emit.

use crate::scratch::{Action, Direction};

/// One key going down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    /// Logical key, named by the direction it stands for.
    pub direction: Direction,
    /// `true` for key-down, `false` for key-up.
    pub pressed: bool,
}

impl KeyTransition {
    /// Key-down for `direction`.
    #[must_use]
    pub fn press(direction: Direction) -> Self {
        Self {
            direction,
            pressed: true,
        }
    }

    /// Key-up for `direction`.
    #[must_use]
    pub fn release(direction: Direction) -> Self {
        Self {
            direction,
            pressed: false,
        }
    }
}

/// Remembers the held key between actions.
#[derive(Debug, Default, Clone)]
pub struct KeyTracker {
    held: Option<Direction>,
}

impl KeyTracker {
    /// Creates a tracker with no key held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction whose key is currently down.
    #[must_use]
    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    /// Expands `action` into key transitions and updates the held key.
    ///
    /// - A press of the held key is a no-op.
    /// - A press while the other key is held releases it first.
    /// - A release with nothing held is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use turntable_keys::keyboard::tracker::{KeyTracker, KeyTransition};
    /// use turntable_keys::scratch::{Action, Direction};
    ///
    /// let mut tracker = KeyTracker::new();
    /// assert_eq!(
    ///     tracker.apply(Action::PressCounterClockwise),
    ///     vec![KeyTransition::press(Direction::CounterClockwise)]
    /// );
    /// assert_eq!(
    ///     tracker.apply(Action::Release),
    ///     vec![KeyTransition::release(Direction::CounterClockwise)]
    /// );
    /// ```
    pub fn apply(&mut self, action: Action) -> Vec<KeyTransition> {
        let transitions = self.transitions(action);
        self.commit(action);
        transitions
    }

    /// Key transitions `action` would produce, without changing the held key.
    #[must_use]
    pub fn transitions(&self, action: Action) -> Vec<KeyTransition> {
        let mut transitions = Vec::with_capacity(2);

        match action.direction() {
            Some(direction) if self.held == Some(direction) => {}
            Some(direction) => {
                if let Some(previous) = self.held {
                    transitions.push(KeyTransition::release(previous));
                }
                transitions.push(KeyTransition::press(direction));
            }
            None => {
                if let Some(previous) = self.held {
                    transitions.push(KeyTransition::release(previous));
                }
            }
        }

        transitions
    }

    /// Records the held key after the transitions for `action` went out.
    pub fn commit(&mut self, action: Action) {
        self.held = action.direction();
    }
}
