//! # Scratch Detector
//!
//! Debounces a stream of absolute axis positions into press/release actions.
//!
//! ## State Machine
//!
//! | From | Input | To | Action |
//! |------|-------|----|--------|
//! | Idle | motion, ticks < min | Idle | - |
//! | Idle | motion, ticks == min | Engaged(dir) | Press(dir) |
//! | Engaged(d) | motion in d | Engaged(d) | - |
//! | Engaged(d) | motion against d | Idle | Release |
//! | Engaged(d) | stop count > threshold | Idle | Release |
//! | Idle | no motion | Idle | - |
//!
//! A reversal only releases. The reversing sample does not count toward the
//! next engagement, so turning back always costs at least `min_ticks` samples
//! before the opposite key goes down.
//!
//! ## Usage
//!
//! ```
//! use turntable_keys::scratch::{Action, DetectorConfig, ScratchDetector};
//!
//! let mut detector = ScratchDetector::new(DetectorConfig::new(2, 3));
//!
//! assert_eq!(detector.observe(1000), None); // seed
//! assert_eq!(detector.observe(1010), None); // tick 1
//! assert_eq!(detector.observe(1020), Some(Action::PressClockwise));
//! ```

use std::fmt;

use super::wrap::{circular_delta, AxisSample};

/// Lowest accepted `min_ticks`.
pub const MIN_TICKS_MIN: u32 = 1;
/// Highest accepted `min_ticks`.
pub const MIN_TICKS_MAX: u32 = 10;
/// Lowest accepted `stop_threshold` (samples).
pub const STOP_THRESHOLD_MIN: u32 = 1;
/// Highest accepted `stop_threshold` (samples).
pub const STOP_THRESHOLD_MAX: u32 = 1000;

/// Default ticks before the first press.
pub const DEFAULT_MIN_TICKS: u32 = 1;
/// Default still samples before a release.
pub const DEFAULT_STOP_THRESHOLD: u32 = 10;

/// Rotation direction of the platter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Direction of a nonzero delta. Zero has no direction.
    #[must_use]
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            0 => None,
            d if d > 0 => Some(Direction::Clockwise),
            _ => Some(Direction::CounterClockwise),
        }
    }

    /// Press action for this direction.
    #[must_use]
    pub fn press(self) -> Action {
        match self {
            Direction::Clockwise => Action::PressClockwise,
            Direction::CounterClockwise => Action::PressCounterClockwise,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "clockwise"),
            Direction::CounterClockwise => write!(f, "counter-clockwise"),
        }
    }
}

/// Action emitted by the detector.
///
/// Presses carry a direction, a release does not: whoever applies actions
/// must remember which key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PressClockwise,
    PressCounterClockwise,
    Release,
}

impl Action {
    /// Direction pressed by this action, `None` for a release.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::PressClockwise => Some(Direction::Clockwise),
            Action::PressCounterClockwise => Some(Direction::CounterClockwise),
            Action::Release => None,
        }
    }
}

/// Debounce parameters, fixed for the lifetime of a detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Consecutive same-direction moving samples required before a press.
    min_ticks: u32,
    /// Consecutive still samples tolerated while engaged; one more releases.
    stop_threshold: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_ticks: DEFAULT_MIN_TICKS,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    /// Creates a configuration, clamping both values into their valid ranges.
    ///
    /// # Arguments
    ///
    /// * `min_ticks` - Ticks before the first press (1 to 10)
    /// * `stop_threshold` - Still samples before release (1 to 1000)
    ///
    /// # Examples
    ///
    /// ```
    /// use turntable_keys::scratch::DetectorConfig;
    ///
    /// let config = DetectorConfig::new(0, 5000);
    /// assert_eq!(config.min_ticks(), 1);
    /// assert_eq!(config.stop_threshold(), 1000);
    /// ```
    #[must_use]
    pub fn new(min_ticks: u32, stop_threshold: u32) -> Self {
        Self {
            min_ticks: min_ticks.clamp(MIN_TICKS_MIN, MIN_TICKS_MAX),
            stop_threshold: stop_threshold.clamp(STOP_THRESHOLD_MIN, STOP_THRESHOLD_MAX),
        }
    }

    /// Returns the configured minimum tick count.
    #[must_use]
    pub fn min_ticks(&self) -> u32 {
        self.min_ticks
    }

    /// Returns the configured stop threshold in samples.
    #[must_use]
    pub fn stop_threshold(&self) -> u32 {
        self.stop_threshold
    }
}

/// Turns absolute axis samples into scratch actions.
///
/// One instance per monitored axis. Not thread-safe; owned by the polling
/// loop.
#[derive(Debug, Clone)]
pub struct ScratchDetector {
    config: DetectorConfig,
    /// `None` until the seed sample arrives.
    last_position: Option<AxisSample>,
    active: bool,
    /// Engaged direction while active, otherwise the direction being counted.
    current_direction: Direction,
    tick_counter: u32,
    stop_counter: u32,
}

impl ScratchDetector {
    /// Creates an idle, unseeded detector.
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            last_position: None,
            active: false,
            current_direction: Direction::Clockwise,
            tick_counter: 0,
            stop_counter: 0,
        }
    }

    /// Feeds one sample and returns the action it triggers, if any.
    ///
    /// The first sample only seeds the reference position.
    pub fn observe(&mut self, sample: AxisSample) -> Option<Action> {
        let Some(last) = self.last_position else {
            self.last_position = Some(sample);
            return None;
        };

        match Direction::from_delta(circular_delta(last, sample)) {
            None => self.still(),
            Some(direction) => {
                self.stop_counter = 0;
                self.last_position = Some(sample);
                self.moved(direction)
            }
        }
    }

    fn still(&mut self) -> Option<Action> {
        self.stop_counter = self.stop_counter.saturating_add(1);
        self.tick_counter = 0;

        if self.active && self.stop_counter > self.config.stop_threshold {
            self.active = false;
            return Some(Action::Release);
        }

        None
    }

    fn moved(&mut self, direction: Direction) -> Option<Action> {
        if self.active {
            if direction == self.current_direction {
                return None;
            }

            // Reversal: let go now, count the new direction from the next sample.
            self.active = false;
            self.tick_counter = 0;
            self.current_direction = direction;
            return Some(Action::Release);
        }

        if self.tick_counter > 0 && direction != self.current_direction {
            self.tick_counter = 0;
        }
        self.current_direction = direction;
        self.tick_counter += 1;

        if self.tick_counter >= self.config.min_ticks {
            self.active = true;
            self.tick_counter = 0;
            return Some(direction.press());
        }

        None
    }

    /// Returns to the unseeded idle state.
    ///
    /// Yields `Some(Action::Release)` when a direction was engaged so the
    /// caller can let go of the held key.
    pub fn reset(&mut self) -> Option<Action> {
        let was_active = self.active;
        *self = Self::new(self.config);
        was_active.then_some(Action::Release)
    }

    /// Whether a direction is currently held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Engaged direction, `None` while idle.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.active.then_some(self.current_direction)
    }

    /// Moving samples counted toward the next press.
    #[must_use]
    pub fn tick_count(&self) -> u32 {
        self.tick_counter
    }

    /// Still samples since the last motion.
    #[must_use]
    pub fn stop_count(&self) -> u32 {
        self.stop_counter
    }

    /// Whether the seed sample has been observed.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.last_position.is_some()
    }

    /// Returns the detector configuration.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
