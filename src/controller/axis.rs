//! # Axis Selection
//!
//! Maps the six classic game-controller axis letters onto evdev absolute
//! axes and rescales raw readings onto the 16-bit turntable circle.
//!
//! ## Axis Letters
//!
//! | Letter | Index | evdev Code | Description |
//! |--------|-------|------------|-------------|
//! | X | 0 | ABS_X | Primary horizontal |
//! | Y | 1 | ABS_Y | Primary vertical |
//! | Z | 2 | ABS_Z | Third axis |
//! | R | 3 | ABS_RZ | Rudder / twist |
//! | U | 4 | ABS_RX | Fifth axis |
//! | V | 5 | ABS_RY | Sixth axis |

use evdev::AbsoluteAxisType;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScratchError};
use crate::scratch::wrap::{AxisSample, AXIS_RANGE};

/// Axis carrying the turntable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum AxisSelector {
    #[default]
    X,
    Y,
    Z,
    R,
    U,
    V,
}

impl AxisSelector {
    /// All selectable axes, in menu order.
    pub const ALL: [AxisSelector; 6] = [
        AxisSelector::X,
        AxisSelector::Y,
        AxisSelector::Z,
        AxisSelector::R,
        AxisSelector::U,
        AxisSelector::V,
    ];

    /// evdev axis read for this selector.
    #[must_use]
    pub fn abs_axis(self) -> AbsoluteAxisType {
        match self {
            AxisSelector::X => AbsoluteAxisType::ABS_X,
            AxisSelector::Y => AbsoluteAxisType::ABS_Y,
            AxisSelector::Z => AbsoluteAxisType::ABS_Z,
            AxisSelector::R => AbsoluteAxisType::ABS_RZ,
            AxisSelector::U => AbsoluteAxisType::ABS_RX,
            AxisSelector::V => AbsoluteAxisType::ABS_RY,
        }
    }

    /// Single-letter name.
    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            AxisSelector::X => "X",
            AxisSelector::Y => "Y",
            AxisSelector::Z => "Z",
            AxisSelector::R => "R",
            AxisSelector::U => "U",
            AxisSelector::V => "V",
        }
    }
}

impl fmt::Display for AxisSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for AxisSelector {
    type Err = String;

    /// Accepts a letter (any case) or the menu index 0-5.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(index) = s.parse::<usize>() {
            return AxisSelector::ALL
                .get(index)
                .copied()
                .ok_or_else(|| format!("axis index {} out of range (0-5)", index));
        }

        AxisSelector::ALL
            .iter()
            .copied()
            .find(|axis| axis.letter().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown axis '{}' (expected one of X, Y, Z, R, U, V)", s))
    }
}

impl TryFrom<String> for AxisSelector {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Raw value range reported by the device for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    min: i32,
    max: i32,
}

impl AxisRange {
    /// Creates a range. The device must report `max > min`.
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if max <= min {
            return Err(ScratchError::Device(format!(
                "axis reports empty range [{}, {}]",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Lowest raw value.
    #[must_use]
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Highest raw value.
    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Spreads the range's positions evenly over the 65536-point circle.
    ///
    /// Out-of-range readings are clamped first. Adjacent raw positions stay
    /// adjacent across the wrap, so `max -> min` reads as one step forward.
    ///
    /// # Examples
    ///
    /// ```
    /// use turntable_keys::controller::axis::AxisRange;
    ///
    /// let range = AxisRange::new(0, 255).unwrap();
    /// assert_eq!(range.normalize(0), 0);
    /// assert_eq!(range.normalize(1), 256);
    /// assert_eq!(range.normalize(255), 65280);
    /// ```
    #[must_use]
    pub fn normalize(&self, value: i32) -> AxisSample {
        let positions = i64::from(self.max) - i64::from(self.min) + 1;
        let offset = (i64::from(value) - i64::from(self.min)).clamp(0, positions - 1);
        (offset * i64::from(AXIS_RANGE) / positions) as AxisSample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_x() {
        assert_eq!(AxisSelector::default(), AxisSelector::X);
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!("x".parse::<AxisSelector>().unwrap(), AxisSelector::X);
        assert_eq!("R".parse::<AxisSelector>().unwrap(), AxisSelector::R);
        assert_eq!(" v ".parse::<AxisSelector>().unwrap(), AxisSelector::V);
    }

    #[test]
    fn test_parse_menu_index() {
        for (index, axis) in AxisSelector::ALL.iter().enumerate() {
            assert_eq!(index.to_string().parse::<AxisSelector>().unwrap(), *axis);
        }
        assert!("6".parse::<AxisSelector>().is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let err = "W".parse::<AxisSelector>().unwrap_err();
        assert!(err.contains("unknown axis"));
    }

    #[test]
    fn test_abs_axis_mapping() {
        assert_eq!(AxisSelector::X.abs_axis(), AbsoluteAxisType::ABS_X);
        assert_eq!(AxisSelector::R.abs_axis(), AbsoluteAxisType::ABS_RZ);
        assert_eq!(AxisSelector::U.abs_axis(), AbsoluteAxisType::ABS_RX);
        assert_eq!(AxisSelector::V.abs_axis(), AbsoluteAxisType::ABS_RY);
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            axis: AxisSelector,
        }

        let w: Wrapper = toml::from_str("axis = \"z\"").unwrap();
        assert_eq!(w.axis, AxisSelector::Z);
        assert!(toml::from_str::<Wrapper>("axis = \"Q\"").is_err());
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(AxisRange::new(5, 5).is_err());
        assert!(AxisRange::new(10, -10).is_err());
    }

    #[test]
    fn test_full_16_bit_range_is_identity() {
        let range = AxisRange::new(0, 65535).unwrap();
        for value in [0, 1, 12345, 32768, 65535] {
            assert_eq!(range.normalize(value), value as AxisSample);
        }
    }

    #[test]
    fn test_signed_range() {
        let range = AxisRange::new(-32768, 32767).unwrap();
        assert_eq!(range.normalize(-32768), 0);
        assert_eq!(range.normalize(0), 32768);
        assert_eq!(range.normalize(32767), 65535);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let range = AxisRange::new(0, 255).unwrap();
        assert_eq!(range.normalize(-20), 0);
        assert_eq!(range.normalize(300), 65280);
    }
}
