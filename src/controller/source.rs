//! Trait abstraction for polled axis input to enable testing

use crate::error::Result;
use crate::scratch::AxisSample;

/// Anything that can report the current turntable position on demand.
#[cfg_attr(test, mockall::automock)]
pub trait AxisSource {
    /// Read the current position.
    ///
    /// Returns `ScratchError::DeviceUnavailable` when the read fails for this
    /// cycle only; callers skip the sample and try again on the next poll.
    fn sample(&mut self) -> Result<AxisSample>;
}
