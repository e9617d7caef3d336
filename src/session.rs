//! # Session Module
//!
//! One monitoring session: a turntable axis, a detector and a key sink, driven
//! by a fixed-period polling loop.
//!
//! ## Control Flow
//!
//! 1. Tick every `interval_ms`
//! 2. Sample the axis; a transient read failure skips the cycle without
//!    touching detector state
//! 3. Feed the sample to the detector and forward any action to the sink
//! 4. On shutdown, release a held key so nothing stays stuck down
//!
//! ## Usage
//!
//! ```no_run
//! use turntable_keys::config::Config;
//! use turntable_keys::controller::{AxisSelector, TurntableDevice};
//! use turntable_keys::keyboard::VirtualKeyboard;
//! use turntable_keys::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let source = TurntableDevice::open("/dev/input/event5", AxisSelector::X)?;
//!     let sink = VirtualKeyboard::new()?;
//!
//!     let mut session = Session::new(source, sink, config.detector_config(), &config.polling);
//!     session.run(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::PollingConfig;
use crate::controller::AxisSource;
use crate::error::{Result, ScratchError};
use crate::keyboard::virtual_keyboard::key_label;
use crate::keyboard::ActionSink;
use crate::scratch::{Action, DetectorConfig, Direction, ScratchDetector};

/// Number of samples between status log messages
const LOG_INTERVAL_SAMPLES: u64 = 10_000;

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Samples fed to the detector.
    pub samples: u64,
    /// Cycles skipped because the axis could not be read.
    pub skipped: u64,
    /// Press actions forwarded.
    pub presses: u64,
    /// Release actions forwarded.
    pub releases: u64,
}

/// Why a held key is let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReleaseReason {
    DirectionChange,
    Stopped,
    Shutdown,
}

/// Polling session over an axis source and an action sink.
pub struct Session<S, K> {
    source: S,
    sink: K,
    detector: ScratchDetector,
    period: Duration,
    warn_after: u32,
    consecutive_misses: u32,
    /// Key still down because its release could not be delivered.
    pending_release: Option<Direction>,
    stats: SessionStats,
}

impl<S: AxisSource, K: ActionSink> Session<S, K> {
    /// Creates a session. The detector starts idle and unseeded.
    pub fn new(source: S, sink: K, detector: DetectorConfig, polling: &PollingConfig) -> Self {
        Self {
            source,
            sink,
            detector: ScratchDetector::new(detector),
            period: Duration::from_millis(polling.interval_ms.max(1)),
            warn_after: polling.unavailable_warn_after.max(1),
            consecutive_misses: 0,
            pending_release: None,
            stats: SessionStats::default(),
        }
    }

    /// Runs one poll cycle.
    ///
    /// Returns the action forwarded to the sink, if any.
    ///
    /// # Errors
    ///
    /// Non-transient source errors and sink errors are returned; transient
    /// read failures are absorbed.
    pub fn step(&mut self) -> Result<Option<Action>> {
        let sample = match self.source.sample() {
            Ok(sample) => sample,
            Err(e) if e.is_transient() => {
                self.record_miss(&e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if self.consecutive_misses > 0 {
            if self.consecutive_misses >= self.warn_after {
                info!(
                    "Device readable again after {} missed samples",
                    self.consecutive_misses
                );
            }
            self.consecutive_misses = 0;
        }

        self.stats.samples += 1;

        let engaged = self.detector.direction();
        let action = self.detector.observe(sample);

        if let Some(action) = action {
            let reason = if self.detector.stop_count() == 0 {
                ReleaseReason::DirectionChange
            } else {
                ReleaseReason::Stopped
            };
            self.forward(action, engaged, reason)?;
        }

        if self.stats.samples % LOG_INTERVAL_SAMPLES == 0 {
            debug!(
                "{} samples ({} skipped), {} presses, {} releases",
                self.stats.samples, self.stats.skipped, self.stats.presses, self.stats.releases
            );
        }

        Ok(action)
    }

    /// Polls until `shutdown` completes or an error occurs, then releases any
    /// held key.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Session::step`] or from the final
    /// release.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Polling every {}ms", self.period.as_millis());

        let result = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.step() {
                        break Err(e);
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutting down...");
                    break Ok(());
                }
            }
        };

        let released = self.shutdown();

        info!(
            "Session ended: {} samples ({} skipped), {} presses, {} releases",
            self.stats.samples, self.stats.skipped, self.stats.presses, self.stats.releases
        );

        result.and(released)
    }

    /// Releases the held key, if any, and returns the detector to idle.
    ///
    /// A key whose earlier release failed is released here too.
    pub fn shutdown(&mut self) -> Result<()> {
        let engaged = self.detector.direction();
        let held = match self.detector.reset() {
            Some(_) => engaged,
            None => self.pending_release,
        };

        match held {
            Some(direction) => self.forward(Action::Release, Some(direction), ReleaseReason::Shutdown),
            None => Ok(()),
        }
    }

    /// Direction whose release failed and is still outstanding.
    pub fn pending_release(&self) -> Option<Direction> {
        self.pending_release
    }

    /// Returns the session counters.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the detector.
    pub fn detector(&self) -> &ScratchDetector {
        &self.detector
    }

    fn forward(
        &mut self,
        action: Action,
        engaged: Option<Direction>,
        reason: ReleaseReason,
    ) -> Result<()> {
        if let Err(e) = self.sink.apply(action) {
            if action == Action::Release {
                self.pending_release = engaged.or(self.pending_release);
            }
            return Err(e);
        }
        self.pending_release = None;

        match action {
            Action::PressClockwise => {
                self.stats.presses += 1;
                info!("[>] Clockwise - {} pressed", key_label(Direction::Clockwise));
            }
            Action::PressCounterClockwise => {
                self.stats.presses += 1;
                info!(
                    "[<] Counter-clockwise - {} pressed",
                    key_label(Direction::CounterClockwise)
                );
            }
            Action::Release => {
                self.stats.releases += 1;
                let key = engaged.map_or('?', key_label);
                match reason {
                    ReleaseReason::DirectionChange => info!("[ ] Direction change - {} released", key),
                    ReleaseReason::Stopped => info!("[ ] Stopped - {} released", key),
                    ReleaseReason::Shutdown => info!("[ ] Shutdown - {} released", key),
                }
            }
        }

        Ok(())
    }

    fn record_miss(&mut self, error: &ScratchError) {
        self.stats.skipped += 1;
        self.consecutive_misses = self.consecutive_misses.saturating_add(1);

        if self.consecutive_misses == self.warn_after {
            warn!(
                "{} consecutive failed reads, still retrying: {}",
                self.consecutive_misses, error
            );
        } else {
            debug!("Skipping sample: {}", error);
        }
    }
}
