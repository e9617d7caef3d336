//! # Turntable Device Module
//!
//! Finds, opens and polls the evdev input device that carries the turntable
//! axis.
//!
//! ## Device Listing
//!
//! Every `/dev/input/event*` node that can be opened and reports at least one
//! selectable absolute axis is listed. Nodes are sorted by path, so the index
//! shown by `--list-devices` is stable between runs as long as the set of
//! plugged devices does not change.
//!
//! ## Sampling
//!
//! The position is read with an `EVIOCGABS` query rather than by draining the
//! event stream, so a sample never blocks and always reflects the latest
//! value the kernel has seen.

use evdev::Device;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::axis::{AxisRange, AxisSelector};
use super::source::AxisSource;
use crate::error::{Result, ScratchError};
use crate::scratch::AxisSample;

/// Directory scanned for input devices.
pub const INPUT_DIR: &str = "/dev/input";

/// An input device that exposes at least one selectable axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Position in the sorted listing.
    pub index: usize,
    /// Device node, e.g. `/dev/input/event5`.
    pub path: PathBuf,
    /// Name reported by the driver.
    pub name: String,
    /// Axes from [`AxisSelector::ALL`] the device reports.
    pub axes: Vec<AxisSelector>,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes: Vec<&str> = self.axes.iter().map(|a| a.letter()).collect();
        write!(
            f,
            "[{}] {} ({}) axes: {}",
            self.index,
            self.name,
            self.path.display(),
            axes.join(" ")
        )
    }
}

/// Lists input devices under [`INPUT_DIR`].
pub fn enumerate() -> Result<Vec<DeviceInfo>> {
    enumerate_in(Path::new(INPUT_DIR))
}

/// Lists input devices under `dir`.
///
/// Nodes that cannot be opened (usually permissions) are skipped with a
/// debug log.
///
/// # Errors
///
/// Returns `Device` if the directory is missing or unreadable.
pub fn enumerate_in(dir: &Path) -> Result<Vec<DeviceInfo>> {
    if !dir.exists() {
        return Err(ScratchError::Device(format!(
            "{} directory not found",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| ScratchError::Device(format!("Failed to read {}: {}", dir.display(), e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ScratchError::Device(format!("Failed to read directory entry: {}", e)))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map_or(false, |name| name.to_string_lossy().starts_with("event"))
        })
        .collect();

    paths.sort();

    let mut devices = Vec::new();
    for path in paths {
        let device = match Device::open(&path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Could not open {}: {}", path.display(), e);
                continue;
            }
        };

        let axes = supported_axes(&device);
        if axes.is_empty() {
            continue;
        }

        let name = device.name().unwrap_or("Unknown device").to_string();
        debug!("Found input device: {} ({})", path.display(), name);

        devices.push(DeviceInfo {
            index: devices.len(),
            path,
            name,
            axes,
        });
    }

    Ok(devices)
}

/// Picks a device from a listing.
///
/// Without an explicit index the first device is used, which is the only one
/// in the common single-controller setup.
///
/// # Errors
///
/// - `NoDevicesFound`: the listing is empty
/// - `InvalidSelection`: `index` is past the end of the listing
pub fn select_device(devices: &[DeviceInfo], index: Option<usize>) -> Result<&DeviceInfo> {
    if devices.is_empty() {
        return Err(ScratchError::NoDevicesFound);
    }

    let index = index.unwrap_or(0);
    devices.get(index).ok_or(ScratchError::InvalidSelection {
        index,
        count: devices.len(),
    })
}

fn supported_axes(device: &Device) -> Vec<AxisSelector> {
    let Some(abs) = device.supported_absolute_axes() else {
        return Vec::new();
    };

    AxisSelector::ALL
        .iter()
        .copied()
        .filter(|axis| abs.contains(axis.abs_axis()))
        .collect()
}

/// Turntable axis on an opened evdev device.
pub struct TurntableDevice {
    device: Device,
    device_path: String,
    axis: AxisSelector,
    range: AxisRange,
}

impl fmt::Debug for TurntableDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurntableDevice")
            .field("device_path", &self.device_path)
            .field("axis", &self.axis)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl TurntableDevice {
    /// Opens `path` and prepares to read `axis`.
    ///
    /// # Errors
    ///
    /// - `Device`: the node cannot be opened or its axis range queried
    /// - `AxisNotSupported`: the device does not report `axis`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use turntable_keys::controller::axis::AxisSelector;
    /// use turntable_keys::controller::turntable::TurntableDevice;
    ///
    /// let turntable = TurntableDevice::open("/dev/input/event5", AxisSelector::X)?;
    /// println!("Reading {} on {}", turntable.axis(), turntable.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, axis: AxisSelector) -> Result<Self> {
        let path = path.as_ref();
        let device_path = path.to_string_lossy().to_string();

        let device = Device::open(path)
            .map_err(|e| ScratchError::Device(format!("Failed to open {}: {}", device_path, e)))?;

        if !supported_axes(&device).contains(&axis) {
            return Err(ScratchError::AxisNotSupported {
                axis: axis.to_string(),
                path: device_path,
            });
        }

        let state = device.get_abs_state().map_err(|e| {
            ScratchError::Device(format!("Failed to query axes on {}: {}", device_path, e))
        })?;
        let info = state[axis.abs_axis().0 as usize];
        let range = AxisRange::new(info.minimum, info.maximum)?;

        info!(
            "Opened {} ({}), {}-axis range [{}, {}]",
            device_path,
            device.name().unwrap_or("Unknown device"),
            axis,
            range.min(),
            range.max()
        );

        Ok(Self {
            device,
            device_path,
            axis,
            range,
        })
    }

    /// Returns the `/dev/input/eventX` path this device was opened from.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Returns the axis being read.
    pub fn axis(&self) -> AxisSelector {
        self.axis
    }

    /// Returns the raw range of the axis.
    pub fn range(&self) -> AxisRange {
        self.range
    }

    /// Returns the driver-reported device name.
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }
}

impl AxisSource for TurntableDevice {
    fn sample(&mut self) -> Result<AxisSample> {
        let state = self.device.get_abs_state().map_err(|e| {
            ScratchError::DeviceUnavailable(format!("{}: {}", self.device_path, e))
        })?;

        Ok(self.range.normalize(state[self.axis.abs_axis().0 as usize].value))
    }
}
