//! Linux implementation of accelerometer sampling via the IIO sysfs
//! interface.
//!
//! Accelerometers exposed by the industrial I/O subsystem publish raw axis
//! values under `/sys/bus/iio/devices/iio:deviceN/in_accel_{x,y,z}_raw`
//! together with a scale factor. This module polls those attributes from a
//! background thread at a low rate chosen for battery efficiency over peak
//! responsiveness.

use crate::clock::{MonotonicClock, SystemClock};
use crate::sensor::types::AccelSample;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Root of the IIO device tree.
const IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Configuration for the accelerometer source.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Nominal poll rate in Hz.
    pub sample_rate_hz: u32,
    /// IIO device name override; auto-detected when unset.
    pub device: Option<String>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 16,
            device: None,
        }
    }
}

/// Errors that can occur while sampling the accelerometer.
#[derive(Debug)]
pub enum SensorError {
    AlreadyRunning,
    Read(String),
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::AlreadyRunning => write!(f, "Accelerometer is already running"),
            SensorError::Read(e) => write!(f, "Accelerometer read failed: {e}"),
        }
    }
}

impl std::error::Error for SensorError {}

/// The Linux accelerometer source backed by IIO sysfs polling.
pub struct IioAccelerometer {
    config: SensorConfig,
    device_path: PathBuf,
    device_name: String,
    scale: f32,
    clock: SystemClock,
    sender: Sender<AccelSample>,
    receiver: Receiver<AccelSample>,
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl IioAccelerometer {
    /// Locate an accelerometer and build a source for it.
    ///
    /// Returns `None` when no IIO accelerometer is present; the caller
    /// treats that as feature-unavailable, not as an error.
    pub fn discover(config: SensorConfig) -> Option<Self> {
        let (device_path, device_name) = find_device(config.device.as_deref())?;
        let scale = read_scale(&device_path);

        // Bounded so a stalled consumer cannot grow memory without limit
        let (sender, receiver) = bounded(1024);

        Some(Self {
            config,
            device_path,
            device_name,
            scale,
            clock: SystemClock::start(),
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        })
    }

    /// Name of the underlying IIO device.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Start polling in a background thread.
    pub fn start(&mut self) -> Result<(), SensorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SensorError::AlreadyRunning);
        }

        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        let device_path = self.device_path.clone();
        let scale = self.scale;
        let clock = self.clock.clone();
        let interval =
            Duration::from_millis(1000 / u64::from(self.config.sample_rate_hz.max(1)));

        debug!(
            device = %self.device_name,
            rate_hz = self.config.sample_rate_hz,
            "starting accelerometer poll thread"
        );

        let handle = thread::spawn(move || {
            run_poll_loop(device_path, scale, interval, clock, sender, running);
        });

        self.thread_handle = Some(handle);
        Ok(())
    }

    /// Stop polling.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            // The thread exits when running becomes false
            let _ = handle.join();
        }
    }

    /// Check if the source is currently polling.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for accelerometer samples.
    pub fn receiver(&self) -> &Receiver<AccelSample> {
        &self.receiver
    }

    /// Try to receive a sample without blocking.
    pub fn try_recv(&self) -> Option<AccelSample> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for IioAccelerometer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scan the IIO tree for an accelerometer.
///
/// With an override, the device name must match exactly; otherwise the
/// first device whose name contains "accel" and that exposes raw axis
/// attributes wins.
fn find_device(override_name: Option<&str>) -> Option<(PathBuf, String)> {
    let entries = fs::read_dir(IIO_ROOT).ok()?;

    for entry in entries.flatten() {
        let path = entry.path();
        let name = match fs::read_to_string(path.join("name")) {
            Ok(n) => n.trim().to_string(),
            Err(_) => continue,
        };

        let matches = match override_name {
            Some(want) => name == want,
            None => name.contains("accel"),
        };

        if matches && path.join("in_accel_x_raw").exists() {
            return Some((path, name));
        }
    }

    None
}

/// Read the device's raw-to-acceleration scale factor, defaulting to 1.0
/// when the attribute is absent or malformed.
fn read_scale(device_path: &Path) -> f32 {
    fs::read_to_string(device_path.join("in_accel_scale"))
        .ok()
        .and_then(|s| s.trim().parse::<f32>().ok())
        .unwrap_or(1.0)
}

/// Read one raw axis attribute and apply the scale.
fn read_axis(path: &Path, scale: f32) -> Result<f32, SensorError> {
    let raw = fs::read_to_string(path).map_err(|e| SensorError::Read(e.to_string()))?;
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|e| SensorError::Read(format!("{e} in {path:?}")))?;
    Ok(value * scale)
}

/// Poll the three axis attributes until stopped.
fn run_poll_loop(
    device_path: PathBuf,
    scale: f32,
    interval: Duration,
    clock: SystemClock,
    sender: Sender<AccelSample>,
    running: Arc<AtomicBool>,
) {
    let x_path = device_path.join("in_accel_x_raw");
    let y_path = device_path.join("in_accel_y_raw");
    let z_path = device_path.join("in_accel_z_raw");

    while running.load(Ordering::SeqCst) {
        let reading = read_axis(&x_path, scale)
            .and_then(|x| read_axis(&y_path, scale).map(|y| (x, y)))
            .and_then(|(x, y)| read_axis(&z_path, scale).map(|z| (x, y, z)));

        match reading {
            Ok((x, y, z)) => {
                let sample = AccelSample::new(x, y, z, clock.now_ms());
                // Don't block if the channel is full - just drop the sample
                let _ = sender.try_send(sample);
            }
            Err(e) => {
                // Transient sysfs hiccups happen during suspend; keep polling
                warn!("{e}");
            }
        }

        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_config_default() {
        let config = SensorConfig::default();
        assert_eq!(config.sample_rate_hz, 16);
        assert!(config.device.is_none());
    }

    #[test]
    fn test_read_axis_applies_scale() {
        let dir = std::env::temp_dir().join("motiongate-iio-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("in_accel_x_raw");
        fs::write(&path, "512\n").unwrap();

        let value = read_axis(&path, 0.01).unwrap();
        assert!((value - 5.12).abs() < 0.001);
    }

    #[test]
    fn test_read_axis_rejects_garbage() {
        let dir = std::env::temp_dir().join("motiongate-iio-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("in_accel_bad_raw");
        fs::write(&path, "not-a-number\n").unwrap();

        assert!(read_axis(&path, 1.0).is_err());
    }
}
