//! Non-Linux (noop) implementation of accelerometer sampling.
//!
//! This exists so the crate (and binary) can compile on targets without
//! the IIO sysfs interface. It accepts the same configuration but never
//! emits a sample.

use crate::sensor::types::AccelSample;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for the accelerometer source.
///
/// On non-Linux platforms this is accepted but no samples are produced.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Nominal poll rate in Hz.
    pub sample_rate_hz: u32,
    /// IIO device name override; unused on this platform.
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
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::AlreadyRunning => write!(f, "Accelerometer is already running"),
        }
    }
}

impl std::error::Error for SensorError {}

/// A noop accelerometer source that never emits samples.
pub struct NoopAccelerometer {
    _config: SensorConfig,
    _sender: Sender<AccelSample>,
    receiver: Receiver<AccelSample>,
    running: Arc<AtomicBool>,
}

impl NoopAccelerometer {
    /// Build a noop source.
    pub fn discover(config: SensorConfig) -> Option<Self> {
        let (sender, receiver) = bounded(1024);
        Some(Self {
            _config: config,
            _sender: sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Name of the underlying device.
    pub fn device_name(&self) -> &str {
        "noop"
    }

    /// Start sampling.
    ///
    /// On non-Linux platforms this simply marks the source as running.
    pub fn start(&mut self) -> Result<(), SensorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SensorError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stop sampling.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the source is currently running.
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
