// EMG Gesture Watch — Sampling Task
//
// Single control loop: read the three EMG channels at ~1 kHz, push them into
// the sliding window and, whenever the window fills, block on one inference
// round-trip before resuming.  Nothing here is fatal; failures are logged and
// the loop carries on with the next sample.

use std::thread;
use std::time::{Duration, Instant};

use crate::config::*;
use crate::events::{Detection, EmgSample};
use crate::inference::{InferenceClient, Transport};
use crate::protocol::DeviceStatus;
use crate::window::SampleWindow;

/// Anything that can produce one synchronized reading of all three channels.
pub trait EmgSource {
    fn read(&mut self) -> anyhow::Result<EmgSample>;
}

pub struct Sampler<T> {
    window: SampleWindow,
    client: InferenceClient<T>,
    device_id: String,
    sensor_ok: bool,
    status_interval: Duration,
    last_status: Option<Instant>,
}

impl<T: Transport> Sampler<T> {
    pub fn new(window: SampleWindow, client: InferenceClient<T>, device_id: &str) -> Self {
        Self {
            window,
            client,
            device_id: device_id.to_string(),
            sensor_ok: true,
            status_interval: Duration::from_millis(STATUS_REPORT_INTERVAL_MS),
            last_status: None,
        }
    }

    /// Override the heartbeat period (default `STATUS_REPORT_INTERVAL_MS`).
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn client(&self) -> &InferenceClient<T> {
        &self.client
    }

    /// Feed one sample.  Returns the detection reported for the window this
    /// sample completed, if any.
    pub fn tick(&mut self, sample: EmgSample) -> Option<Detection> {
        if let Err(e) = self.window.append(sample) {
            log::warn!("Dropping sample: {}", e);
            return None;
        }

        let snapshot = self.window.drain_and_retain()?;
        match self.client.predict(&snapshot) {
            Ok(detection) => detection,
            Err(e) => {
                log::error!("Prediction error: {}", e);
                None
            }
        }
    }

    /// Post a device heartbeat if none was sent within the status interval.
    pub fn report_status_if_due(&mut self) {
        let due = self
            .last_status
            .map_or(true, |t| t.elapsed() >= self.status_interval);
        if !due {
            return;
        }
        self.last_status = Some(Instant::now());

        let status = DeviceStatus {
            esp32_id: self.device_id.clone(),
            sensor_connected: self.sensor_ok,
            // Sampling only starts once the station is up.
            wifi_connected: true,
        };
        if let Err(e) = self.client.report_status(&status) {
            log::warn!("Device status not delivered: {}", e);
        }
    }

    /// One loop iteration: read the sensor, feed the window, then post the
    /// heartbeat if due.  A failed read skips the tick.
    pub fn step<S: EmgSource>(&mut self, source: &mut S) -> Option<Detection> {
        let detection = match source.read() {
            Ok(sample) => {
                if !self.sensor_ok {
                    log::info!("EMG sensor readings resumed");
                }
                self.sensor_ok = true;
                self.tick(sample)
            }
            Err(e) => {
                if self.sensor_ok {
                    log::warn!("EMG read error: {}", e);
                }
                self.sensor_ok = false;
                None
            }
        };

        self.report_status_if_due();
        detection
    }

    /// Run forever, one sample per `interval`.
    pub fn run<S: EmgSource>(&mut self, source: &mut S, interval: Duration) -> ! {
        log::info!(
            "Sampler started (window {} / hop {}, threshold {:.2}, {} ms per sample)",
            self.window.capacity(),
            self.window.policy().hop(),
            self.client.threshold(),
            interval.as_millis()
        );

        loop {
            let tick_start = Instant::now();

            if let Some(detection) = self.step(source) {
                log::info!("Gesture detected: {}", detection);
            }

            // Sleep for the remainder of the sampling interval.  A tick that
            // included an HTTP round-trip simply overruns.
            let elapsed = tick_start.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }
    }
}
