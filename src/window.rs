// EMG Gesture Watch — Sliding Sample Window
//
// Three lock-stepped channel buffers of fixed capacity.  Once full, the window
// hands out a snapshot for inference and keeps the newest `capacity - hop`
// samples, so consecutive inference windows overlap by that amount
// (250 / 50 → 200 samples shared between requests).

use thiserror::Error;

use crate::config::*;
use crate::events::EmgSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window is full ({capacity} samples); drain before appending")]
    Full { capacity: usize },
    #[error("invalid window policy: capacity {capacity}, hop {hop}")]
    InvalidPolicy { capacity: usize, hop: usize },
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Capacity and hop of the sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    capacity: usize,
    hop: usize,
}

impl WindowPolicy {
    /// `hop` must be in `1..=capacity`.  A hop equal to the capacity gives
    /// non-overlapping (tumbling) windows.
    pub fn new(capacity: usize, hop: usize) -> Result<Self, WindowError> {
        if capacity == 0 || hop == 0 || hop > capacity {
            return Err(WindowError::InvalidPolicy { capacity, hop });
        }
        Ok(Self { capacity, hop })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Samples kept after each drain.
    pub fn retained(&self) -> usize {
        self.capacity - self.hop
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            capacity: WINDOW_CAPACITY,
            hop: WINDOW_HOP,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot handed to the inference client
// ---------------------------------------------------------------------------

/// Owned copy of a full window, oldest sample first.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub emg1: Vec<f32>,
    pub emg2: Vec<f32>,
    pub emg3: Vec<f32>,
}

impl WindowSnapshot {
    pub fn len(&self) -> usize {
        self.emg1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emg1.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

pub struct SampleWindow {
    policy: WindowPolicy,
    // Storage is allocated once; `count` is the only notion of fill level.
    channels: [Box<[f32]>; EMG_CHANNELS],
    count: usize,
}

impl SampleWindow {
    pub fn new(policy: WindowPolicy) -> Self {
        Self {
            policy,
            channels: std::array::from_fn(|_| vec![0.0; policy.capacity()].into_boxed_slice()),
            count: 0,
        }
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    pub fn capacity(&self) -> usize {
        self.policy.capacity()
    }

    /// Valid samples per channel (identical for all three).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.policy.capacity()
    }

    /// Valid portion of one channel, oldest first.  Panics if `index >= 3`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.count]
    }

    /// Push one sample per channel.  A full window rejects the sample and
    /// stays untouched.
    pub fn append(&mut self, sample: EmgSample) -> Result<(), WindowError> {
        if self.is_full() {
            return Err(WindowError::Full {
                capacity: self.policy.capacity(),
            });
        }

        for (buf, value) in self.channels.iter_mut().zip(sample.channels()) {
            buf[self.count] = value;
        }
        self.count += 1;
        Ok(())
    }

    /// When full, copy out the whole window, then slide the newest
    /// `retained()` samples down to the front and park the cursor after them.
    /// Returns `None` without side effects when the window is not full.
    pub fn drain_and_retain(&mut self) -> Option<WindowSnapshot> {
        if !self.is_full() {
            return None;
        }

        let [emg1, emg2, emg3] = &self.channels;
        let snapshot = WindowSnapshot {
            emg1: emg1.to_vec(),
            emg2: emg2.to_vec(),
            emg3: emg3.to_vec(),
        };

        let hop = self.policy.hop();
        for buf in self.channels.iter_mut() {
            buf.copy_within(hop.., 0);
        }
        self.count = self.policy.retained();

        Some(snapshot)
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(WindowPolicy::default())
    }
}
