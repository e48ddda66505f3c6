// EMG Gesture Watch — Data Types

use std::fmt;

// ---------------------------------------------------------------------------
// Sensor Data (one reading of all three EMG channels, in volts)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmgSample {
    pub emg1: f32,
    pub emg2: f32,
    pub emg3: f32,
}

impl EmgSample {
    pub fn new(emg1: f32, emg2: f32, emg3: f32) -> Self {
        Self { emg1, emg2, emg3 }
    }

    pub fn channels(&self) -> [f32; 3] {
        [self.emg1, self.emg2, self.emg3]
    }
}

// ---------------------------------------------------------------------------
// Gesture Detection
// ---------------------------------------------------------------------------

/// A prediction that cleared the confidence threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub gesture: String,
    pub confidence: f32,
}

impl fmt::Display for Detection {
    /// Console form, e.g. `fist (0.85)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.gesture, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_renders_label_and_two_decimals() {
        let d = Detection { gesture: "fist".into(), confidence: 0.85 };
        assert_eq!(d.to_string(), "fist (0.85)");

        let d = Detection { gesture: "open_hand".into(), confidence: 0.9134 };
        assert_eq!(d.to_string(), "open_hand (0.91)");
    }

    #[test]
    fn sample_channels_in_order() {
        assert_eq!(EmgSample::new(1.0, 2.0, 3.0).channels(), [1.0, 2.0, 3.0]);
    }
}
