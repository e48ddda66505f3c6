// EMG Gesture Watch — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// Analog Inputs (Xiao ESP32-C3 pinout, all on ADC1)
// ---------------------------------------------------------------------------
pub const PIN_EMG1: i32 = 2; // D0/A0 — EMG channel 1
pub const PIN_EMG2: i32 = 3; // D1/A1 — EMG channel 2
pub const PIN_EMG3: i32 = 4; // D2/A2 — EMG channel 3

pub const ADC_CHANNEL_EMG1: u32 = 2; // ADC1_CHANNEL_2 (GPIO2)
pub const ADC_CHANNEL_EMG2: u32 = 3; // ADC1_CHANNEL_3 (GPIO3)
pub const ADC_CHANNEL_EMG3: u32 = 4; // ADC1_CHANNEL_4 (GPIO4)

pub const ADC_FULL_SCALE_RAW: f32 = 4095.0; // 12-bit
pub const ADC_REFERENCE_VOLTS: f32 = 3.3;   // 11 dB attenuation range

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
// JSON encoding of a full window (750 floats) lives on this stack.
pub const STACK_SAMPLER: usize = 16384;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_INTERVAL_MS: u64 = 1;             // ~1 kHz (not real-time)
pub const WIFI_RETRY_MS: u64 = 1000;               // fixed reconnect delay
pub const HTTP_TIMEOUT_MS: u64 = 10_000;
pub const STATUS_REPORT_INTERVAL_MS: u64 = 30_000; // device heartbeat

// ---------------------------------------------------------------------------
// Sliding Window / Inference
// ---------------------------------------------------------------------------
pub const EMG_CHANNELS: usize = 3;
pub const WINDOW_CAPACITY: usize = 250; // 250 ms @ 1 kHz
pub const WINDOW_HOP: usize = 50;       // 20% hop, 80% overlap
pub const CONFIDENCE_THRESHOLD: f32 = 0.7; // exclusive

// ---------------------------------------------------------------------------
// Network settings (baked in at build time)
// ---------------------------------------------------------------------------
const DEFAULT_WIFI_SSID: &str = "YOUR_WIFI_SSID";
const DEFAULT_WIFI_PASS: &str = "YOUR_WIFI_PASSWORD";
const DEFAULT_SERVER_URL: &str = "http://192.168.1.100:5000";
const DEFAULT_DEVICE_ID: &str = "emgwatch-01";

/// Credentials and endpoints taken from `EMGWATCH_*` variables at compile
/// time, falling back to placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    pub server_url: &'static str,
    pub device_id: &'static str,
}

impl Settings {
    pub fn from_build_env() -> Self {
        Self {
            wifi_ssid: option_env!("EMGWATCH_WIFI_SSID").unwrap_or(DEFAULT_WIFI_SSID),
            wifi_password: option_env!("EMGWATCH_WIFI_PASS").unwrap_or(DEFAULT_WIFI_PASS),
            server_url: option_env!("EMGWATCH_SERVER_URL").unwrap_or(DEFAULT_SERVER_URL),
            device_id: option_env!("EMGWATCH_DEVICE_ID").unwrap_or(DEFAULT_DEVICE_ID),
        }
    }
}
