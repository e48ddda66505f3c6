// EMG Gesture Watch — Inference Server Wire Format
//
// JSON bodies exchanged with the gesture inference service.

use serde::{Deserialize, Serialize};

use crate::window::WindowSnapshot;

pub const PATH_HEALTH: &str = "/health";
pub const PATH_INFO: &str = "/info";
pub const PATH_PREDICT: &str = "/predict_simple";
pub const PATH_DEVICE_STATUS: &str = "/esp32_status";

/// `POST /predict_simple` body: one array per channel, oldest sample first.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub emg1: &'a [f32],
    pub emg2: &'a [f32],
    pub emg3: &'a [f32],
}

impl<'a> From<&'a WindowSnapshot> for PredictRequest<'a> {
    fn from(snapshot: &'a WindowSnapshot) -> Self {
        Self {
            emg1: &snapshot.emg1,
            emg2: &snapshot.emg2,
            emg3: &snapshot.emg3,
        }
    }
}

/// `POST /predict_simple` success body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictResponse {
    pub gesture: String,
    pub confidence: f32,
}

/// `POST /esp32_status` body, registers this device with the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub esp32_id: String,
    pub sensor_connected: bool,
    pub wifi_connected: bool,
}

/// `POST /esp32_status` acknowledgement.  Only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatusAck {
    pub status: String,
    #[serde(default)]
    pub esp32_id: Option<String>,
    #[serde(default)]
    pub server_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_request_uses_channel_keys() {
        let snapshot = WindowSnapshot {
            emg1: vec![0.5, 1.0],
            emg2: vec![1.5, 2.0],
            emg3: vec![2.5, 3.0],
        };
        let json = serde_json::to_value(PredictRequest::from(&snapshot)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"emg1": [0.5, 1.0], "emg2": [1.5, 2.0], "emg3": [2.5, 3.0]})
        );
    }

    #[test]
    fn predict_response_ignores_extra_fields() {
        let body = r#"{"gesture":"rest","confidence":0.912,"probabilities":{"rest":0.912}}"#;
        let resp: PredictResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.gesture, "rest");
        assert!((resp.confidence - 0.912).abs() < 1e-6);
    }

    #[test]
    fn device_status_body() {
        let status = DeviceStatus {
            esp32_id: "emgwatch-01".into(),
            sensor_connected: true,
            wifi_connected: true,
        };
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"esp32_id":"emgwatch-01","sensor_connected":true,"wifi_connected":true}"#
        );
    }
}
