// EMG Gesture Watch — Remote Inference Client
//
// Talks to the gesture inference server over HTTP.  The HTTP stack itself is
// behind the `Transport` trait: the firmware plugs in the ESP-IDF client, the
// tests plug in a stub.
//
// The sampler calls `predict(snapshot)` with a full window and gets back
// `Some(detection)` only when the server's confidence clears the threshold.

use thiserror::Error;

use crate::events::Detection;
use crate::protocol::*;
use crate::window::WindowSnapshot;

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Status code and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Blocking HTTP client.  `Err` means no response was obtained at all;
/// any status code, including errors, comes back as `Ok`.
pub trait Transport {
    fn get(&mut self, url: &str) -> anyhow::Result<HttpReply>;
    fn post_json(&mut self, url: &str, body: &[u8]) -> anyhow::Result<HttpReply>;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("transport failure: {0:#}")]
    Transport(anyhow::Error),
    #[error("could not encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct InferenceClient<T> {
    transport: T,
    base_url: String,
    threshold: f32,
}

impl<T: Transport> InferenceClient<T> {
    /// `threshold` is exclusive: a confidence equal to it is not reported.
    pub fn new(transport: T, base_url: &str, threshold: f32) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            threshold,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health`; the status text is only logged.
    pub fn check_health(&mut self) -> Result<(), InferenceError> {
        let reply = self.get(PATH_HEALTH)?;
        log::info!("API status: {}", reply.text());
        Ok(())
    }

    /// `GET /info`; the model description is only logged.
    pub fn model_info(&mut self) -> Result<(), InferenceError> {
        let reply = self.get(PATH_INFO)?;
        log::info!("Model info: {}", reply.text());
        Ok(())
    }

    /// `POST /esp32_status`.
    pub fn report_status(&mut self, status: &DeviceStatus) -> Result<(), InferenceError> {
        let body = serde_json::to_vec(status).map_err(InferenceError::Encode)?;
        let reply = self.post(PATH_DEVICE_STATUS, &body)?;
        match serde_json::from_slice::<DeviceStatusAck>(&reply.body) {
            Ok(ack) => log::debug!(
                "Device {} status {} (server time {})",
                ack.esp32_id.as_deref().unwrap_or(&status.esp32_id),
                ack.status,
                ack.server_time.as_deref().unwrap_or("?")
            ),
            Err(_) => log::debug!("Device status acknowledged: {}", reply.text()),
        }
        Ok(())
    }

    /// Submit a full window to `POST /predict_simple`.
    ///
    /// Returns `Ok(None)` when the server answered but its confidence does
    /// not exceed the threshold.
    pub fn predict(&mut self, snapshot: &WindowSnapshot) -> Result<Option<Detection>, InferenceError> {
        let body = serde_json::to_vec(&PredictRequest::from(snapshot)).map_err(InferenceError::Encode)?;
        let reply = self.post(PATH_PREDICT, &body)?;
        let response: PredictResponse =
            serde_json::from_slice(&reply.body).map_err(InferenceError::Decode)?;

        log::debug!("Prediction: {} ({:.3})", response.gesture, response.confidence);
        Ok(gate(response, self.threshold))
    }

    fn get(&mut self, path: &str) -> Result<HttpReply, InferenceError> {
        let url = self.url(path);
        let reply = self.transport.get(&url).map_err(InferenceError::Transport)?;
        expect_ok(reply)
    }

    fn post(&mut self, path: &str, body: &[u8]) -> Result<HttpReply, InferenceError> {
        let url = self.url(path);
        let reply = self
            .transport
            .post_json(&url, body)
            .map_err(InferenceError::Transport)?;
        expect_ok(reply)
    }
}

fn expect_ok(reply: HttpReply) -> Result<HttpReply, InferenceError> {
    if reply.is_ok() {
        Ok(reply)
    } else {
        Err(InferenceError::Status(reply.status))
    }
}

/// Keep a prediction only if its confidence is strictly above `threshold`.
pub fn gate(response: PredictResponse, threshold: f32) -> Option<Detection> {
    if response.confidence > threshold {
        Some(Detection {
            gesture: response.gesture,
            confidence: response.confidence,
        })
    } else {
        None
    }
}
