// End-to-end scenarios: synthetic EMG ramps through the sampler against a
// stubbed inference server.

use std::sync::{Mutex, OnceLock};

use emgwatch::config::CONFIDENCE_THRESHOLD;
use emgwatch::{EmgSample, HttpReply, InferenceClient, SampleWindow, Sampler, Transport};

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

struct Capture {
    lines: Mutex<Vec<String>>,
}

impl log::Log for Capture {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

fn captured() -> &'static Capture {
    static CAPTURE: OnceLock<&'static Capture> = OnceLock::new();
    CAPTURE.get_or_init(|| {
        let capture: &'static Capture = Box::leak(Box::new(Capture {
            lines: Mutex::new(Vec::new()),
        }));
        log::set_logger(capture).unwrap();
        log::set_max_level(log::LevelFilter::Debug);
        capture
    })
}

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StubServer {
    predict_status: u16,
    predict_body: String,
    requests: Vec<(String, Vec<u8>)>,
}

impl StubServer {
    fn answering(status: u16, body: &str) -> Self {
        Self {
            predict_status: status,
            predict_body: body.to_string(),
            requests: Vec::new(),
        }
    }
}

impl Transport for StubServer {
    fn get(&mut self, url: &str) -> anyhow::Result<HttpReply> {
        self.requests.push((url.to_string(), Vec::new()));
        Ok(HttpReply::new(200, r#"{"status":"healthy"}"#))
    }

    fn post_json(&mut self, url: &str, body: &[u8]) -> anyhow::Result<HttpReply> {
        self.requests.push((url.to_string(), body.to_vec()));
        if url.ends_with("/predict_simple") {
            Ok(HttpReply::new(self.predict_status, self.predict_body.as_str()))
        } else {
            Ok(HttpReply::new(200, r#"{"status":"registered"}"#))
        }
    }
}

/// Sample `i` of a 250-step ramp from 0.0 to 3.3 V, channels offset slightly.
fn ramp(i: usize) -> EmgSample {
    let v = 3.3 * i as f32 / 249.0;
    EmgSample::new(v, v * 0.5, 3.3 - v)
}

fn sampler(server: StubServer) -> Sampler<StubServer> {
    let client = InferenceClient::new(server, "http://10.0.0.2:5000", CONFIDENCE_THRESHOLD);
    Sampler::new(SampleWindow::default(), client, "emgwatch-test")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn full_ramp_window_reports_gesture() {
    let mut s = sampler(StubServer::answering(200, r#"{"gesture":"fist","confidence":0.85}"#));

    let mut reported = Vec::new();
    for i in 0..250 {
        if let Some(d) = s.tick(ramp(i)) {
            reported.push((i, d.to_string()));
        }
    }
    assert_eq!(reported, vec![(249, "fist (0.85)".to_string())]);

    let requests = &s.client().transport().requests;
    assert_eq!(requests.len(), 1);
    let (url, body) = &requests[0];
    assert_eq!(url, "http://10.0.0.2:5000/predict_simple");

    let json: serde_json::Value = serde_json::from_slice(body).unwrap();
    for key in ["emg1", "emg2", "emg3"] {
        let arr = json[key].as_array().unwrap();
        assert_eq!(arr.len(), 250, "{key}");
    }
    let emg1 = json["emg1"].as_array().unwrap();
    assert_eq!(emg1[0].as_f64().unwrap(), 0.0);
    assert!((emg1[249].as_f64().unwrap() - 3.3).abs() < 1e-5);
    // Chronological order.
    let values: Vec<f64> = emg1.iter().map(|v| v.as_f64().unwrap()).collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn server_error_is_logged_and_nothing_reported() {
    let capture = captured();
    let mut s = sampler(StubServer::answering(500, r#"{"error":"Modelo no disponible"}"#));

    let reported: Vec<_> = (0..250).filter_map(|i| s.tick(ramp(i))).collect();
    assert!(reported.is_empty());

    let lines = capture.lines.lock().unwrap();
    assert!(
        lines.iter().any(|l| l.starts_with("ERROR") && l.contains("500")),
        "no error line mentioning 500 in {lines:?}"
    );
}

#[test]
fn confidence_at_threshold_is_suppressed() {
    let mut at = sampler(StubServer::answering(200, r#"{"gesture":"fist","confidence":0.70}"#));
    let mut above = sampler(StubServer::answering(200, r#"{"gesture":"fist","confidence":0.71}"#));

    let at_reported: Vec<_> = (0..250).filter_map(|i| at.tick(ramp(i))).collect();
    let above_reported: Vec<_> = (0..250).filter_map(|i| above.tick(ramp(i))).collect();

    assert!(at_reported.is_empty());
    assert_eq!(above_reported.len(), 1);
    assert_eq!(above_reported[0].to_string(), "fist (0.71)");
}

#[test]
fn consecutive_requests_overlap_by_200_samples() {
    let mut s = sampler(StubServer::answering(200, r#"{"gesture":"rest","confidence":0.5}"#));
    for i in 0..300 {
        s.tick(EmgSample::new(i as f32, 0.0, 0.0));
    }

    let bodies: Vec<serde_json::Value> = s
        .client()
        .transport()
        .requests
        .iter()
        .map(|(_, b)| serde_json::from_slice(b).unwrap())
        .collect();
    assert_eq!(bodies.len(), 2);

    let first = bodies[0]["emg1"].as_array().unwrap();
    let second = bodies[1]["emg1"].as_array().unwrap();
    assert_eq!(&first[50..], &second[..200]);
    assert_eq!(second[249].as_f64().unwrap(), 299.0);
}

#[test]
fn health_and_status_endpoints() {
    let mut client = InferenceClient::new(StubServer::default(), "http://srv/", CONFIDENCE_THRESHOLD);
    client.check_health().unwrap();
    client.model_info().unwrap();
    client
        .report_status(&emgwatch::protocol::DeviceStatus {
            esp32_id: "emgwatch-test".into(),
            sensor_connected: true,
            wifi_connected: true,
        })
        .unwrap();

    let urls: Vec<&str> = client
        .transport()
        .requests
        .iter()
        .map(|(u, _)| u.as_str())
        .collect();
    assert_eq!(urls, ["http://srv/health", "http://srv/info", "http://srv/esp32_status"]);
}
