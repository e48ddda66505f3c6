// EMG Gesture Watch — ESP-IDF HTTP Transport

use std::time::Duration;

use embedded_svc::http::client::Client;
use embedded_svc::http::Method;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use esp_idf_svc::io::EspIOError;

use emgwatch::config::*;
use emgwatch::inference::{HttpReply, Transport};

/// Opens a fresh connection per exchange.  A connection whose request or
/// response phase failed cannot start another request, so none is reused.
pub struct EspTransport {
    config: Configuration,
}

impl EspTransport {
    pub fn new() -> Self {
        Self {
            config: Configuration {
                timeout: Some(Duration::from_millis(HTTP_TIMEOUT_MS)),
                ..Default::default()
            },
        }
    }

    fn exchange(&mut self, method: Method, url: &str, body: Option<&[u8]>) -> anyhow::Result<HttpReply> {
        let content_length = body.map(|b| b.len().to_string());
        let mut headers = vec![("Accept", "application/json")];
        if let Some(len) = content_length.as_deref() {
            headers.push(("Content-Type", "application/json"));
            headers.push(("Content-Length", len));
        }

        let mut client = Client::wrap(EspHttpConnection::new(&self.config)?);
        let mut request = client.request(method, url, &headers)?;
        if let Some(body) = body {
            request.write_all(body)?;
            request.flush()?;
        }

        let mut response = request.submit()?;
        let status = response.status();
        let body = read_body(&mut response)?;
        Ok(HttpReply { status, body })
    }
}

impl Transport for EspTransport {
    fn get(&mut self, url: &str) -> anyhow::Result<HttpReply> {
        self.exchange(Method::Get, url, None)
    }

    fn post_json(&mut self, url: &str, body: &[u8]) -> anyhow::Result<HttpReply> {
        self.exchange(Method::Post, url, Some(body))
    }
}

fn read_body<R: Read<Error = EspIOError>>(response: &mut R) -> anyhow::Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 256];
    loop {
        let n = response.read(&mut chunk)?;
        if n == 0 {
            return Ok(body);
        }
        body.extend_from_slice(&chunk[..n]);
    }
}
