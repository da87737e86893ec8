//! Async client for the denoise demo backend.
//!
//! Paths come from `denoise_core::api`, so this client and the browser page
//! always address the same endpoints.

use std::fmt;
use std::time::Duration;

use denoise_core::api::{Ack, DenoiseRequest, SampleEndpoints, Variant, HEALTH_PATH};
#[cfg(test)]
use denoise_core::health::HEALTH_POLL_INTERVAL_MS;
use denoise_core::meta::SampleMeta;
use denoise_core::zoom::ZoomWindow;
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Health probes give up well inside one poll interval.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum ClientError {
    InvalidBaseUrl(String),
    Http(reqwest::Error),
    Status { url: String, status: u16 },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidBaseUrl(u) => write!(f, "invalid base URL: {u}"),
            ClientError::Http(e) => write!(f, "request failed: {e}"),
            ClientError::Status { url, status } => write!(f, "{url} returned HTTP {status}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct DemoClient {
    base: String,
    http: reqwest::Client,
}

impl DemoClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        check_status(url, resp)
    }

    async fn probe_health(&self) -> Result<(), ClientError> {
        let url = self.url(HEALTH_PATH);
        let resp = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        check_status(url, resp).map(|_| ())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Ok(self.get(path).await?.json().await?)
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        Ok(self.get(path).await?.bytes().await?.to_vec())
    }

    async fn post(&self, path: &str, body: Option<&DenoiseRequest>) -> Result<Ack, ClientError> {
        let url = self.url(path);
        log::debug!("POST {url}");
        let mut req = self.http.post(&url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = check_status(url, req.send().await?)?;
        Ok(resp.json().await?)
    }

    /// True when `/health` answered with a 2xx status within
    /// [`HEALTH_TIMEOUT`].
    pub async fn is_healthy(&self) -> bool {
        match self.probe_health().await {
            Ok(_) => true,
            Err(e) => {
                log::debug!("health probe failed: {e}");
                false
            }
        }
    }

    pub async fn meta(&self, sample: &str) -> Result<SampleMeta, ClientError> {
        self.get_json(&SampleEndpoints::new(sample).meta()).await
    }

    /// Raw WAV bytes of the sample.
    pub async fn audio(&self, sample: &str) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&SampleEndpoints::new(sample).audio()).await
    }

    /// PNG bytes of the full-length spectrogram.
    pub async fn spectrogram(&self, sample: &str, variant: Variant) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&SampleEndpoints::new(sample).spectrogram(variant)).await
    }

    pub async fn zoom_spectrogram(
        &self,
        sample: &str,
        variant: Variant,
        window: &ZoomWindow,
    ) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&SampleEndpoints::new(sample).zoom_spectrogram(variant, window)).await
    }

    pub async fn denoise(&self, sample: &str, req: &DenoiseRequest) -> Result<Ack, ClientError> {
        self.post(&SampleEndpoints::new(sample).denoise(), Some(req)).await
    }

    pub async fn reset_zoom(&self, sample: &str) -> Result<Ack, ClientError> {
        self.post(&SampleEndpoints::new(sample).reset_zoom(), None).await
    }

    pub async fn erase_edits(&self, sample: &str) -> Result<Ack, ClientError> {
        self.post(&SampleEndpoints::new(sample).erase_edits(), None).await
    }
}

fn check_status(url: String, resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status { url, status: status.as_u16() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = DemoClient::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.url(HEALTH_PATH), "http://127.0.0.1:5000/health");
    }

    #[test]
    fn test_sample_url_is_encoded() {
        let client = DemoClient::new("https://demo.example/app").unwrap();
        assert_eq!(
            client.url(&SampleEndpoints::new("a b.wav").meta()),
            "https://demo.example/app/api/sample/a%20b.wav/meta"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(DemoClient::new("localhost"), Err(ClientError::InvalidBaseUrl(_))));
        assert!(matches!(DemoClient::new("ftp://host"), Err(ClientError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_health_timeout_fits_poll_interval() {
        let interval = Duration::from_millis(HEALTH_POLL_INTERVAL_MS as u64);
        assert!(HEALTH_TIMEOUT < interval);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unhealthy() {
        // Nothing listens on the discard port locally
        let client = DemoClient::new("http://127.0.0.1:9").unwrap();
        let started = std::time::Instant::now();
        assert!(!client.is_healthy().await);
        assert!(started.elapsed() <= HEALTH_TIMEOUT + Duration::from_millis(500));
    }

    #[test]
    fn test_status_error_message() {
        let e = ClientError::Status { url: "http://h/health".into(), status: 503 };
        assert_eq!(e.to_string(), "http://h/health returned HTTP 503");
    }
}
