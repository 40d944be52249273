use crate::core::config::ConfigError;
use crate::core::errors::ModemError;
use crate::core::types::HttpMethod;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{instrument, trace};

/// A fully encoded request ready for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Header name/value pairs in template order
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Look up a header value, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status, headers and raw body returned by the device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header. When a name repeats, the first value wins.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| value.into());
        self
    }

    /// Look up a header value, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Transport to the device's HTTP server
///
/// `open` acquires the connection resources and `close` releases them. The
/// session state machine owns the transport exclusively and sends one request
/// at a time.
#[async_trait]
pub trait Transport: Send + Sync {
    fn open(&mut self) -> Result<(), ModemError>;

    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Send a request and return the raw response. Network failures and
    /// timeouts are reported as `ModemError::Transport`.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ModemError>;
}

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Base URL of the device, e.g. `http://192.168.8.1`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl TransportConfig {
    /// Create a configuration for a device address
    ///
    /// A bare host such as `192.168.8.1` is prefixed with `http://`. The
    /// client is built without TLS, so `https://` addresses are rejected.
    pub fn new(address: &str) -> Result<Self, ConfigError> {
        let address = address.trim().trim_end_matches('/');
        if address.is_empty() {
            return Err(ConfigError::InvalidConfiguration(
                "Device address is empty".to_string(),
            ));
        }
        if address.starts_with("https://") {
            return Err(ConfigError::InvalidConfiguration(format!(
                "Only plain http:// device addresses are supported: {}",
                address
            )));
        }

        let base_url = if address.starts_with("http://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        Ok(Self {
            base_url,
            timeout_seconds: 10,
            user_agent: format!("huamodem/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// `Transport` backed by a reqwest client limited to one pooled connection
pub struct ReqwestTransport {
    config: TransportConfig,
    client: Option<Client>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .field("open", &self.client.is_some())
            .finish()
    }
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

fn transport_error(e: &reqwest::Error) -> ModemError {
    if e.is_timeout() {
        ModemError::Transport(format!("Request timed out: {}", e))
    } else {
        ModemError::Transport(format!("Request failed: {}", e))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn open(&mut self) -> Result<(), ModemError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .pool_max_idle_per_host(1)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| ModemError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        self.client = Some(client);
        Ok(())
    }

    fn close(&mut self) {
        self.client = None;
    }

    fn is_open(&self) -> bool {
        self.client.is_some()
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ModemError> {
        let client = self.client.as_ref().ok_or(ModemError::NotConnected)?;

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = client.request(method, self.build_url(&request.path));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(|e| transport_error(&e))?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e))?
            .to_vec();

        trace!(status, body_len = body.len(), "Response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_base_url() {
        assert_eq!(
            TransportConfig::new("192.168.8.1").unwrap().base_url,
            "http://192.168.8.1"
        );
        assert_eq!(
            TransportConfig::new("http://192.168.1.1/").unwrap().base_url,
            "http://192.168.1.1"
        );
        assert_eq!(
            TransportConfig::new("10.0.0.1").unwrap().with_timeout(3).timeout_seconds,
            3
        );
    }

    #[test]
    fn test_transport_config_rejects_https() {
        let err = TransportConfig::new("https://192.168.8.1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(msg) if msg.contains("http://")));

        assert!(matches!(
            TransportConfig::new("  "),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_response_headers_case_insensitive() {
        let response = HttpResponse::new(200, "<response>OK</response>")
            .with_header("Set-Cookie", "SessionID=S2; path=/")
            .with_header("set-cookie", "ignored");

        assert_eq!(response.header("SET-COOKIE"), Some("SessionID=S2; path=/"));
        assert!(response.is_success());
        assert_eq!(response.text(), "<response>OK</response>");
    }

    #[tokio::test]
    async fn test_send_without_open_fails() {
        let transport = ReqwestTransport::new(TransportConfig::new("127.0.0.1:9").unwrap());
        assert!(!transport.is_open());

        let request = HttpRequest {
            method: HttpMethod::Get,
            path: "/api/device/signal".to_string(),
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(matches!(
            transport.send(&request).await,
            Err(ModemError::NotConnected)
        ));
    }

    #[test]
    fn test_open_close() {
        let mut transport = ReqwestTransport::new(TransportConfig::new("192.168.8.1").unwrap());
        transport.open().unwrap();
        assert!(transport.is_open());
        transport.close();
        assert!(!transport.is_open());
    }
}
