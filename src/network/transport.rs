//! Page transport
//!
//! Thin seam over the network. Navigation, prefetch, and resource loads all
//! go through [`PageTransport`]; the default implementation rides a shared
//! `reqwest` client with a cookie store so requests carry same-origin
//! credentials.

use async_trait::async_trait;

use crate::utils::FetchError;

/// A GET request for a page or resource
#[derive(Debug, Clone)]
pub struct PageRequest {
    url: String,
    headers: Vec<(String, String)>,
}

impl PageRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Get the URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the headers
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Response to a [`PageRequest`]
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status: u16,
    body: String,
}

impl TransportResponse {
    /// Create a new response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Get the status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the response was successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the response, returning the body
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Executes page requests.
///
/// Status handling is the caller's concern: a transport returns any response
/// it received and errors only on transport-level failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Execute a request, suspending on network I/O
    async fn execute(&self, request: PageRequest) -> Result<TransportResponse, FetchError>;
}

/// Default transport: async reqwest client with cookies enabled
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the default transport
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn execute(&self, request: PageRequest) -> Result<TransportResponse, FetchError> {
        let mut builder = self.client.get(request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse::new(status, body))
    }
}
