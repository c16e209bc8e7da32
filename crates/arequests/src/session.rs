//! Sessions: one transport client shared by many requests

use crate::config::SessionConfig;
use crate::error::{sanitize, Error, Result};
use crate::options::{normalize_header_names, RequestOptions};
use crate::response::Response;
use std::sync::Arc;
use std::time::Instant;

/// A reusable group of requests sharing one transport client and optional
/// default headers and query parameters
///
/// # Example
///
/// ```ignore
/// use arequests::{RequestOptions, Session};
///
/// #[tokio::main]
/// async fn main() -> arequests::Result<()> {
///     let session = Session::new()?.with_headers([("X-Auth", "abc")]);
///
///     let response = session.get("https://api.example.com/users/1").await?;
///     println!("Status: {}", response.status_code());
///
///     session.close().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
    headers: Option<Vec<(String, String)>>,
    params: Option<Vec<(String, String)>>,
}

struct SessionInner {
    client: reqwest::Client,
    config: SessionConfig,
}

impl Session {
    /// Open a session with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Open a session with the given configuration
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let client = config.build_client()?;
        tracing::debug!(user_agent = %config.user_agent, "session opened");

        Ok(Self {
            inner: Arc::new(SessionInner { client, config }),
            headers: None,
            params: None,
        })
    }

    /// Set default headers sent with every request.
    ///
    /// Names are stored lowercase; of two case variants the later value is kept.
    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(normalize_header_names(collect(headers)));
        self
    }

    /// Set default query parameters sent with every request
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = Some(collect(params));
        self
    }

    /// Replace (or clear) the default headers
    pub fn set_headers(&mut self, headers: Option<Vec<(String, String)>>) {
        self.headers = headers.map(normalize_header_names);
    }

    /// Replace (or clear) the default query parameters
    pub fn set_params(&mut self, params: Option<Vec<(String, String)>>) {
        self.params = params;
    }

    /// Default headers, names lowercased
    pub fn headers(&self) -> Option<&[(String, String)]> {
        self.headers.as_deref()
    }

    /// Default value of one header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn params(&self) -> Option<&[(String, String)]> {
        self.params.as_deref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Release the transport client.
    ///
    /// Consumes the session; clones made earlier keep the client alive until
    /// they are closed or dropped too.
    pub async fn close(self) {
        let shared = Arc::strong_count(&self.inner) - 1;
        drop(self);
        tracing::debug!(remaining_handles = shared, "session closed");
    }

    /// Send a request and buffer the whole response body.
    ///
    /// `method` is used verbatim: `"GET"` and `"get"` are different methods.
    /// Session defaults are merged under `options`, which win on collision.
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let method = reqwest::Method::from_bytes(method.as_bytes())?;
        let options = options.with_defaults(self.headers.as_deref(), self.params.as_deref());
        let builder = options.apply(self.inner.client.request(method.clone(), url))?;

        tracing::debug!(%method, url = %sanitize(url), "sending request");
        let start = Instant::now();

        let result = match builder.send().await {
            Ok(response) => Response::from_reqwest(response).await,
            Err(e) => Err(Error::Transport(e)),
        };

        match &result {
            Ok(response) => tracing::debug!(
                %method,
                status = response.status_code(),
                bytes = response.content().len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "request completed"
            ),
            Err(e) => tracing::warn!(%method, error = %e.sanitized_message(), "request failed"),
        }

        result
    }

    // Convenience methods for common HTTP methods

    /// Send a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request("GET", url, RequestOptions::default()).await
    }

    /// Send a GET request with options
    pub async fn get_with(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("GET", url, options).await
    }

    /// Send a POST request
    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("POST", url, options).await
    }

    /// Send a PUT request
    pub async fn put(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("PUT", url, options).await
    }

    /// Send a PATCH request
    pub async fn patch(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("PATCH", url, options).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("DELETE", url, options).await
    }

    /// Send a HEAD request
    pub async fn head(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("HEAD", url, options).await
    }

    /// Send an OPTIONS request
    pub async fn options(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("OPTIONS", url, options).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field(
                "header_names",
                &self
                    .headers
                    .as_ref()
                    .map(|h| h.iter().map(|(name, _)| name).collect::<Vec<_>>()),
            )
            .field("params", &self.params)
            .field("timeout", &self.inner.config.timeout)
            .finish()
    }
}

fn collect<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Vec<(String, String)>
where
    K: Into<String>,
    V: Into<String>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
