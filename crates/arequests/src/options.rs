//! Per-call request options and the defaults merge

use crate::error::Result;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::time::Duration;

/// Hook that receives the transport request builder just before sending
pub type Customize = Box<dyn FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send>;

/// Request body
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    None,
    /// Serialized as JSON with `Content-Type: application/json`
    Json(serde_json::Value),
    /// URL-encoded form
    Form(Vec<(String, String)>),
    Bytes(bytes::Bytes),
    Text(String),
}

/// Request authentication
#[derive(Debug, Clone, Default)]
pub enum Auth {
    #[default]
    None,
    Basic {
        username: String,
        password: Option<String>,
    },
    Bearer(String),
}

/// Everything a single call may specify besides method and URL
///
/// ```ignore
/// let options = RequestOptions::new()
///     .header("X-Auth", "override")
///     .query("page", "2")
///     .timeout(Duration::from_secs(5));
/// let response = session.get_with("https://example.test/items", options).await?;
/// ```
#[derive(Default)]
pub struct RequestOptions {
    /// Headers in the order given; a repeated name sends every value
    pub headers: Vec<(String, String)>,
    /// Query parameters in the order given; repeated keys are kept
    pub params: Vec<(String, String)>,
    pub body: Body,
    /// Per-request timeout, overriding the session config
    pub timeout: Option<Duration>,
    pub auth: Auth,
    /// Escape hatch for transport settings not covered above
    pub customize: Option<Customize>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body
    pub fn json_value(mut self, value: serde_json::Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    /// Set a JSON body from any serializable value
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Body::Json(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Set a URL-encoded form body
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Body::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Set a raw body
    pub fn bytes(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// Set a text body
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Text(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.auth = Auth::Basic {
            username: username.into(),
            password,
        };
        self
    }

    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Bearer(token.into());
        self
    }

    /// Adjust the transport request builder directly
    pub fn customize<F>(mut self, f: F) -> Self
    where
        F: FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + 'static,
    {
        self.customize = Some(Box::new(f));
        self
    }

    /// Layer these options over session defaults.
    ///
    /// Defaults are copied, never mutated; on a key collision the value from
    /// these options is kept.
    pub(crate) fn with_defaults(
        mut self,
        headers: Option<&[(String, String)]>,
        params: Option<&[(String, String)]>,
    ) -> Self {
        if let Some(defaults) = headers {
            self.headers = merge_headers(defaults, self.headers);
        }
        if let Some(defaults) = params {
            self.params = merge_params(defaults, self.params);
        }
        self
    }

    /// Apply these options to a transport request builder
    pub(crate) fn apply(self, mut builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        if !self.headers.is_empty() {
            builder = builder.headers(header_map(&self.headers)?);
        }

        if !self.params.is_empty() {
            builder = builder.query(&self.params);
        }

        builder = match self.body {
            Body::None => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(fields) => builder.form(&fields),
            Body::Bytes(bytes) => builder.body(bytes),
            Body::Text(text) => builder.body(text),
        };

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match self.auth {
            Auth::None => builder,
            Auth::Basic { username, password } => builder.basic_auth(username, password),
            Auth::Bearer(token) => builder.bearer_auth(token),
        };

        if let Some(customize) = self.customize {
            builder = customize(builder);
        }

        Ok(builder)
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field(
                "headers",
                &self.headers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("params", &self.params)
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .field("customize", &self.customize.is_some())
            .finish_non_exhaustive()
    }
}

/// Merge call headers over default headers.
///
/// Header names compare case-insensitively, so a call-supplied `x-auth`
/// replaces a default `X-Auth` instead of sending both.
pub fn merge_headers(
    defaults: &[(String, String)],
    call: Vec<(String, String)>,
) -> Vec<(String, String)> {
    merge(defaults, call, |a, b| a.eq_ignore_ascii_case(b))
}

/// Merge call query parameters over default parameters; the call wins.
pub fn merge_params(
    defaults: &[(String, String)],
    call: Vec<(String, String)>,
) -> Vec<(String, String)> {
    merge(defaults, call, |a, b| a == b)
}

/// Keep default order; a colliding key takes the call's values at the
/// position of its first default entry. Remaining call entries follow.
fn merge(
    defaults: &[(String, String)],
    call: Vec<(String, String)>,
    same: impl Fn(&str, &str) -> bool,
) -> Vec<(String, String)> {
    let mut merged = Vec::with_capacity(defaults.len() + call.len());
    let mut taken = vec![false; call.len()];

    for (i, (name, value)) in defaults.iter().enumerate() {
        let overridden = call.iter().any(|(c, _)| same(c, name));
        if !overridden {
            merged.push((name.clone(), value.clone()));
            continue;
        }
        if defaults[..i].iter().any(|(earlier, _)| same(earlier, name)) {
            continue;
        }
        for (j, (c, v)) in call.iter().enumerate() {
            if !taken[j] && same(c, name) {
                merged.push((c.clone(), v.clone()));
                taken[j] = true;
            }
        }
    }

    merged.extend(
        call.into_iter()
            .zip(taken)
            .filter(|(_, taken)| !taken)
            .map(|(entry, _)| entry),
    );
    merged
}

/// Fold header names to lowercase, later values replacing earlier ones
pub(crate) fn normalize_header_names(
    headers: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    let mut normalized: Vec<(String, String)> = Vec::new();
    for (name, value) in headers {
        let name = name.to_ascii_lowercase();
        match normalized.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => normalized.push((name, value)),
        }
    }
    normalized
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    Ok(map)
}
