//! Buffered HTTP response

use crate::encoding::{self, Charset};
use crate::error::Result;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{StatusCode, Version};
use url::Url;

/// A completed response whose body has been read into memory
///
/// Every accessor reads already-materialized state; nothing here touches the
/// network.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    version: Version,
    charset: Charset,
    content: Bytes,
}

impl Response {
    /// Read the whole body of a transport response and wrap it
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let version = response.version();

        let content = response.bytes().await?;

        Ok(Self::from_parts(status, headers, url, version, content))
    }

    /// Assemble a response from parts that were already received
    pub fn from_parts(
        status: StatusCode,
        headers: HeaderMap,
        url: Url,
        version: Version,
        content: Bytes,
    ) -> Self {
        let charset = encoding::detect(&headers);
        Self {
            status,
            headers,
            url,
            version,
            charset,
            content,
        }
    }

    /// Response headers, as received
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Numeric HTTP status code
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Body decoded with the encoding declared by the response.
    ///
    /// Fails with [`Error::Decode`](crate::Error::Decode) on any byte sequence
    /// that is invalid in that encoding; nothing is replaced or skipped.
    pub fn text(&self) -> Result<String> {
        encoding::decode_strict(&self.content, self.charset)
    }

    /// Body text parsed as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.text()?)?)
    }

    /// Body text deserialized into `T`
    pub fn json_as<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.text()?)?)
    }

    /// Raw body bytes
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Final URL (may differ from request URL due to redirects)
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Name of the encoding `text()` decodes with
    pub fn encoding(&self) -> &'static str {
        self.charset.name()
    }

    /// First value of a header, if present and visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

/// Builder for responses that did not come off the wire (adapters, tests)
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    version: Version,
    content: Bytes,
}

impl ResponseBuilder {
    pub fn new(url: Url) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            url,
            version: Version::HTTP_11,
            content: Bytes::new(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Append a header value, keeping earlier values for the same name
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.content = body.into();
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> Response {
        Response::from_parts(
            self.status,
            self.headers,
            self.url,
            self.version,
            self.content,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn builder() -> ResponseBuilder {
        ResponseBuilder::new(Url::parse("http://example.test/ping").unwrap())
    }

    fn json_header() -> (HeaderName, HeaderValue) {
        (CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    #[test]
    fn test_response_status_checks() {
        let response = builder().status(StatusCode::OK).build();
        assert_eq!(response.status_code(), 200);
        assert!(response.is_success());
        assert!(!response.is_client_error());

        let response = builder().status(StatusCode::NOT_FOUND).build();
        assert!(!response.is_success());
        assert!(response.is_client_error());

        let response = builder().status(StatusCode::BAD_GATEWAY).build();
        assert!(response.is_server_error());

        let response = builder().status(StatusCode::MOVED_PERMANENTLY).build();
        assert!(response.is_redirect());
    }

    #[test]
    fn test_response_json() {
        let (name, value) = json_header();
        let response = builder()
            .header(name, value)
            .body(r#"{"ok": true}"#)
            .build();

        assert_eq!(response.text().unwrap(), r#"{"ok": true}"#);
        assert_eq!(response.json().unwrap(), serde_json::json!({"ok": true}));
        // repeatable
        assert_eq!(response.json().unwrap(), response.json().unwrap());
    }

    #[test]
    fn test_response_json_as() {
        #[derive(serde::Deserialize)]
        struct User {
            name: String,
            age: u32,
        }

        let response = builder().body(r#"{"name": "Alice", "age": 30}"#).build();
        let user: User = response.json_as().unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.age, 30);
    }

    #[test]
    fn test_response_invalid_json() {
        let response = builder().body("not json").build();
        assert_eq!(response.text().unwrap(), "not json");
        assert!(matches!(response.json(), Err(Error::Json(_))));
    }

    #[test]
    fn test_response_invalid_utf8_is_decode_error() {
        let response = builder()
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )
            .body(vec![0xC3, 0x28])
            .build();

        assert!(matches!(response.text(), Err(Error::Decode { .. })));
        assert!(matches!(response.json(), Err(Error::Decode { .. })));
        assert_eq!(response.content().as_ref(), &[0xC3, 0x28]);
    }

    #[test]
    fn test_response_declared_charset() {
        let response = builder()
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=iso-8859-1"),
            )
            .body(vec![0x63, 0x61, 0x66, 0xE9])
            .build();

        assert_eq!(response.encoding(), "ISO-8859-1");
        assert_eq!(response.text().unwrap(), "café");
    }

    #[test]
    fn test_response_declared_ascii_is_strict() {
        let response = builder()
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=us-ascii"),
            )
            .body(vec![0x63, 0x61, 0x66, 0xE9])
            .build();

        assert_eq!(response.encoding(), "US-ASCII");
        assert!(matches!(
            response.text(),
            Err(Error::Decode { encoding: "US-ASCII" })
        ));
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let (name, value) = json_header();
        let response = builder().header(name, value).build();

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.content_type(), Some("application/json"));
    }

    #[test]
    fn test_response_multi_valued_headers() {
        let cookie = HeaderName::from_static("set-cookie");
        let response = builder()
            .header(cookie.clone(), HeaderValue::from_static("a=1"))
            .header(cookie.clone(), HeaderValue::from_static("b=2"))
            .build();

        let values: Vec<_> = response.headers().get_all(&cookie).iter().collect();
        assert_eq!(values, vec!["a=1", "b=2"]);
        assert_eq!(response.header("set-cookie"), Some("a=1"));
    }
}
