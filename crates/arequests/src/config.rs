//! Session configuration
//!
//! Settings that `reqwest` only accepts when the client is built (TLS, proxy,
//! redirects, compression, pooling) live here rather than on
//! [`RequestOptions`](crate::RequestOptions).

use crate::error::Result;
use std::time::Duration;

/// Configuration for the transport client owned by a [`Session`](crate::Session)
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Total request timeout, `None` leaves the transport default (no timeout)
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Idle connection timeout
    pub pool_idle_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Keep cookies set by responses and send them on later requests
    pub cookie_store: bool,

    /// Proxy URL applied to all schemes
    pub proxy: Option<String>,

    /// Whether to accept invalid certificates (for testing only)
    pub danger_accept_invalid_certs: bool,

    /// Whether to accept invalid hostnames (for testing only)
    pub danger_accept_invalid_hostnames: bool,

    /// Enable gzip decompression
    pub gzip: bool,

    /// Enable brotli decompression
    pub brotli: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            follow_redirects: true,
            max_redirects: 10,
            user_agent: format!("arequests/{}", env!("CARGO_PKG_VERSION")),
            cookie_store: true,
            proxy: None,
            danger_accept_invalid_certs: false,
            danger_accept_invalid_hostnames: false,
            gzip: true,
            brotli: true,
        }
    }
}

impl SessionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timeout from seconds; negative, NaN or overflowing values are ignored
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        match Duration::try_from_secs_f64(secs) {
            Ok(timeout) => self.timeout = Some(timeout),
            Err(e) => tracing::warn!(secs, error = %e, "ignoring invalid timeout"),
        }
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set max idle connections per host
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set idle connection timeout
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set whether to follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set maximum redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable/disable the cookie store
    pub fn cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }

    /// Route every request through the given proxy
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Accept invalid certificates (DANGER - testing only)
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Accept certificates whose hostname does not match (DANGER - testing only)
    pub fn danger_accept_invalid_hostnames(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_hostnames = accept;
        self
    }

    /// Enable/disable gzip decompression
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Enable/disable brotli decompression
    pub fn brotli(mut self, enabled: bool) -> Self {
        self.brotli = enabled;
        self
    }

    /// Build the transport client described by this config
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .user_agent(&self.user_agent)
            .cookie_store(self.cookie_store)
            .gzip(self.gzip)
            .brotli(self.brotli);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if self.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(self.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        if self.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if self.danger_accept_invalid_hostnames {
            builder = builder.danger_accept_invalid_hostnames(true);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.follow_redirects);
        assert_eq!(config.max_redirects, 10);
        assert!(config.cookie_store);
        assert!(config.user_agent.starts_with("arequests/"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::new()
            .timeout_secs(60.0)
            .pool_max_idle_per_host(20)
            .follow_redirects(false)
            .user_agent("custom/1.0");

        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.follow_redirects);
        assert_eq!(config.user_agent, "custom/1.0");
    }

    #[test]
    fn test_timeout_secs_ignores_invalid_values() {
        let config = SessionConfig::new().timeout_secs(-1.0);
        assert_eq!(config.timeout, None);

        let config = SessionConfig::new().timeout_secs(5.0).timeout_secs(f64::NAN);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));

        let config = SessionConfig::new().timeout_secs(f64::INFINITY);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_build_client() {
        assert!(SessionConfig::new().build_client().is_ok());
        assert!(SessionConfig::new()
            .proxy("http://127.0.0.1:3128")
            .danger_accept_invalid_certs(true)
            .build_client()
            .is_ok());
    }

    #[test]
    fn test_build_client_rejects_bad_proxy() {
        let err = SessionConfig::new().proxy("not a url").build_client().unwrap_err();
        assert!(matches!(err, crate::Error::Transport(_)));
    }
}
