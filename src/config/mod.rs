//! Connection configuration for CMCI requests.
//!
//! This module provides the connection context used to address a CMCI
//! endpoint for one invocation.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`CmciConfig`]: Host, port, scheme, context, scope, credentials, TLS and timeout settings
//! - [`CmciConfigBuilder`]: A builder for constructing [`CmciConfig`] instances
//! - [`CmciHost`], [`CmciPort`], [`ContextName`], [`ScopeName`]: Validated newtypes
//! - [`Credentials`]: Basic-auth or client certificate credentials
//! - [`TlsConfig`]: Certificate verification settings
//!
//! # Example
//!
//! ```rust
//! use cmci::{CmciConfig, CmciHost, CmciPort, ContextName};
//!
//! let config = CmciConfig::builder()
//!     .host(CmciHost::new("winmvs2c.example.com").unwrap())
//!     .port(CmciPort::new(10080).unwrap())
//!     .context(ContextName::new("iyk3z0r9").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(), "https://winmvs2c.example.com:10080");
//! ```

mod newtypes;

pub use newtypes::{CmciHost, CmciPort, ContextName, Credentials, Password, Scheme, ScopeName};

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ValidationError;

/// Request timeout used when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS settings for `https` connections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsConfig {
    /// Whether the server certificate is verified.
    pub verify: bool,
    /// Additional PEM encoded CA certificate to trust.
    pub ca_cert: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify: true,
            ca_cert: None,
        }
    }
}

/// Connection context for a single CMCI invocation.
///
/// A `CmciConfig` is immutable once built.
///
/// # Thread Safety
///
/// `CmciConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct CmciConfig {
    host: CmciHost,
    port: CmciPort,
    scheme: Scheme,
    context: ContextName,
    scope: Option<ScopeName>,
    credentials: Option<Credentials>,
    tls: TlsConfig,
    timeout: Duration,
}

impl CmciConfig {
    /// Creates a new builder for constructing a `CmciConfig`.
    #[must_use]
    pub fn builder() -> CmciConfigBuilder {
        CmciConfigBuilder::new()
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &CmciHost {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> CmciPort {
        self.port
    }

    /// Returns the URL scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the CICSplex context.
    #[must_use]
    pub const fn context(&self) -> &ContextName {
        &self.context
    }

    /// Returns the scope, if configured.
    #[must_use]
    pub const fn scope(&self) -> Option<&ScopeName> {
        self.scope.as_ref()
    }

    /// Returns the credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the TLS settings.
    #[must_use]
    pub const fn tls(&self) -> &TlsConfig {
        &self.tls
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `{scheme}://{host}:{port}`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

// Verify CmciConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CmciConfig>();
};

/// Builder for constructing [`CmciConfig`] instances.
///
/// Required fields are `host`, `port` and `context`.
///
/// # Defaults
///
/// - `scheme`: `https`
/// - `scope`: `None`
/// - `credentials`: `None`
/// - `tls`: verification enabled, no extra CA
/// - `timeout`: [`DEFAULT_TIMEOUT`]
#[derive(Debug, Default)]
pub struct CmciConfigBuilder {
    host: Option<CmciHost>,
    port: Option<CmciPort>,
    scheme: Option<Scheme>,
    context: Option<ContextName>,
    scope: Option<ScopeName>,
    credentials: Option<Credentials>,
    tls: Option<TlsConfig>,
    timeout: Option<Duration>,
}

impl CmciConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host (required).
    #[must_use]
    pub fn host(mut self, host: CmciHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the port (required).
    #[must_use]
    pub const fn port(mut self, port: CmciPort) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the URL scheme.
    #[must_use]
    pub const fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Sets the CICSplex context (required).
    #[must_use]
    pub fn context(mut self, context: ContextName) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the region or group scope.
    #[must_use]
    pub fn scope(mut self, scope: ScopeName) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the TLS settings.
    #[must_use]
    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`CmciConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRequiredField`] if `host`, `port`
    /// or `context` are not set.
    pub fn build(self) -> Result<CmciConfig, ValidationError> {
        let host = self
            .host
            .ok_or(ValidationError::MissingRequiredField { field: "cmci_host" })?;
        let port = self
            .port
            .ok_or(ValidationError::MissingRequiredField { field: "cmci_port" })?;
        let context = self
            .context
            .ok_or(ValidationError::MissingRequiredField { field: "context" })?;

        Ok(CmciConfig {
            host,
            port,
            scheme: self.scheme.unwrap_or_default(),
            context,
            scope: self.scope,
            credentials: self.credentials,
            tls: self.tls.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> CmciConfigBuilder {
        CmciConfig::builder()
            .host(CmciHost::new("winmvs2c.example.com").unwrap())
            .port(CmciPort::new(10080).unwrap())
            .context(ContextName::new("iyk3z0r9").unwrap())
    }

    #[test]
    fn test_builder_requires_host() {
        let result = CmciConfigBuilder::new()
            .port(CmciPort::new(10080).unwrap())
            .context(ContextName::new("plex").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ValidationError::MissingRequiredField { field: "cmci_host" })
        ));
    }

    #[test]
    fn test_builder_requires_context() {
        let result = CmciConfigBuilder::new()
            .host(CmciHost::new("host").unwrap())
            .port(CmciPort::new(10080).unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ValidationError::MissingRequiredField { field: "context" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = minimal_builder().build().unwrap();

        assert_eq!(config.scheme(), Scheme::Https);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.tls().verify);
        assert!(config.tls().ca_cert.is_none());
        assert!(config.scope().is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_base_url_uses_scheme_host_and_port() {
        let config = minimal_builder().scheme(Scheme::Http).build().unwrap();
        assert_eq!(config.base_url(), "http://winmvs2c.example.com:10080");
    }

    #[test]
    fn test_base_url_with_ipv6_host() {
        let config = minimal_builder()
            .host(CmciHost::new("[::1]").unwrap())
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "https://[::1]:10080");
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = minimal_builder()
            .scope(ScopeName::new("IYCWEMW2").unwrap())
            .credentials(Credentials::basic("user", "pw").unwrap())
            .tls(TlsConfig {
                verify: false,
                ca_cert: Some(PathBuf::from("/etc/ca.pem")),
            })
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.scope().map(AsRef::as_ref), Some("IYCWEMW2"));
        assert!(!config.tls().verify);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(matches!(
            config.credentials(),
            Some(Credentials::Basic { user, .. }) if user == "user"
        ));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CmciConfig>();
    }
}
