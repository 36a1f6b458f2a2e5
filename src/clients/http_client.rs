//! HTTP transport for CMCI requests.
//!
//! This module provides the [`HttpClient`] type that sends one
//! [`RequestDescriptor`] to the CMCI endpoint and returns the raw response.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, RequestDescriptor};
use crate::clients::http_response::HttpResponse;
use crate::config::{CmciConfig, Credentials, Password};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for a single CMCI endpoint.
///
/// The client handles:
/// - TLS settings (verification, extra CA, client certificate)
/// - Basic authentication
/// - Default headers including User-Agent and Accept
/// - The configured timeout
///
/// Requests are sent exactly once. Redirects are not followed and nothing is
/// retried; a timeout is reported as [`TransportError::Timeout`].
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use cmci::{CmciConfig, HttpClient};
///
/// let client = HttpClient::new(&config)?;
/// let response = client.send(&request).await?;
/// println!("{} {}", response.code, response.reason);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Credentials for basic authentication, if any.
    basic_auth: Option<(String, Password)>,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// The configured timeout, kept for error reporting.
    timeout: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given connection context.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Tls`] if a CA certificate, client
    /// certificate or key cannot be read or parsed, or if the underlying
    /// client cannot be initialized.
    pub fn new(config: &CmciConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout());

        let tls = config.tls();
        if !tls.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(ca_cert) = &tls.ca_cert {
            let pem = read_pem(ca_cert)?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                TransportError::Tls(format!("invalid CA certificate {}: {e}", ca_cert.display()))
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        let mut basic_auth = None;
        match config.credentials() {
            Some(Credentials::Basic { user, password }) => {
                basic_auth = Some((user.clone(), password.clone()));
            }
            Some(Credentials::Certificate { cert, key }) => {
                let mut pem = read_pem(cert)?;
                pem.push(b'\n');
                pem.extend(read_pem(key)?);
                let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                    TransportError::Tls(format!("invalid client certificate or key: {e}"))
                })?;
                builder = builder.identity(identity);
            }
            None => {}
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Tls(format!("failed to create HTTP client: {e}")))?;

        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            format!("cmci-delete/{SDK_VERSION}"),
        );
        default_headers.insert("Accept".to_string(), "application/xml".to_string());

        Ok(Self {
            client,
            basic_auth,
            default_headers,
            timeout: config.timeout(),
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns `true` if requests carry basic authentication.
    #[must_use]
    pub const fn uses_basic_auth(&self) -> bool {
        self.basic_auth.is_some()
    }

    /// Sends the request once and returns the raw response.
    ///
    /// Any status code is returned as a response; interpreting it is left to
    /// the response mapper.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if:
    /// - The request times out (`Timeout`)
    /// - The connection or TLS handshake fails (`Connect`)
    /// - Any other network error occurs (`Network`)
    pub async fn send(&self, request: &RequestDescriptor) -> Result<HttpResponse, TransportError> {
        let url = request.url();

        let mut req_builder = match request.method() {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some((user, password)) = &self.basic_auth {
            req_builder = req_builder.basic_auth(user, Some(password.as_ref()));
        }

        if let Some(body) = request.body() {
            req_builder = req_builder
                .header("Content-Type", "application/xml")
                .body(body.to_string());
        }

        tracing::info!(method = %request.method(), url, "Sending CMCI request");

        let res = req_builder
            .send()
            .await
            .map_err(|e| self.classify_error(e, url))?;

        let status = res.status();
        let code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = res.text().await.map_err(|e| self.classify_error(e, url))?;

        tracing::debug!(code, reason = %reason, bytes = body.len(), "Received CMCI response");

        Ok(HttpResponse::new(code, reason, body))
    }

    fn classify_error(&self, error: reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else if error.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            TransportError::Network(error)
        }
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TransportError> {
    std::fs::read(path)
        .map_err(|e| TransportError::Tls(format!("cannot read {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CmciHost, CmciPort, ContextName, TlsConfig};

    fn create_test_config() -> crate::config::CmciConfigBuilder {
        CmciConfig::builder()
            .host(CmciHost::new("winmvs2c.example.com").unwrap())
            .port(CmciPort::new(10080).unwrap())
            .context(ContextName::new("iyk3z0r9").unwrap())
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config().build().unwrap()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("cmci-delete/"));
        assert!(user_agent.contains(SDK_VERSION));
    }

    #[test]
    fn test_accept_header_is_xml() {
        let client = HttpClient::new(&create_test_config().build().unwrap()).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/xml".to_string())
        );
    }

    #[test]
    fn test_basic_auth_is_not_a_default_header() {
        let config = create_test_config()
            .credentials(Credentials::basic("user", "secret").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert!(client.uses_basic_auth());
        assert!(!client
            .default_headers()
            .values()
            .any(|value| value.contains("secret")));
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_missing_ca_certificate_is_a_tls_error() {
        let config = create_test_config()
            .tls(TlsConfig {
                verify: true,
                ca_cert: Some("/nonexistent/ca.pem".into()),
            })
            .build()
            .unwrap();

        assert!(matches!(
            HttpClient::new(&config),
            Err(TransportError::Tls(message)) if message.contains("/nonexistent/ca.pem")
        ));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
