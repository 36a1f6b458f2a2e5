//! Validated newtype wrappers for connection values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Returns `true` if `value` can be used as a single URL path segment name.
fn is_plain_segment(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c.is_whitespace() || c == '/')
}

fn is_ipv6_literal(value: &str) -> bool {
    value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|address| {
            address.contains(':')
                && address
                    .chars()
                    .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.')
        })
}

/// A validated CMCI host name or IP address.
///
/// The host must not carry a scheme, port or path; those are configured
/// separately.
///
/// # Example
///
/// ```rust
/// use cmci::CmciHost;
///
/// let host = CmciHost::new("winmvs2c.example.com").unwrap();
/// assert_eq!(host.as_ref(), "winmvs2c.example.com");
///
/// assert!(CmciHost::new("https://winmvs2c.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CmciHost(String);

impl CmciHost {
    /// Creates a new validated host.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHost`] if the host is empty or
    /// contains a scheme, path, port separator or whitespace. IPv6 addresses
    /// are accepted in brackets, e.g. `[::1]`.
    pub fn new(host: impl Into<String>) -> Result<Self, ValidationError> {
        let host = host.into();
        let trimmed = host.trim();

        let valid = is_ipv6_literal(trimmed)
            || is_plain_segment(trimmed)
            && !trimmed.contains("://")
            && !trimmed.contains(':')
            && !trimmed.contains('?')
            && !trimmed.contains('#');
        if !valid {
            return Err(ValidationError::InvalidHost { host });
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for CmciHost {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CmciHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated TCP port for the CMCI endpoint.
///
/// # Example
///
/// ```rust
/// use cmci::CmciPort;
///
/// let port: CmciPort = "10080".parse().unwrap();
/// assert_eq!(port.get(), 10080);
/// assert!(CmciPort::new(0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CmciPort(u16);

impl CmciPort {
    /// Creates a new validated port.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPort`] if the port is zero.
    pub fn new(port: u16) -> Result<Self, ValidationError> {
        if port == 0 {
            return Err(ValidationError::InvalidPort {
                port: port.to_string(),
            });
        }
        Ok(Self(port))
    }

    /// Returns the port number.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl FromStr for CmciPort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = s.trim().parse::<u16>().map_err(|_| ValidationError::InvalidPort {
            port: s.to_string(),
        })?;
        Self::new(port)
    }
}

impl fmt::Display for CmciPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL scheme used to reach the CMCI endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme as it appears in a URL.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl FromStr for Scheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(ValidationError::InvalidScheme {
                scheme: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated CICSplex (or SMSS region) context name.
///
/// # Example
///
/// ```rust
/// use cmci::ContextName;
///
/// let context = ContextName::new("iyk3z0r9").unwrap();
/// assert_eq!(context.as_ref(), "iyk3z0r9");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextName(String);

impl ContextName {
    /// Creates a new validated context name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContext`] if the name is empty or
    /// contains whitespace or `/`.
    pub fn new(context: impl Into<String>) -> Result<Self, ValidationError> {
        let context = context.into();
        if !is_plain_segment(&context) {
            return Err(ValidationError::InvalidContext { context });
        }
        Ok(Self(context))
    }
}

impl AsRef<str> for ContextName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated scope: a region or group name within the context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeName(String);

impl ScopeName {
    /// Creates a new validated scope name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidScope`] if the name is empty or
    /// contains whitespace or `/`.
    pub fn new(scope: impl Into<String>) -> Result<Self, ValidationError> {
        let scope = scope.into();
        if !is_plain_segment(&scope) {
            return Err(ValidationError::InvalidScope { scope });
        }
        Ok(Self(scope))
    }
}

impl AsRef<str> for ScopeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A password for CMCI basic authentication.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying only
/// `Password(*****)`.
///
/// ```rust
/// use cmci::Password;
///
/// let password = Password::new("s3cret");
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wraps a password.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

/// Credentials presented to the CMCI endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic authentication.
    Basic {
        /// The user ID.
        user: String,
        /// The password or passphrase.
        password: Password,
    },
    /// TLS client certificate authentication.
    Certificate {
        /// Path to the PEM encoded client certificate.
        cert: PathBuf,
        /// Path to the PEM encoded private key.
        key: PathBuf,
    },
}

impl Credentials {
    /// Creates basic-auth credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCredentials`] if the user is empty.
    pub fn basic(
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(ValidationError::InvalidCredentials {
                reason: "cmci_user cannot be empty",
            });
        }
        Ok(Self::Basic {
            user,
            password: Password::new(password),
        })
    }

    /// Creates client certificate credentials.
    pub fn certificate(cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        Self::Certificate {
            cert: cert.into(),
            key: key.into(),
        }
    }
}
