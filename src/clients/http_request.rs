//! HTTP request types for CMCI.
//!
//! This module provides [`HttpMethod`] and the [`RequestDescriptor`] that
//! the request assembler hands to the transport client.

use std::fmt;

use serde::{Serialize, Serializer};

/// HTTP methods understood by the CMCI API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// Query resources.
    Get,
    /// Create or install resources.
    Post,
    /// Update resources or perform actions.
    Put,
    /// Delete or discard resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A fully composed CMCI request.
///
/// Built once by [`assemble_request`](crate::resources::assemble_request)
/// and consumed by [`HttpClient::send`](crate::clients::HttpClient::send).
/// The fields are read-only; it serializes as the `request` echo in the
/// outcome.
///
/// # Example
///
/// ```rust
/// use cmci::{HttpMethod, RequestDescriptor};
///
/// let request = RequestDescriptor::new(
///     HttpMethod::Delete,
///     "https://host:10080/CICSSystemManagement/CICSBundle/plex",
///     None,
/// );
/// assert_eq!(request.method(), HttpMethod::Delete);
/// assert!(request.body().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: String,
    body: Option<String>,
}

impl RequestDescriptor {
    /// Creates a request descriptor.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the full request URL, including the query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the XML request body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
