//! HTTP transport for the CMCI REST API.
//!
//! This module provides the transport layer for sending assembled CMCI
//! requests. It handles authentication, TLS settings and classification of
//! network failures.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for the CMCI endpoint
//! - [`RequestDescriptor`]: A fully composed request (method, URL, body)
//! - [`HttpResponse`]: A raw response (status and body)
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`CmciError`]: Unified error type for an invocation
//!
//! # Example
//!
//! ```rust,ignore
//! use cmci::{CmciConfig, HttpClient, HttpMethod, RequestDescriptor};
//!
//! let client = HttpClient::new(&config)?;
//! let request = RequestDescriptor::new(
//!     HttpMethod::Delete,
//!     "https://host:10080/CICSSystemManagement/CICSBundle/plex",
//!     None,
//! );
//! let response = client.send(&request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! Requests are sent exactly once. Redirects are not followed. The timeout
//! configured on [`CmciConfig`](crate::CmciConfig) bounds the whole request.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{ApiError, CmciError, ErrorKind, ResponseParseError, TransportError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, RequestDescriptor};
pub use http_response::HttpResponse;
