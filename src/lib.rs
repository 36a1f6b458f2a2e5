//! # CMCI Delete
//!
//! A Rust client for deleting CICS and CICSPlex SM resources through the
//! CMCI REST API, with type-safe configuration, filter building and
//! response mapping.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe connection configuration via [`CmciConfig`] and [`CmciConfigBuilder`]
//! - Validated newtypes for hosts, ports, contexts and scopes
//! - A filter builder producing CMCI `CRITERIA` expressions
//! - Request assembly for `/CICSSystemManagement/{resource}/{context}[/{scope}]`
//! - An async HTTP transport with basic-auth and client certificate support
//! - An XML response mapper producing [`resources::ResponseResult`]
//! - The [`operation::DeleteOperation`] pipeline and its JSON invocation schema
//!
//! ## Quick Start
//!
//! ```rust
//! use cmci::{CmciConfig, CmciHost, CmciPort, ContextName, Credentials};
//!
//! let config = CmciConfig::builder()
//!     .host(CmciHost::new("winmvs2c.example.com").unwrap())
//!     .port(CmciPort::new(10080).unwrap())
//!     .context(ContextName::new("iyk3z0r9").unwrap())
//!     .credentials(Credentials::basic("ibmuser", "passw0rd").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Deleting Resources
//!
//! ```rust,ignore
//! use cmci::operation::{execute_json, DeleteOperation};
//! use serde_json::json;
//!
//! let outcome = execute_json(&DeleteOperation, json!({
//!     "cmci_host": "winmvs2c.example.com",
//!     "cmci_port": "10080",
//!     "context": "iyk3z0r9",
//!     "option": "delete",
//!     "resource_name": "CICSDefinitionBundle",
//!     "resource": {
//!         "filter": {"name": "PONGALT"},
//!         "parameters": {"csdgroup": "JVMGRP"}
//!     }
//! }))
//! .await;
//!
//! println!("deleted {:?} resources", outcome.success_count);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Input is rejected before any request is sent
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Single attempt**: Requests are never retried

pub mod clients;
pub mod config;
pub mod error;
pub mod operation;
pub mod resources;

// Re-export public types at crate root for convenience
pub use config::{
    CmciConfig, CmciConfigBuilder, CmciHost, CmciPort, ContextName, Credentials, Password,
    Scheme, ScopeName, TlsConfig,
};
pub use error::ValidationError;

// Re-export HTTP client types
pub use clients::{
    ApiError, CmciError, ErrorKind, HttpClient, HttpMethod, HttpResponse, RequestDescriptor,
    ResponseParseError, TransportError,
};

// Re-export operation types
pub use operation::{CmciArguments, CmciOperation, CmciOutcome, DeleteOperation, DeleteOption};
