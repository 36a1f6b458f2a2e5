//! Validation error types for the CMCI client.
//!
//! This module contains the error type raised when caller input is rejected
//! before any network traffic happens: bad connection parameters, malformed
//! filters, missing scope qualifiers and schema violations in the invocation
//! arguments.
//!
//! # Error Handling
//!
//! All newtype constructors and builders return `Result<T, ValidationError>`
//! to enable fail-fast validation. Error messages are designed to be clear
//! and actionable.
//!
//! # Example
//!
//! ```rust
//! use cmci::{CmciHost, ValidationError};
//!
//! let result = CmciHost::new("");
//! assert!(matches!(result, Err(ValidationError::InvalidHost { .. })));
//! ```

use thiserror::Error;

/// Errors raised while validating input for a CMCI request.
///
/// Every variant is detected locally, before a request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The CMCI host name is invalid.
    #[error("Invalid CMCI host '{host}'. Provide a host name or IP address without scheme, port or path (e.g., 'winmvs2c.example.com' or '[::1]').")]
    InvalidHost {
        /// The invalid host that was provided.
        host: String,
    },

    /// The CMCI port is invalid.
    #[error("Invalid CMCI port '{port}'. Expected an integer between 1 and 65535.")]
    InvalidPort {
        /// The invalid port that was provided.
        port: String,
    },

    /// The URL scheme is not supported.
    #[error("Invalid scheme '{scheme}'. Expected 'http' or 'https'.")]
    InvalidScheme {
        /// The invalid scheme that was provided.
        scheme: String,
    },

    /// The CICSplex or region context name is invalid.
    #[error("Invalid context '{context}'. Expected a non-empty CICSplex or region name without whitespace or '/'.")]
    InvalidContext {
        /// The invalid context that was provided.
        context: String,
    },

    /// The scope name is invalid.
    #[error("Invalid scope '{scope}'. Expected a non-empty region or group name without whitespace or '/'.")]
    InvalidScope {
        /// The invalid scope that was provided.
        scope: String,
    },

    /// The resource type name is invalid.
    #[error("Invalid resource name '{resource}'. Expected a CMCI resource table name such as 'CICSBundle'.")]
    InvalidResourceType {
        /// The invalid resource type that was provided.
        resource: String,
    },

    /// A filter was supplied but contains no criteria.
    #[error("Filter cannot be empty. Provide at least one attribute to match on.")]
    EmptyFilter,

    /// A filter attribute name is empty.
    #[error("Filter attribute names cannot be empty.")]
    EmptyFilterAttribute,

    /// An `and`/`or` filter group has no members.
    #[error("Filter group '{group}' must contain at least one filter.")]
    EmptyFilterGroup {
        /// The group that was empty (`and` or `or`).
        group: &'static str,
    },

    /// The filter operator is not part of the CMCI criteria grammar.
    #[error("Unsupported filter operator '{operator}'. Supported operators: =, ==, !=, ¬=, <, <=, >, >=, EQ, IS, NE, LT, LE, GT, GE.")]
    UnsupportedOperator {
        /// The operator that was provided.
        operator: String,
    },

    /// A resource parameter name is empty.
    #[error("Resource parameter names cannot be empty.")]
    EmptyParameterName,

    /// A resource parameter value cannot be expressed in `NAME(value)` form.
    #[error("Invalid value '{value}' for resource parameter '{name}'. Parameter values cannot contain '(' or ')'.")]
    InvalidParameterValue {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// The resource type can only be addressed with a group qualifier.
    #[error("Resource '{resource}' requires a group qualifier. Set 'scope' or add a 'csdgroup' or 'resgroup' parameter.")]
    MissingGroupQualifier {
        /// The resource type that needs the qualifier.
        resource: String,
    },

    /// The delete option does not apply to the resource type.
    #[error("Option '{option}' cannot be used with resource '{resource}': {reason}")]
    IncompatibleOption {
        /// The option that was provided.
        option: String,
        /// The resource type it was used with.
        resource: String,
        /// Why the combination is rejected.
        reason: &'static str,
    },

    /// The delete option is unknown.
    #[error("Invalid option '{option}'. Expected 'delete' or 'discard'.")]
    InvalidOption {
        /// The option that was provided.
        option: String,
    },

    /// Two credential sets were provided together, or one was incomplete.
    #[error("Invalid credentials: {reason}")]
    InvalidCredentials {
        /// Which constraint was violated.
        reason: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The invocation arguments do not match the schema.
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// The schema violation reported by the deserializer.
        reason: String,
    },
}
