//! Request assembly: turns a connection context and a resource selector into
//! a [`RequestDescriptor`].
//!
//! # URL Layout
//!
//! ```text
//! {scheme}://{host}:{port}/CICSSystemManagement/{resource}/{context}[/{scope}]?CRITERIA=..&PARAMETER=..
//! ```
//!
//! Every dynamic path segment and query value is percent-encoded. Query
//! parameters always appear in the order `CRITERIA`, `PARAMETER`, so the
//! same input yields the same URL byte for byte.
//!
//! # Example
//!
//! ```rust
//! use cmci::{CmciConfig, CmciHost, CmciPort, ContextName, HttpMethod};
//! use cmci::resources::{assemble_request, Filter, RequestParams, ResourceSelector, ResourceType};
//!
//! let config = CmciConfig::builder()
//!     .host(CmciHost::new("winmvs2c.example.com").unwrap())
//!     .port(CmciPort::new(10080).unwrap())
//!     .context(ContextName::new("iyk3z0r9").unwrap())
//!     .build()
//!     .unwrap();
//! let selector = ResourceSelector::new(ResourceType::new("CICSBundle").unwrap())
//!     .with_filter(Filter::eq("name", "PONGALT").unwrap());
//!
//! let request = assemble_request(
//!     &config,
//!     &selector,
//!     HttpMethod::Delete,
//!     &RequestParams::from_selector(&selector),
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     request.url(),
//!     "https://winmvs2c.example.com:10080/CICSSystemManagement/CICSBundle/iyk3z0r9?CRITERIA=%28NAME%3D%27PONGALT%27%29"
//! );
//! ```

use crate::clients::{HttpMethod, RequestDescriptor};
use crate::config::CmciConfig;
use crate::error::ValidationError;
use crate::resources::resource_type::ScopeRequirement;
use crate::resources::selector::ResourceSelector;

/// First path segment of every CMCI URL.
pub const CMCI_ROOT: &str = "CICSSystemManagement";

/// Query parameters of a CMCI request, before encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// The `CRITERIA` expression.
    pub criteria: Option<String>,
    /// The `PARAMETER` expression.
    pub parameter: Option<String>,
}

impl RequestParams {
    /// Builds the criteria and parameter strings of a selector.
    #[must_use]
    pub fn from_selector(selector: &ResourceSelector) -> Self {
        Self {
            criteria: selector.criteria(),
            parameter: selector.parameter_string(),
        }
    }

    /// Returns `true` if no query parameter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.criteria.is_none() && self.parameter.is_none()
    }

    /// Returns the parameters as name/value pairs in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(criteria) = &self.criteria {
            pairs.push(("CRITERIA", criteria.as_str()));
        }
        if let Some(parameter) = &self.parameter {
            pairs.push(("PARAMETER", parameter.as_str()));
        }
        pairs
    }

    /// Returns the encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Checks that the selector's resource type is qualified enough to address.
///
/// # Errors
///
/// Returns [`ValidationError::MissingGroupQualifier`] if the resource type
/// needs a group and neither a scope nor a group parameter is present.
pub fn check_scope_requirement(
    config: &CmciConfig,
    selector: &ResourceSelector,
) -> Result<(), ValidationError> {
    let resource_type = selector.resource_type();
    match resource_type.scope_requirement() {
        ScopeRequirement::None => Ok(()),
        ScopeRequirement::Group => {
            if config.scope().is_some() || selector.has_group_parameter() {
                Ok(())
            } else {
                Err(ValidationError::MissingGroupQualifier {
                    resource: resource_type.to_string(),
                })
            }
        }
    }
}

/// Builds the URL path, `/CICSSystemManagement/{resource}/{context}[/{scope}]`.
#[must_use]
pub fn build_path(config: &CmciConfig, selector: &ResourceSelector) -> String {
    let mut segments = vec![
        urlencoding::encode(selector.resource_type().as_ref()),
        urlencoding::encode(config.context().as_ref()),
    ];
    if let Some(scope) = config.scope() {
        segments.push(urlencoding::encode(scope.as_ref()));
    }

    let mut path = format!("/{CMCI_ROOT}");
    for segment in segments {
        path.push('/');
        path.push_str(&segment);
    }
    path
}

/// Assembles the complete request for an operation.
///
/// The scope requirement is checked before the URL is composed.
///
/// # Errors
///
/// Returns [`ValidationError::MissingGroupQualifier`] if the resource type
/// needs a group qualifier that is missing.
pub fn assemble_request(
    config: &CmciConfig,
    selector: &ResourceSelector,
    method: HttpMethod,
    params: &RequestParams,
    body: Option<String>,
) -> Result<RequestDescriptor, ValidationError> {
    check_scope_requirement(config, selector)?;

    let mut url = format!("{}{}", config.base_url(), build_path(config, selector));
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.to_query_string());
    }

    tracing::debug!(%method, url = %url, "Assembled CMCI request");

    Ok(RequestDescriptor::new(method, url, body))
}
