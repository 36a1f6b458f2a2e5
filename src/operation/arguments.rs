//! The invocation schema shared by CMCI operations.
//!
//! Arguments arrive as JSON from the automation caller. Unknown fields are
//! rejected, so a typo in an argument name fails the invocation instead of
//! being silently ignored.
//!
//! # Example
//!
//! ```rust
//! use cmci::operation::CmciArguments;
//! use serde_json::json;
//!
//! let arguments = CmciArguments::from_value(json!({
//!     "cmci_host": "winmvs2c.example.com",
//!     "cmci_port": "10080",
//!     "context": "iyk3z0r9",
//!     "resource_name": "CICSBundle",
//!     "resource": {"filter": {"name": "PONGALT"}}
//! }))
//! .unwrap();
//!
//! let selector = arguments.selector().unwrap();
//! assert_eq!(selector.criteria().as_deref(), Some("(NAME='PONGALT')"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::config::{
    CmciConfig, CmciHost, CmciPort, ContextName, Credentials, Password, Scheme, ScopeName,
    TlsConfig,
};
use crate::error::ValidationError;
use crate::resources::{
    Filter, FilterOperator, ResourceParameter, ResourceSelector, ResourceType,
};

/// A scalar argument value. YAML callers often send numbers and booleans
/// where CMCI expects text.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// A string.
    Text(String),
    /// A number.
    Number(serde_json::Number),
    /// A boolean, rendered upper-case as CMCI expects.
    Bool(bool),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
        }
    }
}

/// `cmci_port` may be given as a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// `10080`
    Number(u64),
    /// `"10080"`
    Text(String),
}

impl PortValue {
    fn to_port(&self) -> Result<CmciPort, ValidationError> {
        match self {
            Self::Number(number) => {
                let port = u16::try_from(*number).map_err(|_| ValidationError::InvalidPort {
                    port: number.to_string(),
                })?;
                CmciPort::new(port)
            }
            Self::Text(text) => text.parse(),
        }
    }
}

/// A criterion in an attribute filter map.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterCriterion {
    /// An exact or wildcard match: `name: PONG*`.
    Value(ScalarValue),
    /// A comparison with an explicit operator: `{operator: '>', value: 0}`.
    Comparison(OperatorCriterion),
}

/// A criterion with an explicit operator.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorCriterion {
    /// Operator name or symbol. Defaults to `=`.
    #[serde(default)]
    pub operator: Option<String>,
    /// The value to compare against.
    pub value: ScalarValue,
}

/// The `resource.filter` argument.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// A criteria expression passed through verbatim.
    Raw(String),
    /// Attribute name to criterion. Terms are joined with `AND`.
    Attributes(BTreeMap<String, FilterCriterion>),
}

/// The `resource.complex_filter` argument: a tree of `and`/`or` groups
/// over attribute comparisons.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ComplexFilter {
    /// `{and: [...]}`
    And(AndGroup),
    /// `{or: [...]}`
    Or(OrGroup),
    /// `{attribute, operator?, value}`
    Leaf(FilterLeaf),
}

/// All members must match.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AndGroup {
    /// Group members.
    pub and: Vec<ComplexFilter>,
}

/// Any member must match.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrGroup {
    /// Group members.
    pub or: Vec<ComplexFilter>,
}

/// A single comparison in a complex filter.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterLeaf {
    /// The resource attribute.
    pub attribute: String,
    /// Operator name or symbol. Defaults to `=`.
    #[serde(default)]
    pub operator: Option<String>,
    /// The value to compare against.
    pub value: ScalarValue,
}

impl ComplexFilter {
    fn to_filter(&self) -> Result<Filter, ValidationError> {
        match self {
            Self::And(group) => Filter::and(Self::members(&group.and)?),
            Self::Or(group) => Filter::or(Self::members(&group.or)?),
            Self::Leaf(leaf) => Filter::compare(
                &leaf.attribute,
                parse_operator(leaf.operator.as_deref())?,
                leaf.value.to_string(),
            ),
        }
    }

    fn members(members: &[Self]) -> Result<Vec<Filter>, ValidationError> {
        members.iter().map(Self::to_filter).collect()
    }
}

/// One entry of a `resource.parameters` list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterEntry {
    /// Parameter name, e.g. `csdgroup`.
    pub name: String,
    /// Parameter value. Keyword parameters have none.
    #[serde(default)]
    pub value: Option<ScalarValue>,
}

/// The `resource.parameters` argument.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParametersSpec {
    /// Rendered in the given order.
    List(Vec<ParameterEntry>),
    /// Rendered in sorted name order.
    Map(BTreeMap<String, Option<ScalarValue>>),
}

/// The `resource` argument.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceArguments {
    /// Attribute map or raw criteria expression.
    #[serde(default)]
    pub filter: Option<FilterSpec>,
    /// Nested `and`/`or` filter.
    #[serde(default)]
    pub complex_filter: Option<ComplexFilter>,
    /// Extra `PARAMETER` entries.
    #[serde(default)]
    pub parameters: Option<ParametersSpec>,
}

/// Arguments of a CMCI operation invocation.
///
/// `Debug` output never contains the password.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CmciArguments {
    /// Host name of the CMCI server.
    pub cmci_host: String,
    /// Port of the CMCI server.
    pub cmci_port: PortValue,
    /// User for basic authentication.
    #[serde(default)]
    pub cmci_user: Option<String>,
    /// Password for basic authentication.
    #[serde(default)]
    pub cmci_password: Option<Password>,
    /// PEM client certificate file.
    #[serde(default)]
    pub cmci_cert: Option<PathBuf>,
    /// PEM private key file for `cmci_cert`.
    #[serde(default)]
    pub cmci_key: Option<PathBuf>,
    /// PEM CA certificate file to trust in addition to the system roots.
    #[serde(default)]
    pub cmci_ca_cert: Option<PathBuf>,
    /// `http` or `https`. Defaults to `https`.
    #[serde(default)]
    pub scheme: Option<Scheme>,
    /// Skip server certificate verification.
    #[serde(default)]
    pub insecure: Option<bool>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// CICSplex or region name.
    pub context: String,
    /// Region or group within the context.
    #[serde(default)]
    pub scope: Option<String>,
    /// CMCI resource table name.
    pub resource_name: String,
    /// Resource selection.
    #[serde(default)]
    pub resource: Option<ResourceArguments>,
    /// Operation specific option.
    #[serde(default)]
    pub option: Option<String>,
}

impl CmciArguments {
    /// Deserializes arguments from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidArguments`] if the value does not
    /// match the schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::InvalidArguments {
            reason: e.to_string(),
        })
    }

    /// Deserializes arguments from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidArguments`] if the document is not
    /// valid JSON or does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::InvalidArguments {
            reason: e.to_string(),
        })
    }

    /// Builds the connection context.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an invalid host, port, context or
    /// scope, and for incomplete or conflicting credentials.
    pub fn connection(&self) -> Result<CmciConfig, ValidationError> {
        let mut builder = CmciConfig::builder()
            .host(CmciHost::new(self.cmci_host.as_str())?)
            .port(self.cmci_port.to_port()?)
            .scheme(self.scheme.unwrap_or_default())
            .context(ContextName::new(self.context.as_str())?)
            .tls(TlsConfig {
                verify: !self.insecure.unwrap_or(false),
                ca_cert: self.cmci_ca_cert.clone(),
            });

        if let Some(scope) = &self.scope {
            builder = builder.scope(ScopeName::new(scope.as_str())?);
        }
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(ValidationError::InvalidArguments {
                    reason: "timeout must be at least 1 second".to_string(),
                });
            }
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        if let Some(credentials) = self.credentials()? {
            builder = builder.credentials(credentials);
        }

        builder.build()
    }

    /// Returns the resource type named by `resource_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidResourceType`] if the name is not a
    /// valid resource table name.
    pub fn resource_type(&self) -> Result<ResourceType, ValidationError> {
        ResourceType::new(self.resource_name.as_str())
    }

    /// Builds the filter from `resource.filter` and `resource.complex_filter`.
    ///
    /// When both are given they are combined with `AND`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for empty filters, empty attribute
    /// names, empty groups and unsupported operators.
    pub fn filter(&self) -> Result<Option<Filter>, ValidationError> {
        let Some(resource) = &self.resource else {
            return Ok(None);
        };

        let simple = resource.filter.as_ref().map(filter_from_spec).transpose()?;
        let complex = resource
            .complex_filter
            .as_ref()
            .map(ComplexFilter::to_filter)
            .transpose()?;

        match (simple, complex) {
            (Some(simple), Some(complex)) => Filter::and(vec![simple, complex]).map(Some),
            (simple, complex) => Ok(simple.or(complex)),
        }
    }

    /// Builds the `PARAMETER` entries from `resource.parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyParameterName`] for a blank name.
    pub fn parameters(&self) -> Result<Vec<ResourceParameter>, ValidationError> {
        let Some(spec) = self.resource.as_ref().and_then(|r| r.parameters.as_ref()) else {
            return Ok(Vec::new());
        };
        match spec {
            ParametersSpec::List(entries) => entries
                .iter()
                .map(|entry| {
                    ResourceParameter::new(&entry.name, entry.value.as_ref().map(ToString::to_string))
                })
                .collect(),
            ParametersSpec::Map(entries) => entries
                .iter()
                .map(|(name, value)| {
                    ResourceParameter::new(name, value.as_ref().map(ToString::to_string))
                })
                .collect(),
        }
    }

    /// Builds the complete resource selector.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] raised by [`resource_type`],
    /// [`filter`] or [`parameters`].
    ///
    /// [`resource_type`]: Self::resource_type
    /// [`filter`]: Self::filter
    /// [`parameters`]: Self::parameters
    pub fn selector(&self) -> Result<ResourceSelector, ValidationError> {
        let mut selector = ResourceSelector::new(self.resource_type()?);
        if let Some(filter) = self.filter()? {
            selector = selector.with_filter(filter);
        }
        Ok(selector.with_parameters(self.parameters()?))
    }

    fn credentials(&self) -> Result<Option<Credentials>, ValidationError> {
        let basic = match (&self.cmci_user, &self.cmci_password) {
            (Some(user), Some(password)) => Some(Credentials::basic(user, password.as_ref())?),
            (None, None) => None,
            _ => {
                return Err(ValidationError::InvalidCredentials {
                    reason: "cmci_user and cmci_password must be provided together",
                })
            }
        };
        let certificate = match (&self.cmci_cert, &self.cmci_key) {
            (Some(cert), Some(key)) => Some(Credentials::certificate(cert, key)),
            (None, None) => None,
            _ => {
                return Err(ValidationError::InvalidCredentials {
                    reason: "cmci_cert and cmci_key must be provided together",
                })
            }
        };

        match (basic, certificate) {
            (Some(_), Some(_)) => Err(ValidationError::InvalidCredentials {
                reason: "basic authentication and client certificates are mutually exclusive",
            }),
            (basic, certificate) => Ok(basic.or(certificate)),
        }
    }
}

fn parse_operator(operator: Option<&str>) -> Result<FilterOperator, ValidationError> {
    operator.map_or(Ok(FilterOperator::Eq), str::parse)
}

fn filter_from_spec(spec: &FilterSpec) -> Result<Filter, ValidationError> {
    match spec {
        FilterSpec::Raw(expression) => Filter::raw(expression),
        FilterSpec::Attributes(attributes) => {
            let terms = attributes
                .iter()
                .map(|(attribute, criterion)| match criterion {
                    FilterCriterion::Value(value) => {
                        Ok((attribute.as_str(), FilterOperator::Eq, value.to_string()))
                    }
                    FilterCriterion::Comparison(comparison) => Ok((
                        attribute.as_str(),
                        parse_operator(comparison.operator.as_deref())?,
                        comparison.value.to_string(),
                    )),
                })
                .collect::<Result<Vec<_>, ValidationError>>()?;
            Filter::from_attributes(terms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> serde_json::Value {
        json!({
            "cmci_host": "winmvs2c.example.com",
            "cmci_port": "10080",
            "context": "iyk3z0r9",
            "resource_name": "CICSBundle"
        })
    }

    fn with(extra: serde_json::Value) -> CmciArguments {
        let mut value = base();
        for (key, field) in extra.as_object().unwrap() {
            value[key] = field.clone();
        }
        CmciArguments::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_arguments_build_a_connection() {
        let config = with(json!({})).connection().unwrap();
        assert_eq!(config.base_url(), "https://winmvs2c.example.com:10080");
        assert!(config.tls().verify);
        assert!(config.credentials().is_none());
        assert_eq!(config.timeout(), crate::config::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_port_accepts_number_and_string() {
        let config = with(json!({"cmci_port": 28953})).connection().unwrap();
        assert_eq!(config.port().get(), 28953);

        let error = with(json!({"cmci_port": 70000})).connection().unwrap_err();
        assert!(matches!(error, ValidationError::InvalidPort { .. }));

        let error = with(json!({"cmci_port": "abc"})).connection().unwrap_err();
        assert!(matches!(error, ValidationError::InvalidPort { .. }));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut value = base();
        value["cmci_hots"] = json!("typo");
        assert!(matches!(
            CmciArguments::from_value(value),
            Err(ValidationError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut value = base();
        value.as_object_mut().unwrap().remove("context");
        assert!(matches!(
            CmciArguments::from_value(value),
            Err(ValidationError::InvalidArguments { reason }) if reason.contains("context")
        ));
    }

    #[test]
    fn test_attribute_map_filter_is_sorted_and_joined() {
        let arguments = with(json!({
            "resource": {"filter": {"name": "PONG*", "enablestatus": "DISABLED"}}
        }));
        assert_eq!(
            arguments.selector().unwrap().criteria().as_deref(),
            Some("(ENABLESTATUS='DISABLED') AND (NAME='PONG*')")
        );
    }

    #[test]
    fn test_attribute_criterion_with_operator() {
        let arguments = with(json!({
            "resource": {"filter": {"usecount": {"operator": "GT", "value": 10}}}
        }));
        assert_eq!(
            arguments.filter().unwrap().unwrap().to_criteria(),
            "(USECOUNT>'10')"
        );
    }

    #[test]
    fn test_raw_filter_is_passed_through() {
        let arguments = with(json!({
            "resource": {"filter": "NAME=PONG* AND ENABLESTATUS=DISABLED"}
        }));
        assert_eq!(
            arguments.filter().unwrap().unwrap().to_criteria(),
            "NAME=PONG* AND ENABLESTATUS=DISABLED"
        );
    }

    #[test]
    fn test_empty_filter_map_is_rejected() {
        let arguments = with(json!({"resource": {"filter": {}}}));
        assert_eq!(arguments.filter(), Err(ValidationError::EmptyFilter));
    }

    #[test]
    fn test_complex_filter_tree() {
        let arguments = with(json!({
            "resource": {"complex_filter": {"or": [
                {"attribute": "name", "value": "A*"},
                {"and": [
                    {"attribute": "name", "value": "B*"},
                    {"attribute": "enablestatus", "operator": "NE", "value": "ENABLED"}
                ]}
            ]}}
        }));
        assert_eq!(
            arguments.filter().unwrap().unwrap().to_criteria(),
            "(NAME='A*') OR ((NAME='B*') AND (ENABLESTATUS¬='ENABLED'))"
        );
    }

    #[test]
    fn test_empty_complex_group_is_rejected() {
        let arguments = with(json!({"resource": {"complex_filter": {"and": []}}}));
        assert_eq!(
            arguments.filter(),
            Err(ValidationError::EmptyFilterGroup { group: "and" })
        );
    }

    #[test]
    fn test_unsupported_operator_is_rejected() {
        let arguments = with(json!({
            "resource": {"complex_filter": {"attribute": "name", "operator": "LIKE", "value": "A"}}
        }));
        assert!(matches!(
            arguments.filter(),
            Err(ValidationError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_filter_and_complex_filter_are_combined() {
        let arguments = with(json!({
            "resource": {
                "filter": {"name": "PONGALT"},
                "complex_filter": {"attribute": "enablestatus", "value": "DISABLED"}
            }
        }));
        assert_eq!(
            arguments.filter().unwrap().unwrap().to_criteria(),
            "(NAME='PONGALT') AND (ENABLESTATUS='DISABLED')"
        );
    }

    #[test]
    fn test_raw_filter_keeps_its_meaning_next_to_complex_filter() {
        let arguments = with(json!({
            "resource": {
                "filter": "NAME=A OR NAME=B",
                "complex_filter": {"attribute": "enablestatus", "value": "DISABLED"}
            }
        }));
        assert_eq!(
            arguments.filter().unwrap().unwrap().to_criteria(),
            "(NAME=A OR NAME=B) AND (ENABLESTATUS='DISABLED')"
        );
    }

    #[test]
    fn test_from_json_document() {
        let arguments = CmciArguments::from_json(
            r#"{"cmci_host": "h", "cmci_port": 10080, "context": "plex", "resource_name": "CICSBundle"}"#,
        )
        .unwrap();
        assert_eq!(arguments.resource_name, "CICSBundle");

        assert!(matches!(
            CmciArguments::from_json("{not json"),
            Err(ValidationError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_parameters_as_map_and_list() {
        let arguments = with(json!({"resource": {"parameters": {"csdgroup": "JVMGRP"}}}));
        let selector = arguments.selector().unwrap();
        assert_eq!(selector.parameter_string().as_deref(), Some("CSDGROUP(JVMGRP)"));

        let arguments = with(json!({"resource": {"parameters": [
            {"name": "resgroup", "value": "G1"},
            {"name": "force"}
        ]}}));
        let selector = arguments.selector().unwrap();
        assert_eq!(selector.parameter_string().as_deref(), Some("RESGROUP(G1) FORCE"));
    }

    #[test]
    fn test_basic_credentials_must_be_complete() {
        let error = with(json!({"cmci_user": "ibmuser"})).connection().unwrap_err();
        assert!(matches!(error, ValidationError::InvalidCredentials { .. }));
    }

    #[test]
    fn test_credential_kinds_are_exclusive() {
        let error = with(json!({
            "cmci_user": "ibmuser",
            "cmci_password": "secret",
            "cmci_cert": "/tmp/cert.pem",
            "cmci_key": "/tmp/key.pem"
        }))
        .connection()
        .unwrap_err();
        assert!(matches!(error, ValidationError::InvalidCredentials { .. }));
    }

    #[test]
    fn test_password_is_not_in_debug_output() {
        let arguments = with(json!({"cmci_user": "ibmuser", "cmci_password": "s3cret"}));
        assert!(!format!("{arguments:?}").contains("s3cret"));
    }

    #[test]
    fn test_insecure_scope_and_timeout() {
        let config = with(json!({
            "scheme": "http",
            "insecure": true,
            "scope": "IYCWEMW2",
            "timeout": 5
        }))
        .connection()
        .unwrap();
        assert_eq!(config.scheme(), Scheme::Http);
        assert!(!config.tls().verify);
        assert_eq!(config.scope().map(AsRef::as_ref), Some("IYCWEMW2"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_null_optionals_are_accepted() {
        let arguments = with(json!({"scope": null, "resource": null, "option": null}));
        assert!(arguments.selector().unwrap().filter().is_none());
    }
}
