//! Resource selection: which resource type, which instances, and which
//! extra parameters qualify the operation.

use crate::error::ValidationError;
use crate::resources::filter::Filter;
use crate::resources::resource_type::ResourceType;

/// Parameter names that qualify a definitional resource with its group.
const GROUP_PARAMETERS: &[&str] = &["CSDGROUP", "RESGROUP"];

/// A `PARAMETER` entry such as `CSDGROUP(JVMGRP)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceParameter {
    name: String,
    value: Option<String>,
}

impl ResourceParameter {
    /// Creates a parameter. The name is upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyParameterName`] if the name is blank,
    /// or [`ValidationError::InvalidParameterValue`] if the value contains
    /// a parenthesis.
    pub fn new(name: impl AsRef<str>, value: Option<String>) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyParameterName);
        }
        // NAME(value) has no escape for parentheses.
        if let Some(value) = value.as_deref().filter(|v| v.contains(['(', ')'])) {
            return Err(ValidationError::InvalidParameterValue {
                name: name.to_ascii_uppercase(),
                value: value.to_string(),
            });
        }
        Ok(Self {
            name: name.to_ascii_uppercase(),
            value,
        })
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("{}({value})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Selects the resources a CMCI operation applies to.
///
/// A selector always names exactly one resource type.
///
/// # Example
///
/// ```rust
/// use cmci::resources::{Filter, ResourceParameter, ResourceSelector, ResourceType};
///
/// let selector = ResourceSelector::new(ResourceType::new("CICSDefinitionBundle").unwrap())
///     .with_filter(Filter::eq("name", "PONGALT").unwrap())
///     .with_parameter(ResourceParameter::new("csdgroup", Some("JVMGRP".into())).unwrap());
///
/// assert_eq!(selector.criteria().as_deref(), Some("(NAME='PONGALT')"));
/// assert_eq!(selector.parameter_string().as_deref(), Some("CSDGROUP(JVMGRP)"));
/// assert!(selector.has_group_parameter());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceSelector {
    resource_type: ResourceType,
    filter: Option<Filter>,
    parameters: Vec<ResourceParameter>,
}

impl ResourceSelector {
    /// Creates a selector matching every instance of `resource_type`.
    #[must_use]
    pub const fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            filter: None,
            parameters: Vec::new(),
        }
    }

    /// Restricts the selector with a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Appends a parameter. Parameters keep the order they are added in.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ResourceParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = ResourceParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Returns the resource type.
    #[must_use]
    pub const fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    /// Returns the filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Returns the parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ResourceParameter] {
        &self.parameters
    }

    /// Returns `true` if a `CSDGROUP` or `RESGROUP` parameter is present.
    #[must_use]
    pub fn has_group_parameter(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| GROUP_PARAMETERS.contains(&p.name.as_str()))
    }

    /// Returns the rendered `CRITERIA` value, if a filter is set.
    #[must_use]
    pub fn criteria(&self) -> Option<String> {
        self.filter.as_ref().map(Filter::to_criteria)
    }

    /// Returns the rendered `PARAMETER` value, if parameters are set.
    #[must_use]
    pub fn parameter_string(&self) -> Option<String> {
        if self.parameters.is_empty() {
            return None;
        }
        Some(
            self.parameters
                .iter()
                .map(ResourceParameter::render)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
