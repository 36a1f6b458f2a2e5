//! CMCI resource table names.

use std::fmt;

use crate::error::ValidationError;

/// Prefix shared by the CSD definitional resource tables.
const DEFINITION_PREFIX: &str = "cicsdefinition";

/// Scope qualification a resource type needs before it can be addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeRequirement {
    /// The context alone is enough.
    None,
    /// A group must be named, either as the scope or as a
    /// `CSDGROUP`/`RESGROUP` parameter.
    Group,
}

/// A validated CMCI resource table name, such as `CICSBundle` or
/// `CICSDefinitionBundle`.
///
/// # Example
///
/// ```rust
/// use cmci::resources::{ResourceType, ScopeRequirement};
///
/// let installed = ResourceType::new("CICSBundle").unwrap();
/// assert!(!installed.is_definitional());
///
/// let definition = ResourceType::new("CICSDefinitionBundle").unwrap();
/// assert_eq!(definition.scope_requirement(), ScopeRequirement::Group);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceType(String);

impl ResourceType {
    /// Creates a new validated resource type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidResourceType`] if the name is empty
    /// or contains anything but ASCII letters and digits.
    pub fn new(resource: impl Into<String>) -> Result<Self, ValidationError> {
        let resource = resource.into();
        if resource.is_empty() || !resource.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidResourceType { resource });
        }
        Ok(Self(resource))
    }

    /// Returns `true` for resource definitions held in the CSD.
    #[must_use]
    pub fn is_definitional(&self) -> bool {
        self.0.to_ascii_lowercase().starts_with(DEFINITION_PREFIX)
    }

    /// Returns the scope qualification this resource type needs.
    #[must_use]
    pub fn scope_requirement(&self) -> ScopeRequirement {
        if self.is_definitional() {
            ScopeRequirement::Group
        } else {
            ScopeRequirement::None
        }
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
