//! The CMCI delete operation.
//!
//! Installed resources are discarded from the running CICS regions.
//! Definitional resources (`CICSDefinition*`) are deleted from the CSD or
//! the CICSPlex SM data repository and must name their group.

use std::fmt;
use std::str::FromStr;

use crate::clients::HttpMethod;
use crate::error::ValidationError;
use crate::operation::{CmciArguments, CmciOperation};
use crate::resources::ResourceSelector;

/// The `option` argument of the delete operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOption {
    /// Remove a resource definition from its repository.
    Delete,
    /// Remove an installed resource from a running region.
    Discard,
}

impl DeleteOption {
    /// Returns the option name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Discard => "discard",
        }
    }

    /// Checks that the option applies to the selected resource type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompatibleOption`] for `delete` on an
    /// installed resource type or `discard` on a definitional one.
    pub fn check(self, selector: &ResourceSelector) -> Result<(), ValidationError> {
        let resource_type = selector.resource_type();
        let reason = match (self, resource_type.is_definitional()) {
            (Self::Delete, false) => "delete applies to resource definitions only",
            (Self::Discard, true) => "discard applies to installed resources only",
            _ => return Ok(()),
        };
        Err(ValidationError::IncompatibleOption {
            option: self.as_str().to_string(),
            resource: resource_type.to_string(),
            reason,
        })
    }
}

impl FromStr for DeleteOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "discard" => Ok(Self::Discard),
            _ => Err(ValidationError::InvalidOption {
                option: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DeleteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deletes or discards CICS resources with `DELETE`.
///
/// # Example
///
/// ```rust,ignore
/// use cmci::operation::{execute_json, DeleteOperation};
///
/// let outcome = execute_json(&DeleteOperation, arguments).await;
/// println!("{}", serde_json::to_string_pretty(&outcome)?);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DeleteOperation;

impl CmciOperation for DeleteOperation {
    fn name(&self) -> &'static str {
        "cmci_delete"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Delete
    }

    fn validate(
        &self,
        arguments: &CmciArguments,
        selector: &ResourceSelector,
    ) -> Result<(), ValidationError> {
        match arguments.option.as_deref() {
            Some(option) => option.parse::<DeleteOption>()?.check(selector),
            None => Ok(()),
        }
    }
}
