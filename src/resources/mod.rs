//! CMCI resource addressing and response mapping.
//!
//! # Overview
//!
//! This module turns declarative resource selection into CMCI requests and
//! CMCI XML back into structured results:
//!
//! - [`ResourceType`]: A validated resource table name (`CICSBundle`, ...)
//! - [`Filter`]: Comparison trees rendered as `CRITERIA` expressions
//! - [`ResourceSelector`]: Resource type plus optional filter and parameters
//! - [`assemble_request`]: Builds the [`RequestDescriptor`](crate::RequestDescriptor)
//! - [`map_response`] / [`interpret_response`]: Parse and classify responses
//! - [`ResponseResult`]: The normalized response
//!
//! # Example
//!
//! ```rust
//! use cmci::resources::{Filter, FilterOperator};
//!
//! let filter = Filter::and(vec![
//!     Filter::eq("name", "PONG*").unwrap(),
//!     Filter::compare("enablestatus", FilterOperator::Ne, "ENABLED").unwrap(),
//! ])
//! .unwrap();
//!
//! assert_eq!(
//!     filter.to_criteria(),
//!     "(NAME='PONG*') AND (ENABLESTATUS¬='ENABLED')"
//! );
//! ```

mod filter;
mod path;
mod resource_type;
mod response;
mod selector;

pub use filter::{Comparison, Filter, FilterOperator};
pub use path::{
    assemble_request, build_path, check_scope_requirement, RequestParams, CMCI_ROOT,
};
pub use resource_type::{ResourceType, ScopeRequirement};
pub use response::{
    interpret_response, map_response, Record, ResponseResult, CPSM_NODATA, CPSM_OK,
};
pub use selector::{ResourceParameter, ResourceSelector};
