//! CMCI operations and the pipeline that runs them.
//!
//! # Overview
//!
//! Every operation runs through the same linear pipeline:
//!
//! ```text
//! VALIDATE_INPUT -> BUILD_FILTER -> ASSEMBLE_REQUEST -> SEND -> MAP_RESPONSE -> REPORT
//! ```
//!
//! A failure at any stage jumps straight to `REPORT`, which always produces
//! a [`CmciOutcome`]. Operations only supply what differs between verbs
//! through the [`CmciOperation`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use cmci::operation::{execute_json, DeleteOperation};
//! use serde_json::json;
//!
//! let outcome = execute_json(&DeleteOperation, json!({
//!     "cmci_host": "winmvs2c.example.com",
//!     "cmci_port": 10080,
//!     "context": "iyk3z0r9",
//!     "resource_name": "CICSBundle",
//!     "resource": {"filter": {"name": "PONGALT"}}
//! }))
//! .await;
//!
//! assert!(!outcome.failed);
//! ```

mod arguments;
mod delete;
mod outcome;

use std::fmt;

pub use arguments::{
    AndGroup, CmciArguments, ComplexFilter, FilterCriterion, FilterLeaf, FilterSpec,
    OperatorCriterion, OrGroup, ParameterEntry, ParametersSpec, PortValue, ResourceArguments,
    ScalarValue,
};
pub use delete::{DeleteOperation, DeleteOption};
pub use outcome::{CmciOutcome, ErrorPayload};

use crate::clients::{CmciError, HttpClient, HttpMethod, RequestDescriptor};
use crate::error::ValidationError;
use crate::resources::{
    assemble_request, interpret_response, RequestParams, ResourceSelector, ResponseResult,
};

/// The verb specific part of a CMCI operation.
pub trait CmciOperation: Send + Sync {
    /// Operation name used in log output.
    fn name(&self) -> &'static str;

    /// HTTP method the operation is sent with.
    fn method(&self) -> HttpMethod;

    /// Operation specific checks, run after the selector is built.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the arguments do not apply to the
    /// selected resources.
    fn validate(
        &self,
        _arguments: &CmciArguments,
        _selector: &ResourceSelector,
    ) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Query parameters of the request.
    fn request_params(&self, selector: &ResourceSelector) -> RequestParams {
        RequestParams::from_selector(selector)
    }

    /// XML request body. Operations without a body return `None`.
    fn request_body(&self, _selector: &ResourceSelector) -> Option<String> {
        None
    }
}

/// Pipeline stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Arguments are checked against the schema.
    ValidateInput,
    /// The resource selector and its filter are built.
    BuildFilter,
    /// The request URL is composed.
    AssembleRequest,
    /// The request is sent.
    Send,
    /// The response is parsed and classified.
    MapResponse,
    /// The outcome is produced.
    Report,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateInput => "VALIDATE_INPUT",
            Self::BuildFilter => "BUILD_FILTER",
            Self::AssembleRequest => "ASSEMBLE_REQUEST",
            Self::Send => "SEND",
            Self::MapResponse => "MAP_RESPONSE",
            Self::Report => "REPORT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline failure, with the request if one had been assembled and the
/// HTTP status if a response was received.
struct Failure {
    error: CmciError,
    request: Option<RequestDescriptor>,
    status: Option<(u16, String)>,
}

impl From<ValidationError> for Failure {
    fn from(error: ValidationError) -> Self {
        Self {
            error: error.into(),
            request: None,
            status: None,
        }
    }
}

fn enter<O: CmciOperation + ?Sized>(operation: &O, stage: Stage) {
    tracing::debug!(operation = operation.name(), stage = %stage, "Entering stage");
}

/// Runs `operation` with already deserialized arguments.
pub async fn execute<O: CmciOperation + ?Sized>(
    operation: &O,
    arguments: &CmciArguments,
) -> CmciOutcome {
    let outcome = match run(operation, arguments).await {
        Ok(result) => CmciOutcome::success(result),
        Err(failure) => {
            tracing::debug!(
                operation = operation.name(),
                kind = %failure.error.kind(),
                error = %failure.error,
                "Operation failed"
            );
            let outcome = CmciOutcome::failure(&failure.error, failure.request);
            match failure.status {
                Some((code, reason)) => outcome.with_http_status(code, reason),
                None => outcome,
            }
        }
    };
    enter(operation, Stage::Report);
    outcome
}

/// Runs `operation` with raw JSON arguments.
///
/// Schema violations are reported as a failed outcome with a
/// `ValidationError`.
pub async fn execute_json<O: CmciOperation + ?Sized>(
    operation: &O,
    arguments: serde_json::Value,
) -> CmciOutcome {
    match CmciArguments::from_value(arguments) {
        Ok(arguments) => execute(operation, &arguments).await,
        Err(error) => {
            enter(operation, Stage::ValidateInput);
            enter(operation, Stage::Report);
            CmciOutcome::failure(&error.into(), None)
        }
    }
}

async fn run<O: CmciOperation + ?Sized>(
    operation: &O,
    arguments: &CmciArguments,
) -> Result<ResponseResult, Failure> {
    enter(operation, Stage::ValidateInput);
    let config = arguments.connection()?;

    enter(operation, Stage::BuildFilter);
    let selector = arguments.selector()?;
    operation.validate(arguments, &selector)?;

    enter(operation, Stage::AssembleRequest);
    let request = assemble_request(
        &config,
        &selector,
        operation.method(),
        &operation.request_params(&selector),
        operation.request_body(&selector),
    )?;

    enter(operation, Stage::Send);
    let with_request = |error: CmciError, request: &RequestDescriptor| Failure {
        error,
        request: Some(request.clone()),
        status: None,
    };
    let client = HttpClient::new(&config).map_err(|e| with_request(e.into(), &request))?;
    let response = client
        .send(&request)
        .await
        .map_err(|e| with_request(e.into(), &request))?;

    enter(operation, Stage::MapResponse);
    let echo = request.clone();
    interpret_response(&response, request).map_err(|error| Failure {
        error,
        request: Some(echo),
        status: Some((response.code, response.reason.clone())),
    })
}
