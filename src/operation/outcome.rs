//! The structured result reported back to the automation caller.

use serde::Serialize;

use crate::clients::{CmciError, ErrorKind, RequestDescriptor, TransportError};
use crate::resources::{Record, ResponseResult};

/// The error part of a failed outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Error category, e.g. `TransportError`.
    pub kind: ErrorKind,
    /// Human readable message.
    pub message: String,
}

/// Result of one CMCI operation invocation, serialized as the JSON the
/// caller receives.
///
/// Status fields are `null` when the invocation failed before a response
/// was mapped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CmciOutcome {
    /// `true` if at least one resource was affected.
    pub changed: bool,
    /// `true` if the invocation failed.
    pub failed: bool,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Failure category and message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    /// CMCI connect version.
    pub connect_version: Option<String>,
    /// Textual CPSM reason.
    pub cpsm_reason: Option<String>,
    /// Numeric CPSM reason.
    pub cpsm_reason_code: Option<u32>,
    /// Textual CPSM response.
    pub cpsm_response: Option<String>,
    /// Numeric CPSM response.
    pub cpsm_response_code: Option<u32>,
    /// HTTP reason phrase.
    pub http_status: Option<String>,
    /// HTTP status code.
    pub http_status_code: Option<u16>,
    /// Number of records returned.
    pub record_count: Option<usize>,
    /// Records returned.
    pub records: Vec<Record>,
    /// Number of resources the operation succeeded on.
    pub success_count: Option<usize>,
    /// Per-resource failure diagnostics.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<Record>,
    /// The request that was sent.
    pub request: Option<RequestDescriptor>,
}

impl CmciOutcome {
    /// Builds the outcome of a successful invocation.
    #[must_use]
    pub fn success(result: ResponseResult) -> Self {
        let mut outcome = Self::from_result(result);
        outcome.changed = outcome.success_count.unwrap_or(0) > 0;
        outcome
    }

    /// Builds the outcome of a failed invocation.
    ///
    /// `request` is echoed when the failure happened after the request was
    /// assembled.
    #[must_use]
    pub fn failure(error: &CmciError, request: Option<RequestDescriptor>) -> Self {
        let mut outcome = match error.result() {
            Some(result) => Self::from_result(result.clone()),
            None => Self {
                request,
                ..Self::default()
            },
        };

        if let CmciError::Transport(TransportError::UnexpectedStatus { code, reason }) = error {
            outcome.http_status_code = Some(*code);
            outcome.http_status = Some(reason.clone());
        }

        outcome.changed = false;
        outcome.failed = true;
        outcome.msg = Some(error.to_string());
        outcome.error = Some(ErrorPayload {
            kind: error.kind(),
            message: error.to_string(),
        });
        outcome
    }

    /// Fills in the HTTP status of a response that was received but could not
    /// be mapped. Status fields already set are kept.
    #[must_use]
    pub fn with_http_status(mut self, code: u16, reason: impl Into<String>) -> Self {
        if self.http_status_code.is_none() {
            self.http_status_code = Some(code);
            self.http_status = Some(reason.into());
        }
        self
    }

    fn from_result(result: ResponseResult) -> Self {
        Self {
            changed: false,
            failed: false,
            msg: None,
            error: None,
            connect_version: result.connect_version().map(str::to_string),
            cpsm_reason: Some(result.cpsm_reason().to_string()),
            cpsm_reason_code: Some(result.cpsm_reason_code()),
            cpsm_response: Some(result.cpsm_response().to_string()),
            cpsm_response_code: Some(result.cpsm_response_code()),
            http_status: Some(result.http_status().to_string()),
            http_status_code: Some(result.http_status_code()),
            record_count: Some(result.record_count()),
            records: result.records().to_vec(),
            success_count: Some(result.success_count()),
            feedback: result.feedback().to_vec(),
            request: Some(result.request().clone()),
        }
    }
}
