//! Mapping of CMCI XML responses to [`ResponseResult`].
//!
//! A CMCI response looks like:
//!
//! ```xml
//! <response xmlns="http://www.ibm.com/xmlns/prod/CICS/smw2int" version="3.0" connect_version="0560">
//!   <resultsummary api_response1="1024" api_response2="0" api_response1_alt="OK"
//!                  api_response2_alt="" recordcount="1" successcount="1"/>
//!   <records>
//!     <cicsbundle _keydata="D7D6D5C7C1D3E3" name="PONGALT" enablestatus="DISABLED"/>
//!   </records>
//! </response>
//! ```
//!
//! Record attributes are kept as strings, exactly as returned.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::clients::{
    ApiError, CmciError, HttpResponse, RequestDescriptor, ResponseParseError, TransportError,
};

/// A returned resource record: attribute name to raw string value.
pub type Record = BTreeMap<String, String>;

/// CPSM response code for a successful call.
pub const CPSM_OK: u32 = 1024;

/// CPSM response code when nothing matched the request.
pub const CPSM_NODATA: u32 = 1027;

/// The `<resultsummary>` element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ResultSummary {
    response_code: u32,
    response: String,
    reason_code: u32,
    reason: String,
    success_count: Option<usize>,
}

/// Everything read from a CMCI document.
#[derive(Debug, Default)]
struct ParsedDocument {
    connect_version: Option<String>,
    summary: Option<ResultSummary>,
    records: Vec<Record>,
    feedback: Vec<Record>,
}

/// The normalized result of one CMCI request.
///
/// `record_count()` always equals `records().len()` and `success_count()`
/// never exceeds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResponseResult {
    http_status_code: u16,
    http_status: String,
    connect_version: Option<String>,
    cpsm_response_code: u32,
    cpsm_response: String,
    cpsm_reason_code: u32,
    cpsm_reason: String,
    records: Vec<Record>,
    success_count: usize,
    feedback: Vec<Record>,
    request: RequestDescriptor,
}

impl ResponseResult {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        self.http_status_code
    }

    /// Returns the HTTP reason phrase.
    #[must_use]
    pub fn http_status(&self) -> &str {
        &self.http_status
    }

    /// Returns the CMCI connect version, if reported.
    #[must_use]
    pub fn connect_version(&self) -> Option<&str> {
        self.connect_version.as_deref()
    }

    /// Returns the numeric CPSM response code (`api_response1`).
    #[must_use]
    pub const fn cpsm_response_code(&self) -> u32 {
        self.cpsm_response_code
    }

    /// Returns the textual CPSM response (`api_response1_alt`).
    #[must_use]
    pub fn cpsm_response(&self) -> &str {
        &self.cpsm_response
    }

    /// Returns the numeric CPSM reason code (`api_response2`).
    #[must_use]
    pub const fn cpsm_reason_code(&self) -> u32 {
        self.cpsm_reason_code
    }

    /// Returns the textual CPSM reason (`api_response2_alt`).
    #[must_use]
    pub fn cpsm_reason(&self) -> &str {
        &self.cpsm_reason
    }

    /// Returns the records in document order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the number of resources the operation succeeded on.
    #[must_use]
    pub const fn success_count(&self) -> usize {
        self.success_count
    }

    /// Returns `<feedback>` entries describing per-resource failures.
    #[must_use]
    pub fn feedback(&self) -> &[Record] {
        &self.feedback
    }

    /// Returns the request that produced this response.
    #[must_use]
    pub const fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    /// Returns `true` if the CPSM response is `OK`.
    #[must_use]
    pub fn is_cpsm_ok(&self) -> bool {
        self.cpsm_response_code == CPSM_OK
    }

    /// Returns `true` if the CPSM response is `NODATA`.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.cpsm_response_code == CPSM_NODATA
    }

    /// Returns `true` for a 2xx status with an `OK` or `NODATA` CPSM response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.http_status_code) && (self.is_cpsm_ok() || self.is_no_data())
    }
}

/// Maps a raw HTTP response to a [`ResponseResult`].
///
/// # Errors
///
/// Returns [`ResponseParseError`] if the body is not well-formed XML, has no
/// `<response>` root or `<resultsummary>`, or its response codes are not
/// numeric.
pub fn map_response(
    response: &HttpResponse,
    request: RequestDescriptor,
) -> Result<ResponseResult, ResponseParseError> {
    let document = parse_document(&response.body)?;
    let summary = document
        .summary
        .ok_or(ResponseParseError::MissingField("resultsummary"))?;

    let record_count = document.records.len();
    let cpsm_ok = summary.response_code == CPSM_OK;
    let success_count = match summary.success_count {
        Some(count) if count > record_count => {
            tracing::warn!(
                success_count = count,
                record_count,
                "successcount exceeds the records returned, clamping"
            );
            record_count
        }
        Some(count) => count,
        None if !document.feedback.is_empty() => {
            record_count.saturating_sub(document.feedback.len())
        }
        None if response.is_ok() && cpsm_ok => record_count,
        None => 0,
    };

    Ok(ResponseResult {
        http_status_code: response.code,
        http_status: response.reason.clone(),
        connect_version: document.connect_version,
        cpsm_response_code: summary.response_code,
        cpsm_response: summary.response,
        cpsm_reason_code: summary.reason_code,
        cpsm_reason: summary.reason,
        records: document.records,
        success_count,
        feedback: document.feedback,
        request,
    })
}

/// Maps a raw HTTP response and classifies the outcome.
///
/// - 2xx with CPSM `OK`/`NODATA`: the result
/// - any other well-formed CMCI response: [`ApiError`]
/// - non-2xx whose body is not a CMCI response: [`TransportError::UnexpectedStatus`]
/// - 2xx whose body is not a CMCI response: [`ResponseParseError`]
///
/// # Errors
///
/// See above.
pub fn interpret_response(
    response: &HttpResponse,
    request: RequestDescriptor,
) -> Result<ResponseResult, CmciError> {
    match map_response(response, request) {
        Ok(result) if result.is_success() => Ok(result),
        Ok(result) => {
            tracing::warn!(
                http_status_code = result.http_status_code,
                cpsm_response = %result.cpsm_response,
                cpsm_reason = %result.cpsm_reason,
                "CMCI request was not successful"
            );
            Err(ApiError {
                response: result.cpsm_response.clone(),
                response_code: result.cpsm_response_code,
                reason: result.cpsm_reason.clone(),
                reason_code: result.cpsm_reason_code,
                result: Box::new(result),
            }
            .into())
        }
        Err(parse_error) if !response.is_ok() => {
            tracing::debug!(error = %parse_error, "Non-2xx body is not a CMCI response");
            Err(TransportError::UnexpectedStatus {
                code: response.code,
                reason: response.reason.clone(),
            }
            .into())
        }
        Err(parse_error) => Err(parse_error.into()),
    }
}

fn parse_document(body: &str) -> Result<ParsedDocument, ResponseParseError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut document = ParsedDocument::default();
    let mut seen_root = false;
    // Local names of the currently open elements.
    let mut open: Vec<String> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            ResponseParseError::Malformed(format!("{e} at position {}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = local_name(e);
                let parent = open.last().map(String::as_str);

                match (parent, name.as_str()) {
                    (None, "response") => {
                        seen_root = true;
                        document.connect_version = attributes(e)?.remove("connect_version");
                    }
                    (None, other) => {
                        return Err(ResponseParseError::Malformed(format!(
                            "unexpected root element <{other}>"
                        )));
                    }
                    (_, "resultsummary") => {
                        document.summary = Some(parse_summary(&attributes(e)?)?);
                    }
                    (_, "feedback") => document.feedback.push(attributes(e)?),
                    (Some("records"), _) => document.records.push(attributes(e)?),
                    _ => {}
                }

                if matches!(event, Event::Start(_)) {
                    open.push(name);
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(ResponseParseError::Malformed(format!(
            "unexpected end of document inside <{}>",
            open.join("><")
        )));
    }
    if !seen_root {
        return Err(ResponseParseError::MissingField("response"));
    }
    Ok(document)
}

fn parse_summary(attributes: &Record) -> Result<ResultSummary, ResponseParseError> {
    let response_code = parse_number(attributes, "api_response1")?
        .ok_or(ResponseParseError::MissingField("api_response1"))?;
    let reason_code = parse_number(attributes, "api_response2")?.unwrap_or(0);
    let success_count = parse_number(attributes, "successcount")?;

    let response = attributes
        .get("api_response1_alt")
        .cloned()
        .unwrap_or_else(|| match response_code {
            CPSM_OK => "OK".to_string(),
            CPSM_NODATA => "NODATA".to_string(),
            _ => String::new(),
        });
    let reason = attributes.get("api_response2_alt").cloned().unwrap_or_default();

    Ok(ResultSummary {
        response_code,
        response,
        reason_code,
        reason,
        success_count: success_count.map(|count| count as usize),
    })
}

fn parse_number(attributes: &Record, field: &'static str) -> Result<Option<u32>, ResponseParseError> {
    attributes
        .get(field)
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| ResponseParseError::InvalidNumber {
                    field,
                    value: value.clone(),
                })
        })
        .transpose()
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().into_inner()).into_owned()
}

fn attributes(element: &BytesStart<'_>) -> Result<Record, ResponseParseError> {
    let mut record = Record::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ResponseParseError::Malformed(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().into_inner()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ResponseParseError::Malformed(e.to_string()))?
            .into_owned();
        record.insert(key, value);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;

    const ONE_BUNDLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response xmlns="http://www.ibm.com/xmlns/prod/CICS/smw2int" version="3.0" connect_version="0560">
  <resultsummary api_response1="1024" api_response2="0" api_response1_alt="OK" api_response2_alt="" recordcount="1" displayed_recordcount="1"/>
  <records>
    <cicsbundle _keydata="D7D6D5C7C1D3E3" name="PONGALT" enablestatus="DISABLED" partcount="0" eyu_cicsname="IYCWEMW2"/>
  </records>
</response>"#;

    const NO_DATA: &str = r#"<response connect_version="0560">
  <resultsummary api_response1="1027" api_response2="0" api_response1_alt="NODATA" api_response2_alt="" recordcount="0"/>
</response>"#;

    fn request() -> RequestDescriptor {
        RequestDescriptor::new(
            HttpMethod::Delete,
            "http://host:1/CICSSystemManagement/CICSBundle/plex",
            None,
        )
    }

    fn http(code: u16, body: &str) -> HttpResponse {
        HttpResponse::new(code, "", body)
    }

    #[test]
    fn test_maps_summary_and_records() {
        let result = map_response(&http(200, ONE_BUNDLE), request()).unwrap();

        assert_eq!(result.connect_version(), Some("0560"));
        assert_eq!(result.cpsm_response_code(), 1024);
        assert_eq!(result.cpsm_response(), "OK");
        assert_eq!(result.cpsm_reason_code(), 0);
        assert_eq!(result.record_count(), 1);
        assert_eq!(result.success_count(), 1);
        assert!(result.is_success());

        let record = &result.records()[0];
        assert_eq!(record.get("name").map(String::as_str), Some("PONGALT"));
        assert_eq!(record.get("partcount").map(String::as_str), Some("0"));
        assert_eq!(record.get("_keydata").map(String::as_str), Some("D7D6D5C7C1D3E3"));
        assert!(!record.contains_key("xmlns"));
    }

    #[test]
    fn test_no_data_is_successful_and_empty() {
        let result = map_response(&http(200, NO_DATA), request()).unwrap();

        assert!(result.is_no_data());
        assert!(result.is_success());
        assert_eq!(result.record_count(), 0);
        assert_eq!(result.success_count(), 0);
    }

    #[test]
    fn test_success_count_attribute_is_authoritative_and_clamped() {
        let body = r#"<response><resultsummary api_response1="1024" api_response1_alt="OK" successcount="5"/>
<records><cicsprogram program="A"/><cicsprogram program="B"/></records></response>"#;
        let result = map_response(&http(200, body), request()).unwrap();
        assert_eq!(result.record_count(), 2);
        assert_eq!(result.success_count(), 2);

        let body = r#"<response><resultsummary api_response1="1024" api_response1_alt="OK" successcount="1"/>
<records><cicsprogram program="A"/><cicsprogram program="B"/></records></response>"#;
        let result = map_response(&http(200, body), request()).unwrap();
        assert_eq!(result.success_count(), 1);
    }

    #[test]
    fn test_feedback_entries_reduce_success_count() {
        let body = r#"<response>
  <resultsummary api_response1="1041" api_response1_alt="TABLEERROR" api_response2="1361" api_response2_alt="DATAERROR"/>
  <records>
    <cicsprogram program="A"/>
    <cicsprogram program="B"/>
  </records>
  <errors><feedback errorcode="16" eibresp="16" eibresp2="3" action="DISCARD"/></errors>
</response>"#;
        let result = map_response(&http(200, body), request()).unwrap();

        assert_eq!(result.record_count(), 2);
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.feedback().len(), 1);
        assert_eq!(
            result.feedback()[0].get("action").map(String::as_str),
            Some("DISCARD")
        );
        assert!(!result.is_success());
    }

    #[test]
    fn test_failed_call_without_indicators_counts_nothing() {
        let body = r#"<response><resultsummary api_response1="1034" api_response1_alt="NOTAVAILABLE" api_response2="1361" api_response2_alt="CMAS"/></response>"#;
        let result = map_response(&http(200, body), request()).unwrap();

        assert_eq!(result.success_count(), 0);
        assert_eq!(result.cpsm_reason(), "CMAS");
    }

    #[test]
    fn test_nested_children_of_records_are_not_records() {
        let body = r#"<response><resultsummary api_response1="1024"/>
<records><cicsbundle name="A"><bundlepart name="P1"/></cicsbundle></records></response>"#;
        let result = map_response(&http(200, body), request()).unwrap();

        assert_eq!(result.record_count(), 1);
        assert_eq!(result.cpsm_response(), "OK");
    }

    #[test]
    fn test_escaped_attribute_values_are_unescaped() {
        let body = r#"<response><resultsummary api_response1="1024"/>
<records><cicsbundle description="A &amp; B"/></records></response>"#;
        let result = map_response(&http(200, body), request()).unwrap();
        assert_eq!(
            result.records()[0].get("description").map(String::as_str),
            Some("A & B")
        );
    }

    #[test]
    fn test_missing_summary_is_a_parse_error() {
        let body = r#"<response connect_version="0560"><records/></response>"#;
        assert_eq!(
            map_response(&http(200, body), request()),
            Err(ResponseParseError::MissingField("resultsummary"))
        );
    }

    #[test]
    fn test_non_numeric_code_is_a_parse_error() {
        let body = r#"<response><resultsummary api_response1="OK"/></response>"#;
        assert!(matches!(
            map_response(&http(200, body), request()),
            Err(ResponseParseError::InvalidNumber { field: "api_response1", .. })
        ));
    }

    #[test]
    fn test_plain_text_body_is_a_parse_error() {
        assert_eq!(
            map_response(&http(200, "Not Found"), request()),
            Err(ResponseParseError::MissingField("response"))
        );
    }

    #[test]
    fn test_unclosed_document_is_malformed() {
        let body = r#"<response><resultsummary api_response1="1024"/><records>"#;
        assert!(matches!(
            map_response(&http(200, body), request()),
            Err(ResponseParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_interpret_non_ok_cpsm_response_is_api_error() {
        let body = r#"<response><resultsummary api_response1="1034" api_response1_alt="NOTAVAILABLE" api_response2="0"/></response>"#;
        let error = interpret_response(&http(200, body), request()).unwrap_err();

        match error {
            CmciError::Api(api) => {
                assert_eq!(api.response, "NOTAVAILABLE");
                assert_eq!(api.response_code, 1034);
                assert_eq!(api.result.http_status_code(), 200);
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_interpret_404_with_garbage_is_transport_error() {
        let error = interpret_response(&http(404, "<html>oops"), request()).unwrap_err();
        assert!(matches!(
            error,
            CmciError::Transport(TransportError::UnexpectedStatus { code: 404, .. })
        ));
    }

    #[test]
    fn test_interpret_200_with_garbage_is_parse_error() {
        let error = interpret_response(&http(200, "garbage"), request()).unwrap_err();
        assert!(matches!(error, CmciError::ResponseParse(_)));
    }

    #[test]
    fn test_interpret_error_status_with_ok_summary_is_api_error() {
        let error = interpret_response(&http(500, NO_DATA), request()).unwrap_err();
        assert!(matches!(error, CmciError::Api(_)));
    }
}
