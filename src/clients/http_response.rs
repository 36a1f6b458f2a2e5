//! Raw HTTP responses returned by the transport client.

/// An HTTP response from the CMCI endpoint, before any CMCI parsing.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The canonical reason phrase for the status code (e.g. `OK`).
    pub reason: String,
    /// The response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub fn new(code: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }
}
