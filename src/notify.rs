//! Failure diagnostics and the operational notification seam.
//!
//! Every failed payment attempt produces exactly one [`FailureReport`],
//! delivered to the configured [`Notifier`] and logged. The default sink
//! logs through `tracing`; deployments wire their own sink (chat webhook,
//! pager, ticket queue) by implementing [`Notifier`].

use std::fmt;

use tracing::error;

/// Structured diagnostic for a failed payment attempt.
///
/// Carries everything an operator needs to reproduce the exchange. The
/// merchant secret never appears here: request headers contain the signature
/// digest, not the key.
#[derive(Debug, Clone, Default)]
pub struct FailureReport {
    /// Service name from the client configuration.
    pub service: String,
    /// HTTP status of the gateway response, when one was obtained.
    pub status: Option<u16>,
    /// Headers of the outbound request.
    pub request_headers: Vec<(String, String)>,
    /// Body of the outbound request.
    pub request_body: String,
    /// Headers of the gateway response, when one was obtained.
    pub response_headers: Vec<(String, String)>,
    /// Body of the gateway response, when one was obtained.
    pub response_body: String,
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl FailureReport {
    /// Creates a report for a failure with no response context.
    #[must_use]
    pub fn new(service: &str, message: &str) -> Self {
        Self { service: service.to_owned(), message: message.to_owned(), ..Self::default() }
    }

    /// Attaches the outbound request context.
    #[must_use]
    pub fn with_request(mut self, headers: Vec<(String, String)>, body: &str) -> Self {
        self.request_headers = headers;
        self.request_body = body.to_owned();
        self
    }

    /// Attaches the gateway response context.
    #[must_use]
    pub fn with_response(
        mut self,
        status: u16,
        headers: Vec<(String, String)>,
        body: &str,
    ) -> Self {
        self.status = Some(status);
        self.response_headers = headers;
        self.response_body = body.to_owned();
        self
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} payment error ==", self.service)?;
        if let Some(status) = self.status {
            writeln!(f, "status: {status}")?;
        }
        writeln!(f, "message: {}", self.message)?;
        writeln!(f, "request headers: {:?}", self.request_headers)?;
        writeln!(f, "request body: {}", self.request_body)?;
        if !self.response_headers.is_empty() || !self.response_body.is_empty() {
            writeln!(f, "response headers: {:?}", self.response_headers)?;
            writeln!(f, "response body: {}", self.response_body)?;
        }
        Ok(())
    }
}

/// Sink for operational alerts about failed payment attempts.
///
/// Implementations must be cheap and non-blocking from the caller's point of
/// view; the client invokes `notify` on its own request path.
pub trait Notifier: Send + Sync {
    /// Delivers one failure report.
    fn notify(&self, report: &FailureReport);
}

/// Default sink: emits the report as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, report: &FailureReport) {
        error!(
            service = %report.service,
            status = report.status,
            message = %report.message,
            "payment attempt failed"
        );
    }
}
