use crate::decision::{DecisionMode, Verdict};
use crate::error::GateError;

/// Placeholder request id for descriptions that carry none.
pub const UNKNOWN_REQUEST_ID: &str = "-";

/// Request-scoped diagnostics for a single evaluation.
///
/// Every record carries the request id so decisions can be correlated with
/// platform access logs. Records never include the expected secret or the
/// presented header value; only the outcome category and its detail.
///
/// Logging is observability-only: nothing here feeds back into the decision.
#[derive(Debug, Clone, Copy)]
pub struct GateLog<'a> {
    request_id: &'a str,
}

impl<'a> GateLog<'a> {
    /// Creates a logger bound to a request id.
    pub fn new(request_id: Option<&'a str>) -> Self {
        Self {
            request_id: request_id.unwrap_or(UNKNOWN_REQUEST_ID),
        }
    }

    /// Returns the request id associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Records the final outcome of an evaluation at its severity.
    ///
    /// Allow is info; see [`ErrorKind::severity`](crate::ErrorKind::severity)
    /// for the deny levels.
    pub fn outcome(&self, verdict: &Verdict, mode: DecisionMode) {
        match verdict {
            Verdict::Allow => tracing::info!(
                request_id = %self.request_id,
                outcome = "allow",
                %mode,
                "edge secret header validated"
            ),
            Verdict::Deny(err) => self.deny(err, mode),
        }
    }

    fn deny(&self, err: &GateError, mode: DecisionMode) {
        let kind = err.kind();
        let reason = err.reason();
        let level = kind.severity();
        if level == tracing::Level::ERROR {
            tracing::error!(
                request_id = %self.request_id,
                outcome = "deny",
                %kind,
                reason,
                %mode,
                "{}",
                err
            );
        } else if level == tracing::Level::WARN {
            tracing::warn!(
                request_id = %self.request_id,
                outcome = "deny",
                %kind,
                reason,
                %mode,
                "{}",
                err
            );
        } else {
            tracing::info!(
                request_id = %self.request_id,
                outcome = "deny",
                %kind,
                reason,
                %mode,
                "{}",
                err
            );
        }
    }
}
