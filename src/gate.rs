use std::panic::{self, AssertUnwindSafe};

use crate::{
    config::GateConfig,
    decision::{Decision, DecisionMode, Verdict},
    error::GateError,
    logging::GateLog,
    request::RequestDescription,
};

/// The edge-origin verification gate.
///
/// Holds the frozen [`GateConfig`] and evaluates request descriptions against
/// it. Evaluation is total: every input, including an absent request or a
/// fault inside the check, produces a [`Decision`], and only a request that
/// presents the exact configured secret in `x-cloudfront-secret` is allowed.
///
/// The gate holds no mutable state and is `Send + Sync`; share one instance
/// across request handlers.
///
/// # Examples
///
/// ```
/// use edge_origin_gate::{DecisionMode, GateConfig, RequestDescription, VerificationGate};
///
/// let gate = VerificationGate::new(GateConfig::with_secret("s3cr3t"));
///
/// let request = RequestDescription::new().with_header("X-CloudFront-Secret", "s3cr3t");
/// let decision = gate.evaluate(Some(&request), DecisionMode::Boolean);
/// assert!(decision.is_allowed());
/// assert_eq!(decision.reason_or_source(), "cloudfront");
///
/// let decision = gate.evaluate(None, DecisionMode::Boolean);
/// assert!(!decision.is_allowed());
/// assert_eq!(decision.reason_or_source(), "Malformed request");
/// ```
#[derive(Debug)]
pub struct VerificationGate {
    config: GateConfig,
}

impl VerificationGate {
    /// Creates a gate around a frozen configuration.
    pub fn new(config: GateConfig) -> Self {
        if !config.is_configured() {
            tracing::error!("edge secret not configured; every request will be denied");
        }
        Self { config }
    }

    /// Returns the gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluates a request and encodes the result for `mode`.
    ///
    /// Emits exactly one outcome log record per call.
    pub fn evaluate(&self, request: Option<&RequestDescription>, mode: DecisionMode) -> Decision {
        let log = GateLog::new(request.and_then(RequestDescription::request_id));
        let verdict = self.verdict(request, mode);
        log.outcome(&verdict, mode);
        mode.encode(&verdict, request.and_then(RequestDescription::resource))
    }

    /// Shorthand for [`DecisionMode::Boolean`].
    pub fn evaluate_boolean(&self, request: Option<&RequestDescription>) -> Decision {
        self.evaluate(request, DecisionMode::Boolean)
    }

    /// Shorthand for [`DecisionMode::Policy`].
    pub fn evaluate_policy(&self, request: Option<&RequestDescription>) -> Decision {
        self.evaluate(request, DecisionMode::Policy)
    }

    /// Records and encodes a deny raised before a request description existed.
    ///
    /// Used by adapters that fail to build a description from raw input, so
    /// their failures go through the same reporting path as the gate's own.
    pub fn reject(&self, err: GateError, request_id: Option<&str>, mode: DecisionMode) -> Decision {
        let verdict = Verdict::Deny(err);
        GateLog::new(request_id).outcome(&verdict, mode);
        mode.encode(&verdict, None)
    }

    /// Runs the check and contains any panic as an internal fault.
    ///
    /// The credential check is the same for every mode. Only an allow in
    /// policy mode additionally needs a resource to scope the statement to.
    pub fn verdict(&self, request: Option<&RequestDescription>, mode: DecisionMode) -> Verdict {
        contain(|| {
            let request = self.check(request)?;
            if mode == DecisionMode::Policy && request.resource().map_or(true, str::is_empty) {
                return Err(GateError::MalformedInput(
                    "policy decision requested without a resource".into(),
                ));
            }
            Ok(())
        })
    }

    /// The verification core. Order of checks is fixed: shape, config,
    /// presence, equality.
    fn check<'r>(
        &self,
        request: Option<&'r RequestDescription>,
    ) -> Result<&'r RequestDescription, GateError> {
        let request = request.ok_or_else(|| GateError::MalformedInput("no request".into()))?;
        if request.headers().is_none() {
            return Err(GateError::MalformedInput("missing headers".into()));
        }

        let expected = self.config.expected_secret().ok_or_else(|| {
            GateError::Configuration(format!(
                "{} environment variable not set",
                crate::config::CLOUDFRONT_SECRET_ENV_VAR
            ))
        })?;

        let mut presented = request
            .secret_header_values()
            .filter(|v| !v.is_empty())
            .peekable();
        if presented.peek().is_none() {
            return Err(GateError::MissingCredential);
        }

        // Every non-empty candidate is compared so header order cannot change the outcome.
        let mut matched = false;
        for value in presented {
            matched |= expected.matches(value);
        }

        if matched {
            Ok(request)
        } else {
            Err(GateError::InvalidCredential)
        }
    }
}

/// Runs `check`, turning a panic into [`GateError::InternalFault`].
fn contain<F>(check: F) -> Verdict
where
    F: FnOnce() -> Result<(), GateError>,
{
    match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(result) => Verdict::from(result),
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic during evaluation".to_string());
            Verdict::Deny(GateError::InternalFault(detail))
        }
    }
}
