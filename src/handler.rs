//! Invocation entry point.
//!
//! Ties the event adapter and the gate together: raw event in, serialized
//! decision out. This is what a platform runtime (or the bundled CLI) calls
//! once per inbound request.

use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::config::GateConfig;
use crate::decision::{Decision, DecisionMode};
use crate::event::{request_from_event, request_id_of};
use crate::gate::VerificationGate;

static PROCESS_GATE: OnceLock<VerificationGate> = OnceLock::new();

/// Returns the process-wide gate, configured from the environment on first use.
///
/// The configuration is read exactly once and frozen; later changes to
/// `CLOUDFRONT_SECRET` are not observed.
pub fn process_gate() -> &'static VerificationGate {
    PROCESS_GATE.get_or_init(|| VerificationGate::new(GateConfig::from_env()))
}

/// Evaluates a raw invocation event and returns the typed decision.
pub fn decide_event(event: &Value, gate: &VerificationGate, mode: DecisionMode) -> Decision {
    match request_from_event(event) {
        Ok(request) => gate.evaluate(Some(&request), mode),
        Err(err) => {
            let request_id = event.as_object().and_then(request_id_of);
            gate.reject(err, request_id, mode)
        }
    }
}

/// Evaluates a raw invocation event and returns the decision as JSON.
///
/// # Examples
///
/// ```
/// use edge_origin_gate::handler::handle_event;
/// use edge_origin_gate::{DecisionMode, GateConfig, VerificationGate};
/// use serde_json::json;
///
/// let gate = VerificationGate::new(GateConfig::with_secret("s3cr3t"));
/// let event = json!({ "headers": { "x-cloudfront-secret": "s3cr3t" } });
///
/// let response = handle_event(&event, &gate, DecisionMode::Boolean);
/// assert_eq!(response["authorized"], true);
/// ```
pub fn handle_event(event: &Value, gate: &VerificationGate, mode: DecisionMode) -> Value {
    let decision = decide_event(event, gate, mode);
    serde_json::to_value(&decision).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to serialize decision");
        fallback_deny(mode)
    })
}

/// Static deny used if a decision cannot be serialized.
fn fallback_deny(mode: DecisionMode) -> Value {
    match mode {
        DecisionMode::Boolean => json!({
            "authorized": false,
            "context": { "reason_or_source": "Authorization error" }
        }),
        DecisionMode::Policy => json!({
            "principal": crate::decision::EDGE_PRINCIPAL,
            "effect": "Deny",
            "statement": {
                "action": crate::decision::INVOKE_ACTION,
                "effect": "Deny",
                "resource": ""
            },
            "context": { "reason_or_source": "Authorization error" }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> VerificationGate {
        VerificationGate::new(GateConfig::with_secret("s3cr3t"))
    }

    #[test]
    fn adapter_errors_are_denied() {
        let response = handle_event(&json!({ "headers": [] }), &gate(), DecisionMode::Boolean);
        assert_eq!(response["authorized"], false);
        assert_eq!(response["context"]["reason_or_source"], "Authorization error");
    }

    #[test]
    fn null_event_is_malformed() {
        let response = handle_event(&Value::Null, &gate(), DecisionMode::Boolean);
        assert_eq!(response["context"]["reason_or_source"], "Malformed request");
    }

    #[test]
    fn policy_mode_round_trip() {
        let event = json!({
            "headers": { "X-CloudFront-Secret": "s3cr3t" },
            "methodArn": "arn:aws:execute-api:us-east-1:1:api/prod/PUT/example"
        });
        let response = handle_event(&event, &gate(), DecisionMode::Policy);

        assert_eq!(response["effect"], "Allow");
        assert_eq!(
            response["statement"]["resource"],
            "arn:aws:execute-api:us-east-1:1:api/prod/PUT/example"
        );
    }

    #[test]
    fn fallback_deny_never_allows() {
        assert_eq!(fallback_deny(DecisionMode::Boolean)["authorized"], false);
        assert_eq!(fallback_deny(DecisionMode::Policy)["effect"], "Deny");
    }
}
