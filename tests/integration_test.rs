//! End-to-end scenarios for the verification gate.

use std::sync::Arc;
use std::thread;

use edge_origin_gate::{
    DecisionMode, Effect, GateConfig, RequestDescription, VerificationGate, EDGE_PRINCIPAL,
    INVOKE_ACTION,
};

const ROUTE: &str = "arn:aws:execute-api:us-east-1:123456789012:ftwapi/prod/PUT/example";

fn gate() -> VerificationGate {
    VerificationGate::new(GateConfig::with_secret("s3cr3t"))
}

#[test]
fn correct_secret_is_allowed_in_both_modes() {
    let request = RequestDescription::new()
        .with_header("x-cloudfront-secret", "s3cr3t")
        .with_resource(ROUTE);

    let boolean = gate().evaluate(Some(&request), DecisionMode::Boolean);
    let boolean = boolean.as_boolean().expect("boolean encoding");
    assert!(boolean.authorized);
    assert_eq!(boolean.context.reason_or_source, "cloudfront");

    let policy = gate().evaluate(Some(&request), DecisionMode::Policy);
    let policy = policy.as_policy().expect("policy encoding");
    assert_eq!(policy.effect, Effect::Allow);
    assert_eq!(policy.principal, EDGE_PRINCIPAL);
    assert_eq!(policy.statement.action, INVOKE_ACTION);
    assert_eq!(policy.statement.resource, ROUTE);
}

#[test]
fn no_headers_is_missing_credential() {
    let request = RequestDescription::new();
    let decision = gate().evaluate_boolean(Some(&request));

    assert!(!decision.is_allowed());
    assert_eq!(decision.reason_or_source(), "Missing authorization header");
}

#[test]
fn wrong_secret_is_invalid() {
    let request = RequestDescription::new().with_header("X-CloudFront-Secret", "wrong");
    let decision = gate().evaluate_boolean(Some(&request));

    assert!(!decision.is_allowed());
    assert_eq!(decision.reason_or_source(), "Invalid authorization");
}

#[test]
fn unset_secret_is_configuration_error() {
    let gate = VerificationGate::new(GateConfig::from_lookup(|_| None));
    let request = RequestDescription::new().with_header("x-cloudfront-secret", "anything");
    let decision = gate.evaluate_boolean(Some(&request));

    assert!(!decision.is_allowed());
    assert_eq!(decision.reason_or_source(), "Configuration error");
}

#[test]
fn absent_request_is_malformed() {
    let decision = gate().evaluate_boolean(None);

    assert!(!decision.is_allowed());
    assert_eq!(decision.reason_or_source(), "Malformed request");
}

#[test]
fn policy_deny_is_scoped_to_resource() {
    let request = RequestDescription::new()
        .with_header("x-cloudfront-secret", "nope")
        .with_resource(ROUTE);
    let decision = gate().evaluate_policy(Some(&request));
    let policy = decision.as_policy().expect("policy encoding");

    assert_eq!(policy.effect, Effect::Deny);
    assert_eq!(policy.statement.effect, Effect::Deny);
    assert_eq!(policy.resource(), ROUTE);
    assert_eq!(policy.context.reason_or_source, "Invalid authorization");
}

#[test]
fn policy_without_resource_is_denied() {
    let request = RequestDescription::new().with_header("x-cloudfront-secret", "s3cr3t");
    let decision = gate().evaluate_policy(Some(&request));

    assert!(!decision.is_allowed());
    assert_eq!(decision.reason_or_source(), "Malformed request");
}

#[test]
fn mode_does_not_change_outcome() {
    let cases = [
        RequestDescription::new().with_resource(ROUTE),
        RequestDescription::new()
            .with_header("x-cloudfront-secret", "s3cr3t")
            .with_resource(ROUTE),
        RequestDescription::new()
            .with_header("x-cloudfront-secret", "S3cr3t")
            .with_resource(ROUTE),
    ];

    for request in &cases {
        let boolean = gate().evaluate_boolean(Some(request));
        let policy = gate().evaluate_policy(Some(request));
        assert_eq!(boolean.is_allowed(), policy.is_allowed());
        assert_eq!(boolean.reason_or_source(), policy.reason_or_source());
    }
}

#[test]
fn mode_does_not_change_outcome_without_resource() {
    let configured = [
        RequestDescription::new(),
        RequestDescription::new().with_header("x-cloudfront-secret", "wrong"),
        RequestDescription::new().with_header("x-cloudfront-secret", ""),
    ];
    for request in &configured {
        let boolean = gate().evaluate_boolean(Some(request));
        let policy = gate().evaluate_policy(Some(request));
        assert!(!policy.is_allowed());
        assert_eq!(boolean.reason_or_source(), policy.reason_or_source());
    }

    let unconfigured = VerificationGate::new(GateConfig::unconfigured());
    let request = RequestDescription::new().with_header("x-cloudfront-secret", "anything");
    let boolean = unconfigured.evaluate_boolean(Some(&request));
    let policy = unconfigured.evaluate_policy(Some(&request));
    assert_eq!(policy.reason_or_source(), "Configuration error");
    assert_eq!(boolean.reason_or_source(), policy.reason_or_source());
}

#[test]
fn concurrent_evaluations_are_independent() {
    let gate = Arc::new(gate());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let value = if i % 2 == 0 { "s3cr3t" } else { "guess" };
                let request = RequestDescription::new()
                    .with_header("X-Cloudfront-Secret", value)
                    .with_request_id(format!("req-{i}"));
                (0..100)
                    .map(|_| gate.evaluate_boolean(Some(&request)).is_allowed())
                    .all(|allowed| allowed == (i % 2 == 0))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("evaluation thread panicked"));
    }
}
