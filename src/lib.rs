//! Edge-origin verification gate.
//!
//! Proves that an inbound HTTP request arrived through a trusted CDN edge
//! rather than directly at the origin, by checking a shared secret the edge
//! injects into every forwarded request.
//!
//! The crate is built around a single rule: a request is allowed if and only
//! if it carries `x-cloudfront-secret` (any case) with a non-empty value that
//! is byte-equal to the configured secret. Every other input, including an
//! absent request, a missing configuration, or a fault during evaluation, is
//! denied.
//!
//! # Core Types
//!
//! - [`VerificationGate`]: Evaluates requests against a frozen configuration
//! - [`GateConfig`]: Expected secret, read once from `CLOUDFRONT_SECRET`
//! - [`RequestDescription`]: Headers, target resource, and request id
//! - [`Decision`]: Result in [`BooleanDecision`] or [`PolicyDecision`] form
//! - [`Secret<T>`]: Wrapper that redacts the secret in logs/output
//!
//! # Examples
//!
//! ```
//! use edge_origin_gate::{DecisionMode, GateConfig, RequestDescription, VerificationGate};
//!
//! let gate = VerificationGate::new(GateConfig::with_secret("s3cr3t"));
//!
//! let request = RequestDescription::new()
//!     .with_header("X-CloudFront-Secret", "s3cr3t")
//!     .with_resource("arn:aws:execute-api:us-east-1:123456789012:abc/prod/GET/");
//!
//! let decision = gate.evaluate(Some(&request), DecisionMode::Policy);
//! assert!(decision.is_allowed());
//!
//! let direct = RequestDescription::new().with_header("Host", "origin.internal");
//! let decision = gate.evaluate(Some(&direct), DecisionMode::Boolean);
//! assert_eq!(decision.reason_or_source(), "Missing authorization header");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod decision;
mod error;
pub mod event;
mod gate;
pub mod handler;
mod logging;
mod request;
mod secret;

pub use config::{GateConfig, CLOUDFRONT_SECRET_ENV_VAR};
pub use decision::{
    BooleanDecision, Decision, DecisionContext, DecisionMode, Effect, PolicyDecision,
    PolicyStatement, Verdict, ALLOW_SOURCE, EDGE_PRINCIPAL, INVOKE_ACTION,
};
pub use error::{ErrorKind, GateError};
pub use gate::VerificationGate;
pub use logging::GateLog;
pub use request::{RequestDescription, CLOUDFRONT_SECRET_HEADER};
pub use secret::Secret;
