//! Decision encodings.
//!
//! The verification core produces a [`Verdict`]. A [`DecisionMode`] then
//! shapes it into the encoding expected by the enforcing integration:
//! a [`BooleanDecision`] for simple allow/deny authorizers, or a
//! [`PolicyDecision`] for integrations that enforce a resource-scoped policy
//! statement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GateError};

/// Source reported on every allow.
pub const ALLOW_SOURCE: &str = "cloudfront";

/// Principal named in every policy decision.
pub const EDGE_PRINCIPAL: &str = "cloudfront";

/// Action named in every policy statement.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Outcome of the verification core, before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The request carried the correct edge secret.
    Allow,
    /// The request was rejected.
    Deny(GateError),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// Returns the deny category, if any.
    pub fn deny_kind(&self) -> Option<ErrorKind> {
        match self {
            Verdict::Allow => None,
            Verdict::Deny(err) => Some(err.kind()),
        }
    }

    /// Returns the diagnostic carried in the decision context.
    pub fn reason_or_source(&self) -> &'static str {
        match self {
            Verdict::Allow => ALLOW_SOURCE,
            Verdict::Deny(err) => err.reason(),
        }
    }
}

impl From<Result<(), GateError>> for Verdict {
    fn from(result: Result<(), GateError>) -> Self {
        match result {
            Ok(()) => Verdict::Allow,
            Err(err) => Verdict::Deny(err),
        }
    }
}

/// Which decision encoding to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionMode {
    /// `{ authorized, context }`
    #[default]
    Boolean,
    /// `{ principal, effect, statement, context }`
    Policy,
}

impl DecisionMode {
    /// Shapes a verdict into this mode's encoding.
    ///
    /// `resource` is only read in policy mode.
    pub fn encode(self, verdict: &Verdict, resource: Option<&str>) -> Decision {
        match self {
            DecisionMode::Boolean => Decision::Boolean(BooleanDecision::from_verdict(verdict)),
            DecisionMode::Policy => {
                Decision::Policy(PolicyDecision::from_verdict(verdict, resource.unwrap_or("")))
            }
        }
    }
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionMode::Boolean => write!(f, "boolean"),
            DecisionMode::Policy => write!(f, "policy"),
        }
    }
}

impl FromStr for DecisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boolean" | "simple" => Ok(DecisionMode::Boolean),
            "policy" | "iam" => Ok(DecisionMode::Policy),
            other => Err(format!("unknown decision mode '{other}' (expected boolean or policy)")),
        }
    }
}

/// Diagnostic context attached to every decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionContext {
    /// `"cloudfront"` on allow, the deny reason otherwise.
    pub reason_or_source: String,
}

/// Boolean allow/deny encoding.
///
/// ```
/// use edge_origin_gate::{BooleanDecision, Verdict};
///
/// let decision = BooleanDecision::from_verdict(&Verdict::Allow);
/// let json = serde_json::to_value(&decision).unwrap();
/// assert_eq!(json["authorized"], true);
/// assert_eq!(json["context"]["reason_or_source"], "cloudfront");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanDecision {
    /// Whether the request may proceed.
    pub authorized: bool,
    /// Source or deny reason.
    pub context: DecisionContext,
}

impl BooleanDecision {
    /// Builds the boolean encoding of a verdict.
    pub fn from_verdict(verdict: &Verdict) -> Self {
        Self {
            authorized: verdict.is_allow(),
            context: DecisionContext {
                reason_or_source: verdict.reason_or_source().to_string(),
            },
        }
    }
}

/// Effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Permit the call.
    Allow,
    /// Reject the call.
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Allow => write!(f, "Allow"),
            Effect::Deny => write!(f, "Deny"),
        }
    }
}

/// Single statement scoping an effect to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Always [`INVOKE_ACTION`].
    pub action: String,
    /// Same as the enclosing decision's effect.
    pub effect: Effect,
    /// Resource identifier the statement applies to.
    pub resource: String,
}

/// Resource-policy encoding.
///
/// The principal is always [`EDGE_PRINCIPAL`]; there is no per-user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDecision {
    /// Trusted-edge caller class.
    pub principal: String,
    /// Allow or Deny.
    pub effect: Effect,
    /// The statement the enforcing platform applies.
    pub statement: PolicyStatement,
    /// Source or deny reason.
    pub context: DecisionContext,
}

impl PolicyDecision {
    /// Builds the policy encoding of a verdict for `resource`.
    pub fn from_verdict(verdict: &Verdict, resource: &str) -> Self {
        let effect = if verdict.is_allow() {
            Effect::Allow
        } else {
            Effect::Deny
        };

        Self {
            principal: EDGE_PRINCIPAL.to_string(),
            effect,
            statement: PolicyStatement {
                action: INVOKE_ACTION.to_string(),
                effect,
                resource: resource.to_string(),
            },
            context: DecisionContext {
                reason_or_source: verdict.reason_or_source().to_string(),
            },
        }
    }

    /// Resource the statement is scoped to.
    pub fn resource(&self) -> &str {
        &self.statement.resource
    }
}

/// A decision in either encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decision {
    /// Boolean encoding
    Boolean(BooleanDecision),
    /// Policy encoding
    Policy(PolicyDecision),
}

impl Decision {
    /// Returns `true` if the decision lets the request through.
    pub fn is_allowed(&self) -> bool {
        match self {
            Decision::Boolean(d) => d.authorized,
            Decision::Policy(d) => d.effect == Effect::Allow,
        }
    }

    /// Returns the diagnostic string from the decision context.
    pub fn reason_or_source(&self) -> &str {
        match self {
            Decision::Boolean(d) => &d.context.reason_or_source,
            Decision::Policy(d) => &d.context.reason_or_source,
        }
    }

    /// Returns the boolean encoding, if this is one.
    pub fn as_boolean(&self) -> Option<&BooleanDecision> {
        match self {
            Decision::Boolean(d) => Some(d),
            Decision::Policy(_) => None,
        }
    }

    /// Returns the policy encoding, if this is one.
    pub fn as_policy(&self) -> Option<&PolicyDecision> {
        match self {
            Decision::Policy(d) => Some(d),
            Decision::Boolean(_) => None,
        }
    }
}
