//! Gate configuration.
//!
//! The expected secret is resolved once, wrapped in [`Secret`], and handed to
//! the gate at construction. Evaluation never reads the environment.

use crate::secret::Secret;

/// Environment variable holding the shared edge secret.
pub const CLOUDFRONT_SECRET_ENV_VAR: &str = "CLOUDFRONT_SECRET";

/// Immutable configuration for a [`VerificationGate`](crate::VerificationGate).
///
/// An unset or empty secret is representable on purpose: such a config puts
/// the gate into a permanent deny state instead of failing at startup, so a
/// misconfigured deployment rejects traffic rather than crashing or allowing it.
///
/// # Examples
///
/// ```
/// use edge_origin_gate::GateConfig;
///
/// let config = GateConfig::with_secret("s3cr3t");
/// assert!(config.is_configured());
///
/// let config = GateConfig::from_lookup(|_| None);
/// assert!(!config.is_configured());
/// ```
#[derive(Debug)]
pub struct GateConfig {
    expected_secret: Option<Secret<String>>,
}

impl GateConfig {
    /// Creates a config with the given expected secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            expected_secret: Some(Secret::new(secret.into())),
        }
    }

    /// Creates a config with no secret. Every evaluation denies.
    pub fn unconfigured() -> Self {
        Self {
            expected_secret: None,
        }
    }

    /// Reads the expected secret from `CLOUDFRONT_SECRET`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the expected secret through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let expected_secret = lookup(CLOUDFRONT_SECRET_ENV_VAR).map(Secret::new);
        if expected_secret.is_none() {
            tracing::debug!(var = CLOUDFRONT_SECRET_ENV_VAR, "edge secret not set");
        }
        Self { expected_secret }
    }

    /// Returns the expected secret, or `None` when unset or empty.
    pub fn expected_secret(&self) -> Option<&Secret<String>> {
        self.expected_secret.as_ref().filter(|s| !s.is_empty())
    }

    /// Returns `true` if a non-empty secret is configured.
    pub fn is_configured(&self) -> bool {
        self.expected_secret().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_secret_is_configured() {
        let config = GateConfig::with_secret("s3cr3t");
        assert!(config.is_configured());
        assert!(config.expected_secret().unwrap().matches("s3cr3t"));
    }

    #[test]
    fn empty_secret_counts_as_unset() {
        let config = GateConfig::with_secret("");
        assert!(!config.is_configured());
        assert!(config.expected_secret().is_none());
    }

    #[test]
    fn lookup_reads_the_named_variable() {
        let config = GateConfig::from_lookup(|name| {
            (name == "CLOUDFRONT_SECRET").then(|| "from-env".to_string())
        });
        assert!(config.expected_secret().unwrap().matches("from-env"));
    }

    #[test]
    fn lookup_miss_is_unconfigured() {
        let config = GateConfig::from_lookup(|_| None);
        assert!(!config.is_configured());
    }

    #[test]
    fn debug_never_shows_secret() {
        let config = GateConfig::with_secret("do-not-print");
        let debug_output = format!("{:?}", config);

        assert!(!debug_output.contains("do-not-print"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
