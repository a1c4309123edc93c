use std::fmt;

use subtle::ConstantTimeEq;

/// A wrapper that prevents accidental exposure of the shared edge secret.
///
/// `Secret<T>` ensures that the expected secret cannot be accidentally logged,
/// printed, or displayed. There is no accessor for the wrapped value: string
/// secrets are only ever compared against presented credentials with
/// [`Secret::matches`].
///
/// # Security Properties
///
/// - Does NOT implement `Deref`, `AsRef`, `Borrow`, `Clone`, or `Copy`
/// - Debug and Display output is always `[REDACTED]`
/// - No type information is leaked in formatted output
/// - Comparison runs in constant time over the bytes
///
/// # Examples
///
/// ```
/// use edge_origin_gate::Secret;
///
/// let secret = Secret::new("s3cr3t".to_string());
///
/// println!("{:?}", secret); // Prints: [REDACTED]
/// assert!(secret.matches("s3cr3t"));
/// assert!(!secret.matches("S3CR3T"));
/// ```
// BREAKING CHANGE WARNING: Do NOT add Clone, Copy, or Default derives.
// A defaulted secret would be the empty string, which must never be a valid credential.
pub struct Secret<T> {
    // BREAKING CHANGE WARNING: This field MUST remain private.
    // Making it public exposes the edge secret directly (CWE-532).
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value in a `Secret`.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }
}

impl Secret<String> {
    /// Returns `true` if the wrapped string has no bytes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Compares a presented credential against the secret.
    ///
    /// Equality is exact and case-sensitive. The byte comparison does not
    /// short-circuit on the first differing byte; only a length mismatch
    /// returns early.
    pub fn matches(&self, presented: &str) -> bool {
        self.inner.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl<T> fmt::Debug for Secret<T> {
    /// BREAKING CHANGE WARNING: This MUST unconditionally return "[REDACTED]".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    /// BREAKING CHANGE WARNING: This MUST unconditionally return "[REDACTED]".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
