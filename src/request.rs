use std::fmt;

/// Header carrying the shared secret injected by the CDN edge.
///
/// Matched case-insensitively on the wire.
pub const CLOUDFRONT_SECRET_HEADER: &str = "x-cloudfront-secret";

/// Normalized description of an inbound request, as seen by the gate.
///
/// Contains the header collection, the target resource identifier (needed
/// for policy-mode decisions), and an optional request id used only for log
/// correlation.
///
/// A description can exist without a header collection at all; the gate
/// treats that as a malformed request rather than as "no headers".
///
/// # Examples
///
/// ```
/// use edge_origin_gate::RequestDescription;
///
/// let request = RequestDescription::new()
///     .with_header("X-CloudFront-Secret", "s3cr3t")
///     .with_resource("arn:aws:execute-api:us-east-1:123456789012:abc/prod/GET/");
///
/// assert_eq!(request.secret_header_values().collect::<Vec<_>>(), vec!["s3cr3t"]);
/// ```
#[derive(Clone)]
pub struct RequestDescription {
    request_id: Option<String>,
    headers: Option<Vec<(String, String)>>,
    resource: Option<String>,
}

impl RequestDescription {
    /// Creates a description with an empty header collection.
    pub fn new() -> Self {
        Self {
            request_id: None,
            headers: Some(Vec::new()),
            resource: None,
        }
    }

    /// Creates a description whose header collection is absent.
    pub fn without_headers() -> Self {
        Self {
            request_id: None,
            headers: None,
            resource: None,
        }
    }

    /// Adds a header, builder-style.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    /// Sets the resource identifier, builder-style.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets the request id, builder-style.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Adds a header, creating the header collection if it was absent.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
    }

    /// Returns the header collection, if present.
    pub fn headers(&self) -> Option<&[(String, String)]> {
        self.headers.as_deref()
    }

    /// Returns the target resource identifier, if present.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns the request id, if present.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns every value whose header name equals `name`, ignoring ASCII case.
    ///
    /// Values are yielded in insertion order. An absent header collection
    /// yields nothing.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .flatten()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value presented for [`CLOUDFRONT_SECRET_HEADER`].
    pub fn secret_header_values(&self) -> impl Iterator<Item = &str> + '_ {
        self.header_values(CLOUDFRONT_SECRET_HEADER)
    }
}

impl Default for RequestDescription {
    fn default() -> Self {
        Self::new()
    }
}

// The presented secret is as sensitive as the expected one, so Debug hides it.
impl fmt::Debug for RequestDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.headers.as_ref().map(|headers| {
            headers
                .iter()
                .map(|(k, v)| {
                    if k.eq_ignore_ascii_case(CLOUDFRONT_SECRET_HEADER) {
                        (k.as_str(), "[REDACTED]")
                    } else {
                        (k.as_str(), v.as_str())
                    }
                })
                .collect::<Vec<_>>()
        });

        f.debug_struct("RequestDescription")
            .field("request_id", &self.request_id)
            .field("headers", &headers)
            .field("resource", &self.resource)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_empty_headers() {
        let request = RequestDescription::new();
        assert_eq!(request.headers().map(<[_]>::len), Some(0));
        assert!(request.resource().is_none());
        assert!(request.request_id().is_none());
    }

    #[test]
    fn default_matches_new() {
        let request = RequestDescription::default();
        assert_eq!(request.headers().map(<[_]>::len), Some(0));
    }

    #[test]
    fn without_headers_has_no_collection() {
        let request = RequestDescription::without_headers();
        assert!(request.headers().is_none());
        assert_eq!(request.secret_header_values().count(), 0);
    }

    #[test]
    fn add_header_creates_collection() {
        let mut request = RequestDescription::without_headers();
        request.add_header("Host", "example.com");
        assert_eq!(request.headers().map(<[_]>::len), Some(1));
    }

    #[test]
    fn lookup_ignores_case() {
        for name in ["x-cloudfront-secret", "X-CloudFront-Secret", "X-CLOUDFRONT-SECRET"] {
            let request = RequestDescription::new().with_header(name, "v");
            assert_eq!(request.secret_header_values().collect::<Vec<_>>(), vec!["v"]);
        }
    }

    #[test]
    fn lookup_returns_all_matches_in_order() {
        let request = RequestDescription::new()
            .with_header("x-cloudfront-secret", "first")
            .with_header("Accept", "*/*")
            .with_header("X-CloudFront-Secret", "second");

        assert_eq!(
            request.secret_header_values().collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn lookup_rejects_near_names() {
        let request = RequestDescription::new()
            .with_header("x-cloudfront-secrets", "v")
            .with_header("cloudfront-secret", "v")
            .with_header("x_cloudfront_secret", "v");

        assert_eq!(request.secret_header_values().count(), 0);
    }

    #[test]
    fn debug_redacts_secret_header() {
        let request = RequestDescription::new()
            .with_header("X-CloudFront-Secret", "do-not-print")
            .with_header("User-Agent", "curl/8");
        let debug_output = format!("{:?}", request);

        assert!(!debug_output.contains("do-not-print"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("curl/8"));
    }
}
