//! Adapter from the hosting platform's invocation event to a
//! [`RequestDescription`].
//!
//! The event arrives as loosely-typed JSON. This module is the only place
//! that inspects its shape; everything past it works on typed values.
//!
//! Field mapping:
//!
//! | Event field                  | Description field |
//! |------------------------------|-------------------|
//! | `headers`                    | header collection |
//! | `methodArn`, else `routeArn` | resource          |
//! | `requestContext.requestId`   | request id        |

use serde_json::{Map, Value};

use crate::error::GateError;
use crate::request::{RequestDescription, CLOUDFRONT_SECRET_HEADER};

/// Converts a raw invocation event into a request description.
///
/// # Errors
///
/// - [`GateError::MalformedInput`] if the event is not an object, or has no
///   `headers` (missing or `null`).
/// - [`GateError::InternalFault`] if `headers` is not an object, or the
///   secret header carries a value that is neither a string nor `null`.
///
/// Non-string values on other headers are dropped; they cannot influence the
/// decision.
///
/// # Examples
///
/// ```
/// use edge_origin_gate::event::request_from_event;
/// use serde_json::json;
///
/// let event = json!({
///     "headers": { "X-CloudFront-Secret": "s3cr3t" },
///     "routeArn": "arn:aws:execute-api:us-east-1:123456789012:abc/$default/GET/",
///     "requestContext": { "requestId": "req-1" }
/// });
///
/// let request = request_from_event(&event).unwrap();
/// assert_eq!(request.request_id(), Some("req-1"));
/// assert_eq!(request.secret_header_values().next(), Some("s3cr3t"));
/// ```
pub fn request_from_event(event: &Value) -> Result<RequestDescription, GateError> {
    let event = event
        .as_object()
        .ok_or_else(|| GateError::MalformedInput(format!("event is {}", type_name(event))))?;

    let headers = match event.get("headers") {
        None | Some(Value::Null) => {
            return Err(GateError::MalformedInput("event has no headers".into()));
        }
        Some(Value::Object(headers)) => headers,
        Some(other) => {
            return Err(GateError::InternalFault(format!(
                "headers is {}, expected object",
                type_name(other)
            )));
        }
    };

    let mut request = RequestDescription::new();
    copy_headers(headers, &mut request)?;

    if let Some(resource) = resource_of(event) {
        request = request.with_resource(resource);
    }
    if let Some(request_id) = request_id_of(event) {
        request = request.with_request_id(request_id);
    }

    Ok(request)
}

/// Returns `requestContext.requestId`, if it is a string.
pub fn request_id_of(event: &Map<String, Value>) -> Option<&str> {
    event
        .get("requestContext")
        .and_then(|ctx| ctx.get("requestId"))
        .and_then(Value::as_str)
}

fn resource_of(event: &Map<String, Value>) -> Option<&str> {
    ["methodArn", "routeArn"]
        .iter()
        .find_map(|key| event.get(*key).and_then(Value::as_str))
}

fn copy_headers(
    headers: &Map<String, Value>,
    request: &mut RequestDescription,
) -> Result<(), GateError> {
    for (name, value) in headers {
        match value {
            Value::String(v) => request.add_header(name.as_str(), v.as_str()),
            Value::Null => request.add_header(name.as_str(), ""),
            other if name.eq_ignore_ascii_case(CLOUDFRONT_SECRET_HEADER) => {
                return Err(GateError::InternalFault(format!(
                    "secret header value is {}, expected string",
                    type_name(other)
                )));
            }
            other => {
                tracing::debug!(
                    header = %name,
                    kind = type_name(other),
                    "dropping non-string header"
                );
            }
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
