use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ProtocolViolation, TransportError, WorkflowError, WorkflowResult};
use crate::transport::ServiceResponse;

const ERROR_STATUS: &str = "error";
const MISSING_MESSAGE: &str = "The chart service reported an error without details.";

/// Shared first pass over every service reply.
///
/// Returns the JSON object of a non-error reply. An error envelope becomes
/// `Service` even when it arrives with a non-2xx status; any other non-2xx
/// reply is a transport failure.
pub(super) fn decode_envelope(
    endpoint: &'static str,
    response: &ServiceResponse,
) -> WorkflowResult<Map<String, Value>> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if !response.is_success() {
        if let Ok(Value::Object(object)) = &parsed {
            if status_of(object) == Some(ERROR_STATUS) {
                let message = message_of(object);
                warn!(endpoint, http_status = response.status, %message, "service error reply");
                return Err(WorkflowError::Service { message });
            }
        }
        warn!(endpoint, http_status = response.status, "non-success HTTP status");
        return Err(TransportError::HttpStatus {
            status: response.status,
        }
        .into());
    }

    let value = parsed.map_err(|err| {
        warn!(endpoint, error = %err, "reply body is not JSON");
        ProtocolViolation::NotJson(err.to_string())
    })?;
    let Value::Object(object) = value else {
        warn!(endpoint, "reply body is not a JSON object");
        return Err(ProtocolViolation::UnexpectedShape {
            field: "body",
            detail: "expected a JSON object".to_owned(),
        }
        .into());
    };

    let status = match object.get("status") {
        None | Some(Value::Null) => {
            warn!(endpoint, "reply has no status");
            return Err(ProtocolViolation::MissingField("status").into());
        }
        Some(Value::String(status)) => status.clone(),
        Some(other) => {
            return Err(ProtocolViolation::UnexpectedShape {
                field: "status",
                detail: format!("expected a string, got {other}"),
            }
            .into());
        }
    };
    if status == ERROR_STATUS {
        let message = message_of(&object);
        warn!(endpoint, %message, "service error reply");
        return Err(WorkflowError::Service { message });
    }
    Ok(object)
}

/// Reads an array of strings; `null` counts as empty.
pub(super) fn string_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ProtocolViolation> {
    match object.get(field) {
        None => Err(ProtocolViolation::MissingField(field)),
        Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok(text.clone()),
                other => Err(ProtocolViolation::UnexpectedShape {
                    field,
                    detail: format!("expected string items, got {other}"),
                }),
            })
            .collect(),
        Some(other) => Err(ProtocolViolation::UnexpectedShape {
            field,
            detail: format!("expected an array, got {other}"),
        }),
    }
}

/// Reads a required string field.
pub(super) fn required_string<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ProtocolViolation> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ProtocolViolation::MissingField(field)),
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(ProtocolViolation::UnexpectedShape {
            field,
            detail: format!("expected a string, got {other}"),
        }),
    }
}

fn status_of(object: &Map<String, Value>) -> Option<&str> {
    object.get("status").and_then(Value::as_str)
}

fn message_of(object: &Map<String, Value>) -> String {
    object
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(MISSING_MESSAGE)
        .to_owned()
}
