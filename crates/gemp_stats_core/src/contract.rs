use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_SINCE: &str = "2021-06-01 00:19";
pub const SUCCESS_BODY: &str = "OK";
pub const UNABLE_TO_CONNECT_BODY: &str = "unable to connect to database";
pub const EXPORT_FAILED_BODY: &str = "export failed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportRequest {
    pub since: String,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            since: DEFAULT_SINCE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawExportRequest {
    #[serde(default)]
    since: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Ok,
    InvalidRequest,
    UnableToConnect,
    ExportFailed,
}

/// Result of one invocation. Every path, success or failure, produces this
/// shape so callers decode a single type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub status: ExportStatus,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

impl ExportResponse {
    pub fn ok(object_key: impl Into<String>, rows: usize) -> Self {
        Self {
            status_code: 200,
            status: ExportStatus::Ok,
            body: SUCCESS_BODY.to_string(),
            object_key: Some(object_key.into()),
            rows: Some(rows),
        }
    }

    pub fn invalid_request(message: &str) -> Self {
        Self::failure(400, ExportStatus::InvalidRequest, message)
    }

    pub fn unable_to_connect() -> Self {
        Self::failure(500, ExportStatus::UnableToConnect, UNABLE_TO_CONNECT_BODY)
    }

    pub fn export_failed() -> Self {
        Self::failure(500, ExportStatus::ExportFailed, EXPORT_FAILED_BODY)
    }

    pub fn is_success(&self) -> bool {
        self.status == ExportStatus::Ok
    }

    fn failure(status_code: u16, status: ExportStatus, body: &str) -> Self {
        Self {
            status_code,
            status,
            body: body.to_string(),
            object_key: None,
            rows: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Decodes an invocation event into an [`ExportRequest`].
///
/// Accepts a direct payload (`{"since": ...}`), a scheduled event without a
/// `since` key, or an API Gateway proxy event whose `body` is a JSON object or
/// a JSON-encoded string. A missing or null `since` falls back to
/// [`DEFAULT_SINCE`].
pub fn decode_export_event(event: Value) -> Result<ExportRequest, ValidationError> {
    let payload = normalize_proxy_event(event)?;
    let raw = serde_json::from_value::<RawExportRequest>(payload)
        .map_err(|error| ValidationError::new(format!("Malformed request: {error}")))?;

    match raw.since {
        None => Ok(ExportRequest::default()),
        Some(since) if since.trim().is_empty() => {
            Err(ValidationError::new("since cannot be empty"))
        }
        Some(since) => Ok(ExportRequest {
            since: since.trim().to_string(),
        }),
    }
}

fn normalize_proxy_event(event: Value) -> Result<Value, ValidationError> {
    let Some(object) = event.as_object() else {
        return Err(ValidationError::new("Request payload must be a JSON object"));
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(json!({})),
        Value::String(text) => serde_json::from_str(text)
            .map_err(|error| ValidationError::new(format!("Malformed JSON body: {error}"))),
        _ => Err(ValidationError::new("Request body must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_since_uses_default_lower_bound() {
        let request = decode_export_event(json!({})).expect("empty event should decode");
        assert_eq!(request.since, "2021-06-01 00:19");
    }

    #[test]
    fn null_since_uses_default_lower_bound() {
        let request = decode_export_event(json!({"since": null})).expect("null since is absent");
        assert_eq!(request.since, DEFAULT_SINCE);
    }

    #[test]
    fn scheduled_event_without_since_is_accepted() {
        let request = decode_export_event(json!({
            "version": "0",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "detail": {}
        }))
        .expect("scheduled event should decode");
        assert_eq!(request.since, DEFAULT_SINCE);
    }

    #[test]
    fn reads_since_from_proxy_string_body() {
        let request = decode_export_event(json!({"body": "{\"since\":\"2023-01-05 12:00\"}"}))
            .expect("proxy body should decode");
        assert_eq!(request.since, "2023-01-05 12:00");
    }

    #[test]
    fn rejects_non_string_since() {
        let error = decode_export_event(json!({"since": 20210601})).expect_err("number is invalid");
        assert!(error.message().starts_with("Malformed request"));
    }

    #[test]
    fn rejects_blank_since_and_non_object_events() {
        assert!(decode_export_event(json!({"since": "   "})).is_err());
        assert!(decode_export_event(json!(["since"])).is_err());
        assert!(decode_export_event(json!({"body": 7})).is_err());
    }

    #[test]
    fn success_and_failure_share_one_shape() {
        let ok = serde_json::to_value(ExportResponse::ok("deck_archetype.json", 2))
            .expect("response should serialize");
        assert_eq!(
            ok,
            json!({
                "statusCode": 200,
                "status": "ok",
                "body": "OK",
                "object_key": "deck_archetype.json",
                "rows": 2
            })
        );

        let failed = serde_json::to_value(ExportResponse::unable_to_connect())
            .expect("response should serialize");
        assert_eq!(
            failed,
            json!({
                "statusCode": 500,
                "status": "unable_to_connect",
                "body": "unable to connect to database"
            })
        );

        let decoded: ExportResponse =
            serde_json::from_value(failed).expect("failure response should decode");
        assert!(!decoded.is_success());
    }
}
