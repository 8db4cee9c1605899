//! Wire types for the HTTP surface.

use serde::{Deserialize, Serialize};

/// Inbound frame payload. `b64_input` is optional so a missing field and an
/// explicit JSON `null` both surface as `None` and get the documented 400,
/// instead of bubbling up as a deserializer error.
#[derive(Debug, Deserialize)]
pub struct FrameRequest {
    #[serde(default)]
    pub b64_input: Option<String>,
}

/// Outbound frame payload. Rejected requests carry an empty string.
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub b64_output: String,
}

impl FrameResponse {
    pub fn empty() -> Self {
        FrameResponse {
            b64_output: String::new(),
        }
    }
}

/// Body of the liveness and banner routes.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Body of the `/api/` health check.
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub health: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_deserializes_to_none() {
        let req: FrameRequest = serde_json::from_str("{}").unwrap();
        assert!(req.b64_input.is_none());
    }

    #[test]
    fn explicit_null_deserializes_to_none() {
        let req: FrameRequest = serde_json::from_str(r#"{"b64_input": null}"#).unwrap();
        assert!(req.b64_input.is_none());
    }

    #[test]
    fn present_field_is_kept() {
        let req: FrameRequest = serde_json::from_str(r#"{"b64_input": "abcd"}"#).unwrap();
        assert_eq!(req.b64_input.as_deref(), Some("abcd"));
    }

    #[test]
    fn response_serializes_to_the_wire_contract() {
        let json = serde_json::to_string(&FrameResponse::empty()).unwrap();
        assert_eq!(json, r#"{"b64_output":""}"#);
    }
}
