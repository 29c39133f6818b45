// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Structured result of one stage invocation
///
/// `body` is itself a JSON document encoded as a string, so the response
/// can be handed to a trigger runtime unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageResponse {
    pub status_code: u16,
    pub body: String,
}

impl StageResponse {
    /// 200 response with the given JSON body
    #[must_use]
    pub fn ok(body: &Value) -> Self {
        Self {
            status_code: 200,
            body: body.to_string(),
        }
    }

    /// Error response carrying the message and the error kind
    #[must_use]
    pub fn from_error(err: &PipelineError) -> Self {
        Self {
            status_code: err.status_code(),
            body: json!({
                "error": err.to_string(),
                "kind": err.kind(),
            })
            .to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decode the body back into JSON
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_has_message_and_kind() {
        let err = PipelineError::NoRawObjects {
            prefix: "raw_data/".to_string(),
        };
        let response = StageResponse::from_error(&err);
        assert_eq!(response.status_code, 404);
        assert!(!response.is_success());

        let body = response.body_json().expect("body is json");
        assert_eq!(body["error"], "No files found in raw_data/");
        assert_eq!(body["kind"], "empty_source");
    }

    #[test]
    fn test_wire_shape() {
        let response = StageResponse::ok(&json!({"message": "done"}));
        let wire = serde_json::to_value(&response).expect("serializes");
        assert_eq!(wire["statusCode"], 200);
        assert_eq!(wire["body"], r#"{"message":"done"}"#);
    }
}
