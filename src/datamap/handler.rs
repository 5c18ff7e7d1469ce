//! Turn a `DataMap` into a tool call: validate, request, template, fall back.

use super::DataMap;
use crate::error::{ToolError, ToolErrorKind};
use crate::http::{HttpTransport, WebhookRequest};
use crate::template::{self, lookup};
use crate::tools::params::validate_arguments;
use crate::types::ToolResult;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Said when a webhook fails and the data map declares no fallback.
pub const GENERIC_FALLBACK: &str =
    "I'm unable to retrieve that information right now. Please try again later.";

impl DataMap {
    /// Resolve the webhook template against the call arguments.
    ///
    /// Session globals are deliberately absent from this scope.
    pub fn build_request(&self, args: &Value) -> WebhookRequest {
        let scope = json!({ "args": normalize(args) });
        WebhookRequest {
            method: self.webhook.method,
            url: template::render(&self.webhook.url, &scope),
            headers: self
                .webhook
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), template::render(v, &scope)))
                .collect(),
            body: self
                .webhook
                .body
                .as_ref()
                .map(|b| template::render(b, &scope)),
        }
    }

    /// Run the full data-map call. Always yields presentable text.
    pub async fn execute(
        &self,
        args: &Value,
        transport: &dyn HttpTransport,
        timeout: Duration,
    ) -> ToolResult {
        if let Err(e) = validate_arguments(&self.name, &self.parameters, args) {
            warn!("{}", e);
            return ToolResult::failure(e.kind(), e.to_string());
        }

        let args = normalize(args);
        let request = self.build_request(&args);

        let response = match self.fetch(&request, transport, timeout).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{}", e);
                return self.fallback(&args);
            }
        };

        let missing: Vec<&String> = self
            .required_response_fields
            .iter()
            .filter(|path| lookup(&response, strip_response_prefix(path)).is_none())
            .collect();
        if !missing.is_empty() {
            warn!(
                "Webhook for '{}' omitted required fields: {:?}",
                self.name, missing
            );
            return self.fallback(&args);
        }

        let resolved = template::resolve(&self.output.text, &output_scope(&args, &response));
        if !resolved.is_complete() {
            debug!(
                "Output for '{}' had missing fields: {:?}",
                self.name, resolved.missing
            );
        }
        info!("Data map '{}' answered", self.name);
        ToolResult::new(resolved.text)
    }

    async fn fetch(
        &self,
        request: &WebhookRequest,
        transport: &dyn HttpTransport,
        timeout: Duration,
    ) -> Result<Value, ToolError> {
        let failure = |reason: String| ToolError::WebhookFailure {
            tool: self.name.clone(),
            reason,
        };

        let response = tokio::time::timeout(timeout, transport.execute(request))
            .await
            .map_err(|_| failure(format!("no response within {:?}", timeout)))?
            .map_err(|e| failure(e.to_string()))?;

        if !response.is_success() {
            return Err(failure(format!("status {}", response.status)));
        }

        serde_json::from_str(&response.payload)
            .map_err(|e| failure(format!("malformed payload: {}", e)))
    }

    fn fallback(&self, args: &Value) -> ToolResult {
        let text = match &self.fallback_output {
            Some(fallback) => template::render(&fallback.text, &json!({ "args": args })),
            None => GENERIC_FALLBACK.to_string(),
        };
        ToolResult::failure(ToolErrorKind::WebhookFailure, text)
    }
}

/// `{args, response}` plus the response's own top-level keys, so that both
/// `${response.status}` and `${status}` resolve.
fn output_scope(args: &Value, response: &Value) -> Value {
    let mut scope = match response {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    scope.insert("args".into(), args.clone());
    scope.insert("response".into(), response.clone());
    Value::Object(scope)
}

fn strip_response_prefix(path: &str) -> &str {
    path.strip_prefix("response.").unwrap_or(path)
}

fn normalize(args: &Value) -> Value {
    match args {
        Value::Null => json!({}),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, StubTransport};
    use crate::types::ParamType;

    fn license_map() -> DataMap {
        DataMap::builder("check_license")
            .description("Check customer license status by license key")
            .parameter("license_key", ParamType::String, "License key", true)
            .webhook(HttpMethod::Get, "https://api.example.com/licenses/${args.license_key}")
            .output("License status: ${status}. Expires: ${response.expires}.")
            .fallback_output("I couldn't find license ${args.license_key}.")
            .build()
            .unwrap()
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_request_uses_args_only() {
        let dm = DataMap::builder("t")
            .webhook(HttpMethod::Post, "https://x/${args.id}")
            .body(r#"{"id":"${args.id}","secret":"${global.token}"}"#)
            .header("X-Trace", "${args.id}")
            .output("ok")
            .build()
            .unwrap();
        let req = dm.build_request(&json!({"id": "42"}));
        assert_eq!(req.url, "https://x/42");
        assert_eq!(req.body.unwrap(), r#"{"id":"42","secret":""}"#);
        assert_eq!(req.headers.get("X-Trace").unwrap(), "42");
    }

    #[tokio::test]
    async fn test_success_renders_output() {
        let transport =
            StubTransport::respond(200, json!({"status": "active", "expires": "2027-01-01"}));
        let result = license_map()
            .execute(&json!({"license_key": "ABC"}), &transport, TIMEOUT)
            .await;
        assert_eq!(result.text, "License status: active. Expires: 2027-01-01.");
        assert!(!result.is_error());
        assert_eq!(transport.requests()[0].url, "https://api.example.com/licenses/ABC");
    }

    #[tokio::test]
    async fn test_missing_response_field_degrades_to_empty() {
        let transport = StubTransport::respond(200, json!({"status": "active"}));
        let result = license_map()
            .execute(&json!({"license_key": "ABC"}), &transport, TIMEOUT)
            .await;
        assert_eq!(result.text, "License status: active. Expires: .");
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_transport_failure_uses_fallback() {
        let transport = StubTransport::failing("connection refused");
        let result = license_map()
            .execute(&json!({"license_key": "ABC"}), &transport, TIMEOUT)
            .await;
        assert_eq!(result.text, "I couldn't find license ABC.");
        assert_eq!(result.error, Some(ToolErrorKind::WebhookFailure));
    }

    #[tokio::test]
    async fn test_non_success_status_uses_fallback() {
        let transport = StubTransport::respond(404, json!({"error": "not found"}));
        let result = license_map()
            .execute(&json!({"license_key": "ABC"}), &transport, TIMEOUT)
            .await;
        assert_eq!(result.text, "I couldn't find license ABC.");
    }

    #[tokio::test]
    async fn test_malformed_payload_uses_fallback() {
        let transport = StubTransport::respond_raw(200, "<html>oops</html>");
        let result = license_map()
            .execute(&json!({"license_key": "ABC"}), &transport, TIMEOUT)
            .await;
        assert_eq!(result.text, "I couldn't find license ABC.");
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let transport = StubTransport::stalling(Duration::from_secs(30));
        let result = license_map()
            .execute(
                &json!({"license_key": "ABC"}),
                &transport,
                Duration::from_millis(20),
            )
            .await;
        assert_eq!(result.text, "I couldn't find license ABC.");
    }

    #[tokio::test]
    async fn test_generic_fallback_without_template() {
        let dm = DataMap::builder("t")
            .webhook(HttpMethod::Get, "https://x")
            .output("ok")
            .build()
            .unwrap();
        let transport = StubTransport::failing("down");
        let result = dm.execute(&json!({}), &transport, TIMEOUT).await;
        assert_eq!(result.text, GENERIC_FALLBACK);
    }

    #[tokio::test]
    async fn test_required_response_field_missing_uses_fallback() {
        let dm = DataMap::builder("check_version")
            .webhook(HttpMethod::Get, "https://x/latest")
            .output("Latest version is ${latest}.")
            .fallback_output("Unable to check version information.")
            .require_response_field("response.latest")
            .build()
            .unwrap();
        let transport = StubTransport::respond(200, json!({"other": 1}));
        let result = dm.execute(&json!({}), &transport, TIMEOUT).await;
        assert_eq!(result.text, "Unable to check version information.");
    }

    #[tokio::test]
    async fn test_fallback_never_sees_response() {
        let dm = DataMap::builder("check_version")
            .webhook(HttpMethod::Get, "https://x/latest")
            .output("Latest version is ${latest}.")
            .fallback_output("x${status}${response.status}")
            .require_response_field("latest")
            .build()
            .unwrap();
        let transport = StubTransport::respond(200, json!({"status": "a"}));
        let result = dm.execute(&json!({}), &transport, TIMEOUT).await;
        assert_eq!(result.text, "x");
        assert_eq!(result.error, Some(ToolErrorKind::WebhookFailure));
    }

    #[tokio::test]
    async fn test_validation_blocks_request() {
        let transport = StubTransport::respond(200, json!({}));
        let result = license_map().execute(&json!({}), &transport, TIMEOUT).await;
        assert_eq!(result.error, Some(ToolErrorKind::Validation));
        assert_eq!(transport.calls(), 0);
    }
}
