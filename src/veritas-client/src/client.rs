//! Classification client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::http_client::{DEFAULT_TIMEOUT, create_client_with_timeout};
use crate::models::{AnalysisResult, AnalyzeRequest};
use crate::{ANALYZE_PATH, AnalyzeError, Result};

/// Anything that can classify a comment.
///
/// The form controller only sees this trait, so tests can script responses
/// without a server.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Classify `text`. Exactly one request is issued per call.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult>;
}

/// Client for the classification backend
#[derive(Clone)]
pub struct AnalyzerClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyzerClient {
    /// Create a client for the given server URL (e.g. "http://localhost:5000").
    ///
    /// No request is made; an unreachable server surfaces on the first
    /// analysis.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = create_client_with_timeout(timeout).map_err(AnalyzeError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the classification endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ANALYZE_PATH)
    }

    /// Post `text` for classification and decode the answer.
    pub async fn analyze_comment(&self, text: &str) -> Result<AnalysisResult> {
        let url = self.endpoint();
        tracing::debug!(%url, chars = text.chars().count(), "Sending analysis request");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&AnalyzeRequest { text })
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!(status, "Analysis response received");

        let body = response.text().await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl Analyzer for AnalyzerClient {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        self.analyze_comment(text).await
    }
}

/// Turn a raw status and body into an analysis or an error.
///
/// The checks run in a fixed order: empty body, unparsable body, non-2xx
/// status, explicit `error` field, body shape.
pub fn decode_response(status: u16, body: &str) -> Result<AnalysisResult> {
    if body.is_empty() {
        return Err(AnalyzeError::EmptyResponse { status });
    }

    let value: Value = serde_json::from_str(body).map_err(|err| {
        tracing::error!("Response handling error - invalid JSON: {}", err);
        tracing::error!("Received text: {}", body);
        AnalyzeError::InvalidData { status }
    })?;

    let error = error_message(&value);

    if !(200..300).contains(&status) {
        return Err(match error {
            Some(message) => AnalyzeError::Rejected { status, message },
            None => AnalyzeError::RequestFailed { status },
        });
    }

    if let Some(message) = error {
        return Err(AnalyzeError::Application(message));
    }

    if !is_renderable(&value) {
        tracing::error!("Response handling error - unexpected shape: {}", body);
        return Err(AnalyzeError::InvalidData { status });
    }

    Ok(AnalysisResult::from_json(&value))
}

/// The `error` field, if it is set to something truthy.
///
/// The backend sends `"error": null` on success.
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        other if is_truthy(other) => Some(other.to_string()),
        _ => None,
    }
}

/// A success body must be an object, and any set `verdict` or `sentiment`
/// must be text.
fn is_renderable(value: &Value) -> bool {
    let Some(fields) = value.as_object() else {
        return false;
    };
    ["verdict", "sentiment"].iter().all(|key| match fields.get(*key) {
        Some(field) if is_truthy(field) => field.is_string(),
        _ => true,
    })
}

/// `null`, `false`, `""` and `0` are unset; anything else is set.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Sentiment, Verdict};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_decode_success() {
        let result = decode_response(
            200,
            r#"{"verdict":"genuine","sentiment":"positive","confidence":87.3,"error":null}"#,
        )
        .expect("decode");
        assert_eq!(result.verdict, Some(Verdict::Genuine));
        assert_eq!(result.sentiment, Some(Sentiment::Positive));
        assert_eq!(result.confidence, Some(87.3));
    }

    #[test]
    fn test_decode_empty_body() {
        let err = decode_response(500, "").unwrap_err();
        assert!(matches!(err, AnalyzeError::EmptyResponse { status: 500 }));
        assert!(err.to_string().contains("empty response"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_response(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidData { status: 200 }));

        let err = decode_response(200, "   ").unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidData { .. }));
    }

    #[test]
    fn test_decode_error_status_with_message() {
        let err = decode_response(503, r#"{"error":"model unavailable"}"#).unwrap_err();
        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_decode_error_status_without_message() {
        let err = decode_response(404, r#"{"detail":"nope"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Request failed (Status: 404)");

        let err = decode_response(500, r#"{"error":null}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::RequestFailed { status: 500 }));
    }

    #[test]
    fn test_decode_application_error() {
        let err = decode_response(200, r#"{"error":"model unavailable"}"#).unwrap_err();
        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(err.kind(), ErrorKind::Application);
    }

    #[test]
    fn test_error_field_truthiness() {
        assert!(decode_response(200, r#"{"verdict":"fake","error":""}"#).is_ok());
        assert!(decode_response(200, r#"{"verdict":"fake","error":false}"#).is_ok());
        assert!(decode_response(200, r#"{"verdict":"fake","error":0}"#).is_ok());

        let err = decode_response(200, r#"{"error":{"code":7}}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"{"code":7}"#);
    }

    #[test]
    fn test_decode_rejects_unrenderable_success() {
        let bodies = [
            "null",
            "[]",
            r#""ok""#,
            "42",
            r#"{"verdict":7}"#,
            r#"{"sentiment":{"x":1}}"#,
        ];
        for body in bodies {
            let err = decode_response(200, body).unwrap_err();
            assert!(
                matches!(err, AnalyzeError::InvalidData { status: 200 }),
                "{body}: {err:?}"
            );
        }

        // Unset values still render as placeholders.
        let result = decode_response(
            200,
            r#"{"verdict":null,"sentiment":"","confidence":"high"}"#,
        )
        .expect("decode");
        assert_eq!(result.verdict, None);
        assert_eq!(result.sentiment, None);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_endpoint_joins_path() {
        let client = AnalyzerClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/analyze_comment");
        assert_eq!(client.base_url(), "http://localhost:5000/");

        let client = AnalyzerClient::new(crate::DEFAULT_SERVER_URL).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5000/analyze_comment");
    }

    #[tokio::test]
    async fn test_analyze_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze_comment"))
            .and(header("content-type", "application/json"))
            .and(header("accept", "application/json"))
            .and(body_json(serde_json::json!({ "text": "great product" })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"verdict":"fake","sentiment":"negative","confidence":64.2,"error":null}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalyzerClient::new(server.uri()).unwrap();
        let result = client.analyze("great product").await.expect("analyze");
        assert_eq!(result.verdict, Some(Verdict::Fake));
        assert_eq!(result.sentiment, Some(Sentiment::Negative));
        assert_eq!(result.confidence, Some(64.2));
    }

    #[tokio::test]
    async fn test_analyze_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze_comment"))
            .respond_with(ResponseTemplate::new(503).set_body_raw(
                r#"{"error":"Analysis model is currently unavailable."}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = AnalyzerClient::new(server.uri()).unwrap();
        let err = client.analyze("hello").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Rejected { status: 503, .. }));
        assert!(err.to_string().contains("currently unavailable"));
    }

    #[tokio::test]
    async fn test_analyze_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze_comment"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AnalyzerClient::new(server.uri()).unwrap();
        let err = client.analyze("hello").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Server returned empty response (Status: 500)"
        );
    }

    #[tokio::test]
    async fn test_analyze_connection_refused() {
        // Reserve a free port, then release it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let uri = format!("http://{addr}");

        let client = AnalyzerClient::with_timeout(uri, Duration::from_secs(2)).unwrap();
        let err = client.analyze("hello").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Network(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().starts_with("Network error: "));
        assert_eq!(err.status(), None);
    }
}
