//! Wire models for the classification endpoint.

use serde::Serialize;
use serde_json::Value;

/// Body of `POST /analyze_comment`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Classification outcome.
///
/// The backend answers `fake` or `genuine`; anything else is kept verbatim so
/// it can still be shown, just without special styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Verdict {
    Fake,
    Genuine,
    Other(String),
}

impl Verdict {
    /// Parse a verdict label. Empty labels count as absent.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "" => None,
            "fake" => Some(Verdict::Fake),
            "genuine" => Some(Verdict::Genuine),
            other => Some(Verdict::Other(other.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Verdict::Fake => "fake",
            Verdict::Genuine => "genuine",
            Verdict::Other(label) => label,
        }
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.label().to_string()
    }
}

/// Sentiment of the analysed text. The backend also emits `neutral`, which
/// lands in `Other` and is rendered unstyled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Other(String),
}

impl Sentiment {
    /// Parse a sentiment label. Empty labels count as absent.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "" => None,
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            other => Some(Sentiment::Other(other.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Other(label) => label,
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.label().to_string()
    }
}

/// A decoded analysis. Every field is optional: a response missing a field
/// still renders, with placeholders.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Percentage, nominally in `[0, 100]`. Only JSON numbers are accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AnalysisResult {
    /// Build a result from an already parsed response body.
    ///
    /// Non-object bodies and fields of the wrong JSON type are treated as
    /// absent rather than rejected.
    pub fn from_json(value: &Value) -> Self {
        let label = |key: &str| value.get(key).and_then(Value::as_str);
        Self {
            verdict: label("verdict").and_then(Verdict::from_label),
            sentiment: label("sentiment").and_then(Sentiment::from_label),
            confidence: value.get("confidence").and_then(Value::as_f64),
        }
    }
}
