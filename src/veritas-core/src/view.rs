//! View model mutated by the form controller.
//!
//! Renderers draw a [`FormView`] as-is; they never decide what is shown.

use veritas_client::{Sentiment, Verdict};

use crate::theme::Theme;

/// Styling class on the verdict display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictClass {
    Fake,
    Genuine,
}

impl VerdictClass {
    /// Only the two recognised verdicts get a class.
    pub fn for_verdict(verdict: &Verdict) -> Option<Self> {
        match verdict {
            Verdict::Fake => Some(VerdictClass::Fake),
            Verdict::Genuine => Some(VerdictClass::Genuine),
            Verdict::Other(_) => None,
        }
    }
}

/// Styling class on the sentiment display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentClass {
    Positive,
    Negative,
}

impl SentimentClass {
    pub fn for_sentiment(sentiment: &Sentiment) -> Option<Self> {
        match sentiment {
            Sentiment::Positive => Some(SentimentClass::Positive),
            Sentiment::Negative => Some(SentimentClass::Negative),
            Sentiment::Other(_) => None,
        }
    }
}

/// Fill color of the confidence bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarTone {
    #[default]
    Default,
    Danger,
    Success,
}

impl BarTone {
    pub fn for_verdict(verdict: Option<&Verdict>) -> Self {
        match verdict {
            Some(Verdict::Fake) => BarTone::Danger,
            Some(Verdict::Genuine) => BarTone::Success,
            _ => BarTone::Default,
        }
    }
}

/// Confidence bar state. `width` is a percentage and is not clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfidenceBar {
    pub width: f64,
    pub tone: BarTone,
}

/// The result section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultView {
    /// Section is displayed at all.
    pub shown: bool,
    /// The `visible` transition class has been applied.
    pub visible: bool,
    pub verdict_text: String,
    pub verdict_class: Option<VerdictClass>,
    pub sentiment_text: String,
    pub sentiment_class: Option<SentimentClass>,
    pub confidence_text: String,
    pub bar: ConfidenceBar,
}

impl ResultView {
    /// Clear texts, classes and the bar. Display state is left alone.
    pub fn reset(&mut self) {
        self.visible = false;
        self.verdict_text.clear();
        self.verdict_class = None;
        self.sentiment_text.clear();
        self.sentiment_class = None;
        self.confidence_text.clear();
        self.bar = ConfidenceBar::default();
    }
}

/// Everything a frontend needs to draw the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub theme: Theme,
    pub input_disabled: bool,
    pub submit_disabled: bool,
    pub loading: bool,
    /// Error display; `Some` means shown with that text.
    pub error: Option<String>,
    pub result: ResultView,
}

impl FormView {
    pub fn new(theme: Theme, disabled: bool) -> Self {
        Self {
            theme,
            input_disabled: disabled,
            submit_disabled: disabled,
            loading: false,
            error: None,
            result: ResultView::default(),
        }
    }
}

/// Verdict text: the label uppercased, or `Error` when absent.
pub fn format_verdict(verdict: Option<&Verdict>) -> String {
    verdict
        .map(|v| v.label().to_uppercase())
        .unwrap_or_else(|| "Error".to_string())
}

/// Sentiment text: first letter capitalised, or `N/A` when absent.
pub fn format_sentiment(sentiment: Option<&Sentiment>) -> String {
    let Some(label) = sentiment.map(Sentiment::label) else {
        return "N/A".to_string();
    };
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "N/A".to_string(),
    }
}

/// Confidence text: one decimal and a percent sign, or `N/A`.
///
/// A value exactly halfway between two tenths rounds away from zero
/// (`87.25` gives `87.3%`). Halfway is judged on the stored binary value, so
/// `50.05`, which is stored slightly below, gives `50.0%`.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(value) if is_tenths_tie(value) => {
            format!("{:.1}%", (value * 10.0).round() / 10.0)
        }
        Some(value) => format!("{value:.1}%"),
        None => "N/A".to_string(),
    }
}

/// True when `value * 20` is exactly an odd integer.
fn is_tenths_tie(value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }

    let bits = value.abs().to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };
    if mantissa == 0 || exp >= 0 {
        return false;
    }

    // value = mantissa * 2^exp
    let shift = exp.unsigned_abs();
    if shift >= 128 {
        return false;
    }
    let scaled = u128::from(mantissa) * 20;
    scaled % (1u128 << shift) == 0 && (scaled >> shift) % 2 == 1
}
