//! Form interaction controller.
//!
//! Owns the theme, the submission lifecycle and result rendering for a single
//! analysis form. A submission moves through
//! `Idle → Validating → Loading → {Success, Error} → Idle`; only `Idle` and
//! `Loading` persist between calls.
//!
//! The network call happens between [`FormController::begin_submit`] and
//! [`FormController::finish_submit`], so a frontend can dispatch it on a
//! background task and keep drawing. [`FormController::submit`] runs the whole
//! cycle inline.

use std::time::{Duration, Instant};

use veritas_client::{AnalysisResult, AnalyzeError, Analyzer};

use crate::error::FormError;
use crate::theme::{Theme, ThemeStore};
use crate::view::{
    BarTone, ConfidenceBar, FormView, SentimentClass, VerdictClass, format_confidence,
    format_sentiment, format_verdict,
};

/// Delay between revealing the result section and applying its `visible`
/// transition.
pub const REVEAL_DELAY: Duration = Duration::from_millis(50);

/// Shown when the trimmed input is empty.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze.";

/// Submission lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Loading,
    Success,
    Error,
}

/// What [`FormController::begin_submit`] decided.
#[derive(Debug)]
pub enum Submission {
    /// The submit control is disabled; nothing happened.
    Ignored,
    /// Input failed validation; the error is already displayed.
    Rejected(FormError),
    /// The form is loading; send this text to the analyzer.
    Dispatch(String),
}

/// Controller for the analysis form.
pub struct FormController<S> {
    view: FormView,
    state: SubmitState,
    /// Fixed at construction; when false the form never re-enables.
    model_available: bool,
    store: S,
    /// Bar geometry staged for the next rendered frame.
    pending_bar: Option<ConfidenceBar>,
    /// When the `visible` transition is due.
    reveal_at: Option<Instant>,
}

impl<S: ThemeStore> FormController<S> {
    /// Build the controller. `model_loaded` is the availability flag handed
    /// over by the launcher; `None` counts as unavailable.
    pub fn new(model_loaded: Option<bool>, store: S) -> Self {
        let model_available = model_loaded.unwrap_or(false);
        tracing::info!("Model loaded status: {}", model_available);

        let stored = store.load().unwrap_or_else(|err| {
            tracing::warn!("Failed to read theme preference: {}", err);
            None
        });
        let theme = Theme::from_stored(stored.as_deref());
        tracing::debug!("Applied theme: {}", theme);

        if !model_available {
            tracing::warn!("Model not loaded - disabling analysis form");
        }

        Self {
            view: FormView::new(theme, !model_available),
            state: SubmitState::Idle,
            model_available,
            store,
            pending_bar: None,
            reveal_at: None,
        }
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn theme(&self) -> Theme {
        self.view.theme
    }

    pub fn model_available(&self) -> bool {
        self.model_available
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip the theme, apply it, and persist it. A failed write is logged; the
    /// applied theme stays.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.view.theme.toggled();
        self.view.theme = next;
        tracing::debug!("Applied theme: {}", next);
        if let Err(err) = self.store.save(next) {
            tracing::warn!("Failed to persist theme preference: {}", err);
        }
        next
    }

    /// Validate `input` and, if it passes, move to `Loading`.
    pub fn begin_submit(&mut self, input: &str) -> Submission {
        if self.view.submit_disabled {
            tracing::warn!("Submit control is disabled. Submission aborted.");
            return Submission::Ignored;
        }

        self.transition(SubmitState::Validating);
        let text = input.trim();
        if text.is_empty() {
            tracing::debug!("Validation failed: no comment text");
            let err = FormError::EmptyInput;
            self.show_error(err.user_message());
            self.transition(SubmitState::Idle);
            return Submission::Rejected(err);
        }

        self.set_form_disabled(true);
        self.view.loading = true;
        self.view.result.shown = false;
        self.view.error = None;
        self.view.result.reset();
        self.pending_bar = None;
        self.reveal_at = None;
        self.transition(SubmitState::Loading);

        Submission::Dispatch(text.to_string())
    }

    /// Render the outcome of the request started by
    /// [`begin_submit`](Self::begin_submit) and return to `Idle`.
    pub fn finish_submit(
        &mut self,
        outcome: Result<AnalysisResult, AnalyzeError>,
        now: Instant,
    ) -> Result<AnalysisResult, FormError> {
        if self.state != SubmitState::Loading {
            tracing::warn!("Ignoring analysis outcome outside of a submission");
            return outcome.map_err(FormError::from);
        }

        let rendered = match outcome {
            Ok(result) => {
                self.transition(SubmitState::Success);
                self.display_result(&result, now);
                Ok(result)
            }
            Err(err) => {
                self.transition(SubmitState::Error);
                tracing::error!("Analysis request error: {}", err);
                let err = FormError::from(err);
                self.show_error(err.user_message());
                Err(err)
            }
        };

        self.view.loading = false;
        if self.model_available {
            self.set_form_disabled(false);
        } else {
            tracing::debug!("Form remains disabled as model was not loaded initially");
        }
        self.transition(SubmitState::Idle);
        rendered
    }

    /// Run a full submission against `analyzer`: validate, one request,
    /// render.
    pub async fn submit<A>(&mut self, analyzer: &A, input: &str) -> Result<AnalysisResult, FormError>
    where
        A: Analyzer + ?Sized,
    {
        let text = match self.begin_submit(input) {
            Submission::Ignored => return Err(FormError::Disabled),
            Submission::Rejected(err) => return Err(err),
            Submission::Dispatch(text) => text,
        };
        let outcome = analyzer.analyze(&text).await;
        self.finish_submit(outcome, Instant::now())
    }

    /// Per-frame hook: apply the staged bar and, once due, the `visible`
    /// transition. Returns true if the view changed.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(bar) = self.pending_bar.take() {
            self.view.result.bar = bar;
            changed = true;
        }
        if let Some(at) = self.reveal_at
            && now >= at
        {
            self.view.result.visible = true;
            self.reveal_at = None;
            changed = true;
        }
        changed
    }

    fn display_result(&mut self, data: &AnalysisResult, now: Instant) {
        tracing::debug!("Displaying results: {:?}", data);
        let result = &mut self.view.result;

        result.verdict_text = format_verdict(data.verdict.as_ref());
        result.sentiment_text = format_sentiment(data.sentiment.as_ref());
        result.confidence_text = format_confidence(data.confidence);

        result.verdict_class = data.verdict.as_ref().and_then(VerdictClass::for_verdict);
        result.sentiment_class = data
            .sentiment
            .as_ref()
            .and_then(SentimentClass::for_sentiment);

        self.pending_bar = Some(ConfidenceBar {
            width: data.confidence.unwrap_or(0.0),
            tone: BarTone::for_verdict(data.verdict.as_ref()),
        });

        result.shown = true;
        self.reveal_at = Some(now + REVEAL_DELAY);
        self.view.error = None;
    }

    fn show_error(&mut self, message: String) {
        tracing::debug!("Error displayed to user: {}", message);
        self.view.error = Some(message);
        self.view.result.shown = false;
    }

    fn set_form_disabled(&mut self, disabled: bool) {
        self.view.input_disabled = disabled;
        self.view.submit_disabled = disabled;
        tracing::trace!("Form elements disabled state set to: {}", disabled);
    }

    fn transition(&mut self, to: SubmitState) {
        tracing::debug!(from = ?self.state, to = ?to, "Form state transition");
        self.state = to;
    }
}
