//! One-shot subcommands.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use veritas_client::Analyzer;
use veritas_core::{
    FileThemeStore, FormController, FormView, MemoryThemeStore, REVEAL_DELAY, Theme, ThemeStore,
};

use crate::cli::ThemeAction;

/// Run one submission through the form controller and print what it rendered.
///
/// The result goes to `out`, errors to `err`. Returns whether the analysis
/// succeeded.
pub async fn run_analyze<A, W, E>(
    analyzer: &A,
    model_loaded: Option<bool>,
    text: &str,
    json: bool,
    out: &mut W,
    err: &mut E,
) -> Result<bool>
where
    A: Analyzer + ?Sized,
    W: Write,
    E: Write,
{
    let mut form = FormController::new(model_loaded, MemoryThemeStore::new());

    match form.submit(analyzer, text).await {
        Ok(result) => {
            form.on_frame(Instant::now() + REVEAL_DELAY);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            } else {
                write_result(form.view(), out)?;
            }
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(category = ?e.category(), "Analysis failed");
            let message = form.view().error.clone().unwrap_or_else(|| e.user_message());
            writeln!(err, "{message}")?;
            Ok(false)
        }
    }
}

fn write_result<W: Write>(view: &FormView, out: &mut W) -> Result<()> {
    let result = &view.result;
    writeln!(out, "Verdict:    {}", result.verdict_text)?;
    writeln!(out, "Sentiment:  {}", result.sentiment_text)?;
    writeln!(out, "Confidence: {}", result.confidence_text)?;
    Ok(())
}

/// Print the stored theme, applying `action` first when given.
pub fn run_theme<W: Write>(
    state_path: &Path,
    action: Option<ThemeAction>,
    out: &mut W,
) -> Result<()> {
    let mut store = FileThemeStore::new(state_path);
    let current = Theme::from_stored(store.load()?.as_deref());

    let theme = match action {
        Some(action) => {
            let next = action.apply(current);
            store.save(next)?;
            tracing::debug!(from = %current, to = %next, "Stored theme updated");
            next
        }
        None => current,
    };

    writeln!(out, "{theme}")?;
    Ok(())
}
