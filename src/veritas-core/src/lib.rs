//! # Veritas Core
//!
//! Frontend-independent half of the Veritas client: the form controller that
//! drives a submission from input to rendered verdict, the view model it
//! mutates, the persisted theme preference, and configuration loading.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Frontend (TUI / one-shot)  │  draws FormView, forwards input
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │        FormController        │  Idle → Validating → Loading → Success/Error
//! │   FormView · Theme · Store   │
//! └──────────────┬───────────────┘
//!                │ Analyzer trait
//! ┌──────────────▼───────────────┐
//! │        veritas-client        │  POST /analyze_comment
//! └──────────────────────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod theme;
pub mod view;

pub use config::VeritasConfig;
pub use controller::{EMPTY_INPUT_MESSAGE, FormController, REVEAL_DELAY, SubmitState, Submission};
pub use error::{ConfigError, ErrorCategory, FormError, StoreError};
pub use theme::{FileThemeStore, MemoryThemeStore, Theme, ThemeStore};
pub use view::{BarTone, ConfidenceBar, FormView, ResultView, SentimentClass, VerdictClass};

/// Veritas Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
