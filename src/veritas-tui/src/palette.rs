//! Light and dark palettes.
//!
//! The dark palette is the ocean/green identity; the light palette keeps the
//! same roles with darker accents on a white surface.

use ratatui::style::Color;
use veritas_core::{BarTone, SentimentClass, Theme, VerdictClass};

// ============================================================
// DARK PALETTE
// ============================================================

/// Primary green - main accent color
pub const ACCENT_DARK: Color = Color::Rgb(0, 255, 163); // #00FFA3

/// Main background - deep void
pub const VOID: Color = Color::Rgb(10, 22, 40); // #0A1628

/// Input surface
pub const SURFACE_DARK: Color = Color::Rgb(27, 40, 56); // #1B2838

pub const TEXT_DARK: Color = Color::Rgb(255, 255, 255);
pub const TEXT_DIM_DARK: Color = Color::Rgb(130, 154, 177); // #829AB1
pub const TEXT_MUTED_DARK: Color = Color::Rgb(72, 101, 129); // #486581

/// Success - cyan-green
pub const SUCCESS_DARK: Color = Color::Rgb(0, 245, 212); // #00F5D4

/// Danger - coral red
pub const DANGER_DARK: Color = Color::Rgb(255, 107, 107); // #FF6B6B

/// Warning - golden amber
pub const WARNING_DARK: Color = Color::Rgb(255, 200, 87); // #FFC857

pub const BORDER_DARK: Color = Color::Rgb(27, 73, 101); // #1B4965

/// Colors for one theme, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub success: Color,
    pub danger: Color,
    pub warning: Color,
    pub border: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: VOID,
            surface: SURFACE_DARK,
            text: TEXT_DARK,
            text_dim: TEXT_DIM_DARK,
            text_muted: TEXT_MUTED_DARK,
            accent: ACCENT_DARK,
            success: SUCCESS_DARK,
            danger: DANGER_DARK,
            warning: WARNING_DARK,
            border: BORDER_DARK,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(255, 255, 255),
            surface: Color::Rgb(235, 235, 235),
            text: Color::Rgb(30, 30, 30),
            text_dim: Color::Rgb(100, 100, 100),
            text_muted: Color::Rgb(150, 150, 150),
            accent: Color::Rgb(0, 150, 100),
            success: Color::Rgb(0, 150, 0),
            danger: Color::Rgb(200, 50, 50),
            warning: Color::Rgb(200, 150, 0),
            border: Color::Rgb(200, 200, 200),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    pub fn bar_color(&self, tone: BarTone) -> Color {
        match tone {
            BarTone::Default => self.accent,
            BarTone::Danger => self.danger,
            BarTone::Success => self.success,
        }
    }

    pub fn verdict_color(&self, class: Option<VerdictClass>) -> Color {
        match class {
            Some(VerdictClass::Fake) => self.danger,
            Some(VerdictClass::Genuine) => self.success,
            None => self.text,
        }
    }

    pub fn sentiment_color(&self, class: Option<SentimentClass>) -> Color {
        match class {
            Some(SentimentClass::Positive) => self.success,
            Some(SentimentClass::Negative) => self.danger,
            None => self.text,
        }
    }
}
