//! Custom widgets: loading spinner and confidence gauge.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// Breathing pattern: · → ✢ → ✻ → ✽ (ping-pong)
pub const SPINNER_FRAMES: &[&str] = &["·", "✢", "✻", "✽", "✻", "✢"];

/// Frames the event loop draws per spinner step.
const FRAMES_PER_STEP: u64 = 2;

/// Spinner glyph for a given render frame count.
pub fn spinner_frame(frame_count: u64) -> &'static str {
    let step = (frame_count / FRAMES_PER_STEP) as usize;
    SPINNER_FRAMES[step % SPINNER_FRAMES.len()]
}

/// A loading spinner with a label.
pub struct LoadingSpinner<'a> {
    frame_count: u64,
    label: &'a str,
    color: Color,
    label_color: Color,
}

impl<'a> LoadingSpinner<'a> {
    pub fn new(frame_count: u64, label: &'a str) -> Self {
        Self {
            frame_count,
            label,
            color: Color::Reset,
            label_color: Color::Reset,
        }
    }

    pub fn colors(mut self, spinner: Color, label: Color) -> Self {
        self.color = spinner;
        self.label_color = label;
        self
    }
}

impl Widget for LoadingSpinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 2 {
            return;
        }

        buf.set_string(
            area.x,
            area.y,
            spinner_frame(self.frame_count),
            Style::default().fg(self.color),
        );

        if area.width > 3 {
            buf.set_stringn(
                area.x + 2,
                area.y,
                self.label,
                (area.width - 2) as usize,
                Style::default().fg(self.label_color),
            );
        }
    }
}

/// Horizontal bar whose filled share is `percent` of the width.
///
/// Values outside `0..=100` are clamped when drawing; the caller keeps the
/// raw number.
pub struct ConfidenceGauge<'a> {
    percent: f64,
    label: &'a str,
    fill: Color,
    track: Color,
    label_color: Color,
}

impl<'a> ConfidenceGauge<'a> {
    pub fn new(percent: f64, label: &'a str) -> Self {
        Self {
            percent,
            label,
            fill: Color::Reset,
            track: Color::Reset,
            label_color: Color::Reset,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = color;
        self
    }

    pub fn track(mut self, color: Color) -> Self {
        self.track = color;
        self
    }

    pub fn label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }

    /// Number of cells filled for a bar of `width` cells.
    pub fn filled_cells(percent: f64, width: u16) -> u16 {
        if !percent.is_finite() {
            return 0;
        }
        let ratio = percent.clamp(0.0, 100.0) / 100.0;
        (f64::from(width) * ratio).round() as u16
    }
}

impl Widget for ConfidenceGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Label on the right, bar takes the rest.
        let label_width = self.label.width() as u16;
        let bar_width = if area.width > label_width + 1 {
            area.width - label_width - 1
        } else {
            area.width
        };

        let filled = Self::filled_cells(self.percent, bar_width);
        for col in 0..bar_width {
            let (symbol, color) = if col < filled {
                ("█", self.fill)
            } else {
                ("░", self.track)
            };
            if let Some(cell) = buf.cell_mut((area.x + col, area.y)) {
                cell.set_symbol(symbol).set_style(Style::default().fg(color));
            }
        }

        if bar_width < area.width {
            buf.set_string(
                area.x + bar_width + 1,
                area.y,
                self.label,
                Style::default().fg(self.label_color),
            );
        }
    }
}
