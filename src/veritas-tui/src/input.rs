//! Comment input state.
//!
//! Multi-line text buffer with a grapheme cursor. Pasted text may contain
//! newlines; typed text cannot, since Enter submits.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;

/// State for the comment input.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current text value
    pub value: String,
    /// Cursor position (in graphemes)
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial value with the cursor at the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let v = value.into();
        self.cursor = v.graphemes(true).count();
        self.value = v;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, c: char) {
        let byte_offset = self.grapheme_to_byte_offset(self.cursor);
        self.value.insert(byte_offset, c);
        self.cursor += 1;
    }

    /// Insert text at the cursor (for paste). Carriage returns are dropped.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_offset = self.grapheme_to_byte_offset(self.cursor);
        self.value.insert_str(byte_offset, &text);
        self.cursor += text.graphemes(true).count();
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let new_cursor = self.cursor - 1;
            let start_byte = self.grapheme_to_byte_offset(new_cursor);
            let end_byte = self.grapheme_to_byte_offset(self.cursor);
            self.value.replace_range(start_byte..end_byte, "");
            self.cursor = new_cursor;
        }
    }

    /// Delete the grapheme at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let start_byte = self.grapheme_to_byte_offset(self.cursor);
            let end_byte = self.grapheme_to_byte_offset(self.cursor + 1);
            self.value.replace_range(start_byte..end_byte, "");
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Split the value into display lines, highlighting the cursor cell with
    /// `cursor_style` when `show_cursor` is set.
    pub fn lines(&self, style: Style, cursor_style: Style, show_cursor: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();

        for (idx, g) in self.value.graphemes(true).enumerate() {
            let at_cursor = show_cursor && idx == self.cursor;
            if g == "\n" {
                if !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), style));
                }
                if at_cursor {
                    spans.push(Span::styled(" ", cursor_style));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
                continue;
            }
            if at_cursor {
                if !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), style));
                }
                spans.push(Span::styled(g.to_string(), cursor_style));
            } else {
                run.push_str(g);
            }
        }

        if !run.is_empty() {
            spans.push(Span::styled(run, style));
        }
        if show_cursor && self.cursor >= self.len() {
            spans.push(Span::styled(" ", cursor_style));
        }
        lines.push(Line::from(spans));
        lines
    }

    fn len(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_to_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut input = InputState::new();
        input.insert('h');
        input.insert('i');
        assert_eq!(input.value, "hi");
        assert_eq!(input.cursor, 2);

        input.move_left();
        input.insert('!');
        assert_eq!(input.value, "h!i");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = InputState::new().with_value("abc");
        input.backspace();
        assert_eq!(input.value, "ab");

        input.move_home();
        input.delete();
        assert_eq!(input.value, "b");
        assert_eq!(input.cursor, 0);

        input.backspace();
        assert_eq!(input.value, "b");
    }

    #[test]
    fn test_grapheme_aware_editing() {
        let mut input = InputState::new().with_value("café 👍🏽");
        assert_eq!(input.cursor, 6);
        input.backspace();
        assert_eq!(input.value, "café ");
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "caf ");
    }

    #[test]
    fn test_paste_normalises_line_endings() {
        let mut input = InputState::new();
        input.insert_str("line one\r\nline two");
        assert_eq!(input.value, "line one\nline two");
        assert_eq!(input.cursor, 17);
    }

    #[test]
    fn test_clear() {
        let mut input = InputState::new().with_value("text");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_lines_split_on_newlines() {
        let input = InputState::new().with_value("a\nb");
        let lines = input.lines(Style::default(), Style::default(), false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "a");
        assert_eq!(lines[1].to_string(), "b");
    }

    #[test]
    fn test_lines_show_cursor_cell() {
        let input = InputState::new().with_value("ab");
        let lines = input.lines(Style::default(), Style::default(), true);
        assert_eq!(lines[0].to_string(), "ab ");
    }
}
