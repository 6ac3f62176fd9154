//! Single-line text input handling for the terminal user interface.

use ratatui::text::Span;

/// A text input field with a cursor measured in characters.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Terminal columns taken by the text before the cursor.
    pub fn cursor_column(&self) -> usize {
        Span::raw(&self.value[..self.byte_offset(self.cursor)]).width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut field = InputField::with_value("桜");
        assert_eq!(field.cursor, 1);
        field.handle_char('餅');
        assert_eq!(field.value, "桜餅");
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.value, "餅");
        assert_eq!(field.cursor, 0);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut field = InputField::with_value("tea");
        field.move_home();
        field.handle_delete();
        assert_eq!(field.value, "ea");
        field.move_end();
        field.handle_delete();
        assert_eq!(field.value, "ea");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut field = InputField::new();
        field.move_cursor_left();
        field.move_cursor_right();
        assert_eq!(field.cursor, 0);
        field.handle_char('a');
        field.move_cursor_right();
        assert_eq!(field.cursor, 1);
        field.move_home();
        assert_eq!((field.value.as_str(), field.cursor), ("a", 0));
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        let mut field = InputField::with_value("桜餅");
        assert_eq!(field.cursor_column(), 4);
        field.move_cursor_left();
        assert_eq!(field.cursor_column(), 2);
        field.move_home();
        field.handle_char('a');
        assert_eq!(field.cursor_column(), 1);
    }
}
