//! Task form handling for the terminal user interface.
//!
//! The add form has a text field, a priority selector, a category selector,
//! a free-text "new category" field that overrides the selector when filled,
//! and notes.

use crate::{command::Command, command::DEFAULT_CATEGORY, error::Result, fields::Priority, tui::input::InputField};

/// Field order for form navigation.
pub const TEXT_FIELD: usize = 0;
pub const PRIORITY_FIELD: usize = 1;
pub const CATEGORY_FIELD: usize = 2;
pub const NEW_CATEGORY_FIELD: usize = 3;
pub const NOTES_FIELD: usize = 4;
const FIELD_COUNT: usize = 5;

pub struct TaskForm {
    pub text: InputField,
    pub new_category: InputField,
    pub notes: InputField,
    pub priority: usize,
    /// Index into `categories`; 0 is the default category.
    pub category: usize,
    pub categories: Vec<String>,
    pub current_field: usize,
}

impl TaskForm {
    /// Empty form offering `categories` after the default category.
    pub fn new(categories: &[String]) -> Self {
        let mut options = vec![DEFAULT_CATEGORY.to_string()];
        options.extend(categories.iter().filter(|c| c.as_str() != DEFAULT_CATEGORY).cloned());
        let mut form = Self {
            text: InputField::new(),
            new_category: InputField::new(),
            notes: InputField::new(),
            priority: Priority::ALL.iter().position(|&p| p == Priority::Medium).unwrap_or(0),
            category: 0,
            categories: options,
            current_field: TEXT_FIELD,
        };
        form.update_active_field();
        form
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    /// The new-category text when given, otherwise the selected category.
    pub fn selected_category(&self) -> &str {
        let typed = self.new_category.value.trim();
        if !typed.is_empty() {
            return typed;
        }
        self.categories
            .get(self.category)
            .map_or(DEFAULT_CATEGORY, String::as_str)
    }

    /// Validate the form into an add command.
    pub fn to_command(&self) -> Result<Command> {
        Command::add(
            &self.text.value,
            self.selected_priority(),
            self.selected_category(),
            Some(self.notes.value.as_str()),
        )
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Mark the focused text field active; selectors have no text field.
    pub fn update_active_field(&mut self) {
        self.text.active = self.current_field == TEXT_FIELD;
        self.new_category.active = self.current_field == NEW_CATEGORY_FIELD;
        self.notes.active = self.current_field == NOTES_FIELD;
    }

    /// The text field that has focus, if any.
    pub fn active_input(&self) -> Option<&InputField> {
        match self.current_field {
            TEXT_FIELD => Some(&self.text),
            NEW_CATEGORY_FIELD => Some(&self.new_category),
            NOTES_FIELD => Some(&self.notes),
            _ => None,
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TEXT_FIELD => Some(&mut self.text),
            NEW_CATEGORY_FIELD => Some(&mut self.new_category),
            NOTES_FIELD => Some(&mut self.notes),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input_mut() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input_mut() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input_mut() {
            field.handle_delete();
        }
    }

    /// Move the cursor in text fields or cycle the focused selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PRIORITY_FIELD => self.priority = cycle(self.priority, Priority::ALL.len(), right),
            CATEGORY_FIELD => self.category = cycle(self.category, self.categories.len(), right),
            _ => {
                if let Some(field) = self.active_input_mut() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}
