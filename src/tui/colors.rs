//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Accent used for borders, highlights and the completion gauge.
pub const SAKURA_PINK: Color = Color::Rgb(244, 143, 177);
/// Title bar and status bar background.
pub const SAKURA_DEEP: Color = Color::Rgb(157, 23, 77);
/// Text on dark backgrounds.
pub const PETAL_WHITE: Color = Color::Rgb(253, 242, 248);
/// Borders while the window is unfocused.
pub const NIGHT_MUTED: Color = Color::Rgb(71, 85, 105);

pub const PRIORITY_LOW: Color = Color::Rgb(56, 189, 248);
pub const PRIORITY_MEDIUM: Color = Color::Rgb(250, 204, 21);
pub const PRIORITY_HIGH: Color = Color::Rgb(248, 113, 113);

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => PRIORITY_LOW,
        Priority::Medium => PRIORITY_MEDIUM,
        Priority::High => PRIORITY_HIGH,
    }
}
