//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Low priority accent
pub const PRIORITY_BLUE: Color = Color::Rgb(10, 132, 255);
/// Medium priority accent
pub const PRIORITY_ORANGE: Color = Color::Rgb(255, 159, 10);
/// High priority accent, also the delete confirmation background
pub const PRIORITY_RED: Color = Color::Rgb(255, 69, 58);
/// Completion check mark
pub const DONE_GREEN: Color = Color::Rgb(48, 209, 88);
/// Header and status bar background
pub const BAR_BG: Color = Color::Rgb(28, 28, 30);

/// Accent colour for a priority level.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Low => PRIORITY_BLUE,
        Priority::Medium => PRIORITY_ORANGE,
        Priority::High => PRIORITY_RED,
    }
}
