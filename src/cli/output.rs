//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::{ColoredString, Colorize};

use crate::domain::{CellFill, Rgb};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Right-align `text` in `width` columns and paint the cell fill behind it.
///
/// Graded and neutral fills are light enough for black text.
pub fn cell(text: &str, width: usize, fill: CellFill, color: bool) -> ColoredString {
    let padded = format!(" {:>width$} ", text, width = width);
    match fill.color() {
        Some(Rgb { r, g, b }) if color => padded.on_truecolor(r, g, b).truecolor(0, 0, 0),
        _ => padded.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_color_disabled_when_painting_cell_then_only_padding_applied() {
        let painted = cell("42", 5, CellFill::Neutral, false);
        assert_eq!(painted.to_string(), "    42 ");
    }

    #[test]
    fn given_unfilled_cell_when_painting_then_no_background() {
        let painted = cell("1", 3, CellFill::Unfilled, true);
        assert_eq!(painted.bgcolor(), None);
    }
}
