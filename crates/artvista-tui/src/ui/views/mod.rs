//! One renderer per route.

pub mod auth;
pub mod details;
pub mod home;
pub mod upload;

/// Greedy word wrap to `max_width` columns.
pub(crate) fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Text input contents with a cursor block when focused
pub(crate) fn input_display(value: &str, focused: bool) -> String {
    if focused {
        format!("{}▌", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("the starry night over the rhone", 12),
            vec!["the starry", "night over", "the rhone"]
        );
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn test_wrap_text_long_word() {
        // Words longer than the width get their own line
        assert_eq!(wrap_text("a supercalifragilistic b", 5), vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_input_display() {
        assert_eq!(input_display("abc", true), "abc▌");
        assert_eq!(input_display("abc", false), "abc");
    }
}
