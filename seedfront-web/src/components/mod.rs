//! Server-rendered HTML fragments styled with Tailwind.
//!
//! Components return `String`s that pages concatenate. Text coming from the
//! database or the YAML file goes through [`escape`] before it is embedded.

pub mod flash;
pub mod forms;
pub mod layout;
pub mod stats;
pub mod tables;

pub use flash::{Flash, FlashKind, flash_list};
pub use layout::{button, card, grid, nav_bar, page_header};
pub use stats::{stat_card, stats_grid, status_indicator};
pub use tables::{data_table, pagination, search_form};

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }
}
