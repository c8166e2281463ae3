//! Text transforms applied to a variation's body while crafting.
//!
//! Positions are char indices, never byte offsets, and are clamped to the
//! content length so a stale cursor from the client cannot split a
//! multi-byte character.

use serde::Deserialize;

pub const QUICK_EMOJIS: [&str; 12] = [
    "🚀", "✨", "💡", "🎉", "👋", "💪", "🔥", "❤️", "👀", "📣", "⭐", "🎯",
];

pub const CTA_PREFIX: &str = "\n\n👉 ";

/// A selection in the editor. `None` means "no cursor", which appends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    pub content: String,
    /// Char index right after the inserted text.
    pub cursor: usize,
}

fn byte_offset(content: &str, char_index: usize) -> usize {
    content
        .char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(content.len())
}

/// Replaces the selected range with `text`. An inverted selection is
/// treated as the same range in the right order.
pub fn insert_at_cursor(content: &str, selection: Option<Selection>, text: &str) -> Edited {
    let len = content.chars().count();
    let (start, end) = match selection {
        Some(sel) => {
            let a = sel.start.min(len);
            let b = sel.end.min(len);
            (a.min(b), a.max(b))
        }
        None => (len, len),
    };

    let head = &content[..byte_offset(content, start)];
    let tail = &content[byte_offset(content, end)..];
    Edited {
        content: format!("{head}{text}{tail}"),
        cursor: start + text.chars().count(),
    }
}

/// `None` when `emoji` is not one of the quick-insert set.
pub fn insert_emoji(content: &str, selection: Option<Selection>, emoji: &str) -> Option<Edited> {
    if !QUICK_EMOJIS.contains(&emoji) {
        return None;
    }
    Some(insert_at_cursor(content, selection, emoji))
}

pub fn insert_cta(content: &str, selection: Option<Selection>) -> Edited {
    insert_at_cursor(content, selection, CTA_PREFIX)
}

/// Starts a new paragraph after every sentence-ending `". "`.
pub fn paragraph_breaks(content: &str) -> String {
    content.replace(". ", ".\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(start: usize, end: usize) -> Option<Selection> {
        Some(Selection { start, end })
    }

    #[test]
    fn test_insert_replaces_selection() {
        let edited = insert_at_cursor("Hello world", sel(6, 11), "Rust");
        assert_eq!(edited.content, "Hello Rust");
        assert_eq!(edited.cursor, 10);
    }

    #[test]
    fn test_insert_without_cursor_appends() {
        let edited = insert_at_cursor("Hi", None, "!");
        assert_eq!(edited.content, "Hi!");
        assert_eq!(edited.cursor, 3);
    }

    #[test]
    fn test_insert_clamps_out_of_range_cursor() {
        let edited = insert_at_cursor("abc", sel(10, 42), "d");
        assert_eq!(edited.content, "abcd");
        assert_eq!(edited.cursor, 4);
    }

    #[test]
    fn test_insert_counts_chars_not_bytes() {
        let edited = insert_at_cursor("🚀go", sel(1, 1), "-");
        assert_eq!(edited.content, "🚀-go");
        assert_eq!(edited.cursor, 2);
    }

    #[test]
    fn test_inverted_selection_is_normalised() {
        let edited = insert_at_cursor("abcdef", sel(4, 2), "X");
        assert_eq!(edited.content, "abXef");
    }

    #[test]
    fn test_emoji_must_be_in_quick_set() {
        assert!(insert_emoji("a", None, "🔥").is_some());
        assert!(insert_emoji("a", None, "🦀").is_none());
    }

    #[test]
    fn test_cta_prefix() {
        let edited = insert_cta("Big news.", None);
        assert_eq!(edited.content, "Big news.\n\n👉 ");
    }

    #[test]
    fn test_paragraph_breaks() {
        assert_eq!(
            paragraph_breaks("One. Two. Three."),
            "One.\n\nTwo.\n\nThree."
        );
    }
}
