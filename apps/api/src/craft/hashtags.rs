//! Hashtag list editing. Tags are stored without the leading `#`.

/// Canonical stored form of a user-typed tag: one leading `#` stripped and
/// surrounding whitespace trimmed. `None` for blank input.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let tag = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

fn contains_tag(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t.to_lowercase() == tag.to_lowercase())
}

/// Appends `raw` unless it is blank or already present (case-insensitive).
/// Returns whether the list changed.
pub fn add_hashtag(tags: &mut Vec<String>, raw: &str) -> bool {
    match normalize_hashtag(raw) {
        Some(tag) if !contains_tag(tags, &tag) => {
            tags.push(tag);
            true
        }
        _ => false,
    }
}

/// Removes every entry equal to `tag`. Returns whether anything was removed.
pub fn remove_hashtag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

/// Normalises and dedups a list, keeping first-seen order.
pub fn dedup_hashtags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = Vec::new();
    for tag in raw {
        add_hashtag(&mut tags, tag.as_ref());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent_with_or_without_hash() {
        let mut tags = vec![];
        assert!(add_hashtag(&mut tags, "#launch"));
        assert!(!add_hashtag(&mut tags, "launch"));
        assert!(!add_hashtag(&mut tags, "#launch"));
        assert_eq!(tags, vec!["launch"]);
    }

    #[test]
    fn test_add_dedups_case_insensitively() {
        let mut tags = vec!["Launch".to_string()];
        assert!(!add_hashtag(&mut tags, "#launch"));
        assert_eq!(tags, vec!["Launch"]);
    }

    #[test]
    fn test_blank_tags_ignored() {
        let mut tags = vec![];
        assert!(!add_hashtag(&mut tags, "   "));
        assert!(!add_hashtag(&mut tags, "#"));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_remove_is_exact() {
        let mut tags = vec!["rust".to_string(), "Rust".to_string()];
        assert!(remove_hashtag(&mut tags, "rust"));
        assert_eq!(tags, vec!["Rust"]);
        assert!(!remove_hashtag(&mut tags, "missing"));
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let tags = dedup_hashtags(["#b", "a", "B", " ", "#c", "a"]);
        assert_eq!(tags, vec!["b", "a", "c"]);
    }
}
