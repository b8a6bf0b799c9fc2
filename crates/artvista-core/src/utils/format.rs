/// Case-insensitive substring check
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Render tags as `#a #b #c`
pub fn format_hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hide most of the local part of an email for display in comment lists
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Water Lilies", "lil"));
        assert!(contains_ignore_case("Water Lilies", "WATER"));
        assert!(!contains_ignore_case("Water Lilies", "rose"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Ålesund fjord", 6), "Åle...");
    }

    #[test]
    fn test_format_hashtags() {
        let tags = vec!["sea".to_string(), "oil".to_string()];
        assert_eq!(format_hashtags(&tags), "#sea #oil");
        assert_eq!(format_hashtags(&[]), "");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("kari@example.com"), "k***@example.com");
        assert_eq!(mask_email("not-an-email"), "not-an-email");
        assert_eq!(mask_email("@example.com"), "@example.com");
    }
}
