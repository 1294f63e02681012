use std::collections::HashMap;

pub(crate) fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

pub(crate) fn contains_ignore_ascii_case(input: &str, needle: &str) -> bool {
    input
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// `k=v; k=v` tag list; keys lowercased, later duplicates win.
pub(crate) fn parse_tags(record: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for part in record.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value) = trimmed.split_once('=').unwrap_or((trimmed, ""));
        tags.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }
    tags
}
