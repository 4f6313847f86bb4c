/// Convert a display name to a URL-safe kebab-case slug.
///
/// Example: "Corporate Shoots" → "corporate-shoots"
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Return the first whitespace-delimited token of `value`, or "" if there is none.
///
/// Example: "Jane Doe" → "Jane"
pub fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}
