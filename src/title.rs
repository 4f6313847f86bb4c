//! Project title resolution from `{field}` templates.
//!
//! `"{groom_name} & {bride_name}"` with `John Smith` / `Jane Doe` resolves to
//! `"John & Jane"`: every string value contributes only its first
//! whitespace-delimited token. Empty sides leave no dangling `&`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::types::{Metadata, ProjectRecord};
use crate::util::first_token;

/// Title used when neither the template, the explicit title, nor the client name yields text.
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Metadata key consulted when the template resolves to nothing.
pub const CLIENT_NAME_FIELD: &str = "client_name";

// Compile-once regex patterns via OnceLock.
fn re_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap())
}

fn re_ampersand_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Two or more ampersands separated only by whitespace
    RE.get_or_init(|| Regex::new(r"\s*&(?:\s*&)+\s*").unwrap())
}

/// Placeholder names referenced by a title template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    re_placeholder()
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect()
}

/// Resolve a title from a template and metadata, with no explicit project title.
pub fn resolve_title(template: &str, metadata: &Metadata) -> String {
    resolve_with_fallback(template, metadata, None)
}

/// Resolve a project's display title, falling back to its explicit title.
pub fn resolve_project_title(template: &str, project: &ProjectRecord) -> String {
    resolve_with_fallback(template, &project.metadata, project.title.as_deref())
}

fn resolve_with_fallback(template: &str, metadata: &Metadata, explicit: Option<&str>) -> String {
    let resolved = clean_ampersands(&substitute(template, metadata));
    if !resolved.is_empty() && resolved != "&" {
        return resolved;
    }

    if let Some(title) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    if let Some(client) = metadata
        .get(CLIENT_NAME_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        return client.to_string();
    }
    UNTITLED_PROJECT.to_string()
}

/// Replace every `{name}` with its placeholder text.
fn substitute(template: &str, metadata: &Metadata) -> String {
    re_placeholder()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            placeholder_text(metadata.get(&caps[1]))
        })
        .into_owned()
}

/// Text contributed by one placeholder.
///
/// Strings contribute their first token regardless of which field they
/// belong to, so a multi-word city also collapses to its first word.
fn placeholder_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => first_token(s).to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Collapse `& &` runs into a single `&` separator and strip edge ampersands.
fn clean_ampersands(resolved: &str) -> String {
    let collapsed = re_ampersand_run().replace_all(resolved, " & ");
    collapsed
        .trim_matches(|c: char| c == '&' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(pairs: &[(&str, Value)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    const COUPLE: &str = "{groom_name} & {bride_name}";

    #[test]
    fn test_first_names_only() {
        let m = meta(&[
            ("groom_name", json!("John Smith")),
            ("bride_name", json!("Jane Doe")),
        ]);
        assert_eq!(resolve_title(COUPLE, &m), "John & Jane");
    }

    #[test]
    fn test_empty_metadata_falls_back_to_untitled() {
        assert_eq!(resolve_title(COUPLE, &Metadata::new()), "Untitled Project");
    }

    #[test]
    fn test_missing_side_leaves_no_ampersand() {
        let m = meta(&[("groom_name", json!("John"))]);
        assert_eq!(resolve_title(COUPLE, &m), "John");

        let m = meta(&[("bride_name", json!("Jane Doe"))]);
        assert_eq!(resolve_title(COUPLE, &m), "Jane");
    }

    #[test]
    fn test_blank_strings_count_as_absent() {
        let m = meta(&[("groom_name", json!("   ")), ("bride_name", json!(""))]);
        assert_eq!(resolve_title(COUPLE, &m), "Untitled Project");
    }

    #[test]
    fn test_middle_gap_collapses_to_single_separator() {
        let m = meta(&[("a", json!("Ann")), ("c", json!("Cy"))]);
        assert_eq!(resolve_title("{a} & {b} & {c}", &m), "Ann & Cy");
    }

    #[test]
    fn test_double_ampersand_artifact() {
        let m = meta(&[("a", json!("Ann")), ("b", json!("Bo"))]);
        assert_eq!(resolve_title("{a} && {b}", &m), "Ann & Bo");
    }

    #[test]
    fn test_every_string_placeholder_is_truncated() {
        let m = meta(&[("company", json!("Acme Corp")), ("city", json!("New York"))]);
        assert_eq!(resolve_title("{company} shoot in {city}", &m), "Acme shoot in New");
    }

    #[test]
    fn test_non_string_values_use_full_form() {
        let m = meta(&[("year", json!(2025)), ("ratio", json!(1.5)), ("vip", json!(true))]);
        assert_eq!(resolve_title("Gala {year} {ratio} {vip}", &m), "Gala 2025 1.5 true");
    }

    #[test]
    fn test_literal_text_without_placeholders() {
        assert_eq!(resolve_title("Studio Session", &Metadata::new()), "Studio Session");
    }

    #[test]
    fn test_fallback_order() {
        let mut project = ProjectRecord {
            id: "p1".into(),
            vertical: "weddings".into(),
            title: Some("Smith Wedding".into()),
            metadata: meta(&[("client_name", json!("Mary Smith"))]),
            events: vec![],
        };
        assert_eq!(resolve_project_title(COUPLE, &project), "Smith Wedding");

        project.title = None;
        // client_name is used whole, not truncated
        assert_eq!(resolve_project_title(COUPLE, &project), "Mary Smith");

        project.metadata.clear();
        assert_eq!(resolve_project_title(COUPLE, &project), "Untitled Project");

        project.title = Some("   ".into());
        assert_eq!(resolve_project_title(COUPLE, &project), "Untitled Project");
    }

    #[test]
    fn test_lone_ampersand_template() {
        assert_eq!(resolve_title("&", &Metadata::new()), "Untitled Project");
    }

    #[test]
    fn test_placeholders_listed_in_order() {
        assert_eq!(
            placeholders("{groom_name} & {bride_name} ({venue})"),
            vec!["groom_name", "bride_name", "venue"]
        );
        assert!(placeholders("plain").is_empty());
    }
}
