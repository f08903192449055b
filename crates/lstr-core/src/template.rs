//! `$name` / `${name}` placeholder substitution that tolerates missing keys.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|([A-Za-z_][A-Za-z0-9_]*)|\{([A-Za-z_][A-Za-z0-9_]*)\})")
        .expect("placeholder pattern is valid")
});

/// Replace `${name}` and `$name` with values from `values`.
///
/// `$$` renders as a literal `$`. Placeholders without a value, and `$`
/// signs not followed by a valid name, are left as written.
#[must_use]
pub fn safe_substitute(template: &str, values: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                return "$".to_string();
            }
            let name = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            match values.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert("zoom_results_meetings".to_string(), "42".to_string());
        m.insert("email_report_date_string".to_string(), "10/19/2026".to_string());
        m
    }

    #[test]
    fn replaces_braced_and_bare_placeholders() {
        let out = safe_substitute(
            "Report ${email_report_date_string}: $zoom_results_meetings meetings",
            &values(),
        );
        assert_eq!(out, "Report 10/19/2026: 42 meetings");
    }

    #[test]
    fn leaves_unknown_placeholders_verbatim() {
        let out = safe_substitute("Hours: ${mediasite_results_time_watched_hours} / $nope", &values());
        assert_eq!(out, "Hours: ${mediasite_results_time_watched_hours} / $nope");
    }

    #[test]
    fn double_dollar_escapes() {
        let out = safe_substitute("Cost $$5 for $zoom_results_meetings", &values());
        assert_eq!(out, "Cost $5 for 42");
    }

    #[test]
    fn stray_dollar_signs_are_untouched() {
        let out = safe_substitute("$ 10 and ${ broken", &values());
        assert_eq!(out, "$ 10 and ${ broken");
    }
}
