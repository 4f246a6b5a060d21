//! Parsing for the free-text list fields stored as delimited strings.
//!
//! Character traits, plot point events and similar fields are edited as a
//! single text box where entries are separated by `;`. Research note tags and
//! project themes use `,`.

/// Separator for keyword/list fields (traits, goals, key events, ...).
pub const LIST_SEPARATOR: char = ';';

/// Separator for tag-style fields (research note tags, project themes).
pub const TAG_SEPARATOR: char = ',';

/// Split `value` on `separator`, trimming each token and dropping empty ones.
///
/// Returns an empty vector for `None`, an empty string, or a string made of
/// separators and whitespace only.
pub fn split_tokens(value: Option<&str>, separator: char) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(separator)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Split a `;`-delimited list field.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    split_tokens(value, LIST_SEPARATOR)
}

/// Split a `,`-delimited tag field.
pub fn split_tags(value: Option<&str>) -> Vec<String> {
    split_tokens(value, TAG_SEPARATOR)
}

/// Trimmed value, or `None` when the field is null or whitespace-only.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_separator_and_whitespace_dropped() {
        assert_eq!(split_list(Some("Brave; Loyal; ")), vec!["Brave", "Loyal"]);
    }

    #[test]
    fn empty_and_null_yield_no_tokens() {
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(Some(" ; ;  ")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn token_order_is_preserved() {
        assert_eq!(
            split_list(Some("win the war;save the king;go home")),
            vec!["win the war", "save the king", "go home"]
        );
    }

    #[test]
    fn commas_do_not_split_list_fields() {
        assert_eq!(split_list(Some("quick, clever")), vec!["quick, clever"]);
    }

    #[test]
    fn tags_split_on_commas() {
        assert_eq!(
            split_tags(Some("history, ships ,,navy")),
            vec!["history", "ships", "navy"]
        );
    }

    #[test]
    fn non_blank_trims_and_filters() {
        assert_eq!(non_blank(Some("  hero ")), Some("hero"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
