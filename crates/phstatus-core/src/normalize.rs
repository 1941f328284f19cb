//! Holiday name normalization.
//!
//! Public holiday calendars decorate the same holiday differently from one day
//! to the next ("Thaipusam Holiday", "Thaipusam (Regional Holiday)"). This
//! module strips those decorations so that consecutive days of one holiday can
//! be recognized as the same holiday.
//!
//! Stripping is driven by an ordered list of [`SuffixRule`]s applied until
//! none of them matches anymore, so "New Year's Day Holiday" first loses
//! "Holiday" and then "Day".

use std::sync::LazyLock;

use regex::Regex;

/// A rule that removes one kind of trailing decoration from a summary.
#[derive(Debug)]
pub struct SuffixRule {
    /// Short name used in debug logs.
    pub name: &'static str,
    pattern: Regex,
}

impl SuffixRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid suffix rule regex"),
        }
    }

    /// Removes the decoration from the end of `summary`.
    ///
    /// Returns `None` if the rule does not match or if nothing would be left.
    pub fn strip<'a>(&self, summary: &'a str) -> Option<&'a str> {
        let found = self.pattern.find(summary)?;
        let rest = summary[..found.start()].trim();
        if rest.is_empty() { None } else { Some(rest) }
    }
}

/// The built-in rules, in the order they are tried.
static SUFFIX_RULES: LazyLock<Vec<SuffixRule>> = LazyLock::new(|| {
    vec![
        SuffixRule::new("parenthetical", r"\s*\([^()]*\)\s*$"),
        SuffixRule::new("holiday", r"(?i)\s+holiday\s*$"),
        SuffixRule::new("day", r"(?i)\s+day\s*$"),
    ]
});

/// Returns the built-in suffix rules.
pub fn suffix_rules() -> &'static [SuffixRule] {
    &SUFFIX_RULES
}

/// Strips decorative suffixes from a holiday summary.
///
/// The original casing of the remaining text is preserved.
///
/// ```
/// use phstatus_core::normalize_summary;
///
/// assert_eq!(normalize_summary("Christmas Day"), "Christmas");
/// assert_eq!(normalize_summary("Thaipusam (Regional Holiday)"), "Thaipusam");
/// assert_eq!(normalize_summary("New Year's Day Holiday"), "New Year's");
/// ```
pub fn normalize_summary(summary: &str) -> String {
    normalize_with(summary, suffix_rules())
}

/// Strips suffixes using a custom rule list.
pub fn normalize_with(summary: &str, rules: &[SuffixRule]) -> String {
    let mut current = summary.trim();
    'fixed_point: loop {
        for rule in rules {
            if let Some(stripped) = rule.strip(current) {
                tracing::trace!(rule = rule.name, from = current, to = stripped, "stripped suffix");
                current = stripped;
                continue 'fixed_point;
            }
        }
        return current.to_string();
    }
}

/// Returns true if two normalized names refer to the same holiday.
///
/// Comparison ignores case, matching the case-insensitive suffix rules.
pub fn same_holiday(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod documented_suffixes {
        use super::*;

        #[test]
        fn strips_trailing_day() {
            assert_eq!(normalize_summary("Christmas Day"), "Christmas");
        }

        #[test]
        fn strips_trailing_holiday() {
            assert_eq!(normalize_summary("Deepavali Holiday"), "Deepavali");
        }

        #[test]
        fn strips_parenthetical() {
            assert_eq!(normalize_summary("Thaipusam (Regional Holiday)"), "Thaipusam");
        }

        #[test]
        fn strips_repeatedly() {
            assert_eq!(normalize_summary("New Year's Day Holiday"), "New Year's");
            assert_eq!(normalize_summary("Merdeka Holiday Day"), "Merdeka");
            assert_eq!(
                normalize_summary("Hari Raya Holiday (Regional Holiday)"),
                "Hari Raya"
            );
        }
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn case_insensitive_match_keeps_original_case() {
            assert_eq!(normalize_summary("Labour DAY"), "Labour");
            assert_eq!(normalize_summary("wesak holiday"), "wesak");
        }

        #[test]
        fn trims_whitespace() {
            assert_eq!(normalize_summary("  Christmas Day  "), "Christmas");
            assert_eq!(normalize_summary("Thaipusam   (Regional)  "), "Thaipusam");
        }

        #[test]
        fn never_strips_to_nothing() {
            assert_eq!(normalize_summary("Holiday"), "Holiday");
            assert_eq!(normalize_summary("Day"), "Day");
            assert_eq!(normalize_summary("(Observed)"), "(Observed)");
        }

        #[test]
        fn only_whole_trailing_words() {
            assert_eq!(normalize_summary("Sunday"), "Sunday");
            assert_eq!(normalize_summary("Holidays"), "Holidays");
            assert_eq!(normalize_summary("Day of Valour"), "Day of Valour");
        }

        #[test]
        fn undecorated_summary_is_unchanged() {
            assert_eq!(normalize_summary("Chinese New Year"), "Chinese New Year");
        }

        #[test]
        fn custom_rules() {
            let rules = vec![SuffixRule::new("observed", r"(?i)\s+observed$")];
            assert_eq!(normalize_with("Christmas Day observed", &rules), "Christmas Day");
        }
    }

    #[test]
    fn same_holiday_ignores_case() {
        assert!(same_holiday("Thaipusam", "THAIPUSAM"));
        assert!(!same_holiday("Thaipusam", "Deepavali"));
    }
}
