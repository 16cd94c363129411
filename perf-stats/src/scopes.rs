//! Scope names, filters and ordering
//!
//! Summary files report one duration per test suite. Suite names are
//! normalized to scope labels, filtered through a deny-list and an
//! allow-list, and finally ordered by a fixed category order.

use std::cmp::Ordering;

/// Scopes retained in the global statistics, in report order
pub const CORE_SCOPES: [&str; 6] = ["global", "restaurants", "auth", "users", "orders", "products"];

/// Summary lines that are never scopes
pub const EXCLUDED_SCOPES: [&str; 4] = [
    "Files Summary",
    "Test Results",
    "restaurantCategories",
    "productCategories",
];

/// Summary label used for the whole test run
const TOTAL_TESTS_LABEL: &str = "Total Tests";

/// Suffix of test suite file names
const TEST_FILE_SUFFIX: &str = ".test.js";

/// Allow-list and deny-list applied to normalized scope labels
#[derive(Debug, Clone, Copy)]
pub struct ScopeFilter {
    core: &'static [&'static str],
    excluded: &'static [&'static str],
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self {
            core: &CORE_SCOPES,
            excluded: &EXCLUDED_SCOPES,
        }
    }
}

impl ScopeFilter {
    /// Check whether a normalized label is on the deny-list
    pub fn is_excluded(&self, label: &str) -> bool {
        self.excluded.contains(&label)
    }

    /// Check whether a normalized label is a core scope
    pub fn is_core(&self, label: &str) -> bool {
        self.core.contains(&label)
    }

    /// Check whether a normalized label survives both lists
    pub fn accepts(&self, label: &str) -> bool {
        !self.is_excluded(label) && self.is_core(label)
    }

    /// Position of a label in the category order (`None` for unknown labels)
    pub fn category_rank(&self, label: &str) -> Option<usize> {
        self.core.iter().position(|scope| *scope == label)
    }

    /// Stable-sort comparator: known categories in order, unknown labels last
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.category_rank(a), self.category_rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Normalize a raw summary label into a scope name
///
/// `"Total Tests"` becomes `"global"` and a trailing `.test.js` is removed.
pub fn normalize_scope_label(raw: &str) -> String {
    let label = raw.trim();
    if label == TOTAL_TESTS_LABEL {
        return "global".to_string();
    }
    label.strip_suffix(TEST_FILE_SUFFIX).unwrap_or(label).to_string()
}

/// Parse a summary duration such as `" 45ms"` or `"60 ms"`
///
/// Malformed values are logged and read as 0.0.
pub fn parse_duration(raw: &str) -> f64 {
    match parse_duration_strict(raw) {
        Some(value) => value,
        None => {
            log::warn!("Failed to parse duration: {:?}, using 0.0", raw);
            0.0
        }
    }
}

/// Parse a duration, returning `None` when the value is not a number
pub(crate) fn parse_duration_strict(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("ms").unwrap_or(trimmed).trim();
    number.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_scope_label() {
        assert_eq!(normalize_scope_label("  Total Tests "), "global");
        assert_eq!(normalize_scope_label("orders.test.js"), "orders");
        assert_eq!(normalize_scope_label(" auth.test.js "), "auth");
        assert_eq!(normalize_scope_label("Files Summary"), "Files Summary");
    }

    #[test]
    fn test_filter_lists() {
        let filter = ScopeFilter::default();
        assert!(filter.accepts("global"));
        assert!(filter.accepts("products"));
        assert!(!filter.accepts("Test Results"));
        assert!(!filter.accepts("restaurantCategories"));
        assert!(!filter.accepts("payments"));
    }

    #[test]
    fn test_category_order() {
        let filter = ScopeFilter::default();
        let mut labels = vec!["products", "unknown", "global", "auth", "orders"];
        labels.sort_by(|a, b| filter.compare(a, b));
        assert_eq!(labels, vec!["global", "auth", "orders", "products", "unknown"]);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(" 45ms"), 45.0);
        assert_eq!(parse_duration("60 ms"), 60.0);
        assert_eq!(parse_duration("12.5"), 12.5);
        assert_eq!(parse_duration("n/a"), 0.0);
        assert_eq!(parse_duration(""), 0.0);
    }
}
