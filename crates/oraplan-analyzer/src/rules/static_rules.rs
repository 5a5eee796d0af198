//! Lexical checks on the raw query text
//!
//! No SQL parsing happens here: matches inside string literals or comments
//! count, and constructs split across unusual spacing may be missed.

use crate::warning::{Warning, WarningKind};
use regex::Regex;
use std::sync::LazyLock;

static SELECT_STAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SELECT\s+\*").expect("valid regex"));

static LEADING_WILDCARD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)LIKE\s+['"]%.*['"]"#).expect("valid regex"));

static TRUNC_COLUMN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)TRUNC\(\s*\w+\s*\)").expect("valid regex"));

/// Runs the static rules in their fixed order; each fires at most once
pub fn check_static_rules(query: &str) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if SELECT_STAR_REGEX.is_match(query) {
        warnings.push(Warning::new(WarningKind::SelectStar));
    }

    if LEADING_WILDCARD_REGEX.is_match(query) {
        warnings.push(Warning::new(WarningKind::LeadingWildcard));
    }

    // Substring check, not clause-aware
    if TRUNC_COLUMN_REGEX.is_match(query) && query.to_uppercase().contains("WHERE") {
        warnings.push(Warning::new(WarningKind::FunctionOnFilteredColumn));
    }

    tracing::trace!(warning_count = warnings.len(), "static rules evaluated");
    warnings
}
