//! Warning model shared by the static and plan rule sets

use serde::{Deserialize, Serialize};

/// Severity of a warning
///
/// Variants are declared in ascending order so that `Critical > High > Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the severity level as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }

    /// Display color used when rendering the report.
    ///
    /// Only two colors exist for three levels: Critical and High share the
    /// alert color.
    pub fn display_color(&self) -> DisplayColor {
        match self {
            Self::Critical | Self::High => DisplayColor::Alert,
            Self::Medium => DisplayColor::Caution,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report highlight color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayColor {
    /// Red
    Alert,
    /// Orange
    Caution,
}

/// Which rule produced a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// `SELECT *`
    SelectStar,
    /// `LIKE '%...'`
    LeadingWildcard,
    /// `TRUNC(column)` in a query with a WHERE clause
    FunctionOnFilteredColumn,
    /// `TABLE ACCESS FULL`
    FullTableScan,
    /// `MERGE JOIN CARTESIAN` and friends
    CartesianProduct,
    /// `INDEX SKIP SCAN`
    IndexSkipScan,
}

impl WarningKind {
    /// Severity assigned to this kind of finding
    pub fn severity(&self) -> Severity {
        match self {
            Self::FullTableScan | Self::CartesianProduct => Severity::Critical,
            Self::SelectStar | Self::LeadingWildcard => Severity::High,
            Self::FunctionOnFilteredColumn | Self::IndexSkipScan => Severity::Medium,
        }
    }

    /// Short problem label
    pub fn label(&self) -> &'static str {
        match self {
            Self::SelectStar => "Unqualified column selection (SELECT *)",
            Self::LeadingWildcard => "LIKE pattern starts with %",
            Self::FunctionOnFilteredColumn => "TRUNC() on a column in a filtered query",
            Self::FullTableScan => "Full table scan",
            Self::CartesianProduct => "Cartesian product",
            Self::IndexSkipScan => "Index skip scan",
        }
    }

    /// Human-readable advice
    pub fn advice(&self) -> &'static str {
        match self {
            Self::SelectStar => "Select only the columns you need.",
            Self::LeadingWildcard => "A leading wildcard disables index usage. Avoid it.",
            Self::FunctionOnFilteredColumn => {
                "Function-wrapped columns in a filter prevent index usage on dates."
            }
            Self::FullTableScan => "The whole table is read. Review indexing.",
            Self::CartesianProduct => "A join condition is missing.",
            Self::IndexSkipScan => "The index is not a good fit for this filter.",
        }
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Rule that produced the warning
    pub kind: WarningKind,
    /// Severity level
    pub severity: Severity,
    /// Short problem label
    pub problem: String,
    /// Suggested action
    pub advice: String,
    /// Implicated table, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Warning {
    /// Creates a warning with the kind's default severity, label and advice
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            problem: kind.label().to_string(),
            advice: kind.advice().to_string(),
            table: None,
        }
    }

    /// Sets the implicated table
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.problem)?;
        if let Some(table) = &self.table {
            write!(f, " ({})", table)?;
        }
        write!(f, " - {}", self.advice)
    }
}
