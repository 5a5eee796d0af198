//! SQL formatting for display
//!
//! Reindents the query and upper-cases keywords. The formatted text is only
//! shown to the user; rules and EXPLAIN always see the original text.

/// Formatter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterConfig {
    pub indent_size: u8,
    /// Upper-case keywords; when false keyword case is left as typed
    pub uppercase_keywords: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent_size: 2,
            uppercase_keywords: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SqlFormatter {
    config: FormatterConfig,
}

impl SqlFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// Formats `sql`; whitespace-only input yields an empty string
    pub fn format(&self, sql: &str) -> String {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let options = sqlformat::FormatOptions {
            indent: sqlformat::Indent::Spaces(self.config.indent_size),
            uppercase: self.config.uppercase_keywords.then_some(true),
            ..Default::default()
        };
        let formatted = sqlformat::format(trimmed, &sqlformat::QueryParams::None, &options);

        formatted.replace("\r\n", "\n").trim_end().to_string()
    }
}

/// Formats with the default configuration
pub fn format_sql(sql: &str) -> String {
    SqlFormatter::default().format(sql)
}
