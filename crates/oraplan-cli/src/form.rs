//! Connection form driven by the driver's field schema

use oraplan_core::settings::ConnectionDefaults;
use oraplan_core::{ConnectionConfig, ConnectionField, ConnectionFieldSchema, OraplanError, Result};
use std::io::{self, BufRead, Write};

/// Source of answers for the connection form
pub trait Prompter {
    /// Asks for a visible value; an empty answer means "keep the default"
    fn ask(&mut self, label: &str, default: Option<&str>) -> io::Result<String>;

    /// Asks for a secret without echoing it
    fn ask_secret(&mut self, label: &str) -> io::Result<String>;
}

/// Prompts on the terminal; secrets are read with echo disabled
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str, default: Option<&str>) -> io::Result<String> {
        let mut stdout = io::stdout();
        match default {
            Some(default) => write!(stdout, "{} [{}]: ", label, default)?,
            None => write!(stdout, "{}: ", label)?,
        }
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while reading the connection form",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(format!("{}: ", label))
    }
}

pub struct ConnectionForm {
    schema: ConnectionFieldSchema,
    defaults: ConnectionDefaults,
}

impl ConnectionForm {
    pub fn new(schema: ConnectionFieldSchema, defaults: ConnectionDefaults) -> Self {
        Self { schema, defaults }
    }

    pub fn title(&self) -> &str {
        &self.schema.title
    }

    /// Settings value first, then the driver's own default
    pub fn default_for(&self, field: &ConnectionField) -> Option<String> {
        self.defaults
            .value_for(&field.id)
            .filter(|value| !value.is_empty())
            .or_else(|| field.default_value.as_ref().map(|v| v.to_string()))
    }

    /// Field label, followed by its help text when the schema has one
    pub fn prompt_label(field: &ConnectionField) -> String {
        match field.help_text.as_deref() {
            Some(help) if !help.is_empty() => format!("{} ({})", field.label, help),
            _ => field.label.to_string(),
        }
    }

    /// Prompts every field in schema order and builds a validated descriptor
    pub fn fill(&self, prompter: &mut impl Prompter) -> Result<ConnectionConfig> {
        let mut config = ConnectionConfig::default();

        for field in &self.schema.fields {
            let label = Self::prompt_label(field);
            let value = if field.is_secret() {
                prompter.ask_secret(&label)?
            } else {
                let default = self.default_for(field);
                let answer = prompter.ask(&label, default.as_deref())?;
                if answer.trim().is_empty() {
                    default.unwrap_or_default()
                } else {
                    answer
                }
            };

            if value.trim().is_empty() {
                if field.required {
                    return Err(OraplanError::Configuration(format!(
                        "{} is required",
                        field.label
                    )));
                }
                continue;
            }
            config.set_field(&field.id, &value)?;
        }

        config.validate()?;
        tracing::debug!(config = ?config, "connection form completed");
        Ok(config)
    }
}
