//! Database driver trait definition

use crate::{Connection, OraplanError, Result};
use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;

/// Field type for the connection form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionFieldType {
    /// Single-line text input
    Text,
    /// Password input (masked)
    Password,
    /// Numeric input
    Number,
}

/// Definition of a connection form field
#[derive(Debug, Clone)]
pub struct ConnectionField {
    /// Field identifier (used as key in [`ConnectionConfig::set_field`])
    pub id: Cow<'static, str>,
    /// Display label
    pub label: Cow<'static, str>,
    /// Field type
    pub field_type: ConnectionFieldType,
    /// Default value
    pub default_value: Option<Cow<'static, str>>,
    /// Whether the field is required
    pub required: bool,
    /// Help text shown next to the prompt
    pub help_text: Option<Cow<'static, str>>,
}

impl ConnectionField {
    /// Create a new text field
    pub const fn text(id: &'static str, label: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            field_type: ConnectionFieldType::Text,
            default_value: None,
            required: false,
            help_text: None,
        }
    }

    /// Create a new password field
    pub const fn password(id: &'static str, label: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            field_type: ConnectionFieldType::Password,
            default_value: None,
            required: false,
            help_text: None,
        }
    }

    /// Create a new number field
    pub const fn number(id: &'static str, label: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            field_type: ConnectionFieldType::Number,
            default_value: None,
            required: false,
            help_text: None,
        }
    }

    // Builder methods
    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default_value = Some(Cow::Borrowed(value));
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help_text(mut self, text: &'static str) -> Self {
        self.help_text = Some(Cow::Borrowed(text));
        self
    }

    pub fn is_secret(&self) -> bool {
        self.field_type == ConnectionFieldType::Password
    }
}

/// Schema defining all fields of a connection form
#[derive(Debug, Clone)]
pub struct ConnectionFieldSchema {
    /// Form title (e.g., "Oracle Connection")
    pub title: Cow<'static, str>,
    /// Fields to display, in prompt order
    pub fields: Vec<ConnectionField>,
}

/// Core driver trait that database drivers implement
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Driver name (e.g., "oracle")
    fn name(&self) -> &'static str;

    /// Open a new session. Exactly one attempt is made; no retry.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>>;

    /// Open a session, run a trivial statement, then close it
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<()>;

    /// Build the driver-specific connect string from configuration
    fn build_connection_string(&self, config: &ConnectionConfig) -> String;

    /// Get the connection field schema for the form
    fn connection_field_schema(&self) -> ConnectionFieldSchema {
        ConnectionFieldSchema {
            title: Cow::Borrowed("Connection"),
            fields: vec![
                ConnectionField::text("host", "Host")
                    .default_value("localhost")
                    .required(),
                ConnectionField::number("port", "Port"),
                ConnectionField::text("service_name", "Service Name").required(),
                ConnectionField::text("user", "Username"),
                ConnectionField::password("password", "Password"),
            ],
        }
    }
}

/// Connection descriptor for a single analysis run
///
/// Built fresh per request from the form (or CLI flags) and dropped once the
/// session closes.
#[derive(Clone, Default)]
pub struct ConnectionConfig {
    /// Host address
    pub host: String,
    /// Listener port
    pub port: u16,
    /// Service name (or SID alias) registered with the listener
    pub service_name: String,
    /// Username
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
}

impl ConnectionConfig {
    /// Create a new configuration for a host/port/service triple
    pub fn new(host: &str, port: u16, service_name: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            service_name: service_name.to_string(),
            username: None,
            password: None,
        }
    }

    /// Set the credentials
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    /// Set a field by its form identifier
    pub fn set_field(&mut self, id: &str, value: &str) -> Result<()> {
        match id {
            "host" => self.host = value.trim().to_string(),
            "port" => {
                self.port = value.trim().parse::<u16>().map_err(|_| {
                    OraplanError::Configuration(format!("Invalid port: '{}'", value.trim()))
                })?
            }
            "service_name" => self.service_name = value.trim().to_string(),
            "user" => self.username = Some(value.trim().to_string()),
            "password" => self.password = Some(value.to_string()),
            other => {
                return Err(OraplanError::Configuration(format!(
                    "Unknown connection field: {}",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Check that the descriptor can be used to attempt a connection
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(OraplanError::Configuration("Host is required".into()));
        }
        if self.port == 0 {
            return Err(OraplanError::Configuration("Port must be non-zero".into()));
        }
        if self.service_name.trim().is_empty() {
            return Err(OraplanError::Configuration(
                "Service name is required".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("service_name", &self.service_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
