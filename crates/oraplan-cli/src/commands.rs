//! Command implementations

use crate::form::{ConnectionForm, TerminalPrompter};
use crate::input::{Input, QueryReader};
use crate::render::{self, RenderOptions};
use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use colored::Colorize;
use oraplan_analyzer::{AnalysisReport, AnalysisService};
use oraplan_core::settings::{ConnectionDefaults, OutputFormat};
use oraplan_core::{ConnectionConfig, DatabaseDriver, OraplanError, Settings};
use oraplan_driver_oracle::OracleDriver;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// Where the query text comes from
#[derive(Debug, Clone, Default, Args)]
pub struct QuerySource {
    /// Query text
    #[arg(short, long, conflicts_with = "file")]
    pub query: Option<String>,

    /// Read the query from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl QuerySource {
    pub fn reads_stdin(&self) -> bool {
        self.query.is_none() && self.file.is_none()
    }

    /// Reads the query; falls back to piped stdin when neither flag is given
    pub fn read(&self) -> anyhow::Result<String> {
        if let Some(query) = &self.query {
            return Ok(query.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read query file {}", path.display()));
        }

        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            bail!("no query given; use --query, --file or pipe the query on stdin");
        }
        let mut query = String::new();
        stdin
            .lock()
            .read_to_string(&mut query)
            .context("failed to read the query from stdin")?;
        Ok(query)
    }
}

/// Connection flags; unset flags fall back to the settings file
///
/// Values come from the command line only, never from the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Listener port
    #[arg(long)]
    pub port: Option<u16>,

    /// Service name
    #[arg(long)]
    pub service: Option<String>,

    /// Username
    #[arg(long)]
    pub user: Option<String>,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

impl ConnectionArgs {
    pub fn to_config(
        &self,
        defaults: &ConnectionDefaults,
        password: Option<String>,
    ) -> oraplan_core::Result<ConnectionConfig> {
        let mut config = defaults.to_config();
        if let Some(host) = &self.host {
            config.set_field("host", host)?;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(service) = &self.service {
            config.set_field("service_name", service)?;
        }
        if let Some(user) = &self.user {
            config.set_field("user", user)?;
        }
        config.password = password;
        config.validate()?;
        Ok(config)
    }

    fn read_password(&self, label: &str) -> anyhow::Result<Option<String>> {
        let password = if self.password_stdin {
            let mut line = String::new();
            std::io::stdin()
                .read_line(&mut line)
                .context("failed to read the password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        } else {
            rpassword::prompt_password(format!("{}: ", label))
                .context("failed to read the password")?
        };
        Ok((!password.is_empty()).then_some(password))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Output flags shared by the one-shot commands
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the settings file, then text)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Do not print the plan table
    #[arg(long)]
    pub no_plan: bool,
}

impl OutputArgs {
    fn print(&self, settings: &Settings, report: &AnalysisReport) -> anyhow::Result<()> {
        let format = self
            .format
            .map(OutputFormat::from)
            .unwrap_or(settings.output.format);
        match format {
            OutputFormat::Json => println!("{}", render::render_json(report)?),
            OutputFormat::Text => {
                let options = RenderOptions {
                    show_plan: settings.output.show_plan && !self.no_plan,
                };
                print!("{}", render::render_text(report, options));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: QuerySource,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: QuerySource,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// `oraplan analyze`: one full analysis run
pub async fn analyze(settings: &Settings, args: &AnalyzeArgs) -> anyhow::Result<()> {
    if args.connection.password_stdin && args.source.reads_stdin() {
        bail!("--password-stdin needs the query from --query or --file");
    }
    let password = args.connection.read_password("Password")?;
    let query = args.source.read()?;
    let config = args
        .connection
        .to_config(&settings.connection, password)
        .context("invalid connection details")?;

    let driver = OracleDriver::new();
    let report = AnalysisService::default()
        .analyze(&driver, &config, &query)
        .await
        .context("analysis failed")?;

    args.output.print(settings, &report)
}

/// `oraplan check`: static rules and formatting, no connection
pub fn check(settings: &Settings, args: &CheckArgs) -> anyhow::Result<()> {
    let query = args.source.read()?;
    let report = AnalysisService::default().check_only(&query)?;
    args.output.print(settings, &report)
}

/// Interactive form and query loop
pub async fn interactive(settings: &Settings) -> anyhow::Result<()> {
    let driver = OracleDriver::new();
    let form = ConnectionForm::new(driver.connection_field_schema(), settings.connection.clone());
    let service = AnalysisService::default();
    let options = RenderOptions {
        show_plan: settings.output.show_plan,
    };

    let mut config = connect_form(&driver, &form).await?;
    let mut reader = QueryReader::new()?;
    println!(
        "{}",
        "Enter a query ending with ';' or an empty line. \\c changes the connection, \\q quits."
            .dimmed()
    );

    loop {
        match reader.read()? {
            Input::Quit => break,
            Input::Reconnect => config = connect_form(&driver, &form).await?,
            Input::Query(query) => match service.analyze(&driver, &config, &query).await {
                Ok(report) => println!("{}", render::render_text(&report, options)),
                Err(e) if e.is_connection_error() => {
                    eprintln!("{}", render::render_error("Connection failed", &e));
                    eprintln!("{}", "Type \\c to change the connection details.".dimmed());
                }
                Err(e) => eprintln!("{}", render::render_error("Analysis failed", &e)),
            },
        }
    }
    Ok(())
}

/// Prompts until the details are valid and a test session succeeds
async fn connect_form(
    driver: &OracleDriver,
    form: &ConnectionForm,
) -> anyhow::Result<ConnectionConfig> {
    println!("{}", form.title().bold());
    loop {
        let config = match form.fill(&mut TerminalPrompter) {
            Ok(config) => config,
            Err(OraplanError::Io(e)) => {
                return Err(e).context("failed to read the connection form");
            }
            Err(e) => {
                eprintln!("{}", render::render_error("Invalid connection details", &e));
                continue;
            }
        };

        match driver.test_connection(&config).await {
            Ok(()) => {
                println!("{} {}", "✓".green(), "Connected".green());
                return Ok(config);
            }
            Err(e) => eprintln!("{}", render::render_error("Connection failed", &e)),
        }
    }
}
