use crate::filter::parse_filter_spec;
use chrono::Local;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Level names accepted for loggers and handlers
pub const KNOWN_LEVELS: [&str; 8] = [
    "ALL", "TRACE", "DEBUG", "INFO", "WARN", "ERROR", "FATAL", "OFF",
];

/// Map a level name to its canonical upper-case form, case-insensitively
pub fn normalize_level(level: &str) -> Option<String> {
    KNOWN_LEVELS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(level))
        .map(|known| known.to_string())
}

/// The full logging configuration: one root logger plus named loggers,
/// handlers, and formatters keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub root_logger: RootLogger,
    pub loggers: BTreeMap<String, Logger>,
    pub handlers: BTreeMap<String, Handler>,
    pub formatters: BTreeMap<String, Formatter>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut handlers = BTreeMap::new();
        handlers.insert("CONSOLE".to_string(), Handler::console(ConsoleTarget::Stdout));

        let mut formatters = BTreeMap::new();
        formatters.insert(
            "PATTERN".to_string(),
            Formatter {
                pattern: "%d{HH:mm:ss,SSS} %-5p [%c] %s%n".to_string(),
            },
        );

        Self {
            root_logger: RootLogger {
                level: "INFO".to_string(),
                handlers: vec!["CONSOLE".to_string()],
                filter_spec: None,
            },
            loggers: BTreeMap::new(),
            handlers,
            formatters,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RootLogger {
    pub level: String,
    pub handlers: Vec<String>,
    /// Authoritative filter in spec form
    pub filter_spec: Option<String>,
}

impl Default for RootLogger {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            handlers: Vec::new(),
            filter_spec: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logger {
    /// Effective level; inherits from the parent category when absent
    pub level: Option<String>,
    pub handlers: Vec<String>,
    /// Authoritative filter in spec form
    pub filter_spec: Option<String>,
    pub use_parent_handlers: bool,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: None,
            handlers: Vec::new(),
            filter_spec: None,
            use_parent_handlers: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Handler {
    #[serde(flatten)]
    pub kind: HandlerKind,
    pub level: Option<String>,
    pub formatter: Option<String>,
    pub filter_spec: Option<String>,
    pub enabled: bool,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::console(ConsoleTarget::Stdout)
    }
}

impl Handler {
    pub fn console(target: ConsoleTarget) -> Self {
        Self {
            kind: HandlerKind::Console { target },
            level: None,
            formatter: None,
            filter_spec: None,
            enabled: true,
        }
    }

    pub fn file(path: PathBuf, append: bool) -> Self {
        Self {
            kind: HandlerKind::File { path, append },
            level: None,
            formatter: None,
            filter_spec: None,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HandlerKind {
    Console {
        #[serde(default)]
        target: ConsoleTarget,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        append: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

impl fmt::Display for ConsoleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleTarget::Stdout => f.write_str("stdout"),
            ConsoleTarget::Stderr => f.write_str("stderr"),
        }
    }
}

/// A pattern formatter shared between handlers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Formatter {
    pub pattern: String,
}

impl LoggingConfig {
    /// Referential-integrity check over the whole resource tree.
    ///
    /// Every handler named by a logger must exist, every formatter named by a
    /// handler must exist, every level must be a known name, and every stored
    /// filter spec must parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if normalize_level(&self.root_logger.level).is_none() {
            problems.push(format!(
                "root logger has unknown level '{}'",
                self.root_logger.level
            ));
        }
        for handler in &self.root_logger.handlers {
            if !self.handlers.contains_key(handler) {
                problems.push(format!("root logger references unknown handler '{handler}'"));
            }
        }
        if let Some(spec) = &self.root_logger.filter_spec
            && let Err(e) = parse_filter_spec(spec)
        {
            problems.push(format!("root logger has a bad filter spec: {e}"));
        }

        for (category, logger) in &self.loggers {
            if let Some(level) = &logger.level
                && normalize_level(level).is_none()
            {
                problems.push(format!("logger '{category}' has unknown level '{level}'"));
            }
            for handler in &logger.handlers {
                if !self.handlers.contains_key(handler) {
                    problems.push(format!(
                        "logger '{category}' references unknown handler '{handler}'"
                    ));
                }
            }
            if let Some(spec) = &logger.filter_spec
                && let Err(e) = parse_filter_spec(spec)
            {
                problems.push(format!("logger '{category}' has a bad filter spec: {e}"));
            }
        }

        for (name, handler) in &self.handlers {
            if let Some(level) = &handler.level
                && normalize_level(level).is_none()
            {
                problems.push(format!("handler '{name}' has unknown level '{level}'"));
            }
            if let Some(formatter) = &handler.formatter
                && !self.formatters.contains_key(formatter)
            {
                problems.push(format!(
                    "handler '{name}' references unknown formatter '{formatter}'"
                ));
            }
            if let Some(spec) = &handler.filter_spec
                && let Err(e) = parse_filter_spec(spec)
            {
                problems.push(format!("handler '{name}' has a bad filter spec: {e}"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

pub fn load_config(path: &Path) -> Result<LoggingConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<LoggingConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn save_config(path: &Path, config: &LoggingConfig) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(config)?;
    let header = format!(
        "# Managed by logconf; edit through the CLI where possible.\n# Last written: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(path, format!("{header}{body}")).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

pub fn default_config() -> &'static LoggingConfig {
    static DEFAULT_CONFIG: LazyLock<LoggingConfig> = LazyLock::new(LoggingConfig::default);
    &DEFAULT_CONFIG
}
