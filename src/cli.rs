use crate::config::ConsoleTarget;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Manage a logging configuration: loggers, handlers, formatters, and filters
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the logging configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = "logging.toml",
        env = "LOGCONF_CONFIG"
    )]
    pub config: PathBuf,

    /// Control colored output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Suppress confirmation messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandlerType {
    Console,
    File,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fresh default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show loggers, handlers, and formatters
    Summary,

    /// Validate the configuration and report problems
    Check,

    /// Add a logger category
    AddLogger {
        category: String,

        /// Level for the new logger; inherited when omitted
        #[arg(short, long)]
        level: Option<String>,
    },

    /// Remove a logger category
    RemoveLogger { category: String },

    /// Change the level of the root logger or a named logger
    ChangeLogLevel {
        level: String,

        /// Logger category; the root logger when omitted
        #[arg(long)]
        logger: Option<String>,
    },

    /// Add a handler
    AddHandler {
        name: String,

        #[arg(long = "type", value_enum)]
        handler_type: HandlerType,

        /// Console target (console handlers only)
        #[arg(long, value_enum)]
        target: Option<ConsoleTarget>,

        /// Output path (file handlers only)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Append to the output file instead of truncating it
        #[arg(long)]
        append: bool,

        #[arg(short, long)]
        level: Option<String>,

        /// Name of the formatter the handler uses
        #[arg(long)]
        formatter: Option<String>,
    },

    /// Remove a handler (refused while any logger still uses it)
    RemoveHandler { name: String },

    /// Assign a handler to the root logger or a named logger
    AssignHandler {
        handler: String,

        /// Logger category; the root logger when omitted
        #[arg(long)]
        logger: Option<String>,
    },

    /// Unassign a handler from the root logger or a named logger
    UnassignHandler {
        handler: String,

        /// Logger category; the root logger when omitted
        #[arg(long)]
        logger: Option<String>,
    },

    /// Enable a handler
    EnableHandler { name: String },

    /// Disable a handler without removing it
    DisableHandler { name: String },

    /// Add a pattern formatter
    AddFormatter { name: String, pattern: String },

    /// Remove a formatter (refused while any handler still uses it)
    RemoveFormatter { name: String },

    /// Set or clear the filter on a logger or handler
    SetFilter {
        /// Logger category target; the root logger when no target is given
        #[arg(long, conflicts_with = "handler")]
        logger: Option<String>,

        /// Handler target
        #[arg(long)]
        handler: Option<String>,

        /// Filter in spec form, e.g. 'not(match("noise"))'; empty clears
        #[arg(long, conflicts_with = "json")]
        spec: Option<String>,

        /// Filter in structured JSON form, inline or @file
        #[arg(long)]
        json: Option<String>,
    },

    /// Read back the filter of a logger or handler in structured form
    GetFilter {
        /// Logger category target; the root logger when no target is given
        #[arg(long, conflicts_with = "handler")]
        logger: Option<String>,

        /// Handler target
        #[arg(long)]
        handler: Option<String>,
    },

    /// Parse a filter spec and print its normalized spec and structured form
    CheckFilter { spec: String },

    /// Compile a structured filter (inline JSON or @file) to spec form
    CompileFilter { json: String },

    /// Show the tail of a log file with severities colorized
    ReadLog {
        file: PathBuf,

        /// Number of lines from the end of the file; 0 for the whole file
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
