pub mod cli;
pub mod config;
pub mod display;
pub mod filter;
pub mod ops;
pub mod reader;

use anyhow::{Context, bail};
use colored::Colorize;
use std::path::Path;

pub use cli::{Cli, ColorMode, Commands, cli_parse};
pub use config::{ConfigError, Handler, HandlerKind, LoggingConfig, load_config, save_config};
pub use filter::{Filter, FilterError, model_to_spec, parse_filter_spec};
pub use ops::{FilterTarget, LoggerRef, OpError};

/// Load, mutate a working copy, validate, and persist only on success
fn apply_and_save<F>(
    path: &Path,
    quiet: bool,
    done: &str,
    op: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&mut LoggingConfig) -> Result<(), OpError>,
{
    let mut working = load(path)?;
    op(&mut working)?;
    working.validate()?;
    config::save_config(path, &working)
        .with_context(|| format!("Failed to save config to '{}'", path.display()))?;
    if !quiet {
        println!("{} {}", "ok:".green().bold(), done);
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<LoggingConfig> {
    config::load_config(path)
        .with_context(|| format!("Failed to load config from '{}'", path.display()))
}

/// Parse a structured-filter argument: inline JSON, or `@file`
fn parse_model_arg(arg: &str) -> anyhow::Result<serde_json::Value> {
    let raw = if let Some(file) = arg.strip_prefix('@') {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read filter file '{file}'"))?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&raw).context("Invalid structured filter JSON")
}

fn filter_target(logger: Option<&str>, handler: Option<&str>) -> FilterTarget {
    match handler {
        Some(name) => FilterTarget::Handler(name.to_string()),
        None => FilterTarget::Logger(LoggerRef::from_option(logger)),
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    let path = &cli.config;
    let quiet = cli.quiet;

    // Set up color handling based on user preference
    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    match &cli.command {
        Commands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file '{}' already exists; pass --force to overwrite it",
                    path.display()
                );
            }
            config::save_config(path, config::default_config())
                .with_context(|| format!("Failed to save config to '{}'", path.display()))?;
            if !quiet {
                println!(
                    "{} wrote default configuration to '{}'",
                    "ok:".green().bold(),
                    path.display()
                );
            }
        }
        Commands::Summary => {
            let loaded = load(path)?;
            display::print_config_summary(&loaded);
        }
        Commands::Check => {
            let loaded = load(path)?;
            loaded
                .validate()
                .with_context(|| format!("Config '{}' failed validation", path.display()))?;
            if !quiet {
                println!("{} config '{}' is valid", "ok:".green().bold(), path.display());
            }
        }
        Commands::AddLogger { category, level } => {
            apply_and_save(path, quiet, &format!("added logger '{category}'"), |c| {
                ops::add_logger(c, category, level.as_deref())
            })?;
        }
        Commands::RemoveLogger { category } => {
            apply_and_save(path, quiet, &format!("removed logger '{category}'"), |c| {
                ops::remove_logger(c, category)
            })?;
        }
        Commands::ChangeLogLevel { level, logger } => {
            let target = LoggerRef::from_option(logger.as_deref());
            apply_and_save(
                path,
                quiet,
                &format!("set {target} to level {}", level.to_uppercase()),
                |c| ops::change_log_level(c, &target, level),
            )?;
        }
        Commands::AddHandler {
            name,
            handler_type,
            target,
            path: file_path,
            append,
            level,
            formatter,
        } => {
            let mut handler = match handler_type {
                cli::HandlerType::Console => {
                    if file_path.is_some() {
                        bail!("--path only applies to file handlers");
                    }
                    Handler::console(target.unwrap_or_default())
                }
                cli::HandlerType::File => {
                    if target.is_some() {
                        bail!("--target only applies to console handlers");
                    }
                    let Some(file_path) = file_path else {
                        bail!("file handlers require --path");
                    };
                    Handler::file(file_path.clone(), *append)
                }
            };
            handler.level = level.clone();
            handler.formatter = formatter.clone();

            apply_and_save(path, quiet, &format!("added handler '{name}'"), |c| {
                ops::add_handler(c, name, handler)
            })?;
        }
        Commands::RemoveHandler { name } => {
            apply_and_save(path, quiet, &format!("removed handler '{name}'"), |c| {
                ops::remove_handler(c, name)
            })?;
        }
        Commands::AssignHandler { handler, logger } => {
            let target = LoggerRef::from_option(logger.as_deref());
            apply_and_save(
                path,
                quiet,
                &format!("assigned handler '{handler}' to {target}"),
                |c| ops::assign_handler(c, &target, handler),
            )?;
        }
        Commands::UnassignHandler { handler, logger } => {
            let target = LoggerRef::from_option(logger.as_deref());
            apply_and_save(
                path,
                quiet,
                &format!("unassigned handler '{handler}' from {target}"),
                |c| ops::unassign_handler(c, &target, handler),
            )?;
        }
        Commands::EnableHandler { name } => {
            apply_and_save(path, quiet, &format!("enabled handler '{name}'"), |c| {
                ops::set_handler_enabled(c, name, true)
            })?;
        }
        Commands::DisableHandler { name } => {
            apply_and_save(path, quiet, &format!("disabled handler '{name}'"), |c| {
                ops::set_handler_enabled(c, name, false)
            })?;
        }
        Commands::AddFormatter { name, pattern } => {
            apply_and_save(path, quiet, &format!("added formatter '{name}'"), |c| {
                ops::add_formatter(c, name, pattern)
            })?;
        }
        Commands::RemoveFormatter { name } => {
            apply_and_save(path, quiet, &format!("removed formatter '{name}'"), |c| {
                ops::remove_formatter(c, name)
            })?;
        }
        Commands::SetFilter {
            logger,
            handler,
            spec,
            json,
        } => {
            let target = filter_target(logger.as_deref(), handler.as_deref());
            let mut working = load(path)?;
            let stored = match (spec, json) {
                (Some(spec), None) => ops::set_filter_spec(&mut working, &target, spec)?,
                (None, Some(json)) => {
                    let model = parse_model_arg(json)?;
                    ops::set_filter(&mut working, &target, &model)?
                }
                _ => bail!("provide exactly one of --spec or --json"),
            };
            working.validate()?;
            config::save_config(path, &working)
                .with_context(|| format!("Failed to save config to '{}'", path.display()))?;
            if !quiet {
                match stored {
                    Some(stored) => {
                        println!("{} set filter on {target}: {stored}", "ok:".green().bold())
                    }
                    None => println!("{} cleared filter on {target}", "ok:".green().bold()),
                }
            }
        }
        Commands::GetFilter { logger, handler } => {
            let target = filter_target(logger.as_deref(), handler.as_deref());
            let loaded = load(path)?;
            match ops::get_filter(&loaded, &target)? {
                Some(model) => println!("{}", serde_json::to_string_pretty(&model)?),
                None => println!("(no filter set on {target})"),
            }
        }
        Commands::CheckFilter { spec } => match parse_filter_spec(spec)? {
            Some(parsed) => {
                println!("spec:  {parsed}");
                println!("model: {}", serde_json::to_string_pretty(&parsed.to_model())?);
            }
            None => println!("(empty filter)"),
        },
        Commands::CompileFilter { json } => {
            let model = parse_model_arg(json)?;
            match model_to_spec(&model)? {
                Some(spec) => println!("{spec}"),
                None => println!("(empty filter)"),
            }
        }
        Commands::ReadLog { file, lines } => {
            let log_lines = reader::read_log_file(file, *lines)?;
            if log_lines.is_empty() && !quiet {
                eprintln!("Log file '{}' is empty", file.display());
            }
            for line in &log_lines {
                display::print_log_line(line);
            }
        }
    }

    Ok(())
}
