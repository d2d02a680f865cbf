//! Management operations over a [`LoggingConfig`]
//!
//! Every operation mutates the configuration in memory and reports failure
//! through [`OpError`]; callers apply an operation to a working copy and
//! persist only on success, so a failed operation never reaches disk.

use crate::config::{
    Formatter, Handler, Logger, LoggingConfig, normalize_level,
};
use crate::filter::{FilterError, model_to_spec, parse_filter_spec};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("Unknown logger '{0}'")]
    UnknownLogger(String),

    #[error("Logger '{0}' already exists")]
    DuplicateLogger(String),

    #[error("Unknown handler '{0}'")]
    UnknownHandler(String),

    #[error("Handler '{0}' already exists")]
    DuplicateHandler(String),

    #[error("Handler '{0}' is still assigned to {1}")]
    HandlerInUse(String, String),

    #[error("Handler '{0}' is already assigned to {1}")]
    AlreadyAssigned(String, String),

    #[error("Handler '{0}' is not assigned to {1}")]
    NotAssigned(String, String),

    #[error("Unknown formatter '{0}'")]
    UnknownFormatter(String),

    #[error("Formatter '{0}' already exists")]
    DuplicateFormatter(String),

    #[error("Formatter '{0}' is still used by handler '{1}'")]
    FormatterInUse(String, String),

    #[error("Unknown log level '{0}'. Known levels are: {known:?}", known = crate::config::KNOWN_LEVELS)]
    InvalidLevel(String),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Either the root logger or a named logger category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggerRef {
    Root,
    Named(String),
}

impl LoggerRef {
    pub fn from_option(category: Option<&str>) -> Self {
        match category {
            Some(name) => LoggerRef::Named(name.to_string()),
            None => LoggerRef::Root,
        }
    }
}

impl fmt::Display for LoggerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerRef::Root => f.write_str("the root logger"),
            LoggerRef::Named(name) => write!(f, "logger '{name}'"),
        }
    }
}

/// Where a filter attribute lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTarget {
    Logger(LoggerRef),
    Handler(String),
}

impl fmt::Display for FilterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterTarget::Logger(logger) => write!(f, "{logger}"),
            FilterTarget::Handler(name) => write!(f, "handler '{name}'"),
        }
    }
}

fn check_level(level: &str) -> Result<String, OpError> {
    normalize_level(level).ok_or_else(|| OpError::InvalidLevel(level.to_string()))
}

pub fn add_logger(
    config: &mut LoggingConfig,
    category: &str,
    level: Option<&str>,
) -> Result<(), OpError> {
    if config.loggers.contains_key(category) {
        return Err(OpError::DuplicateLogger(category.to_string()));
    }
    let level = level.map(check_level).transpose()?;
    config.loggers.insert(category.to_string(), Logger {
        level,
        ..Logger::default()
    });
    Ok(())
}

pub fn remove_logger(config: &mut LoggingConfig, category: &str) -> Result<(), OpError> {
    config
        .loggers
        .remove(category)
        .map(|_| ())
        .ok_or_else(|| OpError::UnknownLogger(category.to_string()))
}

pub fn change_log_level(
    config: &mut LoggingConfig,
    logger: &LoggerRef,
    level: &str,
) -> Result<(), OpError> {
    let level = check_level(level)?;
    match logger {
        LoggerRef::Root => config.root_logger.level = level,
        LoggerRef::Named(category) => {
            let entry = config
                .loggers
                .get_mut(category)
                .ok_or_else(|| OpError::UnknownLogger(category.clone()))?;
            entry.level = Some(level);
        }
    }
    Ok(())
}

pub fn add_handler(
    config: &mut LoggingConfig,
    name: &str,
    mut handler: Handler,
) -> Result<(), OpError> {
    if config.handlers.contains_key(name) {
        return Err(OpError::DuplicateHandler(name.to_string()));
    }
    if let Some(level) = handler.level.take() {
        handler.level = Some(check_level(&level)?);
    }
    if let Some(formatter) = &handler.formatter
        && !config.formatters.contains_key(formatter)
    {
        return Err(OpError::UnknownFormatter(formatter.clone()));
    }
    if let Some(spec) = &handler.filter_spec {
        parse_filter_spec(spec)?;
    }
    config.handlers.insert(name.to_string(), handler);
    Ok(())
}

pub fn remove_handler(config: &mut LoggingConfig, name: &str) -> Result<(), OpError> {
    if !config.handlers.contains_key(name) {
        return Err(OpError::UnknownHandler(name.to_string()));
    }
    if config.root_logger.handlers.iter().any(|h| h == name) {
        return Err(OpError::HandlerInUse(
            name.to_string(),
            LoggerRef::Root.to_string(),
        ));
    }
    for (category, logger) in &config.loggers {
        if logger.handlers.iter().any(|h| h == name) {
            return Err(OpError::HandlerInUse(
                name.to_string(),
                LoggerRef::Named(category.clone()).to_string(),
            ));
        }
    }
    config.handlers.remove(name);
    Ok(())
}

pub fn assign_handler(
    config: &mut LoggingConfig,
    logger: &LoggerRef,
    handler: &str,
) -> Result<(), OpError> {
    if !config.handlers.contains_key(handler) {
        return Err(OpError::UnknownHandler(handler.to_string()));
    }
    let assigned = logger_handlers_mut(config, logger)?;
    if assigned.iter().any(|h| h == handler) {
        return Err(OpError::AlreadyAssigned(
            handler.to_string(),
            logger.to_string(),
        ));
    }
    assigned.push(handler.to_string());
    Ok(())
}

pub fn unassign_handler(
    config: &mut LoggingConfig,
    logger: &LoggerRef,
    handler: &str,
) -> Result<(), OpError> {
    let assigned = logger_handlers_mut(config, logger)?;
    let before = assigned.len();
    assigned.retain(|h| h != handler);
    if assigned.len() == before {
        return Err(OpError::NotAssigned(
            handler.to_string(),
            logger.to_string(),
        ));
    }
    Ok(())
}

fn logger_handlers_mut<'a>(
    config: &'a mut LoggingConfig,
    logger: &LoggerRef,
) -> Result<&'a mut Vec<String>, OpError> {
    match logger {
        LoggerRef::Root => Ok(&mut config.root_logger.handlers),
        LoggerRef::Named(category) => config
            .loggers
            .get_mut(category)
            .map(|entry| &mut entry.handlers)
            .ok_or_else(|| OpError::UnknownLogger(category.clone())),
    }
}

pub fn set_handler_enabled(
    config: &mut LoggingConfig,
    name: &str,
    enabled: bool,
) -> Result<(), OpError> {
    let handler = config
        .handlers
        .get_mut(name)
        .ok_or_else(|| OpError::UnknownHandler(name.to_string()))?;
    handler.enabled = enabled;
    Ok(())
}

pub fn add_formatter(
    config: &mut LoggingConfig,
    name: &str,
    pattern: &str,
) -> Result<(), OpError> {
    if config.formatters.contains_key(name) {
        return Err(OpError::DuplicateFormatter(name.to_string()));
    }
    config.formatters.insert(name.to_string(), Formatter {
        pattern: pattern.to_string(),
    });
    Ok(())
}

pub fn remove_formatter(config: &mut LoggingConfig, name: &str) -> Result<(), OpError> {
    if !config.formatters.contains_key(name) {
        return Err(OpError::UnknownFormatter(name.to_string()));
    }
    for (handler_name, handler) in &config.handlers {
        if handler.formatter.as_deref() == Some(name) {
            return Err(OpError::FormatterInUse(
                name.to_string(),
                handler_name.clone(),
            ));
        }
    }
    config.formatters.remove(name);
    Ok(())
}

/// Store a filter given in spec form.
///
/// The spec is validated by parsing and stored normalized; an empty spec
/// clears the filter. Returns the stored value.
pub fn set_filter_spec(
    config: &mut LoggingConfig,
    target: &FilterTarget,
    spec: &str,
) -> Result<Option<String>, OpError> {
    let normalized = parse_filter_spec(spec)?.map(|filter| filter.to_spec());
    *filter_slot_mut(config, target)? = normalized.clone();
    Ok(normalized)
}

/// Store a filter given in structured form.
///
/// The node is compiled to spec form, which becomes the authoritative stored
/// value; a `null` node clears the filter. Returns the stored value.
pub fn set_filter(
    config: &mut LoggingConfig,
    target: &FilterTarget,
    model: &Value,
) -> Result<Option<String>, OpError> {
    let spec = model_to_spec(model)?;
    *filter_slot_mut(config, target)? = spec.clone();
    Ok(spec)
}

/// Read a stored filter back in structured form
pub fn get_filter(
    config: &LoggingConfig,
    target: &FilterTarget,
) -> Result<Option<Value>, OpError> {
    let spec = match target {
        FilterTarget::Logger(LoggerRef::Root) => config.root_logger.filter_spec.clone(),
        FilterTarget::Logger(LoggerRef::Named(category)) => config
            .loggers
            .get(category)
            .ok_or_else(|| OpError::UnknownLogger(category.clone()))?
            .filter_spec
            .clone(),
        FilterTarget::Handler(name) => config
            .handlers
            .get(name)
            .ok_or_else(|| OpError::UnknownHandler(name.clone()))?
            .filter_spec
            .clone(),
    };

    match spec {
        Some(spec) => Ok(parse_filter_spec(&spec)?.map(|filter| filter.to_model())),
        None => Ok(None),
    }
}

fn filter_slot_mut<'a>(
    config: &'a mut LoggingConfig,
    target: &FilterTarget,
) -> Result<&'a mut Option<String>, OpError> {
    match target {
        FilterTarget::Logger(LoggerRef::Root) => Ok(&mut config.root_logger.filter_spec),
        FilterTarget::Logger(LoggerRef::Named(category)) => config
            .loggers
            .get_mut(category)
            .map(|logger| &mut logger.filter_spec)
            .ok_or_else(|| OpError::UnknownLogger(category.clone())),
        FilterTarget::Handler(name) => config
            .handlers
            .get_mut(name)
            .map(|handler| &mut handler.filter_spec)
            .ok_or_else(|| OpError::UnknownHandler(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleTarget;
    use serde_json::json;

    fn base_config() -> LoggingConfig {
        LoggingConfig::default()
    }

    #[test]
    fn test_add_and_remove_logger() {
        let mut config = base_config();
        add_logger(&mut config, "com.example", Some("debug")).unwrap();
        assert_eq!(
            config.loggers["com.example"].level.as_deref(),
            Some("DEBUG")
        );

        assert!(matches!(
            add_logger(&mut config, "com.example", None),
            Err(OpError::DuplicateLogger(_))
        ));

        remove_logger(&mut config, "com.example").unwrap();
        assert!(matches!(
            remove_logger(&mut config, "com.example"),
            Err(OpError::UnknownLogger(_))
        ));
    }

    #[test]
    fn test_change_log_level_normalizes() {
        let mut config = base_config();
        change_log_level(&mut config, &LoggerRef::Root, "warn").unwrap();
        assert_eq!(config.root_logger.level, "WARN");

        assert!(matches!(
            change_log_level(&mut config, &LoggerRef::Root, "shout"),
            Err(OpError::InvalidLevel(_))
        ));

        assert!(matches!(
            change_log_level(&mut config, &LoggerRef::Named("nope".to_string()), "INFO"),
            Err(OpError::UnknownLogger(_))
        ));
    }

    #[test]
    fn test_remove_handler_refused_while_assigned() {
        let mut config = base_config();
        // CONSOLE is assigned to the root logger by default
        assert!(matches!(
            remove_handler(&mut config, "CONSOLE"),
            Err(OpError::HandlerInUse(_, _))
        ));

        unassign_handler(&mut config, &LoggerRef::Root, "CONSOLE").unwrap();
        remove_handler(&mut config, "CONSOLE").unwrap();
        assert!(config.handlers.is_empty());
    }

    #[test]
    fn test_assign_handler_checks_both_sides() {
        let mut config = base_config();
        add_handler(&mut config, "EXTRA", Handler::console(ConsoleTarget::Stderr)).unwrap();
        add_logger(&mut config, "com.example", None).unwrap();

        let logger = LoggerRef::Named("com.example".to_string());
        assign_handler(&mut config, &logger, "EXTRA").unwrap();
        assert!(matches!(
            assign_handler(&mut config, &logger, "EXTRA"),
            Err(OpError::AlreadyAssigned(_, _))
        ));
        assert!(matches!(
            assign_handler(&mut config, &logger, "MISSING"),
            Err(OpError::UnknownHandler(_))
        ));

        unassign_handler(&mut config, &logger, "EXTRA").unwrap();
        assert!(matches!(
            unassign_handler(&mut config, &logger, "EXTRA"),
            Err(OpError::NotAssigned(_, _))
        ));
    }

    #[test]
    fn test_add_handler_validates_filter_spec() {
        let mut config = base_config();
        let mut handler = Handler::console(ConsoleTarget::Stdout);
        handler.filter_spec = Some("levels(".to_string());
        assert!(matches!(
            add_handler(&mut config, "BAD", handler),
            Err(OpError::Filter(_))
        ));
    }

    #[test]
    fn test_remove_formatter_refused_while_used() {
        let mut config = base_config();
        if let Some(handler) = config.handlers.get_mut("CONSOLE") {
            handler.formatter = Some("PATTERN".to_string());
        }
        assert!(matches!(
            remove_formatter(&mut config, "PATTERN"),
            Err(OpError::FormatterInUse(_, _))
        ));

        config.handlers.get_mut("CONSOLE").unwrap().formatter = None;
        remove_formatter(&mut config, "PATTERN").unwrap();
    }

    #[test]
    fn test_set_filter_spec_is_normalized() {
        let mut config = base_config();
        add_logger(&mut config, "com.example", None).unwrap();
        let target = FilterTarget::Logger(LoggerRef::Named("com.example".to_string()));

        let stored = set_filter_spec(&mut config, &target, "all( accept , not( deny ) )")
            .unwrap()
            .unwrap();
        assert_eq!(stored, "all(accept,not(deny))");
        assert_eq!(
            config.loggers["com.example"].filter_spec.as_deref(),
            Some("all(accept,not(deny))")
        );
    }

    #[test]
    fn test_set_filter_spec_empty_clears() {
        let mut config = base_config();
        add_logger(&mut config, "com.example", None).unwrap();
        let target = FilterTarget::Logger(LoggerRef::Named("com.example".to_string()));

        set_filter_spec(&mut config, &target, "accept").unwrap();
        assert!(set_filter_spec(&mut config, &target, "").unwrap().is_none());
        assert!(config.loggers["com.example"].filter_spec.is_none());
    }

    #[test]
    fn test_set_filter_from_structured_form() {
        let mut config = base_config();
        let target = FilterTarget::Handler("CONSOLE".to_string());

        let stored = set_filter(
            &mut config,
            &target,
            &json!({"not": {"match": "heartbeat"}}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(stored, r#"not(match("heartbeat"))"#);

        let read_back = get_filter(&config, &target).unwrap().unwrap();
        assert_eq!(read_back, json!({"not": {"match": "heartbeat"}}));
    }

    #[test]
    fn test_get_filter_on_unset_target() {
        let config = base_config();
        let target = FilterTarget::Handler("CONSOLE".to_string());
        assert!(get_filter(&config, &target).unwrap().is_none());
    }
}
