use crate::config::{HandlerKind, LoggingConfig};
use colored::{ColoredString, Colorize};
use comfy_table::{Cell, ContentArrangement, Table, presets};

/// Build a table with the shared presentation settings
pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

/// Color a severity name the way the rest of the output does
pub fn color_level(level: &str) -> ColoredString {
    match level.to_ascii_uppercase().as_str() {
        "ERROR" | "FATAL" => level.red().bold(),
        "WARN" | "WARNING" => level.yellow(),
        "INFO" => level.green(),
        "DEBUG" => level.blue(),
        "TRACE" => level.bright_black(),
        _ => level.normal(),
    }
}

/// Print the resource tree: root logger, loggers, handlers, formatters
pub fn print_config_summary(config: &LoggingConfig) {
    println!("{}", "LOGGING CONFIGURATION".bold().bright_white());
    println!(
        "Root logger: {} -> [{}]{}",
        color_level(&config.root_logger.level),
        config.root_logger.handlers.join(", "),
        match &config.root_logger.filter_spec {
            Some(spec) => format!(" filter {spec}"),
            None => String::new(),
        }
    );

    if !config.loggers.is_empty() {
        let mut table = create_styled_table(&["Category", "Level", "Handlers", "Filter", "Parent"]);
        for (category, logger) in &config.loggers {
            table.add_row(vec![
                Cell::new(category),
                Cell::new(logger.level.as_deref().unwrap_or("(inherited)")),
                Cell::new(logger.handlers.join(", ")),
                Cell::new(logger.filter_spec.as_deref().unwrap_or("-")),
                Cell::new(if logger.use_parent_handlers { "yes" } else { "no" }),
            ]);
        }
        println!("\n{}", "Loggers".bold());
        println!("{table}");
    }

    if !config.handlers.is_empty() {
        let mut table =
            create_styled_table(&["Name", "Type", "Level", "Formatter", "Filter", "Enabled"]);
        for (name, handler) in &config.handlers {
            let kind = match &handler.kind {
                HandlerKind::Console { target } => format!("console ({target})"),
                HandlerKind::File { path, append } => format!(
                    "file ({}{})",
                    path.display(),
                    if *append { ", append" } else { "" }
                ),
            };
            table.add_row(vec![
                Cell::new(name),
                Cell::new(kind),
                Cell::new(handler.level.as_deref().unwrap_or("(inherited)")),
                Cell::new(handler.formatter.as_deref().unwrap_or("-")),
                Cell::new(handler.filter_spec.as_deref().unwrap_or("-")),
                Cell::new(if handler.enabled { "yes" } else { "no" }),
            ]);
        }
        println!("\n{}", "Handlers".bold());
        println!("{table}");
    }

    if !config.formatters.is_empty() {
        let mut table = create_styled_table(&["Name", "Pattern"]);
        for (name, formatter) in &config.formatters {
            table.add_row(vec![Cell::new(name), Cell::new(&formatter.pattern)]);
        }
        println!("\n{}", "Formatters".bold());
        println!("{table}");
    }
}

/// Print a log line with its severity token colorized
pub fn print_log_line(line: &str) {
    match crate::reader::detect_level(line) {
        Some(level) => {
            let colored = line.replacen(level, &color_level(level).to_string(), 1);
            println!("{colored}");
        }
        None => println!("{line}"),
    }
}
