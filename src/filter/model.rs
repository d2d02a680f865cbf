//! Conversion between the structured attribute form of a filter and the
//! [`Filter`] tree.
//!
//! The structured form is a JSON object with exactly one recognized key per
//! node, e.g. `{"not": {"level": "DEBUG"}}` or
//! `{"level-range": {"min-level": "INFO", "min-inclusive": true,
//! "max-level": "WARN", "max-inclusive": false}}`.

use super::MAX_DEPTH;
use super::error::FilterError;
use super::tree::Filter;
use serde_json::{Value, json};

const KEY_ACCEPT: &str = "accept";
const KEY_ALL: &str = "all";
const KEY_ANY: &str = "any";
const KEY_CHANGE_LEVEL: &str = "change-level";
const KEY_DENY: &str = "deny";
const KEY_LEVEL: &str = "level";
const KEY_LEVEL_RANGE: &str = "level-range";
const KEY_MATCH: &str = "match";
const KEY_NOT: &str = "not";
const KEY_REPLACE: &str = "replace";

const KEY_MIN_LEVEL: &str = "min-level";
const KEY_MIN_INCLUSIVE: &str = "min-inclusive";
const KEY_MAX_LEVEL: &str = "max-level";
const KEY_MAX_INCLUSIVE: &str = "max-inclusive";
const KEY_PATTERN: &str = "pattern";
const KEY_REPLACEMENT: &str = "replacement";
const KEY_REPLACE_ALL: &str = "replace-all";

/// Recognized node keys, in detection order
const SCAN_ORDER: [&str; 10] = [
    KEY_ACCEPT,
    KEY_ALL,
    KEY_ANY,
    KEY_CHANGE_LEVEL,
    KEY_DENY,
    KEY_LEVEL,
    KEY_LEVEL_RANGE,
    KEY_MATCH,
    KEY_NOT,
    KEY_REPLACE,
];

/// Convert a structured filter node into tree form
///
/// `Null` is a defined filter absence and yields `Ok(None)`. A node with no
/// recognized key is invalid; a node with more than one recognized key is
/// ambiguous and rejected rather than resolved by scan order.
pub fn filter_from_model(value: &Value) -> Result<Option<Filter>, FilterError> {
    if value.is_null() {
        return Ok(None);
    }
    node_to_filter(value, 0).map(Some)
}

/// Compile a structured filter node straight to its spec string
pub fn model_to_spec(value: &Value) -> Result<Option<String>, FilterError> {
    Ok(filter_from_model(value)?.map(|filter| filter.to_spec()))
}

fn node_to_filter(value: &Value, depth: usize) -> Result<Filter, FilterError> {
    if depth > MAX_DEPTH {
        return Err(FilterError::NestingTooDeep);
    }

    let Some(node) = value.as_object() else {
        return Err(FilterError::InvalidFilter(value.to_string()));
    };

    let mut present = SCAN_ORDER.iter().filter(|key| node.contains_key(**key));
    let key = match present.next() {
        Some(key) => *key,
        None => return Err(FilterError::InvalidFilter(value.to_string())),
    };
    if let Some(second) = present.next() {
        return Err(FilterError::AmbiguousFilter(
            key.to_string(),
            second.to_string(),
        ));
    }

    let payload = &node[key];
    match key {
        KEY_ACCEPT => Ok(Filter::Accept),
        KEY_DENY => Ok(Filter::Deny),
        KEY_NOT => node_to_filter(payload, depth + 1).map(|inner| Filter::Not(Box::new(inner))),
        KEY_ALL => children_to_filters(payload, depth).map(Filter::All),
        KEY_ANY => children_to_filters(payload, depth).map(Filter::Any),
        KEY_CHANGE_LEVEL => string_payload(payload).map(Filter::LevelChange),
        KEY_LEVEL => string_payload(payload).map(Filter::Levels),
        KEY_LEVEL_RANGE => Ok(Filter::LevelRange {
            min: string_field(payload, KEY_MIN_LEVEL)?,
            min_inclusive: bool_field(payload, KEY_MIN_INCLUSIVE)?,
            max: string_field(payload, KEY_MAX_LEVEL)?,
            max_inclusive: bool_field(payload, KEY_MAX_INCLUSIVE)?,
        }),
        KEY_MATCH => string_payload(payload).map(Filter::Match),
        KEY_REPLACE => Ok(Filter::Substitute {
            pattern: string_field(payload, KEY_PATTERN)?,
            replacement: string_field(payload, KEY_REPLACEMENT)?,
            all: bool_field(payload, KEY_REPLACE_ALL)?,
        }),
        _ => unreachable!("key comes from SCAN_ORDER"),
    }
}

fn children_to_filters(payload: &Value, depth: usize) -> Result<Vec<Filter>, FilterError> {
    let Some(children) = payload.as_array() else {
        return Err(FilterError::InvalidFilter(payload.to_string()));
    };
    if children.is_empty() {
        return Err(FilterError::InvalidFilter(payload.to_string()));
    }
    children
        .iter()
        .map(|child| node_to_filter(child, depth + 1))
        .collect()
}

fn string_payload(payload: &Value) -> Result<String, FilterError> {
    payload
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FilterError::InvalidFilter(payload.to_string()))
}

fn string_field(payload: &Value, key: &str) -> Result<String, FilterError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| FilterError::InvalidFilter(payload.to_string()))
}

/// Missing boolean fields default to false (an absent bound marker is
/// exclusive, an absent replace-all is first-occurrence)
fn bool_field(payload: &Value, key: &str) -> Result<bool, FilterError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(FilterError::InvalidFilter(other.to_string())),
    }
}

impl Filter {
    /// Render this filter in the structured attribute form
    pub fn to_model(&self) -> Value {
        match self {
            Filter::Accept => json!({ KEY_ACCEPT: true }),
            Filter::Deny => json!({ KEY_DENY: true }),
            Filter::Not(inner) => json!({ KEY_NOT: inner.to_model() }),
            Filter::All(children) => {
                json!({ KEY_ALL: children.iter().map(Filter::to_model).collect::<Vec<_>>() })
            }
            Filter::Any(children) => {
                json!({ KEY_ANY: children.iter().map(Filter::to_model).collect::<Vec<_>>() })
            }
            Filter::LevelChange(level) => json!({ KEY_CHANGE_LEVEL: level }),
            Filter::Levels(level) => json!({ KEY_LEVEL: level }),
            Filter::LevelRange {
                min,
                min_inclusive,
                max,
                max_inclusive,
            } => json!({
                KEY_LEVEL_RANGE: {
                    KEY_MIN_LEVEL: min,
                    KEY_MIN_INCLUSIVE: min_inclusive,
                    KEY_MAX_LEVEL: max,
                    KEY_MAX_INCLUSIVE: max_inclusive,
                }
            }),
            Filter::Match(pattern) => json!({ KEY_MATCH: pattern }),
            Filter::Substitute {
                pattern,
                replacement,
                all,
            } => json!({
                KEY_REPLACE: {
                    KEY_PATTERN: pattern,
                    KEY_REPLACEMENT: replacement,
                    KEY_REPLACE_ALL: all,
                }
            }),
        }
    }
}
