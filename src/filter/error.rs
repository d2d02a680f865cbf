use thiserror::Error;

/// Errors that can occur when parsing, compiling, or converting filters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unexpected end of filter expression")]
    UnexpectedEndOfInput,

    #[error("Truncated filter expression: string literal has no closing quote")]
    TruncatedExpression,

    #[error("Invalid escape sequence '\\{0}' in string literal")]
    InvalidEscape(char),

    #[error("Expected an identifier")]
    ExpectedIdentifier,

    #[error("Expected a quoted string")]
    ExpectedString,

    #[error("Expected {0}")]
    ExpectedToken(String),

    #[error("No filter named '{0}'")]
    UnknownFilterKeyword(String),

    #[error("Invalid filter node: {0}")]
    InvalidFilter(String),

    #[error("Ambiguous filter node: both '{0}' and '{1}' are set")]
    AmbiguousFilter(String, String),

    #[error("Filter nesting exceeds {} levels", super::MAX_DEPTH)]
    NestingTooDeep,
}
