use super::error::FilterError;

/// The smallest lexical unit of a filter spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An identifier run (filter keyword or level name)
    Ident(String),
    /// The contents of a double-quoted string literal, escapes resolved
    Str(String),
    /// Any other single code point (`(`, `)`, `,`, `[`, `]`, ...)
    Punct(char),
}

impl Token {
    /// Human-readable rendering used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Str(text) => format!("\"{text}\""),
            Token::Punct(c) => c.to_string(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Split a filter spec into tokens
///
/// Whitespace separates tokens but is never emitted. Identifier runs and
/// quoted strings become single tokens; every other code point becomes a
/// one-character punctuation token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        if is_ident_start(c) {
            let mut ident = String::new();
            ident.push(c);
            while let Some(&next) = chars.peek() {
                if !is_ident_part(next) {
                    break;
                }
                ident.push(next);
                chars.next();
            }
            tokens.push(Token::Ident(ident));
        } else if c == '"' {
            let mut literal = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('\\') => literal.push('\\'),
                        Some('\'') => literal.push('\''),
                        Some('"') => literal.push('"'),
                        Some('b') => literal.push('\u{0008}'),
                        Some('f') => literal.push('\u{000C}'),
                        Some('n') => literal.push('\n'),
                        Some('r') => literal.push('\r'),
                        Some('t') => literal.push('\t'),
                        Some(other) => return Err(FilterError::InvalidEscape(other)),
                        None => return Err(FilterError::TruncatedExpression),
                    },
                    Some(other) => literal.push(other),
                    None => return Err(FilterError::TruncatedExpression),
                }
            }
            tokens.push(Token::Str(literal));
        } else {
            tokens.push(Token::Punct(c));
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_identifiers_and_punctuation() {
        let tokens = tokenize("all(accept,deny)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("all".to_string()),
                Token::Punct('('),
                Token::Ident("accept".to_string()),
                Token::Punct(','),
                Token::Ident("deny".to_string()),
                Token::Punct(')'),
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_whitespace() {
        let tokens = tokenize("  not ( accept )  ").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Ident("not".to_string()));
    }

    #[test]
    fn test_tokenize_string_literal_with_escapes() {
        let tokens = tokenize(r#"match("a\\b\n\"c\"")"#).unwrap();
        assert_eq!(tokens[2], Token::Str("a\\b\n\"c\"".to_string()));
    }

    #[test]
    fn test_tokenize_range_brackets() {
        let tokens = tokenize("levelRange[INFO,WARN)").unwrap();
        assert_eq!(tokens[1], Token::Punct('['));
        assert_eq!(tokens[5], Token::Punct(')'));
    }

    #[test]
    fn test_unterminated_string_is_truncated() {
        assert_eq!(
            tokenize(r#"match("abc"#).unwrap_err(),
            FilterError::TruncatedExpression
        );
    }

    #[test]
    fn test_escape_at_end_of_input_is_truncated() {
        assert_eq!(
            tokenize(r#"match("abc\"#).unwrap_err(),
            FilterError::TruncatedExpression
        );
    }

    #[test]
    fn test_unknown_escape_is_rejected() {
        assert_eq!(
            tokenize(r#"match("a\qb")"#).unwrap_err(),
            FilterError::InvalidEscape('q')
        );
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t\n").unwrap().is_empty());
    }
}
