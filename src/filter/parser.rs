use super::MAX_DEPTH;
use super::error::FilterError;
use super::tokenizer::{Token, tokenize};
use super::tree::Filter;

/// Parse a filter spec into tree form
///
/// Empty input (no tokens after whitespace) is a defined filter absence and
/// yields `Ok(None)`; an empty sub-expression inside `not(...)`, `all(...)`,
/// or `any(...)` is an error. Trailing tokens after a complete expression are
/// rejected.
pub fn parse_filter_spec(spec: &str) -> Result<Option<Filter>, FilterError> {
    let tokens = tokenize(spec)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut cursor = Cursor::new(tokens);
    let filter = parse_filter(&mut cursor, 0)?;
    if cursor.peek().is_some() {
        return Err(FilterError::ExpectedToken("end of input".to_string()));
    }
    Ok(Some(filter))
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }
}

fn parse_filter(cursor: &mut Cursor, depth: usize) -> Result<Filter, FilterError> {
    if depth > MAX_DEPTH {
        return Err(FilterError::NestingTooDeep);
    }

    let keyword = match cursor.next() {
        None | Some(Token::Punct(')')) => return Err(FilterError::UnexpectedEndOfInput),
        Some(Token::Ident(name)) => name,
        Some(other) => return Err(FilterError::UnknownFilterKeyword(other.describe())),
    };

    match keyword.as_str() {
        "accept" => Ok(Filter::Accept),
        "deny" => Ok(Filter::Deny),
        "not" => {
            expect_punct(cursor, '(')?;
            let inner = parse_filter(cursor, depth + 1)?;
            expect_punct(cursor, ')')?;
            Ok(Filter::Not(Box::new(inner)))
        }
        "all" => parse_children(cursor, depth).map(Filter::All),
        "any" => parse_children(cursor, depth).map(Filter::Any),
        "levelChange" => {
            expect_punct(cursor, '(')?;
            let level = expect_ident(cursor)?;
            expect_punct(cursor, ')')?;
            Ok(Filter::LevelChange(level))
        }
        "levels" => {
            expect_punct(cursor, '(')?;
            let mut levels: Vec<String> = Vec::new();
            loop {
                let level = expect_ident(cursor)?;
                if !levels.contains(&level) {
                    levels.push(level);
                }
                if expect_either(cursor, ',', ')')? == ')' {
                    break;
                }
            }
            // The tree form only carries one level; the first in input order
            // wins and the rest are dropped.
            Ok(Filter::Levels(levels.swap_remove(0)))
        }
        "levelRange" => {
            let min_inclusive = expect_boundary(cursor, '[', '(')?;
            let min = expect_ident(cursor)?;
            expect_punct(cursor, ',')?;
            let max = expect_ident(cursor)?;
            let max_inclusive = expect_boundary(cursor, ']', ')')?;
            Ok(Filter::LevelRange {
                min,
                min_inclusive,
                max,
                max_inclusive,
            })
        }
        "match" => {
            expect_punct(cursor, '(')?;
            let pattern = expect_string(cursor)?;
            expect_punct(cursor, ')')?;
            Ok(Filter::Match(pattern))
        }
        "substitute" | "substituteAll" => {
            let all = keyword == "substituteAll";
            expect_punct(cursor, '(')?;
            let pattern = expect_string(cursor)?;
            expect_punct(cursor, ',')?;
            let replacement = expect_string(cursor)?;
            expect_punct(cursor, ')')?;
            Ok(Filter::Substitute {
                pattern,
                replacement,
                all,
            })
        }
        _ => Err(FilterError::UnknownFilterKeyword(keyword)),
    }
}

fn parse_children(cursor: &mut Cursor, depth: usize) -> Result<Vec<Filter>, FilterError> {
    expect_punct(cursor, '(')?;
    let mut children = Vec::new();
    loop {
        children.push(parse_filter(cursor, depth + 1)?);
        if expect_either(cursor, ',', ')')? == ')' {
            break;
        }
    }
    Ok(children)
}

fn expect_punct(cursor: &mut Cursor, expected: char) -> Result<(), FilterError> {
    match cursor.next() {
        Some(Token::Punct(c)) if c == expected => Ok(()),
        Some(_) => Err(FilterError::ExpectedToken(format!("'{expected}'"))),
        None => Err(FilterError::UnexpectedEndOfInput),
    }
}

/// Consume one of two punctuation tokens and report which matched
fn expect_either(cursor: &mut Cursor, a: char, b: char) -> Result<char, FilterError> {
    match cursor.next() {
        Some(Token::Punct(c)) if c == a || c == b => Ok(c),
        Some(_) => Err(FilterError::ExpectedToken(format!("'{a}' or '{b}'"))),
        None => Err(FilterError::UnexpectedEndOfInput),
    }
}

/// Consume a range boundary; `true` for the inclusive bracket
fn expect_boundary(cursor: &mut Cursor, inclusive: char, exclusive: char) -> Result<bool, FilterError> {
    expect_either(cursor, inclusive, exclusive).map(|c| c == inclusive)
}

fn expect_ident(cursor: &mut Cursor) -> Result<String, FilterError> {
    match cursor.next() {
        Some(Token::Ident(name)) => Ok(name),
        _ => Err(FilterError::ExpectedIdentifier),
    }
}

fn expect_string(cursor: &mut Cursor) -> Result<String, FilterError> {
    match cursor.next() {
        Some(Token::Str(text)) => Ok(text),
        Some(_) => Err(FilterError::ExpectedString),
        None => Err(FilterError::UnexpectedEndOfInput),
    }
}
