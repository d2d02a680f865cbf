use std::fmt;

/// Tree form of a log filter
///
/// Exactly one case per node; composition happens through `Not`, `All`, and
/// `Any`. The text form of each variant is produced by the [`fmt::Display`]
/// impl and re-parsed by [`super::parse_filter_spec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Pass every record
    Accept,
    /// Drop every record
    Deny,
    /// Invert the wrapped filter
    Not(Box<Filter>),
    /// Pass only when every child passes
    All(Vec<Filter>),
    /// Pass when at least one child passes
    Any(Vec<Filter>),
    /// Rewrite the record level before passing it on
    LevelChange(String),
    /// Pass records at the named level
    Levels(String),
    /// Pass records inside a level interval; each bound is inclusive or
    /// exclusive independently
    LevelRange {
        min: String,
        min_inclusive: bool,
        max: String,
        max_inclusive: bool,
    },
    /// Pass records whose message matches the pattern
    Match(String),
    /// Rewrite the first (`all = false`) or every (`all = true`) occurrence
    /// of the pattern in the record message
    Substitute {
        pattern: String,
        replacement: String,
        all: bool,
    },
}

impl Filter {
    /// Render this filter as its canonical spec string
    pub fn to_spec(&self) -> String {
        self.to_string()
    }
}

/// Quote a string argument for the text form.
///
/// Only literal backslashes are escaped on write; the read side resolves the
/// full escape set.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn write_composite(f: &mut fmt::Formatter<'_>, name: &str, children: &[Filter]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Accept => f.write_str("accept"),
            Filter::Deny => f.write_str("deny"),
            Filter::Not(inner) => write!(f, "not({inner})"),
            Filter::All(children) => write_composite(f, "all", children),
            Filter::Any(children) => write_composite(f, "any", children),
            Filter::LevelChange(level) => write!(f, "levelChange({level})"),
            Filter::Levels(level) => write!(f, "levels({level})"),
            Filter::LevelRange {
                min,
                min_inclusive,
                max,
                max_inclusive,
            } => write!(
                f,
                "levelRange{}{min},{max}{}",
                if *min_inclusive { '[' } else { '(' },
                if *max_inclusive { ']' } else { ')' },
            ),
            Filter::Match(pattern) => write!(f, "match({})", quote(pattern)),
            Filter::Substitute {
                pattern,
                replacement,
                all,
            } => write!(
                f,
                "{}({},{})",
                if *all { "substituteAll" } else { "substitute" },
                quote(pattern),
                quote(replacement),
            ),
        }
    }
}
