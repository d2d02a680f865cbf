//! Filter-expression parsing and serialization
//!
//! A log filter has three interchangeable representations: a typed tree
//! ([`Filter`]), a structured attribute node (`serde_json::Value`, the form
//! carried by management requests), and a compact single-line filter spec.
//! This module converts between all three.
//!
//! # Syntax
//!
//! ```text
//! filter      := 'accept' | 'deny' | not | all | any | levelChange
//!              | levels | levelRange | match | substitute
//! not         := 'not' '(' filter ')'
//! all         := 'all' '(' filter (',' filter)* ')'
//! any         := 'any' '(' filter (',' filter)* ')'
//! levelChange := 'levelChange' '(' IDENT ')'
//! levels      := 'levels' '(' IDENT (',' IDENT)* ')'
//! levelRange  := 'levelRange' ('['|'(') IDENT ',' IDENT (']'|')')
//! match       := 'match' '(' STRING ')'
//! substitute  := ('substitute'|'substituteAll') '(' STRING ',' STRING ')'
//! ```
//!
//! Square brackets on `levelRange` mark an inclusive bound, parentheses an
//! exclusive one.
//!
//! # Examples
//!
//! ```text
//! accept                                  # pass every record
//! levels(INFO,WARN)                       # pass listed levels (first wins)
//! levelRange[INFO,ERROR)                  # INFO inclusive to ERROR exclusive
//! all(match("core"),not(levels(DEBUG)))   # composition
//! substituteAll("\\d+","<n>")             # rewrite the record message
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod tokenizer;
pub mod tree;

pub use error::FilterError;
pub use model::{filter_from_model, model_to_spec};
pub use parser::parse_filter_spec;
pub use tokenizer::{Token, tokenize};
pub use tree::Filter;

/// Maximum nesting depth accepted when parsing or converting filters.
///
/// `not`/`all`/`any` nest without bound in the grammar; the cap turns an
/// adversarial input into a typed error instead of a stack overflow.
pub const MAX_DEPTH: usize = 64;
