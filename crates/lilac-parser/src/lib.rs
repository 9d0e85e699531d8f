//! Lilac parser: converts a token stream into an AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parse_expr::{Precedence, MAX_NESTING_DEPTH};
pub use parser::{parse, ParseResult, Parser};
