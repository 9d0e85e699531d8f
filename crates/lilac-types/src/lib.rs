//! Shared types for the Lilac interpreter.
//!
//! This crate defines the AST node types, source spans, parse errors and
//! the stack-growth helper used by every recursive pipeline stage.

mod error;
mod span;
mod stack;
pub mod ast;

pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
