//! Lilac tree-walking evaluator.
//!
//! Evaluates a parsed [`Program`](lilac_types::ast::Program) against a
//! chain of environments and produces an [`Object`]. Runtime errors and
//! `return` unwind through [`EvalError`]; the program boundary turns them
//! back into ordinary values.

mod builtins;
mod env;
mod error;
mod evaluator;
mod object;

pub use builtins::Builtin;
pub use env::{Env, Environment};
pub use error::{EvalError, EvalResult};
pub use evaluator::{CaptureMode, EvalOptions, Evaluator};
pub use object::{hash_put, Function, Object, FALSE, TRUE};
