//! Runtime error types for the Lilac evaluator.
//!
//! The `Display` text of each variant is the message a user sees after
//! `ERROR: `, so the wording here is part of the language's behavior.

use crate::object::Object;

/// Evaluation error. Every variant except [`EvalError::Return`] becomes an
/// [`Object::Error`] at the program boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvalError {
    /// `-x` on a non-integer.
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator {
        op: &'static str,
        operand: &'static str,
    },
    /// A binary operator the operand types don't support.
    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        op: &'static str,
        right: &'static str,
    },
    /// Binary operator applied to two different types.
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: &'static str,
        op: &'static str,
        right: &'static str,
    },
    /// Unbound name that is not a builtin either.
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    /// Calling something that is neither a function nor a builtin.
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    /// Indexing anything other than an array by an integer.
    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),
    /// Arity mismatch for a builtin or a user function.
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    /// `len` of something without a length.
    #[error("argument to `{builtin}` not supported, got {got}")]
    UnsupportedArgument {
        builtin: &'static str,
        got: &'static str,
    },
    /// A builtin that requires a specific argument type.
    #[error("argument to `{builtin}` must be {expected}, got {got}")]
    ArgumentType {
        builtin: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    /// Integer division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Call nesting went past `EvalOptions::max_call_depth`.
    #[error("stack overflow: maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    /// `return` statement (used internally for control flow)
    #[error("return")]
    Return(Object),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
