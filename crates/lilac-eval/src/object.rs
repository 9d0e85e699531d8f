//! Runtime values.

use crate::builtins::Builtin;
use crate::env::Env;
use lilac_types::ast::{Block, Ident};
use std::fmt;
use std::rc::Rc;

/// A runtime value.
///
/// `Clone` copies nested arrays and hashes, so a value read out of an
/// environment never shares storage with the binding. Functions are the
/// exception: they are shared behind an `Rc` and compared by identity.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    String(String),
    Array(Vec<Object>),
    /// Association list in insertion order. Keys are unique under `==`.
    Hash(Vec<(Object, Object)>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Error(String),
}

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);

impl Object {
    /// The upper-case type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Error(_) => "ERROR",
        }
    }

    /// Only `null` and `false` are falsy. `0` and `""` are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value {
            TRUE
        } else {
            FALSE
        }
    }
}

/// Insert `key → value`, replacing the value of the first equal key.
pub fn hash_put(pairs: &mut Vec<(Object, Object)>, key: Object, value: Object) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some((_, slot)) => *slot = value,
        None => pairs.push((key, value)),
    }
}

/// Order-independent comparison of two association lists; every pair must
/// occur the same number of times on both sides.
fn bag_eq(a: &[(Object, Object)], b: &[(Object, Object)]) -> bool {
    let count = |pairs: &[(Object, Object)], pair: &(Object, Object)| {
        pairs.iter().filter(|p| *p == pair).count()
    };
    a.len() == b.len() && a.iter().all(|pair| count(a, pair) == count(b, pair))
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => bag_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Object]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// `inspect`: the text the REPL prints for a value.
impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{n}"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::Null => f.write_str("null"),
            Object::String(s) => f.write_str(s),
            Object::Array(elements) => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            Object::Hash(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Object::Function(func) => write!(f, "{func}"),
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// A user-defined function: parameters and body copied out of the AST, plus
/// the environment it closes over.
pub struct Function {
    pub params: Vec<Ident>,
    pub body: Block,
    pub env: Env,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.name)?;
        }
        write!(f, ") {{ {} }}", self.body)
    }
}

// The closure environment usually contains this function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        f.debug_struct("Function")
            .field("params", &params)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}
