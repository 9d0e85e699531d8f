//! Native functions available in every program.

use crate::error::{EvalError, EvalResult};
use crate::object::Object;

/// A native function. Looked up by name only after the environment chain
/// comes up empty, so a user binding shadows a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
}

impl Builtin {
    /// Every builtin, in registry order.
    pub const ALL: [Builtin; 5] = [
        Builtin::Len,
        Builtin::First,
        Builtin::Last,
        Builtin::Rest,
        Builtin::Push,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Rest => "rest",
            Builtin::Push => "push",
        }
    }

    /// Find a builtin by its source name.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Apply the builtin to already-evaluated arguments.
    pub fn call(self, args: Vec<Object>) -> EvalResult<Object> {
        match self {
            Builtin::Len => {
                let [arg] = arity(args)?;
                match arg {
                    Object::String(s) => Ok(Object::Integer(s.chars().count() as i64)),
                    Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
                    other => Err(EvalError::UnsupportedArgument {
                        builtin: "len",
                        got: other.type_name(),
                    }),
                }
            }
            Builtin::First => {
                let [arg] = arity(args)?;
                let elements = self.expect_array(arg)?;
                Ok(elements.into_iter().next().unwrap_or(Object::Null))
            }
            Builtin::Last => {
                let [arg] = arity(args)?;
                let elements = self.expect_array(arg)?;
                Ok(elements.into_iter().next_back().unwrap_or(Object::Null))
            }
            Builtin::Rest => {
                let [arg] = arity(args)?;
                let elements = self.expect_array(arg)?;
                if elements.is_empty() {
                    return Ok(Object::Null);
                }
                Ok(Object::Array(elements.into_iter().skip(1).collect()))
            }
            Builtin::Push => {
                let [array, value] = arity(args)?;
                let mut elements = self.expect_array(array)?;
                elements.push(value);
                Ok(Object::Array(elements))
            }
        }
    }

    fn expect_array(self, arg: Object) -> EvalResult<Vec<Object>> {
        match arg {
            Object::Array(elements) => Ok(elements),
            other => Err(EvalError::ArgumentType {
                builtin: self.name(),
                expected: "ARRAY",
                got: other.type_name(),
            }),
        }
    }
}

/// Check the argument count and unpack the arguments.
fn arity<const N: usize>(args: Vec<Object>) -> EvalResult<[Object; N]> {
    let got = args.len();
    args.try_into()
        .map_err(|_| EvalError::WrongArgumentCount { got, want: N })
}
