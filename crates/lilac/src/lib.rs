//! Lilac interpreter: ties the lexer, parser and evaluator together.
//!
//! ```text
//! source → Lexer → Parser → Evaluator → Object
//! ```
//!
//! [`Session`] keeps a global environment across lines and implements the
//! three REPL modes; [`LineOutput`] is its machine-readable result.

mod report;
mod session;

pub use lilac_eval::{CaptureMode, EvalOptions, Object};
pub use report::{parse_error_report, MONKEY_EEK};
pub use session::{lex_line, parse_line, LineOutput, Mode, Session};

/// Evaluate `source` in a fresh session and return what the REPL would print.
pub fn eval_str(source: &str) -> String {
    Session::default().run(Mode::Eval, source)
}
