//! Lilac interpreter as a WASM module for browser environments.
//!
//! This crate exposes a REPL session via `wasm-bindgen`, suitable for
//! running in a browser Web Worker. The module holds one session; bindings
//! made by one `eval_line` call are visible to the next.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { eval_line, reset } from 'lilac-wasm';
//!
//! await init();
//!
//! eval_line("let double = fn(x) { x * 2 };");
//! const result = JSON.parse(eval_line("double(21)"));
//! // { success: true, output: "42", value_type: "INTEGER", errors: { errors: [] } }
//! ```

use std::cell::RefCell;

use lilac::Session;
use wasm_bindgen::prelude::*;

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

/// Evaluate one line in the module's session.
///
/// Returns a JSON string containing a `LineOutput`:
/// ```json
/// {
///   "success": true,
///   "output": "42",
///   "value_type": "INTEGER",
///   "errors": { "errors": [] }
/// }
/// ```
///
/// When the line fails to parse, `success` is `false`, `value_type` is
/// `null`, `output` holds the printed error report and `errors` lists each
/// parse error with its location.
#[wasm_bindgen]
pub fn eval_line(source: &str) -> String {
    SESSION.with(|session| session.borrow_mut().eval_json(source))
}

/// Tokenize a line and return the lexer-mode listing.
#[wasm_bindgen]
pub fn lex(source: &str) -> String {
    lilac::lex_line(source)
}

/// Parse a line and return its canonical rendering or the error report.
#[wasm_bindgen]
pub fn parse(source: &str) -> String {
    lilac::parse_line(source)
}

/// Drop every binding in the module's session.
#[wasm_bindgen]
pub fn reset() {
    SESSION.with(|session| session.borrow_mut().reset());
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
