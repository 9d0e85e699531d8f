//! REPL sessions: one global environment shared by every line.

use lilac_eval::{Env, Environment, EvalOptions, Evaluator, Object};
use lilac_lexer::Lexer;
use lilac_parser::{parse, ParseResult};
use lilac_types::ast::Stmt;
use lilac_types::ParseErrors;
use serde::{Deserialize, Serialize};

use crate::report::parse_error_report;

/// What the REPL does with each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Print every token.
    Lexer,
    /// Print the canonical rendering of the parsed program.
    Parser,
    /// Evaluate and print the result.
    #[default]
    Eval,
}

impl Mode {
    pub fn prompt(&self) -> &'static str {
        match self {
            Mode::Lexer => "LILAC-LEXER> ",
            Mode::Parser => "LILAC-PARSER> ",
            Mode::Eval => "LILAC> ",
        }
    }
}

/// Machine-readable result of evaluating one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOutput {
    /// `false` when the line failed to parse or evaluated to an error.
    pub success: bool,
    /// Exactly what the REPL would print.
    pub output: String,
    /// Type name of the result, absent when nothing was evaluated.
    pub value_type: Option<String>,
    pub errors: ParseErrors,
}

/// Lexer mode: one `token! type: <KIND> lit: <literal>` line per token.
pub fn lex_line(source: &str) -> String {
    Lexer::new(source)
        .map(|token| format!("token! type: {} lit: {}\n", token.kind, token.literal))
        .collect()
}

/// Parser mode: the canonical rendering, or the parse-error report.
pub fn parse_line(source: &str) -> String {
    let result = parse(source);
    if result.has_errors() {
        return parse_error_report(&result.errors);
    }
    result.program.to_string()
}

/// A failed `LineOutput` carrying `message`, for when serializing the real one fails.
fn serialization_failure(message: &str) -> String {
    serde_json::json!({
        "success": false,
        "output": format!("serialization error: {message}"),
        "value_type": null,
        "errors": { "errors": [] }
    })
    .to_string()
}

/// An interactive session. Bindings made by one line are visible to the next.
#[derive(Debug)]
pub struct Session {
    env: Env,
    evaluator: Evaluator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EvalOptions::default())
    }
}

impl Session {
    pub fn new(options: EvalOptions) -> Self {
        Self {
            env: Environment::new().into_shared(),
            evaluator: Evaluator::new(options),
        }
    }

    /// The session's global environment.
    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn options(&self) -> &EvalOptions {
        self.evaluator.options()
    }

    /// Drop every binding, keeping the options.
    pub fn reset(&mut self) {
        // Top-level functions close over the global frame.
        self.env.borrow_mut().clear();
        self.env = Environment::new().into_shared();
    }

    /// Process one line in `mode` and return the text to print.
    pub fn run(&mut self, mode: Mode, line: &str) -> String {
        match mode {
            Mode::Lexer => lex_line(line),
            Mode::Parser => parse_line(line),
            Mode::Eval => self.eval(line).output,
        }
    }

    /// Evaluate one line in the session's environment.
    ///
    /// A line that parses with errors is not evaluated. The output is empty
    /// when the line is empty or ends in a `let`, unless evaluation failed.
    pub fn eval(&mut self, line: &str) -> LineOutput {
        let ParseResult { program, errors } = parse(line);
        if errors.has_errors() {
            tracing::debug!(errors = errors.len(), "line rejected by parser");
            return LineOutput {
                success: false,
                output: parse_error_report(&errors),
                value_type: None,
                errors,
            };
        }

        let value = self.evaluator.eval_program(&program, &self.env);
        tracing::debug!(ty = value.type_name(), "line evaluated");

        let silent = matches!(program.statements.last(), None | Some(Stmt::Let(_)));
        let output = if silent && !value.is_error() {
            String::new()
        } else {
            value.to_string()
        };
        LineOutput {
            success: !value.is_error(),
            output,
            value_type: Some(value.type_name().to_string()),
            errors,
        }
    }

    /// [`Session::eval`] serialized as JSON.
    pub fn eval_json(&mut self, line: &str) -> String {
        let output = self.eval(line);
        serde_json::to_string(&output).unwrap_or_else(|e| serialization_failure(&e.to_string()))
    }

    /// Look up a global binding.
    pub fn get(&self, name: &str) -> Option<Object> {
        self.env.borrow().get(name)
    }
}
