use std::io::{self, BufRead, IsTerminal, Write};

use clap::{Parser, ValueEnum};
use lilac::{CaptureMode, EvalOptions, Mode, Session};

const MONKEY_FACE: &str = r"                  __
     w  c(..)o   (
      \__(-)    __)
          /\   (
         /(_)___)
         w /|
          | \
         m  m
";

/// Lilac - An interpreter for the Monkey programming language
#[derive(Parser, Debug)]
#[command(name = "lilac", version)]
#[command(about = "Evaluate Monkey programs", long_about = None)]
struct Args {
    /// Print the tokens of each line instead of evaluating it
    #[arg(long, conflicts_with = "parser")]
    lexer: bool,

    /// Print the parsed form of each line instead of evaluating it
    #[arg(long)]
    parser: bool,

    /// Maximum depth of nested function calls
    #[arg(long, default_value_t = EvalOptions::default().max_call_depth)]
    max_call_depth: usize,

    /// How closures capture their defining environment
    #[arg(long, value_enum, default_value_t = Capture::Live)]
    capture: Capture,

    /// Print each evaluated line as a JSON object
    #[arg(long)]
    json: bool,

    /// Program to run once (if not provided, starts the REPL)
    program: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Capture {
    /// Closures see later rebindings in their defining scope
    Live,
    /// Closures copy their defining scope when created
    Snapshot,
}

impl From<Capture> for CaptureMode {
    fn from(capture: Capture) -> Self {
        match capture {
            Capture::Live => CaptureMode::Live,
            Capture::Snapshot => CaptureMode::Snapshot,
        }
    }
}

impl Args {
    fn mode(&self) -> Mode {
        if self.lexer {
            Mode::Lexer
        } else if self.parser {
            Mode::Parser
        } else {
            Mode::Eval
        }
    }
}

fn run_line(session: &mut Session, mode: Mode, json: bool, line: &str) -> String {
    if json && mode == Mode::Eval {
        session.eval_json(line)
    } else {
        session.run(mode, line)
    }
}

fn emit(out: &mut impl Write, output: &str) -> io::Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    if output.ends_with('\n') {
        write!(out, "{output}")
    } else {
        writeln!(out, "{output}")
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // LILAC_LOG controls log level, default WARN
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("LILAC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mode = args.mode();
    let mut session = Session::new(EvalOptions {
        max_call_depth: args.max_call_depth,
        capture: args.capture.into(),
    });
    tracing::debug!(?mode, options = ?session.options(), "session started");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(program) = &args.program {
        let output = run_line(&mut session, mode, args.json, program);
        return emit(&mut out, &output);
    }

    let interactive = io::stdin().is_terminal();
    if interactive {
        write!(out, "{MONKEY_FACE}")?;
        writeln!(
            out,
            "Hello, This is the Monkey programming language - With Lilac Interpreter!."
        )?;
        writeln!(out, "Feel free to type in the commands.")?;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(out, "{}", mode.prompt())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let output = run_line(&mut session, mode, args.json, &line);
        emit(&mut out, &output)?;
    }

    if interactive {
        writeln!(out)?;
    }
    Ok(())
}
