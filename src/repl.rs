//! Reading submissions for the interactive driver
//!
//! A submission is one line, or in multi-line mode every line up to and
//! including one that ends with `!` (the `!` itself is dropped). Lines that
//! start with `:` are commands rather than programs.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::Dialect;
use crate::ast::Stm;
use crate::error::ImpError;
use crate::interpreter::{ControlOutcome, Interpreter, StepObserver};

pub const PROMPT: &str = ">> ";
const TERMINATOR: char = '!';

/// What the user typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Program(String),
    /// `:load f1 f2 …` or `:l f1 f2 …`
    Load(Vec<PathBuf>),
    /// `:load` without any file
    LoadNothing,
    UnknownCommand(String),
}

impl Input {
    pub fn classify(submission: &str) -> Self {
        let Some(command) = submission.trim_start().strip_prefix(':') else {
            return Input::Program(submission.to_string());
        };

        let mut words = command.split_whitespace();
        match words.next() {
            Some("l" | "load") => {
                let files = words.map(PathBuf::from).collect::<Vec<_>>();
                if files.is_empty() {
                    Input::LoadNothing
                } else {
                    Input::Load(files)
                }
            }
            other => Input::UnknownCommand(format!(":{}", other.unwrap_or_default())),
        }
    }
}

/// Read the next submission, writing a prompt before every line.
/// Returns `None` at the end of the input.
pub fn read_submission<R: BufRead, W: Write>(
    input: &mut R,
    prompt: &mut W,
    multiline: bool,
) -> io::Result<Option<String>> {
    let mut submission = String::new();

    loop {
        write!(prompt, "{PROMPT}")?;
        prompt.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // an unfinished multi-line submission is dropped
            return Ok(None);
        }
        let line = line.trim_end_matches(['\n', '\r']);

        if !multiline {
            return Ok(Some(line.to_string()));
        }

        if !submission.is_empty() {
            submission.push('\n');
        }
        submission.push_str(line);

        if let Some(complete) = submission.strip_suffix(TERMINATOR) {
            return Ok(Some(complete.to_string()));
        }
    }
}

/// The state that lives across submissions: one interpreter and the
/// dialect submissions are parsed in.
pub struct Session<W: Write> {
    interpreter: Interpreter<W>,
    dialect: Dialect,
}

impl<W: Write> Session<W> {
    pub fn new(interpreter: Interpreter<W>, dialect: Dialect) -> Self {
        Self {
            interpreter,
            dialect,
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn into_interpreter(self) -> Interpreter<W> {
        self.interpreter
    }

    /// Parse `source`; blank submissions yield `None`
    pub fn prepare(&self, source: &str) -> Result<Option<Stm>, ImpError> {
        if source.trim().is_empty() {
            return Ok(None);
        }
        crate::parse_source(source, self.dialect).map(Some)
    }

    /// Parse and run `source` under `observer`
    pub fn submit(
        &mut self,
        source: &str,
        observer: &mut dyn StepObserver,
    ) -> Result<ControlOutcome, ImpError> {
        match self.prepare(source)? {
            Some(program) => Ok(self.interpreter.run_observed(&program, observer)?),
            None => Ok(ControlOutcome::Normal),
        }
    }
}
