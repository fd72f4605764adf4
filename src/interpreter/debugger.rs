use std::io::{self, BufRead, Write};

use nu_ansi_term::{Color, Style};
use tracing::{debug, warn};

use crate::ast::{Ident, Stm};

use super::observer::{Acknowledgment, Guard, Node, StepObserver};
use super::scope::Environment;

const STEP: &str = "~> ";
const PROMPT: &str = "<press enter for next instruction>";

/// Step debugger.
///
/// Echoes every statement as it is reached and waits for a line on `input`
/// before letting the evaluator go on. Guards of `if` and `while` are shown
/// and acknowledged separately, followed by the value they took. The end of
/// `input` cancels the session.
pub struct Debugger<R, W> {
    input: R,
    output: W,
    colored: bool,
    cancelled: bool,
}

impl<R: BufRead, W: Write> Debugger<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            colored: false,
            cancelled: false,
        }
    }

    /// Highlight guards and dim the prompts with ANSI colors
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Whether the session ended because the acknowledgment source closed
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn dimmed(&self, text: &str) -> String {
        if self.colored {
            Style::new().dimmed().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn highlighted(&self, text: &str) -> String {
        if self.colored {
            Color::Yellow.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn await_enter(&mut self, prompt: bool) -> io::Result<Acknowledgment> {
        if prompt {
            let prompt = self.dimmed(PROMPT);
            write!(self.output, "   {prompt}")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("acknowledgment source closed, cancelling the session");
            self.cancelled = true;
            return Ok(Acknowledgment::Cancel);
        }
        Ok(Acknowledgment::Continue)
    }

    fn show_statement(&mut self, stm: &Stm) -> io::Result<Acknowledgment> {
        match stm {
            Stm::Seq(_) => Ok(Acknowledgment::Continue),
            // blocks wait on their parts; an assignment waits once its value is known
            Stm::If(_)
            | Stm::While(_)
            | Stm::Var(_)
            | Stm::Nondet(_)
            | Stm::Assign(_)
            | Stm::Arithmetic(_)
            | Stm::Boolean(_) => {
                writeln!(self.output, "{STEP}{stm}")?;
                Ok(Acknowledgment::Continue)
            }
            _ => {
                writeln!(self.output, "{STEP}{stm}")?;
                self.await_enter(true)
            }
        }
    }

    fn show_condition(&mut self, condition: String) -> io::Result<Acknowledgment> {
        let condition = self.highlighted(&condition);
        write!(self.output, "{STEP}{condition}")?;
        self.await_enter(false)
    }

    /// A failing terminal ends the session the same way a closed input does
    fn settle(&mut self, step: io::Result<Acknowledgment>) -> Acknowledgment {
        step.unwrap_or_else(|err| {
            warn!("debugger terminal failed: {err}");
            self.cancelled = true;
            Acknowledgment::Cancel
        })
    }
}

impl<R: BufRead, W: Write> StepObserver for Debugger<R, W> {
    fn before(&mut self, node: Node<'_>, _environment: &Environment) -> Acknowledgment {
        if self.cancelled {
            return Acknowledgment::Cancel;
        }

        let step = match node {
            Node::Statement(stm) => self.show_statement(stm),
            Node::Condition(_, condition) => self.show_condition(condition.to_string()),
            Node::Arithmetic(_) | Node::Boolean(_) => Ok(Acknowledgment::Continue),
        };
        self.settle(step)
    }

    fn assigned(&mut self, _name: &Ident, value: i64) -> Acknowledgment {
        let step = writeln!(self.output, "   ==> {value}").and_then(|_| self.await_enter(true));
        self.settle(step)
    }

    fn decided(&mut self, guard: Guard, value: bool) -> Acknowledgment {
        let kind = match guard {
            Guard::If => "if",
            Guard::Loop => "loop",
        };
        let verdict = self.dimmed(&format!("<{kind} condition evaluates to {value}>"));
        let step = writeln!(self.output, "   {verdict}").map(|_| Acknowledgment::Continue);
        self.settle(step)
    }
}
