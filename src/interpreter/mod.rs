//! # Evaluation
//!
//! One tree walk evaluates every program. It is parameterised by a
//! [`StepObserver`]: [`Interpreter::run`] passes the [`Silent`] observer,
//! the step debugger passes a [`Debugger`].
//!
//! The interpreter keeps its environment and procedure table between runs,
//! so a REPL can feed it one submission after another.

mod choice;
mod debugger;
mod error;
mod eval;
mod observer;
mod scope;
mod value;

pub use choice::{ChoiceSource, Entropy, Scripted};
pub use debugger::Debugger;
pub use error::RuntimeError;
pub use observer::{Acknowledgment, Guard, Node, Silent, StepObserver};
pub use scope::Environment;
pub use value::{ControlOutcome, Value};

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use tracing::debug;

use crate::Dialect;
use crate::ast::{ProcDef, Stm};

use eval::Halt;

/// What reading a variable that has no binding does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedVariables {
    /// Raise [`RuntimeError::UndefinedVariable`]
    Reject,
    /// Read the variable as 0
    ReadAsZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub undefined: UndefinedVariables,
    /// Deepest allowed nesting of procedure calls; `None` means unbounded.
    /// The walk moves to fresh stack segments as it deepens, so only memory
    /// bounds an unlimited run.
    pub max_call_depth: Option<usize>,
}

impl EvalConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

    pub fn for_dialect(dialect: Dialect) -> Self {
        let undefined = match dialect {
            Dialect::Core => UndefinedVariables::Reject,
            Dialect::Extended => UndefinedVariables::ReadAsZero,
        };

        Self {
            undefined,
            max_call_depth: Some(Self::DEFAULT_MAX_CALL_DEPTH),
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}

pub struct Interpreter<W: Write> {
    environment: Environment,
    procedures: HashMap<String, Rc<ProcDef>>,
    config: EvalConfig,
    choices: Box<dyn ChoiceSource>,
    output: W,
    depth: usize,
}

impl<W: Write> Interpreter<W> {
    /// An interpreter with an empty state writing program output to `output`
    pub fn new(output: W) -> Self {
        Self {
            environment: Environment::new(),
            procedures: HashMap::new(),
            config: EvalConfig::default(),
            choices: Box::new(Entropy::from_entropy()),
            output,
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_choices(mut self, choices: impl ChoiceSource + 'static) -> Self {
        self.choices = Box::new(choices);
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn procedure(&self, name: &str) -> Option<&ProcDef> {
        self.procedures.get(name).map(|def| def.as_ref())
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluate `program` without observation
    pub fn run(&mut self, program: &Stm) -> Result<ControlOutcome, RuntimeError> {
        self.run_observed(program, &mut Silent)
    }

    /// Evaluate `program`, reporting every step to `observer`.
    ///
    /// A cancelled run ends like an aborted one: `Ok(ControlOutcome::Abort)`.
    pub fn run_observed(
        &mut self,
        program: &Stm,
        observer: &mut dyn StepObserver,
    ) -> Result<ControlOutcome, RuntimeError> {
        self.depth = 0;
        let result = self.eval_stm(program, observer);
        self.output.flush()?;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(Halt::Cancelled) => {
                debug!("run cancelled by its observer");
                Ok(ControlOutcome::Abort)
            }
            Err(Halt::Failed(err)) => Err(err),
        }
    }
}
