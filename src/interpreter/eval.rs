use std::io::{self, Write};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::{AExp, ArithOp, Assign, Atom, BExp, BoolOp, Ident, If, ProcCall, RelOp, Stm, Var, While};

use super::error::RuntimeError;
use super::observer::{Acknowledgment, Guard, Node, StepObserver};
use super::value::{ControlOutcome, Value};
use super::{Interpreter, UndefinedVariables};

/// Why a walk stopped before producing an outcome
pub(super) enum Halt {
    /// The observer asked to stop
    Cancelled,
    Failed(RuntimeError),
}

impl From<RuntimeError> for Halt {
    fn from(err: RuntimeError) -> Self {
        Halt::Failed(err)
    }
}

impl From<io::Error> for Halt {
    fn from(err: io::Error) -> Self {
        Halt::Failed(RuntimeError::Output(err))
    }
}

type Step<T> = Result<T, Halt>;

fn acknowledge(ack: Acknowledgment) -> Step<()> {
    match ack {
        Acknowledgment::Continue => Ok(()),
        Acknowledgment::Cancel => Err(Halt::Cancelled),
    }
}

/// Free stack required before a statement is walked
const RED_ZONE: usize = 128 * 1024;
/// Size of each segment allocated once the red zone is reached
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

impl<W: Write> Interpreter<W> {
    /// Statements nest through procedure calls as deep as the program
    /// recurses, so the walk continues on a new stack segment whenever the
    /// current one runs low.
    pub(super) fn eval_stm(
        &mut self,
        stm: &Stm,
        observer: &mut dyn StepObserver,
    ) -> Step<ControlOutcome> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.step(stm, observer))
    }

    fn step(&mut self, stm: &Stm, observer: &mut dyn StepObserver) -> Step<ControlOutcome> {
        acknowledge(observer.before(Node::Statement(stm), &self.environment))?;

        match stm {
            Stm::Skip => Ok(ControlOutcome::Normal),
            Stm::Print => {
                self.print_state()?;
                Ok(ControlOutcome::Normal)
            }
            Stm::Abort => Ok(ControlOutcome::Abort),
            Stm::Break => Ok(ControlOutcome::BreakLoop),
            Stm::Assign(Assign { name, value }) => {
                let value = self.eval_aexp(value, observer)?;
                self.environment.set(&name.value, value);
                acknowledge(observer.assigned(name, value))?;
                Ok(ControlOutcome::Normal)
            }
            Stm::If(If {
                condition,
                taken,
                not_taken,
            }) => {
                if self.eval_condition(condition, Guard::If, observer)? {
                    self.eval_stm(taken, observer)
                } else {
                    self.eval_stm(not_taken, observer)
                }
            }
            Stm::While(While { condition, body }) => {
                while self.eval_condition(condition, Guard::Loop, observer)? {
                    match self.eval_stm(body, observer)? {
                        ControlOutcome::Normal => {}
                        ControlOutcome::BreakLoop => break,
                        ControlOutcome::Abort => return Ok(ControlOutcome::Abort),
                    }
                }
                Ok(ControlOutcome::Normal)
            }
            Stm::Var(var) => self.eval_var(var, observer),
            Stm::Seq(stms) => {
                for stm in stms {
                    match self.eval_stm(stm, observer)? {
                        ControlOutcome::Normal => {}
                        outcome => return Ok(outcome),
                    }
                }
                Ok(ControlOutcome::Normal)
            }
            Stm::Nondet(branches) => {
                if branches.is_empty() {
                    return Ok(ControlOutcome::Normal);
                }
                let picked = self.choices.choose(branches.len());
                debug!("nondeterministic choice took branch {picked} of {}", branches.len());
                match branches.get(picked) {
                    Some(branch) => self.eval_stm(branch, observer),
                    None => Ok(ControlOutcome::Normal),
                }
            }
            Stm::ProcDef(def) => {
                debug!("defining procedure {}", def.name);
                self.procedures
                    .insert(def.name.value.clone(), Rc::new(def.clone()));
                Ok(ControlOutcome::Normal)
            }
            Stm::ProcCall(call) => self.eval_call(call, observer),
            Stm::Arithmetic(aexp) => {
                let value = self.eval_aexp(aexp, observer)?;
                self.write_result(Value::Integer(value))?;
                Ok(ControlOutcome::Normal)
            }
            Stm::Boolean(bexp) => {
                let value = self.eval_bexp(bexp, observer)?;
                self.write_result(Value::Boolean(value))?;
                Ok(ControlOutcome::Normal)
            }
        }
    }

    fn eval_condition(
        &mut self,
        condition: &BExp,
        guard: Guard,
        observer: &mut dyn StepObserver,
    ) -> Step<bool> {
        acknowledge(observer.before(Node::Condition(guard, condition), &self.environment))?;
        let value = self.eval_bexp(condition, observer)?;
        acknowledge(observer.decided(guard, value))?;
        Ok(value)
    }

    /// The declared name is bound only for the body; whatever it was bound
    /// to before comes back on every way out of the block.
    fn eval_var(&mut self, var: &Var, observer: &mut dyn StepObserver) -> Step<ControlOutcome> {
        let init = self.eval_aexp(&var.init, observer)?;
        let previous = self.environment.set(&var.name.value, init);
        let outcome = self.eval_stm(&var.body, observer);
        self.environment.restore(&var.name.value, previous);
        outcome
    }

    /// Run a procedure body against a copy of the caller's environment.
    ///
    /// Only the named outputs travel back; every other change the body makes
    /// is dropped when the copy is.
    fn eval_call(&mut self, call: &ProcCall, observer: &mut dyn StepObserver) -> Step<ControlOutcome> {
        let name = &call.name;
        let Some(def) = self.procedures.get(&name.value).cloned() else {
            return Err(RuntimeError::ProcedureUndefined {
                name: name.value.clone(),
                position: name.position.clone(),
            }
            .into());
        };

        if def.inputs.len() != call.inputs.len() || def.outputs.len() != call.outputs.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.value.clone(),
                expected: (def.inputs.len(), def.outputs.len()),
                found: (call.inputs.len(), call.outputs.len()),
                position: name.position.clone(),
            }
            .into());
        }

        if let Some(limit) = self.config.max_call_depth
            && self.depth >= limit
        {
            return Err(RuntimeError::RecursionLimit {
                name: name.value.clone(),
                limit,
                position: name.position.clone(),
            }
            .into());
        }

        let arguments = call
            .inputs
            .iter()
            .map(|arg| self.eval_aexp(arg, observer))
            .collect::<Step<Vec<_>>>()?;

        trace!("calling {} with {arguments:?} at depth {}", name, self.depth);

        let caller = self.environment.clone();
        for (param, value) in def.inputs.iter().zip(arguments) {
            self.environment.set(&param.value, value);
        }

        self.depth += 1;
        let outcome = self.eval_stm(&def.body, observer);
        self.depth -= 1;

        let callee = std::mem::replace(&mut self.environment, caller);
        if outcome.is_ok() {
            for (param, target) in def.outputs.iter().zip(&call.outputs) {
                self.environment
                    .set(&target.value, callee.get(&param.value).unwrap_or(0));
            }
        }

        outcome
    }

    pub(super) fn eval_aexp(&mut self, aexp: &AExp, observer: &mut dyn StepObserver) -> Step<i64> {
        acknowledge(observer.before(Node::Arithmetic(aexp), &self.environment))?;

        match aexp {
            AExp::Atom(Atom::Variable(ident)) => Ok(self.read(ident)?),
            AExp::Atom(Atom::Numeral(numeral)) => numeral.lexeme.parse::<i64>().map_err(|_| {
                RuntimeError::MalformedNumeral {
                    lexeme: numeral.lexeme.clone(),
                    position: numeral.position.clone(),
                }
                .into()
            }),
            AExp::Binary { left, op, right } => {
                let left = self.eval_aexp(left, observer)?;
                let right = self.eval_aexp(right, observer)?;
                Ok(match op {
                    ArithOp::Add => left.wrapping_add(right),
                    ArithOp::Sub => left.wrapping_sub(right),
                    ArithOp::Mul => left.wrapping_mul(right),
                })
            }
        }
    }

    /// Both operands of a binary boolean are always evaluated; expressions
    /// have no side effects, but a runtime condition on the right still
    /// surfaces.
    pub(super) fn eval_bexp(&mut self, bexp: &BExp, observer: &mut dyn StepObserver) -> Step<bool> {
        acknowledge(observer.before(Node::Boolean(bexp), &self.environment))?;

        match bexp {
            BExp::Literal(value) => Ok(*value),
            BExp::Not(inner) => Ok(!self.eval_bexp(inner, observer)?),
            BExp::Binary { left, op, right } => {
                let left = self.eval_bexp(left, observer)?;
                let right = self.eval_bexp(right, observer)?;
                Ok(match op {
                    BoolOp::And => left && right,
                    BoolOp::Or => left || right,
                })
            }
            BExp::Comparison { left, op, right } => {
                let left = self.eval_aexp(left, observer)?;
                let right = self.eval_aexp(right, observer)?;
                Ok(match op {
                    RelOp::Eq => left == right,
                    RelOp::NotEq => left != right,
                    RelOp::Lt => left < right,
                    RelOp::LtEq => left <= right,
                    RelOp::Gt => left > right,
                    RelOp::GtEq => left >= right,
                })
            }
        }
    }

    fn read(&self, ident: &Ident) -> Result<i64, RuntimeError> {
        match (self.environment.get(&ident.value), self.config.undefined) {
            (Some(value), _) => Ok(value),
            (None, UndefinedVariables::ReadAsZero) => Ok(0),
            (None, UndefinedVariables::Reject) => Err(RuntimeError::UndefinedVariable {
                name: ident.value.clone(),
                position: ident.position.clone(),
            }),
        }
    }

    fn print_state(&mut self) -> io::Result<()> {
        writeln!(self.output, "Program State")?;
        for (name, value) in self.environment.sorted() {
            writeln!(self.output, "  {name} -> {value}")?;
        }
        Ok(())
    }

    fn write_result(&mut self, value: Value) -> io::Result<()> {
        writeln!(self.output, "==> {value}")
    }
}
