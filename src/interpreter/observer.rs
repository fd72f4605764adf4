use crate::ast::{AExp, BExp, Ident, Stm};

use super::scope::Environment;

/// Which construct a guard belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    If,
    Loop,
}

/// A node the evaluator is about to evaluate
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Stm),
    /// The guard of an `if` or a `while`, reported once per check
    Condition(Guard, &'a BExp),
    Arithmetic(&'a AExp),
    Boolean(&'a BExp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Continue,
    /// Stop the whole run. The evaluator unwinds exactly like `abort`.
    Cancel,
}

/// Hook invoked by the evaluator around every evaluation step.
///
/// Silent execution and the step debugger share one evaluator and differ
/// only in the observer they pass to it.
pub trait StepObserver {
    /// Called before `node` is evaluated, with the environment as it is at
    /// that moment.
    fn before(&mut self, node: Node<'_>, environment: &Environment) -> Acknowledgment;

    /// Called after an assignment stored `value` in `name`
    fn assigned(&mut self, _name: &Ident, _value: i64) -> Acknowledgment {
        Acknowledgment::Continue
    }

    /// Called after a guard evaluated to `value`
    fn decided(&mut self, _guard: Guard, _value: bool) -> Acknowledgment {
        Acknowledgment::Continue
    }
}

/// Observer for plain execution: never interferes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl StepObserver for Silent {
    fn before(&mut self, _node: Node<'_>, _environment: &Environment) -> Acknowledgment {
        Acknowledgment::Continue
    }
}
