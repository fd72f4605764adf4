//! # Runtime Conditions
//!
//! A runtime condition stops the evaluation of the current submission.
//! Effects applied before it are kept, apart from the bindings that `var`
//! blocks and procedure calls always put back.
//!
//! - `UndefinedVariable` - a variable was read before any assignment and
//!   undefined reads are rejected
//! - `MalformedNumeral` - a numeral does not fit a 64-bit integer
//! - `ProcedureUndefined` - a call names a procedure that was never defined
//! - `ArityMismatch` - a call's argument lists disagree with the definition
//! - `RecursionLimit` - nested calls went deeper than the configured limit
//! - `Output` - the program output could not be written

use std::{fmt, io};

use lachs::Span;

#[derive(Debug)]
pub enum RuntimeError {
    UndefinedVariable {
        name: String,
        position: Span,
    },
    MalformedNumeral {
        lexeme: String,
        position: Span,
    },
    ProcedureUndefined {
        name: String,
        position: Span,
    },
    ArityMismatch {
        name: String,
        expected: (usize, usize),
        found: (usize, usize),
        position: Span,
    },
    RecursionLimit {
        name: String,
        limit: usize,
        position: Span,
    },
    Output(io::Error),
}

impl RuntimeError {
    /// Where the condition was raised, if it belongs to a source location
    pub fn position(&self) -> Option<&Span> {
        match self {
            RuntimeError::UndefinedVariable { position, .. }
            | RuntimeError::MalformedNumeral { position, .. }
            | RuntimeError::ProcedureUndefined { position, .. }
            | RuntimeError::ArityMismatch { position, .. }
            | RuntimeError::RecursionLimit { position, .. } => Some(position),
            RuntimeError::Output(_) => None,
        }
    }

    fn message(&self) -> String {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => {
                format!("undefined variable '{name}'")
            }
            RuntimeError::MalformedNumeral { lexeme, .. } => {
                format!("number format error: '{lexeme}' is not a 64-bit integer")
            }
            RuntimeError::ProcedureUndefined { name, .. } => {
                format!("procedure '{name}' is undefined")
            }
            RuntimeError::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => format!(
                "argument lists must match in length: '{name}' takes {} input(s) and {} output(s), but the call has {} and {}",
                expected.0, expected.1, found.0, found.1
            ),
            RuntimeError::RecursionLimit { name, limit, .. } => {
                format!("call to '{name}' exceeds the maximum call depth of {limit}")
            }
            RuntimeError::Output(err) => format!("could not write program output: {err}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = self.message();
        match self.position() {
            Some(span) if !span.source.is_empty() => write!(f, "{}", span.to_string(&msg)),
            _ => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Output(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        RuntimeError::Output(err)
    }
}
