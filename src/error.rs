//! # Submission errors
//!
//! Every stage of the pipeline reports its failure as a value. A submission
//! fails with exactly one [`ImpError`]; none of them affect the next
//! submission beyond the effects already applied.
//!
//! - [`ImpError::Lex`] - an unrecognised character in the source
//! - [`ImpError::Parse`] - the single ranked diagnostic of the parser
//! - [`ImpError::Runtime`] - a runtime condition raised while evaluating

use thiserror::Error;

use crate::interpreter::RuntimeError;
use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum ImpError {
    #[error("lexer error: {message}")]
    Lex { message: String },
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl ImpError {
    /// Short label used by the driver when it aborts a submission
    pub fn stage(&self) -> &'static str {
        match self {
            ImpError::Lex { .. } => "Lexer Error",
            ImpError::Parse(_) => "Parsing Error",
            ImpError::Runtime(_) => "Runtime Error",
        }
    }
}
