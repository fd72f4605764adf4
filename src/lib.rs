//! # IMP - an interpreter toolchain for a small imperative teaching language
//!
//! IMP programs assign integers to variables and combine statements with
//! sequencing, conditionals, loops, scoped declarations, procedures and
//! nondeterministic choice. A bare arithmetic or boolean expression is a
//! program too; its value is printed.
//!
//! ## Architecture Overview
//!
//! 1. **Lexer** (`lexer`) - Tokenizes source code using the `lachs` library
//! 2. **Parser** (`parser`) - Backtracking combinator parser that either
//!    builds an AST or reports the single most likely diagnostic
//! 3. **Printer** (`fmt`) - Renders the AST back into canonical source text
//! 4. **Interpreter** (`interpreter`) - One tree walk, parameterised by a
//!    step observer; the step debugger is such an observer
//! 5. **REPL** (`repl`) - Submission reading and `:` commands for the binary
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → AST (ast::Stm)
//!     ↓
//! [Interpreter + StepObserver] → ControlOutcome, program output
//! ```
//!
//! ## Dialects
//!
//! The **core** dialect has `skip`, `print`, assignment, `if`, `while` and
//! sequencing, and rejects reads of undefined variables. The **extended**
//! dialect adds `abort`, `break`, `var` blocks, procedures and
//! nondeterministic choice, and reads undefined variables as 0.
//!
//! ## Example Program
//!
//! ```text
//! procedure inc(n; r) begin r := (n + 1) end;
//! a := 5;
//! inc(a; a);
//! print
//! ```

pub mod ast;
pub mod error;
pub mod fmt;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;

use ast::Stm;
use error::ImpError;
use parser::ParseState;

/// The language variant a submission is read in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    Core,
    #[default]
    Extended,
}

/// Scan and parse a whole submission
pub fn parse_source(source: &str, dialect: Dialect) -> Result<Stm, ImpError> {
    let tokens = lexer::scan(source)?;
    let mut state = ParseState::with_dialect(tokens, dialect);
    Ok(parser::parse(&mut state)?)
}
