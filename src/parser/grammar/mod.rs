//! Grammar module for IMP
//!
//! This module contains all the parsing rules organized by category:
//! - `literal`: identifiers and atomic operands
//! - `expression`: arithmetic and boolean expressions with their error productions
//! - `statement`: instructions and statement sequences

mod expression;
mod literal;
mod statement;

use tracing::{debug, trace};

use crate::ast::Stm;

use super::combinators::BoxedParser;
use super::state::{ParseError, ParseResult, ParseState, Parser};

pub use expression::{arithmetic, boolean};
pub use statement::{instruction, statement};

/// Run `parser` and require that it consumed every token
fn whole(parser: BoxedParser<Stm>) -> BoxedParser<Stm> {
    BoxedParser::new(move |state: &mut ParseState| {
        let result = parser.parse(state).and_then(|stm| {
            if state.has_next() {
                Err(state.error_here("unexpected token", 1.0))
            } else {
                Ok(stm)
            }
        });

        // a remembered failure behind a trailing ';' may be the better diagnostic
        match (result, state.take_swallowed()) {
            (Err(err), Some(swallowed)) => Err(err.most_likely(swallowed)),
            (result, _) => result,
        }
    })
}

/// program := stm | bexp | aexp
///
/// The three readings are tried in that order, each from the start of the
/// input. The first one that consumes everything wins; when none does, the
/// most likely of their failures is the diagnostic.
pub fn parse(state: &mut ParseState) -> ParseResult<Stm> {
    let start = state.position();
    let attempts = [
        ("statement", statement()),
        ("boolean expression", boolean() >> Stm::Boolean),
        ("arithmetic expression", arithmetic() >> Stm::Arithmetic),
    ];

    let mut failure = ParseError::unlikely();
    for (reading, attempt) in attempts {
        state.restore(start);
        state.take_swallowed();

        match whole(attempt).parse(state) {
            Ok(program) => {
                debug!("parsed input as {reading}");
                return Ok(program);
            }
            Err(err) => {
                trace!("{reading} reading failed ({}): {err}", err.likelihood);
                failure = failure.most_likely(err);
            }
        }
    }

    state.restore(start);
    debug!("no reading matched, reporting: {failure}");
    Err(failure)
}
