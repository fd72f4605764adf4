//! Literal parsers for IMP: identifiers and atomic arithmetic operands

use crate::ast::{AExp, Atom, Ident, Numeral};
use crate::lexer::Token;

use crate::parser::combinators::BoxedParser;
use crate::parser::state::ParseState;

/// Parse an identifier, failing with the caller's message and likelihood
pub fn ident(message: &'static str, likelihood: f64) -> BoxedParser<Ident> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_)) => match state.advance() {
            Some(Token::Ident(id)) => Ok(Ident::new(id.value, id.position)),
            _ => unreachable!("peeked an identifier"),
        },
        _ => Err(state.error_here(message, likelihood)),
    })
}

/// atom := ident | number
pub fn atom() -> BoxedParser<AExp> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_) | Token::Number(_)) => match state.advance() {
            Some(Token::Ident(id)) => Ok(AExp::Atom(Atom::Variable(Ident::new(
                id.value,
                id.position,
            )))),
            Some(Token::Number(num)) => Ok(AExp::Atom(Atom::Numeral(Numeral::new(
                num.value,
                num.position,
            )))),
            _ => unreachable!("peeked an atom"),
        },
        _ => Err(state.error_here("unexpected atomic token", 0.0)),
    })
}
