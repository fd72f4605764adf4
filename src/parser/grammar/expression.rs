//! Expression parsers for IMP
//!
//! Binary expressions are always written inside their own pair of
//! parentheses. Two common mistakes are recognised explicitly instead of
//! being left to the generic "unexpected token" path: a binary operation
//! without its parentheses, and a whole expression wrapped in one pair too
//! many. Both are reported with [`FORCED`] likelihood, which outranks any
//! ordinary failure.

use tracing::trace;

use crate::ast::{AExp, ArithOp, BExp, BoolOp, RelOp};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, choice, expect_lparen, expect_not, expect_rparen, memoized,
};
use crate::parser::state::{FORCED, ParseError, ParseResult, ParseState, Parser, Production};

use super::literal::atom;

fn arith_operator(token: &Token) -> Option<ArithOp> {
    match token {
        Token::Plus(_) => Some(ArithOp::Add),
        Token::Minus(_) => Some(ArithOp::Sub),
        Token::Times(_) => Some(ArithOp::Mul),
        _ => None,
    }
}

fn bool_operator(token: &Token) -> Option<BoolOp> {
    match token {
        Token::And(_) => Some(BoolOp::And),
        Token::Or(_) => Some(BoolOp::Or),
        _ => None,
    }
}

fn relational_operator(token: &Token) -> Option<RelOp> {
    match token {
        Token::Equal(_) => Some(RelOp::Eq),
        Token::NotEqual(_) => Some(RelOp::NotEq),
        Token::Less(_) => Some(RelOp::Lt),
        Token::LessEqual(_) => Some(RelOp::LtEq),
        Token::Greater(_) => Some(RelOp::Gt),
        Token::GreaterEqual(_) => Some(RelOp::GtEq),
        _ => None,
    }
}

/// Messages reported by the two error productions of one expression kind
struct Misuse {
    unparenthesized: &'static str,
    redundant: &'static str,
}

const ARITHMETIC_MISUSE: Misuse = Misuse {
    unparenthesized: "binary expression must be enclosed by parentheses",
    redundant: "arithmetic expressions cannot be surrounded by additional parentheses",
};

const BOOLEAN_MISUSE: Misuse = Misuse {
    unparenthesized: "binary boolean expression must be enclosed by parentheses",
    redundant: "boolean expressions cannot be surrounded by additional parentheses",
};

/// Wrap `term` with both error productions.
///
/// 1. `term op term` where `op` is an operator of this kind: forced failure
///    at the operator.
/// 2. `"(" enclosed ")"`, when given: accepted as `enclosed`.
/// 3. `"(" whole ")"`: forced failure at the opening parenthesis.
/// 4. `term` on its own.
///
/// Failures of the attempts that are not the recognised mistake are ranked
/// against the failure of the last one.
fn guarded<T: 'static>(
    term: fn() -> BoxedParser<T>,
    whole: fn() -> BoxedParser<T>,
    enclosed: Option<fn() -> BoxedParser<T>>,
    is_operator: fn(&Token) -> bool,
    misuse: &'static Misuse,
) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = state.position();
        let opening = state.peek().cloned();
        let mut failure = ParseError::unlikely();

        match missing_parentheses(term, state) {
            Ok(Some(operator)) if is_operator(&operator) => {
                trace!("unparenthesized operator {}", operator.describe());
                state.restore(start);
                return Err(ParseError::new(Some(operator), misuse.unparenthesized, FORCED));
            }
            Ok(_) => {}
            Err(err) => failure = failure.most_likely(err),
        }
        state.restore(start);

        if let Some(enclosed) = enclosed {
            match parenthesized(enclosed, state) {
                Ok(value) => return Ok(value),
                Err(err) => failure = failure.most_likely(err),
            }
            state.restore(start);
        }

        match parenthesized(whole, state) {
            Ok(_) => {
                trace!("redundant parentheses");
                state.restore(start);
                return Err(ParseError::new(opening, misuse.redundant, FORCED));
            }
            Err(err) => failure = failure.most_likely(err),
        }
        state.restore(start);

        term().parse(state).map_err(|err| {
            state.restore(start);
            failure.most_likely(err)
        })
    })
}

/// `term <any token> term`; yields the token in the middle
fn missing_parentheses<T: 'static>(
    term: fn() -> BoxedParser<T>,
    state: &mut ParseState,
) -> ParseResult<Option<Token>> {
    term().parse(state)?;
    let operator = state.advance();
    term().parse(state)?;
    Ok(operator)
}

fn parenthesized<T: 'static>(
    inner: fn() -> BoxedParser<T>,
    state: &mut ParseState,
) -> ParseResult<T> {
    expect_lparen("expected '('", 0.0).parse(state)?;
    let value = inner().parse(state)?;
    expect_rparen("expected ')'", 0.0).parse(state)?;
    Ok(value)
}

/// aexp with both parenthesis error productions
pub fn arithmetic() -> BoxedParser<AExp> {
    memoized(
        Production::Arithmetic,
        guarded(
            arithmetic_term,
            arithmetic,
            None,
            |t| arith_operator(t).is_some(),
            &ARITHMETIC_MISUSE,
        ),
    )
}

/// aexp := "(" aexp op aexp ")" | atom
pub fn arithmetic_term() -> BoxedParser<AExp> {
    memoized(Production::ArithmeticTerm, arithmetic_binary() | atom())
}

fn arithmetic_binary() -> BoxedParser<AExp> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_lparen("binary arithmetic expressions must open with '('", 0.1).parse(state)?;
        let left = arithmetic_term().parse(state)?;
        let operator = state.advance();
        let right = arithmetic_term().parse(state)?;
        expect_rparen("binary arithmetic expressions must be closed with ')'", 0.9)
            .parse(state)?;

        match operator.as_ref().and_then(arith_operator) {
            Some(op) => Ok(AExp::binary(left, op, right)),
            None => Err(ParseError::new(
                operator,
                "illegal operator for binary arithmetic operation",
                0.8,
            )),
        }
    })
    .atomic()
}

/// bexp with both parenthesis error productions. A comparison may still be
/// wrapped in one pair of parentheses, as in `while (x < 3) do … end`.
pub fn boolean() -> BoxedParser<BExp> {
    memoized(
        Production::Boolean,
        guarded(
            boolean_term,
            boolean,
            Some(comparison as fn() -> BoxedParser<BExp>),
            |t| bool_operator(t).is_some(),
            &BOOLEAN_MISUSE,
        ),
    )
}

/// bexp := "true" | "false" | "(" bexp op bexp ")" | "not" bexp | aexp rel aexp
pub fn boolean_term() -> BoxedParser<BExp> {
    let parser = BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::True(_)) => {
            state.advance();
            Ok(BExp::Literal(true))
        }
        Some(Token::False(_)) => {
            state.advance();
            Ok(BExp::Literal(false))
        }
        _ => choice(vec![boolean_binary(), negation(), comparison()]).parse(state),
    });

    memoized(Production::BooleanTerm, parser)
}

fn boolean_binary() -> BoxedParser<BExp> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_lparen("binary boolean expressions must open with '('", 0.05).parse(state)?;
        let left = boolean_term().parse(state)?;
        let operator = state.advance();
        let right = boolean_term().parse(state)?;
        expect_rparen("binary boolean expressions must be closed with ')'", 0.9).parse(state)?;

        match operator.as_ref().and_then(bool_operator) {
            Some(op) => Ok(BExp::binary(left, op, right)),
            None => Err(ParseError::new(
                operator,
                "illegal operator for binary boolean operation",
                0.7,
            )),
        }
    })
    .atomic()
}

/// negation := "not" bexp
fn negation() -> BoxedParser<BExp> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_not("expected 'not'", 0.0).parse(state)?;
        let inner = boolean().parse(state)?;
        Ok(BExp::not(inner))
    })
    .atomic()
}

/// comparison := aexp rel aexp
fn comparison() -> BoxedParser<BExp> {
    BoxedParser::new(|state: &mut ParseState| {
        let left = arithmetic().parse(state)?;
        let operator = state.advance();
        let right = arithmetic().parse(state)?;

        match operator.as_ref().and_then(relational_operator) {
            Some(op) => Ok(BExp::comparison(left, op, right)),
            None => Err(ParseError::new(
                operator,
                "illegal operator for comparison",
                0.75,
            )),
        }
    })
    .atomic()
}
