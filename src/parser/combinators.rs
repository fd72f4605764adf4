use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use crate::lexer::Token;

use super::state::{ParseError, ParseResult, ParseState, Parser, Production};

type ParserFn<T> = Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state| parser.parse(state)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(state)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other, return (T, U)
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |state: &mut ParseState| {
            let a = self.parse(state)?;
            let b = other.parse(state)?;
            Ok((a, b))
        })
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let a = self.parse(state)?;
            let _ = other.parse(state)?;
            Ok(a)
        })
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| {
            let _ = self.parse(state)?;
            other.parse(state)
        })
    }

    /// Map: transform result
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| {
            let a = self.parse(state)?;
            Ok(f(a))
        })
    }

    /// Choice: try self, if it fails rewind and try other.
    ///
    /// When both fail, the more likely failure survives (self wins ties).
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let pos = state.position();
            match self.parse(state) {
                Ok(a) => Ok(a),
                Err(first) => {
                    state.restore(pos);
                    match other.parse(state) {
                        Ok(b) => Ok(b),
                        Err(second) => {
                            state.restore(pos);
                            Err(first.most_likely(second))
                        }
                    }
                }
            }
        })
    }

    /// Rewind the cursor if this parser fails, so nothing it consumed leaks
    /// into the next attempt
    pub fn atomic(self) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let pos = state.position();
            self.parse(state).inspect_err(|_| state.restore(pos))
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

/// Try each alternative in order from the same cursor position and return
/// the first success. If all of them fail, the most likely failure is
/// returned.
pub fn choice<T: 'static>(alternatives: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let pos = state.position();
        let mut failure = ParseError::unlikely();

        for alternative in &alternatives {
            match alternative.parse(state) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    state.restore(pos);
                    failure = failure.most_likely(err);
                }
            }
        }

        Err(failure)
    })
}

/// Parse `production` at most once per start position.
///
/// Alternatives that fail late backtrack and meet the same production at the
/// same token again. A hit moves the cursor and replays the failures
/// swallowed during the first attempt.
pub fn memoized<T: Clone + 'static>(
    production: Production,
    parser: BoxedParser<T>,
) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = state.position();
        if let Some(result) = state.recall::<T>(start, production) {
            return result;
        }

        let outer = state.take_swallowed();
        let result = parser.parse(state);
        let swallowed = state.take_swallowed();

        state.remember(start, production, &result, swallowed.clone());
        if let Some(err) = outer {
            state.record_swallowed(err);
        }
        if let Some(err) = swallowed {
            state.record_swallowed(err);
        }
        result
    })
}

// === Primitive Parsers ===

/// Consume one token matching `predicate`, or fail at the current token with
/// the given message and likelihood
pub fn token<F: Fn(&Token) -> bool + 'static>(
    predicate: F,
    message: &'static str,
    likelihood: f64,
) -> BoxedParser<Token> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(tok) if predicate(tok) => state
            .advance()
            .ok_or_else(|| state.error_here(message, likelihood)),
        _ => Err(state.error_here(message, likelihood)),
    })
}

pub fn expect_lparen(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::LParen(_)), message, likelihood)
}

pub fn expect_rparen(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::RParen(_)), message, likelihood)
}

pub fn expect_semicolon(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Semicolon(_)), message, likelihood)
}

pub fn expect_pipe(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Pipe(_)), message, likelihood)
}

pub fn expect_assign(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Assign(_)), message, likelihood)
}

pub fn expect_if(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::If(_)), message, likelihood)
}

pub fn expect_then(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Then(_)), message, likelihood)
}

pub fn expect_while(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::While(_)), message, likelihood)
}

pub fn expect_do(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Do(_)), message, likelihood)
}

pub fn expect_end(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::End(_)), message, likelihood)
}

pub fn expect_var(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Var(_)), message, likelihood)
}

pub fn expect_in(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::In(_)), message, likelihood)
}

pub fn expect_procedure(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Procedure(_)), message, likelihood)
}

pub fn expect_begin(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Begin(_)), message, likelihood)
}

pub fn expect_not(message: &'static str, likelihood: f64) -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Not(_)), message, likelihood)
}

/// Either a `,` (another list element follows) or the list terminator.
/// Returns `true` when the terminator was seen; it is left unconsumed.
pub fn list_separator<F: Fn(&Token) -> bool + 'static>(
    is_terminator: F,
    message: &'static str,
    likelihood: f64,
) -> BoxedParser<bool> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(Token::Comma(_)) => {
            state.advance();
            Ok(false)
        }
        Some(tok) if is_terminator(tok) => Ok(true),
        _ => Err(state.error_here(message, likelihood)),
    })
}
