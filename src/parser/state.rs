use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::Dialect;
use crate::lexer::Token;

/// Likelihood attached to a recognised error production. It outranks every
/// ordinary failure, so once seen it is the reported diagnostic unless some
/// alternative parses successfully.
pub const FORCED: f64 = 2.0;

/// A failed parse attempt.
///
/// `likelihood` is the confidence that the failing alternative was the one
/// the author meant: close to 0 when the alternative failed on its very first
/// token, close to 1 when it failed deep inside after a distinctive prefix.
/// `token` is `None` when the failure happened at the end of the input.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub token: Option<Token>,
    pub message: String,
    pub likelihood: f64,
}

impl ParseError {
    pub fn new(token: Option<Token>, msg: impl Into<String>, likelihood: f64) -> Self {
        Self {
            token,
            message: msg.into(),
            likelihood,
        }
    }

    /// The neutral starting point of a choice; any real failure replaces it.
    pub fn unlikely() -> Self {
        Self {
            token: None,
            message: "expected a program".to_string(),
            likelihood: -1.0,
        }
    }

    /// Keep the failure with the strictly higher likelihood; on a tie the one
    /// already held wins.
    pub fn most_likely(self, other: ParseError) -> ParseError {
        if other.likelihood > self.likelihood {
            other
        } else {
            self
        }
    }

    pub fn is_forced(&self) -> bool {
        self.likelihood >= FORCED
    }

    /// Description of the offending token, or of the end of input
    pub fn found(&self) -> String {
        self.token
            .as_ref()
            .map(Token::describe)
            .unwrap_or_else(|| "end of input".to_string())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = format!("{} (found {})", self.message, self.found());
        match &self.token {
            Some(token) if !token.pos().source.is_empty() => {
                write!(f, "{}", token.pos().to_string(&msg))
            }
            _ => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Grammar productions whose outcomes are cached per start position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    Statement,
    Instruction { nondet: bool },
    Arithmetic,
    ArithmeticTerm,
    Boolean,
    BooleanTerm,
}

/// Outcome of one production at one position: the result, where the cursor
/// was left and the most likely failure swallowed on the way.
struct Memo {
    result: Rc<dyn Any>,
    end: usize,
    swallowed: Option<ParseError>,
}

pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
    dialect: Dialect,
    swallowed: Option<ParseError>,
    memo: HashMap<(usize, Production), Memo>,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_dialect(tokens, Dialect::default())
    }

    pub fn with_dialect(tokens: Vec<Token>, dialect: Dialect) -> Self {
        Self {
            tokens,
            index: 0,
            dialect,
            swallowed: None,
            memo: HashMap::new(),
        }
    }

    pub fn advance(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Remember a failure that an optional construct chose to ignore, so it
    /// can still be reported if the whole parse fails afterwards.
    pub fn record_swallowed(&mut self, err: ParseError) {
        self.swallowed = Some(match self.swallowed.take() {
            Some(previous) => previous.most_likely(err),
            None => err,
        });
    }

    pub fn take_swallowed(&mut self) -> Option<ParseError> {
        self.swallowed.take()
    }

    /// Replay a cached outcome of `production` at `start`: move the cursor
    /// and swallowed failures as the original attempt did.
    pub fn recall<T: Clone + 'static>(
        &mut self,
        start: usize,
        production: Production,
    ) -> Option<ParseResult<T>> {
        let memo = self.memo.get(&(start, production))?;
        let result = memo.result.downcast_ref::<ParseResult<T>>()?.clone();
        let end = memo.end;
        let swallowed = memo.swallowed.clone();

        self.index = end;
        if let Some(err) = swallowed {
            self.record_swallowed(err);
        }
        Some(result)
    }

    /// Cache the outcome of `production` at `start`. The cursor is expected to
    /// sit where the attempt left it.
    pub fn remember<T: Clone + 'static>(
        &mut self,
        start: usize,
        production: Production,
        result: &ParseResult<T>,
        swallowed: Option<ParseError>,
    ) {
        self.memo.insert(
            (start, production),
            Memo {
                result: Rc::new(result.clone()),
                end: self.index,
                swallowed,
            },
        );
    }

    /// A failure located at the current token
    pub fn error_here(&self, msg: impl Into<String>, likelihood: f64) -> ParseError {
        ParseError::new(self.peek().cloned(), msg, likelihood)
    }
}

pub trait Parser<T>: Sized {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
