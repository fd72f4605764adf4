use lachs::Span;

use crate::error::ImpError;

#[lachs::token]
pub enum Token {
    #[terminal("skip")]
    Skip,
    #[terminal("print")]
    Print,
    #[terminal("abort")]
    Abort,
    #[terminal("break")]
    Break,
    #[terminal("if")]
    If,
    #[terminal("then")]
    Then,
    #[terminal("else")]
    Else,
    #[terminal("while")]
    While,
    #[terminal("do")]
    Do,
    #[terminal("end")]
    End,
    #[terminal("var")]
    Var,
    #[terminal("in")]
    In,
    #[terminal("procedure")]
    Procedure,
    #[terminal("begin")]
    Begin,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[terminal("not")]
    Not,
    #[terminal("and")]
    And,
    #[terminal("or")]
    Or,
    #[literal("[a-zA-Z][a-zA-Z0-9]*")]
    Ident,
    #[literal("[0-9]+")]
    Number,
    #[terminal(":=")]
    Assign,
    #[terminal(";")]
    Semicolon,
    #[terminal("|")]
    Pipe,
    #[terminal(",")]
    Comma,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Times,
    #[terminal("=")]
    Equal,
    #[terminal("#")]
    NotEqual,
    #[terminal("<")]
    Less,
    #[terminal("<=")]
    LessEqual,
    #[terminal(">")]
    Greater,
    #[terminal(">=")]
    GreaterEqual,
}

/// Scan a whole submission.
///
/// The scanner rejects the submission on the first unrecognised character;
/// the error keeps the scanner's own description of where it stopped.
pub fn scan(source: &str) -> Result<Vec<Token>, ImpError> {
    Token::lex(source).map_err(|err| ImpError::Lex {
        message: err.to_string(),
    })
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Skip(inner) => inner.position.clone(),
            Token::Print(inner) => inner.position.clone(),
            Token::Abort(inner) => inner.position.clone(),
            Token::Break(inner) => inner.position.clone(),
            Token::If(inner) => inner.position.clone(),
            Token::Then(inner) => inner.position.clone(),
            Token::Else(inner) => inner.position.clone(),
            Token::While(inner) => inner.position.clone(),
            Token::Do(inner) => inner.position.clone(),
            Token::End(inner) => inner.position.clone(),
            Token::Var(inner) => inner.position.clone(),
            Token::In(inner) => inner.position.clone(),
            Token::Procedure(inner) => inner.position.clone(),
            Token::Begin(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Not(inner) => inner.position.clone(),
            Token::And(inner) => inner.position.clone(),
            Token::Or(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Number(inner) => inner.position.clone(),
            Token::Assign(inner) => inner.position.clone(),
            Token::Semicolon(inner) => inner.position.clone(),
            Token::Pipe(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Times(inner) => inner.position.clone(),
            Token::Equal(inner) => inner.position.clone(),
            Token::NotEqual(inner) => inner.position.clone(),
            Token::Less(inner) => inner.position.clone(),
            Token::LessEqual(inner) => inner.position.clone(),
            Token::Greater(inner) => inner.position.clone(),
            Token::GreaterEqual(inner) => inner.position.clone(),
        }
    }

    /// The raw source text of the token
    pub fn lexeme(&self) -> &str {
        match self {
            Token::Skip(_) => "skip",
            Token::Print(_) => "print",
            Token::Abort(_) => "abort",
            Token::Break(_) => "break",
            Token::If(_) => "if",
            Token::Then(_) => "then",
            Token::Else(_) => "else",
            Token::While(_) => "while",
            Token::Do(_) => "do",
            Token::End(_) => "end",
            Token::Var(_) => "var",
            Token::In(_) => "in",
            Token::Procedure(_) => "procedure",
            Token::Begin(_) => "begin",
            Token::True(_) => "true",
            Token::False(_) => "false",
            Token::Not(_) => "not",
            Token::And(_) => "and",
            Token::Or(_) => "or",
            Token::Ident(inner) => &inner.value,
            Token::Number(inner) => &inner.value,
            Token::Assign(_) => ":=",
            Token::Semicolon(_) => ";",
            Token::Pipe(_) => "|",
            Token::Comma(_) => ",",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Times(_) => "*",
            Token::Equal(_) => "=",
            Token::NotEqual(_) => "#",
            Token::Less(_) => "<",
            Token::LessEqual(_) => "<=",
            Token::Greater(_) => ">",
            Token::GreaterEqual(_) => ">=",
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Number(inner) => format!("number '{}'", inner.value),
            other => format!("'{}'", other.lexeme()),
        }
    }
}
