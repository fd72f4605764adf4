use lachs::Span;

/// Position of nodes built in code rather than parsed from source
fn no_position() -> Span {
    Span {
        start: (0, 0),
        end: (0, 0),
        source: String::new(),
    }
}

/// A variable name together with where it was written.
///
/// Equality only looks at the name; positions never take part in
/// structural comparison of trees.
#[derive(Debug, Clone)]
pub struct Ident {
    pub value: String,
    pub position: Span,
}

impl Ident {
    pub fn new(value: impl Into<String>, position: Span) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }

    /// An identifier that does not come from any source text
    pub fn detached(value: impl Into<String>) -> Self {
        Self::new(value, no_position())
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Ident {}

/// A numeral as written in the source. It is converted to an integer
/// when evaluated, so an out-of-range literal is a runtime condition.
#[derive(Debug, Clone)]
pub struct Numeral {
    pub lexeme: String,
    pub position: Span,
}

impl Numeral {
    pub fn new(lexeme: impl Into<String>, position: Span) -> Self {
        Self {
            lexeme: lexeme.into(),
            position,
        }
    }
}

impl PartialEq for Numeral {
    fn eq(&self, other: &Self) -> bool {
        self.lexeme == other.lexeme
    }
}

impl Eq for Numeral {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Variable(Ident),
    Numeral(Numeral),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AExp {
    Atom(Atom),
    Binary {
        left: Box<AExp>,
        op: ArithOp,
        right: Box<AExp>,
    },
}

impl AExp {
    pub fn variable(name: impl Into<String>) -> Self {
        AExp::Atom(Atom::Variable(Ident::detached(name)))
    }

    pub fn numeral(value: i64) -> Self {
        AExp::Atom(Atom::Numeral(Numeral::new(value.to_string(), no_position())))
    }

    pub fn binary(left: AExp, op: ArithOp, right: AExp) -> Self {
        AExp::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BExp {
    Literal(bool),
    Not(Box<BExp>),
    Binary {
        left: Box<BExp>,
        op: BoolOp,
        right: Box<BExp>,
    },
    Comparison {
        left: AExp,
        op: RelOp,
        right: AExp,
    },
}

impl BExp {
    pub fn not(inner: BExp) -> Self {
        BExp::Not(Box::new(inner))
    }

    pub fn binary(left: BExp, op: BoolOp, right: BExp) -> Self {
        BExp::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn comparison(left: AExp, op: RelOp, right: AExp) -> Self {
        BExp::Comparison { left, op, right }
    }
}
