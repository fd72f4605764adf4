use crate::ast::expression::{AExp, BExp, Ident};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stm {
    Skip,
    Print,
    Abort,
    Break,
    Assign(Assign),
    If(If),
    While(While),
    Var(Var),
    Seq(Vec<Stm>),
    Nondet(Vec<Stm>),
    ProcDef(ProcDef),
    ProcCall(ProcCall),
    /// A bare arithmetic expression submitted as a whole program
    Arithmetic(AExp),
    /// A bare boolean expression submitted as a whole program
    Boolean(BExp),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub name: Ident,
    pub value: AExp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub condition: BExp,
    pub taken: Box<Stm>,
    pub not_taken: Box<Stm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct While {
    pub condition: BExp,
    pub body: Box<Stm>,
}

/// `var name := init in body end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: Ident,
    pub init: AExp,
    pub body: Box<Stm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcDef {
    pub name: Ident,
    pub inputs: Vec<Ident>,
    pub outputs: Vec<Ident>,
    pub body: Box<Stm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcCall {
    pub name: Ident,
    pub inputs: Vec<AExp>,
    pub outputs: Vec<Ident>,
}
