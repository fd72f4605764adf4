//! Statement parsers for IMP

use crate::Dialect;
use crate::ast::{AExp, Assign, Ident, If, ProcCall, ProcDef, Stm, Var, While};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, choice, expect_assign, expect_begin, expect_do, expect_end, expect_if, expect_in,
    expect_lparen, expect_pipe, expect_procedure, expect_rparen, expect_semicolon, expect_then,
    expect_var, expect_while, list_separator, memoized, token,
};
use crate::parser::state::{ParseState, Parser, Production};

use super::expression::{arithmetic, boolean};
use super::literal::ident;

/// stm := instruction (";" instruction)*
///
/// A trailing `;` is accepted. The failure of the instruction that did not
/// follow it is kept in the state in case the whole parse fails later.
pub fn statement() -> BoxedParser<Stm> {
    let parser = BoxedParser::new(|state: &mut ParseState| {
        let first = instruction(true).parse(state)?;
        let mut stms = vec![first];

        while let Some(Token::Semicolon(_)) = state.peek() {
            state.advance();
            let pos = state.position();
            match instruction(true).parse(state) {
                Ok(next) => stms.push(next),
                Err(err) => {
                    state.restore(pos);
                    state.record_swallowed(err);
                    break;
                }
            }
        }

        Ok(match stms.len() {
            1 => stms.swap_remove(0),
            _ => Stm::Seq(stms),
        })
    })
    .atomic();

    memoized(Production::Statement, parser)
}

/// All instruction forms, in priority order. Choices can not be nested
/// directly inside choices, so `allow_nondet` is false for their branches.
pub fn instruction(allow_nondet: bool) -> BoxedParser<Stm> {
    let parser = BoxedParser::new(move |state: &mut ParseState| {
        let extended = state.dialect() == Dialect::Extended;
        let mut alternatives = Vec::with_capacity(9);

        if extended && allow_nondet {
            alternatives.push(nondet());
        }
        alternatives.push(parenthesized_sequence());
        alternatives.push(single(extended));
        alternatives.push(conditional());
        alternatives.push(while_loop());
        if extended {
            alternatives.push(procedure_definition());
            alternatives.push(procedure_call());
            alternatives.push(var_block());
        }
        alternatives.push(assignment());

        choice(alternatives).parse(state)
    });

    memoized(
        Production::Instruction {
            nondet: allow_nondet,
        },
        parser,
    )
}

/// nondet := instruction "|" instruction ("|" instruction)*
fn nondet() -> BoxedParser<Stm> {
    BoxedParser::new(|state: &mut ParseState| {
        let first = instruction(false).parse(state)?;
        expect_pipe("expected '|' between nondeterministic alternatives", 0.2).parse(state)?;
        let second = instruction(false).parse(state)?;
        let mut branches = vec![first, second];

        while let Some(Token::Pipe(_)) = state.peek() {
            state.advance();
            branches.push(instruction(false).parse(state)?);
        }

        Ok(Stm::Nondet(branches))
    })
    .atomic()
}

/// paren_seq := "(" instruction ";" instruction (";" instruction)* ")"
fn parenthesized_sequence() -> BoxedParser<Stm> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_lparen("statement sequences can be surrounded by parentheses", -0.01)
            .parse(state)?;
        let first = instruction(true).parse(state)?;
        expect_semicolon(
            "parenthesized statement sequences need at least two statements",
            0.95,
        )
        .parse(state)?;
        let second = instruction(true).parse(state)?;
        let mut stms = vec![first, second];

        while let Some(Token::Semicolon(_)) = state.peek() {
            state.advance();
            if let Some(Token::RParen(_)) = state.peek() {
                return Err(
                    state.error_here("expected a statement after ';' in statement sequence", 0.95)
                );
            }
            stms.push(instruction(true).parse(state)?);
        }

        expect_rparen("statement sequences must be closed with ')'", 0.95).parse(state)?;
        Ok(Stm::Seq(stms))
    })
    .atomic()
}

/// single := "skip" | "print" | "abort" | "break"
fn single(extended: bool) -> BoxedParser<Stm> {
    let message = if extended {
        "expected 'print', 'skip', 'abort' or 'break'"
    } else {
        "expected 'print' or 'skip'"
    };

    token(
        move |t| match t {
            Token::Skip(_) | Token::Print(_) => true,
            Token::Abort(_) | Token::Break(_) => extended,
            _ => false,
        },
        message,
        0.1,
    ) >> |t| match t {
        Token::Print(_) => Stm::Print,
        Token::Abort(_) => Stm::Abort,
        Token::Break(_) => Stm::Break,
        _ => Stm::Skip,
    }
}

/// if := "if" bexp "then" stm ["else" stm] "end"
fn conditional() -> BoxedParser<Stm> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_if("expected 'if'", 0.0).parse(state)?;
        let condition = boolean().parse(state)?;
        expect_then("if statements require 'then' after the condition", 0.95).parse(state)?;
        let taken = statement().parse(state)?;

        let not_taken = match state.peek() {
            Some(Token::Else(_)) => {
                state.advance();
                statement().parse(state)?
            }
            _ => Stm::Skip,
        };

        expect_end("if statements must be closed with 'end'", 0.95).parse(state)?;

        Ok(Stm::If(If {
            condition,
            taken: Box::new(taken),
            not_taken: Box::new(not_taken),
        }))
    })
    .atomic()
}

/// while := "while" bexp "do" stm "end"
fn while_loop() -> BoxedParser<Stm> {
    ((expect_while("expected 'while'", 0.0) * boolean())
        - expect_do("while loops require 'do' after the condition", 0.95)
        + statement()
        - expect_end("while loops must be closed with 'end'", 0.95))
    .atomic()
        >> |(condition, body)| {
            Stm::While(While {
                condition,
                body: Box::new(body),
            })
        }
}

/// params := (ident ",")* ident? up to (and excluding) the terminator
fn parameters<F: Fn(&Token) -> bool + Copy + 'static>(
    is_terminator: F,
    element: &'static str,
    separator: &'static str,
) -> BoxedParser<Vec<Ident>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut names = vec![];
        while !state.peek().is_some_and(is_terminator) {
            names.push(ident(element, 0.95).parse(state)?);
            list_separator(is_terminator, separator, 0.95).parse(state)?;
        }
        Ok(names)
    })
}

fn is_semicolon(token: &Token) -> bool {
    matches!(token, Token::Semicolon(_))
}

fn is_rparen(token: &Token) -> bool {
    matches!(token, Token::RParen(_))
}

/// procdef := "procedure" ident "(" params ";" params ")" "begin" stm "end"
fn procedure_definition() -> BoxedParser<Stm> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_procedure("expected 'procedure'", 0.0).parse(state)?;
        let name = ident("procedure definitions require a name", 0.95).parse(state)?;
        expect_lparen("procedure definitions require a parameter list", 0.95).parse(state)?;

        let inputs = parameters(
            is_semicolon,
            "procedure definitions require identifiers as input parameters",
            "procedure parameters must be separated by a comma",
        )
        .parse(state)?;
        expect_semicolon("expected ';' after the input parameters", 0.95).parse(state)?;

        let outputs = parameters(
            is_rparen,
            "procedure definitions require identifiers as output parameters",
            "procedure outputs must be separated by a comma",
        )
        .parse(state)?;
        expect_rparen("procedure parameter lists must be closed with ')'", 0.95).parse(state)?;

        expect_begin("procedure bodies must open with 'begin'", 0.95).parse(state)?;
        let body = statement().parse(state)?;
        expect_end("procedure bodies must be closed with 'end'", 0.95).parse(state)?;

        Ok(Stm::ProcDef(ProcDef {
            name,
            inputs,
            outputs,
            body: Box::new(body),
        }))
    })
    .atomic()
}

/// call := ident "(" [aexp ("," aexp)*] ";" [ident ("," ident)*] ")"
fn procedure_call() -> BoxedParser<Stm> {
    BoxedParser::new(|state: &mut ParseState| {
        let name = ident("procedure calls must begin with the procedure's name", 0.0)
            .parse(state)?;
        expect_lparen("procedure calls must contain an argument list", 0.2).parse(state)?;

        let mut inputs: Vec<AExp> = vec![];
        if !state.peek().is_some_and(is_semicolon) {
            inputs.push(arithmetic().parse(state)?);
            while !state.peek().is_some_and(is_semicolon) {
                token(
                    |t| matches!(t, Token::Comma(_)),
                    "procedure arguments must be separated by a comma",
                    0.95,
                )
                .parse(state)?;
                inputs.push(arithmetic().parse(state)?);
            }
        }
        state.advance();

        let mut outputs = vec![];
        if !state.peek().is_some_and(is_rparen) {
            outputs.push(ident("procedure outputs must be identifiers", 0.95).parse(state)?);
            while !state.peek().is_some_and(is_rparen) {
                token(
                    |t| matches!(t, Token::Comma(_)),
                    "procedure outputs must be separated by a comma",
                    0.95,
                )
                .parse(state)?;
                outputs.push(ident("procedure outputs must be identifiers", 0.95).parse(state)?);
            }
        }
        state.advance();

        Ok(Stm::ProcCall(ProcCall {
            name,
            inputs,
            outputs,
        }))
    })
    .atomic()
}

/// var := "var" ident ":=" aexp "in" stm "end"
fn var_block() -> BoxedParser<Stm> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_var("expected 'var'", 0.0).parse(state)?;
        let name = ident("variable declarations require a name", 0.95).parse(state)?;
        expect_assign("variable declarations require ':='", 0.95).parse(state)?;
        let init = arithmetic().parse(state)?;
        expect_in("variable declarations require 'in' after the initial value", 0.95)
            .parse(state)?;
        let body = statement().parse(state)?;
        expect_end("variable declarations must be closed with 'end'", 0.95).parse(state)?;

        Ok(Stm::Var(Var {
            name,
            init,
            body: Box::new(body),
        }))
    })
    .atomic()
}

/// assign := ident ":=" aexp
fn assignment() -> BoxedParser<Stm> {
    ((ident("expected an identifier for assignment", 0.1)
        - expect_assign("assignments require ':='", 0.1))
        + arithmetic())
        >> |(name, value)| Stm::Assign(Assign { name, value })
}
