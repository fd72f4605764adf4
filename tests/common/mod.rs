//! Program generators shared by the property tests
#![allow(dead_code)]

use imp::ast::{AExp, ArithOp, Assign, BExp, BoolOp, Ident, If, ProcCall, ProcDef, RelOp, Stm, Var, While};
use quickcheck::{Arbitrary, Gen};

/// Which statement forms a generated program may contain
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    /// Nondeterministic choices
    pub choices: bool,
    /// Close every loop body with `break`, so each loop runs at most once
    pub bounded_loops: bool,
}

/// Everything the printer can render
pub const PRINTABLE: Shape = Shape {
    choices: true,
    bounded_loops: false,
};

/// Programs without choices that always terminate
pub const DETERMINISTIC: Shape = Shape {
    choices: false,
    bounded_loops: true,
};

const NAMES: &[&str] = &["a", "b", "n", "x", "y"];

pub fn gen_ident(g: &mut Gen) -> Ident {
    Ident::detached(g.choose(NAMES).copied().unwrap_or("x"))
}

pub fn gen_aexp(g: &mut Gen, depth: usize) -> AExp {
    if depth == 0 || bool::arbitrary(g) {
        return if bool::arbitrary(g) {
            AExp::numeral(i64::from(u8::arbitrary(g)))
        } else {
            AExp::variable(gen_ident(g).value)
        };
    }

    let op = *g.choose(&[ArithOp::Add, ArithOp::Sub, ArithOp::Mul]).unwrap();
    AExp::binary(gen_aexp(g, depth - 1), op, gen_aexp(g, depth - 1))
}

pub fn gen_comparison(g: &mut Gen, depth: usize) -> BExp {
    let op = *g
        .choose(&[
            RelOp::Eq,
            RelOp::NotEq,
            RelOp::Lt,
            RelOp::LtEq,
            RelOp::Gt,
            RelOp::GtEq,
        ])
        .unwrap();
    BExp::comparison(gen_aexp(g, depth), op, gen_aexp(g, depth))
}

/// `not` binds everything to its right, so it never starts the left
/// operand of a binary.
pub fn gen_bexp(g: &mut Gen, depth: usize, left_operand: bool) -> BExp {
    let choices: &[u8] = if depth == 0 {
        &[0, 1]
    } else if left_operand {
        &[0, 1, 3]
    } else {
        &[0, 1, 2, 3]
    };

    match g.choose(choices).copied().unwrap_or(0) {
        0 => BExp::Literal(bool::arbitrary(g)),
        1 => gen_comparison(g, depth.min(1)),
        2 => BExp::not(gen_bexp(g, depth - 1, false)),
        _ => {
            let op = *g.choose(&[BoolOp::And, BoolOp::Or]).unwrap();
            BExp::binary(
                gen_bexp(g, depth - 1, true),
                op,
                gen_bexp(g, depth - 1, false),
            )
        }
    }
}

pub fn gen_list<T>(g: &mut Gen, max: usize, mut item: impl FnMut(&mut Gen) -> T) -> Vec<T> {
    let len = usize::arbitrary(g) % (max + 1);
    (0..len).map(|_| item(g)).collect()
}

/// A statement of the given `shape`. Inside a choice (`in_choice`) no
/// further choice is generated directly.
pub fn gen_stm(g: &mut Gen, depth: usize, shape: Shape, in_choice: bool) -> Stm {
    let leaf = depth == 0 || u8::arbitrary(g) % 3 == 0;
    if leaf {
        return match u8::arbitrary(g) % 6 {
            0 => Stm::Skip,
            1 => Stm::Print,
            2 => Stm::Abort,
            3 => Stm::Break,
            4 => Stm::ProcCall(ProcCall {
                name: Ident::detached("p"),
                inputs: gen_list(g, 2, |g| gen_aexp(g, 1)),
                outputs: gen_list(g, 2, gen_ident),
            }),
            _ => Stm::Assign(Assign {
                name: gen_ident(g),
                value: gen_aexp(g, 2),
            }),
        };
    }

    let max_kind = if in_choice || !shape.choices { 5 } else { 6 };
    match u8::arbitrary(g) % max_kind {
        0 => Stm::If(If {
            condition: gen_bexp(g, 2, false),
            taken: Box::new(gen_stm(g, depth - 1, shape, false)),
            not_taken: Box::new(gen_stm(g, depth - 1, shape, false)),
        }),
        1 => {
            let body = gen_stm(g, depth - 1, shape, false);
            let body = if shape.bounded_loops {
                Stm::Seq(vec![body, Stm::Break])
            } else {
                body
            };
            Stm::While(While {
                condition: gen_bexp(g, 2, false),
                body: Box::new(body),
            })
        }
        2 => Stm::Var(Var {
            name: gen_ident(g),
            init: gen_aexp(g, 1),
            body: Box::new(gen_stm(g, depth - 1, shape, false)),
        }),
        3 => Stm::ProcDef(ProcDef {
            name: Ident::detached("p"),
            inputs: gen_list(g, 2, gen_ident),
            outputs: gen_list(g, 2, gen_ident),
            body: Box::new(gen_stm(g, depth - 1, shape, false)),
        }),
        4 => {
            let len = 2 + usize::arbitrary(g) % 2;
            Stm::Seq(
                (0..len)
                    .map(|_| gen_stm(g, depth - 1, shape, false))
                    .collect(),
            )
        }
        _ => {
            let len = 2 + usize::arbitrary(g) % 2;
            Stm::Nondet(
                (0..len)
                    .map(|_| gen_stm(g, depth - 1, shape, true))
                    .collect(),
            )
        }
    }
}
