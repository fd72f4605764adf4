pub mod expression;
pub mod statement;

pub use expression::{AExp, ArithOp, Atom, BExp, BoolOp, Ident, Numeral, RelOp};
pub use statement::{Assign, If, ProcCall, ProcDef, Stm, Var, While};
