//! Pretty printer for IMP source code
//!
//! This module provides Display implementations for the AST. The output is
//! the canonical single-line form: binary expressions always carry their
//! parentheses, every `if` has an `else`, and sequences are parenthesized
//! wherever they would otherwise merge with their surroundings. Parsing the
//! output yields a structurally equal tree.

use std::fmt::{self, Display};

use crate::ast::{AExp, ArithOp, Atom, BExp, BoolOp, Ident, ProcCall, ProcDef, RelOp, Stm};

struct Formatter {
    buffer: String,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_list<T: Display>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write_str(", ");
            }
            self.write_str(&item.to_string());
        }
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Variable(id) => write!(f, "{id}"),
            Atom::Numeral(num) => write!(f, "{}", num.lexeme),
        }
    }
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
        };
        write!(f, "{op}")
    }
}

impl Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        };
        write!(f, "{op}")
    }
}

impl Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            RelOp::Eq => "=",
            RelOp::NotEq => "#",
            RelOp::Lt => "<",
            RelOp::LtEq => "<=",
            RelOp::Gt => ">",
            RelOp::GtEq => ">=",
        };
        write!(f, "{op}")
    }
}

impl Display for AExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AExp::Atom(atom) => write!(f, "{atom}"),
            AExp::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

impl Display for BExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BExp::Literal(true) => write!(f, "true"),
            BExp::Literal(false) => write!(f, "false"),
            BExp::Not(inner) => write!(f, "not {inner}"),
            BExp::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
            BExp::Comparison { left, op, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

impl Display for Stm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_statement(self, &mut formatter);
        write!(f, "{}", formatter.finish())
    }
}

fn format_statement(stm: &Stm, fmt: &mut Formatter) {
    match stm {
        Stm::Skip => fmt.write_str("skip"),
        Stm::Print => fmt.write_str("print"),
        Stm::Abort => fmt.write_str("abort"),
        Stm::Break => fmt.write_str("break"),
        Stm::Assign(assign) => {
            fmt.write_str(&format!("{} := {}", assign.name, assign.value));
        }
        Stm::If(branch) => {
            fmt.write_str(&format!("if {} then ", branch.condition));
            format_statement(&branch.taken, fmt);
            fmt.write_str(" else ");
            format_statement(&branch.not_taken, fmt);
            fmt.write_str(" end");
        }
        Stm::While(looped) => {
            fmt.write_str(&format!("while {} do ", looped.condition));
            format_statement(&looped.body, fmt);
            fmt.write_str(" end");
        }
        Stm::Var(var) => {
            fmt.write_str(&format!("var {} := {} in ", var.name, var.init));
            format_statement(&var.body, fmt);
            fmt.write_str(" end");
        }
        Stm::Seq(stms) => format_joined(stms, "; ", fmt),
        Stm::Nondet(branches) => format_joined(branches, " | ", fmt),
        Stm::ProcDef(def) => format_procedure_definition(def, fmt),
        Stm::ProcCall(call) => format_procedure_call(call, fmt),
        Stm::Arithmetic(aexp) => fmt.write_str(&aexp.to_string()),
        Stm::Boolean(bexp) => fmt.write_str(&bexp.to_string()),
    }
}

/// Elements of a sequence or choice; a nested sequence needs its own parentheses
fn format_joined(stms: &[Stm], separator: &str, fmt: &mut Formatter) {
    for (i, stm) in stms.iter().enumerate() {
        if i > 0 {
            fmt.write_str(separator);
        }
        if let Stm::Seq(_) = stm {
            fmt.write_str("(");
            format_statement(stm, fmt);
            fmt.write_str(")");
        } else {
            format_statement(stm, fmt);
        }
    }
}

fn format_procedure_definition(def: &ProcDef, fmt: &mut Formatter) {
    fmt.write_str(&format!("procedure {}(", def.name));
    fmt.write_list(&def.inputs);
    fmt.write_str("; ");
    fmt.write_list(&def.outputs);
    fmt.write_str(") begin ");
    format_statement(&def.body, fmt);
    fmt.write_str(" end");
}

fn format_procedure_call(call: &ProcCall, fmt: &mut Formatter) {
    fmt.write_str(&format!("{}(", call.name));
    fmt.write_list(&call.inputs);
    fmt.write_str("; ");
    fmt.write_list(&call.outputs);
    fmt.write_str(")");
}
