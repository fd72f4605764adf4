use std::fmt;

/// How a statement finished. Every statement evaluation yields one and
/// sequences and loops inspect it before going on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Normal,
    /// Leave the nearest enclosing loop
    BreakLoop,
    /// Stop the whole run
    Abort,
}

/// The result of a bare expression submitted as a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Boolean(true) => write!(f, "tt"),
            Value::Boolean(false) => write!(f, "ff"),
        }
    }
}
