//! Code formatting for IMP
//!
//! The surface printer renders statements and expressions back into
//! source text. The debugger uses it to echo each step.

pub mod surface;
