//! flowgraph-core: AST-to-CFG construction engine for ECMAScript-like
//! programs.
//!
//! Given a parsed program ([`ast::Program`]), [`parse_program`] builds one
//! [`graph::ControlFlowGraph`] per lexical function body plus one for the
//! top-level program, propagating completion values (normal / break /
//! continue / return / throw) through every structured-control construct —
//! including `switch` fall-through, labeled jumps, `for-in`/`for-of`
//! lowering, and exception unwinding through nested `finally` blocks — and
//! then runs the optional optimization pipeline described by
//! [`options::ParseOptions`].
//!
//! Lexing/parsing source text into an [`ast::Program`], rendering or
//! serializing the resulting graph for display, and any CLI/host
//! integration are all out of scope — this crate is the construction
//! engine only.

#![allow(dead_code)]

pub mod ast;
pub mod build;
pub mod context;
pub mod error;
pub mod expr;
pub mod graph;
pub mod optimize;
pub mod options;
pub mod preprocess;

pub use build::parse_program;
pub use error::{FlowError, FlowResult};
pub use graph::{ControlFlowGraph, FlowFunction, FlowProgram};
pub use options::ParseOptions;
