//! Configuration surface for [`crate::parse_program`].
//!
//! This is the crate's entire configuration layer: a plain struct passed
//! by value, no file or environment-variable loading. That mirrors the
//! scope this crate claims for itself — parsing, CLI wiring, and host
//! integration are all external concerns (see the crate-level docs).

/// Options controlling the optimization pipeline and recursion limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    /// Enable the `rewriteConstantConditionalEdges` pass. Default `false`.
    pub rewrite_constant_conditional_edges: bool,
    /// Enable the `removeTransitNodes` pass. Default `false`.
    pub remove_transit_nodes: bool,
    /// Optional recursion-depth guard; `None` disables it. When set and
    /// exceeded, translation fails with
    /// [`crate::error::FlowError::InputTooDeep`].
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            rewrite_constant_conditional_edges: false,
            remove_transit_nodes: false,
            max_depth: None,
        }
    }
}
