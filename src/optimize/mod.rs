//! The optimization pipeline (§4.F): an optional constant-folding pass over
//! conditional edges, unreachable-node pruning, an optional transit-node
//! elision pass, and final deterministic collection into the public
//! [`ControlFlowGraph`].

pub mod collect;
pub mod constant_conditional;
pub mod transit;
pub mod unreachable;

use crate::graph::{ControlFlowGraph, FlowGraph};
use crate::options::ParseOptions;

/// Run every configured pass over a freshly built graph and materialize it.
pub fn run(graph: &mut FlowGraph, options: ParseOptions) -> ControlFlowGraph {
    if options.rewrite_constant_conditional_edges {
        constant_conditional::rewrite(graph);
    }
    unreachable::remove_unreachable(graph);
    if options.remove_transit_nodes {
        transit::remove_transit_nodes(graph);
    }
    collect::finish(graph)
}
