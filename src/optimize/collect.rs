//! `collectNodesAndEdges` (§4.F): the pipeline's final stage, materializing
//! the live graph into the public, serializable [`ControlFlowGraph`].

use crate::graph::{ControlFlowGraph, FlowGraph};

pub fn finish(graph: &FlowGraph) -> ControlFlowGraph {
    graph.collect()
}
