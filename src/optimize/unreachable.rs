//! `removeUnreachableNodes` (§4.F): prune every node (and its incident
//! edges) not reachable from `entry`.
//!
//! `entry`, `successExit`, and `errorExit` are never pruned, even when
//! unreachable themselves — a function whose body never falls through
//! (e.g. an unconditional infinite loop) still reports exactly one of
//! each sentinel, per the graph's lifecycle invariant.

use crate::graph::FlowGraph;
use std::collections::HashSet;

pub fn remove_unreachable(graph: &mut FlowGraph) {
    let mut visited = HashSet::new();
    let mut stack = vec![graph.entry];
    visited.insert(graph.entry);
    while let Some(node) = stack.pop() {
        for succ in graph.successors(node).collect::<Vec<_>>() {
            if visited.insert(succ) {
                stack.push(succ);
            }
        }
    }

    let sentinels = [graph.entry, graph.success_exit, graph.error_exit];
    let dead: Vec<_> = graph
        .node_indices()
        .into_iter()
        .filter(|n| !visited.contains(n) && !sentinels.contains(n))
        .collect();

    // A handful of pruned nodes is routine (an unconditional `return`
    // leaving a trailing sibling statement dead, say); a larger chunk more
    // often means a whole branch of the source AST never connected to
    // anything reachable, which is worth a downstream caller's attention.
    if dead.len() > 8 {
        tracing::warn!(pruned = dead.len(), "removeUnreachableNodes pruned a large portion of the graph");
    }

    for node in dead {
        graph.remove_node(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

    #[test]
    fn prunes_nodes_unreachable_from_entry_but_keeps_sentinels() {
        let mut next_id = 0u32;
        let mut graph = FlowGraph::new(&mut next_id);
        let orphan = graph.create_node(&mut next_id);
        let another = graph.create_node(&mut next_id);
        graph.link(orphan, another, EdgeKind::Epsilon, None, None);

        remove_unreachable(&mut graph);

        assert!(!graph.contains_node(orphan));
        assert!(!graph.contains_node(another));
        assert!(graph.contains_node(graph.entry));
        assert!(graph.contains_node(graph.success_exit));
        assert!(graph.contains_node(graph.error_exit));
    }
}
