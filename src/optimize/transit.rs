//! `removeTransitNodes` (§4.F, opt-in via
//! [`crate::options::ParseOptions::remove_transit_nodes`]).
//!
//! A transit node — exactly one incoming and one outgoing edge, both
//! `Epsilon` — carries no branching information of its own; splicing it
//! out and linking its predecessor straight to its successor shrinks the
//! graph without changing what it means. Never applied to a sentinel node.

use crate::graph::{EdgeKind, FlowGraph, NodeKind};

pub fn remove_transit_nodes(graph: &mut FlowGraph) {
    loop {
        let mut changed = false;
        for node in graph.node_indices() {
            if graph.node_kind(node) != NodeKind::Normal {
                continue;
            }
            let in_edges = graph.in_edges(node);
            let out_edges = graph.out_edges(node);
            if in_edges.len() != 1 || out_edges.len() != 1 {
                continue;
            }
            let (Some(in_weight), Some(out_weight)) =
                (graph.edge_weight(in_edges[0]).cloned(), graph.edge_weight(out_edges[0]).cloned())
            else {
                continue;
            };
            if in_weight.kind != EdgeKind::Epsilon || out_weight.kind != EdgeKind::Epsilon {
                continue;
            }
            let Some((pred, _)) = graph.edge_endpoints(in_edges[0]) else { continue };
            let Some((_, succ)) = graph.edge_endpoints(out_edges[0]) else { continue };
            if pred == node || succ == node {
                continue;
            }

            let label = match (in_weight.label, out_weight.label) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(format!("{a}; {b}")),
            };
            graph.remove_node(node);
            graph.link(pred, succ, EdgeKind::Epsilon, label, None);
            changed = true;
        }
        if !changed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splices_out_a_single_in_single_out_epsilon_node() {
        let mut next_id = 0u32;
        let mut graph = FlowGraph::new(&mut next_id);
        let entry = graph.entry;
        let mid = graph.append_to(entry, Some("a".to_string()), EdgeKind::Epsilon, None, &mut next_id);
        let exit = graph.success_exit;
        graph.link(mid, exit, EdgeKind::Epsilon, Some("b".to_string()), None);

        remove_transit_nodes(&mut graph);

        assert!(!graph.contains_node(mid));
        let out = graph.out_edges(entry);
        assert_eq!(out.len(), 1);
        assert_eq!(graph.edge_weight(out[0]).unwrap().label.as_deref(), Some("a; b"));
    }

    #[test]
    fn leaves_branch_points_alone() {
        let mut next_id = 0u32;
        let mut graph = FlowGraph::new(&mut next_id);
        let entry = graph.entry;
        let a = graph.append_to(entry, None, EdgeKind::Epsilon, None, &mut next_id);
        let _b = graph.append_to(entry, None, EdgeKind::Epsilon, None, &mut next_id);
        remove_transit_nodes(&mut graph);
        assert!(graph.contains_node(a));
    }
}
