//! `rewriteConstantConditionalEdges` (§4.F, opt-in via
//! [`crate::options::ParseOptions::rewrite_constant_conditional_edges`]).
//!
//! A `Conditional` edge whose guard's truthiness is statically known
//! (`if (true) ...`, `while (0) ...`) is either the branch that's always
//! taken or one that's never taken. The always-taken edge becomes a plain
//! `Epsilon`; its siblings at the same source — the branches that can
//! never fire — are dropped.

use crate::expr::constant_truthiness;
use crate::graph::{EdgeKind, FlowGraph};

pub fn rewrite(graph: &mut FlowGraph) {
    for node in graph.node_indices() {
        let edges = graph.out_edges(node);
        let always_taken = edges.iter().copied().find(|&edge| {
            graph
                .edge_weight(edge)
                .filter(|w| w.kind == EdgeKind::Conditional)
                .and_then(|w| w.ast_ref.as_ref())
                .and_then(constant_truthiness)
                == Some(true)
        });

        if let Some(keep) = always_taken {
            let Some((source, target)) = graph.edge_endpoints(keep) else { continue };
            let label = graph.edge_weight(keep).and_then(|w| w.label.clone());
            for edge in &edges {
                if *edge != keep && graph.edge_weight(*edge).map(|w| w.kind) == Some(EdgeKind::Conditional) {
                    graph.remove_edge(*edge);
                }
            }
            graph.remove_edge(keep);
            graph.link(source, target, EdgeKind::Epsilon, label, None);
            continue;
        }

        let never_taken: Vec<_> = edges
            .iter()
            .copied()
            .filter(|&edge| {
                graph
                    .edge_weight(edge)
                    .filter(|w| w.kind == EdgeKind::Conditional)
                    .and_then(|w| w.ast_ref.as_ref())
                    .and_then(constant_truthiness)
                    == Some(false)
            })
            .collect();
        if never_taken.is_empty() {
            continue;
        }
        let survivors: Vec<_> = edges
            .iter()
            .copied()
            .filter(|edge| {
                !never_taken.contains(edge) && graph.edge_weight(*edge).map(|w| w.kind) == Some(EdgeKind::Conditional)
            })
            .collect();
        for edge in never_taken {
            graph.remove_edge(edge);
        }
        for edge in survivors {
            let Some((source, target)) = graph.edge_endpoints(edge) else { continue };
            let label = graph.edge_weight(edge).and_then(|w| w.label.clone());
            graph.remove_edge(edge);
            graph.link(source, target, EdgeKind::Epsilon, label, None);
        }
    }
}
