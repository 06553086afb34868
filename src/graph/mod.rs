//! Graph model: nodes, edges, and the per-graph registry that the
//! construction engine (`crate::build`) and the optimization passes
//! (`crate::optimize`) both build on.
//!
//! The live graph is backed by [`petgraph::stable_graph::StableDiGraph`]:
//! unlike the plain `Graph`, removing a node never renumbers its
//! neighbors, which is what lets [`FlowNode::id`] stay stable across the
//! optimization pipeline (§3 Lifecycle in the design notes) while still
//! getting petgraph's adjacency-list traversal for free.

pub mod edge;

pub use edge::EdgeKind;

use crate::ast::Expression;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};

/// Handle to a node inside a single [`FlowGraph`]. Stable for the lifetime
/// of that graph, including across node removal during optimization.
pub type NodeId = petgraph::stable_graph::NodeIndex<u32>;
/// Handle to an edge inside a single [`FlowGraph`].
pub type EdgeId = petgraph::stable_graph::EdgeIndex<u32>;

/// Classification of a [`FlowNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Entry,
    SuccessExit,
    ErrorExit,
    Normal,
}

/// A vertex in a flow graph: a point between statements/expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Stable integer id, assigned in creation order and never reused.
    pub id: u32,
    pub kind: NodeKind,
}

/// A directed edge between two [`FlowNode`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub kind: EdgeKind,
    /// Display label, usually `stringify(ast_ref)` or a synthetic string
    /// such as `"break"` / `"return undefined"`.
    pub label: Option<String>,
    /// The surface expression that justifies a `Conditional` or
    /// `AbruptCompletion` edge. Unused for `Epsilon`.
    pub ast_ref: Option<Expression>,
}

impl FlowEdge {
    fn matches(&self, other_kind: EdgeKind, other_ast_ref: &Option<Expression>) -> bool {
        self.kind == other_kind && &self.ast_ref == other_ast_ref
    }
}

/// A single function's (or the top-level program's) live, mutable flow
/// graph under construction.
///
/// Exactly one `Entry`, one `SuccessExit`, and one `ErrorExit` node exist
/// for the lifetime of a `FlowGraph`; they are created up front and never
/// removed by the optimization passes, even if they end up unreachable
/// (see `crate::optimize::unreachable`).
pub struct FlowGraph {
    inner: StableDiGraph<FlowNode, FlowEdge, u32>,
    pub entry: NodeId,
    pub success_exit: NodeId,
    pub error_exit: NodeId,
    next_id: u32,
}

impl FlowGraph {
    /// Create a fresh graph with its three sentinel nodes already in place.
    pub fn new(next_id: &mut u32) -> Self {
        let mut inner: StableDiGraph<FlowNode, FlowEdge, u32> = StableDiGraph::default();
        let entry = inner.add_node(FlowNode {
            id: Self::take_id(next_id),
            kind: NodeKind::Entry,
        });
        let success_exit = inner.add_node(FlowNode {
            id: Self::take_id(next_id),
            kind: NodeKind::SuccessExit,
        });
        let error_exit = inner.add_node(FlowNode {
            id: Self::take_id(next_id),
            kind: NodeKind::ErrorExit,
        });
        FlowGraph {
            inner,
            entry,
            success_exit,
            error_exit,
            next_id: *next_id,
        }
    }

    fn take_id(next_id: &mut u32) -> u32 {
        let id = *next_id;
        *next_id += 1;
        id
    }

    /// Allocate a new `Normal` node. `next_id` is the context's shared id
    /// generator so ids stay unique across every function's graph.
    pub fn create_node(&mut self, next_id: &mut u32) -> NodeId {
        let id = Self::take_id(next_id);
        self.next_id = *next_id;
        self.inner.add_node(FlowNode {
            id,
            kind: NodeKind::Normal,
        })
    }

    pub fn node_id(&self, node: NodeId) -> u32 {
        self.inner[node].id
    }

    pub fn node_kind(&self, node: NodeId) -> NodeKind {
        self.inner[node].kind
    }

    /// Link `source` to `target`, collapsing the edge into an existing one
    /// with identical `(source, target, kind, ast_ref)` rather than adding a
    /// duplicate parallel edge.
    pub fn link(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        label: Option<String>,
        ast_ref: Option<Expression>,
    ) -> EdgeId {
        let existing = self
            .inner
            .edges_directed(source, petgraph::Direction::Outgoing)
            .find(|e| e.target() == target && e.weight().matches(kind, &ast_ref))
            .map(|e| e.id());
        if let Some(id) = existing {
            return id;
        }
        self.inner.add_edge(source, target, FlowEdge { kind, label, ast_ref })
    }

    /// Create a new `Normal` node and link `source` to it. Returns the new
    /// node so callers can chain further statements from it.
    pub fn append_to(
        &mut self,
        source: NodeId,
        label: Option<String>,
        kind: EdgeKind,
        ast_ref: Option<Expression>,
        next_id: &mut u32,
    ) -> NodeId {
        let target = self.create_node(next_id);
        self.link(source, target, kind, label, ast_ref);
        target
    }

    /// Unconditional, unlabeled edge between two already-existing nodes.
    pub fn append_epsilon_edge_to(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.link(source, target, EdgeKind::Epsilon, None, None)
    }

    /// Create a new `Normal` node reached from `source` by a `Conditional`
    /// edge guarded by `ast_ref`, labeled with its stringification.
    pub fn append_conditionally_to(
        &mut self,
        source: NodeId,
        label: String,
        ast_ref: Expression,
        next_id: &mut u32,
    ) -> NodeId {
        self.append_to(source, Some(label), EdgeKind::Conditional, Some(ast_ref), next_id)
    }

    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.neighbors_directed(node, petgraph::Direction::Outgoing)
    }

    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.neighbors_directed(node, petgraph::Direction::Incoming)
    }

    pub fn out_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.inner
            .edges_directed(node, petgraph::Direction::Outgoing)
            .map(|e| e.id())
            .collect()
    }

    pub fn in_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.inner
            .edges_directed(node, petgraph::Direction::Incoming)
            .map(|e| e.id())
            .collect()
    }

    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.inner.edge_endpoints(edge)
    }

    pub fn edge_weight(&self, edge: EdgeId) -> Option<&FlowEdge> {
        self.inner.edge_weight(edge)
    }

    pub fn node_indices(&self) -> Vec<NodeId> {
        self.inner.node_indices().collect()
    }

    pub fn remove_node(&mut self, node: NodeId) {
        self.inner.remove_node(node);
    }

    pub fn remove_edge(&mut self, edge: EdgeId) {
        self.inner.remove_edge(edge);
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.inner.node_weight(node).is_some()
    }

    /// Traverse depth-first from `entry`, stamping the visit onto a fresh
    /// [`ControlFlowGraph`] in BFS order with ties broken by node id — the
    /// deterministic order `collectNodesAndEdges` (§4.F) requires.
    pub fn collect(&self) -> ControlFlowGraph {
        use std::collections::{BTreeMap, VecDeque};

        let mut visited = std::collections::HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.entry);
        visited.insert(self.entry);

        while let Some(node) = queue.pop_front() {
            order.push(node);
            let mut next: Vec<NodeId> = self.successors(node).collect();
            next.sort_by_key(|&n| self.node_id(n));
            for succ in next {
                if visited.insert(succ) {
                    queue.push_back(succ);
                }
            }
        }

        // entry/success_exit/error_exit are retained unconditionally even
        // if unreachable (see optimize::unreachable).
        for sentinel in [self.entry, self.success_exit, self.error_exit] {
            if visited.insert(sentinel) {
                order.push(sentinel);
            }
        }

        let nodes: Vec<FlowNode> = order.iter().map(|&n| self.inner[n].clone()).collect();

        let mut id_for = BTreeMap::new();
        for &n in &order {
            id_for.insert(n, self.node_id(n));
        }

        let mut edges = Vec::new();
        for &n in &order {
            let mut out: Vec<_> = self
                .inner
                .edges_directed(n, petgraph::Direction::Outgoing)
                .collect();
            out.sort_by_key(|e| self.node_id(e.target()));
            for e in out {
                edges.push(FlowEdgeRecord {
                    source: self.node_id(n),
                    target: self.node_id(e.target()),
                    kind: e.weight().kind,
                    label: e.weight().label.clone(),
                    ast_ref: e.weight().ast_ref.clone(),
                });
            }
        }

        ControlFlowGraph {
            entry: self.node_id(self.entry),
            success_exit: self.node_id(self.success_exit),
            error_exit: self.node_id(self.error_exit),
            nodes,
            edges,
        }
    }
}

use petgraph::visit::EdgeRef;

/// A self-contained directed edge in a finished, collected graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdgeRecord {
    pub source: u32,
    pub target: u32,
    pub kind: EdgeKind,
    pub label: Option<String>,
    pub ast_ref: Option<Expression>,
}

/// The finished output of building and optimizing one function body (or the
/// top-level program).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub entry: u32,
    pub success_exit: u32,
    pub error_exit: u32,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdgeRecord>,
}

/// One user-defined function and its graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowFunction {
    pub id: u32,
    pub name: Option<String>,
    pub flow_graph: ControlFlowGraph,
}

/// The complete output of [`crate::parse_program`]: the top-level graph
/// plus one graph per nested function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowProgram {
    pub flow_graph: ControlFlowGraph,
    pub functions: Vec<FlowFunction>,
}
