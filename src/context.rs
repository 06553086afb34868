//! Parsing context: per-function construction state, and the
//! process-wide generators and function accumulator shared across every
//! nested function's subcontext.

use crate::ast::CatchClause;
use crate::ast::Expression;
use crate::ast::Statement;
use crate::error::{FlowError, FlowResult};
use crate::graph::{EdgeId, EdgeKind, FlowFunction, FlowGraph, NodeId};
use crate::options::ParseOptions;

/// State shared across an entire program build: the id generators (so ids
/// stay unique across every function's graph), the accumulator of
/// translated functions, and the configured options.
pub struct Builder {
    pub functions: Vec<FlowFunction>,
    next_node_id: u32,
    next_function_id: u32,
    next_temp_id: u32,
    pub options: ParseOptions,
}

impl Builder {
    pub fn new(options: ParseOptions) -> Self {
        Builder {
            functions: Vec::new(),
            next_node_id: 0,
            next_function_id: 0,
            next_temp_id: 0,
            options,
        }
    }
}

/// A `TryStatement` frame's extra bookkeeping (§3 `EnclosingStatement`).
pub struct TryFrame {
    pub handler: Option<CatchClause>,
    pub handler_body_entry: Option<NodeId>,
    /// A clone of the `finally` block's AST, re-translated into a fresh
    /// subgraph every time it must be replayed (see `build::try_stmt`).
    pub finalizer: Option<Statement>,
    pub in_try_block: bool,
    pub in_finalizer: bool,
}

/// Discriminates the two shapes of stack frame (§3).
pub enum FrameKind {
    OtherStatement,
    TryStatement(TryFrame),
}

/// A frame on the parsing context's enclosing-statement stack: a construct
/// that may be the target of a non-local exit.
pub struct EnclosingStatement {
    pub kind: FrameKind,
    pub label: Option<String>,
    pub break_target: Option<NodeId>,
    pub continue_target: Option<NodeId>,
}

impl EnclosingStatement {
    pub fn other(label: Option<String>, break_target: Option<NodeId>, continue_target: Option<NodeId>) -> Self {
        EnclosingStatement {
            kind: FrameKind::OtherStatement,
            label,
            break_target,
            continue_target,
        }
    }

    pub fn try_frame(label: Option<String>, try_frame: TryFrame) -> Self {
        EnclosingStatement {
            kind: FrameKind::TryStatement(try_frame),
            label,
            break_target: None,
            continue_target: None,
        }
    }

    pub fn is_try(&self) -> bool {
        matches!(self.kind, FrameKind::TryStatement(_))
    }
}

/// Per-function translation state: the graph currently being built plus
/// the enclosing-statement stack. A function body gets a fresh,
/// independent `ParsingContext` (its own empty stack — functions break the
/// outer loop/try scope) that still shares the id generators and the
/// `functions` accumulator through `builder`.
pub struct ParsingContext<'b> {
    pub builder: &'b mut Builder,
    pub graph: FlowGraph,
    pub enclosing: Vec<EnclosingStatement>,
    depth: usize,
}

impl<'b> ParsingContext<'b> {
    pub fn new_program(builder: &'b mut Builder) -> Self {
        let graph = FlowGraph::new(&mut builder.next_node_id);
        ParsingContext {
            builder,
            graph,
            enclosing: Vec::new(),
            depth: 0,
        }
    }

    /// Start a subcontext for a nested function body: fresh graph, fresh
    /// (empty) enclosing-statement stack, same generators/accumulator.
    pub fn new_function_body<'c>(&'c mut self) -> ParsingContext<'c> {
        let builder: &'c mut Builder = &mut *self.builder;
        let graph = FlowGraph::new(&mut builder.next_node_id);
        let depth = self.depth;
        ParsingContext {
            builder,
            graph,
            enclosing: Vec::new(),
            depth,
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.builder.options
    }

    pub fn create_node(&mut self) -> NodeId {
        self.graph.create_node(&mut self.builder.next_node_id)
    }

    /// Create a new `Normal` node and link `source` to it, returning the
    /// new node for chaining (§4.A `appendTo`).
    pub fn append_to(
        &mut self,
        source: NodeId,
        label: Option<String>,
        kind: EdgeKind,
        ast_ref: Option<Expression>,
    ) -> NodeId {
        self.graph.append_to(source, label, kind, ast_ref, &mut self.builder.next_node_id)
    }

    /// Unconditional, unlabeled edge between two already-existing nodes
    /// (§4.A `appendEpsilonEdgeTo`).
    pub fn append_epsilon_edge_to(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.graph.append_epsilon_edge_to(source, target)
    }

    /// Link two already-existing nodes with an arbitrary edge kind —
    /// used when both endpoints were allocated ahead of time (loop
    /// headers, merge points, abrupt-completion targets).
    pub fn link(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        label: Option<String>,
        ast_ref: Option<Expression>,
    ) -> EdgeId {
        self.graph.link(source, target, kind, label, ast_ref)
    }

    /// New `Normal` node reached from `source` by a `Conditional` edge
    /// guarded by `ast_ref`, labeled with `label` (§4.A
    /// `appendConditionallyTo`).
    pub fn append_conditionally_to(&mut self, source: NodeId, label: String, ast_ref: Expression) -> NodeId {
        self.graph
            .append_conditionally_to(source, label, ast_ref, &mut self.builder.next_node_id)
    }

    /// `$$temp1`, `$$iter2`, ... — a hint only changes the readability of
    /// debugging output, not uniqueness (the counter is global).
    pub fn create_temporary_local_variable_name(&mut self, hint: Option<&str>) -> String {
        self.builder.next_temp_id += 1;
        match hint {
            Some(hint) => format!("$${hint}{}", self.builder.next_temp_id),
            None => format!("$$temp{}", self.builder.next_temp_id),
        }
    }

    pub fn create_function_id(&mut self) -> u32 {
        let id = self.builder.next_function_id;
        self.builder.next_function_id += 1;
        id
    }

    pub fn push_frame(&mut self, frame: EnclosingStatement) {
        self.enclosing.push(frame);
    }

    pub fn pop_frame(&mut self) -> EnclosingStatement {
        self.enclosing.pop().expect("balanced push/pop of enclosing frames")
    }

    /// Recursion-depth guard backing `max_depth`; call on entry to every
    /// statement/expression translator and release on the way back out.
    pub fn enter(&mut self) -> FlowResult<()> {
        self.depth += 1;
        if let Some(limit) = self.options().max_depth {
            if self.depth > limit {
                tracing::warn!(depth = self.depth, limit, "input exceeded max recursion depth");
                return Err(FlowError::InputTooDeep { limit });
            }
        }
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth -= 1;
    }
}
