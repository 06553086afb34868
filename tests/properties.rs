//! Property-based invariants that should hold for every flow graph this
//! crate produces, regardless of the particular program. Generators build
//! small random statement trees out of a handful of primitive statements;
//! the properties being checked don't depend on what those statements mean,
//! only on graph shape, so the corpus stays deliberately small.

use flowgraph_core::ast::*;
use flowgraph_core::expr::negate_truthiness;
use flowgraph_core::graph::{ControlFlowGraph, EdgeKind, NodeKind};
use flowgraph_core::{parse_program, ParseOptions};
use proptest::prelude::*;

fn ident(name: &str) -> Expression {
    Expression::Identifier { name: name.to_string() }
}

fn call_stmt(name: &str) -> Statement {
    Statement::ExpressionStatement {
        expression: Expression::CallExpression {
            callee: Box::new(ident(name)),
            arguments: vec![],
        },
    }
}

/// A small recursive statement generator: calls, ifs, whiles, breaks,
/// continues, returns, and try/finally, nested a few levels deep.
fn arb_statement() -> impl Strategy<Value = Statement> {
    let leaf = prop_oneof![
        Just(call_stmt("a")),
        Just(call_stmt("b")),
        Just(Statement::BreakStatement { label: None }),
        Just(Statement::ContinueStatement { label: None }),
        Just(Statement::ReturnStatement { argument: None }),
        Just(Statement::EmptyStatement),
    ];

    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), proptest::option::of(inner.clone())).prop_map(|(c, a)| Statement::IfStatement {
                test: ident("cond"),
                consequent: Box::new(c),
                alternate: a.map(Box::new),
            }),
            inner.clone().prop_map(|body| Statement::WhileStatement {
                test: ident("cond"),
                body: Box::new(body),
            }),
            inner.clone().prop_map(|body| Statement::TryStatement {
                block: Box::new(body),
                handler: None,
                finalizer: Some(Box::new(call_stmt("cleanup"))),
            }),
            proptest::collection::vec(inner, 1..4).prop_map(|body| Statement::BlockStatement { body }),
        ]
    })
}

fn arb_program() -> impl Strategy<Value = Program> {
    proptest::collection::vec(arb_statement(), 0..5).prop_map(|body| Program { body })
}

/// A jump whose target isn't on the enclosing stack (e.g. a bare `break`
/// outside any loop/switch) is a legitimate `IllegalJumpTarget` error, not a
/// graph shape violation — callers of these helpers should skip that case.
fn build(program: Program) -> Option<ControlFlowGraph> {
    parse_program(program, ParseOptions::default()).ok().map(|p| p.flow_graph)
}

fn exactly_one_of_each_sentinel(g: &ControlFlowGraph) {
    let count = |kind: NodeKind| g.nodes.iter().filter(|n| n.kind == kind).count();
    assert_eq!(count(NodeKind::Entry), 1);
    assert_eq!(count(NodeKind::SuccessExit), 1);
    assert_eq!(count(NodeKind::ErrorExit), 1);
}

fn no_duplicate_edges(g: &ControlFlowGraph) {
    // `Expression` doesn't derive `Hash`/`Eq` (it carries an `f64`), so this
    // compares pairwise rather than hashing into a set. Test graphs are small.
    for (i, a) in g.edges.iter().enumerate() {
        for b in &g.edges[i + 1..] {
            let same = a.source == b.source && a.target == b.target && a.kind == b.kind && a.ast_ref == b.ast_ref;
            assert!(!same, "duplicate (source, target, kind, ast_ref) edge");
        }
    }
}

fn conditional_edges_pair_up_as_complements(g: &ControlFlowGraph) {
    use std::collections::HashMap;
    let mut by_source: HashMap<u32, Vec<&flowgraph_core::graph::FlowEdgeRecord>> = HashMap::new();
    for e in g.edges.iter().filter(|e| e.kind == EdgeKind::Conditional) {
        by_source.entry(e.source).or_default().push(e);
    }
    for (_, edges) in by_source {
        assert_eq!(edges.len(), 2, "a conditional source should fork into exactly two guarded edges");
        let a = edges[0].ast_ref.as_ref().expect("conditional edge carries a guard");
        let b = edges[1].ast_ref.as_ref().expect("conditional edge carries a guard");
        assert_eq!(&negate_truthiness(a), b);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_graph_has_exactly_one_of_each_sentinel(program in arb_program()) {
        if let Some(g) = build(program) {
            exactly_one_of_each_sentinel(&g);
        }
    }

    #[test]
    fn no_graph_ever_has_a_duplicate_edge(program in arb_program()) {
        if let Some(g) = build(program) {
            no_duplicate_edges(&g);
        }
    }

    #[test]
    fn conditional_siblings_are_always_truthiness_complements(program in arb_program()) {
        if let Some(g) = build(program) {
            conditional_edges_pair_up_as_complements(&g);
        }
    }

    #[test]
    fn building_the_same_program_twice_is_deterministic(program in arb_program()) {
        let a = build(program.clone());
        let b = build(program);
        prop_assert_eq!(a, b);
    }
}
