//! Black-box scenario tests against [`flowgraph_core::parse_program`],
//! one per worked example in the design spec: an empty program, an
//! `if`/`else` fork-and-merge, a `while` loop with a `break`, a `switch`
//! with fall-through and a `default`, a `try`/`finally` whose `return`
//! replays the finalizer, and a function body whose implicit
//! `return undefined` edge gets pruned as unreachable.

use flowgraph_core::ast::*;
use flowgraph_core::expr::negate_truthiness;
use flowgraph_core::graph::{ControlFlowGraph, EdgeKind, FlowEdgeRecord, NodeKind};
use flowgraph_core::{parse_program, ParseOptions};

fn ident(name: &str) -> Expression {
    Expression::Identifier { name: name.to_string() }
}

fn num(raw: &str, value: f64) -> Expression {
    Expression::Literal {
        value: LiteralValue::Number(value),
        raw: raw.to_string(),
    }
}

fn call(name: &str) -> Expression {
    Expression::CallExpression {
        callee: Box::new(ident(name)),
        arguments: vec![],
    }
}

fn call_stmt(name: &str) -> Statement {
    Statement::ExpressionStatement { expression: call(name) }
}

fn incoming<'a>(g: &'a ControlFlowGraph, node: u32) -> Vec<&'a FlowEdgeRecord> {
    g.edges.iter().filter(|e| e.target == node).collect()
}

fn outgoing<'a>(g: &'a ControlFlowGraph, node: u32) -> Vec<&'a FlowEdgeRecord> {
    g.edges.iter().filter(|e| e.source == node).collect()
}

/// The unique edge carrying exactly this label; panics if there isn't
/// exactly one (tests are meant to fail loudly on a shape mismatch).
fn edge_labeled<'a>(g: &'a ControlFlowGraph, label: &str) -> &'a FlowEdgeRecord {
    let matches: Vec<_> = g.edges.iter().filter(|e| e.label.as_deref() == Some(label)).collect();
    assert_eq!(matches.len(), 1, "expected exactly one edge labeled {label:?}, found {matches:?}");
    matches[0]
}

#[test]
fn scenario_1_empty_program_is_a_single_epsilon_edge() {
    let program = Program { body: vec![] };
    let flow = parse_program(program, ParseOptions::default()).unwrap();
    let g = &flow.flow_graph;

    assert_eq!(g.nodes.len(), 3, "only entry/successExit/errorExit should remain");
    assert_eq!(g.edges.len(), 1);
    let edge = &g.edges[0];
    assert_eq!(edge.source, g.entry);
    assert_eq!(edge.target, g.success_exit);
    assert_eq!(edge.kind, EdgeKind::Epsilon);

    let kind_of = |id: u32| g.nodes.iter().find(|n| n.id == id).unwrap().kind;
    assert_eq!(kind_of(g.entry), NodeKind::Entry);
    assert_eq!(kind_of(g.success_exit), NodeKind::SuccessExit);
    assert_eq!(kind_of(g.error_exit), NodeKind::ErrorExit);
}

#[test]
fn scenario_2_if_else_forks_by_conditional_and_merges() {
    // if (a) { b(); } else { c(); }
    let program = Program {
        body: vec![Statement::IfStatement {
            test: ident("a"),
            consequent: Box::new(Statement::BlockStatement { body: vec![call_stmt("b")] }),
            alternate: Some(Box::new(Statement::BlockStatement { body: vec![call_stmt("c")] })),
        }],
    };
    let flow = parse_program(program, ParseOptions::default()).unwrap();
    let g = &flow.flow_graph;

    let entry_out = outgoing(g, g.entry);
    assert_eq!(entry_out.len(), 2, "entry forks into exactly two branches");
    assert!(entry_out.iter().all(|e| e.kind == EdgeKind::Conditional));
    let guard_a = entry_out[0].ast_ref.clone().unwrap();
    let guard_b = entry_out[1].ast_ref.clone().unwrap();
    assert_eq!(negate_truthiness(&guard_a), guard_b, "the two guards are truthiness complements");

    let b_edge = edge_labeled(g, "b()");
    let c_edge = edge_labeled(g, "c()");
    let b_out = outgoing(g, b_edge.target);
    let c_out = outgoing(g, c_edge.target);
    assert_eq!(b_out.len(), 1);
    assert_eq!(c_out.len(), 1);
    assert_eq!(b_out[0].kind, EdgeKind::Epsilon);
    assert_eq!(c_out[0].kind, EdgeKind::Epsilon);
    assert_eq!(b_out[0].target, c_out[0].target, "both branches merge at a single node");

    let merge = b_out[0].target;
    assert_eq!(incoming(g, merge).len(), 2);
    let merge_out = outgoing(g, merge);
    assert_eq!(merge_out.len(), 1);
    assert_eq!(merge_out[0].target, g.success_exit);
}

#[test]
fn scenario_3_break_in_while_skips_the_loop_back_edge() {
    // while (x) { if (y) break; }
    let program = Program {
        body: vec![Statement::WhileStatement {
            test: ident("x"),
            body: Box::new(Statement::BlockStatement {
                body: vec![Statement::IfStatement {
                    test: ident("y"),
                    consequent: Box::new(Statement::BreakStatement { label: None }),
                    alternate: None,
                }],
            }),
        }],
    };
    let flow = parse_program(program, ParseOptions::default()).unwrap();
    let g = &flow.flow_graph;

    // The loop's final node is reached two ways: the `!x` loop-exit guard,
    // and the break's abrupt edge. Nothing else in this program has two
    // incoming edges, so it's identifiable by that alone.
    let final_node = g
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Normal && incoming(g, n.id).len() == 2)
        .expect("loop's final node should have two incoming edges")
        .id;

    let in_edges = incoming(g, final_node);
    let kinds: Vec<EdgeKind> = in_edges.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&EdgeKind::Conditional));
    assert!(kinds.contains(&EdgeKind::AbruptCompletion));
    let break_edge = in_edges.iter().find(|e| e.kind == EdgeKind::AbruptCompletion).unwrap();
    assert_eq!(break_edge.label.as_deref(), Some("break"));

    // The break site itself has no epsilon fallthrough back to the loop head.
    let break_site_out = outgoing(g, break_edge.source);
    assert_eq!(break_site_out.len(), 1);
    assert_eq!(break_site_out[0].kind, EdgeKind::AbruptCompletion);
}

#[test]
fn scenario_4_switch_falls_through_and_default_falls_to_final() {
    // switch (k) { case 1: a(); case 2: b(); break; default: c(); }
    let program = Program {
        body: vec![Statement::SwitchStatement {
            discriminant: ident("k"),
            cases: vec![
                SwitchCase {
                    test: Some(num("1", 1.0)),
                    consequent: vec![call_stmt("a")],
                },
                SwitchCase {
                    test: Some(num("2", 2.0)),
                    consequent: vec![call_stmt("b"), Statement::BreakStatement { label: None }],
                },
                SwitchCase {
                    test: None,
                    consequent: vec![call_stmt("c")],
                },
            ],
        }],
    };
    let flow = parse_program(program, ParseOptions::default()).unwrap();
    let g = &flow.flow_graph;

    let a_edge = edge_labeled(g, "a()");
    let a_out = outgoing(g, a_edge.target);
    assert_eq!(a_out.len(), 1, "case 1's body falls through to case 2 by a single edge");
    assert_eq!(a_out[0].kind, EdgeKind::Epsilon);
    assert!(a_out[0].label.is_none());
    let case2_entry = a_out[0].target;
    assert!(
        incoming(g, case2_entry).iter().any(|e| e.kind == EdgeKind::Conditional),
        "case 2's entry is also reachable directly by the discriminant test"
    );

    let b_edge = edge_labeled(g, "b()");
    let b_out = outgoing(g, b_edge.target);
    assert_eq!(b_out.len(), 1, "the break after b() replaces fall-through to default");
    assert_eq!(b_out[0].kind, EdgeKind::AbruptCompletion);
    assert_eq!(b_out[0].label.as_deref(), Some("break"));
    let final_node = b_out[0].target;

    let c_edge = edge_labeled(g, "c()");
    let c_out = outgoing(g, c_edge.target);
    assert_eq!(c_out.len(), 1, "default is last in source order, so it falls to the final node");
    assert_eq!(c_out[0].kind, EdgeKind::Epsilon);
    assert_eq!(c_out[0].target, final_node);
}

#[test]
fn scenario_5_return_in_try_finally_replays_a_fresh_finalizer_copy() {
    // function f() { try { return 1; } finally { log(); } }
    let program = Program {
        body: vec![Statement::FunctionDeclaration {
            id: "f".to_string(),
            params: vec![],
            body: Box::new(Statement::BlockStatement {
                body: vec![Statement::TryStatement {
                    block: Box::new(Statement::BlockStatement {
                        body: vec![Statement::ReturnStatement { argument: Some(num("1", 1.0)) }],
                    }),
                    handler: None,
                    finalizer: Some(Box::new(Statement::BlockStatement { body: vec![call_stmt("log")] })),
                }],
            }),
        }],
    };
    let flow = parse_program(program, ParseOptions::default()).unwrap();
    assert_eq!(flow.functions.len(), 1);
    let g = &flow.functions[0].flow_graph;

    let log_edges: Vec<_> = g.edges.iter().filter(|e| e.label.as_deref() == Some("log()")).collect();
    assert_eq!(log_edges.len(), 1, "only one exit passes through the finally, so only one copy exists");
    let log_out = outgoing(g, log_edges[0].target);
    assert_eq!(log_out.len(), 1);
    assert_eq!(log_out[0].kind, EdgeKind::AbruptCompletion);
    assert_eq!(log_out[0].label.as_deref(), Some("return 1"));
    assert_eq!(log_out[0].target, g.success_exit);
}

#[test]
fn scenario_6_unreachable_implicit_return_is_pruned_after_constant_folding() {
    // function f() { while (true) { continue; } }
    let program = Program {
        body: vec![Statement::FunctionDeclaration {
            id: "f".to_string(),
            params: vec![],
            body: Box::new(Statement::BlockStatement {
                body: vec![Statement::WhileStatement {
                    test: Expression::Literal {
                        value: LiteralValue::Bool(true),
                        raw: "true".to_string(),
                    },
                    body: Box::new(Statement::ContinueStatement { label: None }),
                }],
            }),
        }],
    };
    let options = ParseOptions {
        rewrite_constant_conditional_edges: true,
        ..Default::default()
    };
    let flow = parse_program(program, options).unwrap();
    assert_eq!(flow.functions.len(), 1);
    let g = &flow.functions[0].flow_graph;

    assert!(
        g.edges.iter().all(|e| e.target != g.success_exit),
        "the implicit `return undefined` edge should have been pruned as unreachable"
    );

    let entry_out = outgoing(g, g.entry);
    assert_eq!(entry_out.len(), 1, "the always-false branch was dropped by constant folding");
    assert_eq!(entry_out[0].kind, EdgeKind::Epsilon);
    let loop_body = entry_out[0].target;

    let continue_edge = edge_labeled(g, "continue");
    assert_eq!(continue_edge.source, loop_body);
    assert_eq!(continue_edge.target, g.entry);
}
