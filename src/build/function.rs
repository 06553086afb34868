//! Top-level entry point ([`parse_program`]) and nested `FunctionDeclaration`
//! translation (§4.E). A function's body gets its own independent graph —
//! see [`ParsingContext::new_function_body`] — while still sharing id
//! generators and the accumulated function list with the program that
//! declares it.

use super::{parse_statements, Completion};
use crate::ast::{Expression, Pattern, Program, Statement};
use crate::context::{Builder, ParsingContext};
use crate::error::FlowResult;
use crate::graph::{EdgeKind, FlowFunction, FlowProgram, NodeId};
use crate::options::ParseOptions;
use crate::preprocess::preprocess;

/// Translate a whole program: preprocess, build the top-level graph, and
/// collect every nested function's graph alongside it.
pub fn parse_program(program: Program, options: ParseOptions) -> FlowResult<FlowProgram> {
    let span = tracing::debug_span!("parse_program");
    let _enter = span.enter();

    let program = preprocess(program);
    let mut builder = Builder::new(options);
    let mut ctx = ParsingContext::new_program(&mut builder);
    let entry = ctx.graph.entry;
    finish_body(&program.body, entry, &mut ctx, false)?;
    let flow_graph = crate::optimize::run(&mut ctx.graph, ctx.options());
    tracing::debug!(
        nodes = flow_graph.nodes.len(),
        edges = flow_graph.edges.len(),
        functions = builder.functions.len(),
        "finished building top-level flow graph"
    );
    Ok(FlowProgram {
        flow_graph,
        functions: builder.functions,
    })
}

/// A `function` declaration contributes nothing to its enclosing graph
/// (JS hoists declarations — they're not a control-flow step) beyond
/// accumulating its own, separately-built graph.
pub fn parse_function_declaration(
    id: &str,
    _params: &[Pattern],
    body: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
) -> FlowResult<Completion> {
    let fn_id = ctx.create_function_id();
    let span = tracing::debug_span!("parse_function_body", function_id = fn_id, name = id);
    let _enter = span.enter();

    let mut sub = ctx.new_function_body();
    let entry = sub.graph.entry;
    let stmts = match body {
        Statement::BlockStatement { body } => body.as_slice(),
        other => std::slice::from_ref(other),
    };
    finish_body(stmts, entry, &mut sub, true)?;
    let flow_graph = crate::optimize::run(&mut sub.graph, sub.options());
    tracing::debug!(
        nodes = flow_graph.nodes.len(),
        edges = flow_graph.edges.len(),
        "finished building function flow graph"
    );
    sub.builder.functions.push(FlowFunction {
        id: fn_id,
        name: Some(id.to_string()),
        flow_graph,
    });
    Ok(Completion::Normal(current))
}

/// Parse a statement list to completion and wire its implicit "falls off
/// the end" edge into the enclosing graph's success exit — `return
/// undefined` for a function body, a plain fallthrough for the top-level
/// program.
fn finish_body(stmts: &[Statement], entry: NodeId, ctx: &mut ParsingContext, is_function: bool) -> FlowResult<()> {
    let completion = parse_statements(stmts, entry, ctx)?;
    if let Completion::Normal(n) = completion {
        let success_exit = ctx.graph.success_exit;
        if is_function {
            // `undefined` is a global identifier in ECMAScript, not a literal
            // token like `null`/`true`/`false`, so the synthetic astRef takes
            // the same shape a real `return undefined;` would parse to.
            let undefined = Expression::Identifier { name: "undefined".to_string() };
            ctx.link(
                n,
                success_exit,
                EdgeKind::AbruptCompletion,
                Some("return undefined".to_string()),
                Some(undefined),
            );
        } else {
            ctx.link(n, success_exit, EdgeKind::Epsilon, None, None);
        }
    }
    Ok(())
}
