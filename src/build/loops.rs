//! `while`, `do-while`, `for`, and `for-in`/`for-of` translation (§4.E).
//!
//! Every loop pushes an [`EnclosingStatement`] frame before its body and
//! pops it on the way out, so `break`/`continue` (with or without a label)
//! resolve against the right targets regardless of nesting depth.

use super::{parse_statement, Completion};
use crate::ast::{Expression, ForHead, ForInit, Statement};
use crate::context::{EnclosingStatement, ParsingContext};
use crate::error::FlowResult;
use crate::expr::{negate_truthiness, stringify};
use crate::graph::{EdgeKind, NodeId};

/// `while (test) body`.
///
/// `current` doubles as the loop header: the body's normal completion loops
/// back to it by a plain epsilon edge, and the two `Conditional` edges
/// (`test`, `!test`) both originate from it.
pub fn parse_while(
    test: &Expression,
    body: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
) -> FlowResult<Completion> {
    let loop_body = ctx.append_conditionally_to(current, stringify(test), test.clone());
    let final_node = ctx.append_conditionally_to(current, stringify(&negate_truthiness(test)), negate_truthiness(test));

    ctx.push_frame(EnclosingStatement::other(
        label.map(str::to_string),
        Some(final_node),
        Some(current),
    ));
    let body_completion = parse_statement(body, loop_body, ctx, None);
    ctx.pop_frame();

    if let Completion::Normal(n) = body_completion? {
        ctx.append_epsilon_edge_to(n, current);
    }
    Ok(Completion::Normal(final_node))
}

/// `do body while (test)`.
///
/// The body always runs once before the test is first checked, so `current`
/// is reused directly as the body's entry; `continue` targets the test
/// node, not the body entry.
pub fn parse_do_while(
    body: &Statement,
    test: &Expression,
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
) -> FlowResult<Completion> {
    let test_node = ctx.create_node();
    let final_node = ctx.create_node();

    ctx.push_frame(EnclosingStatement::other(
        label.map(str::to_string),
        Some(final_node),
        Some(test_node),
    ));
    let body_completion = parse_statement(body, current, ctx, None);
    ctx.pop_frame();

    if let Completion::Normal(n) = body_completion? {
        ctx.append_epsilon_edge_to(n, test_node);
    }
    ctx.link(test_node, current, EdgeKind::Conditional, Some(stringify(test)), Some(test.clone()));
    ctx.link(
        test_node,
        final_node,
        EdgeKind::Conditional,
        Some(stringify(&negate_truthiness(test))),
        Some(negate_truthiness(test)),
    );
    Ok(Completion::Normal(final_node))
}

/// `for ([init]; [test]; [update]) body`.
///
/// A missing `test` falls through to the body unconditionally rather than
/// synthesizing a constant-`true` guard — `finalNode` is then only ever
/// reached through a `break`.
pub fn parse_for(
    init: Option<&ForInit>,
    test: Option<&Expression>,
    update: Option<&Expression>,
    body: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
) -> FlowResult<Completion> {
    let after_init = match init {
        Some(ForInit::VariableDeclaration(decl)) => {
            super::parse_statement_as_variable_declaration(decl, current, ctx)
        }
        Some(ForInit::Expression(expr)) => ctx.append_to(current, Some(stringify(expr)), EdgeKind::Epsilon, Some(expr.clone())),
        None => current,
    };

    let test_node = ctx.create_node();
    ctx.append_epsilon_edge_to(after_init, test_node);

    let (loop_body, final_node) = match test {
        Some(test) => {
            let body_entry = ctx.append_conditionally_to(test_node, stringify(test), test.clone());
            let exit = ctx.append_conditionally_to(
                test_node,
                stringify(&negate_truthiness(test)),
                negate_truthiness(test),
            );
            (body_entry, exit)
        }
        None => {
            let body_entry = ctx.append_to(test_node, None, EdgeKind::Epsilon, None);
            let exit = ctx.create_node();
            (body_entry, exit)
        }
    };

    let update_node = ctx.create_node();
    ctx.push_frame(EnclosingStatement::other(
        label.map(str::to_string),
        Some(final_node),
        Some(update_node),
    ));
    let body_completion = parse_statement(body, loop_body, ctx, None);
    ctx.pop_frame();

    if let Completion::Normal(n) = body_completion? {
        ctx.append_epsilon_edge_to(n, update_node);
    }
    match update {
        Some(update) => {
            ctx.link(
                update_node,
                test_node,
                EdgeKind::Epsilon,
                Some(stringify(update)),
                Some(update.clone()),
            );
        }
        None => {
            ctx.append_epsilon_edge_to(update_node, test_node);
        }
    }
    Ok(Completion::Normal(final_node))
}

/// `for (left in right) body` / `for (left of right) body`.
///
/// The iteration protocol itself (has the iterator produced another value?)
/// has no surface expression to label a `Conditional` edge with, so the two
/// edges leaving the head node carry a synthetic label and no `ast_ref`.
/// `for-of` additionally allocates a synthetic iterator temp — its creation
/// becomes the head node's incoming edge label — and, once inside the loop,
/// a per-iteration node binds the loop variable to `temp.next().value`
/// before the body itself is translated; `for-in` binds from a synthetic
/// `<next>` placeholder since it never materializes an iterator object.
pub fn parse_for_in_of(
    left: &ForHead,
    right: &Expression,
    body: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
    is_of: bool,
) -> FlowResult<Completion> {
    let binding = match left {
        ForHead::VariableDeclaration(decl) => decl
            .declarations
            .first()
            .map(|d| d.id.name().to_string())
            .unwrap_or_default(),
        ForHead::Pattern(pat) => pat.name().to_string(),
    };

    let (head, iter_temp) = if is_of {
        let temp = ctx.create_temporary_local_variable_name(Some("iter"));
        let iterator_call = symbol_iterator_call(right);
        let node = ctx.append_to(
            current,
            Some(format!("{temp} = {}", stringify(&iterator_call))),
            EdgeKind::Epsilon,
            Some(iterator_call),
        );
        (node, Some(temp))
    } else {
        let node = ctx.append_to(
            current,
            Some(format!("for ({binding} in {})", stringify(right))),
            EdgeKind::Epsilon,
            Some(right.clone()),
        );
        (node, None)
    };

    let begin_body = ctx.create_node();
    let final_node = ctx.create_node();
    ctx.link(head, begin_body, EdgeKind::Conditional, Some("has next".to_string()), None);
    ctx.link(head, final_node, EdgeKind::Conditional, Some("done".to_string()), None);

    let loop_body = match &iter_temp {
        Some(temp) => {
            let next_value = iterator_next_value(temp);
            ctx.append_to(
                begin_body,
                Some(format!("{binding} = {}", stringify(&next_value))),
                EdgeKind::Epsilon,
                Some(next_value),
            )
        }
        None => ctx.append_to(begin_body, Some(format!("{binding} = <next>")), EdgeKind::Epsilon, None),
    };

    ctx.push_frame(EnclosingStatement::other(
        label.map(str::to_string),
        Some(final_node),
        Some(head),
    ));
    let body_completion = parse_statement(body, loop_body, ctx, None);
    ctx.pop_frame();

    if let Completion::Normal(n) = body_completion? {
        ctx.append_epsilon_edge_to(n, head);
    }
    Ok(Completion::Normal(final_node))
}

/// `right[Symbol.iterator]()`, the synthetic call a `for-of` head assigns
/// to its iterator temp.
fn symbol_iterator_call(right: &Expression) -> Expression {
    Expression::CallExpression {
        callee: Box::new(Expression::MemberExpression {
            object: Box::new(right.clone()),
            property: Box::new(Expression::MemberExpression {
                object: Box::new(Expression::Identifier { name: "Symbol".to_string() }),
                property: Box::new(Expression::Identifier { name: "iterator".to_string() }),
                computed: false,
            }),
            computed: true,
        }),
        arguments: vec![],
    }
}

/// `temp.next().value`, assigned into the loop variable on each iteration.
fn iterator_next_value(temp: &str) -> Expression {
    Expression::MemberExpression {
        object: Box::new(Expression::CallExpression {
            callee: Box::new(Expression::MemberExpression {
                object: Box::new(Expression::Identifier { name: temp.to_string() }),
                property: Box::new(Expression::Identifier { name: "next".to_string() }),
                computed: false,
            }),
            arguments: vec![],
        }),
        property: Box::new(Expression::Identifier { name: "value".to_string() }),
        computed: false,
    }
}
