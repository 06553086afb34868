//! `SwitchStatement` translation (§4.E): sequential equality testing
//! against the discriminant, with fall-through across case bodies in
//! source order independent of match order.

use super::{parse_statements, Completion};
use crate::ast::{Expression, SwitchCase};
use crate::context::{EnclosingStatement, ParsingContext};
use crate::error::FlowResult;
use crate::expr::{negate_truthiness, stringify};
use crate::graph::{EdgeKind, NodeId};

pub fn parse_switch(
    discriminant: &Expression,
    cases: &[SwitchCase],
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
) -> FlowResult<Completion> {
    let temp = ctx.create_temporary_local_variable_name(Some("switch"));
    let temp_ref = Expression::Identifier { name: temp.clone() };
    let assign_label = format!("{temp} = {}", stringify(discriminant));
    let mut still_searching = ctx.append_to(current, Some(assign_label), EdgeKind::Epsilon, Some(discriminant.clone()));

    let body_entries: Vec<NodeId> = cases.iter().map(|_| ctx.create_node()).collect();
    let final_node = ctx.create_node();
    let default_index = cases.iter().position(|c| c.test.is_none());

    for (i, case) in cases.iter().enumerate() {
        let Some(test) = &case.test else { continue };
        let eq = Expression::BinaryExpression {
            operator: "===".to_string(),
            left: Box::new(temp_ref.clone()),
            right: Box::new(test.clone()),
        };
        ctx.link(
            still_searching,
            body_entries[i],
            EdgeKind::Conditional,
            Some(stringify(&eq)),
            Some(eq.clone()),
        );
        let not_eq = negate_truthiness(&eq);
        still_searching = ctx.append_conditionally_to(still_searching, stringify(&not_eq), not_eq);
    }
    match default_index {
        Some(di) => ctx.append_epsilon_edge_to(still_searching, body_entries[di]),
        None => ctx.append_epsilon_edge_to(still_searching, final_node),
    };

    ctx.push_frame(EnclosingStatement::other(label.map(str::to_string), Some(final_node), None));
    for (i, case) in cases.iter().enumerate() {
        let next_entry = body_entries.get(i + 1).copied().unwrap_or(final_node);
        if let Completion::Normal(n) = parse_statements(&case.consequent, body_entries[i], ctx)? {
            ctx.append_epsilon_edge_to(n, next_entry);
        }
    }
    ctx.pop_frame();

    Ok(Completion::Normal(final_node))
}
