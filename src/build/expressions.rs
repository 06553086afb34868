//! `ExpressionStatement` translation (§4.E).

use super::Completion;
use crate::ast::Expression;
use crate::context::ParsingContext;
use crate::error::FlowResult;
use crate::expr::stringify;
use crate::graph::{EdgeKind, NodeId};

/// A bare expression statement becomes one labeled node — except a
/// top-level comma expression, which fans out into one node per
/// sub-expression so each side effect gets its own step in the graph
/// instead of being flattened into a single compound label.
pub fn parse_expression_statement(expr: &Expression, current: NodeId, ctx: &mut ParsingContext) -> FlowResult<Completion> {
    match expr {
        Expression::SequenceExpression { expressions } => {
            let mut node = current;
            for sub in expressions {
                node = ctx.append_to(node, Some(stringify(sub)), EdgeKind::Epsilon, Some(sub.clone()));
            }
            Ok(Completion::Normal(node))
        }
        other => {
            let node = ctx.append_to(current, Some(stringify(other)), EdgeKind::Epsilon, Some(other.clone()));
            Ok(Completion::Normal(node))
        }
    }
}
