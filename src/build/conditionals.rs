//! `IfStatement` translation (§4.E).

use super::{parse_statement, Completion};
use crate::ast::{Expression, Statement};
use crate::context::ParsingContext;
use crate::error::FlowResult;
use crate::expr::{negate_truthiness, stringify};
use crate::graph::NodeId;

/// `if (test) consequent [else alternate]`.
///
/// Two `Conditional` edges leave `current`: one guarded by `test` into the
/// consequent branch, one guarded by `!test` into the alternate branch (or
/// directly into the merge point when there is no `else`). Both branches
/// that complete normally rejoin at a single merge node; a branch that
/// completes abruptly contributes no merge edge. If both branches complete
/// abruptly with the same kind, that kind propagates instead of merging.
pub fn parse_if(
    test: &Expression,
    consequent: &Statement,
    alternate: Option<&Statement>,
    current: NodeId,
    ctx: &mut ParsingContext,
) -> FlowResult<Completion> {
    let then_label = stringify(test);
    let then_entry = ctx.append_conditionally_to(current, then_label, test.clone());
    let then_completion = parse_statement(consequent, then_entry, ctx, None)?;

    let else_completion = match alternate {
        Some(alt) => {
            let else_label = stringify(&negate_truthiness(test));
            let else_entry = ctx.append_conditionally_to(current, else_label, negate_truthiness(test));
            parse_statement(alt, else_entry, ctx, None)?
        }
        None => {
            let else_label = stringify(&negate_truthiness(test));
            let else_entry = ctx.append_conditionally_to(current, else_label, negate_truthiness(test));
            Completion::Normal(else_entry)
        }
    };

    merge_two(then_completion, else_completion, ctx)
}

/// Join two sibling completions at a shared merge node. Used by `if`/`else`
/// and (via `parse_statements` call sites elsewhere) nowhere else — `switch`
/// and `try` have their own merge shapes.
pub(crate) fn merge_two(
    a: Completion,
    b: Completion,
    ctx: &mut ParsingContext,
) -> FlowResult<Completion> {
    match (a, b) {
        (Completion::Normal(an), Completion::Normal(bn)) => {
            let merge = ctx.create_node();
            ctx.append_epsilon_edge_to(an, merge);
            ctx.append_epsilon_edge_to(bn, merge);
            Ok(Completion::Normal(merge))
        }
        (Completion::Normal(an), _) => Ok(Completion::Normal(an)),
        (_, Completion::Normal(bn)) => Ok(Completion::Normal(bn)),
        (a, _) => {
            // Both abrupt. The jump translators already wired their real
            // target edges at the point of emission; the completion marker
            // here only tells callers "this path doesn't fall through", so
            // either branch's marker propagates.
            Ok(a)
        }
    }
}
