//! `TryStatement` translation (§4.E): the catch-only, finally-only, and
//! catch-and-finally productions, plus the finalizer replay helper that
//! `build::jumps` calls while unwinding a `break`/`continue`/`return`/
//! `throw` out through one or more enclosing `try` blocks.

use super::{conditionals, parse_statement, Completion};
use crate::ast::{CatchClause, Statement};
use crate::context::{EnclosingStatement, FrameKind, ParsingContext, TryFrame};
use crate::error::FlowResult;
use crate::graph::NodeId;

/// Re-translate a `finally` block into a fresh subgraph at a replay site.
/// The finalizer's own `break`/`continue`/`return`/`throw` statements are
/// free to override whatever completion is being propagated through it —
/// that's ordinary JS `finally` semantics, and it falls out for free here
/// because this just dispatches through the normal statement translator.
pub(crate) fn replay_finalizer(finalizer: &Statement, current: NodeId, ctx: &mut ParsingContext) -> FlowResult<Completion> {
    parse_statement(finalizer, current, ctx, None)
}

pub fn parse_try(
    block: &Statement,
    handler: Option<&CatchClause>,
    finalizer: Option<&Statement>,
    current: NodeId,
    ctx: &mut ParsingContext,
) -> FlowResult<Completion> {
    let handler_body_entry = handler.map(|_| ctx.create_node());
    ctx.push_frame(EnclosingStatement::try_frame(
        None,
        TryFrame {
            handler: handler.cloned(),
            handler_body_entry,
            finalizer: finalizer.cloned(),
            in_try_block: true,
            in_finalizer: false,
        },
    ));

    let try_completion = parse_statement(block, current, ctx, None);

    if let Some(frame) = ctx.enclosing.last_mut() {
        if let FrameKind::TryStatement(tf) = &mut frame.kind {
            tf.in_try_block = false;
        }
    }

    let handler_completion = match (handler, handler_body_entry) {
        (Some(h), Some(entry)) => Some(parse_statement(&h.body, entry, ctx, None)),
        _ => None,
    };

    ctx.pop_frame();

    let try_completion = try_completion?;
    let handler_completion = handler_completion.transpose()?;

    // A handler's body is translated unconditionally whenever one exists,
    // regardless of whether `try_completion` itself is a `throw` — any
    // statement inside the try block (not just the one that determines its
    // overall completion) may have thrown into it, so a reachable handler
    // must always get its chance to contribute to what happens next. Only
    // the handler's *absence* (`handler_completion: None`) lets `try_completion`
    // propagate untouched.
    match (handler_completion, finalizer) {
        (None, None) => Ok(try_completion),
        // try/catch, no finalizer (§4.E): merge the two normal exits.
        (Some(hc), None) => conditionals::merge_two(try_completion, hc, ctx),
        // try/finally, no handler (§4.E): only the normal fallthrough needs
        // a finalizer replay here; an abrupt exit already replayed its own
        // copy while unwinding.
        (None, Some(finalizer)) => match try_completion {
            Completion::Normal(node) => replay_finalizer(finalizer, node, ctx),
            abrupt => Ok(abrupt),
        },
        // try/catch/finally (§4.E, §9 "Finalizer replay"): each normal exit
        // gets its own fresh replay of the finalizer before merging, so the
        // two paths through `finally` stay disjoint subgraphs.
        (Some(hc), Some(finalizer)) => {
            let from_try = match try_completion {
                Completion::Normal(node) => Some(replay_finalizer(finalizer, node, ctx)?),
                _ => None,
            };
            let from_handler = match hc {
                Completion::Normal(node) => Some(replay_finalizer(finalizer, node, ctx)?),
                abrupt => Some(abrupt),
            };
            match (from_try, from_handler) {
                (Some(a), Some(b)) => conditionals::merge_two(a, b, ctx),
                (Some(a), None) => Ok(a),
                (None, Some(b)) => Ok(b),
                (None, None) => unreachable!("from_handler is always Some, so this side always feeds something"),
            }
        }
    }
}
