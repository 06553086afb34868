//! `break`, `continue`, `return`, and `throw` translation (§4.E).
//!
//! Every jump here installs an `AbruptCompletion` edge straight to its real
//! target; the [`Completion`] this module returns is just a marker telling
//! callers the current path doesn't fall through — the graph shape is
//! already final by the time it's returned.

use super::try_stmt::replay_finalizer;
use super::Completion;
use crate::ast::Expression;
use crate::context::{FrameKind, ParsingContext};
use crate::error::{FlowError, FlowResult};
use crate::expr::stringify;
use crate::graph::{EdgeKind, NodeId};

/// Find the nearest enclosing frame a `break` (labeled or not) resolves
/// against, and its position on the stack (so finalizers above it, but not
/// the frame itself, get replayed).
fn find_break_target(ctx: &ParsingContext, label: Option<&str>) -> Option<(usize, NodeId)> {
    for (i, frame) in ctx.enclosing.iter().enumerate().rev() {
        match label {
            Some(l) => {
                if frame.label.as_deref() == Some(l) {
                    return frame.break_target.map(|t| (i, t));
                }
            }
            None => {
                if let Some(t) = frame.break_target {
                    return Some((i, t));
                }
            }
        }
    }
    None
}

/// Same as [`find_break_target`] but for `continue` targets — a labeled or
/// synthetic non-loop frame never sets one, so a labeled `continue` landing
/// on such a frame is a genuine error rather than a missed match.
fn find_continue_target(ctx: &ParsingContext, label: Option<&str>) -> Option<(usize, NodeId)> {
    for (i, frame) in ctx.enclosing.iter().enumerate().rev() {
        match label {
            Some(l) => {
                if frame.label.as_deref() == Some(l) {
                    return frame.continue_target.map(|t| (i, t));
                }
            }
            None => {
                if let Some(t) = frame.continue_target {
                    return Some((i, t));
                }
            }
        }
    }
    None
}

/// The outcome of unwinding through zero or more `try` finalizers on the
/// way to a jump's real target.
enum Unwind {
    /// No finalizer overrode the jump; `NodeId` is where its edge installs from.
    Reached(NodeId),
    /// A finalizer's own abrupt statement took over; this is the jump's
    /// actual completion instead.
    Overridden(Completion),
}

/// Replay the finalizer of every `try` frame above `floor` (exclusive),
/// from innermost to outermost, skipping a frame currently mid-replay of
/// its own finalizer. `floor = None` replays the whole stack (`return`, or
/// an unhandled `throw`).
fn replay_finalizers_above(ctx: &mut ParsingContext, mut current: NodeId, floor: Option<usize>) -> FlowResult<Unwind> {
    let start = floor.map(|f| f + 1).unwrap_or(0);
    for i in (start..ctx.enclosing.len()).rev() {
        let finalizer = match &ctx.enclosing[i].kind {
            FrameKind::TryStatement(tf) if !tf.in_finalizer => tf.finalizer.clone(),
            _ => None,
        };
        let Some(finalizer) = finalizer else { continue };

        if let FrameKind::TryStatement(tf) = &mut ctx.enclosing[i].kind {
            tf.in_finalizer = true;
        }
        let completion = replay_finalizer(&finalizer, current, ctx)?;
        if let FrameKind::TryStatement(tf) = &mut ctx.enclosing[i].kind {
            tf.in_finalizer = false;
        }

        match completion {
            Completion::Normal(n) => current = n,
            abrupt => return Ok(Unwind::Overridden(abrupt)),
        }
    }
    Ok(Unwind::Reached(current))
}

pub fn parse_break(label: Option<&str>, current: NodeId, ctx: &mut ParsingContext) -> FlowResult<Completion> {
    let Some((idx, target)) = find_break_target(ctx, label) else {
        return Err(FlowError::IllegalJumpTarget {
            statement: "break",
            label: label.map(str::to_string),
        });
    };
    match replay_finalizers_above(ctx, current, Some(idx))? {
        Unwind::Reached(node) => {
            ctx.link(node, target, EdgeKind::AbruptCompletion, Some("break".to_string()), None);
            Ok(Completion::Break)
        }
        Unwind::Overridden(completion) => Ok(completion),
    }
}

pub fn parse_continue(label: Option<&str>, current: NodeId, ctx: &mut ParsingContext) -> FlowResult<Completion> {
    let Some((idx, target)) = find_continue_target(ctx, label) else {
        return Err(FlowError::IllegalJumpTarget {
            statement: "continue",
            label: label.map(str::to_string),
        });
    };
    match replay_finalizers_above(ctx, current, Some(idx))? {
        Unwind::Reached(node) => {
            ctx.link(node, target, EdgeKind::AbruptCompletion, Some("continue".to_string()), None);
            Ok(Completion::Continue)
        }
        Unwind::Overridden(completion) => Ok(completion),
    }
}

pub fn parse_return(argument: Option<&Expression>, current: NodeId, ctx: &mut ParsingContext) -> FlowResult<Completion> {
    match replay_finalizers_above(ctx, current, None)? {
        Unwind::Reached(node) => {
            let label = match argument {
                Some(arg) => format!("return {}", stringify(arg)),
                None => "return".to_string(),
            };
            let success_exit = ctx.graph.success_exit;
            ctx.link(node, success_exit, EdgeKind::AbruptCompletion, Some(label), argument.cloned());
            Ok(Completion::Return)
        }
        Unwind::Overridden(completion) => Ok(completion),
    }
}

/// A `throw` jumps into the nearest still-active `catch` handler if one
/// exists on the stack; every `try` frame it walks past on the way there
/// (or on to the function's error exit, if none catches it) that carries
/// its own finalizer gets that finalizer replayed first, so a `finally`
/// nested inside an outer `try/catch` still runs before control reaches
/// the outer handler (§4.E `ThrowStatement`).
pub fn parse_throw(argument: &Expression, current: NodeId, ctx: &mut ParsingContext) -> FlowResult<Completion> {
    let mut node = current;
    for i in (0..ctx.enclosing.len()).rev() {
        let handler_entry = match &ctx.enclosing[i].kind {
            FrameKind::TryStatement(tf) if tf.in_try_block => tf.handler_body_entry,
            _ => None,
        };
        if let Some(handler_entry) = handler_entry {
            let param = match &ctx.enclosing[i].kind {
                FrameKind::TryStatement(tf) => tf.handler.as_ref().and_then(|h| h.param.as_ref()).map(|p| p.name().to_string()),
                FrameKind::OtherStatement => None,
            };
            match param {
                // Bind the thrown value to the catch parameter in its own
                // node before handing off to the handler body, so the
                // binding itself shows up in the graph instead of being
                // folded into the edge label.
                Some(param) => {
                    let label = format!("{param} = {}", stringify(argument));
                    let binding = ctx.append_to(node, Some(label), EdgeKind::AbruptCompletion, Some(argument.clone()));
                    ctx.append_epsilon_edge_to(binding, handler_entry);
                }
                None => {
                    ctx.link(
                        node,
                        handler_entry,
                        EdgeKind::AbruptCompletion,
                        Some(format!("throw {}", stringify(argument))),
                        Some(argument.clone()),
                    );
                }
            }
            return Ok(Completion::Throw);
        }

        let finalizer = match &ctx.enclosing[i].kind {
            FrameKind::TryStatement(tf) if !tf.in_finalizer => tf.finalizer.clone(),
            _ => None,
        };
        let Some(finalizer) = finalizer else { continue };

        if let FrameKind::TryStatement(tf) = &mut ctx.enclosing[i].kind {
            tf.in_finalizer = true;
        }
        let completion = replay_finalizer(&finalizer, node, ctx)?;
        if let FrameKind::TryStatement(tf) = &mut ctx.enclosing[i].kind {
            tf.in_finalizer = false;
        }
        match completion {
            Completion::Normal(n) => node = n,
            abrupt => return Ok(abrupt),
        }
    }

    let error_exit = ctx.graph.error_exit;
    ctx.link(
        node,
        error_exit,
        EdgeKind::AbruptCompletion,
        Some(format!("throw {}", stringify(argument))),
        Some(argument.clone()),
    );
    Ok(Completion::Throw)
}
