//! The construction engine: translates statement and expression forms into
//! graph fragments, propagating completion values (§4.E).

mod conditionals;
mod expressions;
mod function;
mod jumps;
mod loops;
mod switch;
mod try_stmt;

use crate::ast::{Statement, VariableDeclaration};
use crate::context::ParsingContext;
use crate::error::{FlowError, FlowResult};
use crate::expr::stringify;
use crate::graph::{EdgeKind, NodeId};

pub use function::{parse_function_declaration, parse_program};

/// How a translated subfragment finished: exactly one of normal fallthrough
/// or an already-installed abrupt transition (§3 `Completion`).
#[derive(Debug, Clone, Copy)]
pub enum Completion {
    /// Control may fall through at this node.
    Normal(NodeId),
    Break,
    Continue,
    Return,
    Throw,
}

impl Completion {
    pub fn normal_node(self) -> Option<NodeId> {
        match self {
            Completion::Normal(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_abrupt(self) -> bool {
        !matches!(self, Completion::Normal(_))
    }
}

/// Fold over a statement list. The first abrupt completion short-circuits —
/// everything after it is unreachable and dropped, per §4.E.
pub fn parse_statements(
    stmts: &[Statement],
    mut current: NodeId,
    ctx: &mut ParsingContext,
) -> FlowResult<Completion> {
    for stmt in stmts {
        match parse_statement(stmt, current, ctx, None)? {
            Completion::Normal(n) => current = n,
            abrupt => return Ok(abrupt),
        }
    }
    Ok(Completion::Normal(current))
}

/// Dispatch a single statement to its dedicated translator.
pub fn parse_statement(
    stmt: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
) -> FlowResult<Completion> {
    ctx.enter()?;
    tracing::trace!(tag = stmt.tag(), node = ctx.graph.node_id(current), "dispatching statement");
    let result = parse_statement_inner(stmt, current, ctx, label);
    ctx.exit();
    result
}

fn parse_statement_inner(
    stmt: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
    label: Option<&str>,
) -> FlowResult<Completion> {
    match stmt {
        Statement::EmptyStatement => {
            let n = ctx.append_to(current, Some("(empty)".to_string()), EdgeKind::Epsilon, None);
            Ok(Completion::Normal(n))
        }
        Statement::DebuggerStatement => Ok(Completion::Normal(current)),
        Statement::BlockStatement { body } => parse_statements(body, current, ctx),
        Statement::VariableDeclaration(decl) => Ok(Completion::Normal(parse_statement_as_variable_declaration(
            decl, current, ctx,
        ))),
        Statement::ExpressionStatement { expression } => {
            expressions::parse_expression_statement(expression, current, ctx)
        }
        Statement::IfStatement {
            test,
            consequent,
            alternate,
        } => conditionals::parse_if(test, consequent, alternate.as_deref(), current, ctx),
        Statement::WhileStatement { test, body } => loops::parse_while(test, body, current, ctx, label),
        Statement::DoWhileStatement { body, test } => loops::parse_do_while(body, test, current, ctx, label),
        Statement::ForStatement {
            init,
            test,
            update,
            body,
        } => loops::parse_for(init.as_ref(), test.as_ref(), update.as_ref(), body, current, ctx, label),
        Statement::ForInStatement { left, right, body } => {
            loops::parse_for_in_of(left, right, body, current, ctx, label, false)
        }
        Statement::ForOfStatement { left, right, body, .. } => {
            loops::parse_for_in_of(left, right, body, current, ctx, label, true)
        }
        Statement::SwitchStatement { discriminant, cases } => {
            switch::parse_switch(discriminant, cases, current, ctx, label)
        }
        Statement::BreakStatement { label } => jumps::parse_break(label.as_deref(), current, ctx),
        Statement::ContinueStatement { label } => jumps::parse_continue(label.as_deref(), current, ctx),
        Statement::LabeledStatement { label, body } => parse_labeled(label, body, current, ctx),
        Statement::ReturnStatement { argument } => jumps::parse_return(argument.as_ref(), current, ctx),
        Statement::ThrowStatement { argument } => jumps::parse_throw(argument, current, ctx),
        Statement::TryStatement {
            block,
            handler,
            finalizer,
        } => try_stmt::parse_try(block, handler.as_ref(), finalizer.as_deref(), current, ctx),
        Statement::WithStatement { object, body } => {
            let labeled = format!("with ({})", stringify(object));
            let n = ctx.append_to(current, Some(labeled), EdgeKind::Epsilon, None);
            parse_statement(body, n, ctx, None)
        }
        Statement::FunctionDeclaration { id, params, body } => {
            function::parse_function_declaration(id, params, body, current, ctx)
        }
    }
}

/// Statements that natively support a label forward it to their own
/// translator (loops and `switch`); everything else gets a synthetic break
/// target (§4.E `LabeledStatement`).
fn parse_labeled(
    label: &str,
    body: &Statement,
    current: NodeId,
    ctx: &mut ParsingContext,
) -> FlowResult<Completion> {
    match body {
        Statement::WhileStatement { .. }
        | Statement::DoWhileStatement { .. }
        | Statement::ForStatement { .. }
        | Statement::ForInStatement { .. }
        | Statement::ForOfStatement { .. }
        | Statement::SwitchStatement { .. } => parse_statement(body, current, ctx, Some(label)),
        _ => {
            let final_node = ctx.create_node();
            ctx.push_frame(crate::context::EnclosingStatement::other(
                Some(label.to_string()),
                Some(final_node),
                None,
            ));
            let completion = parse_statement(body, current, ctx, None);
            ctx.pop_frame();
            match completion? {
                Completion::Normal(n) => {
                    ctx.append_epsilon_edge_to(n, final_node);
                    Ok(Completion::Normal(final_node))
                }
                abrupt => Ok(abrupt),
            }
        }
    }
}

pub(crate) fn unsupported(tag: &str) -> FlowError {
    FlowError::UnsupportedConstruct { tag: tag.to_string() }
}

/// Chain each declarator's initializer onto the graph, one `Epsilon` edge
/// per binding. Shared between `VariableDeclaration` statements and a
/// `for` loop's init clause.
pub(crate) fn parse_statement_as_variable_declaration(
    decl: &VariableDeclaration,
    current: NodeId,
    ctx: &mut ParsingContext,
) -> NodeId {
    let mut node = current;
    for declarator in &decl.declarations {
        let label = match &declarator.init {
            Some(init) => format!("{} = {}", declarator.id.name(), stringify(init)),
            None => declarator.id.name().to_string(),
        };
        node = ctx.append_to(node, Some(label), EdgeKind::Epsilon, None);
    }
    node
}
