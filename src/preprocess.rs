//! AST preprocessing: rewrite named function expressions bound to a
//! same-named variable into plain function declarations, so the
//! construction engine only ever has to handle `FunctionDeclaration`.
//!
//! The recognized shape is `var f = function f() { ... }` (a single
//! declarator whose initializer is a *named* function expression sharing
//! the declarator's identifier). Anonymous function expressions, and named
//! ones that don't match this shape, are left untouched as opaque
//! expression leaves — they are never traversed or lifted.

use crate::ast::{Expression, Program, Statement, VariableDeclaration};

/// Rewrite every recognizable named-function-expression declaration in
/// `program`, recursing into every nested statement list including
/// function bodies.
pub fn preprocess(mut program: Program) -> Program {
    program.body = rewrite_statements(program.body);
    program
}

fn rewrite_statements(stmts: Vec<Statement>) -> Vec<Statement> {
    stmts.into_iter().map(rewrite_statement).collect()
}

fn rewrite_statement(stmt: Statement) -> Statement {
    match stmt {
        Statement::VariableDeclaration(decl) => rewrite_variable_declaration(decl),
        Statement::BlockStatement { body } => Statement::BlockStatement {
            body: rewrite_statements(body),
        },
        Statement::IfStatement {
            test,
            consequent,
            alternate,
        } => Statement::IfStatement {
            test,
            consequent: Box::new(rewrite_statement(*consequent)),
            alternate: alternate.map(|a| Box::new(rewrite_statement(*a))),
        },
        Statement::WhileStatement { test, body } => Statement::WhileStatement {
            test,
            body: Box::new(rewrite_statement(*body)),
        },
        Statement::DoWhileStatement { body, test } => Statement::DoWhileStatement {
            body: Box::new(rewrite_statement(*body)),
            test,
        },
        Statement::ForStatement {
            init,
            test,
            update,
            body,
        } => Statement::ForStatement {
            init,
            test,
            update,
            body: Box::new(rewrite_statement(*body)),
        },
        Statement::ForInStatement { left, right, body } => Statement::ForInStatement {
            left,
            right,
            body: Box::new(rewrite_statement(*body)),
        },
        Statement::ForOfStatement {
            left,
            right,
            body,
            is_await,
        } => Statement::ForOfStatement {
            left,
            right,
            body: Box::new(rewrite_statement(*body)),
            is_await,
        },
        Statement::SwitchStatement { discriminant, cases } => Statement::SwitchStatement {
            discriminant,
            cases: cases
                .into_iter()
                .map(|mut case| {
                    case.consequent = rewrite_statements(case.consequent);
                    case
                })
                .collect(),
        },
        Statement::LabeledStatement { label, body } => Statement::LabeledStatement {
            label,
            body: Box::new(rewrite_statement(*body)),
        },
        Statement::TryStatement {
            block,
            handler,
            finalizer,
        } => Statement::TryStatement {
            block: Box::new(rewrite_statement(*block)),
            handler: handler.map(|mut h| {
                h.body = Box::new(rewrite_statement(*h.body));
                h
            }),
            finalizer: finalizer.map(|f| Box::new(rewrite_statement(*f))),
        },
        Statement::WithStatement { object, body } => Statement::WithStatement {
            object,
            body: Box::new(rewrite_statement(*body)),
        },
        Statement::FunctionDeclaration { id, params, body } => Statement::FunctionDeclaration {
            id,
            params,
            body: Box::new(rewrite_statement(*body)),
        },
        // Simple forms with nothing to recurse into.
        other @ (Statement::ExpressionStatement { .. }
        | Statement::EmptyStatement
        | Statement::DebuggerStatement
        | Statement::BreakStatement { .. }
        | Statement::ContinueStatement { .. }
        | Statement::ReturnStatement { .. }
        | Statement::ThrowStatement { .. }) => other,
    }
}

fn rewrite_variable_declaration(decl: VariableDeclaration) -> Statement {
    if let [declarator] = decl.declarations.as_slice() {
        if let Some(Expression::FunctionExpression {
            id: Some(fn_name),
            ..
        }) = &declarator.init
        {
            if fn_name == declarator.id.name() {
                let Some(Expression::FunctionExpression { id, params, body }) =
                    decl.declarations.into_iter().next().unwrap().init
                else {
                    unreachable!("matched above");
                };
                return Statement::FunctionDeclaration {
                    id: id.expect("matched Some above"),
                    params,
                    body: Box::new(rewrite_statement(*body)),
                };
            }
        }
    }
    Statement::VariableDeclaration(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Pattern, VariableDeclarator, VariableKind};

    fn named_fn_decl(name: &str) -> VariableDeclaration {
        VariableDeclaration {
            kind: VariableKind::Var,
            declarations: vec![VariableDeclarator {
                id: Pattern::Identifier { name: name.to_string() },
                init: Some(Expression::FunctionExpression {
                    id: Some(name.to_string()),
                    params: vec![],
                    body: Box::new(Statement::BlockStatement { body: vec![] }),
                }),
            }],
        }
    }

    #[test]
    fn rewrites_matching_named_function_expression() {
        let program = Program {
            body: vec![Statement::VariableDeclaration(named_fn_decl("f"))],
        };
        let out = preprocess(program);
        assert!(matches!(
            out.body[0],
            Statement::FunctionDeclaration { ref id, .. } if id == "f"
        ));
    }

    #[test]
    fn leaves_mismatched_name_alone() {
        let mut decl = named_fn_decl("f");
        if let Some(Expression::FunctionExpression { id, .. }) = &mut decl.declarations[0].init {
            *id = Some("g".to_string());
        }
        let program = Program {
            body: vec![Statement::VariableDeclaration(decl)],
        };
        let out = preprocess(program);
        assert!(matches!(out.body[0], Statement::VariableDeclaration(_)));
    }

    #[test]
    fn leaves_anonymous_function_expression_alone() {
        let mut decl = named_fn_decl("f");
        if let Some(Expression::FunctionExpression { id, .. }) = &mut decl.declarations[0].init {
            *id = None;
        }
        let program = Program {
            body: vec![Statement::VariableDeclaration(decl)],
        };
        let out = preprocess(program);
        assert!(matches!(out.body[0], Statement::VariableDeclaration(_)));
    }

    #[test]
    fn recurses_into_nested_blocks() {
        let program = Program {
            body: vec![Statement::BlockStatement {
                body: vec![Statement::VariableDeclaration(named_fn_decl("f"))],
            }],
        };
        let out = preprocess(program);
        let Statement::BlockStatement { body } = &out.body[0] else {
            panic!("expected block");
        };
        assert!(matches!(body[0], Statement::FunctionDeclaration { .. }));
    }
}
