//! Expression utilities: turning an expression into a display label
//! ([`stringify`]) and into its truthiness-complement ([`negate_truthiness`]).
//!
//! Both are label-and-guard transforms only — display output is never
//! parsed back, and the negated expression is never evaluated. Semantic
//! equivalence is assumed modulo JavaScript's `ToBoolean`.

use crate::ast::{Expression, LiteralValue};

/// Render an expression as a human-readable, unambiguous label for an edge.
///
/// Parenthesization follows standard JS operator precedence so the output
/// is unambiguous to a reader, even though nothing ever parses it back.
pub fn stringify(expr: &Expression) -> String {
    stringify_prec(expr, 0)
}

/// Binding power table, loosely matching JS operator precedence (higher
/// binds tighter). Only the operators this crate's subset can produce are
/// listed; anything else defaults to "atom" precedence.
fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::SequenceExpression { .. } => 0,
        Expression::AssignmentExpression { .. } => 1,
        Expression::ConditionalExpression { .. } => 2,
        Expression::LogicalExpression { operator, .. } if operator == "||" || operator == "??" => 3,
        Expression::LogicalExpression { operator, .. } if operator == "&&" => 4,
        Expression::BinaryExpression { operator, .. } if operator == "|" => 5,
        Expression::BinaryExpression { operator, .. } if operator == "^" => 6,
        Expression::BinaryExpression { operator, .. } if operator == "&" => 7,
        Expression::BinaryExpression { operator, .. }
            if matches!(operator.as_str(), "==" | "!=" | "===" | "!==") =>
        {
            8
        }
        Expression::BinaryExpression { operator, .. }
            if matches!(operator.as_str(), "<" | ">" | "<=" | ">=" | "in" | "instanceof") =>
        {
            9
        }
        Expression::BinaryExpression { operator, .. } if matches!(operator.as_str(), "<<" | ">>" | ">>>") => 10,
        Expression::BinaryExpression { operator, .. } if matches!(operator.as_str(), "+" | "-") => 11,
        Expression::BinaryExpression { .. } => 12,
        Expression::UnaryExpression { .. } => 14,
        Expression::UpdateExpression { prefix, .. } if *prefix => 14,
        Expression::UpdateExpression { .. } => 15,
        Expression::NewExpression { .. } => 17,
        Expression::CallExpression { .. } | Expression::MemberExpression { .. } => 18,
        _ => 20,
    }
}

fn stringify_prec(expr: &Expression, min_prec: u8) -> String {
    let prec = precedence(expr);
    let rendered = render(expr);
    if prec < min_prec {
        format!("({rendered})")
    } else {
        rendered
    }
}

fn render(expr: &Expression) -> String {
    match expr {
        Expression::Identifier { name } => name.clone(),
        Expression::Literal { raw, .. } => raw.clone(),
        Expression::ThisExpression => "this".to_string(),
        Expression::UnaryExpression {
            operator,
            prefix,
            argument,
        } => {
            let prec = precedence(expr);
            let arg = stringify_prec(argument, prec);
            let needs_space = operator.chars().all(|c| c.is_alphabetic());
            if *prefix {
                if needs_space {
                    format!("{operator} {arg}")
                } else {
                    format!("{operator}{arg}")
                }
            } else {
                format!("{arg}{operator}")
            }
        }
        Expression::UpdateExpression {
            operator,
            prefix,
            argument,
        } => {
            let prec = precedence(expr);
            let arg = stringify_prec(argument, prec);
            if *prefix {
                format!("{operator}{arg}")
            } else {
                format!("{arg}{operator}")
            }
        }
        Expression::BinaryExpression { operator, left, right } => {
            let prec = precedence(expr);
            format!(
                "{} {} {}",
                stringify_prec(left, prec),
                operator,
                stringify_prec(right, prec + 1)
            )
        }
        Expression::LogicalExpression { operator, left, right } => {
            let prec = precedence(expr);
            format!(
                "{} {} {}",
                stringify_prec(left, prec),
                operator,
                stringify_prec(right, prec + 1)
            )
        }
        Expression::AssignmentExpression { operator, left, right } => {
            let prec = precedence(expr);
            format!(
                "{} {} {}",
                stringify_prec(left, prec + 1),
                operator,
                stringify_prec(right, prec)
            )
        }
        Expression::MemberExpression {
            object,
            property,
            computed,
        } => {
            let prec = precedence(expr);
            let obj = stringify_prec(object, prec);
            if *computed {
                format!("{obj}[{}]", stringify(property))
            } else {
                format!("{obj}.{}", stringify(property))
            }
        }
        Expression::CallExpression { callee, arguments } => {
            let prec = precedence(expr);
            format!(
                "{}({})",
                stringify_prec(callee, prec),
                arguments.iter().map(stringify).collect::<Vec<_>>().join(", ")
            )
        }
        Expression::NewExpression { callee, arguments } => {
            let prec = precedence(expr);
            format!(
                "new {}({})",
                stringify_prec(callee, prec),
                arguments.iter().map(stringify).collect::<Vec<_>>().join(", ")
            )
        }
        Expression::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            let prec = precedence(expr);
            format!(
                "{} ? {} : {}",
                stringify_prec(test, prec + 1),
                stringify_prec(consequent, prec),
                stringify_prec(alternate, prec)
            )
        }
        Expression::SequenceExpression { expressions } => {
            expressions.iter().map(stringify).collect::<Vec<_>>().join(", ")
        }
        Expression::ArrayExpression { elements } => {
            let items = elements
                .iter()
                .map(|e| e.as_ref().map(stringify).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{items}]")
        }
        Expression::ObjectExpression { properties } => {
            let items = properties
                .iter()
                .map(|p| {
                    if p.shorthand {
                        stringify(&p.value)
                    } else {
                        let key = if p.computed {
                            format!("[{}]", stringify(&p.key))
                        } else {
                            stringify(&p.key)
                        };
                        format!("{key}: {}", stringify(&p.value))
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{items}}}")
        }
        Expression::FunctionExpression { id, .. } => match id {
            Some(name) => format!("function {name}() {{ ... }}"),
            None => "function() { ... }".to_string(),
        },
    }
}

fn literal_is_falsy(value: &LiteralValue) -> Option<bool> {
    match value {
        LiteralValue::Null => Some(false),
        LiteralValue::Bool(b) => Some(!b),
        LiteralValue::Number(n) => Some(*n == 0.0 || n.is_nan()),
        LiteralValue::Str(s) => Some(s.is_empty()),
        LiteralValue::Regex { .. } => Some(false),
    }
}

/// Whether `expr`'s truthiness is statically known (used by the opt-in
/// `rewriteConstantConditionalEdges` pass).
pub fn constant_truthiness(expr: &Expression) -> Option<bool> {
    match expr {
        Expression::Literal { value, .. } => literal_is_falsy(value).map(|falsy| !falsy),
        _ => None,
    }
}

fn complement(operator: &str) -> Option<&'static str> {
    Some(match operator {
        "==" => "!=",
        "!=" => "==",
        "===" => "!==",
        "!==" => "===",
        "<" => ">=",
        ">=" => "<",
        ">" => "<=",
        "<=" => ">",
        _ => return None,
    })
}

/// Return an expression whose truthiness is the complement of `expr`'s.
///
/// - `!x` strips the negation, yielding `x`.
/// - A binary comparison with a symmetric negatable operator flips to its
///   complement (`==`/`!=`, `===`/`!==`, `<`/`>=`, `>`/`<=`).
/// - Anything else is wrapped in unary `!`.
pub fn negate_truthiness(expr: &Expression) -> Expression {
    match expr {
        Expression::UnaryExpression {
            operator,
            argument,
            ..
        } if operator == "!" => (**argument).clone(),
        Expression::BinaryExpression { operator, left, right } => {
            if let Some(flipped) = complement(operator) {
                Expression::BinaryExpression {
                    operator: flipped.to_string(),
                    left: left.clone(),
                    right: right.clone(),
                }
            } else {
                wrap_negation(expr)
            }
        }
        _ => wrap_negation(expr),
    }
}

fn wrap_negation(expr: &Expression) -> Expression {
    Expression::UnaryExpression {
        operator: "!".to_string(),
        prefix: true,
        argument: Box::new(expr.clone()),
    }
}
