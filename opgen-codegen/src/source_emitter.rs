use opgen_ir::{CaseLabel, Expr, Stmt, SwitchArm};
use std::fmt::Write;

/// Emit a list of statements as curly-brace source text.
pub fn emit_source(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    emit_stmts(&mut out, stmts, 0);
    out
}

fn emit_stmts(out: &mut String, stmts: &[Stmt], indent: usize) {
    for stmt in stmts {
        emit_stmt(out, stmt, indent);
    }
}

fn indent_str(level: usize) -> String {
    "    ".repeat(level)
}

fn emit_stmt(out: &mut String, stmt: &Stmt, indent: usize) {
    let pad = indent_str(indent);
    match stmt {
        Stmt::Expr(e) => {
            let _ = writeln!(out, "{pad}{};", emit_expr(e));
        }
        Stmt::Constant { ty, name, init } => {
            let _ = writeln!(out, "{pad}static final {ty} {name} = {};", emit_expr(init));
        }
        Stmt::Assign { target, value } => {
            let _ = writeln!(out, "{pad}{} = {};", emit_expr(target), emit_expr(value));
        }
        Stmt::Return(None) => {
            let _ = writeln!(out, "{pad}return;");
        }
        Stmt::Return(Some(e)) => {
            let _ = writeln!(out, "{pad}return {};", emit_expr(e));
        }
        Stmt::Switch { discriminant, arms } => {
            let _ = writeln!(out, "{pad}switch ({}) {{", emit_expr(discriminant));
            for arm in arms {
                emit_arm(out, arm, indent + 1);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Stmt::Break => {
            let _ = writeln!(out, "{pad}break;");
        }
        Stmt::Block(body) => {
            let _ = writeln!(out, "{pad}{{");
            emit_stmts(out, body, indent + 1);
            let _ = writeln!(out, "{pad}}}");
        }
        Stmt::Raw(text) => {
            let _ = writeln!(out, "{pad}{text}");
        }
    }
}

fn emit_arm(out: &mut String, arm: &SwitchArm, indent: usize) {
    debug_assert!(!arm.labels.is_empty(), "switch arm without labels");
    let pad = indent_str(indent);
    let labels: Vec<String> = arm
        .labels
        .iter()
        .map(|label| match label {
            CaseLabel::Value(e) => format!("case {}:", emit_expr(e)),
            CaseLabel::Default => "default:".to_string(),
        })
        .collect();
    let Some((last, rest)) = labels.split_last() else {
        return;
    };
    for label in rest {
        let _ = writeln!(out, "{pad}{label}");
    }

    // A body that is a single block opens on the last label's line.
    if let [Stmt::Block(body)] = arm.body.as_slice() {
        let _ = writeln!(out, "{pad}{last} {{");
        emit_stmts(out, body, indent + 1);
        let _ = writeln!(out, "{pad}}}");
    } else {
        let _ = writeln!(out, "{pad}{last}");
        emit_stmts(out, &arm.body, indent + 1);
    }
}

/// Emit a single expression as source text.
pub fn emit_expr(expr: &Expr) -> String {
    match expr {
        Expr::IntLit(n) => format!("{n}"),
        Expr::Var(name) => name.clone(),
        Expr::Raw(text) => text.clone(),
        Expr::BinaryOp { op, lhs, rhs } => {
            let l = emit_expr_paren(lhs);
            let r = emit_expr_paren(rhs);
            format!("{l} {op} {r}")
        }
        Expr::Cast { ty, expr } => format!("({ty}) {}", emit_expr_paren(expr)),
        Expr::Call {
            receiver,
            method,
            args,
        } => {
            let a: Vec<String> = args.iter().map(emit_expr).collect();
            match receiver {
                Some(recv) => format!("{}.{method}({})", emit_expr_paren(recv), a.join(", ")),
                None => format!("{method}({})", a.join(", ")),
            }
        }
    }
}

fn emit_expr_paren(expr: &Expr) -> String {
    let s = emit_expr(expr);
    let needs_parens = match expr {
        Expr::Raw(text) => !is_simple_raw(text),
        Expr::IntLit(n) => *n < 0,
        e => !e.is_atom(),
    };
    if needs_parens { format!("({s})") } else { s }
}

fn is_simple_raw(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use opgen_ir::{BinOp, Type};

    #[test]
    fn nested_binary_ops_are_parenthesized() {
        let e = Expr::binary(BinOp::Mul, Expr::add(Expr::var("a"), 1), Expr::var("b"));
        assert_eq!(emit_expr(&e), "(a + 1) * b");
    }

    #[test]
    fn cast_of_compound_raw_is_parenthesized() {
        assert_eq!(
            emit_expr(&Expr::cast(Type::Short, Expr::raw("x + 1"))),
            "(short) (x + 1)"
        );
        assert_eq!(
            emit_expr(&Expr::cast(Type::Short, Expr::raw("x"))),
            "(short) x"
        );
    }

    #[test]
    fn negative_literal_operand() {
        let e = Expr::binary(BinOp::Sub, Expr::var("a"), Expr::int(-1));
        assert_eq!(emit_expr(&e), "a - (-1)");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "switch arm without labels")]
    fn unlabelled_arm_is_rejected() {
        let switch = Stmt::Switch {
            discriminant: Expr::var("op"),
            arms: vec![SwitchArm {
                labels: Vec::new(),
                body: vec![Stmt::Break],
            }],
        };
        emit_source(&[switch]);
    }
}
