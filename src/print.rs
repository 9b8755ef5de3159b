//! Name-aware pretty-printing.
//!
//! `Expr`'s own `Display` impl only knows `x<i>` indices (see `expr.rs`);
//! this module renders the same tree using a `Spec`'s declared variable
//! names instead, the way the original `operator<<` overload does when
//! handed a name table. Convenience tooling, not part of the synthesis
//! core.

use crate::expr::Expr;

/// Render `expr` using `names` for its leaves. Panics if `expr` references
/// an index outside `names` — that would mean the expression was built
/// against a different `Spec`.
pub fn format_with_names(expr: &Expr, names: &[String]) -> String {
    let mut out = String::new();
    write_with_names(expr, names, &mut out);
    out
}

fn write_with_names(expr: &Expr, names: &[String], out: &mut String) {
    match expr {
        Expr::Var(i) => out.push_str(&names[*i as usize]),
        Expr::Not(x) => {
            out.push('!');
            write_with_names(x, names, out);
        }
        Expr::And(l, r) => write_binary(l, r, "&&", names, out),
        Expr::Or(l, r) => write_binary(l, r, "||", names, out),
        Expr::Xor(l, r) => write_binary(l, r, "^", names, out),
    }
}

fn write_binary(l: &Expr, r: &Expr, op: &str, names: &[String], out: &mut String) {
    out.push('(');
    write_with_names(l, names, out);
    out.push(' ');
    out.push_str(op);
    out.push(' ');
    write_with_names(r, names, out);
    out.push(')');
}
