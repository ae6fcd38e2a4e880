//! Converting a [`Value`] back to its textual form (§4.9).
//!
//! Used both by `display`/the REPL's result echo (unquoted strings) and by
//! error messages and `write`-style output (quoted strings, matching how a
//! string would have to look to be read back in).

use crate::env::Env;
use crate::value::{ClosureData, Value};

/// Render `value` as Wisp source text. When `quote_strings` is `false`
/// (the `display` primitive), a `Str` is emitted bare; when `true` (the
/// default, and what `write`/error messages use), it's wrapped in `"..."`.
pub fn stringify(value: &Value, quote_strings: bool) -> String {
    let mut out = String::new();
    write_value(value, quote_strings, &mut out);
    out
}

fn write_value(value: &Value, quote_strings: bool, out: &mut String) {
    match value {
        Value::Bool(true) => out.push_str("#t"),
        Value::Bool(false) => out.push_str("#f"),
        Value::Null => out.push_str("()"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::BigInt(b) => out.push_str(&b.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(s) => {
            if quote_strings {
                out.push('"');
                out.push_str(s);
                out.push('"');
            } else {
                out.push_str(s);
            }
        }
        Value::Sym(sym) => out.push_str(sym.name()),
        Value::Cell(_) => write_list(value, quote_strings, out),
        Value::Closure(closure) => write_closure(closure, out),
        Value::Intrinsic(data) => out.push_str(&format!("#[intrinsic {}]", data.name)),
        Value::Continuation(_) => out.push_str("#[continuation]"),
        Value::None => {}
        Value::Eof => out.push_str("#[eof]"),
        Value::CallCcTag => out.push_str("#[intrinsic call/cc]"),
        Value::ApplyTag => out.push_str("#[intrinsic apply]"),
    }
}

fn write_list(value: &Value, quote_strings: bool, out: &mut String) {
    out.push('(');
    let mut cur = value.clone();
    let mut first = true;
    loop {
        match cur {
            Value::Cell(cell) => {
                if !first {
                    out.push(' ');
                }
                first = false;
                let (car, cdr) = cell.borrow().clone();
                write_value(&car, quote_strings, out);
                cur = cdr;
            }
            Value::Null => break,
            other => {
                out.push_str(" . ");
                write_value(&other, quote_strings, out);
                break;
            }
        }
    }
    out.push(')');
}

fn write_closure(closure: &ClosureData, out: &mut String) {
    out.push_str("#[closure params=");
    out.push_str(&stringify(&closure.params, true));
    out.push(']');
}

/// A float that parses as an integer literal still needs a trailing `.0`
/// to read back as a `Float` rather than an `Int` (§4.1).
fn format_float(f: f64) -> String {
    if f.is_infinite() {
        return if f > 0.0 { "+inf.0" } else { "-inf.0" }.to_string();
    }
    if f.is_nan() {
        return "+nan.0".to_string();
    }
    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Diagnostic rendering of an environment chain for error traces (§4.8):
/// the global environment collapses to `GlobalEnv` and each frame marker
/// prints as `|`, so a trace reads as a stack of call frames rather than
/// dumping every global binding.
pub fn stringify_env(env: &Env, global: &Env) -> String {
    let mut parts = Vec::new();
    let mut cur = Some(env.clone());
    while let Some(node) = cur {
        if node.same_frame_as(global) {
            parts.push("GlobalEnv".to_string());
            break;
        }
        match node.binding_pair() {
            Some((sym, val)) => parts.push(format!("{}={}", sym.name(), stringify(&val, true))),
            None => parts.push("|".to_string()),
        }
        cur = node.next_node();
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::BigInt;
    use crate::symbol::Interner;
    use crate::value::cons;

    #[test]
    fn floats_always_print_with_a_decimal_point() {
        assert_eq!(stringify(&Value::Float(3.0), true), "3.0");
        assert_eq!(stringify(&Value::Float(3.5), true), "3.5");
    }

    #[test]
    fn strings_are_quoted_unless_displaying() {
        let s = Value::Str("hi".into());
        assert_eq!(stringify(&s, true), "\"hi\"");
        assert_eq!(stringify(&s, false), "hi");
    }

    #[test]
    fn dotted_pairs_print_with_a_dot() {
        let pair = cons(Value::Int(1), Value::Int(2));
        assert_eq!(stringify(&pair, true), "(1 . 2)");
    }

    #[test]
    fn proper_lists_print_space_separated() {
        let list = Value::vec_to_list(&[Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(stringify(&list, true), "(1 2 3)");
    }

    #[test]
    fn bigint_prints_via_display() {
        let v = Value::BigInt(BigInt::from_i64(123456789012345));
        assert_eq!(stringify(&v, true), "123456789012345");
    }

    #[test]
    fn symbols_print_by_name() {
        let mut interner = Interner::new();
        let sym = Value::Sym(interner.intern("foo"));
        assert_eq!(stringify(&sym, true), "foo");
    }
}
