//! The primitive-procedure table installed into a fresh global environment
//! (§4.6).

use crate::env::Env;
use crate::error::{Traced, WispError, WispResult};
use crate::interpreter::Interpreter;
use crate::numeric;
use crate::printer;
use crate::symbol::Interner;
use crate::value::{cons, IntrinsicData, IntrinsicFn, Value};
use std::io::BufRead;
use std::rc::Rc;

fn type_error(expected: &'static str, got: &Value) -> Traced {
    Traced::untraced(WispError::type_mismatch(expected, got.clone()))
}

fn car(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    args[0].car().ok_or_else(|| type_error("pair", &args[0]))
}

fn cdr(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    args[0].cdr().ok_or_else(|| type_error("pair", &args[0]))
}

fn cons_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(cons(args[0].clone(), args[1].clone()))
}

fn eq_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(crate::value::is_eq(&args[0], &args[1])))
}

fn pair_p(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Cell(_))))
}

fn null_p(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Null)))
}

fn not_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(args[0].is_false()))
}

fn list_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::vec_to_list(args))
}

fn display_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    print!("{}", printer::stringify(&args[0], false));
    Ok(Value::None)
}

fn newline_prim(_: &mut Interpreter, _args: &[Value]) -> WispResult<Value> {
    println!();
    Ok(Value::None)
}

fn read_prim(interp: &mut Interpreter, _args: &[Value]) -> WispResult<Value> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut input = || lines.next().and_then(Result::ok);
    interp.read_expression("", "", &mut input)
}

fn eof_object_p(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Eof)))
}

fn symbol_p(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Sym(_))))
}

fn add_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    numeric::add(&args[0], &args[1])
}

fn sub_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    numeric::subtract(&args[0], &args[1])
}

fn mul_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    numeric::multiply(&args[0], &args[1])
}

fn lt_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(numeric::compare(&args[0], &args[1])? < 0))
}

fn num_eq_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(numeric::compare(&args[0], &args[1])? == 0))
}

fn number_p(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    Ok(Value::Bool(numeric::is_number(&args[0])))
}

/// `(error reason arg)` raises `WispError::UserError` with the literal text
/// `Error: <reason (display form)>: <arg (quoted form)>` (§6).
fn error_prim(_: &mut Interpreter, args: &[Value]) -> WispResult<Value> {
    let message = format!(
        "Error: {}: {}",
        printer::stringify(&args[0], false),
        printer::stringify(&args[1], true)
    );
    Err(Traced::untraced(WispError::UserError(Value::Str(
        message.into(),
    ))))
}

/// `(globals)`: every symbol bound in the global environment, excluding its
/// leading frame marker.
fn globals_prim(interp: &mut Interpreter, _args: &[Value]) -> WispResult<Value> {
    let names: Vec<Value> = interp
        .global_env()
        .bound_names()
        .into_iter()
        .map(Value::Sym)
        .collect();
    Ok(Value::vec_to_list(&names))
}

struct Entry {
    name: &'static str,
    arity: i32,
    func: IntrinsicFn,
}

const ENTRIES: &[Entry] = &[
    Entry { name: "car", arity: 1, func: car },
    Entry { name: "cdr", arity: 1, func: cdr },
    Entry { name: "cons", arity: 2, func: cons_prim },
    Entry { name: "eq?", arity: 2, func: eq_prim },
    Entry { name: "pair?", arity: 1, func: pair_p },
    Entry { name: "null?", arity: 1, func: null_p },
    Entry { name: "not", arity: 1, func: not_prim },
    Entry { name: "list", arity: -1, func: list_prim },
    Entry { name: "display", arity: 1, func: display_prim },
    Entry { name: "newline", arity: 0, func: newline_prim },
    Entry { name: "read", arity: 0, func: read_prim },
    Entry { name: "eof-object?", arity: 1, func: eof_object_p },
    Entry { name: "symbol?", arity: 1, func: symbol_p },
    Entry { name: "+", arity: 2, func: add_prim },
    Entry { name: "-", arity: 2, func: sub_prim },
    Entry { name: "*", arity: 2, func: mul_prim },
    Entry { name: "<", arity: 2, func: lt_prim },
    Entry { name: "=", arity: 2, func: num_eq_prim },
    Entry { name: "number?", arity: 1, func: number_p },
    Entry { name: "error", arity: 2, func: error_prim },
    Entry { name: "globals", arity: 0, func: globals_prim },
];

/// Install every primitive in [`ENTRIES`] plus the `call/cc`/`apply`
/// sentinel bindings into `global_env`, interning each name through
/// `interner`.
pub fn install(interner: &mut Interner, global_env: &Env) {
    for entry in ENTRIES {
        let sym = interner.intern(entry.name);
        let value = Value::Intrinsic(Rc::new(IntrinsicData {
            name: entry.name,
            arity: entry.arity,
            func: entry.func,
        }));
        global_env.define(sym, value);
    }
    let call_cc = interner.intern("call/cc");
    global_env.define(call_cc, Value::CallCcTag);
    let apply = interner.intern("apply");
    global_env.define(apply, Value::ApplyTag);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn globals_excludes_the_frame_marker_and_includes_primitives() {
        let mut interp = Interpreter::new();
        let names = globals_prim(&mut interp, &[]).unwrap();
        let items = names.list_to_vec().unwrap();
        let rendered: Vec<String> = items.iter().map(|v| printer::stringify(v, true)).collect();
        for expected in ["car", "cons", "call/cc", "apply", "globals"] {
            assert!(rendered.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn error_formats_reason_and_quoted_arg() {
        let mut interp = Interpreter::new();
        let err = error_prim(&mut interp, &[Value::Str("bad".into()), Value::Int(3)]).unwrap_err();
        match err.error {
            WispError::UserError(Value::Str(s)) => assert_eq!(&*s, "Error: bad: 3"),
            other => panic!("unexpected error variant: {other:?}"),
        }
        assert!(err.trace.is_none());
    }
}
