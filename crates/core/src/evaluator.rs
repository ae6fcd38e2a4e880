//! The trampolined evaluator (§4.5): a state machine over `(exp, env, k)`
//! that alternates Phase A (expression dispatch) and Phase B (continuation
//! dispatch) without growing the Rust call stack, so tail-recursive Wisp
//! programs run in bounded native stack regardless of depth.

use crate::continuation::{push_restore_env, Continuation, Stack, Step};
use crate::env::Env;
use crate::error::{Traced, WispError, WispResult};
use crate::interpreter::Interpreter;
use crate::value::{cons, ClosureData, Value};
use std::rc::Rc;

fn improper(v: &Value) -> Traced {
    Traced::untraced(WispError::ImproperList(v.clone()))
}

fn expect_sym(v: Value) -> WispResult<crate::symbol::Sym> {
    match v {
        Value::Sym(s) => Ok(s),
        other => Err(Traced::untraced(WispError::type_mismatch("symbol", other))),
    }
}

/// Evaluate `expr` in `env`, attaching a stringified continuation trace to
/// any error that escapes without one already (§4.8; `UserError` keeps
/// none regardless, per `Traced::new`).
pub fn evaluate(interp: &mut Interpreter, expr: Value, env: Env) -> WispResult<Value> {
    let mut k: Stack = Vec::new();
    run(interp, expr, env, &mut k).map_err(|traced| {
        if traced.trace.is_some() {
            traced
        } else {
            Traced::new(traced.error, Some(stringify_stack(&k)))
        }
    })
}

fn stringify_stack(k: &Stack) -> String {
    k.iter()
        .rev()
        .map(Step::name)
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(interp: &mut Interpreter, expr: Value, env: Env, k: &mut Stack) -> WispResult<Value> {
    let mut exp = expr;
    let mut env = env;

    'outer: loop {
        // ---- Phase A: expression dispatch ----
        loop {
            match exp {
                Value::Cell(cell) => {
                    let (head, tail) = cell.borrow().clone();
                    let form_name = match &head {
                        Value::Sym(sym) => Some(sym.name().to_string()),
                        _ => None,
                    };
                    match form_name.as_deref() {
                        Some("quote") => {
                            tracing::debug!(form = "quote", "phase A dispatch");
                            exp = tail.car().ok_or_else(|| improper(&tail))?;
                            break;
                        }
                        Some("if") => {
                            tracing::debug!(form = "if", "phase A dispatch");
                            let test = tail.car().ok_or_else(|| improper(&tail))?;
                            let branches = tail.cdr().ok_or_else(|| improper(&tail))?;
                            k.push(Step::Then(branches));
                            exp = test;
                            continue;
                        }
                        Some("begin") => {
                            tracing::debug!(form = "begin", "phase A dispatch");
                            let body = tail;
                            let first = body.car().ok_or_else(|| improper(&body))?;
                            let rest = body.cdr().ok_or_else(|| improper(&body))?;
                            if !matches!(rest, Value::Null) {
                                k.push(Step::Begin(rest));
                            }
                            exp = first;
                            continue;
                        }
                        Some("lambda") => {
                            tracing::debug!(form = "lambda", "phase A dispatch");
                            let params = tail.car().ok_or_else(|| improper(&tail))?;
                            let body = tail.cdr().ok_or_else(|| improper(&tail))?;
                            exp = Value::Closure(Rc::new(ClosureData {
                                params,
                                body,
                                env: env.clone(),
                            }));
                            break;
                        }
                        Some("define") => {
                            tracing::debug!(form = "define", "phase A dispatch");
                            let var = tail.car().ok_or_else(|| improper(&tail))?;
                            let sym = expect_sym(var)?;
                            let rhs = tail
                                .cdr()
                                .ok_or_else(|| improper(&tail))?
                                .car()
                                .unwrap_or(Value::None);
                            k.push(Step::Define(sym));
                            exp = rhs;
                            continue;
                        }
                        Some("set!") => {
                            tracing::debug!(form = "set!", "phase A dispatch");
                            let var = tail.car().ok_or_else(|| improper(&tail))?;
                            let sym = expect_sym(var)?;
                            let binding_env = env.resolve(&sym)?;
                            let rhs = tail
                                .cdr()
                                .ok_or_else(|| improper(&tail))?
                                .car()
                                .unwrap_or(Value::None);
                            k.push(Step::Setq(binding_env));
                            exp = rhs;
                            continue;
                        }
                        _ => {
                            tracing::debug!(form = "application", "phase A dispatch");
                            k.push(Step::Apply(tail));
                            exp = head;
                            continue;
                        }
                    }
                }
                Value::Sym(ref sym) => {
                    exp = env.get(sym)?;
                    break;
                }
                _ => break,
            }
        }

        // ---- Phase B: continuation dispatch ----
        loop {
            let Some(step) = k.pop() else {
                return Ok(exp);
            };
            tracing::trace!(step = step.name(), "phase B pop");
            match step {
                Step::Then(branches) => {
                    let items = branches.list_to_vec().ok_or_else(|| improper(&branches))?;
                    if exp.is_false() {
                        if items.len() < 2 {
                            exp = Value::None;
                            continue;
                        }
                        exp = items[1].clone();
                    } else {
                        exp = items[0].clone();
                    }
                    continue 'outer;
                }
                Step::Begin(rest) => {
                    let head = rest.car().ok_or_else(|| improper(&rest))?;
                    let tail = rest.cdr().ok_or_else(|| improper(&rest))?;
                    if !matches!(tail, Value::Null) {
                        k.push(Step::Begin(tail));
                    }
                    exp = head;
                    continue 'outer;
                }
                Step::Define(sym) => {
                    env.define(sym, exp.clone());
                    exp = Value::None;
                }
                Step::Setq(binding_env) => {
                    binding_env.set_here(exp.clone());
                    exp = Value::None;
                }
                Step::Apply(args) => {
                    if matches!(args, Value::Null) {
                        let (v, new_env) = apply_function(interp, k, exp, Vec::new(), env)?;
                        exp = v;
                        env = new_env;
                    } else {
                        let items = args.list_to_vec().ok_or_else(|| improper(&args))?;
                        k.push(Step::ApplyFun(exp));
                        for arg in items[1..].iter().rev() {
                            k.push(Step::EvalArg(arg.clone()));
                        }
                        k.push(Step::ConsArgs(Value::Null));
                        exp = items[0].clone();
                        continue 'outer;
                    }
                }
                Step::ConsArgs(acc) => {
                    let consed = cons(exp.clone(), acc);
                    match k.pop() {
                        Some(Step::EvalArg(next)) => {
                            k.push(Step::ConsArgs(consed));
                            exp = next;
                            continue 'outer;
                        }
                        Some(Step::ApplyFun(func)) => {
                            let mut args_vec =
                                consed.list_to_vec().ok_or_else(|| improper(&consed))?;
                            args_vec.reverse();
                            let (v, new_env) = apply_function(interp, k, func, args_vec, env)?;
                            exp = v;
                            env = new_env;
                        }
                        _ => unreachable!("CONS_ARGS must be followed by EVAL_ARG or APPLY_FUN"),
                    }
                }
                Step::EvalArg(_) | Step::ApplyFun(_) => {
                    unreachable!("only ever consumed by the CONS_ARGS handler")
                }
                Step::RestoreEnv(new_env) => {
                    env = new_env;
                }
            }
        }
    }
}

/// Apply `func` to `args`, unwrapping `call/cc`/`apply` sentinels first
/// (§4.5).
pub(crate) fn apply_function(
    interp: &mut Interpreter,
    k: &mut Stack,
    func: Value,
    args: Vec<Value>,
    env: Env,
) -> WispResult<(Value, Env)> {
    let mut func = func;
    let mut args = args;
    loop {
        match func {
            Value::CallCcTag => {
                push_restore_env(k, env.clone());
                let mut it = args.into_iter();
                let proc = it.next().ok_or_else(|| {
                    Traced::untraced(WispError::ArityMismatch {
                        expected: "1".to_string(),
                        got: 0,
                    })
                })?;
                let captured = Value::Continuation(Continuation::capture(k));
                func = proc;
                args = vec![captured];
                continue;
            }
            Value::ApplyTag => {
                let mut it = args.into_iter();
                let f = it.next().ok_or_else(|| {
                    Traced::untraced(WispError::ArityMismatch {
                        expected: "2".to_string(),
                        got: 0,
                    })
                })?;
                let rest = it.next().ok_or_else(|| {
                    Traced::untraced(WispError::ArityMismatch {
                        expected: "2".to_string(),
                        got: 1,
                    })
                })?;
                let splatted = rest
                    .list_to_vec()
                    .ok_or_else(|| Traced::untraced(WispError::ImproperList(rest.clone())))?;
                func = f;
                args = splatted;
                continue;
            }
            _ => break,
        }
    }

    match func {
        Value::Intrinsic(data) => {
            tracing::debug!(primitive = data.name, arity = data.arity, "applying primitive");
            if data.arity >= 0 && data.arity as usize != args.len() {
                return Err(Traced::untraced(WispError::ArityMismatch {
                    expected: data.arity.to_string(),
                    got: args.len(),
                }));
            }
            let result = (data.func)(interp, &args)?;
            Ok((result, env))
        }
        Value::Closure(closure) => {
            push_restore_env(k, env.clone());
            k.push(Step::Begin(closure.body.clone()));
            let bound = closure.env.prepend_defs(&closure.params, &args)?;
            Ok((Value::None, Env::new_frame(bound)))
        }
        Value::Continuation(cont) => {
            *k = cont.replay();
            let v = args.into_iter().next().unwrap_or(Value::None);
            Ok((v, env))
        }
        other => Err(Traced::untraced(WispError::NotAFunction(other))),
    }
}
