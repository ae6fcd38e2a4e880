//! The environment: a singly linked chain of bindings with frame markers
//! (§3, §4.3).
//!
//! A binding node with no `(symbol, value)` pair is a *frame marker* —
//! it exists only to give `define` a place to insert into the current
//! call frame rather than some enclosing one. The spec's source
//! represents a frame marker as a binding whose symbol slot is a unit
//! sentinel; here we use `Option::None` for the same purpose, since Rust's
//! sum types make that distinction free instead of requiring a sentinel
//! value (see DESIGN.md).

use crate::error::{Traced, WispError, WispResult};
use crate::symbol::Sym;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

struct EnvNode {
    binding: Option<(Sym, Value)>,
    next: Option<Env>,
}

/// A handle onto one node of the environment chain. Cloning an `Env` is a
/// cheap `Rc` clone that shares the same mutable node — this is what makes
/// a later `define` on a captured environment visible to every closure
/// that captured it (§9).
#[derive(Clone)]
pub struct Env(Rc<RefCell<EnvNode>>);

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Env({:p})", Rc::as_ptr(&self.0))
    }
}

impl Env {
    fn new_node(binding: Option<(Sym, Value)>, next: Option<Env>) -> Env {
        Env(Rc::new(RefCell::new(EnvNode { binding, next })))
    }

    /// The absolute bottom of a chain: a frame marker with nothing below
    /// it. Looking past it fails with `UnboundName`.
    pub fn root() -> Env {
        Env::new_node(None, None)
    }

    /// Push a frame marker on top of `next`, delimiting a new call frame.
    pub fn new_frame(next: Env) -> Env {
        Env::new_node(None, Some(next))
    }

    /// Push one binding on top of `next`.
    pub fn push_binding(sym: Sym, value: Value, next: Env) -> Env {
        Env::new_node(Some((sym, value)), Some(next))
    }

    pub fn is_frame_marker(&self) -> bool {
        self.0.borrow().binding.is_none()
    }

    /// The first binding node (scanning from `self` outward) whose symbol
    /// is identity-equal to `sym`.
    fn look_for(&self, sym: &Sym) -> WispResult<Env> {
        let mut cur = self.clone();
        loop {
            let next = {
                let node = cur.0.borrow();
                if let Some((bound, _)) = &node.binding
                    && bound == sym
                {
                    return Ok(cur.clone());
                }
                node.next.clone()
            };
            match next {
                Some(n) => cur = n,
                None => return Err(Traced::untraced(WispError::UnboundName(sym.clone()))),
            }
        }
    }

    pub fn get(&self, sym: &Sym) -> WispResult<Value> {
        let node = self.look_for(sym)?;
        let borrowed = node.0.borrow();
        Ok(borrowed.binding.as_ref().unwrap().1.clone())
    }

    /// Mutate the value slot of the nearest enclosing binding for `sym`.
    pub fn set(&self, sym: &Sym, value: Value) -> WispResult<()> {
        let node = self.look_for(sym)?;
        node.0.borrow_mut().binding.as_mut().unwrap().1 = value;
        Ok(())
    }

    /// Resolve `sym` to the environment node holding its binding, for
    /// `set!`'s early-binding-capture step (§4.5's SETQ payload).
    pub fn resolve(&self, sym: &Sym) -> WispResult<Env> {
        self.look_for(sym)
    }

    /// Overwrite this exact node's value slot, given that `self` is
    /// already known (via [`Env::resolve`]) to be a binding node.
    pub fn set_here(&self, value: Value) {
        let mut node = self.0.borrow_mut();
        if let Some((_, slot)) = node.binding.as_mut() {
            *slot = value;
        }
    }

    /// Insert a new binding immediately after `self`, which must be a
    /// frame marker; mutates `self`'s `next` pointer in place (§3).
    pub fn define(&self, sym: Sym, value: Value) {
        debug_assert!(self.is_frame_marker(), "define called on a non-frame-marker env");
        let old_next = self.0.borrow().next.clone();
        let new_node = Env::new_node(Some((sym, value)), old_next);
        self.0.borrow_mut().next = Some(new_node);
    }

    /// Zip `params` (a proper list of symbols, optionally dotted with a
    /// final rest-arg symbol, or a single symbol binding every argument)
    /// against `args`, prepending one binding per parameter onto `self`.
    /// Returns `self` unchanged if both are empty (§4.3).
    pub fn prepend_defs(&self, params: &Value, args: &[Value]) -> WispResult<Env> {
        let mut env = self.clone();
        let mut cursor = params.clone();
        let mut idx = 0usize;
        loop {
            match cursor {
                Value::Null => {
                    if idx != args.len() {
                        return Err(Traced::untraced(WispError::ArityMismatch {
                            expected: format!("{idx}"),
                            got: args.len(),
                        }));
                    }
                    return Ok(env);
                }
                Value::Sym(rest) => {
                    let remaining = Value::vec_to_list(&args[idx.min(args.len())..]);
                    return Ok(Env::push_binding(rest, remaining, env));
                }
                Value::Cell(cell) => {
                    let (car, cdr) = cell.borrow().clone();
                    let sym = match car {
                        Value::Sym(s) => s,
                        other => {
                            return Err(Traced::untraced(WispError::type_mismatch(
                                "symbol in parameter list",
                                other,
                            )));
                        }
                    };
                    let Some(arg) = args.get(idx) else {
                        return Err(Traced::untraced(WispError::ArityMismatch {
                            expected: "at least ".to_string() + &(idx + 1).to_string(),
                            got: args.len(),
                        }));
                    };
                    env = Env::push_binding(sym, arg.clone(), env);
                    idx += 1;
                    cursor = cdr;
                }
                other => {
                    return Err(Traced::untraced(WispError::type_mismatch(
                        "parameter list",
                        other,
                    )));
                }
            }
        }
    }

    /// Whether `self` and `other` are the same underlying node, used to
    /// detect where the global environment begins when printing a trace.
    pub fn same_frame_as(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// This node's `(symbol, value)` pair, or `None` for a frame marker.
    pub fn binding_pair(&self) -> Option<(Sym, Value)> {
        self.0.borrow().binding.clone()
    }

    /// The next node in the chain, or `None` at the absolute bottom.
    pub fn next_node(&self) -> Option<Env> {
        self.0.borrow().next.clone()
    }

    /// Symbol names bound in this chain, head outward, skipping frame
    /// markers — used by the `globals` primitive.
    pub fn bound_names(&self) -> Vec<Sym> {
        let mut out = Vec::new();
        let mut cur = Some(self.clone());
        while let Some(env) = cur {
            let node = env.0.borrow();
            if let Some((sym, _)) = &node.binding {
                out.push(sym.clone());
            }
            cur = node.next.clone();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Interner;

    #[test]
    fn define_inserts_after_the_frame_marker() {
        let mut interner = Interner::new();
        let root = Env::root();
        let frame = Env::new_frame(root);
        let x = interner.intern("x");
        frame.define(x.clone(), Value::Int(1));
        assert_eq!(frame.get(&x).unwrap(), Value::Int(1));
    }

    #[test]
    fn later_define_on_captured_env_is_visible() {
        let mut interner = Interner::new();
        let global = Env::new_frame(Env::root());
        let captured = global.clone();
        let y = interner.intern("y");
        global.define(y.clone(), Value::Int(2));
        assert_eq!(captured.get(&y).unwrap(), Value::Int(2));
    }

    #[test]
    fn set_requires_an_existing_binding() {
        let mut interner = Interner::new();
        let env = Env::new_frame(Env::root());
        let z = interner.intern("z");
        assert!(env.set(&z, Value::Int(1)).is_err());
    }

    #[test]
    fn prepend_defs_zips_params_and_args() {
        let mut interner = Interner::new();
        let base = Env::root();
        let a = Value::Sym(interner.intern("a"));
        let b = Value::Sym(interner.intern("b"));
        let params = Value::vec_to_list(&[a, b]);
        let env = base
            .prepend_defs(&params, &[Value::Int(1), Value::Int(2)])
            .unwrap();
        assert_eq!(env.get(&interner.intern("a")).unwrap(), Value::Int(1));
        assert_eq!(env.get(&interner.intern("b")).unwrap(), Value::Int(2));
    }

    #[test]
    fn prepend_defs_rejects_arity_mismatch() {
        let mut interner = Interner::new();
        let base = Env::root();
        let a = Value::Sym(interner.intern("a"));
        let params = Value::vec_to_list(&[a]);
        assert!(base.prepend_defs(&params, &[]).is_err());
    }

    #[test]
    fn prepend_defs_returns_self_when_both_empty() {
        let base = Env::root();
        let env = base.prepend_defs(&Value::Null, &[]).unwrap();
        assert!(Rc::ptr_eq(&base.0, &env.0));
    }

    #[test]
    fn variadic_param_collects_remaining_args() {
        let mut interner = Interner::new();
        let base = Env::root();
        let rest = interner.intern("rest");
        let env = base
            .prepend_defs(&Value::Sym(rest.clone()), &[Value::Int(1), Value::Int(2)])
            .unwrap();
        let collected = env.get(&rest).unwrap();
        assert_eq!(
            collected.list_to_vec().unwrap(),
            vec![Value::Int(1), Value::Int(2)]
        );
    }
}
