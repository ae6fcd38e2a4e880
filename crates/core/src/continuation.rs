//! The reified continuation: an ordered stack of deferred operations
//! (§3, §4.5, §9).
//!
//! The live continuation the evaluator drives is a plain `Vec<Step>` so
//! pushing and popping stay O(1). Capturing one (`call/cc`) clones that
//! vector into an `Rc` — a real deep copy of the step sequence, not a
//! shared alias — and invoking a captured continuation clones it back out
//! to replace the evaluator's live stack. This is what lets the same
//! captured continuation be invoked more than once (the yin-yang test).

use crate::env::Env;
use crate::symbol::Sym;
use crate::value::Value;
use std::rc::Rc;

/// One deferred operation on the continuation stack. Payload shapes match
/// §4.5's table exactly.
#[derive(Debug, Clone)]
pub enum Step {
    /// `x`: a list of the one or two branches of an `if`.
    Then(Value),
    /// `x`: the non-empty list of remaining `begin` expressions.
    Begin(Value),
    /// `x`: the variable symbol to bind in the current frame.
    Define(Sym),
    /// `x`: the environment node whose value slot `set!` should overwrite.
    Setq(Env),
    /// `x`: the (possibly empty) list of not-yet-evaluated argument
    /// expressions for a call.
    Apply(Value),
    /// `x`: the reversed-so-far list of evaluated arguments.
    ConsArgs(Value),
    /// `x`: the next argument expression to evaluate.
    EvalArg(Value),
    /// `x`: the already-resolved function being applied.
    ApplyFun(Value),
    /// `x`: the environment to restore once the current frame unwinds.
    RestoreEnv(Env),
}

impl Step {
    /// Step-type name only, no payload — used for trace logging and for
    /// rendering a pseudo-stack-trace on error (§4.8).
    pub fn name(&self) -> &'static str {
        match self {
            Step::Then(_) => "THEN",
            Step::Begin(_) => "BEGIN",
            Step::Define(_) => "DEFINE",
            Step::Setq(_) => "SETQ",
            Step::Apply(_) => "APPLY",
            Step::ConsArgs(_) => "CONS_ARGS",
            Step::EvalArg(_) => "EVAL_ARG",
            Step::ApplyFun(_) => "APPLY_FUN",
            Step::RestoreEnv(_) => "RESTORE_ENV",
        }
    }
}

/// The live, growable continuation stack the evaluator mutates in place.
pub type Stack = Vec<Step>;

/// Push `RESTORE_ENV(env)` onto `stack`, but only if the top of the stack
/// isn't already a `RestoreEnv` — the tail-call discipline from §4.5 that
/// keeps arbitrarily deep tail-recursive chains from growing the stack.
pub fn push_restore_env(stack: &mut Stack, env: Env) {
    if !matches!(stack.last(), Some(Step::RestoreEnv(_))) {
        stack.push(Step::RestoreEnv(env));
    }
}

/// A captured, first-class continuation (§3). Deep-copied at capture time
/// via `Continuation::capture`; replacing the evaluator's live stack with
/// `Continuation::replay` makes a fresh copy each time so one captured
/// continuation can be invoked repeatedly.
#[derive(Debug, Clone)]
pub struct Continuation(Rc<Vec<Step>>);

impl Continuation {
    pub fn capture(stack: &Stack) -> Self {
        Continuation(Rc::new(stack.clone()))
    }

    /// Produce a fresh, independently-mutable copy of the captured stack.
    pub fn replay(&self) -> Stack {
        (*self.0).clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;

    #[test]
    fn replay_does_not_alias_the_captured_snapshot() {
        let mut stack: Stack = vec![Step::RestoreEnv(Env::root())];
        let captured = Continuation::capture(&stack);
        stack.push(Step::RestoreEnv(Env::root()));
        assert_eq!(captured.len(), 1);
        assert_eq!(captured.replay().len(), 1);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn push_restore_env_collapses_consecutive_pushes() {
        let mut stack: Stack = Vec::new();
        push_restore_env(&mut stack, Env::root());
        push_restore_env(&mut stack, Env::root());
        assert_eq!(stack.len(), 1);
    }
}
