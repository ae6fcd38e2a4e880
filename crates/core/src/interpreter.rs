//! The interpreter/session (§4.7).
//!
//! An `Interpreter` owns the symbol table and the global environment, so
//! more than one can coexist in a process without sharing symbol identity —
//! each test in this crate builds its own.

use crate::env::Env;
use crate::error::WispResult;
use crate::primitives;
use crate::reader::Reader;
use crate::symbol::{Interner, Sym};
use crate::value::Value;
use crate::{evaluator, printer};

/// Owns the interned-symbol table and the global environment, and is the
/// `&mut` handle primitives use to reach the host (`read`) or the
/// environment (`globals`).
pub struct Interpreter {
    interner: Interner,
    global_env: Env,
    reader: Reader,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let global_env = Env::new_frame(Env::root());
        primitives::install(&mut interner, &global_env);
        Interpreter {
            interner,
            global_env,
            reader: Reader::new(),
        }
    }

    pub fn global_env(&self) -> Env {
        self.global_env.clone()
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    pub fn intern(&mut self, name: &str) -> Sym {
        self.interner.intern(name)
    }

    /// Evaluate `expr` in `env` via the trampolined evaluator (§4.5).
    pub fn evaluate(&mut self, expr: Value, env: Env) -> WispResult<Value> {
        evaluator::evaluate(self, expr, env)
    }

    /// Evaluate `expr` in the global environment.
    pub fn evaluate_global(&mut self, expr: Value) -> WispResult<Value> {
        let env = self.global_env();
        self.evaluate(expr, env)
    }

    /// Read one complete expression from `input`, prompting with `prompt1`
    /// / `prompt2` (§6).
    pub fn read_expression(
        &mut self,
        prompt1: &str,
        prompt2: &str,
        input: &mut dyn FnMut() -> Option<String>,
    ) -> WispResult<Value> {
        let mut reader = std::mem::take(&mut self.reader);
        let result = reader.read_expression(&mut self.interner, prompt1, prompt2, input);
        self.reader = reader;
        result
    }

    pub fn stringify(&self, value: &Value) -> String {
        printer::stringify(value, true)
    }

    /// Load and evaluate every top-level expression in `source`, in order,
    /// returning the value of the last one (or `NONE` if `source` is empty).
    pub fn load_source(&mut self, source: &str) -> WispResult<Value> {
        let mut reader = Reader::new();
        let mut lines = source.lines().map(str::to_string).collect::<std::collections::VecDeque<_>>();
        let mut last = Value::None;
        loop {
            let mut input = || lines.pop_front();
            let expr = reader.read_expression(&mut self.interner, "", "", &mut input)?;
            if matches!(expr, Value::Eof) {
                break;
            }
            last = self.evaluate_global(expr)?;
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_interpreters_do_not_share_symbol_identity() {
        let mut a = Interpreter::new();
        let mut b = Interpreter::new();
        let foo_a = a.intern("foo");
        let foo_b = b.intern("foo");
        assert_ne!(foo_a, foo_b);
    }

    #[test]
    fn global_env_has_primitives_installed() {
        let mut interp = Interpreter::new();
        let car = interp.intern("car");
        assert!(interp.global_env().get(&car).is_ok());
    }

    #[test]
    fn load_source_evaluates_each_top_level_form() {
        let mut interp = Interpreter::new();
        let result = interp.load_source("(define x 1) (+ x 2)").unwrap();
        assert_eq!(result, Value::Int(3));
    }
}
