//! Symbol interning.
//!
//! Symbols are compared by identity throughout the evaluator (frame markers,
//! `eq?`, environment lookup), so every distinct name must resolve to exactly
//! one handle. Interning is owned by an [`Interner`] scoped to one
//! [`crate::interpreter::Interpreter`] rather than a process-wide global,
//! so independent interpreters (and parallel tests) never share identity.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// An interned symbol handle. Equality and hashing are by pointer, not by
/// string content — two `Sym`s compare equal only if they came from the
/// same `Interner::intern` call chain for the same name.
#[derive(Clone)]
pub struct Sym(Rc<str>);

impl Sym {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Sym {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Sym {}

impl std::hash::Hash for Sym {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const ()).hash(state);
    }
}

impl fmt::Debug for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({:?})", self.0)
    }
}

impl fmt::Display for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-interpreter symbol table. Grows monotonically; entries are never
/// removed (matching the spec's process-wide table, just scoped down to an
/// interpreter instance — see DESIGN.md).
#[derive(Default)]
pub struct Interner {
    table: HashMap<Rc<str>, Sym>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            table: HashMap::new(),
        }
    }

    /// Return the unique `Sym` for `name`, creating one if this is the
    /// first time this interner has seen it.
    pub fn intern(&mut self, name: &str) -> Sym {
        if let Some(sym) = self.table.get(name) {
            return sym.clone();
        }
        let rc: Rc<str> = Rc::from(name);
        let sym = Sym(rc.clone());
        self.table.insert(rc, sym.clone());
        sym
    }
}
