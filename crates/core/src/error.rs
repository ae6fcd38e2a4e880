//! Error types produced by the reader and evaluator.
//!
//! `WispError` collects every way evaluating a Wisp program can fail. It
//! carries an optional pseudo stack trace (the stringified continuation at
//! the moment of failure) so a host can show the user roughly where things
//! went wrong without the evaluator itself knowing about terminals or REPLs.

use crate::symbol::Sym;
use crate::value::Value;
use std::fmt;

/// Everything that can go wrong while reading or evaluating a Wisp program.
#[derive(Debug, Clone, PartialEq)]
pub enum WispError {
    /// `set!` or a bare symbol reference named something never bound.
    UnboundName(Sym),
    /// A closure or intrinsic was called with the wrong number of arguments.
    ArityMismatch { expected: String, got: usize },
    /// The operator position of a call evaluated to a non-callable value.
    NotAFunction(Value),
    /// A primitive received a value of the wrong shape (e.g. `car` on a non-pair).
    TypeMismatch { expected: &'static str, got: Value },
    /// Walking a list hit a tail that was neither `Null` nor another `Cell`.
    ImproperList(Value),
    /// The reader saw unbalanced parens or a malformed dotted pair.
    ReaderError(String),
    /// Raised by the `error` primitive; propagates to the host verbatim.
    UserError(Value),
}

impl WispError {
    /// Wrap a `TypeMismatch`-shaped failure with the value that failed the check.
    pub fn type_mismatch(expected: &'static str, got: Value) -> Self {
        WispError::TypeMismatch { expected, got }
    }
}

impl fmt::Display for WispError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WispError::UnboundName(sym) => write!(f, "Unbound name: {}", sym.name()),
            WispError::ArityMismatch { expected, got } => {
                write!(f, "Arity mismatch: expected {expected}, got {got}")
            }
            WispError::NotAFunction(v) => write!(f, "Not a function: {}", crate::printer::stringify(v, true)),
            WispError::TypeMismatch { expected, got } => write!(
                f,
                "Type mismatch: expected {expected}, got {}",
                crate::printer::stringify(got, true)
            ),
            WispError::ImproperList(v) => write!(
                f,
                "Improper list: {}",
                crate::printer::stringify(v, true)
            ),
            WispError::ReaderError(msg) => write!(f, "Reader error: {msg}"),
            WispError::UserError(v) => write!(f, "{}", crate::printer::stringify(v, false)),
        }
    }
}

impl std::error::Error for WispError {}

/// A `WispError` together with the continuation trace captured when it
/// crossed the evaluator boundary. `UserError` is never wrapped with a
/// trace — see SPEC_FULL.md §4.8.
#[derive(Debug, Clone, PartialEq)]
pub struct Traced {
    pub error: WispError,
    pub trace: Option<String>,
}

impl Traced {
    pub fn new(error: WispError, trace: Option<String>) -> Self {
        if matches!(error, WispError::UserError(_)) {
            Traced { error, trace: None }
        } else {
            Traced { error, trace }
        }
    }

    pub fn untraced(error: WispError) -> Self {
        Traced { error, trace: None }
    }
}

impl fmt::Display for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.trace {
            Some(trace) => write!(f, "{}\n  continuation: {trace}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for Traced {}

pub type WispResult<T> = Result<T, Traced>;
