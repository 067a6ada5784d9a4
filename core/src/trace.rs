//! Evaluation trace types for debugging chain behavior.
//!
//! A trace captures which cases were tested, in order, and which one fired.
//! Use [`Matching::exec_with_trace()`](crate::Matching::exec_with_trace) (or
//! `CaseTable::evaluate_with_trace()` with feature `config`) to see the
//! decision path.
//!
//! # Example
//!
//! ```
//! use casewise::matcher;
//!
//! let trace = matcher(7)
//!     .case(1, |_| "one")
//!     .case_guarded(|x| *x > 5, |_| "big")
//!     .exec_with_trace();
//! assert_eq!(trace.result, Ok("big"));
//! for step in &trace.steps {
//!     println!("  case[{}] {}: matched={}", step.index, step.kind, step.matched);
//! }
//! ```

use crate::{CaseKind, UnmatchedValue};
use std::fmt;

/// Trace of one chain evaluation.
///
/// # INV: `result` == `exec()` result
///
/// The `result` field always equals what [`exec()`](crate::Matching::exec)
/// would return for the same chain.
pub struct EvalTrace<R> {
    /// The final result (identical to what `exec()` returns).
    pub result: Result<R, UnmatchedValue>,
    /// Each case that was tested, in registration order.
    /// Stops after the first match (preserves first-match-wins).
    pub steps: Vec<EvalStep>,
    /// Debug rendering of the subject.
    pub subject: String,
}

impl<R> EvalTrace<R> {
    /// Index of the case that fired, if any.
    #[must_use]
    pub fn matched_index(&self) -> Option<usize> {
        self.steps.iter().find(|s| s.matched).map(|s| s.index)
    }

    /// Kind of the case that fired, if any.
    #[must_use]
    pub fn matched_kind(&self) -> Option<CaseKind> {
        self.steps.iter().find(|s| s.matched).map(|s| s.kind)
    }

    /// Whether the `default` case produced the result.
    #[must_use]
    pub fn used_default(&self) -> bool {
        self.matched_kind() == Some(CaseKind::Default)
    }
}

impl<R: fmt::Debug> fmt::Debug for EvalTrace<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalTrace")
            .field("result", &self.result)
            .field("steps", &self.steps)
            .field("subject", &self.subject)
            .finish()
    }
}

/// One case's evaluation in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalStep {
    /// Registration index (0-based).
    pub index: usize,
    /// How the case was registered.
    pub kind: CaseKind,
    /// Did the case's test pass?
    pub matched: bool,
}
