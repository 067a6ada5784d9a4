//! casewise - Expression-oriented pattern matching with deep equality
//!
//! Switch semantics for values Rust's `match` cannot inspect at runtime:
//! data loaded from config, values compared structurally across separately
//! built composites, or values compared under a custom equality.
//!
//! # Architecture
//!
//! - [`Matcher<T, E>`] — Builder wrapping the subject; selects the equality strategy
//! - [`Matching<'a, T, R, E>`] — Ordered chain of cases, consumed by `exec()`
//! - [`Value`] / [`ToValue`] — Erased structural representation used by deep equality
//! - [`Equality<T>`] — Chain-wide strategy ([`DeepEqual`], [`PartialEqual`], [`EqualityFn`], [`Customized`])
//! - [`Customizer`] — Tri-state hook consulted before the structural rule
//!
//! # Key Design Insights
//!
//! 1. **First match wins**: cases run in registration order; the first
//!    passing test's handler receives the subject by value and nothing after
//!    it runs.
//!
//! 2. **No implicit default**: a chain where every test fails returns
//!    [`UnmatchedValue`]. Register `default` to catch everything.
//!
//! 3. **Linear use by ownership**: every registration consumes the chain and
//!    returns the extended one, so a stale chain cannot be executed.
//!
//! # Example
//!
//! ```
//! use casewise::matcher;
//!
//! let label = matcher(vec![1, 2])
//!     .case(vec![1, 3], |_| "one-three")
//!     .case_multi([vec![], vec![0]], |_| "trivial")
//!     .case_guarded(|v| v.len() > 5, |_| "long")
//!     .case(vec![1, 2], |v| if v[0] == 1 { "one-two" } else { "?" })
//!     .exec();
//! assert_eq!(label, Ok("one-two"));
//! ```
//!
//! # Features
//!
//! - `serde` — [`to_value`] converts any `Serialize` type into a [`Value`]
//! - `json` — `serde_json::Value` implements [`ToValue`]
//! - `config` — declarative case tables loaded from JSON or YAML

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod builder;
mod case;
mod diagnostics;
mod equality;
mod matching;
mod to_value;
mod trace;
mod value;

#[cfg(feature = "serde")]
mod ser;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use builder::{matcher, Matcher};
pub use case::CaseKind;
pub use matching::Matching;

// Equality
pub use equality::{
    deep_equal, deep_equal_with, Customized, Customizer, DeepEqual, Equality, EqualityFn,
    EqualityOptions, PartialEqual, Path, Segment, Subject, Verdict,
};
pub use to_value::ToValue;
pub use value::{CustomValue, Fields, Value};

// Trace types
pub use trace::{EvalStep, EvalTrace};

// Diagnostics
pub use diagnostics::{forgotten_exec_check, forgotten_exec_count, set_forgotten_exec_check};

// Serde bridge (feature-gated)
#[cfg(feature = "serde")]
pub use ser::{to_value, ValueError};

// Case tables (feature-gated)
#[cfg(feature = "config")]
pub use config::{CaseConfig, CaseTable, ConfigError, TableConfig, WhenConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use casewise::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Entry point
        matcher,
        // Equality
        Customizer,
        DeepEqual,
        Equality,
        EqualityFn,
        EqualityOptions,
        // Trace types
        EvalTrace,
        // Core types
        Matcher,
        Matching,
        PartialEqual,
        ToValue,
        // Errors
        UnmatchedValue,
        Value,
        Verdict,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of cases in a declarative case table.
///
/// Chains built in code are unbounded; tables come from untrusted config.
pub const MAX_CASES: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// No case of a chain matched its subject.
///
/// Carries the subject's `Debug` rendering, so the error outlives the
/// subject (which was owned by the chain).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unmatched value {rendering}")]
pub struct UnmatchedValue {
    rendering: String,
}

impl UnmatchedValue {
    /// Build from the unmatched subject.
    pub fn new<T: std::fmt::Debug + ?Sized>(subject: &T) -> Self {
        Self::from_rendering(format!("{subject:?}"))
    }

    /// Build from an already rendered subject.
    #[must_use]
    pub fn from_rendering(rendering: String) -> Self {
        Self { rendering }
    }

    /// `Debug` rendering of the subject.
    #[must_use]
    pub fn rendering(&self) -> &str {
        &self.rendering
    }
}
