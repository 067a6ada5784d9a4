//! Config types for declarative case tables.
//!
//! A case table is a chain whose test values and actions come from JSON or
//! YAML instead of code. Tables are validated once by
//! [`TableConfig::build()`] and evaluated many times; every evaluation runs
//! a fresh [`Matching`] chain, so evaluations share no state.
//!
//! ```yaml
//! cases:
//!   - when: { value: 0 }
//!     action: zero
//!   - when: { any_of: ["GET", "HEAD"] }
//!     options: { ignore_ascii_case: true }
//!     action: read
//!   - when: always
//!     action: other
//! default: unreachable
//! ```
//!
//! # Relationship to runtime types
//!
//! | Config | Chain registration |
//! |--------|--------------------|
//! | `when: { value: v }` | `case` / `case_with` |
//! | `when: { any_of: [..] }` | `case_multi` / `case_multi_with` |
//! | `when: always`, `default` | `default` |
//!
//! JSON numbers without a fraction are integers and never equal a float
//! subject: `2` matches the integer subject `2`, `2.0` does not.

use crate::{
    CaseKind, DeepEqual, EqualityOptions, EvalTrace, Matching, ToValue, UnmatchedValue, Value,
    MAX_CASES,
};
use serde::de::{self, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Configuration for a [`CaseTable`].
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct TableConfig<A> {
    /// Cases to evaluate in order (first-match-wins).
    pub cases: Vec<CaseConfig<A>>,

    /// Action when no case matches. Without it, unmatched subjects fail.
    #[serde(default)]
    pub default: Option<A>,
}

/// Configuration for one table case.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct CaseConfig<A> {
    /// The test.
    pub when: WhenConfig,

    /// Relaxed comparison for this case. Absent means exact deep equality.
    #[serde(default)]
    pub options: Option<EqualityOptions>,

    /// The action returned when the case matches.
    pub action: A,
}

/// The test of a table case.
///
/// A one-key map or the bare string `always`, in JSON and YAML alike:
///
/// ```json
/// { "value": {"a": {"b": 4}} }
/// { "any_of": [1, 2, 3] }
/// "always"
/// ```
#[derive(Debug, Clone)]
pub enum WhenConfig {
    /// The subject deep-equals this value.
    Value(serde_json::Value),
    /// The subject deep-equals any of these values.
    AnyOf(Vec<serde_json::Value>),
    /// Always matches.
    Always,
}

impl<'de> Deserialize<'de> for WhenConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WhenVisitor)
    }
}

const WHEN_KEYS: &[&str] = &["value", "any_of"];

struct WhenVisitor;

impl<'de> Visitor<'de> for WhenVisitor {
    type Value = WhenConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`always`, `{ value: .. }` or `{ any_of: [..] }`")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WhenConfig, E> {
        match v {
            "always" => Ok(WhenConfig::Always),
            other => Err(E::unknown_variant(other, &["always"])),
        }
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<WhenConfig, M::Error> {
        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        let when = match key.as_str() {
            "value" => WhenConfig::Value(map.next_value()?),
            "any_of" => WhenConfig::AnyOf(map.next_value()?),
            other => return Err(de::Error::unknown_field(other, WHEN_KEYS)),
        };
        if map.next_key::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(
                "`when` takes exactly one of `value` or `any_of`",
            ));
        }
        Ok(when)
    }
}

/// Errors from case table validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The table has more than [`MAX_CASES`] cases.
    #[error("case table has {count} cases, maximum is {max}")]
    TooManyCases {
        /// Number of configured cases.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A case carries unusable equality options.
    #[error("case {index}: invalid options: {reason}")]
    InvalidOptions {
        /// Position of the case in the table.
        index: usize,
        /// What is wrong.
        reason: String,
    },
}

enum TableTest {
    Value(Value),
    AnyOf(Vec<Value>),
    Always,
}

struct TableCase<A> {
    test: TableTest,
    options: Option<EqualityOptions>,
    action: A,
}

/// A validated case table.
///
/// Subjects are converted with [`ToValue`] and compared by deep equality.
pub struct CaseTable<A> {
    cases: Vec<TableCase<A>>,
    default: Option<A>,
}

impl<A> TableConfig<A> {
    /// Validate and convert into a [`CaseTable`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooManyCases`] above [`MAX_CASES`] and
    /// [`ConfigError::InvalidOptions`] for a negative or non-finite
    /// `float_epsilon`.
    pub fn build(self) -> Result<CaseTable<A>, ConfigError> {
        let count = self.cases.len();
        if count > MAX_CASES {
            return Err(ConfigError::TooManyCases {
                count,
                max: MAX_CASES,
            });
        }

        let mut cases = Vec::with_capacity(count);
        for (index, case) in self.cases.into_iter().enumerate() {
            if let Some(epsilon) = case.options.and_then(|o| o.float_epsilon) {
                if !epsilon.is_finite() || epsilon < 0.0 {
                    return Err(ConfigError::InvalidOptions {
                        index,
                        reason: format!(
                            "float_epsilon must be finite and non-negative, got {epsilon}"
                        ),
                    });
                }
            }

            let test = match case.when {
                WhenConfig::Value(v) => TableTest::Value(v.to_value()),
                WhenConfig::AnyOf(vs) => {
                    TableTest::AnyOf(vs.iter().map(ToValue::to_value).collect())
                }
                WhenConfig::Always => {
                    if index + 1 < count || self.default.is_some() {
                        tracing::warn!(index, "`always` case shadows everything after it");
                    }
                    TableTest::Always
                }
            };

            cases.push(TableCase {
                test,
                options: case.options,
                action: case.action,
            });
        }

        tracing::debug!(cases = count, has_default = self.default.is_some(), "case table built");
        Ok(CaseTable {
            cases,
            default: self.default,
        })
    }
}

impl<A: Clone> CaseTable<A> {
    /// Action of the first case matching `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`UnmatchedValue`] when no case matches and the table has no default.
    pub fn evaluate<S: ToValue + ?Sized>(&self, subject: &S) -> Result<A, UnmatchedValue> {
        self.chain(&subject.value_ref()).exec()
    }

    /// [`evaluate`](Self::evaluate) plus the evaluation path.
    pub fn evaluate_with_trace<S: ToValue + ?Sized>(&self, subject: &S) -> EvalTrace<A> {
        self.chain(&subject.value_ref()).exec_with_trace()
    }

    /// A chain over borrowed values: neither the subject nor the test values
    /// are copied per evaluation.
    fn chain<'v>(&'v self, subject: &'v Value) -> Matching<'v, &'v Value, A, DeepEqual> {
        let mut chain = Matching::new(subject, DeepEqual);
        for case in &self.cases {
            let action = move |_: &Value| case.action.clone();
            chain = match (&case.test, case.options) {
                (TableTest::Value(v), None) => chain.case(v, action),
                (TableTest::Value(v), Some(options)) => chain.case_with(v, action, options),
                (TableTest::AnyOf(vs), None) => chain.case_multi(vs, action),
                (TableTest::AnyOf(vs), Some(options)) => {
                    chain.case_multi_with(vs, action, options)
                }
                (TableTest::Always, _) => chain.default(action),
            };
        }
        if let Some(default) = &self.default {
            chain = chain.default(move |_| default.clone());
        }
        chain
    }
}

impl<A> CaseTable<A> {
    /// Number of cases, excluding the table default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if the table has no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns `true` if some subject falls through to a default action.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.cases.iter().any(|c| matches!(c.test, TableTest::Always))
    }

    /// Kinds of the cases in order, including the table default.
    #[must_use]
    pub fn kinds(&self) -> Vec<CaseKind> {
        let mut kinds: Vec<CaseKind> = self
            .cases
            .iter()
            .map(|c| match c.test {
                TableTest::Value(_) => CaseKind::Value,
                TableTest::AnyOf(_) => CaseKind::Multi,
                TableTest::Always => CaseKind::Default,
            })
            .collect();
        if self.default.is_some() {
            kinds.push(CaseKind::Default);
        }
        kinds
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for CaseTable<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseTable")
            .field("kinds", &self.kinds())
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
