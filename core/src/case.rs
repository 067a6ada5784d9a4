//! `Case` — Test + handler pair registered on a chain
//!
//! A case is built once at registration and never mutated. Its test decides
//! whether it applies to the subject; its handler produces the chain's result.

use crate::{Equality, Subject};
use std::fmt::{self, Debug};

/// How a case was registered.
///
/// Recorded on every case for traces and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// `case` / `case_with`: the subject equals one test value.
    Value,
    /// `case_multi` / `case_multi_with`: the subject equals any of the test values.
    Multi,
    /// `case_guarded`: an arbitrary predicate.
    Guard,
    /// `default`: always matches.
    Default,
}

impl CaseKind {
    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Multi => "multi",
            Self::Guard => "guard",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison through the chain-wide strategy `E`, resolved when the case
/// is registered.
pub(crate) type Compare<T, E> = fn(&E, &Subject<'_, T>, &T) -> bool;

/// The test half of a case.
///
/// # Variants
///
/// - `Equals` — any candidate equals the subject under the chain's equality
/// - `EqualsWith` — same, under a per-case equality (customized comparison)
/// - `Guard` — caller predicate, no equality involved
/// - `Always` — the `default` case
pub(crate) enum Test<'a, T, E> {
    Equals {
        candidates: Vec<T>,
        compare: Compare<T, E>,
    },
    EqualsWith {
        candidates: Vec<T>,
        equality: Box<dyn Equality<T> + 'a>,
    },
    Guard(Box<dyn Fn(&T) -> bool + 'a>),
    Always,
}

impl<T, E> Test<'_, T, E> {
    /// `Equals` under `E`.
    pub(crate) fn equals(candidates: Vec<T>) -> Self
    where
        E: Equality<T>,
    {
        Self::Equals {
            candidates,
            compare: <E as Equality<T>>::equals_subject,
        }
    }

    /// Evaluate against the subject.
    ///
    /// `equality` is only consulted by `Equals`. Candidate lists
    /// short-circuit on the first equal candidate. An empty list never
    /// matches.
    pub(crate) fn evaluate(&self, subject: &Subject<'_, T>, equality: &E) -> bool {
        match self {
            Self::Equals {
                candidates,
                compare,
            } => candidates.iter().any(|c| compare(equality, subject, c)),
            Self::EqualsWith {
                candidates,
                equality,
            } => candidates.iter().any(|c| equality.equals_subject(subject, c)),
            Self::Guard(predicate) => predicate(subject.get()),
            Self::Always => true,
        }
    }
}

impl<T: Debug, E> Debug for Test<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { candidates, .. } => f.debug_tuple("Equals").field(candidates).finish(),
            Self::EqualsWith { candidates, .. } => {
                f.debug_tuple("EqualsWith").field(candidates).finish()
            }
            Self::Guard(_) => f.debug_tuple("Guard").finish(),
            Self::Always => f.debug_tuple("Always").finish(),
        }
    }
}

/// A registered case: kind, test and handler.
pub(crate) struct Case<'a, T, R, E> {
    pub(crate) kind: CaseKind,
    pub(crate) test: Test<'a, T, E>,
    pub(crate) handler: Box<dyn FnOnce(T) -> R + 'a>,
}

impl<'a, T, R, E> Case<'a, T, R, E> {
    pub(crate) fn new(
        kind: CaseKind,
        test: Test<'a, T, E>,
        handler: Box<dyn FnOnce(T) -> R + 'a>,
    ) -> Self {
        Self { kind, test, handler }
    }
}

impl<T: Debug, R, E> Debug for Case<'_, T, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("kind", &self.kind)
            .field("test", &self.test)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeepEqual, EqualityFn, PartialEqual};

    fn check<E>(test: &Test<'_, i32, E>, subject: i32, equality: &E) -> bool {
        test.evaluate(&Subject::new(&subject), equality)
    }

    #[test]
    fn equals_matches_any_candidate() {
        let test = Test::<i32, DeepEqual>::equals(vec![1, 2, 3]);
        assert!(check(&test, 2, &DeepEqual));
        assert!(!check(&test, 4, &DeepEqual));
    }

    #[test]
    fn empty_candidates_never_match() {
        let test = Test::<i32, DeepEqual>::equals(vec![]);
        assert!(!check(&test, 0, &DeepEqual));
    }

    #[test]
    fn equals_with_ignores_chain_equality() {
        let test: Test<'_, i32, PartialEqual> = Test::EqualsWith {
            candidates: vec![10],
            equality: Box::new(EqualityFn(|a: &i32, b: &i32| a % 5 == b % 5)),
        };
        assert!(check(&test, 15, &PartialEqual));
    }

    #[derive(Debug)]
    struct Opaque;

    #[test]
    fn guard_and_always_need_no_equality() {
        let guard: Test<'_, i32, Opaque> = Test::Guard(Box::new(|x| *x < 0));
        assert!(check(&guard, -1, &Opaque));
        assert!(!check(&guard, 1, &Opaque));
        assert!(check(&Test::<i32, Opaque>::Always, 1, &Opaque));
    }

    #[test]
    fn candidate_scan_short_circuits() {
        let calls = std::cell::Cell::new(0);
        let counting = EqualityFn(|a: &i32, b: &i32| {
            calls.set(calls.get() + 1);
            a == b
        });
        let test = Test::equals(vec![1, 2, 3, 4]);
        assert!(check(&test, 2, &counting));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn kind_names() {
        assert_eq!(CaseKind::Value.to_string(), "value");
        assert_eq!(CaseKind::Multi.as_str(), "multi");
        assert_eq!(CaseKind::Guard.as_str(), "guard");
        assert_eq!(CaseKind::Default.as_str(), "default");
    }

    #[test]
    fn debug_hides_closures() {
        let case: Case<'_, i32, i32, DeepEqual> = Case::new(
            CaseKind::Guard,
            Test::Guard(Box::new(|_| true)),
            Box::new(|x| x),
        );
        let debug = format!("{case:?}");
        assert!(debug.contains("Guard"));
    }
}
