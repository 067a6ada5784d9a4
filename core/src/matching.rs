//! `Matching` — The case chain and its evaluation
//!
//! Cases are tested in registration order. The first one whose test passes
//! receives the subject by value; no later test or handler runs. If every
//! test fails, `exec()` returns [`UnmatchedValue`].
//!
//! Registration takes the chain by value and hands it back with one more
//! case, so an earlier chain state can never be executed twice.
//!
//! Only `case` and `case_multi` go through the chain-wide equality `E`.
//! Guards, defaults and customized cases work for any subject type.

use crate::case::{Case, CaseKind, Test};
use crate::diagnostics::ExecGuard;
use crate::{
    Customized, Customizer, DeepEqual, Equality, EvalStep, EvalTrace, Subject, ToValue,
    UnmatchedValue,
};
use std::fmt;

/// A subject plus the ordered cases registered against it.
///
/// Created by the first case registration on a [`Matcher`](crate::Matcher).
/// `R` is the common result type of every handler.
#[must_use = "no handler runs until exec() is called"]
pub struct Matching<'a, T, R, E = DeepEqual> {
    subject: T,
    equality: E,
    cases: Vec<Case<'a, T, R, E>>,
    guard: ExecGuard,
}

impl<'a, T, R, E> Matching<'a, T, R, E> {
    pub(crate) fn new(subject: T, equality: E) -> Self {
        Self {
            subject,
            equality,
            cases: Vec::new(),
            guard: ExecGuard::default(),
        }
    }

    fn push(
        mut self,
        kind: CaseKind,
        test: Test<'a, T, E>,
        handler: Box<dyn FnOnce(T) -> R + 'a>,
    ) -> Self {
        tracing::trace!(index = self.cases.len(), %kind, "case registered");
        self.guard.record_case();
        self.cases.push(Case::new(kind, test, handler));
        self
    }

    /// Number of registered cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if no case is registered.
    ///
    /// Chains built through [`Matcher`](crate::Matcher) always hold at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns `true` if a `default` case is registered.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.cases.iter().any(|c| c.kind == CaseKind::Default)
    }

    /// The subject being matched.
    #[must_use]
    pub fn subject(&self) -> &T {
        &self.subject
    }
}

impl<'a, T: 'a, R, E: Equality<T>> Matching<'a, T, R, E> {
    /// Append a case that fires when the subject equals `value`.
    ///
    /// Equivalent to `case_guarded(|s| equality.equals(s, &value), handler)`.
    pub fn case(self, value: T, handler: impl FnOnce(T) -> R + 'a) -> Self {
        self.push(CaseKind::Value, Test::equals(vec![value]), Box::new(handler))
    }

    /// Append a case that fires when the subject equals any of `values`.
    ///
    /// Candidates are compared in order and the scan stops at the first
    /// equal one. An empty list never matches.
    pub fn case_multi<I>(self, values: I, handler: impl FnOnce(T) -> R + 'a) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let test = Test::equals(values.into_iter().collect());
        self.push(CaseKind::Multi, test, Box::new(handler))
    }
}

impl<'a, T: 'a, R, E> Matching<'a, T, R, E> {
    /// Append a value case compared by deep equality under `customizer`.
    ///
    /// The chain-wide strategy is not consulted for this case.
    ///
    /// ```
    /// use casewise::{matcher, EqualityOptions};
    ///
    /// let relaxed = EqualityOptions { ignore_ascii_case: true, ..Default::default() };
    /// let method = matcher("get")
    ///     .case_with("GET", |_| "read", relaxed)
    ///     .default(|_| "other")
    ///     .exec();
    /// assert_eq!(method, Ok("read"));
    /// ```
    pub fn case_with<C>(
        self,
        value: T,
        handler: impl FnOnce(T) -> R + 'a,
        customizer: C,
    ) -> Self
    where
        T: ToValue,
        C: Customizer + 'a,
    {
        let test = Test::EqualsWith {
            candidates: vec![value],
            equality: Box::new(Customized::new(customizer)),
        };
        self.push(CaseKind::Value, test, Box::new(handler))
    }

    /// [`case_multi`](Self::case_multi) compared under `customizer`.
    pub fn case_multi_with<I, C>(
        self,
        values: I,
        handler: impl FnOnce(T) -> R + 'a,
        customizer: C,
    ) -> Self
    where
        T: ToValue,
        I: IntoIterator<Item = T>,
        C: Customizer + 'a,
    {
        let test = Test::EqualsWith {
            candidates: values.into_iter().collect(),
            equality: Box::new(Customized::new(customizer)),
        };
        self.push(CaseKind::Multi, test, Box::new(handler))
    }

    /// Append a case that fires when `predicate` returns true.
    ///
    /// The predicate sees the subject by reference and is called at most once.
    pub fn case_guarded(
        self,
        predicate: impl Fn(&T) -> bool + 'a,
        handler: impl FnOnce(T) -> R + 'a,
    ) -> Self {
        self.push(CaseKind::Guard, Test::Guard(Box::new(predicate)), Box::new(handler))
    }

    /// Append a case that always fires.
    ///
    /// Cases registered after it are never reached.
    pub fn default(self, handler: impl FnOnce(T) -> R + 'a) -> Self {
        if self.has_default() {
            tracing::debug!(
                index = self.cases.len(),
                "default registered after an earlier default"
            );
        }
        self.push(CaseKind::Default, Test::Always, Box::new(handler))
    }

    /// Run the chain.
    ///
    /// Returns the first matching handler's result, or [`UnmatchedValue`]
    /// carrying the subject's `Debug` rendering. The subject is converted
    /// for comparison at most once, however many cases test it.
    ///
    /// ```
    /// use casewise::matcher;
    ///
    /// let err = matcher(2).case(1, |_| ()).exec().unwrap_err();
    /// assert_eq!(err.to_string(), "unmatched value 2");
    /// ```
    pub fn exec(self) -> Result<R, UnmatchedValue>
    where
        T: fmt::Debug,
    {
        let Self {
            subject,
            equality,
            cases,
            guard,
        } = self;
        guard.disarm();

        let hit = {
            let prepared = Subject::new(&subject);
            cases
                .into_iter()
                .enumerate()
                .find(|(_, case)| case.test.evaluate(&prepared, &equality))
        };

        match hit {
            Some((index, case)) => {
                tracing::trace!(index, kind = %case.kind, "case matched");
                Ok((case.handler)(subject))
            }
            None => {
                let unmatched = UnmatchedValue::new(&subject);
                tracing::debug!(subject = %unmatched.rendering(), "no case matched");
                Err(unmatched)
            }
        }
    }

    /// Run the chain and record every tested case.
    ///
    /// Same short-circuit as [`exec`](Self::exec); `trace.result` is what
    /// `exec()` would have returned.
    pub fn exec_with_trace(self) -> EvalTrace<R>
    where
        T: fmt::Debug,
    {
        let Self {
            subject,
            equality,
            cases,
            guard,
        } = self;
        guard.disarm();

        let rendering = format!("{subject:?}");
        let mut steps = Vec::new();
        let hit = {
            let prepared = Subject::new(&subject);
            let mut hit = None;
            for (index, case) in cases.into_iter().enumerate() {
                let matched = case.test.evaluate(&prepared, &equality);
                steps.push(EvalStep {
                    index,
                    kind: case.kind,
                    matched,
                });
                if matched {
                    hit = Some(case);
                    break;
                }
            }
            hit
        };

        let result = match hit {
            Some(case) => Ok((case.handler)(subject)),
            None => Err(UnmatchedValue::from_rendering(rendering.clone())),
        };
        EvalTrace {
            result,
            steps,
            subject: rendering,
        }
    }
}

impl<T: fmt::Debug, R, E: fmt::Debug> fmt::Debug for Matching<'_, T, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matching")
            .field("subject", &self.subject)
            .field("equality", &self.equality)
            .field("cases", &self.cases)
            .finish_non_exhaustive()
    }
}
