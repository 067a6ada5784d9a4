//! `Matcher` — The pre-case builder
//!
//! Wraps the subject and selects the equality strategy. Every case
//! registration consumes the builder and returns a [`Matching`] chain, so a
//! builder can never be executed on its own.

use crate::{Customizer, DeepEqual, Equality, Matching, ToValue};
use std::fmt;

/// Start a match on `subject` with deep structural equality.
///
/// # Example
///
/// ```
/// use casewise::matcher;
///
/// let sign = matcher(-5)
///     .case(0, |_| "zero")
///     .case_guarded(|x| *x < 0, |_| "less")
///     .default(|_| "more")
///     .exec();
/// assert_eq!(sign, Ok("less"));
/// ```
#[must_use = "a matcher does nothing until cases are registered and exec() is called"]
pub fn matcher<T>(subject: T) -> Matcher<T> {
    Matcher::new(subject)
}

/// Builder holding the subject before any case is registered.
///
/// `E` is the chain-wide equality used by `case` and `case_multi`.
#[must_use = "a matcher does nothing until cases are registered and exec() is called"]
pub struct Matcher<T, E = DeepEqual> {
    subject: T,
    equality: E,
}

impl<T> Matcher<T> {
    /// Same as [`matcher`].
    pub fn new(subject: T) -> Self {
        Self {
            subject,
            equality: DeepEqual,
        }
    }
}

impl<T, E> Matcher<T, E> {
    /// Replace the chain-wide equality strategy.
    ///
    /// ```
    /// use casewise::{matcher, PartialEqual};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Opaque(u8);
    ///
    /// let hit = matcher(Opaque(3))
    ///     .using(PartialEqual)
    ///     .case(Opaque(3), |_| true)
    ///     .default(|_| false)
    ///     .exec();
    /// assert_eq!(hit, Ok(true));
    /// ```
    pub fn using<E2: Equality<T>>(self, equality: E2) -> Matcher<T, E2> {
        Matcher {
            subject: self.subject,
            equality,
        }
    }

    /// The wrapped subject.
    pub fn subject(&self) -> &T {
        &self.subject
    }

    fn into_chain<'a, R>(self) -> Matching<'a, T, R, E> {
        Matching::new(self.subject, self.equality)
    }

    /// Register a value case compared by deep equality under `customizer`.
    pub fn case_with<'a, R, C>(
        self,
        value: T,
        handler: impl FnOnce(T) -> R + 'a,
        customizer: C,
    ) -> Matching<'a, T, R, E>
    where
        T: ToValue + 'a,
        C: Customizer + 'a,
    {
        self.into_chain().case_with(value, handler, customizer)
    }

    /// [`case_multi`](Self::case_multi) compared under `customizer`.
    pub fn case_multi_with<'a, R, I, C>(
        self,
        values: I,
        handler: impl FnOnce(T) -> R + 'a,
        customizer: C,
    ) -> Matching<'a, T, R, E>
    where
        T: ToValue + 'a,
        I: IntoIterator<Item = T>,
        C: Customizer + 'a,
    {
        self.into_chain().case_multi_with(values, handler, customizer)
    }

    /// Register a case that fires when `predicate` returns true.
    ///
    /// Guards never consult the equality strategy, so the subject may be of
    /// any type.
    pub fn case_guarded<'a, R>(
        self,
        predicate: impl Fn(&T) -> bool + 'a,
        handler: impl FnOnce(T) -> R + 'a,
    ) -> Matching<'a, T, R, E>
    where
        T: 'a,
    {
        self.into_chain().case_guarded(predicate, handler)
    }
}

impl<T, E: Equality<T>> Matcher<T, E> {
    /// Register a case that fires when the subject equals `value`.
    pub fn case<'a, R>(
        self,
        value: T,
        handler: impl FnOnce(T) -> R + 'a,
    ) -> Matching<'a, T, R, E>
    where
        T: 'a,
    {
        self.into_chain().case(value, handler)
    }

    /// Register a case that fires when the subject equals any of `values`.
    pub fn case_multi<'a, R, I>(
        self,
        values: I,
        handler: impl FnOnce(T) -> R + 'a,
    ) -> Matching<'a, T, R, E>
    where
        T: 'a,
        I: IntoIterator<Item = T>,
    {
        self.into_chain().case_multi(values, handler)
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Matcher<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("subject", &self.subject)
            .field("equality", &self.equality)
            .finish()
    }
}
