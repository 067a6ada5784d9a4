//! Equality — How value cases decide whether the subject equals a test value
//!
//! Two layers:
//!
//! - [`deep_equal`] / [`deep_equal_with`] — structural comparison of [`Value`]s,
//!   optionally consulting a [`Customizer`] for every pair of (sub)values.
//! - [`Equality<T>`] — the chain-wide strategy used by `case` / `case_multi`.
//!   [`DeepEqual`] is the default; [`PartialEqual`] and [`EqualityFn`] cover
//!   subjects that have no structural representation.
//!
//! # Deep equality rules
//!
//! | Values | Equal when |
//! |--------|-----------|
//! | scalars | same variant and same value (`NaN == NaN`, `0.0 == -0.0`) |
//! | `List` | same length, elements equal in order |
//! | `Set` | same length, every member matches a distinct member |
//! | `Map` | same length, every key found with an equal value |
//! | `Record` | same name, fields equal (named fields matched by name) |
//! | `Custom` | [`CustomValue::structural_eq`](crate::CustomValue::structural_eq), else same allocation |
//!
//! Lists, map values and record fields are walked with an explicit work
//! stack, so nesting depth does not grow the call stack. Set members and map
//! keys are matched with a nested comparison.
//!
//! A customizer need not be transitive (`float_epsilon` is not), so with one
//! present set members are paired by maximum matching instead of first fit.

use crate::{Fields, ToValue, Value};
use std::borrow::Cow;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Customizer
// ═══════════════════════════════════════════════════════════════════════════════

/// Tri-state answer of a [`Customizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The pair is equal. Its contents are not inspected further.
    Equal,
    /// The pair is not equal. Comparison stops.
    NotEqual,
    /// No opinion: apply the structural rule to this pair.
    Defer,
}

impl From<bool> for Verdict {
    fn from(equal: bool) -> Self {
        if equal {
            Self::Equal
        } else {
            Self::NotEqual
        }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(answer: Option<bool>) -> Self {
        answer.map_or(Self::Defer, Self::from)
    }
}

/// One step from a composite value to one of its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Position in a list, set or positional record.
    Index(usize),
    /// Key of a map entry.
    Key(Value),
    /// Named record field.
    Field(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Key(k) => write!(f, "[{k}]"),
            Self::Field(name) => write!(f, ".{name}"),
        }
    }
}

/// Location of a pair of values inside the compared roots.
///
/// The root pair has an empty path. Displayed as `$`, `$.a[0]`, `$["key"]`.
/// Children share their parent's segments, so extending a path is O(1).
#[derive(Clone, Default)]
pub struct Path {
    tail: Option<Rc<PathNode>>,
}

struct PathNode {
    parent: Option<Rc<PathNode>>,
    segment: Segment,
    depth: usize,
}

impl Path {
    /// The path of the root pair.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Segments from the root down to this pair.
    #[must_use]
    pub fn segments(&self) -> Vec<&Segment> {
        let mut segments = Vec::with_capacity(self.depth());
        let mut node = self.tail.as_deref();
        while let Some(n) = node {
            segments.push(&n.segment);
            node = n.parent.as_deref();
        }
        segments.reverse();
        segments
    }

    /// Nesting depth (0 at the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tail.as_ref().map_or(0, |n| n.depth)
    }

    /// Returns `true` at the root pair.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tail.is_none()
    }

    /// The last segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.tail.as_ref().map(|n| &n.segment)
    }

    /// Returns `true` if the last segment is the named field or string key.
    #[must_use]
    pub fn ends_with_name(&self, name: &str) -> bool {
        match self.last() {
            Some(Segment::Field(field)) => field == name,
            Some(Segment::Key(key)) => key.as_str() == Some(name),
            _ => false,
        }
    }

    fn child(&self, segment: Segment) -> Self {
        Self {
            tail: Some(Rc::new(PathNode {
                parent: self.tail.clone(),
                segment,
                depth: self.depth() + 1,
            })),
        }
    }
}

// Unlinks the chain iteratively; deep paths would overflow the stack otherwise.
impl Drop for Path {
    fn drop(&mut self) {
        let mut tail = self.tail.take();
        while let Some(node) = tail {
            match Rc::try_unwrap(node) {
                Ok(mut node) => tail = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments()).finish()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.segments() {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Hook that overrides how two (sub)values are compared.
///
/// Consulted for every pair before the structural rule, starting with the
/// roots. Return [`Verdict::Defer`] for pairs it has no opinion on.
///
/// Any closure `Fn(&Value, &Value, &Path) -> Verdict` is a customizer.
///
/// # Example
///
/// ```
/// use casewise::{deep_equal_with, Value, Verdict};
///
/// // Ignore the `id` field wherever it appears.
/// let ignore_ids = |_: &Value, _: &Value, path: &casewise::Path| {
///     if path.ends_with_name("id") { Verdict::Equal } else { Verdict::Defer }
/// };
///
/// let a = Value::named("User", [("id", Value::Int(1)), ("name", Value::from("ann"))]);
/// let b = Value::named("User", [("id", Value::Int(2)), ("name", Value::from("ann"))]);
/// assert!(deep_equal_with(&a, &b, &ignore_ids));
/// ```
pub trait Customizer {
    /// Compare `left` (from the subject) with `right` (from the test value).
    fn compare(&self, left: &Value, right: &Value, path: &Path) -> Verdict;
}

impl<F> Customizer for F
where
    F: Fn(&Value, &Value, &Path) -> Verdict,
{
    fn compare(&self, left: &Value, right: &Value, path: &Path) -> Verdict {
        self(left, right, path)
    }
}

/// Ready-made customizer for common relaxations.
///
/// ```
/// use casewise::{deep_equal_with, EqualityOptions, Value};
///
/// let options = EqualityOptions { ignore_ascii_case: true, ..EqualityOptions::default() };
/// assert!(deep_equal_with(&Value::from("GET"), &Value::from("get"), &options));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct EqualityOptions {
    /// Compare strings and chars ignoring ASCII case.
    pub ignore_ascii_case: bool,

    /// Treat floats within this absolute distance as equal.
    pub float_epsilon: Option<f64>,
}

impl Customizer for EqualityOptions {
    fn compare(&self, left: &Value, right: &Value, _path: &Path) -> Verdict {
        match (left, right) {
            (Value::String(a), Value::String(b)) if self.ignore_ascii_case => {
                a.eq_ignore_ascii_case(b).into()
            }
            (Value::Char(a), Value::Char(b)) if self.ignore_ascii_case => {
                a.eq_ignore_ascii_case(b).into()
            }
            (Value::Float(a), Value::Float(b)) => match self.float_epsilon {
                Some(epsilon) => ((a - b).abs() <= epsilon).into(),
                None => Verdict::Defer,
            },
            _ => Verdict::Defer,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Deep equality
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural equality of two values.
///
/// ```
/// use casewise::{deep_equal, Value};
///
/// let a = Value::map([("a", Value::map([("b", 4)]))]);
/// let b = Value::map([("a", Value::map([("b", 4)]))]);
/// let c = Value::map([("a", Value::map([("b", 5)]))]);
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
#[must_use]
pub fn deep_equal(left: &Value, right: &Value) -> bool {
    compare_at(left, right, Path::root(), None)
}

/// Structural equality consulting `customizer` for every pair of values.
#[must_use]
pub fn deep_equal_with(left: &Value, right: &Value, customizer: &dyn Customizer) -> bool {
    compare_at(left, right, Path::root(), Some(customizer))
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn compare_at<'v>(
    left: &'v Value,
    right: &'v Value,
    path: Path,
    customizer: Option<&dyn Customizer>,
) -> bool {
    let mut stack: Vec<(&'v Value, &'v Value, Path)> = vec![(left, right, path)];

    while let Some((l, r, path)) = stack.pop() {
        if let Some(c) = customizer {
            match c.compare(l, r, &path) {
                Verdict::Equal => continue,
                Verdict::NotEqual => return false,
                Verdict::Defer => {}
            }
        }

        let equal = match (l, r) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                push_ordered(&mut stack, a, b, &path);
                true
            }
            (Value::Set(a), Value::Set(b)) => set_eq(a, b, &path, customizer),
            (Value::Map(a), Value::Map(b)) => match pair_entries(a, b) {
                Some(pairs) => {
                    // Reversed so the first entry is compared first.
                    for (key, lv, rv) in pairs.into_iter().rev() {
                        stack.push((lv, rv, path.child(Segment::Key(key.clone()))));
                    }
                    true
                }
                None => false,
            },
            (
                Value::Record {
                    name: ln,
                    fields: lf,
                },
                Value::Record {
                    name: rn,
                    fields: rf,
                },
            ) => ln == rn && push_fields(&mut stack, lf, rf, &path),
            (Value::Custom(a), Value::Custom(b)) => a
                .structural_eq(&**b)
                .unwrap_or_else(|| Arc::ptr_eq(a, b)),
            _ => false,
        };

        if !equal {
            return false;
        }
    }

    true
}

fn push_ordered<'v>(
    stack: &mut Vec<(&'v Value, &'v Value, Path)>,
    left: &'v [Value],
    right: &'v [Value],
    path: &Path,
) {
    for (i, (l, r)) in left.iter().zip(right).enumerate().rev() {
        stack.push((l, r, path.child(Segment::Index(i))));
    }
}

fn push_fields<'v>(
    stack: &mut Vec<(&'v Value, &'v Value, Path)>,
    left: &'v Fields,
    right: &'v Fields,
    path: &Path,
) -> bool {
    match (left, right) {
        (Fields::Unit, Fields::Unit) => true,
        (Fields::Positional(a), Fields::Positional(b)) => {
            if a.len() != b.len() {
                return false;
            }
            push_ordered(stack, a, b, path);
            true
        }
        (Fields::Named(a), Fields::Named(b)) => {
            if a.len() != b.len() {
                return false;
            }
            let mut pairs = Vec::with_capacity(a.len());
            for (name, lv) in a {
                match b.iter().find(|(other, _)| other == name) {
                    Some((_, rv)) => pairs.push((name, lv, rv)),
                    None => return false,
                }
            }
            for (name, lv, rv) in pairs.into_iter().rev() {
                stack.push((lv, rv, path.child(Segment::Field(name.clone()))));
            }
            true
        }
        _ => false,
    }
}

/// Match map entries by key. Keys are compared structurally, without the
/// customizer: the customizer decides about values, not about lookup.
fn pair_entries<'v>(
    left: &'v [(Value, Value)],
    right: &'v [(Value, Value)],
) -> Option<Vec<(&'v Value, &'v Value, &'v Value)>> {
    if left.len() != right.len() {
        return None;
    }
    left.iter()
        .map(|(key, lv)| {
            right
                .iter()
                .find(|(other, _)| deep_equal(key, other))
                .map(|(_, rv)| (key, lv, rv))
        })
        .collect()
}

/// Members of `left` must each pair with a distinct member of `right`.
fn set_eq(
    left: &[Value],
    right: &[Value],
    path: &Path,
    customizer: Option<&dyn Customizer>,
) -> bool {
    if left.len() != right.len() {
        return false;
    }
    match customizer {
        None => first_fit_pairing(left, right, path),
        Some(customizer) => maximum_pairing(left, right, path, customizer),
    }
}

/// Plain deep equality is an equivalence, so any equal free member will do.
fn first_fit_pairing(left: &[Value], right: &[Value], path: &Path) -> bool {
    let mut used = vec![false; right.len()];
    for (i, member) in left.iter().enumerate() {
        let member_path = path.child(Segment::Index(i));
        let found = right.iter().enumerate().find(|(j, other)| {
            !used[*j] && compare_at(member, other, member_path.clone(), None)
        });
        match found {
            Some((j, _)) => used[j] = true,
            None => return false,
        }
    }
    true
}

/// Kuhn's augmenting paths over the "equal under the customizer" relation.
fn maximum_pairing(
    left: &[Value],
    right: &[Value],
    path: &Path,
    customizer: &dyn Customizer,
) -> bool {
    let mut partners = Vec::with_capacity(left.len());
    for (i, member) in left.iter().enumerate() {
        let member_path = path.child(Segment::Index(i));
        let equal: Vec<usize> = right
            .iter()
            .enumerate()
            .filter(|(_, other)| compare_at(member, other, member_path.clone(), Some(customizer)))
            .map(|(j, _)| j)
            .collect();
        if equal.is_empty() {
            return false;
        }
        partners.push(equal);
    }

    let mut owner = vec![None; right.len()];
    (0..left.len()).all(|i| {
        let mut visited = vec![false; right.len()];
        augment(i, &partners, &mut owner, &mut visited)
    })
}

fn augment(
    member: usize,
    partners: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &j in &partners[member] {
        if visited[j] {
            continue;
        }
        visited[j] = true;
        let free = match owner[j] {
            None => true,
            Some(previous) => augment(previous, partners, owner, visited),
        };
        if free {
            owner[j] = Some(member);
            return true;
        }
    }
    false
}

// ═══════════════════════════════════════════════════════════════════════════════
// Equality strategies
// ═══════════════════════════════════════════════════════════════════════════════

/// Chain-wide equality strategy for value cases.
///
/// Selected with [`Matcher::using`](crate::Matcher::using). The subject is
/// always the left operand.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot compare values of type `{T}`",
    label = "this equality strategy does not apply to `{T}`",
    note = "`DeepEqual` needs `{T}: ToValue`, `PartialEqual` needs `{T}: PartialEq`"
)]
pub trait Equality<T: ?Sized> {
    /// Returns `true` if `subject` equals `candidate`.
    fn equals(&self, subject: &T, candidate: &T) -> bool;

    /// [`equals`](Self::equals) against a subject shared by every case of
    /// one evaluation.
    ///
    /// Strategies that convert the subject override this to convert it once
    /// through [`Subject::value`].
    fn equals_subject(&self, subject: &Subject<'_, T>, candidate: &T) -> bool {
        self.equals(subject.get(), candidate)
    }
}

/// The subject of one evaluation, with its [`Value`] computed on first use.
pub struct Subject<'s, T: ?Sized> {
    raw: &'s T,
    value: OnceCell<Cow<'s, Value>>,
}

impl<'s, T: ?Sized> Subject<'s, T> {
    /// Wrap a subject. Nothing is converted yet.
    pub fn new(raw: &'s T) -> Self {
        Self {
            raw,
            value: OnceCell::new(),
        }
    }

    /// The subject itself.
    #[must_use]
    pub fn get(&self) -> &'s T {
        self.raw
    }

    /// The subject's structural representation, converted at most once.
    pub fn value(&self) -> &Value
    where
        T: ToValue,
    {
        self.value.get_or_init(|| T::value_ref(self.raw))
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for Subject<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subject").field(&self.raw).finish()
    }
}

/// Structural equality through [`ToValue`]. The default strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeepEqual;

impl DeepEqual {
    /// Deep equality that consults `customizer` first.
    #[must_use]
    pub fn with<C: Customizer>(self, customizer: C) -> Customized<C> {
        Customized { customizer }
    }
}

impl<T: ToValue + ?Sized> Equality<T> for DeepEqual {
    fn equals(&self, subject: &T, candidate: &T) -> bool {
        deep_equal(&subject.value_ref(), &candidate.value_ref())
    }

    fn equals_subject(&self, subject: &Subject<'_, T>, candidate: &T) -> bool {
        deep_equal(subject.value(), &candidate.value_ref())
    }
}

/// Plain [`PartialEq`] comparison.
///
/// For subjects without a [`ToValue`] implementation. Derived `PartialEq`
/// is already structural for owned data; it only differs from [`DeepEqual`]
/// for unordered collections and customizers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialEqual;

impl<T: PartialEq + ?Sized> Equality<T> for PartialEqual {
    fn equals(&self, subject: &T, candidate: &T) -> bool {
        subject == candidate
    }
}

/// Equality defined by a caller-supplied function.
///
/// ```
/// use casewise::{matcher, EqualityFn};
///
/// let same_len = EqualityFn(|a: &&str, b: &&str| a.len() == b.len());
/// let result = matcher("abc").using(same_len).case("xyz", |_| 3).exec();
/// assert_eq!(result, Ok(3));
/// ```
#[derive(Clone, Copy)]
pub struct EqualityFn<F>(pub F);

impl<F> fmt::Debug for EqualityFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EqualityFn")
    }
}

impl<T: ?Sized, F> Equality<T> for EqualityFn<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, subject: &T, candidate: &T) -> bool {
        (self.0)(subject, candidate)
    }
}

/// Deep equality with a [`Customizer`] consulted first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Customized<C> {
    customizer: C,
}

impl<C> Customized<C> {
    /// Wrap a customizer.
    pub fn new(customizer: C) -> Self {
        Self { customizer }
    }

    /// The wrapped customizer.
    pub fn customizer(&self) -> &C {
        &self.customizer
    }
}

impl<T: ToValue + ?Sized, C: Customizer> Equality<T> for Customized<C> {
    fn equals(&self, subject: &T, candidate: &T) -> bool {
        deep_equal_with(&subject.value_ref(), &candidate.value_ref(), &self.customizer)
    }

    fn equals_subject(&self, subject: &Subject<'_, T>, candidate: &T) -> bool {
        deep_equal_with(subject.value(), &candidate.value_ref(), &self.customizer)
    }
}
