//! `ToValue` — Conversion of Rust data into [`Value`] for deep equality
//!
//! Implemented for scalars, strings, standard collections, smart pointers
//! and tuples. Domain types implement it by hand, or (feature `serde`) by
//! delegating to [`to_value`](crate::to_value).

use crate::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Converts a value into its structural [`Value`] representation.
///
/// The default equality strategy ([`DeepEqual`](crate::DeepEqual)) compares
/// subjects through this trait.
///
/// # Example
///
/// ```
/// use casewise::{matcher, ToValue, Value};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl ToValue for Point {
///     fn to_value(&self) -> Value {
///         Value::named("Point", [("x", self.x.to_value()), ("y", self.y.to_value())])
///     }
/// }
///
/// let quadrant = matcher(Point { x: 0, y: 0 })
///     .case(Point { x: 0, y: 0 }, |_| "origin")
///     .default(|_| "elsewhere")
///     .exec();
/// assert_eq!(quadrant, Ok("origin"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ToValue`",
    label = "deep equality cannot inspect this type",
    note = "implement `ToValue` for your type, or select another strategy with `.using(PartialEqual)`"
)]
pub trait ToValue {
    /// Produce the structural representation of `self`.
    fn to_value(&self) -> Value;

    /// Borrow the representation when `self` already is a [`Value`].
    ///
    /// Deep equality compares through this, so matching on a `Value` (or a
    /// reference to one) copies nothing.
    fn value_ref(&self) -> Cow<'_, Value> {
        Cow::Owned(self.to_value())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn value_ref(&self) -> Cow<'_, Value> {
        Cow::Borrowed(self)
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! int_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Int(i128::from(*self))
                }
            }
        )*
    };
}

int_to_value!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl ToValue for isize {
    fn to_value(&self) -> Value {
        // isize is at most 64 bits on every supported target
        Value::Int(*self as i128)
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i128)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<B> ToValue for Cow<'_, B>
where
    B: ToValue + ToOwned + ?Sized,
{
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
    fn value_ref(&self) -> Cow<'_, Value> {
        (**self).value_ref()
    }
}

impl<T: ToValue + ?Sized> ToValue for &mut T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
    fn value_ref(&self) -> Cow<'_, Value> {
        (**self).value_ref()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
    fn value_ref(&self) -> Cow<'_, Value> {
        (**self).value_ref()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
    fn value_ref(&self) -> Cow<'_, Value> {
        (**self).value_ref()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
    fn value_ref(&self) -> Cow<'_, Value> {
        (**self).value_ref()
    }
}

/// `None` is `Null` and `Some(x)` is `x`, unless `x` itself renders as
/// `Null` or as a wrapped `Some`. Then it becomes the one-field record
/// `Option::Some`, so `Some(None)` and `Some(())` stay distinct from `None`.
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref()
            .map_or(Value::Null, |inner| Value::some(inner.to_value()))
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

macro_rules! tuple_to_value {
    ($($name:ident),+) => {
        impl<$($name: ToValue),+> ToValue for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_value(&self) -> Value {
                let ($($name,)+) = self;
                Value::List(vec![$($name.to_value()),+])
            }
        }
    };
}

tuple_to_value!(A);
tuple_to_value!(A, B);
tuple_to_value!(A, B, C);
tuple_to_value!(A, B, C, D);
tuple_to_value!(A, B, C, D, E);
tuple_to_value!(A, B, C, D, E, F);

#[cfg(feature = "json")]
impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Int(i128::from(u))
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(ToValue::to_value).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (Value::String(k.clone()), v.to_value()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert!(matches!(7u8.to_value(), Value::Int(7)));
        assert!(matches!((-7i64).to_value(), Value::Int(-7)));
        assert!(matches!(usize::MAX.to_value(), Value::Int(_)));
        assert!(matches!(1.5f32.to_value(), Value::Float(x) if x == 1.5));
        assert!(matches!('x'.to_value(), Value::Char('x')));
        assert!(matches!(().to_value(), Value::Null));
        assert_eq!("abc".to_value().as_str(), Some("abc"));
    }

    #[test]
    fn sequences_become_lists() {
        let expected = Value::list([1, 2, 3]);
        assert_eq!(vec![1, 2, 3].to_value(), expected);
        assert_eq!([1, 2, 3].to_value(), expected);
        assert_eq!(VecDeque::from(vec![1, 2, 3]).to_value(), expected);
        assert_eq!((1, 2, 3).to_value(), expected);
    }

    #[test]
    fn sets_and_maps_ignore_iteration_order() {
        let hashed: HashSet<i32> = [3, 1, 2].into_iter().collect();
        let ordered: BTreeSet<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(hashed.to_value(), ordered.to_value());

        let hashed: HashMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
        let ordered: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(hashed.to_value(), ordered.to_value());
    }

    #[test]
    fn option_and_pointers_are_transparent() {
        assert_eq!(Some(4).to_value(), Value::Int(4));
        assert_eq!(Some(vec![1]).to_value(), Value::list([1]));
        assert!(None::<i32>.to_value().is_null());
        assert_eq!(Box::new("x").to_value(), Value::from("x"));
        assert_eq!(Rc::new(5u16).to_value(), Value::Int(5));
        assert_eq!(Arc::new(vec!['a']).to_value(), Value::list(['a']));
        assert_eq!(Cow::Borrowed("c").to_value(), Value::from("c"));
    }

    #[test]
    fn nested_options_keep_their_depth() {
        let none = None::<Option<i32>>.to_value();
        let some_none = Some(None::<i32>).to_value();
        let some_some_none = Some(Some(None::<i32>)).to_value();
        assert_ne!(some_none, none);
        assert_ne!(some_some_none, some_none);
        assert_ne!(Some(()).to_value(), None::<()>.to_value());
        assert_eq!(some_none, Value::positional("Option::Some", [Value::Null]));
        assert_eq!(Some(Some(3)).to_value(), Value::Int(3));
    }

    #[test]
    fn values_are_borrowed_not_copied() {
        let value = Value::list([1, 2]);
        assert!(matches!(value.value_ref(), Cow::Borrowed(_)));
        assert!(matches!((&value).value_ref(), Cow::Borrowed(_)));
        assert!(matches!(Box::new(value.clone()).value_ref(), Cow::Borrowed(_)));
        assert!(matches!(vec![1].value_ref(), Cow::Owned(_)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_values() {
        let json = serde_json::json!({"a": {"b": [1, 2.5, null, "s", true]}});
        let expected = Value::map([(
            "a",
            Value::map([(
                "b",
                Value::list([
                    Value::Int(1),
                    Value::Float(2.5),
                    Value::Null,
                    Value::from("s"),
                    Value::Bool(true),
                ]),
            )]),
        )]);
        assert_eq!(json.to_value(), expected);
    }
}
