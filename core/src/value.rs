//! `Value` — Structural representation that deep equality operates on
//!
//! Subjects and test values are compared after being converted into `Value`
//! (see [`ToValue`](crate::ToValue)). Comparison never looks at addresses:
//! two separately built values with the same shape and contents are equal.
//!
//! # Extensibility via `Custom`
//!
//! For domain types that should not be decomposed into fields, implement
//! [`CustomValue`] and wrap in `Value::Custom(Arc::new(your_type))`.

use std::any::Any;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

/// Record name wrapping `Some(x)` when `x` alone would read as `None`.
const SOME_RECORD: &str = "Option::Some";

/// Extension trait for opaque values.
///
/// Implementations decide whether two instances are structurally equal via
/// [`structural_eq`](Self::structural_eq). When they decline (`None`),
/// comparison falls back to identity: two `Custom` values are equal only if
/// they share the same allocation.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use casewise::{CustomValue, Value};
///
/// #[derive(Debug)]
/// struct Handle(u32);
///
/// impl CustomValue for Handle {
///     fn custom_type_name(&self) -> &'static str {
///         "handle"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let a = Arc::new(Handle(7));
/// let value = Value::Custom(a.clone());
/// assert_eq!(value, Value::Custom(a));
/// assert_ne!(value, Value::Custom(Arc::new(Handle(7))));
/// ```
pub trait CustomValue: Send + Sync + Debug {
    /// Returns a human-readable type identifier, e.g. `"geo_location"`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Structural comparison against another custom value.
    ///
    /// Return `None` to fall back to identity comparison.
    fn structural_eq(&self, _other: &dyn CustomValue) -> Option<bool> {
        None
    }
}

/// Fields of a [`Value::Record`].
#[derive(Debug, Clone)]
pub enum Fields {
    /// No fields (`struct Marker;`, `Enum::Variant`).
    Unit,

    /// Positional fields (`struct Pair(i32, i32)`).
    Positional(Vec<Value>),

    /// Named fields. Compared by name, not by declaration order.
    Named(Vec<(String, Value)>),
}

impl Fields {
    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unit => 0,
            Self::Positional(items) => items.len(),
            Self::Named(items) => items.len(),
        }
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The erased data type deep equality works on.
///
/// # Variants
///
/// - Scalars: `Null`, `Bool`, `Int`, `Float`, `Char`, `String`, `Bytes`
/// - Ordered composites: `List`
/// - Unordered composites: `Set`, `Map`
/// - Named composites: `Record` (structs and enum variants)
/// - `Custom` — user-defined opaque types implementing [`CustomValue`]
///
/// `PartialEq` on `Value` is [`deep_equal`](crate::deep_equal).
///
/// # Example
///
/// ```
/// use casewise::Value;
///
/// let left = Value::named("Config", [("retries", Value::Int(3))]);
/// let right = Value::named("Config", [("retries", Value::Int(3))]);
/// assert_eq!(left, right);
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value (`()`, `None`).
    Null,

    /// Boolean.
    Bool(bool),

    /// Any integer. Wide enough for every primitive integer but `u128`.
    Int(i128),

    /// Floating point. `NaN` equals `NaN`.
    Float(f64),

    /// A single character.
    Char(char),

    /// String data.
    String(String),

    /// Raw bytes.
    Bytes(Vec<u8>),

    /// Ordered sequence.
    List(Vec<Value>),

    /// Unordered collection of members.
    Set(Vec<Value>),

    /// Unordered key-value mapping.
    Map(Vec<(Value, Value)>),

    /// Named composite: a struct, or an enum variant named `Enum::Variant`.
    Record {
        /// Type name. Records with different names are never equal.
        name: String,
        /// Field values.
        fields: Fields,
    },

    /// Opaque user-defined value.
    Custom(Arc<dyn CustomValue>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::deep_equal(self, other)
    }
}

impl Value {
    /// Build a list from an iterator of values.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set from an iterator of values.
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a map from key-value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a record with named fields.
    pub fn named<I, K>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Record {
            name: name.into(),
            fields: Fields::Named(fields.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Build a record with positional fields.
    pub fn positional<I>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Record {
            name: name.into(),
            fields: Fields::Positional(fields.into_iter().collect()),
        }
    }

    /// Build a record without fields.
    pub fn unit(name: impl Into<String>) -> Self {
        Self::Record {
            name: name.into(),
            fields: Fields::Unit,
        }
    }

    /// Representation of `Some(inner)`.
    ///
    /// `inner` as is, or wrapped in the record `Option::Some` when it would
    /// otherwise be confused with `None` (it is `Null` or already wrapped).
    ///
    /// ```
    /// use casewise::Value;
    ///
    /// assert_eq!(Value::some(Value::Int(1)), Value::Int(1));
    /// assert_ne!(Value::some(Value::Null), Value::Null);
    /// ```
    #[must_use]
    pub fn some(inner: Value) -> Self {
        if inner.is_null() || inner.is_wrapped_some() {
            Self::positional(SOME_RECORD, [inner])
        } else {
            inner
        }
    }

    fn is_wrapped_some(&self) -> bool {
        matches!(
            self,
            Self::Record { name, fields: Fields::Positional(fields) }
                if name == SOME_RECORD && fields.len() == 1
        )
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for variants that contain other values.
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Record { .. }
        )
    }

    /// Try to get the value as a string slice.
    ///
    /// ```
    /// use casewise::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Int(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a list slice.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Look up a map entry by string key, or a named record field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            Self::Record {
                fields: Fields::Named(fields),
                ..
            } => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Try to get the value as a custom value reference.
    ///
    /// Use [`CustomValue::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Returns a string describing the kind of this value.
    ///
    /// For `Custom` variants, this delegates to [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Record { .. } => "record",
            Self::Custom(c) => c.custom_type_name(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

fn write_joined<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(bytes) => {
                f.write_str("b<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{b:02x}")?;
                }
                f.write_str(">")
            }
            Self::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Set(items) => {
                f.write_str("#{")?;
                write_joined(f, items)?;
                f.write_str("}")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Record { name, fields } => match fields {
                Fields::Unit => f.write_str(name),
                Fields::Positional(items) => {
                    write!(f, "{name}(")?;
                    write_joined(f, items)?;
                    f.write_str(")")
                }
                Fields::Named(items) => {
                    write!(f, "{name} {{ ")?;
                    for (i, (k, v)) in items.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{k}: {v}")?;
                    }
                    f.write_str(" }")
                }
            },
            Self::Custom(c) => write!(f, "<{}: {c:?}>", c.custom_type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i128::from(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i128::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
