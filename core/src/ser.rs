//! Serde bridge: any `Serialize` type to [`Value`]
//!
//! Lets domain types reuse their `#[derive(Serialize)]` instead of a
//! hand-written [`ToValue`](crate::ToValue). Convert the subject and the
//! test values up front so a failed conversion is reported, not matched:
//!
//! ```
//! use casewise::{matcher, to_value, ValueError};
//! use serde::Serialize;
//!
//! #[derive(Debug, Serialize)]
//! enum Shape {
//!     Circle { radius: u32 },
//!     Square(u32),
//! }
//!
//! let area = matcher(to_value(&Shape::Square(2))?)
//!     .case(to_value(&Shape::Circle { radius: 2 })?, |_| 12)
//!     .case(to_value(&Shape::Square(2))?, |_| 4)
//!     .exec();
//! assert_eq!(area, Ok(4));
//! # Ok::<(), ValueError>(())
//! ```
//!
//! # Mapping
//!
//! | serde | `Value` |
//! |-------|---------|
//! | `none`, `unit` | `Null` |
//! | newtype struct | the inner value |
//! | unit struct | `Record` with `Fields::Unit` |
//! | tuple struct | `Record` with `Fields::Positional` |
//! | struct | `Record` with `Fields::Named` |
//! | enum variant | `Record` named `Enum::Variant` |
//! | seq, tuple | `List` |
//! | map | `Map` |

use crate::{Fields, Value};
use serde::ser::{self, Serialize};
use std::fmt;

/// Conversion of a `Serialize` type into a [`Value`] failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The type's `Serialize` impl reported an error.
    #[error("serialization failed: {0}")]
    Custom(String),

    /// A map entry was left without a value.
    #[error("map key without value")]
    DanglingKey,

    /// A map value arrived before its key.
    #[error("map value without key")]
    MissingKey,
}

impl ser::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Convert any `Serialize` type into a [`Value`].
///
/// # Errors
///
/// Returns [`ValueError`] if the type's `Serialize` impl fails.
pub fn to_value<T>(value: &T) -> Result<Value, ValueError>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

fn variant_name(name: &str, variant: &str) -> String {
    format!("{name}::{variant}")
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = RecordSerializer;
    type SerializeTupleVariant = RecordSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = RecordSerializer;
    type SerializeStructVariant = RecordSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value, ValueError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, ValueError> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, ValueError> {
        self.serialize_i128(i128::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, ValueError> {
        i128::try_from(v)
            .map(Value::Int)
            .map_err(|_| ValueError::Custom(format!("integer {v} out of range")))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, ValueError> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, ValueError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, ValueError> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ValueError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ValueError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, ValueError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self).map(Value::some)
    }

    fn serialize_unit(self) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, ValueError> {
        Ok(Value::unit(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, ValueError> {
        Ok(Value::unit(variant_name(name, variant)))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, ValueError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ValueError>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(ValueSerializer)?;
        Ok(Value::positional(variant_name(name, variant), [inner]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, ValueError> {
        Ok(SeqSerializer {
            elements: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, ValueError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<RecordSerializer, ValueError> {
        Ok(RecordSerializer::positional(name.to_owned(), len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<RecordSerializer, ValueError> {
        Ok(RecordSerializer::positional(variant_name(name, variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer, ValueError> {
        Ok(MapSerializer {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<RecordSerializer, ValueError> {
        Ok(RecordSerializer::named(name.to_owned(), len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<RecordSerializer, ValueError> {
        Ok(RecordSerializer::named(variant_name(name, variant), len))
    }

    fn collect_str<T>(self, value: &T) -> Result<Value, ValueError>
    where
        T: ?Sized + fmt::Display,
    {
        Ok(Value::String(value.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Compound serializers
// ═══════════════════════════════════════════════════════════════════════════════

struct SeqSerializer {
    elements: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::List(self.elements))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        ser::SerializeSeq::end(self)
    }
}

/// Structs, tuple structs and data-carrying enum variants.
struct RecordSerializer {
    name: String,
    fields: Fields,
}

impl RecordSerializer {
    fn positional(name: String, len: usize) -> Self {
        Self {
            name,
            fields: Fields::Positional(Vec::with_capacity(len)),
        }
    }

    fn named(name: String, len: usize) -> Self {
        Self {
            name,
            fields: Fields::Named(Vec::with_capacity(len)),
        }
    }

    fn push<T>(&mut self, key: &'static str, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(ValueSerializer)?;
        match &mut self.fields {
            Fields::Positional(items) => items.push(value),
            Fields::Named(entries) => entries.push((key.to_owned(), value)),
            Fields::Unit => {}
        }
        Ok(())
    }

    fn finish(self) -> Value {
        Value::Record {
            name: self.name,
            fields: self.fields,
        }
    }
}

impl ser::SerializeTupleStruct for RecordSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        self.push("", value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for RecordSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        self.push("", value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for RecordSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for RecordSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

struct MapSerializer {
    entries: Vec<(Value, Value)>,
    next_key: Option<Value>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        if self.next_key.is_some() {
            return Err(ValueError::DanglingKey);
        }
        self.next_key = Some(key.serialize(ValueSerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), ValueError>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or(ValueError::MissingKey)?;
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        if self.next_key.is_some() {
            return Err(ValueError::DanglingKey);
        }
        Ok(Value::Map(self.entries))
    }
}
