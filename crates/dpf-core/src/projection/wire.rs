// # Wire Values
//
// Conversion between field values and their JSON wire form.
//
// Every field type that appears in a `fields!` table implements
// `WireValue`. Scalars map one-to-one onto JSON; nested resource structs
// get their implementation from the `fields!` macro and recurse through
// the same per-action filtering.
//
// ## Null handling
//
// - `Option<T>` maps JSON `null` to `None`
// - plain scalars ignore an incoming `null` and keep their value
// - `NullablePositiveInt64` treats zero and `null` as the same value

use crate::action::FieldAction;
use crate::error::{Error, Result};
use crate::params::PathArg;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::net::IpAddr;

/// A field value that can be projected onto and absorbed from JSON
pub trait WireValue: Sized {
    /// JSON form of the value for the given action
    fn to_wire(&self, action: FieldAction) -> Value;

    /// Build a value from its JSON form
    fn from_wire(value: Value) -> Result<Self>;

    /// Absorb a JSON value in place
    fn absorb_wire(&mut self, value: Value) -> Result<()> {
        *self = Self::from_wire(value)?;
        Ok(())
    }

    /// Whether the value is the type's zero value (omit-empty test)
    fn is_zero(&self) -> bool;

    /// Nullable values project their zero as explicit `null`
    fn is_nullable(&self) -> bool {
        false
    }

    /// Identifier type name when the field can hold a path parameter
    fn param_type(&self) -> Option<&'static str> {
        None
    }

    /// Store a path parameter whose type was checked by the binder
    fn assign_param(&mut self, _arg: &PathArg) {}
}

macro_rules! scalar_wire_value {
    ($($ty:ty => |$v:ident| $zero:expr),* $(,)?) => {
        $(
            impl WireValue for $ty {
                fn to_wire(&self, _action: FieldAction) -> Value {
                    Value::from(*self)
                }

                fn from_wire(value: Value) -> Result<Self> {
                    serde_json::from_value(value).map_err(|e| Error::field("", e))
                }

                fn absorb_wire(&mut self, value: Value) -> Result<()> {
                    if !value.is_null() {
                        *self = Self::from_wire(value)?;
                    }
                    Ok(())
                }

                fn is_zero(&self) -> bool {
                    let $v = self;
                    $zero
                }
            }
        )*
    };
}

scalar_wire_value! {
    bool => |v| !*v,
    i32 => |v| *v == 0,
    u16 => |v| *v == 0,
    u32 => |v| *v == 0,
    u64 => |v| *v == 0,
    f64 => |v| *v == 0.0,
}

impl WireValue for String {
    fn to_wire(&self, _action: FieldAction) -> Value {
        Value::String(self.clone())
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::field("", format!("expected a string, got {other}"))),
        }
    }

    fn absorb_wire(&mut self, value: Value) -> Result<()> {
        if !value.is_null() {
            *self = Self::from_wire(value)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn param_type(&self) -> Option<&'static str> {
        Some(PathArg::STRING)
    }

    fn assign_param(&mut self, arg: &PathArg) {
        if let PathArg::Str(value) = arg {
            self.clone_from(value);
        }
    }
}

impl WireValue for i64 {
    fn to_wire(&self, _action: FieldAction) -> Value {
        Value::from(*self)
    }

    fn from_wire(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::field("", e))
    }

    fn absorb_wire(&mut self, value: Value) -> Result<()> {
        if !value.is_null() {
            *self = Self::from_wire(value)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn param_type(&self) -> Option<&'static str> {
        Some(PathArg::INT64)
    }

    fn assign_param(&mut self, arg: &PathArg) {
        if let PathArg::Int64(value) = arg {
            *self = *value;
        }
    }
}

impl WireValue for IpAddr {
    fn to_wire(&self, _action: FieldAction) -> Value {
        Value::String(self.to_string())
    }

    fn from_wire(value: Value) -> Result<Self> {
        let text = String::from_wire(value)?;
        text.parse()
            .map_err(|_| Error::field("", format!("invalid IP address: {text}")))
    }

    fn is_zero(&self) -> bool {
        self.is_unspecified()
    }
}

impl WireValue for DateTime<Utc> {
    fn to_wire(&self, _action: FieldAction) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn from_wire(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::field("", e))
    }

    fn is_zero(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

impl<T: WireValue> WireValue for Option<T> {
    fn to_wire(&self, action: FieldAction) -> Value {
        match self {
            Some(value) => value.to_wire(action),
            None => Value::Null,
        }
    }

    fn from_wire(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_wire(value).map(Some)
    }

    fn absorb_wire(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        if let Some(inner) = self.as_mut() {
            return inner.absorb_wire(value);
        }
        *self = Some(T::from_wire(value)?);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    fn to_wire(&self, action: FieldAction) -> Value {
        Value::Array(self.iter().map(|item| item.to_wire(action)).collect())
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_wire(item).map_err(|e| nest(&index.to_string(), e))
                })
                .collect(),
            other => Err(Error::field("", format!("expected an array, got {other}"))),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// A positive 64-bit integer whose zero value travels as JSON `null`
///
/// Used for optional references (a common config's TSIG key, for example)
/// where the server distinguishes "no reference" from any real id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NullablePositiveInt64(pub i64);

impl NullablePositiveInt64 {
    /// `None` for the null/zero value
    pub fn get(self) -> Option<i64> {
        (self.0 != 0).then_some(self.0)
    }
}

impl From<i64> for NullablePositiveInt64 {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl WireValue for NullablePositiveInt64 {
    fn to_wire(&self, _action: FieldAction) -> Value {
        match self.get() {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self(0)),
            Value::Number(n) => match n.as_i64() {
                Some(v) if v > 0 => Ok(Self(v)),
                _ => Err(Error::field("", format!("expected a positive integer, got {n}"))),
            },
            other => Err(Error::field(
                "",
                format!("expected a positive integer or null, got {other}"),
            )),
        }
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_nullable(&self) -> bool {
        true
    }
}

/// Prefix a field error with the enclosing wire key
pub(crate) fn nest(key: &str, err: Error) -> Error {
    match err {
        Error::Field { field, message } if field.is_empty() => Error::Field {
            field: key.to_string(),
            message,
        },
        Error::Field { field, message } => Error::Field {
            field: format!("{key}.{field}"),
            message,
        },
        other => Error::field(key, other),
    }
}
