//! Field projection
//!
//! Decides, per action, which fields of a resource travel on the wire.
//!
//! Every resource type carries a static descriptor table (generated by the
//! [`fields!`](crate::fields) macro) listing its fields, the actions each
//! field participates in, the wire name used for each action and whether a
//! zero value is omitted. [`project`] builds request bodies from that table,
//! [`absorb`] writes response payloads back through it.
//!
//! ## Example
//!
//! ```rust
//! use dpf_core::{Action, fields, projection};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Note {
//!     id: i64,
//!     text: String,
//! }
//!
//! fields! {
//!     Note {
//!         id: [Read("id")],
//!         text: [Read("text"), Create("text", omitempty)],
//!     }
//! }
//!
//! let note = Note { id: 3, text: String::new() };
//! let body = projection::project(&note, Action::Create).unwrap().unwrap();
//! assert_eq!(body, b"{}");
//! ```

mod wire;

pub use serde_json::{Map, Value};
pub use wire::{NullablePositiveInt64, WireValue};

use crate::action::{Action, FieldAction};
use crate::error::{Error, Result};
use crate::params::PathArg;

/// Wire name and omit-empty modifier of a field for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Action the tag applies to
    pub action: FieldAction,
    /// JSON key used for the action
    pub wire: &'static str,
    /// Drop the key entirely when the field holds its zero value
    pub omit_empty: bool,
}

/// Static description of one field of `T`
pub struct FieldDesc<T> {
    /// Rust field name (identifiers are declared by this name)
    pub name: &'static str,
    /// Per-action tags; a field without a tag for an action is skipped
    pub tags: &'static [Tag],
    /// Project the field value
    pub to_wire: fn(&T, FieldAction) -> Value,
    /// Absorb a wire value into the field
    pub absorb: fn(&mut T, Value) -> Result<()>,
    /// Zero-value test
    pub is_zero: fn(&T) -> bool,
    /// Whether the field sends its zero value as `null`
    pub is_nullable: fn(&T) -> bool,
    /// Identifier type accepted by the field, if any
    pub param_type: fn(&T) -> Option<&'static str>,
    /// Store a type-checked path parameter
    pub assign_param: fn(&mut T, &PathArg),
}

impl<T> FieldDesc<T> {
    /// Tag for the action, if the field participates in it
    pub fn tag(&self, action: FieldAction) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.action == action)
    }
}

/// A type described by a static field table
///
/// Implemented by the [`fields!`](crate::fields) macro.
pub trait Projectable: Default + Sized + 'static {
    /// Field table in declaration order
    fn fields() -> &'static [FieldDesc<Self>];

    /// Identifier field names, outermost first
    fn identifiers() -> &'static [&'static str] {
        &[]
    }
}

/// Object-safe view of a [`Projectable`] type
///
/// Blanket-implemented for every `Projectable`; the client and the registry
/// only ever talk to resources through this trait.
pub trait Fields {
    /// JSON object holding the fields tagged for `action`
    fn project_fields(&self, action: FieldAction) -> Map<String, Value>;

    /// Absorb a JSON object through the read tags
    fn absorb_fields(&mut self, value: Value) -> Result<()>;

    /// Bind positional path parameters into the identifier fields
    fn bind_params(&mut self, args: &[PathArg]) -> Result<()>;

    /// Identifier field names, outermost first
    fn identifier_names(&self) -> &'static [&'static str];
}

impl<T: Projectable> Fields for T {
    fn project_fields(&self, action: FieldAction) -> Map<String, Value> {
        project_map(self, action)
    }

    fn absorb_fields(&mut self, value: Value) -> Result<()> {
        absorb_value(value, self)
    }

    fn bind_params(&mut self, args: &[PathArg]) -> Result<()> {
        crate::params::bind(self, args)
    }

    fn identifier_names(&self) -> &'static [&'static str] {
        T::identifiers()
    }
}

/// Serialize the fields tagged for `action` into a request body
///
/// Returns `Ok(None)` for actions that carry no body (read, list, count,
/// delete, cancel). Keys are sorted, so the output for an unchanged
/// resource is byte-identical across calls.
pub fn project<F: Fields + ?Sized>(resource: &F, action: Action) -> Result<Option<Vec<u8>>> {
    let Some(field_action) = action.body_action() else {
        return Ok(None);
    };
    let body = Value::Object(resource.project_fields(field_action));
    Ok(Some(serde_json::to_vec(&body)?))
}

/// Parse `bytes` and absorb them into `resource` through its read tags
///
/// Fields without a read tag, and JSON keys without a matching field, are
/// left alone. A failure part-way through leaves earlier fields absorbed.
pub fn absorb<F: Fields + ?Sized>(bytes: &[u8], resource: &mut F) -> Result<()> {
    let value: Value = serde_json::from_slice(bytes)?;
    resource.absorb_fields(value)
}

/// Build the JSON object for `action` from the field table
pub fn project_map<T: Projectable>(resource: &T, action: FieldAction) -> Map<String, Value> {
    let mut map = Map::new();
    for field in T::fields() {
        let Some(tag) = field.tag(action) else {
            continue;
        };
        if tag.omit_empty && (field.is_zero)(resource) {
            if (field.is_nullable)(resource) {
                map.insert(tag.wire.to_string(), Value::Null);
            }
            continue;
        }
        map.insert(tag.wire.to_string(), (field.to_wire)(resource, action));
    }
    map
}

/// Absorb a JSON object into `resource` through the read tags
pub fn absorb_value<T: Projectable>(value: Value, resource: &mut T) -> Result<()> {
    let Value::Object(mut map) = value else {
        return Err(Error::field("", format!("expected a JSON object, got {value}")));
    };
    for field in T::fields() {
        let Some(tag) = field.tag(FieldAction::Read) else {
            continue;
        };
        if let Some(wire_value) = map.remove(tag.wire) {
            (field.absorb)(resource, wire_value).map_err(|e| wire::nest(tag.wire, e))?;
        }
    }
    Ok(())
}

/// Zero-value test for a whole table: every field is zero
pub fn all_zero<T: Projectable>(resource: &T) -> bool {
    T::fields().iter().all(|field| (field.is_zero)(resource))
}

/// Declare the field table of a resource type
///
/// Each field lists its tags as `Action("wire_name")`, optionally followed
/// by `omitempty`. Fields without tags still appear in the table so they
/// can be named as identifiers. The optional `identifiers:` list names the
/// path-parameter fields, outermost first.
///
/// Besides [`Projectable`], the macro implements
/// [`WireValue`] so the type can be nested inside other resources.
#[macro_export]
macro_rules! fields {
    (
        $ty:ident {
            $(
                $field:ident : [
                    $( $act:ident ( $wire:literal $(, $modifier:ident)? ) ),* $(,)?
                ]
            ),* $(,)?
        }
        $( identifiers: [ $( $id:ident ),* $(,)? ] )?
    ) => {
        impl $crate::projection::Projectable for $ty {
            fn fields() -> &'static [$crate::projection::FieldDesc<Self>] {
                static FIELDS: &[$crate::projection::FieldDesc<$ty>] = &[
                    $(
                        $crate::projection::FieldDesc {
                            name: stringify!($field),
                            tags: &[
                                $(
                                    $crate::projection::Tag {
                                        action: $crate::FieldAction::$act,
                                        wire: $wire,
                                        omit_empty: $crate::__omit_empty!($($modifier)?),
                                    }
                                ),*
                            ],
                            to_wire: |r: &$ty, action: $crate::FieldAction| {
                                $crate::projection::WireValue::to_wire(&r.$field, action)
                            },
                            absorb: |r: &mut $ty, value: $crate::projection::Value| {
                                $crate::projection::WireValue::absorb_wire(&mut r.$field, value)
                            },
                            is_zero: |r: &$ty| {
                                $crate::projection::WireValue::is_zero(&r.$field)
                            },
                            is_nullable: |r: &$ty| {
                                $crate::projection::WireValue::is_nullable(&r.$field)
                            },
                            param_type: |r: &$ty| {
                                $crate::projection::WireValue::param_type(&r.$field)
                            },
                            assign_param: |r: &mut $ty, arg: &$crate::PathArg| {
                                $crate::projection::WireValue::assign_param(&mut r.$field, arg)
                            },
                        }
                    ),*
                ];
                FIELDS
            }

            fn identifiers() -> &'static [&'static str] {
                &[ $( $( stringify!($id) ),* )? ]
            }
        }

        impl $crate::projection::WireValue for $ty {
            fn to_wire(&self, action: $crate::FieldAction) -> $crate::projection::Value {
                $crate::projection::Value::Object($crate::projection::project_map(self, action))
            }

            fn from_wire(value: $crate::projection::Value) -> $crate::Result<Self> {
                let mut resource = <$ty as ::core::default::Default>::default();
                $crate::projection::absorb_value(value, &mut resource)?;
                Ok(resource)
            }

            fn absorb_wire(&mut self, value: $crate::projection::Value) -> $crate::Result<()> {
                if value.is_null() {
                    return Ok(());
                }
                $crate::projection::absorb_value(value, self)
            }

            fn is_zero(&self) -> bool {
                $crate::projection::all_zero(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __omit_empty {
    () => {
        false
    };
    (omitempty) => {
        true
    };
}
