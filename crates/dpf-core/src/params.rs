//! Path parameter binding
//!
//! Resources name their identifier fields (outermost first) in their
//! `fields!` table. [`bind`] assigns a positional argument list to those
//! fields, checking arity and types before touching anything.

use crate::error::{Error, Result};
use crate::projection::Projectable;
use std::fmt;

/// One positional path parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathArg {
    /// Signed 64-bit integer identifier
    Int64(i64),
    /// String identifier
    Str(String),
}

impl PathArg {
    /// Type name of [`PathArg::Int64`]
    pub const INT64: &'static str = "int64";
    /// Type name of [`PathArg::Str`]
    pub const STRING: &'static str = "string";

    /// Type name used in binding errors
    pub fn type_name(&self) -> &'static str {
        match self {
            PathArg::Int64(_) => Self::INT64,
            PathArg::Str(_) => Self::STRING,
        }
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathArg::Int64(value) => write!(f, "{value}"),
            PathArg::Str(value) => f.write_str(value),
        }
    }
}

macro_rules! int_path_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathArg {
                fn from(value: $ty) -> Self {
                    PathArg::Int64(i64::from(value))
                }
            }
        )*
    };
}

int_path_arg!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for PathArg {
    fn from(value: &str) -> Self {
        PathArg::Str(value.to_string())
    }
}

impl From<String> for PathArg {
    fn from(value: String) -> Self {
        PathArg::Str(value)
    }
}

impl From<&String> for PathArg {
    fn from(value: &String) -> Self {
        PathArg::Str(value.clone())
    }
}

/// Build a `Vec<PathArg>` from heterogeneous values
///
/// ```rust
/// use dpf_core::{PathArg, path_args};
///
/// let args = path_args!["c-1", 42];
/// assert_eq!(args, vec![PathArg::Str("c-1".into()), PathArg::Int64(42)]);
/// ```
#[macro_export]
macro_rules! path_args {
    () => {
        ::std::vec::Vec::<$crate::PathArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::PathArg::from($arg)),+]
    };
}

/// Assign `args` to the identifier fields of `resource`
///
/// An empty argument list succeeds without touching the resource. Otherwise
/// the arity and every argument type are checked first; on any mismatch the
/// resource is left unchanged.
///
/// # Panics
///
/// Panics when the resource declares an identifier that is not one of its
/// fields, or a field whose type cannot hold a path parameter. Both are
/// defects in the resource definition.
pub fn bind<T: Projectable>(resource: &mut T, args: &[PathArg]) -> Result<()> {
    if args.is_empty() {
        return Ok(());
    }

    let identifiers = T::identifiers();
    if identifiers.len() != args.len() {
        return Err(Error::ParamCount {
            expected: identifiers.len(),
            actual: args.len(),
        });
    }

    let fields = T::fields();
    let mut targets = Vec::with_capacity(identifiers.len());
    for (index, (name, arg)) in identifiers.iter().zip(args).enumerate() {
        let Some(field) = fields.iter().find(|field| field.name == *name) else {
            panic!("identifier `{name}` is not a field of the resource");
        };
        let Some(expected) = (field.param_type)(resource) else {
            panic!("identifier field `{name}` cannot hold a path parameter");
        };
        if expected != arg.type_name() {
            return Err(Error::ParamType {
                index,
                field: field.name,
                expected,
                actual: arg.type_name(),
            });
        }
        targets.push(field);
    }

    for (field, arg) in targets.into_iter().zip(args) {
        (field.assign_param)(resource, arg);
    }
    Ok(())
}
