//! Configuration records and the per-field conversions behind them.
//!
//! A configuration record is a plain struct declared through
//! [`option_record!`](crate::option_record). The macro emits the struct and a
//! static table associating every field with its external (wire) name, which
//! both the normalizer and the rehydrator resolve keys through.
//!
//! ```rust
//! use cdp_options::option_record;
//! use cdp_options::normalize::normalize;
//!
//! option_record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct GotoOptions {
//!         pub url: String,
//!         pub referrer: Option<String>,
//!         pub transition_type: Option<String> => "transitionType",
//!     }
//! }
//!
//! let options = GotoOptions {
//!     url: "https://www.rust-lang.org".to_string(),
//!     transition_type: Some("typed".to_string()),
//!     ..Default::default()
//! };
//! let map = normalize(&options);
//! assert_eq!(map["transitionType"], "typed");
//! assert!(!map.contains_key("referrer"));
//! ```

use crate::{OptionMap, OptionValue};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::{trace, warn};

/// Static association between a record field and its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub external: &'static str,
}

/// The only value kinds the rehydrator stores into record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Str(String),
    Bool(bool),
}

impl Scalar {
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Int(_) | Scalar::UInt(_) => "integer",
            Scalar::Str(_) => "string",
            Scalar::Bool(_) => "boolean",
        }
    }
}

impl TryFrom<&OptionValue> for Scalar {
    /// Kind of the rejected value.
    type Error = &'static str;

    fn try_from(value: &OptionValue) -> Result<Self, Self::Error> {
        match value {
            OptionValue::Bool(b) => Ok(Scalar::Bool(*b)),
            OptionValue::String(s) => Ok(Scalar::Str(s.clone())),
            OptionValue::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Ok(Scalar::Int(i)),
                (None, Some(u)) => Ok(Scalar::UInt(u)),
                (None, None) => Err(value_kind(value)),
            },
            other => Err(value_kind(other)),
        }
    }
}

/// Describes the JSON kind of `value` for mismatch reports.
pub fn value_kind(value: &OptionValue) -> &'static str {
    match value {
        OptionValue::Null => "null",
        OptionValue::Bool(_) => "boolean",
        OptionValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        OptionValue::Number(_) => "float",
        OptionValue::String(_) => "string",
        OptionValue::Array(_) => "array",
        OptionValue::Object(_) => "object",
    }
}

/// A field refused a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Conversion of a single record field to and from the canonical map.
pub trait OptionField {
    /// Wire value of the field, or `None` when it holds an absent reference.
    fn to_option_value(&self) -> Option<OptionValue>;

    /// Stores `value` into the field.
    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch>;
}

/// A struct whose fields carry external names; see [`option_record!`](crate::option_record).
pub trait OptionRecord: Clone {
    const FIELDS: &'static [FieldSpec];

    /// Every field in declaration order, keyed by external name.
    fn option_values(&self) -> Vec<(&'static str, Option<OptionValue>)>;

    /// Stores `value` into the field named `external`. Unknown names are ignored.
    fn assign_option(&mut self, external: &str, value: Scalar) -> Result<(), FieldMismatch>;
}

/// Flattens a record into a canonical map, omitting fields that hold absent references.
pub fn record_options<R: OptionRecord + ?Sized>(record: &R) -> OptionMap {
    let mut out = OptionMap::new();
    for (key, value) in record.option_values() {
        match value {
            Some(value) => {
                out.insert(key.to_string(), value);
            }
            None => trace!("Skipping absent option `{}`", key),
        }
    }
    out
}

pub(crate) fn serialize_field<T: Serialize + ?Sized>(value: &T) -> Option<OptionValue> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Dropping option value that failed to serialize: {}", e);
            None
        }
    }
}

fn refuse(expected: &'static str, value: &Scalar) -> FieldMismatch {
    FieldMismatch {
        expected,
        found: value.kind(),
    }
}

fn out_of_range(expected: &'static str) -> FieldMismatch {
    FieldMismatch {
        expected,
        found: "integer out of range",
    }
}

macro_rules! integer_fields {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OptionField for $ty {
                fn to_option_value(&self) -> Option<OptionValue> {
                    Some(OptionValue::from(*self))
                }

                fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
                    match value {
                        Scalar::Int(n) => {
                            *self = <$ty>::try_from(n).map_err(|_| out_of_range(stringify!($ty)))?;
                            Ok(())
                        }
                        Scalar::UInt(n) => {
                            *self = <$ty>::try_from(n).map_err(|_| out_of_range(stringify!($ty)))?;
                            Ok(())
                        }
                        other => Err(refuse("integer", &other)),
                    }
                }
            }
        )*
    };
}

integer_fields!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl OptionField for String {
    fn to_option_value(&self) -> Option<OptionValue> {
        Some(OptionValue::String(self.clone()))
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        match value {
            Scalar::Str(s) => {
                *self = s;
                Ok(())
            }
            other => Err(refuse("string", &other)),
        }
    }
}

impl OptionField for bool {
    fn to_option_value(&self) -> Option<OptionValue> {
        Some(OptionValue::Bool(*self))
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        match value {
            Scalar::Bool(b) => {
                *self = b;
                Ok(())
            }
            other => Err(refuse("boolean", &other)),
        }
    }
}

// Floats go out on the wire but are never rehydrated.
impl OptionField for f64 {
    fn to_option_value(&self) -> Option<OptionValue> {
        Some(OptionValue::from(*self))
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("float", &value))
    }
}

impl OptionField for f32 {
    fn to_option_value(&self) -> Option<OptionValue> {
        Some(OptionValue::from(*self))
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("float", &value))
    }
}

impl<T: OptionField + Default> OptionField for Option<T> {
    fn to_option_value(&self) -> Option<OptionValue> {
        self.as_ref().and_then(OptionField::to_option_value)
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        let mut inner = T::default();
        inner.assign(value)?;
        *self = Some(inner);
        Ok(())
    }
}

impl<T: Serialize> OptionField for Vec<T> {
    fn to_option_value(&self) -> Option<OptionValue> {
        serialize_field(self)
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("array", &value))
    }
}

impl<V: Serialize, S: BuildHasher> OptionField for HashMap<String, V, S> {
    fn to_option_value(&self) -> Option<OptionValue> {
        serialize_field(self)
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("object", &value))
    }
}

impl<V: Serialize> OptionField for BTreeMap<String, V> {
    fn to_option_value(&self) -> Option<OptionValue> {
        serialize_field(self)
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("object", &value))
    }
}

impl OptionField for OptionMap {
    fn to_option_value(&self) -> Option<OptionValue> {
        Some(OptionValue::Object(self.clone()))
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("object", &value))
    }
}

impl OptionField for OptionValue {
    fn to_option_value(&self) -> Option<OptionValue> {
        match self {
            OptionValue::Null => None,
            other => Some(other.clone()),
        }
    }

    fn assign(&mut self, value: Scalar) -> Result<(), FieldMismatch> {
        Err(refuse("opaque value", &value))
    }
}

/// Declares a configuration record.
///
/// Each field may name its wire key with `=> "externalName"`; without it the
/// field identifier is used. Besides the struct itself the macro implements
/// [`OptionRecord`] and [`ToOptions`](crate::normalize::ToOptions). Every field
/// type must implement [`OptionField`].
#[macro_export]
macro_rules! option_record {
    (@external $field:ident) => {
        stringify!($field)
    };
    (@external $field:ident $external:literal) => {
        $external
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $external:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::record::OptionRecord for $name {
            const FIELDS: &'static [$crate::record::FieldSpec] = &[
                $(
                    $crate::record::FieldSpec {
                        name: stringify!($field),
                        external: $crate::option_record!(@external $field $($external)?),
                    },
                )*
            ];

            fn option_values(
                &self,
            ) -> ::std::vec::Vec<(&'static str, ::std::option::Option<$crate::OptionValue>)> {
                ::std::vec![
                    $(
                        (
                            $crate::option_record!(@external $field $($external)?),
                            $crate::record::OptionField::to_option_value(&self.$field),
                        ),
                    )*
                ]
            }

            fn assign_option(
                &mut self,
                external: &str,
                value: $crate::record::Scalar,
            ) -> ::std::result::Result<(), $crate::record::FieldMismatch> {
                $(
                    if external == $crate::option_record!(@external $field $($external)?) {
                        return $crate::record::OptionField::assign(&mut self.$field, value);
                    }
                )*
                let _ = (external, value);
                ::std::result::Result::Ok(())
            }
        }

        impl $crate::normalize::ToOptions for $name {
            fn to_options(&self) -> $crate::OptionMap {
                $crate::record::record_options(self)
            }
        }
    };
}
