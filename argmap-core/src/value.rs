//! Typed value model.
//!
//! The supported scalar set is closed: every value a parameter can hold is
//! one variant of [`Value`], and every declared parameter type is one tag of
//! [`Kind`]. Coercion from raw argument text and conversion between members
//! of the set are exhaustive matches over these enums, so there is no dynamic
//! type machinery anywhere in the pipeline.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type tag for a registered parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Str,
    Bool,
    Char,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
}

impl Kind {
    /// Canonical type name as shown on help screens and in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Kind::Str => "String",
            Kind::Bool => "Boolean",
            Kind::Char => "Char",
            Kind::I16 => "Int16",
            Kind::U16 => "UInt16",
            Kind::I32 => "Int32",
            Kind::U32 => "UInt32",
            Kind::I64 => "Int64",
            Kind::U64 => "UInt64",
            Kind::F32 => "Single",
            Kind::F64 => "Double",
            Kind::Decimal => "Decimal",
        }
    }

    /// True for the numeric family accepted by the min/max value constraints.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Kind::Str | Kind::Bool | Kind::Char)
    }

    /// The zero value of this kind, for fields that carry an implicit
    /// default. Strings are reference-like and have none.
    pub fn zero(&self) -> Option<Value> {
        match self {
            Kind::Str => None,
            Kind::Bool => Some(Value::Bool(false)),
            Kind::Char => Some(Value::Char('\0')),
            Kind::I16 => Some(Value::I16(0)),
            Kind::U16 => Some(Value::U16(0)),
            Kind::I32 => Some(Value::I32(0)),
            Kind::U32 => Some(Value::U32(0)),
            Kind::I64 => Some(Value::I64(0)),
            Kind::U64 => Some(Value::U64(0)),
            Kind::F32 => Some(Value::F32(0.0)),
            Kind::F64 => Some(Value::F64(0.0)),
            Kind::Decimal => Some(Value::Decimal(Decimal::ZERO)),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Errors produced while coercing or converting values. They never escape
/// the pipeline as errors; the container folds them into per-field state or
/// into validation messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("cannot parse '{raw}' as {kind}")]
    Parse { raw: String, kind: &'static str },

    #[error("cannot convert {from} to {to}")]
    Convert { from: &'static str, to: &'static str },

    #[error("value {value} is out of range for {kind}")]
    Range { value: String, kind: &'static str },
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Char(char),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Str(_) => Kind::Str,
            Value::Bool(_) => Kind::Bool,
            Value::Char(_) => Kind::Char,
            Value::I16(_) => Kind::I16,
            Value::U16(_) => Kind::U16,
            Value::I32(_) => Kind::I32,
            Value::U32(_) => Kind::U32,
            Value::I64(_) => Kind::I64,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Decimal(_) => Kind::Decimal,
        }
    }

    /// Coerce raw argument text into a value of the given kind.
    ///
    /// Strings are taken verbatim. Booleans accept `yes`/`no` on top of
    /// `true`/`false`, case-insensitively. Chars shed one layer of single
    /// quotes and must then be exactly one character. Numerics accept a
    /// leading sign, a decimal point where the kind has one, and `,`
    /// thousands separators.
    pub fn coerce(kind: Kind, raw: &str) -> Result<Value, ValueError> {
        let parse_err = || ValueError::Parse {
            raw: raw.to_string(),
            kind: kind.type_name(),
        };
        match kind {
            Kind::Str => Ok(Value::Str(raw.to_string())),
            Kind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(Value::Bool(true)),
                "no" | "false" => Ok(Value::Bool(false)),
                _ => Err(parse_err()),
            },
            Kind::Char => {
                let stripped = strip_single_quotes(raw);
                let mut chars = stripped.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(parse_err()),
                }
            }
            Kind::I16 => numeric(raw).parse().map(Value::I16).map_err(|_| parse_err()),
            Kind::U16 => numeric(raw).parse().map(Value::U16).map_err(|_| parse_err()),
            Kind::I32 => numeric(raw).parse().map(Value::I32).map_err(|_| parse_err()),
            Kind::U32 => numeric(raw).parse().map(Value::U32).map_err(|_| parse_err()),
            Kind::I64 => numeric(raw).parse().map(Value::I64).map_err(|_| parse_err()),
            Kind::U64 => numeric(raw).parse().map(Value::U64).map_err(|_| parse_err()),
            Kind::F32 => numeric(raw).parse().map(Value::F32).map_err(|_| parse_err()),
            Kind::F64 => numeric(raw).parse().map(Value::F64).map_err(|_| parse_err()),
            Kind::Decimal => numeric(raw)
                .parse()
                .map(Value::Decimal)
                .map_err(|_| parse_err()),
        }
    }

    /// Convert this value to another member of the closed set.
    ///
    /// Used for default values and value-set elements that were registered
    /// with a different kind than the field they attach to. Integer targets
    /// require a whole, in-range source; strings convert by rendering.
    pub fn convert_to(&self, kind: Kind) -> Result<Value, ValueError> {
        if self.kind() == kind {
            return Ok(self.clone());
        }
        let convert_err = || ValueError::Convert {
            from: self.kind().type_name(),
            to: kind.type_name(),
        };
        // Textual sources re-enter through coercion.
        if let Value::Str(s) = self {
            if kind != Kind::Str {
                return Value::coerce(kind, s);
            }
        }
        match kind {
            Kind::Str => Ok(Value::Str(self.display())),
            Kind::Bool => {
                let f = self.as_f64_lossy().ok_or_else(convert_err)?;
                Ok(Value::Bool(f != 0.0))
            }
            Kind::Char => Err(convert_err()),
            Kind::I16 | Kind::U16 | Kind::I32 | Kind::U32 | Kind::I64 | Kind::U64 => {
                let n = self.as_i128_exact().ok_or_else(convert_err)?;
                let range_err = || ValueError::Range {
                    value: self.display(),
                    kind: kind.type_name(),
                };
                match kind {
                    Kind::I16 => i16::try_from(n).map(Value::I16).map_err(|_| range_err()),
                    Kind::U16 => u16::try_from(n).map(Value::U16).map_err(|_| range_err()),
                    Kind::I32 => i32::try_from(n).map(Value::I32).map_err(|_| range_err()),
                    Kind::U32 => u32::try_from(n).map(Value::U32).map_err(|_| range_err()),
                    Kind::I64 => i64::try_from(n).map(Value::I64).map_err(|_| range_err()),
                    Kind::U64 => u64::try_from(n).map(Value::U64).map_err(|_| range_err()),
                    _ => unreachable!(),
                }
            }
            Kind::F32 => {
                let f = self.as_f64_lossy().ok_or_else(convert_err)?;
                Ok(Value::F32(f as f32))
            }
            Kind::F64 => {
                let f = self.as_f64_lossy().ok_or_else(convert_err)?;
                Ok(Value::F64(f))
            }
            Kind::Decimal => {
                let d = match self {
                    Value::F32(v) => Decimal::from_f64(*v as f64),
                    Value::F64(v) => Decimal::from_f64(*v),
                    other => other
                        .as_i128_exact()
                        .map(|n| Decimal::from_i128_with_scale(n, 0)),
                };
                d.map(Value::Decimal).ok_or_else(convert_err)
            }
        }
    }

    /// Render the value the way it appears in messages and on screens.
    pub fn display(&self) -> String {
        match self {
            Value::Str(v) => v.clone(),
            Value::Bool(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Decimal(v) => v.to_string(),
        }
    }

    /// JSON projection for front ends that echo bound values.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(v) => serde_json::Value::String(v.clone()),
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Char(v) => serde_json::Value::String(v.to_string()),
            Value::I16(v) => serde_json::Value::from(*v),
            Value::U16(v) => serde_json::Value::from(*v),
            Value::I32(v) => serde_json::Value::from(*v),
            Value::U32(v) => serde_json::Value::from(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::U64(v) => serde_json::Value::from(*v),
            Value::F32(v) => serde_json::Number::from_f64(*v as f64)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Decimal(v) => serde_json::Value::String(v.to_string()),
        }
    }

    /// The value as a whole integer, if it is one.
    fn as_i128_exact(&self) -> Option<i128> {
        match self {
            Value::I16(v) => Some(i128::from(*v)),
            Value::U16(v) => Some(i128::from(*v)),
            Value::I32(v) => Some(i128::from(*v)),
            Value::U32(v) => Some(i128::from(*v)),
            Value::I64(v) => Some(i128::from(*v)),
            Value::U64(v) => Some(i128::from(*v)),
            Value::F32(v) => {
                let f = f64::from(*v);
                (f.fract() == 0.0 && f.is_finite()).then(|| f as i128)
            }
            Value::F64(v) => (v.fract() == 0.0 && v.is_finite()).then(|| *v as i128),
            Value::Decimal(d) => (d.fract() == Decimal::ZERO)
                .then(|| d.to_i128())
                .flatten(),
            Value::Str(_) | Value::Bool(_) | Value::Char(_) => None,
        }
    }

    /// The value as a float, for comparisons that tolerate precision loss.
    fn as_f64_lossy(&self) -> Option<f64> {
        match self {
            Value::I16(v) => Some(f64::from(*v)),
            Value::U16(v) => Some(f64::from(*v)),
            Value::I32(v) => Some(f64::from(*v)),
            Value::U32(v) => Some(f64::from(*v)),
            Value::I64(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            Value::Decimal(d) => d.to_f64(),
            Value::Str(_) | Value::Bool(_) | Value::Char(_) => None,
        }
    }

    /// Ordering against another value of the *same* kind. `None` when the
    /// kinds differ or the kind has no ordering.
    pub(crate) fn le(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::I16(a), Value::I16(b)) => Some(a <= b),
            (Value::U16(a), Value::U16(b)) => Some(a <= b),
            (Value::I32(a), Value::I32(b)) => Some(a <= b),
            (Value::U32(a), Value::U32(b)) => Some(a <= b),
            (Value::I64(a), Value::I64(b)) => Some(a <= b),
            (Value::U64(a), Value::U64(b)) => Some(a <= b),
            (Value::F32(a), Value::F32(b)) => Some(a <= b),
            (Value::F64(a), Value::F64(b)) => Some(a <= b),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a <= b),
            _ => None,
        }
    }
}

/// Conversion from a typed value slot back into a caller-facing type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl FromValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        })*
    };
}

impl_from_value! {
    String => Str,
    bool => Bool,
    char => Char,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
}

/// Strip one layer of surrounding single quotes, for char coercion.
fn strip_single_quotes(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Normalize numeric input: trim and drop `,` group separators.
fn numeric(raw: &str) -> String {
    raw.trim().replace(',', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_string_is_verbatim() {
        assert_eq!(
            Value::coerce(Kind::Str, " spaced ").unwrap(),
            Value::Str(" spaced ".to_string())
        );
    }

    #[test]
    fn coerce_bool_accepts_yes_no_true_false() {
        for raw in ["yes", "YES", "true", "True"] {
            assert_eq!(Value::coerce(Kind::Bool, raw).unwrap(), Value::Bool(true));
        }
        for raw in ["no", "No", "false", "FALSE"] {
            assert_eq!(Value::coerce(Kind::Bool, raw).unwrap(), Value::Bool(false));
        }
        assert!(Value::coerce(Kind::Bool, "maybe").is_err());
    }

    #[test]
    fn coerce_char_strips_single_quotes() {
        assert_eq!(Value::coerce(Kind::Char, "'x'").unwrap(), Value::Char('x'));
        assert_eq!(Value::coerce(Kind::Char, "y").unwrap(), Value::Char('y'));
        assert!(Value::coerce(Kind::Char, "ab").is_err());
        assert!(Value::coerce(Kind::Char, "").is_err());
    }

    #[test]
    fn coerce_numeric_accepts_sign_and_thousands() {
        assert_eq!(Value::coerce(Kind::I32, "1,000").unwrap(), Value::I32(1000));
        assert_eq!(Value::coerce(Kind::I16, "-5").unwrap(), Value::I16(-5));
        assert_eq!(Value::coerce(Kind::U64, "+7").unwrap(), Value::U64(7));
        assert_eq!(Value::coerce(Kind::F64, "3.25").unwrap(), Value::F64(3.25));
        assert!(Value::coerce(Kind::U16, "-1").is_err());
        assert!(Value::coerce(Kind::I32, "1.5").is_err());
    }

    #[test]
    fn coerce_decimal() {
        let parsed = Value::coerce(Kind::Decimal, "12,345.67").unwrap();
        assert_eq!(parsed, Value::Decimal("12345.67".parse().unwrap()));
    }

    #[test]
    fn convert_widens_integers() {
        assert_eq!(
            Value::I16(100).convert_to(Kind::I64).unwrap(),
            Value::I64(100)
        );
        assert_eq!(
            Value::I32(5).convert_to(Kind::Decimal).unwrap(),
            Value::Decimal(Decimal::from_i128_with_scale(5, 0))
        );
    }

    #[test]
    fn convert_rejects_out_of_range() {
        assert!(matches!(
            Value::I32(70_000).convert_to(Kind::I16),
            Err(ValueError::Range { .. })
        ));
        assert!(matches!(
            Value::I32(-1).convert_to(Kind::U32),
            Err(ValueError::Range { .. })
        ));
    }

    #[test]
    fn convert_string_source_reparses() {
        assert_eq!(
            Value::Str("42".to_string()).convert_to(Kind::I32).unwrap(),
            Value::I32(42)
        );
        assert!(Value::Str("forty".to_string()).convert_to(Kind::I32).is_err());
    }

    #[test]
    fn convert_to_string_renders() {
        assert_eq!(
            Value::I32(5).convert_to(Kind::Str).unwrap(),
            Value::Str("5".to_string())
        );
    }

    #[test]
    fn zero_values() {
        assert_eq!(Kind::Str.zero(), None);
        assert_eq!(Kind::I32.zero(), Some(Value::I32(0)));
        assert_eq!(Kind::Bool.zero(), Some(Value::Bool(false)));
    }

    #[test]
    fn from_value_round_trip() {
        assert_eq!(i32::from_value(&Value::I32(9)), Some(9));
        assert_eq!(i32::from_value(&Value::I64(9)), None);
        assert_eq!(
            String::from_value(&Value::Str("a".to_string())),
            Some("a".to_string())
        );
    }
}
