//! Scalar values carried by field maps and bound as query parameters.

use crate::error::{JoblyError, JoblyResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A scalar field value: string, number, boolean or null.
///
/// `FieldValue` binds as a PostgreSQL parameter and adapts to the column type
/// the server expects, so an `Int` can land in an `int4`, `int8` or `numeric`
/// column without the caller picking a Rust type up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view used for range checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = JoblyError;

    fn try_from(value: serde_json::Value) -> JoblyResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Int(i)),
                None => n
                    .as_f64()
                    .map(Self::Float)
                    .ok_or_else(|| JoblyError::invalid(format!("number out of range: {n}"))),
            },
            Value::String(s) => Ok(Self::Text(s)),
            Value::Array(_) | Value::Object(_) => Err(JoblyError::invalid(
                "field values must be scalars (string, number, boolean or null)",
            )),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

fn mismatch(value: &FieldValue, ty: &Type) -> BoxError {
    format!("cannot bind {} value to column of type {}", value.kind(), ty).into()
}

impl ToSql for FieldValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) => {
                if *ty != Type::BOOL {
                    return Err(mismatch(self, ty));
                }
                b.to_sql(ty, out)
            }
            Self::Int(n) => {
                if *ty == Type::INT2 {
                    i16::try_from(*n)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*n)?.to_sql(ty, out)
                } else if *ty == Type::INT8 {
                    n.to_sql(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*n as f32).to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*n as f64).to_sql(ty, out)
                } else if *ty == Type::NUMERIC {
                    Decimal::from(*n).to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Self::Float(x) => {
                if *ty == Type::FLOAT4 {
                    (*x as f32).to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    x.to_sql(ty, out)
                } else if *ty == Type::NUMERIC {
                    Decimal::try_from(*x)?.to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Self::Text(s) => {
                if *ty == Type::NUMERIC {
                    Decimal::from_str(s)?.to_sql(ty, out)
                } else if <String as ToSql>::accepts(ty) {
                    s.to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
        }
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::BOOL
            || *ty == Type::INT2
            || *ty == Type::INT4
            || *ty == Type::INT8
            || *ty == Type::FLOAT4
            || *ty == Type::FLOAT8
            || *ty == Type::NUMERIC
            || <String as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(value: &FieldValue, ty: &Type) -> Result<(IsNull, BytesMut), BoxError> {
        let mut buf = BytesMut::new();
        let is_null = value.to_sql_checked(ty, &mut buf)?;
        Ok((is_null, buf))
    }

    #[test]
    fn truthiness_follows_loose_rules() {
        assert!(!FieldValue::Null.is_truthy());
        assert!(!FieldValue::Bool(false).is_truthy());
        assert!(!FieldValue::Int(0).is_truthy());
        assert!(!FieldValue::Float(f64::NAN).is_truthy());
        assert!(!FieldValue::from("").is_truthy());
        assert!(FieldValue::Bool(true).is_truthy());
        assert!(FieldValue::Int(-3).is_truthy());
        assert!(FieldValue::from("false").is_truthy());
    }

    #[test]
    fn deserializes_json_scalars() {
        let v: Vec<FieldValue> = serde_json::from_str(r#"[null, true, 10, 0.5, "x"]"#).unwrap();
        assert_eq!(
            v,
            vec![
                FieldValue::Null,
                FieldValue::Bool(true),
                FieldValue::Int(10),
                FieldValue::Float(0.5),
                FieldValue::from("x"),
            ]
        );
    }

    #[test]
    fn rejects_non_scalar_json() {
        let err = FieldValue::try_from(serde_json::json!([1, 2])).unwrap_err();
        assert!(err.is_invalid_argument());
        let err = FieldValue::try_from(serde_json::json!({"a": 1})).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn int_narrows_to_int4() {
        let (_, buf) = bind(&FieldValue::Int(10), &Type::INT4).unwrap();
        assert_eq!(&buf[..], &10_i32.to_be_bytes());
    }

    #[test]
    fn int_overflowing_int4_fails() {
        assert!(bind(&FieldValue::Int(i64::MAX), &Type::INT4).is_err());
    }

    #[test]
    fn float_and_text_bind_to_numeric() {
        assert!(bind(&FieldValue::Float(0.5), &Type::NUMERIC).is_ok());
        assert!(bind(&FieldValue::from("0.25"), &Type::NUMERIC).is_ok());
        assert!(bind(&FieldValue::from("lots"), &Type::NUMERIC).is_err());
    }

    #[test]
    fn null_binds_anywhere() {
        let (is_null, buf) = bind(&FieldValue::Null, &Type::INT4).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn type_mismatch_is_reported() {
        let Err(err) = bind(&FieldValue::from("ten"), &Type::INT4) else {
            panic!("text should not bind to int4");
        };
        assert!(err.to_string().contains("cannot bind text value"));
        assert!(bind(&FieldValue::Bool(true), &Type::TEXT).is_err());
    }
}
