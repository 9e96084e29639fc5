use std::{any::type_name, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    errors::row::MappingError,
    traits::{
        to_sql::{DATE_FORMAT, DATETIME_FORMAT},
        value::Value,
    },
};

/// Conversion of a driver value into the parameter type of a mutator.
///
/// Numeric values assigned to numeric types are converted through their
/// string form and parsed back, so `31` reaches an `i32` field as `31` and
/// `2.5` is rejected by an integer field instead of being truncated. Every
/// other pairing is a direct conversion that fails with
/// [`MappingError::TypeMismatch`].
pub trait FromSql: Sized {
    fn from_value(value: Value) -> Result<Self, MappingError>;
}

fn mismatch<T>(value: &Value) -> MappingError {
    match value {
        Value::Null => MappingError::UnexpectedNull {
            target: type_name::<T>(),
        },
        other => MappingError::TypeMismatch {
            found: other.type_name(),
            target: type_name::<T>(),
        },
    }
}

fn parse_numeric<T: FromStr>(text: String) -> Result<T, MappingError> {
    text.parse().map_err(|_| MappingError::Coercion {
        value: text,
        target: type_name::<T>(),
    })
}

macro_rules! numeric_from_sql {
    ($($t:ty),*) => {
        $(
            impl FromSql for $t {
                fn from_value(value: Value) -> Result<Self, MappingError> {
                    match value {
                        Value::Integer(i) => parse_numeric(i.to_string()),
                        Value::Real(f) => parse_numeric(f.to_string()),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

numeric_from_sql!(i8, i16, i32, i64, u8, u16, u32, f32, f64);

impl FromSql for String {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromSql for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Blob(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

// sqlite stores booleans as 0/1 integers
impl FromSql for bool {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Integer(i) => Ok(i != 0),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromSql for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Text(text) => NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(|_| MappingError::Coercion {
                    value: text,
                    target: type_name::<Self>(),
                }),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromSql for NaiveDate {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Text(text) => {
                NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| MappingError::Coercion {
                    value: text,
                    target: type_name::<Self>(),
                })
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromSql for Value {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        Ok(value)
    }
}

impl<T: FromSql> FromSql for Option<T> {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_round_trips_into_numeric_fields() {
        assert_eq!(i32::from_value(Value::Integer(31)), Ok(31));
        assert_eq!(i64::from_value(Value::Integer(-7)), Ok(-7));
        assert_eq!(f64::from_value(Value::Integer(31)), Ok(31.0));
    }

    #[test]
    fn test_real_without_fraction_fits_integer_field() {
        assert_eq!(i32::from_value(Value::Real(31.0)), Ok(31));
    }

    #[test]
    fn test_fractional_real_rejected_by_integer_field() {
        let err = i32::from_value(Value::Real(2.5)).unwrap_err();
        assert_eq!(
            err,
            MappingError::Coercion {
                value: "2.5".to_string(),
                target: "i32"
            }
        );
    }

    #[test]
    fn test_out_of_range_integer_is_a_coercion_error() {
        assert!(matches!(
            u8::from_value(Value::Integer(300)),
            Err(MappingError::Coercion { .. })
        ));
    }

    #[test]
    fn test_text_is_not_parsed_into_numbers() {
        assert_eq!(
            i32::from_value(Value::Text("31".to_string())),
            Err(MappingError::TypeMismatch {
                found: "TEXT",
                target: "i32"
            })
        );
    }

    #[test]
    fn test_numbers_are_not_stringified() {
        assert!(matches!(
            String::from_value(Value::Integer(1)),
            Err(MappingError::TypeMismatch { found: "INTEGER", .. })
        ));
    }

    #[test]
    fn test_null_handling() {
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::Text("sam".to_string())),
            Ok(Some("sam".to_string()))
        );
        assert!(matches!(
            i32::from_value(Value::Null),
            Err(MappingError::UnexpectedNull { .. })
        ));
    }

    #[test]
    fn test_bool_from_integer() {
        assert_eq!(bool::from_value(Value::Integer(1)), Ok(true));
        assert_eq!(bool::from_value(Value::Integer(0)), Ok(false));
    }

    #[test]
    fn test_datetime_from_sqlite_text() {
        let parsed = NaiveDateTime::from_value(Value::Text("2024-03-01 09:15:30".to_string()))
            .expect("timestamp should parse");
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 15, 30))
            .expect("valid date");
        assert_eq!(parsed, expected);

        assert!(NaiveDateTime::from_value(Value::Text("yesterday".to_string())).is_err());
    }

    #[test]
    fn test_date_from_sqlite_text() {
        assert_eq!(
            NaiveDate::from_value(Value::Text("2024-03-01".to_string())),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"))
        );
    }
}
