//! # Coercion
//!
//! Fixed rules for casting to a primitive kind, and the check → convert →
//! check pipeline for user conversions.
//!
//! | target  | accepts                                                      |
//! |---------|--------------------------------------------------------------|
//! | String  | any non-composite value, rendered as text                    |
//! | Number  | numbers; strings whose parsed value renders back identically |
//! | Boolean | booleans, `"true"`, `"false"`, `0`, `1`                      |

use crate::check::{check, Checked, Context};
use crate::error::{Error, ErrorKind, Result};
use crate::primitive::Primitive;
use crate::print::format_number;
use crate::spec::Cast;
use crate::value::Value;

pub(crate) fn apply(cast: &Cast, value: &Value, cx: Context) -> Result<Value> {
    match cast {
        Cast::Direct(target) => coerce(*target, value),
        Cast::Convert {
            source,
            target,
            convert,
        } => {
            let input = check(source, value, cx)?.into_value();
            let converted = convert(&input).map_err(|reason| {
                Error::new(ErrorKind::CoercionFailed {
                    target: target.to_string(),
                    actual: input.to_string(),
                    reason,
                })
            })?;
            check(target, &converted, cx).map(Checked::into_value)
        }
    }
}

/// Coerce `value` to `target` with the built-in rules.
pub fn coerce(target: Primitive, value: &Value) -> Result<Value> {
    let coerced = match target {
        Primitive::String => to_string(value),
        Primitive::Number => to_number(value),
        Primitive::Boolean => to_boolean(value),
    };
    coerced.map_err(|reason| {
        Error::new(ErrorKind::CoercionFailed {
            target: target.name().to_string(),
            actual: value.to_string(),
            reason: reason.to_string(),
        })
    })
}

fn to_string(value: &Value) -> Result<Value, &'static str> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(*n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::Array(_) | Value::Object(_) | Value::Instance(_) => {
            return Err("composite values have no string form")
        }
    };
    Ok(Value::String(text))
}

fn to_number(value: &Value) -> Result<Value, &'static str> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => {
            let parsed: f64 = text.parse().map_err(|_| "not numeric text")?;
            if parsed.is_nan() {
                Err("text parses to NaN")
            } else if format_number(parsed) != *text {
                Err("text does not round-trip through its numeric form")
            } else {
                Ok(Value::Number(parsed))
            }
        }
        _ => Err("only numbers and numeric text convert to numbers"),
    }
}

fn to_boolean(value: &Value) -> Result<Value, &'static str> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(text) if text == "true" => Ok(Value::Bool(true)),
        Value::String(text) if text == "false" => Ok(Value::Bool(false)),
        Value::Number(n) if *n == 1.0 => Ok(Value::Bool(true)),
        Value::Number(n) if *n == 0.0 => Ok(Value::Bool(false)),
        _ => Err("only true, false, \"true\", \"false\", 0 and 1 convert to booleans"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Spec;
    use serde_json::json;

    fn cast(target: Primitive, value: impl Into<Value>) -> Result<Value> {
        coerce(target, &value.into())
    }

    #[test]
    fn test_to_string() {
        assert_eq!(cast(Primitive::String, "1").unwrap(), Value::from("1"));
        assert_eq!(cast(Primitive::String, 1).unwrap(), Value::from("1"));
        assert_eq!(cast(Primitive::String, 1.5).unwrap(), Value::from("1.5"));
        assert_eq!(cast(Primitive::String, true).unwrap(), Value::from("true"));
        assert!(cast(Primitive::String, Value::from(json!([]))).is_err());
        assert!(cast(Primitive::String, Value::from(json!({}))).is_err());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(cast(Primitive::Number, 1).unwrap(), Value::from(1));
        assert_eq!(cast(Primitive::Number, "1").unwrap(), Value::from(1));
        assert_eq!(cast(Primitive::Number, "-2.5").unwrap(), Value::from(-2.5));
        assert_eq!(cast(Primitive::Number, "Infinity").unwrap(), Value::from(f64::INFINITY));
        for bad in ["true", "1.0", " 1", "", "NaN", "1e3", "0x10"] {
            assert!(cast(Primitive::Number, bad).is_err(), "{bad:?} should not cast");
        }
        assert!(cast(Primitive::Number, true).is_err());
        assert!(cast(Primitive::Number, Value::Null).is_err());
    }

    #[test]
    fn test_number_text_in_exponent_form() {
        assert_eq!(cast(Primitive::Number, "1e+21").unwrap(), Value::from(1e21));
        assert_eq!(cast(Primitive::Number, "1e-7").unwrap(), Value::from(1e-7));
        assert_eq!(
            cast(Primitive::Number, "1152921504606847000").unwrap(),
            Value::from(2f64.powi(60))
        );
        assert_eq!(cast(Primitive::Number, "0.000001").unwrap(), Value::from(1e-6));
        for bad in ["1e21", "1E+21", "0.0000001", "1152921504606846976"] {
            assert!(cast(Primitive::Number, bad).is_err(), "{bad:?} should not cast");
        }
    }

    #[test]
    fn test_large_and_small_numbers_to_string() {
        assert_eq!(cast(Primitive::String, 1e21).unwrap(), Value::from("1e+21"));
        assert_eq!(cast(Primitive::String, 1e-7).unwrap(), Value::from("1e-7"));
        assert_eq!(
            cast(Primitive::String, 2f64.powi(60)).unwrap(),
            Value::from("1152921504606847000")
        );
    }

    #[test]
    fn test_to_boolean() {
        assert_eq!(cast(Primitive::Boolean, true).unwrap(), Value::from(true));
        assert_eq!(cast(Primitive::Boolean, false).unwrap(), Value::from(false));
        assert_eq!(cast(Primitive::Boolean, 0).unwrap(), Value::from(false));
        assert_eq!(cast(Primitive::Boolean, 1).unwrap(), Value::from(true));
        assert_eq!(cast(Primitive::Boolean, "true").unwrap(), Value::from(true));
        assert_eq!(cast(Primitive::Boolean, "false").unwrap(), Value::from(false));
        assert!(cast(Primitive::Boolean, "1").is_err());
        assert!(cast(Primitive::Boolean, 2).is_err());
        assert!(cast(Primitive::Boolean, 4).is_err());
        assert!(cast(Primitive::Boolean, Value::from(json!({}))).is_err());
    }

    #[test]
    fn test_coercion_error() {
        let err = cast(Primitive::Boolean, "1").unwrap_err();
        assert_eq!(err.code(), "coercion_failed");
        assert!(err.to_string().starts_with(r#"Invalid cast: Cannot convert "1" to Boolean"#));
    }

    #[test]
    fn test_convert_pipeline() {
        let spec = Spec::cast_with(Spec::NUMBER, Spec::BOOLEAN, |v| {
            Ok(Value::from(v.as_f64().is_some_and(|n| n > 10.0)))
        });
        let Spec::Cast(greater_than_ten) = spec else {
            unreachable!()
        };
        let run = |v: Value| apply(&greater_than_ten, &v, Context::default());

        assert_eq!(run(Value::from(12)).unwrap(), Value::from(true));
        assert_eq!(run(Value::from(0)).unwrap(), Value::from(false));
        assert_eq!(run(Value::from(-1)).unwrap(), Value::from(false));
        assert!(run(Value::from("true")).is_err(), "source spec rejects strings");
        assert!(run(Value::from(true)).is_err(), "source spec rejects booleans");
    }

    #[test]
    fn test_converter_output_is_rechecked() {
        let spec = Spec::cast_with(Spec::STRING, Spec::NUMBER, |v| Ok(v.clone()));
        let Spec::Cast(identity) = spec else {
            unreachable!()
        };
        let err = apply(&identity, &Value::from("7"), Context::default()).unwrap_err();
        assert_eq!(err.code(), "type_mismatch");
    }

    #[test]
    fn test_converter_failure() {
        let spec = Spec::cast_with(Spec::STRING, Spec::NUMBER, |_| Err("unparseable".into()));
        let Spec::Cast(failing) = spec else {
            unreachable!()
        };
        let err = apply(&failing, &Value::from("x"), Context::default()).unwrap_err();
        assert_eq!(err.code(), "coercion_failed");
        assert!(err.to_string().contains("unparseable"));
    }
}
