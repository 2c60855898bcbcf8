//! # Printer
//!
//! Diagnostic rendering for values and specs. These strings appear in
//! error messages only; they are not a serialization format.

use std::fmt;

use crate::spec::{Cast, Spec};
use crate::value::Value;

/// Render a number the way it is written in source.
///
/// Digits are the shortest that parse back to `n`. Plain decimal notation,
/// padded with zeros, is used for magnitudes in `1e-7 < |n| < 1e21`;
/// anything outside that range uses exponent form (`1e+21`, `1.5e-7`).
/// `NaN`, `Infinity` and `-Infinity` are written by name and `-0` as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return name.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits as `d.ddde<exp>`.
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let sign = if n < 0.0 { "-" } else { "" };
    format!("{sign}{}", place_point(&digits, exponent))
}

/// Position the decimal point in `digits`, whose first digit has the
/// decimal exponent `exponent`.
fn place_point(digits: &str, exponent: i32) -> String {
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let point = if rest.is_empty() { "" } else { "." };
        format!("{first}{point}{rest}e{sign}{}", (n - 1).abs())
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Instance(instance) => {
                write!(f, "{} {}", instance.class(), instance.payload())
            }
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Primitive(primitive) => write!(f, "{primitive}"),
            Spec::Class(class) => write!(f, "{class}"),
            Spec::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, spec)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {spec}")?;
                }
                f.write_str("}")
            }
            Spec::Tuple(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Spec::Maybe { spec, default } => match default {
                Some(default) => write!(f, "Maybe({spec}, {default})"),
                None => write!(f, "Maybe({spec})"),
            },
            Spec::And(specs) => {
                f.write_str("And(")?;
                write_list(f, specs)?;
                f.write_str(")")
            }
            Spec::Or(specs) => {
                f.write_str("Or(")?;
                write_list(f, specs)?;
                f.write_str(")")
            }
            Spec::Exactly(value) => write!(f, "Exactly({value})"),
            Spec::Custom(_) => f.write_str("Custom"),
            Spec::List { element, min, max } => match (min, max) {
                (0, None) => write!(f, "List({element})"),
                (min, None) => write!(f, "List({element}, {min})"),
                (min, Some(max)) => write!(f, "List({element}, {min}, {max})"),
            },
            Spec::Cast(Cast::Direct(primitive)) => write!(f, "Cast({primitive})"),
            Spec::Cast(Cast::Convert { source, target, .. }) => {
                write!(f, "Cast({source}, {target})")
            }
            Spec::Any => f.write_str("Any"),
            Spec::Validator(validator) => f.write_str(validator.name()),
            Spec::Uninitialized(combinator) => write!(f, "{combinator}"),
        }
    }
}
