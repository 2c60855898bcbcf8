//! # Structural Checker
//!
//! Checks composite specs field by field. Keyed specs require an object,
//! indexed specs an array; class instances are looked through to their
//! payload. Validation is a whitelist: only declared fields are checked and
//! copied into the target.
//!
//! A checked field is written into the target when it produced something
//! (including a `Maybe` default) or when the input explicitly carried the
//! key, so an explicit `null`/`undefined` survives while an omitted field
//! stays omitted.

use crate::check::{check, Checked, Context};
use crate::error::{Error, ErrorKind, Result, Segment};
use crate::spec::Spec;
use crate::value::{Map, Value, UNDEFINED};

fn shape_mismatch(spec: &Spec, value: &Value) -> Error {
    Error::new(ErrorKind::ShapeMismatch {
        expected: spec.to_string(),
        actual: value.to_string(),
    })
}

/// Check an object against keyed field specs, in declaration order.
pub(crate) fn check_object(
    spec: &Spec,
    fields: &[(String, Spec)],
    value: &Value,
    cx: Context,
) -> Result<Map> {
    let input = value.as_object().ok_or_else(|| shape_mismatch(spec, value))?;

    let mut target = Map::new();
    for (key, field_spec) in fields {
        let field = input.get(key).unwrap_or(&UNDEFINED);
        let checked: Checked = check(field_spec, field, cx)
            .map_err(|e| e.within(Segment::Field(key.clone())))?;

        if !checked.is_absent() || input.contains_key(key) {
            target.insert(key.clone(), checked.into_value());
        }
    }
    Ok(target)
}

/// Check an array against positional specs.
///
/// Positions skipped before a later written position are filled with
/// `undefined` so indices stay aligned.
pub(crate) fn check_tuple(
    spec: &Spec,
    items: &[Spec],
    value: &Value,
    cx: Context,
) -> Result<Vec<Value>> {
    let input = value.as_array().ok_or_else(|| shape_mismatch(spec, value))?;

    let mut target = Vec::with_capacity(items.len());
    for (index, item_spec) in items.iter().enumerate() {
        let item = input.get(index).unwrap_or(&UNDEFINED);
        let checked = check(item_spec, item, cx).map_err(|e| e.within(Segment::Index(index)))?;

        if !checked.is_absent() || index < input.len() {
            target.resize(index, Value::Undefined);
            target.push(checked.into_value());
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(spec: &Spec, value: serde_json::Value) -> Result<Value> {
        match spec {
            Spec::Object(fields) => {
                check_object(spec, fields, &value.into(), Context::default()).map(Value::Object)
            }
            Spec::Tuple(items) => {
                check_tuple(spec, items, &value.into(), Context::default()).map(Value::Array)
            }
            _ => unreachable!("composite specs only"),
        }
    }

    #[test]
    fn test_whitelist_drops_extra_fields() {
        let spec = Spec::object([("foo", Spec::STRING)]);
        let out = object(&spec, json!({"foo": "a", "extra": 1})).unwrap();
        assert_eq!(out, Value::from(json!({"foo": "a"})));
    }

    #[test]
    fn test_omitted_optional_stays_omitted() {
        let spec = Spec::object([("foo", Spec::STRING), ("bar", Spec::maybe(Spec::NUMBER))]);
        let out = object(&spec, json!({"foo": "a"})).unwrap();
        assert_eq!(out.get("bar"), None);
    }

    #[test]
    fn test_explicit_null_is_preserved() {
        let spec = Spec::object([("bar", Spec::maybe(Spec::NUMBER))]);
        let out = object(&spec, json!({"bar": null})).unwrap();
        assert_eq!(out.get("bar"), Some(&Value::Null));
    }

    #[test]
    fn test_explicit_undefined_is_preserved() {
        let fields = vec![
            ("foo".to_string(), Spec::STRING),
            ("bar".to_string(), Spec::maybe(Spec::NUMBER)),
        ];
        let spec = Spec::Object(fields.clone());
        let mut input = Map::new();
        input.insert("foo".into(), Value::from("a"));
        input.insert("bar".into(), Value::Undefined);

        let out = check_object(&spec, &fields, &Value::Object(input), Context::default()).unwrap();
        assert!(out.contains_key("bar"));
        assert_eq!(out.get("bar"), Some(&Value::Undefined));

        let omitted = object(&spec, json!({"foo": "a"})).unwrap();
        assert_eq!(omitted.get("bar"), None);
    }

    #[test]
    fn test_output_follows_declaration_order() {
        let spec = Spec::object([
            ("zeta", Spec::NUMBER),
            ("alpha", Spec::maybe_or(Spec::STRING, "x")),
            ("mid", Spec::BOOLEAN),
        ]);
        let out = object(&spec, json!({"mid": true, "zeta": 1})).unwrap();
        let keys: Vec<&str> = out
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_default_written_for_omitted_field() {
        let spec = Spec::object([
            ("count", Spec::maybe_or(Spec::NUMBER, 0)),
            ("flag", Spec::maybe_or(Spec::BOOLEAN, false)),
        ]);
        let out = object(&spec, json!({})).unwrap();
        assert_eq!(out, Value::from(json!({"count": 0, "flag": false})));
    }

    #[test]
    fn test_undefined_default_is_written() {
        let spec = Spec::object([("gap", Spec::maybe_or(Spec::ANY, Value::Undefined))]);
        let out = object(&spec, json!({})).unwrap();
        assert_eq!(out.get("gap"), Some(&Value::Undefined));
    }

    #[test]
    fn test_rejects_non_objects() {
        let spec = Spec::object([("foo", Spec::STRING)]);
        for input in [json!(null), json!("foo"), json!(3), json!(["foo"])] {
            let err = object(&spec, input).unwrap_err();
            assert_eq!(err.code(), "shape_mismatch");
        }
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let spec = Spec::object([
            ("a", Spec::NUMBER),
            ("b", Spec::custom(|_| Err("must not be reached".into()))),
        ]);
        let err = object(&spec, json!({"a": "x", "b": 1})).unwrap_err();
        assert_eq!(err.to_string(), r#"`a`: Invalid type: Expected Number, Got: "x""#);
    }

    #[test]
    fn test_nested_trace() {
        let spec = Spec::object([(
            "baz",
            Spec::object([("thing", Spec::maybe(Spec::STRING))]),
        )]);
        let err = object(&spec, json!({"baz": {"thing": 4}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`baz`: `thing`: Invalid type: Expected String, Got: 4"
        );
    }

    #[test]
    fn test_fixed_array() {
        let spec = Spec::tuple([Spec::NUMBER, Spec::STRING, Spec::maybe(Spec::NUMBER)]);
        assert_eq!(object(&spec, json!([1, "2"])).unwrap(), Value::from(json!([1, "2"])));
        assert_eq!(
            object(&spec, json!([1, "2", 3])).unwrap(),
            Value::from(json!([1, "2", 3]))
        );
        assert!(object(&spec, json!([1, "2", "3"])).is_err());
        assert_eq!(object(&spec, json!({"0": 1})).unwrap_err().code(), "shape_mismatch");
    }

    #[test]
    fn test_tuple_gap_is_filled() {
        let spec = Spec::tuple([
            Spec::NUMBER,
            Spec::maybe(Spec::NUMBER),
            Spec::maybe_or(Spec::NUMBER, 5),
        ]);
        let out = object(&spec, json!([1])).unwrap();
        assert_eq!(
            out,
            Value::Array(vec![Value::from(1), Value::Undefined, Value::from(5)])
        );
    }
}
