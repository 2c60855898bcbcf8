//! # Spec Declarations
//!
//! Builds a [`Spec`] from its JSON description, so shapes can live in
//! configuration instead of code.
//!
//! ```text
//! "String" | "Number" | "Boolean"       primitive
//! "Any"                                 wildcard
//! "Maybe" | "Or" | ...                  combinator named without arguments
//! [spec, ...]                           fixed-position array
//! {"field": spec, ...}                  object
//! {"$maybe": spec, "$default": value}   optional, default optional
//! {"$and": [spec, ...]}                 pipeline
//! {"$or": [spec, ...]}                  first match
//! {"$exactly": value}                   literal
//! {"$list": spec, "$min": n, "$max": n} list, bounds optional
//! {"$cast": "Number"}                   coercion
//! ```
//!
//! Malformed declarations are rejected here, with the JSON path of the
//! offending part in the error trace. A combinator named without its
//! arguments is accepted and only fails when used, matching the behavior
//! of specs built in code.

use serde_json::{Map as JsonMap, Value as Json};

use crate::error::{Error, Result, Segment};
use crate::primitive::Primitive;
use crate::spec::{Combinator, Spec};
use crate::value::Value;

/// Keywords that select a combinator form.
const FORMS: [&str; 6] = ["$maybe", "$and", "$or", "$exactly", "$list", "$cast"];

/// Build a spec from its JSON declaration.
///
/// # Errors
///
/// Returns a configuration error naming the offending path if the
/// declaration is malformed.
pub fn from_json(declaration: &Json) -> Result<Spec> {
    match declaration {
        Json::String(name) => named(name),
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| from_json(item).map_err(|e| e.within(Segment::Index(index))))
            .collect::<Result<Vec<_>>>()
            .map(Spec::Tuple),
        Json::Object(map) if map.keys().any(|k| k.starts_with('$')) => keyword_form(map),
        Json::Object(map) => map
            .iter()
            .map(|(key, field)| {
                from_json(field)
                    .map(|spec| (key.clone(), spec))
                    .map_err(|e| e.within(Segment::Field(key.clone())))
            })
            .collect::<Result<Vec<_>>>()
            .map(Spec::Object),
        other => Err(Error::configuration(format!(
            "unrecognised spec declaration {}",
            Value::from(other)
        ))),
    }
}

/// Parse a declaration from JSON text.
pub fn from_str(text: &str) -> Result<Spec> {
    let declaration: Json = serde_json::from_str(text)
        .map_err(|e| Error::configuration(format!("invalid declaration JSON: {e}")))?;
    from_json(&declaration)
}

fn named(name: &str) -> Result<Spec> {
    if let Some(primitive) = Primitive::from_name(name) {
        return Ok(Spec::Primitive(primitive));
    }
    match Combinator::from_name(name) {
        Some(Combinator::Any) => Ok(Spec::Any),
        Some(combinator) => Ok(Spec::Uninitialized(combinator)),
        None => Err(Error::configuration(format!("unknown spec name {name:?}"))),
    }
}

fn keyword_form(map: &JsonMap<String, Json>) -> Result<Spec> {
    let forms: Vec<&str> = FORMS
        .iter()
        .copied()
        .filter(|form| map.contains_key(*form))
        .collect();
    let form = match forms.as_slice() {
        [form] => *form,
        [] => {
            return Err(Error::configuration(format!(
                "declaration uses keywords but none of {}",
                FORMS.join(", ")
            )))
        }
        _ => {
            return Err(Error::configuration(format!(
                "declaration mixes {}",
                forms.join(" and ")
            )))
        }
    };

    let allowed: &[&str] = match form {
        "$maybe" => &["$maybe", "$default"],
        "$list" => &["$list", "$min", "$max"],
        _ => &[],
    };
    if let Some(unexpected) = map
        .keys()
        .find(|k| k.as_str() != form && !allowed.contains(&k.as_str()))
    {
        return Err(Error::configuration(format!(
            "unexpected key {unexpected:?} in {form} declaration"
        )));
    }

    let argument = &map[form];
    let nested =
        |json: &Json| from_json(json).map_err(|e| e.within(Segment::Field(form.to_string())));

    match form {
        "$maybe" => {
            let spec = nested(argument)?;
            Ok(match map.get("$default") {
                Some(default) => Spec::maybe_or(spec, Value::from(default)),
                None => Spec::maybe(spec),
            })
        }
        "$and" | "$or" => {
            let specs = spec_list(form, argument)?;
            Ok(if form == "$and" { Spec::And(specs) } else { Spec::Or(specs) })
        }
        "$exactly" => Ok(Spec::Exactly(Value::from(argument))),
        "$list" => {
            let element = nested(argument)?;
            let min = match map.get("$min") {
                None => 0,
                Some(min) => bound("$min", min)?,
            };
            let max = match map.get("$max") {
                None | Some(Json::Null) => None,
                Some(max) => Some(bound("$max", max)?),
            };
            Ok(Spec::list_with(element, min, max))
        }
        _ => Spec::cast(nested(argument)?),
    }
}

fn spec_list(form: &str, argument: &Json) -> Result<Vec<Spec>> {
    let items = argument.as_array().ok_or_else(|| {
        Error::configuration(format!("{form} expects an array of specs"))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            from_json(item).map_err(|e| {
                e.within(Segment::Index(index))
                    .within(Segment::Field(form.to_string()))
            })
        })
        .collect()
}

fn bound(keyword: &str, value: &Json) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::configuration(format!(
                "{keyword} must be a non-negative integer, got {value}"
            ))
        })
}
