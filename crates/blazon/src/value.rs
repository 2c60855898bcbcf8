//! # Runtime Values
//!
//! The dynamic value model checked by the engine. It is a superset of the
//! JSON data model with two additions:
//!
//! - [`Value::Undefined`] models an absent value. Optional fields that were
//!   omitted stay distinguishable from fields explicitly set to `null`.
//! - [`Value::Instance`] is a value tagged with a [`Class`] identity. Class
//!   membership specs and compiled validators both produce and check these.
//!
//! Conversions to and from `serde_json::Value` are provided so callers can
//! build inputs with `serde_json::json!` and hand results back to serde.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Keyed fields of an object value, in insertion order.
pub type Map = IndexMap<String, Value>;

/// Shared placeholder used when a field or index is missing from the input.
pub(crate) static UNDEFINED: Value = Value::Undefined;

/// A runtime value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value at all (an omitted field or argument).
    #[default]
    Undefined,
    /// An explicit `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. Integers and floats share one representation.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A keyed object.
    Object(Map),
    /// A value tagged with a class identity.
    Instance(Instance),
}

impl Value {
    /// Returns true for `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Returns true only for `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Object fields, looking through a class instance to its payload.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            Value::Instance(instance) => instance.payload().as_object(),
            _ => None,
        }
    }

    /// Array items, looking through a class instance to its payload.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            Value::Instance(instance) => instance.payload().as_array(),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Look up an object field. Missing fields and non-objects yield `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up an array element.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Returns true if this value is an instance of `class` or of a class
    /// derived from it.
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.as_instance()
            .is_some_and(|instance| instance.class().is_subclass_of(class))
    }

    /// Strips class tags recursively, leaving plain data.
    pub fn into_plain(self) -> Value {
        match self {
            Value::Instance(instance) => instance.into_payload().into_plain(),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::into_plain).collect()),
            Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into_plain())).collect(),
            ),
            other => other,
        }
    }

    /// Strict equality: `NaN` never matches, `undefined` and `null` differ,
    /// composites compare element-wise with the same rule and instances
    /// additionally require the same class identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, va)| b.get(key).is_some_and(|vb| va.strict_eq(vb)))
            }
            (Value::Instance(a), Value::Instance(b)) => {
                a.class() == b.class() && a.payload().strict_eq(b.payload())
            }
            _ => false,
        }
    }

    /// Convert to a `serde_json::Value`.
    ///
    /// `undefined` object fields are dropped, `undefined` array elements and
    /// non-finite numbers become `null`, and instances serialize as their
    /// payload.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Instance(instance) => instance.payload().to_json(),
        }
    }
}

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Json::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

// =============================================================================
// Class identity
// =============================================================================

/// An opaque type identity.
///
/// Two classes are equal only if they are the same identity (clones of one
/// `Class::new` call); names are for diagnostics. A class may derive from a
/// parent, and membership checks accept instances of any descendant.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

struct ClassInner {
    name: String,
    parent: Option<Class>,
}

impl Class {
    /// Create a new root class.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(ClassInner {
            name: name.into(),
            parent: None,
        }))
    }

    /// Create a new class deriving from `self`.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self(Arc::new(ClassInner {
            name: name.into(),
            parent: Some(self.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// Returns true if `self` is `ancestor` or transitively derives from it.
    pub fn is_subclass_of(&self, ancestor: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == ancestor {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// Wrap `payload` as an instance of this class.
    pub fn instantiate(&self, payload: impl Into<Value>) -> Value {
        Value::Instance(Instance::new(self, payload))
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value tagged with its class.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: Class,
    payload: Box<Value>,
}

impl Instance {
    pub fn new(class: &Class, payload: impl Into<Value>) -> Self {
        Self {
            class: class.clone(),
            payload: Box::new(payload.into()),
        }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        *self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let value = Value::from(json!({"foo": "a", "bar": [1, true, null]}));
        assert_eq!(value.get("foo"), Some(&Value::from("a")));
        assert_eq!(value.get("bar").and_then(|b| b.at(0)), Some(&Value::Number(1.0)));
        assert_eq!(value.get("bar").and_then(|b| b.at(2)), Some(&Value::Null));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_to_json_drops_undefined_fields() {
        let mut map = Map::new();
        map.insert("kept".into(), Value::Null);
        map.insert("gone".into(), Value::Undefined);
        map.insert("count".into(), Value::Number(3.0));
        map.insert("ratio".into(), Value::Number(0.5));
        assert_eq!(
            Value::Object(map).to_json(),
            json!({"kept": null, "count": 3, "ratio": 0.5})
        );
    }

    #[test]
    fn test_to_json_non_finite_is_null() {
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
        assert_eq!(Value::Number(f64::INFINITY).to_json(), json!(null));
    }

    #[test]
    fn test_class_derivation() {
        let base = Class::new("Base");
        let sub = base.derive("Sub");
        let other = Class::new("Base");

        assert!(sub.is_subclass_of(&base));
        assert!(base.is_subclass_of(&base));
        assert!(!base.is_subclass_of(&sub));
        assert_ne!(base, other, "same name must not mean same identity");
    }

    #[test]
    fn test_instance_lookup_sees_payload() {
        let class = Class::new("Point");
        let point = class.instantiate(Value::from(json!({"x": 1})));
        assert!(point.is_instance_of(&class));
        assert_eq!(point.get("x"), Some(&Value::Number(1.0)));
        assert_eq!(point.into_plain(), Value::from(json!({"x": 1})));
    }

    #[test]
    fn test_strict_eq() {
        assert!(Value::Undefined.strict_eq(&Value::Undefined));
        assert!(!Value::Undefined.strict_eq(&Value::Null));
        assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
        assert!(Value::Number(0.0).strict_eq(&Value::Number(-0.0)));
        assert!(Value::from(json!([1, "a"])).strict_eq(&Value::from(json!([1, "a"]))));
        assert!(!Value::from("1").strict_eq(&Value::from(1)));
        let ab = Value::from(json!({"a": 1, "b": 2}));
        assert!(ab.strict_eq(&Value::from(json!({"b": 2, "a": 1}))));
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = value
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
