//! # Primitive Kinds
//!
//! The fixed registry of primitive tags. There is no runtime registration:
//! adding a kind means adding a variant, and every `match` over the enum
//! has to handle it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::value::Value;

/// A primitive value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl Primitive {
    /// Every primitive kind, in declaration order.
    pub const ALL: [Primitive; 3] = [Primitive::String, Primitive::Number, Primitive::Boolean];

    /// The tag name used in diagnostics and declarations.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
        }
    }

    /// Look up a primitive by its tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns true if `value` is exactly of this kind. No widening.
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Primitive::String, Value::String(_))
                | (Primitive::Number, Value::Number(_))
                | (Primitive::Boolean, Value::Bool(_))
        )
    }

    /// Check `value` against this kind, returning it unchanged on success.
    pub fn check(self, value: &Value) -> Result<Value> {
        if self.matches(value) {
            Ok(value.clone())
        } else {
            Err(Error::new(ErrorKind::TypeMismatch {
                expected: self.name().to_string(),
                actual: value.to_string(),
            }))
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
