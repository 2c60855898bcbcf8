//! # Specs
//!
//! A [`Spec`] is an immutable description of an expected value. It is a
//! closed sum type: structural shapes, primitive and class identities,
//! combinators, and references to compiled validators. Specs are cheap to
//! clone (closures are shared behind `Arc`) and are `Send + Sync`, so one
//! spec tree can back any number of validators across threads.
//!
//! Construction is infallible except where the arguments themselves can be
//! malformed ([`Spec::cast`], [`Cast::from_parts`]); those report a
//! configuration error when the spec is built rather than when it is used.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::primitive::Primitive;
use crate::validator::Validator;
use crate::value::{Class, Value};

/// User predicate. `Ok(Some(v))` replaces the value with `v`, `Ok(None)`
/// passes the input through, `Err(message)` rejects it.
pub type CustomFn = Arc<dyn Fn(&Value) -> Result<Option<Value>, String> + Send + Sync>;

/// User conversion for [`Cast::Convert`].
pub type ConvertFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// An immutable description of an expected value.
#[derive(Clone)]
pub enum Spec {
    /// Exactly one primitive kind.
    Primitive(Primitive),
    /// An instance of a class or one of its descendants.
    Class(Class),
    /// An object with the listed fields, checked in order. Unlisted input
    /// fields are dropped.
    Object(Vec<(String, Spec)>),
    /// A fixed-position array.
    Tuple(Vec<Spec>),
    /// `null`/`undefined` allowed, optionally replaced by a default.
    Maybe {
        spec: Box<Spec>,
        default: Option<Value>,
    },
    /// Every spec in turn, each stage's output feeding the next.
    And(Vec<Spec>),
    /// The first spec that accepts the original value.
    Or(Vec<Spec>),
    /// Strictly equal to a literal.
    Exactly(Value),
    /// A user predicate.
    Custom(CustomFn),
    /// A homogeneous array with inclusive length bounds.
    List {
        element: Box<Spec>,
        min: usize,
        max: Option<usize>,
    },
    /// A coercion.
    Cast(Cast),
    /// Anything, unchanged.
    Any,
    /// A compiled validator used as a nested spec.
    Validator(Validator),
    /// A combinator named without its arguments.
    Uninitialized(Combinator),
}

impl Spec {
    pub const STRING: Spec = Spec::Primitive(Primitive::String);
    pub const NUMBER: Spec = Spec::Primitive(Primitive::Number);
    pub const BOOLEAN: Spec = Spec::Primitive(Primitive::Boolean);
    pub const ANY: Spec = Spec::Any;

    /// An object spec from `(field, spec)` pairs, in declaration order.
    pub fn object<K, I>(fields: I) -> Spec
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Spec)>,
    {
        Spec::Object(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// A fixed-position array spec.
    pub fn tuple(items: impl IntoIterator<Item = Spec>) -> Spec {
        Spec::Tuple(items.into_iter().collect())
    }

    pub fn class(class: &Class) -> Spec {
        Spec::Class(class.clone())
    }

    pub fn validator(validator: &Validator) -> Spec {
        Spec::Validator(validator.clone())
    }

    /// Optional without a default: absence is forwarded as-is.
    pub fn maybe(spec: Spec) -> Spec {
        Spec::Maybe {
            spec: Box::new(spec),
            default: None,
        }
    }

    /// Optional that yields `default` for `null`/`undefined` input.
    pub fn maybe_or(spec: Spec, default: impl Into<Value>) -> Spec {
        Spec::Maybe {
            spec: Box::new(spec),
            default: Some(default.into()),
        }
    }

    pub fn and(specs: impl IntoIterator<Item = Spec>) -> Spec {
        Spec::And(specs.into_iter().collect())
    }

    pub fn or(specs: impl IntoIterator<Item = Spec>) -> Spec {
        Spec::Or(specs.into_iter().collect())
    }

    pub fn exactly(value: impl Into<Value>) -> Spec {
        Spec::Exactly(value.into())
    }

    /// A user predicate. See [`CustomFn`] for the return contract.
    pub fn custom<F>(validate: F) -> Spec
    where
        F: Fn(&Value) -> Result<Option<Value>, String> + Send + Sync + 'static,
    {
        Spec::Custom(Arc::new(validate))
    }

    /// A predicate from a boolean test; `false` fails with `message`.
    pub fn satisfies<F>(message: impl Into<String>, test: F) -> Spec
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Spec::custom(move |value| {
            if test(value) {
                Ok(None)
            } else {
                Err(message.clone())
            }
        })
    }

    /// A list of any length.
    pub fn list(element: Spec) -> Spec {
        Spec::list_with(element, 0, None)
    }

    /// A list whose length lies in `min..=max`.
    pub fn list_with(element: Spec, min: usize, max: impl Into<Option<usize>>) -> Spec {
        Spec::List {
            element: Box::new(element),
            min,
            max: max.into(),
        }
    }

    /// Coerce to a primitive kind.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `target` is not a primitive spec.
    pub fn cast(target: Spec) -> Result<Spec> {
        Cast::from_parts(vec![target], None)
    }

    /// Check against `source`, convert, then check against `target`.
    pub fn cast_with<F>(source: Spec, target: Spec, convert: F) -> Spec
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Spec::Cast(Cast::Convert {
            source: Box::new(source),
            target: Box::new(target),
            convert: Arc::new(convert),
        })
    }

    /// A reference to a combinator that was never given its arguments.
    pub fn uninitialized(combinator: Combinator) -> Spec {
        Spec::Uninitialized(combinator)
    }

    /// Printable description, as used in diagnostics.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl From<Primitive> for Spec {
    fn from(primitive: Primitive) -> Self {
        Spec::Primitive(primitive)
    }
}

impl From<Class> for Spec {
    fn from(class: Class) -> Self {
        Spec::Class(class)
    }
}

impl From<Validator> for Spec {
    fn from(validator: Validator) -> Self {
        Spec::Validator(validator)
    }
}

impl From<&Validator> for Spec {
    fn from(validator: &Validator) -> Self {
        Spec::Validator(validator.clone())
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spec({self})")
    }
}

/// A coercion spec.
#[derive(Clone)]
pub enum Cast {
    /// Coerce with the built-in rules for a primitive kind.
    Direct(Primitive),
    /// Check, convert with a user function, check again.
    Convert {
        source: Box<Spec>,
        target: Box<Spec>,
        convert: ConvertFn,
    },
}

impl Cast {
    /// Build a cast from its positional arguments.
    ///
    /// One primitive spec and no converter is a direct cast; a source spec,
    /// a target spec and a converter is a conversion. Every other shape is a
    /// configuration error.
    pub fn from_parts(mut specs: Vec<Spec>, convert: Option<ConvertFn>) -> Result<Spec> {
        match (specs.len(), convert) {
            (1, None) => match specs.pop() {
                Some(Spec::Primitive(primitive)) => Ok(Spec::Cast(Cast::Direct(primitive))),
                Some(other) => Err(Error::configuration(format!(
                    "Cast can only target String, Number or Boolean, got {other}; \
                     use Cast(source, target, converter) for other targets"
                ))),
                None => Err(Error::configuration("Cast requires a target")),
            },
            (2, Some(convert)) => {
                let target = specs.pop();
                let source = specs.pop();
                match (source, target) {
                    (Some(source), Some(target)) => Ok(Spec::Cast(Cast::Convert {
                        source: Box::new(source),
                        target: Box::new(target),
                        convert,
                    })),
                    _ => Err(Error::configuration("Cast requires a source and a target")),
                }
            }
            (2, None) => Err(Error::configuration(format!(
                "Cast({}, {}) is missing a converter, eg: {}",
                specs[0],
                specs[1],
                Combinator::Cast.signature()
            ))),
            (n, _) => Err(Error::configuration(format!(
                "Cast takes a target or a source, target and converter, got {n} specs, eg: {}",
                Combinator::Cast.signature()
            ))),
        }
    }
}

/// Combinator names, for specs declared by name without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    Maybe,
    And,
    Or,
    Exactly,
    Custom,
    List,
    Cast,
    Any,
}

impl Combinator {
    pub const ALL: [Combinator; 8] = [
        Combinator::Maybe,
        Combinator::And,
        Combinator::Or,
        Combinator::Exactly,
        Combinator::Custom,
        Combinator::List,
        Combinator::Cast,
        Combinator::Any,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Combinator::Maybe => "Maybe",
            Combinator::And => "And",
            Combinator::Or => "Or",
            Combinator::Exactly => "Exactly",
            Combinator::Custom => "Custom",
            Combinator::List => "List",
            Combinator::Cast => "Cast",
            Combinator::Any => "Any",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// The constructor signature quoted in configuration errors.
    pub fn signature(self) -> &'static str {
        match self {
            Combinator::Maybe => "function Maybe(spec, defaultValue)",
            Combinator::And => "function And(...specs)",
            Combinator::Or => "function Or(...specs)",
            Combinator::Exactly => "function Exactly(value)",
            Combinator::Custom => "function Custom(validate)",
            Combinator::List => "function List(spec, minLength, maxLength)",
            Combinator::Cast => "function Cast(source, target, converter)",
            Combinator::Any => "function Any()",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_rejects_non_primitive_target() {
        let err = Spec::cast(Spec::maybe(Spec::STRING)).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Cast can only target"));
    }

    #[test]
    fn test_cast_without_converter_is_configuration_error() {
        let err = Cast::from_parts(vec![Spec::STRING, Spec::NUMBER], None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("missing a converter"));
    }

    #[test]
    fn test_cast_from_parts_with_converter() {
        let convert: ConvertFn = Arc::new(|v| Ok(v.clone()));
        let spec = Cast::from_parts(vec![Spec::NUMBER, Spec::NUMBER], Some(convert)).unwrap();
        assert!(matches!(spec, Spec::Cast(Cast::Convert { .. })));
    }

    #[test]
    fn test_cast_arity() {
        assert!(Cast::from_parts(vec![], None).unwrap_err().is_configuration());
        let convert: ConvertFn = Arc::new(|v| Ok(v.clone()));
        assert!(Cast::from_parts(vec![Spec::NUMBER], Some(convert))
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_combinator_names() {
        for c in Combinator::ALL {
            assert_eq!(Combinator::from_name(c.name()), Some(c));
            assert!(c.signature().contains(c.name()));
        }
        assert_eq!(Combinator::from_name("Union"), None);
    }

    #[test]
    fn test_specs_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Spec>();
    }
}
