//! # Signatures
//!
//! Validated function calls. A [`Signature`] declares a spec per parameter
//! and optionally one for the result; [`Signature::wrap`] binds it to a
//! function so every call checks its arguments before the function runs
//! and its result afterwards.
//!
//! ```
//! use blazon::{Signature, Spec, Value};
//!
//! let add = Signature::new()
//!     .param("a", Spec::NUMBER)
//!     .param("b", Spec::maybe_or(Spec::NUMBER, 10))
//!     .returns(Spec::NUMBER)
//!     .wrap(|args| {
//!         let sum = args.get("a").as_f64().unwrap_or_default()
//!             + args.get("b").as_f64().unwrap_or_default();
//!         Value::from(sum)
//!     });
//!
//! assert_eq!(add.call(&[Value::from(1)]).unwrap(), Value::from(11));
//! assert!(add.call(&[Value::from("1")]).is_err());
//! ```

use crate::check::{check, Checked, Context};
use crate::error::{Result, Segment};
use crate::spec::Spec;
use crate::value::{Value, UNDEFINED};

/// Declared parameters and result of a function.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<(String, Spec)>,
    returns: Option<Spec>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional parameter.
    pub fn param(mut self, name: impl Into<String>, spec: Spec) -> Self {
        self.params.push((name.into(), spec));
        self
    }

    /// Declare the result spec.
    pub fn returns(mut self, spec: Spec) -> Self {
        self.returns = Some(spec);
        self
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &Spec)> {
        self.params.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Check positional arguments. Missing arguments are `undefined`;
    /// arguments beyond the declared parameters are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first failing argument's error, traced by its name.
    pub fn check_arguments(&self, args: &[Value]) -> Result<Arguments> {
        let cx = Context::default();
        let mut names = Vec::with_capacity(self.params.len());
        let mut values = Vec::with_capacity(self.params.len());
        for (index, (name, spec)) in self.params.iter().enumerate() {
            let arg = args.get(index).unwrap_or(&UNDEFINED);
            let checked = check(spec, arg, cx)
                .map_err(|e| e.within(Segment::Argument(name.clone())))?;
            names.push(name.clone());
            values.push(checked.into_value());
        }
        Ok(Arguments { names, values })
    }

    /// Check a result against the declared result spec, if any.
    pub fn check_result(&self, result: Value) -> Result<Value> {
        match &self.returns {
            Some(spec) => check(spec, &result, Context::default())
                .map(Checked::into_value)
                .map_err(|e| e.within(Segment::Return)),
            None => Ok(result),
        }
    }

    /// Bind this signature to `task`.
    pub fn wrap<F>(self, task: F) -> Ensured<F>
    where
        F: Fn(&Arguments) -> Value,
    {
        Ensured {
            signature: self,
            task,
        }
    }
}

/// Validated arguments, addressable by parameter name or position.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    names: Vec<String>,
    values: Vec<Value>,
}

impl Arguments {
    /// The argument bound to `name`, or `undefined` for unknown names.
    pub fn get(&self, name: &str) -> &Value {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|index| self.values.get(index))
            .unwrap_or(&UNDEFINED)
    }

    /// The argument at `index`, or `undefined` past the end.
    pub fn at(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&UNDEFINED)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// A function bound to a [`Signature`].
pub struct Ensured<F> {
    signature: Signature,
    task: F,
}

impl<F> Ensured<F>
where
    F: Fn(&Arguments) -> Value,
{
    /// Check `args`, run the function, and check its result.
    ///
    /// # Errors
    ///
    /// Returns the first argument failure (the function does not run) or the
    /// result failure.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let arguments = self.signature.check_arguments(args)?;
        self.signature.check_result((self.task)(&arguments))
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}
