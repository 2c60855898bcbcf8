//! # blazon: Composable Runtime Validation
//!
//! Describe the shape of data once as a [`Spec`], [`compile`] it into a
//! [`Validator`], and check any number of values against it. A successful
//! check returns a new, normalized value (defaults filled in, casts applied,
//! undeclared fields dropped); a failed check returns an [`Error`] naming
//! the failing field path and what was expected.
//!
//! ```
//! use blazon::{compile, Spec, Value};
//! use serde_json::json;
//!
//! let user = compile(Spec::object([
//!     ("name", Spec::STRING),
//!     ("age", Spec::cast(Spec::NUMBER).unwrap()),
//!     ("tags", Spec::maybe_or(Spec::list(Spec::STRING), Value::Array(vec![]))),
//! ]));
//!
//! let input = Value::from(json!({"name": "Ada", "age": "36", "admin": true}));
//! let ok = user.validate(&input).unwrap();
//! assert_eq!(ok.into_plain(), Value::from(json!({"name": "Ada", "age": 36, "tags": []})));
//!
//! let err = user.validate(&Value::from(json!({"name": 7, "age": 1}))).unwrap_err();
//! assert_eq!(err.to_string(), "`name`: Invalid type: Expected String, Got: 7");
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the runtime value model and class identities.
//! - [`spec`]: spec variants and constructors.
//! - [`validator`]: compilation, options, and the `validate`/`test`/`is`
//!   entry points.
//! - [`declare`]: specs from JSON declarations.
//! - [`signature`]: validated function arguments and results.
//! - [`error`]: the error taxonomy and field traces.
//!
//! ## Crate Policy
//!
//! - Specs are immutable after construction; validators share them freely
//!   across threads.
//! - Malformed specs are reported when built wherever that is possible.
//! - No `panic!()` or `.unwrap()` outside tests.

mod cast;
mod check;
pub mod declare;
pub mod error;
mod primitive;
mod print;
pub mod signature;
pub mod spec;
mod structure;
pub mod validator;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use cast::coerce;
pub use error::{BranchFailure, Error, ErrorKind, Result, Segment, Trace};
pub use primitive::Primitive;
pub use print::format_number;
pub use signature::{Arguments, Ensured, Signature};
pub use spec::{Cast, Combinator, ConvertFn, CustomFn, Spec};
pub use validator::{compile, compile_with, CompileOptions, UnionErrors, Validator};
pub use value::{Class, Instance, Map, Value};
