//! # Error Types: Validation Failures with Traces
//!
//! Every failure is an [`Error`]: a structured [`ErrorKind`], the
//! [`Trace`] of fields leading to the failing value, and the origin of the
//! validator that rejected it. All types use `thiserror` for `Display`
//! and `Error`.
//!
//! ## Design
//!
//! - Kinds carry expected-vs-actual descriptions, not just a message.
//! - Traces are pushed innermost-first while the error unwinds out of the
//!   recursion and rendered outermost-first: `` `a`: `b`: <message> ``.
//! - Configuration errors (malformed specs) share the type so that callers
//!   have one error surface, but are distinguishable via
//!   [`Error::is_configuration`].

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A validation or configuration failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}{}", .trace.prefix(), .kind)]
pub struct Error {
    kind: ErrorKind,
    trace: Trace,
    origin: Option<String>,
}

impl Error {
    /// Create an error with an empty trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            trace: Trace::default(),
            origin: None,
        }
    }

    /// Create a configuration error for a malformed spec.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration(message.into()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The path from the outermost checked value to the failing one.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Source location of the validator that rejected the value, if the
    /// error passed through one.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Short machine-readable kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration(_))
    }

    /// Record that the failure happened inside `segment`.
    pub(crate) fn within(mut self, segment: Segment) -> Self {
        self.trace.segments.push(segment);
        self
    }

    /// Attach a validator origin. The innermost validator wins.
    pub(crate) fn with_origin(mut self, origin: &str) -> Self {
        if self.origin.is_none() {
            self.origin = Some(origin.to_string());
        }
        self
    }
}

/// The kind of failure, with the details needed to explain it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Wrong primitive kind or class.
    #[error("Invalid type: Expected {expected}, Got: {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A composite or sequence was expected.
    #[error("Invalid shape: Expected {expected}, Got: {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A list had too few or too many items.
    #[error(
        "Invalid length: Expected between {min} and {} items, Got: {len}",
        fmt_bound(.max)
    )]
    LengthOutOfBounds {
        min: usize,
        max: Option<usize>,
        len: usize,
    },

    /// An exact value was required.
    #[error("Invalid value: Expected exactly {expected}, Got: {actual}")]
    ExactValueMismatch { expected: String, actual: String },

    /// No union branch accepted the value.
    #[error("Invalid value: Expected {}, Got: {actual}", describe_branches(.branches))]
    UnionExhausted {
        branches: Vec<BranchFailure>,
        actual: String,
    },

    /// A custom predicate rejected the value.
    #[error("Invalid value: {message}")]
    PredicateFailed { message: String },

    /// A cast could not convert the value.
    #[error("Invalid cast: Cannot convert {actual} to {target} ({reason})")]
    CoercionFailed {
        target: String,
        actual: String,
        reason: String,
    },

    /// The spec itself is malformed.
    #[error("Invalid spec: {0}")]
    Configuration(String),
}

impl ErrorKind {
    /// Short machine-readable kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch { .. } => "type_mismatch",
            ErrorKind::ShapeMismatch { .. } => "shape_mismatch",
            ErrorKind::LengthOutOfBounds { .. } => "length_out_of_bounds",
            ErrorKind::ExactValueMismatch { .. } => "exact_value_mismatch",
            ErrorKind::UnionExhausted { .. } => "union_exhausted",
            ErrorKind::PredicateFailed { .. } => "predicate_failed",
            ErrorKind::CoercionFailed { .. } => "coercion_failed",
            ErrorKind::Configuration(_) => "configuration",
        }
    }
}

fn fmt_bound(max: &Option<usize>) -> String {
    max.map_or_else(|| "Infinity".to_string(), |m| m.to_string())
}

fn describe_branches(branches: &[BranchFailure]) -> String {
    if branches.is_empty() {
        return "one of no alternatives".to_string();
    }
    let parts: Vec<String> = branches.iter().map(ToString::to_string).collect();
    format!("one of {}", parts.join(" OR "))
}

/// One rejected alternative of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchFailure {
    /// Printable form of the branch spec.
    pub description: String,
    /// The branch's own failure message, including its nested trace.
    pub message: String,
}

impl fmt::Display for BranchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.message)
    }
}

// =============================================================================
// Trace
// =============================================================================

/// A step on the path to a failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An object field.
    Field(String),
    /// An array or tuple position.
    Index(usize),
    /// A named function argument.
    Argument(String),
    /// A function's return value.
    Return,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) | Segment::Argument(name) => write!(f, "`{name}`"),
            Segment::Index(index) => write!(f, "`{index}`"),
            Segment::Return => f.write_str("`return`"),
        }
    }
}

/// Accumulated path from the outermost checked value to the failing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    /// Innermost first (push order).
    segments: Vec<Segment>,
}

impl Trace {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segments from outermost to innermost.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().rev()
    }

    /// The trace rendered as a message prefix, empty for the root.
    fn prefix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("{self}: ")
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch() -> Error {
        Error::new(ErrorKind::TypeMismatch {
            expected: "String".into(),
            actual: "1".into(),
        })
    }

    #[test]
    fn test_root_error_has_no_prefix() {
        assert_eq!(mismatch().to_string(), "Invalid type: Expected String, Got: 1");
        assert!(mismatch().trace().is_empty());
    }

    #[test]
    fn test_trace_renders_outermost_first() {
        let err = mismatch()
            .within(Segment::Field("inner".into()))
            .within(Segment::Index(2))
            .within(Segment::Field("outer".into()));
        assert_eq!(
            err.to_string(),
            "`outer`: `2`: `inner`: Invalid type: Expected String, Got: 1"
        );
        assert_eq!(err.trace().len(), 3);
        assert_eq!(
            err.trace().segments().next(),
            Some(&Segment::Field("outer".into()))
        );
    }

    #[test]
    fn test_innermost_origin_wins() {
        let err = mismatch().with_origin("inner.rs:1:1").with_origin("outer.rs:9:9");
        assert_eq!(err.origin(), Some("inner.rs:1:1"));
    }

    #[test]
    fn test_length_display_unbounded() {
        let err = Error::new(ErrorKind::LengthOutOfBounds {
            min: 2,
            max: None,
            len: 1,
        });
        assert_eq!(
            err.to_string(),
            "Invalid length: Expected between 2 and Infinity items, Got: 1"
        );
    }

    #[test]
    fn test_union_display() {
        let err = Error::new(ErrorKind::UnionExhausted {
            branches: vec![
                BranchFailure {
                    description: "String".into(),
                    message: "Invalid type: Expected String, Got: false".into(),
                },
                BranchFailure {
                    description: "Number".into(),
                    message: "Invalid type: Expected Number, Got: false".into(),
                },
            ],
            actual: "false".into(),
        });
        let text = err.to_string();
        assert!(text.starts_with("Invalid value: Expected one of String ("));
        assert!(text.contains(") OR Number ("));
        assert_eq!(err.code(), "union_exhausted");
    }

    #[test]
    fn test_configuration_flag() {
        assert!(Error::configuration("bad").is_configuration());
        assert!(!mismatch().is_configuration());
    }
}
