//! Structural validation of untyped JSON values.
//!
//! Every schema type in this crate is produced by walking a
//! [`serde_json::Value`] with an [`ObjectReader`]. The reader records each
//! violation it meets instead of stopping at the first one, so a single
//! [`ValidationFailure`] lists every offending field together with the
//! constraint it broke.
//!
//! # Example
//!
//! ```
//! use schemas::{CreateUser, Role, Schema};
//! use serde_json::json;
//!
//! let input = CreateUser::validate(&json!({
//!     "email": "ada@example.com",
//!     "name": "Ada",
//! }))
//! .expect("valid input");
//! assert_eq!(input.role, Role::User);
//!
//! let failure = CreateUser::validate(&json!({ "name": "" })).expect_err("invalid");
//! assert!(failure.issue_at("email").is_some());
//! assert!(failure.issue_at("name").is_some());
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
}

/// Location of a value inside the validated input.
///
/// Renders as `author.email` or `posts[1].title`; the root renders as
/// `<root>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Path of the validated value itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with an object member.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_owned()));
        Self(segments)
    }

    /// Extend the path with an array position.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Whether this path points at the validated value itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Individual path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// The constraint a value failed to meet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IssueCode {
    /// A required member is missing.
    Required,
    /// The value has the wrong JSON type.
    InvalidType {
        /// Kind of value the schema expects.
        expected: &'static str,
        /// Kind of value that was supplied.
        received: &'static str,
    },
    /// The string is not a valid email address.
    InvalidEmail,
    /// The string is not a hyphenated UUID.
    InvalidUuid,
    /// The value cannot be coerced into a timestamp.
    InvalidDate,
    /// The value is below the allowed minimum (length or magnitude).
    TooSmall {
        /// Smallest accepted length or value.
        minimum: u64,
    },
    /// The value exceeds the allowed maximum (length or magnitude).
    TooBig {
        /// Largest accepted length or value.
        maximum: u64,
    },
    /// The string is not one of the accepted tokens.
    InvalidEnumValue {
        /// Every accepted token.
        options: &'static [&'static str],
    },
    /// The member is not part of the schema.
    UnrecognizedKey,
    /// The input text is not JSON at all.
    InvalidJson {
        /// Parser diagnostic.
        detail: String,
    },
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::InvalidType { expected, received } => {
                write!(f, "expected {expected}, received {received}")
            }
            Self::InvalidEmail => f.write_str("invalid email"),
            Self::InvalidUuid => f.write_str("invalid uuid"),
            Self::InvalidDate => f.write_str("invalid date"),
            Self::TooSmall { minimum } => write!(f, "must be at least {minimum}"),
            Self::TooBig { maximum } => write!(f, "must be at most {maximum}"),
            Self::InvalidEnumValue { options } => {
                write!(f, "expected one of {}", options.join(", "))
            }
            Self::UnrecognizedKey => f.write_str("unrecognized key"),
            Self::InvalidJson { detail } => write!(f, "invalid JSON: {detail}"),
        }
    }
}

/// A single violation: where it happened and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    path: FieldPath,
    code: IssueCode,
}

impl FieldIssue {
    /// Pair a location with the constraint it broke.
    #[must_use]
    pub const fn new(path: FieldPath, code: IssueCode) -> Self {
        Self { path, code }
    }

    /// Location of the offending value.
    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Constraint that was violated.
    #[must_use]
    pub const fn code(&self) -> &IssueCode {
        &self.code
    }

    /// Human-readable reason.
    #[must_use]
    pub fn message(&self) -> String {
        self.code.to_string()
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.code)
    }
}

/// Every violation found while validating one input value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", render_issues(.issues))]
pub struct ValidationFailure {
    issues: Vec<FieldIssue>,
}

fn render_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationFailure {
    /// Wrap the collected issues.
    #[must_use]
    pub const fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Issues in the order they were found.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Consume the failure, yielding its issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }

    /// First issue reported at the rendered `path` (for example
    /// `"author.email"`).
    #[must_use]
    pub fn issue_at(&self, path: &str) -> Option<&FieldIssue> {
        self.issues
            .iter()
            .find(|issue| issue.path.to_string() == path)
    }
}

/// What to do with object members the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnknownKeys {
    /// Report every undeclared member as [`IssueCode::UnrecognizedKey`].
    #[default]
    Reject,
    /// Drop undeclared members silently.
    Strip,
}

/// Mutable state shared by every reader during one validation pass.
#[derive(Debug, Default)]
pub struct ValidationContext {
    issues: Vec<FieldIssue>,
    unknown_keys: UnknownKeys,
}

impl ValidationContext {
    /// Start a validation pass with the given unknown-key policy.
    #[must_use]
    pub const fn new(unknown_keys: UnknownKeys) -> Self {
        Self {
            issues: Vec::new(),
            unknown_keys,
        }
    }

    /// Record a violation at `path`.
    pub fn report(&mut self, path: &FieldPath, code: IssueCode) {
        self.issues.push(FieldIssue::new(path.clone(), code));
    }

    /// Record a type mismatch at `path`.
    pub fn invalid_type(&mut self, path: &FieldPath, expected: &'static str, received: &Value) {
        self.report(
            path,
            IssueCode::InvalidType {
                expected,
                received: json_kind(received),
            },
        );
    }

    /// Active unknown-key policy.
    #[must_use]
    pub const fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Turn the pass into a result: the parsed value when nothing was
    /// reported, otherwise every recorded issue.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] when at least one issue was recorded or
    /// no value was produced.
    pub fn finish<T>(self, parsed: Option<T>) -> Result<T, ValidationFailure> {
        match parsed {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ => Err(ValidationFailure::new(self.issues)),
        }
    }
}

/// Name of the JSON kind of `value`, as used in type-mismatch messages.
#[must_use]
pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A leaf value that can be read out of JSON.
///
/// Implementations record issues on `cx` and return `None` when the value
/// does not satisfy the type.
pub trait FieldValue: Sized {
    /// Read `value` found at `path`.
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self>;
}

/// An object-shaped schema.
///
/// Implementors only describe how their members are read; the provided
/// methods run a whole validation pass.
pub trait Schema: Sized {
    /// Read every member of `Self` from `fields`.
    ///
    /// Every member must be read before any early return so that all
    /// violations are collected in one pass.
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self>;

    /// Validate `value`, rejecting undeclared members.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] listing every violation.
    fn validate(value: &Value) -> Result<Self, ValidationFailure> {
        Self::validate_with(value, UnknownKeys::default())
    }

    /// Validate `value` under an explicit unknown-key policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] listing every violation.
    fn validate_with(value: &Value, unknown_keys: UnknownKeys) -> Result<Self, ValidationFailure> {
        let mut cx = ValidationContext::new(unknown_keys);
        let parsed = read_object(value, &FieldPath::root(), &mut cx, Self::read_fields);
        cx.finish(parsed)
    }

    /// Parse `json` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] with a root-level
    /// [`IssueCode::InvalidJson`] when the text is not JSON, otherwise every
    /// schema violation.
    fn validate_json(json: &str) -> Result<Self, ValidationFailure> {
        Self::validate_json_with(json, UnknownKeys::default())
    }

    /// Parse `json` and validate the result under an explicit unknown-key
    /// policy.
    ///
    /// # Errors
    ///
    /// As for [`Schema::validate_json`].
    fn validate_json_with(json: &str, unknown_keys: UnknownKeys) -> Result<Self, ValidationFailure> {
        let value: Value = serde_json::from_str(json).map_err(|err| {
            ValidationFailure::new(vec![FieldIssue::new(
                FieldPath::root(),
                IssueCode::InvalidJson {
                    detail: err.to_string(),
                },
            )])
        })?;
        Self::validate_with(&value, unknown_keys)
    }
}

/// Read an object at `path` with `read`, then apply the unknown-key policy.
pub fn read_object<T>(
    value: &Value,
    path: &FieldPath,
    cx: &mut ValidationContext,
    read: impl FnOnce(&mut ObjectReader<'_>) -> Option<T>,
) -> Option<T> {
    let Value::Object(map) = value else {
        cx.invalid_type(path, "object", value);
        return None;
    };
    let mut reader = ObjectReader {
        map,
        path,
        cx,
        seen: Vec::new(),
    };
    let parsed = read(&mut reader);
    reader.check_unknown_keys();
    parsed
}

fn read_array<T>(
    value: &Value,
    path: &FieldPath,
    cx: &mut ValidationContext,
    mut read: impl FnMut(&Value, &FieldPath, &mut ValidationContext) -> Option<T>,
) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        cx.invalid_type(path, "array", value);
        return None;
    };
    let mut parsed = Vec::with_capacity(items.len());
    let mut complete = true;
    for (index, item) in items.iter().enumerate() {
        match read(item, &path.index(index), cx) {
            Some(value) => parsed.push(value),
            None => complete = false,
        }
    }
    complete.then_some(parsed)
}

/// Cursor over the members of one JSON object.
///
/// Each accessor marks its member as declared, so members nobody asked for
/// can be reported once the schema has finished reading.
pub struct ObjectReader<'a> {
    map: &'a Map<String, Value>,
    path: &'a FieldPath,
    cx: &'a mut ValidationContext,
    seen: Vec<&'static str>,
}

impl<'a> ObjectReader<'a> {
    fn member(&mut self, key: &'static str) -> (FieldPath, Option<&'a Value>) {
        let map = self.map;
        self.seen.push(key);
        (self.path.key(key), map.get(key))
    }

    /// A member that must be present and non-null.
    pub fn required<T: FieldValue>(&mut self, key: &'static str) -> Option<T> {
        let (path, raw) = self.member(key);
        let Some(value) = raw else {
            self.cx.report(&path, IssueCode::Required);
            return None;
        };
        T::read(value, &path, self.cx)
    }

    /// A member that may be missing but must not be `null`.
    ///
    /// Yields `Some(None)` when absent and `None` when invalid.
    pub fn optional<T: FieldValue>(&mut self, key: &'static str) -> Option<Option<T>> {
        let (path, raw) = self.member(key);
        match raw {
            None => Some(None),
            Some(value) => T::read(value, &path, self.cx).map(Some),
        }
    }

    /// A member that may be missing and takes `default` when it is.
    pub fn defaulted<T: FieldValue>(&mut self, key: &'static str, default: T) -> Option<T> {
        let (path, raw) = self.member(key);
        match raw {
            None => Some(default),
            Some(value) => T::read(value, &path, self.cx),
        }
    }

    /// A member that must be present but may be `null`.
    pub fn nullable<T: FieldValue>(&mut self, key: &'static str) -> Option<Option<T>> {
        let (path, raw) = self.member(key);
        match raw {
            None => {
                self.cx.report(&path, IssueCode::Required);
                None
            }
            Some(Value::Null) => Some(None),
            Some(value) => T::read(value, &path, self.cx).map(Some),
        }
    }

    /// A member that may be missing, `null`, or a value, keeping the three
    /// cases apart.
    pub fn patch<T: FieldValue>(&mut self, key: &'static str) -> Option<crate::Patch<T>> {
        let (path, raw) = self.member(key);
        match raw {
            None => Some(crate::Patch::Absent),
            Some(Value::Null) => Some(crate::Patch::Null),
            Some(value) => T::read(value, &path, self.cx).map(crate::Patch::Value),
        }
    }

    /// A required member holding another schema.
    pub fn nested<T: Schema>(&mut self, key: &'static str) -> Option<T> {
        let (path, raw) = self.member(key);
        let Some(value) = raw else {
            self.cx.report(&path, IssueCode::Required);
            return None;
        };
        read_object(value, &path, self.cx, T::read_fields)
    }

    /// A required member holding an array of another schema.
    pub fn nested_list<T: Schema>(&mut self, key: &'static str) -> Option<Vec<T>> {
        let (path, raw) = self.member(key);
        let Some(value) = raw else {
            self.cx.report(&path, IssueCode::Required);
            return None;
        };
        read_array(value, &path, self.cx, |item, item_path, cx| {
            read_object(item, item_path, cx, T::read_fields)
        })
    }

    /// Read another schema's members from this same object.
    pub fn flatten<T: Schema>(&mut self) -> Option<T> {
        T::read_fields(self)
    }

    /// Record a cross-member violation against the member `key`.
    pub fn report(&mut self, key: &str, code: IssueCode) {
        let path = self.path.key(key);
        self.cx.report(&path, code);
    }

    fn check_unknown_keys(&mut self) {
        if self.cx.unknown_keys() == UnknownKeys::Strip {
            return;
        }
        let map = self.map;
        for key in map.keys() {
            if !self.seen.iter().any(|declared| *declared == key.as_str()) {
                let path = self.path.key(key);
                self.cx.report(&path, IssueCode::UnrecognizedKey);
            }
        }
    }
}

/// Deserialise any [`Schema`] by validating the intermediate JSON value.
///
/// # Errors
///
/// Propagates the deserializer's error, or a custom error carrying the
/// rendered [`ValidationFailure`].
pub fn deserialize_validated<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Schema,
{
    let value = Value::deserialize(deserializer)?;
    T::validate(&value).map_err(serde::de::Error::custom)
}

/// Implement [`serde::Deserialize`] for schema types by routing through
/// [`Schema::validate`].
#[macro_export]
macro_rules! deserialize_via_schema {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
                where
                    D: ::serde::Deserializer<'de>,
                {
                    $crate::validation::deserialize_validated(deserializer)
                }
            }
        )+
    };
}

impl FieldValue for String {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        expect_str(value, path, cx).map(str::to_owned)
    }
}

impl FieldValue for bool {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        if let Value::Bool(flag) = value {
            Some(*flag)
        } else {
            cx.invalid_type(path, "boolean", value);
            None
        }
    }
}

impl FieldValue for u64 {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let parsed = value.as_u64();
        if parsed.is_none() {
            cx.invalid_type(path, "non-negative integer", value);
        }
        parsed
    }
}

impl FieldValue for u32 {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let wide = u64::read(value, path, cx)?;
        let narrowed = Self::try_from(wide).ok();
        if narrowed.is_none() {
            cx.report(
                path,
                IssueCode::TooBig {
                    maximum: u64::from(Self::MAX),
                },
            );
        }
        narrowed
    }
}

impl FieldValue for u16 {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let wide = u64::read(value, path, cx)?;
        let narrowed = Self::try_from(wide).ok();
        if narrowed.is_none() {
            cx.report(
                path,
                IssueCode::TooBig {
                    maximum: u64::from(Self::MAX),
                },
            );
        }
        narrowed
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        read_array(value, path, cx, T::read)
    }
}

/// Borrow `value` as a string, recording a type mismatch otherwise.
pub fn expect_str<'v>(
    value: &'v Value,
    path: &FieldPath,
    cx: &mut ValidationContext,
) -> Option<&'v str> {
    if let Value::String(text) = value {
        Some(text.as_str())
    } else {
        cx.invalid_type(path, "string", value);
        None
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
