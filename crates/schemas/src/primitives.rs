//! Constrained scalar values shared by every schema.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use email_address::{EmailAddress, Options};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::{FieldPath, FieldValue, IssueCode, ValidationContext, expect_str};

/// Length of a UUID in canonical hyphenated form.
const HYPHENATED_UUID_LEN: usize = 36;

/// Reasons a scalar fails its constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The text is empty.
    #[error("must contain at least 1 character")]
    Empty,
    /// The text is not an email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

impl ConstraintError {
    /// Issue code reported for this constraint.
    #[must_use]
    pub const fn code(&self) -> IssueCode {
        match self {
            Self::Empty => IssueCode::TooSmall { minimum: 1 },
            Self::InvalidEmail(_) => IssueCode::InvalidEmail,
        }
    }
}

/// Email address accepted by the format check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and wrap `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvalidEmail`] when the format check fails.
    pub fn new(email: impl Into<String>) -> Result<Self, ConstraintError> {
        let raw = email.into();
        let options = Options::default()
            .with_required_tld()
            .without_domain_literal()
            .without_display_text();
        match EmailAddress::parse_with_options(&raw, options) {
            Ok(parsed) if is_plain_local_part(parsed.local_part()) => Ok(Self(raw)),
            _ => Err(ConstraintError::InvalidEmail(raw)),
        }
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unquoted local part made of letters, digits and `_'+-.`, not starting
/// with a dot and not ending with `.` or `'`.
fn is_plain_local_part(local: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.');
    !local.is_empty()
        && local.chars().all(allowed)
        && !local.starts_with('.')
        && !local.ends_with(['.', '\''])
        && !local.contains("..")
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = ConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Text holding at least one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Validate and wrap `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::Empty`] for the empty string.
    pub fn new(text: impl Into<String>) -> Result<Self, ConstraintError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ConstraintError::Empty);
        }
        Ok(Self(text))
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NonEmptyText> for String {
    fn from(value: NonEmptyText) -> Self {
        value.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = ConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Three-state value for members that may be omitted or explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Patch<T> {
    /// The member was not supplied; keep the current value.
    Absent,
    /// The member was `null`; clear the current value.
    Null,
    /// The member carries a replacement value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    /// Whether the member was omitted.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Resolve the patch against the value currently stored.
    #[must_use]
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Absent => current,
            Self::Null => None,
            Self::Value(value) => Some(value),
        }
    }

    /// Borrow the replacement value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

// Containers skip `Absent` members with `skip_serializing_if`.
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => serializer.serialize_some(value),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl FieldValue for Email {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let text = expect_str(value, path, cx)?;
        Self::new(text).map_err(|err| cx.report(path, err.code())).ok()
    }
}

impl FieldValue for NonEmptyText {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let text = expect_str(value, path, cx)?;
        Self::new(text).map_err(|err| cx.report(path, err.code())).ok()
    }
}

impl FieldValue for Uuid {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let text = expect_str(value, path, cx)?;
        let parsed = (text.len() == HYPHENATED_UUID_LEN)
            .then(|| Self::try_parse(text).ok())
            .flatten();
        if parsed.is_none() {
            cx.report(path, IssueCode::InvalidUuid);
        }
        parsed
    }
}

impl FieldValue for DateTime<Utc> {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let parsed = match value {
            Value::String(text) => parse_timestamp(text),
            Value::Number(number) => number.as_i64().and_then(Self::from_timestamp_millis),
            other => {
                cx.invalid_type(path, "date", other);
                return None;
            }
        };
        if parsed.is_none() {
            cx.report(path, IssueCode::InvalidDate);
        }
        parsed
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
