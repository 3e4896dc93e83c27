//! Account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::validation::{FieldPath, FieldValue, IssueCode, ValidationContext, expect_str};

/// Privilege level of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular account.
    #[default]
    User,
    /// Administrative account.
    Admin,
}

/// Error returned when a string is not a role token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`; expected one of USER, ADMIN")]
pub struct UnknownRoleError(String);

impl Role {
    /// Wire tokens of every role, in declaration order.
    pub const TOKENS: &'static [&'static str] = &["USER", "ADMIN"];

    /// Wire token of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UnknownRoleError(other.to_owned())),
        }
    }
}

impl FieldValue for Role {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        let token = expect_str(value, path, cx)?;
        token
            .parse()
            .map_err(|_| {
                cx.report(
                    path,
                    IssueCode::InvalidEnumValue {
                        options: Self::TOKENS,
                    },
                );
            })
            .ok()
    }
}
