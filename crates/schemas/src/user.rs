//! User accounts and their create/update payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::primitives::{Email, NonEmptyText};
use crate::role::Role;
use crate::validation::{ObjectReader, Schema};

/// Registered account.
///
/// ## Invariants
/// - `id` is fixed at creation and is only readable.
/// - `email` passes the format check and `name` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: Uuid,
    /// Contact address.
    pub email: Email,
    /// Display name.
    pub name: NonEmptyText,
    /// Privilege level.
    pub role: Role,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the last change.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from already validated parts.
    #[must_use]
    pub const fn new(
        id: Uuid,
        email: Email,
        name: NonEmptyText,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            role,
            created_at,
            updated_at,
        }
    }

    /// Materialise a creation payload under `id` at instant `now`.
    #[must_use]
    pub fn create(id: Uuid, input: CreateUser, now: DateTime<Utc>) -> Self {
        let CreateUser { email, name, role } = input;
        Self::new(id, email, name, role, now, now)
    }

    /// Apply a partial update, stamping `updated_at` with `now`.
    pub fn apply(&mut self, update: UpdateUser, now: DateTime<Utc>) {
        let UpdateUser { email, name, role } = update;
        if let Some(new_email) = email {
            self.email = new_email;
        }
        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_role) = role {
            self.role = new_role;
        }
        self.updated_at = now;
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }
}

impl Schema for User {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let id = fields.required("id");
        let email = fields.required("email");
        let name = fields.required("name");
        let role = fields.required("role");
        let created_at = fields.required("createdAt");
        let updated_at = fields.required("updatedAt");
        Some(Self {
            id: id?,
            email: email?,
            name: name?,
            role: role?,
            created_at: created_at?,
            updated_at: updated_at?,
        })
    }
}

/// Payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// Contact address.
    pub email: Email,
    /// Display name.
    pub name: NonEmptyText,
    /// Requested role; [`Role::User`] when omitted.
    pub role: Role,
}

impl Schema for CreateUser {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let email = fields.required("email");
        let name = fields.required("name");
        let role = fields.defaulted("role", Role::default());
        Some(Self {
            email: email?,
            name: name?,
            role: role?,
        })
    }
}

/// Partial update of a user. Identity cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// Replacement address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    /// Replacement display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NonEmptyText>,
    /// Replacement role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Schema for UpdateUser {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let email = fields.optional("email");
        let name = fields.optional("name");
        let role = fields.optional("role");
        Some(Self {
            email: email?,
            name: name?,
            role: role?,
        })
    }
}

crate::deserialize_via_schema!(User, CreateUser, UpdateUser);
