use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The closed set of roles a caller can hold. `Admin` carries override authority
/// over ownership checks; `User` carries no implicit elevation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// The canonical name stored in the `users.roles` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts both `ADMIN` and the legacy `ROLE_ADMIN` spelling, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Capability
///
/// What a caller is trying to do with a resource. `Edit` and `Delete` share the
/// same rule; there is no partial capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    View,
    Edit,
    Delete,
}

/// Decision
///
/// The outcome of an authorization check. A `Deny` is a value, not an error;
/// orchestrators translate it into `AppError::Forbidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Identity
///
/// The resolved caller for a single request. Built once by the identity resolver
/// (see `auth`) and never mutated afterwards.
///
/// The role set is never empty: constructing an identity without roles yields `{User}`.
/// Duplicate roles collapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: i64,
    username: String,
    roles: BTreeSet<Role>,
}

impl Identity {
    pub fn new(
        id: i64,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        let mut roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            roles.insert(Role::User);
        }
        Self {
            id,
            username: username.into(),
            roles,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// OwnedResource
///
/// Anything with a unique id and an owning user id. The owner is fixed when the
/// resource is created; nothing in this crate transfers ownership.
pub trait OwnedResource {
    fn id(&self) -> i64;
    fn owner_id(&self) -> i64;
}

/// authorize
///
/// Decides whether `identity` may exercise `capability` on a resource owned by `owner_id`.
///
/// - `View` is always allowed.
/// - `Edit` / `Delete` are allowed for an `Admin`, or for the owner.
///
/// Pure: the same inputs always produce the same decision.
pub fn authorize(identity: &Identity, owner_id: i64, capability: Capability) -> Decision {
    match capability {
        Capability::View => Decision::Allow,
        Capability::Edit | Capability::Delete => {
            if identity.is_admin() || identity.id() == owner_id {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
    }
}

/// Convenience wrapper over [`authorize`] for anything that exposes its owner.
pub fn authorize_resource<R: OwnedResource + ?Sized>(
    identity: &Identity,
    resource: &R,
    capability: Capability,
) -> Decision {
    authorize(identity, resource.owner_id(), capability)
}
