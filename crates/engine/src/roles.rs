//! Roles and the capability policy.
//!
//! Every mutating engine operation checks [`can_write`] once, before touching
//! the store. Handlers never branch on roles themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Vip,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Vip => "vip",
            Self::Admin => "admin",
        }
    }

    /// `vip` and `admin` manage the catalog, the users and repairs.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Vip | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Self::User),
            "vip" => Ok(Self::Vip),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::InvalidRole(format!("unknown role: {other}"))),
        }
    }
}

/// Resources guarded by the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Catalog,
    Users,
    DailyRecords,
    Purchases,
    Sales,
    Expenses,
    Leftovers,
    Reconciliation,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Users => "users",
            Self::DailyRecords => "daily records",
            Self::Purchases => "purchases",
            Self::Sales => "sales",
            Self::Expenses => "expenses",
            Self::Leftovers => "leftovers",
            Self::Reconciliation => "reconciliation",
        }
    }
}

/// Returns whether `role` may mutate `resource`.
pub fn can_write(role: Role, resource: Resource) -> bool {
    match resource {
        Resource::Catalog | Resource::Users | Resource::Reconciliation => role.is_privileged(),
        Resource::DailyRecords
        | Resource::Purchases
        | Resource::Sales
        | Resource::Expenses
        | Resource::Leftovers => true,
    }
}

/// Returns whether `role` may read `resource`.
pub fn can_read(role: Role, resource: Resource) -> bool {
    match resource {
        Resource::Users => role.is_privileged(),
        _ => true,
    }
}

/// The authenticated caller, as attached by the access gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i32, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    pub fn require_write(&self, resource: Resource) -> Result<(), EngineError> {
        if can_write(self.role, resource) {
            return Ok(());
        }
        Err(EngineError::Forbidden(format!(
            "role {} cannot modify {}",
            self.role,
            resource.as_str()
        )))
    }

    pub fn require_read(&self, resource: Resource) -> Result<(), EngineError> {
        if can_read(self.role, resource) {
            return Ok(());
        }
        Err(EngineError::Forbidden(format!(
            "role {} cannot read {}",
            self.role,
            resource.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_privileged() {
        assert!(!can_write(Role::User, Resource::Catalog));
        assert!(can_write(Role::Vip, Resource::Catalog));
        assert!(can_write(Role::Admin, Resource::Catalog));
    }

    #[test]
    fn daily_records_are_open_to_every_role() {
        for role in [Role::User, Role::Vip, Role::Admin] {
            assert!(can_write(role, Resource::DailyRecords));
            assert!(can_write(role, Resource::Sales));
        }
    }

    #[test]
    fn user_listing_requires_privilege() {
        assert!(!can_read(Role::User, Resource::Users));
        assert!(can_read(Role::Vip, Resource::Users));
        assert!(can_read(Role::User, Resource::Catalog));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::Vip, Role::Admin] {
            assert_eq!(Role::try_from(role.as_str()).unwrap(), role);
        }
        assert!(Role::try_from("root").is_err());
    }

    #[test]
    fn actor_denied_write_is_forbidden() {
        let actor = Actor::new(1, "sami", Role::User);
        assert!(matches!(
            actor.require_write(Resource::Users),
            Err(EngineError::Forbidden(_))
        ));
        assert!(actor.require_write(Resource::Purchases).is_ok());
    }
}
