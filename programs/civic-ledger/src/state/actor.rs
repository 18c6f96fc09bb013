use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Identity of a caller as resolved by the external identity provider.
pub type ActorId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Voter,
    Petitioner,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Voter, Role::Petitioner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Voter => "voter",
            Role::Petitioner => "petitioner",
        }
    }

    /// Admin stands in for every other role.
    pub fn satisfies(self, required: Role) -> bool {
        self == required || self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "voter" => Ok(Role::Voter),
            "petitioner" => Ok(Role::Petitioner),
            other => Err(ErrorCode::InvalidRole(other.to_string())),
        }
    }
}

/// An authenticated caller together with the roles granted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub roles: BTreeSet<Role>,
}

impl Actor {
    pub fn new(id: impl Into<ActorId>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
