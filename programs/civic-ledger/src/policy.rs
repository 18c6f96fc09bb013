//! Role-based access policy.
//!
//! Authorization never reads ambient identity: callers pass the actor's roles
//! in and get a yes/no back.

use std::collections::BTreeSet;

use crate::error::{ErrorCode, Result};
use crate::state::{Actor, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateVotingEvent,
    CastVote,
    CreatePetition,
    SignPetition,
    FinalizeEvent,
    ChangeStatus,
    DeleteEvent,
    ReadAdmin,
    ManageRoles,
    ManageTemplates,
}

impl Operation {
    /// Roles of which the caller must hold at least one.
    pub fn required_roles(self) -> &'static [Role] {
        match self {
            Operation::CastVote => &[Role::Voter],
            Operation::CreatePetition | Operation::SignPetition => &[Role::Petitioner],
            Operation::CreateVotingEvent
            | Operation::FinalizeEvent
            | Operation::ChangeStatus
            | Operation::DeleteEvent
            | Operation::ReadAdmin
            | Operation::ManageRoles
            | Operation::ManageTemplates => &[Role::Admin],
        }
    }
}

pub fn authorize(actor_roles: &BTreeSet<Role>, required_any: &[Role]) -> bool {
    actor_roles
        .iter()
        .any(|held| required_any.iter().any(|required| held.satisfies(*required)))
}

pub fn enforce(actor: &Actor, operation: Operation) -> Result<()> {
    if authorize(&actor.roles, operation.required_roles()) {
        Ok(())
    } else {
        log::debug!("{} denied {:?}", actor.id, operation);
        Err(ErrorCode::Forbidden)
    }
}

/// Like [`enforce`], but the owner of the resource is let through regardless
/// of role.
pub fn enforce_owner_or(actor: &Actor, owner: &str, operation: Operation) -> Result<()> {
    if actor.id == owner {
        return Ok(());
    }
    enforce(actor, operation)
}
