//! Domain core for voting events and petitions.
//!
//! Instruction handlers validate and mutate already-loaded state, the same way
//! an on-chain program mutates the accounts handed to it. Persistence is the
//! caller's concern: every handler returns the records and the ledger entry the
//! caller must write in one unit.
#![allow(ambiguous_glob_reexports)]

pub mod error;
pub mod instructions;
pub mod ledger;
pub mod policy;
pub mod query;
pub mod state;

pub use error::{ErrorCode, ErrorKind, Result};
pub use instructions::*;
pub use state::*;

/// Entry points, one per instruction.
pub mod program {
    use super::*;

    pub fn create_voting_event(
        ctx: &Context,
        args: CreateVotingEvent,
    ) -> Result<Receipt<VotingEvent>> {
        create_voting_event::handler(ctx, args)
    }

    pub fn cast_vote(
        ctx: &Context,
        event: &mut VotingEvent,
        prior_vote: Option<&Vote>,
        choice: &VoteChoice,
    ) -> Result<Receipt<Vote>> {
        cast_vote::handler(ctx, event, prior_vote, choice)
    }

    pub fn create_petition(ctx: &Context, args: CreatePetition) -> Result<Receipt<Petition>> {
        create_petition::handler(ctx, args)
    }

    pub fn sign_petition(
        ctx: &Context,
        petition: &mut Petition,
        prior_signature: Option<&Signature>,
        comment: Option<String>,
    ) -> Result<Receipt<Signature>> {
        sign_petition::handler(ctx, petition, prior_signature, comment)
    }

    pub fn finalize_event<E: Lifecycle>(
        ctx: &Context,
        event: &mut E,
        results_reference: &str,
    ) -> Result<LedgerEntry> {
        finalize_event::handler(ctx, event, results_reference)
    }

    pub fn change_status<E: Lifecycle>(
        ctx: &Context,
        event: &mut E,
        status: EventStatus,
    ) -> Result<LedgerEntry> {
        change_status::handler(ctx, event, status)
    }

    pub fn delete_event<E: Lifecycle>(ctx: &Context, event: &E) -> Result<LedgerEntry> {
        delete_event::handler(ctx, event)
    }

    pub fn grant_role(ctx: &Context, user_id: &str, role: Role) -> Result<LedgerEntry> {
        manage_roles::grant(ctx, user_id, role)
    }

    pub fn revoke_role(ctx: &Context, user_id: &str, role: Role) -> Result<LedgerEntry> {
        manage_roles::revoke(ctx, user_id, role)
    }

    pub fn create_template(ctx: &Context, args: CreateTemplate) -> Result<Receipt<EventTemplate>> {
        create_template::handler(ctx, args)
    }

    pub fn update_template(
        ctx: &Context,
        template: &mut EventTemplate,
        updates: TemplateUpdate,
    ) -> Result<LedgerEntry> {
        update_template::handler(ctx, template, updates)
    }

    pub fn deploy_contract(
        ctx: &Context,
        template: &EventTemplate,
        args: DeployContract,
    ) -> Result<Receipt<ContractDeployment>> {
        deploy_contract::handler(ctx, template, args)
    }
}
