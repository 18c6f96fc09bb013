use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use civic_ledger::{
    program, Actor, ActorId, Context, ContractDeployment, CreatePetition, CreateTemplate,
    CreateVotingEvent, DeployContract, ErrorCode, EventKind, EventStatus, EventTemplate,
    LedgerEntry, Petition, Receipt, Result, Role, Signature, TemplateUpdate, Vote, VoteChoice,
    VotingEvent,
};
use uuid::Uuid;

/// Store double for program-level tests. Mirrors the service's unit of work:
/// load, run the handler, then apply record and ledger entry together, with
/// the same uniqueness rules the database enforces.
pub struct InMemoryLedger {
    pub now: DateTime<Utc>,
    pub voting_events: HashMap<Uuid, VotingEvent>,
    pub votes: Vec<Vote>,
    pub petitions: HashMap<Uuid, Petition>,
    pub signatures: Vec<Signature>,
    pub templates: HashMap<Uuid, EventTemplate>,
    pub deployments: Vec<ContractDeployment>,
    /// Oldest first.
    pub entries: Vec<LedgerEntry>,
    pub roles: HashMap<ActorId, BTreeSet<Role>>,
}

impl InMemoryLedger {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            voting_events: HashMap::new(),
            votes: Vec::new(),
            petitions: HashMap::new(),
            signatures: Vec::new(),
            templates: HashMap::new(),
            deployments: Vec::new(),
            entries: Vec::new(),
            roles: HashMap::new(),
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn bootstrap_admin(&mut self, user_id: &str) {
        self.roles
            .entry(user_id.to_string())
            .or_default()
            .insert(Role::Admin);
    }

    pub fn actor(&self, user_id: &str) -> Actor {
        Actor::new(
            user_id,
            self.roles.get(user_id).cloned().unwrap_or_default(),
        )
    }

    pub fn send_create_voting_event(
        &mut self,
        user_id: &str,
        args: CreateVotingEvent,
    ) -> Result<VotingEvent> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let Receipt {
            record,
            ledger_entry,
        } = program::create_voting_event(&ctx, args)?;

        self.voting_events.insert(record.id, record.clone());
        self.entries.push(ledger_entry);
        Ok(record)
    }

    pub fn send_cast_vote(
        &mut self,
        user_id: &str,
        event_id: Uuid,
        choice: VoteChoice,
    ) -> Result<Vote> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let mut event = self
            .voting_events
            .get(&event_id)
            .cloned()
            .ok_or(ErrorCode::NotFound)?;
        let prior_vote = self
            .votes
            .iter()
            .find(|v| v.voting_event_id == event_id && v.user_id == actor.id)
            .cloned();

        let Receipt {
            record,
            ledger_entry,
        } = program::cast_vote(&ctx, &mut event, prior_vote.as_ref(), &choice)?;

        self.voting_events.insert(event_id, event);
        self.votes.push(record.clone());
        self.entries.push(ledger_entry);
        Ok(record)
    }

    pub fn send_create_petition(&mut self, user_id: &str, args: CreatePetition) -> Result<Petition> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let Receipt {
            record,
            ledger_entry,
        } = program::create_petition(&ctx, args)?;

        self.petitions.insert(record.id, record.clone());
        self.entries.push(ledger_entry);
        Ok(record)
    }

    pub fn send_sign_petition(
        &mut self,
        user_id: &str,
        petition_id: Uuid,
        comment: Option<&str>,
    ) -> Result<Signature> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let mut petition = self
            .petitions
            .get(&petition_id)
            .cloned()
            .ok_or(ErrorCode::NotFound)?;
        let prior_signature = self
            .signatures
            .iter()
            .find(|s| s.petition_id == petition_id && s.user_id == actor.id)
            .cloned();

        let Receipt {
            record,
            ledger_entry,
        } = program::sign_petition(
            &ctx,
            &mut petition,
            prior_signature.as_ref(),
            comment.map(str::to_string),
        )?;

        self.petitions.insert(petition_id, petition);
        self.signatures.push(record.clone());
        self.entries.push(ledger_entry);
        Ok(record)
    }

    pub fn send_finalize(
        &mut self,
        user_id: &str,
        kind: EventKind,
        event_id: Uuid,
        results_reference: &str,
    ) -> Result<()> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let entry = match kind {
            EventKind::Voting => {
                let event = self
                    .voting_events
                    .get_mut(&event_id)
                    .ok_or(ErrorCode::NotFound)?;
                let mut staged = event.clone();
                let entry = program::finalize_event(&ctx, &mut staged, results_reference)?;
                *event = staged;
                entry
            }
            EventKind::Petition => {
                let petition = self
                    .petitions
                    .get_mut(&event_id)
                    .ok_or(ErrorCode::NotFound)?;
                let mut staged = petition.clone();
                let entry = program::finalize_event(&ctx, &mut staged, results_reference)?;
                *petition = staged;
                entry
            }
        };
        self.entries.push(entry);
        Ok(())
    }

    pub fn send_change_status(
        &mut self,
        user_id: &str,
        kind: EventKind,
        event_id: Uuid,
        status: EventStatus,
    ) -> Result<()> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let entry = match kind {
            EventKind::Voting => {
                let event = self
                    .voting_events
                    .get_mut(&event_id)
                    .ok_or(ErrorCode::NotFound)?;
                let mut staged = event.clone();
                let entry = program::change_status(&ctx, &mut staged, status)?;
                *event = staged;
                entry
            }
            EventKind::Petition => {
                let petition = self
                    .petitions
                    .get_mut(&event_id)
                    .ok_or(ErrorCode::NotFound)?;
                let mut staged = petition.clone();
                let entry = program::change_status(&ctx, &mut staged, status)?;
                *petition = staged;
                entry
            }
        };
        self.entries.push(entry);
        Ok(())
    }

    /// Removes the event with its participation records. Ledger entries stay.
    pub fn send_delete_event(&mut self, user_id: &str, kind: EventKind, event_id: Uuid) -> Result<()> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let entry = match kind {
            EventKind::Voting => {
                let event = self.voting_events.get(&event_id).ok_or(ErrorCode::NotFound)?;
                let entry = program::delete_event(&ctx, event)?;
                self.voting_events.remove(&event_id);
                self.votes.retain(|v| v.voting_event_id != event_id);
                entry
            }
            EventKind::Petition => {
                let petition = self.petitions.get(&event_id).ok_or(ErrorCode::NotFound)?;
                let entry = program::delete_event(&ctx, petition)?;
                self.petitions.remove(&event_id);
                self.signatures.retain(|s| s.petition_id != event_id);
                entry
            }
        };
        self.entries.push(entry);
        Ok(())
    }

    /// Returns whether the grant changed anything. Only changes are recorded.
    pub fn send_grant_role(&mut self, user_id: &str, target: &str, role: Role) -> Result<bool> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let entry = program::grant_role(&ctx, target, role)?;

        let changed = self
            .roles
            .entry(target.trim().to_string())
            .or_default()
            .insert(role);
        if changed {
            self.entries.push(entry);
        }
        Ok(changed)
    }

    pub fn send_revoke_role(&mut self, user_id: &str, target: &str, role: Role) -> Result<bool> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let entry = program::revoke_role(&ctx, target, role)?;

        let changed = self
            .roles
            .get_mut(target.trim())
            .map_or(false, |roles| roles.remove(&role));
        if changed {
            self.entries.push(entry);
        }
        Ok(changed)
    }

    pub fn send_create_template(&mut self, user_id: &str, args: CreateTemplate) -> Result<EventTemplate> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let Receipt {
            record,
            ledger_entry,
        } = program::create_template(&ctx, args)?;

        self.templates.insert(record.id, record.clone());
        self.entries.push(ledger_entry);
        Ok(record)
    }

    pub fn send_update_template(
        &mut self,
        user_id: &str,
        template_id: Uuid,
        updates: TemplateUpdate,
    ) -> Result<EventTemplate> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let template = self
            .templates
            .get_mut(&template_id)
            .ok_or(ErrorCode::TemplateNotFound)?;
        let mut staged = template.clone();
        let entry = program::update_template(&ctx, &mut staged, updates)?;
        *template = staged.clone();
        self.entries.push(entry);
        Ok(staged)
    }

    pub fn send_deploy_contract(
        &mut self,
        user_id: &str,
        template_id: Uuid,
        args: DeployContract,
    ) -> Result<ContractDeployment> {
        let actor = self.actor(user_id);
        let ctx = Context::new(&actor, self.now);
        let template = self
            .templates
            .get(&template_id)
            .ok_or(ErrorCode::TemplateNotFound)?;
        let Receipt {
            record,
            ledger_entry,
        } = program::deploy_contract(&ctx, template, args)?;

        self.deployments.push(record.clone());
        self.entries.push(ledger_entry);
        Ok(record)
    }

    /// Active templates only, newest first.
    pub fn active_templates(&self) -> Vec<&EventTemplate> {
        let mut active: Vec<&EventTemplate> =
            self.templates.values().filter(|t| t.is_active).collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active
    }
}
