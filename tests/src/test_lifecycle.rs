use chrono::{Duration, Utc};
use civic_ledger::{
    CreatePetition, CreateVotingEvent, ErrorCode, EventKind, EventStatus, LedgerEntryType, Role,
    VoteChoice,
};

use crate::utils::{
    assert::assert_error_code, data_types::setup_context, fetch_utils::fetch_entries_of_type,
};

fn open_ballot(context: &mut crate::utils::data_types::LedgerTestContext) -> uuid::Uuid {
    let now = context.ledger.now;
    let admin = context.admin.clone();
    context
        .ledger
        .send_create_voting_event(
            &admin,
            CreateVotingEvent {
                title: "Library hours".into(),
                description: String::new(),
                options: vec!["Extend".into(), "Keep".into()],
                start_time: now,
                end_time: now + Duration::hours(2),
            },
        )
        .unwrap()
        .id
}

#[test]
fn test_status_transitions() {
    let mut context = setup_context(Utc::now(), 1, 0);
    let event_id = open_ballot(&mut context);
    let admin = context.admin.clone();
    let voter = context.voters[0].clone();
    let ledger = &mut context.ledger;

    // Completion is reserved for finalize
    assert_error_code(
        ledger.send_change_status(&admin, EventKind::Voting, event_id, EventStatus::Completed),
        ErrorCode::InvalidStatusTransition {
            from: EventStatus::Active,
            to: EventStatus::Completed,
        },
    );

    // Only admins change status
    assert_error_code(
        ledger.send_change_status(&voter, EventKind::Voting, event_id, EventStatus::Cancelled),
        ErrorCode::Forbidden,
    );

    ledger
        .send_change_status(&admin, EventKind::Voting, event_id, EventStatus::Cancelled)
        .unwrap();
    assert_eq!(
        ledger.voting_events[&event_id].status,
        EventStatus::Cancelled
    );

    // Cancelled events take no votes and cannot be finalized or revived
    assert_error_code(
        ledger.send_cast_vote(&voter, event_id, VoteChoice::Index(0)),
        ErrorCode::EventNotActive,
    );
    ledger.advance(Duration::hours(3));
    assert_error_code(
        ledger.send_finalize(&admin, EventKind::Voting, event_id, "n/a"),
        ErrorCode::EventNotActive,
    );
    assert_error_code(
        ledger.send_change_status(&admin, EventKind::Voting, event_id, EventStatus::Active),
        ErrorCode::InvalidStatusTransition {
            from: EventStatus::Cancelled,
            to: EventStatus::Active,
        },
    );

    let changes = fetch_entries_of_type(ledger, LedgerEntryType::EventStatusChanged);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].data["from"], "active");
    assert_eq!(changes[0].data["to"], "cancelled");

    assert_error_code(
        ledger.send_change_status(
            &admin,
            EventKind::Petition,
            event_id,
            EventStatus::Cancelled,
        ),
        ErrorCode::NotFound,
    );
}

#[test]
fn test_delete_event_keeps_history() {
    let mut context = setup_context(Utc::now(), 2, 1);
    let event_id = open_ballot(&mut context);
    let admin = context.admin.clone();
    let ledger = &mut context.ledger;

    for voter in &context.voters {
        ledger
            .send_cast_vote(voter, event_id, VoteChoice::Index(1))
            .unwrap();
    }
    let entries_before = ledger.entries.len();

    // Petitioners cannot delete
    let petitioner = context.petitioners[0].clone();
    assert_error_code(
        ledger.send_delete_event(&petitioner, EventKind::Voting, event_id),
        ErrorCode::Forbidden,
    );

    ledger
        .send_delete_event(&admin, EventKind::Voting, event_id)
        .unwrap();
    assert!(!ledger.voting_events.contains_key(&event_id));
    assert!(ledger.votes.is_empty());

    // Earlier entries survive and the removal is recorded
    assert_eq!(ledger.entries.len(), entries_before + 1);
    let deleted = fetch_entries_of_type(ledger, LedgerEntryType::EventDeleted);
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].related_id, Some(event_id.to_string()));
    assert_eq!(deleted[0].data["removed_participation"], 2);
    assert_eq!(
        fetch_entries_of_type(ledger, LedgerEntryType::VoteCast).len(),
        2
    );

    assert_error_code(
        ledger.send_delete_event(&admin, EventKind::Voting, event_id),
        ErrorCode::NotFound,
    );
}

#[test]
fn test_petition_cancel_and_delete() {
    let mut context = setup_context(Utc::now(), 0, 2);
    let admin = context.admin.clone();
    let creator = context.petitioners[0].clone();
    let signer = context.petitioners[1].clone();
    let ledger = &mut context.ledger;
    let now = ledger.now;

    let petition = ledger
        .send_create_petition(
            &creator,
            CreatePetition {
                title: "Dog park".into(),
                description: "Fenced area near the river".into(),
                start_time: now,
                end_time: now + Duration::days(1),
                target_signatures: Some(10),
            },
        )
        .unwrap();
    ledger
        .send_sign_petition(&signer, petition.id, None)
        .unwrap();

    // The creator owns finalize, not status changes
    assert_error_code(
        ledger.send_change_status(
            &creator,
            EventKind::Petition,
            petition.id,
            EventStatus::Cancelled,
        ),
        ErrorCode::Forbidden,
    );
    ledger
        .send_change_status(&admin, EventKind::Petition, petition.id, EventStatus::Cancelled)
        .unwrap();
    assert_error_code(
        ledger.send_sign_petition(&creator, petition.id, None),
        ErrorCode::EventNotActive,
    );

    ledger
        .send_delete_event(&admin, EventKind::Petition, petition.id)
        .unwrap();
    assert!(ledger.signatures.is_empty());
    assert_error_code(
        ledger.send_sign_petition(&creator, petition.id, None),
        ErrorCode::NotFound,
    );
}

#[test]
fn test_role_management() {
    let mut context = setup_context(Utc::now(), 1, 0);
    let admin = context.admin.clone();
    let voter = context.voters[0].clone();
    let ledger = &mut context.ledger;
    let entries_before = ledger.entries.len();

    // Re-granting is a no-op and leaves no ledger entry
    assert!(!ledger.send_grant_role(&admin, &voter, Role::Voter).unwrap());
    assert_eq!(ledger.entries.len(), entries_before);

    // Only admins manage roles
    assert_error_code(
        ledger.send_grant_role(&voter, &voter, Role::Admin),
        ErrorCode::Forbidden,
    );
    assert_error_code(
        ledger.send_grant_role(&admin, "   ", Role::Voter),
        ErrorCode::BlankUserId,
    );

    // Admin satisfies every role check
    assert!(ledger.send_grant_role(&admin, &voter, Role::Admin).unwrap());
    let now = ledger.now;
    ledger
        .send_create_petition(
            &voter,
            CreatePetition {
                title: "Promoted".into(),
                description: String::new(),
                start_time: now,
                end_time: now + Duration::days(1),
                target_signatures: None,
            },
        )
        .unwrap();

    assert!(ledger.send_revoke_role(&admin, &voter, Role::Admin).unwrap());
    assert!(!ledger.send_revoke_role(&admin, &voter, Role::Admin).unwrap());
    assert_error_code(
        ledger.send_grant_role(&voter, "someone", Role::Voter),
        ErrorCode::Forbidden,
    );

    let grants = fetch_entries_of_type(ledger, LedgerEntryType::RoleGranted);
    let revokes = fetch_entries_of_type(ledger, LedgerEntryType::RoleRevoked);
    // Initial voter grant plus the admin promotion
    assert_eq!(grants.len(), 2);
    assert_eq!(revokes.len(), 1);
    assert_eq!(revokes[0].related_id.as_deref(), Some(voter.as_str()));
}

#[test]
fn test_finalize_ended_petition_once() {
    let mut context = setup_context(Utc::now(), 0, 1);
    let admin = context.admin.clone();
    let petitioner = context.petitioners[0].clone();
    let ledger = &mut context.ledger;
    let now = ledger.now;

    let petition = ledger
        .send_create_petition(
            &petitioner,
            CreatePetition {
                title: "Already closed".into(),
                description: String::new(),
                start_time: now - Duration::seconds(2000),
                end_time: now - Duration::seconds(1000),
                target_signatures: Some(5),
            },
        )
        .unwrap();

    ledger
        .send_finalize(&admin, EventKind::Petition, petition.id, "archived")
        .unwrap();
    assert_eq!(
        ledger.petitions[&petition.id].status,
        EventStatus::Completed
    );
    assert_error_code(
        ledger.send_finalize(&admin, EventKind::Petition, petition.id, "archived"),
        ErrorCode::AlreadyFinalized,
    );
    assert_eq!(
        fetch_entries_of_type(ledger, LedgerEntryType::PetitionFinalized).len(),
        1
    );
}
