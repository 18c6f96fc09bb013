use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use civic_ledger::{
    ledger::BLOCK_NUMBER_BASELINE, query, CreatePetition, CreateVotingEvent, ErrorCode, EventKind,
    EventStatus, LedgerEntryType, Role, VoteChoice,
};

use crate::utils::{
    assert::assert_error_code,
    data_types::setup_context,
    fetch_utils::{fetch_entries_of_type, fetch_ledger_status, fetch_tally},
};

const VOTING_DURATION_HOURS: i64 = 24;

fn ballot(title: &str, now: DateTime<Utc>) -> CreateVotingEvent {
    CreateVotingEvent {
        title: title.to_string(),
        description: "Quarterly budget vote".to_string(),
        options: vec!["Yes".into(), "No".into(), "Abstain".into()],
        start_time: now,
        end_time: now + Duration::hours(VOTING_DURATION_HOURS),
    }
}

#[test]
fn test_voting_event_flow() {
    let mut context = setup_context(Utc::now(), 5, 0);
    let admin = context.admin.clone();
    let ledger = &mut context.ledger;
    let granted = ledger.entries.len();

    // Admin creates the event. Options are trimmed and ordered as given.
    let mut args = ballot("  Budget 2027  ", ledger.now);
    args.options = vec![" Yes".into(), "No ".into(), "Abstain".into()];
    let event = ledger.send_create_voting_event(&admin, args).unwrap();
    assert_eq!(event.title, "Budget 2027");
    assert_eq!(event.options, vec!["Yes", "No", "Abstain"]);
    assert_eq!(event.status, EventStatus::Active);
    assert_eq!(event.total_votes, 0);
    assert_eq!(ledger.entries.len(), granted + 1);
    assert_eq!(
        event.blockchain_hash.as_deref(),
        Some(ledger.entries.last().unwrap().transaction_hash.as_str())
    );

    // Voters cannot create events
    let voter_0 = context.voters[0].clone();
    assert_error_code(
        ledger.send_create_voting_event(&voter_0, ballot("Rogue", ledger.now)),
        ErrorCode::Forbidden,
    );

    // Votes by text and by index
    let choices = [
        VoteChoice::Value("Yes".into()),
        VoteChoice::Index(0),
        VoteChoice::Value(" No ".into()),
        VoteChoice::Index(2),
        VoteChoice::Value("Yes".into()),
    ];
    for (voter, choice) in context.voters.iter().zip(choices) {
        let vote = ledger.send_cast_vote(voter, event.id, choice).unwrap();
        assert!(vote.blockchain_hash.is_some());
    }

    // Second vote by the same voter is rejected and changes nothing
    let entries_before = ledger.entries.len();
    assert_error_code(
        ledger.send_cast_vote(&voter_0, event.id, VoteChoice::Value("No".into())),
        ErrorCode::AlreadyVoted,
    );
    assert_eq!(ledger.entries.len(), entries_before);

    // Undeclared options are rejected
    ledger.send_grant_role(&admin, "late-voter", Role::Voter).unwrap();
    assert_error_code(
        ledger.send_cast_vote("late-voter", event.id, VoteChoice::Value("Maybe".into())),
        ErrorCode::InvalidOption,
    );
    assert_error_code(
        ledger.send_cast_vote("late-voter", event.id, VoteChoice::Index(3)),
        ErrorCode::InvalidOption,
    );

    let tallies = fetch_tally(ledger, event.id);
    let counts: Vec<u64> = tallies.iter().map(|t| t.tally).collect();
    assert_eq!(counts, vec![3, 1, 1]);
    assert_eq!(
        query::tally_total(&tallies),
        ledger.voting_events[&event.id].total_votes
    );

    // Finalizing early is rejected
    assert_error_code(
        ledger.send_finalize(&admin, EventKind::Voting, event.id, "ipfs://results"),
        ErrorCode::NotYetEnded,
    );

    // Voting after the window closes is rejected
    ledger.advance(Duration::hours(VOTING_DURATION_HOURS));
    assert_error_code(
        ledger.send_cast_vote("late-voter", event.id, VoteChoice::Index(0)),
        ErrorCode::Expired,
    );

    assert_error_code(
        ledger.send_finalize(&admin, EventKind::Voting, event.id, "   "),
        ErrorCode::BlankResultsReference,
    );
    ledger
        .send_finalize(&admin, EventKind::Voting, event.id, "ipfs://results")
        .unwrap();
    let finalized = &ledger.voting_events[&event.id];
    assert_eq!(finalized.status, EventStatus::Completed);
    assert_eq!(finalized.results_reference.as_deref(), Some("ipfs://results"));

    // Finalize succeeds once
    assert_error_code(
        ledger.send_finalize(&admin, EventKind::Voting, event.id, "ipfs://other"),
        ErrorCode::AlreadyFinalized,
    );
    assert_eq!(
        fetch_entries_of_type(ledger, LedgerEntryType::VotingEventFinalized).len(),
        1
    );

    // One entry per successful state change: grants, create, 5 votes, late grant, finalize
    assert_eq!(fetch_entries_of_type(ledger, LedgerEntryType::VoteCast).len(), 5);
    assert_eq!(ledger.entries.len(), granted + 1 + 5 + 1 + 1);
}

#[test]
fn test_voting_window_not_started() {
    let mut context = setup_context(Utc::now(), 1, 0);
    let admin = context.admin.clone();
    let voter = context.voters[0].clone();
    let ledger = &mut context.ledger;

    let mut args = ballot("Next week", ledger.now);
    args.start_time = ledger.now + Duration::days(7);
    args.end_time = ledger.now + Duration::days(8);
    let event = ledger.send_create_voting_event(&admin, args).unwrap();

    assert_error_code(
        ledger.send_cast_vote(&voter, event.id, VoteChoice::Index(0)),
        ErrorCode::NotStarted,
    );

    ledger.advance(Duration::days(7));
    ledger
        .send_cast_vote(&voter, event.id, VoteChoice::Index(0))
        .unwrap();
}

#[test]
fn test_invalid_voting_event_args() {
    let mut context = setup_context(Utc::now(), 0, 0);
    let admin = context.admin.clone();
    let ledger = &mut context.ledger;

    let mut args = ballot("Backwards", ledger.now);
    args.end_time = args.start_time - Duration::hours(1);
    assert_error_code(
        ledger.send_create_voting_event(&admin, args),
        ErrorCode::InvalidTimeRange,
    );

    let mut args = ballot("One option", ledger.now);
    args.options = vec!["Yes".into()];
    assert_error_code(
        ledger.send_create_voting_event(&admin, args),
        ErrorCode::InsufficientOptions,
    );

    let mut args = ballot("Blank option", ledger.now);
    args.options = vec!["Yes".into(), "  ".into()];
    assert_error_code(
        ledger.send_create_voting_event(&admin, args),
        ErrorCode::BlankOption,
    );

    assert_error_code(
        ledger.send_create_voting_event(&admin, ballot("   ", ledger.now)),
        ErrorCode::BlankTitle,
    );
    assert!(ledger.entries.is_empty());
}

#[test]
fn test_petition_flow() {
    let mut context = setup_context(Utc::now(), 0, 100);
    let admin = context.admin.clone();
    let ledger = &mut context.ledger;
    let creator = context.petitioners[0].clone();

    let now = ledger.now;
    let petition = ledger
        .send_create_petition(
            &creator,
            CreatePetition {
                title: "More bike lanes".into(),
                description: String::new(),
                start_time: now,
                end_time: now + Duration::days(30),
                target_signatures: Some(100),
            },
        )
        .unwrap();
    assert_eq!(petition.target_signatures.get(), 100);
    assert_eq!(petition.current_signatures, 0);

    let mut readings = Vec::new();
    for signer in &context.petitioners {
        let signature = ledger
            .send_sign_petition(signer, petition.id, Some("  count me in  "))
            .unwrap();
        assert_eq!(signature.comment.as_deref(), Some("count me in"));
        readings.push(query::petition_progress(&ledger.petitions[&petition.id]));
    }
    assert!(readings.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(readings[49], 50.0);

    let current = &ledger.petitions[&petition.id];
    assert_eq!(current.current_signatures, 100);
    assert!(current.has_reached_target());
    assert_eq!(current.status, EventStatus::Active);

    assert_error_code(
        ledger.send_sign_petition(&creator, petition.id, None),
        ErrorCode::AlreadySigned,
    );

    // Past the target, signing stays open and progress saturates
    ledger
        .send_grant_role(&admin, "latecomer", Role::Petitioner)
        .unwrap();
    let signature = ledger
        .send_sign_petition("latecomer", petition.id, Some("   "))
        .unwrap();
    assert_eq!(signature.comment, None);
    assert_eq!(query::petition_progress(&ledger.petitions[&petition.id]), 100.0);

    // Creator may finalize their own petition once it has ended
    ledger.advance(Duration::days(30));
    ledger
        .send_finalize(&creator, EventKind::Petition, petition.id, "delivered to council")
        .unwrap();
    assert_eq!(
        ledger.petitions[&petition.id].status,
        EventStatus::Completed
    );
}

#[test]
fn test_petition_target_validation() {
    let mut context = setup_context(Utc::now(), 0, 1);
    let petitioner = context.petitioners[0].clone();
    let ledger = &mut context.ledger;
    let now = ledger.now;

    let args = |target| CreatePetition {
        title: "Target".into(),
        description: String::new(),
        start_time: now,
        end_time: now + Duration::days(1),
        target_signatures: target,
    };

    assert_error_code(
        ledger.send_create_petition(&petitioner, args(Some(0))),
        ErrorCode::InvalidTarget,
    );
    assert_error_code(
        ledger.send_create_petition(&petitioner, args(Some(-1))),
        ErrorCode::InvalidTarget,
    );
    let petition = ledger.send_create_petition(&petitioner, args(None)).unwrap();
    assert_eq!(
        petition.target_signatures.get(),
        civic_ledger::DEFAULT_TARGET_SIGNATURES
    );

    // Voters cannot sign
    ledger.send_grant_role("admin", "v", Role::Voter).unwrap();
    assert_error_code(
        ledger.send_sign_petition("v", petition.id, None),
        ErrorCode::Forbidden,
    );
}

#[test]
fn test_ledger_status_and_hashes() {
    let mut context = setup_context(Utc::now(), 3, 0);
    let admin = context.admin.clone();
    let ledger = &mut context.ledger;

    let empty = fetch_ledger_status(&crate::utils::send_utils::InMemoryLedger::new(Utc::now()));
    assert_eq!(empty.stats.current_block_height, BLOCK_NUMBER_BASELINE);
    assert_eq!(empty.stats.total_transactions, 0);

    for i in 0..4 {
        let event = ledger
            .send_create_voting_event(&admin, ballot(&format!("Ballot {i}"), ledger.now))
            .unwrap();
        for voter in &context.voters {
            ledger
                .send_cast_vote(voter, event.id, VoteChoice::Index(1))
                .unwrap();
        }
    }

    let hashes: HashSet<&str> = ledger
        .entries
        .iter()
        .map(|e| e.transaction_hash.as_str())
        .collect();
    assert_eq!(hashes.len(), ledger.entries.len());

    let status = fetch_ledger_status(ledger);
    let newest = ledger.entries.last().unwrap();
    assert_eq!(status.stats.total_transactions, ledger.entries.len() as u64);
    assert_eq!(status.stats.current_block_height, newest.block_number);
    assert_eq!(status.recent_transactions.len(), 10);
    assert_eq!(
        status.latest_transaction.unwrap().hash,
        newest.transaction_hash
    );
}
