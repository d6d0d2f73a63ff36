//! Integration tests for the poll engine.
//!
//! Covers the full lifecycle through the application handlers:
//! 1. A poll is opened with a duration and quorum
//! 2. Residents vote, change their minds, and withdraw
//! 3. Voting stops at the closing instant
//! 4. The closed poll is decided by quorum and strict majority

mod common;

use chrono::Duration;
use serde_json::json;

use chore_wheel::application::handlers::polls::{
    CreatePollCommand, GetPollResultsQuery, IsPollValidQuery, SubmitVoteCommand,
    UpdatePollMetadataCommand,
};
use chore_wheel::domain::foundation::{Metadata, PollId};
use chore_wheel::domain::polls::{Poll, PollError, PollResults, VoteChoice};

use common::{at, resident, TestHouse};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn open_poll(house: &TestHouse, min_votes: u32) -> Poll {
    house
        .state
        .create_poll_handler()
        .handle(CreatePollCommand {
            now: at(4, 1),
            duration: Duration::hours(24),
            min_votes,
            metadata: Metadata::new(),
        })
        .await
        .unwrap()
}

async fn results(house: &TestHouse, poll_id: PollId) -> PollResults {
    house
        .state
        .get_poll_results_handler()
        .handle(GetPollResultsQuery { poll_id })
        .await
        .unwrap()
}

async fn is_valid(house: &TestHouse, poll_id: PollId) -> Result<bool, PollError> {
    house
        .state
        .is_poll_valid_handler()
        .handle(IsPollValidQuery {
            poll_id,
            now: at(4, 2),
        })
        .await
}

// =============================================================================
// Voting
// =============================================================================

#[tokio::test]
async fn latest_vote_per_resident_counts() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 1).await;
    let (u1, u2, u3) = (resident("U1"), resident("U2"), resident("U3"));

    house.vote(poll.id, &[&u1, &u2], VoteChoice::Yay, at(4, 1)).await;
    house.vote(poll.id, &[&u3], VoteChoice::Nay, at(4, 1)).await;
    house.vote(poll.id, &[&u2], VoteChoice::Nay, at(4, 1).add_hours(2)).await;

    assert_eq!(results(&house, poll.id).await, PollResults { yays: 1, nays: 2 });
}

#[tokio::test]
async fn withdrawn_vote_counts_for_neither_side() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 1).await;
    let u1 = resident("U1");

    house.vote(poll.id, &[&u1], VoteChoice::Yay, at(4, 1)).await;
    house.vote(poll.id, &[&u1], VoteChoice::Cancel, at(4, 1).add_hours(1)).await;

    assert_eq!(results(&house, poll.id).await, PollResults { yays: 0, nays: 0 });
}

#[tokio::test]
async fn votes_at_the_closing_instant_are_rejected() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 1).await;

    let err = house
        .state
        .submit_vote_handler()
        .handle(SubmitVoteCommand {
            poll_id: poll.id,
            resident_id: resident("U1"),
            choice: VoteChoice::Yay,
            now: poll.closes_at,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::Closed { .. }));
    assert_eq!(results(&house, poll.id).await, PollResults::default());
}

#[tokio::test]
async fn voting_on_unknown_poll_fails() {
    let house = TestHouse::new().await;

    let err = house
        .state
        .submit_vote_handler()
        .handle(SubmitVoteCommand {
            poll_id: PollId::new(),
            resident_id: resident("U1"),
            choice: VoteChoice::Yay,
            now: at(4, 1),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::NotFound(_)));
}

// =============================================================================
// Decisions
// =============================================================================

#[tokio::test]
async fn open_poll_cannot_be_decided() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 1).await;

    let err = house
        .state
        .is_poll_valid_handler()
        .handle(IsPollValidQuery {
            poll_id: poll.id,
            now: at(4, 1).add_hours(23),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::NotClosed { .. }));
}

#[tokio::test]
async fn quorum_of_yays_with_no_nays_passes() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 2).await;
    house
        .vote(poll.id, &[&resident("U1"), &resident("U2")], VoteChoice::Yay, at(4, 1))
        .await;

    assert!(is_valid(&house, poll.id).await.unwrap());
}

#[tokio::test]
async fn missing_quorum_fails() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 3).await;
    house
        .vote(poll.id, &[&resident("U1"), &resident("U2")], VoteChoice::Yay, at(4, 1))
        .await;

    assert!(!is_valid(&house, poll.id).await.unwrap());
}

#[tokio::test]
async fn tie_fails_even_with_quorum() {
    let house = TestHouse::new().await;
    let poll = open_poll(&house, 1).await;
    house.vote(poll.id, &[&resident("U1")], VoteChoice::Yay, at(4, 1)).await;
    house.vote(poll.id, &[&resident("U2")], VoteChoice::Nay, at(4, 1)).await;

    assert!(!is_valid(&house, poll.id).await.unwrap());
}

// =============================================================================
// Metadata
// =============================================================================

#[tokio::test]
async fn metadata_patch_is_merged() {
    let house = TestHouse::new().await;
    let poll = house
        .state
        .create_poll_handler()
        .handle(CreatePollCommand {
            now: at(4, 1),
            duration: Duration::hours(24),
            min_votes: 1,
            metadata: json!({"channel": "C1", "ts": "1"}).as_object().cloned().unwrap(),
        })
        .await
        .unwrap();

    let updated = house
        .state
        .update_poll_metadata_handler()
        .handle(UpdatePollMetadataCommand {
            poll_id: poll.id,
            patch: json!({"ts": "2"}).as_object().cloned().unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(
        serde_json::Value::Object(updated.metadata),
        json!({"channel": "C1", "ts": "2"})
    );
}
