//! Shared fixtures for the integration suites: one in-memory house with
//! helpers for the setup steps every scenario repeats.

#![allow(dead_code)]

use chrono::Duration;

use chore_wheel::adapters::memory;
use chore_wheel::application::handlers::chores::{
    AddChoreCommand, ClaimChoreCommand, UpdateChoreValuesCommand,
};
use chore_wheel::application::handlers::hearts::InitialiseResidentCommand;
use chore_wheel::application::handlers::houses::{
    ResidentChange, UpdateResidentCommand, UpsertHouseCommand,
};
use chore_wheel::application::handlers::polls::SubmitVoteCommand;
use chore_wheel::application::GovernanceState;
use chore_wheel::config::GovernanceConfig;
use chore_wheel::domain::chores::{Chore, ChoreClaim, ChoreValue};
use chore_wheel::domain::foundation::{HouseId, Metadata, PollId, ResidentId, Timestamp};
use chore_wheel::domain::polls::VoteChoice;

pub fn at(month: u32, day: u32) -> Timestamp {
    Timestamp::from_ymd(2024, month, day).unwrap()
}

pub fn at_hour(month: u32, day: u32, hour: i64) -> Timestamp {
    at(month, day).add_hours(hour)
}

pub fn resident(raw: &str) -> ResidentId {
    ResidentId::new(raw).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub struct TestHouse {
    pub state: GovernanceState,
    pub house_id: HouseId,
}

impl TestHouse {
    pub async fn new() -> Self {
        Self::with_config(GovernanceConfig::default()).await
    }

    pub async fn with_config(config: GovernanceConfig) -> Self {
        let state = memory::governance_state(config);
        let house_id = HouseId::new("T1").unwrap();
        state
            .upsert_house_handler()
            .handle(UpsertHouseCommand {
                house_id: house_id.clone(),
                name: Some("Sage House".to_string()),
                metadata: Metadata::new(),
                now: at(1, 1),
            })
            .await
            .unwrap();
        Self { state, house_id }
    }

    /// Activates each resident at `now` and grants their starting hearts.
    pub async fn residents(&self, raws: &[&str], now: Timestamp) -> Vec<ResidentId> {
        let mut ids = Vec::new();
        for raw in raws {
            let id = resident(raw);
            self.state
                .update_resident_handler()
                .handle(UpdateResidentCommand {
                    house_id: self.house_id.clone(),
                    resident_id: id.clone(),
                    change: ResidentChange::Activate,
                    now,
                })
                .await
                .unwrap();
            self.state
                .initialise_resident_handler()
                .handle(InitialiseResidentCommand {
                    house_id: self.house_id.clone(),
                    resident_id: id.clone(),
                    now,
                })
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }

    pub async fn chore(&self, name: &str) -> Chore {
        self.state
            .add_chore_handler()
            .handle(AddChoreCommand {
                house_id: self.house_id.clone(),
                name: name.to_string(),
                metadata: Metadata::new(),
                now: at(1, 1),
            })
            .await
            .unwrap()
    }

    pub async fn update_values(&self, now: Timestamp) -> Vec<ChoreValue> {
        self.state
            .update_chore_values_handler()
            .handle(UpdateChoreValuesCommand {
                house_id: self.house_id.clone(),
                now,
            })
            .await
            .unwrap()
    }

    pub async fn claim(&self, chore: &Chore, by: &ResidentId, now: Timestamp) -> ChoreClaim {
        self.state
            .claim_chore_handler()
            .handle(ClaimChoreCommand {
                house_id: self.house_id.clone(),
                chore_id: chore.id,
                resident_id: by.clone(),
                now,
            })
            .await
            .unwrap()
    }

    pub async fn vote(&self, poll_id: PollId, voters: &[&ResidentId], choice: VoteChoice, now: Timestamp) {
        for voter in voters {
            self.state
                .submit_vote_handler()
                .handle(SubmitVoteCommand {
                    poll_id,
                    resident_id: (*voter).clone(),
                    choice,
                    now,
                })
                .await
                .unwrap();
        }
    }

    pub async fn hearts(&self, id: &ResidentId) -> Option<f64> {
        use chore_wheel::application::handlers::hearts::GetResidentHeartsQuery;

        self.state
            .get_resident_hearts_handler()
            .handle(GetResidentHeartsQuery {
                house_id: self.house_id.clone(),
                resident_id: id.clone(),
            })
            .await
            .unwrap()
    }
}

/// One hour past `t`, after a poll opened at `t` with `hours` duration closes.
pub fn after_poll(t: Timestamp, hours: i64) -> Timestamp {
    t.plus(Duration::hours(hours + 1))
}
