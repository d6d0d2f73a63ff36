//! Reads shared by several chore handlers.

use std::collections::{HashMap, HashSet};

use crate::domain::chores::{ChorePreference, ChoreRanker, ChoreRanking};
use crate::domain::foundation::{
    ChoreClaimId, ChoreId, DomainError, HouseId, ResidentId, Timestamp,
};
use crate::ports::{ChoreLedger, ChoreRepository, ResidentRepository};

/// Preferences that count at `now`: stated by eligible residents between
/// active chores. Also returns the eligible resident count.
pub(crate) async fn active_preferences(
    chores: &dyn ChoreRepository,
    residents: &dyn ResidentRepository,
    house_id: &HouseId,
    now: Timestamp,
) -> Result<(Vec<ChorePreference>, usize), DomainError> {
    let eligible: HashSet<ResidentId> = residents
        .list_by_house(house_id)
        .await?
        .into_iter()
        .filter(|r| r.is_eligible_at(now))
        .map(|r| r.id)
        .collect();
    let active: HashSet<ChoreId> = chores
        .list_active(house_id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let preferences = chores
        .list_preferences(house_id)
        .await?
        .into_iter()
        .filter(|p| eligible.contains(&p.resident_id))
        .filter(|p| active.contains(&p.alpha_chore_id) && active.contains(&p.beta_chore_id))
        .collect();
    Ok((preferences, eligible.len()))
}

/// Every active chore's share of the budget, highest first.
pub(crate) async fn chore_rankings(
    chores: &dyn ChoreRepository,
    residents: &dyn ResidentRepository,
    ranker: &ChoreRanker,
    house_id: &HouseId,
    now: Timestamp,
) -> Result<Vec<ChoreRanking>, DomainError> {
    let active = chores.list_active(house_id).await?;
    let (preferences, resident_count) =
        active_preferences(chores, residents, house_id, now).await?;

    let ids: Vec<ChoreId> = active.iter().map(|c| c.id).collect();
    let names: HashMap<ChoreId, String> = active.into_iter().map(|c| (c.id, c.name)).collect();

    let mut rankings: Vec<ChoreRanking> = ranker
        .rank_chores(&ids, &preferences, resident_count)
        .into_iter()
        .map(|(chore_id, ranking)| ChoreRanking {
            chore_id,
            name: names.get(&chore_id).cloned().unwrap_or_default(),
            ranking,
        })
        .collect();
    rankings.sort_by(|a, b| {
        b.ranking
            .total_cmp(&a.ranking)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(rankings)
}

/// Value accrued on the chore since its latest standing claim made at or
/// before `at`.
///
/// Denied claims are not a baseline, so their value rolls into the next
/// claim.
pub(crate) async fn unclaimed_value(
    ledger: &dyn ChoreLedger,
    chore_id: &ChoreId,
    at: Timestamp,
    excluding: Option<&ChoreClaimId>,
) -> Result<f64, DomainError> {
    let baseline = ledger
        .latest_standing_claim(chore_id, at, excluding)
        .await?
        .map(|claim| claim.claimed_at);
    ledger.sum_values(chore_id, baseline, at).await
}

/// Standing claims plus net gifts in `[start, end]`, or `None` if the
/// resident has neither.
pub(crate) async fn resident_points(
    ledger: &dyn ChoreLedger,
    house_id: &HouseId,
    resident_id: &ResidentId,
    start: Timestamp,
    end: Timestamp,
) -> Result<Option<f64>, DomainError> {
    let claimed = ledger
        .sum_claimed_points(house_id, resident_id, None, start, end)
        .await?;
    let gifted = ledger
        .sum_gifted_points(house_id, resident_id, start, end)
        .await?;
    Ok(match (claimed, gifted) {
        (None, None) => None,
        (claimed, gifted) => Some(claimed.unwrap_or(0.0) + gifted.unwrap_or(0.0)),
    })
}
