//! Chore points and gifts between residents.

use std::sync::Arc;

use tracing::info;

use super::accounting::resident_points;
use crate::domain::chores::{ChoreError, ChoreGift};
use crate::domain::foundation::{ChoreId, HouseId, ResidentId, Timestamp};
use crate::ports::ChoreLedger;

/// Points earned in `[start, end]`.
///
/// With a `chore_id` only claims on that chore count; without one, net
/// gifts are included too.
#[derive(Debug, Clone)]
pub struct GetChorePointsQuery {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub chore_id: Option<ChoreId>,
    pub start: Timestamp,
    pub end: Timestamp,
}

pub struct GetChorePointsHandler {
    ledger: Arc<dyn ChoreLedger>,
}

impl GetChorePointsHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { ledger }
    }

    /// `None` means no activity, as opposed to activity netting to zero.
    pub async fn handle(&self, query: GetChorePointsQuery) -> Result<Option<f64>, ChoreError> {
        let points = match query.chore_id {
            Some(chore_id) => {
                self.ledger
                    .sum_claimed_points(
                        &query.house_id,
                        &query.resident_id,
                        Some(&chore_id),
                        query.start,
                        query.end,
                    )
                    .await?
            }
            None => {
                resident_points(
                    self.ledger.as_ref(),
                    &query.house_id,
                    &query.resident_id,
                    query.start,
                    query.end,
                )
                .await?
            }
        };
        Ok(points)
    }
}

#[derive(Debug, Clone)]
pub struct GiftChorePointsCommand {
    pub house_id: HouseId,
    pub giver: ResidentId,
    pub recipient: ResidentId,
    pub value: f64,
    pub now: Timestamp,
}

pub struct GiftChorePointsHandler {
    ledger: Arc<dyn ChoreLedger>,
}

impl GiftChorePointsHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { ledger }
    }

    /// Moves points from the giver's balance for the current month.
    ///
    /// Claims denied after the gift can leave the giver negative; that is
    /// accepted.
    ///
    /// # Errors
    ///
    /// - `Validation` for a non-positive amount or a self-gift
    /// - `InsufficientBalance` if the giver's month-to-date points are short
    pub async fn handle(&self, cmd: GiftChorePointsCommand) -> Result<ChoreGift, ChoreError> {
        let gift = ChoreGift::new(cmd.house_id, cmd.giver, cmd.recipient, cmd.value, cmd.now)?;

        let balance = resident_points(
            self.ledger.as_ref(),
            &gift.house_id,
            &gift.giver,
            cmd.now.month_start(),
            cmd.now,
        )
        .await?
        .unwrap_or(0.0);
        if gift.value > balance {
            return Err(ChoreError::InsufficientBalance {
                balance,
                requested: gift.value,
            });
        }

        self.ledger.save_gift(&gift).await?;
        info!(
            giver = %gift.giver,
            recipient = %gift.recipient,
            value = gift.value,
            "Chore points gifted"
        );
        Ok(gift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChoreLedger;
    use crate::domain::chores::ChoreClaim;
    use crate::domain::foundation::PollId;

    fn house() -> HouseId {
        HouseId::new("T1").unwrap()
    }

    fn id(raw: &str) -> ResidentId {
        ResidentId::new(raw).unwrap()
    }

    fn april(day: u32) -> Timestamp {
        Timestamp::from_ymd(2024, 4, day).unwrap()
    }

    async fn ledger_with_claim(resident: &str, chore_id: ChoreId, at: Timestamp, value: f64) -> Arc<InMemoryChoreLedger> {
        let ledger = Arc::new(InMemoryChoreLedger::new());
        let claim = ChoreClaim::new(house(), chore_id, id(resident), at, value, PollId::new());
        ledger.save_claim(&claim).await.unwrap();
        ledger
    }

    fn gift(giver: &str, recipient: &str, value: f64, now: Timestamp) -> GiftChorePointsCommand {
        GiftChorePointsCommand {
            house_id: house(),
            giver: id(giver),
            recipient: id(recipient),
            value,
            now,
        }
    }

    fn points(resident: &str, chore_id: Option<ChoreId>) -> GetChorePointsQuery {
        GetChorePointsQuery {
            house_id: house(),
            resident_id: id(resident),
            chore_id,
            start: april(1),
            end: april(30),
        }
    }

    #[tokio::test]
    async fn gift_moves_points_between_residents() {
        let chore_id = ChoreId::new();
        let ledger = ledger_with_claim("U1", chore_id, april(2), 20.0).await;
        GiftChorePointsHandler::new(ledger.clone())
            .handle(gift("U1", "U2", 8.0, april(3)))
            .await
            .unwrap();

        let query = GetChorePointsHandler::new(ledger);
        assert_eq!(query.handle(points("U1", None)).await.unwrap(), Some(12.0));
        assert_eq!(query.handle(points("U2", None)).await.unwrap(), Some(8.0));
        assert_eq!(query.handle(points("U1", Some(chore_id))).await.unwrap(), Some(20.0));
        assert_eq!(query.handle(points("U2", Some(chore_id))).await.unwrap(), None);
    }

    #[tokio::test]
    async fn gift_beyond_balance_is_rejected() {
        let ledger = ledger_with_claim("U1", ChoreId::new(), april(2), 5.0).await;

        let err = GiftChorePointsHandler::new(ledger)
            .handle(gift("U1", "U2", 8.0, april(3)))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ChoreError::InsufficientBalance {
                balance: 5.0,
                requested: 8.0
            }
        );
    }

    #[tokio::test]
    async fn last_months_points_cannot_be_gifted() {
        let march = Timestamp::from_ymd(2024, 3, 20).unwrap();
        let ledger = ledger_with_claim("U1", ChoreId::new(), march, 50.0).await;

        let err = GiftChorePointsHandler::new(ledger)
            .handle(gift("U1", "U2", 1.0, april(3)))
            .await
            .unwrap_err();

        assert!(matches!(err, ChoreError::InsufficientBalance { .. }));
    }

    #[tokio::test]
    async fn no_activity_is_none_not_zero() {
        let ledger = Arc::new(InMemoryChoreLedger::new());
        let result = GetChorePointsHandler::new(ledger).handle(points("U1", None)).await.unwrap();
        assert_eq!(result, None);
    }
}
