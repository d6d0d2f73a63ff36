use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChoreId, HouseId, ResidentId, Timestamp, ValidationError};

/// A resident's relative preference between two chores.
///
/// Stored with `alpha_chore_id < beta_chore_id` so each unordered pair has a
/// single row per resident. `preference` is the weight of alpha over beta:
/// 1.0 strongly prefers alpha, 0.0 strongly prefers beta, 0.5 is indifferent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChorePreference {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub alpha_chore_id: ChoreId,
    pub beta_chore_id: ChoreId,
    pub preference: f64,
    pub updated_at: Timestamp,
}

impl ChorePreference {
    /// Builds a normalized preference of `target` over `source`.
    ///
    /// # Errors
    ///
    /// Rejects a chore compared with itself and values outside `[0, 1]`.
    pub fn new(
        house_id: HouseId,
        resident_id: ResidentId,
        target: ChoreId,
        source: ChoreId,
        preference: f64,
        updated_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if target == source {
            return Err(ValidationError::invalid_format(
                "chore_id",
                "a chore cannot be compared with itself",
            ));
        }
        if !(0.0..=1.0).contains(&preference) {
            return Err(ValidationError::out_of_range("preference", 0.0, 1.0, preference));
        }

        let (alpha, beta, preference) = if target < source {
            (target, source, preference)
        } else {
            (source, target, 1.0 - preference)
        };

        Ok(Self {
            house_id,
            resident_id,
            alpha_chore_id: alpha,
            beta_chore_id: beta,
            preference,
            updated_at,
        })
    }

    /// Weight of `chore` over the other chore of the pair, if it belongs to it.
    pub fn weight_of(&self, chore: ChoreId) -> Option<f64> {
        if chore == self.alpha_chore_id {
            Some(self.preference)
        } else if chore == self.beta_chore_id {
            Some(1.0 - self.preference)
        } else {
            None
        }
    }
}
