use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChoreGiftId, HouseId, ResidentId, Timestamp, ValidationError};

/// Points handed from one resident to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreGift {
    pub id: ChoreGiftId,
    pub house_id: HouseId,
    pub giver: ResidentId,
    pub recipient: ResidentId,
    pub value: f64,
    pub gifted_at: Timestamp,
}

impl ChoreGift {
    /// # Errors
    ///
    /// Rejects non-positive amounts and gifts to oneself.
    pub fn new(
        house_id: HouseId,
        giver: ResidentId,
        recipient: ResidentId,
        value: f64,
        gifted_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if value.is_nan() || value <= 0.0 {
            return Err(ValidationError::out_of_range("value", 0.0, f64::MAX, value));
        }
        if giver == recipient {
            return Err(ValidationError::invalid_format(
                "recipient",
                "cannot gift points to yourself",
            ));
        }
        Ok(Self {
            id: ChoreGiftId::new(),
            house_id,
            giver,
            recipient,
            value,
            gifted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gift(giver: &str, recipient: &str, value: f64) -> Result<ChoreGift, ValidationError> {
        ChoreGift::new(
            HouseId::new("T1").unwrap(),
            ResidentId::new(giver).unwrap(),
            ResidentId::new(recipient).unwrap(),
            value,
            Timestamp::now(),
        )
    }

    #[test]
    fn accepts_positive_gift() {
        assert!(gift("U1", "U2", 5.0).is_ok());
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert!(gift("U1", "U2", 0.0).is_err());
        assert!(gift("U1", "U2", -3.0).is_err());
        assert!(gift("U1", "U2", f64::NAN).is_err());
    }

    #[test]
    fn rejects_self_gift() {
        assert!(gift("U1", "U1", 5.0).is_err());
    }
}
