//! UpdateResidentHandler - activation and exemption changes.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, HouseId, ResidentId, Timestamp};
use crate::domain::houses::Resident;
use crate::ports::ResidentRepository;

/// What happens to the resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidentChange {
    /// Joins at `now`; a resident who already joined keeps their join time.
    Activate,
    Deactivate,
    /// Stops owing chores from `now`.
    Exempt,
    Unexempt,
}

#[derive(Debug, Clone)]
pub struct UpdateResidentCommand {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub change: ResidentChange,
    pub now: Timestamp,
}

pub struct UpdateResidentHandler {
    residents: Arc<dyn ResidentRepository>,
}

impl UpdateResidentHandler {
    pub fn new(residents: Arc<dyn ResidentRepository>) -> Self {
        Self { residents }
    }

    /// Applies the change, creating the resident record on first sight.
    pub async fn handle(&self, cmd: UpdateResidentCommand) -> Result<Resident, DomainError> {
        let mut resident = self
            .residents
            .find(&cmd.house_id, &cmd.resident_id)
            .await?
            .unwrap_or_else(|| Resident {
                house_id: cmd.house_id.clone(),
                id: cmd.resident_id.clone(),
                active_at: None,
                exempt_at: None,
            });

        match cmd.change {
            ResidentChange::Activate => resident.activate(cmd.now),
            ResidentChange::Deactivate => resident.deactivate(),
            ResidentChange::Exempt => resident.exempt(cmd.now),
            ResidentChange::Unexempt => resident.unexempt(),
        }

        self.residents.upsert(&resident).await?;
        info!(
            house_id = %cmd.house_id,
            resident_id = %cmd.resident_id,
            change = ?cmd.change,
            "Resident updated"
        );
        Ok(resident)
    }
}
