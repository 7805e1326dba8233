use serde::{Deserialize, Serialize};

use surety_common::{AccountId, FlightKey, FlightStatus};

/// An oracle reported two different statuses for the same request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivocationEvidence {
    pub offender: AccountId,
    pub index: u8,
    pub flight_key: FlightKey,
    pub first: FlightStatus,
    pub second: FlightStatus,
}

impl EquivocationEvidence {
    pub fn offender(&self) -> &AccountId {
        &self.offender
    }
}
