use std::fmt;

use serde::{Deserialize, Serialize};

use surety_common::{AccountId, FlightKey, FlightStatus};

use crate::consensus::registry::ResponseTally;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub index: u8,
    pub flight_key: FlightKey,
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.flight_key, self.index)
    }
}

/// A status request. Open until a quorum of matching responses arrives, then
/// archived with the status it closed on.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub key: RequestKey,
    pub requester: AccountId,
    pub flight_code: String,
    pub destination: String,
    pub timestamp: u64,
    pub open: bool,
    pub resolved: Option<FlightStatus>,
    pub responses: ResponseTally,
}

impl OracleRequest {
    pub(crate) fn open(
        key: RequestKey,
        requester: AccountId,
        flight_code: &str,
        destination: &str,
        timestamp: u64,
    ) -> Self {
        Self {
            key,
            requester,
            flight_code: flight_code.to_string(),
            destination: destination.to_string(),
            timestamp,
            open: true,
            resolved: None,
            responses: ResponseTally::new(),
        }
    }

    pub(crate) fn close(&mut self, status: FlightStatus) {
        self.open = false;
        self.resolved = Some(status);
    }
}
