use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::hash::FieldHasher;

/// Deterministic identifier of a flight: SHA-256 over
/// (flight code, destination, scheduled timestamp), hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightKey(String);

impl FlightKey {
    pub fn derive(flight_code: &str, destination: &str, timestamp: u64) -> Self {
        let hex = FieldHasher::new()
            .str(flight_code)
            .str(destination)
            .u64(timestamp)
            .finish_hex();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
