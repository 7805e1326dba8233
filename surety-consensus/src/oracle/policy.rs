use serde::{Deserialize, Serialize};

use surety_common::{Amount, Result, SuretyError};

/// Largest index space addressable by a `u8` request index.
pub const MAX_INDEX_SPACE: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePolicy {
    #[serde(default = "default_registration_fee")]
    pub registration_fee: Amount,
    #[serde(default = "default_index_space")]
    pub index_space: u16,
    #[serde(default = "default_indexes_per_oracle")]
    pub indexes_per_oracle: usize,
    /// Expected number of oracles answering one request.
    #[serde(default = "default_cohort_size")]
    pub cohort_size: usize,
    /// Matching responses needed to resolve a flight.
    #[serde(default = "default_min_responses")]
    pub min_responses: usize,
}

fn default_registration_fee() -> Amount {
    1
}

fn default_index_space() -> u16 {
    10
}

fn default_indexes_per_oracle() -> usize {
    3
}

fn default_cohort_size() -> usize {
    5
}

fn default_min_responses() -> usize {
    3
}

impl Default for OraclePolicy {
    fn default() -> Self {
        Self {
            registration_fee: default_registration_fee(),
            index_space: default_index_space(),
            indexes_per_oracle: default_indexes_per_oracle(),
            cohort_size: default_cohort_size(),
            min_responses: default_min_responses(),
        }
    }
}

impl OraclePolicy {
    pub fn validate(&self) -> Result<()> {
        if self.index_space == 0 || self.index_space > MAX_INDEX_SPACE {
            return Err(SuretyError::InvalidRequest(format!(
                "index space must be within 1..={}, got {}",
                MAX_INDEX_SPACE, self.index_space
            )));
        }
        if self.indexes_per_oracle == 0 || self.indexes_per_oracle > usize::from(self.index_space) {
            return Err(SuretyError::InvalidRequest(format!(
                "indexes per oracle must be within 1..={}, got {}",
                self.index_space, self.indexes_per_oracle
            )));
        }
        if self.min_responses == 0 {
            return Err(SuretyError::InvalidRequest("min_responses must be positive".into()));
        }
        if self.min_responses > self.cohort_size {
            return Err(SuretyError::InvalidRequest(format!(
                "min_responses {} exceeds cohort size {}",
                self.min_responses, self.cohort_size
            )));
        }
        Ok(())
    }

    pub fn contains_index(&self, index: u8) -> bool {
        u16::from(index) < self.index_space
    }

    /// Maps a digest byte into the index space.
    pub fn index_from_byte(&self, byte: u8) -> u8 {
        // index_space <= 256, so the remainder fits in a u8.
        (u16::from(byte) % self.index_space.max(1)) as u8
    }
}
