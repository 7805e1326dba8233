//! Airline admission. Below `unilateral_limit` registered airlines any usable
//! airline admits a candidate on its own; from then on admission takes votes
//! from a quorum of the registered airlines.

use serde::{Deserialize, Serialize};
use tracing::info;

use surety_common::{AccountId, Result, SuretyError};
use surety_ledger::Ledger;

use crate::consensus::evaluator::{ConsensusEvaluator, QuorumPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    #[serde(default = "default_unilateral_limit")]
    pub unilateral_limit: usize,
    #[serde(default)]
    pub quorum: QuorumPolicy,
}

fn default_unilateral_limit() -> usize {
    4
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            unilateral_limit: default_unilateral_limit(),
            quorum: QuorumPolicy::default(),
        }
    }
}

impl AdmissionPolicy {
    pub fn validate(&self) -> Result<()> {
        self.quorum.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    /// The candidate is now registered. `votes` is zero for unilateral admission.
    Admitted { votes: usize },
    PendingVote { votes: usize, required: usize },
}

#[derive(Debug, Clone)]
pub struct AdmissionEngine {
    policy: AdmissionPolicy,
    evaluator: ConsensusEvaluator,
}

impl AdmissionEngine {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            evaluator: ConsensusEvaluator::new(policy.quorum),
        }
    }

    /// Votes a candidate needs with the current registered population.
    pub fn required_votes(&self, ledger: &Ledger) -> usize {
        let registered = ledger.registered_airline_count();
        if registered < self.policy.unilateral_limit {
            0
        } else {
            self.evaluator.threshold(registered)
        }
    }

    pub fn register_airline(
        &self,
        ledger: &mut Ledger,
        candidate: &AccountId,
        caller: &AccountId,
    ) -> Result<AdmissionOutcome> {
        ledger.require_operational()?;
        if !ledger.is_airline_usable(caller) {
            return Err(SuretyError::NotAuthorized(format!(
                "{} is not a registered and funded airline",
                caller
            )));
        }
        if ledger.is_airline_registered(candidate) {
            return Err(SuretyError::AlreadyRegistered(candidate.to_string()));
        }

        let registered = ledger.registered_airline_count();
        if registered < self.policy.unilateral_limit {
            ledger.admit_airline(candidate, caller)?;
            info!("✈️ {} admitted {} unilaterally ({} registered)", caller, candidate, registered + 1);
            return Ok(AdmissionOutcome::Admitted { votes: 0 });
        }

        let votes = ledger.record_admission_vote(candidate, caller)?;
        let required = self.evaluator.threshold(registered);
        if votes >= required {
            ledger.admit_airline(candidate, caller)?;
            info!("✈️ {} admitted by vote ({}/{})", candidate, votes, required);
            Ok(AdmissionOutcome::Admitted { votes })
        } else {
            info!("🗳️ {} votou em {} ({}/{})", caller, candidate, votes, required);
            Ok(AdmissionOutcome::PendingVote { votes, required })
        }
    }
}
