use serde::{Deserialize, Serialize};
use tracing::debug;

use surety_common::{Result, SuretyError};

/// Fractional quorum with a floor: `max(ceil(n * numerator / denominator), min_voters)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    #[serde(default = "default_numerator")]
    pub numerator: usize,
    #[serde(default = "default_denominator")]
    pub denominator: usize,
    #[serde(default = "default_min_voters")]
    pub min_voters: usize,
}

fn default_numerator() -> usize {
    1
}

fn default_denominator() -> usize {
    2
}

fn default_min_voters() -> usize {
    1
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self {
            numerator: default_numerator(),
            denominator: default_denominator(),
            min_voters: default_min_voters(),
        }
    }
}

impl QuorumPolicy {
    /// A quorum that ignores the population size.
    pub fn fixed(min_voters: usize) -> Self {
        Self {
            numerator: 0,
            denominator: 1,
            min_voters,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.denominator == 0 {
            return Err(SuretyError::InvalidRequest("quorum denominator must be positive".into()));
        }
        if self.numerator > self.denominator {
            return Err(SuretyError::InvalidRequest(format!(
                "quorum fraction {}/{} exceeds one",
                self.numerator, self.denominator
            )));
        }
        Ok(())
    }
}

/// Componente que decide se uma contagem de votos atinge a [`QuorumPolicy`].
#[derive(Debug, Clone)]
pub struct ConsensusEvaluator {
    pub policy: QuorumPolicy,
}

impl ConsensusEvaluator {
    pub fn new(policy: QuorumPolicy) -> Self {
        Self { policy }
    }

    /// Votos necessários numa população de `population` votantes.
    pub fn threshold(&self, population: usize) -> usize {
        let denominator = self.policy.denominator.max(1);
        let fractional = (population * self.policy.numerator).div_ceil(denominator);
        fractional.max(self.policy.min_voters)
    }

    pub fn is_reached(&self, votes: usize, population: usize) -> bool {
        let required = self.threshold(population);
        debug!("🗳️ Verificação de quorum: {}/{} (população {})", votes, required, population);
        votes >= required
    }
}
