use serde::{Deserialize, Serialize};

use surety_common::{Amount, Result, SuretyError};

/// Monetary rules of the insurer network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    /// Minimum single funding deposit that activates an airline.
    #[serde(default = "default_minimum_fund")]
    pub minimum_fund: Amount,
    /// Payout multiplier as a ratio, `amount_paid * numerator / denominator`.
    #[serde(default = "default_payout_numerator")]
    pub payout_numerator: Amount,
    #[serde(default = "default_payout_denominator")]
    pub payout_denominator: Amount,
    /// Credit each premium to the flight airline's withdrawable balance
    /// instead of retaining it as capital.
    #[serde(default = "default_premium_to_airline")]
    pub premium_to_airline: bool,
}

fn default_minimum_fund() -> Amount {
    10
}

fn default_payout_numerator() -> Amount {
    3
}

fn default_payout_denominator() -> Amount {
    2
}

fn default_premium_to_airline() -> bool {
    true
}

impl Default for InsurancePolicy {
    fn default() -> Self {
        Self {
            minimum_fund: default_minimum_fund(),
            payout_numerator: default_payout_numerator(),
            payout_denominator: default_payout_denominator(),
            premium_to_airline: default_premium_to_airline(),
        }
    }
}

impl InsurancePolicy {
    pub fn validate(&self) -> Result<()> {
        if self.payout_denominator == 0 {
            return Err(SuretyError::InvalidRequest("payout denominator must be non-zero".into()));
        }
        if self.payout_numerator == 0 {
            return Err(SuretyError::InvalidRequest("payout numerator must be non-zero".into()));
        }
        Ok(())
    }

    /// Amount credited for a stake of `amount_paid`, rounded down.
    pub fn payout_for(&self, amount_paid: Amount) -> Result<Amount> {
        let scaled = amount_paid.checked_mul(self.payout_numerator).ok_or_else(|| {
            SuretyError::AmountOverflow(format!("payout for stake of {}", amount_paid))
        })?;
        Ok(scaled / self.payout_denominator)
    }
}
