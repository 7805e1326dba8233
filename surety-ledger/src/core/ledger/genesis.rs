use serde::{Deserialize, Serialize};

use surety_common::{AccountId, LedgerEvent, Result};
use tracing::info;

use crate::{
    core::ledger::{
        airline::{Airline, AirlineRegistry},
        balance::BalanceLedger,
        flight::FlightTable,
        policy::InsurancePolicy,
    },
    Ledger,
};

/// Initial state of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genesis {
    /// Account allowed to pause and resume the ledger.
    pub owner: AccountId,
    /// First airline, registered at genesis but not yet funded.
    pub first_airline: AccountId,
    #[serde(default)]
    pub policy: InsurancePolicy,
}

impl Genesis {
    pub fn new(owner: impl Into<AccountId>, first_airline: impl Into<AccountId>) -> Self {
        Self {
            owner: owner.into(),
            first_airline: first_airline.into(),
            policy: InsurancePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InsurancePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Ledger {
    pub fn from_genesis(genesis: Genesis) -> Result<Self> {
        genesis.policy.validate()?;

        let mut airlines = AirlineRegistry::default();
        airlines.insert_registered(Airline::genesis(genesis.first_airline.clone()));

        let mut ledger = Self {
            owner: genesis.owner.clone(),
            operational: true,
            policy: genesis.policy,
            airlines,
            flights: FlightTable::default(),
            stakes: Default::default(),
            balances: BalanceLedger::default(),
            capital: 0,
            total_withdrawn: 0,
            outbox: Vec::new(),
        };

        info!("🏛️ Genesis: owner={} first airline={}", genesis.owner, genesis.first_airline);
        ledger.emit(LedgerEvent::AirlineRegistered {
            origin: genesis.owner,
            airline: genesis.first_airline,
        });

        Ok(ledger)
    }
}
