//! In-memory ledger store for flight surety: airline records, the flight
//! table, insurance stakes and withdrawable balances.
//!
//! The ledger is an explicit value owned by its caller. Every mutating method
//! checks all of its preconditions and computes all of its arithmetic before
//! the first write, so a returned error means nothing changed.

pub mod core;

use std::collections::HashMap;

use surety_common::{AccountId, Amount, FlightKey, LedgerEvent};

use crate::core::ledger::{airline::AirlineRegistry, balance::BalanceLedger, flight::FlightTable};

pub use crate::core::ledger::{
    airline::Airline,
    flight::Flight,
    genesis::Genesis,
    insurance::{InsuranceStake, Purchase},
    payout::{Resolution, Withdrawal},
    policy::InsurancePolicy,
};

#[derive(Debug, Clone)]
pub struct Ledger {
    owner: AccountId,
    operational: bool,
    policy: InsurancePolicy,
    airlines: AirlineRegistry,
    flights: FlightTable,
    stakes: HashMap<(FlightKey, AccountId), InsuranceStake>,
    balances: BalanceLedger,
    capital: Amount,
    total_withdrawn: Amount,
    outbox: Vec<LedgerEvent>,
}

impl Ledger {
    /// Drains the events emitted since the last call, in emission order.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Events emitted but not yet drained.
    pub fn pending_events(&self) -> &[LedgerEvent] {
        &self.outbox
    }

    /// Appends an event to the outbox. Callers emit only after their writes succeed.
    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        tracing::debug!("📣 {}", event.name());
        self.outbox.push(event);
    }

    /// Outbox hook for the oracle engine. Accepts only oracle events.
    #[doc(hidden)]
    pub fn publish_oracle_event(&mut self, event: LedgerEvent) -> surety_common::Result<()> {
        self.require_operational()?;
        match event {
            LedgerEvent::OracleRegistered { .. }
            | LedgerEvent::OracleRequest { .. }
            | LedgerEvent::OracleReport { .. } => {
                self.emit(event);
                Ok(())
            }
            other => Err(surety_common::SuretyError::InvalidRequest(format!(
                "{} is not an oracle event",
                other.name()
            ))),
        }
    }

    /// Contract-held capital: airline funding, retained premiums and oracle fees.
    pub fn capital(&self) -> Amount {
        self.capital
    }

    pub fn total_withdrawn(&self) -> Amount {
        self.total_withdrawn
    }

    /// Adds an oracle registration fee to capital.
    #[doc(hidden)]
    pub fn collect_fee(&mut self, amount: Amount) -> surety_common::Result<()> {
        self.require_operational()?;
        self.capital = checked_add(self.capital, amount, "contract capital")?;
        Ok(())
    }
}

pub(crate) fn checked_add(a: Amount, b: Amount, what: &str) -> surety_common::Result<Amount> {
    a.checked_add(b)
        .ok_or_else(|| surety_common::SuretyError::AmountOverflow(format!("{} would overflow", what)))
}
