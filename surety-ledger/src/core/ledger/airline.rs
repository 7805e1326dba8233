use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use surety_common::{AccountId, Amount, LedgerEvent, Result, SuretyError};

use crate::{checked_add, Ledger};

/// An airline record. Created when it first receives an admission vote (or at
/// genesis) and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub id: AccountId,
    pub registered: bool,
    pub funded: bool,
    /// Airlines that voted to admit this one in the current round.
    pub votes: BTreeSet<AccountId>,
}

impl Airline {
    pub(crate) fn genesis(id: AccountId) -> Self {
        Self {
            id,
            registered: true,
            funded: false,
            votes: BTreeSet::new(),
        }
    }

    fn candidate(id: AccountId) -> Self {
        Self {
            id,
            registered: false,
            funded: false,
            votes: BTreeSet::new(),
        }
    }

    /// May register flights and vote.
    pub fn is_usable(&self) -> bool {
        self.registered && self.funded
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AirlineRegistry {
    records: HashMap<AccountId, Airline>,
    // Registration order of admitted airlines.
    registered: Vec<AccountId>,
}

impl AirlineRegistry {
    pub(crate) fn insert_registered(&mut self, airline: Airline) {
        self.registered.push(airline.id.clone());
        self.records.insert(airline.id.clone(), airline);
    }

    fn get(&self, id: &AccountId) -> Option<&Airline> {
        self.records.get(id)
    }

    fn get_mut(&mut self, id: &AccountId) -> Option<&mut Airline> {
        self.records.get_mut(id)
    }
}

impl Ledger {
    pub fn airline(&self, id: &AccountId) -> Option<&Airline> {
        self.airlines.get(id)
    }

    pub fn is_airline_registered(&self, id: &AccountId) -> bool {
        self.airlines.get(id).map_or(false, |a| a.registered)
    }

    pub fn is_airline_funded(&self, id: &AccountId) -> bool {
        self.airlines.get(id).map_or(false, |a| a.funded)
    }

    pub fn is_airline_usable(&self, id: &AccountId) -> bool {
        self.airlines.get(id).map_or(false, Airline::is_usable)
    }

    pub fn registered_airline_count(&self) -> usize {
        self.airlines.registered.len()
    }

    /// Admitted airlines in registration order.
    pub fn registered_airlines(&self) -> &[AccountId] {
        &self.airlines.registered
    }

    /// Current admission votes for a candidate (empty if none or admitted).
    pub fn admission_votes(&self, candidate: &AccountId) -> usize {
        self.airlines.get(candidate).map_or(0, |a| a.votes.len())
    }

    /// Records `voter`'s vote for `candidate` and returns the vote count.
    ///
    /// Hook for the admission engine, which owns the quorum rule. The ledger
    /// still requires a usable voter and allows one vote per candidate.
    #[doc(hidden)]
    pub fn record_admission_vote(&mut self, candidate: &AccountId, voter: &AccountId) -> Result<usize> {
        self.require_operational()?;
        self.require_usable(voter)?;
        if self.is_airline_registered(candidate) {
            return Err(SuretyError::AlreadyRegistered(format!("airline {}", candidate)));
        }
        if self
            .airlines
            .get(candidate)
            .map_or(false, |a| a.votes.contains(voter))
        {
            warn!("🗳️ {} já votou em {}", voter, candidate);
            return Err(SuretyError::DuplicateVote(format!(
                "{} already voted for {}",
                voter, candidate
            )));
        }

        let record = self
            .airlines
            .records
            .entry(candidate.clone())
            .or_insert_with(|| Airline::candidate(candidate.clone()));
        record.votes.insert(voter.clone());
        Ok(record.votes.len())
    }

    /// Marks `candidate` registered (unfunded) and clears its vote set.
    /// Hook for the admission engine once its rule is met.
    #[doc(hidden)]
    pub fn admit_airline(&mut self, candidate: &AccountId, origin: &AccountId) -> Result<()> {
        self.require_operational()?;
        self.require_usable(origin)?;
        if self.is_airline_registered(candidate) {
            return Err(SuretyError::AlreadyRegistered(format!("airline {}", candidate)));
        }

        let record = self
            .airlines
            .records
            .entry(candidate.clone())
            .or_insert_with(|| Airline::candidate(candidate.clone()));
        record.registered = true;
        record.votes.clear();
        self.airlines.registered.push(candidate.clone());

        info!("✈️ Airline {} registered (origin {})", candidate, origin);
        self.emit(LedgerEvent::AirlineRegistered {
            origin: origin.clone(),
            airline: candidate.clone(),
        });
        Ok(())
    }

    fn require_usable(&self, airline: &AccountId) -> Result<()> {
        if !self.is_airline_usable(airline) {
            return Err(SuretyError::NotAuthorized(format!(
                "{} is not a registered and funded airline",
                airline
            )));
        }
        Ok(())
    }

    /// Funds a registered airline. The deposit joins contract capital.
    pub fn fund_airline(&mut self, caller: &AccountId, amount: Amount) -> Result<()> {
        self.require_operational()?;

        if !self.is_airline_registered(caller) {
            return Err(SuretyError::NotRegistered(format!("airline {}", caller)));
        }
        if amount < self.policy.minimum_fund {
            return Err(SuretyError::InsufficientFunds(format!(
                "funding of {} is below the minimum of {}",
                amount, self.policy.minimum_fund
            )));
        }
        let capital = checked_add(self.capital, amount, "contract capital")?;

        self.capital = capital;
        if let Some(airline) = self.airlines.get_mut(caller) {
            airline.funded = true;
        }

        info!("💰 Companhia {} financiada com {}", caller, amount);
        self.emit(LedgerEvent::AirlineFunded {
            airline: caller.clone(),
            amount,
        });
        Ok(())
    }
}
