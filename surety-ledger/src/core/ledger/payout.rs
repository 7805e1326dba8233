use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use surety_common::{AccountId, Amount, FlightKey, FlightStatus, LedgerEvent, Result, SuretyError};

use crate::{checked_add, Ledger};

/// Outcome of finalizing a flight's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Status written now; `credited` lists the passengers paid by this call.
    Resolved {
        status: FlightStatus,
        credited: Vec<(AccountId, Amount)>,
    },
    /// The flight was already terminal; nothing changed.
    AlreadyResolved(FlightStatus),
}

/// Amount handed to the external transfer collaborator. The balance it came
/// from has already been cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub recipient: AccountId,
    pub amount: Amount,
}

impl Ledger {
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.balance_of(account)
    }

    /// Dry run of [`Ledger::resolve_flight`]: returns the error it would
    /// fail with, without changing anything.
    pub fn check_resolution(&self, key: &FlightKey, status: FlightStatus) -> Result<()> {
        self.require_operational()?;
        if !status.is_terminal() {
            return Err(SuretyError::InvalidRequest("cannot resolve a flight to Unknown".into()));
        }
        let current = self
            .flights
            .get(key)
            .ok_or_else(|| SuretyError::FlightNotFound(key.to_string()))?
            .status;

        if !current.is_terminal() && status.is_late() {
            self.plan_credits(key)?;
        }
        Ok(())
    }

    /// Writes the terminal status of a flight, crediting its insurees when the
    /// status is late. Hook for oracle consensus once a quorum is reached.
    #[doc(hidden)]
    pub fn resolve_flight(&mut self, key: &FlightKey, status: FlightStatus) -> Result<Resolution> {
        // Once this passes the writes below cannot fail.
        self.check_resolution(key, status)?;

        let current = self.flights.get(key).map_or(FlightStatus::Unknown, |f| f.status);
        if current.is_terminal() {
            warn!("🔁 Flight {} already resolved as {}, ignoring {}", key, current, status);
            return Ok(Resolution::AlreadyResolved(current));
        }

        if let Some(flight) = self.flights.get_mut(key) {
            flight.status = status;
        }
        info!("🛬 Flight {} resolved as {}", key, status);
        self.emit(LedgerEvent::FlightStatusUpdated {
            flight_key: key.clone(),
            status,
        });

        let credited = if status.is_late() {
            self.credit_passengers(key)?
        } else {
            Vec::new()
        };
        Ok(Resolution::Resolved { status, credited })
    }

    /// Credits every not-yet-credited stake on `key` with its payout.
    /// Stakes already credited are skipped, so calling it twice pays once.
    pub(crate) fn credit_passengers(&mut self, key: &FlightKey) -> Result<Vec<(AccountId, Amount)>> {
        let credits = self.plan_credits(key)?;
        Ok(self.apply_credits(key, credits))
    }

    /// (passenger, payout, resulting balance) for each uncredited stake.
    fn plan_credits(&self, key: &FlightKey) -> Result<Vec<(AccountId, Amount, Amount)>> {
        let flight = self
            .flights
            .get(key)
            .ok_or_else(|| SuretyError::FlightNotFound(key.to_string()))?;

        let mut planned: Vec<(AccountId, Amount, Amount)> = Vec::new();
        for passenger in &flight.insurees {
            let Some(stake) = self.stake(key, passenger) else {
                continue;
            };
            if stake.credited {
                continue;
            }
            let payout = self.policy.payout_for(stake.amount_paid)?;
            // Each passenger appears once in `insurees`.
            let balance = self.balances.preview_credit(passenger, payout)?;
            planned.push((passenger.clone(), payout, balance));
        }
        Ok(planned)
    }

    fn apply_credits(
        &mut self,
        key: &FlightKey,
        credits: Vec<(AccountId, Amount, Amount)>,
    ) -> Vec<(AccountId, Amount)> {
        let mut credited = Vec::with_capacity(credits.len());
        for (passenger, payout, balance) in credits {
            if let Some(stake) = self.stakes.get_mut(&(key.clone(), passenger.clone())) {
                stake.credited = true;
            }
            self.balances.set(&passenger, balance);

            info!("💸 Passenger {} credited {} for {}", passenger, payout, key);
            self.emit(LedgerEvent::PassengerCredited {
                passenger: passenger.clone(),
                flight_key: key.clone(),
                amount: payout,
            });
            credited.push((passenger, payout));
        }
        credited
    }

    /// Clears the caller's whole balance and returns it for transfer.
    ///
    /// The balance is zeroed before the amount leaves the ledger, so a
    /// re-entrant second call finds nothing.
    pub fn withdraw(&mut self, caller: &AccountId) -> Result<Withdrawal> {
        self.require_operational()?;

        let amount = self.balances.balance_of(caller);
        if amount == 0 {
            return Err(SuretyError::NothingToWithdraw(format!("{} has no credited balance", caller)));
        }
        let total_withdrawn = checked_add(self.total_withdrawn, amount, "total withdrawn")?;

        let taken = self.balances.take(caller);
        self.total_withdrawn = total_withdrawn;

        info!("🏧 {} withdrew {}", caller, taken);
        self.emit(LedgerEvent::AccountWithdrawal {
            recipient: caller.clone(),
            amount: taken,
        });
        Ok(Withdrawal {
            recipient: caller.clone(),
            amount: taken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Genesis;

    const TS: u64 = 1_700_000_000;

    fn insured_ledger() -> (Ledger, FlightKey) {
        let mut ledger = Ledger::from_genesis(Genesis::new("owner", "a0")).unwrap();
        let a0 = AccountId::from("a0");
        ledger.fund_airline(&a0, 10).unwrap();
        let key = ledger.register_flight(&a0, "MS653", TS, 4, "RUH", "HBE").unwrap();
        ledger.buy_insurance(&AccountId::from("p1"), "MS653", "HBE", TS, 4).unwrap();
        ledger.buy_insurance(&AccountId::from("p2"), "MS653", "HBE", TS, 2).unwrap();
        ledger.drain_events();
        (ledger, key)
    }

    #[test]
    fn test_late_resolution_credits_each_stake() {
        let (mut ledger, key) = insured_ledger();
        let res = ledger.resolve_flight(&key, FlightStatus::LateAirline).unwrap();

        assert_eq!(
            res,
            Resolution::Resolved {
                status: FlightStatus::LateAirline,
                credited: vec![(AccountId::from("p1"), 6), (AccountId::from("p2"), 3)],
            }
        );
        assert_eq!(ledger.balance_of(&AccountId::from("p1")), 6);
        assert_eq!(ledger.balance_of(&AccountId::from("p2")), 3);
        assert!(ledger.stake(&key, &AccountId::from("p1")).unwrap().credited);

        let names: Vec<&str> = ledger.drain_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["FlightStatusUpdated", "PassengerCredited", "PassengerCredited"]);
    }

    #[test]
    fn test_on_time_credits_nobody() {
        let (mut ledger, key) = insured_ledger();
        ledger.resolve_flight(&key, FlightStatus::OnTime).unwrap();
        assert_eq!(ledger.balance_of(&AccountId::from("p1")), 0);
        assert!(!ledger.stake(&key, &AccountId::from("p1")).unwrap().credited);
    }

    #[test]
    fn test_second_resolution_is_noop() {
        let (mut ledger, key) = insured_ledger();
        ledger.resolve_flight(&key, FlightStatus::LateWeather).unwrap();
        ledger.drain_events();

        let res = ledger.resolve_flight(&key, FlightStatus::OnTime).unwrap();
        assert_eq!(res, Resolution::AlreadyResolved(FlightStatus::LateWeather));
        assert_eq!(ledger.flight(&key).unwrap().status, FlightStatus::LateWeather);
        assert_eq!(ledger.balance_of(&AccountId::from("p1")), 6);
        assert!(ledger.pending_events().is_empty());
    }

    #[test]
    fn test_credit_passengers_is_idempotent() {
        let (mut ledger, key) = insured_ledger();
        let first = ledger.credit_passengers(&key).unwrap();
        assert_eq!(first.len(), 2);

        let second = ledger.credit_passengers(&key).unwrap();
        assert!(second.is_empty());
        assert_eq!(ledger.balance_of(&AccountId::from("p1")), 6);
    }

    #[test]
    fn test_withdraw_clears_balance_once() {
        let (mut ledger, key) = insured_ledger();
        ledger.resolve_flight(&key, FlightStatus::LateTechnical).unwrap();
        let p1 = AccountId::from("p1");

        let w = ledger.withdraw(&p1).unwrap();
        assert_eq!(w, Withdrawal { recipient: p1.clone(), amount: 6 });
        assert_eq!(ledger.balance_of(&p1), 0);
        assert_eq!(ledger.total_withdrawn(), 6);

        assert!(matches!(ledger.withdraw(&p1), Err(SuretyError::NothingToWithdraw(_))));
        assert_eq!(ledger.total_withdrawn(), 6);
    }

    #[test]
    fn test_resolve_unknown_flight() {
        let (mut ledger, _) = insured_ledger();
        let missing = Ledger::get_flight_key("XX1", "HBE", TS);
        assert!(matches!(
            ledger.resolve_flight(&missing, FlightStatus::OnTime),
            Err(SuretyError::FlightNotFound(_))
        ));
    }
}
