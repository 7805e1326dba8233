use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use surety_common::{AccountId, Amount, FlightKey, FlightStatus, LedgerEvent, Result, SuretyError};

use crate::{checked_add, Ledger};

/// A passenger's insurance on one flight. Repeat purchases top up the same stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceStake {
    pub passenger: AccountId,
    pub amount_paid: Amount,
    pub credited: bool,
}

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub flight_key: FlightKey,
    pub charged: Amount,
    pub total_paid: Amount,
}

impl Ledger {
    /// Buys (or tops up) insurance. A purchase that would take the stake past
    /// the flight's cap is rejected whole; nothing is silently truncated.
    pub fn buy_insurance(
        &mut self,
        passenger: &AccountId,
        flight_code: &str,
        destination: &str,
        timestamp: u64,
        amount: Amount,
    ) -> Result<Purchase> {
        self.require_operational()?;

        if amount == 0 {
            return Err(SuretyError::InvalidRequest("insurance amount must be greater than 0".into()));
        }

        let key = Self::get_flight_key(flight_code, destination, timestamp);
        let flight = self.flights.get(&key).ok_or_else(|| {
            SuretyError::FlightNotFound(format!("{} to {} at {}", flight_code, destination, timestamp))
        })?;

        if flight.status != FlightStatus::Unknown {
            return Err(SuretyError::FlightAlreadyResolved(format!("{} is {}", key, flight.status)));
        }

        let paid = self.get_passenger_paid_amount(&key, passenger);
        let total_paid = checked_add(paid, amount, "insurance stake")?;
        if total_paid > flight.insurance_cap {
            warn!(
                "🚫 {} tried to insure {} for {} (paid {}, cap {})",
                passenger, key, amount, paid, flight.insurance_cap
            );
            return Err(SuretyError::ExceedsCap(format!(
                "stake of {} would exceed cap of {} on {}",
                total_paid, flight.insurance_cap, key
            )));
        }

        // Premium routing is computed up front so no write can fail halfway.
        let airline = flight.airline.clone();
        let premium_to_airline = self.policy.premium_to_airline;
        let airline_balance = if premium_to_airline {
            Some(self.balances.preview_credit(&airline, amount)?)
        } else {
            None
        };
        let capital = if premium_to_airline {
            self.capital
        } else {
            checked_add(self.capital, amount, "contract capital")?
        };

        let stake_key = (key.clone(), passenger.clone());
        let is_new = !self.stakes.contains_key(&stake_key);
        self.stakes
            .entry(stake_key)
            .or_insert_with(|| InsuranceStake {
                passenger: passenger.clone(),
                amount_paid: 0,
                credited: false,
            })
            .amount_paid = total_paid;

        if is_new {
            if let Some(flight) = self.flights.get_mut(&key) {
                flight.insurees.push(passenger.clone());
            }
        }
        self.capital = capital;
        if let Some(balance) = airline_balance {
            self.balances.set(&airline, balance);
        }

        info!("🧾 {} insured {} for {} (total {})", passenger, key, amount, total_paid);
        self.emit(LedgerEvent::InsurancePurchased {
            flight_key: key.clone(),
            passenger: passenger.clone(),
            amount,
            total_paid,
        });
        if premium_to_airline {
            self.emit(LedgerEvent::PremiumCredited {
                airline,
                flight_key: key.clone(),
                amount,
            });
        }

        Ok(Purchase {
            flight_key: key,
            charged: amount,
            total_paid,
        })
    }

    pub fn get_passenger_paid_amount(&self, key: &FlightKey, passenger: &AccountId) -> Amount {
        self.stake(key, passenger).map_or(0, |s| s.amount_paid)
    }

    pub fn stake(&self, key: &FlightKey, passenger: &AccountId) -> Option<&InsuranceStake> {
        self.stakes.get(&(key.clone(), passenger.clone()))
    }
}
