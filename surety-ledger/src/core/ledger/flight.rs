use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use surety_common::{AccountId, Amount, FlightKey, FlightStatus, LedgerEvent, Result, SuretyError};

use crate::Ledger;

/// A registered flight. Status leaves `Unknown` exactly once, through oracle
/// consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub key: FlightKey,
    pub airline: AccountId,
    pub flight_code: String,
    pub departure: String,
    pub destination: String,
    pub timestamp: u64,
    pub insurance_cap: Amount,
    pub status: FlightStatus,
    /// Passengers holding a stake, in first-purchase order.
    pub insurees: Vec<AccountId>,
}

/// Registros de voos mais o índice append-only.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlightTable {
    flights: HashMap<FlightKey, Flight>,
    keys: Vec<FlightKey>,
}

impl FlightTable {
    pub(crate) fn get(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &FlightKey) -> Option<&mut Flight> {
        self.flights.get_mut(key)
    }
}

impl Ledger {
    /// Pure: identical inputs always give the same key.
    pub fn get_flight_key(flight_code: &str, destination: &str, timestamp: u64) -> FlightKey {
        FlightKey::derive(flight_code, destination, timestamp)
    }

    pub fn register_flight(
        &mut self,
        airline: &AccountId,
        flight_code: &str,
        timestamp: u64,
        insurance_cap: Amount,
        departure: &str,
        destination: &str,
    ) -> Result<FlightKey> {
        self.require_operational()?;

        if !self.is_airline_usable(airline) {
            warn!("⛔ {} não pode registrar voos (não registrada ou sem fundos)", airline);
            return Err(SuretyError::NotAuthorized(format!(
                "airline {} must be registered and funded",
                airline
            )));
        }

        let key = Self::get_flight_key(flight_code, destination, timestamp);
        if self.flights.flights.contains_key(&key) {
            return Err(SuretyError::DuplicateFlight(format!(
                "{} to {} at {}",
                flight_code, destination, timestamp
            )));
        }

        let flight = Flight {
            key: key.clone(),
            airline: airline.clone(),
            flight_code: flight_code.to_string(),
            departure: departure.to_string(),
            destination: destination.to_string(),
            timestamp,
            insurance_cap,
            status: FlightStatus::Unknown,
            insurees: Vec::new(),
        };
        self.flights.flights.insert(key.clone(), flight);
        self.flights.keys.push(key.clone());

        info!("🛫 Flight {} {}->{} registered by {} (key {})", flight_code, departure, destination, airline, key);
        self.emit(LedgerEvent::FlightRegistered {
            flight_key: key.clone(),
            airline: airline.clone(),
        });
        Ok(key)
    }

    pub fn is_flight_registered(&self, key: &FlightKey) -> bool {
        self.flights.flights.contains_key(key)
    }

    pub fn flight(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    pub fn get_registered_flights_count(&self) -> usize {
        self.flights.keys.len()
    }

    /// Stable, append-only index for external iteration.
    pub fn flight_key_at(&self, index: usize) -> Option<&FlightKey> {
        self.flights.keys.get(index)
    }

    /// Flights still open for insurance: walks the index and keeps those
    /// whose status equals `Unknown`.
    pub fn active_flights(&self) -> Vec<&Flight> {
        (0..self.get_registered_flights_count())
            .filter_map(|i| self.flight_key_at(i))
            .filter_map(|key| self.flight(key))
            .filter(|flight| flight.status == FlightStatus::Unknown)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Genesis;

    fn funded_ledger() -> Ledger {
        let mut ledger = Ledger::from_genesis(Genesis::new("owner", "a0")).unwrap();
        ledger.fund_airline(&AccountId::from("a0"), 10).unwrap();
        ledger
    }

    #[test]
    fn test_unfunded_airline_cannot_register_flight() {
        let mut ledger = Ledger::from_genesis(Genesis::new("owner", "a0")).unwrap();
        let res = ledger.register_flight(&AccountId::from("a0"), "MS653", 1, 5, "RUH", "HBE");
        assert!(matches!(res, Err(SuretyError::NotAuthorized(_))));
        assert_eq!(ledger.get_registered_flights_count(), 0);
    }

    #[test]
    fn test_register_flight_and_index() {
        let mut ledger = funded_ledger();
        let a0 = AccountId::from("a0");

        let key = ledger.register_flight(&a0, "MS653", 1000, 5, "RUH", "HBE").unwrap();
        assert_eq!(key, Ledger::get_flight_key("MS653", "HBE", 1000));
        assert!(ledger.is_flight_registered(&key));
        assert_eq!(ledger.get_registered_flights_count(), 1);
        assert_eq!(ledger.flight_key_at(0), Some(&key));
        assert_eq!(ledger.flight_key_at(1), None);

        let flight = ledger.flight(&key).unwrap();
        assert_eq!(flight.status, FlightStatus::Unknown);
        assert_eq!(flight.insurance_cap, 5);
    }

    #[test]
    fn test_duplicate_flight_rejected() {
        let mut ledger = funded_ledger();
        let a0 = AccountId::from("a0");
        ledger.register_flight(&a0, "MS653", 1000, 5, "RUH", "HBE").unwrap();

        // Departure is not part of the key.
        let res = ledger.register_flight(&a0, "MS653", 1000, 9, "JED", "HBE");
        assert!(matches!(res, Err(SuretyError::DuplicateFlight(_))));
        assert_eq!(ledger.get_registered_flights_count(), 1);
    }

    #[test]
    fn test_active_flights_filters_resolved() {
        let mut ledger = funded_ledger();
        let a0 = AccountId::from("a0");
        let k1 = ledger.register_flight(&a0, "MS653", 1000, 5, "RUH", "HBE").unwrap();
        let k2 = ledger.register_flight(&a0, "MS654", 1000, 5, "HBE", "RUH").unwrap();

        ledger.resolve_flight(&k1, FlightStatus::OnTime).unwrap();

        let active: Vec<&FlightKey> = ledger.active_flights().into_iter().map(|f| &f.key).collect();
        assert_eq!(active, vec![&k2]);
    }
}
