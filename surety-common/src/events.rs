use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, FlightKey, FlightStatus};

/// Domain events emitted by ledger state transitions, in emission order.
///
/// They are collected in the ledger outbox and drained by the runtime; the
/// core never waits on whoever consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum LedgerEvent {
    AirlineRegistered {
        origin: AccountId,
        airline: AccountId,
    },
    AirlineFunded {
        airline: AccountId,
        amount: Amount,
    },
    FlightRegistered {
        flight_key: FlightKey,
        airline: AccountId,
    },
    InsurancePurchased {
        flight_key: FlightKey,
        passenger: AccountId,
        amount: Amount,
        total_paid: Amount,
    },
    PremiumCredited {
        airline: AccountId,
        flight_key: FlightKey,
        amount: Amount,
    },
    OracleRegistered {
        oracle: AccountId,
        indexes: Vec<u8>,
    },
    OracleRequest {
        index: u8,
        flight_key: FlightKey,
        flight_code: String,
        destination: String,
        timestamp: u64,
    },
    OracleReport {
        index: u8,
        flight_key: FlightKey,
        status: FlightStatus,
        oracle: AccountId,
    },
    FlightStatusUpdated {
        flight_key: FlightKey,
        status: FlightStatus,
    },
    PassengerCredited {
        passenger: AccountId,
        flight_key: FlightKey,
        amount: Amount,
    },
    AccountWithdrawal {
        recipient: AccountId,
        amount: Amount,
    },
    OperationalStatusChanged {
        operational: bool,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::AirlineRegistered { .. } => "AirlineRegistered",
            LedgerEvent::AirlineFunded { .. } => "AirlineFunded",
            LedgerEvent::FlightRegistered { .. } => "FlightRegistered",
            LedgerEvent::InsurancePurchased { .. } => "InsurancePurchased",
            LedgerEvent::PremiumCredited { .. } => "PremiumCredited",
            LedgerEvent::OracleRegistered { .. } => "OracleRegistered",
            LedgerEvent::OracleRequest { .. } => "OracleRequest",
            LedgerEvent::OracleReport { .. } => "OracleReport",
            LedgerEvent::FlightStatusUpdated { .. } => "FlightStatusUpdated",
            LedgerEvent::PassengerCredited { .. } => "PassengerCredited",
            LedgerEvent::AccountWithdrawal { .. } => "AccountWithdrawal",
            LedgerEvent::OperationalStatusChanged { .. } => "OperationalStatusChanged",
        }
    }
}
