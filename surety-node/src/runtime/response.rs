use serde::{Deserialize, Serialize};

use surety_common::{AccountId, Amount, FlightKey};
use surety_consensus::{AdmissionOutcome, SubmitOutcome};
use surety_ledger::{Flight, Purchase, Withdrawal};

/// Successful result of a dispatched call, one shape per operation family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum Response {
    Admission(AdmissionOutcome),
    Funded { airline: AccountId, amount: Amount },
    FlightRegistered { flight_key: FlightKey },
    Purchased(Purchase),
    OracleRegistered { indexes: Vec<u8> },
    StatusRequested { index: u8 },
    OracleResponse(SubmitOutcome),
    Withdrawn(Withdrawal),
    OperatingStatus { operational: bool },

    Bool(bool),
    Count(usize),
    Amount(Amount),
    FlightKey(FlightKey),
    MaybeFlightKey(Option<FlightKey>),
    Flight(Option<Flight>),
    Flights(Vec<Flight>),
    Indexes(Vec<u8>),
}
