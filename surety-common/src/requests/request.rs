use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, FlightKey};

/// An authenticated call: who is calling and what they ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub caller: AccountId,
    #[serde(flatten)]
    pub request: Request,
}

impl Call {
    pub fn new(caller: impl Into<AccountId>, request: Request) -> Self {
        Self { caller: caller.into(), request }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One variant per ledger operation or query. Arguments are typed here and
/// checked by [`Request::validate`] before any of them reach the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    // --- admission ---
    RegisterAirline {
        candidate: AccountId,
    },
    FundAirline {
        amount: Amount,
    },

    // --- flights & insurance ---
    RegisterFlight {
        flight_code: String,
        timestamp: u64,
        insurance_cap: Amount,
        departure: String,
        destination: String,
    },
    BuyInsurance {
        flight_code: String,
        destination: String,
        timestamp: u64,
        amount: Amount,
    },

    // --- oracles ---
    RegisterOracle {
        fee: Amount,
        /// Out-of-band index assignment; derived when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        indexes: Option<Vec<u8>>,
    },
    RequestStatusUpdate {
        flight_code: String,
        destination: String,
        timestamp: u64,
    },
    SubmitOracleResponse {
        index: u8,
        flight_code: String,
        destination: String,
        timestamp: u64,
        status_code: u8,
    },

    // --- payout ---
    Withdraw,

    // --- operations ---
    SetOperatingStatus {
        operational: bool,
    },

    // --- queries ---
    IsOperational,
    IsAirlineRegistered {
        airline: AccountId,
    },
    IsAirlineFunded {
        airline: AccountId,
    },
    RegisteredAirlineCount,
    GetFlightKey {
        flight_code: String,
        destination: String,
        timestamp: u64,
    },
    IsFlightRegistered {
        flight_key: FlightKey,
    },
    GetFlight {
        flight_key: FlightKey,
    },
    FlightKeyAt {
        index: usize,
    },
    GetRegisteredFlightsCount,
    GetPassengerPaidAmount {
        flight_key: FlightKey,
        passenger: AccountId,
    },
    BalanceOf {
        account: AccountId,
    },
    GetMyIndexes,
    ActiveFlights,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::RegisterAirline { .. } => "register_airline",
            Request::FundAirline { .. } => "fund_airline",
            Request::RegisterFlight { .. } => "register_flight",
            Request::BuyInsurance { .. } => "buy_insurance",
            Request::RegisterOracle { .. } => "register_oracle",
            Request::RequestStatusUpdate { .. } => "request_status_update",
            Request::SubmitOracleResponse { .. } => "submit_oracle_response",
            Request::Withdraw => "withdraw",
            Request::SetOperatingStatus { .. } => "set_operating_status",
            Request::IsOperational => "is_operational",
            Request::IsAirlineRegistered { .. } => "is_airline_registered",
            Request::IsAirlineFunded { .. } => "is_airline_funded",
            Request::RegisteredAirlineCount => "registered_airline_count",
            Request::GetFlightKey { .. } => "get_flight_key",
            Request::IsFlightRegistered { .. } => "is_flight_registered",
            Request::GetFlight { .. } => "get_flight",
            Request::FlightKeyAt { .. } => "flight_key_at",
            Request::GetRegisteredFlightsCount => "get_registered_flights_count",
            Request::GetPassengerPaidAmount { .. } => "get_passenger_paid_amount",
            Request::BalanceOf { .. } => "balance_of",
            Request::GetMyIndexes => "get_my_indexes",
            Request::ActiveFlights => "active_flights",
        }
    }

    /// Whether the request can change ledger state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Request::RegisterAirline { .. }
                | Request::FundAirline { .. }
                | Request::RegisterFlight { .. }
                | Request::BuyInsurance { .. }
                | Request::RegisterOracle { .. }
                | Request::RequestStatusUpdate { .. }
                | Request::SubmitOracleResponse { .. }
                | Request::Withdraw
                | Request::SetOperatingStatus { .. }
        )
    }
}
