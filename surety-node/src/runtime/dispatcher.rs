use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use surety_common::{
    requests::{Call, Request},
    LedgerEvent, Result,
};
use surety_consensus::{AdmissionEngine, AdmissionPolicy, OracleEngine, OraclePolicy};
use surety_ledger::{Genesis, Ledger};

use crate::{
    error::NodeError,
    relay::{EventEnvelope, EventSender},
};

use super::response::Response;

/// Call id of the envelopes that carry the genesis state.
pub const GENESIS_CALL_ID: Uuid = Uuid::nil();

pub struct Runtime {
    ledger: Ledger,
    admission: AdmissionEngine,
    oracles: OracleEngine,
    relay: Option<EventSender>,
    next_seq: u64,
    // Genesis envelopes held until a relay is attached.
    genesis: Vec<EventEnvelope>,
}

impl Runtime {
    pub fn new(
        genesis: Genesis,
        admission: AdmissionPolicy,
        oracle: OraclePolicy,
    ) -> std::result::Result<Self, NodeError> {
        admission.validate()?;
        oracle.validate()?;
        let ledger = Ledger::from_genesis(genesis)?;
        info!(
            "🏛️ Runtime ready (owner {}, first airline {})",
            ledger.owner(),
            ledger.registered_airlines().first().map_or("-", |a| a.as_str())
        );
        let mut runtime = Self {
            ledger,
            admission: AdmissionEngine::new(admission),
            oracles: OracleEngine::new(oracle),
            relay: None,
            next_seq: 0,
            genesis: Vec::new(),
        };
        let events = runtime.ledger.drain_events();
        let sealed = runtime.seal(GENESIS_CALL_ID, events);
        runtime.genesis = sealed;
        Ok(runtime)
    }

    /// Routes drained events to a relay. The genesis envelopes go first.
    pub fn with_relay(mut self, relay: EventSender) -> Self {
        self.relay = Some(relay);
        for envelope in std::mem::take(&mut self.genesis) {
            self.send(envelope);
        }
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Sequence number of the last event sealed into an envelope. Genesis
    /// envelopes start at 0.
    pub fn last_seq(&self) -> u64 {
        self.next_seq.saturating_sub(1)
    }

    /// Applies a single call. Either every effect of the call lands (and its
    /// events go to the relay) or none does.
    pub fn dispatch(&mut self, call: Call) -> Result<Response> {
        let call_id = Uuid::new_v4();
        debug!("📞 [{}] {} from {}", call_id, call.request.name(), call.caller);

        let result = call.validate().and_then(|_| self.apply(&call));
        match &result {
            Ok(_) => self.publish(call_id),
            Err(e) => {
                warn!("❌ [{}] {} rejected: {}", call_id, call.request.name(), e);
                let stray = self.ledger.drain_events();
                if !stray.is_empty() {
                    warn!("⚠️ [{}] discarded {} events from a rejected call", call_id, stray.len());
                }
            }
        }
        result
    }

    fn apply(&mut self, call: &Call) -> Result<Response> {
        let caller = &call.caller;
        let ledger = &mut self.ledger;

        let response = match &call.request {
            Request::RegisterAirline { candidate } => {
                Response::Admission(self.admission.register_airline(ledger, candidate, caller)?)
            }
            Request::FundAirline { amount } => {
                ledger.fund_airline(caller, *amount)?;
                Response::Funded {
                    airline: caller.clone(),
                    amount: *amount,
                }
            }
            Request::RegisterFlight {
                flight_code,
                timestamp,
                insurance_cap,
                departure,
                destination,
            } => Response::FlightRegistered {
                flight_key: ledger.register_flight(
                    caller,
                    flight_code,
                    *timestamp,
                    *insurance_cap,
                    departure,
                    destination,
                )?,
            },
            Request::BuyInsurance {
                flight_code,
                destination,
                timestamp,
                amount,
            } => Response::Purchased(ledger.buy_insurance(
                caller,
                flight_code,
                destination,
                *timestamp,
                *amount,
            )?),
            Request::RegisterOracle { fee, indexes } => Response::OracleRegistered {
                indexes: self.oracles.register_oracle(ledger, caller, *fee, indexes.clone())?,
            },
            Request::RequestStatusUpdate {
                flight_code,
                destination,
                timestamp,
            } => Response::StatusRequested {
                index: self.oracles.request_status_update(
                    ledger,
                    caller,
                    flight_code,
                    destination,
                    *timestamp,
                )?,
            },
            Request::SubmitOracleResponse {
                index,
                flight_code,
                destination,
                timestamp,
                status_code,
            } => Response::OracleResponse(self.oracles.submit_oracle_response(
                ledger,
                caller,
                *index,
                flight_code,
                destination,
                *timestamp,
                *status_code,
            )?),
            Request::Withdraw => Response::Withdrawn(ledger.withdraw(caller)?),
            Request::SetOperatingStatus { operational } => Response::OperatingStatus {
                operational: ledger.set_operating_status(caller, *operational)?,
            },

            Request::IsOperational => Response::Bool(ledger.is_operational()),
            Request::IsAirlineRegistered { airline } => {
                Response::Bool(ledger.is_airline_registered(airline))
            }
            Request::IsAirlineFunded { airline } => Response::Bool(ledger.is_airline_funded(airline)),
            Request::RegisteredAirlineCount => Response::Count(ledger.registered_airline_count()),
            Request::GetFlightKey {
                flight_code,
                destination,
                timestamp,
            } => Response::FlightKey(Ledger::get_flight_key(flight_code, destination, *timestamp)),
            Request::IsFlightRegistered { flight_key } => {
                Response::Bool(ledger.is_flight_registered(flight_key))
            }
            Request::GetFlight { flight_key } => Response::Flight(ledger.flight(flight_key).cloned()),
            Request::FlightKeyAt { index } => {
                Response::MaybeFlightKey(ledger.flight_key_at(*index).cloned())
            }
            Request::GetRegisteredFlightsCount => {
                Response::Count(ledger.get_registered_flights_count())
            }
            Request::GetPassengerPaidAmount {
                flight_key,
                passenger,
            } => Response::Amount(ledger.get_passenger_paid_amount(flight_key, passenger)),
            Request::BalanceOf { account } => Response::Amount(ledger.balance_of(account)),
            Request::GetMyIndexes => Response::Indexes(self.oracles.get_my_indexes(caller)?),
            Request::ActiveFlights => {
                Response::Flights(ledger.active_flights().into_iter().cloned().collect())
            }
        };
        Ok(response)
    }

    /// Wraps the ledger outbox into envelopes and hands them to the relay.
    fn publish(&mut self, call_id: Uuid) {
        let events = self.ledger.drain_events();
        for envelope in self.seal(call_id, events) {
            self.send(envelope);
        }
    }

    fn seal(&mut self, call_id: Uuid, events: Vec<LedgerEvent>) -> Vec<EventEnvelope> {
        let emitted_at = Utc::now();
        events
            .into_iter()
            .map(|event| {
                let seq = self.next_seq;
                self.next_seq += 1;
                EventEnvelope {
                    seq,
                    call_id,
                    emitted_at,
                    event,
                }
            })
            .collect()
    }

    fn send(&self, envelope: EventEnvelope) {
        if let Some(relay) = &self.relay {
            let seq = envelope.seq;
            if relay.send(envelope).is_err() {
                warn!("⚠️ Relay closed, event #{} dropped", seq);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::{AccountId, SuretyError};

    fn runtime() -> Runtime {
        Runtime::new(
            Genesis::new("owner", "A0"),
            AdmissionPolicy::default(),
            OraclePolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_dispatch_routes_to_ledger() {
        let mut rt = runtime();
        let res = rt.dispatch(Call::new("A0", Request::FundAirline { amount: 10 })).unwrap();
        assert_eq!(
            res,
            Response::Funded {
                airline: AccountId::from("A0"),
                amount: 10
            }
        );
        let res = rt
            .dispatch(Call::new("x", Request::IsAirlineFunded { airline: "A0".into() }))
            .unwrap();
        assert_eq!(res, Response::Bool(true));
    }

    #[test]
    fn test_invalid_call_is_rejected_before_core() {
        let mut rt = runtime();
        let err = rt.dispatch(Call::new("", Request::Withdraw)).unwrap_err();
        assert!(matches!(err, SuretyError::InvalidRequest(_)));

        let err = rt
            .dispatch(Call::new("A0", Request::FundAirline { amount: 0 }))
            .unwrap_err();
        assert!(matches!(err, SuretyError::InsufficientFunds(_)));
        assert!(!rt.ledger().is_airline_funded(&"A0".into()));
    }

    #[test]
    fn test_events_are_sequenced() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut rt = runtime().with_relay(tx);

        rt.dispatch(Call::new("A0", Request::FundAirline { amount: 10 })).unwrap();
        rt.dispatch(Call::new("A0", Request::FundAirline { amount: 1 })).unwrap_err();
        rt.dispatch(Call::new("A0", Request::RegisterAirline { candidate: "A1".into() }))
            .unwrap();

        let genesis = rx.try_recv().unwrap();
        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!((genesis.seq, genesis.call_id), (0, GENESIS_CALL_ID));
        assert_eq!(genesis.event.name(), "AirlineRegistered");
        assert_eq!((first.seq, second.seq), (1, 2));
        assert_ne!(first.call_id, second.call_id);
        assert_ne!(first.call_id, GENESIS_CALL_ID);
        assert_eq!(first.event.name(), "AirlineFunded");
        assert_eq!(second.event.name(), "AirlineRegistered");
        assert_eq!(rt.last_seq(), 2);
    }

    #[test]
    fn test_rejected_first_call_keeps_genesis_event() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut rt = runtime().with_relay(tx);

        rt.dispatch(Call::new("P", Request::Withdraw)).unwrap_err();
        rt.dispatch(Call::new("A0", Request::FundAirline { amount: 10 })).unwrap();

        let genesis = rx.try_recv().unwrap();
        assert_eq!(genesis.call_id, GENESIS_CALL_ID);
        assert_eq!(
            genesis.event,
            LedgerEvent::AirlineRegistered {
                origin: "owner".into(),
                airline: "A0".into(),
            }
        );
        let funded = rx.try_recv().unwrap();
        assert_eq!((funded.seq, funded.event.name()), (1, "AirlineFunded"));
        assert!(rx.try_recv().is_err());
    }
}
