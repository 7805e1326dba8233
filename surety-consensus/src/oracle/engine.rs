use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use surety_common::{
    crypto::FieldHasher, requests::validation::reported_status, AccountId, Amount, FlightKey,
    FlightStatus, LedgerEvent, Result, SuretyError,
};
use surety_ledger::{Ledger, Resolution};

use crate::consensus::{
    evaluator::{ConsensusEvaluator, QuorumPolicy},
    evidence::EquivocationEvidence,
    registry::TallyCheck,
};

use super::{
    policy::OraclePolicy,
    registry::OracleRegistry,
    request::{OracleRequest, RequestKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    DuplicateResponse,
    ConflictingResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Counted; the status has not reached quorum yet.
    Accepted {
        status: FlightStatus,
        responses: usize,
        required: usize,
    },
    /// This response completed the quorum and resolved the flight.
    Resolved {
        status: FlightStatus,
        credited: Vec<(AccountId, Amount)>,
    },
    Rejected { reason: RejectReason },
    /// The request was already closed; the response changed nothing.
    Finalized { status: FlightStatus },
}

/// Motor que transforma respostas de oráculos em status de voo no ledger.
#[derive(Debug, Clone)]
pub struct OracleEngine {
    policy: OraclePolicy,
    evaluator: ConsensusEvaluator,
    registry: OracleRegistry,
    requests: HashMap<RequestKey, OracleRequest>,
    nonce: u64,
    pending_evidence: Vec<EquivocationEvidence>,
}

impl OracleEngine {
    pub fn new(policy: OraclePolicy) -> Self {
        Self {
            policy,
            evaluator: ConsensusEvaluator::new(QuorumPolicy::fixed(policy.min_responses)),
            registry: OracleRegistry::new(),
            requests: HashMap::new(),
            nonce: 0,
            pending_evidence: Vec::new(),
        }
    }

    pub fn request(&self, key: &RequestKey) -> Option<&OracleRequest> {
        self.requests.get(key)
    }

    /// Respostas necessárias para resolver uma requisição.
    pub fn required_responses(&self) -> usize {
        self.evaluator.threshold(self.policy.cohort_size)
    }

    /// Registers an oracle, deriving its indexes unless `indexes` is given.
    /// The fee joins contract capital.
    pub fn register_oracle(
        &mut self,
        ledger: &mut Ledger,
        oracle: &AccountId,
        fee: Amount,
        indexes: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        ledger.require_operational()?;
        if self.registry.is_registered(oracle) {
            return Err(SuretyError::AlreadyRegistered(format!("oracle {}", oracle)));
        }
        if fee < self.policy.registration_fee {
            return Err(SuretyError::InsufficientFunds(format!(
                "oracle fee {} is below {}",
                fee, self.policy.registration_fee
            )));
        }
        let indexes = match indexes {
            Some(explicit) => {
                OracleRegistry::check_indexes(&self.policy, &explicit)?;
                explicit
            }
            None => OracleRegistry::derive_indexes(&self.policy, oracle),
        };

        ledger.collect_fee(fee)?;
        self.registry.insert(oracle.clone(), indexes.clone());

        info!("🔮 Oráculo {} registrado com índices {:?}", oracle, indexes);
        ledger.publish_oracle_event(LedgerEvent::OracleRegistered {
            oracle: oracle.clone(),
            indexes: indexes.clone(),
        })?;
        Ok(indexes)
    }

    pub fn register_oracle_with_indexes(
        &mut self,
        ledger: &mut Ledger,
        oracle: &AccountId,
        fee: Amount,
        indexes: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.register_oracle(ledger, oracle, fee, Some(indexes))
    }

    pub fn get_my_indexes(&self, oracle: &AccountId) -> Result<Vec<u8>> {
        self.registry.get_my_indexes(oracle).map(<[u8]>::to_vec)
    }

    /// Opens a status request for a registered, unresolved flight and returns
    /// its index. An open request with the same index is returned as is.
    pub fn request_status_update(
        &mut self,
        ledger: &mut Ledger,
        requester: &AccountId,
        flight_code: &str,
        destination: &str,
        timestamp: u64,
    ) -> Result<u8> {
        ledger.require_operational()?;
        let flight_key = Ledger::get_flight_key(flight_code, destination, timestamp);
        let flight = ledger
            .flight(&flight_key)
            .ok_or_else(|| SuretyError::FlightNotFound(flight_key.to_string()))?;
        if flight.status.is_terminal() {
            return Err(SuretyError::FlightAlreadyResolved(format!(
                "{} is {}",
                flight_key, flight.status
            )));
        }

        let digest = FieldHasher::new()
            .str(requester.as_str())
            .str(flight_key.as_str())
            .u64(self.nonce)
            .finish();
        let index = self.policy.index_from_byte(digest[0]);
        let key = RequestKey {
            index,
            flight_key: flight_key.clone(),
        };
        if self.requests.contains_key(&key) {
            info!("📨 Requisição {} já aberta", key);
            return Ok(index);
        }

        self.nonce += 1;
        self.requests.insert(
            key.clone(),
            OracleRequest::open(key, requester.clone(), flight_code, destination, timestamp),
        );

        info!("📨 Status requested for {} at index {}", flight_key, index);
        ledger.publish_oracle_event(LedgerEvent::OracleRequest {
            index,
            flight_key,
            flight_code: flight_code.to_string(),
            destination: destination.to_string(),
            timestamp,
        })?;
        Ok(index)
    }

    /// Records one oracle response. The response that completes a quorum
    /// resolves the flight (crediting insurees when late) in the same step.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_oracle_response(
        &mut self,
        ledger: &mut Ledger,
        oracle: &AccountId,
        index: u8,
        flight_code: &str,
        destination: &str,
        timestamp: u64,
        status_code: u8,
    ) -> Result<SubmitOutcome> {
        ledger.require_operational()?;
        let status = reported_status(status_code)?;
        let key = RequestKey {
            index,
            flight_key: FlightKey::derive(flight_code, destination, timestamp),
        };
        let required = self.required_responses();

        let request = self
            .requests
            .get_mut(&key)
            .ok_or_else(|| SuretyError::RequestNotFound(key.to_string()))?;
        if !self.registry.is_authorized(oracle, index) {
            return Err(SuretyError::OracleNotAuthorizedForIndex(format!(
                "{} may not answer index {}",
                oracle, index
            )));
        }
        if let Some(final_status) = request.resolved {
            return Ok(SubmitOutcome::Finalized { status: final_status });
        }

        let responses = match request.responses.check(oracle, status) {
            TallyCheck::Duplicate => {
                warn!("🔁 Resposta duplicada de {} em {}", oracle, key);
                return Ok(SubmitOutcome::Rejected {
                    reason: RejectReason::DuplicateResponse,
                });
            }
            TallyCheck::Conflict { first } => {
                warn!(
                    "🚨 Oracle {} equivocated on {}: {} then {}",
                    oracle, key, first, status
                );
                self.pending_evidence.push(EquivocationEvidence {
                    offender: oracle.clone(),
                    index,
                    flight_key: key.flight_key.clone(),
                    first,
                    second: status,
                });
                return Ok(SubmitOutcome::Rejected {
                    reason: RejectReason::ConflictingResponse,
                });
            }
            TallyCheck::Fresh(count) => count,
        };

        let reached = self.evaluator.is_reached(responses, self.policy.cohort_size);
        if reached {
            ledger.check_resolution(&key.flight_key, status)?;
        }

        request.responses.register(oracle, status);
        info!("📥 {} reported {} on {} ({}/{})", oracle, status, key, responses, required);
        ledger.publish_oracle_event(LedgerEvent::OracleReport {
            index,
            flight_key: key.flight_key.clone(),
            status,
            oracle: oracle.clone(),
        })?;

        if !reached {
            return Ok(SubmitOutcome::Accepted {
                status,
                responses,
                required,
            });
        }

        let (outcome, final_status) = match ledger.resolve_flight(&key.flight_key, status)? {
            Resolution::Resolved { status, credited } => {
                (SubmitOutcome::Resolved { status, credited }, status)
            }
            Resolution::AlreadyResolved(existing) => {
                (SubmitOutcome::Finalized { status: existing }, existing)
            }
        };
        self.close_requests_for(&key.flight_key, final_status);
        Ok(outcome)
    }

    /// Arquiva todas as requisições abertas de um voo resolvido.
    fn close_requests_for(&mut self, flight_key: &FlightKey, status: FlightStatus) {
        for request in self
            .requests
            .values_mut()
            .filter(|r| r.open && &r.key.flight_key == flight_key)
        {
            request.close(status);
            info!("🔒 Requisição {} encerrada como {}", request.key, status);
        }
    }

    /// Drena as evidências de equivocação coletadas desde a última chamada.
    pub fn take_evidence(&mut self) -> Vec<EquivocationEvidence> {
        self.pending_evidence.drain(..).collect()
    }
}
