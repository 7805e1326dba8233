//! Multiparty decisions over the ledger: airline admission by vote among
//! registered airlines, and flight status resolution by oracle quorum.

pub mod admission;
pub mod consensus;
pub mod oracle;

pub use admission::{AdmissionEngine, AdmissionOutcome, AdmissionPolicy};
pub use consensus::evaluator::{ConsensusEvaluator, QuorumPolicy};
pub use consensus::evidence::EquivocationEvidence;
pub use oracle::{OracleEngine, OraclePolicy, RejectReason, SubmitOutcome};
