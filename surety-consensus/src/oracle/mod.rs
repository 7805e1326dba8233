//! Oracle side of flight resolution: the registry of oracles and their
//! assigned indexes, open status requests, and the engine that turns a
//! quorum of matching responses into a flight status.

mod engine;
mod policy;
mod registry;
mod request;

pub use engine::{OracleEngine, RejectReason, SubmitOutcome};
pub use policy::OraclePolicy;
pub use registry::OracleRegistry;
pub use request::{OracleRequest, RequestKey};
