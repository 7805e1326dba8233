//! Single-writer runtime: owns the ledger and both consensus engines and
//! applies one [`Call`](surety_common::requests::Call) at a time.

mod dispatcher;
mod response;
pub mod script;

pub use dispatcher::{Runtime, GENESIS_CALL_ID};
pub use response::Response;
