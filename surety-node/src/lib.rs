pub mod cli;
pub mod config;
pub mod error;
pub mod relay;
pub mod runtime;

pub use config::NodeConfig;
pub use error::NodeError;
pub use relay::{EventEnvelope, EventRelay, EventSink, LogSink};
pub use runtime::{Response, Runtime, GENESIS_CALL_ID};
