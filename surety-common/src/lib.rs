//! Shared types for the flight surety ledger: identities, flight keys,
//! statuses, domain events, the tagged call surface and the error taxonomy.

pub mod crypto;
pub mod error;
pub mod events;
pub mod flight;
pub mod requests;
pub mod utils;

pub use error::{Result, SuretyError};
pub use events::LedgerEvent;
pub use flight::{FlightKey, FlightStatus};
pub use utils::AccountId;

/// Monetary amounts are integer minor units of the settlement currency.
pub type Amount = u64;
