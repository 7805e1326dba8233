pub mod key;
pub mod status;

pub use key::FlightKey;
pub use status::FlightStatus;
