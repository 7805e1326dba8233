pub mod request;
pub mod validation;

pub use request::{Call, Request};
