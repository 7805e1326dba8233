use thiserror::Error;

/// Every failure the core can report. All of them are recoverable: the caller
/// fixes its input or waits for more votes/responses, and a rejected call
/// leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuretyError {
    /// Caller lacks the required role or funding.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Duplicate flight: {0}")]
    DuplicateFlight(String),

    #[error("Duplicate vote: {0}")]
    DuplicateVote(String),

    #[error("Not registered: {0}")]
    NotRegistered(String),

    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    #[error("Oracle request not found: {0}")]
    RequestNotFound(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Insurance cap exceeded: {0}")]
    ExceedsCap(String),

    #[error("Flight already resolved: {0}")]
    FlightAlreadyResolved(String),

    #[error("Nothing to withdraw: {0}")]
    NothingToWithdraw(String),

    #[error("Oracle not authorized for index: {0}")]
    OracleNotAuthorizedForIndex(String),

    /// The ledger has been paused by its owner.
    #[error("Ledger is not operational: {0}")]
    NotOperational(String),

    /// The call failed stateless validation at the boundary.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),
}

pub type Result<T> = std::result::Result<T, SuretyError>;

impl SuretyError {
    /// Stable machine-readable name, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            SuretyError::NotAuthorized(_) => "NotAuthorized",
            SuretyError::AlreadyRegistered(_) => "AlreadyRegistered",
            SuretyError::DuplicateFlight(_) => "DuplicateFlight",
            SuretyError::DuplicateVote(_) => "DuplicateVote",
            SuretyError::NotRegistered(_) => "NotRegistered",
            SuretyError::FlightNotFound(_) => "FlightNotFound",
            SuretyError::RequestNotFound(_) => "RequestNotFound",
            SuretyError::InsufficientFunds(_) => "InsufficientFunds",
            SuretyError::ExceedsCap(_) => "ExceedsCap",
            SuretyError::FlightAlreadyResolved(_) => "FlightAlreadyResolved",
            SuretyError::NothingToWithdraw(_) => "NothingToWithdraw",
            SuretyError::OracleNotAuthorizedForIndex(_) => "OracleNotAuthorizedForIndex",
            SuretyError::NotOperational(_) => "NotOperational",
            SuretyError::InvalidRequest(_) => "InvalidRequest",
            SuretyError::AmountOverflow(_) => "AmountOverflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant_name() {
        let err = SuretyError::ExceedsCap("flight abc".into());
        assert_eq!(err.kind(), "ExceedsCap");
        assert_eq!(err.to_string(), "Insurance cap exceeded: flight abc");
    }
}
