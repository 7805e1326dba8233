use std::collections::HashSet;

use crate::{
    error::{Result, SuretyError},
    FlightStatus,
};

use super::request::{Call, Request};

/// Longest flight code or airport identifier accepted at the boundary.
pub const MAX_IDENTIFIER_LEN: usize = 64;

impl Call {
    /// Stateless shape checks; stateful preconditions are the ledger's job.
    pub fn validate(&self) -> Result<()> {
        if self.caller.is_empty() {
            return Err(SuretyError::InvalidRequest("caller identity must be set".into()));
        }
        self.request.validate()
    }
}

impl Request {
    pub fn validate(&self) -> Result<()> {
        match self {
            Request::RegisterAirline { candidate } => {
                if candidate.is_empty() {
                    return Err(SuretyError::InvalidRequest("candidate airline must be set".into()));
                }
                Ok(())
            }
            Request::RegisterFlight {
                flight_code,
                departure,
                destination,
                ..
            } => {
                identifier("flight code", flight_code)?;
                identifier("departure", departure)?;
                identifier("destination", destination)
            }
            Request::BuyInsurance {
                flight_code,
                destination,
                amount,
                ..
            } => {
                identifier("flight code", flight_code)?;
                identifier("destination", destination)?;
                positive("insurance amount", *amount)
            }
            Request::RegisterOracle { indexes, .. } => {
                if let Some(indexes) = indexes {
                    distinct_indexes(indexes)?;
                }
                Ok(())
            }
            Request::RequestStatusUpdate {
                flight_code,
                destination,
                ..
            }
            | Request::GetFlightKey {
                flight_code,
                destination,
                ..
            } => {
                identifier("flight code", flight_code)?;
                identifier("destination", destination)
            }
            Request::SubmitOracleResponse {
                flight_code,
                destination,
                status_code,
                ..
            } => {
                identifier("flight code", flight_code)?;
                identifier("destination", destination)?;
                reported_status(*status_code).map(|_| ())
            }
            Request::IsAirlineRegistered { airline } | Request::IsAirlineFunded { airline } => {
                if airline.is_empty() {
                    return Err(SuretyError::InvalidRequest("airline must be set".into()));
                }
                Ok(())
            }
            Request::GetPassengerPaidAmount { passenger, .. } => {
                if passenger.is_empty() {
                    return Err(SuretyError::InvalidRequest("passenger must be set".into()));
                }
                Ok(())
            }
            Request::BalanceOf { account } => {
                if account.is_empty() {
                    return Err(SuretyError::InvalidRequest("account must be set".into()));
                }
                Ok(())
            }
            Request::FundAirline { .. }
            | Request::Withdraw
            | Request::SetOperatingStatus { .. }
            | Request::IsOperational
            | Request::RegisteredAirlineCount
            | Request::IsFlightRegistered { .. }
            | Request::GetFlight { .. }
            | Request::FlightKeyAt { .. }
            | Request::GetRegisteredFlightsCount
            | Request::GetMyIndexes
            | Request::ActiveFlights => Ok(()),
        }
    }
}

/// Decodes a status code submitted by an oracle. `Unknown` is not a report.
pub fn reported_status(code: u8) -> Result<FlightStatus> {
    match FlightStatus::try_from(code) {
        Ok(FlightStatus::Unknown) => Err(SuretyError::InvalidRequest(
            "status code 0 (Unknown) cannot be reported".into(),
        )),
        Ok(status) => Ok(status),
        Err(()) => Err(SuretyError::InvalidRequest(format!("unknown status code {}", code))),
    }
}

fn identifier(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SuretyError::InvalidRequest(format!("{} must not be empty", field)));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(SuretyError::InvalidRequest(format!(
            "{} too long (max {} bytes)",
            field, MAX_IDENTIFIER_LEN
        )));
    }
    Ok(())
}

fn positive(field: &str, amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(SuretyError::InvalidRequest(format!("{} must be greater than 0", field)));
    }
    Ok(())
}

fn distinct_indexes(indexes: &[u8]) -> Result<()> {
    if indexes.is_empty() {
        return Err(SuretyError::InvalidRequest("oracle indexes must not be empty".into()));
    }
    let unique: HashSet<&u8> = indexes.iter().collect();
    if unique.len() != indexes.len() {
        return Err(SuretyError::InvalidRequest("oracle indexes must be distinct".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountId;

    #[test]
    fn test_rejects_empty_caller() {
        let call = Call::new("", Request::Withdraw);
        assert!(matches!(call.validate(), Err(SuretyError::InvalidRequest(_))));
    }

    #[test]
    fn test_rejects_zero_purchase() {
        let req = Request::BuyInsurance {
            flight_code: "MS653".into(),
            destination: "HBE".into(),
            timestamp: 1,
            amount: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_funding_amount_left_to_ledger() {
        // The minimum is a ledger policy, so zero is not a shape error.
        assert!(Request::FundAirline { amount: 0 }.validate().is_ok());
        let req = Request::RegisterFlight {
            flight_code: "MS653".into(),
            timestamp: 1,
            insurance_cap: 0,
            departure: "RUH".into(),
            destination: "HBE".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_flight_code() {
        let req = Request::RegisterFlight {
            flight_code: "  ".into(),
            timestamp: 1,
            insurance_cap: 5,
            departure: "RUH".into(),
            destination: "HBE".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_code_decoding() {
        assert_eq!(reported_status(20), Ok(FlightStatus::LateAirline));
        assert!(reported_status(0).is_err());
        assert!(reported_status(7).is_err());
    }

    #[test]
    fn test_duplicate_indexes_rejected() {
        let req = Request::RegisterOracle { fee: 1, indexes: Some(vec![1, 1, 2]) };
        assert!(req.validate().is_err());
        let req = Request::RegisterOracle { fee: 1, indexes: Some(vec![1, 2, 3]) };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_valid_call_passes() {
        let call = Call::new(
            AccountId::from("airline-0"),
            Request::RegisterAirline { candidate: AccountId::from("airline-1") },
        );
        assert!(call.validate().is_ok());
    }
}
