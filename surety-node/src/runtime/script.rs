//! Replay of a JSON array of calls against a runtime.

use std::{fs, path::Path};

use serde::Serialize;

use surety_common::{requests::Call, AccountId, SuretyError};

use crate::error::NodeError;

use super::{Response, Runtime};

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
}

impl From<&SuretyError> for ErrorReport {
    fn from(e: &SuretyError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// One printed line per replayed call.
#[derive(Debug, Clone, Serialize)]
pub struct CallReport {
    pub step: usize,
    pub op: &'static str,
    pub caller: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<Call>, NodeError> {
    let data = fs::read_to_string(path)?;
    parse_script(&data)
}

pub fn parse_script(data: &str) -> Result<Vec<Call>, NodeError> {
    serde_json::from_str::<Vec<Call>>(data).map_err(|e| NodeError::Script(e.to_string()))
}

impl Runtime {
    /// Dispatches every call in order. A rejected call is reported and the
    /// replay moves on.
    pub fn replay(&mut self, calls: Vec<Call>) -> Vec<CallReport> {
        calls
            .into_iter()
            .enumerate()
            .map(|(step, call)| {
                let op = call.request.name();
                let caller = call.caller.clone();
                match self.dispatch(call) {
                    Ok(response) => CallReport {
                        step,
                        op,
                        caller,
                        response: Some(response),
                        error: None,
                    },
                    Err(e) => CallReport {
                        step,
                        op,
                        caller,
                        response: None,
                        error: Some(ErrorReport::from(&e)),
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let calls = parse_script(
            r#"[
                {"caller": "A0", "op": "fund_airline", "amount": 10},
                {"caller": "P", "op": "withdraw"}
            ]"#,
        )
        .unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].request.name(), "fund_airline");
        assert_eq!(calls[1].caller, AccountId::from("P"));
    }

    #[test]
    fn test_malformed_script() {
        let err = parse_script(r#"[{"caller": "A0", "op": "teleport"}]"#).unwrap_err();
        assert!(matches!(err, NodeError::Script(_)));
    }
}
