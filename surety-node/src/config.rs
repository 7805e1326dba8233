use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use surety_common::AccountId;
use surety_consensus::{AdmissionPolicy, OraclePolicy};
use surety_ledger::{Genesis, InsurancePolicy};

use crate::{error::NodeError, runtime::Runtime};

pub const DEFAULT_LOG_FILTER: &str = "info,surety_node=debug";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Overrides `RUST_LOG` when set.
    #[serde(default)]
    pub filter: Option<String>,
    /// File receiving the `events` target.
    #[serde(default)]
    pub audit_file: Option<String>,
}

impl LogConfig {
    pub fn filter_or_default(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_owner")]
    pub owner: AccountId,
    #[serde(default = "default_genesis_airline")]
    pub genesis_airline: AccountId,
    #[serde(default)]
    pub admission: AdmissionPolicy,
    #[serde(default)]
    pub insurance: InsurancePolicy,
    #[serde(default)]
    pub oracle: OraclePolicy,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_owner() -> AccountId {
    AccountId::from("owner")
}

fn default_genesis_airline() -> AccountId {
    AccountId::from("airline-0")
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            genesis_airline: default_genesis_airline(),
            admission: AdmissionPolicy::default(),
            insurance: InsurancePolicy::default(),
            oracle: OraclePolicy::default(),
            log: LogConfig::default(),
        }
    }
}

impl NodeConfig {
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.owner.is_empty() {
            return Err(NodeError::Config("owner must not be empty".into()));
        }
        if self.genesis_airline.is_empty() {
            return Err(NodeError::Config("genesis_airline must not be empty".into()));
        }
        self.admission
            .validate()
            .and_then(|_| self.insurance.validate())
            .and_then(|_| self.oracle.validate())
            .map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn genesis(&self) -> Genesis {
        Genesis::new(self.owner.clone(), self.genesis_airline.clone())
            .with_policy(self.insurance.clone())
    }

    /// Validates the config and builds a runtime from its genesis.
    pub fn build_runtime(&self) -> Result<Runtime, NodeError> {
        self.validate()?;
        Runtime::new(self.genesis(), self.admission, self.oracle)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, json)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, NodeError> {
        let data = fs::read_to_string(path)?;
        let parsed = serde_json::from_str::<NodeConfig>(&data)?;
        parsed.validate()?;
        Ok(parsed)
    }
}
