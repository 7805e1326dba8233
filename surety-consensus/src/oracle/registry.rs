use std::collections::HashMap;

use surety_common::{crypto::FieldHasher, AccountId, Result, SuretyError};

use super::policy::OraclePolicy;

/// Attempts at hash-derived indexes before falling back to the lowest free ones.
const MAX_DERIVATION_ATTEMPTS: u64 = 1024;

/// Oráculos registrados e os índices que cada um pode responder.
#[derive(Debug, Default, Clone)]
pub struct OracleRegistry {
    oracles: HashMap<AccountId, Vec<u8>>,
}

impl OracleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, oracle: &AccountId) -> bool {
        self.oracles.contains_key(oracle)
    }

    pub fn indexes(&self, oracle: &AccountId) -> Option<&[u8]> {
        self.oracles.get(oracle).map(Vec::as_slice)
    }

    pub fn get_my_indexes(&self, oracle: &AccountId) -> Result<&[u8]> {
        self.indexes(oracle)
            .ok_or_else(|| SuretyError::NotRegistered(format!("oracle {}", oracle)))
    }

    pub fn is_authorized(&self, oracle: &AccountId, index: u8) -> bool {
        self.indexes(oracle).map_or(false, |idx| idx.contains(&index))
    }

    /// Deterministic assignment: SHA-256 of (oracle, attempt) until enough
    /// distinct indexes are collected.
    pub fn derive_indexes(policy: &OraclePolicy, oracle: &AccountId) -> Vec<u8> {
        let wanted = policy.indexes_per_oracle.min(usize::from(policy.index_space));
        let mut indexes = Vec::with_capacity(wanted);

        let mut attempt = 0;
        while indexes.len() < wanted && attempt < MAX_DERIVATION_ATTEMPTS {
            let digest = FieldHasher::new().str(oracle.as_str()).u64(attempt).finish();
            let index = policy.index_from_byte(digest[0]);
            if !indexes.contains(&index) {
                indexes.push(index);
            }
            attempt += 1;
        }

        let mut fallback = 0u16;
        while indexes.len() < wanted && fallback < policy.index_space {
            let index = fallback as u8;
            if !indexes.contains(&index) {
                indexes.push(index);
            }
            fallback += 1;
        }
        indexes
    }

    /// Checks an explicit assignment: distinct, in range, exactly
    /// `indexes_per_oracle` entries.
    pub fn check_indexes(policy: &OraclePolicy, indexes: &[u8]) -> Result<()> {
        if indexes.len() != policy.indexes_per_oracle {
            return Err(SuretyError::InvalidRequest(format!(
                "expected {} indexes, got {}",
                policy.indexes_per_oracle,
                indexes.len()
            )));
        }
        for (i, index) in indexes.iter().enumerate() {
            if !policy.contains_index(*index) {
                return Err(SuretyError::InvalidRequest(format!(
                    "index {} is outside 0..{}",
                    index, policy.index_space
                )));
            }
            if indexes[..i].contains(index) {
                return Err(SuretyError::InvalidRequest(format!("index {} assigned twice", index)));
            }
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, oracle: AccountId, indexes: Vec<u8>) {
        self.oracles.insert(oracle, indexes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_indexes_are_distinct_and_in_range() {
        let policy = OraclePolicy::default();
        for n in 0..50 {
            let oracle = AccountId::new(format!("oracle-{}", n));
            let indexes = OracleRegistry::derive_indexes(&policy, &oracle);
            assert_eq!(indexes.len(), 3);
            assert!(indexes.iter().all(|i| *i < 10));
            OracleRegistry::check_indexes(&policy, &indexes).unwrap();
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let policy = OraclePolicy::default();
        let oracle = AccountId::from("oracle-1");
        assert_eq!(
            OracleRegistry::derive_indexes(&policy, &oracle),
            OracleRegistry::derive_indexes(&policy, &oracle)
        );
    }

    #[test]
    fn test_full_index_space() {
        let policy = OraclePolicy { index_space: 3, indexes_per_oracle: 3, ..OraclePolicy::default() };
        let mut indexes = OracleRegistry::derive_indexes(&policy, &"o".into());
        indexes.sort();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_check_indexes() {
        let policy = OraclePolicy::default();
        assert!(OracleRegistry::check_indexes(&policy, &[1, 2, 3]).is_ok());
        assert!(OracleRegistry::check_indexes(&policy, &[1, 1, 3]).is_err());
        assert!(OracleRegistry::check_indexes(&policy, &[1, 2, 10]).is_err());
        assert!(OracleRegistry::check_indexes(&policy, &[1, 2]).is_err());
    }

    #[test]
    fn test_authorization() {
        let mut registry = OracleRegistry::new();
        registry.insert("o1".into(), vec![1, 4, 7]);

        assert!(registry.is_authorized(&"o1".into(), 4));
        assert!(!registry.is_authorized(&"o1".into(), 5));
        assert!(!registry.is_authorized(&"o2".into(), 4));
        assert_eq!(registry.get_my_indexes(&"o1".into()).unwrap(), &[1, 4, 7]);
        assert!(matches!(
            registry.get_my_indexes(&"o2".into()),
            Err(SuretyError::NotRegistered(_))
        ));
    }
}
