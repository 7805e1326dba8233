use surety_common::{AccountId, LedgerEvent, Result, SuretyError};
use tracing::{info, warn};

use crate::Ledger;

impl Ledger {
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Pauses or resumes every mutating operation. Owner only.
    pub fn set_operating_status(&mut self, caller: &AccountId, operational: bool) -> Result<bool> {
        if caller != &self.owner {
            warn!("⛔ {} tentou alterar o status operacional", caller);
            return Err(SuretyError::NotAuthorized(format!(
                "{} is not the ledger owner",
                caller
            )));
        }

        if self.operational != operational {
            self.operational = operational;
            info!("🔧 Operating status changed: operational={}", operational);
            self.emit(LedgerEvent::OperationalStatusChanged { operational });
        }
        Ok(self.operational)
    }

    /// Guarda das operações que alteram estado.
    pub fn require_operational(&self) -> Result<()> {
        if !self.operational {
            return Err(SuretyError::NotOperational("ledger is paused by its owner".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Genesis;

    #[test]
    fn test_only_owner_can_pause() {
        let mut ledger = Ledger::from_genesis(Genesis::new("owner", "a0")).unwrap();
        let stranger = AccountId::from("stranger");

        assert!(matches!(
            ledger.set_operating_status(&stranger, false),
            Err(SuretyError::NotAuthorized(_))
        ));
        assert!(ledger.is_operational());

        let owner = AccountId::from("owner");
        assert_eq!(ledger.set_operating_status(&owner, false), Ok(false));
        assert!(matches!(ledger.require_operational(), Err(SuretyError::NotOperational(_))));

        assert_eq!(ledger.set_operating_status(&owner, true), Ok(true));
        assert!(ledger.require_operational().is_ok());
    }

    #[test]
    fn test_unchanged_status_emits_nothing() {
        let mut ledger = Ledger::from_genesis(Genesis::new("owner", "a0")).unwrap();
        ledger.drain_events();
        ledger.set_operating_status(&AccountId::from("owner"), true).unwrap();
        assert!(ledger.pending_events().is_empty());
    }
}
