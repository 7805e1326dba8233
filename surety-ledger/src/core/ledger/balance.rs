use std::collections::HashMap;

use surety_common::{AccountId, Amount, Result};

use crate::checked_add;

/// Saldos sacáveis de companhias aéreas e passageiros.
#[derive(Debug, Clone, Default)]
pub(crate) struct BalanceLedger {
    balances: HashMap<AccountId, Amount>,
}

impl BalanceLedger {
    pub(crate) fn balance_of(&self, account: &AccountId) -> Amount {
        *self.balances.get(account).unwrap_or(&0)
    }

    /// Balance after crediting `amount`, without applying it.
    pub(crate) fn preview_credit(&self, account: &AccountId, amount: Amount) -> Result<Amount> {
        checked_add(self.balance_of(account), amount, "withdrawable balance")
    }

    pub(crate) fn set(&mut self, account: &AccountId, balance: Amount) {
        self.balances.insert(account.clone(), balance);
    }

    /// Zera o saldo e retorna o valor que havia.
    pub(crate) fn take(&mut self, account: &AccountId) -> Amount {
        self.balances.remove(account).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_zeroes_balance() {
        let mut balances = BalanceLedger::default();
        let p = AccountId::from("p1");
        let next = balances.preview_credit(&p, 15).unwrap();
        balances.set(&p, next);

        assert_eq!(balances.take(&p), 15);
        assert_eq!(balances.balance_of(&p), 0);
        assert_eq!(balances.take(&p), 0);
    }

    #[test]
    fn test_preview_detects_overflow() {
        let mut balances = BalanceLedger::default();
        let p = AccountId::from("p1");
        balances.set(&p, Amount::MAX);
        assert!(balances.preview_credit(&p, 1).is_err());
        assert_eq!(balances.balance_of(&p), Amount::MAX);
    }
}
