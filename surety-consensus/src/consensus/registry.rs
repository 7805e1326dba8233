use std::collections::{BTreeSet, HashMap};

use surety_common::{AccountId, FlightStatus};

/// What registering a response would do (or did) to a tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyCheck {
    /// New response; carries the count for its status once recorded.
    Fresh(usize),
    /// The oracle already reported this same status.
    Duplicate,
    /// The oracle already reported a different status.
    Conflict { first: FlightStatus },
}

/// Armazena as respostas de uma única requisição de oráculo.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseTally {
    // Status -> oracles that reported it
    by_status: HashMap<FlightStatus, BTreeSet<AccountId>>,

    // Oracle -> status it reported (one response per oracle)
    by_oracle: HashMap<AccountId, FlightStatus>,
}

impl ResponseTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifica uma resposta sem registrá-la.
    pub fn check(&self, oracle: &AccountId, status: FlightStatus) -> TallyCheck {
        match self.by_oracle.get(oracle) {
            Some(existing) if *existing == status => TallyCheck::Duplicate,
            Some(existing) => TallyCheck::Conflict { first: *existing },
            None => TallyCheck::Fresh(self.count(status) + 1),
        }
    }

    /// Registra uma resposta. Só respostas novas alteram a contagem.
    pub fn register(&mut self, oracle: &AccountId, status: FlightStatus) -> TallyCheck {
        let check = self.check(oracle, status);
        if let TallyCheck::Fresh(_) = check {
            self.by_oracle.insert(oracle.clone(), status);
            self.by_status.entry(status).or_default().insert(oracle.clone());
        }
        check
    }

    pub fn count(&self, status: FlightStatus) -> usize {
        self.by_status.get(&status).map_or(0, BTreeSet::len)
    }
}
