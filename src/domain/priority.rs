//! Blockchain priority table

use serde::Deserialize;
use std::collections::HashMap;

use super::balance::Blockchain;

/// Priority assigned to chains missing from the table
pub const UNRANKED_PRIORITY: i32 = -99;

/// Mapping blockchain -> display priority (higher sorts first)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, i32>")]
pub struct PriorityTable {
    priorities: HashMap<String, i32>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::from_pairs([
            ("Osmosis", 100),
            ("Ethereum", 50),
            ("Arbitrum", 30),
            ("Zilliqa", 20),
            ("Neo", 20),
        ])
    }
}

impl From<HashMap<String, i32>> for PriorityTable {
    fn from(priorities: HashMap<String, i32>) -> Self {
        Self { priorities }
    }
}

impl PriorityTable {
    /// Empty table: every chain is unranked
    pub fn empty() -> Self {
        Self {
            priorities: HashMap::new(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self {
            priorities: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Priority of a chain, [`UNRANKED_PRIORITY`] when unknown. Never fails.
    pub fn priority_of(&self, blockchain: &Blockchain) -> i32 {
        self.priorities
            .get(blockchain.as_str())
            .copied()
            .unwrap_or(UNRANKED_PRIORITY)
    }

    pub fn is_ranked(&self, blockchain: &Blockchain) -> bool {
        self.priority_of(blockchain) > UNRANKED_PRIORITY
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.priorities.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(id: &str) -> Blockchain {
        Blockchain::new(id).unwrap()
    }

    #[test]
    fn test_default_priorities() {
        let table = PriorityTable::default();
        assert_eq!(table.priority_of(&chain("Osmosis")), 100);
        assert_eq!(table.priority_of(&chain("Ethereum")), 50);
        assert_eq!(table.priority_of(&chain("Arbitrum")), 30);
        assert_eq!(table.priority_of(&chain("Zilliqa")), 20);
        assert_eq!(table.priority_of(&chain("Neo")), 20);
    }

    #[test]
    fn test_unknown_chain_is_sentinel() {
        let table = PriorityTable::default();
        assert_eq!(table.priority_of(&chain("Solana")), UNRANKED_PRIORITY);
        assert!(!table.is_ranked(&chain("Solana")));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = PriorityTable::default();
        assert!(!table.is_ranked(&chain("osmosis")));
    }

    #[test]
    fn test_deserialize_from_toml_table() {
        let table: PriorityTable = toml::from_str("Osmosis = 7\nNeo = 3").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.priority_of(&chain("Osmosis")), 7);
        assert_eq!(table.priority_of(&chain("Ethereum")), UNRANKED_PRIORITY);
    }
}
