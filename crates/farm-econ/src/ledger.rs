//! Bounded record of applied economy actions, newest first.

use crate::ActionKind;
use serde::Serialize;
use std::collections::VecDeque;

/// Number of transactions the ledger keeps.
pub const LEDGER_CAPACITY: usize = 50;

/// One applied action and its effect on the balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Monotonic sequence number, starting at 1.
    pub seq: u64,
    pub kind: ActionKind,
    pub cash_delta: i64,
    pub stars_delta: i64,
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    entries: VecDeque<Transaction>,
    next_seq: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        kind: ActionKind,
        cash_delta: i64,
        stars_delta: i64,
        description: String,
    ) -> &Transaction {
        self.next_seq += 1;
        if self.entries.len() == LEDGER_CAPACITY {
            self.entries.pop_back();
        }
        self.entries.push_front(Transaction {
            seq: self.next_seq,
            kind,
            cash_delta,
            stars_delta,
            description,
        });
        &self.entries[0]
    }

    /// Transactions, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total ever recorded, including entries that fell off the window.
    pub fn total_recorded(&self) -> u64 {
        self.next_seq
    }

    /// Sum of cash deltas over the retained window.
    pub fn net_cash(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |acc, t| acc.saturating_add(t.cash_delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_with_sequence() {
        let mut ledger = Ledger::new();
        ledger.record(ActionKind::Plant, -1_000, 0, "Seeds planted".into());
        ledger.record(ActionKind::Harvest, 3_200, 0, "Harvest earnings".into());
        let seqs: Vec<u64> = ledger.iter().map(|t| t.seq).collect();
        assert_eq!(seqs, vec![2, 1]);
        assert_eq!(ledger.latest().unwrap().kind, ActionKind::Harvest);
        assert_eq!(ledger.net_cash(), 2_200);
    }

    #[test]
    fn window_is_bounded() {
        let mut ledger = Ledger::new();
        for _ in 0..(LEDGER_CAPACITY + 5) {
            ledger.record(ActionKind::Upgrade, -10_000, 0, "Farm upgrade".into());
        }
        assert_eq!(ledger.len(), LEDGER_CAPACITY);
        assert_eq!(ledger.total_recorded(), (LEDGER_CAPACITY + 5) as u64);
        assert_eq!(ledger.iter().last().unwrap().seq, 6);
    }
}
