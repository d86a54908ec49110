//! Aggregation of per-card win checks.

use alloc::vec::Vec;

use super::card::CardToken;

/// Result of checking a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Winner,
    NotWinner,
    /// The check could not be completed. Counted as not a winner.
    Failed,
}

impl CheckOutcome {
    pub fn is_winner(&self) -> bool {
        matches!(self, CheckOutcome::Winner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCheck {
    /// Position of the card in the held card list.
    pub index: usize,
    pub token: CardToken,
    pub outcome: CheckOutcome,
}

/// Outcome of one win-check batch, in card order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinReport {
    checks: Vec<CardCheck>,
}

impl WinReport {
    /// Build a report from checks in any order. Checks are sorted by card
    /// index so completion order never leaks into the result.
    pub fn new(mut checks: Vec<CardCheck>) -> Self {
        checks.sort_by_key(|check| check.index);
        Self { checks }
    }

    pub fn checks(&self) -> &[CardCheck] {
        &self.checks
    }

    /// Winning cards, ordered by card index.
    pub fn winners(&self) -> impl Iterator<Item = &CardCheck> {
        self.checks.iter().filter(|check| check.outcome.is_winner())
    }

    pub fn has_winner(&self) -> bool {
        self.winners().next().is_some()
    }

    pub fn winning_indices(&self) -> Vec<usize> {
        self.winners().map(|check| check.index).collect()
    }

    /// Number of checks that failed and were counted as not winning.
    pub fn failed(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.outcome == CheckOutcome::Failed)
            .count()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
