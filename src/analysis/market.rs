use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankCount {
    pub bank: String,
    pub branches: usize,
    /// Percent of all branches in the counted set.
    pub share: f64,
}

/// Branch counts per bank, largest first. Equal counts keep the order in
/// which the banks first appeared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketCounts {
    pub total: usize,
    pub banks: Vec<BankCount>,
}

impl MarketCounts {
    pub fn from_banks<'a>(banks: impl IntoIterator<Item = &'a str>) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for bank in banks {
            let count = counts.entry(bank).or_insert(0);
            if *count == 0 {
                order.push(bank);
            }
            *count += 1;
        }
        let total: usize = counts.values().sum();
        let mut banks: Vec<BankCount> = order
            .into_iter()
            .map(|bank| {
                let branches = counts[bank];
                BankCount {
                    bank: bank.to_string(),
                    branches,
                    share: branches as f64 / total as f64 * 100.0,
                }
            })
            .collect();
        banks.sort_by(|a, b| b.branches.cmp(&a.branches));
        Self { total, banks }
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn get(&self, bank: &str) -> Option<&BankCount> {
        self.banks.iter().find(|b| b.bank == bank)
    }

    pub fn count_of(&self, bank: &str) -> usize {
        self.get(bank).map_or(0, |b| b.branches)
    }

    pub fn share_of(&self, bank: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count_of(bank) as f64 / self.total as f64 * 100.0
    }

    /// One plus the number of banks with strictly more branches than `count`.
    pub fn rank_for(&self, count: usize) -> usize {
        self.banks.iter().filter(|b| b.branches > count).count() + 1
    }

    /// Rank of a bank present in the counts.
    pub fn rank_of(&self, bank: &str) -> Option<usize> {
        self.get(bank).map(|b| self.rank_for(b.branches))
    }

    pub fn leader(&self) -> Option<&BankCount> {
        self.banks.first()
    }

    pub fn top_excluding(&self, bank: &str, n: usize) -> Vec<&BankCount> {
        self.banks.iter().filter(|b| b.bank != bank).take(n).collect()
    }

    pub fn top(&self, n: usize) -> &[BankCount] {
        &self.banks[..n.min(self.banks.len())]
    }
}

/// Where the focus bank stands in the whole market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusPosition {
    pub bank: String,
    pub branches: usize,
    pub rank: usize,
    pub share: f64,
    pub bank_count: usize,
    pub leader: String,
    pub leader_branches: usize,
    pub gap_to_leader: usize,
}

impl FocusPosition {
    pub fn new(counts: &MarketCounts, bank: &str) -> Option<Self> {
        let focus = counts.get(bank)?;
        let leader = counts.leader()?;
        Some(Self {
            bank: bank.to_string(),
            branches: focus.branches,
            rank: counts.rank_for(focus.branches),
            share: focus.share,
            bank_count: counts.banks.len(),
            leader: leader.bank.clone(),
            leader_branches: leader.branches,
            gap_to_leader: leader.branches - focus.branches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> MarketCounts {
        MarketCounts::from_banks(["C", "A", "B", "A", "C", "A", "D", "B"])
    }

    #[test]
    fn counts_are_sorted_with_stable_ties() {
        let counts = counts();
        let order: Vec<(&str, usize)> = counts
            .banks
            .iter()
            .map(|b| (b.bank.as_str(), b.branches))
            .collect();
        assert_eq!(order, vec![("A", 3), ("C", 2), ("B", 2), ("D", 1)]);
        assert_eq!(counts.total, 8);
        assert!((counts.share_of("A") - 37.5).abs() < 1e-12);
    }

    #[test]
    fn rank_counts_strictly_larger_banks() {
        let counts = counts();
        assert_eq!(counts.rank_of("A"), Some(1));
        assert_eq!(counts.rank_of("B"), Some(2));
        assert_eq!(counts.rank_of("C"), Some(2));
        assert_eq!(counts.rank_of("D"), Some(4));
        assert_eq!(counts.rank_of("E"), None);
        assert_eq!(counts.count_of("E"), 0);
    }

    #[test]
    fn focus_position_reports_gap_to_leader() {
        let position = FocusPosition::new(&counts(), "B").unwrap();
        assert_eq!(position.rank, 2);
        assert_eq!(position.leader, "A");
        assert_eq!(position.gap_to_leader, 1);
        assert_eq!(position.bank_count, 4);
        assert!(FocusPosition::new(&counts(), "E").is_none());
    }

    #[test]
    fn top_competitors_skip_the_focus_bank() {
        let counts = counts();
        let top: Vec<&str> = counts
            .top_excluding("A", 2)
            .into_iter()
            .map(|b| b.bank.as_str())
            .collect();
        assert_eq!(top, vec!["C", "B"]);
        assert_eq!(counts.top(10).len(), 4);
    }
}
