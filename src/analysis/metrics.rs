use serde::Serialize;

use super::{
    cluster::{ClusterLabel, ClusterPresence},
    market::MarketCounts,
    proximity::{BankIntensity, GapAnalysis},
    regions::RegionSplit,
    stats::mean,
};
use crate::{dataset::Branch, geo::BoundingBox};

/// Raw comparison metrics of one bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankProfile {
    pub bank: String,
    pub branches: usize,
    /// Latitude range plus longitude range, in degrees.
    pub geo_spread: f64,
    pub baku_pct: f64,
    pub avg_intensity: f64,
}

impl BankProfile {
    pub fn values(&self) -> [f64; 4] {
        [
            self.branches as f64,
            self.geo_spread,
            self.baku_pct,
            self.avg_intensity,
        ]
    }
}

pub const PROFILE_METRICS: [&str; 4] = [
    "Branch Count",
    "Geographic Spread",
    "Baku Focus",
    "Competitive Intensity",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiMetric {
    pub profiles: Vec<BankProfile>,
    /// `profiles` with every metric scaled to 100 against its maximum.
    pub normalized: Vec<[f64; 4]>,
}

impl MultiMetric {
    /// The five largest banks, or the four largest and the focus bank when it
    /// is not among them.
    pub fn new(
        branches: &[Branch],
        counts: &MarketCounts,
        splits: &[RegionSplit],
        intensity: &[BankIntensity],
        focus_bank: &str,
    ) -> Self {
        let mut banks: Vec<&str> = counts.top(5).iter().map(|b| b.bank.as_str()).collect();
        if !banks.contains(&focus_bank) && counts.get(focus_bank).is_some() {
            banks.truncate(4);
            banks.push(focus_bank);
        }

        let profiles: Vec<BankProfile> = banks
            .into_iter()
            .map(|bank| {
                let spread = BoundingBox::around(
                    branches.iter().filter(|b| b.bank == bank).map(|b| &b.coord),
                )
                .map_or(0.0, |b| b.lat_span() + b.long_span());
                BankProfile {
                    bank: bank.to_string(),
                    branches: counts.count_of(bank),
                    geo_spread: spread,
                    baku_pct: splits
                        .iter()
                        .find(|s| s.bank == bank)
                        .map_or(0.0, RegionSplit::baku_pct),
                    avg_intensity: intensity
                        .iter()
                        .find(|i| i.bank == bank)
                        .map_or(0.0, BankIntensity::average),
                }
            })
            .collect();

        let mut max = [0.0f64; 4];
        for profile in &profiles {
            for (m, v) in max.iter_mut().zip(profile.values()) {
                *m = m.max(v);
            }
        }
        let normalized = profiles
            .iter()
            .map(|p| {
                let mut values = p.values();
                for (v, m) in values.iter_mut().zip(max) {
                    if m > 0.0 {
                        *v = *v / m * 100.0;
                    }
                }
                values
            })
            .collect();
        Self {
            profiles,
            normalized,
        }
    }
}

/// Focus bank figures next to the per-bank industry averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryBenchmark {
    pub avg_branches: f64,
    pub avg_share: f64,
    pub avg_regional_pct: f64,
    pub focus_branches: usize,
    pub focus_share: f64,
    pub focus_regional_pct: f64,
}

impl IndustryBenchmark {
    pub fn new(counts: &MarketCounts, splits: &[RegionSplit], focus_bank: &str) -> Self {
        let bank_count = counts.banks.len().max(1) as f64;
        let regional: Vec<f64> = splits.iter().map(RegionSplit::regional_pct).collect();
        Self {
            avg_branches: counts.total as f64 / bank_count,
            avg_share: 100.0 / bank_count,
            avg_regional_pct: mean(&regional).unwrap_or(0.0),
            focus_branches: counts.count_of(focus_bank),
            focus_share: counts.share_of(focus_bank),
            focus_regional_pct: splits
                .iter()
                .find(|s| s.bank == focus_bank)
                .map_or(0.0, RegionSplit::regional_pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionSummary {
    pub gap_sites: usize,
    /// Clusters, outliers excluded, where the focus share is below the
    /// underserved threshold.
    pub underserved_clusters: usize,
    /// Regional branches of the bank strongest in the regions minus the
    /// focus bank's.
    pub regional_gap: usize,
}

impl ExpansionSummary {
    pub fn new(
        gaps: &GapAnalysis,
        presence: &[ClusterPresence],
        splits: &[RegionSplit],
        focus_bank: &str,
        underserved_share: f64,
    ) -> Self {
        let focus_regions = splits
            .iter()
            .find(|s| s.bank == focus_bank)
            .map_or(0, |s| s.regions);
        let max_regions = splits.iter().map(|s| s.regions).max().unwrap_or(0);
        Self {
            gap_sites: gaps.len(),
            underserved_clusters: presence
                .iter()
                .filter(|p| p.label != ClusterLabel::Noise && p.focus_share() < underserved_share)
                .count(),
            regional_gap: max_regions.saturating_sub(focus_regions),
        }
    }
}

/// Relative weight of each growth phase, in percent.
pub const PHASE_SPLIT: [usize; 3] = [40, 35, 25];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPath {
    pub target_share: f64,
    pub target_branches: usize,
    pub needed: usize,
    pub phases: [usize; 3],
    /// Branches needed to reach the fifth largest bank, `None` with fewer
    /// than five banks.
    pub to_match_fifth: Option<usize>,
}

impl GrowthPath {
    pub fn new(counts: &MarketCounts, focus_bank: &str, target_share: f64) -> Self {
        let focus = counts.count_of(focus_bank);
        let target_branches = (counts.total as f64 * target_share).floor() as usize;
        let needed = target_branches.saturating_sub(focus);
        Self {
            target_share,
            target_branches,
            needed,
            phases: PHASE_SPLIT.map(|pct| needed * pct / 100),
            to_match_fifth: counts
                .banks
                .get(4)
                .map(|fifth| fifth.branches.saturating_sub(focus)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{proximity::competitive_intensity, regions::region_splits};

    fn market() -> Vec<Branch> {
        let mut branches = Vec::new();
        for (bank, n) in [("A", 6), ("B", 5), ("C", 4), ("D", 3), ("E", 2), ("Focus", 1)] {
            for i in 0..n {
                branches.push(Branch::new(bank, 40.4, 49.8 + i as f64 * 0.5));
            }
        }
        branches
    }

    #[test]
    fn focus_replaces_fifth_bank_in_profiles() {
        let branches = market();
        let counts = MarketCounts::from_banks(branches.iter().map(|b| b.bank.as_str()));
        let baku = BoundingBox::new(40.3, 40.5, 49.7, 50.0);
        let splits = region_splits(&branches, &counts, &baku);
        let intensity = competitive_intensity(&branches, &counts, 0.1);
        let metric = MultiMetric::new(&branches, &counts, &splits, &intensity, "Focus");

        let banks: Vec<&str> = metric.profiles.iter().map(|p| p.bank.as_str()).collect();
        assert_eq!(banks, vec!["A", "B", "C", "D", "Focus"]);
        assert_eq!(metric.normalized[0][0], 100.0);
        assert!((metric.profiles[0].geo_spread - 2.5).abs() < 1e-9);
        assert_eq!(metric.normalized[4][1], 0.0);
        assert_eq!(metric.profiles[4].baku_pct, 100.0);
    }

    #[test]
    fn growth_path_splits_needed_branches_into_phases() {
        let branches = market();
        let counts = MarketCounts::from_banks(branches.iter().map(|b| b.bank.as_str()));
        let path = GrowthPath::new(&counts, "Focus", 0.25);
        // 21 branches, 25 % target is 5
        assert_eq!(path.target_branches, 5);
        assert_eq!(path.needed, 4);
        assert_eq!(path.phases, [1, 1, 1]);
        assert_eq!(path.to_match_fifth, Some(1));

        let path = GrowthPath::new(&counts, "A", 0.10);
        assert_eq!(path.needed, 0);
        assert_eq!(path.to_match_fifth, Some(0));
    }

    #[test]
    fn benchmark_uses_per_bank_averages() {
        let branches = vec![
            Branch::new("Focus", 40.4, 49.8),
            Branch::new("Other", 40.4, 49.8),
            Branch::new("Other", 38.7, 48.8),
            Branch::new("Other", 38.8, 48.8),
        ];
        let counts = MarketCounts::from_banks(branches.iter().map(|b| b.bank.as_str()));
        let baku = BoundingBox::new(40.3, 40.5, 49.7, 50.0);
        let splits = region_splits(&branches, &counts, &baku);
        let bench = IndustryBenchmark::new(&counts, &splits, "Focus");
        assert_eq!(bench.avg_branches, 2.0);
        assert_eq!(bench.avg_share, 50.0);
        assert!((bench.avg_regional_pct - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(bench.focus_regional_pct, 0.0);
    }

    #[test]
    fn outliers_never_count_as_underserved() {
        let presence = vec![
            ClusterPresence { label: ClusterLabel::Noise, total: 10, focus: 0 },
            ClusterPresence { label: ClusterLabel::Cluster(0), total: 40, focus: 1 },
            ClusterPresence { label: ClusterLabel::Cluster(1), total: 10, focus: 1 },
        ];
        let splits = vec![
            RegionSplit { bank: "Focus".into(), baku: 5, regions: 1 },
            RegionSplit { bank: "Other".into(), baku: 2, regions: 9 },
        ];
        let gaps = GapAnalysis { threshold: 0.3, sites: Vec::new() };
        let summary = ExpansionSummary::new(&gaps, &presence, &splits, "Focus", 5.0);
        assert_eq!(summary.underserved_clusters, 1);
        assert_eq!(summary.regional_gap, 8);
        assert_eq!(summary.gap_sites, 0);
    }
}
