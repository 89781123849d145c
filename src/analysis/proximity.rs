use serde::Serialize;

use super::{
    market::MarketCounts,
    stats::{Histogram, as_f64, mean, median},
};
use crate::{
    dataset::Branch,
    geo::{Coord, SpatialIndex},
};

/// A competitor branch and its distance to the nearest focus branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapSite {
    pub bank: String,
    pub coord: Coord,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    pub threshold: f64,
    /// Competitor branches beyond the threshold, farthest first.
    pub sites: Vec<GapSite>,
}

impl GapAnalysis {
    pub fn new(focus: &[&Branch], competitors: &[&Branch], threshold: f64) -> Self {
        let focus_coords: Vec<Coord> = focus.iter().map(|b| b.coord).collect();
        let index = SpatialIndex::new(&focus_coords);
        let mut sites: Vec<GapSite> = competitors
            .iter()
            .filter_map(|b| {
                let (_, distance) = index.nearest(&b.coord)?;
                (distance > threshold).then(|| GapSite {
                    bank: b.bank.clone(),
                    coord: b.coord,
                    distance,
                })
            })
            .collect();
        sites.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        Self { threshold, sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn top(&self, n: usize) -> &[GapSite] {
        &self.sites[..n.min(self.sites.len())]
    }

    pub fn mean_distance(&self) -> Option<f64> {
        mean(&self.sites.iter().map(|s| s.distance).collect::<Vec<_>>())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestCompetitor {
    pub coord: Coord,
    pub competitor: String,
    pub distance: f64,
}

/// For every focus branch, the closest branch of any other bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestCompetitors {
    pub branches: Vec<NearestCompetitor>,
    /// How often each competitor is the nearest one, most frequent first.
    pub frequency: MarketCounts,
}

impl NearestCompetitors {
    pub fn new(focus: &[&Branch], competitors: &[&Branch]) -> Self {
        let competitor_coords: Vec<Coord> = competitors.iter().map(|b| b.coord).collect();
        let index = SpatialIndex::new(&competitor_coords);
        let branches: Vec<NearestCompetitor> = focus
            .iter()
            .filter_map(|b| {
                let (idx, distance) = index.nearest(&b.coord)?;
                Some(NearestCompetitor {
                    coord: b.coord,
                    competitor: competitors[idx].bank.clone(),
                    distance,
                })
            })
            .collect();
        let frequency = MarketCounts::from_banks(branches.iter().map(|n| n.competitor.as_str()));
        Self {
            branches,
            frequency,
        }
    }

    pub fn distances(&self) -> Vec<f64> {
        self.branches.iter().map(|n| n.distance).collect()
    }

    pub fn mean_distance(&self) -> Option<f64> {
        mean(&self.distances())
    }

    pub fn median_distance(&self) -> Option<f64> {
        median(&self.distances())
    }

    pub fn histogram(&self, bins: usize) -> Option<Histogram> {
        Histogram::new(&self.distances(), bins)
    }
}

/// Branches (of any bank) around each branch of one bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankIntensity {
    pub bank: String,
    pub counts: Vec<usize>,
}

impl BankIntensity {
    pub fn average(&self) -> f64 {
        mean(&as_f64(&self.counts)).unwrap_or(0.0)
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> usize {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    pub fn histogram(&self, bins: usize) -> Option<Histogram> {
        Histogram::new(&as_f64(&self.counts), bins)
    }
}

/// Competitive intensity of every bank, highest average first. A branch at
/// the exact same spot as another one is not counted.
pub fn competitive_intensity(
    branches: &[Branch],
    counts: &MarketCounts,
    radius: f64,
) -> Vec<BankIntensity> {
    let coords: Vec<Coord> = branches.iter().map(|b| b.coord).collect();
    let index = SpatialIndex::new(&coords);
    let mut intensity: Vec<BankIntensity> = counts
        .banks
        .iter()
        .map(|bank| BankIntensity {
            bank: bank.bank.clone(),
            counts: branches
                .iter()
                .filter(|b| b.bank == bank.bank)
                .map(|b| index.count_strictly_within(&b.coord, radius))
                .collect(),
        })
        .collect();
    intensity.sort_by(|a, b| b.average().total_cmp(&a.average()));
    intensity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches() -> Vec<Branch> {
        vec![
            Branch::new("Focus", 0.0, 0.0),
            Branch::new("Focus", 1.0, 1.0),
            Branch::new("A", 0.0, 0.05),
            Branch::new("A", 1.0, 1.02),
            Branch::new("B", 0.0, 0.5),
            Branch::new("B", 3.0, 3.0),
        ]
    }

    fn split(branches: &[Branch]) -> (Vec<&Branch>, Vec<&Branch>) {
        branches.iter().partition(|b| b.bank == "Focus")
    }

    #[test]
    fn gaps_are_competitors_beyond_threshold_farthest_first() {
        let branches = branches();
        let (focus, competitors) = split(&branches);
        let gaps = GapAnalysis::new(&focus, &competitors, 0.3);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps.sites[0].coord, Coord::new(3.0, 3.0));
        assert!((gaps.sites[0].distance - 8f64.sqrt()).abs() < 1e-12);
        assert!((gaps.sites[1].distance - 0.5).abs() < 1e-12);
        assert_eq!(gaps.top(1).len(), 1);
        let expected_mean = (8f64.sqrt() + 0.5) / 2.0;
        assert!((gaps.mean_distance().unwrap() - expected_mean).abs() < 1e-12);
    }

    #[test]
    fn nearest_competitor_per_focus_branch() {
        let branches = branches();
        let (focus, competitors) = split(&branches);
        let nearest = NearestCompetitors::new(&focus, &competitors);
        assert_eq!(nearest.branches.len(), 2);
        assert_eq!(nearest.branches[0].competitor, "A");
        assert!((nearest.branches[0].distance - 0.05).abs() < 1e-12);
        assert!((nearest.branches[1].distance - 0.02).abs() < 1e-12);
        assert_eq!(nearest.frequency.count_of("A"), 2);
        assert!((nearest.median_distance().unwrap() - 0.035).abs() < 1e-12);
    }

    #[test]
    fn no_competitors_means_no_nearest() {
        let branches = vec![Branch::new("Focus", 0.0, 0.0)];
        let (focus, competitors) = split(&branches);
        let nearest = NearestCompetitors::new(&focus, &competitors);
        assert!(nearest.branches.is_empty());
        assert!(nearest.mean_distance().is_none());
        assert!(GapAnalysis::new(&focus, &competitors, 0.3).is_empty());
    }

    #[test]
    fn intensity_counts_other_branches_strictly_inside_radius() {
        let mut branches = branches();
        // exact duplicate of a focus branch is not counted
        branches.push(Branch::new("B", 0.0, 0.0));
        let counts = MarketCounts::from_banks(branches.iter().map(|b| b.bank.as_str()));
        let intensity = competitive_intensity(&branches, &counts, 0.1);
        let focus = intensity.iter().find(|i| i.bank == "Focus").unwrap();
        assert_eq!(focus.counts, vec![1, 1]);
        assert_eq!(focus.average(), 1.0);
        let b = intensity.iter().find(|i| i.bank == "B").unwrap();
        assert_eq!(b.counts, vec![0, 0, 1]);
        assert_eq!((b.min(), b.max()), (0, 1));
        assert_eq!(intensity[0].bank, "A");
        assert_eq!(intensity[0].counts, vec![2, 1]);
        assert!(intensity.last().unwrap().average() < 1.0);
    }
}
