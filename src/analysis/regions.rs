use serde::Serialize;

use super::market::MarketCounts;
use crate::{
    dataset::Branch,
    geo::{BoundingBox, Region, Zone},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSplit {
    pub bank: String,
    pub baku: usize,
    pub regions: usize,
}

impl RegionSplit {
    pub fn total(&self) -> usize {
        self.baku + self.regions
    }

    pub fn baku_pct(&self) -> f64 {
        pct(self.baku, self.total())
    }

    pub fn regional_pct(&self) -> f64 {
        pct(self.regions, self.total())
    }
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Baku/Regions split of every bank, in the order of `counts`.
pub fn region_splits(
    branches: &[Branch],
    counts: &MarketCounts,
    baku_city: &BoundingBox,
) -> Vec<RegionSplit> {
    counts
        .banks
        .iter()
        .map(|bank| {
            let mut split = RegionSplit {
                bank: bank.bank.clone(),
                baku: 0,
                regions: 0,
            };
            for branch in branches.iter().filter(|b| b.bank == bank.bank) {
                match Region::classify(&branch.coord, baku_city) {
                    Region::Baku => split.baku += 1,
                    Region::Regions => split.regions += 1,
                }
            }
            split
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneStanding {
    pub zone: Zone,
    pub total: usize,
    pub focus_branches: usize,
    pub focus_share: f64,
    /// `None` when the focus bank has no branch in the zone.
    pub focus_rank: Option<usize>,
    pub leader: String,
    pub leader_branches: usize,
}

/// Zones reported in the dominance analysis, in display order.
pub const REPORTED_ZONES: [Zone; 7] = [
    Zone::BakuCity,
    Zone::Absheron,
    Zone::North,
    Zone::Northwest,
    Zone::Central,
    Zone::South,
    Zone::West,
];

pub fn zone_standings(branches: &[Branch], focus_bank: &str) -> Vec<ZoneStanding> {
    REPORTED_ZONES
        .iter()
        .filter_map(|&zone| {
            let counts = MarketCounts::from_banks(
                branches
                    .iter()
                    .filter(|b| Zone::classify(&b.coord) == zone)
                    .map(|b| b.bank.as_str()),
            );
            let leader = counts.leader()?;
            let focus_branches = counts.count_of(focus_bank);
            Some(ZoneStanding {
                zone,
                total: counts.total,
                focus_branches,
                focus_share: counts.share_of(focus_bank),
                focus_rank: (focus_branches > 0).then(|| counts.rank_for(focus_branches)),
                leader: leader.bank.clone(),
                leader_branches: leader.branches,
            })
        })
        .collect()
}
