//! Growth opportunity score over a lat/long grid.
//!
//! A cell scores high when it is far from the focus network and close to many
//! competitor branches.

use serde::Serialize;
use tracing::debug;

use crate::{
    config::{OpportunityConfig, ScanConfig},
    dataset::Branch,
    geo::{BoundingBox, Coord, SpatialIndex, linspace},
    places::{BAKU_ABSHERON, Place, REGIONAL_CITIES, nearest_place},
};

/// Scores of a `lats.len() x longs.len()` grid, one row per latitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityGrid {
    pub bounds: BoundingBox,
    pub lats: Vec<f64>,
    pub longs: Vec<f64>,
    pub scores: Vec<f64>,
}

impl OpportunityGrid {
    pub fn score(&self, row: usize, col: usize) -> f64 {
        self.scores[row * self.longs.len() + col]
    }

    pub fn coord(&self, idx: usize) -> Coord {
        let cols = self.longs.len();
        Coord::new(self.lats[idx / cols], self.longs[idx % cols])
    }

    pub fn max_score(&self) -> f64 {
        self.scores.iter().copied().fold(0.0, f64::max)
    }

    /// Half the distance between neighbouring cells, per axis.
    pub fn half_cell(&self) -> (f64, f64) {
        let step = |axis: &[f64]| match axis {
            [a, b, ..] => (b - a) / 2.0,
            _ => 0.0,
        };
        (step(&self.lats), step(&self.longs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunitySite {
    pub rank: usize,
    pub coord: Coord,
    pub score: f64,
    /// Distance to the closest focus branch (or the fallback anchor).
    pub distance: f64,
    pub competitors: usize,
    pub place: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityScan {
    pub grid: OpportunityGrid,
    /// Best cells, highest score first.
    pub sites: Vec<OpportunitySite>,
    /// Focus branches of the area, or the fallback anchor alone.
    pub anchors: Vec<Coord>,
    pub used_fallback: bool,
    pub competitors: Vec<Coord>,
    /// Every branch of the area, focus included.
    pub branches: Vec<Coord>,
}

impl OpportunityScan {
    /// Focus branches actually present in the area.
    pub fn focus_branches(&self) -> &[Coord] {
        if self.used_fallback {
            &[]
        } else {
            &self.anchors
        }
    }
}

/// Scores every grid cell of `bounds` against the branches of one area.
/// Cells inside `excluded` score 0 and are never recommended.
pub fn scan(
    area: &[&Branch],
    focus_bank: &str,
    config: &ScanConfig,
    bounds: BoundingBox,
    excluded: Option<&BoundingBox>,
    places: &[Place],
) -> OpportunityScan {
    let mut anchors: Vec<Coord> = area
        .iter()
        .filter(|b| b.bank == focus_bank)
        .map(|b| b.coord)
        .collect();
    let used_fallback = anchors.is_empty();
    if used_fallback {
        debug!("no focus branch in scan area, using {}", config.fallback_anchor);
        anchors.push(config.fallback_anchor);
    }
    let competitors: Vec<Coord> = area
        .iter()
        .filter(|b| b.bank != focus_bank)
        .map(|b| b.coord)
        .collect();
    let anchor_index = SpatialIndex::new(&anchors);
    let competitor_index = SpatialIndex::new(&competitors);

    let lats = linspace(bounds.lat_min, bounds.lat_max, config.resolution);
    let longs = linspace(bounds.long_min, bounds.long_max, config.resolution);
    let mut cells = Vec::with_capacity(lats.len() * longs.len());
    for &lat in &lats {
        for &long in &longs {
            let at = Coord::new(lat, long);
            if excluded.is_some_and(|b| b.contains(&at)) {
                cells.push(None);
                continue;
            }
            let distance = anchor_index.nearest(&at).map_or(0.0, |(_, d)| d);
            let nearby = competitor_index
                .within(&at, config.competitor_radius)
                .into_iter()
                .filter(|&(_, d)| d < config.competitor_radius)
                .count();
            let score = config.distance_weight * distance + config.competitor_weight * nearby as f64;
            cells.push(Some((score, distance, nearby)));
        }
    }

    let mut ranked: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].is_some()).collect();
    // stable sort keeps grid order among equal scores
    ranked.sort_by(|&a, &b| {
        let score = |i: usize| cells[i].map_or(0.0, |(s, _, _)| s);
        score(b).total_cmp(&score(a))
    });

    let grid = OpportunityGrid {
        bounds,
        scores: cells.iter().map(|c| c.map_or(0.0, |(s, _, _)| s)).collect(),
        lats,
        longs,
    };
    let sites = ranked
        .into_iter()
        .take(config.top_n)
        .enumerate()
        .filter_map(|(rank, idx)| {
            let (score, distance, competitors) = cells[idx]?;
            let coord = grid.coord(idx);
            Some(OpportunitySite {
                rank: rank + 1,
                coord,
                score,
                distance,
                competitors,
                place: nearest_place(places, &coord).map(|p| p.name),
            })
        })
        .collect();

    OpportunityScan {
        grid,
        sites,
        anchors,
        used_fallback,
        competitors,
        branches: area.iter().map(|b| b.coord).collect(),
    }
}

/// The metro box from the config, or the extent of all branches.
pub fn metro_bounds(branches: &[Branch], config: &OpportunityConfig) -> Option<BoundingBox> {
    config
        .metro
        .bounds
        .or_else(|| BoundingBox::around(branches.iter().map(|b| &b.coord)))
}

pub fn metro_scan(
    branches: &[Branch],
    focus_bank: &str,
    config: &OpportunityConfig,
) -> Option<OpportunityScan> {
    let bounds = metro_bounds(branches, config)?;
    let area: Vec<&Branch> = branches
        .iter()
        .filter(|b| bounds.contains(&b.coord))
        .collect();
    Some(scan(
        &area,
        focus_bank,
        &config.metro,
        bounds,
        None,
        BAKU_ABSHERON,
    ))
}

/// Scan of everything outside the metro box. `None` when no branch lies
/// outside it.
pub fn regional_scan(
    branches: &[Branch],
    focus_bank: &str,
    config: &OpportunityConfig,
) -> Option<OpportunityScan> {
    let metro = metro_bounds(branches, config)?;
    let area: Vec<&Branch> = branches
        .iter()
        .filter(|b| !metro.contains(&b.coord))
        .collect();
    let bounds = match config.regional.bounds {
        Some(bounds) => bounds,
        None => BoundingBox::around(area.iter().map(|b| &b.coord))?.padded(config.regional_padding),
    };
    Some(scan(
        &area,
        focus_bank,
        &config.regional,
        bounds,
        Some(&metro),
        REGIONAL_CITIES,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(resolution: usize, top_n: usize) -> ScanConfig {
        ScanConfig {
            bounds: None,
            resolution,
            distance_weight: 10.0,
            competitor_weight: 1.0,
            competitor_radius: 0.6,
            top_n,
            fallback_anchor: Coord::new(0.0, 0.0),
        }
    }

    #[test]
    fn score_combines_distance_and_competitors() {
        let branches = vec![
            Branch::new("Focus", 0.0, 0.0),
            Branch::new("Other", 1.0, 1.0),
            Branch::new("Other", 1.0, 0.9),
        ];
        let area: Vec<&Branch> = branches.iter().collect();
        let bounds = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let result = scan(&area, "Focus", &config(2, 2), bounds, None, &[]);

        assert_eq!(result.grid.lats, vec![0.0, 1.0]);
        assert_eq!(result.grid.score(0, 0), 0.0);
        assert_eq!(result.grid.score(0, 1), 10.0);
        let corner = 10.0 * 2f64.sqrt() + 2.0;
        assert!((result.grid.score(1, 1) - corner).abs() < 1e-12);

        assert_eq!(result.sites.len(), 2);
        assert_eq!(result.sites[0].rank, 1);
        assert_eq!(result.sites[0].coord, Coord::new(1.0, 1.0));
        assert_eq!(result.sites[0].competitors, 2);
        assert!(!result.used_fallback);
        assert_eq!(result.focus_branches().len(), 1);
    }

    #[test]
    fn equal_scores_keep_grid_order() {
        let branches = vec![Branch::new("Focus", 0.5, 0.5)];
        let area: Vec<&Branch> = branches.iter().collect();
        let bounds = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let result = scan(&area, "Focus", &config(2, 4), bounds, None, &[]);
        let coords: Vec<Coord> = result.sites.iter().map(|s| s.coord).collect();
        assert_eq!(
            coords,
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(0.0, 1.0),
                Coord::new(1.0, 0.0),
                Coord::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn missing_focus_uses_fallback_anchor() {
        let branches = vec![Branch::new("Other", 1.0, 1.0)];
        let area: Vec<&Branch> = branches.iter().collect();
        let bounds = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let result = scan(&area, "Focus", &config(2, 1), bounds, None, &[]);
        assert!(result.used_fallback);
        assert_eq!(result.anchors, vec![Coord::new(0.0, 0.0)]);
        assert!(result.focus_branches().is_empty());
        assert_eq!(result.grid.score(0, 0), 0.0);
    }

    #[test]
    fn excluded_cells_score_zero_and_are_never_recommended() {
        let branches = vec![Branch::new("Focus", 5.0, 5.0)];
        let area: Vec<&Branch> = branches.iter().collect();
        let bounds = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let excluded = BoundingBox::new(-0.5, 0.5, -0.5, 1.5);
        let result = scan(&area, "Focus", &config(2, 10), bounds, Some(&excluded), &[]);
        assert_eq!(result.grid.score(0, 0), 0.0);
        assert_eq!(result.grid.score(0, 1), 0.0);
        assert_eq!(result.sites.len(), 2);
        assert!(result.sites.iter().all(|s| s.coord.lat == 1.0));
    }

    #[test]
    fn sites_are_labelled_with_nearest_place() {
        let branches = vec![Branch::new("Focus", 40.40, 49.85)];
        let config = OpportunityConfig::default();
        let result = metro_scan(&branches, "Focus", &config).unwrap();
        assert_eq!(result.grid.scores.len(), 35 * 35);
        assert_eq!(result.sites.len(), 15);
        assert!(result.sites.iter().all(|s| s.place.is_some()));
    }

    #[test]
    fn regional_scan_needs_branches_outside_the_metro_box() {
        let config = OpportunityConfig::default();
        let metro_only = vec![Branch::new("Focus", 40.40, 49.85)];
        assert!(regional_scan(&metro_only, "Focus", &config).is_none());

        let branches = vec![
            Branch::new("Focus", 40.40, 49.85),
            Branch::new("Other", 40.68, 46.36),
            Branch::new("Other", 38.75, 48.85),
        ];
        let result = regional_scan(&branches, "Focus", &config).unwrap();
        assert!(result.used_fallback);
        assert_eq!(result.competitors.len(), 2);
        assert!((result.grid.bounds.lat_min - 38.65).abs() < 1e-9);
        let metro = config.metro.bounds.unwrap();
        assert!(result.sites.iter().all(|s| !metro.contains(&s.coord)));
    }
}
