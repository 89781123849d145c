//! Density-based clustering of branch locations.
//!
//! Neighbourhoods are inclusive (`distance <= eps`) and a point counts itself,
//! so a core point needs `min_samples - 1` other points within `eps`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{
    dataset::Branch,
    geo::{Coord, SpatialIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterLabel {
    /// Not density-reachable from any core point.
    Noise,
    Cluster(usize),
}

impl ClusterLabel {
    /// `-1` for noise, the cluster id otherwise.
    pub fn as_i64(&self) -> i64 {
        match self {
            ClusterLabel::Noise => -1,
            ClusterLabel::Cluster(id) => *id as i64,
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterLabel::Noise => write!(f, "Outliers"),
            ClusterLabel::Cluster(id) => write!(f, "Cluster {id}"),
        }
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    pub eps: f64,
    pub min_samples: usize,
}

pub fn dbscan(coords: &[Coord], params: DbscanParams) -> Vec<ClusterLabel> {
    let index = SpatialIndex::new(coords);
    let neighbourhoods: Vec<Vec<usize>> = coords
        .iter()
        .map(|c| {
            index
                .within(c, params.eps)
                .into_iter()
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect();
    let is_core: Vec<bool> = neighbourhoods
        .iter()
        .map(|n| n.len() >= params.min_samples)
        .collect();

    let mut labels = vec![ClusterLabel::Noise; coords.len()];
    let mut next_id = 0;
    let mut stack = Vec::new();
    for start in 0..coords.len() {
        if labels[start] != ClusterLabel::Noise || !is_core[start] {
            continue;
        }
        let label = ClusterLabel::Cluster(next_id);
        next_id += 1;
        stack.push(start);
        while let Some(current) = stack.pop() {
            if labels[current] != ClusterLabel::Noise {
                continue;
            }
            labels[current] = label;
            if is_core[current] {
                stack.extend(
                    neighbourhoods[current]
                        .iter()
                        .copied()
                        .filter(|&n| labels[n] == ClusterLabel::Noise),
                );
            }
        }
    }
    labels
}

pub fn cluster_count(labels: &[ClusterLabel]) -> usize {
    labels
        .iter()
        .filter_map(|l| match l {
            ClusterLabel::Cluster(id) => Some(id + 1),
            ClusterLabel::Noise => None,
        })
        .max()
        .unwrap_or(0)
}

/// Focus-bank presence inside one cluster (or among the outliers).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterPresence {
    pub label: ClusterLabel,
    pub total: usize,
    pub focus: usize,
}

impl ClusterPresence {
    pub fn focus_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.focus as f64 / self.total as f64 * 100.0
        }
    }
}

/// One row per label present, outliers first, then clusters by id.
pub fn cluster_presence(
    branches: &[Branch],
    labels: &[ClusterLabel],
    focus_bank: &str,
) -> Vec<ClusterPresence> {
    let mut rows: Vec<ClusterPresence> = Vec::new();
    for (branch, &label) in branches.iter().zip(labels) {
        let idx = match rows.iter().position(|r| r.label == label) {
            Some(idx) => idx,
            None => {
                rows.push(ClusterPresence {
                    label,
                    total: 0,
                    focus: 0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.total += 1;
        if branch.bank == focus_bank {
            row.focus += 1;
        }
    }
    rows.sort_by_key(|r| r.label);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(eps: f64, min_samples: usize) -> DbscanParams {
        DbscanParams { eps, min_samples }
    }

    #[test]
    fn separates_two_dense_groups_and_noise() {
        let coords = vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.1),
            Coord::new(0.1, 0.0),
            Coord::new(10.0, 10.0),
            Coord::new(10.0, 10.1),
            Coord::new(10.1, 10.0),
            Coord::new(5.0, 5.0),
        ];
        let labels = dbscan(&coords, params(0.2, 3));
        assert_eq!(
            labels,
            vec![
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(1),
                ClusterLabel::Cluster(1),
                ClusterLabel::Cluster(1),
                ClusterLabel::Noise,
            ]
        );
        assert_eq!(cluster_count(&labels), 2);
    }

    #[test]
    fn border_points_join_but_do_not_expand() {
        // the first four points are core, (0, 0.65) only reaches (0, 0.2)
        // and is a border point, (0, 1.1) is reachable only through it
        let coords = vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.1),
            Coord::new(0.0, 0.2),
            Coord::new(0.1, 0.1),
            Coord::new(0.0, 0.65),
            Coord::new(0.0, 1.1),
        ];
        let labels = dbscan(&coords, params(0.5, 4));
        assert_eq!(labels[0], ClusterLabel::Cluster(0));
        assert_eq!(labels[4], ClusterLabel::Cluster(0));
        assert_eq!(labels[5], ClusterLabel::Noise);
        assert_eq!(cluster_count(&labels), 1);
    }

    #[test]
    fn the_point_itself_counts_towards_min_samples() {
        let coords = vec![Coord::new(0.0, 0.0), Coord::new(0.0, 0.1)];
        assert_eq!(dbscan(&coords, params(0.2, 2)), vec![ClusterLabel::Cluster(0); 2]);
        assert_eq!(dbscan(&coords, params(0.2, 3)), vec![ClusterLabel::Noise; 2]);
    }

    #[test]
    fn presence_rows_start_with_outliers() {
        let branches = vec![
            Branch::new("Focus", 0.0, 0.0),
            Branch::new("Other", 0.0, 0.0),
            Branch::new("Focus", 5.0, 5.0),
        ];
        let labels = vec![
            ClusterLabel::Cluster(0),
            ClusterLabel::Cluster(0),
            ClusterLabel::Noise,
        ];
        let rows = cluster_presence(&branches, &labels, "Focus");
        assert_eq!(rows[0].label, ClusterLabel::Noise);
        assert_eq!((rows[0].total, rows[0].focus), (1, 1));
        assert_eq!((rows[1].total, rows[1].focus), (2, 1));
        assert!((rows[1].focus_share() - 50.0).abs() < 1e-12);
        assert_eq!(ClusterLabel::Noise.as_i64(), -1);
        assert_eq!(ClusterLabel::Cluster(3).to_string(), "Cluster 3");
    }
}
