use std::fmt;

use rstar::{RTree, primitives::GeomWithData};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// A point in degree space. Distances are plain Euclidean over (lat, long).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub long: f64,
}

impl Coord {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    pub fn distance(&self, other: &Coord) -> f64 {
        self.distance_2(other).sqrt()
    }

    pub fn distance_2(&self, other: &Coord) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_long = self.long - other.long;
        d_lat * d_lat + d_long * d_long
    }

    fn as_point(&self) -> [f64; 2] {
        [self.lat, self.long]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.long)
    }
}

/// Degrees to kilometres with the flat ~111 km per degree approximation.
pub fn to_km(degrees: f64, km_per_degree: f64) -> f64 {
    degrees * km_per_degree
}

/// Evenly spaced values over `[start, stop]`, both endpoints included.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub long_min: f64,
    pub long_max: f64,
}

impl BoundingBox {
    pub const fn new(lat_min: f64, lat_max: f64, long_min: f64, long_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            long_min,
            long_max,
        }
    }

    /// Smallest box holding every coordinate, `None` when there are none.
    pub fn around<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Option<Self> {
        coords.into_iter().fold(None, |bounds, c| {
            Some(match bounds {
                None => Self::new(c.lat, c.lat, c.long, c.long),
                Some(b) => Self::new(
                    b.lat_min.min(c.lat),
                    b.lat_max.max(c.lat),
                    b.long_min.min(c.long),
                    b.long_max.max(c.long),
                ),
            })
        })
    }

    pub fn contains(&self, c: &Coord) -> bool {
        self.lat_min <= c.lat && c.lat <= self.lat_max && self.long_min <= c.long && c.long <= self.long_max
    }

    pub fn padded(&self, pad: f64) -> Self {
        Self::new(
            self.lat_min - pad,
            self.lat_max + pad,
            self.long_min - pad,
            self.long_max + pad,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn long_span(&self) -> f64 {
        self.long_max - self.long_min
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
pub enum Region {
    Baku,
    Regions,
}

impl Region {
    pub fn classify(c: &Coord, baku_city: &BoundingBox) -> Self {
        if baku_city.contains(c) {
            Region::Baku
        } else {
            Region::Regions
        }
    }
}

const BAKU_CITY: BoundingBox = BoundingBox::new(40.3, 40.5, 49.7, 50.0);
const ABSHERON: BoundingBox = BoundingBox::new(40.2, 40.6, 49.5, 50.3);

/// Coarse geographic zones of Azerbaijan, checked in declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
pub enum Zone {
    #[strum(to_string = "Baku City")]
    #[serde(rename = "Baku City")]
    BakuCity,
    Absheron,
    North,
    Northwest,
    Central,
    South,
    West,
    Other,
}

impl Zone {
    pub fn classify(c: &Coord) -> Self {
        let (lat, long) = (c.lat, c.long);
        if BAKU_CITY.contains(c) {
            Zone::BakuCity
        } else if ABSHERON.contains(c) {
            Zone::Absheron
        } else if lat > 41.0 {
            Zone::North
        } else if lat > 40.5 && long < 48.5 {
            Zone::Northwest
        } else if (40.0..=40.8).contains(&lat) && (47.0..49.5).contains(&long) {
            Zone::Central
        } else if lat < 39.0 {
            Zone::South
        } else if long < 46.0 {
            Zone::West
        } else {
            Zone::Other
        }
    }
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over coordinates, answering with the position each coordinate had
/// in the slice it was built from.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn new(coords: &[Coord]) -> Self {
        let points = coords
            .iter()
            .enumerate()
            .map(|(idx, c)| GeomWithData::new(c.as_point(), idx))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Closest indexed coordinate and its distance.
    pub fn nearest(&self, query: &Coord) -> Option<(usize, f64)> {
        let point = query.as_point();
        self.tree
            .nearest_neighbor_iter_with_distance_2(&point)
            .next()
            .map(|(found, distance_2)| (found.data, distance_2.sqrt()))
    }

    /// Every indexed coordinate at distance `<= radius`, closest first.
    pub fn within(&self, query: &Coord, radius: f64) -> Vec<(usize, f64)> {
        let point = query.as_point();
        let radius_2 = radius * radius;
        self.tree
            .nearest_neighbor_iter_with_distance_2(&point)
            .take_while(|(_, distance_2)| *distance_2 <= radius_2)
            .map(|(found, distance_2)| (found.data, distance_2.sqrt()))
            .collect()
    }

    /// Number of indexed coordinates with `0 < distance < radius`.
    pub fn count_strictly_within(&self, query: &Coord, radius: f64) -> usize {
        self.within(query, radius)
            .into_iter()
            .filter(|&(_, d)| d > 0.0 && d < radius)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_endpoints() {
        let axis = linspace(40.3, 40.65, 8);
        assert_eq!(axis.len(), 8);
        assert!((axis[0] - 40.3).abs() < 1e-12);
        assert!((axis[7] - 40.65).abs() < 1e-12);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn box_bounds_are_inclusive() {
        let b = BoundingBox::new(40.3, 40.5, 49.7, 50.0);
        assert!(b.contains(&Coord::new(40.3, 49.7)));
        assert!(b.contains(&Coord::new(40.5, 50.0)));
        assert!(!b.contains(&Coord::new(40.51, 49.8)));
    }

    #[test]
    fn zones_follow_priority_order() {
        assert_eq!(Zone::classify(&Coord::new(40.4, 49.85)), Zone::BakuCity);
        assert_eq!(Zone::classify(&Coord::new(40.58, 49.63)), Zone::Absheron);
        assert_eq!(Zone::classify(&Coord::new(41.36, 48.51)), Zone::North);
        assert_eq!(Zone::classify(&Coord::new(40.68, 46.36)), Zone::Northwest);
        assert_eq!(Zone::classify(&Coord::new(40.37, 47.12)), Zone::Central);
        assert_eq!(Zone::classify(&Coord::new(38.75, 48.85)), Zone::South);
        assert_eq!(Zone::classify(&Coord::new(39.2, 45.41)), Zone::West);
        assert_eq!(Zone::classify(&Coord::new(39.93, 48.92)), Zone::Other);
        assert_eq!(Zone::BakuCity.to_string(), "Baku City");
    }

    #[test]
    fn region_uses_configured_box() {
        let baku = BoundingBox::new(40.3, 40.5, 49.7, 50.0);
        assert_eq!(Region::classify(&Coord::new(40.4, 49.9), &baku), Region::Baku);
        assert_eq!(Region::classify(&Coord::new(40.6, 49.9), &baku), Region::Regions);
    }

    #[test]
    fn index_answers_nearest_and_radius_queries() {
        let coords = [
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.05),
            Coord::new(0.0, 0.5),
            Coord::new(2.0, 2.0),
        ];
        let index = SpatialIndex::new(&coords);
        assert_eq!(index.len(), 4);

        let (idx, d) = index.nearest(&Coord::new(0.3, 0.0)).unwrap();
        assert_eq!(idx, 0);
        assert!((d - 0.3).abs() < 1e-12);

        let near: Vec<usize> = index
            .within(&Coord::new(0.0, 0.0), 0.5)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(near, vec![0, 1, 2]);

        // self at distance 0 and the point exactly on the radius are excluded
        assert_eq!(index.count_strictly_within(&Coord::new(0.0, 0.0), 0.5), 1);
    }

    #[test]
    fn empty_index_has_no_neighbours() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.nearest(&Coord::new(1.0, 1.0)).is_none());
        assert!(index.within(&Coord::new(1.0, 1.0), 10.0).is_empty());
    }
}
