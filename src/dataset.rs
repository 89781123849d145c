use std::{fs::File, io, path::Path};

use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use tracing::{debug, info};

use crate::geo::Coord;

pub const BANK_COLUMN: &str = "bank_name";
pub const LAT_COLUMNS: [&str; 2] = ["lat", "latitude"];
pub const LONG_COLUMNS: [&str; 4] = ["long", "longitude", "lng", "lon"];

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub bank: String,
    pub coord: Coord,
}

impl Branch {
    pub fn new(bank: impl Into<String>, lat: f64, long: f64) -> Self {
        Self {
            bank: bank.into(),
            coord: Coord::new(lat, long),
        }
    }
}

/// The branch table after malformed rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub branches: Vec<Branch>,
    /// Rows rejected during load.
    pub dropped: usize,
}

/// Position of the first header matching any of `names`, compared case-insensitively.
pub fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

pub fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

impl Dataset {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self {
            branches,
            dropped: 0,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).wrap_err_with(|| format!("could not open {}", path.display()))?;
        let dataset = Self::from_reader(file)
            .wrap_err_with(|| format!("could not load branches from {}", path.display()))?;
        info!(
            "loaded {} branches of {} banks from {} ({} rows dropped)",
            dataset.len(),
            dataset.banks().len(),
            path.display(),
            dataset.dropped
        );
        Ok(dataset)
    }

    pub fn from_reader(input: impl io::Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let headers = reader.headers()?.clone();

        let bank_idx = find_column(&headers, &[BANK_COLUMN])
            .ok_or_else(|| eyre!("missing `{BANK_COLUMN}` column"))?;
        let lat_idx =
            find_column(&headers, &LAT_COLUMNS).ok_or_else(|| eyre!("missing `lat` column"))?;
        let long_idx =
            find_column(&headers, &LONG_COLUMNS).ok_or_else(|| eyre!("missing `long` column"))?;

        let mut dataset = Dataset::default();
        let mut record = csv::StringRecord::new();
        let mut line = 1;
        while reader.read_record(&mut record)? {
            line += 1;
            let bank = record.get(bank_idx).map(str::trim).unwrap_or_default();
            let lat = record.get(lat_idx).and_then(|v| parse_coordinate(v, 90.0));
            let long = record.get(long_idx).and_then(|v| parse_coordinate(v, 180.0));
            match (bank, lat, long) {
                (bank, Some(lat), Some(long)) if !bank.is_empty() => {
                    dataset.branches.push(Branch::new(bank, lat, long));
                }
                _ => {
                    debug!("dropping line {line}: {:?}", record);
                    dataset.dropped += 1;
                }
            }
        }

        if dataset.branches.is_empty() {
            return Err(eyre!("no row with a bank name and valid coordinates"));
        }
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Distinct bank names in order of first appearance.
    pub fn banks(&self) -> Vec<&str> {
        let mut banks: Vec<&str> = Vec::new();
        for branch in &self.branches {
            if !banks.contains(&branch.bank.as_str()) {
                banks.push(&branch.bank);
            }
        }
        banks
    }

    pub fn of_bank<'a>(&'a self, bank: &'a str) -> impl Iterator<Item = &'a Branch> + 'a {
        self.branches.iter().filter(move |b| b.bank == bank)
    }

    pub fn not_of_bank<'a>(&'a self, bank: &'a str) -> impl Iterator<Item = &'a Branch> + 'a {
        self.branches.iter().filter(move |b| b.bank != bank)
    }

    pub fn coords(&self) -> Vec<Coord> {
        self.branches.iter().map(|b| b.coord).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_rows_are_dropped_and_counted() {
        let csv = "\
bank_name,lat,long
Kapital Bank,40.40,49.86
ABB,not-a-number,49.80
,40.41,49.87
Unibank,40.42,
Xalq Bank,95.0,49.9
Xalq Bank, 40.5 , 49.9
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dropped, 4);
        assert_eq!(dataset.branches[1], Branch::new("Xalq Bank", 40.5, 49.9));
    }

    #[test]
    fn coordinate_aliases_are_accepted() {
        let csv = "id,Bank_Name,latitude,longitude\n1,ABB,40.1,49.1\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.branches, vec![Branch::new("ABB", 40.1, 49.1)]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = Dataset::from_reader("bank_name,lat\nABB,40.0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("long"));
    }

    #[test]
    fn table_without_valid_rows_is_an_error() {
        assert!(Dataset::from_reader("bank_name,lat,long\nABB,x,y\n".as_bytes()).is_err());
    }

    #[test]
    fn banks_keep_first_appearance_order() {
        let dataset = Dataset::new(vec![
            Branch::new("B", 0.0, 0.0),
            Branch::new("A", 0.0, 0.0),
            Branch::new("B", 1.0, 1.0),
        ]);
        assert_eq!(dataset.banks(), vec!["B", "A"]);
        assert_eq!(dataset.of_bank("B").count(), 2);
        assert_eq!(dataset.not_of_bank("B").count(), 1);
    }
}
