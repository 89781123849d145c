use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use tracing::{info, warn};

use crate::dataset::{BANK_COLUMN, LAT_COLUMNS, LONG_COLUMNS, find_column, parse_coordinate};

/// A per-bank branch CSV, given on the command line as `<bank name>=<csv>`.
#[derive(Debug, Clone, PartialEq)]
pub struct BankSource {
    pub bank: String,
    pub path: PathBuf,
}

impl FromStr for BankSource {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once('=') {
            Some((bank, path)) if !bank.trim().is_empty() && !path.trim().is_empty() => Ok(Self {
                bank: bank.trim().to_string(),
                path: PathBuf::from(path.trim()),
            }),
            _ => Err(format!("expected `<bank name>=<csv>`, got `{raw}`")),
        }
    }
}

/// Merges every source into `out` and returns the number of rows written.
pub fn run(sources: &[BankSource], out: &Path) -> Result<usize> {
    let file = File::create(out).wrap_err_with(|| format!("could not create {}", out.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([BANK_COLUMN, "lat", "long"])?;
    let mut written = 0;
    for source in sources {
        let input = File::open(&source.path)
            .wrap_err_with(|| format!("could not open {}", source.path.display()))?;
        let rows = append(&mut writer, &source.bank, input)
            .wrap_err_with(|| format!("could not merge {}", source.path.display()))?;
        info!("{}: {rows} branches from {}", source.bank, source.path.display());
        written += rows;
    }
    writer.flush()?;
    info!("wrote {written} branches to {}", out.display());
    Ok(written)
}

/// Copies the coordinates of every row of `input` under `bank`. Rows without
/// valid coordinates are skipped.
pub fn append<W: io::Write>(
    writer: &mut csv::Writer<W>,
    bank: &str,
    input: impl io::Read,
) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let lat_idx = find_column(&headers, &LAT_COLUMNS)
        .ok_or_else(|| eyre!("no latitude column in {:?}", headers))?;
    let long_idx = find_column(&headers, &LONG_COLUMNS)
        .ok_or_else(|| eyre!("no longitude column in {:?}", headers))?;

    let mut rows = 0;
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        let lat = record.get(lat_idx).and_then(|v| parse_coordinate(v, 90.0));
        let long = record.get(long_idx).and_then(|v| parse_coordinate(v, 180.0));
        match (lat, long) {
            (Some(lat), Some(long)) => {
                let (lat, long) = (lat.to_string(), long.to_string());
                writer.write_record([bank, lat.as_str(), long.as_str()])?;
                rows += 1;
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("{bank}: skipped {skipped} rows without coordinates");
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn parses_bank_source() {
        let source: BankSource = "Kapital Bank=data/kb_branches.csv".parse().unwrap();
        assert_eq!(source.bank, "Kapital Bank");
        assert_eq!(source.path, PathBuf::from("data/kb_branches.csv"));
        assert!("data/kb.csv".parse::<BankSource>().is_err());
        assert!("=data/kb.csv".parse::<BankSource>().is_err());
    }

    #[test]
    fn merged_table_loads_as_dataset() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([BANK_COLUMN, "lat", "long"]).unwrap();
        let kapital = "id,latitude,longitude\n1,40.37,49.83\n2,,\n3,40.68,46.36\n";
        let abb = "name,lat,lng\nCentral,40.41,49.86\n";
        assert_eq!(append(&mut writer, "Kapital Bank", kapital.as_bytes()).unwrap(), 2);
        assert_eq!(append(&mut writer, "ABB", abb.as_bytes()).unwrap(), 1);
        let bytes = writer.into_inner().unwrap();

        let dataset = Dataset::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.banks(), vec!["Kapital Bank", "ABB"]);
        assert_eq!(dataset.branches[2].coord.long, 49.86);
    }

    #[test]
    fn source_without_coordinates_is_rejected() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        assert!(append(&mut writer, "X", "id,name\n1,a\n".as_bytes()).is_err());
    }
}
