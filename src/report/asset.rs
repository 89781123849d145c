use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use color_eyre::{Result, eyre::WrapErr};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::Analysis,
    geo::{BoundingBox, Region, Zone},
    palette,
};

/// Everything the terminal dashboard needs, written once per analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAsset {
    pub generated_at: String,
    pub focus_bank: String,
    pub total_branches: usize,
    pub baku_city: BoundingBox,
    /// Largest bank first.
    pub banks: Vec<BankEntry>,
    pub branches: Vec<BranchEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankEntry {
    pub name: String,
    pub branches: usize,
    pub share: f64,
    /// `#rrggbb`
    pub colour: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub bank: String,
    pub lat: f64,
    pub long: f64,
    pub region: Region,
    pub zone: Zone,
    /// `-1` for branches outside every cluster.
    pub cluster: i64,
}

impl DashboardAsset {
    pub fn new(analysis: &Analysis, generated_at: &str) -> Self {
        let colours = analysis.bank_colours();
        let banks = analysis
            .counts
            .banks
            .iter()
            .zip(&colours)
            .map(|(bank, (_, colour))| BankEntry {
                name: bank.bank.clone(),
                branches: bank.branches,
                share: bank.share,
                colour: palette::to_hex(*colour),
            })
            .collect();
        let branches = analysis
            .branches
            .iter()
            .zip(&analysis.regions)
            .zip(&analysis.zones)
            .zip(&analysis.labels)
            .map(|(((branch, region), zone), label)| BranchEntry {
                bank: branch.bank.clone(),
                lat: branch.coord.lat,
                long: branch.coord.long,
                region: *region,
                zone: *zone,
                cluster: label.as_i64(),
            })
            .collect();
        Self {
            generated_at: generated_at.to_string(),
            focus_bank: analysis.focus_bank().to_string(),
            total_branches: analysis.counts.total,
            baku_city: analysis.config.baku_city,
            banks,
            branches,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).wrap_err_with(|| format!("could not open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("{} is not a dashboard asset", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).wrap_err_with(|| format!("could not create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn bank(&self, name: &str) -> Option<&BankEntry> {
        self.banks.iter().find(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_json_is_readable_back() {
        let raw = r##"{
            "generated_at": "2025-01-01 10:00:00",
            "focus_bank": "Focus",
            "total_branches": 2,
            "baku_city": {"lat_min": 40.3, "lat_max": 40.5, "long_min": 49.7, "long_max": 50.0},
            "banks": [
                {"name": "Other", "branches": 1, "share": 50.0, "colour": "#1f77b4"},
                {"name": "Focus", "branches": 1, "share": 50.0, "colour": "#e74c3c"}
            ],
            "branches": [
                {"bank": "Other", "lat": 40.4, "long": 49.8, "region": "Baku", "zone": "Baku City", "cluster": -1},
                {"bank": "Focus", "lat": 40.7, "long": 46.4, "region": "Regions", "zone": "Northwest", "cluster": 0}
            ]
        }"##;
        let asset: DashboardAsset = serde_json::from_str(raw).unwrap();
        assert_eq!(asset.branches[0].zone, Zone::BakuCity);
        assert_eq!(asset.branches[1].region, Region::Regions);
        assert_eq!(asset.bank("Focus").unwrap().colour, "#e74c3c");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branches.json");
        asset.write(&path).unwrap();
        assert_eq!(DashboardAsset::load(&path).unwrap(), asset);
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = DashboardAsset::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
