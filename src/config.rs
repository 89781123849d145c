use std::path::Path;

use color_eyre::{Result, eyre::WrapErr};
use serde::Deserialize;

use crate::geo::{BoundingBox, Coord, to_km};

/// Every tunable of an analysis run. Missing keys in a TOML file fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub focus_bank: String,
    pub km_per_degree: f64,
    pub baku_city: BoundingBox,
    pub clustering: ClusteringConfig,
    /// Competitor branches farther than this from any focus branch are gaps.
    pub gap_threshold: f64,
    pub top_gaps: usize,
    pub intensity_radius: f64,
    pub histogram_bins: usize,
    /// Focus share (percent) below which a cluster counts as underserved.
    pub underserved_share: f64,
    pub market_share_target: f64,
    pub opportunity: OpportunityConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            focus_bank: "AzerTurk Bank".to_string(),
            km_per_degree: 111.0,
            baku_city: BoundingBox::new(40.3, 40.5, 49.7, 50.0),
            clustering: ClusteringConfig::default(),
            gap_threshold: 0.3,
            top_gaps: 15,
            intensity_radius: 0.1,
            histogram_bins: 15,
            underserved_share: 5.0,
            market_share_target: 0.10,
            opportunity: OpportunityConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read config {}", path.display()))?;
        Self::from_toml(&raw).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn km(&self, degrees: f64) -> f64 {
        to_km(degrees, self.km_per_degree)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusteringConfig {
    pub eps: f64,
    pub min_samples: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpportunityConfig {
    pub metro: ScanConfig,
    pub regional: ScanConfig,
    /// Margin added around the branches outside the metro box.
    pub regional_padding: f64,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            metro: ScanConfig {
                bounds: Some(BoundingBox::new(40.30, 40.65, 49.60, 50.20)),
                resolution: 35,
                distance_weight: 15.0,
                competitor_weight: 0.8,
                competitor_radius: 0.05,
                top_n: 15,
                fallback_anchor: Coord::new(40.4, 49.85),
            },
            regional: ScanConfig {
                bounds: None,
                resolution: 30,
                distance_weight: 10.0,
                competitor_weight: 0.5,
                competitor_radius: 0.3,
                top_n: 15,
                fallback_anchor: Coord::new(40.0, 48.0),
            },
            regional_padding: 0.1,
        }
    }
}

/// One grid scan of the growth opportunity score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// `None` derives the bounds from the data.
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    pub resolution: usize,
    pub distance_weight: f64,
    pub competitor_weight: f64,
    pub competitor_radius: f64,
    pub top_n: usize,
    /// Stands in for the focus network when the area has no focus branch.
    pub fallback_anchor: Coord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.focus_bank, "AzerTurk Bank");
        assert_eq!(config.opportunity.metro.resolution, 35);
        assert!(config.opportunity.regional.bounds.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AnalysisConfig::from_toml(
            r#"
            focus_bank = "Kapital Bank"
            gap_threshold = 0.25

            [clustering]
            min_samples = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.focus_bank, "Kapital Bank");
        assert_eq!(config.gap_threshold, 0.25);
        assert_eq!(config.clustering.min_samples, 3);
        assert_eq!(config.clustering.eps, 0.5);
        assert_eq!(config.intensity_radius, 0.1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AnalysisConfig::from_toml("focus = \"x\"").is_err());
    }

    #[test]
    fn degrees_convert_to_km() {
        let config = AnalysisConfig::default();
        assert!((config.km(0.3) - 33.3).abs() < 1e-9);
    }
}
