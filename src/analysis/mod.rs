//! The branch network analysis, computed once over a loaded dataset.

pub mod cluster;
pub mod density;
pub mod market;
pub mod metrics;
pub mod opportunity;
pub mod proximity;
pub mod regions;
pub mod stats;

use color_eyre::{Result, eyre::eyre};
use tracing::{debug, info, warn};

use self::{
    cluster::{ClusterLabel, ClusterPresence, DbscanParams, cluster_count, cluster_presence, dbscan},
    density::GaussianKde,
    market::{FocusPosition, MarketCounts},
    metrics::{ExpansionSummary, GrowthPath, IndustryBenchmark, MultiMetric},
    opportunity::{OpportunityScan, metro_scan, regional_scan},
    proximity::{BankIntensity, GapAnalysis, NearestCompetitors, competitive_intensity},
    regions::{RegionSplit, ZoneStanding, region_splits, zone_standings},
};
use crate::{
    config::AnalysisConfig,
    dataset::{Branch, Dataset},
    geo::{Region, Zone},
    palette::{self, Rgb},
};

#[derive(Debug, Clone)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub branches: Vec<Branch>,
    pub dropped: usize,
    pub counts: MarketCounts,
    pub position: FocusPosition,

    pub regions: Vec<Region>,
    pub splits: Vec<RegionSplit>,
    pub zones: Vec<Zone>,
    pub zone_standings: Vec<ZoneStanding>,

    pub labels: Vec<ClusterLabel>,
    pub clusters: usize,
    pub presence: Vec<ClusterPresence>,

    /// Density of the whole network at every branch.
    pub density: Option<Vec<f64>>,
    /// Density of the competitor network at every competitor branch.
    pub competitor_density: Option<Vec<f64>>,

    pub gaps: GapAnalysis,
    pub nearest: NearestCompetitors,
    pub intensity: Vec<BankIntensity>,

    pub metro: Option<OpportunityScan>,
    pub regional: Option<OpportunityScan>,

    pub multi_metric: MultiMetric,
    pub benchmark: IndustryBenchmark,
    pub expansion: ExpansionSummary,
    pub growth: GrowthPath,
}

impl Analysis {
    /// Fails when the focus bank has no branch in the dataset.
    pub fn run(dataset: &Dataset, config: &AnalysisConfig) -> Result<Self> {
        let focus_bank = config.focus_bank.as_str();
        let branches = dataset.branches.clone();
        let counts = MarketCounts::from_banks(branches.iter().map(|b| b.bank.as_str()));
        let position = FocusPosition::new(&counts, focus_bank)
            .ok_or_else(|| eyre!("focus bank `{focus_bank}` has no branch in the dataset"))?;
        info!(
            "{focus_bank}: {} branches, rank #{} of {}, {:.1}% share",
            position.branches, position.rank, position.bank_count, position.share
        );

        let regions: Vec<Region> = branches
            .iter()
            .map(|b| Region::classify(&b.coord, &config.baku_city))
            .collect();
        let splits = region_splits(&branches, &counts, &config.baku_city);
        let zones: Vec<Zone> = branches.iter().map(|b| Zone::classify(&b.coord)).collect();
        let zone_standings = zone_standings(&branches, focus_bank);

        let coords = dataset.coords();
        let labels = dbscan(
            &coords,
            DbscanParams {
                eps: config.clustering.eps,
                min_samples: config.clustering.min_samples,
            },
        );
        let clusters = cluster_count(&labels);
        let presence = cluster_presence(&branches, &labels, focus_bank);
        info!(
            "{clusters} clusters, {} outliers",
            labels.iter().filter(|l| **l == ClusterLabel::Noise).count()
        );

        let density = GaussianKde::fit(&coords).map(|kde| kde.evaluate_all(&coords));
        let competitor_coords: Vec<_> = dataset.not_of_bank(focus_bank).map(|b| b.coord).collect();
        let competitor_density =
            GaussianKde::fit(&competitor_coords).map(|kde| kde.evaluate_all(&competitor_coords));
        if density.is_none() || competitor_density.is_none() {
            warn!("kernel density skipped, too few or collinear points");
        }

        let focus: Vec<&Branch> = dataset.of_bank(focus_bank).collect();
        let competitors: Vec<&Branch> = dataset.not_of_bank(focus_bank).collect();
        let gaps = GapAnalysis::new(&focus, &competitors, config.gap_threshold);
        let nearest = NearestCompetitors::new(&focus, &competitors);
        let intensity = competitive_intensity(&branches, &counts, config.intensity_radius);
        info!(
            "{} gap sites beyond {:.2}°, nearest competitor at {:.4}° on average",
            gaps.len(),
            config.gap_threshold,
            nearest.mean_distance().unwrap_or_default()
        );

        let metro = metro_scan(&branches, focus_bank, &config.opportunity);
        let regional = regional_scan(&branches, focus_bank, &config.opportunity);
        if regional.is_none() {
            debug!("no branch outside the metro box, regional scan skipped");
        }

        let multi_metric = MultiMetric::new(&branches, &counts, &splits, &intensity, focus_bank);
        let benchmark = IndustryBenchmark::new(&counts, &splits, focus_bank);
        let expansion = ExpansionSummary::new(
            &gaps,
            &presence,
            &splits,
            focus_bank,
            config.underserved_share,
        );
        let growth = GrowthPath::new(&counts, focus_bank, config.market_share_target);

        Ok(Self {
            config: config.clone(),
            branches,
            dropped: dataset.dropped,
            counts,
            position,
            regions,
            splits,
            zones,
            zone_standings,
            labels,
            clusters,
            presence,
            density,
            competitor_density,
            gaps,
            nearest,
            intensity,
            metro,
            regional,
            multi_metric,
            benchmark,
            expansion,
            growth,
        })
    }

    pub fn focus_bank(&self) -> &str {
        &self.config.focus_bank
    }

    pub fn is_focus(&self, branch: &Branch) -> bool {
        branch.bank == self.config.focus_bank
    }

    pub fn focus_branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter().filter(|b| self.is_focus(b))
    }

    pub fn competitor_branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter().filter(|b| !self.is_focus(b))
    }

    pub fn focus_split(&self) -> Option<&RegionSplit> {
        self.splits.iter().find(|s| s.bank == self.config.focus_bank)
    }

    pub fn focus_intensity(&self) -> Option<&BankIntensity> {
        self.intensity
            .iter()
            .find(|i| i.bank == self.config.focus_bank)
    }

    pub fn km(&self, degrees: f64) -> f64 {
        self.config.km(degrees)
    }

    /// Display colour of every bank, largest bank first.
    pub fn bank_colours(&self) -> Vec<(&str, Rgb)> {
        palette::bank_colours(
            self.counts.banks.iter().map(|b| b.bank.as_str()),
            self.focus_bank(),
        )
    }

    pub fn colour_of(&self, bank: &str) -> Rgb {
        self.bank_colours()
            .into_iter()
            .find(|(name, _)| *name == bank)
            .map_or(palette::MUTED, |(_, colour)| colour)
    }
}
