//! SVG chart images of an analysis run.

mod competition;
mod maps;
mod market;
mod opportunity;
mod panels;
mod summary;

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::WrapErr};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::info;

use crate::analysis::Analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum Chart {
    BranchCount,
    MarketShare,
    GeographicDistribution,
    FocusVsCompetitors,
    RegionalClusters,
    BakuCity,
    BakuVsRegions,
    CompetitiveDensity,
    GapAnalysis,
    NearestCompetitor,
    CompetitiveIntensity,
    ZoneDominance,
    OpportunityMetro,
    OpportunityRegions,
    MultiMetric,
    ExecutiveSummary,
}

impl Chart {
    pub fn file_name(&self) -> &'static str {
        match self {
            Chart::BranchCount => "01_branch_count.svg",
            Chart::MarketShare => "02_market_share.svg",
            Chart::GeographicDistribution => "03_geographic_distribution.svg",
            Chart::FocusVsCompetitors => "04_focus_vs_competitors.svg",
            Chart::RegionalClusters => "05_regional_clusters.svg",
            Chart::BakuCity => "06_baku_city.svg",
            Chart::BakuVsRegions => "07_baku_vs_regions.svg",
            Chart::CompetitiveDensity => "08_competitive_density.svg",
            Chart::GapAnalysis => "09_gap_analysis.svg",
            Chart::NearestCompetitor => "10_nearest_competitor.svg",
            Chart::CompetitiveIntensity => "11_competitive_intensity.svg",
            Chart::ZoneDominance => "12_zone_dominance.svg",
            Chart::OpportunityMetro => "13a_opportunity_metro.svg",
            Chart::OpportunityRegions => "13b_opportunity_regions.svg",
            Chart::MultiMetric => "14_multi_metric.svg",
            Chart::ExecutiveSummary => "15_executive_summary.svg",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Chart::BranchCount => "Branch Network Size",
            Chart::MarketShare => "Market Share",
            Chart::GeographicDistribution => "Geographic Distribution",
            Chart::FocusVsCompetitors => "Focus Bank vs Top Competitors",
            Chart::RegionalClusters => "Regional Clusters",
            Chart::BakuCity => "Baku City",
            Chart::BakuVsRegions => "Baku vs Regions",
            Chart::CompetitiveDensity => "Competitive Density",
            Chart::GapAnalysis => "Gap Analysis",
            Chart::NearestCompetitor => "Nearest Competitor",
            Chart::CompetitiveIntensity => "Competitive Intensity",
            Chart::ZoneDominance => "Zone Dominance",
            Chart::OpportunityMetro => "Growth Opportunity: Baku-Absheron",
            Chart::OpportunityRegions => "Growth Opportunity: Regions",
            Chart::MultiMetric => "Multi-Metric Comparison",
            Chart::ExecutiveSummary => "Executive Summary",
        }
    }

    pub fn render(&self, analysis: &Analysis, path: &Path) -> Result<()> {
        match self {
            Chart::BranchCount => market::branch_count(analysis, path),
            Chart::MarketShare => market::market_share(analysis, path),
            Chart::GeographicDistribution => maps::geographic_distribution(analysis, path),
            Chart::FocusVsCompetitors => maps::focus_vs_competitors(analysis, path),
            Chart::RegionalClusters => maps::regional_clusters(analysis, path),
            Chart::BakuCity => maps::baku_city(analysis, path),
            Chart::BakuVsRegions => market::baku_vs_regions(analysis, path),
            Chart::CompetitiveDensity => maps::competitive_density(analysis, path),
            Chart::GapAnalysis => maps::gap_analysis(analysis, path),
            Chart::NearestCompetitor => competition::nearest_competitor(analysis, path),
            Chart::CompetitiveIntensity => competition::competitive_intensity(analysis, path),
            Chart::ZoneDominance => maps::zone_dominance(analysis, path),
            Chart::OpportunityMetro => opportunity::metro(analysis, path),
            Chart::OpportunityRegions => opportunity::regions(analysis, path),
            Chart::MultiMetric => market::multi_metric(analysis, path),
            Chart::ExecutiveSummary => summary::executive_summary(analysis, path),
        }
    }
}

/// Writes every chart into `dir`, creating it when needed.
pub fn render_all(analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("could not create {}", dir.display()))?;
    let mut written = Vec::new();
    for chart in Chart::iter() {
        let path = dir.join(chart.file_name());
        chart
            .render(analysis, &path)
            .wrap_err_with(|| format!("could not render {chart}"))?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
