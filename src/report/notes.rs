//! A short reading guide for every chart image.

use std::fmt::Write;

use color_eyre::Result;
use strum::IntoEnumIterator;

use crate::{
    analysis::{Analysis, opportunity::OpportunityScan},
    charts::Chart,
    geo::Region,
};

pub fn render(analysis: &Analysis) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# Chart notes: {}", analysis.focus_bank())?;
    writeln!(out)?;
    for chart in Chart::iter() {
        writeln!(out, "## {} (`{}`)", chart.title(), chart.file_name())?;
        writeln!(out)?;
        writeln!(out, "{}", note(analysis, chart))?;
        writeln!(out)?;
    }
    Ok(out)
}

fn note(analysis: &Analysis, chart: Chart) -> String {
    let focus = analysis.focus_bank();
    let position = &analysis.position;
    match chart {
        Chart::BranchCount => format!(
            "Branch counts of all {} banks, largest first. {focus} ranks #{} with {} branches, {} behind {}.",
            position.bank_count, position.rank, position.branches, position.gap_to_leader, position.leader
        ),
        Chart::MarketShare => format!(
            "Share of the {} branches in the dataset. {focus} holds {:.1}%.",
            analysis.counts.total, position.share
        ),
        Chart::GeographicDistribution => {
            "Every branch on one map, one colour per bank, with the focus bank drawn on top.".to_string()
        }
        Chart::FocusVsCompetitors => format!(
            "{focus} next to the three largest competitors, each over the full network in grey."
        ),
        Chart::RegionalClusters => format!(
            "Density-based clusters (radius {:.2}°, at least {} branches). {} clusters found; grey triangles are outliers.",
            analysis.config.clustering.eps, analysis.config.clustering.min_samples, analysis.clusters
        ),
        Chart::BakuCity => {
            let inside = analysis
                .regions
                .iter()
                .filter(|r| **r == Region::Baku)
                .count();
            format!("Branches inside the Baku city box ({inside} in total) and the count per bank.")
        }
        Chart::BakuVsRegions => match analysis.focus_split() {
            Some(split) => format!(
                "Baku and regional branches per bank. {focus} has {} in Baku and {} in the regions ({:.1}% regional).",
                split.baku,
                split.regions,
                split.regional_pct()
            ),
            None => "Baku and regional branches per bank.".to_string(),
        },
        Chart::CompetitiveDensity => {
            "Kernel density of the network evaluated at each branch. Warmer points sit in denser areas.".to_string()
        }
        Chart::GapAnalysis => format!(
            "{} competitor branches lie more than {:.2}° (~{:.0} km) from the nearest {focus} branch. The bars list the farthest.",
            analysis.gaps.len(),
            analysis.gaps.threshold,
            analysis.km(analysis.gaps.threshold)
        ),
        Chart::NearestCompetitor => match analysis.nearest.mean_distance() {
            Some(mean) => format!(
                "Distance from each {focus} branch to its closest competitor, {mean:.4}° (~{:.1} km) on average, and which bank that competitor belongs to.",
                analysis.km(mean)
            ),
            None => format!("No competitor branch to measure {focus} against."),
        },
        Chart::CompetitiveIntensity => format!(
            "Branches of any bank within {:.2}° of each branch, averaged per bank. {focus} averages {:.1}.",
            analysis.config.intensity_radius,
            analysis.focus_intensity().map_or(0.0, |i| i.average())
        ),
        Chart::ZoneDominance => {
            let leading = analysis
                .zone_standings
                .iter()
                .filter(|s| s.focus_rank == Some(1))
                .count();
            format!(
                "Branches per geographic zone. {focus} leads in {leading} of {} zones.",
                analysis.zone_standings.len()
            )
        }
        Chart::OpportunityMetro => scan_note(analysis.metro.as_ref(), "Baku-Absheron"),
        Chart::OpportunityRegions => scan_note(analysis.regional.as_ref(), "the regions"),
        Chart::MultiMetric => format!(
            "Branch count, geographic spread, Baku concentration and competitive intensity of {} banks, each scaled to 0-100.",
            analysis.multi_metric.profiles.len()
        ),
        Chart::ExecutiveSummary => format!(
            "One page overview: rank, benchmark, opportunities, footprint, direct competitors and intensity. {} additional branches reach a {:.0}% share.",
            analysis.growth.needed,
            analysis.growth.target_share * 100.0
        ),
    }
}

fn scan_note(scan: Option<&OpportunityScan>, area: &str) -> String {
    match scan.and_then(|s| s.sites.first().map(|top| (s, top))) {
        Some((scan, top)) => format!(
            "Opportunity score over a grid of {area}: distance from the focus network plus nearby competitor activity. The best of {} sites is near {} at {} (score {:.2}).",
            scan.sites.len(),
            top.place.unwrap_or("an unnamed area"),
            top.coord,
            top.score
        ),
        None => format!("No opportunity scan for {area}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AnalysisConfig,
        dataset::{Branch, Dataset},
    };

    #[test]
    fn one_section_per_chart() {
        let branches = (0..6)
            .flat_map(|i| {
                let step = i as f64 * 0.01;
                [
                    Branch::new("Other", 40.40 + step, 49.85),
                    Branch::new("AzerTurk Bank", 40.41, 49.86 + step),
                ]
            })
            .collect();
        let analysis = Analysis::run(&Dataset::new(branches), &AnalysisConfig::default()).unwrap();
        let notes = render(&analysis).unwrap();
        assert_eq!(notes.matches("\n## ").count(), Chart::iter().count());
        assert!(notes.contains("`15_executive_summary.svg`"));
        assert!(notes.contains("No opportunity scan for the regions."));
    }
}
