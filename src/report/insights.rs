//! The strategic insights report, in markdown.

use std::fmt::Write;

use color_eyre::Result;

use crate::analysis::{
    Analysis,
    opportunity::{OpportunityScan, OpportunitySite},
};

/// Rows of the expansion site tables.
const SITE_ROWS: usize = 10;

fn priority(high: bool) -> &'static str {
    if high { "HIGH" } else { "MEDIUM" }
}

pub fn render(analysis: &Analysis, generated_at: &str) -> Result<String> {
    let mut out = String::new();
    let focus = analysis.focus_bank();
    let position = &analysis.position;
    let bench = &analysis.benchmark;
    let growth = &analysis.growth;
    let gaps = analysis.gaps.len();
    let (baku, regions) = analysis
        .focus_split()
        .map_or((0, 0), |s| (s.baku, s.regions));
    let baku_pct = analysis.focus_split().map_or(0.0, |s| s.baku_pct());
    let regional_pct = bench.focus_regional_pct;
    let intensity = analysis.focus_intensity().map_or(0.0, |i| i.average());
    let radius_km = analysis.km(analysis.config.intensity_radius);
    let direct: Vec<&str> = analysis
        .nearest
        .frequency
        .top(3)
        .iter()
        .map(|b| b.bank.as_str())
        .collect();

    writeln!(out, "# {focus}: Strategic Analysis & Actionable Insights")?;
    writeln!(out)?;
    writeln!(out, "Generated: {generated_at}")?;
    writeln!(out)?;

    writeln!(out, "## Executive summary")?;
    writeln!(out)?;
    writeln!(out, "### Current market position")?;
    writeln!(out)?;
    writeln!(
        out,
        "- Market rank: #{} out of {} banks",
        position.rank, position.bank_count
    )?;
    writeln!(out, "- Total branches: {}", position.branches)?;
    writeln!(out, "- Market share: {:.1}%", position.share)?;
    writeln!(
        out,
        "- Gap to market leader ({}): {} branches",
        position.leader, position.gap_to_leader
    )?;
    writeln!(out)?;

    writeln!(out, "### Geographic footprint")?;
    writeln!(out)?;
    writeln!(
        out,
        "- Baku concentration: {baku}/{} branches ({baku_pct:.1}%)",
        position.branches
    )?;
    writeln!(
        out,
        "- Regional presence: {regions}/{} branches ({regional_pct:.1}%)",
        position.branches
    )?;
    writeln!(
        out,
        "- Average competitive intensity: {intensity:.1} branches within {radius_km:.0} km"
    )?;
    writeln!(out)?;

    writeln!(out, "### Competitive landscape")?;
    writeln!(out)?;
    if direct.is_empty() {
        writeln!(out, "- No competitor branch in the dataset")?;
    } else {
        writeln!(out, "- Most frequent direct competitors: {}", direct.join(", "))?;
    }
    if let Some(mean) = analysis.nearest.mean_distance() {
        writeln!(
            out,
            "- Average distance to nearest competitor: {mean:.4}° (~{:.1} km)",
            analysis.km(mean)
        )?;
    }
    writeln!(
        out,
        "- {gaps} competitor locations more than {:.0} km from the nearest {focus} branch",
        analysis.km(analysis.gaps.threshold)
    )?;
    writeln!(out)?;

    writeln!(out, "## Strategic recommendations")?;
    writeln!(out)?;

    let below_average = regional_pct < bench.avg_regional_pct;
    writeln!(
        out,
        "### 1. Regional expansion (priority: {})",
        priority(below_average)
    )?;
    writeln!(out)?;
    if below_average {
        writeln!(
            out,
            "- Regional coverage ({regional_pct:.1}%) is below the industry average ({:.1}%).",
            bench.avg_regional_pct
        )?;
    } else {
        writeln!(
            out,
            "- Regional coverage ({regional_pct:.1}%) is at or above the industry average ({:.1}%).",
            bench.avg_regional_pct
        )?;
    }
    writeln!(
        out,
        "- {} clusters where the {focus} share is below {:.0}%.",
        analysis.expansion.underserved_clusters, analysis.config.underserved_share
    )?;
    writeln!(
        out,
        "- The bank strongest in the regions has {} more regional branches.",
        analysis.expansion.regional_gap
    )?;
    let cities = target_places(analysis.regional.as_ref());
    if !cities.is_empty() {
        writeln!(out, "- Target cities: {}", cities.join(", "))?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "### 2. Strategic location selection (priority: {})",
        priority(gaps > 0)
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "- Gap analysis found {gaps} competitor locations far from {focus} branches."
    )?;
    writeln!(
        out,
        "- The growth opportunity score ranks grid locations by distance from the {focus} network and nearby competitor activity (charts 13a and 13b)."
    )?;
    writeln!(
        out,
        "- Prioritise locations more than {:.2}° from the nearest {focus} branch.",
        analysis.gaps.threshold
    )?;
    writeln!(out)?;

    writeln!(out, "### 3. Competitive positioning (priority: MEDIUM)")?;
    writeln!(out)?;
    if !direct.is_empty() {
        writeln!(out, "- Main competitors in proximity: {}", direct.join(", "))?;
    }
    writeln!(
        out,
        "- On average {intensity:.1} branches operate within {radius_km:.0} km of each {focus} branch."
    )?;
    writeln!(
        out,
        "- In dense areas differentiate on service rather than proximity."
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "### 4. Market share growth path (priority: {})",
        priority(growth.needed > 0)
    )?;
    writeln!(out)?;
    writeln!(out, "- Current market share: {:.1}%", position.share)?;
    writeln!(
        out,
        "- To reach {:.0}% market share: {} additional branches",
        growth.target_share * 100.0,
        growth.needed
    )?;
    if let Some(fifth) = growth.to_match_fifth {
        writeln!(out, "- To match the #5 bank: {fifth} additional branches")?;
    }
    writeln!(out)?;
    writeln!(out, "| Phase | New branches |")?;
    writeln!(out, "| --- | --- |")?;
    for (i, phase) in growth.phases.iter().enumerate() {
        writeln!(out, "| Year {} | {phase} |", i + 1)?;
    }
    writeln!(out)?;

    writeln!(out, "### 5. Network optimisation (priority: LOW)")?;
    writeln!(out)?;
    writeln!(
        out,
        "- Audit the {} existing branches and relocate underperformers towards gap areas.",
        position.branches
    )?;
    writeln!(out)?;

    writeln!(out, "## Key performance indicators")?;
    writeln!(out)?;
    writeln!(
        out,
        "- Market share (target: {:.0}%)",
        growth.target_share * 100.0
    )?;
    writeln!(out, "- Rank position (current: #{})", position.rank)?;
    writeln!(
        out,
        "- Regional branch percentage (current: {regional_pct:.1}%)"
    )?;
    writeln!(out, "- Market gaps closed (of {gaps} identified)")?;
    writeln!(out, "- Average competitive intensity per branch")?;
    writeln!(out)?;

    writeln!(out, "## Recommended expansion sites")?;
    writeln!(out)?;
    write_sites(&mut out, "Baku-Absheron", analysis.metro.as_ref(), analysis)?;
    write_sites(&mut out, "Regions", analysis.regional.as_ref(), analysis)?;

    writeln!(out, "## Conclusion")?;
    writeln!(out)?;
    writeln!(
        out,
        "{focus} holds {} branches ({:.1}% market share, rank #{}). {gaps} gap locations and {} underserved clusters mark where growth is available; {} additional branches reach the {:.0}% target.",
        position.branches,
        position.share,
        position.rank,
        analysis.expansion.underserved_clusters,
        growth.needed,
        growth.target_share * 100.0
    )?;
    Ok(out)
}

/// Distinct places of the best regional sites, in rank order.
fn target_places(scan: Option<&OpportunityScan>) -> Vec<&'static str> {
    let mut places = Vec::new();
    for site in scan.map_or(&[][..], |s| &s.sites[..]) {
        if let Some(place) = site.place
            && !places.contains(&place)
        {
            places.push(place);
        }
        if places.len() == 5 {
            break;
        }
    }
    places
}

fn write_sites(
    out: &mut String,
    area: &str,
    scan: Option<&OpportunityScan>,
    analysis: &Analysis,
) -> Result<()> {
    writeln!(out, "### {area}")?;
    writeln!(out)?;
    let Some(scan) = scan else {
        writeln!(out, "No branches in this area.")?;
        writeln!(out)?;
        return Ok(());
    };
    if scan.used_fallback {
        writeln!(
            out,
            "{} has no branch here; distances are measured from {}.",
            analysis.focus_bank(),
            scan.anchors
                .first()
                .map(|c| c.to_string())
                .unwrap_or_default()
        )?;
        writeln!(out)?;
    }
    writeln!(
        out,
        "| # | Near | Latitude | Longitude | Score | Distance | Competitors nearby |"
    )?;
    writeln!(out, "| --- | --- | --- | --- | --- | --- | --- |")?;
    for site in scan.sites.iter().take(SITE_ROWS) {
        write_site(out, site, analysis)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_site(out: &mut String, site: &OpportunitySite, analysis: &Analysis) -> Result<()> {
    writeln!(
        out,
        "| {} | {} | {:.4} | {:.4} | {:.2} | {:.1} km | {} |",
        site.rank,
        site.place.unwrap_or("Unknown area"),
        site.coord.lat,
        site.coord.long,
        site.score,
        analysis.km(site.distance),
        site.competitors
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AnalysisConfig, dataset::{Branch, Dataset}};

    fn analysis() -> Analysis {
        let mut branches = Vec::new();
        for i in 0..8 {
            let step = i as f64 * 0.01;
            branches.push(Branch::new("Leader", 40.40 + step, 49.85 + step));
            branches.push(Branch::new("Leader", 40.68 + step, 46.36 - step));
        }
        for i in 0..4 {
            let step = i as f64 * 0.02;
            branches.push(Branch::new("AzerTurk Bank", 40.38 + step, 49.90 - step));
        }
        Analysis::run(&Dataset::new(branches), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn report_carries_the_computed_figures() {
        let report = render(&analysis(), "2025-01-01 10:00:00").unwrap();
        assert!(report.starts_with("# AzerTurk Bank: Strategic Analysis"));
        assert!(report.contains("Generated: 2025-01-01 10:00:00"));
        assert!(report.contains("- Market rank: #2 out of 2 banks"));
        assert!(report.contains("- Gap to market leader (Leader): 12 branches"));
        assert!(report.contains("- Most frequent direct competitors: Leader"));
        assert!(report.contains("### 1. Regional expansion (priority: HIGH)"));
        assert!(report.contains("| Year 1 |"));
        assert!(report.contains("### Regions"));
    }

    #[test]
    fn target_places_are_distinct() {
        let analysis = analysis();
        let places = target_places(analysis.regional.as_ref());
        let mut deduped = places.clone();
        deduped.dedup();
        assert_eq!(places.len(), deduped.len());
        assert!(target_places(None).is_empty());
    }
}
