//! Written outputs of an analysis run besides the charts.

pub mod asset;
mod insights;
mod notes;

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::WrapErr};
use time::{OffsetDateTime, macros::format_description};
use tracing::info;

use self::asset::DashboardAsset;
use crate::{
    analysis::Analysis,
    strings::{CHART_NOTES_FILE, DASHBOARD_ASSET_FILE, DASHBOARD_DIR, DOCS_DIR, INSIGHTS_FILE},
};

pub use self::{insights::render as strategic_insights, notes::render as chart_notes};

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp() -> Result<String> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(OffsetDateTime::now_utc().format(&format)?)
}

/// One line per headline figure, printed at the end of a run.
pub fn key_insights(analysis: &Analysis) -> Vec<String> {
    let focus = analysis.focus_bank();
    let position = &analysis.position;
    let mut lines = vec![format!(
        "{focus} ranks #{} of {} banks with {} branches ({:.1}% share)",
        position.rank, position.bank_count, position.branches, position.share
    )];
    if let Some(split) = analysis.focus_split() {
        lines.push(format!(
            "{:.1}% of {focus} branches are in Baku",
            split.baku_pct()
        ));
    }
    lines.push(format!(
        "{} competitor branches are more than {:.0} km from any {focus} branch",
        analysis.gaps.len(),
        analysis.km(analysis.gaps.threshold)
    ));
    if let Some(intensity) = analysis.focus_intensity() {
        lines.push(format!(
            "{:.1} branches operate within {:.0} km of a {focus} branch on average",
            intensity.average(),
            analysis.km(analysis.config.intensity_radius)
        ));
    }
    lines.push(format!(
        "{} additional branches reach a {:.0}% market share",
        analysis.growth.needed,
        analysis.growth.target_share * 100.0
    ));
    lines
}

/// Writes the insights and chart notes under `docs/` and the dashboard
/// asset under `dashboard/`.
pub fn write_all(analysis: &Analysis, out_dir: &Path, generated_at: &str) -> Result<Vec<PathBuf>> {
    let docs = out_dir.join(DOCS_DIR);
    let dashboard = out_dir.join(DASHBOARD_DIR);
    for dir in [&docs, &dashboard] {
        fs::create_dir_all(dir).wrap_err_with(|| format!("could not create {}", dir.display()))?;
    }

    let insights_path = docs.join(INSIGHTS_FILE);
    write_text(&insights_path, &strategic_insights(analysis, generated_at)?)?;
    let notes_path = docs.join(CHART_NOTES_FILE);
    write_text(&notes_path, &chart_notes(analysis)?)?;
    let asset_path = dashboard.join(DASHBOARD_ASSET_FILE);
    DashboardAsset::new(analysis, generated_at).write(&asset_path)?;
    info!("wrote {}", asset_path.display());

    Ok(vec![insights_path, notes_path, asset_path])
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).wrap_err_with(|| format!("could not write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AnalysisConfig,
        dataset::{Branch, Dataset},
    };

    fn analysis() -> Analysis {
        let mut branches: Vec<Branch> = (0..5)
            .map(|i| Branch::new("Other", 40.40 + i as f64 * 0.01, 49.85))
            .collect();
        branches.push(Branch::new("AzerTurk Bank", 40.40, 49.86));
        Analysis::run(&Dataset::new(branches), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn timestamp_has_seconds_precision() {
        let stamp = timestamp().unwrap();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[10..11], " ");
    }

    #[test]
    fn five_key_insights() {
        let lines = key_insights(&analysis());
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "AzerTurk Bank ranks #2 of 2 banks with 1 branches (16.7% share)"
        );
        assert_eq!(lines[1], "100.0% of AzerTurk Bank branches are in Baku");
        assert_eq!(lines[4], "0 additional branches reach a 10% market share");
    }

    #[test]
    fn writes_docs_and_asset() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_all(&analysis(), dir.path(), "2025-01-01 00:00:00").unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));
        let asset = DashboardAsset::load(&dir.path().join("dashboard/branches.json")).unwrap();
        assert_eq!(asset.total_branches, 6);
    }
}
