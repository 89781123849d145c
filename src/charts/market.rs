use std::path::Path;

use color_eyre::Result;

use super::panels::{Bar, Series, canvas, grouped_bars, hbars, notice};
use crate::{
    analysis::{Analysis, metrics::PROFILE_METRICS},
    palette,
};

fn count_bar(analysis: &Analysis, bank: &str, value: f64, text: String) -> Bar {
    let colour = if bank == analysis.focus_bank() {
        palette::FOCUS
    } else {
        palette::COMPETITOR
    };
    Bar {
        label: bank.to_string(),
        value,
        colour,
        text,
    }
}

/// `#<rank> <bank>`, tied banks sharing a rank.
pub fn rank_label(analysis: &Analysis, bank: &str, branches: usize) -> String {
    format!("#{} {bank}", analysis.counts.rank_for(branches))
}

pub fn branch_count(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(
        path,
        (1400, 800),
        &format!("Branch Network Size: {} vs Competitors", analysis.focus_bank()),
    )?;
    let bars: Vec<Bar> = analysis
        .counts
        .banks
        .iter()
        .map(|b| count_bar(analysis, &b.bank, b.branches as f64, b.branches.to_string()))
        .collect();
    hbars(&root, "Branches per bank", "Number of branches", &bars)?;
    root.present()?;
    Ok(())
}

pub fn market_share(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Market Share Analysis")?;
    let panels = root.split_evenly((1, 2));

    let ranking: Vec<Bar> = analysis
        .counts
        .banks
        .iter()
        .map(|b| {
            let mut bar = count_bar(
                analysis,
                &b.bank,
                b.branches as f64,
                format!("{} ({:.1}%)", b.branches, b.share),
            );
            bar.label = rank_label(analysis, &b.bank, b.branches);
            bar
        })
        .collect();
    hbars(&panels[0], "Ranking by branch count", "Branches", &ranking)?;

    let focus = analysis.focus_bank();
    let mut compared: Vec<Bar> = analysis
        .counts
        .top_excluding(focus, 5)
        .into_iter()
        .map(|b| count_bar(analysis, &b.bank, b.share, format!("{:.1}%", b.share)))
        .collect();
    compared.insert(
        0,
        count_bar(
            analysis,
            focus,
            analysis.position.share,
            format!("{:.1}%", analysis.position.share),
        ),
    );
    hbars(
        &panels[1],
        &format!("{focus} vs top 5 competitors"),
        "Market share (%)",
        &compared,
    )?;
    root.present()?;
    Ok(())
}

pub fn baku_vs_regions(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Baku vs Regions")?;
    let panels = root.split_evenly((1, 2));

    let mut coverage: Vec<Bar> = analysis
        .splits
        .iter()
        .map(|s| {
            count_bar(
                analysis,
                &s.bank,
                s.regional_pct(),
                format!("{:.1}%", s.regional_pct()),
            )
        })
        .collect();
    coverage.sort_by(|a, b| b.value.total_cmp(&a.value));
    hbars(
        &panels[0],
        "Regional coverage per bank",
        "Branches outside Baku (%)",
        &coverage,
    )?;

    let focus = analysis.focus_bank();
    let mut banks: Vec<&str> = analysis
        .counts
        .top_excluding(focus, 4)
        .into_iter()
        .map(|b| b.bank.as_str())
        .collect();
    banks.insert(0, focus);
    let split_of = |bank: &str| analysis.splits.iter().find(|s| s.bank == bank);
    let series = vec![
        Series {
            label: "Baku".to_string(),
            colour: palette::COMPETITOR,
            values: banks
                .iter()
                .map(|b| split_of(b).map_or(0.0, |s| s.baku as f64))
                .collect(),
        },
        Series {
            label: "Regions".to_string(),
            colour: palette::FOCUS,
            values: banks
                .iter()
                .map(|b| split_of(b).map_or(0.0, |s| s.regions as f64))
                .collect(),
        },
    ];
    let categories: Vec<String> = banks.iter().map(|b| b.to_string()).collect();
    grouped_bars(
        &panels[1],
        "Baku and regional branches",
        "Branches",
        &categories,
        &series,
        |v| format!("{v:.0}"),
    )?;
    root.present()?;
    Ok(())
}

pub fn multi_metric(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(
        path,
        (1800, 800),
        &format!("Multi-Metric Comparison: {} vs Leaders", analysis.focus_bank()),
    )?;
    let (left, right) = root.split_horizontally(1100);
    let metric = &analysis.multi_metric;
    let series: Vec<Series> = metric
        .profiles
        .iter()
        .zip(&metric.normalized)
        .map(|(profile, values)| Series {
            label: profile.bank.clone(),
            colour: analysis.colour_of(&profile.bank),
            values: values.to_vec(),
        })
        .collect();
    let categories: Vec<String> = PROFILE_METRICS.iter().map(|m| m.to_string()).collect();
    grouped_bars(
        &left,
        "Normalised to 100",
        "Score",
        &categories,
        &series,
        |v| format!("{v:.0}"),
    )?;

    let mut lines = vec!["Bank | Branches | Geo spread | Baku % | Intensity".to_string()];
    lines.extend(metric.profiles.iter().map(|p| {
        format!(
            "{} | {} | {:.2} | {:.1}% | {:.1}",
            p.bank, p.branches, p.geo_spread, p.baku_pct, p.avg_intensity
        )
    }));
    notice(&right, &lines)?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AnalysisConfig,
        dataset::{Branch, Dataset},
    };

    fn tied_market() -> Analysis {
        let branches = vec![
            Branch::new("A", 40.40, 49.85),
            Branch::new("A", 40.41, 49.86),
            Branch::new("A", 40.42, 49.87),
            Branch::new("B", 40.43, 49.80),
            Branch::new("B", 40.44, 49.81),
            Branch::new("AzerTurk Bank", 40.45, 49.90),
            Branch::new("AzerTurk Bank", 40.46, 49.92),
        ];
        Analysis::run(&Dataset::new(branches), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn tied_banks_share_a_rank() {
        let analysis = tied_market();
        assert_eq!(analysis.position.rank, 2);
        assert_eq!(rank_label(&analysis, "B", 2), "#2 B");
        assert_eq!(rank_label(&analysis, "AzerTurk Bank", 2), "#2 AzerTurk Bank");
        assert_eq!(rank_label(&analysis, "A", 3), "#1 A");
    }

    #[test]
    fn ranking_chart_uses_market_rank() {
        let analysis = tied_market();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("02_market_share.svg");
        market_share(&analysis, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("#2 AzerTurk Bank"));
        assert!(!svg.contains("#3 AzerTurk Bank"));
    }
}
