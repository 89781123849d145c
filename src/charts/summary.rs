use std::path::Path;

use color_eyre::Result;

use super::{
    market::rank_label,
    panels::{Bar, Series, canvas, grouped_bars, hbars, histogram, notice},
};
use crate::{analysis::Analysis, palette};

/// Six panels: ranking, benchmark, opportunities, footprint, direct
/// competitors and intensity.
pub fn executive_summary(analysis: &Analysis, path: &Path) -> Result<()> {
    let focus = analysis.focus_bank();
    let root = canvas(
        path,
        (2000, 1100),
        &format!("{focus}: Executive Summary"),
    )?;
    let panels = root.split_evenly((2, 3));

    // ranking
    let ranking: Vec<Bar> = analysis
        .counts
        .top(8)
        .iter()
        .map(|b| Bar {
            label: rank_label(analysis, &b.bank, b.branches),
            value: b.branches as f64,
            colour: if b.bank == focus {
                palette::FOCUS
            } else {
                palette::MUTED
            },
            text: b.branches.to_string(),
        })
        .collect();
    hbars(&panels[0], "Market position", "Branches", &ranking)?;

    // benchmark
    let bench = &analysis.benchmark;
    let categories = vec![
        "Branches".to_string(),
        "Market share %".to_string(),
        "Regional coverage %".to_string(),
    ];
    let series = vec![
        Series {
            label: focus.to_string(),
            colour: palette::FOCUS,
            values: vec![
                bench.focus_branches as f64,
                bench.focus_share,
                bench.focus_regional_pct,
            ],
        },
        Series {
            label: "Industry average".to_string(),
            colour: palette::COMPETITOR,
            values: vec![bench.avg_branches, bench.avg_share, bench.avg_regional_pct],
        },
    ];
    grouped_bars(
        &panels[1],
        "Focus bank vs industry average",
        "Value",
        &categories,
        &series,
        |v| format!("{v:.1}"),
    )?;

    // opportunities
    let expansion = &analysis.expansion;
    let categories = vec![
        "High gap areas".to_string(),
        "Underserved clusters".to_string(),
        "Regional gap".to_string(),
    ];
    let series = vec![Series {
        label: "Opportunities".to_string(),
        colour: palette::HIGHLIGHT,
        values: vec![
            expansion.gap_sites as f64,
            expansion.underserved_clusters as f64,
            expansion.regional_gap as f64,
        ],
    }];
    grouped_bars(
        &panels[2],
        "Expansion opportunities",
        "Count",
        &categories,
        &series,
        |v| format!("{v:.0}"),
    )?;

    // footprint
    match analysis.focus_split() {
        Some(split) => {
            let bars = vec![
                Bar {
                    label: "Baku".to_string(),
                    value: split.baku_pct(),
                    colour: palette::COMPETITOR,
                    text: format!("{:.1}% ({} br.)", split.baku_pct(), split.baku),
                },
                Bar {
                    label: "Regions".to_string(),
                    value: split.regional_pct(),
                    colour: palette::FOCUS,
                    text: format!("{:.1}% ({} br.)", split.regional_pct(), split.regions),
                },
            ];
            hbars(&panels[3], "Geographic distribution", "Share of branches (%)", &bars)?;
        }
        None => notice(&panels[3], &["No focus branch".to_string()])?,
    }

    // direct competitors
    let frequency = &analysis.nearest.frequency;
    let total = frequency.total.max(1) as f64;
    let direct: Vec<Bar> = frequency
        .top(5)
        .iter()
        .map(|b| Bar {
            label: b.bank.clone(),
            value: b.branches as f64,
            colour: analysis.colour_of(&b.bank),
            text: format!("{:.0}%", b.branches as f64 / total * 100.0),
        })
        .collect();
    hbars(&panels[4], "Most frequent direct competitors", "Times nearest", &direct)?;

    // intensity
    let intensity = analysis.focus_intensity();
    match intensity.and_then(|i| i.histogram(12)) {
        Some(hist) => {
            let mean = intensity.map_or(0.0, |i| i.average());
            histogram(
                &panels[5],
                "Competitive intensity distribution",
                "Branches nearby",
                &hist,
                palette::FOCUS,
                &[(format!("Mean {mean:.1}"), mean, palette::INK)],
            )?;
        }
        None => notice(&panels[5], &["No intensity data".to_string()])?,
    }

    root.present()?;
    Ok(())
}
