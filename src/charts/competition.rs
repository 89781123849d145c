use std::path::Path;

use color_eyre::Result;

use super::panels::{Bar, canvas, hbars, histogram, notice};
use crate::{analysis::Analysis, palette};

pub fn nearest_competitor(analysis: &Analysis, path: &Path) -> Result<()> {
    let focus = analysis.focus_bank();
    let root = canvas(path, (1800, 800), &format!("Nearest Competitor to {focus} Branches"))?;
    let panels = root.split_evenly((1, 2));
    let nearest = &analysis.nearest;

    match (
        nearest.histogram(analysis.config.histogram_bins),
        nearest.mean_distance(),
        nearest.median_distance(),
    ) {
        (Some(hist), Some(mean), Some(median)) => {
            let markers = vec![
                (
                    format!("Mean {mean:.4}° (~{:.1} km)", analysis.km(mean)),
                    mean,
                    palette::INK,
                ),
                (
                    format!("Median {median:.4}° (~{:.1} km)", analysis.km(median)),
                    median,
                    palette::GROWTH,
                ),
            ];
            histogram(
                &panels[0],
                "Distance to the nearest competitor",
                "Distance (degrees)",
                &hist,
                palette::FOCUS,
                &markers,
            )?;
        }
        _ => notice(&panels[0], &["No competitor branch to measure against".to_string()])?,
    }

    let total = nearest.frequency.total.max(1) as f64;
    let bars: Vec<Bar> = nearest
        .frequency
        .banks
        .iter()
        .map(|b| Bar {
            label: b.bank.clone(),
            value: b.branches as f64,
            colour: analysis.colour_of(&b.bank),
            text: format!("{} ({:.0}%)", b.branches, b.branches as f64 / total * 100.0),
        })
        .collect();
    hbars(
        &panels[1],
        "Most frequent nearest competitor",
        &format!("{focus} branches"),
        &bars,
    )?;
    root.present()?;
    Ok(())
}

pub fn competitive_intensity(analysis: &Analysis, path: &Path) -> Result<()> {
    let radius = analysis.config.intensity_radius;
    let root = canvas(
        path,
        (1800, 800),
        &format!(
            "Competitive Intensity: branches within {radius:.2}° (~{:.0} km)",
            analysis.km(radius)
        ),
    )?;
    let panels = root.split_evenly((1, 2));

    let bars: Vec<Bar> = analysis
        .intensity
        .iter()
        .map(|i| Bar {
            label: i.bank.clone(),
            value: i.average(),
            colour: if i.bank == analysis.focus_bank() {
                palette::FOCUS
            } else {
                palette::COMPETITOR
            },
            text: format!("{:.1}", i.average()),
        })
        .collect();
    hbars(
        &panels[0],
        "Average nearby branches per bank",
        "Branches nearby (average)",
        &bars,
    )?;

    let focus = analysis.focus_intensity();
    match focus.and_then(|f| f.histogram(analysis.config.histogram_bins)) {
        Some(hist) => {
            let mean = focus.map_or(0.0, |f| f.average());
            histogram(
                &panels[1],
                &format!("{} intensity distribution", analysis.focus_bank()),
                "Branches nearby",
                &hist,
                palette::FOCUS,
                &[(format!("Mean {mean:.1}"), mean, palette::INK)],
            )?;
        }
        None => notice(&panels[1], &["No focus branch to measure".to_string()])?,
    }
    root.present()?;
    Ok(())
}
