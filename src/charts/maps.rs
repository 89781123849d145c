use std::path::Path;

use color_eyre::Result;
use plotters::prelude::*;
use strum::IntoEnumIterator;

use super::panels::{
    Bar, Layer, Marker, Series, canvas, draw_graded, draw_layer, draw_legend, frame, grouped_bars,
    hbars, map_chart, notice, rgb,
};
use crate::{
    analysis::{Analysis, cluster::ClusterLabel, market::MarketCounts},
    geo::{Coord, Zone},
    palette,
};

/// One layer per bank, focus bank last so it is drawn on top.
fn bank_layers(analysis: &Analysis, keep: impl Fn(&Coord) -> bool) -> Vec<Layer> {
    let focus = analysis.focus_bank();
    let mut layers: Vec<Layer> = analysis
        .bank_colours()
        .into_iter()
        .filter(|(bank, _)| *bank != focus)
        .map(|(bank, colour)| {
            let points: Vec<Coord> = analysis
                .branches
                .iter()
                .filter(|b| b.bank == bank && keep(&b.coord))
                .map(|b| b.coord)
                .collect();
            Layer::new(points, colour).label(bank).opacity(0.6)
        })
        .filter(|layer| !layer.points.is_empty())
        .collect();
    let focus_points: Vec<Coord> = analysis
        .focus_branches()
        .filter(|b| keep(&b.coord))
        .map(|b| b.coord)
        .collect();
    layers.push(
        Layer::new(focus_points, palette::FOCUS)
            .label(focus)
            .marker(Marker::Square, 5)
            .opacity(0.95),
    );
    layers
}

pub fn geographic_distribution(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1400, 1000), "Geographic Distribution of Branches")?;
    let bounds = frame(analysis.branches.iter().map(|b| &b.coord));
    let mut chart = map_chart(&root, "All banks", bounds)?;
    for layer in bank_layers(analysis, |_| true) {
        draw_layer(&mut chart, &layer)?;
    }
    draw_legend(&mut chart)?;
    root.present()?;
    Ok(())
}

pub fn focus_vs_competitors(analysis: &Analysis, path: &Path) -> Result<()> {
    let focus = analysis.focus_bank();
    let root = canvas(
        path,
        (1600, 1200),
        &format!("{focus} vs Top Competitors"),
    )?;
    let panels = root.split_evenly((2, 2));
    let bounds = frame(analysis.branches.iter().map(|b| &b.coord));
    let all: Vec<Coord> = analysis.branches.iter().map(|b| b.coord).collect();

    let mut banks = vec![focus];
    banks.extend(
        analysis
            .counts
            .top_excluding(focus, 3)
            .into_iter()
            .map(|b| b.bank.as_str()),
    );
    for (panel, bank) in panels.iter().zip(banks) {
        let points: Vec<Coord> = analysis
            .branches
            .iter()
            .filter(|b| b.bank == bank)
            .map(|b| b.coord)
            .collect();
        let caption = format!("{bank} ({} branches)", points.len());
        let mut chart = map_chart(panel, &caption, bounds)?;
        draw_layer(
            &mut chart,
            &Layer::new(all.clone(), palette::MUTED)
                .label("All branches")
                .opacity(0.3)
                .marker(Marker::Dot, 2),
        )?;
        let marker = if bank == focus {
            Marker::Square
        } else {
            Marker::Dot
        };
        draw_layer(
            &mut chart,
            &Layer::new(points, analysis.colour_of(bank))
                .label(bank)
                .marker(marker, 4)
                .opacity(0.9),
        )?;
        draw_legend(&mut chart)?;
    }
    root.present()?;
    Ok(())
}

pub fn regional_clusters(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(
        path,
        (1800, 800),
        &format!("Regional Clusters ({} found)", analysis.clusters),
    )?;
    let panels = root.split_evenly((1, 2));
    let bounds = frame(analysis.branches.iter().map(|b| &b.coord));
    let mut chart = map_chart(&panels[0], "Density-based clusters", bounds)?;

    for row in &analysis.presence {
        let points: Vec<Coord> = analysis
            .branches
            .iter()
            .zip(&analysis.labels)
            .filter(|(_, label)| **label == row.label)
            .map(|(b, _)| b.coord)
            .collect();
        let layer = match row.label {
            ClusterLabel::Noise => Layer::new(points, palette::MUTED)
                .marker(Marker::Triangle, 4)
                .opacity(0.5),
            ClusterLabel::Cluster(id) => Layer::new(points, palette::distinct(id)),
        };
        draw_layer(&mut chart, &layer.label(row.label.to_string()))?;
    }
    draw_layer(
        &mut chart,
        &Layer::new(
            analysis.focus_branches().map(|b| b.coord).collect(),
            palette::FOCUS,
        )
        .label(analysis.focus_bank())
        .marker(Marker::Square, 4)
        .opacity(0.95),
    )?;
    draw_legend(&mut chart)?;

    let categories: Vec<String> = analysis
        .presence
        .iter()
        .map(|row| row.label.to_string())
        .collect();
    let series = vec![
        Series {
            label: "All branches".to_string(),
            colour: palette::COMPETITOR,
            values: analysis.presence.iter().map(|r| r.total as f64).collect(),
        },
        Series {
            label: analysis.focus_bank().to_string(),
            colour: palette::FOCUS,
            values: analysis.presence.iter().map(|r| r.focus as f64).collect(),
        },
    ];
    grouped_bars(
        &panels[1],
        "Branches per cluster",
        "Branches",
        &categories,
        &series,
        |v| format!("{v:.0}"),
    )?;
    root.present()?;
    Ok(())
}

pub fn baku_city(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Baku City")?;
    let panels = root.split_evenly((1, 2));
    let baku = analysis.config.baku_city;
    let inside = move |c: &Coord| baku.contains(c);

    let mut chart = map_chart(&panels[0], "Branches inside the city box", baku.padded(0.02))?;
    for layer in bank_layers(analysis, inside) {
        draw_layer(&mut chart, &layer)?;
    }
    draw_legend(&mut chart)?;

    let counts = MarketCounts::from_banks(
        analysis
            .branches
            .iter()
            .filter(|b| inside(&b.coord))
            .map(|b| b.bank.as_str()),
    );
    let bars: Vec<Bar> = counts
        .banks
        .iter()
        .map(|b| Bar {
            label: b.bank.clone(),
            value: b.branches as f64,
            colour: analysis.colour_of(&b.bank),
            text: format!("{} ({:.1}%)", b.branches, b.share),
        })
        .collect();
    hbars(&panels[1], "Branches in Baku per bank", "Branches", &bars)?;
    root.present()?;
    Ok(())
}

pub fn competitive_density(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Competitive Density")?;
    let panels = root.split_evenly((1, 2));
    let bounds = frame(analysis.branches.iter().map(|b| &b.coord));

    match &analysis.density {
        Some(density) => {
            let coords: Vec<Coord> = analysis.branches.iter().map(|b| b.coord).collect();
            let mut chart = map_chart(&panels[0], "Branch density, all banks (warmer = denser)", bounds)?;
            draw_graded(&mut chart, &coords, density, palette::heat, 4)?;
        }
        None => notice(&panels[0], &["Not enough distinct branches for a density estimate".to_string()])?,
    }

    match &analysis.competitor_density {
        Some(density) => {
            let coords: Vec<Coord> = analysis.competitor_branches().map(|b| b.coord).collect();
            let caption = format!("{} vs competitor density", analysis.focus_bank());
            let mut chart = map_chart(&panels[1], &caption, bounds)?;
            draw_graded(&mut chart, &coords, density, palette::blues, 3)?;
            draw_layer(
                &mut chart,
                &Layer::new(
                    analysis.focus_branches().map(|b| b.coord).collect(),
                    palette::FOCUS,
                )
                .label(analysis.focus_bank())
                .marker(Marker::Triangle, 7)
                .opacity(0.95),
            )?;
            draw_legend(&mut chart)?;
        }
        None => notice(&panels[1], &["Not enough competitor branches for a density estimate".to_string()])?,
    }
    root.present()?;
    Ok(())
}

pub fn gap_analysis(analysis: &Analysis, path: &Path) -> Result<()> {
    let focus = analysis.focus_bank();
    let root = canvas(
        path,
        (1800, 800),
        &format!("Market Gaps: Competitor Locations Far from {focus}"),
    )?;
    let panels = root.split_evenly((1, 2));
    let bounds = frame(analysis.branches.iter().map(|b| &b.coord));
    let mut chart = map_chart(&panels[0], "Larger circles are farther away", bounds)?;
    draw_layer(
        &mut chart,
        &Layer::new(analysis.branches.iter().map(|b| b.coord).collect(), palette::MUTED)
            .label("All branches")
            .opacity(0.3)
            .marker(Marker::Dot, 2),
    )?;
    draw_layer(
        &mut chart,
        &Layer::new(analysis.focus_branches().map(|b| b.coord).collect(), palette::FOCUS)
            .label(focus)
            .marker(Marker::Square, 4)
            .opacity(0.9),
    )?;
    let gap_colour = rgb(palette::HIGHLIGHT);
    chart
        .draw_series(analysis.gaps.sites.iter().map(|site| {
            let size = (3.0 + site.distance * 8.0).min(18.0) as i32;
            Circle::new(
                (site.coord.long, site.coord.lat),
                size,
                gap_colour.mix(0.6).filled(),
            )
        }))?
        .label("Gap opportunities")
        .legend(move |(x, y)| Circle::new((x, y), 5, gap_colour.filled()));
    draw_legend(&mut chart)?;

    let bars: Vec<Bar> = analysis
        .gaps
        .top(analysis.config.top_gaps)
        .iter()
        .enumerate()
        .map(|(i, site)| Bar {
            label: format!("{}. {}", i + 1, site.bank),
            value: site.distance,
            colour: palette::distinct(i),
            text: format!("{:.3}° (~{:.1} km)", site.distance, analysis.km(site.distance)),
        })
        .collect();
    if bars.is_empty() {
        notice(&panels[1], &[format!("No competitor branch beyond {:.2}°", analysis.gaps.threshold)])?;
    } else {
        hbars(
            &panels[1],
            &format!("Top {} gap opportunities", bars.len()),
            "Distance to nearest focus branch (degrees)",
            &bars,
        )?;
    }
    root.present()?;
    Ok(())
}

pub fn zone_dominance(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Market Dominance by Zone")?;
    let panels = root.split_evenly((1, 2));
    let bounds = frame(analysis.branches.iter().map(|b| &b.coord));
    let mut chart = map_chart(&panels[0], "Zones", bounds)?;
    for (i, zone) in Zone::iter().enumerate() {
        let points: Vec<Coord> = analysis
            .branches
            .iter()
            .zip(&analysis.zones)
            .filter(|(_, z)| **z == zone)
            .map(|(b, _)| b.coord)
            .collect();
        if points.is_empty() {
            continue;
        }
        draw_layer(
            &mut chart,
            &Layer::new(points, palette::distinct(i)).label(zone.to_string()),
        )?;
    }
    draw_legend(&mut chart)?;

    let standings = &analysis.zone_standings;
    let categories: Vec<String> = standings.iter().map(|s| s.zone.to_string()).collect();
    let series = vec![
        Series {
            label: analysis.focus_bank().to_string(),
            colour: palette::FOCUS,
            values: standings.iter().map(|s| s.focus_branches as f64).collect(),
        },
        Series {
            label: "Zone leader".to_string(),
            colour: palette::COMPETITOR,
            values: standings.iter().map(|s| s.leader_branches as f64).collect(),
        },
    ];
    grouped_bars(
        &panels[1],
        "Focus bank vs zone leader",
        "Branches",
        &categories,
        &series,
        |v| format!("{v:.0}"),
    )?;
    root.present()?;
    Ok(())
}
