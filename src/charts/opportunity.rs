use std::path::Path;

use color_eyre::Result;

use super::panels::{
    Layer, Marker, Panel, canvas, draw_heatmap, draw_labels, draw_layer, draw_legend, map_chart,
    notice,
};
use crate::{
    analysis::{Analysis, opportunity::OpportunityScan},
    geo::Coord,
    palette,
    places::{BAKU_ABSHERON, Place, major_regional_cities},
};

pub fn metro(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Growth Opportunity: Baku-Absheron")?;
    match &analysis.metro {
        Some(scan) => draw_scan(analysis, &root, scan, BAKU_ABSHERON.iter(), "Baku-Absheron")?,
        None => notice(&root, &["No branch inside the metro area".to_string()])?,
    }
    root.present()?;
    Ok(())
}

pub fn regions(analysis: &Analysis, path: &Path) -> Result<()> {
    let root = canvas(path, (1800, 800), "Growth Opportunity: Regions")?;
    match &analysis.regional {
        Some(scan) => draw_scan(analysis, &root, scan, major_regional_cities(), "Regions")?,
        None => notice(&root, &["No branch outside the metro area".to_string()])?,
    }
    root.present()?;
    Ok(())
}

fn draw_scan<'a>(
    analysis: &Analysis,
    root: &Panel,
    scan: &OpportunityScan,
    places: impl Iterator<Item = &'a Place>,
    area: &str,
) -> Result<()> {
    let focus = analysis.focus_bank();
    let bounds = scan.grid.bounds;
    let labels: Vec<(String, Coord)> = places
        .filter(|p| bounds.contains(&p.coord()))
        .map(|p| (p.name.to_string(), p.coord()))
        .collect();
    let focus_layer = Layer::new(scan.focus_branches().to_vec(), palette::FOCUS)
        .label(focus)
        .marker(Marker::Square, 5)
        .opacity(0.95);
    let panels = root.split_evenly((1, 2));

    let mut heat = map_chart(
        &panels[0],
        &format!("{area}: opportunity heatmap (warmer = higher)"),
        bounds,
    )?;
    draw_heatmap(&mut heat, &scan.grid)?;
    draw_layer(
        &mut heat,
        &Layer::new(scan.competitors.clone(), palette::MUTED)
            .label("Competitors")
            .marker(Marker::Dot, 2)
            .opacity(0.5),
    )?;
    draw_layer(&mut heat, &focus_layer)?;
    draw_labels(&mut heat, &labels, 11)?;
    draw_legend(&mut heat)?;

    let mut top = map_chart(
        &panels[1],
        &format!("{area}: top {} recommended locations", scan.sites.len()),
        bounds,
    )?;
    draw_layer(
        &mut top,
        &Layer::new(scan.branches.clone(), palette::MUTED)
            .label("Existing branches")
            .marker(Marker::Dot, 2)
            .opacity(0.3),
    )?;
    draw_layer(&mut top, &focus_layer)?;
    let (priority, rest): (Vec<_>, Vec<_>) = scan.sites.iter().partition(|s| s.rank <= 3);
    draw_layer(
        &mut top,
        &Layer::new(rest.iter().map(|s| s.coord).collect(), palette::GROWTH)
            .label("Other opportunities")
            .marker(Marker::Dot, 4),
    )?;
    draw_layer(
        &mut top,
        &Layer::new(priority.iter().map(|s| s.coord).collect(), palette::FOCUS)
            .label("Top 3 priorities")
            .marker(Marker::Triangle, 9)
            .opacity(0.95),
    )?;
    let ranks: Vec<(String, Coord)> = priority
        .iter()
        .map(|s| (format!("#{}", s.rank), s.coord))
        .collect();
    draw_labels(&mut top, &labels, 11)?;
    draw_labels(&mut top, &ranks, 13)?;
    draw_legend(&mut top)?;
    Ok(())
}
