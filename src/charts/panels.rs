//! Drawing primitives shared by every chart: canvases, bar panels, maps,
//! histograms and heatmaps.

use std::path::Path;

use color_eyre::Result;
use plotters::{
    coord::{Shift, cartesian::Cartesian2d, types::RangedCoordf64},
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    analysis::{opportunity::OpportunityGrid, stats::Histogram},
    geo::{BoundingBox, Coord},
    palette::{self, Rgb},
};

pub const FONT: &str = "sans-serif";

pub type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;
pub type MapChart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub fn rgb((r, g, b): Rgb) -> RGBColor {
    RGBColor(r, g, b)
}

/// White SVG canvas with a title banner.
pub fn canvas<'a>(path: &'a Path, size: (u32, u32), title: &str) -> Result<Panel<'a>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root.titled(title, (FONT, 26).into_font().color(&rgb(palette::INK)))?)
}

fn label_style(size: u32) -> TextStyle<'static> {
    (FONT, size).into_font().color(&BLACK)
}

/// Name of the row or column an axis value falls on, empty between rows.
fn index_label(labels: &[String], value: f64, reversed: bool) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= labels.len() {
        return String::new();
    }
    let idx = idx as usize;
    let idx = if reversed { labels.len() - 1 - idx } else { idx };
    labels[idx].clone()
}

fn nice_max(value: f64) -> f64 {
    if value > 0.0 { value } else { 1.0 }
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub colour: Rgb,
    /// Printed at the end of the bar.
    pub text: String,
}

/// Horizontal bars, first bar on top.
pub fn hbars(area: &Panel, caption: &str, x_desc: &str, bars: &[Bar]) -> Result<()> {
    let n = bars.len().max(1);
    let max = nice_max(bars.iter().map(|b| b.value).fold(0.0, f64::max));
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    let row = |i: usize| (n - 1 - i) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 18))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(150)
        .build_cartesian_2d(0f64..max * 1.3, -0.6f64..n as f64 - 0.4)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n * 4)
        .y_label_formatter(&|v| index_label(&labels, *v, true))
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let y = row(i);
        Rectangle::new([(0.0, y - 0.35), (bar.value, y + 0.35)], rgb(bar.colour).filled())
    }))?;
    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            bar.text.clone(),
            (bar.value + max * 0.01, row(i)),
            label_style(12).pos(Pos::new(HPos::Left, VPos::Center)),
        )
    }))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub colour: Rgb,
    pub values: Vec<f64>,
}

/// Vertical bars, one group per category and one bar per series in each.
pub fn grouped_bars(
    area: &Panel,
    caption: &str,
    y_desc: &str,
    categories: &[String],
    series: &[Series],
    value_fmt: impl Fn(f64) -> String,
) -> Result<()> {
    let n = categories.len().max(1);
    let max = nice_max(
        series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max),
    );
    let width = 0.8 / series.len().max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.6f64..n as f64 - 0.4, 0f64..max * 1.2)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n * 4)
        .x_label_formatter(&|v| index_label(categories, *v, false))
        .y_desc(y_desc)
        .draw()?;

    for (s_idx, s) in series.iter().enumerate() {
        let offset = -0.4 + width * s_idx as f64;
        let colour = rgb(s.colour);
        chart
            .draw_series(s.values.iter().enumerate().map(|(i, &v)| {
                let x = i as f64 + offset;
                Rectangle::new([(x, 0.0), (x + width * 0.95, v)], colour.filled())
            }))?
            .label(s.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], colour.filled()));
        chart.draw_series(s.values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64 + offset + width * 0.45;
            Text::new(
                value_fmt(v),
                (x, v),
                label_style(10).pos(Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))?;
    }
    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Dot,
    Square,
    Triangle,
}

/// One group of points drawn on a map.
#[derive(Debug, Clone)]
pub struct Layer {
    pub label: Option<String>,
    pub points: Vec<Coord>,
    pub colour: Rgb,
    pub marker: Marker,
    pub size: i32,
    pub opacity: f64,
}

impl Layer {
    pub fn new(points: Vec<Coord>, colour: Rgb) -> Self {
        Self {
            label: None,
            points,
            colour,
            marker: Marker::Dot,
            size: 3,
            opacity: 0.8,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn marker(mut self, marker: Marker, size: i32) -> Self {
        self.marker = marker;
        self.size = size;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Frame around every point, padded so markers on the edge stay visible.
pub fn frame<'a>(points: impl IntoIterator<Item = &'a Coord>) -> BoundingBox {
    BoundingBox::around(points)
        .unwrap_or(BoundingBox::new(38.0, 42.0, 44.5, 51.0))
        .padded(0.1)
}

/// Longitude on x, latitude on y.
pub fn map_chart<'a, 'b>(
    area: &'a Panel<'b>,
    caption: &str,
    bounds: BoundingBox,
) -> Result<MapChart<'a, 'b>> {
    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 18))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(50)
        .build_cartesian_2d(bounds.long_min..bounds.long_max, bounds.lat_min..bounds.lat_max)?;
    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_label_formatter(&|v| format!("{v:.2}"))
        .y_label_formatter(&|v| format!("{v:.2}"))
        .light_line_style(&rgb(palette::BACKGROUND))
        .draw()?;
    Ok(chart)
}

pub fn draw_layer(chart: &mut MapChart, layer: &Layer) -> Result<()> {
    let colour = rgb(layer.colour).mix(layer.opacity);
    let size = layer.size;
    let points = layer.points.iter().map(|c| (c.long, c.lat));
    let anno = match layer.marker {
        Marker::Dot => chart.draw_series(points.map(|p| Circle::new(p, size, colour.filled())))?,
        Marker::Square => chart.draw_series(points.map(|p| {
            EmptyElement::at(p)
                + Rectangle::new([(-size, -size), (size, size)], colour.filled())
                + Rectangle::new([(-size, -size), (size, size)], BLACK.stroke_width(1))
        }))?,
        Marker::Triangle => {
            chart.draw_series(points.map(|p| TriangleMarker::new(p, size, colour.filled())))?
        }
    };
    if let Some(label) = &layer.label {
        let marker = layer.marker;
        anno.label(label.as_str()).legend(move |(x, y)| match marker {
            Marker::Square => Rectangle::new([(x - 4, y - 4), (x + 4, y + 4)], colour.filled()),
            Marker::Dot | Marker::Triangle => {
                Rectangle::new([(x - 3, y - 3), (x + 3, y + 3)], colour.filled())
            }
        });
    }
    Ok(())
}

/// Points each coloured by their own value on the heat ramp.
pub fn draw_graded(
    chart: &mut MapChart,
    points: &[Coord],
    values: &[f64],
    ramp: fn(f64) -> Rgb,
    size: i32,
) -> Result<()> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    chart.draw_series(points.iter().zip(values).map(|(c, v)| {
        let colour = rgb(ramp((v - lo) / span));
        Circle::new((c.long, c.lat), size, colour.mix(0.85).filled())
    }))?;
    Ok(())
}

/// Text labels next to points.
pub fn draw_labels(chart: &mut MapChart, labels: &[(String, Coord)], size: u32) -> Result<()> {
    let ink = rgb(palette::INK);
    chart.draw_series(labels.iter().map(|(text, c)| {
        EmptyElement::at((c.long, c.lat))
            + Circle::new((0, 0), 3, rgb(palette::COMPETITOR).filled())
            + Text::new(
                text.clone(),
                (0, -4),
                label_style(size)
                    .color(&ink)
                    .pos(Pos::new(HPos::Center, VPos::Bottom)),
            )
    }))?;
    Ok(())
}

pub fn draw_legend<'a, 'b: 'a>(chart: &mut MapChart<'a, 'b>) -> Result<()> {
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .label_font((FONT, 11))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}

/// Score grid as filled cells on the heat ramp.
pub fn draw_heatmap(chart: &mut MapChart, grid: &OpportunityGrid) -> Result<()> {
    let max = nice_max(grid.max_score());
    let (half_lat, half_long) = grid.half_cell();
    chart.draw_series(grid.scores.iter().enumerate().map(|(idx, score)| {
        let c = grid.coord(idx);
        Rectangle::new(
            [
                (c.long - half_long, c.lat - half_lat),
                (c.long + half_long, c.lat + half_lat),
            ],
            rgb(palette::heat(score / max)).mix(0.85).filled(),
        )
    }))?;
    Ok(())
}

/// Histogram bars with optional vertical marker lines (mean, median).
pub fn histogram(
    area: &Panel,
    caption: &str,
    x_desc: &str,
    hist: &Histogram,
    colour: Rgb,
    markers: &[(String, f64, Rgb)],
) -> Result<()> {
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    let top = hist.max_count().max(1) as f64 * 1.15;
    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 18))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0f64..top)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Branches")
        .x_label_formatter(&|v| format!("{v:.2}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;
    let fill = rgb(colour);
    chart.draw_series(hist.bins().map(|(x0, x1, count)| {
        Rectangle::new([(x0, 0.0), (x1, count as f64)], fill.mix(0.75).filled())
    }))?;
    chart.draw_series(hist.bins().map(|(x0, x1, count)| {
        Rectangle::new([(x0, 0.0), (x1, count as f64)], BLACK.stroke_width(1))
    }))?;
    for (label, value, colour) in markers {
        let line = rgb(*colour);
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(*value, 0.0), (*value, top)],
                line.stroke_width(2),
            )))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], line.stroke_width(2)));
    }
    if !markers.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}

/// Centred block of text lines, for panels that have nothing to plot.
pub fn notice(area: &Panel, lines: &[String]) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let start = h as i32 / 2 - lines.len() as i32 * 10;
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.clone(),
            (w as i32 / 2, start + i as i32 * 20),
            label_style(14).pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }
    Ok(())
}
