use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::canvas::{Canvas, Points},
};

use super::{bank_colour, panel, rgb};
use crate::{
    dashboard::Filter,
    geo::{BoundingBox, Coord},
    palette,
    report::asset::DashboardAsset,
};

/// Visible branches plotted by longitude and latitude, one colour per bank.
pub struct MapBlock {
    bounds: BoundingBox,
    /// Points per bank, focus bank last.
    layers: Vec<(Color, Vec<(f64, f64)>)>,
    shown: usize,
}

impl MapBlock {
    pub fn new(asset: &DashboardAsset, filter: &Filter) -> Self {
        // Fixed to the whole network so toggling banks never moves the map.
        let coords: Vec<Coord> = asset
            .branches
            .iter()
            .map(|b| Coord::new(b.lat, b.long))
            .collect();
        let bounds = BoundingBox::around(&coords)
            .map_or(asset.baku_city, |b| b.padded(0.05));

        let mut layers: Vec<(Color, Vec<(f64, f64)>)> = Vec::new();
        let mut focus = Vec::new();
        for bank in &asset.banks {
            let points: Vec<(f64, f64)> = asset
                .branches
                .iter()
                .filter(|b| b.bank == bank.name && filter.shows(b))
                .map(|b| (b.long, b.lat))
                .collect();
            if bank.name == asset.focus_bank {
                focus = points;
            } else if !points.is_empty() {
                layers.push((bank_colour(&bank.colour), points));
            }
        }
        layers.push((rgb(palette::FOCUS), focus));
        let shown = layers.iter().map(|(_, points)| points.len()).sum();
        Self {
            bounds,
            layers,
            shown,
        }
    }
}

impl Widget for MapBlock {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer)
    where
        Self: Sized,
    {
        let title = format!("BRANCH MAP ({} SHOWN)", self.shown);
        Canvas::default()
            .block(panel(&title))
            .marker(Marker::Braille)
            .x_bounds([self.bounds.long_min, self.bounds.long_max])
            .y_bounds([self.bounds.lat_min, self.bounds.lat_max])
            .paint(|ctx| {
                for (i, (color, coords)) in self.layers.iter().enumerate() {
                    if i + 1 == self.layers.len() {
                        // focus bank on its own layer, above the rest
                        ctx.layer();
                    }
                    ctx.draw(&Points {
                        coords,
                        color: *color,
                    });
                }
            })
            .render(area, buf);
    }
}
