use ratatui::{prelude::*, widgets::Paragraph};

use super::panel;
use crate::{dashboard::Filter, report::asset::DashboardAsset};

pub struct SummaryBlock {
    visible: usize,
    total: usize,
    focus_bank: String,
    focus_visible: usize,
    region: String,
    hidden: usize,
    generated_at: String,
}

impl SummaryBlock {
    pub fn new(asset: &DashboardAsset, filter: &Filter) -> Self {
        let visible = filter.visible(asset);
        Self {
            visible: visible.len(),
            total: asset.total_branches,
            focus_bank: asset.focus_bank.clone(),
            focus_visible: visible
                .iter()
                .filter(|b| b.bank == asset.focus_bank)
                .count(),
            region: filter.region.to_string(),
            hidden: filter.hidden.len(),
            generated_at: asset.generated_at.clone(),
        }
    }

    /// Focus branches as a percentage of the visible ones.
    fn focus_share(&self) -> f64 {
        if self.visible == 0 {
            0.0
        } else {
            self.focus_visible as f64 / self.visible as f64 * 100.0
        }
    }
}

impl Widget for SummaryBlock {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer)
    where
        Self: Sized,
    {
        let lines = vec![
            Line::from(format!("Visible: {} of {} branches", self.visible, self.total)),
            Line::from(vec![
                Span::raw(format!("{}: ", self.focus_bank)),
                Span::raw(format!(
                    "{} ({:.1}%)",
                    self.focus_visible,
                    self.focus_share()
                ))
                .bold(),
            ]),
            Line::from(format!("Region: {}", self.region)),
            Line::from(format!("Hidden banks: {}", self.hidden)),
            Line::from(format!("Data: {}", self.generated_at)).dark_gray(),
            Line::from("j/k move  space toggle  a all  n none").dark_gray(),
            Line::from("r region  q quit").dark_gray(),
        ];
        Paragraph::new(lines)
            .block(panel("SUMMARY"))
            .render(area, buf);
    }
}
