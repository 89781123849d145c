use ratatui::{
    prelude::*,
    widgets::{List, ListItem, ListState},
};

use super::{bank_colour, panel};
use crate::{dashboard::Filter, report::asset::DashboardAsset};

struct LegendRow {
    name: String,
    branches: usize,
    colour: Color,
    hidden: bool,
    focus: bool,
}

/// Banks with their branch counts; the selected row is toggled with Space.
pub struct LegendBlock {
    rows: Vec<LegendRow>,
}

impl LegendBlock {
    pub fn new(asset: &DashboardAsset, filter: &Filter) -> Self {
        let rows = asset
            .banks
            .iter()
            .map(|bank| LegendRow {
                name: bank.name.clone(),
                branches: bank.branches,
                colour: bank_colour(&bank.colour),
                hidden: filter.is_hidden(&bank.name),
                focus: bank.name == asset.focus_bank,
            })
            .collect();
        Self { rows }
    }
}

impl StatefulWidget for LegendBlock {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer, state: &mut Self::State)
    where
        Self: Sized,
    {
        let items: Vec<ListItem> = self
            .rows
            .into_iter()
            .map(|row| {
                let mark = if row.hidden { "[ ]" } else { "[x]" };
                let mut name = Span::raw(format!(" {} ({})", row.name, row.branches));
                if row.focus {
                    name = name.bold();
                }
                let swatch = if row.hidden {
                    Span::raw(" ●").dark_gray()
                } else {
                    Span::styled(" ●", Style::default().fg(row.colour))
                };
                ListItem::new(Line::from(vec![Span::raw(mark), swatch, name]))
            })
            .collect();
        let list = List::new(items)
            .block(panel("BANKS"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        StatefulWidget::render(list, area, buf, state);
    }
}
