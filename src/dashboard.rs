use std::{collections::HashSet, time::Duration};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::{debug, error};

use crate::{
    geo::Region,
    report::asset::{BankEntry, BranchEntry, DashboardAsset},
    widgets::{legend::LegendBlock, map::MapBlock, status::ErrorBlock, summary::SummaryBlock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display)]
pub enum RegionFilter {
    #[default]
    All,
    Baku,
    Regions,
}

impl RegionFilter {
    /// All, Baku, Regions, then back to All.
    pub fn next(self) -> Self {
        Self::iter()
            .cycle()
            .skip_while(|r| *r != self)
            .nth(1)
            .unwrap_or_default()
    }

    pub fn admits(self, region: Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Baku => region == Region::Baku,
            RegionFilter::Regions => region == Region::Regions,
        }
    }
}

/// Which branches the dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub hidden: HashSet<String>,
    pub region: RegionFilter,
}

impl Filter {
    pub fn is_hidden(&self, bank: &str) -> bool {
        self.hidden.contains(bank)
    }

    pub fn toggle(&mut self, bank: &str) {
        if !self.hidden.remove(bank) {
            self.hidden.insert(bank.to_string());
        }
    }

    pub fn shows(&self, branch: &BranchEntry) -> bool {
        !self.is_hidden(&branch.bank) && self.region.admits(branch.region)
    }

    pub fn visible<'a>(&self, asset: &'a DashboardAsset) -> Vec<&'a BranchEntry> {
        asset.branches.iter().filter(|b| self.shows(b)).collect()
    }
}

/// The terminal dashboard over a dashboard asset.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    asset: Result<DashboardAsset, String>,
    filter: Filter,
    legend_state: ListState,
}

impl App {
    pub fn new(asset: Result<DashboardAsset>) -> Self {
        let asset = asset.map_err(|err| {
            error!("could not load the dashboard asset: {err:?}");
            format!("{err:#}")
        });
        let mut legend_state = ListState::default();
        if asset.as_ref().is_ok_and(|a| !a.banks.is_empty()) {
            legend_state.select(Some(0));
        }
        Self {
            running: false,
            asset,
            filter: Filter::default(),
            legend_state,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let asset = match &self.asset {
            Ok(asset) => asset,
            Err(message) => {
                frame.render_widget(ErrorBlock::new(message), frame.area());
                return;
            }
        };
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(frame.area());
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Min(5),    // legend
                Constraint::Length(9), // summary
            ])
            .split(layout[1]);

        frame.render_widget(MapBlock::new(asset, &self.filter), layout[0]);
        frame.render_stateful_widget(
            LegendBlock::new(asset, &self.filter),
            right[0],
            &mut self.legend_state,
        );
        frame.render_widget(SummaryBlock::new(asset, &self.filter), right[1]);
    }

    fn handle_crossterm_events(&mut self) -> Result<()> {
        if poll(Duration::from_millis(100))? {
            match event::read()? {
                // it's important to check KeyEventKind::Press to avoid handling key release events
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(_) => {}
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.legend_state.select_previous(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.select_next(),
            (_, KeyCode::Char(' ')) => self.toggle_selected(),
            (_, KeyCode::Char('a')) => self.filter.hidden.clear(),
            (_, KeyCode::Char('n')) => self.hide_all(),
            (_, KeyCode::Char('r')) => {
                self.filter.region = self.filter.region.next();
                debug!("region filter {}", self.filter.region);
            }
            _ => {}
        }
    }

    fn banks(&self) -> &[BankEntry] {
        match &self.asset {
            Ok(asset) => &asset.banks,
            Err(_) => &[],
        }
    }

    fn select_next(&mut self) {
        let last = self.banks().len().saturating_sub(1);
        let next = self.legend_state.selected().map_or(0, |i| (i + 1).min(last));
        if !self.banks().is_empty() {
            self.legend_state.select(Some(next));
        }
    }

    fn toggle_selected(&mut self) {
        let Some(idx) = self.legend_state.selected() else {
            return;
        };
        if let Some(bank) = self.banks().get(idx).map(|b| b.name.clone()) {
            self.filter.toggle(&bank);
        }
    }

    fn hide_all(&mut self) {
        let names: Vec<String> = self.banks().iter().map(|b| b.name.clone()).collect();
        self.filter.hidden.extend(names);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
