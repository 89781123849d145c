use std::{fmt::Write as _, fs};

use branchscope::{
    analysis::Analysis,
    charts::{self, Chart},
    config::AnalysisConfig,
    dashboard::{App, RegionFilter},
    dataset::Dataset,
    report::{self, asset::DashboardAsset},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use strum::IntoEnumIterator;

/// Branch clusters around Baku, Ganja, Lankaran and Sheki.
const CENTRES: [(f64, f64); 4] = [(40.40, 49.85), (40.68, 46.36), (38.75, 48.85), (41.19, 47.17)];

fn branches_csv() -> String {
    let mut csv = String::from("bank_name,lat,long\n");
    let banks = [
        ("Alpha Bank", 40),
        ("AzerTurk Bank", 12),
        ("Beta Bank", 24),
        ("Gamma Bank", 10),
        ("Delta Bank", 6),
        ("Epsilon Bank", 4),
    ];
    for (b, (bank, count)) in banks.iter().enumerate() {
        for i in 0..*count {
            // AzerTurk stays in and around Baku
            let centre = if *bank == "AzerTurk Bank" && i % 4 != 1 {
                CENTRES[0]
            } else {
                CENTRES[(i + b) % CENTRES.len()]
            };
            let lat = centre.0 + ((i * 7 + b * 3) % 11) as f64 * 0.007;
            let long = centre.1 + ((i * 5 + b * 2) % 13) as f64 * 0.009;
            writeln!(csv, "{bank},{lat:.5},{long:.5}").unwrap();
        }
    }
    csv.push_str("Broken Bank,not a number,49.8\n");
    csv
}

fn analysis(dir: &std::path::Path) -> Analysis {
    let input = dir.join("combined.csv");
    fs::write(&input, branches_csv()).unwrap();
    let dataset = Dataset::load(&input).unwrap();
    assert_eq!(dataset.dropped, 1);
    Analysis::run(&dataset, &AnalysisConfig::default()).unwrap()
}

#[test]
fn analyze_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analysis(dir.path());
    assert_eq!(analysis.branches.len(), 96);
    assert_eq!(analysis.position.rank, 3);

    let written = charts::render_all(&analysis, &dir.path().join("charts")).unwrap();
    assert_eq!(written.len(), Chart::iter().count());
    for chart in Chart::iter() {
        let svg = fs::read_to_string(dir.path().join("charts").join(chart.file_name())).unwrap();
        assert!(svg.contains("<svg"), "{chart} is not an svg");
    }

    report::write_all(&analysis, dir.path(), "2025-01-01 12:00:00").unwrap();
    let insights = fs::read_to_string(dir.path().join("docs/STRATEGIC_INSIGHTS.md")).unwrap();
    assert!(insights.contains("Market rank: #3 out of 6 banks"));
    assert!(insights.contains("### Baku-Absheron"));
    let notes = fs::read_to_string(dir.path().join("docs/CHART_NOTES.md")).unwrap();
    assert!(notes.contains("13b_opportunity_regions.svg"));

    let asset = DashboardAsset::load(&dir.path().join("dashboard/branches.json")).unwrap();
    assert_eq!(asset.total_branches, 96);
    assert_eq!(asset.branches.len(), 96);
    assert_eq!(asset.bank("AzerTurk Bank").unwrap().colour, "#e74c3c");
    assert_eq!(report::key_insights(&analysis).len(), 5);
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn press(app: &mut App, code: KeyCode) {
    app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn dashboard_filters_banks_and_regions() {
    let dir = tempfile::tempdir().unwrap();
    let asset = DashboardAsset::new(&analysis(dir.path()), "2025-01-01 12:00:00");
    let mut app = App::new(Ok(asset));

    let text = screen(&mut app);
    assert!(text.contains("BANKS"));
    assert!(text.contains("Visible: 96 of 96 branches"));

    // first row is the largest bank
    press(&mut app, KeyCode::Char(' '));
    assert!(app.filter().is_hidden("Alpha Bank"));
    assert!(screen(&mut app).contains("Visible: 56 of 96 branches"));

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));
    assert!(app.filter().is_hidden("Beta Bank"));

    press(&mut app, KeyCode::Char('a'));
    assert!(app.filter().hidden.is_empty());
    press(&mut app, KeyCode::Char('n'));
    assert!(screen(&mut app).contains("Visible: 0 of 96 branches"));

    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.filter().region, RegionFilter::Baku);
    assert!(screen(&mut app).contains("Region: Baku"));
}

#[test]
fn dashboard_shows_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(DashboardAsset::load(&dir.path().join("missing.json")));
    let text = screen(&mut app);
    assert!(text.contains("Could not load the dashboard data"));
}
