// the dashboard owns the terminal, so its logs always go to a file.
#[cfg(target_os = "windows")]
pub const DASHBOARD_LOG_FILE_PATH: &str = "branchscope-dashboard.log";

#[cfg(not(target_os = "windows"))]
pub const DASHBOARD_LOG_FILE_PATH: &str = "/tmp/branchscope-dashboard.log";

pub const DEFAULT_INPUT_PATH: &str = "data/combined_atms.csv";
pub const DEFAULT_OUT_DIR: &str = "output";

pub const CHARTS_DIR: &str = "charts";
pub const DOCS_DIR: &str = "docs";
pub const DASHBOARD_DIR: &str = "dashboard";

pub const DASHBOARD_ASSET_FILE: &str = "branches.json";
pub const INSIGHTS_FILE: &str = "STRATEGIC_INSIGHTS.md";
pub const CHART_NOTES_FILE: &str = "CHART_NOTES.md";

pub const DEFAULT_DASHBOARD_ASSET_PATH: &str = "output/dashboard/branches.json";
