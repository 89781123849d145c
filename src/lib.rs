pub mod analysis;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod geo;
pub mod logging;
pub mod palette;
pub mod places;
pub mod report;
pub mod scrape;
pub mod strings;
pub mod widgets;
