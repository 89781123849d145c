use std::path::{Path, PathBuf};

use branchscope::{
    analysis::Analysis,
    charts,
    config::AnalysisConfig,
    dashboard::App,
    dataset::Dataset,
    logging::setup_logs,
    report::{self, asset::DashboardAsset},
    scrape::{self, Source, combine::BankSource},
    strings::{
        CHARTS_DIR, DASHBOARD_LOG_FILE_PATH, DEFAULT_DASHBOARD_ASSET_PATH, DEFAULT_INPUT_PATH,
        DEFAULT_OUT_DIR,
    },
};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log filter, e.g. `info` or `branchscope=debug`.
    #[arg(long, global = true, default_value = "info")]
    log_filter: String,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse the branch table and write charts, reports and the dashboard asset.
    Analyze {
        #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
        input: PathBuf,
        #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
        /// TOML file overriding the analysis defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_charts: bool,
    },
    /// Browse the last analysis in the terminal.
    Dashboard {
        #[arg(short, long, default_value = DEFAULT_DASHBOARD_ASSET_PATH)]
        asset: PathBuf,
    },
    /// Download the branch list of one bank.
    Scrape {
        #[arg(value_enum)]
        source: Source,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Merge per-bank CSVs into the analysis table.
    Combine {
        /// `<bank name>=<csv>`, repeatable.
        #[arg(short, long = "source", required = true)]
        sources: Vec<BankSource>,
        #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
        out: PathBuf,
    },
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    match args.command {
        Command::Analyze {
            input,
            out_dir,
            config,
            no_charts,
        } => {
            setup_logs(&args.log_filter, args.log_file.as_deref())?;
            analyze(&input, &out_dir, config.as_deref(), no_charts)
        }
        Command::Dashboard { asset } => {
            // keep log lines off the terminal the dashboard draws on
            let log_file = args
                .log_file
                .unwrap_or_else(|| PathBuf::from(DASHBOARD_LOG_FILE_PATH));
            setup_logs(&args.log_filter, Some(&log_file))?;
            let app = App::new(DashboardAsset::load(&asset));
            let terminal = ratatui::init();
            let result = app.run(terminal);
            ratatui::restore();
            result
        }
        Command::Scrape { source, out } => {
            setup_logs(&args.log_filter, args.log_file.as_deref())?;
            let out = out.unwrap_or_else(|| PathBuf::from(source.default_output()));
            let saved = scrape::run(source, &out)?;
            println!("Saved {saved} {source} branches to {}", out.display());
            Ok(())
        }
        Command::Combine { sources, out } => {
            setup_logs(&args.log_filter, args.log_file.as_deref())?;
            let written = scrape::combine::run(&sources, &out)?;
            println!("Wrote {written} branches to {}", out.display());
            Ok(())
        }
    }
}

fn analyze(input: &Path, out_dir: &Path, config: Option<&Path>, no_charts: bool) -> Result<()> {
    let config = match config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    let dataset = Dataset::load(input)?;
    let analysis = Analysis::run(&dataset, &config)?;

    if no_charts {
        info!("chart rendering skipped");
    } else {
        let written = charts::render_all(&analysis, &out_dir.join(CHARTS_DIR))?;
        info!("{} charts written", written.len());
    }
    report::write_all(&analysis, out_dir, &report::timestamp()?)?;

    println!("Key insights for {}:", analysis.focus_bank());
    for line in report::key_insights(&analysis) {
        println!("  - {line}");
    }
    println!("Outputs written to {}", out_dir.display());
    Ok(())
}
