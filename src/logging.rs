use std::{fs::File, io::LineWriter, path::Path, sync::Mutex};

use color_eyre::{Result, eyre::WrapErr};
use tracing_subscriber::{Layer, filter::Targets, fmt::writer::BoxMakeWriter, layer::SubscriberExt};

/// Install the global subscriber. Lines go to stderr unless a log file is given.
pub fn setup_logs(log_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let filter: Targets = log_filter.parse().wrap_err("invalid --log-filter")?;

    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("could not create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(|| LineWriter::new(std::io::stderr())),
    };

    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(log_file.is_none())
            .with_target(false)
            .with_filter(filter),
    );
    tracing::subscriber::set_global_default(subscriber).wrap_err("could not setup logging")?;

    Ok(())
}
