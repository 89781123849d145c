//! Branch location scrapers for the bank APIs and the merge into the analysis
//! table.

pub mod abb;
pub mod combine;
pub mod kapital;

use std::{collections::BTreeSet, fs, io, path::Path, time::Duration};

use clap::ValueEnum;
use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter};
use tracing::{debug, info};

pub type Record = Map<String, Value>;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, ValueEnum)]
pub enum Source {
    #[strum(to_string = "ABB")]
    Abb,
    #[strum(to_string = "Kapital Bank")]
    Kapital,
}

impl Source {
    pub fn default_output(&self) -> &'static str {
        match self {
            Source::Abb => "data/abb_branches.csv",
            Source::Kapital => "data/kb_branches.csv",
        }
    }

    pub fn fetch(&self, agent: &ureq::Agent) -> Result<Vec<Record>> {
        match self {
            Source::Abb => abb::fetch(agent),
            Source::Kapital => kapital::fetch(agent),
        }
    }

    /// One flat record per branch, ready for CSV.
    pub fn flatten(&self, branches: Vec<Record>) -> Vec<Record> {
        match self {
            Source::Abb => branches,
            Source::Kapital => branches.iter().map(kapital::flatten).collect(),
        }
    }
}

pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
}

/// Fetches `source`, writes its CSV to `out` and returns the branch count.
pub fn run(source: Source, out: &Path) -> Result<usize> {
    info!("fetching {source} branch data");
    let branches = source.fetch(&agent())?;
    info!("fetched {} branches", branches.len());
    if branches.is_empty() {
        return Ok(0);
    }
    let records = source.flatten(branches);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("could not create {}", parent.display()))?;
    }
    let file = fs::File::create(out).wrap_err_with(|| format!("could not create {}", out.display()))?;
    write_records(file, &records)?;
    info!("saved {} branches to {}", records.len(), out.display());
    Ok(records.len())
}

/// GET `request` and decode a JSON array of objects.
fn get_records(request: ureq::Request) -> Result<Vec<Record>> {
    debug!("GET {}", request.url());
    let response = match request.call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            return Err(eyre!("{} answered {code} {}", response.get_url(), response.status_text()));
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(eyre!(transport).wrap_err("could not reach the branch API"));
        }
    };
    let body: Value = response.into_json().wrap_err("branch API returned invalid JSON")?;
    records_of(body)
}

fn records_of(body: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = body else {
        return Err(eyre!("expected a JSON array of branches"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(eyre!("expected a branch object, got {other}")),
        })
        .collect()
}

/// CSV text of one JSON value. Null is empty, nested values stay JSON.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Writes `records` with the sorted union of their keys as header. Missing
/// keys are left empty.
pub fn write_records(writer: impl io::Write, records: &[Record]) -> Result<()> {
    let header: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&header)?;
    for record in records {
        csv.write_record(
            header
                .iter()
                .map(|key| record.get(*key).map(cell).unwrap_or_default()),
        )?;
    }
    csv.flush()?;
    Ok(())
}
