use color_eyre::Result;

use super::{Record, get_records};

const BRANCHES_URL: &str = "https://randevu.abb-bank.az/web-api/randevu/branches";

/// Every branch object as served, keys untouched.
pub fn fetch(agent: &ureq::Agent) -> Result<Vec<Record>> {
    let request = agent
        .get(BRANCHES_URL)
        .set("Accept", "application/json, text/plain, */*")
        .set("Accept-Language", "AZ")
        .set("Referer", "https://randevu.abb-bank.az/");
    get_records(request)
}
