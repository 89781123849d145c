use color_eyre::Result;
use serde_json::Value;

use super::{Record, get_records};

const LOCATIONS_URL: &str = "https://www.kapitalbank.az/locations/region";

/// Output column and source key of the top-level fields kept.
const FIELDS: [(&str, &str); 17] = [
    ("id", "id"),
    ("name", "name"),
    ("slug", "slug"),
    ("city_id", "city_id"),
    ("type", "type"),
    ("is_open", "is_open"),
    ("is_nfc", "is_nfc"),
    ("cash_in", "cash_in"),
    ("working_weekends", "working_weekends"),
    ("is_digital", "is_digital"),
    ("latitude", "lat"),
    ("longitude", "lng"),
    ("address", "address"),
    ("work_hours_week", "work_hours_week"),
    ("work_hours_saturday", "work_hours_saturday"),
    ("work_hours_sunday", "work_hours_sunday"),
    ("notes", "notes"),
];

/// Column suffix and source key of each `working_days` entry.
const DAY_FIELDS: [(&str, &str); 6] = [
    ("name", "day_of_week_name"),
    ("is_open", "is_open"),
    ("open_time", "open_time"),
    ("close_time", "close_time"),
    ("customer_open", "customer_open_time"),
    ("customer_close", "customer_close_time"),
];

pub fn fetch(agent: &ureq::Agent) -> Result<Vec<Record>> {
    let request = agent
        .get(LOCATIONS_URL)
        .query("is_nfc", "false")
        .query("weekend", "false")
        .query("specialdays", "false")
        .query("type", "branch")
        .set("Accept", "*/*")
        .set("Referer", "https://www.kapitalbank.az/locations");
    get_records(request)
}

/// Keeps the fixed field set and spreads `working_days` into
/// `day_<n>_<field>` columns.
pub fn flatten(branch: &Record) -> Record {
    let mut flat = Record::new();
    for (column, key) in FIELDS {
        flat.insert(column.to_string(), or_null(branch.get(key)));
    }
    let days = branch.get("working_days").and_then(Value::as_array);
    for day in days.into_iter().flatten() {
        let number = match day.get("day_of_week") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "None".to_string(),
            Some(other) => other.to_string(),
        };
        for (suffix, key) in DAY_FIELDS {
            flat.insert(format!("day_{number}_{suffix}"), or_null(day.get(key)));
        }
    }
    flat
}

fn or_null(value: Option<&Value>) -> Value {
    value.cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renames_coordinates_and_spreads_days() {
        let Value::Object(branch) = json!({
            "id": 12,
            "name": "Nizami",
            "lat": "40.37",
            "lng": "49.83",
            "ignored": "x",
            "working_days": [
                {"day_of_week": 1, "day_of_week_name": "Monday", "is_open": true,
                 "open_time": "09:00", "close_time": "18:00",
                 "customer_open_time": "09:30", "customer_close_time": "17:30"},
                {"day_of_week": 7, "day_of_week_name": "Sunday", "is_open": false}
            ]
        }) else {
            unreachable!()
        };
        let flat = flatten(&branch);
        assert_eq!(flat["latitude"], json!("40.37"));
        assert_eq!(flat["longitude"], json!("49.83"));
        assert_eq!(flat["notes"], Value::Null);
        assert!(!flat.contains_key("ignored"));
        assert!(!flat.contains_key("working_days"));
        assert_eq!(flat["day_1_customer_open"], json!("09:30"));
        assert_eq!(flat["day_7_is_open"], json!(false));
        assert_eq!(flat["day_7_open_time"], Value::Null);
        assert_eq!(flat.len(), 17 + 2 * 6);
    }

    #[test]
    fn branch_without_days_keeps_fixed_fields() {
        let flat = flatten(&Record::new());
        assert_eq!(flat.len(), 17);
    }
}
