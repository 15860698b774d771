use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::union::{non_empty, Union};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDay {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `None` when the stored value could not be read as a date; such a day never fires.
    pub date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub reminder_days_before: u32,
    pub union_id: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub union: Option<Union>,
}

impl SpecialDay {
    pub fn is_global(&self) -> bool {
        self.union_id.is_none()
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDayRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub is_recurring: Option<bool>,
    pub union_id: Option<String>,
    pub description: Option<String>,
    pub reminder_days_before: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSpecialDaysRequest {
    #[serde(default)]
    pub days: Option<Vec<SpecialDayRequest>>,
    pub union_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDayInput {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub reminder_days_before: u32,
    pub union_id: Option<String>,
}

impl SpecialDayRequest {
    /// Validates the request. `default_recurring` applies when `isRecurring` is absent;
    /// single creates default to one-off days, bulk imports to yearly ones, and
    /// updates keep the stored value.
    pub fn into_input(self, default_recurring: bool) -> Result<SpecialDayInput, String> {
        let title = non_empty(self.title);
        let raw_date = non_empty(self.date);
        let (title, raw_date) = match (title, raw_date) {
            (Some(t), Some(d)) => (t, d),
            _ => return Err("Title and Date are required".to_string()),
        };
        let date = parse_day(&raw_date).ok_or_else(|| format!("Invalid date: {}", raw_date))?;
        let reminder_days_before = parse_reminder_days(self.reminder_days_before.as_ref())?;

        Ok(SpecialDayInput {
            title,
            description: non_empty(self.description),
            date,
            is_recurring: self.is_recurring.unwrap_or(default_recurring),
            reminder_days_before,
            union_id: non_empty(self.union_id),
        })
    }
}

/// Accepts a plain `YYYY-MM-DD` date or a timestamp, keeping only the calendar date as written.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_reminder_days(value: Option<&Value>) -> Result<u32, String> {
    let invalid = || "reminderDaysBefore must be a non-negative integer".to_string();
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0),
        Some(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
