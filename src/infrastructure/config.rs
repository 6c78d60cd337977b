use crate::domain::models::{ShiftTemplate, parse_weekday};
use crate::infrastructure::error::EngineError;
use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const APP_JSON: &str = "app.json";
const PICKER_JSON: &str = "picker.json";
const SCHEDULE_JSON: &str = "schedule.json";
const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub app: serde_json::Value,
    pub picker: serde_json::Value,
    pub schedule: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerSettings {
    pub week_start: Weekday,
    pub use_12_hour: bool,
    pub years_back: u32,
    pub years_forward: u32,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            use_12_hour: false,
            years_back: 100,
            years_forward: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub work_days: Vec<String>,
    pub shifts: Vec<ShiftTemplate>,
}

fn default_files() -> HashMap<&'static str, serde_json::Value> {
    HashMap::from([
        (
            APP_JSON,
            serde_json::json!({
                "schema": 1,
                "appName": "Clinic Booking",
                "timezone": DEFAULT_TIMEZONE
            }),
        ),
        (
            PICKER_JSON,
            serde_json::json!({
                "schema": 1,
                "weekStartsOn": "Monday",
                "use12HourFormat": false,
                "yearsBack": 100,
                "yearsForward": 10
            }),
        ),
        (
            SCHEDULE_JSON,
            serde_json::json!({
                "schema": 1,
                "workDays": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"],
                "shifts": [
                    { "name": "morning", "start": "07:30", "end": "11:30" },
                    { "name": "afternoon", "start": "13:00", "end": "17:00" }
                ]
            }),
        ),
    ])
}

pub fn ensure_default_configs(config_dir: &Path) -> Result<(), EngineError> {
    for (name, value) in default_files() {
        let path = config_dir.join(name);
        if !path.exists() {
            let formatted = serde_json::to_string_pretty(&value)?;
            fs::write(path, format!("{formatted}\n"))?;
        }
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<serde_json::Value, EngineError> {
    let raw = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| EngineError::InvalidConfig(format!("missing schema in {}", path.display())))?;
    if schema != 1 {
        return Err(EngineError::InvalidConfig(format!(
            "unsupported schema {} in {}",
            schema,
            path.display()
        )));
    }
    Ok(parsed)
}

pub fn load_configs(config_dir: &Path) -> Result<ConfigBundle, EngineError> {
    Ok(ConfigBundle {
        app: read_config(&config_dir.join(APP_JSON))?,
        picker: read_config(&config_dir.join(PICKER_JSON))?,
        schedule: read_config(&config_dir.join(SCHEDULE_JSON))?,
    })
}

pub fn read_timezone(config_dir: &Path) -> Result<Tz, EngineError> {
    let app = read_config(&config_dir.join(APP_JSON))?;
    let name = app
        .get("timezone")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_TIMEZONE);
    name.parse::<Tz>()
        .map_err(|error| EngineError::InvalidConfig(format!("invalid timezone `{name}`: {error}")))
}

pub fn read_picker_settings(config_dir: &Path) -> Result<PickerSettings, EngineError> {
    let picker = read_config(&config_dir.join(PICKER_JSON))?;
    let mut settings = PickerSettings::default();

    if let Some(raw) = picker.get("weekStartsOn").and_then(serde_json::Value::as_str) {
        settings.week_start = parse_weekday(raw).ok_or_else(|| {
            EngineError::InvalidConfig(format!("weekStartsOn has unknown weekday `{raw}`"))
        })?;
    }
    if let Some(value) = picker
        .get("use12HourFormat")
        .and_then(serde_json::Value::as_bool)
    {
        settings.use_12_hour = value;
    }
    if let Some(value) = picker.get("yearsBack").and_then(serde_json::Value::as_u64) {
        settings.years_back = value.min(1000) as u32;
    }
    if let Some(value) = picker
        .get("yearsForward")
        .and_then(serde_json::Value::as_u64)
    {
        settings.years_forward = value.min(1000) as u32;
    }
    Ok(settings)
}

pub fn read_schedule_policy(config_dir: &Path) -> Result<SchedulePolicy, EngineError> {
    let schedule = read_config(&config_dir.join(SCHEDULE_JSON))?;
    let work_days = schedule
        .get("workDays")
        .and_then(serde_json::Value::as_array)
        .map(|days| {
            days.iter()
                .filter_map(serde_json::Value::as_str)
                .filter(|day| parse_weekday(day).is_some())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let shifts = match schedule.get("shifts") {
        Some(value) => serde_json::from_value::<Vec<ShiftTemplate>>(value.clone())?,
        None => Vec::new(),
    };
    for shift in &shifts {
        shift.validate().map_err(EngineError::InvalidConfig)?;
    }
    Ok(SchedulePolicy { work_days, shifts })
}
