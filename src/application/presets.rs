use crate::application::bounds::{end_of_day, last_day_of_month, start_of_day};
use crate::domain::models::{DateRange, Instant, Preset, PresetDefinition};
use crate::infrastructure::error::EngineError;
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

pub fn preset_from_id(id: &str) -> Result<Preset, EngineError> {
    Preset::parse(id).ok_or_else(|| EngineError::UnknownPreset(id.trim().to_string()))
}

pub fn definitions() -> Vec<PresetDefinition> {
    Preset::ALL.into_iter().map(PresetDefinition::from).collect()
}

pub fn resolve(preset: Preset, now: Instant, week_start: Weekday) -> DateRange {
    let today = now.date();
    match preset {
        Preset::TodayTomorrow => whole_days(today, shift_days(today, 1)),
        Preset::ThisWeek => {
            let first = start_of_week(today, week_start);
            whole_days(first, shift_days(first, 6))
        }
        Preset::LastWeek => {
            let first = shift_days(start_of_week(today, week_start), -7);
            whole_days(first, shift_days(first, 6))
        }
        Preset::ThisMonth => whole_month(today),
        Preset::LastMonth => {
            let first = today.with_day(1).unwrap_or(today);
            whole_month(first.checked_sub_months(Months::new(1)).unwrap_or(first))
        }
    }
}

pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    shift_days(date, -(offset as i64))
}

fn whole_days(first: NaiveDate, last: NaiveDate) -> DateRange {
    DateRange::new(start_of_day(first), end_of_day(last))
}

fn whole_month(date: NaiveDate) -> DateRange {
    let first = date.with_day(1).unwrap_or(date);
    let last = last_day_of_month(first).unwrap_or(first);
    whole_days(first, last)
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}
