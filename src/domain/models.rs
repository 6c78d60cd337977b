use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

pub type Instant = NaiveDateTime;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bound {
    pub min: Option<Instant>,
    pub max: Option<Instant>,
}

impl Bound {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err("bound.min must be <= bound.max".to_string());
            }
        }
        Ok(())
    }

    pub fn contains(&self, instant: Instant) -> bool {
        self.min.is_none_or(|min| instant >= min) && self.max.is_none_or(|max| instant <= max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
struct RangeEndpoints {
    from: Instant,
    to: Instant,
}

// from <= to always holds, including after deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "RangeEndpoints", into = "RangeEndpoints")]
pub struct DateRange {
    from: Instant,
    to: Instant,
}

impl DateRange {
    pub fn new(first: Instant, second: Instant) -> Self {
        if first <= second {
            Self {
                from: first,
                to: second,
            }
        } else {
            Self {
                from: second,
                to: first,
            }
        }
    }

    pub fn point(instant: Instant) -> Self {
        Self {
            from: instant,
            to: instant,
        }
    }

    pub fn from(&self) -> Instant {
        self.from
    }

    pub fn to(&self) -> Instant {
        self.to
    }
}

impl From<RangeEndpoints> for DateRange {
    fn from(value: RangeEndpoints) -> Self {
        DateRange::new(value.from, value.to)
    }
}

impl From<DateRange> for RangeEndpoints {
    fn from(value: DateRange) -> Self {
        RangeEndpoints {
            from: value.from,
            to: value.to,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    Multiple,
    Range,
}

impl SelectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Range => "range",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    Single(Instant),
    Multiple(Vec<Instant>),
    Range(DateRange),
}

impl Selection {
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
            Self::Range(_) => SelectionMode::Range,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    HalfDay,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn of_hour(hour24: u32) -> Self {
        if hour24 >= 12 { Self::Pm } else { Self::Am }
    }

    pub fn hour_offset(self) -> u32 {
        match self {
            Self::Am => 0,
            Self::Pm => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GranularityOption {
    pub value: i32,
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    TodayTomorrow,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::TodayTomorrow,
        Preset::ThisWeek,
        Preset::LastWeek,
        Preset::ThisMonth,
        Preset::LastMonth,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::TodayTomorrow => "today-tomorrow",
            Self::ThisWeek => "this-week",
            Self::LastWeek => "last-week",
            Self::ThisMonth => "this-month",
            Self::LastMonth => "last-month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TodayTomorrow => "Today and tomorrow",
            Self::ThisWeek => "This week",
            Self::LastWeek => "Last week",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|preset| preset.id() == normalized)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresetDefinition {
    pub id: String,
    pub label: String,
}

impl From<Preset> for PresetDefinition {
    fn from(preset: Preset) -> Self {
        Self {
            id: preset.id().to_string(),
            label: preset.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftTemplate {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl ShiftTemplate {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.name, "shift.name")?;
        validate_hhmm(&self.start, "shift.start")?;
        validate_hhmm(&self.end, "shift.end")?;
        let (Some(start), Some(end)) = (parse_hhmm(&self.start), parse_hhmm(&self.end)) else {
            return Err("shift times must be HH:MM".to_string());
        };
        if end <= start {
            return Err(format!("shift `{}` must end after it starts", self.name));
        }
        Ok(())
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.start)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkScheduleRequest {
    pub doctor_id: String,
    pub from_date: String,
    pub to_date: String,
    pub days: Vec<String>,
    pub shifts: Vec<ShiftTemplate>,
}

pub const MAX_SCHEDULE_DAYS: i64 = 366;

impl WorkScheduleRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.doctor_id, "schedule.doctor_id")?;
        validate_date(&self.from_date, "schedule.from_date")?;
        validate_date(&self.to_date, "schedule.to_date")?;
        if self.days.is_empty() {
            return Err("schedule.days must not be empty".to_string());
        }
        for day in &self.days {
            if parse_weekday(day).is_none() {
                return Err(format!("schedule.days[] has unknown weekday `{day}`"));
            }
        }
        if self.shifts.is_empty() {
            return Err("schedule.shifts must not be empty".to_string());
        }
        for shift in &self.shifts {
            shift.validate()?;
        }

        let (Some(from), Some(to)) = (self.from(), self.to()) else {
            return Err("schedule dates must be YYYY-MM-DD".to_string());
        };
        if to < from {
            return Err("schedule.to_date must be >= schedule.from_date".to_string());
        }
        if (to - from).num_days() >= MAX_SCHEDULE_DAYS {
            return Err(format!(
                "schedule must span at most {MAX_SCHEDULE_DAYS} days"
            ));
        }
        Ok(())
    }

    pub fn from(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.from_date.trim(), "%Y-%m-%d").ok()
    }

    pub fn to(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.to_date.trim(), "%Y-%m-%d").ok()
    }

    pub fn weekdays(&self) -> Vec<Weekday> {
        self.days.iter().filter_map(|day| parse_weekday(day)).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shift {
    pub id: String,
    pub doctor_id: String,
    pub date: String,
    pub shift_name: String,
    pub start_at: Instant,
    pub end_at: Instant,
    pub status: ApprovalStatus,
}

impl Shift {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "shift.id")?;
        validate_non_empty(&self.doctor_id, "shift.doctor_id")?;
        validate_non_empty(&self.shift_name, "shift.shift_name")?;
        validate_date(&self.date, "shift.date")?;
        if self.end_at <= self.start_at {
            return Err("shift.end_at must be after shift.start_at".to_string());
        }
        Ok(())
    }

    pub fn overlaps(&self, other: &Shift) -> bool {
        self.doctor_id == other.doctor_id
            && self.start_at < other.end_at
            && other.start_at < self.end_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalDecision {
    pub shift_id: String,
    pub status: ApprovalStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Pending,
    Approved,
    Rejected,
    PartiallyApproved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorApproval {
    pub doctor_id: String,
    pub approved: u32,
    pub rejected: u32,
    pub pending: u32,
    pub status: ScheduleStatus,
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field_name} must not be empty"));
    }
    Ok(())
}

fn validate_hhmm(value: &str, field_name: &str) -> Result<(), String> {
    let mut split = value.trim().split(':');
    let Some(hour_str) = split.next() else {
        return Err(format!("{field_name} must be HH:MM"));
    };
    let Some(minute_str) = split.next() else {
        return Err(format!("{field_name} must be HH:MM"));
    };
    if split.next().is_some() {
        return Err(format!("{field_name} must be HH:MM"));
    }

    let hour = hour_str
        .parse::<u8>()
        .map_err(|_| format!("{field_name} must be HH:MM"))?;
    let minute = minute_str
        .parse::<u8>()
        .map_err(|_| format!("{field_name} must be HH:MM"))?;
    if hour > 23 || minute > 59 {
        return Err(format!("{field_name} must be HH:MM"));
    }
    Ok(())
}

fn validate_date(value: &str, field_name: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{field_name} must be YYYY-MM-DD"))?;
    Ok(())
}

pub(crate) fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub(crate) fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

pub(crate) fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
