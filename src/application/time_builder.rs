use crate::application::bounds::{
    clamp, hour_options, meridiem_options, minute_options, second_options,
};
use crate::domain::models::{Bound, GranularityOption, Instant, Meridiem};
use crate::infrastructure::error::EngineError;
use chrono::{NaiveDate, Timelike};

pub type TimeChangeHandler = Box<dyn FnMut(Instant) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub meridiem: Meridiem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeField {
    Date,
    Meridiem,
    Hour,
    Minute,
    Second,
}

pub fn to_hour24(hour: u32, meridiem: Meridiem, use_12_hour: bool) -> Result<u32, EngineError> {
    if use_12_hour {
        if !(1..=12).contains(&hour) {
            return Err(EngineError::InvalidTime(format!(
                "12-hour clock hour must be 1-12, got {hour}"
            )));
        }
        return Ok((hour % 12) + meridiem.hour_offset());
    }
    if hour > 23 {
        return Err(EngineError::InvalidTime(format!(
            "24-hour clock hour must be 0-23, got {hour}"
        )));
    }
    Ok(hour)
}

pub fn to_display_hour(hour24: u32, use_12_hour: bool) -> u32 {
    if !use_12_hour {
        return hour24;
    }
    match hour24 % 12 {
        0 => 12,
        hour => hour,
    }
}

pub fn build_instant(
    date: NaiveDate,
    fields: TimeFields,
    use_12_hour: bool,
) -> Result<Instant, EngineError> {
    let hour = to_hour24(fields.hour, fields.meridiem, use_12_hour)?;
    date.and_hms_opt(hour, fields.minute, fields.second)
        .ok_or_else(|| {
            EngineError::InvalidTime(format!(
                "{:02}:{:02}:{:02} is not a valid time of day",
                hour, fields.minute, fields.second
            ))
        })
}

// Finer fields take the violated edge's value, then the whole instant is clamped.
pub fn cascade(candidate: Instant, changed: TimeField, bound: &Bound) -> Instant {
    let edge = match (bound.min, bound.max) {
        (Some(min), _) if candidate < min => min,
        (_, Some(max)) if candidate > max => max,
        _ => return candidate,
    };

    let hour = if changed < TimeField::Hour {
        edge.hour()
    } else {
        candidate.hour()
    };
    let minute = if changed < TimeField::Minute {
        edge.minute()
    } else {
        candidate.minute()
    };
    let second = if changed < TimeField::Second {
        edge.second()
    } else {
        candidate.second()
    };
    let rebuilt = candidate
        .date()
        .and_hms_nano_opt(hour, minute, second, edge.nanosecond())
        .unwrap_or(edge);

    let result = clamp(rebuilt, bound);
    log::debug!("cascaded {changed:?} edit from {candidate} to {result}");
    result
}

pub struct TimeOfDayPicker {
    value: Instant,
    bound: Bound,
    use_12_hour: bool,
    on_change: TimeChangeHandler,
}

impl TimeOfDayPicker {
    pub fn new(value: Instant, bound: Bound, use_12_hour: bool, on_change: TimeChangeHandler) -> Self {
        Self {
            value,
            bound,
            use_12_hour,
            on_change,
        }
    }

    pub fn value(&self) -> Instant {
        self.value
    }

    pub fn fields(&self) -> TimeFields {
        TimeFields {
            hour: to_display_hour(self.value.hour(), self.use_12_hour),
            minute: self.value.minute(),
            second: self.value.second(),
            meridiem: Meridiem::of_hour(self.value.hour()),
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) -> Instant {
        let candidate = date.and_time(self.value.time());
        self.commit(candidate, TimeField::Date)
    }

    pub fn set_hour(&mut self, hour: u32) -> Result<Instant, EngineError> {
        let mut fields = self.fields();
        fields.hour = hour;
        let candidate = build_instant(self.value.date(), fields, self.use_12_hour)?;
        Ok(self.commit(candidate, TimeField::Hour))
    }

    pub fn set_minute(&mut self, minute: u32) -> Result<Instant, EngineError> {
        let mut fields = self.fields();
        fields.minute = minute;
        let candidate = build_instant(self.value.date(), fields, self.use_12_hour)?;
        Ok(self.commit(candidate, TimeField::Minute))
    }

    pub fn set_second(&mut self, second: u32) -> Result<Instant, EngineError> {
        let mut fields = self.fields();
        fields.second = second;
        let candidate = build_instant(self.value.date(), fields, self.use_12_hour)?;
        Ok(self.commit(candidate, TimeField::Second))
    }

    pub fn set_meridiem(&mut self, meridiem: Meridiem) -> Instant {
        let hour24 = (self.value.hour() % 12) + meridiem.hour_offset();
        let candidate = self
            .value
            .with_hour(hour24)
            .unwrap_or(self.value);
        self.commit(candidate, TimeField::Meridiem)
    }

    pub fn hour_options(&self) -> Vec<GranularityOption> {
        let meridiem = self
            .use_12_hour
            .then(|| Meridiem::of_hour(self.value.hour()));
        hour_options(self.value.date(), meridiem, &self.bound)
    }

    pub fn minute_options(&self) -> Vec<GranularityOption> {
        minute_options(self.value.date(), self.value.hour(), &self.bound)
    }

    pub fn second_options(&self) -> Vec<GranularityOption> {
        second_options(
            self.value.date(),
            self.value.hour(),
            self.value.minute(),
            &self.bound,
        )
    }

    pub fn meridiem_options(&self) -> Vec<GranularityOption> {
        meridiem_options(self.value.date(), &self.bound)
    }

    fn commit(&mut self, candidate: Instant, changed: TimeField) -> Instant {
        self.value = cascade(candidate, changed, &self.bound);
        (self.on_change)(self.value);
        self.value
    }
}
