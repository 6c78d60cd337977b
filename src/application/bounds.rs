use crate::domain::models::{Bound, DateRange, Granularity, GranularityOption, Instant, Meridiem};
use crate::infrastructure::error::EngineError;
use chrono::{Datelike, Months, NaiveDate, NaiveTime, Timelike};
use std::ops::RangeInclusive;

pub fn new_bound(min: Option<Instant>, max: Option<Instant>) -> Result<Bound, EngineError> {
    let bound = Bound { min, max };
    bound.validate().map_err(|_| EngineError::InvalidBound {
        min: min.map(|value| value.to_string()).unwrap_or_default(),
        max: max.map(|value| value.to_string()).unwrap_or_default(),
    })?;
    Ok(bound)
}

pub fn clamp(instant: Instant, bound: &Bound) -> Instant {
    if let Some(min) = bound.min {
        if instant < min {
            return min;
        }
    }
    if let Some(max) = bound.max {
        if instant > max {
            return max;
        }
    }
    instant
}

pub fn clamp_range(range: DateRange, bound: &Bound) -> DateRange {
    DateRange::new(clamp(range.from(), bound), clamp(range.to(), bound))
}

// Partial overlap keeps an option enabled.
pub fn is_option_disabled(span: &DateRange, bound: &Bound) -> bool {
    if let Some(max) = bound.max {
        if span.from() > max {
            return true;
        }
    }
    if let Some(min) = bound.min {
        if span.to() < min {
            return true;
        }
    }
    false
}

pub fn option_span(granularity: Granularity, context: Instant, value: i32) -> Option<DateRange> {
    let date = context.date();
    match granularity {
        Granularity::Year => {
            let first = NaiveDate::from_ymd_opt(value, 1, 1)?;
            let last = NaiveDate::from_ymd_opt(value, 12, 31)?;
            Some(DateRange::new(start_of_day(first), end_of_day(last)))
        }
        Granularity::Month => {
            let month = u32::try_from(value).ok()?;
            let first = NaiveDate::from_ymd_opt(date.year(), month, 1)?;
            Some(DateRange::new(
                start_of_day(first),
                end_of_day(last_day_of_month(first)?),
            ))
        }
        Granularity::Day => {
            let day = u32::try_from(value).ok()?;
            let day = NaiveDate::from_ymd_opt(date.year(), date.month(), day)?;
            Some(DateRange::new(start_of_day(day), end_of_day(day)))
        }
        Granularity::Hour => {
            let hour = u32::try_from(value).ok()?;
            time_span(date, (hour, 0, 0), (hour, 59, 59))
        }
        Granularity::Minute => {
            let minute = u32::try_from(value).ok()?;
            time_span(date, (context.hour(), minute, 0), (context.hour(), minute, 59))
        }
        Granularity::Second => {
            let second = u32::try_from(value).ok()?;
            let (hour, minute) = (context.hour(), context.minute());
            time_span(date, (hour, minute, second), (hour, minute, second))
        }
        Granularity::HalfDay => match value {
            0 => time_span(date, (0, 0, 0), (11, 59, 59)),
            1 => time_span(date, (12, 0, 0), (23, 59, 59)),
            _ => None,
        },
    }
}

pub fn year_options(years: RangeInclusive<i32>, bound: &Bound) -> Vec<GranularityOption> {
    years
        .filter_map(|year| {
            let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
            option(Granularity::Year, start_of_day(first), year, year.to_string(), bound)
        })
        .collect()
}

pub fn month_options(year: i32, bound: &Bound) -> Vec<GranularityOption> {
    let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    (1..=12)
        .filter_map(|month| {
            let label = month_short_name(month as u32).to_string();
            option(Granularity::Month, start_of_day(first), month, label, bound)
        })
        .collect()
}

pub fn day_options(year: i32, month: u32, bound: &Bound) -> Vec<GranularityOption> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(last) = last_day_of_month(first) else {
        return Vec::new();
    };
    (1..=last.day() as i32)
        .filter_map(|day| option(Granularity::Day, start_of_day(first), day, day.to_string(), bound))
        .collect()
}

pub fn hour_options(
    date: NaiveDate,
    meridiem: Option<Meridiem>,
    bound: &Bound,
) -> Vec<GranularityOption> {
    let context = start_of_day(date);
    match meridiem {
        None => (0..24)
            .filter_map(|hour| option(Granularity::Hour, context, hour, format!("{hour:02}"), bound))
            .collect(),
        Some(meridiem) => (1..=12)
            .filter_map(|display| {
                let hour24 = (display as u32 % 12) + meridiem.hour_offset();
                let span = option_span(Granularity::Hour, context, hour24 as i32)?;
                Some(GranularityOption {
                    value: display,
                    label: format!("{display:02}"),
                    disabled: is_option_disabled(&span, bound),
                })
            })
            .collect(),
    }
}

pub fn minute_options(date: NaiveDate, hour24: u32, bound: &Bound) -> Vec<GranularityOption> {
    let Some(context) = date.and_hms_opt(hour24, 0, 0) else {
        return Vec::new();
    };
    (0..60)
        .filter_map(|minute| {
            option(Granularity::Minute, context, minute, format!("{minute:02}"), bound)
        })
        .collect()
}

pub fn second_options(
    date: NaiveDate,
    hour24: u32,
    minute: u32,
    bound: &Bound,
) -> Vec<GranularityOption> {
    let Some(context) = date.and_hms_opt(hour24, minute, 0) else {
        return Vec::new();
    };
    (0..60)
        .filter_map(|second| {
            option(Granularity::Second, context, second, format!("{second:02}"), bound)
        })
        .collect()
}

pub fn meridiem_options(date: NaiveDate, bound: &Bound) -> Vec<GranularityOption> {
    let context = start_of_day(date);
    [Meridiem::Am, Meridiem::Pm]
        .into_iter()
        .enumerate()
        .filter_map(|(index, meridiem)| {
            option(
                Granularity::HalfDay,
                context,
                index as i32,
                meridiem.label().to_string(),
                bound,
            )
        })
        .collect()
}

fn option(
    granularity: Granularity,
    context: Instant,
    value: i32,
    label: String,
    bound: &Bound,
) -> Option<GranularityOption> {
    let span = option_span(granularity, context, value)?;
    Some(GranularityOption {
        value,
        label,
        disabled: is_option_disabled(&span, bound),
    })
}

fn time_span(date: NaiveDate, start: (u32, u32, u32), end: (u32, u32, u32)) -> Option<DateRange> {
    let from = date.and_hms_milli_opt(start.0, start.1, start.2, 0)?;
    let to = date.and_hms_milli_opt(end.0, end.1, end.2, 999)?;
    Some(DateRange::new(from, to))
}

pub(crate) fn start_of_day(date: NaiveDate) -> Instant {
    date.and_time(NaiveTime::MIN)
}

pub(crate) fn end_of_day(date: NaiveDate) -> Instant {
    date.and_time(last_millisecond())
}

pub(crate) fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}

fn last_millisecond() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn month_short_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};
    use proptest::prelude::*;

    fn at(value: &str) -> Instant {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").expect("valid datetime")
    }

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    fn base() -> Instant {
        at("2024-01-01T00:00:00.000")
    }

    fn instant_strategy() -> impl Strategy<Value = Instant> {
        // Roughly four years of milliseconds from 2024-01-01.
        (0i64..126_230_400_000).prop_map(|offset| base() + Duration::milliseconds(offset))
    }

    fn bound_strategy() -> impl Strategy<Value = Bound> {
        (
            proptest::option::of(instant_strategy()),
            proptest::option::of(instant_strategy()),
        )
            .prop_map(|(first, second)| match (first, second) {
                (Some(a), Some(b)) if a > b => Bound {
                    min: Some(b),
                    max: Some(a),
                },
                (min, max) => Bound { min, max },
            })
    }

    #[test]
    fn new_bound_rejects_min_after_max() {
        let result = new_bound(
            Some(at("2024-06-02T00:00:00.000")),
            Some(at("2024-06-01T00:00:00.000")),
        );
        match result {
            Err(EngineError::InvalidBound { .. }) => {}
            other => panic!("expected invalid bound, got {other:?}"),
        }
        assert!(new_bound(None, Some(base())).is_ok());
    }

    #[test]
    fn clamp_snaps_to_nearest_edge() {
        let bound = Bound {
            min: Some(at("2024-06-10T00:00:00.000")),
            max: Some(at("2024-06-20T00:00:00.000")),
        };
        assert_eq!(clamp(at("2024-06-01T08:00:00.000"), &bound), at("2024-06-10T00:00:00.000"));
        assert_eq!(clamp(at("2024-07-01T08:00:00.000"), &bound), at("2024-06-20T00:00:00.000"));
        assert_eq!(clamp(at("2024-06-15T08:00:00.000"), &bound), at("2024-06-15T08:00:00.000"));
        assert_eq!(clamp(base(), &Bound::unbounded()), base());
    }

    #[test]
    fn year_span_covers_whole_calendar_year() {
        let span = option_span(Granularity::Year, base(), 2024).expect("year span");
        assert_eq!(span.from(), at("2024-01-01T00:00:00.000"));
        assert_eq!(span.to(), at("2024-12-31T23:59:59.999"));
    }

    #[test]
    fn month_span_handles_leap_february() {
        let span = option_span(Granularity::Month, base(), 2).expect("month span");
        assert_eq!(span.from(), at("2024-02-01T00:00:00.000"));
        assert_eq!(span.to(), at("2024-02-29T23:59:59.999"));
        assert!(option_span(Granularity::Month, base(), 13).is_none());
    }

    #[test]
    fn half_day_spans_split_at_noon() {
        let am = option_span(Granularity::HalfDay, base(), 0).expect("am span");
        let pm = option_span(Granularity::HalfDay, base(), 1).expect("pm span");
        assert_eq!(am.to(), at("2024-01-01T11:59:59.999"));
        assert_eq!(pm.from(), at("2024-01-01T12:00:00.000"));
        assert!(option_span(Granularity::HalfDay, base(), 2).is_none());
    }

    #[test]
    fn partially_overlapping_option_stays_enabled() {
        let bound = Bound {
            min: Some(at("2024-06-15T10:30:00.000")),
            max: None,
        };
        let span = option_span(Granularity::Hour, at("2024-06-15T00:00:00.000"), 10)
            .expect("hour span");
        assert!(!is_option_disabled(&span, &bound));
        let earlier = option_span(Granularity::Hour, at("2024-06-15T00:00:00.000"), 9)
            .expect("hour span");
        assert!(is_option_disabled(&earlier, &bound));
    }

    #[test]
    fn year_and_month_options_follow_bound() {
        let bound = Bound {
            min: Some(at("2023-03-15T00:00:00.000")),
            max: Some(at("2024-06-15T00:00:00.000")),
        };
        let years = year_options(2022..=2025, &bound);
        let disabled = years
            .iter()
            .filter(|option| option.disabled)
            .map(|option| option.value)
            .collect::<Vec<_>>();
        assert_eq!(disabled, vec![2022, 2025]);

        let months = month_options(2024, &bound);
        assert_eq!(months.len(), 12);
        assert!(!months[5].disabled);
        assert!(months[6].disabled);
        assert_eq!(months[0].label, "Jan");
    }

    #[test]
    fn day_options_match_month_length() {
        let bound = Bound {
            min: Some(at("2024-02-10T12:00:00.000")),
            max: None,
        };
        let days = day_options(2024, 2, &bound);
        assert_eq!(days.len(), 29);
        assert!(days[8].disabled);
        assert!(!days[9].disabled);
    }

    #[test]
    fn twelve_hour_options_map_display_hour_to_clock() {
        let bound = Bound {
            min: None,
            max: Some(at("2024-06-15T13:30:00.000")),
        };
        let pm = hour_options(day("2024-06-15"), Some(Meridiem::Pm), &bound);
        let twelve = pm.iter().find(|option| option.value == 12).expect("12 PM");
        let one = pm.iter().find(|option| option.value == 1).expect("1 PM");
        let two = pm.iter().find(|option| option.value == 2).expect("2 PM");
        assert!(!twelve.disabled);
        assert!(!one.disabled);
        assert!(two.disabled);

        let full = hour_options(day("2024-06-15"), None, &bound);
        assert_eq!(full.len(), 24);
        assert!(full[14].disabled);
    }

    #[test]
    fn minute_and_second_options_depend_on_selected_hour() {
        let bound = Bound {
            min: None,
            max: Some(at("2024-06-15T10:30:15.000")),
        };
        let date = day("2024-06-15");
        let at_ten = minute_options(date, 10, &bound);
        assert!(!at_ten[30].disabled);
        assert!(at_ten[31].disabled);
        let at_nine = minute_options(date, 9, &bound);
        assert!(at_nine.iter().all(|option| !option.disabled));

        let seconds = second_options(date, 10, 30, &bound);
        assert!(!seconds[15].disabled);
        assert!(seconds[16].disabled);
    }

    #[test]
    fn meridiem_options_disable_afternoon_past_max() {
        let bound = Bound {
            min: None,
            max: Some(at("2024-06-15T11:00:00.000")),
        };
        let options = meridiem_options(day("2024-06-15"), &bound);
        assert_eq!(options.len(), 2);
        assert!(!options[0].disabled);
        assert!(options[1].disabled);
        assert_eq!(options[1].label, "PM");
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent(instant in instant_strategy(), bound in bound_strategy()) {
            let once = clamp(instant, &bound);
            prop_assert_eq!(clamp(once, &bound), once);
        }

        #[test]
        fn clamp_result_stays_inside_closed_bound(
            instant in instant_strategy(),
            first in instant_strategy(),
            second in instant_strategy()
        ) {
            let bound = Bound {
                min: Some(first.min(second)),
                max: Some(first.max(second)),
            };
            let clamped = clamp(instant, &bound);
            prop_assert!(bound.contains(clamped));
        }

        #[test]
        fn enabled_hour_options_intersect_bound(
            bound in bound_strategy(),
            offset_days in 0i64..1460
        ) {
            let date = base().date() + Duration::days(offset_days);
            for option in hour_options(date, None, &bound) {
                let span = option_span(Granularity::Hour, start_of_day(date), option.value)
                    .expect("hour span");
                let overlaps = bound.min.is_none_or(|min| span.to() >= min)
                    && bound.max.is_none_or(|max| span.from() <= max);
                prop_assert_eq!(!option.disabled, overlaps);
            }
        }
    }
}
