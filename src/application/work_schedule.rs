use crate::domain::models::{
    ApprovalStatus, Bound, Shift, ShiftTemplate, WorkScheduleRequest, weekday_name,
};
use crate::infrastructure::error::EngineError;
use chrono::{Datelike, NaiveTime};
use std::collections::HashSet;

pub fn generate_shifts(
    request: &WorkScheduleRequest,
    bound: &Bound,
) -> Result<Vec<Shift>, EngineError> {
    request.validate().map_err(EngineError::InvalidConfig)?;
    let (Some(from), Some(to)) = (request.from(), request.to()) else {
        return Err(EngineError::InvalidConfig(
            "schedule dates must be YYYY-MM-DD".to_string(),
        ));
    };
    let templates = resolve_templates(&request.shifts)?;
    let weekdays = request.weekdays().into_iter().collect::<HashSet<_>>();
    let doctor_id = request.doctor_id.trim();

    let mut shifts = Vec::new();
    let mut skipped = 0usize;
    for date in from.iter_days().take_while(|date| *date <= to) {
        if !weekdays.contains(&date.weekday()) {
            continue;
        }
        for (name, start, end) in &templates {
            let start_at = date.and_time(*start);
            if !bound.contains(start_at) {
                skipped += 1;
                continue;
            }
            let date_key = date.format("%Y-%m-%d").to_string();
            shifts.push(Shift {
                id: shift_id(doctor_id, &date_key, name),
                doctor_id: doctor_id.to_string(),
                date: date_key,
                shift_name: name.clone(),
                start_at,
                end_at: date.and_time(*end),
                status: ApprovalStatus::Pending,
            });
        }
    }

    log::debug!(
        "expanded schedule for {doctor_id} on {:?}: {} shifts, {skipped} outside bound",
        request
            .weekdays()
            .into_iter()
            .map(weekday_name)
            .collect::<Vec<_>>(),
        shifts.len()
    );
    Ok(shifts)
}

pub fn shift_id(doctor_id: &str, date: &str, shift_name: &str) -> String {
    format!("{}:{}:{}", doctor_id.trim(), date.trim(), shift_name.trim())
}

pub fn merge_into_roster(roster: &mut Vec<Shift>, generated: Vec<Shift>) -> Vec<Shift> {
    let mut known_ids = roster
        .iter()
        .map(|shift| shift.id.clone())
        .collect::<HashSet<_>>();
    let mut added = Vec::new();
    for shift in generated {
        if known_ids.contains(&shift.id) {
            continue;
        }
        if roster.iter().any(|existing| existing.overlaps(&shift)) {
            continue;
        }
        known_ids.insert(shift.id.clone());
        roster.push(shift.clone());
        added.push(shift);
    }
    roster.sort_by(|left, right| {
        left.start_at
            .cmp(&right.start_at)
            .then_with(|| left.doctor_id.cmp(&right.doctor_id))
    });
    added
}

fn resolve_templates(
    templates: &[ShiftTemplate],
) -> Result<Vec<(String, NaiveTime, NaiveTime)>, EngineError> {
    let mut resolved: Vec<(String, NaiveTime, NaiveTime)> = Vec::new();
    for template in templates {
        let (Some(start), Some(end)) = (template.start_time(), template.end_time()) else {
            return Err(EngineError::InvalidConfig(format!(
                "shift `{}` must use HH:MM times",
                template.name
            )));
        };
        let name = template.name.trim().to_string();
        for (other_name, other_start, other_end) in &resolved {
            if *other_name == name {
                return Err(EngineError::InvalidConfig(format!(
                    "shift `{name}` is defined twice"
                )));
            }
            if start < *other_end && *other_start < end {
                return Err(EngineError::InvalidConfig(format!(
                    "shift `{name}` overlaps shift `{other_name}`"
                )));
            }
        }
        resolved.push((name, start, end));
    }
    resolved.sort_by_key(|(_, start, _)| *start);
    Ok(resolved)
}
