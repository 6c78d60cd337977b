use crate::application::approvals::{apply_decisions, reconcile};
use crate::application::bootstrap::bootstrap_workspace;
use crate::application::bounds::{
    clamp_range, day_options, month_options, new_bound, start_of_day, year_options,
};
use crate::application::picker_session::{PickerOptions, PickerSession, SelectionChangeHandler};
use crate::application::presets::{definitions, preset_from_id, resolve};
use crate::application::time_builder::{TimeChangeHandler, TimeOfDayPicker};
use crate::application::work_schedule::{generate_shifts, merge_into_roster};
use crate::domain::models::{
    ApprovalDecision, Bound, DateRange, DoctorApproval, GranularityOption, Instant,
    PresetDefinition, Selection, SelectionMode, Shift, WorkScheduleRequest,
};
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::config::{
    PickerSettings, read_picker_settings, read_schedule_policy, read_timezone,
};
use crate::infrastructure::error::EngineError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub type NowProvider = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct AppState {
    config_dir: PathBuf,
    activity_log: ActivityLog,
    timezone: Tz,
    picker_settings: PickerSettings,
    now_provider: NowProvider,
    runtime: Mutex<RuntimeState>,
}

#[derive(Debug, Default)]
struct RuntimeState {
    shifts: Vec<Shift>,
}

impl AppState {
    pub fn new(workspace_root: PathBuf) -> Result<Self, EngineError> {
        let bootstrap = bootstrap_workspace(&workspace_root)?;
        let timezone = read_timezone(&bootstrap.config_dir)?;
        let picker_settings = read_picker_settings(&bootstrap.config_dir)?;

        Ok(Self {
            activity_log: ActivityLog::new(&bootstrap.logs_dir),
            config_dir: bootstrap.config_dir,
            timezone,
            picker_settings,
            now_provider: Arc::new(Utc::now),
            runtime: Mutex::new(RuntimeState::default()),
        })
    }

    pub fn with_now_provider(mut self, now_provider: NowProvider) -> Self {
        self.now_provider = now_provider;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn local_now(&self) -> Instant {
        (self.now_provider)()
            .with_timezone(&self.timezone)
            .naive_local()
    }

    pub fn command_error(&self, command: &str, error: &EngineError) -> String {
        self.log_error(command, &error.to_string());
        error.to_string()
    }

    pub fn log_info(&self, command: &str, message: &str) {
        self.activity_log.info(command, message);
    }

    pub fn log_error(&self, command: &str, message: &str) {
        self.activity_log.error(command, message);
    }
}

pub fn list_presets_impl() -> Vec<PresetDefinition> {
    definitions()
}

pub fn resolve_preset_impl(
    state: &AppState,
    preset_id: String,
    min: Option<String>,
    max: Option<String>,
) -> Result<DateRange, EngineError> {
    let preset = preset_from_id(&preset_id)?;
    let bound = resolve_bound(state, min, max)?;
    let now = state.local_now();
    let range = clamp_range(
        resolve(preset, now, state.picker_settings.week_start),
        &bound,
    );
    Ok(range)
}

pub fn year_options_impl(
    state: &AppState,
    min: Option<String>,
    max: Option<String>,
) -> Result<Vec<GranularityOption>, EngineError> {
    let bound = resolve_bound(state, min, max)?;
    let year = state.local_now().year();
    let settings = state.picker_settings;
    let first = year - settings.years_back as i32;
    let last = year + settings.years_forward as i32;
    Ok(year_options(first..=last, &bound))
}

pub fn month_options_impl(
    state: &AppState,
    year: i32,
    min: Option<String>,
    max: Option<String>,
) -> Result<Vec<GranularityOption>, EngineError> {
    let bound = resolve_bound(state, min, max)?;
    Ok(month_options(year, &bound))
}

pub fn day_options_impl(
    state: &AppState,
    year: i32,
    month: u32,
    min: Option<String>,
    max: Option<String>,
) -> Result<Vec<GranularityOption>, EngineError> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidConfig(format!(
            "month must be 1-12, got {month}"
        )));
    }
    let bound = resolve_bound(state, min, max)?;
    Ok(day_options(year, month, &bound))
}

pub fn open_picker_impl(
    state: &AppState,
    mode: &str,
    committed: Option<Selection>,
    min: Option<String>,
    max: Option<String>,
    on_change: SelectionChangeHandler,
) -> Result<PickerSession, EngineError> {
    let options = PickerOptions {
        mode: parse_mode(mode)?,
        bound: resolve_bound(state, min, max)?,
        week_start: state.picker_settings.week_start,
    };
    PickerSession::open(committed, options, on_change)
}

pub fn open_time_picker_impl(
    state: &AppState,
    value: Option<String>,
    min: Option<String>,
    max: Option<String>,
    on_change: TimeChangeHandler,
) -> Result<TimeOfDayPicker, EngineError> {
    let bound = resolve_bound(state, min, max)?;
    let value = match value {
        Some(raw) => parse_instant_input(&raw, "value", state.timezone)?,
        None => state.local_now(),
    };
    Ok(TimeOfDayPicker::new(
        value,
        bound,
        state.picker_settings.use_12_hour,
        on_change,
    ))
}

pub fn generate_work_schedule_impl(
    state: &AppState,
    mut request: WorkScheduleRequest,
) -> Result<Vec<Shift>, EngineError> {
    let policy = read_schedule_policy(state.config_dir())?;
    if request.days.is_empty() {
        request.days = policy.work_days;
    }
    if request.shifts.is_empty() {
        request.shifts = policy.shifts;
    }

    let bound = Bound {
        min: Some(state.local_now()),
        max: None,
    };
    let generated = generate_shifts(&request, &bound)?;
    let added = {
        let mut runtime = lock_runtime(state)?;
        merge_into_roster(&mut runtime.shifts, generated)
    };

    state.log_info(
        "generate_work_schedule",
        &format!(
            "generated {} shifts for doctor_id={} ({}..{})",
            added.len(),
            request.doctor_id.trim(),
            request.from_date.trim(),
            request.to_date.trim()
        ),
    );
    Ok(added)
}

pub fn list_shifts_impl(
    state: &AppState,
    doctor_id: Option<String>,
    date: Option<String>,
) -> Result<Vec<Shift>, EngineError> {
    let date = date
        .map(|raw| parse_date_input(&raw, "date"))
        .transpose()?
        .map(|date| date.format("%Y-%m-%d").to_string());
    let doctor_id = doctor_id
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty());

    let runtime = lock_runtime(state)?;
    Ok(runtime
        .shifts
        .iter()
        .filter(|shift| doctor_id.as_deref().is_none_or(|id| shift.doctor_id == id))
        .filter(|shift| date.as_deref().is_none_or(|day| shift.date == day))
        .cloned()
        .collect())
}

pub fn approve_shifts_impl(
    state: &AppState,
    decisions: Vec<ApprovalDecision>,
) -> Result<Vec<Shift>, EngineError> {
    if decisions.is_empty() {
        return Ok(Vec::new());
    }

    let (updated, unknown) = {
        let mut runtime = lock_runtime(state)?;
        let unknown = apply_decisions(&mut runtime.shifts, &decisions);
        let touched = decisions
            .iter()
            .map(|decision| decision.shift_id.trim())
            .collect::<HashSet<_>>();
        let updated = runtime
            .shifts
            .iter()
            .filter(|shift| touched.contains(shift.id.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        (updated, unknown)
    };

    if !unknown.is_empty() {
        state.log_error(
            "approve_shifts",
            &format!("unknown shift ids: {}", unknown.join(", ")),
        );
    }
    state.log_info(
        "approve_shifts",
        &format!("updated {} shifts", updated.len()),
    );
    Ok(updated)
}

pub fn approval_summary_impl(state: &AppState) -> Result<Vec<DoctorApproval>, EngineError> {
    let runtime = lock_runtime(state)?;
    Ok(reconcile(&runtime.shifts))
}

pub fn delete_shift_impl(state: &AppState, shift_id: String) -> Result<bool, EngineError> {
    let shift_id = shift_id.trim();
    if shift_id.is_empty() {
        return Err(EngineError::InvalidConfig(
            "shift_id must not be empty".to_string(),
        ));
    }

    let removed = {
        let mut runtime = lock_runtime(state)?;
        let before = runtime.shifts.len();
        runtime.shifts.retain(|shift| shift.id != shift_id);
        runtime.shifts.len() != before
    };
    if removed {
        state.log_info("delete_shift", &format!("deleted shift_id={shift_id}"));
    }
    Ok(removed)
}

fn lock_runtime(state: &AppState) -> Result<MutexGuard<'_, RuntimeState>, EngineError> {
    state
        .runtime
        .lock()
        .map_err(|error| EngineError::InvalidConfig(format!("runtime lock poisoned: {error}")))
}

fn resolve_bound(
    state: &AppState,
    min: Option<String>,
    max: Option<String>,
) -> Result<Bound, EngineError> {
    let min = min
        .map(|raw| parse_instant_input(&raw, "min", state.timezone))
        .transpose()?;
    let max = max
        .map(|raw| parse_instant_input(&raw, "max", state.timezone))
        .transpose()?;
    new_bound(min, max)
}

fn parse_mode(value: &str) -> Result<SelectionMode, EngineError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "single" => Ok(SelectionMode::Single),
        "multiple" => Ok(SelectionMode::Multiple),
        "range" => Ok(SelectionMode::Range),
        other => Err(EngineError::InvalidConfig(format!(
            "unsupported picker mode: {}",
            other
        ))),
    }
}

fn parse_instant_input(value: &str, field_name: &str, timezone: Tz) -> Result<Instant, EngineError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&timezone).naive_local());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(start_of_day(date));
    }
    Err(EngineError::InvalidConfig(format!(
        "{field_name} must be RFC3339, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD"
    )))
}

fn parse_date_input(value: &str, field_name: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|error| EngineError::InvalidConfig(format!("{field_name} must be YYYY-MM-DD: {error}")))
}
