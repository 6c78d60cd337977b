use crate::application::bounds::{clamp, end_of_day, is_option_disabled, start_of_day};
use crate::application::range_selection::{RangeCoordinator, RangeState};
use crate::domain::models::{Bound, DateRange, Instant, Preset, Selection, SelectionMode};
use crate::infrastructure::error::EngineError;
use chrono::Weekday;

pub type SelectionChangeHandler = Box<dyn FnMut(&Selection) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerOptions {
    pub mode: SelectionMode,
    pub bound: Bound,
    pub week_start: Weekday,
}

pub struct PickerSession {
    options: PickerOptions,
    pending: Option<Selection>,
    range: RangeCoordinator,
    on_change: SelectionChangeHandler,
}

impl PickerSession {
    pub fn open(
        committed: Option<Selection>,
        options: PickerOptions,
        on_change: SelectionChangeHandler,
    ) -> Result<Self, EngineError> {
        if let Some(selection) = &committed {
            if selection.mode() != options.mode {
                return Err(EngineError::ModeMismatch {
                    operation: "open",
                    mode: options.mode.as_str(),
                });
            }
        }
        Ok(Self {
            options,
            pending: committed,
            range: RangeCoordinator::new(options.bound),
            on_change,
        })
    }

    pub fn mode(&self) -> SelectionMode {
        self.options.mode
    }

    pub fn pending(&self) -> Option<&Selection> {
        self.pending.as_ref()
    }

    pub fn range_state(&self) -> RangeState {
        self.range.state()
    }

    pub fn click(&mut self, instant: Instant) -> Option<&Selection> {
        let next = match self.options.mode {
            SelectionMode::Single => Some(Selection::Single(clamp(instant, &self.options.bound))),
            SelectionMode::Multiple => {
                if self.lands_on_disabled_day(instant) {
                    return self.pending.as_ref();
                }
                self.toggle(clamp(instant, &self.options.bound))
            }
            SelectionMode::Range => Some(Selection::Range(self.range.select_point(instant))),
        };
        self.pending = next;
        self.pending.as_ref()
    }

    pub fn drag(&mut self, start: Instant, end: Instant) -> Result<DateRange, EngineError> {
        self.require_range("drag")?;
        let range = self.range.select_span(start, end);
        self.pending = Some(Selection::Range(range));
        Ok(range)
    }

    pub fn choose_preset(&mut self, preset: Preset, now: Instant) -> Result<DateRange, EngineError> {
        self.require_range("choose_preset")?;
        let range = self
            .range
            .apply_preset(preset, now, self.options.week_start);
        self.pending = Some(Selection::Range(range));
        Ok(range)
    }

    pub fn confirm(mut self) -> Option<Selection> {
        let selection = self.pending.take()?;
        (self.on_change)(&selection);
        Some(selection)
    }

    pub fn cancel(self) {}

    fn lands_on_disabled_day(&self, instant: Instant) -> bool {
        let day = instant.date();
        let span = DateRange::new(start_of_day(day), end_of_day(day));
        is_option_disabled(&span, &self.options.bound)
    }

    fn toggle(&mut self, instant: Instant) -> Option<Selection> {
        let mut instants = match self.pending.take() {
            Some(Selection::Multiple(instants)) => instants,
            _ => Vec::new(),
        };
        if let Some(index) = instants.iter().position(|existing| *existing == instant) {
            instants.remove(index);
        } else {
            instants.push(instant);
            instants.sort_unstable();
        }
        Some(Selection::Multiple(instants))
    }

    fn require_range(&self, operation: &'static str) -> Result<(), EngineError> {
        if self.options.mode != SelectionMode::Range {
            return Err(EngineError::ModeMismatch {
                operation,
                mode: self.options.mode.as_str(),
            });
        }
        Ok(())
    }
}
