use crate::application::bounds::{clamp, clamp_range};
use crate::application::presets::resolve;
use crate::domain::models::{Bound, DateRange, Instant, Preset};
use chrono::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeState {
    AwaitingAnchor,
    AwaitingEnd { anchor: Instant },
}

#[derive(Debug, Clone)]
pub struct RangeCoordinator {
    state: RangeState,
    bound: Bound,
}

impl RangeCoordinator {
    pub fn new(bound: Bound) -> Self {
        Self {
            state: RangeState::AwaitingAnchor,
            bound,
        }
    }

    pub fn state(&self) -> RangeState {
        self.state
    }

    pub fn select_point(&mut self, clicked: Instant) -> DateRange {
        match self.state {
            RangeState::AwaitingAnchor => {
                let anchor = clamp(clicked, &self.bound);
                self.state = RangeState::AwaitingEnd { anchor };
                DateRange::point(anchor)
            }
            RangeState::AwaitingEnd { anchor } => {
                self.state = RangeState::AwaitingAnchor;
                clamp_range(DateRange::new(anchor, clicked), &self.bound)
            }
        }
    }

    pub fn select_span(&mut self, start: Instant, end: Instant) -> DateRange {
        self.state = RangeState::AwaitingAnchor;
        clamp_range(DateRange::new(start, end), &self.bound)
    }

    pub fn apply_preset(&mut self, preset: Preset, now: Instant, week_start: Weekday) -> DateRange {
        self.state = RangeState::AwaitingAnchor;
        clamp_range(resolve(preset, now, week_start), &self.bound)
    }
}
