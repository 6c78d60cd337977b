pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::bounds::{clamp, clamp_range, is_option_disabled, new_bound};
pub use application::commands::AppState;
pub use application::picker_session::{PickerOptions, PickerSession};
pub use application::range_selection::{RangeCoordinator, RangeState};
pub use application::time_builder::TimeOfDayPicker;
pub use domain::models::{
    Bound, DateRange, Granularity, GranularityOption, Instant, Meridiem, Preset, Selection,
    SelectionMode,
};
pub use infrastructure::error::EngineError;
