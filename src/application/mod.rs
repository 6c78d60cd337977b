pub mod approvals;
pub mod bootstrap;
pub mod bounds;
pub mod commands;
pub mod picker_session;
pub mod presets;
pub mod range_selection;
pub mod time_builder;
pub mod work_schedule;
