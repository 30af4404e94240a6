//! Attendance analytics: filter model and aggregation engine

pub mod engine;
pub mod models;

pub use engine::rank;
pub use models::{AttendanceRow, DayType, Period, ReportFilter};
