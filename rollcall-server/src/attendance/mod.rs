//! 考勤统计模块
//!
//! Pure aggregation over fetched record sets — no database access, no
//! state. Handlers fetch rows through the repository layer and feed them
//! here; everything in this module is directly unit-testable.

pub mod lateness;
pub mod stats;

pub use lateness::{GRACE_MINUTES, Punctuality, classify, default_cutoff};
pub use stats::{DailyPoint, StatusBreakdown, daily_status_breakdown, month_series, trailing_series};
