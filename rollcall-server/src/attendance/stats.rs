//! Attendance aggregation
//!
//! Summary statistics for a scope: a single day, a trailing N-day
//! window, or a full month. Records with a NULL check-in timestamp are
//! excluded everywhere — "not yet checked in" is not an error. Empty
//! input always produces zero-filled results.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::db::models::AttendanceRecord;
use crate::utils::time::days_in_month;

/// Status bucket used for records with a null or empty status
pub const UNKNOWN_STATUS: &str = "unknown";

/// Daily status breakdown for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct StatusBreakdown {
    pub date: NaiveDate,
    /// Count per status. The "absent" bucket is always the computed
    /// value `total_employees - attended`, never the raw row count.
    pub buckets: BTreeMap<String, i64>,
    /// Records with status "present" or "late"
    pub attended: i64,
    pub absent: i64,
    pub total_employees: i64,
}

/// One point of a per-day series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: i64,
}

fn check_in_date(record: &AttendanceRecord) -> Option<NaiveDate> {
    record.timestamp_in.map(|ts| ts.date())
}

/// Group one day's records by status and derive the absent count.
///
/// `total_employees` is a plain table count, not derived from the
/// records — employees with zero records must show up as absent rather
/// than go missing. Any raw "absent" rows are therefore counted into
/// their own bucket first and then replaced by the computed value.
pub fn daily_status_breakdown(
    records: &[AttendanceRecord],
    date: NaiveDate,
    total_employees: i64,
) -> StatusBreakdown {
    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();

    for record in records {
        if check_in_date(record) != Some(date) {
            continue;
        }
        let status = match record.status.as_deref() {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => UNKNOWN_STATUS.to_string(),
        };
        *buckets.entry(status).or_insert(0) += 1;
    }

    let attended = buckets.get("present").copied().unwrap_or(0)
        + buckets.get("late").copied().unwrap_or(0);
    let absent = (total_employees - attended).max(0);
    buckets.insert("absent".to_string(), absent);

    StatusBreakdown {
        date,
        buckets,
        attended,
        absent,
        total_employees,
    }
}

/// Per-day counts for the last `n` calendar days including `today`,
/// oldest first. Always exactly `n` points; days without records are 0.
pub fn trailing_series(records: &[AttendanceRecord], today: NaiveDate, n: u32) -> Vec<DailyPoint> {
    let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in records {
        if let Some(date) = check_in_date(record) {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    (0..n)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset as u64)))
        .map(|date| DailyPoint {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Per-day counts for every calendar day of the given month, independent
/// of the current date — future days simply report 0 so far.
pub fn month_series(records: &[AttendanceRecord], year: i32, month: u32) -> Vec<DailyPoint> {
    let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in records {
        if let Some(date) = check_in_date(record)
            && date.year() == year
            && date.month() == month
        {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| DailyPoint {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(id: i64, ts: Option<&str>, status: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: id,
            timestamp_in: ts
                .map(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()),
            status: status.map(|s| s.to_string()),
            photo_path: None,
            device_id: None,
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_day_reports_everyone_absent() {
        let breakdown = daily_status_breakdown(&[], d("2026-08-07"), 12);
        assert_eq!(breakdown.absent, 12);
        assert_eq!(breakdown.attended, 0);
        // No other non-zero buckets
        assert!(
            breakdown
                .buckets
                .iter()
                .all(|(k, v)| k == "absent" || *v == 0)
        );
    }

    #[test]
    fn present_and_late_count_as_attended() {
        let records = vec![
            record(1, Some("2026-08-07 07:55:00"), Some("present")),
            record(2, Some("2026-08-07 08:20:00"), Some("late")),
            record(3, Some("2026-08-06 08:00:00"), Some("present")), // other day
        ];
        let breakdown = daily_status_breakdown(&records, d("2026-08-07"), 10);
        assert_eq!(breakdown.attended, 2);
        assert_eq!(breakdown.absent, 8);
        assert_eq!(breakdown.buckets["present"], 1);
        assert_eq!(breakdown.buckets["late"], 1);
    }

    #[test]
    fn null_and_empty_status_bucket_as_unknown() {
        let records = vec![
            record(1, Some("2026-08-07 09:00:00"), None),
            record(2, Some("2026-08-07 09:05:00"), Some("  ")),
        ];
        let breakdown = daily_status_breakdown(&records, d("2026-08-07"), 5);
        assert_eq!(breakdown.buckets[UNKNOWN_STATUS], 2);
        assert_eq!(breakdown.attended, 0);
        assert_eq!(breakdown.absent, 5);
    }

    #[test]
    fn raw_absent_rows_are_replaced_by_computed_value() {
        let records = vec![
            record(1, Some("2026-08-07 08:00:00"), Some("absent")),
            record(2, Some("2026-08-07 08:00:00"), Some("present")),
        ];
        let breakdown = daily_status_breakdown(&records, d("2026-08-07"), 4);
        // attended = 1, so absent = 4 - 1 = 3 — not the single raw row
        assert_eq!(breakdown.buckets["absent"], 3);
    }

    #[test]
    fn missing_check_in_is_excluded() {
        let records = vec![record(1, None, Some("present"))];
        let breakdown = daily_status_breakdown(&records, d("2026-08-07"), 3);
        assert_eq!(breakdown.attended, 0);
        assert_eq!(breakdown.absent, 3);
    }

    #[test]
    fn trailing_series_has_fixed_shape() {
        let today = d("2026-08-07");
        let records = vec![
            record(1, Some("2026-08-07 08:00:00"), Some("present")),
            record(2, Some("2026-08-05 08:00:00"), Some("present")),
            record(3, Some("2026-08-05 08:30:00"), Some("late")),
            record(4, Some("2026-07-01 08:00:00"), Some("present")), // outside window
        ];
        let series = trailing_series(&records, today, 7);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, d("2026-08-01")); // oldest first
        assert_eq!(series[6].date, today); // last point is today
        assert_eq!(series[6].count, 1);
        assert_eq!(series[4].count, 2); // 2026-08-05
        assert_eq!(series[0].count, 0);
    }

    #[test]
    fn trailing_series_on_empty_input_is_zero_filled() {
        let series = trailing_series(&[], d("2026-08-07"), 7);
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|p| p.count == 0));
    }

    #[test]
    fn month_series_covers_every_calendar_day() {
        let records = vec![
            record(1, Some("2026-02-10 08:00:00"), Some("present")),
            record(2, Some("2026-02-10 08:01:00"), Some("present")),
            record(3, Some("2026-03-01 08:00:00"), Some("present")), // other month
        ];
        let series = month_series(&records, 2026, 2);
        assert_eq!(series.len(), 28);
        assert_eq!(series[0].date, d("2026-02-01"));
        assert_eq!(series[9].count, 2);
        assert_eq!(series[27].count, 0); // future days report 0 so far
    }

    #[test]
    fn month_series_leap_february() {
        let series = month_series(&[], 2024, 2);
        assert_eq!(series.len(), 29);
    }
}
