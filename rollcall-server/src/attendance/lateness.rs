//! Lateness classification
//!
//! A pure function of (check-in wall-clock time, cutoff). When the
//! employee has a shift for the day, the cutoff is the shift start plus
//! a small grace window; otherwise a fixed default applies.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

/// Default cutoff when no shift is known: 08:00
pub fn default_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time")
}

/// Grace window added to the shift start time, in minutes
pub const GRACE_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Punctuality {
    OnTime,
    Late,
}

impl Punctuality {
    /// The status string recorded on check-in
    pub fn as_status(&self) -> &'static str {
        match self {
            Punctuality::OnTime => "present",
            Punctuality::Late => "late",
        }
    }
}

/// Classify a check-in time against the applicable cutoff.
///
/// On time means at or before the cutoff; the boundary itself is on time.
pub fn classify(check_in: NaiveTime, shift_start: Option<NaiveTime>) -> Punctuality {
    let cutoff = match shift_start {
        Some(start) => start + Duration::minutes(GRACE_MINUTES),
        None => default_cutoff(),
    };
    if check_in <= cutoff {
        Punctuality::OnTime
    } else {
        Punctuality::Late
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn shift_grace_boundary() {
        let start = Some(t(8, 0));
        assert_eq!(classify(t(8, 4), start), Punctuality::OnTime);
        assert_eq!(classify(t(8, 5), start), Punctuality::OnTime);
        assert_eq!(classify(t(8, 6), start), Punctuality::Late);
    }

    #[test]
    fn default_cutoff_without_shift() {
        assert_eq!(classify(t(7, 59), None), Punctuality::OnTime);
        assert_eq!(classify(t(8, 0), None), Punctuality::OnTime);
        assert_eq!(classify(t(8, 1), None), Punctuality::Late);
    }

    #[test]
    fn late_shift_moves_cutoff() {
        let start = Some(t(14, 30));
        assert_eq!(classify(t(14, 35), start), Punctuality::OnTime);
        assert_eq!(classify(t(14, 36), start), Punctuality::Late);
    }

    #[test]
    fn status_strings() {
        assert_eq!(Punctuality::OnTime.as_status(), "present");
        assert_eq!(Punctuality::Late.as_status(), "late");
    }
}
