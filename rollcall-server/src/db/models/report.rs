//! Report Model (报表文件)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two report kinds the console can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ReportType {
    Attendance,
    Employee,
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Attendance => f.write_str("Attendance"),
            ReportType::Employee => f.write_str("Employee"),
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Attendance" => Ok(ReportType::Attendance),
            "Employee" => Ok(ReportType::Employee),
            other => Err(format!("Unknown report type: {other}")),
        }
    }
}

/// A generated CSV artifact plus metadata. Immutable once created;
/// deletion also removes the backing file (best-effort).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: i64,
    pub report_type: ReportType,
    /// Path relative to the work dir, e.g. `/reports/Report_Attendance_...csv`
    pub file_path: String,
    pub created_at: NaiveDateTime,
    pub created_by: Option<i64>,
}

/// Report generation request
#[derive(Debug, Clone, Deserialize)]
pub struct ReportCreate {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
