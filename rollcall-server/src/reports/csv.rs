//! CSV 渲染
//!
//! Report artifacts are plain CSV with a decorative banner/footer, the
//! format the legacy console exported. Encoding goes through a real CSV
//! writer so quoting and embedded newlines are handled uniformly; the
//! Excel text guards (leading `'` on dates, leading tab on phone
//! numbers) are applied to the field *content* before encoding.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::db::models::{AttendanceWithEmployee, Employee};
use crate::utils::{AppError, AppResult};

/// UTF-8 byte-order marker. Spreadsheet tools use it to detect the
/// encoding; names and statuses may contain non-ASCII text.
pub const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Department bucket for employees without one
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

const BANNER: &str = "==========================================================";

fn push_line(buf: &mut Vec<u8>, line: &str) {
    buf.extend_from_slice(line.as_bytes());
    buf.push(b'\n');
}

/// Encode one CSV table into `buf`. Fields containing delimiters or
/// quotes come out quoted with internal quotes doubled.
fn write_table(buf: &mut Vec<u8>, rows: &[Vec<String>]) -> AppResult<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::internal(format!("CSV encoding failed: {e}")))?;
    }
    let encoded = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
    buf.extend_from_slice(&encoded);
    Ok(())
}

/// Guard a date/time cell so spreadsheet tools keep it textual instead
/// of auto-converting it into a numeric date.
fn text_guard(value: String) -> String {
    format!("'{value}")
}

/// Render the attendance report: one row per record, ascending by
/// timestamp, wrapped in the banner/footer layout.
pub fn render_attendance_csv(
    rows: &[AttendanceWithEmployee],
    start_label: Option<&str>,
    end_label: Option<&str>,
    generated_at: NaiveDateTime,
) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.extend_from_slice(UTF8_BOM);

    push_line(&mut buf, BANNER);
    push_line(&mut buf, "           EMPLOYEE ATTENDANCE REPORT");
    push_line(
        &mut buf,
        &format!(
            "           From: {} - To: {}",
            start_label.unwrap_or("All"),
            end_label.unwrap_or("All")
        ),
    );
    push_line(
        &mut buf,
        &format!(
            "           Generated: {}",
            generated_at.format("%d/%m/%Y %H:%M:%S")
        ),
    );
    push_line(&mut buf, BANNER);
    push_line(&mut buf, "");

    let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    table.push(
        ["ID", "Employee name", "Date", "Time", "Status"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    for row in rows {
        let (date, time) = match row.timestamp_in {
            Some(ts) => (
                text_guard(ts.format("%d/%m/%Y").to_string()),
                text_guard(ts.format("%H:%M:%S").to_string()),
            ),
            None => (String::new(), String::new()),
        };
        table.push(vec![
            row.id.to_string(),
            row.employee_name.clone(),
            date,
            time,
            row.status.clone().unwrap_or_else(|| "present".to_string()),
        ]);
    }
    write_table(&mut buf, &table)?;

    push_line(&mut buf, "");
    push_line(&mut buf, BANNER);
    push_line(&mut buf, &format!("           Total records: {}", rows.len()));
    push_line(&mut buf, BANNER);

    Ok(buf)
}

/// Per-department headcount, largest first, ties by label
fn department_footer(employees: &[Employee]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for employee in employees {
        let dept = employee
            .department
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(UNASSIGNED_DEPARTMENT);
        *counts.entry(dept.to_string()).or_insert(0) += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Render the employee directory report. Callers pass employees already
/// sorted by department then name.
pub fn render_employee_csv(
    employees: &[Employee],
    generated_at: NaiveDateTime,
) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.extend_from_slice(UTF8_BOM);

    push_line(&mut buf, BANNER);
    push_line(&mut buf, "           COMPANY EMPLOYEE DIRECTORY");
    push_line(
        &mut buf,
        &format!("           Total employees: {}", employees.len()),
    );
    push_line(
        &mut buf,
        &format!(
            "           Generated: {}",
            generated_at.format("%d/%m/%Y %H:%M:%S")
        ),
    );
    push_line(&mut buf, BANNER);
    push_line(&mut buf, "");

    let mut table: Vec<Vec<String>> = Vec::with_capacity(employees.len() + 1);
    table.push(
        ["ID", "Name", "Department", "Role", "Phone", "Email"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    for employee in employees {
        // Leading tab keeps leading zeros / plus signs textual in Excel
        let phone = match employee.phone.as_deref() {
            Some(p) if !p.is_empty() => format!("\t{p}"),
            _ => String::new(),
        };
        table.push(vec![
            employee.id.to_string(),
            employee.name.clone(),
            employee.department.clone().unwrap_or_default(),
            employee.role.clone().unwrap_or_default(),
            phone,
            employee.email.clone().unwrap_or_default(),
        ]);
    }
    write_table(&mut buf, &table)?;

    push_line(&mut buf, "");
    push_line(&mut buf, BANNER);
    push_line(&mut buf, "           DEPARTMENT HEADCOUNT");
    push_line(&mut buf, BANNER);
    for (dept, count) in department_footer(employees) {
        push_line(&mut buf, &format!("           {dept}: {count}"));
    }
    push_line(&mut buf, BANNER);

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn attendance_row(id: i64, name: &str, when: &str, status: &str) -> AttendanceWithEmployee {
        AttendanceWithEmployee {
            id,
            employee_id: id,
            employee_name: name.to_string(),
            timestamp_in: Some(ts(when)),
            status: Some(status.to_string()),
            photo_path: None,
            device_id: None,
        }
    }

    fn employee(id: i64, name: &str, dept: Option<&str>, phone: Option<&str>) -> Employee {
        Employee {
            id,
            name: name.to_string(),
            department: dept.map(String::from),
            role: Some("Staff".to_string()),
            phone: phone.map(String::from),
            email: None,
            photo_path: None,
            face_embedding: None,
            is_locked: false,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn attendance_csv_has_bom_and_decodes_as_utf8() {
        let rows = vec![attendance_row(
            1,
            "Nguyễn \"Văn\" A, Trần",
            "2026-08-07 08:00:00",
            "present",
        )];
        let bytes =
            render_attendance_csv(&rows, None, None, ts("2026-08-07 09:00:00")).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        // Comma + quote in the name: field is quoted, inner quotes doubled
        assert!(text.contains(r#""Nguyễn ""Văn"" A, Trần""#));
        // Date/time cells carry the text guard
        assert!(text.contains("'07/08/2026"));
        assert!(text.contains("'08:00:00"));
    }

    #[test]
    fn attendance_csv_on_empty_input() {
        let bytes = render_attendance_csv(&[], Some("01/08/2026"), None, ts("2026-08-07 09:00:00"))
            .unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("From: 01/08/2026 - To: All"));
        assert!(text.contains("Total records: 0"));
        assert!(text.contains("ID,Employee name,Date,Time,Status"));
    }

    #[test]
    fn employee_csv_phone_guard_and_footer() {
        let employees = vec![
            employee(1, "Alice", Some("Engineering"), Some("+84901234567")),
            employee(2, "Bob", Some("Engineering"), Some("0123")),
            employee(3, "Chloé", None, None),
        ];
        let bytes = render_employee_csv(&employees, ts("2026-08-07 09:00:00")).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("\t+84901234567"));
        assert!(text.contains("\t0123"));
        // Footer: largest department first, missing departments bucketed
        let engineering = text.find("Engineering: 2").unwrap();
        let unassigned = text.find(&format!("{UNASSIGNED_DEPARTMENT}: 1")).unwrap();
        assert!(engineering < unassigned);
    }

    #[test]
    fn department_footer_orders_by_count_desc() {
        let employees = vec![
            employee(1, "A", Some("Sales"), None),
            employee(2, "B", Some("HR"), None),
            employee(3, "C", Some("HR"), None),
            employee(4, "D", Some(""), None),
        ];
        let footer = department_footer(&employees);
        assert_eq!(footer[0], ("HR".to_string(), 2));
        // Blank department counts as unassigned
        assert!(
            footer
                .iter()
                .any(|(d, c)| d == UNASSIGNED_DEPARTMENT && *c == 1)
        );
    }
}
