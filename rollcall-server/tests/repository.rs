//! Repository-level tests on a throwaway SQLite database

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tempfile::TempDir;

use rollcall_server::db::DbService;
use rollcall_server::db::models::{
    AttendanceCreate, DeviceCreate, EmployeeCreate, Role, ShiftCreate, UserCreate,
};
use rollcall_server::db::repository::{
    AttendanceRepository, DeviceRepository, EmployeeRepository, ReportRepository, RepoError,
    ShiftRepository, UserRepository,
};

async fn setup() -> (DbService, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("test.db");
    let service = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("database init");
    (service, dir)
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn employee(name: &str, phone: Option<&str>) -> EmployeeCreate {
    EmployeeCreate {
        name: name.to_string(),
        department: Some("Engineering".to_string()),
        role: Some("Staff".to_string()),
        phone: phone.map(String::from),
        email: None,
        photo_path: None,
        face_embedding: None,
    }
}

#[tokio::test]
async fn admin_account_is_seeded_on_first_run() {
    let (db, _dir) = setup().await;
    let users = UserRepository::new(db.pool.clone());

    let admin = users.find_by_username("admin").await.unwrap();
    let admin = admin.expect("seeded admin");
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn employee_crud_and_lock_flow() {
    let (db, _dir) = setup().await;
    let employees = EmployeeRepository::new(db.pool.clone());

    let created = employees
        .create(employee("Nguyễn Văn A", Some("0901234567")))
        .await
        .unwrap();
    assert!(!created.is_locked);

    let locked = employees.set_locked(created.id, true).await.unwrap();
    assert!(locked.is_locked);

    let found = employees.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Nguyễn Văn A");
    assert!(found.is_locked);

    assert!(employees.delete(created.id).await.unwrap());
    assert!(employees.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (db, _dir) = setup().await;
    let users = UserRepository::new(db.pool.clone());

    users
        .create(UserCreate {
            username: "0901234567".to_string(),
            password: "pw".to_string(),
            role: Role::Employee,
            employee_id: None,
        })
        .await
        .unwrap();

    let err = users
        .create(UserCreate {
            username: "0901234567".to_string(),
            password: "pw2".to_string(),
            role: Role::Manager,
            employee_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn companion_account_is_removed_with_employee() {
    let (db, _dir) = setup().await;
    let employees = EmployeeRepository::new(db.pool.clone());
    let users = UserRepository::new(db.pool.clone());

    let emp = employees.create(employee("Bob", Some("0777"))).await.unwrap();
    users
        .create(UserCreate {
            username: "0777".to_string(),
            password: "123456".to_string(),
            role: Role::Employee,
            employee_id: Some(emp.id),
        })
        .await
        .unwrap();

    assert!(users.delete_by_employee(emp.id).await.unwrap());
    assert!(users.find_by_username("0777").await.unwrap().is_none());
}

#[tokio::test]
async fn attendance_day_lookup_and_range() {
    let (db, _dir) = setup().await;
    let employees = EmployeeRepository::new(db.pool.clone());
    let attendance = AttendanceRepository::new(db.pool.clone());

    let emp = employees.create(employee("Carol", None)).await.unwrap();

    for (when, status) in [
        ("2026-08-05 07:58:00", "present"),
        ("2026-08-06 08:30:00", "late"),
        ("2026-08-07 08:00:00", "present"),
    ] {
        attendance
            .create(AttendanceCreate {
                employee_id: emp.id,
                timestamp_in: Some(ts(when)),
                status: Some(status.to_string()),
                photo_path: None,
                device_id: None,
            })
            .await
            .unwrap();
    }

    // One-per-day lookup
    let day = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
    let found = attendance.find_for_employee_on(emp.id, day).await.unwrap();
    assert_eq!(found.unwrap().status.as_deref(), Some("late"));

    let missing_day = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
    assert!(
        attendance
            .find_for_employee_on(emp.id, missing_day)
            .await
            .unwrap()
            .is_none()
    );

    // Range query is ascending and respects both bounds
    let rows = attendance
        .find_range_with_employee(
            Some(ts("2026-08-06 00:00:00")),
            Some(ts("2026-08-08 00:00:00")),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].timestamp_in < rows[1].timestamp_in);
    assert_eq!(rows[0].employee_name, "Carol");

    // Unbounded range returns everything
    let all = attendance.find_range_with_employee(None, None).await.unwrap();
    assert_eq!(all.len(), 3);

    // Per-day counts
    let counts = attendance.counts_by_day(None, None).await.unwrap();
    assert_eq!(counts.len(), 3);
    assert!(counts.iter().all(|c| c.count == 1));
}

#[tokio::test]
async fn null_check_in_excluded_from_time_queries() {
    let (db, _dir) = setup().await;
    let employees = EmployeeRepository::new(db.pool.clone());
    let attendance = AttendanceRepository::new(db.pool.clone());

    let emp = employees.create(employee("Dave", None)).await.unwrap();
    attendance
        .create(AttendanceCreate {
            employee_id: emp.id,
            timestamp_in: None,
            status: Some("present".to_string()),
            photo_path: None,
            device_id: None,
        })
        .await
        .unwrap();

    assert!(
        attendance
            .find_range_with_employee(None, None)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(attendance.counts_by_day(None, None).await.unwrap().is_empty());
    // Still counted as a raw row
    assert_eq!(attendance.count().await.unwrap(), 1);
}

#[tokio::test]
async fn shift_lookup_for_day() {
    let (db, _dir) = setup().await;
    let employees = EmployeeRepository::new(db.pool.clone());
    let shifts = ShiftRepository::new(db.pool.clone());

    let emp = employees.create(employee("Eve", None)).await.unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    shifts
        .create(ShiftCreate {
            employee_id: emp.id,
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            is_overtime: false,
            note: None,
        })
        .await
        .unwrap();

    let shift = shifts
        .find_for_employee_on(emp.id, date)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shift.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());

    let other_day = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
    assert!(
        shifts
            .find_for_employee_on(emp.id, other_day)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn device_create_and_touch() {
    let (db, _dir) = setup().await;
    let devices = DeviceRepository::new(db.pool.clone());

    let created = devices
        .create(
            DeviceCreate {
                name: "Front gate".to_string(),
                location: Some("Lobby".to_string()),
            },
            "key-1",
            ts("2026-08-07 08:00:00"),
        )
        .await
        .unwrap();
    assert_eq!(created.api_key, "key-1");

    devices
        .touch_last_seen(created.id, ts("2026-08-07 09:00:00"))
        .await
        .unwrap();
    let device = devices.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(device.last_seen, Some(ts("2026-08-07 09:00:00")));
}

#[tokio::test]
async fn department_counts_order() {
    let (db, _dir) = setup().await;
    let employees = EmployeeRepository::new(db.pool.clone());

    for (name, dept) in [
        ("A", Some("HR")),
        ("B", Some("HR")),
        ("C", Some("Sales")),
        ("D", None),
    ] {
        employees
            .create(EmployeeCreate {
                name: name.to_string(),
                department: dept.map(String::from),
                role: None,
                phone: None,
                email: None,
                photo_path: None,
                face_embedding: None,
            })
            .await
            .unwrap();
    }

    let counts = employees.department_counts().await.unwrap();
    assert_eq!(counts[0].department.as_deref(), Some("HR"));
    assert_eq!(counts[0].count, 2);
    assert!(counts.iter().any(|c| c.department.is_none() && c.count == 1));
}

#[tokio::test]
async fn report_row_lifecycle() {
    let (db, _dir) = setup().await;
    let reports = ReportRepository::new(db.pool.clone());

    let report = reports
        .create(
            rollcall_server::db::models::ReportType::Attendance,
            "/reports/Report_Attendance_20260807120000.csv",
            ts("2026-08-07 12:00:00"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(reports.count().await.unwrap(), 1);
    assert!(reports.delete(report.id).await.unwrap());
    assert_eq!(reports.count().await.unwrap(), 0);
    // Deleting again reports false, not an error
    assert!(!reports.delete(report.id).await.unwrap());
}
