//! Database Models

// Auth
pub mod user;

// HR domain
pub mod attendance;
pub mod device;
pub mod employee;
pub mod shift;

// Reporting
pub mod report;

// Re-exports
pub use attendance::{
    AttendanceCreate, AttendanceRecord, AttendanceWithEmployee, CheckInRequest, CheckInResponse,
};
pub use device::{Device, DeviceCreate, DeviceUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeForm, EmployeeResponse, EmployeeUpdate};
pub use report::{Report, ReportCreate, ReportType};
pub use shift::{Shift, ShiftCreate, ShiftUpdate, ShiftWithEmployee};
pub use user::{Role, User, UserCreate, UserUpdate};
