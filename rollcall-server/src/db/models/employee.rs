//! Employee Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employee model matching the `employees` table
///
/// `face_embedding` is an opaque blob produced by the external
/// face-recognition service; it is never serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    /// 职位名称 (自由文本，与登录账号的 Role 枚举无关)
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    #[serde(skip_serializing)]
    pub face_embedding: Option<Vec<u8>>,
    pub is_locked: bool,
    pub created_at: NaiveDateTime,
}

/// Employee as returned to API clients — exposes whether a face
/// embedding exists without leaking the blob itself.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub has_face_embedding: bool,
    pub is_locked: bool,
    pub created_at: NaiveDateTime,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            department: e.department,
            role: e.role,
            phone: e.phone,
            email: e.email,
            photo_path: e.photo_path,
            has_face_embedding: e.face_embedding.is_some(),
            is_locked: e.is_locked,
            created_at: e.created_at,
        }
    }
}

/// Create/update form fields (multipart text parts; the face image
/// travels as a separate file part)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EmployeeForm {
    pub name: String,
    pub department: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Fields the repository writes on insert
#[derive(Debug, Clone)]
pub struct EmployeeCreate {
    pub name: String,
    pub department: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub face_embedding: Option<Vec<u8>>,
}

/// Fields the repository updates — `photo_path`/`face_embedding` are
/// only replaced when a new image was processed.
#[derive(Debug, Clone)]
pub struct EmployeeUpdate {
    pub name: String,
    pub department: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub face_embedding: Option<Vec<u8>>,
}
