//! Device Model (考勤设备)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Check-in terminal registered with the server
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    /// Opaque token, regenerated on every create
    pub api_key: String,
    pub last_seen: Option<NaiveDateTime>,
}

/// Create device payload — api_key is generated server-side
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCreate {
    pub name: String,
    pub location: Option<String>,
}

/// Update device payload
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
}
