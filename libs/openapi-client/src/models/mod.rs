//! API models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device connectivity status as reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
        }
    }
}

/// Device as listed by `GET /devices`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub status: DeviceStatus,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// One page of the device list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicePage {
    pub devices: Vec<DeviceInfo>,
    pub page: u32,
    pub total: u64,
}

/// Application with its scheduling rule.
///
/// The rule is kept as raw JSON: it originates outside the console and is
/// validated before it reaches any editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(rename = "schedulingRule", default)]
    pub scheduling_rule: serde_json::Value,
}

/// Body of `PUT /applications/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationRequest {
    #[serde(rename = "schedulingRule")]
    pub scheduling_rule: serde_json::Value,
}
