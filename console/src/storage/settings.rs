//! Settings file management

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ConsoleError;
use crate::logs::LogLevel;
use crate::query::model::{ConditionKind, SelectableKinds};
use crate::storage::layout::StorageLayout;

/// Environment variable holding the backend API token
pub const TOKEN_ENV: &str = "AJIME_CONSOLE_TOKEN";

/// Console settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Write logs as JSON
    #[serde(default)]
    pub json_logs: bool,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Device list configuration
    #[serde(default)]
    pub devices: DevicesSettings,

    /// Scheduling rule configuration
    #[serde(default)]
    pub scheduling: SchedulingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            json_logs: false,
            backend: BackendSettings::default(),
            devices: DevicesSettings::default(),
            scheduling: SchedulingSettings::default(),
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Device list settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesSettings {
    /// Devices shown per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    25
}

impl Default for DevicesSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Scheduling rule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSettings {
    /// Condition kinds a scheduling rule may contain, by wire name
    #[serde(default = "default_scheduling_kinds")]
    pub allowed_kinds: Vec<String>,
}

fn default_scheduling_kinds() -> Vec<String> {
    vec![ConditionKind::LabelValue.name().to_string()]
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            allowed_kinds: default_scheduling_kinds(),
        }
    }
}

impl SchedulingSettings {
    /// Kinds offered by the scheduling rule editor
    pub fn selectable_kinds(&self) -> Result<SelectableKinds, ConsoleError> {
        SelectableKinds::from_names(&self.allowed_kinds)
    }
}

/// Load settings from the layout, falling back to defaults when absent
pub async fn load_settings(layout: &StorageLayout) -> Result<Settings, ConsoleError> {
    let file = layout.settings_file();
    if !file.exists().await {
        info!(
            "No settings file at {}, using defaults",
            file.path().display()
        );
        return Ok(Settings::default());
    }
    file.read_json().await
}

/// API token from the environment, if set
pub fn api_token_from_env() -> Option<SecretString> {
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.is_empty())
        .map(SecretString::from)
}
