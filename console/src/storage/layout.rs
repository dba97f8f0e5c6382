//! Console home directory layout

use std::path::PathBuf;

use crate::filesys::file::File;

/// Environment variable overriding the console home directory
pub const HOME_ENV: &str = "AJIME_CONSOLE_HOME";

/// Where the console keeps its files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }
}

impl Default for StorageLayout {
    /// `$AJIME_CONSOLE_HOME`, else `$HOME/.ajime/console`
    fn default() -> Self {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Self::new(home);
        }

        let base_dir = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ajime")
            .join("console");

        Self::new(base_dir)
    }
}
