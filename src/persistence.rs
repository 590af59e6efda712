use std::fs;
use std::path::PathBuf;

use dirs::home_dir;
use tracing::debug;

use crate::error::{Result, TsmError};
use crate::tmux::session::SessionConfig;
use crate::util::validate_session_name;

const CONFIG_DIR: &str = ".tsm";
const CONFIG_EXTENSION: &str = "yml";

/// Session configs stored as `<dir>/<session>.yml`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store at `~/.tsm`.
    pub fn from_home() -> Result<Self> {
        Ok(Self::new(config_dir_path()?))
    }

    pub fn config_file_path(&self, session_name: &str) -> PathBuf {
        self.dir.join(format!("{session_name}.{CONFIG_EXTENSION}"))
    }

    pub fn config_exists(&self, session_name: &str) -> bool {
        self.config_file_path(session_name).exists()
    }

    /// Session names of all configs, in directory enumeration order. Files
    /// whose stem is not a valid session name are skipped.
    pub fn list_configs(&self) -> Result<Vec<String>> {
        let unreadable = |source| TsmError::ConfigDirUnreadable {
            path: self.dir.clone(),
            source,
        };

        let entries = fs::read_dir(&self.dir).map_err(unreadable)?;
        let mut result = Vec::with_capacity(entries.size_hint().0);

        for entry in entries {
            let path = entry.map_err(unreadable)?.path();

            if path.extension().is_none_or(|ext| ext != CONFIG_EXTENSION) {
                debug!(path = %path.display(), "skipping non-config entry");
                continue;
            }

            let Some(name) = path.file_stem().and_then(|stem| stem.to_str())
            else {
                debug!(path = %path.display(), "skipping non UTF-8 name");
                continue;
            };

            // a stem the CLI would refuse cannot be opened, so don't list it
            match validate_session_name(name) {
                Ok(name) => result.push(name),
                Err(e) => {
                    debug!(
                        path = %path.display(),
                        error = %e,
                        "skipping config"
                    );
                }
            }
        }

        Ok(result)
    }

    /// Raw text of a session's config file.
    pub fn read_raw(&self, session_name: &str) -> Result<String> {
        let path = self.config_file_path(session_name);
        fs::read_to_string(&path).map_err(|e| TsmError::config_file(path, e))
    }

    pub fn load_config(&self, session_name: &str) -> Result<SessionConfig> {
        let data = self.read_raw(session_name)?;
        SessionConfig::from_yaml(&data).map_err(|e| {
            TsmError::config_file(self.config_file_path(session_name), e)
        })
    }
}

pub fn config_dir_path() -> Result<PathBuf> {
    let home = home_dir().ok_or(TsmError::HomeDirUnknown)?;
    Ok(home.join(CONFIG_DIR))
}
