use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TsmError>;

/// Fatal errors. Anything tmux reports on its own is not one of these.
#[derive(Error, Debug)]
pub enum TsmError {
    #[error("Could not read config directory {}", path.display())]
    ConfigDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read config file {}", path.display())]
    ConfigFileUnreadable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Session '{0}' is not open")]
    SessionNotOpen(String),

    #[error("Failed to determine HOME directory")]
    HomeDirUnknown,
}

impl TsmError {
    pub fn config_file(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConfigFileUnreadable {
            path: path.into(),
            source: source.into(),
        }
    }
}
