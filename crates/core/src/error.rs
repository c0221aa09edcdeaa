use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StandbyError {
    #[error("invalid root directory: {0}")]
    InvalidRootDirectory(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("naming error: {0}")]
    Naming(#[from] standby_naming::NamingError),
    #[error("I/O error on {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to delete directory {path}: {source}", path = path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StandbyError {
    /// Wraps an I/O error with the path it occurred on.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type StandbyResult<T> = std::result::Result<T, StandbyError>;
