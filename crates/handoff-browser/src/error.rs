use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine home directory")]
    HomeNotFound,

    #[error("Failed to launch {path}: {reason}")]
    Launch { path: String, reason: String },

    #[error("Invalid search pattern: {0}")]
    Glob(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] handoff_core::Error),
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::Glob(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
