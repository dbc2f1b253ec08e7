use std::path::PathBuf;
use thiserror::Error;
use xmp_sidecar::SidecarError;

#[derive(Error, Debug)]
pub enum TweenError {
    #[error("{file}: {source}")]
    Sidecar {
        file: String,
        #[source]
        source: SidecarError,
    },

    #[error("{file}: missing {field}")]
    MissingCameraFact { file: String, field: &'static str },

    #[error("{file}: {field} must be positive, got {value}")]
    InvalidCameraFact {
        file: String,
        field: &'static str,
        value: f64,
    },

    #[error("averaging window around record {0} is empty")]
    EmptyWindow(usize),

    #[error("exposure smoothing window must be a finite, non-negative number of seconds, got {0}")]
    InvalidWindow(f64),

    #[error("override list must be SETTING VALUE pairs, got {0} items")]
    OddOverrideList(usize),

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid value {value:?} for {setting}")]
    InvalidOverrideValue { setting: String, value: String },

    #[error("destination {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TweenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TweenError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TweenError>;
