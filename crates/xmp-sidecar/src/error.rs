use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("no <rdf:Description> block found")]
    MissingDescription,

    #[error("<rdf:Description> block is never closed")]
    UnterminatedDescription,

    #[error("missing {category}:{key}")]
    MissingField { category: &'static str, key: &'static str },

    #[error("unparseable capture timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SidecarError>;
