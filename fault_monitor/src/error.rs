use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("could not spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("invalid monitor parameters: {0}")]
    InvalidParameters(String),
    #[error("could not report fault verdict: {0}")]
    Report(#[from] io::Error),
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}
