use thiserror::Error;

/// Errors surfaced by the decode pipeline.
///
/// Only a file-open failure or a bad magic number stops a decode early;
/// everything optional (a missing tag, an absent maker note) is a default
/// value, never an error. The dispatcher folds any of these into
/// `ImageMetadata::error`; callers never see a hard failure.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not open file")]
    FileOpen,

    #[error("unsupported extension: {0}")]
    FormatUnsupported(String),

    #[error("not a {0} file: bad magic number")]
    BadMagic(&'static str),

    #[error("read past end of file at offset {offset}")]
    Truncated { offset: u64 },
}

/// Errors from the application shell around the engine (configuration,
/// discovery, the worker pool). Decode failures never reach this type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("channel send error: {0}")]
    Send(#[from] crossbeam_channel::SendError<std::path::PathBuf>),

    #[error("worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl DecodeError {
    /// Message stored into `ImageMetadata::error` when a decode gives up.
    pub fn record_message(&self) -> String {
        match self {
            DecodeError::FileOpen => "could not open file".to_string(),
            other => other.to_string(),
        }
    }
}
