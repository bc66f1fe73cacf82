use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown artist: {0}")]
    UnknownArtist(Uuid),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("corrupt store in {file}: {detail} (offset {offset})")]
    CorruptStore {
        file: &'static str,
        offset: u64,
        detail: &'static str,
    },

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Kinds that are fatal for the request and logged with context.
    /// Everything else is a well-formed negative answer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::CorruptStore { .. } | EngineError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
