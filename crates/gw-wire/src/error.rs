use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("empty frame")]
    EmptyFrame,

    #[error("frame version {got} (this build speaks {want})")]
    VersionMismatch { got: u8, want: u8 },

    #[error("frame payload rejected: {0}")]
    Codec(#[from] bincode::Error),
}

pub type WireResult<T> = Result<T, WireError>;
