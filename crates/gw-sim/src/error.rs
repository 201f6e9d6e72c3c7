use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("session configuration error: {0}")]
    Config(String),

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
