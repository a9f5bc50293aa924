use thiserror::Error;

/// Errors raised while setting up a training run.
///
/// Nothing in the learning loop itself returns an error: every operation
/// works on indices that were validated here, before the first episode.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("usage: {program} <num_of_iterations>")]
    Usage { program: String },

    #[error("invalid argument '{value}'")]
    Parse { value: String },

    #[error("number out of range '{value}'")]
    Range { value: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
