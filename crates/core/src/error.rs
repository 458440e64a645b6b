/// Errors raised while loading ratings or building a recommendation.
///
/// An undefined correlation is not an error; it is filtered out of rankings.
#[derive(thiserror::Error, Debug)]
pub enum RecError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Unknown course: '{0}'")]
    UnknownCourse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, RecError>;
