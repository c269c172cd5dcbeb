use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("{0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("lecture not found: {0}")]
    NotFound(String),
    #[error("answer all questions before submitting ({answered}/{total} answered)")]
    IncompleteAnswers { answered: usize, total: usize },
    #[error("index {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
    #[error("question {question} has no option '{key}'")]
    UnknownOption { question: usize, key: String },
    #[error("invalid lecture record: {0}")]
    InvalidRecord(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StudyError>;

impl StudyError {
    /// Short label shown in front of the inline message.
    pub fn kind(&self) -> &'static str {
        match self {
            StudyError::Validation(_) => "Invalid input",
            StudyError::Network(_) => "Network error",
            StudyError::NotFound(_) => "Not found",
            StudyError::IncompleteAnswers { .. } => "Quiz incomplete",
            StudyError::OutOfRange { .. } => "Out of range",
            StudyError::UnknownOption { .. } => "Unknown option",
            StudyError::InvalidRecord(_) => "Bad data",
            StudyError::Io(_) => "File error",
        }
    }
}

impl From<reqwest::Error> for StudyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StudyError::InvalidRecord(e.to_string())
        } else {
            StudyError::Network(e.to_string())
        }
    }
}
