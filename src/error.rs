use thiserror::Error;

pub type Result<T> = std::result::Result<T, GedtreeError>;

#[derive(Debug, Error)]
pub enum GedtreeError {
    /// Neither ancestor nor descendant generations were requested.
    #[error("at least one of --ancestors or --descendants must be greater than zero")]
    NoGenerations,

    #[error("individual `{0}` not found in the record graph")]
    UnknownIndividual(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GedtreeError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        GedtreeError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error stems from how the tool was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            GedtreeError::NoGenerations | GedtreeError::UnknownIndividual(_)
        )
    }
}
