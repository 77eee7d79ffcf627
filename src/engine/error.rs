use crate::directory::CollaboratorError;

#[derive(Debug)]
pub enum EngineError {
    /// Empty identifier or one the directory does not know.
    InvalidArgument(String),
    /// The directory or inventory failed. Not retried.
    Collaborator(CollaboratorError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            EngineError::Collaborator(e) => write!(f, "collaborator failure: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Collaborator(e) => Some(e),
            EngineError::InvalidArgument(_) => None,
        }
    }
}

impl From<CollaboratorError> for EngineError {
    fn from(e: CollaboratorError) -> Self {
        EngineError::Collaborator(e)
    }
}
