use crate::errors::KconnectError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    #[error("Option '--{name}' is declared more than once")]
    Duplicate { name: String },

    #[error("Unknown option '--{name}'")]
    Unknown { name: String },

    #[error("Option '--{name}' was set explicitly and cannot be overwritten")]
    AlreadyExplicit { name: String },

    #[error("Option '--{name}' expects true or false, got '{value}'")]
    InvalidBool { name: String, value: String },
}

impl KconnectError for FlagError {
    fn error_code(&self) -> &'static str {
        match self {
            FlagError::Duplicate { .. } => "FLAG_DUPLICATE",
            FlagError::Unknown { .. } => "FLAG_UNKNOWN",
            FlagError::AlreadyExplicit { .. } => "FLAG_ALREADY_EXPLICIT",
            FlagError::InvalidBool { .. } => "FLAG_INVALID_BOOL",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, FlagError::InvalidBool { .. })
    }
}
