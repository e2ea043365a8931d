use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    InvalidInput(String),
    InvalidData(String),
    /// The task file decoded, but its top level is not an array.
    InvalidFormat(String),
    /// The task file is not valid JSON.
    Parse(String),
    /// A single stored record failed field validation.
    Validation(String),
    Io(String),
    PermissionDenied(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn invalid_format<M: Into<String>>(message: M) -> Self {
        Self::InvalidFormat(message.into())
    }

    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse(message.into())
    }

    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::InvalidFormat(_) => "invalid_format",
            Self::Parse(_) => "parse_error",
            Self::Validation(_) => "validation_error",
            Self::Io(_) => "io_error",
            Self::PermissionDenied(_) => "permission_denied",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) => message,
            Self::InvalidData(message) => message,
            Self::InvalidFormat(message) => message,
            Self::Parse(message) => message,
            Self::Validation(message) => message,
            Self::Io(message) => message,
            Self::PermissionDenied(message) => message,
        }
    }

    /// Load errors that mean "the file content is unusable" rather than
    /// "the file could not be read".
    pub fn is_data_format(&self) -> bool {
        matches!(self, Self::InvalidFormat(_) | Self::Parse(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
