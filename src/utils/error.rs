use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActiniaError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("actinia responded with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed JSON response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Unexpected response shape: {message}")]
    UnexpectedResponse { message: String },

    #[error("{kind} '{name}' not found, fetch it from the server first")]
    NotFound { kind: &'static str, name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Response,
    Client,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status of the `actinia` binary.
    ///
    /// Low means a resource was not present locally, which still fails the command.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Low => 4,
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl ActiniaError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// HTTP status reported by the server, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::ApiError { .. } => ErrorCategory::Server,
            Self::DecodeError(_) | Self::UnexpectedResponse { .. } => ErrorCategory::Response,
            Self::NotFound { .. } | Self::IoError(_) => ErrorCategory::Client,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Low,
            Self::HttpError(_) => ErrorSeverity::Medium,
            Self::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::ApiError { .. }
            | Self::DecodeError(_)
            | Self::UnexpectedResponse { .. }
            | Self::IoError(_) => ErrorSeverity::High,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check that the actinia server is reachable and the base URL is correct",
            Self::ApiError { status: 401, .. } | Self::ApiError { status: 403, .. } => {
                "Check the actinia user name and password"
            }
            Self::ApiError { status: 404, .. } => {
                "Check that the location, mapset or layer exists on the server"
            }
            Self::ApiError { status, .. } if *status >= 500 => {
                "The actinia server failed, try again later or contact its administrator"
            }
            Self::ApiError { .. } => "Check the request parameters against the actinia API",
            Self::DecodeError(_) | Self::UnexpectedResponse { .. } => {
                "Check that the API version matches the server"
            }
            Self::NotFound { .. } => "List the parent resource before accessing its children",
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => "Fix the configuration file or command line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(_) => "Could not reach the actinia server".to_string(),
            Self::ApiError { status, message } => {
                format!("actinia rejected the request ({}): {}", status, message)
            }
            Self::DecodeError(_) | Self::UnexpectedResponse { .. } => {
                "actinia returned a response that could not be understood".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ActiniaError>;
