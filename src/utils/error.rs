use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid team configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Duplicate participant id: {id}")]
    DuplicateParticipant { id: Uuid },

    #[error("Participant not found: {id}")]
    ParticipantNotFound { id: Uuid },

    #[error("Roster store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Roster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TeamError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        TeamError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        TeamError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        TeamError::StoreError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TeamError::IoError(_) => ErrorCategory::Io,
            TeamError::SerializationError(_) | TeamError::CsvError(_) => ErrorCategory::Data,
            TeamError::TomlError(_)
            | TeamError::ConfigError { .. }
            | TeamError::ValidationError { .. }
            | TeamError::InvalidConfig { .. } => ErrorCategory::Configuration,
            TeamError::DuplicateParticipant { .. }
            | TeamError::ParticipantNotFound { .. }
            | TeamError::StoreError { .. } => ErrorCategory::Roster,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TeamError::ParticipantNotFound { .. }
            | TeamError::StoreError { .. }
            | TeamError::IoError(_) => ErrorSeverity::Medium,
            TeamError::SerializationError(_) | TeamError::CsvError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 依錯誤嚴重程度決定的行程退出碼，一律非零
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TeamError::IoError(e) => format!("Could not read or write a file: {}", e),
            TeamError::SerializationError(_) => "The roster file is not valid JSON".to_string(),
            TeamError::CsvError(e) => format!("The CSV file could not be processed: {}", e),
            TeamError::TomlError(_) | TeamError::ConfigError { .. } => {
                "The configuration file could not be loaded".to_string()
            }
            TeamError::ValidationError { field, reason, .. } => {
                format!("'{}' is invalid: {}", field, reason)
            }
            TeamError::InvalidConfig { reason } => format!("Cannot build teams: {}", reason),
            TeamError::DuplicateParticipant { id } => {
                format!("Participant {} appears more than once", id)
            }
            TeamError::ParticipantNotFound { id } => format!("No participant with id {}", id),
            TeamError::StoreError { message } => {
                format!("Saving the roster failed, nothing was changed: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the roster path exists and is writable",
            ErrorCategory::Data => "Fix or remove the malformed file and try again",
            ErrorCategory::Configuration => {
                "Use between 2 and 8 teams, and no more teams than participants"
            }
            ErrorCategory::Roster => "Run `team-maker list` to see the current roster",
        }
    }
}

pub type Result<T> = std::result::Result<T, TeamError>;
