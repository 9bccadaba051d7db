use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("JSON parse error on line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    #[error("Field lookup failed for '{field}' at path '{path}': {reason}")]
    FieldLookupError {
        field: String,
        path: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Extraction,
    Output,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn field_lookup(field: &str, path: &str, reason: impl Into<String>) -> Self {
        EtlError::FieldLookupError {
            field: field.to_string(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ParseError { .. } => ErrorCategory::Input,
            EtlError::FieldLookupError { .. } => ErrorCategory::Extraction,
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorCategory::Output,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration
            | ErrorCategory::Input
            | ErrorCategory::Extraction
            | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Output => match self {
                // 磁碟或權限問題，通常不是資料本身的錯
                EtlError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ParseError { line, .. } => format!(
                "Check line {} of the input file; every line must be one complete JSON object",
                line
            ),
            EtlError::FieldLookupError { path, .. } => format!(
                "Every input record must contain '{}'; filter or repair records upstream",
                path
            ),
            EtlError::CsvError(_) => "Check that the output location is writable".to_string(),
            EtlError::IoError(_) => {
                "Verify the file paths exist and the process has read/write permission".to_string()
            }
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command-line flags".to_string()
            }
            EtlError::ProcessingError { .. } => {
                "Check the input file is UTF-8 encoded line-delimited JSON".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ParseError { line, .. } => {
                format!("Input line {} is not a valid JSON object", line)
            }
            EtlError::FieldLookupError { field, path, .. } => {
                format!("A record is missing the '{}' field ({})", field, path)
            }
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
