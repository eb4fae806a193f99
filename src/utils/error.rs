use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpiralError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Cannot parse grid '{source_name}' at line {line}: {reason}")]
    GridParseError {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Config,
    Input,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SpiralError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SpiralError::IoError(_) => ErrorCategory::Io,
            SpiralError::ConfigError { .. }
            | SpiralError::ConfigValidationError { .. }
            | SpiralError::InvalidConfigValueError { .. }
            | SpiralError::MissingConfigError { .. } => ErrorCategory::Config,
            SpiralError::CsvError(_)
            | SpiralError::SerializationError(_)
            | SpiralError::GridParseError { .. } => ErrorCategory::Input,
            SpiralError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Config | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SpiralError::IoError(_) => {
                "Check that the input file exists and the output directory is writable".to_string()
            }
            SpiralError::CsvError(_) | SpiralError::GridParseError { .. } => {
                "Make sure every cell is an integer and rows are separated by newlines".to_string()
            }
            SpiralError::SerializationError(_) => {
                "Grids in JSON must be arrays of integer arrays, e.g. [[1,2],[3,4]]".to_string()
            }
            SpiralError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
            SpiralError::InvalidConfigValueError { field, .. }
            | SpiralError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            SpiralError::ConfigError { .. } => "Review the configuration file".to_string(),
            SpiralError::ProcessingError { .. } => {
                "Run again with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Could not read grid input: {}", self),
            ErrorCategory::Processing => format!("Flattening failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpiralError>;
