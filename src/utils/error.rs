use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZaloError {
    #[error("Cannot decode image '{file}': {source}")]
    DecodeError {
        file: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Drawing surface unavailable: {message}")]
    SurfaceError { message: String },

    #[error("Clipboard write failed: {message}")]
    ClipboardError { message: String },

    #[error("QR encoding failed: {0}")]
    QrError(#[from] qrcode::types::QrError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Rendering,
    Host,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ZaloError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ZaloError::DecodeError { .. }
            | ZaloError::ValidationError { .. }
            | ZaloError::SerializationError(_) => ErrorCategory::Input,
            ZaloError::SurfaceError { .. }
            | ZaloError::QrError(_)
            | ZaloError::ProcessingError { .. } => ErrorCategory::Rendering,
            ZaloError::ClipboardError { .. } => ErrorCategory::Host,
            ZaloError::ZipError(_) | ZaloError::IoError(_) => ErrorCategory::Io,
            ZaloError::ConfigError { .. }
            | ZaloError::ConfigValidationError { .. }
            | ZaloError::InvalidConfigValueError { .. }
            | ZaloError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度，CLI 以此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 剪貼簿失敗只是少了「已複製」提示
            ZaloError::ClipboardError { .. } => ErrorSeverity::Low,
            ZaloError::DecodeError { .. } | ZaloError::SurfaceError { .. } => {
                ErrorSeverity::Medium
            }
            ZaloError::QrError(_)
            | ZaloError::ValidationError { .. }
            | ZaloError::ProcessingError { .. }
            | ZaloError::SerializationError(_) => ErrorSeverity::High,
            ZaloError::ZipError(_)
            | ZaloError::IoError(_)
            | ZaloError::ConfigError { .. }
            | ZaloError::ConfigValidationError { .. }
            | ZaloError::InvalidConfigValueError { .. }
            | ZaloError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ZaloError::DecodeError { file, .. } => format!(
                "Check that '{}' is a PNG, JPG, GIF or WebP image and is not truncated",
                file
            ),
            ZaloError::SurfaceError { .. } => {
                "Make sure the source image has a non-zero width and height".to_string()
            }
            ZaloError::ClipboardError { .. } => {
                "Copy the printed link manually; no clipboard is available in this session"
                    .to_string()
            }
            ZaloError::QrError(_) => {
                "Shorten the prefilled message so the link fits in a QR code".to_string()
            }
            ZaloError::ZipError(_) | ZaloError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            ZaloError::SerializationError(_) => {
                "Variables file must be a JSON array of {\"name\", \"value\"} objects".to_string()
            }
            ZaloError::ConfigError { .. } | ZaloError::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax".to_string()
            }
            ZaloError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the config file or CLI flags", field)
            }
            ZaloError::MissingConfigError { field } => {
                format!("Provide '{}' via CLI flag or config file", field)
            }
            ZaloError::ValidationError { .. } | ZaloError::ProcessingError { .. } => {
                "Re-run with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ZaloError::DecodeError { file, .. } => format!("Could not read image '{}'", file),
            ZaloError::SurfaceError { .. } => "Could not draw the sticker".to_string(),
            ZaloError::ClipboardError { .. } => "Could not copy to clipboard".to_string(),
            ZaloError::QrError(_) => "Link is too long for a QR code".to_string(),
            ZaloError::ZipError(_) => "Could not build the sticker archive".to_string(),
            ZaloError::IoError(e) => format!("File operation failed: {}", e),
            ZaloError::MissingConfigError { field } => format!("Missing '{}'", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZaloError>;
