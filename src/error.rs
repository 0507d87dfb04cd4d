//! # Error Handling
//!
//! Errors raised by the capture-inference-render pipeline and its collaborators.
//!
//! ## Error Classes
//!
//! - **Initialization**: the magnifier or the rendering surface cannot be created.
//!   Construction fails and nothing is retried.
//! - **Frame**: a capture buffer or a resample request is malformed.
//! - **Inference**: the style model failed during a paint. These propagate out of
//!   the paint path; the process boundary decides what to do with them.
//! - **Config / Validation / Io**: settings and configuration handling.
//!
//! Leaving the startup monitor is *not* an error. It is a pipeline state with its
//! own on-screen message (see [`crate::pipeline`]).
//!
//! ## Usage
//!
//! ```rust
//! use stylish::error::{ErrorSeverity, HasSeverity, StylishError};
//!
//! let error = StylishError::inference("color-stats", "output tensor has the wrong size")
//!     .with_context("stylizing a 640x480 capture")
//!     .with_recovery_suggestion("Check that the model preserves input dimensions");
//!
//! assert_eq!(error.category(), "inference");
//! assert_eq!(error.severity(), ErrorSeverity::Critical);
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt, time::SystemTime};

use stylish_scale::ScaleError;

/// Result alias used across the crate.
pub type StylishResult<T> = Result<T, StylishError>;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Debug,
    Info,
    Warning,
    Error,
    /// The current frame is lost
    Critical,
    /// The pipeline cannot continue
    Fatal,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(severity: ErrorSeverity) -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity,
            metadata: HashMap::new(),
        }
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(ErrorSeverity::Error)
    }
}

/// Base error type for the pipeline
#[derive(Debug)]
pub enum StylishError {
    /// Configuration errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// Capture subsystem or rendering surface could not be created
    CaptureInit {
        component: String,
        reason: String,
        context: ErrorContext,
    },
    /// A capture buffer did not match its header
    FrameCapture {
        reason: String,
        context: ErrorContext,
    },
    /// Resampling failures
    Resample {
        source: ScaleError,
        context: ErrorContext,
    },
    /// The style model failed
    Inference {
        model: String,
        reason: String,
        context: ErrorContext,
    },
    /// Style image loading and lookup
    Style {
        path: Option<String>,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Validation errors
    Validation {
        field: String,
        constraint: String,
        value: String,
        context: ErrorContext,
    },
    /// External library errors
    External {
        library: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
}

impl StylishError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(ErrorSeverity::Error),
        }
    }

    /// Create a capture initialization error
    pub fn capture_init(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CaptureInit {
            component: component.into(),
            reason: reason.into(),
            context: ErrorContext::new(ErrorSeverity::Fatal),
        }
    }

    /// Create a frame capture error
    pub fn frame_capture(reason: impl Into<String>) -> Self {
        Self::FrameCapture {
            reason: reason.into(),
            context: ErrorContext::new(ErrorSeverity::Error),
        }
    }

    /// Create an inference error
    pub fn inference(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Inference {
            model: model.into(),
            reason: reason.into(),
            context: ErrorContext::new(ErrorSeverity::Critical),
        }
    }

    /// Create a style image error
    pub fn style(path: Option<String>, reason: impl Into<String>) -> Self {
        Self::Style {
            path,
            reason: reason.into(),
            context: ErrorContext::new(ErrorSeverity::Warning),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(ErrorSeverity::Error),
        }
    }

    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
            context: ErrorContext::new(ErrorSeverity::Error),
        }
    }

    /// Create an external library error
    pub fn external(
        library: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            library: library.into(),
            source: Box::new(source),
            context: ErrorContext::new(ErrorSeverity::Error),
        }
    }

    /// Attach a file path to I/O and style errors; other variants ignore it.
    pub fn with_path(mut self, p: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { path, .. } | Self::Style { path, .. } => *path = Some(p.into()),
            _ => {}
        }
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::CaptureInit { context, .. } => context,
            Self::FrameCapture { context, .. } => context,
            Self::Resample { context, .. } => context,
            Self::Inference { context, .. } => context,
            Self::Style { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Validation { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::CaptureInit { context, .. } => context,
            Self::FrameCapture { context, .. } => context,
            Self::Resample { context, .. } => context,
            Self::Inference { context, .. } => context,
            Self::Style { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Validation { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::CaptureInit { .. } => "capture_init",
            Self::FrameCapture { .. } => "frame_capture",
            Self::Resample { .. } => "resample",
            Self::Inference { .. } => "inference",
            Self::Style { .. } => "style",
            Self::Io { .. } => "io",
            Self::Validation { .. } => "validation",
            Self::External { .. } => "external",
        }
    }
}

impl fmt::Display for StylishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StylishError::Config {
                field,
                value,
                reason,
                ..
            } => write!(
                f,
                "Configuration error in '{}': {} (value: {})",
                field, reason, value
            ),
            StylishError::CaptureInit {
                component, reason, ..
            } => write!(f, "Failed to initialize {}: {}", component, reason),
            StylishError::FrameCapture { reason, .. } => {
                write!(f, "Frame capture failed: {}", reason)
            }
            StylishError::Resample { source, .. } => write!(f, "Resampling failed: {}", source),
            StylishError::Inference { model, reason, .. } => {
                write!(f, "Inference with '{}' failed: {}", model, reason)
            }
            StylishError::Style { path, reason, .. } => match path {
                Some(path) => write!(f, "Style image '{}': {}", path, reason),
                None => write!(f, "Style image: {}", reason),
            },
            StylishError::Io {
                operation,
                path,
                source,
                ..
            } => match path {
                Some(path) => write!(f, "I/O error during {} on '{}': {}", operation, path, source),
                None => write!(f, "I/O error during {}: {}", operation, source),
            },
            StylishError::Validation {
                field,
                constraint,
                value,
                ..
            } => write!(
                f,
                "Validation failed for '{}': {} (value: {})",
                field, constraint, value
            ),
            StylishError::External {
                library, source, ..
            } => write!(f, "{} error: {}", library, source),
        }?;

        if let Some(ctx) = &self.context().context {
            write!(f, " [{}]", ctx)?;
        }
        Ok(())
    }
}

impl StdError for StylishError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StylishError::Resample { source, .. } => Some(source),
            StylishError::Io { source, .. } => Some(source),
            StylishError::External { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Trait for errors that carry a severity
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for StylishError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that may carry a recovery suggestion
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for StylishError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Errors that only cost the current frame.
    pub fn is_transient(error: &StylishError) -> bool {
        matches!(
            error,
            StylishError::FrameCapture { .. } | StylishError::Resample { .. }
        )
    }

    /// Errors the pipeline cannot continue after.
    pub fn is_fatal(error: &StylishError) -> bool {
        matches!(error, StylishError::CaptureInit { .. })
            || error.severity() == ErrorSeverity::Fatal
    }
}

impl From<std::io::Error> for StylishError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<ScaleError> for StylishError {
    fn from(error: ScaleError) -> Self {
        Self::Resample {
            source: error,
            context: ErrorContext::new(ErrorSeverity::Error),
        }
    }
}

impl From<serde_json::Error> for StylishError {
    fn from(error: serde_json::Error) -> Self {
        Self::external("serde_json", error)
    }
}

impl From<image::ImageError> for StylishError {
    fn from(error: image::ImageError) -> Self {
        Self::external("image", error)
    }
}
