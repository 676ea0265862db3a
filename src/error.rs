//! Error handling for the SensorScope application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SensorScope operations
#[derive(Error, Debug)]
pub enum SensorScopeError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by the CSV reader or writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has neither a `Timestamp` column nor a `Date`/`Time` pair
    #[error("{path:?} has no Timestamp column or Date/Time columns")]
    MissingTimeColumn { path: PathBuf },

    /// Two files with different time columns cannot be merged
    #[error("cannot merge a '{incoming}' time axis into a '{existing}' time axis")]
    IncompatibleTimeColumn { existing: String, incoming: String },

    /// Two files converted to different display offsets cannot be merged
    #[error("cannot merge times in {incoming} into times in {existing}")]
    IncompatibleOffset { existing: String, incoming: String },

    /// A time window bound that could not be parsed
    #[error("invalid time '{0}'")]
    InvalidTime(String),

    /// Nothing to export in the current window
    #[error("no data to export in the selected window")]
    NoData,

    /// Errors while exporting data or images
    #[error("Export error: {0}")]
    Export(String),

    /// Errors from the image encoder
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SensorScopeError>,
    },
}

impl SensorScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SensorScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for SensorScope operations
pub type Result<T> = std::result::Result<T, SensorScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SensorScopeError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
