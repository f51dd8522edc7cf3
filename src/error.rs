use miette::Diagnostic;
use thiserror::Error;

/// Main error type for fgmap operations
#[derive(Error, Diagnostic, Debug)]
pub enum FgError {
    #[error("IO error: {0}")]
    #[diagnostic(code(fgmap::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(fgmap::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fgmap::config))]
    Configuration {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(fgmap::conflict))]
    Conflict {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid value for '{field}': {token:?}")]
    #[diagnostic(
        code(fgmap::format),
        help("Flags must be 'on' or 'off'; coordinates must look like '100,100'")
    )]
    Format { field: String, token: String },

    #[error("Map '{map}' already has id {id} and cannot be given another")]
    #[diagnostic(code(fgmap::immutable))]
    ImmutableField { map: String, id: u32 },

    #[error("XML error: {message}")]
    #[diagnostic(code(fgmap::xml))]
    Xml {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl FgError {
    pub(crate) fn io(path: impl Into<std::path::PathBuf>, message: impl Into<String>) -> Self {
        FgError::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn format(field: impl Into<String>, token: impl Into<String>) -> Self {
        FgError::Format {
            field: field.into(),
            token: token.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>, help: Option<&str>) -> Self {
        FgError::Configuration {
            message: message.into(),
            help: help.map(str::to_string),
        }
    }
}

pub type Result<T> = std::result::Result<T, FgError>;
