//! Error types for stylesheet handling.

use thiserror::Error;

/// An error from parsing, printing or minifying a stylesheet.
#[derive(Debug, Error)]
pub enum PruneError {
    /// The stylesheet could not be parsed.
    #[error("failed to parse {filename}: {message}")]
    Parse {
        /// The stylesheet's file name.
        filename: String,
        /// The parser's message.
        message: String,
    },

    /// The stylesheet could not be printed.
    #[error("failed to print stylesheet: {message}")]
    Print {
        /// The printer's message.
        message: String,
    },

    /// The stylesheet could not be minified.
    #[error("failed to minify {filename}: {message}")]
    Minify {
        /// The stylesheet's file name.
        filename: String,
        /// The minifier's message.
        message: String,
    },
}

/// Result alias for stylesheet operations.
pub type Result<T> = std::result::Result<T, PruneError>;
