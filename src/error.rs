//! Error types for untable library.
//!
//! Table reconstruction itself never fails: malformed markup degrades to a
//! best-effort structure. These errors only cover the surrounding layer
//! (reading inputs, loading configuration, writing output).

use std::io;
use thiserror::Error;

/// Result type alias for untable operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around table extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The selector configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The input is not something tables can be extracted from.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
