/*!
 * Error types for the floraqa application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised while building knowledge-base lookup structures
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    /// Two distinct authority entries resolve to the same lookup key
    #[error("Duplicate knowledge-base key '{key}' (entries '{first}' and '{second}')")]
    DuplicateKey {
        /// The normalized key that collided
        key: String,
        /// First entry claiming the key
        first: String,
        /// Second entry claiming the key
        second: String,
    },

    /// A record is missing the field it is keyed by
    #[error("Knowledge-base record has no usable key: {0}")]
    MissingKey(String),
}

/// Errors raised while loading or validating the unit corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A unit record failed schema validation
    #[error("Invalid unit record: {0}")]
    InvalidRecord(String),

    /// The corpus file could not be parsed
    #[error("Failed to parse corpus input: {0}")]
    ParseError(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from knowledge-base construction
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    /// Error from corpus loading
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
