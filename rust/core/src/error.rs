// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for IDF parsing.

use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort parsing of a document
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input, e.g. an object still open at end of input
    #[error("Parse error at line {line} ({object_type}): {message}")]
    Parse {
        line: usize,
        object_type: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a parse error for the object starting at `line`
    pub fn parse(line: usize, object_type: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            object_type: object_type.into(),
            message: message.into(),
        }
    }

    /// Line number for parse errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            Error::Io(_) => None,
        }
    }
}
