// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the processing pipeline.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a pipeline run
///
/// Everything recoverable is reported as an [`idf_lite_core::Anomaly`]
/// instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Core parser error: {0}")]
    CoreError(#[from] idf_lite_core::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(format!("JSON error: {}", err))
    }
}
