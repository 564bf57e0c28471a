// Copyright 2024 The JsonCompare Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for comparison entry points

use std::{fmt, path::PathBuf};
use thiserror::Error;

/// Result type for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Which argument of a comparison an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors raised before a comparison can produce a result.
///
/// Structural mismatches are never errors; they are reported through
/// [`ComparisonResult`](crate::ComparisonResult).
#[derive(Debug, Error)]
pub enum CompareError {
    /// JSON text handed to a text-based entry point is malformed
    #[error("{side} input is not valid JSON: {source}")]
    Parse {
        side: Side,
        #[source]
        source: serde_json::Error,
    },

    /// The serializer could not turn a typed value into JSON
    #[error("failed to serialize {side} argument: {source}")]
    Serialize {
        side: Side,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// An ignore path entry is unusable
    #[error("invalid ignore path #{index} '{path}': {reason}")]
    InvalidIgnorePath {
        index: usize,
        path: String,
        reason: String,
    },

    /// A settings file could not be read
    #[error("failed to read settings {}: {source}", .path.display())]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not a valid settings document
    #[error("failed to parse settings {}: {source}", .path.display())]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CompareError {
    pub(crate) fn parse(side: Side, source: serde_json::Error) -> Self {
        CompareError::Parse { side, source }
    }

    pub(crate) fn serialize<E>(side: Side, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CompareError::Serialize {
            side,
            source: Box::new(source),
        }
    }
}
