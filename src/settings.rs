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

use crate::error::{CompareError, CompareResult};
use crate::json_diff::path::IgnorePaths;
use crate::json_diff::{ComparisonOptions, ComparisonResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Comparison options bundled with ignore paths, as stored in a settings file.
///
/// ```
/// use json_compare::{ComparisonSettings, ValueComparison};
///
/// let settings = ComparisonSettings::from_json_str(
///     r#"{"options": {"valueComparison": "semantic"}, "ignorePaths": ["$.id"]}"#,
/// )
/// .unwrap();
/// assert_eq!(settings.options().get_value_comparison(), ValueComparison::Semantic);
/// assert!(!settings.compare_json(r#"{"id":1,"v":1.0}"#, r#"{"id":2,"v":1}"#).unwrap().has_differences());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparisonSettings {
    options: ComparisonOptions,
    ignore_paths: Vec<String>,
}

impl ComparisonSettings {
    pub fn new(options: ComparisonOptions) -> Self {
        Self {
            options,
            ignore_paths: vec![],
        }
    }

    /// Parse settings from JSON text. Missing keys take their defaults.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> CompareResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CompareError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::from_json_str(&text).map_err(|source| CompareError::ParseSettings {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            path = %path.display(),
            ignore_paths = settings.ignore_paths.len(),
            "loaded comparison settings"
        );
        Ok(settings)
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    pub fn raw_ignore_paths(&self) -> &[String] {
        &self.ignore_paths
    }

    /// Replace the options, keeping the ignore paths.
    pub fn with_options(mut self, options: ComparisonOptions) -> Self {
        self.options = options;
        self
    }

    /// Append an ignore path.
    pub fn with_ignore_path(mut self, path: &str) -> Self {
        self.ignore_paths.push(path.to_string());
        self
    }

    /// Validate and normalize the ignore paths.
    pub fn ignore_paths(&self) -> CompareResult<IgnorePaths> {
        IgnorePaths::new(&self.ignore_paths)
    }

    /// Compare two JSON texts with these settings.
    pub fn compare_json(&self, left: &str, right: &str) -> CompareResult<ComparisonResult> {
        crate::compare_json_with(left, right, &self.options, &self.ignore_paths()?)
    }
}
