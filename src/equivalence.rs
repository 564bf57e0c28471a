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

use crate::error::{CompareResult, Side};
use crate::json_diff::path::IgnorePaths;
use crate::json_diff::{self, ComparisonOptions, ValueHasher};
use crate::parse_json;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Equality and hashing of JSON documents under fixed comparison options.
///
/// The difference cap is always one: `equals` stops at the first mismatch.
/// Documents that are equal hash equal.
///
/// ```
/// use json_compare::{ComparisonOptions, JsonEquivalence, ValueComparison};
///
/// let equivalence = JsonEquivalence::new(
///     ComparisonOptions::new().value_comparison(ValueComparison::Semantic),
/// );
/// assert!(equivalence.equals(r#"{"v":1.50}"#, r#"{"v":1.5}"#).unwrap());
/// assert_eq!(
///     equivalence.hash(r#"{"v":1.50}"#).unwrap(),
///     equivalence.hash(r#"{"v":1.5}"#).unwrap()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct JsonEquivalence {
    options: ComparisonOptions,
    ignore_paths: IgnorePaths,
}

impl JsonEquivalence {
    pub fn new(options: ComparisonOptions) -> Self {
        Self {
            options: options.max_differences(1),
            ignore_paths: IgnorePaths::none(),
        }
    }

    /// Like [`new`](Self::new), leaving `ignore_paths` out of both equality
    /// and hashing.
    pub fn with_ignore_paths<S: AsRef<str>>(
        options: ComparisonOptions,
        ignore_paths: &[S],
    ) -> CompareResult<Self> {
        let ignore_paths = IgnorePaths::new(ignore_paths)?;
        Ok(Self {
            options: options.max_differences(1),
            ignore_paths,
        })
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    pub fn ignore_paths(&self) -> &IgnorePaths {
        &self.ignore_paths
    }

    /// Parse both texts and check them for equality.
    pub fn equals(&self, left: &str, right: &str) -> CompareResult<bool> {
        let left = parse_json(left, Side::Left)?;
        let right = parse_json(right, Side::Right)?;
        Ok(self.equals_values(&left, &right))
    }

    /// Parse `text` and hash it.
    pub fn hash(&self, text: &str) -> CompareResult<u64> {
        let value = parse_json(text, Side::Left)?;
        Ok(self.hash_value(&value))
    }

    pub fn equals_values(&self, left: &Value, right: &Value) -> bool {
        !json_diff::diff(left, right, &self.options, &self.ignore_paths).has_differences()
    }

    pub fn hash_value(&self, value: &Value) -> u64 {
        self.hasher().hash(value)
    }

    pub fn hasher(&self) -> ValueHasher<'_> {
        ValueHasher::new(&self.options, &self.ignore_paths)
    }
}

impl Default for JsonEquivalence {
    fn default() -> Self {
        Self::new(ComparisonOptions::default())
    }
}

/// A parsed document usable as a `HashMap` or `HashSet` key.
///
/// Keys compare and hash through their shared [`JsonEquivalence`]. Mixing
/// keys built from different equivalences in one collection is a logic error.
#[derive(Debug, Clone)]
pub struct JsonKey {
    value: Value,
    equivalence: Arc<JsonEquivalence>,
}

impl JsonKey {
    pub fn new(value: Value, equivalence: Arc<JsonEquivalence>) -> Self {
        Self { value, equivalence }
    }

    pub fn parse(text: &str, equivalence: &Arc<JsonEquivalence>) -> CompareResult<Self> {
        let value = parse_json(text, Side::Left)?;
        Ok(Self::new(value, Arc::clone(equivalence)))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for JsonKey {
    fn eq(&self, other: &Self) -> bool {
        self.equivalence.equals_values(&self.value, &other.value)
    }
}

impl Eq for JsonKey {}

impl Hash for JsonKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.equivalence.hasher().hash_into(&self.value, state);
    }
}

impl fmt::Display for JsonKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
