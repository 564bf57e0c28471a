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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use serde::Serialize;
use serde_json::Value;

mod equivalence;
mod error;
mod json_diff;
mod serializer;
mod settings;

pub use equivalence::{JsonEquivalence, JsonKey};
pub use error::{CompareError, CompareResult, Side};
pub use json_diff::path::{normalize_ignore_path, IgnorePaths, PathGuard, PathTracker, ROOT};
pub use json_diff::{
    ComparisonOptions, ComparisonResult, Difference, DifferenceKind, JsonKind, NullComparison,
    PathMatching, PropertyNameMatching, ValueComparison, ValueHasher, DEFAULT_MAX_DIFFERENCES,
};
pub use serializer::{JsonSerializer, SerdeJsonSerializer};
pub use settings::ComparisonSettings;

/// Compare two parsed JSON trees.
///
/// Fails only when an ignore path is invalid; structural mismatches are
/// reported in the result.
///
/// # Examples
///
/// ```
/// use json_compare::{compare_trees, ComparisonOptions, DifferenceKind};
/// use serde_json::json;
///
/// let result = compare_trees(
///     &json!({ "id": 1, "items": [1, 2] }),
///     &json!({ "id": 2, "items": [2, 1] }),
///     &ComparisonOptions::default(),
///     &["id"],
/// )
/// .unwrap();
///
/// let paths: Vec<&str> = result.differences().iter().map(|d| d.path()).collect();
/// assert_eq!(paths, ["$.items[0]", "$.items[1]"]);
/// assert_eq!(result.differences()[0].kind(), DifferenceKind::ValueMismatch);
/// ```
pub fn compare_trees(
    left: &Value,
    right: &Value,
    options: &ComparisonOptions,
    ignore_paths: &[&str],
) -> CompareResult<ComparisonResult> {
    let ignore_paths = IgnorePaths::new(ignore_paths)?;
    Ok(compare_trees_with(left, right, options, &ignore_paths))
}

/// Compare two parsed JSON trees with an already validated ignore set.
///
/// Ignore entries are matched with the case policy of `options`.
pub fn compare_trees_with(
    left: &Value,
    right: &Value,
    options: &ComparisonOptions,
    ignore_paths: &IgnorePaths,
) -> ComparisonResult {
    json_diff::diff(left, right, options, ignore_paths)
}

/// Parse and compare two JSON texts.
///
/// Numbers keep their source text, so `1.50` and `1.5` only compare equal
/// under [`ValueComparison::Semantic`].
///
/// # Examples
///
/// ```
/// use json_compare::{compare_json, ComparisonOptions, ValueComparison};
///
/// let exact = ComparisonOptions::default();
/// let result = compare_json(r#"{"v":1.50}"#, r#"{"v":1.5}"#, &exact, &[]).unwrap();
/// assert_eq!(result.to_display_string(), "Path '$.v': values differ (1.50 vs 1.5)");
///
/// let semantic = exact.value_comparison(ValueComparison::Semantic);
/// let result = compare_json(r#"{"v":1.50}"#, r#"{"v":1.5}"#, &semantic, &[]).unwrap();
/// assert!(!result.has_differences());
/// ```
pub fn compare_json(
    left: &str,
    right: &str,
    options: &ComparisonOptions,
    ignore_paths: &[&str],
) -> CompareResult<ComparisonResult> {
    let ignore_paths = IgnorePaths::new(ignore_paths)?;
    compare_json_with(left, right, options, &ignore_paths)
}

/// Parse and compare two JSON texts with an already validated ignore set.
pub fn compare_json_with(
    left: &str,
    right: &str,
    options: &ComparisonOptions,
    ignore_paths: &IgnorePaths,
) -> CompareResult<ComparisonResult> {
    let left = parse_json(left, Side::Left)?;
    let right = parse_json(right, Side::Right)?;
    Ok(compare_trees_with(&left, &right, options, ignore_paths))
}

/// Serialize two values with `serializer` and compare the results.
///
/// # Examples
///
/// ```
/// use json_compare::{compare_values, ComparisonOptions, SerdeJsonSerializer};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Item {
///     name: &'static str,
///     price: u32,
/// }
///
/// let result = compare_values(
///     &Item { name: "a", price: 1 },
///     &Item { name: "a", price: 2 },
///     &ComparisonOptions::default(),
///     &[],
///     &SerdeJsonSerializer,
/// )
/// .unwrap();
/// assert_eq!(result.differences()[0].path(), "$.price");
/// ```
pub fn compare_values<L, R, J>(
    left: &L,
    right: &R,
    options: &ComparisonOptions,
    ignore_paths: &[&str],
    serializer: &J,
) -> CompareResult<ComparisonResult>
where
    L: Serialize + ?Sized,
    R: Serialize + ?Sized,
    J: JsonSerializer,
{
    let ignore_paths = IgnorePaths::new(ignore_paths)?;
    let left = serializer
        .to_value(left)
        .map_err(|err| CompareError::serialize(Side::Left, err))?;
    let right = serializer
        .to_value(right)
        .map_err(|err| CompareError::serialize(Side::Right, err))?;

    Ok(compare_trees_with(&left, &right, options, &ignore_paths))
}

pub(crate) fn parse_json(text: &str, side: Side) -> CompareResult<Value> {
    serde_json::from_str(text).map_err(|err| CompareError::parse(side, err))
}
