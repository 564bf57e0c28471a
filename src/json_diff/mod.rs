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

mod collector;
mod hash;
mod misc;
mod options;
pub mod path;
mod semantic;

pub use collector::{ComparisonResult, Difference, DifferenceKind, JsonKind};
pub use hash::ValueHasher;
pub use options::{
    ComparisonOptions, NullComparison, PathMatching, PropertyNameMatching, ValueComparison,
    DEFAULT_MAX_DIFFERENCES,
};

use collector::DifferenceCollector;
use path::{IgnorePaths, PathTracker};
use serde_json::{Map, Value};
use tracing::debug;

/// Walk `left` and `right` in lock-step and collect their differences.
pub(crate) fn diff(
    left: &Value,
    right: &Value,
    options: &ComparisonOptions,
    ignore_paths: &IgnorePaths,
) -> ComparisonResult {
    let max_differences = options.get_max_differences();
    debug!(
        max_differences,
        ignore_paths = ignore_paths.len(),
        "comparing json trees"
    );

    let mut paths = PathTracker::new(ignore_paths, options.get_path_matching());
    let mut folder = DiffFolder {
        options,
        acc: DifferenceCollector::new(max_differences),
    };

    if !paths.is_ignored() {
        folder.diff_with(left, right, &mut paths);
    }

    let result = folder.acc.finish();
    debug!(
        differences = result.len(),
        truncated = result.is_truncated(),
        "comparison finished"
    );
    result
}

#[derive(Debug)]
struct DiffFolder<'o> {
    options: &'o ComparisonOptions,
    acc: DifferenceCollector,
}

impl<'o> DiffFolder<'o> {
    fn diff_with(&mut self, left: &Value, right: &Value, paths: &mut PathTracker<'_>) {
        let mode = self.options.value_comparison;

        match (left, right) {
            (Value::Null, Value::Null) => {}
            (Value::Bool(l), Value::Bool(r)) => {
                if l != r {
                    self.value_mismatch(left, right, paths);
                }
            }
            (Value::Number(l), Value::Number(r)) => {
                if !semantic::numbers_equal(l, r, mode) {
                    self.value_mismatch(left, right, paths);
                }
            }
            (Value::String(l), Value::String(r)) => {
                if !semantic::strings_equal(l, r, mode) {
                    self.value_mismatch(left, right, paths);
                }
            }
            (Value::Array(l), Value::Array(r)) => {
                if l.len() != r.len() {
                    self.acc.add(
                        paths.qualified(),
                        Some(left),
                        Some(right),
                        DifferenceKind::ArrayLengthMismatch,
                    );
                    return;
                }

                self.on_array(l, r, paths);
            }
            (Value::Object(l), Value::Object(r)) => self.on_object(l, r, paths),
            _ => self.acc.add(
                paths.qualified(),
                Some(left),
                Some(right),
                DifferenceKind::KindMismatch,
            ),
        }
    }

    fn value_mismatch(&mut self, left: &Value, right: &Value, paths: &PathTracker<'_>) {
        self.acc.add(
            paths.qualified(),
            Some(left),
            Some(right),
            DifferenceKind::ValueMismatch,
        );
    }

    /// Returns true, marking the result truncated, once no further sibling
    /// may be visited.
    fn stop(&mut self) -> bool {
        if self.acc.is_full() {
            self.acc.truncate();
            return true;
        }

        false
    }

    fn on_array(&mut self, left: &[Value], right: &[Value], paths: &mut PathTracker<'_>) {
        for (idx, (l, r)) in left.iter().zip(right).enumerate() {
            if self.stop() {
                return;
            }

            if let Some(mut scope) = paths.enter_index(idx) {
                self.diff_with(l, r, &mut scope);
            }
        }
    }

    fn on_object(
        &mut self,
        left: &Map<String, Value>,
        right: &Map<String, Value>,
        paths: &mut PathTracker<'_>,
    ) {
        let semantic_nulls = self.options.null_comparison == NullComparison::Semantic;

        for (key, l) in left {
            if self.stop() {
                return;
            }

            match self.find_property(right, key) {
                Some(r) => {
                    if let Some(mut scope) = paths.enter_field(key) {
                        self.diff_with(l, r, &mut scope);
                    }
                }
                None => {
                    if semantic_nulls && l.is_null() {
                        continue;
                    }

                    if let Some(scope) = paths.enter_field(key) {
                        self.acc.add(
                            scope.qualified(),
                            Some(l),
                            None,
                            DifferenceKind::MissingOnRight,
                        );
                    }
                }
            }
        }

        for (key, r) in right {
            if self.find_property(left, key).is_some() || (semantic_nulls && r.is_null()) {
                continue;
            }

            if self.stop() {
                return;
            }

            if let Some(scope) = paths.enter_field(key) {
                self.acc.add(
                    scope.qualified(),
                    None,
                    Some(r),
                    DifferenceKind::MissingOnLeft,
                );
            }
        }
    }

    /// First property of `map` whose name matches `key`.
    fn find_property<'m>(&self, map: &'m Map<String, Value>, key: &str) -> Option<&'m Value> {
        match self.options.property_name_matching {
            PropertyNameMatching::Ordinal => map.get(key),
            PropertyNameMatching::IgnoreCase => map
                .iter()
                .find(|(name, _)| PropertyNameMatching::IgnoreCase.matches(name, key))
                .map(|(_, value)| value),
        }
    }
}
