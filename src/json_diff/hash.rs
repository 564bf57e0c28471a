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

use crate::json_diff::collector::JsonKind;
use crate::json_diff::options::{
    fold_case, ComparisonOptions, NullComparison, PropertyNameMatching, ValueComparison,
};
use crate::json_diff::path::{IgnorePaths, PathTracker};
use crate::json_diff::semantic::{canonical_number, canonical_string};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Hashes JSON values consistently with the comparison engine.
///
/// Two values the engine finds no difference between, under the same options
/// and ignore paths, hash equal. Hashing follows the options it is built with:
///
/// * `ValueComparison::Exact` hashes raw number and string text,
///   `ValueComparison::Semantic` hashes the canonical decimal, instant or UUID;
/// * `NullComparison::Semantic` leaves `null` fields out of objects;
/// * `PropertyNameMatching::IgnoreCase` folds property names, keeping the
///   first of any names that fold together;
/// * ignored paths are left out.
///
/// Object fields are hashed sorted by name, array elements in order.
#[derive(Debug, Clone, Copy)]
pub struct ValueHasher<'a> {
    options: &'a ComparisonOptions,
    ignore_paths: &'a IgnorePaths,
}

impl<'a> ValueHasher<'a> {
    pub fn new(options: &'a ComparisonOptions, ignore_paths: &'a IgnorePaths) -> Self {
        Self {
            options,
            ignore_paths,
        }
    }

    /// Hash `value` with a deterministic hasher.
    pub fn hash(&self, value: &Value) -> u64 {
        let mut state = DefaultHasher::new();
        self.hash_into(value, &mut state);
        state.finish()
    }

    /// Feed `value` into an existing hasher.
    pub fn hash_into<H: Hasher>(&self, value: &Value, state: &mut H) {
        let mut paths = PathTracker::new(self.ignore_paths, self.options.get_path_matching());
        if paths.is_ignored() {
            return;
        }

        self.hash_with(value, &mut paths, state);
    }

    fn hash_with<H: Hasher>(&self, value: &Value, paths: &mut PathTracker<'_>, state: &mut H) {
        JsonKind::of(value).hash(state);

        match value {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => match self.options.value_comparison {
                ValueComparison::Exact => n.to_string().hash(state),
                ValueComparison::Semantic => canonical_number(n).hash(state),
            },
            Value::String(s) => match self.options.value_comparison {
                ValueComparison::Exact => s.hash(state),
                ValueComparison::Semantic => canonical_string(s).hash(state),
            },
            Value::Array(items) => {
                items.len().hash(state);
                for (idx, item) in items.iter().enumerate() {
                    if let Some(mut scope) = paths.enter_index(idx) {
                        self.hash_with(item, &mut scope, state);
                    }
                }
            }
            Value::Object(map) => {
                let fields = self.hashed_fields(map, paths);
                fields.len().hash(state);
                for (key, name, item) in fields {
                    if let Some(mut scope) = paths.enter_field(name) {
                        key.hash(state);
                        self.hash_with(item, &mut scope, state);
                    }
                }
            }
        }
    }

    fn hashed_fields<'v>(
        &self,
        map: &'v Map<String, Value>,
        paths: &mut PathTracker<'_>,
    ) -> Vec<(Cow<'v, str>, &'v str, &'v Value)> {
        let skip_nulls = self.options.null_comparison == NullComparison::Semantic;
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(map.len());

        for (name, item) in map {
            if skip_nulls && item.is_null() {
                continue;
            }
            if paths.enter_field(name).is_none() {
                continue;
            }

            let key = match self.options.property_name_matching {
                PropertyNameMatching::Ordinal => Cow::Borrowed(name.as_str()),
                PropertyNameMatching::IgnoreCase => Cow::Owned(fold_case(name)),
            };
            if seen.insert(key.clone()) {
                fields.push((key, name.as_str(), item));
            }
        }

        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }
}
