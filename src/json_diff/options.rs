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

use serde::{Deserialize, Serialize};

/// Cap used when no explicit `max_differences` is configured.
pub const DEFAULT_MAX_DIFFERENCES: usize = 20;

/// How strings and numbers should be compared.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueComparison {
    /// Raw textual comparison. `1.50` and `1.5` are different numbers.
    #[default]
    Exact,
    /// Look past formatting: numbers are compared as decimals, strings are
    /// coerced to date-times or UUIDs when both sides parse as such.
    Semantic,
}

/// How a `null` field relates to an absent one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullComparison {
    /// A field holding `null` is different from a missing field.
    #[default]
    Strict,
    /// A field holding `null` is equal to a missing field.
    Semantic,
}

/// Case policy for matching ignore paths.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathMatching {
    #[default]
    IgnoreCase,
    Ordinal,
}

/// Case policy for pairing object properties across left and right.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyNameMatching {
    #[default]
    Ordinal,
    IgnoreCase,
}

impl PathMatching {
    pub(crate) fn matches(self, a: &str, b: &str) -> bool {
        match self {
            PathMatching::IgnoreCase => eq_ignore_case(a, b),
            PathMatching::Ordinal => a == b,
        }
    }
}

impl PropertyNameMatching {
    pub(crate) fn matches(self, a: &str, b: &str) -> bool {
        match self {
            PropertyNameMatching::IgnoreCase => eq_ignore_case(a, b),
            PropertyNameMatching::Ordinal => a == b,
        }
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

pub(crate) fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Configuration for how JSON values should be compared.
///
/// Options are plain values: every comparison reads its own copy or borrows
/// one immutably, so nothing set for one comparison can leak into another.
///
/// ```
/// use json_compare::{ComparisonOptions, NullComparison, ValueComparison};
///
/// let options = ComparisonOptions::new()
///     .value_comparison(ValueComparison::Semantic)
///     .null_comparison(NullComparison::Semantic)
///     .max_differences(5);
/// assert_eq!(options.get_max_differences(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparisonOptions {
    pub(crate) value_comparison: ValueComparison,
    pub(crate) null_comparison: NullComparison,
    pub(crate) max_differences: usize,
    pub(crate) path_matching: PathMatching,
    pub(crate) property_name_matching: PropertyNameMatching,
}

impl ComparisonOptions {
    /// Create options with exact value comparison, strict nulls and a cap of
    /// [`DEFAULT_MAX_DIFFERENCES`].
    pub fn new() -> Self {
        Self {
            value_comparison: ValueComparison::Exact,
            null_comparison: NullComparison::Strict,
            max_differences: DEFAULT_MAX_DIFFERENCES,
            path_matching: PathMatching::IgnoreCase,
            property_name_matching: PropertyNameMatching::Ordinal,
        }
    }

    /// Options for a pure equality check: stop at the first difference.
    pub fn equality() -> Self {
        Self::new().max_differences(1)
    }

    /// Change the value comparison mode.
    pub fn value_comparison(mut self, value_comparison: ValueComparison) -> Self {
        self.value_comparison = value_comparison;
        self
    }

    /// Change the null comparison mode.
    pub fn null_comparison(mut self, null_comparison: NullComparison) -> Self {
        self.null_comparison = null_comparison;
        self
    }

    /// Change the difference cap. A cap of zero is raised to one.
    pub fn max_differences(mut self, max_differences: usize) -> Self {
        self.max_differences = max_differences.max(1);
        self
    }

    /// Change how ignore paths are matched.
    pub fn path_matching(mut self, path_matching: PathMatching) -> Self {
        self.path_matching = path_matching;
        self
    }

    /// Change how object properties are paired.
    pub fn property_name_matching(mut self, property_name_matching: PropertyNameMatching) -> Self {
        self.property_name_matching = property_name_matching;
        self
    }

    pub fn get_value_comparison(&self) -> ValueComparison {
        self.value_comparison
    }

    pub fn get_null_comparison(&self) -> NullComparison {
        self.null_comparison
    }

    /// The effective cap, never less than one.
    pub fn get_max_differences(&self) -> usize {
        // deserialized options bypass the builder
        self.max_differences.max(1)
    }

    pub fn get_path_matching(&self) -> PathMatching {
        self.path_matching
    }

    pub fn get_property_name_matching(&self) -> PropertyNameMatching {
        self.property_name_matching
    }
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self::new()
    }
}
