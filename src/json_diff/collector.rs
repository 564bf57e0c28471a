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

use crate::json_diff::misc::Indent;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};

/// The discriminant of a JSON value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JsonKind::Null => write!(f, "null"),
            JsonKind::Bool => write!(f, "boolean"),
            JsonKind::Number => write!(f, "number"),
            JsonKind::String => write!(f, "string"),
            JsonKind::Array => write!(f, "array"),
            JsonKind::Object => write!(f, "object"),
        }
    }
}

/// Why two positions differ.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DifferenceKind {
    /// The two values are of different JSON kinds.
    KindMismatch,
    /// Same kind, different value.
    ValueMismatch,
    /// The property exists only on the right.
    MissingOnLeft,
    /// The property exists only on the left.
    MissingOnRight,
    /// Both arrays, different lengths. Elements are not compared.
    ArrayLengthMismatch,
}

/// A single mismatch found by the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<Value>,
    kind: DifferenceKind,
}

impl Difference {
    /// Qualified path of the mismatch, rooted at `$`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn left(&self) -> Option<&Value> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Value> {
        self.right.as_ref()
    }

    pub fn kind(&self) -> DifferenceKind {
        self.kind
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Path '{}': ", self.path)?;

        match (self.kind, &self.left, &self.right) {
            (DifferenceKind::KindMismatch, Some(left), Some(right)) => write!(
                f,
                "expected a value of kind {} but found {} ({} vs {})",
                JsonKind::of(left),
                JsonKind::of(right),
                left,
                right
            ),
            (DifferenceKind::ValueMismatch, Some(left), Some(right)) => {
                write!(f, "values differ ({} vs {})", left, right)
            }
            (DifferenceKind::MissingOnLeft, _, Some(right)) => {
                write!(f, "property is missing on the left (right has {})", right)
            }
            (DifferenceKind::MissingOnRight, Some(left), _) => {
                write!(f, "property is missing on the right (left has {})", left)
            }
            (DifferenceKind::ArrayLengthMismatch, Some(left), Some(right)) => write!(
                f,
                "array lengths differ ({} vs {} items)",
                left.as_array().map_or(0, Vec::len),
                right.as_array().map_or(0, Vec::len)
            ),
            (kind, _, _) => write!(f, "{:?}", kind),
        }
    }
}

/// The outcome of one comparison.
///
/// An empty list only proves equality when [`is_truncated`](Self::is_truncated)
/// is false or the cap is one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    differences: Vec<Difference>,
    truncated: bool,
}

impl ComparisonResult {
    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    pub fn into_differences(self) -> Vec<Difference> {
        self.differences
    }

    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    /// True when traversal stopped at the difference cap with positions left
    /// unvisited.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// One line per difference, `Path '<path>': <reason>`.
    pub fn to_display_string(&self) -> String {
        self.differences
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// A summary line followed by the indented differences.
    pub fn to_report_string(&self) -> String {
        if self.differences.is_empty() {
            return "no differences".to_string();
        }

        let noun = if self.differences.len() == 1 {
            "difference"
        } else {
            "differences"
        };
        let suffix = if self.truncated { " (truncated)" } else { "" };

        format!(
            "{} {}{}:\n{}",
            self.differences.len(),
            noun,
            suffix,
            self.to_display_string().indent(2)
        )
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Accumulates differences up to a fixed cap.
#[derive(Debug)]
pub(crate) struct DifferenceCollector {
    max_differences: usize,
    differences: Vec<Difference>,
    truncated: bool,
}

impl DifferenceCollector {
    pub(crate) fn new(max_differences: usize) -> Self {
        Self {
            max_differences,
            differences: vec![],
            truncated: false,
        }
    }

    /// Record a difference. Once full, the difference is dropped and the
    /// result marked truncated.
    pub(crate) fn add(
        &mut self,
        path: &str,
        left: Option<&Value>,
        right: Option<&Value>,
        kind: DifferenceKind,
    ) {
        if self.is_full() {
            self.truncate();
            return;
        }

        trace!(path, ?kind, "difference recorded");
        self.differences.push(Difference {
            path: path.to_string(),
            left: left.cloned(),
            right: right.cloned(),
            kind,
        });
    }

    pub(crate) fn is_full(&self) -> bool {
        self.differences.len() >= self.max_differences
    }

    /// Mark that traversal stopped with positions left unvisited.
    pub(crate) fn truncate(&mut self) {
        if !self.truncated {
            debug!(
                max_differences = self.max_differences,
                "difference cap reached, stopping traversal"
            );
        }
        self.truncated = true;
    }

    pub(crate) fn finish(self) -> ComparisonResult {
        ComparisonResult {
            differences: self.differences,
            truncated: self.truncated,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collector_cap() {
        let mut collector = DifferenceCollector::new(2);
        collector.add("$.a", Some(&json!(1)), Some(&json!(2)), DifferenceKind::ValueMismatch);
        assert!(!collector.is_full());
        collector.add("$.b", Some(&json!(1)), None, DifferenceKind::MissingOnRight);
        assert!(collector.is_full());
        collector.add("$.c", None, Some(&json!(1)), DifferenceKind::MissingOnLeft);

        let result = collector.finish();
        assert_eq!(result.len(), 2);
        assert!(result.is_truncated());
        assert_eq!(result.differences()[1].path(), "$.b");
    }

    #[test]
    fn test_collector_not_truncated_below_cap() {
        let mut collector = DifferenceCollector::new(3);
        collector.add("$", Some(&json!(true)), Some(&json!(false)), DifferenceKind::ValueMismatch);
        let result = collector.finish();
        assert!(result.has_differences());
        assert!(!result.is_truncated());
    }

    #[test]
    fn test_display_messages() {
        let mut collector = DifferenceCollector::new(10);
        collector.add("$.a", Some(&json!(1)), Some(&json!("1")), DifferenceKind::KindMismatch);
        collector.add("$.b", Some(&json!(1)), Some(&json!(2)), DifferenceKind::ValueMismatch);
        collector.add("$.c", None, Some(&json!(null)), DifferenceKind::MissingOnLeft);
        collector.add("$.d", Some(&json!([1])), None, DifferenceKind::MissingOnRight);
        collector.add(
            "$.e",
            Some(&json!([1, 2, 3])),
            Some(&json!([1])),
            DifferenceKind::ArrayLengthMismatch,
        );
        let result = collector.finish();

        let expected = [
            r#"Path '$.a': expected a value of kind number but found string (1 vs "1")"#,
            "Path '$.b': values differ (1 vs 2)",
            "Path '$.c': property is missing on the left (right has null)",
            "Path '$.d': property is missing on the right (left has [1])",
            "Path '$.e': array lengths differ (3 vs 1 items)",
        ]
        .join("\n");
        assert_eq!(result.to_display_string(), expected);
        assert_eq!(result.to_string(), expected);
    }

    #[test]
    fn test_report_string() {
        assert_eq!(ComparisonResult::default().to_report_string(), "no differences");

        let mut collector = DifferenceCollector::new(1);
        collector.add("$.a", Some(&json!(1)), Some(&json!(2)), DifferenceKind::ValueMismatch);
        collector.truncate();
        assert_eq!(
            collector.finish().to_report_string(),
            "1 difference (truncated):\n  Path '$.a': values differ (1 vs 2)"
        );

        let mut collector = DifferenceCollector::new(5);
        collector.add("$.a", Some(&json!(1)), None, DifferenceKind::MissingOnRight);
        collector.add("$.b", None, Some(&json!(2)), DifferenceKind::MissingOnLeft);
        assert_eq!(
            collector.finish().to_report_string(),
            "2 differences:\n  Path '$.a': property is missing on the right (left has 1)\n  Path '$.b': property is missing on the left (right has 2)"
        );
    }

    #[test]
    fn test_serialize_result() {
        let mut collector = DifferenceCollector::new(1);
        collector.add("$.a", Some(&json!(1)), None, DifferenceKind::MissingOnRight);
        let value = serde_json::to_value(collector.finish()).unwrap();
        assert_eq!(
            value,
            json!({
                "differences": [{ "path": "$.a", "left": 1, "kind": "missingOnRight" }],
                "truncated": false
            })
        );
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
        assert_eq!(JsonKind::of(&json!([])).to_string(), "array");
    }
}
