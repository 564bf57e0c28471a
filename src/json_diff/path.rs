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
use crate::json_diff::options::PathMatching;
use regex::Regex;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Marker every path starts with.
pub const ROOT: &str = "$";

// Field segments are free text; only bracket segments are constrained.
fn ignore_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\$(\.[^.\[\]]*|\[\d+\])*$").expect("ignore path regex"))
}

/// A normalized set of paths to leave out of a comparison.
///
/// Entries may omit the root marker: `Items[0].Price` and `$.Items[0].Price`
/// are the same entry. An entry without indices, such as `Items.Price`,
/// matches that field under every array index. Case sensitivity is decided
/// per comparison by [`PathMatching`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePaths {
    entries: Vec<String>,
}

impl IgnorePaths {
    /// Normalize and validate `paths`.
    ///
    /// Empty or blank entries and malformed index segments are rejected.
    pub fn new<S: AsRef<str>>(paths: &[S]) -> CompareResult<Self> {
        let re = ignore_path_regex();
        let mut entries = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let raw = path.as_ref();
            let invalid = |reason: &str| CompareError::InvalidIgnorePath {
                index,
                path: raw.to_string(),
                reason: reason.to_string(),
            };

            let normalized = normalize_ignore_path(raw).ok_or_else(|| invalid("path is empty"))?;
            if !re.is_match(&normalized) {
                return Err(invalid("array indices must be written as [n]"));
            }

            entries.push(normalized);
        }

        Ok(Self { entries })
    }

    /// An empty set.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether either form of the current position is ignored.
    pub fn matches(&self, qualified: &str, unqualified: &str, matching: PathMatching) -> bool {
        self.entries
            .iter()
            .any(|entry| matching.matches(entry, qualified) || matching.matches(entry, unqualified))
    }
}

/// Prefix `path` with the root marker if it lacks one.
///
/// Returns `None` for empty or blank input.
///
/// ```
/// use json_compare::normalize_ignore_path;
///
/// assert_eq!(normalize_ignore_path("foo").as_deref(), Some("$.foo"));
/// assert_eq!(normalize_ignore_path("[0]").as_deref(), Some("$[0]"));
/// assert_eq!(normalize_ignore_path("$.foo").as_deref(), Some("$.foo"));
/// ```
pub fn normalize_ignore_path(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    let normalized = if path == ROOT || path.starts_with("$.") || path.starts_with("$[") {
        path.to_string()
    } else if path.starts_with('.') || path.starts_with('[') {
        format!("{}{}", ROOT, path)
    } else {
        format!("{}.{}", ROOT, path)
    };

    Some(normalized)
}

/// Tracks the position of a traversal as two strings.
///
/// The qualified path carries array indices (`$.items[2].price`), the
/// unqualified path collapses them (`$.items.price`). Frames are pushed with
/// [`enter_field`](Self::enter_field) / [`enter_index`](Self::enter_index)
/// and popped when the returned [`PathGuard`] is dropped.
#[derive(Debug)]
pub struct PathTracker<'i> {
    ignore: &'i IgnorePaths,
    matching: PathMatching,
    qualified: String,
    unqualified: String,
    frames: Vec<(usize, usize)>,
}

impl<'i> PathTracker<'i> {
    pub fn new(ignore: &'i IgnorePaths, matching: PathMatching) -> Self {
        Self {
            ignore,
            matching,
            qualified: ROOT.to_string(),
            unqualified: ROOT.to_string(),
            frames: vec![],
        }
    }

    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    pub fn unqualified(&self) -> &str {
        &self.unqualified
    }

    /// Number of frames currently entered.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether the current position is in the ignore set.
    pub fn is_ignored(&self) -> bool {
        self.ignore
            .matches(&self.qualified, &self.unqualified, self.matching)
    }

    /// Step into object field `name`, or `None` if that field is ignored.
    pub fn enter_field(&mut self, name: &str) -> Option<PathGuard<'_, 'i>> {
        self.push_frame();
        self.qualified.push('.');
        self.qualified.push_str(name);
        self.unqualified.push('.');
        self.unqualified.push_str(name);

        self.guard()
    }

    /// Step into array element `index`, or `None` if that element is ignored.
    pub fn enter_index(&mut self, index: usize) -> Option<PathGuard<'_, 'i>> {
        self.push_frame();
        self.qualified.push('[');
        self.qualified.push_str(&index.to_string());
        self.qualified.push(']');

        self.guard()
    }

    fn push_frame(&mut self) {
        self.frames
            .push((self.qualified.len(), self.unqualified.len()));
    }

    fn guard(&mut self) -> Option<PathGuard<'_, 'i>> {
        if self.is_ignored() {
            self.pop_frame();
            return None;
        }

        Some(PathGuard { tracker: self })
    }

    fn pop_frame(&mut self) {
        if let Some((qualified, unqualified)) = self.frames.pop() {
            self.qualified.truncate(qualified);
            self.unqualified.truncate(unqualified);
        }
    }
}

/// A frame entered on a [`PathTracker`]; popped on drop.
#[derive(Debug)]
pub struct PathGuard<'t, 'i> {
    tracker: &'t mut PathTracker<'i>,
}

impl<'t, 'i> Deref for PathGuard<'t, 'i> {
    type Target = PathTracker<'i>;

    fn deref(&self) -> &Self::Target {
        self.tracker
    }
}

impl<'t, 'i> DerefMut for PathGuard<'t, 'i> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tracker
    }
}

impl<'t, 'i> Drop for PathGuard<'t, 'i> {
    fn drop(&mut self) {
        self.tracker.pop_frame();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ignore(paths: &[&str]) -> IgnorePaths {
        IgnorePaths::new(paths).unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_ignore_path("foo").unwrap(), "$.foo");
        assert_eq!(normalize_ignore_path("[0]").unwrap(), "$[0]");
        assert_eq!(normalize_ignore_path(".foo").unwrap(), "$.foo");
        assert_eq!(normalize_ignore_path("$").unwrap(), "$");
        assert_eq!(normalize_ignore_path("$.a[1].b").unwrap(), "$.a[1].b");
        assert_eq!(normalize_ignore_path("  Items.Price ").unwrap(), "$.Items.Price");
        assert_eq!(normalize_ignore_path("$id").unwrap(), "$.$id");
        assert!(normalize_ignore_path("").is_none());
        assert!(normalize_ignore_path("   ").is_none());
    }

    #[test]
    fn test_ignore_paths_validation() {
        let paths = ignore(&["Items[0].Price", "$.Items[0].Price", "id"]);
        assert_eq!(
            paths.entries(),
            &["$.Items[0].Price", "$.Items[0].Price", "$.id"]
        );

        let err = IgnorePaths::new(&["a", ""]).unwrap_err();
        match err {
            CompareError::InvalidIgnorePath { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error {other}"),
        }

        assert!(IgnorePaths::new(&["a[x]"]).is_err());
        assert!(IgnorePaths::new(&["a["]).is_err());
        assert!(IgnorePaths::new(&["a[]"]).is_err());
        assert!(IgnorePaths::new(&["a[1].b[22]"]).is_ok());
    }

    #[test]
    fn test_validation_regex_is_shared() {
        assert!(std::ptr::eq(ignore_path_regex(), ignore_path_regex()));

        for _ in 0..3 {
            assert_eq!(ignore(&["a[2].b"]).entries(), &["$.a[2].b"]);
            match IgnorePaths::new(&["a[b]"]) {
                Err(CompareError::InvalidIgnorePath { index: 0, reason, .. }) => {
                    assert_eq!(reason, "array indices must be written as [n]")
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_tracker_paths() {
        let paths = IgnorePaths::none();
        let mut tracker = PathTracker::new(&paths, PathMatching::IgnoreCase);
        assert_eq!(tracker.qualified(), "$");

        {
            let mut items = tracker.enter_field("items").unwrap();
            assert_eq!(items.qualified(), "$.items");

            let mut first = items.enter_index(2).unwrap();
            assert_eq!(first.qualified(), "$.items[2]");
            assert_eq!(first.unqualified(), "$.items");

            let price = first.enter_field("price").unwrap();
            assert_eq!(price.qualified(), "$.items[2].price");
            assert_eq!(price.unqualified(), "$.items.price");
            assert_eq!(price.depth(), 3);
        }

        assert_eq!(tracker.qualified(), "$");
        assert_eq!(tracker.unqualified(), "$");
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn test_tracker_ignores() {
        let paths = ignore(&["Items.Price", "$.meta[1]", "ID"]);
        let mut tracker = PathTracker::new(&paths, PathMatching::IgnoreCase);

        assert!(tracker.enter_field("id").is_none());
        assert_eq!(tracker.qualified(), "$");

        let mut items = tracker.enter_field("items").unwrap();
        let mut element = items.enter_index(7).unwrap();
        assert!(element.enter_field("price").is_none());
        assert!(element.enter_field("name").is_some());
        drop(element);
        drop(items);

        let mut meta = tracker.enter_field("meta").unwrap();
        assert!(meta.enter_index(0).is_some());
        assert!(meta.enter_index(1).is_none());
        assert_eq!(meta.qualified(), "$.meta");
    }

    #[test]
    fn test_ordinal_path_matching() {
        let paths = ignore(&["ID"]);
        let mut tracker = PathTracker::new(&paths, PathMatching::Ordinal);
        assert!(tracker.enter_field("id").is_some());
        assert!(tracker.enter_field("ID").is_none());

        let mut tracker = PathTracker::new(&paths, PathMatching::IgnoreCase);
        assert!(tracker.enter_field("id").is_none());
        assert!(paths.matches("$.id", "$.id", PathMatching::IgnoreCase));
        assert!(!paths.matches("$.id", "$.id", PathMatching::Ordinal));
    }

    #[test]
    fn test_root_ignored() {
        let paths = ignore(&["$"]);
        let tracker = PathTracker::new(&paths, PathMatching::Ordinal);
        assert!(tracker.is_ignored());
    }
}
