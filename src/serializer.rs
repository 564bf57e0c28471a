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

use serde::Serialize;
use serde_json::Value;

/// Turns application values into JSON trees before comparison.
///
/// Implement this to control how values are rendered, e.g. to apply naming
/// policies that differ from the types' own `Serialize` impls. Failures are
/// reported as [`CompareError::Serialize`](crate::CompareError::Serialize)
/// with `Error` as the source.
pub trait JsonSerializer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Self::Error>;
}

/// Serializes with the value's own `Serialize` impl via `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerdeJsonSerializer;

impl JsonSerializer for SerdeJsonSerializer {
    type Error = serde_json::Error;

    fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Self::Error> {
        serde_json::to_value(value)
    }
}

impl<S: JsonSerializer> JsonSerializer for &S {
    type Error = S::Error;

    fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Self::Error> {
        (**self).to_value(value)
    }
}
