// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::constants::*;
use crate::error::Error;
use crate::error::PointerInvalidReason;
use crate::error::Result;
use crate::JsonKey;

/// An ordered sequence of [`JsonKey`]s addressing a location inside a JSON
/// document. The empty pointer addresses the root.
///
/// The textual form joins the keys with `/` and escapes `~` as `~0`. Unlike
/// RFC 6901, a `/` inside a key is *not* escaped as `~1`; keys containing a
/// slash therefore do not survive a round trip through the string form.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonPointer {
    keys: Vec<JsonKey>,
}

impl JsonPointer {
    /// The pointer to the root of a document.
    pub fn empty() -> JsonPointer {
        JsonPointer { keys: Vec::new() }
    }

    /// Parses a pointer string.
    ///
    /// Leading and trailing slashes are ignored, `""` and `"/"` both give the
    /// empty pointer. Consecutive slashes are rejected.
    pub fn of(pointer: &str) -> Result<JsonPointer> {
        if pointer.is_empty() || pointer == ROOT_POINTER {
            return Ok(JsonPointer::empty());
        }
        if pointer.contains("//") {
            return Err(Error::PointerInvalid {
                pointer: pointer.to_string(),
                reason: PointerInvalidReason::ConsecutiveSlashes,
            });
        }
        let keys = pointer
            .split(POINTER_DELIMITER)
            .filter(|segment| !segment.is_empty())
            .map(|segment| JsonKey::new_unchecked(&unescape_key(segment)))
            .collect();
        Ok(JsonPointer { keys })
    }

    /// Parses a pointer string like [`JsonPointer::of`], additionally
    /// rejecting a trailing slash.
    pub fn of_strict(pointer: &str) -> Result<JsonPointer> {
        if pointer.len() > 1 && pointer.ends_with(POINTER_DELIMITER) && !pointer.contains("//") {
            return Err(Error::PointerInvalid {
                pointer: pointer.to_string(),
                reason: PointerInvalidReason::LeadingOrTrailingSlash,
            });
        }
        JsonPointer::of(pointer)
    }

    pub fn of_keys(keys: impl IntoIterator<Item = JsonKey>) -> JsonPointer {
        JsonPointer {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[JsonKey] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JsonKey> {
        self.keys.iter()
    }

    /// The key at `level`, `None` when out of range.
    pub fn get(&self, level: usize) -> Option<&JsonKey> {
        self.keys.get(level)
    }

    pub fn root(&self) -> Option<&JsonKey> {
        self.keys.first()
    }

    pub fn leaf(&self) -> Option<&JsonKey> {
        self.keys.last()
    }

    pub fn add_leaf(&self, key: JsonKey) -> JsonPointer {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend_from_slice(&self.keys);
        keys.push(key);
        JsonPointer { keys }
    }

    pub fn append(&self, sub_pointer: &JsonPointer) -> JsonPointer {
        if sub_pointer.is_empty() {
            return self.clone();
        }
        let mut keys = Vec::with_capacity(self.keys.len() + sub_pointer.keys.len());
        keys.extend_from_slice(&self.keys);
        keys.extend_from_slice(&sub_pointer.keys);
        JsonPointer { keys }
    }

    /// Drops the root key.
    pub fn next_level(&self) -> JsonPointer {
        if self.keys.len() <= 1 {
            return JsonPointer::empty();
        }
        JsonPointer {
            keys: self.keys[1..].to_vec(),
        }
    }

    /// Drops the leaf key.
    pub fn cut_leaf(&self) -> JsonPointer {
        if self.keys.len() <= 1 {
            return JsonPointer::empty();
        }
        JsonPointer {
            keys: self.keys[..self.keys.len() - 1].to_vec(),
        }
    }

    /// The pointer made of the keys from `level` up to the leaf.
    pub fn sub_pointer(&self, level: usize) -> Option<JsonPointer> {
        if level >= self.keys.len() {
            return None;
        }
        Some(JsonPointer {
            keys: self.keys[level..].to_vec(),
        })
    }

    /// The pointer made of the keys from the root up to and including `level`.
    pub fn prefix_pointer(&self, level: usize) -> Option<JsonPointer> {
        if level >= self.keys.len() {
            return None;
        }
        Some(JsonPointer {
            keys: self.keys[..=level].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &JsonPointer) -> bool {
        self.keys.starts_with(&prefix.keys)
    }
}

fn unescape_key(segment: &str) -> String {
    if segment.contains(TILDE) {
        segment.replace(ESCAPED_TILDE, "~")
    } else {
        segment.to_string()
    }
}

fn write_escaped_key(key: &str, f: &mut Formatter<'_>) -> std::fmt::Result {
    if key.contains(TILDE) {
        f.write_str(&key.replace(TILDE, ESCAPED_TILDE))
    } else {
        f.write_str(key)
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.keys.is_empty() {
            return f.write_str(ROOT_POINTER);
        }
        for key in &self.keys {
            write!(f, "{POINTER_DELIMITER}")?;
            write_escaped_key(key.as_str(), f)?;
        }
        Ok(())
    }
}

impl Debug for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonPointer(\"{self}\")")
    }
}

impl FromStr for JsonPointer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        JsonPointer::of(s)
    }
}

impl From<JsonKey> for JsonPointer {
    fn from(key: JsonKey) -> Self {
        JsonPointer { keys: vec![key] }
    }
}

impl<'a> IntoIterator for &'a JsonPointer {
    type Item = &'a JsonKey;
    type IntoIter = std::slice::Iter<'a, JsonKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
