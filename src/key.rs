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

use std::borrow::Borrow;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::POINTER_DELIMITER;
use crate::error::Error;
use crate::error::Result;
use crate::JsonPointer;

/// A single, non-empty segment of a [`JsonPointer`] and the name of a field
/// of a [`JsonObject`](crate::JsonObject).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonKey(Arc<str>);

impl JsonKey {
    /// Creates a key, rejecting only the empty string.
    pub fn of(key: impl AsRef<str>) -> Result<JsonKey> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(Error::KeyInvalid {
                key: String::new(),
                reason: "key must not be empty",
            });
        }
        Ok(JsonKey(Arc::from(key)))
    }

    /// Creates a key with the strict validation used at input boundaries:
    /// besides being non-empty, the key must contain neither slashes nor
    /// control characters.
    pub fn of_validated(key: impl AsRef<str>) -> Result<JsonKey> {
        let key = key.as_ref();
        if key.contains(POINTER_DELIMITER) {
            return Err(Error::KeyInvalid {
                key: key.to_string(),
                reason: "key must not contain slashes",
            });
        }
        if key.chars().any(char::is_control) {
            return Err(Error::KeyInvalid {
                key: key.to_string(),
                reason: "key must not contain control characters",
            });
        }
        JsonKey::of(key)
    }

    /// Callers guarantee that `key` is not empty.
    pub(crate) fn new_unchecked(key: &str) -> JsonKey {
        debug_assert!(!key.is_empty());
        JsonKey(Arc::from(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A pointer with this key as its only level.
    pub fn as_pointer(&self) -> JsonPointer {
        JsonPointer::of_keys([self.clone()])
    }
}

impl Borrow<str> for JsonKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JsonKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for JsonKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        JsonKey::of(s)
    }
}

impl Display for JsonKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for JsonKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonKey({:?})", &*self.0)
    }
}

impl PartialEq<str> for JsonKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for JsonKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
