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
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::OnceLock;

use crate::util::escaped_len;
use crate::util::write_escaped_string;

/// A JSON string holding its raw content. The quoted and escaped JSON form is
/// computed on first use and cached.
#[derive(Clone)]
pub struct JsonString(Arc<Inner>);

struct Inner {
    value: Box<str>,
    repr: OnceLock<Box<str>>,
}

impl JsonString {
    pub fn new(value: impl Into<String>) -> JsonString {
        JsonString(Arc::new(Inner {
            value: value.into().into_boxed_str(),
            repr: OnceLock::new(),
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0.value
    }

    /// The quoted and escaped JSON text of this string.
    pub fn repr(&self) -> &str {
        self.0.repr.get_or_init(|| {
            let mut buf = String::with_capacity(self.0.value.len() + 2);
            write_escaped_string(&self.0.value, &mut buf);
            buf.into_boxed_str()
        })
    }

    /// Length of the JSON text, without forcing the cached form.
    pub(crate) fn repr_len(&self) -> usize {
        match self.0.repr.get() {
            Some(repr) => repr.len(),
            None => escaped_len(&self.0.value),
        }
    }

    pub fn ptr_eq(&self, other: &JsonString) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for JsonString {
    fn eq(&self, other: &Self) -> bool {
        self.0.value == other.0.value
    }
}

impl Eq for JsonString {}

impl Hash for JsonString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.value.hash(state)
    }
}

impl Display for JsonString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.repr())
    }
}

impl Debug for JsonString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.repr())
    }
}

impl From<&str> for JsonString {
    fn from(value: &str) -> Self {
        JsonString::new(value)
    }
}

impl From<String> for JsonString {
    fn from(value: String) -> Self {
        JsonString::new(value)
    }
}
