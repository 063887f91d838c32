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

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::JsonKey;
use crate::JsonPointer;

/// Prefix tree over the keys of a set of pointers, used to project an object
/// onto a field selector in a single walk.
///
/// A node is terminal when some pointer ends at it; the whole value at that
/// location is then selected regardless of deeper pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonFieldSelectorTrie {
    children: IndexMap<JsonKey, JsonFieldSelectorTrie>,
    terminal: bool,
}

impl JsonFieldSelectorTrie {
    pub fn empty() -> JsonFieldSelectorTrie {
        JsonFieldSelectorTrie::default()
    }

    pub fn of<'a>(pointers: impl IntoIterator<Item = &'a JsonPointer>) -> JsonFieldSelectorTrie {
        let mut trie = JsonFieldSelectorTrie::empty();
        for pointer in pointers {
            trie.add(pointer);
        }
        trie
    }

    pub fn add(&mut self, pointer: &JsonPointer) {
        let mut node = self;
        for key in pointer {
            node = node.children.entry(key.clone()).or_default();
        }
        node.terminal = true;
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Child keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &JsonKey> {
        self.children.keys()
    }

    /// The subtree below `key`, an empty trie if there is none.
    pub fn descend(&self, key: &JsonKey) -> Cow<'_, JsonFieldSelectorTrie> {
        match self.children.get(key) {
            Some(child) => Cow::Borrowed(child),
            None => Cow::Owned(JsonFieldSelectorTrie::empty()),
        }
    }
}
