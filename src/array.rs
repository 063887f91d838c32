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

use crate::error::Error;
use crate::error::Result;
use crate::soft_cell::SoftCell;
use crate::JsonValue;

pub(crate) type Elements = Vec<JsonValue>;

/// An immutable, ordered sequence of [`JsonValue`]s.
///
/// Every modifying operation returns a new array sharing the untouched
/// elements. The null-flavored array (see [`JsonArray::null_array`]) is empty,
/// reports `is_null() == true` and ignores all modifications.
#[derive(Clone)]
pub struct JsonArray {
    inner: Option<Arc<SoftCell<Elements>>>,
}

impl JsonArray {
    pub fn empty() -> JsonArray {
        JsonArray::from_elements(Vec::new())
    }

    /// The array that stands in for a JSON `null` where an array is expected.
    pub fn null_array() -> JsonArray {
        JsonArray { inner: None }
    }

    pub fn of<V: Into<JsonValue>>(values: impl IntoIterator<Item = V>) -> JsonArray {
        JsonArray::from_elements(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn from_elements(elements: Elements) -> JsonArray {
        JsonArray {
            inner: Some(Arc::new(SoftCell::new(elements))),
        }
    }

    fn elements(&self) -> Arc<Elements> {
        match &self.inner {
            Some(cell) => cell.structure(),
            None => Arc::new(Vec::new()),
        }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    pub fn len(&self) -> usize {
        self.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<JsonValue> {
        self.elements().get(index).cloned()
    }

    pub fn add(&self, value: impl Into<JsonValue>) -> JsonArray {
        if self.is_null() {
            return self.clone();
        }
        let mut elements = self.elements().as_ref().clone();
        elements.push(value.into());
        JsonArray::from_elements(elements)
    }

    pub fn add_all<V: Into<JsonValue>>(&self, values: impl IntoIterator<Item = V>) -> JsonArray {
        if self.is_null() {
            return self.clone();
        }
        let mut elements = self.elements().as_ref().clone();
        elements.extend(values.into_iter().map(Into::into));
        JsonArray::from_elements(elements)
    }

    /// Replaces the element at `index`.
    pub fn set(&self, index: usize, value: impl Into<JsonValue>) -> Result<JsonArray> {
        if self.is_null() {
            return Ok(self.clone());
        }
        let mut elements = self.elements().as_ref().clone();
        let len = elements.len();
        match elements.get_mut(index) {
            Some(slot) => *slot = value.into(),
            None => return Err(Error::IndexOutOfBounds { index, len }),
        }
        Ok(JsonArray::from_elements(elements))
    }

    /// Removes the element at `index`; an out-of-range index leaves the array unchanged.
    pub fn remove(&self, index: usize) -> JsonArray {
        let elements = self.elements();
        if self.is_null() || index >= elements.len() {
            return self.clone();
        }
        let mut elements = elements.as_ref().clone();
        elements.remove(index);
        JsonArray::from_elements(elements)
    }

    pub fn index_of(&self, value: &JsonValue) -> Option<usize> {
        self.elements().iter().position(|v| v == value)
    }

    pub fn contains(&self, value: &JsonValue) -> bool {
        self.index_of(value).is_some()
    }

    pub fn iter(&self) -> ArrayIter {
        ArrayIter {
            elements: self.elements(),
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<JsonValue> {
        self.elements().as_ref().clone()
    }

    /// Drops the materialized elements if the JSON string of this array has
    /// already been computed; they are re-parsed from it on the next access.
    pub fn release_structure(&self) -> bool {
        self.inner.as_ref().is_some_and(|cell| cell.release())
    }

    pub fn ptr_eq(&self, other: &JsonArray) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// The compact JSON text of this array, cached after the first call.
    pub(crate) fn repr(&self) -> Arc<str> {
        match &self.inner {
            Some(cell) => cell.repr(render_elements),
            None => Arc::from("null"),
        }
    }

    pub(crate) fn cached_repr_len(&self) -> Option<usize> {
        match &self.inner {
            Some(cell) => cell.cached_repr().map(str::len),
            None => Some(4),
        }
    }
}

fn render_elements(elements: &Elements) -> String {
    let mut buf = String::with_capacity(2 + elements.len() * 8);
    buf.push('[');
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        element.write_json(&mut buf);
    }
    buf.push(']');
    buf
}

/// Iterator over the elements of a [`JsonArray`].
pub struct ArrayIter {
    elements: Arc<Elements>,
    index: usize,
}

impl Iterator for ArrayIter {
    type Item = JsonValue;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.elements.get(self.index).cloned();
        if value.is_some() {
            self.index += 1;
        }
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.elements.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArrayIter {}

impl IntoIterator for &JsonArray {
    type Item = JsonValue;
    type IntoIter = ArrayIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<JsonValue> for JsonArray {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        JsonArray::from_elements(iter.into_iter().collect())
    }
}

impl PartialEq for JsonArray {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.structure() == b.structure(),
            _ => false,
        }
    }
}

impl Eq for JsonArray {}

impl Hash for JsonArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let elements = self.elements();
        elements.len().hash(state);
        for element in elements.iter() {
            element.hash(state);
        }
    }
}

impl Display for JsonArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}

impl Debug for JsonArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonArray({})", self.repr())
    }
}
