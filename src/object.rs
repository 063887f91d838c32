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

use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Error;
use crate::error::Result;
use crate::soft_cell::SoftCell;
use crate::util::write_escaped_string;
use crate::FieldMarker;
use crate::JsonField;
use crate::JsonFieldDefinition;
use crate::JsonFieldSelector;
use crate::JsonFieldSelectorTrie;
use crate::JsonKey;
use crate::JsonPointer;
use crate::JsonValue;
use crate::ObjectBuilder;

pub(crate) type FieldMap = IndexMap<JsonKey, JsonField>;

/// An immutable JSON object: fields in insertion order, keys unique.
///
/// Every modifying operation returns a new object. Only the objects on the
/// path from the root to the modified field are rebuilt, all other fields are
/// shared with the original. The null-flavored object (see
/// [`JsonObject::null_object`]) is empty, reports `is_null() == true` and
/// ignores all modifications.
#[derive(Clone)]
pub struct JsonObject {
    inner: Option<Arc<SoftCell<FieldMap>>>,
}

impl JsonObject {
    pub fn empty() -> JsonObject {
        JsonObject::from_fields(FieldMap::new())
    }

    /// The object that stands in for a JSON `null` where an object is expected.
    pub fn null_object() -> JsonObject {
        JsonObject { inner: None }
    }

    pub fn builder() -> ObjectBuilder {
        ObjectBuilder::new()
    }

    pub fn to_builder(&self) -> ObjectBuilder {
        ObjectBuilder::from(self)
    }

    pub(crate) fn from_fields(fields: FieldMap) -> JsonObject {
        JsonObject {
            inner: Some(Arc::new(SoftCell::new(fields))),
        }
    }

    pub(crate) fn fields(&self) -> Arc<FieldMap> {
        match &self.inner {
            Some(cell) => cell.structure(),
            None => Arc::new(FieldMap::new()),
        }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<JsonKey> {
        self.fields().keys().cloned().collect()
    }

    pub fn iter(&self) -> Fields {
        Fields {
            fields: self.fields(),
            index: 0,
        }
    }

    /// The value of the top-level field `key`.
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.fields().get(key).map(|field| field.value().clone())
    }

    pub fn get_field(&self, key: &str) -> Option<JsonField> {
        self.fields().get(key).cloned()
    }

    /// The value at `pointer`; the empty pointer addresses this object.
    pub fn get_value(&self, pointer: &JsonPointer) -> Option<JsonValue> {
        let mut keys = pointer.iter();
        let Some(root) = keys.next() else {
            return Some(JsonValue::Object(self.clone()));
        };
        let mut value = self.get(root.as_str())?;
        for key in keys {
            value = match &value {
                JsonValue::Object(object) => object.get(key.as_str())?,
                _ => return None,
            };
        }
        Some(value)
    }

    pub fn contains(&self, pointer: &JsonPointer) -> bool {
        self.get_value(pointer).is_some()
    }

    /// The object holding only the value at `pointer`, nested along the
    /// pointer's keys. Empty if there is no such value.
    pub fn extract(&self, pointer: &JsonPointer) -> JsonObject {
        if pointer.is_empty() {
            return self.clone();
        }
        match self.get_value(pointer) {
            Some(value) => JsonObject::empty().set(pointer, value),
            None => JsonObject::empty(),
        }
    }

    /// Projects this object onto the pointers of `selector`.
    ///
    /// Pointers that do not resolve are ignored. Fields appear in the order in
    /// which the selector first mentions them.
    pub fn select(&self, selector: &JsonFieldSelector) -> JsonObject {
        if self.is_null() {
            return self.clone();
        }
        let trie = JsonFieldSelectorTrie::of(
            selector
                .pointers()
                .iter()
                .filter(|pointer| self.contains(pointer)),
        );
        if trie.is_terminal() {
            return self.clone();
        }
        self.project(&trie)
    }

    fn project(&self, trie: &JsonFieldSelectorTrie) -> JsonObject {
        let fields = self.fields();
        let mut projected = FieldMap::with_capacity(trie.len());
        for key in trie.keys() {
            let Some(field) = fields.get(key) else {
                continue;
            };
            let child_trie = trie.descend(key);
            if child_trie.is_terminal() || child_trie.is_empty() {
                projected.insert(key.clone(), field.clone());
                continue;
            }
            if let JsonValue::Object(child) = field.value() {
                if !child.is_null() {
                    let value = JsonValue::Object(child.project(&child_trie));
                    projected.insert(key.clone(), field.with_value(value));
                }
            }
        }
        JsonObject::from_fields(projected)
    }

    /// Sets `value` at `pointer`, creating intermediate objects where the
    /// path is absent or does not lead through objects.
    pub fn set(&self, pointer: &JsonPointer, value: impl Into<JsonValue>) -> JsonObject {
        self.set_at(pointer.keys(), value.into())
    }

    fn set_at(&self, keys: &[JsonKey], value: JsonValue) -> JsonObject {
        if self.is_null() {
            return self.clone();
        }
        match keys {
            [] => self.clone(),
            [key] => self.with_field_value(key, value),
            [key, rest @ ..] => {
                let child = match self.get(key.as_str()) {
                    Some(JsonValue::Object(child)) if !child.is_null() => child,
                    _ => JsonObject::empty(),
                };
                let child = child.set_at(rest, value);
                self.with_field_value(key, JsonValue::Object(child))
            }
        }
    }

    /// Sets `value` at the pointer given as string.
    pub fn set_value(&self, pointer: &str, value: impl Into<JsonValue>) -> Result<JsonObject> {
        let pointer = JsonPointer::of(pointer)?;
        Ok(self.set(&pointer, value))
    }

    /// Inserts or replaces the top-level field, keeping the position of a
    /// replaced field.
    pub fn set_field(&self, field: JsonField) -> JsonObject {
        if self.is_null() {
            return self.clone();
        }
        let mut fields = self.fields().as_ref().clone();
        fields.insert(field.key().clone(), field);
        JsonObject::from_fields(fields)
    }

    pub fn set_all(&self, fields: impl IntoIterator<Item = JsonField>) -> JsonObject {
        if self.is_null() {
            return self.clone();
        }
        let mut map = self.fields().as_ref().clone();
        for field in fields {
            map.insert(field.key().clone(), field);
        }
        JsonObject::from_fields(map)
    }

    fn with_field_value(&self, key: &JsonKey, value: JsonValue) -> JsonObject {
        let mut fields = self.fields().as_ref().clone();
        match fields.get_mut(key) {
            Some(field) => *field = field.with_value(value),
            None => {
                fields.insert(key.clone(), JsonField::new(key.clone(), value));
            }
        }
        JsonObject::from_fields(fields)
    }

    /// Removes the value at `pointer`. The object itself is returned if there
    /// is nothing to remove.
    pub fn remove(&self, pointer: &JsonPointer) -> JsonObject {
        self.remove_at(pointer.keys())
            .unwrap_or_else(|| self.clone())
    }

    fn remove_at(&self, keys: &[JsonKey]) -> Option<JsonObject> {
        if self.is_null() {
            return None;
        }
        match keys {
            [] => None,
            [key] => {
                let fields = self.fields();
                if !fields.contains_key(key) {
                    return None;
                }
                let mut fields = fields.as_ref().clone();
                fields.shift_remove(key);
                Some(JsonObject::from_fields(fields))
            }
            [key, rest @ ..] => match self.get(key.as_str()) {
                Some(JsonValue::Object(child)) => {
                    let child = child.remove_at(rest)?;
                    Some(self.with_field_value(key, JsonValue::Object(child)))
                }
                _ => None,
            },
        }
    }

    /// Maps the value at the definition's pointer to the definition's type.
    /// Absent values give `Ok(None)`.
    pub fn get_as<T>(&self, definition: &JsonFieldDefinition<T>) -> Result<Option<T>> {
        match self.get_value(definition.pointer()) {
            Some(value) => definition.map_value(&value).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`JsonObject::get_as`], but an absent value is an error.
    pub fn get_required<T>(&self, definition: &JsonFieldDefinition<T>) -> Result<T> {
        match self.get_as(definition)? {
            Some(value) => Ok(value),
            None => Err(Error::MissingField {
                pointer: definition.pointer().to_string(),
            }),
        }
    }

    /// Keeps the top-level fields matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&JsonField) -> bool) -> JsonObject {
        if self.is_null() {
            return self.clone();
        }
        let fields = self
            .fields()
            .iter()
            .filter(|(_, field)| predicate(field))
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect();
        JsonObject::from_fields(fields)
    }

    /// Keeps the top-level fields whose definition carries any of `markers`.
    pub fn filter_by_markers(&self, markers: &[FieldMarker]) -> JsonObject {
        self.filter(|field| field.is_marked_as_any(markers))
    }

    /// Drops the materialized fields if the JSON string of this object has
    /// already been computed; they are re-parsed from it on the next access.
    /// Field definitions do not survive re-parsing.
    pub fn release_structure(&self) -> bool {
        self.inner.as_ref().is_some_and(|cell| cell.release())
    }

    pub fn ptr_eq(&self, other: &JsonObject) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub(crate) fn repr(&self) -> Arc<str> {
        match &self.inner {
            Some(cell) => cell.repr(render_fields),
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

fn render_fields(fields: &FieldMap) -> String {
    let mut buf = String::with_capacity(2 + fields.len() * 16);
    buf.push('{');
    for (i, (key, field)) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        write_escaped_string(key.as_str(), &mut buf);
        buf.push(':');
        field.value().write_json(&mut buf);
    }
    buf.push('}');
    buf
}

/// Iterator over the fields of a [`JsonObject`].
pub struct Fields {
    fields: Arc<FieldMap>,
    index: usize,
}

impl Iterator for Fields {
    type Item = JsonField;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, field) = self.fields.get_index(self.index)?;
        self.index += 1;
        Some(field.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.fields.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Fields {}

impl IntoIterator for &JsonObject {
    type Item = JsonField;
    type IntoIter = Fields;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<JsonField> for JsonObject {
    fn from_iter<I: IntoIterator<Item = JsonField>>(iter: I) -> Self {
        JsonObject::from_fields(
            iter.into_iter()
                .map(|field| (field.key().clone(), field))
                .collect(),
        )
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                if Arc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.structure(), b.structure());
                a.len() == b.len()
                    && a.iter().all(|(key, field)| {
                        b.get(key)
                            .is_some_and(|other| field.value() == other.value())
                    })
            }
            _ => false,
        }
    }
}

impl Eq for JsonObject {}

impl Hash for JsonObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let fields = self.fields();
        fields.len().hash(state);
        // field order does not take part in equality
        let combined = fields.iter().fold(0_u64, |acc, (key, field)| {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            field.value().hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        combined.hash(state);
    }
}

impl Display for JsonObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}

impl Debug for JsonObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonObject({})", self.repr())
    }
}
