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

use std::sync::Arc;

use crate::array::Elements;
use crate::constants::ROOT_POINTER;
use crate::error::Error;
use crate::error::Result;
use crate::object::FieldMap;
use crate::JsonArray;
use crate::JsonField;
use crate::JsonFieldDefinition;
use crate::JsonKey;
use crate::JsonObject;
use crate::JsonPointer;
use crate::JsonValue;

/// Mutable collector of array elements. Not meant to be shared between threads.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    elements: Elements,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, value: impl Into<JsonValue>) -> &mut Self {
        self.elements.push(value.into());
        self
    }

    /// Adds `value` only if `predicate` accepts it.
    pub fn add_if(
        &mut self,
        value: impl Into<JsonValue>,
        predicate: impl FnOnce(&JsonValue) -> bool,
    ) -> &mut Self {
        let value = value.into();
        if predicate(&value) {
            self.elements.push(value);
        }
        self
    }

    pub fn add_all<V: Into<JsonValue>>(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self {
        self.elements.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn set(&mut self, index: usize, value: impl Into<JsonValue>) -> Result<&mut Self> {
        let len = self.elements.len();
        match self.elements.get_mut(index) {
            Some(slot) => *slot = value.into(),
            None => return Err(Error::IndexOutOfBounds { index, len }),
        }
        Ok(self)
    }

    /// Removes the element at `index`; an out-of-range index is ignored.
    pub fn remove(&mut self, index: usize) -> &mut Self {
        if index < self.elements.len() {
            self.elements.remove(index);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn build(&self) -> JsonArray {
        JsonArray::from_elements(self.elements.clone())
    }
}

impl From<&JsonArray> for ArrayBuilder {
    fn from(array: &JsonArray) -> Self {
        Self {
            elements: array.to_vec(),
        }
    }
}

/// Mutable collector of object fields. Not meant to be shared between threads.
///
/// Fields keep the order in which their keys were first set.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    fields: FieldMap,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-level field `key`.
    pub fn set(&mut self, key: JsonKey, value: impl Into<JsonValue>) -> &mut Self {
        self.fields.insert(key.clone(), JsonField::new(key, value));
        self
    }

    /// Sets the top-level field `key` only if `predicate` accepts the value.
    pub fn set_if(
        &mut self,
        key: JsonKey,
        value: impl Into<JsonValue>,
        predicate: impl FnOnce(&JsonValue) -> bool,
    ) -> &mut Self {
        let value = value.into();
        if predicate(&value) {
            self.set(key, value);
        }
        self
    }

    /// Sets `value` at `pointer`, creating intermediate objects as needed.
    /// The empty pointer is ignored.
    pub fn set_pointer(&mut self, pointer: &JsonPointer, value: impl Into<JsonValue>) -> &mut Self {
        if let Some(leaf) = pointer.leaf() {
            let field = JsonField::new(leaf.clone(), value);
            self.set_field_at(pointer.cut_leaf().keys(), field);
        }
        self
    }

    /// Sets `value` at a pointer given as string. The single slash denotes
    /// the literal key `/`.
    pub fn set_str(&mut self, key_or_pointer: &str, value: impl Into<JsonValue>) -> Result<&mut Self> {
        if key_or_pointer == ROOT_POINTER {
            return Ok(self.set(JsonKey::new_unchecked(ROOT_POINTER), value));
        }
        if key_or_pointer.is_empty() {
            return Err(Error::KeyInvalid {
                key: String::new(),
                reason: "key must not be empty",
            });
        }
        let pointer = JsonPointer::of(key_or_pointer)?;
        Ok(self.set_pointer(&pointer, value))
    }

    /// Sets `value` at the definition's pointer; the created field carries
    /// the definition.
    pub fn set_by_definition<T: 'static>(
        &mut self,
        definition: &JsonFieldDefinition<T>,
        value: impl Into<JsonValue>,
    ) -> &mut Self {
        let pointer = definition.pointer();
        if let Some(leaf) = pointer.leaf() {
            let field = JsonField::with_definition(leaf.clone(), value, Arc::new(definition.clone()));
            self.set_field_at(pointer.cut_leaf().keys(), field);
        }
        self
    }

    pub fn set_field(&mut self, field: JsonField) -> &mut Self {
        self.fields.insert(field.key().clone(), field);
        self
    }

    pub fn set_field_if(
        &mut self,
        field: JsonField,
        predicate: impl FnOnce(&JsonField) -> bool,
    ) -> &mut Self {
        if predicate(&field) {
            self.set_field(field);
        }
        self
    }

    pub fn set_all(&mut self, fields: impl IntoIterator<Item = JsonField>) -> &mut Self {
        for field in fields {
            self.set_field(field);
        }
        self
    }

    pub fn set_all_if(
        &mut self,
        fields: impl IntoIterator<Item = JsonField>,
        predicate: impl Fn(&JsonField) -> bool,
    ) -> &mut Self {
        for field in fields {
            if predicate(&field) {
                self.set_field(field);
            }
        }
        self
    }

    fn set_field_at(&mut self, parents: &[JsonKey], field: JsonField) {
        let Some((key, rest)) = parents.split_first() else {
            self.set_field(field);
            return;
        };
        let mut child = match self.fields.get(key).map(JsonField::value) {
            Some(JsonValue::Object(child)) if !child.is_null() => ObjectBuilder::from(child),
            _ => ObjectBuilder::new(),
        };
        child.set_field_at(rest, field);
        let value = JsonValue::Object(child.build());
        match self.fields.get_mut(key) {
            Some(existing) => *existing = existing.with_value(value),
            None => {
                self.set(key.clone(), value);
            }
        }
    }

    /// Removes the top-level field `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.fields.shift_remove(key);
        self
    }

    /// Removes the value at `pointer`.
    pub fn remove_pointer(&mut self, pointer: &JsonPointer) -> &mut Self {
        match pointer.keys() {
            [] => {}
            [key] => {
                self.fields.shift_remove(key);
            }
            [key, ..] => {
                if let Some(field) = self.fields.get_mut(key) {
                    if let JsonValue::Object(child) = field.value() {
                        let removed = child.remove(&pointer.next_level());
                        if !removed.ptr_eq(child) {
                            *field = field.with_value(JsonValue::Object(removed));
                        }
                    }
                }
            }
        }
        self
    }

    pub fn remove_all(&mut self) -> &mut Self {
        self.fields.clear();
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn build(&self) -> JsonObject {
        JsonObject::from_fields(self.fields.clone())
    }
}

impl From<&JsonObject> for ObjectBuilder {
    fn from(object: &JsonObject) -> Self {
        Self {
            fields: object.fields().as_ref().clone(),
        }
    }
}
