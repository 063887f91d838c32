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
use std::sync::Arc;

use crate::constants::*;
use crate::error::Error;
use crate::error::Result;
use crate::JsonArray;
use crate::JsonKey;
use crate::JsonObject;
use crate::JsonPointer;
use crate::JsonValue;

/// An opaque, user-defined tag attached to field definitions, e.g. a schema
/// version or a visibility class.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldMarker(Arc<str>);

impl FieldMarker {
    pub fn new(name: impl AsRef<str>) -> FieldMarker {
        FieldMarker(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Debug for FieldMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldMarker({})", &*self.0)
    }
}

/// The type-erased view of a [`JsonFieldDefinition`] carried by a [`JsonField`].
pub trait FieldDefinition: Send + Sync + Debug {
    fn pointer(&self) -> &JsonPointer;

    /// Name of the expected value type, used in type mismatch errors.
    fn type_name(&self) -> &'static str;

    fn markers(&self) -> &[FieldMarker];

    /// Whether `value` can be mapped to the expected type.
    fn is_type_of(&self, value: &JsonValue) -> bool;

    fn is_marked_as(&self, marker: &FieldMarker) -> bool {
        self.markers().contains(marker)
    }
}

type Checker = Arc<dyn Fn(&JsonValue) -> bool + Send + Sync>;
type Mapper<T> = Arc<dyn Fn(&JsonValue) -> Option<T> + Send + Sync>;

/// Binds a pointer to an expected value type for typed field access.
///
/// The type is described by a checker deciding whether a JSON value is
/// acceptable and a mapper converting an accepted value to `T`.
pub struct JsonFieldDefinition<T> {
    pointer: JsonPointer,
    type_name: &'static str,
    checker: Checker,
    mapper: Mapper<T>,
    markers: Vec<FieldMarker>,
}

impl<T> JsonFieldDefinition<T> {
    pub fn new(
        pointer: JsonPointer,
        type_name: &'static str,
        checker: impl Fn(&JsonValue) -> bool + Send + Sync + 'static,
        mapper: impl Fn(&JsonValue) -> Option<T> + Send + Sync + 'static,
    ) -> JsonFieldDefinition<T> {
        JsonFieldDefinition {
            pointer,
            type_name,
            checker: Arc::new(checker),
            mapper: Arc::new(mapper),
            markers: Vec::new(),
        }
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn markers(&self) -> &[FieldMarker] {
        &self.markers
    }

    /// Adds a marker to the definition.
    pub fn mark_as(mut self, marker: FieldMarker) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// Checks `value` and maps it to `T`.
    pub fn map_value(&self, value: &JsonValue) -> Result<T> {
        if (self.checker)(value) {
            if let Some(mapped) = (self.mapper)(value) {
                return Ok(mapped);
            }
        }
        Err(Error::TypeMismatch {
            pointer: self.pointer.to_string(),
            expected: self.type_name,
            found: value.type_name(),
        })
    }
}

impl JsonFieldDefinition<String> {
    pub fn of_string(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(pointer, TYPE_STRING, JsonValue::is_string, |v| {
            v.as_str().map(str::to_string)
        })
    }
}

impl JsonFieldDefinition<i32> {
    pub fn of_int(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(pointer, TYPE_INT, JsonValue::is_int, JsonValue::as_i32)
    }
}

impl JsonFieldDefinition<i64> {
    pub fn of_long(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(pointer, TYPE_LONG, JsonValue::is_long, JsonValue::as_i64)
    }
}

impl JsonFieldDefinition<f64> {
    pub fn of_double(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(pointer, TYPE_DOUBLE, JsonValue::is_number, JsonValue::as_f64)
    }
}

impl JsonFieldDefinition<bool> {
    pub fn of_bool(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(pointer, TYPE_BOOLEAN, JsonValue::is_boolean, JsonValue::as_bool)
    }
}

impl JsonFieldDefinition<JsonObject> {
    /// A JSON `null` is accepted and mapped to the null-flavored object.
    pub fn of_object(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(
            pointer,
            TYPE_OBJECT,
            |v| v.is_object() || v.is_null(),
            JsonValue::as_object,
        )
    }
}

impl JsonFieldDefinition<JsonArray> {
    /// A JSON `null` is accepted and mapped to the null-flavored array.
    pub fn of_array(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(
            pointer,
            TYPE_ARRAY,
            |v| v.is_array() || v.is_null(),
            JsonValue::as_array,
        )
    }
}

impl JsonFieldDefinition<JsonValue> {
    pub fn of_value(pointer: JsonPointer) -> Self {
        JsonFieldDefinition::new(pointer, TYPE_ANY, |_| true, |v| Some(v.clone()))
    }
}

impl<T> Clone for JsonFieldDefinition<T> {
    fn clone(&self) -> Self {
        JsonFieldDefinition {
            pointer: self.pointer.clone(),
            type_name: self.type_name,
            checker: self.checker.clone(),
            mapper: self.mapper.clone(),
            markers: self.markers.clone(),
        }
    }
}

impl<T> Debug for JsonFieldDefinition<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFieldDefinition")
            .field("pointer", &self.pointer)
            .field("type_name", &self.type_name)
            .field("markers", &self.markers)
            .finish()
    }
}

impl<T: 'static> FieldDefinition for JsonFieldDefinition<T> {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn markers(&self) -> &[FieldMarker] {
        &self.markers
    }

    fn is_type_of(&self, value: &JsonValue) -> bool {
        (self.checker)(value)
    }
}

/// A key-value pair of a [`JsonObject`], optionally described by a definition.
///
/// Equality and hashing ignore the definition.
#[derive(Clone)]
pub struct JsonField {
    key: JsonKey,
    value: JsonValue,
    definition: Option<Arc<dyn FieldDefinition>>,
}

impl JsonField {
    pub fn new(key: JsonKey, value: impl Into<JsonValue>) -> JsonField {
        JsonField {
            key,
            value: value.into(),
            definition: None,
        }
    }

    pub fn with_definition(
        key: JsonKey,
        value: impl Into<JsonValue>,
        definition: Arc<dyn FieldDefinition>,
    ) -> JsonField {
        JsonField {
            key,
            value: value.into(),
            definition: Some(definition),
        }
    }

    pub fn key(&self) -> &JsonKey {
        &self.key
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    pub fn definition(&self) -> Option<&Arc<dyn FieldDefinition>> {
        self.definition.as_ref()
    }

    /// A field without definition is not marked at all.
    pub fn is_marked_as(&self, marker: &FieldMarker) -> bool {
        self.definition
            .as_ref()
            .is_some_and(|definition| definition.is_marked_as(marker))
    }

    pub fn is_marked_as_any(&self, markers: &[FieldMarker]) -> bool {
        markers.iter().any(|marker| self.is_marked_as(marker))
    }

    /// Replaces the value, keeping key and definition.
    pub(crate) fn with_value(&self, value: JsonValue) -> JsonField {
        JsonField {
            key: self.key.clone(),
            value,
            definition: self.definition.clone(),
        }
    }
}

impl PartialEq for JsonField {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Eq for JsonField {}

impl std::hash::Hash for JsonField {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl Display for JsonField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut buf = String::new();
        crate::util::write_escaped_string(self.key.as_str(), &mut buf);
        write!(f, "{buf}:{}", self.value)
    }
}

impl Debug for JsonField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
