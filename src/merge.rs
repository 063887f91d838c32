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

use std::fmt::Display;
use std::fmt::Formatter;

use crate::object::FieldMap;
use crate::JsonField;
use crate::JsonObject;
use crate::JsonValue;

/// A JSON Merge Patch (RFC 7396): an object patch is merged key by key,
/// `null` members delete, and any other patch value replaces the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonMergePatch {
    patch: JsonValue,
}

impl JsonMergePatch {
    pub fn of(patch: impl Into<JsonValue>) -> JsonMergePatch {
        JsonMergePatch {
            patch: patch.into(),
        }
    }

    /// The merge patch that turns `old` into `new`, or `None` if both are
    /// equal.
    pub fn compute(old: &JsonValue, new: &JsonValue) -> Option<JsonMergePatch> {
        diff(old, new).map(JsonMergePatch::of)
    }

    pub fn patch_value(&self) -> &JsonValue {
        &self.patch
    }

    pub fn apply_on(&self, value: &JsonValue) -> JsonValue {
        apply(value, &self.patch)
    }
}

impl Display for JsonMergePatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.patch)
    }
}

fn proper_object(value: &JsonValue) -> Option<&JsonObject> {
    match value {
        JsonValue::Object(object) if !object.is_null() => Some(object),
        _ => None,
    }
}

fn diff(old: &JsonValue, new: &JsonValue) -> Option<JsonValue> {
    if old == new {
        return None;
    }
    let (Some(old), Some(new)) = (proper_object(old), proper_object(new)) else {
        return Some(new.clone());
    };

    let old_fields = old.fields();
    let new_fields = new.fields();
    let mut patch = FieldMap::new();
    for (key, field) in new_fields.iter() {
        let change = match old_fields.get(key) {
            Some(previous) => diff(previous.value(), field.value()),
            None => Some(field.value().clone()),
        };
        if let Some(change) = change {
            patch.insert(key.clone(), JsonField::new(key.clone(), change));
        }
    }
    for key in old_fields.keys() {
        if !new_fields.contains_key(key) {
            patch.insert(key.clone(), JsonField::new(key.clone(), JsonValue::Null));
        }
    }
    Some(JsonValue::Object(JsonObject::from_fields(patch)))
}

fn apply(target: &JsonValue, patch: &JsonValue) -> JsonValue {
    let Some(patch) = proper_object(patch) else {
        return patch.clone();
    };
    let mut result = match proper_object(target) {
        Some(target) => target.fields().as_ref().clone(),
        None => FieldMap::new(),
    };
    for (key, field) in patch.fields().iter() {
        if field.value().is_null() {
            result.shift_remove(key);
            continue;
        }
        let merged = match result.get(key) {
            Some(existing) => apply(existing.value(), field.value()),
            None => apply(&JsonValue::Null, field.value()),
        };
        match result.get_mut(key) {
            Some(existing) => *existing = existing.with_value(merged),
            None => {
                result.insert(key.clone(), JsonField::new(key.clone(), merged));
            }
        }
    }
    JsonValue::Object(JsonObject::from_fields(result))
}

/// Deep-merges two objects, `value1` winning on conflicts.
///
/// Colliding object members merge recursively; any other collision, arrays
/// included, keeps the member of `value1`. Members only in `value2` are
/// appended.
pub fn merge_json_objects(value1: &JsonObject, value2: &JsonObject) -> JsonObject {
    if value1.is_null() {
        return value2.clone();
    }
    if value2.is_null() {
        return value1.clone();
    }
    let other = value2.fields();
    let mut merged = value1.fields().as_ref().clone();
    for (key, field) in merged.iter_mut() {
        let Some(other_field) = other.get(key) else {
            continue;
        };
        if let (Some(left), Some(right)) =
            (proper_object(field.value()), proper_object(other_field.value()))
        {
            let value = JsonValue::Object(merge_json_objects(left, right));
            *field = field.with_value(value);
        }
    }
    for (key, field) in other.iter() {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), field.clone());
        }
    }
    JsonObject::from_fields(merged)
}

/// Like [`merge_json_objects`], except that the `null` members of `value1`
/// are dropped first, at every level of nesting, so `value2` fills them in.
///
/// A non-object `value1` wins as is; an object `value1` is returned without
/// its `null` members when `value2` is not an object.
pub fn merge_json_values(value1: &JsonValue, value2: &JsonValue) -> JsonValue {
    let Some(left) = proper_object(value1) else {
        return value1.clone();
    };
    let left = without_nulls(left);
    match proper_object(value2) {
        Some(right) => JsonValue::Object(merge_json_objects(&left, right)),
        None => JsonValue::Object(left),
    }
}

fn without_nulls(object: &JsonObject) -> JsonObject {
    let fields = object
        .fields()
        .iter()
        .filter(|(_, field)| !field.value().is_null())
        .map(|(key, field)| {
            let field = match proper_object(field.value()) {
                Some(child) => field.with_value(JsonValue::Object(without_nulls(child))),
                None => field.clone(),
            };
            (key.clone(), field)
        })
        .collect::<FieldMap>();
    JsonObject::from_fields(fields)
}
