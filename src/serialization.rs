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

use crate::error::Result;
use crate::util::escaped_len;
use crate::JsonArray;
use crate::JsonObject;
use crate::JsonValue;

/// Receiver of the events produced by [`JsonValue::write_value`].
///
/// Containers are announced with their number of entries; every object
/// entry is a `write_key` followed by the events of its value.
pub trait SerializationContext {
    fn write_null(&mut self) -> Result<()>;
    fn write_bool(&mut self, value: bool) -> Result<()>;
    fn write_i32(&mut self, value: i32) -> Result<()>;
    fn write_i64(&mut self, value: i64) -> Result<()>;
    fn write_f64(&mut self, value: f64) -> Result<()>;
    fn write_str(&mut self, value: &str) -> Result<()>;
    fn start_array(&mut self, len: usize) -> Result<()>;
    fn end_array(&mut self) -> Result<()>;
    fn start_object(&mut self, len: usize) -> Result<()>;
    fn write_key(&mut self, key: &str) -> Result<()>;
    fn end_object(&mut self) -> Result<()>;
}

const NULL_SIZE: usize = 4;
const BOOL_SIZE: usize = 5;
const INT_SIZE: usize = 11;
const LONG_SIZE: usize = 20;
const DOUBLE_SIZE: usize = 24;

impl JsonValue {
    /// Walks this value depth-first, reporting it to `context`.
    pub fn write_value<C: SerializationContext + ?Sized>(&self, context: &mut C) -> Result<()> {
        match self {
            JsonValue::Null => context.write_null(),
            JsonValue::Bool(v) => context.write_bool(*v),
            JsonValue::Int(v) => context.write_i32(*v),
            JsonValue::Long(v) => context.write_i64(*v),
            JsonValue::Double(v) => context.write_f64(*v),
            JsonValue::String(s) => context.write_str(s.as_str()),
            JsonValue::Array(a) => write_array(a, context),
            JsonValue::Object(o) => write_object(o, context),
        }
    }

    /// An upper bound of the length of the compact JSON text of this value,
    /// meant for sizing buffers.
    ///
    /// Containers whose text is cached answer with its exact length.
    pub fn upper_bound_for_string_size(&self) -> usize {
        match self {
            JsonValue::Null => NULL_SIZE,
            JsonValue::Bool(_) => BOOL_SIZE,
            JsonValue::Int(_) => INT_SIZE,
            JsonValue::Long(_) => LONG_SIZE,
            JsonValue::Double(_) => DOUBLE_SIZE,
            JsonValue::String(s) => s.repr_len(),
            JsonValue::Array(a) => array_size(a),
            JsonValue::Object(o) => object_size(o),
        }
    }
}

fn write_array<C: SerializationContext + ?Sized>(array: &JsonArray, context: &mut C) -> Result<()> {
    if array.is_null() {
        return context.write_null();
    }
    context.start_array(array.len())?;
    for value in array.iter() {
        value.write_value(context)?;
    }
    context.end_array()
}

fn write_object<C: SerializationContext + ?Sized>(
    object: &JsonObject,
    context: &mut C,
) -> Result<()> {
    if object.is_null() {
        return context.write_null();
    }
    let fields = object.fields();
    context.start_object(fields.len())?;
    for (key, field) in fields.iter() {
        context.write_key(key.as_str())?;
        field.value().write_value(context)?;
    }
    context.end_object()
}

fn array_size(array: &JsonArray) -> usize {
    if let Some(len) = array.cached_repr_len() {
        return len;
    }
    let elements: usize = array.iter().map(|v| v.upper_bound_for_string_size()).sum();
    // brackets and commas
    elements + array.len().max(1) + 1
}

fn object_size(object: &JsonObject) -> usize {
    if let Some(len) = object.cached_repr_len() {
        return len;
    }
    let fields = object.fields();
    let entries: usize = fields
        .iter()
        .map(|(key, field)| escaped_len(key.as_str()) + 1 + field.value().upper_bound_for_string_size())
        .sum();
    entries + fields.len().max(1) + 1
}
