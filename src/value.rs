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

use num_traits::ToPrimitive;
use ordered_float::OrderedFloat;

use crate::constants::*;
use crate::JsonArray;
use crate::JsonObject;
use crate::JsonString;

/// An immutable JSON value.
///
/// Cloning is cheap: strings, arrays and objects are reference counted and
/// shared between all values derived from them.
///
/// Equality follows JSON semantics rather than the variant tag: `Int(5)` equals
/// `Long(5)`, while `Double(5.0)` equals neither. All null forms, the null
/// literal and the null-flavored object and array, are equal to each other.
#[derive(Clone, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(JsonString),
    Array(JsonArray),
    Object(JsonObject),
}

impl JsonValue {
    pub fn null_literal() -> JsonValue {
        JsonValue::Null
    }

    /// Type name as reported in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => TYPE_NULL,
            JsonValue::Bool(_) => TYPE_BOOLEAN,
            JsonValue::Int(_) => TYPE_INT,
            JsonValue::Long(_) => TYPE_LONG,
            JsonValue::Double(_) => TYPE_DOUBLE,
            JsonValue::String(_) => TYPE_STRING,
            JsonValue::Array(a) if a.is_null() => TYPE_NULL,
            JsonValue::Array(_) => TYPE_ARRAY,
            JsonValue::Object(o) if o.is_null() => TYPE_NULL,
            JsonValue::Object(_) => TYPE_OBJECT,
        }
    }

    /// True for the null literal and the null-flavored object and array.
    pub fn is_null(&self) -> bool {
        match self {
            JsonValue::Null => true,
            JsonValue::Array(a) => a.is_null(),
            JsonValue::Object(o) => o.is_null(),
            _ => false,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            JsonValue::Int(_) | JsonValue::Long(_) | JsonValue::Double(_)
        )
    }

    /// True for integral values in the `i32` range.
    pub fn is_int(&self) -> bool {
        self.as_i32().is_some()
    }

    /// True for all integral values.
    pub fn is_long(&self) -> bool {
        matches!(self, JsonValue::Int(_) | JsonValue::Long(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, JsonValue::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            JsonValue::Int(v) => Some(*v),
            JsonValue::Long(v) => v.to_i32(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Int(v) => Some(i64::from(*v)),
            JsonValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Int(v) => Some(f64::from(*v)),
            JsonValue::Long(v) => v.to_f64(),
            JsonValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The object view of this value. The null literal is viewed as the
    /// null-flavored object.
    pub fn as_object(&self) -> Option<JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o.clone()),
            JsonValue::Null => Some(JsonObject::null_object()),
            _ => None,
        }
    }

    /// The array view of this value. The null literal is viewed as the
    /// null-flavored array.
    pub fn as_array(&self) -> Option<JsonArray> {
        match self {
            JsonValue::Array(a) => Some(a.clone()),
            JsonValue::Null => Some(JsonArray::null_array()),
            _ => None,
        }
    }

    /// Like `to_string`, except that strings yield their raw content unquoted.
    pub fn format_as_string(&self) -> String {
        match self {
            JsonValue::String(s) => s.as_str().to_string(),
            other => other.to_string(),
        }
    }

    /// Whether both values share the same backing storage. Scalars, which
    /// have no shared storage, compare by value.
    pub fn ptr_eq(&self, other: &JsonValue) -> bool {
        match (self, other) {
            (JsonValue::String(a), JsonValue::String(b)) => a.ptr_eq(b),
            (JsonValue::Array(a), JsonValue::Array(b)) => a.ptr_eq(b),
            (JsonValue::Object(a), JsonValue::Object(b)) => a.ptr_eq(b),
            (JsonValue::String(_) | JsonValue::Array(_) | JsonValue::Object(_), _) => false,
            (a, b) => a == b,
        }
    }

    /// Appends the compact JSON text of this value to `buf`.
    ///
    /// Containers render from, and populate, their cached string.
    pub(crate) fn write_json(&self, buf: &mut String) {
        match self {
            JsonValue::Null => buf.push_str("null"),
            JsonValue::Bool(true) => buf.push_str("true"),
            JsonValue::Bool(false) => buf.push_str("false"),
            JsonValue::Int(v) => buf.push_str(itoa::Buffer::new().format(*v)),
            JsonValue::Long(v) => buf.push_str(itoa::Buffer::new().format(*v)),
            JsonValue::Double(v) => write_double(*v, buf),
            JsonValue::String(s) => buf.push_str(s.repr()),
            JsonValue::Array(a) => buf.push_str(&a.repr()),
            JsonValue::Object(o) => buf.push_str(&o.repr()),
        }
    }
}

/// Non-finite doubles have no JSON representation and are written as `null`.
pub(crate) fn write_double(v: f64, buf: &mut String) {
    if v.is_finite() {
        buf.push_str(ryu::Buffer::new().format_finite(v));
    } else {
        buf.push_str("null");
    }
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (a, b) if a.is_null() || b.is_null() => a.is_null() && b.is_null(),
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (
                JsonValue::Int(_) | JsonValue::Long(_),
                JsonValue::Int(_) | JsonValue::Long(_),
            ) => self.as_i64() == other.as_i64(),
            (JsonValue::Double(a), JsonValue::Double(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            (JsonValue::Object(a), JsonValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for JsonValue {}

impl Hash for JsonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_null() {
            0_u8.hash(state);
            return;
        }
        match self {
            JsonValue::Bool(v) => {
                1_u8.hash(state);
                v.hash(state);
            }
            JsonValue::Int(_) | JsonValue::Long(_) => {
                2_u8.hash(state);
                self.as_i64().hash(state);
            }
            JsonValue::Double(v) => {
                3_u8.hash(state);
                OrderedFloat(*v).hash(state);
            }
            JsonValue::String(s) => {
                4_u8.hash(state);
                s.hash(state);
            }
            JsonValue::Array(a) => {
                5_u8.hash(state);
                a.hash(state);
            }
            JsonValue::Object(o) => {
                6_u8.hash(state);
                o.hash(state);
            }
            JsonValue::Null => {}
        }
    }
}

impl Display for JsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonValue::String(s) => f.write_str(s.repr()),
            JsonValue::Array(a) => f.write_str(&a.repr()),
            JsonValue::Object(o) => f.write_str(&o.repr()),
            scalar => {
                let mut buf = String::new();
                scalar.write_json(&mut buf);
                f.write_str(&buf)
            }
        }
    }
}

impl Debug for JsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonValue::Null => f.debug_tuple("Null").finish(),
            JsonValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            JsonValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            JsonValue::Long(v) => f.debug_tuple("Long").field(v).finish(),
            JsonValue::Double(v) => f.debug_tuple("Double").field(v).finish(),
            JsonValue::String(v) => f.debug_tuple("String").field(v).finish(),
            JsonValue::Array(v) => Debug::fmt(v, f),
            JsonValue::Object(v) => Debug::fmt(v, f),
        }
    }
}
