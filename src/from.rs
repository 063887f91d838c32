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

use num_traits::ToPrimitive;
use ordered_float::OrderedFloat;
use serde_json::Map as SerdeMap;
use serde_json::Number as SerdeNumber;
use serde_json::Value as SerdeValue;

use crate::JsonArray;
use crate::JsonField;
use crate::JsonKey;
use crate::JsonObject;
use crate::JsonString;
use crate::JsonValue;

macro_rules! from_int {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for JsonValue {
                fn from(n: $ty) -> Self {
                    JsonValue::Int(i32::from(n))
                }
            }
        )*
    };
}

macro_rules! from_long {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for JsonValue {
                fn from(n: $ty) -> Self {
                    JsonValue::Long(i64::from(n))
                }
            }
        )*
    };
}

macro_rules! from_unsigned_long {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for JsonValue {
                fn from(n: $ty) -> Self {
                    match n.to_i64() {
                        Some(v) => JsonValue::Long(v),
                        None => JsonValue::Double(n as f64),
                    }
                }
            }
        )*
    };
}

macro_rules! from_float {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for JsonValue {
                /// NaN and infinities have no JSON form and become `null`.
                fn from(n: $ty) -> Self {
                    let n = f64::from(n);
                    if n.is_finite() {
                        JsonValue::Double(n)
                    } else {
                        JsonValue::Null
                    }
                }
            }
        )*
    };
}

from_int! {
    i8 i16 i32 u8 u16
}

from_long! {
    i64 u32
}

from_unsigned_long! {
    u64 usize
}

from_float! {
    f32 f64
}

impl From<OrderedFloat<f64>> for JsonValue {
    fn from(f: OrderedFloat<f64>) -> Self {
        JsonValue::from(f.0)
    }
}

impl From<bool> for JsonValue {
    fn from(f: bool) -> Self {
        JsonValue::Bool(f)
    }
}

impl From<&str> for JsonValue {
    fn from(f: &str) -> Self {
        JsonValue::String(JsonString::new(f))
    }
}

impl From<String> for JsonValue {
    fn from(f: String) -> Self {
        JsonValue::String(JsonString::new(f))
    }
}

impl From<JsonString> for JsonValue {
    fn from(f: JsonString) -> Self {
        JsonValue::String(f)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(o: JsonObject) -> Self {
        JsonValue::Object(o)
    }
}

impl From<JsonArray> for JsonValue {
    fn from(a: JsonArray) -> Self {
        JsonValue::Array(a)
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(f: Vec<T>) -> Self {
        JsonValue::Array(JsonArray::of(f))
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(f: Option<T>) -> Self {
        match f {
            Some(v) => v.into(),
            None => JsonValue::Null,
        }
    }
}

impl From<()> for JsonValue {
    fn from((): ()) -> Self {
        JsonValue::Null
    }
}

impl<T: Into<JsonValue>> FromIterator<T> for JsonValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        JsonValue::Array(JsonArray::of(iter))
    }
}

impl From<&SerdeValue> for JsonValue {
    fn from(value: &SerdeValue) -> Self {
        match value {
            SerdeValue::Null => JsonValue::Null,
            SerdeValue::Bool(v) => JsonValue::Bool(*v),
            SerdeValue::Number(v) => {
                if let Some(n) = v.as_i64() {
                    return match n.to_i32() {
                        Some(n) => JsonValue::Int(n),
                        None => JsonValue::Long(n),
                    };
                }
                match v.as_f64() {
                    Some(n) => JsonValue::Double(n),
                    None => JsonValue::Null,
                }
            }
            SerdeValue::String(v) => JsonValue::from(v.as_str()),
            SerdeValue::Array(arr) => {
                JsonValue::Array(arr.iter().map(JsonValue::from).collect())
            }
            SerdeValue::Object(obj) => {
                // the empty key has no counterpart in a JSON object here
                let object = obj
                    .iter()
                    .filter_map(|(k, v)| {
                        let key = JsonKey::of(k).ok()?;
                        Some(JsonField::new(key, JsonValue::from(v)))
                    })
                    .collect();
                JsonValue::Object(object)
            }
        }
    }
}

impl From<SerdeValue> for JsonValue {
    fn from(value: SerdeValue) -> Self {
        (&value).into()
    }
}

impl From<&JsonValue> for SerdeValue {
    fn from(value: &JsonValue) -> Self {
        if value.is_null() {
            return SerdeValue::Null;
        }
        match value {
            JsonValue::Bool(v) => SerdeValue::Bool(*v),
            JsonValue::Int(n) => SerdeValue::Number((*n).into()),
            JsonValue::Long(n) => SerdeValue::Number((*n).into()),
            JsonValue::Double(n) => match SerdeNumber::from_f64(*n) {
                Some(n) => SerdeValue::Number(n),
                // If the value is NaN or Infinity, fallback to NULL
                None => SerdeValue::Null,
            },
            JsonValue::String(s) => SerdeValue::String(s.as_str().to_string()),
            JsonValue::Array(arr) => SerdeValue::Array(arr.iter().map(|v| (&v).into()).collect()),
            JsonValue::Object(obj) => {
                let mut map = SerdeMap::new();
                for field in obj.iter() {
                    map.insert(field.key().to_string(), field.value().into());
                }
                SerdeValue::Object(map)
            }
            JsonValue::Null => SerdeValue::Null,
        }
    }
}

impl From<JsonValue> for SerdeValue {
    fn from(value: JsonValue) -> Self {
        (&value).into()
    }
}
