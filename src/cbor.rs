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

//! Binary CBOR form of JSON values, available with the `cbor` feature.
//!
//! Without the feature every entry point fails with [`Error::Unsupported`].

use crate::error::Error;
use crate::error::Result;
use crate::JsonValue;

/// Whether this build can encode and decode CBOR.
pub fn is_cbor_available() -> bool {
    cfg!(feature = "cbor")
}

#[cfg(feature = "cbor")]
pub fn to_cbor(value: &JsonValue) -> Result<Vec<u8>> {
    let mut writer = codec::CborValueWriter::default();
    value.write_value(&mut writer)?;
    let cbor = writer.finish()?;
    let mut out = Vec::with_capacity(value.upper_bound_for_string_size());
    ciborium::ser::into_writer(&cbor, &mut out).map_err(|e| Error::Codec(e.to_string()))?;
    Ok(out)
}

#[cfg(feature = "cbor")]
pub fn from_cbor(data: &[u8]) -> Result<JsonValue> {
    let cbor: ciborium::value::Value =
        ciborium::de::from_reader(data).map_err(|e| Error::Codec(e.to_string()))?;
    codec::to_json_value(cbor)
}

#[cfg(not(feature = "cbor"))]
pub fn to_cbor(_value: &JsonValue) -> Result<Vec<u8>> {
    tracing::debug!("CBOR requested but the `cbor` feature is disabled");
    Err(Error::Unsupported("CBOR encoding"))
}

#[cfg(not(feature = "cbor"))]
pub fn from_cbor(_data: &[u8]) -> Result<JsonValue> {
    tracing::debug!("CBOR requested but the `cbor` feature is disabled");
    Err(Error::Unsupported("CBOR decoding"))
}

#[cfg(feature = "cbor")]
mod codec {
    use ciborium::value::Integer;
    use ciborium::value::Value as CborValue;
    use num_traits::ToPrimitive;

    use crate::array::Elements;
    use crate::error::Error;
    use crate::error::Result;
    use crate::object::FieldMap;
    use crate::JsonArray;
    use crate::JsonField;
    use crate::JsonKey;
    use crate::JsonObject;
    use crate::JsonValue;
    use crate::SerializationContext;

    enum Frame {
        Array(Vec<CborValue>),
        Map(Vec<(CborValue, CborValue)>, Option<String>),
    }

    /// Assembles a CBOR value tree from serialization events.
    #[derive(Default)]
    pub(super) struct CborValueWriter {
        stack: Vec<Frame>,
        root: Option<CborValue>,
    }

    impl CborValueWriter {
        pub(super) fn finish(self) -> Result<CborValue> {
            if !self.stack.is_empty() {
                return Err(Error::Codec("unterminated container".to_string()));
            }
            self.root
                .ok_or_else(|| Error::Codec("no value written".to_string()))
        }

        fn emit(&mut self, value: CborValue) -> Result<()> {
            match self.stack.last_mut() {
                Some(Frame::Array(elements)) => elements.push(value),
                Some(Frame::Map(entries, key)) => match key.take() {
                    Some(key) => entries.push((CborValue::Text(key), value)),
                    None => return Err(Error::Codec("map value without key".to_string())),
                },
                None => self.root = Some(value),
            }
            Ok(())
        }
    }

    impl SerializationContext for CborValueWriter {
        fn write_null(&mut self) -> Result<()> {
            self.emit(CborValue::Null)
        }

        fn write_bool(&mut self, value: bool) -> Result<()> {
            self.emit(CborValue::Bool(value))
        }

        fn write_i32(&mut self, value: i32) -> Result<()> {
            self.emit(CborValue::Integer(Integer::from(value)))
        }

        fn write_i64(&mut self, value: i64) -> Result<()> {
            self.emit(CborValue::Integer(Integer::from(value)))
        }

        fn write_f64(&mut self, value: f64) -> Result<()> {
            self.emit(CborValue::Float(value))
        }

        fn write_str(&mut self, value: &str) -> Result<()> {
            self.emit(CborValue::Text(value.to_string()))
        }

        fn start_array(&mut self, len: usize) -> Result<()> {
            self.stack.push(Frame::Array(Vec::with_capacity(len)));
            Ok(())
        }

        fn end_array(&mut self) -> Result<()> {
            match self.stack.pop() {
                Some(Frame::Array(elements)) => self.emit(CborValue::Array(elements)),
                _ => Err(Error::Codec("unbalanced array".to_string())),
            }
        }

        fn start_object(&mut self, len: usize) -> Result<()> {
            self.stack.push(Frame::Map(Vec::with_capacity(len), None));
            Ok(())
        }

        fn write_key(&mut self, key: &str) -> Result<()> {
            match self.stack.last_mut() {
                Some(Frame::Map(_, pending)) => {
                    *pending = Some(key.to_string());
                    Ok(())
                }
                _ => Err(Error::Codec("key outside of map".to_string())),
            }
        }

        fn end_object(&mut self) -> Result<()> {
            match self.stack.pop() {
                Some(Frame::Map(entries, None)) => self.emit(CborValue::Map(entries)),
                _ => Err(Error::Codec("unbalanced map".to_string())),
            }
        }
    }

    pub(super) fn to_json_value(cbor: CborValue) -> Result<JsonValue> {
        match cbor {
            CborValue::Null => Ok(JsonValue::Null),
            CborValue::Bool(v) => Ok(JsonValue::Bool(v)),
            CborValue::Integer(v) => {
                let v = i128::from(v);
                Ok(match (v.to_i32(), v.to_i64()) {
                    (Some(v), _) => JsonValue::Int(v),
                    (None, Some(v)) => JsonValue::Long(v),
                    _ => JsonValue::Double(v as f64),
                })
            }
            CborValue::Float(v) => Ok(JsonValue::from(v)),
            CborValue::Text(v) => Ok(JsonValue::from(v)),
            CborValue::Array(values) => {
                let elements = values
                    .into_iter()
                    .map(to_json_value)
                    .collect::<Result<Elements>>()?;
                Ok(JsonValue::Array(JsonArray::from_elements(elements)))
            }
            CborValue::Map(entries) => {
                let mut fields = FieldMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let CborValue::Text(key) = key else {
                        return Err(Error::Codec("map keys must be text".to_string()));
                    };
                    let key = JsonKey::of(&key)?;
                    fields.insert(key.clone(), JsonField::new(key, to_json_value(value)?));
                }
                Ok(JsonValue::Object(JsonObject::from_fields(fields)))
            }
            CborValue::Bytes(_) => Err(Error::Codec("byte strings have no JSON form".to_string())),
            CborValue::Tag(tag, _) => Err(Error::Codec(format!("unsupported CBOR tag {tag}"))),
            _ => Err(Error::Codec("unsupported CBOR item".to_string())),
        }
    }
}
