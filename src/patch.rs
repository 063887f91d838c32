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
use std::str::FromStr;

use crate::constants::*;
use crate::error::Error;
use crate::error::Result;
use crate::JsonKey;
use crate::JsonObject;
use crate::JsonPointer;
use crate::JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOperation {
    Add,
    Remove,
    Replace,
}

impl PatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOperation::Add => "add",
            PatchOperation::Remove => "remove",
            PatchOperation::Replace => "replace",
        }
    }
}

impl FromStr for PatchOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("add") {
            Ok(PatchOperation::Add)
        } else if s.eq_ignore_ascii_case("remove") {
            Ok(PatchOperation::Remove)
        } else if s.eq_ignore_ascii_case("replace") {
            Ok(PatchOperation::Replace)
        } else {
            Err(Error::PatchInvalid(format!("unknown operation <{s}>")))
        }
    }
}

impl Display for PatchOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single JSON Patch operation on a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonPatch {
    operation: PatchOperation,
    path: JsonPointer,
    value: Option<JsonValue>,
}

impl JsonPatch {
    pub fn new(operation: PatchOperation, path: JsonPointer, value: Option<JsonValue>) -> JsonPatch {
        JsonPatch {
            operation,
            path,
            value,
        }
    }

    pub fn operation(&self) -> PatchOperation {
        self.operation
    }

    pub fn path(&self) -> &JsonPointer {
        &self.path
    }

    pub fn value(&self) -> Option<&JsonValue> {
        self.value.as_ref()
    }

    /// The patch as `{"op":..,"path":..,"value":..}`; `value` is left out if
    /// there is none.
    pub fn to_json(&self) -> JsonObject {
        let mut builder = JsonObject::builder();
        builder
            .set(JsonKey::new_unchecked(PATCH_OPERATION), self.operation.as_str())
            .set(JsonKey::new_unchecked(PATCH_PATH), self.path.to_string());
        if let Some(value) = &self.value {
            builder.set(JsonKey::new_unchecked(PATCH_VALUE), value.clone());
        }
        builder.build()
    }

    pub fn from_json(object: &JsonObject) -> Result<JsonPatch> {
        let operation = required_str(object, PATCH_OPERATION)?.parse()?;
        let path = JsonPointer::of(&required_str(object, PATCH_PATH)?)?;
        Ok(JsonPatch {
            operation,
            path,
            value: object.get(PATCH_VALUE),
        })
    }

    /// Applies the operation to `object`.
    ///
    /// `replace` requires an existing value at the path. At the empty path,
    /// `add` and `replace` swap in the patch value, which must be an object,
    /// and `remove` yields the empty object.
    pub fn apply_to(&self, object: &JsonObject) -> Result<JsonObject> {
        match self.operation {
            PatchOperation::Remove if self.path.is_empty() => Ok(JsonObject::empty()),
            PatchOperation::Remove => Ok(object.remove(&self.path)),
            PatchOperation::Add | PatchOperation::Replace => {
                let value = self.value.clone().ok_or_else(|| {
                    Error::PatchInvalid(format!(
                        "operation <{}> requires a value",
                        self.operation
                    ))
                })?;
                if self.operation == PatchOperation::Replace && !object.contains(&self.path) {
                    return Err(Error::MissingField {
                        pointer: self.path.to_string(),
                    });
                }
                if self.path.is_empty() {
                    return match value {
                        JsonValue::Object(replacement) => Ok(replacement),
                        other => Err(Error::PatchInvalid(format!(
                            "the root can only be replaced by an object, not by <{}>",
                            other.type_name()
                        ))),
                    };
                }
                Ok(object.set(&self.path, value))
            }
        }
    }
}

fn required_str(object: &JsonObject, key: &str) -> Result<String> {
    match object.get(key) {
        Some(JsonValue::String(s)) => Ok(s.as_str().to_string()),
        Some(other) => Err(Error::TypeMismatch {
            pointer: format!("{POINTER_DELIMITER}{key}"),
            expected: TYPE_STRING,
            found: other.type_name(),
        }),
        None => Err(Error::MissingField {
            pointer: format!("{POINTER_DELIMITER}{key}"),
        }),
    }
}

impl FromStr for JsonPatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        JsonPatch::from_json(&crate::parse_object(s)?)
    }
}

impl Display for JsonPatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
