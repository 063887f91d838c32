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

use indexmap::IndexSet;

use crate::constants::*;
use crate::error::Result;
use crate::selector_parser::parse_field_selector;
use crate::FieldDefinition;
use crate::JsonParseOptions;
use crate::JsonPointer;

/// An ordered set of pointers describing a partial view of a JSON object.
///
/// Two selectors are equal if they hold the same pointers in the same order;
/// the string they were parsed from does not matter.
#[derive(Clone)]
pub struct JsonFieldSelector {
    pointers: IndexSet<JsonPointer>,
    original: Option<String>,
}

impl JsonFieldSelector {
    /// Parses a selector such as `thingId,attributes(location,model)`.
    pub fn of(selector: &str, options: &JsonParseOptions) -> Result<JsonFieldSelector> {
        let pointers = parse_field_selector(selector, options)?;
        Ok(JsonFieldSelector {
            pointers,
            original: Some(selector.to_string()),
        })
    }

    pub fn of_pointers(pointers: impl IntoIterator<Item = JsonPointer>) -> JsonFieldSelector {
        JsonFieldSelector {
            pointers: pointers.into_iter().collect(),
            original: None,
        }
    }

    pub fn of_pointer_strings<S: AsRef<str>>(
        pointers: impl IntoIterator<Item = S>,
    ) -> Result<JsonFieldSelector> {
        let pointers = pointers
            .into_iter()
            .map(|p| JsonPointer::of(p.as_ref()))
            .collect::<Result<IndexSet<_>>>()?;
        Ok(JsonFieldSelector {
            pointers,
            original: None,
        })
    }

    pub fn builder() -> FieldSelectorBuilder {
        FieldSelectorBuilder::default()
    }

    pub fn pointers(&self) -> &IndexSet<JsonPointer> {
        &self.pointers
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonPointer> {
        self.pointers.iter()
    }
}

impl PartialEq for JsonFieldSelector {
    fn eq(&self, other: &Self) -> bool {
        self.pointers.len() == other.pointers.len()
            && self.pointers.iter().zip(other.pointers.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for JsonFieldSelector {}

impl Hash for JsonFieldSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for pointer in &self.pointers {
            pointer.hash(state);
        }
    }
}

/// The string the selector was parsed from, or else its pointers joined by
/// commas, each without the leading slash.
impl Display for JsonFieldSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(original) = &self.original {
            return f.write_str(original);
        }
        for (i, pointer) in self.pointers.iter().enumerate() {
            if i > 0 {
                write!(f, "{SELECTOR_DELIMITER}")?;
            }
            let pointer = pointer.to_string();
            f.write_str(pointer.strip_prefix(POINTER_DELIMITER).unwrap_or(&pointer))?;
        }
        Ok(())
    }
}

impl Debug for JsonFieldSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFieldSelector")
            .field("pointers", &self.pointers)
            .finish()
    }
}

/// Collects pointers into a [`JsonFieldSelector`].
#[derive(Debug, Default)]
pub struct FieldSelectorBuilder {
    pointers: IndexSet<JsonPointer>,
}

impl FieldSelectorBuilder {
    pub fn add_pointer(&mut self, pointer: JsonPointer) -> &mut Self {
        self.pointers.insert(pointer);
        self
    }

    pub fn add_pointer_string(&mut self, pointer: &str) -> Result<&mut Self> {
        self.pointers.insert(JsonPointer::of(pointer)?);
        Ok(self)
    }

    pub fn add_field_definition(&mut self, definition: &dyn FieldDefinition) -> &mut Self {
        self.pointers.insert(definition.pointer().clone());
        self
    }

    /// Adds all pointers of a parsed selector string.
    pub fn add_selector(&mut self, selector: &str, options: &JsonParseOptions) -> Result<&mut Self> {
        self.pointers.extend(parse_field_selector(selector, options)?);
        Ok(self)
    }

    pub fn remove_pointer(&mut self, pointer: &JsonPointer) -> &mut Self {
        self.pointers.shift_remove(pointer);
        self
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn build(&self) -> JsonFieldSelector {
        JsonFieldSelector {
            pointers: self.pointers.clone(),
            original: None,
        }
    }
}
