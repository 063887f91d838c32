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

//! `json_tree` is an immutable JSON document model. Values are trees of
//! [`JsonValue`] nodes that are never modified in place: every operation that
//! "changes" a value returns a new one, sharing all untouched subtrees with
//! the original.
//!
//! ## Features
//!
//! - Addressing: [`JsonKey`] and [`JsonPointer`] name locations inside an object.
//! - Projection: a [`JsonFieldSelector`] such as `thingId,attributes(location,model)`
//!   selects a partial view of an object with [`JsonObject::select`].
//! - Patching: single-operation [`JsonPatch`] and RFC 7396 [`JsonMergePatch`], plus
//!   the first-wins mergers [`merge_json_objects`] and [`merge_json_values`].
//! - Parsing: a recursive-descent parser reporting events to a [`ParseHandler`].
//! - Serialization: compact JSON text cached per container, `serde` support, a
//!   [`SerializationContext`] hook for binary codecs and optional CBOR.
//!
//! ## String and structure
//!
//! Arrays and objects keep their compact JSON text once it has been computed.
//! With the text cached, the materialized structure can be released by
//! [`JsonObject::release_structure`] and is re-parsed from the text on the next
//! access.
//!
//! ```
//! use json_tree::JsonFieldSelector;
//! use json_tree::JsonParseOptions;
//!
//! let object = json_tree::parse_object(r#"{"a":{"b":{"c":23,"d":"x"},"e":10},"f":false}"#)?;
//! let selector = JsonFieldSelector::of("a(b/c,e),f", &JsonParseOptions::default())?;
//! assert_eq!(object.select(&selector).to_string(), r#"{"a":{"b":{"c":23},"e":10},"f":false}"#);
//! # Ok::<(), json_tree::Error>(())
//! ```

#![allow(clippy::uninlined_format_args)]

mod array;
mod builder;
pub mod cbor;
mod constants;
mod error;
mod field;
mod from;
mod key;
mod merge;
mod object;
mod options;
mod parser;
mod patch;
mod pointer;
mod selector;
mod selector_parser;
mod ser;
mod serialization;
mod soft_cell;
mod string;
mod trie;
mod util;
mod value;

pub use array::ArrayIter;
pub use array::JsonArray;
pub use builder::ArrayBuilder;
pub use builder::ObjectBuilder;
pub use error::Error;
pub use error::ParseErrorCode;
pub use error::PointerInvalidReason;
pub use error::Result;
pub use field::FieldDefinition;
pub use field::FieldMarker;
pub use field::JsonField;
pub use field::JsonFieldDefinition;
pub use key::JsonKey;
pub use merge::merge_json_objects;
pub use merge::merge_json_values;
pub use merge::JsonMergePatch;
pub use object::Fields;
pub use object::JsonObject;
pub use options::JsonParseOptions;
pub use options::JsonParseOptionsBuilder;
pub use parser::parse_array;
pub use parser::parse_object;
pub use parser::parse_value;
pub use parser::parse_value_from_reader;
pub use parser::parse_with;
pub use parser::ParseHandler;
pub use patch::JsonPatch;
pub use patch::PatchOperation;
pub use pointer::JsonPointer;
pub use selector::FieldSelectorBuilder;
pub use selector::JsonFieldSelector;
pub use serialization::SerializationContext;
pub use string::JsonString;
pub use trie::JsonFieldSelectorTrie;
pub use value::JsonValue;
