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

// JSON text constants
pub(crate) const UNICODE_LEN: usize = 4;

// JSON text escape characters constants
pub(crate) const BS: char = '\x5C'; // \\ Backslash
pub(crate) const QU: char = '\x22'; // \" Double quotation mark
pub(crate) const SD: char = '\x2F'; // \/ Slash or divide
pub(crate) const BB: char = '\x08'; // \b Backspace
pub(crate) const FF: char = '\x0C'; // \f Formfeed Page Break
pub(crate) const NN: char = '\x0A'; // \n Newline
pub(crate) const RR: char = '\x0D'; // \r Carriage Return
pub(crate) const TT: char = '\x09'; // \t Horizontal Tab

// JSON pointer constants
pub(crate) const POINTER_DELIMITER: char = '/';
pub(crate) const ROOT_POINTER: &str = "/";
pub(crate) const TILDE: char = '~';
pub(crate) const ESCAPED_TILDE: &str = "~0";

// Field selector constants
pub(crate) const SELECTOR_DELIMITER: char = ',';
pub(crate) const GROUP_OPEN: char = '(';
pub(crate) const GROUP_CLOSE: char = ')';
pub(crate) const PLACEHOLDER_OPEN: &str = "{{";
pub(crate) const PLACEHOLDER_CLOSE: &str = "}}";
pub(crate) const FIELD_SELECTOR_HELP_LINK: &str =
    "https://www.rfc-editor.org/rfc/rfc6901#section-3";

pub(crate) const TYPE_NULL: &str = "null";
pub(crate) const TYPE_BOOLEAN: &str = "boolean";
pub(crate) const TYPE_INT: &str = "int";
pub(crate) const TYPE_LONG: &str = "long";
pub(crate) const TYPE_DOUBLE: &str = "double";
pub(crate) const TYPE_STRING: &str = "string";
pub(crate) const TYPE_ARRAY: &str = "array";
pub(crate) const TYPE_OBJECT: &str = "object";
pub(crate) const TYPE_ANY: &str = "value";

pub(crate) const ERROR_CODE_JSON_INVALID: &str = "json.invalid";
pub(crate) const ERROR_CODE_POINTER_INVALID: &str = "json.pointer.invalid";
pub(crate) const ERROR_CODE_KEY_INVALID: &str = "json.key.invalid";
pub(crate) const ERROR_CODE_FIELD_SELECTOR_INVALID: &str = "json.fieldselector.invalid";
pub(crate) const ERROR_CODE_FIELD_MISSING: &str = "json.field.missing";
pub(crate) const ERROR_CODE_INDEX_OUT_OF_BOUNDS: &str = "json.array.index.outofbounds";
pub(crate) const ERROR_CODE_PATCH_INVALID: &str = "json.patch.invalid";
pub(crate) const ERROR_CODE_CODEC: &str = "json.codec.failed";
pub(crate) const ERROR_CODE_UNSUPPORTED: &str = "json.unsupported";

// Patch document field names
pub(crate) const PATCH_OPERATION: &str = "op";
pub(crate) const PATCH_PATH: &str = "path";
pub(crate) const PATCH_VALUE: &str = "value";
