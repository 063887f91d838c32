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

use crate::constants::*;

pub type Result<T> = std::result::Result<T, Error>;

/// The kind of syntax problem found while parsing JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorCode {
    InvalidEOF,
    InvalidNumberValue,
    InvalidStringValue,
    ExpectedSomeIdent,
    ExpectedSomeValue,
    ExpectedColon,
    ExpectedArrayCommaOrEnd,
    ExpectedObjectCommaOrEnd,
    UnexpectedTrailingCharacters,
    KeyMustBeAString,
    KeyMustNotBeEmpty,
    ControlCharacterWhileParsingString,
    InvalidEscaped(u8),
    InvalidHex(u8),
    UnexpectedEndOfHexEscape,
    ExpectedObject,
    ExpectedArray,
    ReadFailure(String),
}

impl Display for ParseErrorCode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ParseErrorCode::InvalidEOF => f.write_str("EOF while parsing a value"),
            ParseErrorCode::InvalidNumberValue => f.write_str("invalid number"),
            ParseErrorCode::InvalidStringValue => f.write_str("invalid string value"),
            ParseErrorCode::ExpectedSomeIdent => f.write_str("expected ident"),
            ParseErrorCode::ExpectedSomeValue => f.write_str("expected value"),
            ParseErrorCode::ExpectedColon => f.write_str("expected `:`"),
            ParseErrorCode::ExpectedArrayCommaOrEnd => f.write_str("expected `,` or `]`"),
            ParseErrorCode::ExpectedObjectCommaOrEnd => f.write_str("expected `,` or `}`"),
            ParseErrorCode::UnexpectedTrailingCharacters => f.write_str("trailing characters"),
            ParseErrorCode::KeyMustBeAString => f.write_str("key must be a string"),
            ParseErrorCode::KeyMustNotBeEmpty => f.write_str("key must not be empty"),
            ParseErrorCode::ControlCharacterWhileParsingString => {
                f.write_str("control character (\\u0000-\\u001F) found while parsing a string")
            }
            ParseErrorCode::InvalidEscaped(n) => write!(f, "invalid escaped '{:X}'", n),
            ParseErrorCode::InvalidHex(n) => write!(f, "invalid hex '{:X}'", n),
            ParseErrorCode::UnexpectedEndOfHexEscape => f.write_str("unexpected end of hex escape"),
            ParseErrorCode::ExpectedObject => f.write_str("expected JSON object"),
            ParseErrorCode::ExpectedArray => f.write_str("expected JSON array"),
            ParseErrorCode::ReadFailure(msg) => write!(f, "failed to read input: {msg}"),
        }
    }
}

/// Why a JSON pointer string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInvalidReason {
    ConsecutiveSlashes,
    LeadingOrTrailingSlash,
}

impl Display for PointerInvalidReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PointerInvalidReason::ConsecutiveSlashes => {
                f.write_str("consecutive slashes are not allowed")
            }
            PointerInvalidReason::LeadingOrTrailingSlash => {
                f.write_str("leading or trailing slashes are not allowed")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{code}, pos {pos}")]
    Syntax {
        code: ParseErrorCode,
        pos: usize,
        input: String,
    },
    #[error("value at <{pointer}> is not of type <{expected}> but <{found}>")]
    TypeMismatch {
        pointer: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("JSON pointer <{pointer}> is invalid: {reason}")]
    PointerInvalid {
        pointer: String,
        reason: PointerInvalidReason,
    },
    #[error("JSON key <{key}> is invalid: {reason}")]
    KeyInvalid { key: String, reason: &'static str },
    #[error("JSON field selector <{selector}> is invalid")]
    FieldSelectorInvalid {
        selector: String,
        description: String,
    },
    #[error("JSON field <{pointer}> is mandatory but missing")]
    MissingField { pointer: String },
    #[error("index {index} is out of bounds for JSON array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("JSON patch is invalid: {0}")]
    PatchInvalid(String),
    #[error("binary codec failure: {0}")]
    Codec(String),
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

impl Error {
    pub(crate) fn syntax(code: ParseErrorCode, pos: usize) -> Error {
        Error::Syntax {
            code,
            pos,
            input: String::new(),
        }
    }

    /// Attaches the original text to a syntax error raised deep inside the parser.
    pub(crate) fn with_input(self, text: &str) -> Error {
        match self {
            Error::Syntax { code, pos, .. } => Error::Syntax {
                code,
                pos,
                input: text.to_string(),
            },
            other => other,
        }
    }

    pub(crate) fn field_selector(selector: &str, description: impl Into<String>) -> Error {
        Error::FieldSelectorInvalid {
            selector: selector.to_string(),
            description: description.into(),
        }
    }

    /// Stable, dotted identifier of the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Syntax { .. } | Error::TypeMismatch { .. } => ERROR_CODE_JSON_INVALID,
            Error::PointerInvalid { .. } => ERROR_CODE_POINTER_INVALID,
            Error::KeyInvalid { .. } => ERROR_CODE_KEY_INVALID,
            Error::FieldSelectorInvalid { .. } => ERROR_CODE_FIELD_SELECTOR_INVALID,
            Error::MissingField { .. } => ERROR_CODE_FIELD_MISSING,
            Error::IndexOutOfBounds { .. } => ERROR_CODE_INDEX_OUT_OF_BOUNDS,
            Error::PatchInvalid(_) => ERROR_CODE_PATCH_INVALID,
            Error::Codec(_) => ERROR_CODE_CODEC,
            Error::Unsupported(_) => ERROR_CODE_UNSUPPORTED,
        }
    }

    /// Additional guidance on how to avoid the error, if there is any.
    pub fn description(&self) -> Option<String> {
        match self {
            Error::Syntax { input, .. } if !input.is_empty() => {
                Some(format!("Check the JSON text: {}", abbreviate(input)))
            }
            Error::PointerInvalid { .. } => {
                Some("Check that the JSON pointer does not contain empty segments.".to_string())
            }
            Error::KeyInvalid { .. } => Some(
                "JSON keys must not be empty and must not contain slashes or control characters."
                    .to_string(),
            ),
            Error::FieldSelectorInvalid { description, .. } => Some(description.clone()),
            Error::MissingField { .. } => {
                Some("Make sure the field is present in the JSON object.".to_string())
            }
            _ => None,
        }
    }

    /// A link to documentation about the error, if there is any.
    pub fn href(&self) -> Option<&'static str> {
        match self {
            Error::FieldSelectorInvalid { .. } => Some(FIELD_SELECTOR_HELP_LINK),
            _ => None,
        }
    }
}

fn abbreviate(input: &str) -> String {
    const MAX_CHARS: usize = 64;
    if input.chars().count() <= MAX_CHARS {
        return input.to_string();
    }
    let mut s: String = input.chars().take(MAX_CHARS).collect();
    s.push_str("...");
    s
}
