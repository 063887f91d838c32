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

use std::io::Read;
use std::str::FromStr;

use super::array::Elements;
use super::error::Error;
use super::error::ParseErrorCode;
use super::error::Result;
use super::object::FieldMap;
use super::soft_cell::Rederive;
use super::util::parse_string;
use crate::JsonArray;
use crate::JsonField;
use crate::JsonKey;
use crate::JsonObject;
use crate::JsonString;
use crate::JsonValue;

type HandlerResult = std::result::Result<(), ParseErrorCode>;

/// Receives the events of a parse run, in document order.
///
/// Scalar events default to [`ParseHandler::value`], so a handler that treats
/// all scalars alike only implements that one.
pub trait ParseHandler {
    fn start_object(&mut self) -> HandlerResult;

    fn object_key(&mut self, key: String) -> HandlerResult;

    fn end_object(&mut self) -> HandlerResult;

    fn start_array(&mut self) -> HandlerResult;

    fn end_array(&mut self) -> HandlerResult;

    fn value(&mut self, value: JsonValue) -> HandlerResult;

    fn null(&mut self) -> HandlerResult {
        self.value(JsonValue::Null)
    }

    fn boolean(&mut self, value: bool) -> HandlerResult {
        self.value(JsonValue::Bool(value))
    }

    fn string(&mut self, value: String) -> HandlerResult {
        self.value(JsonValue::String(JsonString::new(value)))
    }

    /// `value` is one of the numeric variants.
    fn number(&mut self, value: JsonValue) -> HandlerResult {
        self.value(value)
    }
}

/// Parses JSON text into a [`JsonValue`].
pub fn parse_value(text: &str) -> Result<JsonValue> {
    let mut handler = TreeHandler::new(false);
    parse_with(text, &mut handler)?;
    handler.into_value().map_err(|code| fail(text, code, 0))
}

/// Parses JSON text that must hold an object. A JSON `null` gives the
/// null-flavored object.
pub fn parse_object(text: &str) -> Result<JsonObject> {
    match parse_value(text)? {
        JsonValue::Object(object) => Ok(object),
        JsonValue::Null => Ok(JsonObject::null_object()),
        _ => Err(fail(text, ParseErrorCode::ExpectedObject, 0)),
    }
}

/// Parses JSON text that must hold an array. A JSON `null` gives the
/// null-flavored array.
pub fn parse_array(text: &str) -> Result<JsonArray> {
    match parse_value(text)? {
        JsonValue::Array(array) => Ok(array),
        JsonValue::Null => Ok(JsonArray::null_array()),
        _ => Err(fail(text, ParseErrorCode::ExpectedArray, 0)),
    }
}

/// Reads the whole of `reader` and parses it into a [`JsonValue`].
pub fn parse_value_from_reader(mut reader: impl Read) -> Result<JsonValue> {
    let mut text = String::new();
    if let Err(err) = reader.read_to_string(&mut text) {
        return Err(fail(&text, ParseErrorCode::ReadFailure(err.to_string()), 0));
    }
    parse_value(&text)
}

/// Runs the parser over `text`, reporting every event to `handler`.
pub fn parse_with<H: ParseHandler>(text: &str, handler: &mut H) -> Result<()> {
    let mut parser = Parser::new(text.as_bytes(), handler);
    parser.parse().map_err(|err| {
        if let Error::Syntax { code, pos, .. } = &err {
            tracing::debug!(%code, pos, "failed to parse JSON text");
        }
        err.with_input(text)
    })
}

fn fail(text: &str, code: ParseErrorCode, pos: usize) -> Error {
    tracing::debug!(%code, pos, "failed to parse JSON text");
    Error::syntax(code, pos).with_input(text)
}

/// Parses the fields of a top-level object without wrapping them into a
/// [`JsonObject`].
pub(crate) fn parse_fields(text: &str) -> Result<FieldMap> {
    let mut handler = TreeHandler::new(true);
    parse_with(text, &mut handler)?;
    match handler.root {
        Some(Root::Fields(fields)) => Ok(fields),
        _ => Err(fail(text, ParseErrorCode::ExpectedObject, 0)),
    }
}

/// Parses the elements of a top-level array without wrapping them into a
/// [`JsonArray`].
pub(crate) fn parse_elements(text: &str) -> Result<Elements> {
    let mut handler = TreeHandler::new(true);
    parse_with(text, &mut handler)?;
    match handler.root {
        Some(Root::Elements(elements)) => Ok(elements),
        _ => Err(fail(text, ParseErrorCode::ExpectedArray, 0)),
    }
}

impl Rederive for FieldMap {
    fn rederive(repr: &str) -> Result<Self> {
        parse_fields(repr)
    }
}

impl Rederive for Elements {
    fn rederive(repr: &str) -> Result<Self> {
        parse_elements(repr)
    }
}

impl FromStr for JsonValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_value(s)
    }
}

impl FromStr for JsonObject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_object(s)
    }
}

impl FromStr for JsonArray {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_array(s)
    }
}

enum Frame {
    Array(Elements),
    Object(FieldMap, Option<JsonKey>),
}

enum Root {
    Value(JsonValue),
    Fields(FieldMap),
    Elements(Elements),
}

/// Builds the value tree from parse events.
///
/// With `bare_root` set, a top-level array or object is kept as its plain
/// collection, while nested containers still become full values.
struct TreeHandler {
    stack: Vec<Frame>,
    root: Option<Root>,
    bare_root: bool,
}

impl TreeHandler {
    fn new(bare_root: bool) -> TreeHandler {
        TreeHandler {
            stack: Vec::new(),
            root: None,
            bare_root,
        }
    }

    fn into_value(self) -> std::result::Result<JsonValue, ParseErrorCode> {
        match self.root {
            Some(Root::Value(value)) => Ok(value),
            Some(Root::Fields(fields)) => Ok(JsonValue::Object(JsonObject::from_fields(fields))),
            Some(Root::Elements(elements)) => {
                Ok(JsonValue::Array(JsonArray::from_elements(elements)))
            }
            None => Err(ParseErrorCode::InvalidEOF),
        }
    }

    fn close(&mut self, frame: Frame) -> HandlerResult {
        if self.stack.is_empty() && self.bare_root {
            self.root = Some(match frame {
                Frame::Array(elements) => Root::Elements(elements),
                Frame::Object(fields, _) => Root::Fields(fields),
            });
            return Ok(());
        }
        let value = match frame {
            Frame::Array(elements) => JsonValue::Array(JsonArray::from_elements(elements)),
            Frame::Object(fields, _) => JsonValue::Object(JsonObject::from_fields(fields)),
        };
        self.value(value)
    }
}

impl ParseHandler for TreeHandler {
    fn start_object(&mut self) -> HandlerResult {
        self.stack.push(Frame::Object(FieldMap::new(), None));
        Ok(())
    }

    fn object_key(&mut self, key: String) -> HandlerResult {
        if key.is_empty() {
            return Err(ParseErrorCode::KeyMustNotBeEmpty);
        }
        match self.stack.last_mut() {
            Some(Frame::Object(_, slot)) => {
                *slot = Some(JsonKey::new_unchecked(&key));
                Ok(())
            }
            _ => Err(ParseErrorCode::KeyMustBeAString),
        }
    }

    fn end_object(&mut self) -> HandlerResult {
        match self.stack.pop() {
            Some(frame @ Frame::Object(..)) => self.close(frame),
            _ => Err(ParseErrorCode::ExpectedObjectCommaOrEnd),
        }
    }

    fn start_array(&mut self) -> HandlerResult {
        self.stack.push(Frame::Array(Elements::new()));
        Ok(())
    }

    fn end_array(&mut self) -> HandlerResult {
        match self.stack.pop() {
            Some(frame @ Frame::Array(_)) => self.close(frame),
            _ => Err(ParseErrorCode::ExpectedArrayCommaOrEnd),
        }
    }

    fn value(&mut self, value: JsonValue) -> HandlerResult {
        match self.stack.last_mut() {
            Some(Frame::Array(elements)) => elements.push(value),
            Some(Frame::Object(fields, slot)) => {
                let key = slot.take().ok_or(ParseErrorCode::ExpectedColon)?;
                // a repeated key replaces the earlier value in place
                fields.insert(key.clone(), JsonField::new(key, value));
            }
            None => self.root = Some(Root::Value(value)),
        }
        Ok(())
    }
}

// Parse JSON text with a hand-written recursive descent.
// Inspired by `https://github.com/jorgecarleitao/json-deserializer`
struct Parser<'a, H> {
    buf: &'a [u8],
    idx: usize,
    handler: &'a mut H,
}

impl<'a, H: ParseHandler> Parser<'a, H> {
    fn new(buf: &'a [u8], handler: &'a mut H) -> Parser<'a, H> {
        Self {
            buf,
            idx: 0,
            handler,
        }
    }

    fn parse(&mut self) -> Result<()> {
        self.parse_json_value()?;
        self.skip_unused();
        if self.idx < self.buf.len() {
            self.step();
            return Err(self.error(ParseErrorCode::UnexpectedTrailingCharacters));
        }
        Ok(())
    }

    fn parse_json_value(&mut self) -> Result<()> {
        self.skip_unused();
        let c = self.next()?;
        match c {
            b'n' => self.parse_json_null(),
            b't' => self.parse_json_true(),
            b'f' => self.parse_json_false(),
            b'0'..=b'9' | b'-' => self.parse_json_number(),
            b'"' => {
                let s = self.parse_json_string()?;
                self.emit(|h| h.string(s))
            }
            b'[' => self.parse_json_array(),
            b'{' => self.parse_json_object(),
            _ => {
                self.step();
                Err(self.error(ParseErrorCode::ExpectedSomeValue))
            }
        }
    }

    #[inline]
    fn emit(&mut self, event: impl FnOnce(&mut H) -> HandlerResult) -> Result<()> {
        event(self.handler).map_err(|code| self.error(code))
    }

    #[inline]
    fn next(&mut self) -> Result<u8> {
        match self.buf.get(self.idx) {
            Some(c) => Ok(*c),
            None => Err(self.error(ParseErrorCode::InvalidEOF)),
        }
    }

    #[inline]
    fn must_is(&mut self, c: u8) -> Result<()> {
        match self.buf.get(self.idx) {
            Some(v) => {
                self.step();
                if *v == c {
                    Ok(())
                } else {
                    Err(self.error(ParseErrorCode::ExpectedSomeIdent))
                }
            }
            None => Err(self.error(ParseErrorCode::InvalidEOF)),
        }
    }

    #[inline]
    fn check_next(&self, c: u8) -> bool {
        self.buf.get(self.idx) == Some(&c)
    }

    #[inline]
    fn check_next_either(&self, c1: u8, c2: u8) -> bool {
        matches!(self.buf.get(self.idx), Some(v) if *v == c1 || *v == c2)
    }

    #[inline]
    fn step_digits(&mut self) -> usize {
        let mut len = 0;
        while let Some(c) = self.buf.get(self.idx) {
            if !c.is_ascii_digit() {
                break;
            }
            len += 1;
            self.step();
        }
        len
    }

    #[inline]
    fn step(&mut self) {
        self.idx += 1;
    }

    fn error(&self, code: ParseErrorCode) -> Error {
        Error::syntax(code, self.idx)
    }

    #[inline]
    fn skip_unused(&mut self) {
        while let Some(c) = self.buf.get(self.idx) {
            if !matches!(c, b' ' | b'\t' | b'\n' | b'\r') {
                break;
            }
            self.step();
        }
    }

    fn parse_json_null(&mut self) -> Result<()> {
        for v in *b"null" {
            self.must_is(v)?;
        }
        self.emit(|h| h.null())
    }

    fn parse_json_true(&mut self) -> Result<()> {
        for v in *b"true" {
            self.must_is(v)?;
        }
        self.emit(|h| h.boolean(true))
    }

    fn parse_json_false(&mut self) -> Result<()> {
        for v in *b"false" {
            self.must_is(v)?;
        }
        self.emit(|h| h.boolean(false))
    }

    /// Parse a JSON number following the strict grammar of RFC 8259.
    ///
    /// A fraction or an exponent makes the number a double. Integers become
    /// an int when they fit, otherwise a long, and a double only when they
    /// exceed the long range.
    fn parse_json_number(&mut self) -> Result<()> {
        let start_idx = self.idx;
        if self.check_next(b'-') {
            self.step();
        }
        if self.check_next(b'0') {
            self.step();
        } else if self.step_digits() == 0 {
            return Err(self.error(ParseErrorCode::InvalidNumberValue));
        }

        let mut is_double = false;
        if self.check_next(b'.') {
            self.step();
            if self.step_digits() == 0 {
                return Err(self.error(ParseErrorCode::InvalidNumberValue));
            }
            is_double = true;
        }
        if self.check_next_either(b'e', b'E') {
            self.step();
            if self.check_next_either(b'+', b'-') {
                self.step();
            }
            if self.step_digits() == 0 {
                return Err(self.error(ParseErrorCode::InvalidNumberValue));
            }
            is_double = true;
        }

        let s = std::str::from_utf8(&self.buf[start_idx..self.idx])
            .map_err(|_| self.error(ParseErrorCode::InvalidNumberValue))?;
        let value = if is_double {
            None
        } else if let Ok(v) = s.parse::<i32>() {
            Some(JsonValue::Int(v))
        } else {
            s.parse::<i64>().ok().map(JsonValue::Long)
        };
        let value = match value {
            Some(value) => value,
            // literals beyond the f64 range have no finite value
            None => match fast_float2::parse::<f64, _>(s) {
                Ok(v) if v.is_finite() => JsonValue::Double(v),
                _ => return Err(self.error(ParseErrorCode::InvalidNumberValue)),
            },
        };
        self.emit(|h| h.number(value))
    }

    /// Parse a JSON string literal, returning its unescaped content.
    ///
    /// The literal is scanned once to find its end; escape sequences are only
    /// decoded if the scan found any.
    fn parse_json_string(&mut self) -> Result<String> {
        self.must_is(b'"')?;

        let start_idx = self.idx;
        let mut escapes = 0;
        loop {
            let c = self.next()?;
            match c {
                b'\\' => {
                    self.step();
                    escapes += 1;
                    self.next()?;
                }
                b'"' => {
                    self.step();
                    break;
                }
                0x00..=0x1F => {
                    return Err(self.error(ParseErrorCode::ControlCharacterWhileParsingString));
                }
                _ => {}
            }
            self.step();
        }

        let data = &self.buf[start_idx..self.idx - 1];
        if escapes > 0 {
            let mut idx = start_idx;
            parse_string(data, &mut idx)
        } else {
            std::str::from_utf8(data)
                .map(str::to_string)
                .map_err(|_| self.error(ParseErrorCode::InvalidStringValue))
        }
    }

    fn parse_json_array(&mut self) -> Result<()> {
        self.must_is(b'[')?;
        self.emit(|h| h.start_array())?;

        let mut first = true;
        loop {
            self.skip_unused();
            let c = self.next()?;
            if c == b']' && first {
                self.step();
                break;
            }
            if !first {
                match c {
                    b']' => {
                        self.step();
                        break;
                    }
                    b',' => self.step(),
                    _ => return Err(self.error(ParseErrorCode::ExpectedArrayCommaOrEnd)),
                }
            }
            first = false;

            self.parse_json_value()?;
        }
        self.emit(|h| h.end_array())
    }

    fn parse_json_object(&mut self) -> Result<()> {
        self.must_is(b'{')?;
        self.emit(|h| h.start_object())?;

        let mut first = true;
        loop {
            self.skip_unused();
            let c = self.next()?;
            if c == b'}' && first {
                self.step();
                break;
            }
            if !first {
                match c {
                    b'}' => {
                        self.step();
                        break;
                    }
                    b',' => self.step(),
                    _ => return Err(self.error(ParseErrorCode::ExpectedObjectCommaOrEnd)),
                }
            }
            first = false;

            self.skip_unused();
            if !self.check_next(b'"') {
                if self.idx >= self.buf.len() {
                    return Err(self.error(ParseErrorCode::InvalidEOF));
                }
                self.step();
                return Err(self.error(ParseErrorCode::KeyMustBeAString));
            }
            let key = self.parse_json_string()?;
            self.emit(|h| h.object_key(key))?;

            self.skip_unused();
            if self.next()? != b':' {
                self.step();
                return Err(self.error(ParseErrorCode::ExpectedColon));
            }
            self.step();

            self.parse_json_value()?;
        }
        self.emit(|h| h.end_object())
    }
}
