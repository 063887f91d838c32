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

use json_tree::parse_array;
use json_tree::parse_object;
use json_tree::parse_value;
use json_tree::parse_value_from_reader;
use json_tree::JsonArray;
use json_tree::JsonValue;

fn test_parse_err(errors: &[(&str, &'static str)]) {
    for &(s, err) in errors {
        let res = parse_value(s);
        assert!(res.is_err(), "input: {s}");
        assert_eq!(res.err().unwrap().to_string(), err);
    }
}

fn test_parse_ok(tests: Vec<(&str, JsonValue)>) {
    for (s, val) in tests {
        assert_eq!(parse_value(s).unwrap(), val, "input: {s}");
    }
}

#[test]
fn test_parse_null() {
    test_parse_err(&[
        ("n", "EOF while parsing a value, pos 1"),
        ("nul", "EOF while parsing a value, pos 3"),
        ("nulla", "trailing characters, pos 5"),
        ("NULL", "expected value, pos 1"),
    ]);

    test_parse_ok(vec![("null", JsonValue::Null), (" null\n", JsonValue::Null)]);
}

#[test]
fn test_parse_boolean() {
    test_parse_err(&[
        ("t", "EOF while parsing a value, pos 1"),
        ("truz", "expected ident, pos 4"),
        ("f", "EOF while parsing a value, pos 1"),
        ("faz", "expected ident, pos 3"),
        ("truea", "trailing characters, pos 5"),
        ("falsea", "trailing characters, pos 6"),
    ]);

    test_parse_ok(vec![
        ("true", JsonValue::Bool(true)),
        (" true ", JsonValue::Bool(true)),
        ("false", JsonValue::Bool(false)),
        (" false ", JsonValue::Bool(false)),
    ]);
}

#[test]
fn test_parse_number() {
    test_parse_err(&[
        ("+", "expected value, pos 1"),
        (".", "expected value, pos 1"),
        ("-", "invalid number, pos 1"),
        ("00", "trailing characters, pos 2"),
        ("0x80", "trailing characters, pos 2"),
        ("1.", "invalid number, pos 2"),
        ("1.a", "invalid number, pos 2"),
        ("1.e1", "invalid number, pos 2"),
        ("1e", "invalid number, pos 2"),
        ("1e+", "invalid number, pos 3"),
        ("1e400", "invalid number, pos 5"),
        ("-1.5e999", "invalid number, pos 8"),
        ("1a", "trailing characters, pos 2"),
    ]);

    test_parse_ok(vec![
        ("-0", JsonValue::Int(0)),
        ("3", JsonValue::Int(3)),
        ("-12", JsonValue::Int(-12)),
        ("2147483647", JsonValue::Int(i32::MAX)),
        ("2147483648", JsonValue::Long(2_147_483_648)),
        ("-9223372036854775808", JsonValue::Long(i64::MIN)),
        ("9223372036854775807", JsonValue::Long(i64::MAX)),
        ("18446744073709551615", JsonValue::Double(18446744073709551615.0)),
        ("3.0", JsonValue::Double(3.0)),
        ("3.1", JsonValue::Double(3.1)),
        ("-1.2", JsonValue::Double(-1.2)),
        ("0.4e5", JsonValue::Double(0.4e5)),
        ("0.4e-001", JsonValue::Double(0.4e-1)),
        ("1E2", JsonValue::Double(100.0)),
    ]);
}

#[test]
fn test_parse_string() {
    test_parse_err(&[
        ("\"", "EOF while parsing a value, pos 1"),
        ("\"lol", "EOF while parsing a value, pos 4"),
        ("\"lol\"a", "trailing characters, pos 6"),
        ("\"\\q\"", "invalid escaped '71', pos 3"),
        ("\"a\tb\"", "control character (\\u0000-\\u001F) found while parsing a string, pos 2"),
    ]);

    test_parse_ok(vec![
        ("\"\"", JsonValue::from("")),
        ("\"foo\"", JsonValue::from("foo")),
        (" \"foo\" ", JsonValue::from("foo")),
        ("\"\\\"\"", JsonValue::from("\"")),
        ("\"\\b\"", JsonValue::from("\x08")),
        ("\"\\n\"", JsonValue::from("\n")),
        ("\"\\r\"", JsonValue::from("\r")),
        ("\"\\t\"", JsonValue::from("\t")),
        ("\"\\/\"", JsonValue::from("/")),
        ("\"\\u12ab\"", JsonValue::from("\u{12ab}")),
        ("\"\\uAB12\"", JsonValue::from("\u{AB12}")),
        ("\"\\uD83C\\uDF95\"", JsonValue::from("\u{1F395}")),
        ("\"\u{3A3}\"", JsonValue::from("\u{3A3}")),
    ]);
}

#[test]
fn test_parse_array() {
    test_parse_err(&[
        ("[", "EOF while parsing a value, pos 1"),
        ("[ ", "EOF while parsing a value, pos 2"),
        ("[1", "EOF while parsing a value, pos 2"),
        ("[1,", "EOF while parsing a value, pos 3"),
        ("[1,]", "expected value, pos 4"),
        ("[1 2]", "expected `,` or `]`, pos 3"),
        ("[]a", "trailing characters, pos 3"),
    ]);

    test_parse_ok(vec![
        ("[]", JsonValue::Array(JsonArray::empty())),
        ("[ ]", JsonValue::Array(JsonArray::empty())),
        ("[null]", JsonValue::Array(JsonArray::of([JsonValue::Null]))),
        (" [ null ] ", JsonValue::Array(JsonArray::of([JsonValue::Null]))),
        ("[true, false]", JsonValue::Array(JsonArray::of([true, false]))),
        (
            "[[], [[]], [[], []]]",
            JsonValue::Array(JsonArray::of([
                JsonArray::empty(),
                JsonArray::of([JsonArray::empty()]),
                JsonArray::of([JsonArray::empty(), JsonArray::empty()]),
            ])),
        ),
        ("[1]", JsonValue::Array(JsonArray::of([1]))),
    ]);
}

#[test]
fn test_parse_object() {
    test_parse_err(&[
        ("{", "EOF while parsing a value, pos 1"),
        ("{ ", "EOF while parsing a value, pos 2"),
        ("{1", "key must be a string, pos 2"),
        ("{ \"a\"", "EOF while parsing a value, pos 5"),
        ("{\"a\"", "EOF while parsing a value, pos 4"),
        ("{\"a\" ", "EOF while parsing a value, pos 5"),
        ("{\"a\" 1", "expected `:`, pos 6"),
        ("{\"a\":", "EOF while parsing a value, pos 5"),
        ("{\"a\":1", "EOF while parsing a value, pos 6"),
        ("{\"a\":1 1", "expected `,` or `}`, pos 7"),
        ("{\"a\":1,", "EOF while parsing a value, pos 7"),
        ("{\"\":1}", "key must not be empty, pos 3"),
        ("{}a", "trailing characters, pos 3"),
    ]);

    let cases = [
        ("{}", "{}"),
        ("{ }", "{}"),
        ("{\"a\":3}", "{\"a\":3}"),
        ("{ \"a\" : 3 }", "{\"a\":3}"),
        ("{\"a\":3,\"b\":4}", "{\"a\":3,\"b\":4}"),
        ("{\"a\": {\"b\": 3, \"c\": 4}}", "{\"a\":{\"b\":3,\"c\":4}}"),
        ("{\"a\":1,\"b\":2,\"a\":3}", "{\"a\":3,\"b\":2}"),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_object(input).unwrap().to_string(), expected);
    }
}

#[test]
fn test_parse_typed_roots() {
    assert!(parse_object("null").unwrap().is_null());
    assert!(parse_array("null").unwrap().is_null());
    assert_eq!(
        parse_object("[]").unwrap_err().to_string(),
        "expected JSON object, pos 0"
    );
    assert_eq!(
        parse_array("{}").unwrap_err().to_string(),
        "expected JSON array, pos 0"
    );
}

#[test]
fn test_parse_error_carries_input() {
    let err = parse_value("{\"a\":}").unwrap_err();
    assert_eq!(err.error_code(), "json.invalid");
    assert!(err.description().unwrap().contains("{\"a\":}"));
}

#[test]
fn test_round_trip_canonical_text() {
    let texts = [
        r#"{"thingId":"org.eclipse:thing","attributes":{"location":{"lat":48.1,"lon":11.5},"tags":["a","b"]},"count":2147483648,"nothing":null}"#,
        r#"[1,-1.5,"\u0001\"\\",true,false,null,{},[]]"#,
        r#""plain""#,
    ];
    for text in texts {
        let value = parse_value(text).unwrap();
        assert_eq!(value.to_string(), text);
        assert_eq!(parse_value(&value.to_string()).unwrap(), value);
    }
}

#[test]
fn test_parse_from_reader() {
    let value = parse_value_from_reader(std::io::Cursor::new(b"{\"a\": [1, 2]}")).unwrap();
    assert_eq!(value.to_string(), r#"{"a":[1,2]}"#);

    let err = parse_value_from_reader(&[0xff_u8, 0xfe][..]).unwrap_err();
    assert_eq!(err.error_code(), "json.invalid");
}
