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

use json_tree::parse_object;
use json_tree::Error;
use json_tree::JsonPatch;
use json_tree::JsonPointer;
use json_tree::PatchOperation;

#[test]
fn test_apply_patch_sequence() {
    let patches = [
        r#"{"op":"add","path":"/attributes/location","value":{"lat":1.5}}"#,
        r#"{"op":"REPLACE","path":"/attributes/manufacturer","value":"Bosch"}"#,
        r#"{"op":"remove","path":"/features/obsolete"}"#,
        r#"{"op":"remove","path":"/features/absent"}"#,
    ];
    let mut thing = parse_object(
        r#"{"attributes":{"manufacturer":"ACME"},"features":{"obsolete":{},"lamp":{}}}"#,
    )
    .unwrap();
    for patch in patches {
        let patch: JsonPatch = patch.parse().unwrap();
        thing = patch.apply_to(&thing).unwrap();
    }
    assert_eq!(
        thing.to_string(),
        r#"{"attributes":{"manufacturer":"Bosch","location":{"lat":1.5}},"features":{"lamp":{}}}"#
    );
}

#[test]
fn test_patch_json_round_trip() {
    let patch = JsonPatch::new(
        PatchOperation::Replace,
        JsonPointer::of("/a~0b/c").unwrap(),
        Some("v".into()),
    );
    let json = patch.to_json();
    assert_eq!(json.to_string(), r#"{"op":"replace","path":"/a~0b/c","value":"v"}"#);
    assert_eq!(JsonPatch::from_json(&json).unwrap(), patch);
}

#[test]
fn test_invalid_patches() {
    let cases = [
        (r#"{"path":"/a"}"#, "json.field.missing"),
        (r#"{"op":"add"}"#, "json.field.missing"),
        (r#"{"op":"copy","path":"/a"}"#, "json.patch.invalid"),
        (r#"{"op":"add","path":"/a//b"}"#, "json.pointer.invalid"),
        (r#"{"op":1,"path":"/a"}"#, "json.invalid"),
    ];
    for (input, code) in cases {
        let err = input.parse::<JsonPatch>().unwrap_err();
        assert_eq!(err.error_code(), code, "input: {input}");
    }

    let patch: JsonPatch = r#"{"op":"replace","path":"/missing","value":1}"#.parse().unwrap();
    let err = patch.apply_to(&parse_object("{}").unwrap()).unwrap_err();
    assert!(matches!(err, Error::MissingField { .. }));
}
