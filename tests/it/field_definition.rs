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

use std::sync::Arc;

use json_tree::parse_object;
use json_tree::Error;
use json_tree::FieldMarker;
use json_tree::JsonField;
use json_tree::JsonFieldDefinition;
use json_tree::JsonFieldSelector;
use json_tree::JsonKey;
use json_tree::JsonObject;
use json_tree::JsonPointer;
use json_tree::JsonValue;

fn pointer(s: &str) -> JsonPointer {
    JsonPointer::of(s).unwrap()
}

#[test]
fn test_typed_access() {
    let object = parse_object(
        r#"{"thingId":"org:t1","revision":7,"created":5000000000,"ratio":0.5,"enabled":true,"attributes":{"tags":["a"],"extra":null}}"#,
    )
    .unwrap();

    let thing_id = JsonFieldDefinition::of_string(pointer("/thingId"));
    let revision = JsonFieldDefinition::of_int(pointer("/revision"));
    let created = JsonFieldDefinition::of_long(pointer("/created"));
    let ratio = JsonFieldDefinition::of_double(pointer("/ratio"));
    let enabled = JsonFieldDefinition::of_bool(pointer("/enabled"));
    let tags = JsonFieldDefinition::of_array(pointer("/attributes/tags"));
    let extra = JsonFieldDefinition::of_object(pointer("/attributes/extra"));
    let attributes = JsonFieldDefinition::of_value(pointer("/attributes"));

    assert_eq!(object.get_required(&thing_id).unwrap(), "org:t1");
    assert_eq!(object.get_required(&revision).unwrap(), 7);
    assert_eq!(object.get_required(&created).unwrap(), 5_000_000_000);
    assert_eq!(object.get_required(&ratio).unwrap(), 0.5);
    assert!(object.get_required(&enabled).unwrap());
    assert_eq!(object.get_required(&tags).unwrap().len(), 1);
    assert!(object.get_required(&extra).unwrap().is_null());
    assert!(object.get_required(&attributes).unwrap().is_object());

    // an int is a valid long
    let revision_as_long = JsonFieldDefinition::of_long(pointer("/revision"));
    assert_eq!(object.get_as(&revision_as_long).unwrap(), Some(7));
}

#[test]
fn test_typed_access_errors() {
    let object = parse_object(r#"{"revision":"seven","created":5000000000}"#).unwrap();

    let revision = JsonFieldDefinition::of_int(pointer("/revision"));
    let err = object.get_as(&revision).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert_eq!(err.error_code(), "json.invalid");

    let created = JsonFieldDefinition::of_int(pointer("/created"));
    assert!(matches!(object.get_as(&created), Err(Error::TypeMismatch { .. })));

    let missing = JsonFieldDefinition::of_string(pointer("/policyId"));
    assert_eq!(object.get_as(&missing).unwrap(), None);
    let err = object.get_required(&missing).unwrap_err();
    assert_eq!(
        err,
        Error::MissingField {
            pointer: "/policyId".to_string()
        }
    );
    assert_eq!(err.error_code(), "json.field.missing");
}

#[test]
fn test_custom_definition() {
    let uppercase = JsonFieldDefinition::new(
        pointer("/name"),
        "uppercase string",
        |v: &JsonValue| v.as_str().is_some_and(|s| s.chars().all(|c| c.is_ascii_uppercase())),
        |v: &JsonValue| v.as_str().map(str::to_lowercase),
    );
    let object = parse_object(r#"{"name":"ABC"}"#).unwrap();
    assert_eq!(object.get_required(&uppercase).unwrap(), "abc");

    let object = parse_object(r#"{"name":"Abc"}"#).unwrap();
    assert!(matches!(
        object.get_required(&uppercase),
        Err(Error::TypeMismatch {
            expected: "uppercase string",
            ..
        })
    ));
}

#[test]
fn test_markers() {
    let regular = FieldMarker::new("regular");
    let special = FieldMarker::new("special");
    let thing_id = Arc::new(JsonFieldDefinition::of_string(pointer("/thingId")).mark_as(regular.clone()));
    let policy_id = Arc::new(
        JsonFieldDefinition::of_string(pointer("/_policy"))
            .mark_as(special.clone())
            .mark_as(special.clone()),
    );
    assert_eq!(policy_id.markers().len(), 1);

    let object: JsonObject = vec![
        JsonField::with_definition(JsonKey::of("thingId").unwrap(), "t1", thing_id.clone()),
        JsonField::with_definition(JsonKey::of("_policy").unwrap(), "p1", policy_id.clone()),
        JsonField::new(JsonKey::of("plain").unwrap(), 1),
    ]
    .into_iter()
    .collect();

    assert_eq!(object.filter_by_markers(&[regular.clone()]).to_string(), r#"{"thingId":"t1"}"#);
    assert_eq!(
        object.filter_by_markers(&[regular, special.clone()]).to_string(),
        r#"{"thingId":"t1","_policy":"p1"}"#
    );
    assert!(object.get_field("_policy").unwrap().is_marked_as(&special));
    assert!(!object.get_field("plain").unwrap().is_marked_as(&special));

    // definitions ride along with updated values
    let updated = object.set(&pointer("/_policy"), "p2");
    assert!(updated.get_field("_policy").unwrap().is_marked_as(&special));

    let selector = JsonFieldSelector::builder()
        .add_field_definition(thing_id.as_ref())
        .add_field_definition(policy_id.as_ref())
        .build();
    assert_eq!(selector.to_string(), "thingId,_policy");
}
