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

use json_tree::merge_json_objects;
use json_tree::merge_json_values;
use json_tree::parse_object;
use json_tree::parse_value;
use json_tree::JsonField;
use json_tree::JsonKey;
use json_tree::JsonMergePatch;
use json_tree::JsonObject;
use json_tree::JsonValue;
use proptest::prelude::*;

#[test]
fn test_merge_patch_of_thing() {
    let old = parse_value(
        r#"{"thingId":"org:t1","attributes":{"manufacturer":"ACME","serial":1},"features":{"lamp":{"properties":{"on":false}}}}"#,
    )
    .unwrap();
    let new = parse_value(
        r#"{"thingId":"org:t1","attributes":{"manufacturer":"ACME","model":"X"},"features":{"lamp":{"properties":{"on":true}}}}"#,
    )
    .unwrap();

    let patch = JsonMergePatch::compute(&old, &new).unwrap();
    assert_eq!(
        patch.to_string(),
        r#"{"attributes":{"model":"X","serial":null},"features":{"lamp":{"properties":{"on":true}}}}"#
    );
    assert_eq!(patch.apply_on(&old), new);
    assert!(JsonMergePatch::compute(&new, &new).is_none());
}

#[test]
fn test_merge_patch_replaces_non_objects() {
    let old = parse_value(r#"{"a":[1,2],"b":"x"}"#).unwrap();
    let new = parse_value(r#"{"a":{"c":1},"b":3}"#).unwrap();
    let patch = JsonMergePatch::compute(&old, &new).unwrap();
    assert_eq!(patch.to_string(), r#"{"a":{"c":1},"b":3}"#);
    assert_eq!(patch.apply_on(&old), new);

    let patch = JsonMergePatch::compute(&JsonValue::from(1), &JsonValue::from("1")).unwrap();
    assert_eq!(patch.patch_value(), &JsonValue::from("1"));
}

#[test]
fn test_mergers_differ_on_null_fields() {
    let v1 = parse_object(r#"{"a":null,"b":{"c":1}}"#).unwrap();
    let v2 = parse_object(r#"{"a":2,"b":{"d":2}}"#).unwrap();

    assert_eq!(
        merge_json_objects(&v1, &v2).to_string(),
        r#"{"a":null,"b":{"c":1,"d":2}}"#
    );
    assert_eq!(
        merge_json_values(&JsonValue::from(v1), &JsonValue::from(v2)).to_string(),
        r#"{"b":{"c":1,"d":2},"a":2}"#
    );
}

#[test]
fn test_merge_values_drops_nulls_at_every_level() {
    let v1 = parse_value(r#"{"x":{"a":null,"k":1},"y":{"z":{"q":null}}}"#).unwrap();
    let v2 = parse_value(r#"{"x":{"a":2},"y":{"z":{"q":"filled"}}}"#).unwrap();
    assert_eq!(
        merge_json_values(&v1, &v2).to_string(),
        r#"{"x":{"k":1,"a":2},"y":{"z":{"q":"filled"}}}"#
    );
    assert_eq!(
        merge_json_objects(&v1.as_object().unwrap(), &v2.as_object().unwrap()).to_string(),
        r#"{"x":{"a":null,"k":1},"y":{"z":{"q":null}}}"#
    );
}

#[test]
fn test_merge_values_with_non_object_second() {
    let v1 = parse_value(r#"{"a":null,"b":1}"#).unwrap();
    assert_eq!(
        merge_json_values(&v1, &JsonValue::from(5)).to_string(),
        r#"{"b":1}"#
    );
    assert_eq!(
        merge_json_values(&JsonValue::from("s"), &v1),
        JsonValue::from("s")
    );
}

#[test]
fn test_merge_arrays_are_not_merged() {
    let v1 = parse_object(r#"{"list":[1,2]}"#).unwrap();
    let v2 = parse_object(r#"{"list":[3],"other":[4]}"#).unwrap();
    assert_eq!(
        merge_json_objects(&v1, &v2).to_string(),
        r#"{"list":[1,2],"other":[4]}"#
    );
}

fn build(fields: Vec<(&str, JsonValue)>) -> JsonObject {
    fields
        .into_iter()
        .map(|(k, v)| JsonField::new(JsonKey::of(k).unwrap(), v))
        .collect()
}

// null members cannot round-trip through a merge patch, they read as deletions
fn object_strategy() -> impl Strategy<Value = JsonObject> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(JsonValue::from),
        any::<bool>().prop_map(JsonValue::Bool),
        "[a-z]{0,4}".prop_map(JsonValue::from),
        prop::collection::vec(any::<i32>(), 0..3).prop_map(JsonValue::from),
    ];
    let value = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec((prop::sample::select(vec!["a", "b", "c"]), inner), 0..4)
            .prop_map(|fields| JsonValue::Object(build(fields)))
    });
    prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "d"]), value), 0..5)
        .prop_map(build)
}

proptest! {
    #[test]
    fn test_merge_patch_round_trip(o1 in object_strategy(), o2 in object_strategy()) {
        let old = JsonValue::from(o1);
        let new = JsonValue::from(o2);
        match JsonMergePatch::compute(&old, &new) {
            Some(patch) => prop_assert_eq!(patch.apply_on(&old), new),
            None => prop_assert_eq!(&old, &new),
        }
        prop_assert!(JsonMergePatch::compute(&old, &old).is_none());
    }
}
