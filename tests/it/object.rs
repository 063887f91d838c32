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
use json_tree::JsonArray;
use json_tree::JsonField;
use json_tree::JsonFieldSelector;
use json_tree::JsonKey;
use json_tree::JsonObject;
use json_tree::JsonParseOptions;
use json_tree::JsonPointer;
use json_tree::JsonValue;
use proptest::prelude::*;

fn pointer(s: &str) -> JsonPointer {
    JsonPointer::of(s).unwrap()
}

fn selector(s: &str) -> JsonFieldSelector {
    JsonFieldSelector::of(s, &JsonParseOptions::default()).unwrap()
}

#[test]
fn test_set_keeps_original_and_shares_siblings() {
    let obj1 = parse_object(r#"{"a":{"x":1,"y":[1,2]},"b":{"z":"s"},"c":"t"}"#).unwrap();
    let obj2 = obj1.set(&pointer("/a/x"), 5);

    assert_eq!(obj1.get_value(&pointer("/a/x")), Some(JsonValue::Int(1)));
    assert_eq!(obj2.get_value(&pointer("/a/x")), Some(JsonValue::Int(5)));
    assert!(obj1.get("b").unwrap().ptr_eq(&obj2.get("b").unwrap()));
    assert!(obj1.get("c").unwrap().ptr_eq(&obj2.get("c").unwrap()));
    assert!(obj1
        .get_value(&pointer("/a/y"))
        .unwrap()
        .ptr_eq(&obj2.get_value(&pointer("/a/y")).unwrap()));
    assert_eq!(obj2.to_string(), r#"{"a":{"x":5,"y":[1,2]},"b":{"z":"s"},"c":"t"}"#);
}

#[test]
fn test_set_creates_intermediate_objects() {
    let object = parse_object(r#"{"a":1}"#).unwrap();
    let object = object.set(&pointer("/a/b/c"), true);
    assert_eq!(object.to_string(), r#"{"a":{"b":{"c":true}}}"#);

    let object = object.set_value("/d", "x").unwrap();
    assert_eq!(object.to_string(), r#"{"a":{"b":{"c":true}},"d":"x"}"#);
    assert!(object.set_value("/d//e", 1).is_err());
}

#[test]
fn test_remove() {
    let object = parse_object(r#"{"a":{"b":1,"c":2},"d":3}"#).unwrap();
    assert_eq!(object.remove(&pointer("/a/b")).to_string(), r#"{"a":{"c":2},"d":3}"#);
    assert_eq!(object.remove(&pointer("/d")).to_string(), r#"{"a":{"b":1,"c":2}}"#);
    assert!(object.remove(&pointer("/x/y")).ptr_eq(&object));
    assert!(object.remove(&JsonPointer::empty()).ptr_eq(&object));
}

#[test]
fn test_null_as_container() {
    let object = JsonValue::null_literal().as_object().unwrap();
    assert!(object.is_null());
    assert!(object.is_empty());
    assert!(object.set(&pointer("/a"), 1).ptr_eq(&object));
    assert!(object.remove(&pointer("/a")).ptr_eq(&object));
    assert_eq!(object.to_string(), "null");
    assert_eq!(JsonValue::Object(object), JsonValue::Null);

    let array = JsonValue::null_literal().as_array().unwrap();
    assert!(array.is_null());
    assert!(array.is_empty());
}

#[test]
fn test_numeric_equality() {
    assert_eq!(JsonValue::from(5_i64), JsonValue::from(5));
    assert_ne!(JsonValue::from(5.0), JsonValue::from(5));
    assert_eq!(
        parse_object(r#"{"a":5,"b":[1]}"#).unwrap(),
        parse_object(r#"{"b":[1],"a":5}"#).unwrap()
    );
}

#[test]
fn test_select() {
    let object = parse_object(r#"{"a":{"b":{"c":23,"d":"x"},"e":10},"f":false}"#).unwrap();
    assert_eq!(
        object.select(&selector("a(b/c,e),f")).to_string(),
        r#"{"a":{"b":{"c":23},"e":10},"f":false}"#
    );
    assert_eq!(
        object.select(&selector("f,a/e")).to_string(),
        r#"{"f":false,"a":{"e":10}}"#
    );
    assert_eq!(object.select(&selector("missing,a/zzz")).to_string(), "{}");
    assert_eq!(object.select(&selector("a/b,a/b/c")).to_string(), r#"{"a":{"b":{"c":23,"d":"x"}}}"#);
    assert_eq!(object.select(&selector("f/deeper")).to_string(), "{}");
}

#[test]
fn test_extract() {
    let object = parse_object(r#"{"a":{"b":{"c":23}},"f":false}"#).unwrap();
    assert_eq!(object.extract(&pointer("/a/b/c")).to_string(), r#"{"a":{"b":{"c":23}}}"#);
    assert!(object.extract(&pointer("/a/x")).is_empty());
    assert!(object.extract(&JsonPointer::empty()).ptr_eq(&object));
}

#[test]
fn test_release_structure() {
    let object = parse_object(r#"{"a":{"b":[1,2,{"c":null}]},"d":"e"}"#).unwrap();
    let expected = object.clone();

    let text = object.to_string();
    assert!(object.release_structure());
    assert_eq!(object.to_string(), text);
    assert_eq!(object.get_value(&pointer("/a/b")), expected.get_value(&pointer("/a/b")));
    assert_eq!(object, expected);

    let fresh = JsonObject::builder().set(JsonKey::of("k").unwrap(), 1).build();
    assert!(!fresh.release_structure());
}

#[test]
fn test_release_structure_with_non_finite_input() {
    let object = JsonObject::builder()
        .set(JsonKey::of("d").unwrap(), f64::INFINITY)
        .set(JsonKey::of("n").unwrap(), f64::NAN)
        .set(JsonKey::of("f").unwrap(), 0.25)
        .build();
    let before: Vec<_> = object.iter().map(|field| field.value().clone()).collect();
    assert_eq!(object.to_string(), r#"{"d":null,"n":null,"f":0.25}"#);

    assert!(object.release_structure());
    let after: Vec<_> = object.iter().map(|field| field.value().clone()).collect();
    assert!(matches!(after[0], JsonValue::Null));
    assert_eq!(before, after);
    assert_eq!(object.get("d"), Some(JsonValue::Null));
}

#[test]
fn test_iteration_order() {
    let object: JsonObject = vec![
        JsonField::new(JsonKey::of("z").unwrap(), 1),
        JsonField::new(JsonKey::of("a").unwrap(), JsonArray::of(["x"])),
    ]
    .into_iter()
    .collect();
    let keys: Vec<String> = object.iter().map(|f| f.key().to_string()).collect();
    assert_eq!(keys, vec!["z", "a"]);
    assert_eq!(object.to_string(), r#"{"z":1,"a":["x"]}"#);
}

fn union(left: &JsonObject, right: &JsonObject) -> JsonObject {
    let mut result = left.clone();
    for field in right.iter() {
        let value = match (left.get(field.key().as_str()), field.value()) {
            (Some(JsonValue::Object(l)), JsonValue::Object(r)) => JsonValue::Object(union(&l, r)),
            (_, value) => value.clone(),
        };
        result = result.set(&field.key().as_pointer(), value);
    }
    result
}

fn object_strategy() -> impl Strategy<Value = JsonObject> {
    let leaf = prop_oneof![
        any::<i32>().prop_map(JsonValue::Int),
        "[a-z]{0,3}".prop_map(JsonValue::from),
        Just(JsonValue::Bool(true)),
    ];
    let value = leaf.prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "d"]), inner), 0..4)
            .prop_map(|fields| JsonValue::Object(build(fields)))
    });
    prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "d"]), value), 0..5)
        .prop_map(build)
}

fn build(fields: Vec<(&str, JsonValue)>) -> JsonObject {
    fields
        .into_iter()
        .map(|(k, v)| JsonField::new(JsonKey::of(k).unwrap(), v))
        .collect()
}

fn pointers_strategy() -> impl Strategy<Value = Vec<JsonPointer>> {
    let pointer = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 1..4)
        .prop_map(|keys| JsonPointer::of_keys(keys.into_iter().map(|k| JsonKey::of(k).unwrap())));
    prop::collection::vec(pointer, 1..6)
}

proptest! {
    #[test]
    fn test_select_equals_union_of_extracts(object in object_strategy(), pointers in pointers_strategy()) {
        let selected = object.select(&JsonFieldSelector::of_pointers(pointers.clone()));
        let naive = pointers
            .iter()
            .map(|p| object.extract(p))
            .fold(JsonObject::empty(), |acc, extracted| union(&acc, &extracted));
        prop_assert_eq!(selected, naive);
    }

    #[test]
    fn test_round_trip(object in object_strategy()) {
        let text = object.to_string();
        let parsed = parse_object(&text).unwrap();
        prop_assert_eq!(&parsed, &object);
        prop_assert_eq!(parsed.to_string(), text);
    }
}
