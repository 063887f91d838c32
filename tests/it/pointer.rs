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

use json_tree::Error;
use json_tree::JsonKey;
use json_tree::JsonPointer;
use json_tree::PointerInvalidReason;
use proptest::prelude::*;

fn key(s: &str) -> JsonKey {
    JsonKey::of(s).unwrap()
}

#[test]
fn test_pointer_parse_and_display() {
    let cases = [
        ("", "/"),
        ("/", "/"),
        ("a", "/a"),
        ("/a/b/c", "/a/b/c"),
        ("a/b/", "/a/b"),
        ("/a~0b", "/a~0b"),
        ("/a~1b", "/a~1b"),
        ("/with space/ü", "/with space/ü"),
    ];
    for (input, expected) in cases {
        let pointer = JsonPointer::of(input).unwrap();
        assert_eq!(pointer.to_string(), expected, "input: {input}");
        assert_eq!(JsonPointer::of(expected).unwrap(), pointer);
    }

    // only the tilde is escaped
    let pointer = JsonPointer::of("/a~0b").unwrap();
    assert_eq!(pointer.leaf().unwrap().as_str(), "a~b");
    let pointer = JsonPointer::of("/a~1b").unwrap();
    assert_eq!(pointer.leaf().unwrap().as_str(), "a~1b");
}

#[test]
fn test_pointer_invalid() {
    let err = JsonPointer::of("/a//b").unwrap_err();
    assert_eq!(
        err,
        Error::PointerInvalid {
            pointer: "/a//b".to_string(),
            reason: PointerInvalidReason::ConsecutiveSlashes,
        }
    );
    assert_eq!(err.error_code(), "json.pointer.invalid");
    assert!(JsonPointer::of("//").is_err());

    assert!(JsonPointer::of("/a/").is_ok());
    let err = JsonPointer::of_strict("/a/").unwrap_err();
    assert!(matches!(
        err,
        Error::PointerInvalid {
            reason: PointerInvalidReason::LeadingOrTrailingSlash,
            ..
        }
    ));
    assert!(JsonPointer::of_strict("/").unwrap().is_empty());
}

#[test]
fn test_pointer_levels() {
    let pointer = JsonPointer::of("/a/b/c").unwrap();
    assert_eq!(pointer.level_count(), 3);
    assert_eq!(pointer.root(), Some(&key("a")));
    assert_eq!(pointer.leaf(), Some(&key("c")));
    assert_eq!(pointer.get(1), Some(&key("b")));
    assert_eq!(pointer.get(3), None);
    assert_eq!(pointer.next_level().to_string(), "/b/c");
    assert_eq!(pointer.cut_leaf().to_string(), "/a/b");
    assert_eq!(pointer.sub_pointer(1).unwrap().to_string(), "/b/c");
    assert_eq!(pointer.prefix_pointer(1).unwrap().to_string(), "/a/b");
    assert_eq!(pointer.sub_pointer(3), None);
    assert!(pointer.starts_with(&JsonPointer::of("/a/b").unwrap()));
    assert!(!pointer.starts_with(&JsonPointer::of("/b").unwrap()));

    let empty = JsonPointer::empty();
    assert_eq!(empty.root(), None);
    assert!(empty.next_level().is_empty());
    assert!(empty.cut_leaf().is_empty());
}

#[test]
fn test_pointer_composition() {
    let base = JsonPointer::of("/a").unwrap();
    let extended = base.add_leaf(key("b"));
    assert_eq!(extended.to_string(), "/a/b");
    assert_eq!(base.to_string(), "/a");

    let joined = extended.append(&JsonPointer::of("c/d").unwrap());
    assert_eq!(joined.to_string(), "/a/b/c/d");
    assert_eq!(joined.append(&JsonPointer::empty()), joined);
    assert_eq!(JsonPointer::empty().append(&base), base);

    let keys: Vec<&str> = joined.iter().map(JsonKey::as_str).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);
    assert_eq!(JsonPointer::of_keys(joined.keys().to_vec()), joined);
    assert_eq!(key("x").as_pointer().to_string(), "/x");
}

#[test]
fn test_key_validation() {
    assert!(JsonKey::of("").is_err());
    assert!(JsonKey::of("a/b").is_ok());
    assert!(JsonKey::of("a\u{1}").is_ok());
    assert!(JsonKey::of_validated("a/b").is_err());
    assert!(JsonKey::of_validated("a\u{1}").is_err());
    assert_eq!(JsonKey::of_validated("ok").unwrap(), key("ok"));
}

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.~:-]{1,8}"
}

proptest! {
    #[test]
    fn test_pointer_display_parse_idempotent(segments in prop::collection::vec(segment_strategy(), 1..6)) {
        let pointer = JsonPointer::of_keys(segments.iter().map(|s| key(s)));
        let reparsed = JsonPointer::of(&pointer.to_string()).unwrap();
        prop_assert_eq!(reparsed, pointer);
    }
}
