// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::collections::{BTreeMap, HashMap};

use twofold_core::error::Error;
use twofold_core::{BinarySerializer, Serializer, TypeHandle};
use twofold_derive::TwofoldObject;

fn round_trip<T: Serializer>(value: &T) -> T {
    let serializer = BinarySerializer::default();
    let bytes = serializer.to_bytes(value).unwrap();
    serializer.from_bytes(&bytes).unwrap()
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Address {
    street: String,
    city: String,
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Person {
    name: String,
    age: i32,
    address: Address,
    nickname: Option<String>,
    hobbies: Vec<String>,
    scores: Vec<i64>,
}

#[derive(TwofoldObject, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[twofold(blittable)]
struct Sample {
    id: u64,
    x: i32,
    y: f32,
}

#[derive(TwofoldObject, Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
enum Color {
    Red,
    Green = 7,
    Blue,
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Pair(i32, String);

#[derive(TwofoldObject, Debug, PartialEq)]
struct Marker;

#[derive(TwofoldObject, Debug, PartialEq)]
struct Cached {
    value: i32,
    #[twofold(skip)]
    memo: Vec<u8>,
}

#[test]
fn primitives_keep_their_extremes() {
    assert_eq!(round_trip(&i8::MIN), i8::MIN);
    assert_eq!(round_trip(&i32::MAX), i32::MAX);
    assert_eq!(round_trip(&i64::MIN), i64::MIN);
    assert_eq!(round_trip(&u64::MAX), u64::MAX);
    assert_eq!(round_trip(&u128::MAX), u128::MAX);
    assert_eq!(round_trip(&f64::MAX), f64::MAX);
    assert_eq!(round_trip(&f32::MIN_POSITIVE), f32::MIN_POSITIVE);
    assert!(round_trip(&f64::NAN).is_nan());
    assert!(round_trip(&true));
    assert_eq!(round_trip(&'é'), 'é');
    round_trip(&());
}

#[test]
fn i32_is_a_tag_and_raw_memory() {
    let bytes = BinarySerializer::default().to_bytes(&42i32).unwrap();
    let mut expected = vec![1u8];
    expected.extend_from_slice(&42i32.to_ne_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn strings_are_utf16() {
    let bytes = BinarySerializer::default().to_bytes(&"hé".to_string()).unwrap();
    let mut expected = vec![1u8];
    expected.extend_from_slice(&2i32.to_ne_bytes());
    expected.extend_from_slice(&0x68u16.to_ne_bytes());
    expected.extend_from_slice(&0xe9u16.to_ne_bytes());
    assert_eq!(bytes, expected);

    for value in ["", "kikoo \"lol\"", "multi\nline", "emoji \u{1F980}"] {
        assert_eq!(round_trip(&value.to_string()), value);
    }
}

#[test]
fn unmanaged_arrays_are_one_block() {
    let values = vec![1i32, -2, i32::MAX];
    let bytes = BinarySerializer::default().to_bytes(&values).unwrap();
    // tag, count, three raw elements
    assert_eq!(bytes.len(), 1 + 4 + 3 * 4);
    assert_eq!(round_trip(&values), values);
    assert_eq!(round_trip(&Vec::<u8>::new()), Vec::<u8>::new());
    assert_eq!(round_trip(&[[1u16, 2], [3, 4]]), [[1u16, 2], [3, 4]]);
}

#[test]
fn managed_arrays_frame_each_element() {
    let values = vec!["a".to_string(), String::new(), "c".to_string()];
    assert_eq!(round_trip(&values), values);
    let nested = vec![vec![1u8], vec![], vec![2, 3]];
    assert_eq!(round_trip(&nested), nested);
    let optional = vec![Some(1i32), None, Some(3)];
    assert_eq!(round_trip(&optional), optional);
}

#[test]
fn none_is_tag_zero() {
    let bytes = BinarySerializer::default().to_bytes(&None::<String>).unwrap();
    assert_eq!(bytes, [0u8]);
    assert_eq!(round_trip(&None::<i32>), None);
    assert_eq!(round_trip(&Some(5u16)), Some(5));
    assert_eq!(round_trip(&Some(String::new())), Some(String::new()));
}

#[test]
fn nested_options_keep_inner_none() {
    let serializer = BinarySerializer::default();
    assert_eq!(serializer.to_bytes(&None::<Option<u32>>).unwrap(), [0u8]);
    assert_eq!(serializer.to_bytes(&Some(None::<u32>)).unwrap(), [1u8, 0]);
    let mut expected = vec![1u8, 1];
    expected.extend_from_slice(&5u32.to_ne_bytes());
    assert_eq!(serializer.to_bytes(&Some(Some(5u32))).unwrap(), expected);

    assert_eq!(round_trip(&None::<Option<u32>>), None);
    assert_eq!(round_trip(&Some(None::<u32>)), Some(None));
    assert_eq!(round_trip(&Some(Some(5u32))), Some(Some(5)));
    assert_eq!(round_trip(&Some(Some(None::<String>))), Some(Some(None)));
}

#[test]
fn derived_structs_round_trip() {
    let person = Person {
        name: "Ada".to_string(),
        age: 36,
        address: Address {
            street: "12 Engine Lane".to_string(),
            city: "London".to_string(),
        },
        nickname: None,
        hobbies: vec!["mathematics".to_string(), "poetry".to_string()],
        scores: vec![i64::MIN, 0, i64::MAX],
    };
    assert_eq!(round_trip(&person), person);
    assert_eq!(round_trip(&Pair(-1, "one".to_string())), Pair(-1, "one".to_string()));
    assert_eq!(round_trip(&Marker), Marker);
}

#[test]
fn blittable_structs_are_raw_memory() {
    let sample = Sample {
        id: u64::MAX,
        x: i32::MIN,
        y: 1.5,
    };
    let bytes = BinarySerializer::default().to_bytes(&sample).unwrap();
    assert_eq!(bytes.len(), 1 + std::mem::size_of::<Sample>());
    assert_eq!(round_trip(&sample), sample);

    let samples = vec![sample, Sample { id: 0, x: 0, y: 0.0 }];
    assert_eq!(round_trip(&samples), samples);
}

#[test]
fn enums_are_their_discriminant() {
    let bytes = BinarySerializer::default().to_bytes(&Color::Green).unwrap();
    assert_eq!(bytes, [1u8, 7]);
    assert_eq!(round_trip(&Color::Blue), Color::Blue);
    assert_eq!(round_trip(&vec![Color::Red, Color::Green]), [Color::Red, Color::Green]);

    let err = BinarySerializer::default()
        .from_bytes::<Color>(&[1u8, 3])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn invalid_bool_bits_are_rejected() {
    let err = BinarySerializer::default()
        .from_bytes::<bool>(&[1u8, 2])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn maps_round_trip() {
    let mut map = HashMap::new();
    map.insert("one".to_string(), vec![1i32]);
    map.insert("none".to_string(), vec![]);
    assert_eq!(round_trip(&map), map);

    let mut ordered = BTreeMap::new();
    ordered.insert(3u8, Some("three".to_string()));
    ordered.insert(0u8, None);
    assert_eq!(round_trip(&ordered), ordered);
}

#[test]
fn boxes_are_transparent() {
    let boxed = Box::new(Address {
        street: "s".to_string(),
        city: "c".to_string(),
    });
    assert_eq!(round_trip(&boxed), boxed);
    let plain = BinarySerializer::default().to_bytes(&7u32).unwrap();
    let wrapped = BinarySerializer::default().to_bytes(&Box::new(7u32)).unwrap();
    assert_eq!(plain, wrapped);
}

#[test]
fn type_handles_are_names() {
    let handle = TypeHandle::of::<Person>();
    let copy = round_trip(&handle);
    assert_eq!(copy, handle);
    assert!(copy.is::<Person>());
    assert_eq!(round_trip(&vec![TypeHandle::of::<i32>()]), [TypeHandle::of::<i32>()]);
}

#[test]
fn skipped_fields_are_defaulted() {
    let cached = Cached {
        value: 3,
        memo: vec![1, 2, 3],
    };
    let copy = round_trip(&cached);
    assert_eq!(copy.value, 3);
    assert!(copy.memo.is_empty());
}

#[test]
fn truncated_input_names_the_type() {
    let err = BinarySerializer::default().from_bytes::<i32>(&[1u8, 42]).unwrap_err();
    assert_eq!(err.to_string(), "Could not deserialize type i32");

    let err = BinarySerializer::default().from_bytes::<String>(&[]).unwrap_err();
    assert!(matches!(err, Error::EndOfStream { .. }));
}

#[test]
fn unknown_tag_is_invalid_data() {
    let err = BinarySerializer::default().from_bytes::<i32>(&[9u8]).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn stream_is_left_after_the_value() {
    let serializer = BinarySerializer::default();
    let mut bytes = Vec::new();
    serializer.serialize(&mut bytes, &"first".to_string()).unwrap();
    serializer.serialize(&mut bytes, &2u8).unwrap();

    let mut input = bytes.as_slice();
    let first: String = serializer.deserialize(&mut input).unwrap();
    let second: u8 = serializer.deserialize(&mut input).unwrap();
    assert_eq!((first.as_str(), second), ("first", 2));
    assert!(input.is_empty());
}
