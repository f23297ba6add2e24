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

use twofold_core::error::Error;
use twofold_core::{impl_polymorphic, BinarySerializer, Object, Serializer, TextSerializer};
use twofold_derive::TwofoldObject;

trait Shape2D: Object {
    fn area(&self) -> f64;
}

impl std::fmt::Debug for dyn Shape2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_object().fmt(f)
    }
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Circle {
    radius: f64,
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Square {
    side: f64,
}

impl Shape2D for Circle {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Shape2D for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }
}

impl_polymorphic!(Shape2D, Circle, Square);

#[derive(TwofoldObject)]
struct Drawing {
    title: String,
    shapes: Vec<Box<dyn Shape2D>>,
    background: Option<Box<dyn Shape2D>>,
}

#[derive(TwofoldObject)]
struct Node {
    next: Option<Box<dyn Object>>,
}

#[derive(TwofoldObject, Debug)]
#[twofold(name = "shared.Name")]
struct First {
    a: i32,
}

#[derive(TwofoldObject, Debug)]
#[twofold(name = "shared.Name")]
struct Second {
    b: i32,
}

fn binary_round_trip<T: Serializer>(value: &T) -> T {
    let serializer = BinarySerializer::default();
    let bytes = serializer.to_bytes(value).unwrap();
    serializer.from_bytes(&bytes).unwrap()
}

fn text_round_trip<T: Serializer>(value: &T) -> T {
    let serializer = TextSerializer::default();
    let text = serializer.to_text(value).unwrap();
    serializer.from_text(&text).unwrap()
}

#[test]
fn objects_keep_their_concrete_type() {
    let values: Vec<Box<dyn Object>> = vec![
        Box::new(42i32),
        Box::new("text".to_string()),
        Box::new(Circle { radius: 2.0 }),
        Box::new(vec![1u8, 2, 3]),
        Box::new(Some(7u64)),
    ];
    for copy in [binary_round_trip(&values), text_round_trip(&values)] {
        assert_eq!(copy.len(), 5);
        assert_eq!(copy[0].downcast_ref::<i32>(), Some(&42));
        assert_eq!(copy[1].downcast_ref::<String>().map(String::as_str), Some("text"));
        assert_eq!(copy[2].downcast_ref::<Circle>(), Some(&Circle { radius: 2.0 }));
        assert_eq!(copy[3].downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
        assert_eq!(copy[4].downcast_ref::<Option<u64>>(), Some(&Some(7)));
    }
}

#[test]
fn objects_are_written_with_their_name() {
    let value: Box<dyn Object> = Box::new(Square { side: 1.0 });
    let text = TextSerializer::default().to_text(&value).unwrap();
    assert_eq!(text, "@test_polymorphism::Square {\n  side 1\n}\n");

    let bytes = BinarySerializer::default().to_bytes(&value).unwrap();
    assert_eq!(bytes[0], 2);
}

#[test]
fn null_object_reads_as_unit() {
    let copy: Box<dyn Object> = BinarySerializer::default().from_bytes(&[0u8]).unwrap();
    assert!(copy.is::<()>());
    let copy: Option<Box<dyn Object>> = TextSerializer::default().from_text("~").unwrap();
    assert!(copy.is_none());
}

#[test]
fn trait_objects_round_trip() {
    let drawing = Drawing {
        title: "shapes".to_string(),
        shapes: vec![Box::new(Circle { radius: 1.0 }), Box::new(Square { side: 3.0 })],
        background: Some(Box::new(Square { side: 10.0 })),
    };
    for copy in [binary_round_trip(&drawing), text_round_trip(&drawing)] {
        assert_eq!(copy.title, "shapes");
        let areas: Vec<f64> = copy.shapes.iter().map(|s| s.area()).collect();
        assert_eq!(areas, [std::f64::consts::PI, 9.0]);
        assert_eq!(copy.background.map(|s| s.area()), Some(100.0));
    }
}

#[test]
fn trait_object_rejects_unlisted_types() {
    let value: Box<dyn Object> = Box::new(5i32);
    let bytes = BinarySerializer::default().to_bytes(&value).unwrap();
    let err = BinarySerializer::default()
        .from_bytes::<Box<dyn Shape2D>>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn named_value_must_fit_the_declared_type() {
    let value: Box<dyn Object> = Box::new(5i32);
    let bytes = BinarySerializer::default().to_bytes(&value).unwrap();
    // A named value of the declared type itself is read directly.
    assert_eq!(BinarySerializer::default().from_bytes::<i32>(&bytes).unwrap(), 5);
    let err = BinarySerializer::default()
        .from_bytes::<String>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn unknown_type_name_is_invalid_operation() {
    let err = TextSerializer::default()
        .from_text::<Box<dyn Object>>("@no.such.Type 1")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn abstract_type_has_no_exact_values() {
    let err = BinarySerializer::default()
        .from_bytes::<Box<dyn Object>>(&[1u8])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn nesting_depth_is_limited() {
    let chain: Box<dyn Object> = Box::new(Node {
        next: Some(Box::new(Node {
            next: Some(Box::new(Node { next: None })),
        })),
    });
    let bytes = BinarySerializer::default().to_bytes(&chain).unwrap();

    let copy: Box<dyn Object> = BinarySerializer::default().from_bytes(&bytes).unwrap();
    assert!(copy.is::<Node>());

    let err = BinarySerializer::default()
        .max_dyn_depth(2)
        .from_bytes::<Box<dyn Object>>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::DepthExceed(_)));

    let text = TextSerializer::default().to_text(&chain).unwrap();
    let err = TextSerializer::default()
        .max_dyn_depth(2)
        .from_text::<Box<dyn Object>>(&text)
        .unwrap_err();
    assert!(matches!(err, Error::DepthExceed(_)));
}

#[test]
fn conflicting_names_are_rejected() {
    twofold_core::register::<First>().unwrap();
    let err = twofold_core::register::<Second>().unwrap_err();
    assert!(matches!(err, Error::Argument(_)));

    let value: Box<dyn Object> = Box::new(Second { b: 1 });
    assert!(BinarySerializer::default().to_bytes(&value).is_err());
}
