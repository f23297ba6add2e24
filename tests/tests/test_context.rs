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

use twofold_core::{BinarySerializer, Object, SerializationContext, TextSerializer};
use twofold_derive::TwofoldObject;

#[derive(TwofoldObject, Debug, PartialEq)]
struct Point {
    #[twofold(rename = "X")]
    x: i32,
    #[twofold(rename = "Y")]
    y: i32,
}

#[derive(TwofoldObject, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[twofold(blittable)]
struct RawPoint {
    x: i32,
    y: i32,
}

fn as_string(object: Box<dyn Object>) -> String {
    assert!(object.is::<String>(), "got {object:?}");
    object.downcast_ref::<String>().cloned().unwrap_or_default()
}

mod binary {
    use super::*;

    #[test]
    fn marshal_to_another_type() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| format!("value {i}"));
        let bytes = serializer.to_bytes_with_context(&42i32, &context).unwrap();
        let copy: String = serializer.from_bytes(&bytes).unwrap();
        assert_eq!(copy, "value 42");
    }

    #[test]
    fn marshal_to_same_type() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().marshal(|_: &i32| 1337i32);
        let bytes = serializer.to_bytes_with_context(&42i32, &context).unwrap();
        let copy: i32 = serializer.from_bytes(&bytes).unwrap();
        assert_eq!(copy, 1337);
    }

    #[test]
    fn marshal_for_object() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| format!("value {i}"));
        let value: Box<dyn Object> = Box::new(42i32);
        let bytes = serializer.to_bytes_with_context(&value, &context).unwrap();
        let copy: Box<dyn Object> = serializer.from_bytes(&bytes).unwrap();
        assert_eq!(as_string(copy), "value 42");
    }

    #[test]
    fn marshal_sub_field() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| i * 2);
        let bytes = serializer
            .to_bytes_with_context(&Point { x: 1, y: 2 }, &context)
            .unwrap();
        let copy: Point = serializer.from_bytes(&bytes).unwrap();
        assert_eq!(copy, Point { x: 2, y: 4 });
    }

    #[test]
    fn unmarshal_to_same_type() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().unmarshal(|_: i32| 1337i32);
        let bytes = serializer.to_bytes(&42i32).unwrap();
        let copy: i32 = serializer.from_bytes_with_context(&bytes, &context).unwrap();
        assert_eq!(copy, 1337);
    }

    #[test]
    fn unmarshal_sub_field() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().unmarshal(|i: i32| i * 2);
        let bytes = serializer.to_bytes(&Point { x: 1, y: 2 }).unwrap();
        let copy: Point = serializer.from_bytes_with_context(&bytes, &context).unwrap();
        assert_eq!(copy, Point { x: 2, y: 4 });
    }

    #[test]
    fn unmarshal_for_object() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().unmarshal(|i: i32| format!("value {i}"));
        let value: Box<dyn Object> = Box::new(42i32);
        let bytes = serializer.to_bytes(&value).unwrap();
        let copy: Box<dyn Object> = serializer.from_bytes_with_context(&bytes, &context).unwrap();
        assert_eq!(as_string(copy), "value 42");
    }

    #[test]
    fn unmarshal_output_must_fit_the_declared_type() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new().unmarshal(|i: i32| format!("value {i}"));
        let bytes = serializer.to_bytes(&42i32).unwrap();
        // An i32 slot cannot hold the string, so the value is read as is.
        let copy: i32 = serializer.from_bytes_with_context(&bytes, &context).unwrap();
        assert_eq!(copy, 42);
    }

    #[test]
    fn blittable_struct_ignores_field_overrides() {
        let serializer = BinarySerializer::default();
        let context = SerializationContext::new()
            .marshal(|i: &i32| i * 2)
            .unmarshal(|i: i32| i * 10);
        let bytes = serializer
            .to_bytes_with_context(&RawPoint { x: 1, y: 2 }, &context)
            .unwrap();
        let copy: RawPoint = serializer.from_bytes_with_context(&bytes, &context).unwrap();
        assert_eq!(copy, RawPoint { x: 1, y: 2 });
    }

    #[test]
    fn cleared_override_no_longer_applies() {
        let serializer = BinarySerializer::default();
        let mut context = SerializationContext::new().marshal(|_: &i32| 1337i32);
        context.clear_marshal::<i32>();
        let bytes = serializer.to_bytes_with_context(&42i32, &context).unwrap();
        assert_eq!(bytes, serializer.to_bytes(&42i32).unwrap());
    }
}

mod text {
    use super::*;

    #[test]
    fn marshal_to_another_type() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| format!("value {i}"));
        let text = serializer.to_text_with_context(&42i32, &context).unwrap();
        assert_eq!(text, "@string value 42\n");
        let copy: String = serializer.from_text(&text).unwrap();
        assert_eq!(copy, "value 42");
    }

    #[test]
    fn marshal_to_same_type() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().marshal(|_: &i32| 1337i32);
        let text = serializer.to_text_with_context(&42i32, &context).unwrap();
        let copy: i32 = serializer.from_text(&text).unwrap();
        assert_eq!(copy, 1337);
    }

    #[test]
    fn marshal_for_object() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| format!("value {i}"));
        let value: Box<dyn Object> = Box::new(42i32);
        let text = serializer.to_text_with_context(&value, &context).unwrap();
        let copy: Box<dyn Object> = serializer.from_text(&text).unwrap();
        assert_eq!(as_string(copy), "value 42");
    }

    #[test]
    fn marshal_sub_field() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| i * 2);
        let text = serializer
            .to_text_with_context(&Point { x: 1, y: 2 }, &context)
            .unwrap();
        let copy: Point = serializer.from_text(&text).unwrap();
        assert_eq!(copy, Point { x: 2, y: 4 });
    }

    #[test]
    fn unmarshal_to_same_type() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().unmarshal(|_: i32| 1337i32);
        let copy: i32 = serializer.from_text_with_context("42", &context).unwrap();
        assert_eq!(copy, 1337);
    }

    #[test]
    fn unmarshal_sub_field() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().unmarshal(|i: i32| i * 2);
        let copy: Point = serializer
            .from_text_with_context("{ X 1 Y 2 }", &context)
            .unwrap();
        assert_eq!(copy, Point { x: 2, y: 4 });
    }

    #[test]
    fn unmarshal_for_object() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().unmarshal(|i: i32| format!("value {i}"));
        let value: Box<dyn Object> = Box::new(42i32);
        let text = serializer.to_text(&value).unwrap();
        assert_eq!(text, "@i32 42\n");
        let copy: Box<dyn Object> = serializer.from_text_with_context(&text, &context).unwrap();
        assert_eq!(as_string(copy), "value 42");
    }

    #[test]
    fn blittable_struct_uses_field_overrides() {
        let serializer = TextSerializer::default();
        let context = SerializationContext::new().marshal(|i: &i32| i * 2);
        let text = serializer
            .to_text_with_context(&RawPoint { x: 1, y: 2 }, &context)
            .unwrap();
        let copy: RawPoint = serializer.from_text(&text).unwrap();
        assert_eq!(copy, RawPoint { x: 2, y: 4 });
    }
}

#[test]
fn dropped_context_releases_its_overrides() {
    let first = SerializationContext::new().marshal(|_: &i32| 1337i32);
    let id = first.id();
    let bytes = BinarySerializer::default()
        .to_bytes_with_context(&42i32, &first)
        .unwrap();
    assert_eq!(BinarySerializer::default().from_bytes::<i32>(&bytes).unwrap(), 1337);
    drop(first);

    // Other tests draw ids concurrently, so keep every context alive until
    // the released id comes back.
    let mut held = Vec::new();
    let reused = loop {
        let context = SerializationContext::new();
        if context.id() == id {
            break context;
        }
        held.push(context);
        assert!(held.len() < 100_000, "released id {id} was never handed out again");
    };
    assert!(!reused.has_marshal::<i32>());
    let bytes = BinarySerializer::default()
        .to_bytes_with_context(&42i32, &reused)
        .unwrap();
    assert_eq!(BinarySerializer::default().from_bytes::<i32>(&bytes).unwrap(), 42);
}

#[test]
fn one_context_serves_many_calls() {
    let serializer = BinarySerializer::default();
    let context = SerializationContext::new().marshal(|s: &String| s.to_uppercase());
    for word in ["a", "bc", ""] {
        let bytes = serializer
            .to_bytes_with_context(&word.to_string(), &context)
            .unwrap();
        let copy: String = serializer.from_bytes(&bytes).unwrap();
        assert_eq!(copy, word.to_uppercase());
    }
}
