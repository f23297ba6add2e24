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

use std::collections::BTreeMap;

use twofold_core::error::Error;
use twofold_core::{Serializer, TextSerializer};
use twofold_derive::TwofoldObject;

#[derive(TwofoldObject, Debug, PartialEq)]
struct Point {
    #[twofold(rename = "X")]
    x: i32,
    #[twofold(rename = "Y")]
    y: i32,
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Profile {
    name: String,
    motto: String,
    origin: Point,
    tags: Vec<String>,
    rank: Option<u8>,
    weights: Vec<f64>,
}

#[derive(TwofoldObject, Clone, Copy, Debug, PartialEq)]
#[repr(i16)]
enum Mood {
    Calm,
    Grumpy,
}

fn read<T: Serializer>(input: &str) -> Result<T, Error> {
    TextSerializer::default().from_text(input)
}

fn round_trip<T: Serializer>(value: &T) -> T {
    let serializer = TextSerializer::default();
    let text = serializer.to_text(value).unwrap();
    serializer.from_text(&text).unwrap()
}

#[test]
fn record_without_line_returns() {
    let point: Point = read("{ X 42 Y //comment\n1337 }").unwrap();
    assert_eq!(point, Point { x: 42, y: 1337 });
}

#[test]
fn quoted_string_unescapes_quotes() {
    let value: String = read("\"kikoo \"\"lol\"\"\"").unwrap();
    assert_eq!(value, "kikoo \"lol\"");
}

#[test]
fn quoted_string_keeps_line_breaks() {
    let value: String = read("\"kikoo\nlol\"").unwrap();
    assert_eq!(value, "kikoo\nlol");
}

#[test]
fn bare_string_keeps_special_chars() {
    let value: String = read("kikoo : / = lol").unwrap();
    assert_eq!(value, "kikoo : / = lol");
    assert_eq!(round_trip(&value), value);
}

#[test]
fn bare_string_stops_at_comment() {
    let value: String = read("  hello world   // greeting\n").unwrap();
    assert_eq!(value, "hello world");
}

#[test]
fn records_are_indented() {
    let text = TextSerializer::default()
        .to_text(&Point { x: 1, y: -2 })
        .unwrap();
    assert_eq!(text, "{\n  X 1\n  Y -2\n}\n");

    let text = TextSerializer::default()
        .indent(4)
        .to_text(&Point { x: 1, y: -2 })
        .unwrap();
    assert_eq!(text, "{\n    X 1\n    Y -2\n}\n");
}

#[test]
fn fields_in_any_order_and_missing_fields_default() {
    let point: Point = read("{ Y 2 X 1 }").unwrap();
    assert_eq!(point, Point { x: 1, y: 2 });
    let point: Point = read("{ Y 5 }").unwrap();
    assert_eq!(point, Point { x: 0, y: 5 });
}

#[test]
fn unknown_field_is_a_parse_error_with_line() {
    let err = read::<Point>("{\n  X 1\n  Z 2\n}").unwrap_err();
    match err {
        Error::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unterminated_string_reports_its_start() {
    let err = read::<Vec<String>>("[\n  a\n  \"open\n\n").unwrap_err();
    match err {
        Error::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn bad_number_is_invalid_data() {
    let err = read::<i32>("forty-two").unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
    let err = read::<u8>("256").unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn empty_input_is_end_of_stream() {
    let err = read::<i32>("   // nothing here\n").unwrap_err();
    assert!(matches!(err, Error::EndOfStream { .. }));
}

#[test]
fn null_marker_reads_default() {
    assert_eq!(read::<Option<String>>("~").unwrap(), None);
    assert_eq!(read::<i32>("~").unwrap(), 0);
    assert_eq!(TextSerializer::default().to_text(&None::<i32>).unwrap(), "~\n");
}

#[test]
fn nested_options_without_a_text_form_are_refused() {
    assert_eq!(round_trip(&Some(Some(5u32))), Some(Some(5)));
    assert_eq!(round_trip(&None::<Option<u32>>), None);
    let err = TextSerializer::default()
        .to_text(&Some(None::<u32>))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn ambiguous_strings_are_quoted() {
    for value in ["", " padded ", "~", "@home", "a // b", "two\nlines", "[x]", "say \"hi\""] {
        let value = value.to_string();
        let text = TextSerializer::default().to_text(&value).unwrap();
        assert!(text.starts_with('"'), "{text:?}");
        assert_eq!(round_trip(&value), value);
    }
}

#[test]
fn unicode_whitespace_at_the_edges_survives() {
    for value in ["abc\u{a0}", "x\u{3000}", "x\u{b}", "\u{a0}lead"] {
        let value = value.to_string();
        let text = TextSerializer::default().to_text(&value).unwrap();
        assert!(text.starts_with('"'), "{text:?}");
        assert_eq!(round_trip(&value), value);
    }
    let inner = "a\u{a0}b".to_string();
    assert_eq!(TextSerializer::default().to_text(&inner).unwrap(), "a\u{a0}b\n");
    assert_eq!(round_trip(&inner), inner);
}

#[derive(TwofoldObject, Debug, PartialEq)]
struct Token {
    r#type: u8,
    r#ref: String,
}

#[test]
fn raw_identifier_fields_use_their_plain_name() {
    let token = Token {
        r#type: 3,
        r#ref: "main".to_string(),
    };
    let text = TextSerializer::default().to_text(&token).unwrap();
    assert_eq!(text, "{\n  type 3\n  ref main\n}\n");
    assert_eq!(round_trip(&token), token);
}

#[test]
fn nested_values_round_trip() {
    let profile = Profile {
        name: "Grace".to_string(),
        motto: "it's easier to ask forgiveness".to_string(),
        origin: Point { x: i32::MIN, y: i32::MAX },
        tags: vec!["navy".to_string(), String::new(), "cobol // compilers".to_string()],
        rank: Some(u8::MAX),
        weights: vec![0.1, -2.5e-300, f64::MAX],
    };
    assert_eq!(round_trip(&profile), profile);

    let unranked = Profile {
        rank: None,
        tags: vec![],
        weights: vec![],
        ..profile
    };
    assert_eq!(round_trip(&unranked), unranked);
}

#[test]
fn enums_are_variant_names() {
    let text = TextSerializer::default().to_text(&Mood::Grumpy).unwrap();
    assert_eq!(text, "Grumpy\n");
    assert_eq!(read::<Mood>("Calm").unwrap(), Mood::Calm);
    assert!(matches!(read::<Mood>("Sleepy"), Err(Error::InvalidData(_))));
}

#[test]
fn maps_are_flat_lists() {
    let mut map = BTreeMap::new();
    map.insert(1i32, 'a');
    map.insert(2i32, 'b');
    let text = TextSerializer::default().to_text(&map).unwrap();
    assert_eq!(text, "[ 1 a\n  2 b\n]\n");
    assert_eq!(round_trip(&map), map);

    let err = read::<BTreeMap<i32, i32>>("[ 1 2 3 ]").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn fixed_arrays_check_their_length() {
    assert_eq!(read::<[u8; 3]>("[ 1 2 3 ]").unwrap(), [1, 2, 3]);
    assert!(read::<[u8; 3]>("[ 1 2 ]").is_err());
}

#[test]
fn values_follow_each_other() {
    let serializer = TextSerializer::default();
    let mut out = Vec::new();
    serializer.serialize(&mut out, &"first line".to_string()).unwrap();
    serializer.serialize(&mut out, &7u64).unwrap();

    let mut input = out.as_slice();
    let first: String = serializer.deserialize(&mut input).unwrap();
    let second: u64 = serializer.deserialize(&mut input).unwrap();
    assert_eq!(first, "first line");
    assert_eq!(second, 7);
}
