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

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use twofold_core::{BinaryCodec, BinarySerializer, Serializer, Shape, TextCodec, TextSerializer};
use twofold_derive::TwofoldObject;

#[test]
fn test_simple_multi_thread() {
    let serializer = Arc::new(BinarySerializer::default());
    let src: HashSet<i32> = [41, 42, 43, 45, 46, 47].into_iter().collect();
    let handles: Vec<_> = src
        .iter()
        .map(|&item| {
            let serializer = Arc::clone(&serializer);
            thread::spawn(move || serializer.to_bytes(&item).unwrap())
        })
        .collect();
    let serialized: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let handles: Vec<_> = serialized
        .into_iter()
        .map(|bytes| {
            let serializer = Arc::clone(&serializer);
            thread::spawn(move || serializer.from_bytes::<i32>(&bytes).unwrap())
        })
        .collect();
    let dest: HashSet<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(dest, src);
}

#[test]
fn test_struct_multi_thread() {
    #[derive(TwofoldObject, Debug, PartialEq, Eq, Hash, Clone)]
    struct Item {
        f1: i32,
        label: String,
    }
    let serializer = Arc::new(TextSerializer::default());
    let src: HashSet<Item> = (40..48)
        .map(|f1| Item {
            f1,
            label: format!("item {f1}"),
        })
        .collect();
    let handles: Vec<_> = src
        .iter()
        .cloned()
        .map(|item| {
            let serializer = Arc::clone(&serializer);
            thread::spawn(move || {
                let text = serializer.to_text(&item).unwrap();
                serializer.from_text::<Item>(&text).unwrap()
            })
        })
        .collect();
    let dest: HashSet<Item> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(dest, src);
}

static BINARY_BUILDS: AtomicUsize = AtomicUsize::new(0);
static TEXT_BUILDS: AtomicUsize = AtomicUsize::new(0);

struct BinaryProbe;

impl Serializer for BinaryProbe {
    fn shape() -> Shape {
        BINARY_BUILDS.fetch_add(1, Ordering::SeqCst);
        Shape::managed()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("test.BinaryProbe")
    }

    fn default_value() -> Self {
        BinaryProbe
    }
}

struct TextProbe;

impl Serializer for TextProbe {
    fn shape() -> Shape {
        TEXT_BUILDS.fetch_add(1, Ordering::SeqCst);
        Shape::managed()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("test.TextProbe")
    }

    fn default_value() -> Self {
        TextProbe
    }
}

const THREADS: usize = 16;

#[test]
fn binary_codec_is_built_once() {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                BinaryCodec::<BinaryProbe>::get().unwrap()
            })
        })
        .collect();
    let codecs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(BINARY_BUILDS.load(Ordering::SeqCst), 1);
    assert!(codecs.iter().all(|codec| Arc::ptr_eq(codec, &codecs[0])));
}

#[test]
fn text_codec_is_built_once() {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                TextCodec::<TextProbe>::get().unwrap()
            })
        })
        .collect();
    let codecs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(TEXT_BUILDS.load(Ordering::SeqCst), 1);
    assert!(codecs.iter().all(|codec| Arc::ptr_eq(codec, &codecs[0])));
}
