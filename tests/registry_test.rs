// Copyright 2025 Stoolap Contributors
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

//! Compiler Registry Tests
//!
//! Tests schema-keyed compiler reuse, including across threads

use std::sync::Arc;
use std::thread;

use aql_select::compiler::registered_compilers;
use aql_select::{Compiler, ParticleType, Schema};

fn schema(set: &str) -> Schema {
    Schema::builder()
        .add(format!("registry.{}", set), "foo", ParticleType::Integer)
        .add(format!("registry.{}", set), "ma", ParticleType::Map)
        .add_var(format!("registry.{}", set), "ma", "ko", ParticleType::Integer)
        .build()
}

#[test]
fn test_equal_schemas_share_compiler() {
    let first = Compiler::for_schema(&schema("shared"));
    let second = Compiler::for_schema(&schema("shared"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.schema(), &schema("shared"));
}

#[test]
fn test_distinct_schemas_get_distinct_compilers() {
    let before = registered_compilers();
    let a = Compiler::for_schema(&schema("distinct_a"));
    let b = Compiler::for_schema(&schema("distinct_b"));
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(registered_compilers() >= before + 2);
}

#[test]
fn test_schema_from_json_matches_builder() {
    let json = r#"{ "registry.json": { "foo": "INTEGER", "ma": "map", "ma.ko": "Integer" } }"#;
    let from_json = Schema::from_json(json).expect("Failed to load schema");
    assert_eq!(from_json, schema("json"));
    assert!(Arc::ptr_eq(
        &Compiler::for_schema(&from_json),
        &Compiler::for_schema(&schema("json"))
    ));
}

#[test]
fn test_concurrent_lookup_creates_one_compiler() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| Compiler::for_schema(&schema("concurrent"))))
        .collect();
    let compilers: Vec<Arc<Compiler>> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();
    for compiler in &compilers[1..] {
        assert!(Arc::ptr_eq(&compilers[0], compiler));
    }
}

#[test]
fn test_shared_compiler_compiles_in_parallel() {
    let compiler = Compiler::for_schema(&schema("parallel"));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let compiler = Arc::clone(&compiler);
            thread::spawn(move || {
                compiler
                    .compile(&format!(
                        "SELECT * FROM registry.parallel WHERE foo > {} AND ma ANY MAPKEYS (ko = {})",
                        i, i
                    ))
                    .expect("Failed to compile")
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let descriptor = handle.join().expect("Thread panicked");
        assert_eq!(
            descriptor.predicate.unwrap().to_string(),
            format!("foo {} > ANY MAPKEYS(ko) ma ko {} = AND", i, i)
        );
    }
}
