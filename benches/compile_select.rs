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

//! Compile latency for AQL SELECT statements
//!
//! Run with: cargo bench --bench compile_select
//!
//! Compares:
//! - a cold compiler built for every statement
//! - the registered compiler looked up by schema
//! - a held compiler reused directly

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use aql_select::{Compiler, ParticleType, Schema};

const SIMPLE: &str = "SELECT * FROM namespace1.sett WHERE foo = 10";

const COMPLEX: &str = "SELECT foo,bar,baz FROM namespace1.sett WITH (baz='a') \
    WHERE (foo>2 AND (bar <=3 OR foo>5) AND bar >3) OR NOT (foo<=100) \
    AND ma ANY MAPKEYS (ko <= 999) AND baz LIKE '/sparta.*/ie?'";

fn schema() -> Schema {
    Schema::builder()
        .add("namespace1.sett", "foo", ParticleType::Integer)
        .add("namespace1.sett", "bar", ParticleType::Double)
        .add("namespace1.sett", "baz", ParticleType::String)
        .add("namespace1.sett", "ma", ParticleType::Map)
        .add_var("namespace1.sett", "ma", "ko", ParticleType::Integer)
        .build()
}

fn bench_cold(c: &mut Criterion) {
    let schema = schema();
    let mut group = c.benchmark_group("cold_compiler");

    group.bench_function("simple", |b| {
        b.iter(|| {
            let compiler = Compiler::new(schema.clone());
            black_box(compiler.compile(black_box(SIMPLE)).unwrap())
        })
    });

    group.bench_function("complex", |b| {
        b.iter(|| {
            let compiler = Compiler::new(schema.clone());
            black_box(compiler.compile(black_box(COMPLEX)).unwrap())
        })
    });

    group.finish();
}

fn bench_registered(c: &mut Criterion) {
    let schema = schema();
    let mut group = c.benchmark_group("registered_compiler");

    group.bench_function("lookup_and_compile", |b| {
        b.iter(|| {
            let compiler = Compiler::for_schema(&schema);
            black_box(compiler.compile(black_box(COMPLEX)).unwrap())
        })
    });

    let compiler = Compiler::for_schema(&schema);
    group.bench_function("held_compiler", |b| {
        b.iter(|| black_box(compiler.compile(black_box(COMPLEX)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_cold, bench_registered);
criterion_main!(benches);
