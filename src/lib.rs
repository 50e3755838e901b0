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

//! # AQL Select - SQL-like SELECT compiler for key-value record stores
//!
//! Compiles an extended AQL `SELECT` statement into a [`QueryDescriptor`]
//! that a record store client can execute directly:
//!
//! - the namespace, optional set and projected bins,
//! - at most one secondary index [`Filter`] from the `WITH` clause,
//! - a postfix [`PredicateProgram`] from the `WHERE` clause, typed against
//!   the bin types declared in a [`Schema`].
//!
//! ## Quick Start
//!
//! ```rust
//! use aql_select::{compile, ParticleType, Schema};
//!
//! let schema = Schema::builder()
//!     .add("namespace1.sett", "foo", ParticleType::Integer)
//!     .add("namespace1.sett", "bar", ParticleType::Double)
//!     .build();
//!
//! let descriptor = compile(
//!     &schema,
//!     "SELECT foo, bar FROM namespace1.sett WITH (baz = 'a') WHERE foo > 2 AND NOT bar <= -1.5",
//! )
//! .unwrap();
//!
//! assert_eq!(descriptor.namespace, "namespace1");
//! assert_eq!(
//!     descriptor.predicate.unwrap().to_string(),
//!     "foo 2 > bar -1 <= NOT AND"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Schema, particle types and errors ([`Schema`], [`Error`])
//! - [`parser`] - AQL lexer, parser and AST
//! - [`compiler`] - Clause compilers and the schema-keyed [`Compiler`] registry
//! - [`query`] - Compiled output ([`QueryDescriptor`], [`Filter`], [`Instruction`])

pub mod compiler;
pub mod core;
pub mod parser;
pub mod query;

// Re-export main types for convenience
pub use core::{
    BinTypes, Error, IndexCollectionType, ParticleType, Result, Schema, SchemaBuilder,
    SemanticError,
};

pub use compiler::Compiler;

pub use parser::{parse_select, ParseError, ParseErrors, SelectStatement};

pub use query::{
    Filter, FilterValue, IndexRelation, Instruction, PredicateProgram, Projection,
    QueryDescriptor, RegexFlags, Value, ValueKind,
};

/// Compile a statement with the registered compiler for `schema`
///
/// Shorthand for `Compiler::for_schema(schema).compile(sql)`.
pub fn compile(schema: &Schema, sql: &str) -> Result<QueryDescriptor> {
    Compiler::for_schema(schema).compile(sql)
}
