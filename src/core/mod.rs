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

//! Core types and definitions
//!
//! - [`ParticleType`] - Value-type tags (INTEGER, DOUBLE, STRING, GEOJSON, LIST, MAP)
//! - [`IndexCollectionType`] - Collection kinds a secondary index covers
//! - [`Schema`] - Source -> bin -> type mapping supplied by the caller
//! - [`Error`] / [`SemanticError`] - Error types for compilation

pub mod error;
pub mod schema;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result, SemanticError};
pub use schema::{BinTypes, Schema, SchemaBuilder};
pub use types::{IndexCollectionType, ParticleType};
