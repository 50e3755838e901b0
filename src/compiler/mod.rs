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

//! AQL compiler
//!
//! Turns a parsed SELECT statement into a [`QueryDescriptor`]:
//!
//! - [`index`] - WITH clause to secondary index [`Filter`](crate::query::Filter)
//! - [`logical`] - WHERE clause shunting yard, with the [`precedence`] table
//! - [`atomic`] - Typed instructions for each atomic predicate
//! - [`assembler`] - Per-call context collecting the clause results
//! - [`registry`] - Process-wide compiler cache keyed by schema
//!
//! # Example
//!
//! ```
//! use aql_select::compiler::Compiler;
//! use aql_select::core::{ParticleType, Schema};
//!
//! let schema = Schema::builder()
//!     .add("ns.set", "foo", ParticleType::Integer)
//!     .build();
//! let compiler = Compiler::for_schema(&schema);
//! let descriptor = compiler.compile("SELECT * FROM ns.set WHERE foo > 2").unwrap();
//! assert_eq!(descriptor.predicate.unwrap().to_string(), "foo 2 >");
//! ```

pub mod assembler;
pub mod atomic;
pub mod index;
pub mod logical;
pub mod precedence;
pub mod registry;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{Result, Schema};
use crate::parser::{parse_select, walk};
use crate::query::QueryDescriptor;

pub use assembler::StatementAssembler;
pub use atomic::{regex_pattern, truncate_integer, AtomicCompiler};
pub use index::compile_index;
pub use logical::{to_postfix, PostfixItem};
pub use registry::{compiler_for, registered_compilers};

/// Compiles AQL SELECT statements against one schema
///
/// A compiler is immutable; every [`compile`](Compiler::compile) call works
/// in a fresh [`StatementAssembler`], so one compiler can be shared freely
/// between threads.
#[derive(Debug)]
pub struct Compiler {
    schema: Arc<Schema>,
}

impl Compiler {
    /// Create a standalone compiler, bypassing the registry
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Get the shared compiler for a schema
    ///
    /// Structurally equal schemas share one compiler.
    pub fn for_schema(schema: &Schema) -> Arc<Compiler> {
        compiler_for(schema)
    }

    /// The schema this compiler types bins against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn schema_arc(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Compile one SELECT statement
    ///
    /// Syntax errors are reported all at once as [`Error::Syntax`](crate::core::Error::Syntax).
    /// Otherwise the first semantic problem is returned as
    /// [`Error::Semantic`](crate::core::Error::Semantic).
    pub fn compile(&self, sql: &str) -> Result<QueryDescriptor> {
        let stmt = parse_select(sql)?;

        let mut assembler = StatementAssembler::new(&self.schema);
        walk(&stmt, &mut assembler)?;
        let descriptor = assembler.finish();

        debug!(
            source = %descriptor.source(),
            filter = descriptor.filter.is_some(),
            instructions = descriptor.predicate.as_ref().map_or(0, |p| p.len()),
            "compiled statement"
        );
        if let Some(predicate) = &descriptor.predicate {
            trace!(program = %predicate, "predicate program");
        }

        Ok(descriptor)
    }
}
