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

//! Process-wide compiler registry
//!
//! One [`Compiler`] per structurally distinct schema. Entries are never
//! evicted.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::Compiler;
use crate::core::Schema;

/// Global compiler registry keyed by schema content
static COMPILER_REGISTRY: LazyLock<RwLock<FxHashMap<Arc<Schema>, Arc<Compiler>>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Get the compiler for a schema, creating it on first use
pub fn compiler_for(schema: &Schema) -> Arc<Compiler> {
    {
        let registry = COMPILER_REGISTRY.read();
        if let Some(compiler) = registry.get(schema) {
            debug!(sources = schema.len(), "reusing registered compiler");
            return Arc::clone(compiler);
        }
    }

    let mut registry = COMPILER_REGISTRY.write();

    // Double-check after acquiring write lock
    if let Some(compiler) = registry.get(schema) {
        return Arc::clone(compiler);
    }

    let compiler = Arc::new(Compiler::new(schema.clone()));
    registry.insert(Arc::clone(compiler.schema_arc()), Arc::clone(&compiler));
    debug!(
        sources = schema.len(),
        registered = registry.len(),
        "registered new compiler"
    );
    compiler
}

/// Number of registered compilers
pub fn registered_compilers() -> usize {
    COMPILER_REGISTRY.read().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParticleType;

    #[test]
    fn test_same_schema_same_compiler() {
        let a = Schema::builder()
            .add("registry.unit", "foo", ParticleType::Integer)
            .add("registry.unit", "bar", ParticleType::String)
            .build();
        let b = Schema::builder()
            .add("registry.unit", "bar", ParticleType::String)
            .add("registry.unit", "foo", ParticleType::Integer)
            .build();

        let first = compiler_for(&a);
        let second = compiler_for(&b);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registered_compilers() >= 1);
    }

    #[test]
    fn test_different_schema_different_compiler() {
        let a = Schema::builder()
            .add("registry.unit2", "foo", ParticleType::Integer)
            .build();
        let b = Schema::builder()
            .add("registry.unit2", "foo", ParticleType::Double)
            .build();

        assert!(!Arc::ptr_eq(&compiler_for(&a), &compiler_for(&b)));
    }
}
