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

//! Schema types - source to bin type mappings
//!
//! A [`Schema`] maps a fully-qualified source (`"namespace"` or
//! `"namespace.set"`) to the value types of its bins. Iteration variables are
//! typed through compound keys of the form `"bin.variable"`.
//!
//! Schemas are immutable and backed by ordered maps, so two structurally
//! equal schemas compare and hash equal. That is what the compiler registry
//! keys on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::types::ParticleType;

/// Bin name -> value type for one source
pub type BinTypes = BTreeMap<String, ParticleType>;

/// Type schema for every queryable source
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    sources: BTreeMap<String, BinTypes>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Decode a schema from JSON configuration
    ///
    /// The expected shape is `{ "ns.set": { "bin": "INTEGER", "ma.ko": "STRING" } }`.
    /// Type tags are case-insensitive.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(json)?;

        let mut sources = BTreeMap::new();
        for (source, bins) in raw {
            let mut types = BinTypes::new();
            for (bin, tag) in bins {
                let particle_type = tag.parse::<ParticleType>().map_err(|_| {
                    Error::InvalidSchema(format!(
                        "unknown type '{}' for bin '{}' in '{}'",
                        tag, bin, source
                    ))
                })?;
                types.insert(bin, particle_type);
            }
            sources.insert(source, types);
        }

        Ok(Self { sources })
    }

    /// Get the bin types of a fully-qualified source
    pub fn bin_types(&self, source: &str) -> Option<&BinTypes> {
        self.sources.get(source)
    }

    /// Get the type of a bin in a source
    pub fn particle_type(&self, source: &str, bin: &str) -> Option<ParticleType> {
        self.sources.get(source)?.get(bin).copied()
    }

    /// Iterate the fully-qualified source names
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the schema has no sources
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (source, bins) in &self.sources {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{}(", source)?;
            for (i, (bin, t)) in bins.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} {}", bin, t)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl From<BTreeMap<String, BinTypes>> for Schema {
    fn from(sources: BTreeMap<String, BinTypes>) -> Self {
        Self { sources }
    }
}

/// Builder for creating schemas
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    sources: BTreeMap<String, BinTypes>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bin type to a source
    pub fn add(
        mut self,
        source: impl Into<String>,
        bin: impl Into<String>,
        particle_type: ParticleType,
    ) -> Self {
        self.sources
            .entry(source.into())
            .or_default()
            .insert(bin.into(), particle_type);
        self
    }

    /// Add the element type of an iteration variable over a collection bin
    pub fn add_var(
        self,
        source: impl Into<String>,
        bin: &str,
        var: &str,
        particle_type: ParticleType,
    ) -> Self {
        self.add(source, format!("{}.{}", bin, var), particle_type)
    }

    /// Build the schema
    pub fn build(self) -> Schema {
        Schema {
            sources: self.sources,
        }
    }
}
