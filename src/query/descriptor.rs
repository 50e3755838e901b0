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

//! Query descriptor handed to the store's query driver

use std::fmt;

use serde::{Deserialize, Serialize};

use super::filter::Filter;
use super::predicate::PredicateProgram;

/// Bins returned for each matching record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// `SELECT *`
    #[default]
    AllBins,
    /// Named bins, in query order
    Bins(Vec<String>),
}

impl Projection {
    /// The bin names, or None for `*`
    pub fn bin_names(&self) -> Option<&[String]> {
        match self {
            Projection::AllBins => None,
            Projection::Bins(names) => Some(names),
        }
    }
}

/// Compiled form of one SELECT statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub projection: Projection,
    pub namespace: String,
    pub set: Option<String>,
    pub filter: Option<Filter>,
    pub predicate: Option<PredicateProgram>,
}

impl QueryDescriptor {
    /// Fully-qualified source name, `namespace` or `namespace.set`
    pub fn source(&self) -> String {
        match &self.set {
            Some(set) => format!("{}.{}", self.namespace, set),
            None => self.namespace.clone(),
        }
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.projection {
            Projection::AllBins => write!(f, "SELECT *")?,
            Projection::Bins(names) => write!(f, "SELECT {}", names.join(", "))?,
        }
        write!(f, " FROM {}", self.source())?;
        if let Some(filter) = &self.filter {
            write!(f, " WITH {}", filter)?;
        }
        if let Some(predicate) = &self.predicate {
            write!(f, " PREDICATE [{}]", predicate)?;
        }
        Ok(())
    }
}
