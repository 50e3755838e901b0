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

//! Secondary-index filter descriptor

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::IndexCollectionType;

/// Operand of an index lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterValue {
    Integer(i64),
    String(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(v) => write!(f, "{}", v),
            FilterValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Integer(v)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

/// How the index is probed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexRelation {
    Equal(FilterValue),
    Contains(FilterValue),
    Range { low: i64, high: i64 },
    GeoContains(String),
    GeoWithin(String),
}

/// A single secondary-index filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub bin: String,
    pub collection: IndexCollectionType,
    pub relation: IndexRelation,
}

impl Filter {
    /// Equality lookup on a scalar index
    pub fn equal(bin: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            bin: bin.into(),
            collection: IndexCollectionType::Default,
            relation: IndexRelation::Equal(value.into()),
        }
    }

    /// Containment lookup on a collection index
    pub fn contains(
        bin: impl Into<String>,
        collection: IndexCollectionType,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            bin: bin.into(),
            collection,
            relation: IndexRelation::Contains(value.into()),
        }
    }

    /// Inclusive integer range lookup
    pub fn range(
        bin: impl Into<String>,
        collection: IndexCollectionType,
        low: i64,
        high: i64,
    ) -> Self {
        Self {
            bin: bin.into(),
            collection,
            relation: IndexRelation::Range { low, high },
        }
    }

    /// Regions containing a GeoJSON point
    pub fn geo_contains(
        bin: impl Into<String>,
        collection: IndexCollectionType,
        geojson: impl Into<String>,
    ) -> Self {
        Self {
            bin: bin.into(),
            collection,
            relation: IndexRelation::GeoContains(geojson.into()),
        }
    }

    /// Points within a GeoJSON region
    pub fn geo_within(
        bin: impl Into<String>,
        collection: IndexCollectionType,
        geojson: impl Into<String>,
    ) -> Self {
        Self {
            bin: bin.into(),
            collection,
            relation: IndexRelation::GeoWithin(geojson.into()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.collection != IndexCollectionType::Default {
            write!(f, "{} ", self.collection)?;
        }
        match &self.relation {
            IndexRelation::Equal(v) => write!(f, "{} = {}", self.bin, v),
            IndexRelation::Contains(v) => write!(f, "{} CONTAINS {}", self.bin, v),
            IndexRelation::Range { low, high } => {
                write!(f, "{} BETWEEN {} AND {}", self.bin, low, high)
            }
            IndexRelation::GeoContains(g) => {
                write!(f, "{} CONTAINS CAST('{}' AS GEOJSON)", self.bin, g)
            }
            IndexRelation::GeoWithin(g) => {
                write!(f, "{} WITHIN CAST('{}' AS GEOJSON)", self.bin, g)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let f = Filter::equal("PK", "thisisaprimarykey");
        assert_eq!(f.collection, IndexCollectionType::Default);
        assert_eq!(
            f.relation,
            IndexRelation::Equal(FilterValue::String("thisisaprimarykey".into()))
        );

        let f = Filter::range("foo", IndexCollectionType::Default, 100, 200);
        assert_eq!(f.relation, IndexRelation::Range { low: 100, high: 200 });
    }

    #[test]
    fn test_display() {
        assert_eq!(Filter::equal("foo", 200).to_string(), "foo = 200");
        assert_eq!(
            Filter::contains("ma", IndexCollectionType::MapKeys, "a").to_string(),
            "MAPKEYS ma CONTAINS 'a'"
        );
        assert_eq!(
            Filter::range("foo", IndexCollectionType::Default, -1, 5).to_string(),
            "foo BETWEEN -1 AND 5"
        );
    }
}
