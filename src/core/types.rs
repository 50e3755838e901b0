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

//! Core type definitions
//!
//! This module defines the store's value-type tags ([`ParticleType`]) and the
//! secondary index collection kinds ([`IndexCollectionType`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// Primitive type tag of a bin (or of an iteration variable)
///
/// The discriminants match the store's particle type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum ParticleType {
    /// 64-bit signed integer
    Integer = 1,

    /// 64-bit floating point number
    Double = 2,

    /// UTF-8 string
    String = 3,

    /// GeoJSON document
    #[serde(rename = "GEOJSON")]
    GeoJson = 23,

    /// Key/value map
    Map = 19,

    /// Ordered list
    List = 20,
}

impl ParticleType {
    /// Returns true if this type is numeric (INTEGER or DOUBLE)
    pub fn is_numeric(&self) -> bool {
        matches!(self, ParticleType::Integer | ParticleType::Double)
    }

    /// Returns true if this type is a collection (LIST or MAP)
    pub fn is_collection(&self) -> bool {
        matches!(self, ParticleType::List | ParticleType::Map)
    }

    /// Returns the type ID as u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Create ParticleType from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ParticleType::Integer),
            2 => Some(ParticleType::Double),
            3 => Some(ParticleType::String),
            19 => Some(ParticleType::Map),
            20 => Some(ParticleType::List),
            23 => Some(ParticleType::GeoJson),
            _ => None,
        }
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleType::Integer => write!(f, "INTEGER"),
            ParticleType::Double => write!(f, "DOUBLE"),
            ParticleType::String => write!(f, "STRING"),
            ParticleType::GeoJson => write!(f, "GEOJSON"),
            ParticleType::List => write!(f, "LIST"),
            ParticleType::Map => write!(f, "MAP"),
        }
    }
}

impl FromStr for ParticleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INTEGER" | "INT" | "LONG" => Ok(ParticleType::Integer),
            "DOUBLE" | "FLOAT" => Ok(ParticleType::Double),
            "STRING" | "TEXT" => Ok(ParticleType::String),
            "GEOJSON" => Ok(ParticleType::GeoJson),
            "LIST" => Ok(ParticleType::List),
            "MAP" => Ok(ParticleType::Map),
            _ => Err(Error::UnknownParticleType(s.to_string())),
        }
    }
}

/// Collection kind a secondary index is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexCollectionType {
    /// Plain scalar bin
    #[default]
    Default,

    /// Elements of a list bin
    List,

    /// Keys of a map bin
    MapKeys,

    /// Values of a map bin
    MapValues,
}

impl fmt::Display for IndexCollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexCollectionType::Default => write!(f, "DEFAULT"),
            IndexCollectionType::List => write!(f, "LIST"),
            IndexCollectionType::MapKeys => write!(f, "MAPKEYS"),
            IndexCollectionType::MapValues => write!(f, "MAPVALUES"),
        }
    }
}

impl FromStr for IndexCollectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEFAULT" => Ok(IndexCollectionType::Default),
            "LIST" => Ok(IndexCollectionType::List),
            "MAPKEYS" => Ok(IndexCollectionType::MapKeys),
            "MAPVALUES" => Ok(IndexCollectionType::MapValues),
            _ => Err(Error::UnknownIndexCollection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_type_from_str() {
        assert_eq!("integer".parse::<ParticleType>().unwrap(), ParticleType::Integer);
        assert_eq!("DOUBLE".parse::<ParticleType>().unwrap(), ParticleType::Double);
        assert_eq!("GeoJSON".parse::<ParticleType>().unwrap(), ParticleType::GeoJson);
        assert!("BLOB".parse::<ParticleType>().is_err());
    }

    #[test]
    fn test_particle_type_u8_roundtrip() {
        for t in [
            ParticleType::Integer,
            ParticleType::Double,
            ParticleType::String,
            ParticleType::GeoJson,
            ParticleType::List,
            ParticleType::Map,
        ] {
            assert_eq!(ParticleType::from_u8(t.as_u8()), Some(t));
        }
        assert_eq!(ParticleType::from_u8(0), None);
    }

    #[test]
    fn test_particle_type_classification() {
        assert!(ParticleType::Double.is_numeric());
        assert!(!ParticleType::String.is_numeric());
        assert!(ParticleType::Map.is_collection());
        assert!(!ParticleType::GeoJson.is_collection());
    }

    #[test]
    fn test_index_collection_type() {
        assert_eq!(IndexCollectionType::default(), IndexCollectionType::Default);
        assert_eq!(
            "mapkeys".parse::<IndexCollectionType>().unwrap(),
            IndexCollectionType::MapKeys
        );
        assert_eq!(IndexCollectionType::MapValues.to_string(), "MAPVALUES");
    }
}
