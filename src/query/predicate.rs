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

//! Predicate program - postfix instructions for the store's filter machine
//!
//! A [`PredicateProgram`] is a flat sequence of [`Instruction`]s in Reverse
//! Polish order. The store evaluates it on a stack: operands push, operators
//! pop their arity's worth of results and push one boolean.
//!
//! ```text
//! foo > 2 AND bar <= 3   =>   foo 2 > bar 3 <= AND
//! ```

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Value flavour of a bin, variable or equality operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueKind {
    Integer,
    String,
    GeoJson,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "INTEGER"),
            ValueKind::String => write!(f, "STRING"),
            ValueKind::GeoJson => write!(f, "GEOJSON"),
            ValueKind::List => write!(f, "LIST"),
            ValueKind::Map => write!(f, "MAP"),
        }
    }
}

/// Literal operand pushed by the program
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    String(String),
    GeoJson(String),
}

impl Value {
    /// The value flavour of this literal
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::GeoJson(_) => ValueKind::GeoJson,
        }
    }
}

/// Renders the literal as AQL source text
///
/// Strings are single-quoted with inner quotes doubled, so `it's` renders as
/// `'it''s'`. The stored value is the raw, unescaped text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::GeoJson(s) => write!(f, "GEOJSON '{}'", s.replace('\'', "''")),
        }
    }
}

/// Record metadata that can stand in for a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaKind {
    /// Record digest modulo N
    DigestModulo(i32),
    /// Last update time
    LastUpdate,
    /// Record size on device
    DeviceSize,
    /// Expiration time
    VoidTime,
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaKind::DigestModulo(m) => write!(f, "DIGEST({})", m),
            MetaKind::LastUpdate => write!(f, "LUT()"),
            MetaKind::DeviceSize => write!(f, "RECSIZE()"),
            MetaKind::VoidTime => write!(f, "TTL()"),
        }
    }
}

/// Equality operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EqualityOp {
    Equal,
    NotEqual,
}

impl EqualityOp {
    /// Map an operator token (`=`, `==`, `!=`, `<>`)
    pub fn from_operator(op: &str) -> Option<Self> {
        match op {
            "=" | "==" => Some(EqualityOp::Equal),
            "!=" | "<>" => Some(EqualityOp::NotEqual),
            _ => None,
        }
    }
}

impl fmt::Display for EqualityOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqualityOp::Equal => write!(f, "="),
            EqualityOp::NotEqual => write!(f, "!="),
        }
    }
}

/// Numeric ordering operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

impl ComparisonOp {
    /// Map an operator token (`>`, `>=`, `<`, `<=`)
    pub fn from_operator(op: &str) -> Option<Self> {
        match op {
            ">" => Some(ComparisonOp::Greater),
            ">=" => Some(ComparisonOp::GreaterEq),
            "<" => Some(ComparisonOp::Less),
            "<=" => Some(ComparisonOp::LessEq),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOp::Greater => write!(f, ">"),
            ComparisonOp::GreaterEq => write!(f, ">="),
            ComparisonOp::Less => write!(f, "<"),
            ComparisonOp::LessEq => write!(f, "<="),
        }
    }
}

/// Geo relations between a GEOJSON bin and a GEOJSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoRelation {
    Contains,
    Within,
}

impl fmt::Display for GeoRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoRelation::Contains => write!(f, "CONTAINS"),
            GeoRelation::Within => write!(f, "WITHIN"),
        }
    }
}

/// Collection part an iteration walks over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IterCollection {
    List,
    MapKeys,
    MapValues,
}

impl fmt::Display for IterCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterCollection::List => write!(f, "CONTAINS"),
            IterCollection::MapKeys => write!(f, "MAPKEYS"),
            IterCollection::MapValues => write!(f, "MAPVALUES"),
        }
    }
}

/// Whether every element or any element must match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IterMode {
    #[default]
    All,
    Any,
}

impl fmt::Display for IterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterMode::All => write!(f, "ALL"),
            IterMode::Any => write!(f, "ANY"),
        }
    }
}

/// Boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    Not,
    And,
    Or,
}

impl LogicOp {
    /// Number of sub-results the operator consumes
    pub fn arity(self) -> usize {
        match self {
            LogicOp::Not => 1,
            LogicOp::And | LogicOp::Or => 2,
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOp::Not => write!(f, "NOT"),
            LogicOp::And => write!(f, "AND"),
            LogicOp::Or => write!(f, "OR"),
        }
    }
}

bitflags! {
    /// POSIX regex flags carried by a regex-match instruction
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RegexFlags: u32 {
        /// Extended regular expression syntax
        const EXTENDED = 1;
        /// Case-insensitive matching
        const ICASE = 2;
        /// Report match only, no sub-expression capture
        const NOSUB = 4;
        /// Newline-sensitive matching
        const NEWLINE = 8;
    }
}

/// One instruction of a predicate program
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Push the value of a bin
    Bin { name: String, kind: ValueKind },
    /// Push the current element of an iteration
    Var { name: String, kind: ValueKind },
    /// Push a literal
    Value(Value),
    /// Push a record metadata value
    Meta(MetaKind),
    /// Compare two operands for (in)equality
    Equality { op: EqualityOp, kind: ValueKind },
    /// Order two integer operands
    Comparison(ComparisonOp),
    /// Relate two GEOJSON operands
    Geo(GeoRelation),
    /// Match a string operand against a pattern
    Regex(RegexFlags),
    /// Iteration context marker for the element predicate that follows
    Iterate {
        collection: IterCollection,
        mode: IterMode,
        var: String,
    },
    /// Combine boolean sub-results
    Logical { op: LogicOp, arity: usize },
}

impl Instruction {
    pub fn bin(name: impl Into<String>, kind: ValueKind) -> Self {
        Instruction::Bin {
            name: name.into(),
            kind,
        }
    }

    pub fn var(name: impl Into<String>, kind: ValueKind) -> Self {
        Instruction::Var {
            name: name.into(),
            kind,
        }
    }

    pub fn integer(value: i64) -> Self {
        Instruction::Value(Value::Integer(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Instruction::Value(Value::String(value.into()))
    }

    pub fn geojson(value: impl Into<String>) -> Self {
        Instruction::Value(Value::GeoJson(value.into()))
    }

    pub fn equality(op: EqualityOp, kind: ValueKind) -> Self {
        Instruction::Equality { op, kind }
    }

    pub fn iterate(collection: IterCollection, mode: IterMode, var: impl Into<String>) -> Self {
        Instruction::Iterate {
            collection,
            mode,
            var: var.into(),
        }
    }

    /// Logical operator with the arity it consumes
    pub fn logical(op: LogicOp) -> Self {
        Instruction::Logical {
            op,
            arity: op.arity(),
        }
    }

    /// Returns true for instructions that only push a value
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Instruction::Bin { .. }
                | Instruction::Var { .. }
                | Instruction::Value(_)
                | Instruction::Meta(_)
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Bin { name, .. } => write!(f, "{}", name),
            Instruction::Var { name, .. } => write!(f, "{}", name),
            Instruction::Value(v) => write!(f, "{}", v),
            Instruction::Meta(m) => write!(f, "{}", m),
            Instruction::Equality { op, .. } => write!(f, "{}", op),
            Instruction::Comparison(op) => write!(f, "{}", op),
            Instruction::Geo(rel) => write!(f, "{}", rel),
            Instruction::Regex(_) => write!(f, "LIKE"),
            Instruction::Iterate {
                collection,
                mode,
                var,
            } => write!(f, "{} {}({})", mode, collection, var),
            Instruction::Logical { op, .. } => write!(f, "{}", op),
        }
    }
}

/// A compiled boolean predicate in postfix order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateProgram(Vec<Instruction>);

impl PredicateProgram {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Instruction> {
        self.0
    }
}

impl From<Vec<Instruction>> for PredicateProgram {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }
}

impl<'a> IntoIterator for &'a PredicateProgram {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PredicateProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instr) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", instr)?;
        }
        Ok(())
    }
}
