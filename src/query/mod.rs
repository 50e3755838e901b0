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

//! Query descriptor model
//!
//! - [`QueryDescriptor`] - projection, source address, filter and predicate
//! - [`Filter`] - the single secondary-index lookup
//! - [`PredicateProgram`] / [`Instruction`] - postfix predicate program

pub mod descriptor;
pub mod filter;
pub mod predicate;

pub use descriptor::{Projection, QueryDescriptor};
pub use filter::{Filter, FilterValue, IndexRelation};
pub use predicate::{
    ComparisonOp, EqualityOp, GeoRelation, Instruction, IterCollection, IterMode, LogicOp,
    MetaKind, PredicateProgram, RegexFlags, Value, ValueKind,
};
