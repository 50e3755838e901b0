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

//! AQL Parser
//!
//! This module provides the parser for AQL SELECT statements, including:
//!
//! - [`Lexer`] - Tokenizer for AQL input
//! - [`Parser`] - Parser that builds the AST from tokens
//! - [`ast`] - Abstract Syntax Tree types
//! - [`walk`] - Bottom-up clause events for [`ParseListener`]s
//! - [`token`] - Token types
//! - [`error`] - Parser error types
//!
//! # Example
//!
//! ```
//! use aql_select::parser::parse_select;
//!
//! let stmt = parse_select("SELECT * FROM ns.set WHERE foo > 2").unwrap();
//! assert_eq!(stmt.from.qualified_name(), "ns.set");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;
pub mod walk;

// Expression and statement parsing are implemented as impl blocks on Parser
mod expressions;
mod statements;

// Re-export main types
pub use ast::{
    AtomicExpression, BetweenExpression, CastExpression, CompareOperator, FromSet, Identifier,
    IndexExpression, IndexOperand, IndexRelationToken, IterationExpression, Literal,
    MetaExpression, MetaName, Node, NumericLiteral, PredicateOperand, PredicateOperator,
    PredicateSubject, SelectProjection, SelectStatement, StringLiteral, WhereExpression,
    WhereItem,
};
pub use error::{ParseError, ParseErrors};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Position, Token, TokenType};
pub use walk::{walk, ParseListener};

/// Parse one SELECT statement
///
/// Returns every syntax error found, not just the first one.
pub fn parse_select(sql: &str) -> Result<SelectStatement, ParseErrors> {
    let mut parser = Parser::new(sql);
    parser.parse()
}
