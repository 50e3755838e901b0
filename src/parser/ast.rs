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

//! Abstract Syntax Tree (AST) types for the AQL parser
//!
//! The tree is deliberately shallow. A WHERE clause is kept as the flat
//! sequence of parentheses, logic operators and atomic predicates in which it
//! was written; operator precedence is resolved later by the compiler.

use super::token::{Position, Token};
use std::fmt;

use crate::core::IndexCollectionType;
use crate::query::{ComparisonOp, EqualityOp, GeoRelation, IterCollection, IterMode, LogicOp};

// ============================================================================
// Core Traits
// ============================================================================

/// Node trait - base for all AST nodes
pub trait Node: fmt::Display + fmt::Debug {
    /// Returns the literal string of the first token
    fn token_literal(&self) -> &str;
    /// Returns the position of the node in source code
    fn position(&self) -> Position;
}

// ============================================================================
// Names and Literals
// ============================================================================

/// Identifier (bin, namespace, set or variable name)
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token, value: impl Into<String>) -> Self {
        Self {
            token,
            value: value.into(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// String literal, stored without its quotes
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

impl StringLiteral {
    /// Build from a string token whose literal still carries its quotes
    pub fn from_token(token: Token) -> Self {
        let value = strip_quotes(&token.literal, '\'').to_string();
        Self { token, value }
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.value.replace('\'', "''"))
    }
}

/// Numeric literal, kept as text so the compiler decides how to read it
#[derive(Debug, Clone, PartialEq)]
pub struct NumericLiteral {
    pub token: Token,
    /// Source text including a leading minus sign, e.g. `-100.000`
    pub text: String,
}

impl NumericLiteral {
    /// Returns true when the text has no fractional part or exponent
    pub fn is_integer(&self) -> bool {
        !self.text.contains(['.', 'e', 'E'])
    }
}

impl fmt::Display for NumericLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A scalar literal in a predicate or index expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Numeric(NumericLiteral),
    String(StringLiteral),
}

impl Literal {
    pub fn token(&self) -> &Token {
        match self {
            Literal::Numeric(n) => &n.token,
            Literal::String(s) => &s.token,
        }
    }

    /// Raw text of the literal, without quotes
    pub fn text(&self) -> &str {
        match self {
            Literal::Numeric(n) => &n.text,
            Literal::String(s) => &s.value,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Numeric(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{}", s),
        }
    }
}

/// CAST('...' AS type)
#[derive(Debug, Clone, PartialEq)]
pub struct CastExpression {
    pub token: Token,
    pub value: StringLiteral,
    /// Target type name, uppercased
    pub type_name: String,
}

impl CastExpression {
    /// Returns true if the cast targets the GEOJSON type
    pub fn is_geojson(&self) -> bool {
        self.type_name == "GEOJSON"
    }
}

impl fmt::Display for CastExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAST({} AS {})", self.value, self.type_name)
    }
}

// ============================================================================
// WITH clause
// ============================================================================

/// BETWEEN low AND high
#[derive(Debug, Clone, PartialEq)]
pub struct BetweenExpression {
    pub token: Token,
    pub low: NumericLiteral,
    pub high: NumericLiteral,
}

impl fmt::Display for BetweenExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BETWEEN {} AND {}", self.low, self.high)
    }
}

/// Relation keyword or operator of an index expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRelationToken {
    Equal,
    Contains,
    Within,
    Between,
}

impl fmt::Display for IndexRelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexRelationToken::Equal => write!(f, "="),
            IndexRelationToken::Contains => write!(f, "CONTAINS"),
            IndexRelationToken::Within => write!(f, "WITHIN"),
            IndexRelationToken::Between => write!(f, "BETWEEN"),
        }
    }
}

/// Right-hand side of an index expression
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOperand {
    Literal(Literal),
    Cast(CastExpression),
    Between(BetweenExpression),
}

impl fmt::Display for IndexOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexOperand::Literal(l) => write!(f, "{}", l),
            IndexOperand::Cast(c) => write!(f, "{}", c),
            IndexOperand::Between(b) => write!(f, "{}", b),
        }
    }
}

/// The single secondary-index expression of a WITH clause
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub token: Token,
    /// Declared index collection type, if any
    pub collection: Option<IndexCollectionType>,
    pub bin: Identifier,
    pub relation: IndexRelationToken,
    pub operand: IndexOperand,
}

impl fmt::Display for IndexExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(collection) = self.collection {
            write!(f, "{} ", collection)?;
        }
        match &self.operand {
            // BETWEEN carries its own keyword
            IndexOperand::Between(b) => write!(f, "{} {}", self.bin, b),
            operand => write!(f, "{} {} {}", self.bin, self.relation, operand),
        }
    }
}

impl Node for IndexExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn position(&self) -> Position {
        self.token.position
    }
}

// ============================================================================
// WHERE clause
// ============================================================================

/// Record metadata names usable in place of a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaName {
    Digest,
    Lut,
    RecSize,
    Ttl,
}

impl MetaName {
    /// Case-insensitive lookup of a metadata function name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "DIGEST" => Some(MetaName::Digest),
            "LUT" => Some(MetaName::Lut),
            "RECSIZE" => Some(MetaName::RecSize),
            "TTL" => Some(MetaName::Ttl),
            _ => None,
        }
    }
}

impl fmt::Display for MetaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaName::Digest => write!(f, "DIGEST"),
            MetaName::Lut => write!(f, "LUT"),
            MetaName::RecSize => write!(f, "RECSIZE"),
            MetaName::Ttl => write!(f, "TTL"),
        }
    }
}

/// DIGEST(n), LUT(), RECSIZE() or TTL()
#[derive(Debug, Clone, PartialEq)]
pub struct MetaExpression {
    pub token: Token,
    pub kind: MetaName,
    /// Modulo argument, DIGEST only
    pub modulo: Option<NumericLiteral>,
}

impl fmt::Display for MetaExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modulo {
            Some(m) => write!(f, "{}({})", self.kind, m),
            None => write!(f, "{}()", self.kind),
        }
    }
}

/// Left-hand side of an atomic predicate
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateSubject {
    Bin(Identifier),
    Meta(MetaExpression),
}

impl fmt::Display for PredicateSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateSubject::Bin(b) => write!(f, "{}", b),
            PredicateSubject::Meta(m) => write!(f, "{}", m),
        }
    }
}

/// Equality or ordering operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Equality(EqualityOp),
    Comparison(ComparisonOp),
}

impl CompareOperator {
    /// Map an operator token
    pub fn from_operator(op: &str) -> Option<Self> {
        EqualityOp::from_operator(op)
            .map(CompareOperator::Equality)
            .or_else(|| ComparisonOp::from_operator(op).map(CompareOperator::Comparison))
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOperator::Equality(op) => write!(f, "{}", op),
            CompareOperator::Comparison(op) => write!(f, "{}", op),
        }
    }
}

/// Operator of an atomic predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOperator {
    Compare(CompareOperator),
    Geo(GeoRelation),
    Like,
    /// CONTAINS, MAPKEYS or MAPVALUES over a collection bin
    Iterate {
        collection: IterCollection,
        /// ANY/ALL as written, None when omitted
        mode: Option<IterMode>,
    },
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateOperator::Compare(op) => write!(f, "{}", op),
            PredicateOperator::Geo(rel) => write!(f, "{}", rel),
            PredicateOperator::Like => write!(f, "LIKE"),
            PredicateOperator::Iterate {
                collection,
                mode: Some(mode),
            } => write!(f, "{} {}", mode, collection),
            PredicateOperator::Iterate {
                collection,
                mode: None,
            } => write!(f, "{}", collection),
        }
    }
}

/// (var op literal) applied to each element of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct IterationExpression {
    pub token: Token,
    pub var: Identifier,
    pub operator: CompareOperator,
    pub value: Literal,
}

impl fmt::Display for IterationExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.var, self.operator, self.value)
    }
}

/// Right-hand side of an atomic predicate
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateOperand {
    Literal(Literal),
    Cast(CastExpression),
    Iteration(IterationExpression),
}

impl fmt::Display for PredicateOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateOperand::Literal(l) => write!(f, "{}", l),
            PredicateOperand::Cast(c) => write!(f, "{}", c),
            PredicateOperand::Iteration(i) => write!(f, "{}", i),
        }
    }
}

/// One atomic WHERE predicate, e.g. `foo > 2` or `li ANY CONTAINS (v = 'x')`
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicExpression {
    pub token: Token,
    pub subject: PredicateSubject,
    pub operator: PredicateOperator,
    pub operand: PredicateOperand,
}

impl fmt::Display for AtomicExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.operator, self.operand)
    }
}

impl Node for AtomicExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn position(&self) -> Position {
        self.token.position
    }
}

/// One entry of a WHERE clause, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum WhereItem {
    OpenParen(Token),
    CloseParen(Token),
    Logic(LogicOp),
    Atomic(AtomicExpression),
}

impl fmt::Display for WhereItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereItem::OpenParen(_) => write!(f, "("),
            WhereItem::CloseParen(_) => write!(f, ")"),
            WhereItem::Logic(op) => write!(f, "{}", op),
            WhereItem::Atomic(a) => write!(f, "{}", a),
        }
    }
}

/// A WHERE clause as the flat sequence it was written in
#[derive(Debug, Clone, PartialEq)]
pub struct WhereExpression {
    pub token: Token,
    pub children: Vec<WhereItem>,
}

impl fmt::Display for WhereExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev_open = true;
        for child in &self.children {
            let is_close = matches!(child, WhereItem::CloseParen(_));
            if !prev_open && !is_close {
                write!(f, " ")?;
            }
            write!(f, "{}", child)?;
            prev_open = matches!(child, WhereItem::OpenParen(_));
        }
        Ok(())
    }
}

impl Node for WhereExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn position(&self) -> Position {
        self.token.position
    }
}

// ============================================================================
// Statement
// ============================================================================

/// Projection of a SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub enum SelectProjection {
    Star,
    Bins(Vec<Identifier>),
}

impl fmt::Display for SelectProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectProjection::Star => write!(f, "*"),
            SelectProjection::Bins(bins) => {
                let names: Vec<String> = bins.iter().map(|b| b.to_string()).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}

/// FROM namespace[.set]
#[derive(Debug, Clone, PartialEq)]
pub struct FromSet {
    pub namespace: Identifier,
    pub set: Option<Identifier>,
}

impl FromSet {
    /// Fully-qualified source name used for schema lookups
    pub fn qualified_name(&self) -> String {
        match &self.set {
            Some(set) => format!("{}.{}", self.namespace, set),
            None => self.namespace.value.clone(),
        }
    }
}

impl fmt::Display for FromSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub token: Token,
    pub projection: SelectProjection,
    pub from: FromSet,
    pub index: Option<IndexExpression>,
    pub where_clause: Option<WhereExpression>,
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = format!("SELECT {} FROM {}", self.projection, self.from);
        if let Some(ref index) = self.index {
            result.push_str(&format!(" WITH {}", index));
        }
        if let Some(ref where_clause) = self.where_clause {
            result.push_str(&format!(" WHERE {}", where_clause));
        }
        write!(f, "{}", result)
    }
}

impl Node for SelectStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn position(&self) -> Position {
        self.token.position
    }
}

/// Strip one pair of surrounding quotes, if present
pub(crate) fn strip_quotes(s: &str, quote: char) -> &str {
    if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
        &s[quote.len_utf8()..s.len() - quote.len_utf8()]
    } else {
        s
    }
}
