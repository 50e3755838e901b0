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

//! Expression parsing methods for the AQL Parser
//!
//! Covers the WITH clause (index expressions) and the WHERE clause (flat
//! sequences of atomic predicates, logic operators and parentheses).

use super::ast::*;
use super::parser::Parser;
use super::token::{Token, TokenType};

use crate::core::IndexCollectionType;
use crate::query::{GeoRelation, IterCollection, IterMode, LogicOp};

impl Parser {
    // ========================================================================
    // WITH clause
    // ========================================================================

    /// Parse the index expression of a WITH clause
    pub(crate) fn parse_index_expression(&mut self) -> Option<IndexExpression> {
        let token = self.peek_token.clone();

        // A leading LIST/MAPKEYS/MAPVALUES is the index type unless the token
        // after it starts the relation, in which case it is the bin name
        let mut collection = None;
        let mut bin = None;
        if let Some(declared) = index_collection(&self.peek_token) {
            self.next_token();
            if self.peek_starts_index_relation() {
                bin = Some(Identifier::new(
                    self.cur_token.clone(),
                    self.cur_token.literal.clone(),
                ));
            } else {
                collection = Some(declared);
            }
        }

        let parenthesized = bin.is_none() && self.peek_token_is_punctuator("(");
        if parenthesized {
            self.next_token();
        }

        let bin = match bin {
            Some(bin) => bin,
            None => self.expect_identifier("bin name")?,
        };

        let (relation, operand) = self.parse_index_relation()?;

        if parenthesized && !self.expect_punctuator(")") {
            return None;
        }

        Some(IndexExpression {
            token,
            collection,
            bin,
            relation,
            operand,
        })
    }

    fn peek_starts_index_relation(&self) -> bool {
        self.peek_token_is(TokenType::Operator)
            || self.peek_token_is_keyword("CONTAINS")
            || self.peek_token_is_keyword("WITHIN")
            || self.peek_token_is_keyword("BETWEEN")
    }

    fn parse_index_relation(&mut self) -> Option<(IndexRelationToken, IndexOperand)> {
        let relation = if self.peek_token_is_operator("=") || self.peek_token_is_operator("==") {
            IndexRelationToken::Equal
        } else if self.peek_token_is_keyword("CONTAINS") {
            IndexRelationToken::Contains
        } else if self.peek_token_is_keyword("WITHIN") {
            IndexRelationToken::Within
        } else if self.peek_token_is_keyword("BETWEEN") {
            IndexRelationToken::Between
        } else {
            self.peek_error("index relation (=, CONTAINS, WITHIN or BETWEEN)");
            return None;
        };
        self.next_token();

        let operand = match relation {
            IndexRelationToken::Between => {
                let token = self.cur_token.clone();
                let low = self.parse_numeric_literal()?;
                if !self.expect_keyword("AND") {
                    return None;
                }
                let high = self.parse_numeric_literal()?;
                IndexOperand::Between(BetweenExpression { token, low, high })
            }
            // The pairing of relation and operand is checked by the compiler
            _ if self.peek_token_is_keyword("CAST") => {
                IndexOperand::Cast(self.parse_cast_expression()?)
            }
            _ => IndexOperand::Literal(self.parse_literal()?),
        };

        Some((relation, operand))
    }

    // ========================================================================
    // WHERE clause
    // ========================================================================

    /// Parse a WHERE clause into its flat item sequence
    ///
    /// Only the alternation of operands and connectives is checked here.
    /// Parenthesis balance is left to the compiler, which reports the index
    /// of the offending token.
    pub(crate) fn parse_where_expression(&mut self) -> Option<WhereExpression> {
        let token = self.cur_token.clone();
        let mut children = Vec::new();
        let mut expect_operand = true;

        while !self.peek_token_is(TokenType::Eof) && !self.peek_token_is_punctuator(";") {
            if expect_operand {
                if self.peek_token_is_punctuator("(") {
                    self.next_token();
                    children.push(WhereItem::OpenParen(self.cur_token.clone()));
                } else if self.peek_token_is_keyword("NOT") {
                    self.next_token();
                    children.push(WhereItem::Logic(LogicOp::Not));
                } else {
                    children.push(WhereItem::Atomic(self.parse_atomic_expression()?));
                    expect_operand = false;
                }
            } else if self.peek_token_is_punctuator(")") {
                self.next_token();
                children.push(WhereItem::CloseParen(self.cur_token.clone()));
            } else if self.peek_token_is_keyword("AND") {
                self.next_token();
                children.push(WhereItem::Logic(LogicOp::And));
                expect_operand = true;
            } else if self.peek_token_is_keyword("OR") {
                self.next_token();
                children.push(WhereItem::Logic(LogicOp::Or));
                expect_operand = true;
            } else {
                self.peek_error("AND, OR or ')'");
                return None;
            }
        }

        if expect_operand {
            self.peek_error("predicate");
            return None;
        }

        Some(WhereExpression { token, children })
    }

    /// Parse one atomic predicate
    fn parse_atomic_expression(&mut self) -> Option<AtomicExpression> {
        if !self.peek_token_is_identifier_like() {
            self.peek_error("predicate");
            return None;
        }
        self.next_token();
        let token = self.cur_token.clone();

        // Metadata functions are plain identifiers followed by '('
        if self.cur_token_is(TokenType::Identifier) && self.peek_token_is_punctuator("(") {
            if let Some(kind) = MetaName::from_name(&self.cur_token.literal) {
                return self.parse_meta_predicate(token, kind);
            }
        }

        let bin = Identifier::new(token.clone(), token.literal.clone());
        self.parse_bin_predicate(token, bin)
    }

    /// DIGEST(n) / LUT() / RECSIZE() / TTL() followed by op and number
    fn parse_meta_predicate(&mut self, token: Token, kind: MetaName) -> Option<AtomicExpression> {
        self.next_token(); // consume '('
        let modulo = match kind {
            MetaName::Digest => Some(self.parse_numeric_literal()?),
            _ => None,
        };
        if !self.expect_punctuator(")") {
            return None;
        }

        let meta = MetaExpression {
            token: token.clone(),
            kind,
            modulo,
        };
        let operator = self.parse_compare_operator()?;
        let value = self.parse_numeric_literal()?;

        Some(AtomicExpression {
            token,
            subject: PredicateSubject::Meta(meta),
            operator: PredicateOperator::Compare(operator),
            operand: PredicateOperand::Literal(Literal::Numeric(value)),
        })
    }

    fn parse_bin_predicate(&mut self, token: Token, bin: Identifier) -> Option<AtomicExpression> {
        // bin op literal
        if self.peek_token_is(TokenType::Operator) {
            let operator = self.parse_compare_operator()?;
            let value = self.parse_literal()?;
            return Some(AtomicExpression {
                token,
                subject: PredicateSubject::Bin(bin),
                operator: PredicateOperator::Compare(operator),
                operand: PredicateOperand::Literal(value),
            });
        }

        let mode = if self.peek_token_is_keyword("ANY") {
            self.next_token();
            Some(IterMode::Any)
        } else if self.peek_token_is_keyword("ALL") {
            self.next_token();
            Some(IterMode::All)
        } else {
            None
        };

        let collection = if self.peek_token_is_keyword("CONTAINS") {
            self.next_token();
            if mode.is_none() && self.peek_token_is_keyword("CAST") {
                let cast = self.parse_cast_expression()?;
                return Some(geo_predicate(token, bin, GeoRelation::Contains, cast));
            }
            IterCollection::List
        } else if self.peek_token_is_keyword("MAPKEYS") {
            self.next_token();
            IterCollection::MapKeys
        } else if self.peek_token_is_keyword("MAPVALUES") {
            self.next_token();
            IterCollection::MapValues
        } else if mode.is_none() && self.peek_token_is_keyword("WITHIN") {
            self.next_token();
            let cast = self.parse_cast_expression()?;
            return Some(geo_predicate(token, bin, GeoRelation::Within, cast));
        } else if mode.is_none() && self.peek_token_is_keyword("LIKE") {
            self.next_token();
            if !self.expect_peek(TokenType::String, "string pattern") {
                return None;
            }
            let pattern = StringLiteral::from_token(self.cur_token.clone());
            return Some(AtomicExpression {
                token,
                subject: PredicateSubject::Bin(bin),
                operator: PredicateOperator::Like,
                operand: PredicateOperand::Literal(Literal::String(pattern)),
            });
        } else if mode.is_some() {
            self.peek_error("CONTAINS, MAPKEYS or MAPVALUES");
            return None;
        } else {
            self.peek_error(&format!("operator after '{}'", bin));
            return None;
        };

        let iteration = self.parse_iteration_expression()?;

        Some(AtomicExpression {
            token,
            subject: PredicateSubject::Bin(bin),
            operator: PredicateOperator::Iterate { collection, mode },
            operand: PredicateOperand::Iteration(iteration),
        })
    }

    /// Parse `(var op literal)`
    fn parse_iteration_expression(&mut self) -> Option<IterationExpression> {
        if !self.expect_punctuator("(") {
            return None;
        }
        let token = self.cur_token.clone();

        let var = self.expect_identifier("variable name")?;
        let operator = self.parse_compare_operator()?;
        let value = self.parse_literal()?;

        if !self.expect_punctuator(")") {
            return None;
        }

        Some(IterationExpression {
            token,
            var,
            operator,
            value,
        })
    }

    // ========================================================================
    // Shared pieces
    // ========================================================================

    /// Parse `CAST('...' AS type)`
    pub(crate) fn parse_cast_expression(&mut self) -> Option<CastExpression> {
        if !self.expect_keyword("CAST") {
            return None;
        }
        let token = self.cur_token.clone();

        if !self.expect_punctuator("(") {
            return None;
        }
        if !self.expect_peek(TokenType::String, "string literal") {
            return None;
        }
        let value = StringLiteral::from_token(self.cur_token.clone());

        if !self.expect_keyword("AS") {
            return None;
        }
        let type_name = self.expect_identifier("type name")?;

        if !self.expect_punctuator(")") {
            return None;
        }

        Some(CastExpression {
            token,
            value,
            type_name: type_name.value.to_uppercase(),
        })
    }

    /// Parse an equality or comparison operator
    fn parse_compare_operator(&mut self) -> Option<CompareOperator> {
        if self.peek_token_is(TokenType::Operator) {
            if let Some(op) = CompareOperator::from_operator(&self.peek_token.literal) {
                self.next_token();
                return Some(op);
            }
        }
        self.peek_error("comparison operator");
        None
    }

    /// Parse a string or (signed) numeric literal
    pub(crate) fn parse_literal(&mut self) -> Option<Literal> {
        match self.peek_token.token_type {
            TokenType::String => {
                self.next_token();
                Some(Literal::String(StringLiteral::from_token(
                    self.cur_token.clone(),
                )))
            }
            TokenType::Integer | TokenType::Float | TokenType::Operator
                if self.peek_is_number_start() =>
            {
                self.parse_signed_number("literal").map(Literal::Numeric)
            }
            _ => {
                self.peek_error("literal");
                None
            }
        }
    }

    /// Parse a (signed) numeric literal
    pub(crate) fn parse_numeric_literal(&mut self) -> Option<NumericLiteral> {
        self.parse_signed_number("numeric literal")
    }

    fn peek_is_number_start(&self) -> bool {
        self.peek_token_is(TokenType::Integer)
            || self.peek_token_is(TokenType::Float)
            || self.peek_token_is_operator("-")
            || self.peek_token_is_operator("+")
    }

    fn parse_signed_number(&mut self, expected: &str) -> Option<NumericLiteral> {
        let mut sign_token = None;
        if self.peek_token_is_operator("-") || self.peek_token_is_operator("+") {
            self.next_token();
            sign_token = Some(self.cur_token.clone());
        }

        if !self.peek_token_is(TokenType::Integer) && !self.peek_token_is(TokenType::Float) {
            self.peek_error(expected);
            return None;
        }
        self.next_token();

        let negative = sign_token.as_ref().is_some_and(|t| t.literal == "-");
        let text = if negative {
            format!("-{}", self.cur_token.literal)
        } else {
            self.cur_token.literal.clone()
        };

        Some(NumericLiteral {
            token: sign_token.unwrap_or_else(|| self.cur_token.clone()),
            text,
        })
    }
}

/// Index collection type named by a token, if any
fn index_collection(token: &Token) -> Option<IndexCollectionType> {
    if token.is_keyword("LIST") {
        Some(IndexCollectionType::List)
    } else if token.is_keyword("MAPKEYS") {
        Some(IndexCollectionType::MapKeys)
    } else if token.is_keyword("MAPVALUES") {
        Some(IndexCollectionType::MapValues)
    } else {
        None
    }
}

fn geo_predicate(
    token: Token,
    bin: Identifier,
    relation: GeoRelation,
    cast: CastExpression,
) -> AtomicExpression {
    AtomicExpression {
        token,
        subject: PredicateSubject::Bin(bin),
        operator: PredicateOperator::Geo(relation),
        operand: PredicateOperand::Cast(cast),
    }
}
