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

//! AQL Parser - Main Parser struct and core parsing logic

use std::collections::HashSet;
use std::sync::LazyLock;

use super::ast::*;
use super::error::{ParseError, ParseErrors};
use super::lexer::Lexer;
use super::token::{Position, Token, TokenType};

/// Reserved keywords that cannot be used as identifiers (O(1) lookup)
static RESERVED_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["SELECT", "FROM", "WITH", "WHERE", "AND", "OR", "NOT"]
        .into_iter()
        .collect()
});

/// Keywords that open a clause; error recovery resumes at one of these
const CLAUSE_KEYWORDS: &[&str] = &["FROM", "WITH", "WHERE"];

/// AQL Parser (recursive descent with one token of lookahead)
pub struct Parser {
    /// The lexer providing tokens
    lexer: Lexer,
    /// Current token being examined
    pub(crate) cur_token: Token,
    /// Next token (peek)
    pub(crate) peek_token: Token,
    /// Collected errors
    errors: Vec<ParseError>,
    /// Current clause context (for error messages)
    pub(crate) current_clause: String,
    /// Source text, kept for error reports
    source: String,
}

impl Parser {
    /// Create a new parser for the given input
    pub fn new(input: &str) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(input),
            cur_token: Token::eof(Position::default()),
            peek_token: Token::eof(Position::default()),
            errors: Vec::new(),
            current_clause: String::new(),
            source: input.to_string(),
        };
        // Fill cur_token and peek_token
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Parse the input as one SELECT statement
    pub fn parse(&mut self) -> Result<SelectStatement, ParseErrors> {
        let stmt = self.parse_select_statement();

        match stmt {
            Some(stmt) if self.errors.is_empty() => Ok(stmt),
            _ => {
                if self.errors.is_empty() {
                    self.add_error("unable to parse statement".to_string());
                }
                Err(ParseErrors::from_errors(
                    std::mem::take(&mut self.errors),
                    self.source.clone(),
                ))
            }
        }
    }

    /// Advance to the next token
    ///
    /// Comments are skipped. Lexer error tokens are recorded and skipped so
    /// that one bad character does not hide later diagnostics.
    pub(crate) fn next_token(&mut self) {
        let next = loop {
            let token = self.lexer.next_token();
            match token.token_type {
                TokenType::Comment => continue,
                TokenType::Error => {
                    let message = token
                        .error
                        .unwrap_or_else(|| format!("invalid token '{}'", token.literal));
                    self.errors.push(ParseError::with_context(
                        message,
                        token.position,
                        self.current_clause.clone(),
                    ));
                }
                _ => break token,
            }
        };
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    /// Check if the current token is of the given type
    pub(crate) fn cur_token_is(&self, t: TokenType) -> bool {
        self.cur_token.token_type == t
    }

    /// Check if the peek token is of the given type
    pub(crate) fn peek_token_is(&self, t: TokenType) -> bool {
        self.peek_token.token_type == t
    }

    /// Check if the peek token can be used as an identifier
    /// This allows keywords like LIST or CONTAINS to be used as bin names
    pub(crate) fn peek_token_is_identifier_like(&self) -> bool {
        match self.peek_token.token_type {
            TokenType::Identifier => true,
            TokenType::Keyword => !Self::is_reserved_keyword(&self.peek_token.literal),
            _ => false,
        }
    }

    /// Check if a keyword is truly reserved and cannot be used as an identifier
    pub(crate) fn is_reserved_keyword(keyword: &str) -> bool {
        RESERVED_KEYWORDS.contains(keyword.to_uppercase().as_str())
    }

    /// Check if the current token is a specific keyword
    pub(crate) fn cur_token_is_keyword(&self, keyword: &str) -> bool {
        self.cur_token.is_keyword(keyword)
    }

    /// Check if the peek token is a specific keyword
    pub(crate) fn peek_token_is_keyword(&self, keyword: &str) -> bool {
        self.peek_token.is_keyword(keyword)
    }

    /// Check if the peek token is a specific punctuator
    pub(crate) fn peek_token_is_punctuator(&self, punc: &str) -> bool {
        self.peek_token.is_punctuator(punc)
    }

    /// Check if the peek token is a specific operator
    pub(crate) fn peek_token_is_operator(&self, op: &str) -> bool {
        self.peek_token.is_operator(op)
    }

    /// Expect the peek token to be of a specific type and advance
    pub(crate) fn expect_peek(&mut self, t: TokenType, expected: &str) -> bool {
        if self.peek_token_is(t) {
            self.next_token();
            true
        } else {
            self.peek_error(expected);
            false
        }
    }

    /// Expect the peek token to be a specific keyword and advance
    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_token_is_keyword(keyword) {
            self.next_token();
            true
        } else {
            self.peek_error(keyword);
            false
        }
    }

    /// Expect the peek token to be a specific punctuator and advance
    pub(crate) fn expect_punctuator(&mut self, punc: &str) -> bool {
        if self.peek_token_is_punctuator(punc) {
            self.next_token();
            true
        } else {
            self.peek_error(&format!("'{}'", punc));
            false
        }
    }

    /// Expect an identifier (or non-reserved keyword) and advance
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Option<Identifier> {
        if self.peek_token_is_identifier_like() {
            self.next_token();
            let token = self.cur_token.clone();
            let value = token.literal.clone();
            Some(Identifier::new(token, value))
        } else {
            self.peek_error(what);
            None
        }
    }

    /// Add an error for an unexpected peek token
    pub(crate) fn peek_error(&mut self, expected: &str) {
        // Give a better error message when expecting a name but got a reserved keyword
        let message = if expected.ends_with("name")
            && self.peek_token_is(TokenType::Keyword)
            && Self::is_reserved_keyword(&self.peek_token.literal)
        {
            format!(
                "'{}' is a reserved keyword and cannot be used as a {}. Use double quotes to escape it: \"{}\"",
                self.peek_token.literal.to_uppercase(),
                expected,
                self.peek_token.literal
            )
        } else {
            format!("expected {}, got {}", expected, self.peek_token)
        };
        self.add_error_at(message, self.peek_token.position);
    }

    /// Add an error message at the current token
    pub(crate) fn add_error(&mut self, msg: String) {
        self.add_error_at(msg, self.cur_token.position);
    }

    /// Add an error message at a given position
    pub(crate) fn add_error_at(&mut self, msg: String, position: Position) {
        self.errors.push(ParseError::with_context(
            msg,
            position,
            self.current_clause.clone(),
        ));
    }

    /// Skip ahead until the next token opens a clause (or input ends)
    pub(crate) fn synchronize(&mut self) {
        while !self.peek_token_is(TokenType::Eof)
            && !CLAUSE_KEYWORDS
                .iter()
                .any(|kw| self.peek_token_is_keyword(kw))
        {
            self.next_token();
        }
    }

    /// Get collected errors
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}
