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

//! Statement parsing methods for the AQL Parser

use super::ast::*;
use super::parser::Parser;
use super::token::TokenType;

impl Parser {
    /// Parse a SELECT statement
    ///
    /// Each clause is parsed independently: when one fails, the parser skips
    /// to the next clause keyword and keeps going so that every clause gets a
    /// chance to report its errors. The statement is only returned when all
    /// clauses parsed.
    pub fn parse_select_statement(&mut self) -> Option<SelectStatement> {
        if !self.cur_token_is_keyword("SELECT") {
            self.current_clause = "SELECT".to_string();
            let msg = format!("expected SELECT, got {}", self.cur_token);
            self.add_error(msg);
            return None;
        }

        let token = self.cur_token.clone();

        // Parse projection
        self.current_clause = "SELECT".to_string();
        let projection = self.parse_projection();
        if projection.is_none() {
            self.synchronize();
        }

        // Parse FROM clause
        self.current_clause = "FROM".to_string();
        let from = if self.expect_keyword("FROM") {
            self.parse_from_set()
        } else {
            None
        };
        if from.is_none() {
            self.synchronize();
        }

        // Parse WITH clause
        let mut index = None;
        let mut index_ok = true;
        if self.peek_token_is_keyword("WITH") {
            self.next_token(); // consume WITH
            self.current_clause = "WITH".to_string();
            index = self.parse_index_expression();
            if index.is_none() {
                index_ok = false;
                self.synchronize();
            }
        }

        // Parse WHERE clause
        let mut where_clause = None;
        let mut where_ok = true;
        if self.peek_token_is_keyword("WHERE") {
            self.next_token(); // consume WHERE
            self.current_clause = "WHERE".to_string();
            where_clause = self.parse_where_expression();
            if where_clause.is_none() {
                where_ok = false;
                self.synchronize();
            }
        }

        // Skip optional semicolon
        if self.peek_token_is_punctuator(";") {
            self.next_token();
        }

        if !self.peek_token_is(TokenType::Eof) {
            let msg = format!("unexpected token {} after end of statement", self.peek_token);
            let position = self.peek_token.position;
            self.add_error_at(msg, position);
            return None;
        }

        if !index_ok || !where_ok {
            return None;
        }

        Some(SelectStatement {
            token,
            projection: projection?,
            from: from?,
            index,
            where_clause,
        })
    }

    /// Parse `*` or a comma-separated list of bin names
    fn parse_projection(&mut self) -> Option<SelectProjection> {
        if self.peek_token_is_operator("*") {
            self.next_token();
            return Some(SelectProjection::Star);
        }

        let mut bins = vec![self.expect_identifier("bin name")?];
        while self.peek_token_is_punctuator(",") {
            self.next_token(); // consume comma
            bins.push(self.expect_identifier("bin name")?);
        }

        Some(SelectProjection::Bins(bins))
    }

    /// Parse `namespace` or `namespace.set`
    fn parse_from_set(&mut self) -> Option<FromSet> {
        let namespace = self.expect_identifier("namespace name")?;

        let set = if self.peek_token_is_punctuator(".") {
            self.next_token(); // consume dot
            Some(self.expect_identifier("set name")?)
        } else {
            None
        };

        Some(FromSet { namespace, set })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse_select;

    #[test]
    fn test_select_star() {
        let stmt = parse_select("SELECT * FROM namespace1.sett").unwrap();
        assert_eq!(stmt.projection, SelectProjection::Star);
        assert_eq!(stmt.from.namespace.value, "namespace1");
        assert_eq!(stmt.from.set.as_ref().map(|s| s.value.as_str()), Some("sett"));
        assert!(stmt.index.is_none());
        assert!(stmt.where_clause.is_none());
    }

    #[test]
    fn test_select_bins_with_quotes() {
        let stmt = parse_select("select foo, \"bar\", \"select\" from ns;").unwrap();
        match &stmt.projection {
            SelectProjection::Bins(bins) => {
                let names: Vec<&str> = bins.iter().map(|b| b.value.as_str()).collect();
                assert_eq!(names, vec!["foo", "bar", "select"]);
            }
            other => panic!("unexpected projection {:?}", other),
        }
        assert!(stmt.from.set.is_none());
    }

    #[test]
    fn test_keyword_like_bin_names() {
        let stmt = parse_select("SELECT list, Contains FROM ns").unwrap();
        assert_eq!(stmt.to_string(), "SELECT list, Contains FROM ns");
    }

    #[test]
    fn test_missing_from() {
        let errors = parse_select("SELECT foo").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.errors[0].message.contains("expected FROM"));
        assert_eq!(errors.errors[0].context, "FROM");
    }

    #[test]
    fn test_not_a_select() {
        let errors = parse_select("DELETE FROM ns").unwrap_err();
        assert!(errors.errors[0].message.contains("expected SELECT"));
    }

    #[test]
    fn test_trailing_garbage() {
        let errors = parse_select("SELECT * FROM ns foo").unwrap_err();
        assert!(errors.errors[0].message.contains("after end of statement"));
    }

    #[test]
    fn test_errors_in_every_clause_are_collected() {
        let errors = parse_select("SELECT foo,\nFROM ns.set\nWITH foo =\nWHERE bar >").unwrap_err();
        let contexts: Vec<&str> = errors.iter().map(|e| e.context.as_str()).collect();
        assert_eq!(contexts, vec!["SELECT", "WITH", "WHERE"]);
        let lines: Vec<usize> = errors.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![2, 4, 4]);
    }
}
