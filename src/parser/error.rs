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

//! Parser error types
//!
//! The parser never stops at the first problem. Every diagnostic goes into a
//! [`ParseErrors`] collection, which is returned as a whole once parsing ends.

use super::token::Position;
use std::fmt;

/// A single parse error
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Position in source
    pub position: Position,
    /// Clause being parsed when the error occurred (SELECT, FROM, WITH, WHERE)
    pub context: String,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
            context: String::new(),
        }
    }

    /// Create a parse error with clause context
    pub fn with_context(
        message: impl Into<String>,
        position: Position,
        context: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            position,
            context: context.into(),
        }
    }

    /// Line number of the error
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Format the error against the query text it came from
    pub fn format_error(&self, source: &str) -> String {
        let lines: Vec<&str> = source.lines().collect();
        if self.position.line == 0 || self.position.line > lines.len() {
            return self.to_string();
        }

        let line = lines[self.position.line - 1];
        let pointer = " ".repeat(self.position.column.saturating_sub(1)) + "^";

        format!("{}\n{}\n{}", self, line, pointer)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{} at {}", self.message, self.position)
        } else {
            write!(
                f,
                "{} at {} (in {} clause)",
                self.message, self.position, self.context
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// Collection of parse errors
#[derive(Debug, Clone, PartialEq)]
pub struct ParseErrors {
    /// List of errors
    pub errors: Vec<ParseError>,
    /// Original query string
    pub sql: String,
}

impl ParseErrors {
    /// Create a new empty error collection
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            sql: sql.into(),
        }
    }

    /// Create from a vector of errors
    pub fn from_errors(errors: Vec<ParseError>, sql: impl Into<String>) -> Self {
        Self {
            errors,
            sql: sql.into(),
        }
    }

    /// Add an error
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the collected errors
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// Format all errors for display
    pub fn format_errors(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut result = format!(
            "AQL parsing failed with {} error(s):\n\n",
            self.errors.len()
        );

        let lines: Vec<&str> = self.sql.lines().collect();
        for (i, err) in self.errors.iter().enumerate() {
            result.push_str(&format!("Error {}: {}\n", i + 1, err.message));

            if !err.context.is_empty() {
                result.push_str(&format!("Clause: {}\n", err.context));
            }

            if err.position.line > 0 && err.position.line <= lines.len() {
                let prefix = format!("Line {}: ", err.position.line);
                let line = lines[err.position.line - 1];
                result.push_str(&format!("{}{}\n", prefix, line));
                let pointer = " ".repeat(prefix.len() + err.position.column.saturating_sub(1));
                result.push_str(&format!("{}^\n", pointer));
            }

            if let Some(suggestion) = get_suggestion(err) {
                result.push_str(&format!("Suggestion: {}\n", suggestion));
            }

            result.push('\n');
        }

        result
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "AQL parse error")
        } else {
            write!(f, "{}", self.errors[0])
        }
    }
}

impl std::error::Error for ParseErrors {}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Get a helpful suggestion for a parse error
fn get_suggestion(err: &ParseError) -> Option<String> {
    let msg = &err.message;

    if msg.contains("reserved keyword") {
        return Some(
            "Enclose the name in double quotes to use a reserved word as a bin name.".to_string(),
        );
    }

    if msg.contains("unterminated string literal") {
        return Some(
            "String literals are enclosed in single quotes. Write '' for a quote inside a string."
                .to_string(),
        );
    }

    if msg.contains("expected GEOJSON") || msg.contains("expected CAST") {
        return Some("Geo operands are written as CAST('<geojson>' AS GEOJSON).".to_string());
    }

    if msg.contains("expected numeric literal") {
        return Some(
            "A number is expected here. Make sure you're providing a number without quotes."
                .to_string(),
        );
    }

    if msg.contains("expected literal") {
        return Some(
            "A value is expected here: a number, or a string enclosed in single quotes."
                .to_string(),
        );
    }

    if msg.contains("expected AND, OR or ')'") {
        return Some(
            "Predicates are combined with AND or OR. Check for a missing operator or an extra value."
                .to_string(),
        );
    }

    if msg.contains("expected predicate") {
        return Some("The WHERE clause ends early. A predicate such as bin = value is expected after WHERE, AND, OR, NOT and '('.".to_string());
    }

    if msg.contains("expected ')'") {
        return Some("You're missing a closing parenthesis.".to_string());
    }

    if msg.contains("expected '('") {
        return Some("You're missing an opening parenthesis.".to_string());
    }

    if msg.contains("expected operator") || msg.contains("expected comparison operator") {
        return Some(
            "A comparison (=, ==, !=, <>, <, <=, >, >=) or one of CONTAINS, WITHIN, MAPKEYS, MAPVALUES, LIKE is expected here."
                .to_string(),
        );
    }

    if msg.contains("expected index relation") {
        return Some(
            "A WITH clause supports =, CONTAINS, WITHIN and BETWEEN ... AND ...".to_string(),
        );
    }

    if msg.contains("expected FROM") {
        return Some("A SELECT statement reads FROM namespace or FROM namespace.set.".to_string());
    }

    // Common typos
    if msg.contains("SELET") {
        return Some("Did you mean 'SELECT'?".to_string());
    }

    if msg.contains("WERE") || msg.contains("WHRE") {
        return Some("Did you mean 'WHERE'?".to_string());
    }

    if msg.contains("unexpected token") {
        return Some("Check for a clause written after the end of the statement, or a missing keyword.".to_string());
    }

    // Default suggestion
    Some("Check syntax near this location. Common issues include missing keywords, unclosed parentheses or quotes, and misplaced clauses.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected token", Position::new(10, 1, 11));
        assert_eq!(err.to_string(), "unexpected token at line 1, column 11");

        let err = ParseError::with_context("expected literal", Position::new(0, 2, 3), "WHERE");
        assert_eq!(
            err.to_string(),
            "expected literal at line 2, column 3 (in WHERE clause)"
        );
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_format_error_points_at_column() {
        let err = ParseError::new("unexpected token", Position::new(9, 1, 10));
        let formatted = err.format_error("SELECT * FORM ns");
        assert!(formatted.contains("SELECT * FORM ns"));
        assert!(formatted.ends_with("         ^"));
    }

    #[test]
    fn test_parse_errors_collection() {
        let mut errors = ParseErrors::new("SELECT SELET FROM");
        assert!(errors.is_empty());

        errors.push(ParseError::new("unexpected token", Position::new(7, 1, 8)));
        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_format_errors_report() {
        let sql = "SELECT * FROM ns\nWHERE foo >";
        let errors = ParseErrors::from_errors(
            vec![ParseError::with_context(
                "expected literal, got end of input",
                Position::new(27, 2, 12),
                "WHERE",
            )],
            sql,
        );
        let report = errors.format_errors();
        assert!(report.starts_with("AQL parsing failed with 1 error(s)"));
        assert!(report.contains("Clause: WHERE"));
        assert!(report.contains("Line 2: WHERE foo >"));
        assert!(report.contains("Suggestion:"));
    }

    #[test]
    fn test_suggestion_for_typo() {
        let err = ParseError::new("expected FROM, got 'SELET'", Position::new(0, 1, 1));
        let suggestion = get_suggestion(&err).unwrap();
        assert!(suggestion.contains("FROM namespace"));

        let err = ParseError::new("unexpected identifier 'SELET'", Position::new(0, 1, 1));
        assert!(get_suggestion(&err).unwrap().contains("SELECT"));
    }

    #[test]
    fn test_suggestion_for_geo_cast() {
        let err = ParseError::new("expected CAST, got 'x'", Position::new(0, 1, 1));
        assert!(get_suggestion(&err).unwrap().contains("AS GEOJSON"));
    }
}
