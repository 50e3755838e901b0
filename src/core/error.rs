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

//! Error types
//!
//! Compilation fails in one of two ways: the parser collected one or more
//! syntax diagnostics ([`Error::Syntax`]), or tree compilation hit a
//! [`SemanticError`] and stopped immediately.

use thiserror::Error;

use crate::parser::ParseErrors;

/// Result type alias for compiler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Compilation errors
    // =========================================================================
    /// Lexical or grammar violations, all of them
    #[error("{}", .0.format_errors())]
    Syntax(ParseErrors),

    /// First semantic error raised while compiling the parse tree
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    // =========================================================================
    // Schema errors
    // =========================================================================
    /// Unknown particle type tag in schema configuration
    #[error("unknown particle type '{0}'")]
    UnknownParticleType(String),

    /// Unknown index collection type
    #[error("unknown index collection type '{0}'")]
    UnknownIndexCollection(String),

    /// Schema configuration could not be decoded
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl Error {
    /// Returns true if this is an aggregated syntax error
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    /// Returns true if this is a semantic error
    pub fn is_semantic(&self) -> bool {
        matches!(self, Error::Semantic(_))
    }

    /// Returns the semantic error, if that is what this is
    pub fn as_semantic(&self) -> Option<&SemanticError> {
        match self {
            Error::Semantic(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the collected syntax diagnostics, if that is what this is
    pub fn as_syntax(&self) -> Option<&ParseErrors> {
        match self {
            Error::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseErrors> for Error {
    fn from(errors: ParseErrors) -> Self {
        Error::Syntax(errors)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidSchema(err.to_string())
    }
}

/// Errors raised while translating a parse tree into a query descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Unbalanced parentheses in the WHERE clause
    #[error("mismatched parentheses at WHERE token #{index}")]
    MismatchedParentheses { index: usize },

    /// Geo operand cast to something other than GEOJSON
    #[error("expected GEOJSON type cast, got {found}")]
    ExpectedGeoJsonCast { found: String },

    /// WHERE fragment that matches none of the supported predicate shapes
    #[error("unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    /// WITH clause combining a relation and an operand that no filter supports
    #[error("unsupported index expression: {0}")]
    UnsupportedIndexExpression(String),

    /// Literal that cannot be read as a number
    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),

    /// Bin whose schema type cannot take part in the fragment
    #[error("bin '{bin}' of type {particle_type} cannot be used here")]
    UnsupportedBinType { bin: String, particle_type: String },
}

impl SemanticError {
    /// Create a new UnsupportedBinType error
    pub fn unsupported_bin_type(bin: impl Into<String>, particle_type: impl ToString) -> Self {
        SemanticError::UnsupportedBinType {
            bin: bin.into(),
            particle_type: particle_type.to_string(),
        }
    }

    /// Create a new ExpectedGeoJsonCast error
    pub fn expected_geojson_cast(found: impl Into<String>) -> Self {
        SemanticError::ExpectedGeoJsonCast {
            found: found.into(),
        }
    }
}
