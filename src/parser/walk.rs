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

//! Bottom-up tree walking
//!
//! [`walk`] fires an exit event for every clause once it is complete:
//! the index expression first, then the WHERE expression, and the statement
//! itself last. A listener that builds output from the statement event can
//! rely on every sub-clause event having fired already.

use super::ast::{IndexExpression, SelectStatement, WhereExpression};

/// Receives clause-completion events from [`walk`]
///
/// All methods default to doing nothing. The first error stops the walk.
pub trait ParseListener<'a> {
    type Error;

    fn exit_index_expression(&mut self, _expr: &'a IndexExpression) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_where_expression(&mut self, _expr: &'a WhereExpression) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_select_statement(&mut self, _stmt: &'a SelectStatement) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk a statement, firing exit events bottom-up
pub fn walk<'a, L: ParseListener<'a>>(
    stmt: &'a SelectStatement,
    listener: &mut L,
) -> Result<(), L::Error> {
    if let Some(index) = &stmt.index {
        listener.exit_index_expression(index)?;
    }
    if let Some(where_clause) = &stmt.where_clause {
        listener.exit_where_expression(where_clause)?;
    }
    listener.exit_select_statement(stmt)
}
