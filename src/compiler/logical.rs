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

//! WHERE clause linearization (shunting yard)
//!
//! Turns the flat, infix item sequence of a WHERE clause into postfix order.
//! Atomic predicates are passed through by reference and expanded into
//! instructions afterwards; only the logic operators move.

use smallvec::SmallVec;

use super::precedence::pops;
use crate::core::SemanticError;
use crate::parser::ast::{AtomicExpression, WhereItem};
use crate::query::LogicOp;

/// One entry of the postfix output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostfixItem<'a> {
    Atomic(&'a AtomicExpression),
    Logic(LogicOp),
}

/// Operator stack entry
#[derive(Debug, Clone, Copy)]
enum StackEntry {
    /// Opening parenthesis, with its index in the WHERE item sequence
    OpenParen(usize),
    Logic(LogicOp),
}

/// Reorder WHERE items into postfix order
///
/// Parentheses are consumed. An unmatched `)` or `(` fails with the index of
/// the offending item.
pub fn to_postfix(items: &[WhereItem]) -> Result<Vec<PostfixItem<'_>>, SemanticError> {
    let mut stack: SmallVec<[StackEntry; 8]> = SmallVec::new();
    let mut output = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        match item {
            WhereItem::Atomic(atomic) => output.push(PostfixItem::Atomic(atomic)),
            WhereItem::OpenParen(_) => stack.push(StackEntry::OpenParen(i)),
            WhereItem::Logic(op) => {
                while let Some(&StackEntry::Logic(top)) = stack.last() {
                    if !pops(*op, top) {
                        break;
                    }
                    stack.pop();
                    output.push(PostfixItem::Logic(top));
                }
                stack.push(StackEntry::Logic(*op));
            }
            WhereItem::CloseParen(_) => loop {
                match stack.pop() {
                    Some(StackEntry::Logic(op)) => output.push(PostfixItem::Logic(op)),
                    Some(StackEntry::OpenParen(_)) => break,
                    None => return Err(SemanticError::MismatchedParentheses { index: i }),
                }
            },
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Logic(op) => output.push(PostfixItem::Logic(op)),
            StackEntry::OpenParen(index) => {
                return Err(SemanticError::MismatchedParentheses { index })
            }
        }
    }

    Ok(output)
}
