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

//! Logic operator precedence for the WHERE clause shunting yard
//!
//! The table follows the evaluation order of the store's filter machine, not
//! textbook boolean precedence. It is not symmetric: an incoming AND pops a
//! stacked AND, but an incoming NOT never pops an AND, and OR pops only OR.

use crate::query::LogicOp;

/// Returns true if `top`, the operator on top of the stack, must be moved to
/// the output before `incoming` is pushed
#[inline]
pub fn pops(incoming: LogicOp, top: LogicOp) -> bool {
    match top {
        // NOT binds tighter than everything
        LogicOp::Not => true,
        LogicOp::And => incoming != LogicOp::Not,
        LogicOp::Or => incoming == LogicOp::Or,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LogicOp::*;

    #[test]
    fn test_not_on_top_always_pops() {
        assert!(pops(Not, Not));
        assert!(pops(And, Not));
        assert!(pops(Or, Not));
    }

    #[test]
    fn test_and_on_top() {
        assert!(!pops(Not, And));
        assert!(pops(And, And));
        assert!(pops(Or, And));
    }

    #[test]
    fn test_or_on_top_only_pops_for_or() {
        assert!(!pops(Not, Or));
        assert!(!pops(And, Or));
        assert!(pops(Or, Or));
    }
}
