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

//! Statement assembly
//!
//! [`StatementAssembler`] is the per-call compile context. It listens to the
//! clause events of [`walk`](crate::parser::walk) and builds a
//! [`QueryDescriptor`] once the statement event fires.

use tracing::warn;

use super::atomic::AtomicCompiler;
use super::index::compile_index;
use super::logical::{to_postfix, PostfixItem};
use crate::core::{Schema, SemanticError};
use crate::parser::ast::{IndexExpression, SelectProjection, SelectStatement, WhereExpression};
use crate::parser::ParseListener;
use crate::query::{Filter, Instruction, PredicateProgram, Projection, QueryDescriptor};

/// Working state for compiling one statement
pub struct StatementAssembler<'a> {
    schema: &'a Schema,
    postfix: Vec<PostfixItem<'a>>,
    filter: Option<Filter>,
    descriptor: QueryDescriptor,
}

impl<'a> StatementAssembler<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            postfix: Vec::new(),
            filter: None,
            descriptor: QueryDescriptor::default(),
        }
    }

    /// The assembled descriptor
    pub fn finish(self) -> QueryDescriptor {
        self.descriptor
    }
}

impl<'a> ParseListener<'a> for StatementAssembler<'a> {
    type Error = SemanticError;

    fn exit_index_expression(&mut self, expr: &'a IndexExpression) -> Result<(), SemanticError> {
        self.filter = Some(compile_index(expr)?);
        Ok(())
    }

    fn exit_where_expression(&mut self, expr: &'a WhereExpression) -> Result<(), SemanticError> {
        self.postfix = to_postfix(&expr.children)?;
        Ok(())
    }

    fn exit_select_statement(&mut self, stmt: &'a SelectStatement) -> Result<(), SemanticError> {
        let descriptor = &mut self.descriptor;

        descriptor.projection = match &stmt.projection {
            SelectProjection::Star => Projection::AllBins,
            SelectProjection::Bins(bins) => {
                Projection::Bins(bins.iter().map(|b| b.value.clone()).collect())
            }
        };
        descriptor.namespace = stmt.from.namespace.value.clone();
        descriptor.set = stmt.from.set.as_ref().map(|s| s.value.clone());

        let source = stmt.from.qualified_name();
        let bin_types = self.schema.bin_types(&source);
        if bin_types.is_none() && !self.postfix.is_empty() {
            warn!(source = %source, "no bin types for source, bins default to STRING");
        }

        let atomics = AtomicCompiler::new(bin_types);
        let mut instructions = Vec::with_capacity(self.postfix.len() * 3);
        for item in &self.postfix {
            match item {
                PostfixItem::Atomic(atomic) => atomics.compile(atomic, &mut instructions)?,
                PostfixItem::Logic(op) => instructions.push(Instruction::logical(*op)),
            }
        }

        descriptor.filter = self.filter.take();
        descriptor.predicate = if instructions.is_empty() {
            None
        } else {
            Some(PredicateProgram::new(instructions))
        };

        Ok(())
    }
}
