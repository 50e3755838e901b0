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

//! Atomic predicate compilation
//!
//! Each atomic WHERE fragment is first classified into one of a fixed set of
//! shapes, then expanded into predicate instructions typed against the bin
//! types of the queried source.

use crate::core::{BinTypes, ParticleType, SemanticError};
use crate::parser::ast::{
    AtomicExpression, CastExpression, CompareOperator, Identifier, IterationExpression, Literal,
    MetaExpression, MetaName, Node, PredicateOperand, PredicateOperator, PredicateSubject,
    StringLiteral,
};
use crate::query::{
    ComparisonOp, EqualityOp, GeoRelation, Instruction, IterCollection, IterMode, MetaKind,
    RegexFlags, Value, ValueKind,
};

/// The supported fragment shapes
#[derive(Debug, Clone, Copy)]
pub(crate) enum AtomicShape<'e> {
    /// `LUT() > 100`
    MetaCompare {
        meta: &'e MetaExpression,
        operator: CompareOperator,
        literal: &'e Literal,
    },
    /// `baz = 'a'`
    BinEqualString {
        bin: &'e Identifier,
        op: EqualityOp,
        literal: &'e StringLiteral,
    },
    /// `foo != -10`
    BinEqualNumeric {
        bin: &'e Identifier,
        op: EqualityOp,
        literal: &'e Literal,
    },
    /// `foo >= 2`
    BinCompareNumeric {
        bin: &'e Identifier,
        op: ComparisonOp,
        literal: &'e Literal,
    },
    /// `ma ANY MAPKEYS (k = 'a')`
    Iteration {
        bin: &'e Identifier,
        collection: IterCollection,
        mode: IterMode,
        iteration: &'e IterationExpression,
    },
    /// `gj WITHIN CAST('...' AS GEOJSON)`
    GeoCast {
        bin: &'e Identifier,
        relation: GeoRelation,
        cast: &'e CastExpression,
    },
    /// `baz LIKE '/pattern/i'`
    Regex {
        bin: &'e Identifier,
        pattern: &'e StringLiteral,
    },
}

fn unsupported(expr: &AtomicExpression) -> SemanticError {
    SemanticError::UnsupportedPredicate(format!("{} at {}", expr, expr.position()))
}

/// Match an atomic expression against the supported shapes
pub(crate) fn classify(expr: &AtomicExpression) -> Result<AtomicShape<'_>, SemanticError> {
    use PredicateOperand as Operand;
    use PredicateOperator as Op;

    let shape = match (&expr.subject, &expr.operator, &expr.operand) {
        (PredicateSubject::Meta(meta), Op::Compare(operator), Operand::Literal(literal)) => {
            AtomicShape::MetaCompare {
                meta,
                operator: *operator,
                literal,
            }
        }
        (
            PredicateSubject::Bin(bin),
            Op::Compare(CompareOperator::Equality(op)),
            Operand::Literal(Literal::String(literal)),
        ) => AtomicShape::BinEqualString {
            bin,
            op: *op,
            literal,
        },
        (
            PredicateSubject::Bin(bin),
            Op::Compare(CompareOperator::Equality(op)),
            Operand::Literal(literal @ Literal::Numeric(_)),
        ) => AtomicShape::BinEqualNumeric {
            bin,
            op: *op,
            literal,
        },
        (
            PredicateSubject::Bin(bin),
            Op::Compare(CompareOperator::Comparison(op)),
            Operand::Literal(literal @ Literal::Numeric(_)),
        ) => AtomicShape::BinCompareNumeric {
            bin,
            op: *op,
            literal,
        },
        (
            PredicateSubject::Bin(bin),
            Op::Iterate { collection, mode },
            Operand::Iteration(iteration),
        ) => {
            // Strings only support (in)equality
            if matches!(
                (&iteration.operator, &iteration.value),
                (CompareOperator::Comparison(_), Literal::String(_))
            ) {
                return Err(unsupported(expr));
            }
            AtomicShape::Iteration {
                bin,
                collection: *collection,
                mode: mode.unwrap_or_default(),
                iteration,
            }
        }
        (PredicateSubject::Bin(bin), Op::Geo(relation), Operand::Cast(cast)) => {
            AtomicShape::GeoCast {
                bin,
                relation: *relation,
                cast,
            }
        }
        (PredicateSubject::Bin(bin), Op::Like, Operand::Literal(Literal::String(pattern))) => {
            AtomicShape::Regex { bin, pattern }
        }
        _ => return Err(unsupported(expr)),
    };

    Ok(shape)
}

/// Read a numeric literal as an integer, truncating toward zero
///
/// Values outside the i64 range are rejected rather than clamped.
pub fn truncate_integer(text: &str) -> Result<i64, SemanticError> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    const LOW: f64 = i64::MIN as f64;
    const HIGH: f64 = i64::MAX as f64;
    match trimmed.parse::<f64>().map(f64::trunc) {
        Ok(v) if (LOW..HIGH).contains(&v) => Ok(v as i64),
        _ => Err(SemanticError::InvalidNumber(text.to_string())),
    }
}

/// Split a LIKE pattern into its body and regex flags
///
/// `/body/flags` is delimited: `i` sets ICASE, `e` sets EXTENDED, `?` sets
/// NOSUB and `s` clears the default NEWLINE. Anything else is taken as the
/// body with NEWLINE only.
pub fn regex_pattern(pattern: &str) -> (&str, RegexFlags) {
    let mut flags = RegexFlags::NEWLINE;

    if !pattern.starts_with('/') {
        return (pattern, flags);
    }
    let last = match pattern.rfind('/') {
        Some(last) if last > 0 => last,
        _ => return (pattern, flags),
    };

    let suffix = pattern[last..].to_lowercase();
    if suffix.contains('i') {
        flags |= RegexFlags::ICASE;
    }
    if suffix.contains('e') {
        flags |= RegexFlags::EXTENDED;
    }
    if suffix.contains('s') {
        flags.remove(RegexFlags::NEWLINE);
    }
    if suffix.contains('?') {
        flags |= RegexFlags::NOSUB;
    }

    (&pattern[1..last], flags)
}

/// Compiles atomic fragments against one source's bin types
pub struct AtomicCompiler<'s> {
    bin_types: Option<&'s BinTypes>,
}

impl<'s> AtomicCompiler<'s> {
    /// Create a compiler; `None` means every bin defaults to STRING
    pub fn new(bin_types: Option<&'s BinTypes>) -> Self {
        Self { bin_types }
    }

    fn particle_type(&self, name: &str) -> ParticleType {
        self.bin_types
            .and_then(|types| types.get(name))
            .copied()
            .unwrap_or(ParticleType::String)
    }

    /// Append the instructions of one atomic fragment
    pub fn compile(
        &self,
        expr: &AtomicExpression,
        out: &mut Vec<Instruction>,
    ) -> Result<(), SemanticError> {
        match classify(expr)? {
            AtomicShape::MetaCompare {
                meta,
                operator,
                literal,
            } => {
                out.push(Instruction::Meta(meta_kind(meta)?));
                out.push(Instruction::integer(truncate_integer(literal.text())?));
                out.push(compare_instruction(operator, ValueKind::Integer));
            }
            AtomicShape::BinEqualString { bin, op, literal } => {
                self.push_bin_value(bin, &literal.value, out)?;
                out.push(Instruction::equality(op, ValueKind::String));
            }
            AtomicShape::BinEqualNumeric { bin, op, literal } => {
                self.push_bin_value(bin, literal.text(), out)?;
                out.push(Instruction::equality(op, ValueKind::Integer));
            }
            AtomicShape::BinCompareNumeric { bin, op, literal } => {
                self.push_bin_value(bin, literal.text(), out)?;
                out.push(Instruction::Comparison(op));
            }
            AtomicShape::Iteration {
                bin,
                collection,
                mode,
                iteration,
            } => self.push_iteration(bin, collection, mode, iteration, out)?,
            AtomicShape::GeoCast {
                bin,
                relation,
                cast,
            } => {
                if !cast.is_geojson() {
                    return Err(SemanticError::expected_geojson_cast(&cast.type_name));
                }
                out.push(Instruction::bin(&bin.value, ValueKind::GeoJson));
                out.push(Instruction::geojson(&cast.value.value));
                out.push(Instruction::Geo(relation));
            }
            AtomicShape::Regex { bin, pattern } => {
                let (body, flags) = regex_pattern(&pattern.value);
                out.push(Instruction::bin(&bin.value, ValueKind::String));
                out.push(Instruction::string(body));
                out.push(Instruction::Regex(flags));
            }
        }
        Ok(())
    }

    /// Push a bin and a literal typed after the bin's schema type
    fn push_bin_value(
        &self,
        bin: &Identifier,
        raw: &str,
        out: &mut Vec<Instruction>,
    ) -> Result<(), SemanticError> {
        let particle_type = self.particle_type(&bin.value);
        let (kind, value) = typed_value(particle_type, raw)
            .ok_or_else(|| SemanticError::unsupported_bin_type(&bin.value, particle_type))??;
        out.push(Instruction::bin(&bin.value, kind));
        out.push(Instruction::Value(value));
        Ok(())
    }

    fn push_iteration(
        &self,
        bin: &Identifier,
        collection: IterCollection,
        mode: IterMode,
        iteration: &IterationExpression,
        out: &mut Vec<Instruction>,
    ) -> Result<(), SemanticError> {
        let var = &iteration.var.value;
        out.push(Instruction::iterate(collection, mode, var));

        let container = match self.particle_type(&bin.value) {
            ParticleType::List => ValueKind::List,
            ParticleType::Map => ValueKind::Map,
            _ => match collection {
                IterCollection::List => ValueKind::List,
                IterCollection::MapKeys | IterCollection::MapValues => ValueKind::Map,
            },
        };
        out.push(Instruction::bin(&bin.value, container));

        let key = format!("{}.{}", bin.value, var);
        let var_type = self.particle_type(&key);
        let (kind, value) = typed_value(var_type, iteration.value.text())
            .ok_or_else(|| SemanticError::unsupported_bin_type(key.as_str(), var_type))??;
        out.push(Instruction::var(var, kind));
        out.push(Instruction::Value(value));

        let op_kind = match iteration.value {
            Literal::String(_) => ValueKind::String,
            Literal::Numeric(_) => ValueKind::Integer,
        };
        out.push(compare_instruction(iteration.operator, op_kind));
        Ok(())
    }
}

/// Operand flavour and literal for a schema type; None for collection types
fn typed_value(
    particle_type: ParticleType,
    raw: &str,
) -> Option<Result<(ValueKind, Value), SemanticError>> {
    let typed = match particle_type {
        ParticleType::Integer | ParticleType::Double => {
            truncate_integer(raw).map(|v| (ValueKind::Integer, Value::Integer(v)))
        }
        ParticleType::String => Ok((ValueKind::String, Value::String(raw.to_string()))),
        ParticleType::GeoJson => Ok((ValueKind::GeoJson, Value::GeoJson(raw.to_string()))),
        ParticleType::List | ParticleType::Map => return None,
    };
    Some(typed)
}

fn compare_instruction(operator: CompareOperator, kind: ValueKind) -> Instruction {
    match operator {
        CompareOperator::Equality(op) => Instruction::equality(op, kind),
        CompareOperator::Comparison(op) => Instruction::Comparison(op),
    }
}

fn meta_kind(meta: &MetaExpression) -> Result<MetaKind, SemanticError> {
    let kind = match meta.kind {
        MetaName::Digest => {
            let text = meta.modulo.as_ref().map(|m| m.text.as_str()).unwrap_or("");
            let modulo = i32::try_from(truncate_integer(text)?)
                .map_err(|_| SemanticError::InvalidNumber(text.to_string()))?;
            MetaKind::DigestModulo(modulo)
        }
        MetaName::Lut => MetaKind::LastUpdate,
        MetaName::RecSize => MetaKind::DeviceSize,
        MetaName::Ttl => MetaKind::VoidTime,
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::WhereItem;
    use crate::parser::parse_select;
    use crate::query::PredicateProgram;

    fn types(entries: &[(&str, ParticleType)]) -> BinTypes {
        entries
            .iter()
            .map(|(name, t)| (name.to_string(), *t))
            .collect()
    }

    fn compile_where(
        bin_types: Option<&BinTypes>,
        condition: &str,
    ) -> Result<Vec<Instruction>, SemanticError> {
        let stmt = parse_select(&format!("SELECT * FROM ns WHERE {}", condition)).unwrap();
        let where_clause = stmt.where_clause.unwrap();
        let atomic = match &where_clause.children[0] {
            WhereItem::Atomic(a) => a,
            other => panic!("expected an atomic predicate, got {:?}", other),
        };
        let mut out = Vec::new();
        AtomicCompiler::new(bin_types).compile(atomic, &mut out)?;
        Ok(out)
    }

    fn render(instructions: Vec<Instruction>) -> String {
        PredicateProgram::new(instructions).to_string()
    }

    #[test]
    fn test_truncate_integer() {
        assert_eq!(truncate_integer("42"), Ok(42));
        assert_eq!(truncate_integer("-10"), Ok(-10));
        assert_eq!(truncate_integer("-100.000"), Ok(-100));
        assert_eq!(truncate_integer("2.9"), Ok(2));
        assert_eq!(truncate_integer("-2.9"), Ok(-2));
        assert_eq!(truncate_integer("1e3"), Ok(1000));
        assert!(truncate_integer("abc").is_err());
        assert!(truncate_integer("1e400").is_err());
    }

    #[test]
    fn test_truncate_integer_rejects_out_of_range() {
        assert_eq!(truncate_integer("9223372036854775807"), Ok(i64::MAX));
        assert_eq!(truncate_integer("-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(
            truncate_integer("9223372036854775808"),
            Err(SemanticError::InvalidNumber("9223372036854775808".into()))
        );
        assert!(truncate_integer("-1e19").is_err());
        assert!(truncate_integer("1.5e300").is_err());
        assert!(truncate_integer("-1.5e300").is_err());
    }

    #[test]
    fn test_regex_pattern_flags() {
        assert_eq!(
            regex_pattern("/sparta.*/ie?"),
            (
                "sparta.*",
                RegexFlags::EXTENDED | RegexFlags::ICASE | RegexFlags::NOSUB | RegexFlags::NEWLINE
            )
        );
        assert_eq!(regex_pattern("/sparta.*/s"), ("sparta.*", RegexFlags::empty()));
        assert_eq!(regex_pattern("/sparta.*/IS"), ("sparta.*", RegexFlags::ICASE));
        assert_eq!(regex_pattern("sparta.*"), ("sparta.*", RegexFlags::NEWLINE));
        assert_eq!(regex_pattern("/"), ("/", RegexFlags::NEWLINE));
    }

    #[test]
    fn test_numeric_bins_truncate() {
        let t = types(&[("foo", ParticleType::Integer), ("bar", ParticleType::Double)]);
        let out = compile_where(Some(&t), "bar != -100.000").unwrap();
        assert_eq!(
            out,
            vec![
                Instruction::bin("bar", ValueKind::Integer),
                Instruction::integer(-100),
                Instruction::equality(EqualityOp::NotEqual, ValueKind::Integer),
            ]
        );
        assert_eq!(render(compile_where(Some(&t), "foo >= 2.7").unwrap()), "foo 2 >=");
    }

    #[test]
    fn test_unknown_bin_defaults_to_string() {
        let out = compile_where(None, "name = 'x'").unwrap();
        assert_eq!(
            out,
            vec![
                Instruction::bin("name", ValueKind::String),
                Instruction::string("x"),
                Instruction::equality(EqualityOp::Equal, ValueKind::String),
            ]
        );
        // The raw numeric text, sign included
        let out = compile_where(None, "name = -5").unwrap();
        assert_eq!(out[1], Instruction::string("-5"));
        assert_eq!(
            out[2],
            Instruction::equality(EqualityOp::Equal, ValueKind::Integer)
        );
    }

    #[test]
    fn test_string_literal_against_integer_bin() {
        let t = types(&[("foo", ParticleType::Integer)]);
        let out = compile_where(Some(&t), "foo = '12'").unwrap();
        assert_eq!(out[1], Instruction::integer(12));
        assert_eq!(
            compile_where(Some(&t), "foo = 'twelve'"),
            Err(SemanticError::InvalidNumber("twelve".into()))
        );
    }

    #[test]
    fn test_collection_bin_in_scalar_predicate() {
        let t = types(&[("li", ParticleType::List)]);
        assert_eq!(
            compile_where(Some(&t), "li = 1"),
            Err(SemanticError::unsupported_bin_type("li", "LIST"))
        );
    }

    #[test]
    fn test_meta_predicates() {
        assert_eq!(render(compile_where(None, "DIGEST(3) = 1").unwrap()), "DIGEST(3) 1 =");
        assert_eq!(render(compile_where(None, "LUT() > 1000").unwrap()), "LUT() 1000 >");
        assert_eq!(render(compile_where(None, "recsize() <= 10.5").unwrap()), "RECSIZE() 10 <=");
        assert_eq!(render(compile_where(None, "TTL() != 0").unwrap()), "TTL() 0 !=");
        assert!(matches!(
            compile_where(None, "DIGEST(99999999999) = 1"),
            Err(SemanticError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_iteration_typing() {
        let t = types(&[
            ("ma", ParticleType::Map),
            ("ma.ko", ParticleType::Integer),
        ]);
        let out = compile_where(Some(&t), "ma ANY MAPKEYS (ko <= 999)").unwrap();
        assert_eq!(
            out,
            vec![
                Instruction::iterate(IterCollection::MapKeys, IterMode::Any, "ko"),
                Instruction::bin("ma", ValueKind::Map),
                Instruction::var("ko", ValueKind::Integer),
                Instruction::integer(999),
                Instruction::Comparison(ComparisonOp::LessEq),
            ]
        );
    }

    #[test]
    fn test_iteration_container_inferred_from_operator() {
        let out = compile_where(None, "li CONTAINS (ke = 'aaa')").unwrap();
        assert_eq!(
            out,
            vec![
                Instruction::iterate(IterCollection::List, IterMode::All, "ke"),
                Instruction::bin("li", ValueKind::List),
                Instruction::var("ke", ValueKind::String),
                Instruction::string("aaa"),
                Instruction::equality(EqualityOp::Equal, ValueKind::String),
            ]
        );
        let out = compile_where(None, "ma MAPVALUES (v = 'a')").unwrap();
        assert_eq!(out[1], Instruction::bin("ma", ValueKind::Map));
    }

    #[test]
    fn test_iteration_rejects_string_ordering() {
        assert!(matches!(
            compile_where(None, "li CONTAINS (ke > 'a')"),
            Err(SemanticError::UnsupportedPredicate(_))
        ));
    }

    #[test]
    fn test_iteration_rejects_collection_var() {
        let t = types(&[("li", ParticleType::List), ("li.x", ParticleType::Map)]);
        assert_eq!(
            compile_where(Some(&t), "li CONTAINS (x = 1)"),
            Err(SemanticError::unsupported_bin_type("li.x", "MAP"))
        );
    }

    #[test]
    fn test_geo_cast() {
        let out = compile_where(None, "gj WITHIN CAST('{}' AS GEOJSON)").unwrap();
        assert_eq!(
            out,
            vec![
                Instruction::bin("gj", ValueKind::GeoJson),
                Instruction::geojson("{}"),
                Instruction::Geo(GeoRelation::Within),
            ]
        );
        assert_eq!(
            compile_where(None, "gj CONTAINS CAST('{}' AS STRING)"),
            Err(SemanticError::expected_geojson_cast("STRING"))
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        let err = compile_where(None, "baz > 'a'").unwrap_err();
        assert!(matches!(err, SemanticError::UnsupportedPredicate(ref m) if m.contains("baz > 'a'")));
    }
}
