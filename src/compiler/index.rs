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

//! WITH clause compilation into a secondary index filter

use super::atomic::truncate_integer;
use crate::core::SemanticError;
use crate::parser::ast::{IndexExpression, IndexOperand, IndexRelationToken, Literal, Node};
use crate::query::Filter;

/// Compile the index expression of a WITH clause
pub fn compile_index(expr: &IndexExpression) -> Result<Filter, SemanticError> {
    use IndexOperand as Operand;
    use IndexRelationToken as Rel;

    let bin = expr.bin.value.as_str();
    let collection = expr.collection.unwrap_or_default();

    let filter = match (expr.relation, &expr.operand) {
        // Scalar equality ignores the declared collection
        (Rel::Equal, Operand::Literal(Literal::Numeric(n))) => {
            Filter::equal(bin, truncate_integer(&n.text)?)
        }
        (Rel::Equal, Operand::Literal(Literal::String(s))) => Filter::equal(bin, s.value.as_str()),
        (Rel::Contains, Operand::Literal(Literal::Numeric(n))) => {
            Filter::contains(bin, collection, truncate_integer(&n.text)?)
        }
        (Rel::Contains, Operand::Literal(Literal::String(s))) => {
            Filter::contains(bin, collection, s.value.as_str())
        }
        (Rel::Contains, Operand::Cast(cast)) => {
            if !cast.is_geojson() {
                return Err(SemanticError::expected_geojson_cast(&cast.type_name));
            }
            Filter::geo_contains(bin, collection, cast.value.value.as_str())
        }
        (Rel::Within, Operand::Cast(cast)) => {
            if !cast.is_geojson() {
                return Err(SemanticError::expected_geojson_cast(&cast.type_name));
            }
            Filter::geo_within(bin, collection, cast.value.value.as_str())
        }
        (Rel::Between, Operand::Between(between)) => Filter::range(
            bin,
            collection,
            truncate_integer(&between.low.text)?,
            truncate_integer(&between.high.text)?,
        ),
        _ => {
            return Err(SemanticError::UnsupportedIndexExpression(format!(
                "{} at {}",
                expr,
                expr.position()
            )))
        }
    };

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IndexCollectionType;
    use crate::parser::parse_select;
    use crate::query::{FilterValue, IndexRelation};

    fn compile_with(clause: &str) -> Result<Filter, SemanticError> {
        let stmt = parse_select(&format!("SELECT * FROM ns.set WITH {}", clause)).unwrap();
        compile_index(stmt.index.as_ref().unwrap())
    }

    #[test]
    fn test_equal() {
        assert_eq!(compile_with("(foo = 200)").unwrap(), Filter::equal("foo", 200));
        assert_eq!(compile_with("foo == 2.9").unwrap(), Filter::equal("foo", 2));
        assert_eq!(
            compile_with("PK = 'thisisaprimarykey'").unwrap(),
            Filter::equal("PK", "thisisaprimarykey")
        );
    }

    #[test]
    fn test_equal_ignores_collection() {
        let filter = compile_with("MAPKEYS (foo = 1)").unwrap();
        assert_eq!(filter.collection, IndexCollectionType::Default);
    }

    #[test]
    fn test_contains() {
        assert_eq!(
            compile_with("MAPKEYS (baz CONTAINS 'a')").unwrap(),
            Filter::contains("baz", IndexCollectionType::MapKeys, "a")
        );
        assert_eq!(
            compile_with("MAPVALUES foo CONTAINS 100").unwrap(),
            Filter::contains("foo", IndexCollectionType::MapValues, 100)
        );
        assert_eq!(
            compile_with("baz CONTAINS 'a'").unwrap(),
            Filter::contains("baz", IndexCollectionType::Default, "a")
        );
    }

    #[test]
    fn test_geo() {
        let filter = compile_with("LIST (gj CONTAINS CAST('{\"type\": \"Point\"}' AS GEOJSON))")
            .unwrap();
        assert_eq!(filter.collection, IndexCollectionType::List);
        assert_eq!(
            filter.relation,
            IndexRelation::GeoContains("{\"type\": \"Point\"}".to_string())
        );

        let filter = compile_with("(gj WITHIN CAST('a' AS geojson))").unwrap();
        assert_eq!(
            filter,
            Filter::geo_within("gj", IndexCollectionType::Default, "a")
        );

        assert_eq!(
            compile_with("gj WITHIN CAST('a' AS STRING)"),
            Err(SemanticError::expected_geojson_cast("STRING"))
        );
    }

    #[test]
    fn test_range_truncates_bounds() {
        let filter = compile_with("(foo BETWEEN -1.5 AND 200.9)").unwrap();
        assert_eq!(filter.relation, IndexRelation::Range { low: -1, high: 200 });
        assert_eq!(filter.bin, "foo");
    }

    #[test]
    fn test_unsupported_combinations() {
        assert!(matches!(
            compile_with("gj = CAST('a' AS GEOJSON)"),
            Err(SemanticError::UnsupportedIndexExpression(_))
        ));
        let err = compile_with("gj WITHIN 'a'").unwrap_err();
        match err {
            SemanticError::UnsupportedIndexExpression(msg) => {
                assert!(msg.starts_with("gj WITHIN 'a' at line 1"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_filter_value_flavour() {
        let filter = compile_with("foo = 7").unwrap();
        assert_eq!(filter.relation, IndexRelation::Equal(FilterValue::Integer(7)));
    }
}
