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

//! WITH Clause Index Filter Tests
//!
//! Tests every supported index relation and the rejected combinations

use aql_select::{
    compile, Error, Filter, IndexCollectionType, ParticleType, Schema, SemanticError,
};

fn schema() -> Schema {
    Schema::builder()
        .add("namespace1.sett", "foo", ParticleType::Integer)
        .add("namespace1.sett", "bar", ParticleType::Double)
        .add("namespace1.sett", "baz", ParticleType::String)
        .build()
}

fn filter(with: &str) -> Filter {
    let sql = format!("SELECT foo,bar,baz FROM namespace1.sett WITH {}", with);
    let descriptor = compile(&schema(), &sql).expect("Failed to compile");
    assert!(descriptor.predicate.is_none());
    descriptor.filter.expect("Expected a filter")
}

fn filter_error(with: &str) -> SemanticError {
    let sql = format!("SELECT * FROM namespace1.sett WITH {}", with);
    match compile(&schema(), &sql) {
        Err(Error::Semantic(e)) => e,
        other => panic!("expected a semantic error, got {:?}", other),
    }
}

#[test]
fn test_mapkeys_contains_string() {
    assert_eq!(
        filter("MAPKEYS (baz CONTAINS 'a')"),
        Filter::contains("baz", IndexCollectionType::MapKeys, "a")
    );
}

#[test]
fn test_mapvalues_contains_string() {
    assert_eq!(
        filter("MAPVALUES (baz CONTAINS 'a')"),
        Filter::contains("baz", IndexCollectionType::MapValues, "a")
    );
}

#[test]
fn test_mapvalues_contains_number() {
    assert_eq!(
        filter("MAPVALUES (foo CONTAINS 100)"),
        Filter::contains("foo", IndexCollectionType::MapValues, 100)
    );
}

#[test]
fn test_list_contains() {
    assert_eq!(
        filter("LIST foo CONTAINS 7.9"),
        Filter::contains("foo", IndexCollectionType::List, 7)
    );
}

#[test]
fn test_geo_contains() {
    assert_eq!(
        filter("(baz CONTAINS CAST('a' AS GEOJSON))"),
        Filter::geo_contains("baz", IndexCollectionType::Default, "a")
    );
}

#[test]
fn test_geo_within() {
    assert_eq!(
        filter("(baz WITHIN CAST('a' AS GEOJSON))"),
        Filter::geo_within("baz", IndexCollectionType::Default, "a")
    );
}

#[test]
fn test_numeric_equal() {
    assert_eq!(filter("(foo = 200)"), Filter::equal("foo", 200));
    assert_eq!(filter("foo == -3.5"), Filter::equal("foo", -3));
}

#[test]
fn test_range() {
    assert_eq!(
        filter("(foo BETWEEN 100 AND 200)"),
        Filter::range("foo", IndexCollectionType::Default, 100, 200)
    );
}

#[test]
fn test_range_bound_outside_i64() {
    assert_eq!(
        filter_error("foo BETWEEN 1 AND 9223372036854775808"),
        SemanticError::InvalidNumber("9223372036854775808".to_string())
    );
    assert_eq!(
        filter_error("foo BETWEEN -1.5e300 AND 0"),
        SemanticError::InvalidNumber("-1.5e300".to_string())
    );
    assert_eq!(
        filter("foo BETWEEN -9223372036854775808 AND 9223372036854775807"),
        Filter::range("foo", IndexCollectionType::Default, i64::MIN, i64::MAX)
    );
}

#[test]
fn test_primary_key_equal() {
    assert_eq!(
        filter("(PK = 'thisisaprimarykey')"),
        Filter::equal("PK", "thisisaprimarykey")
    );
}

#[test]
fn test_geo_requires_geojson_cast() {
    assert_eq!(
        filter_error("baz WITHIN CAST('a' AS STRING)"),
        SemanticError::ExpectedGeoJsonCast {
            found: "STRING".to_string()
        }
    );
}

#[test]
fn test_unsupported_relations() {
    assert!(matches!(
        filter_error("baz = CAST('a' AS GEOJSON)"),
        SemanticError::UnsupportedIndexExpression(_)
    ));
    assert!(matches!(
        filter_error("baz WITHIN 'a'"),
        SemanticError::UnsupportedIndexExpression(_)
    ));
}

#[test]
fn test_filter_display() {
    assert_eq!(
        filter("MAPKEYS (baz CONTAINS 'a')").to_string(),
        "MAPKEYS baz CONTAINS 'a'"
    );
    assert_eq!(
        filter("foo BETWEEN 1 AND 2").to_string(),
        "foo BETWEEN 1 AND 2"
    );
}
