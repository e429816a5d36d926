#![allow(unused_crate_dependencies)]

use graphql_schema_transform::{
    check_query_is_valid_to_split, check_schema_is_valid, parse_query, parse_schema, Schema, SchemaTransformError,
    TransformConfig,
};
use rstest::rstest;

const SCHEMA: &str = r#"
    directive @filter(op_name: String!, value: [String!]) repeatable on FIELD | INLINE_FRAGMENT
    directive @output(out_name: String!) on FIELD
    directive @optional on FIELD
    directive @fold on FIELD

    type Query {
        Animal: [Animal]
        Entity: [Entity]
    }

    interface Entity {
        name: String
        uuid: ID
    }

    type Animal implements Entity {
        name: String
        uuid: ID
        out_Animal_OfSpecies: [Species]
        out_Entity_Related: [Entity]
    }

    type Species implements Entity {
        name: String
        uuid: ID
    }
"#;

fn schema() -> Schema {
    check_schema_is_valid(&parse_schema(SCHEMA).unwrap()).unwrap()
}

fn check(query: &str) -> Result<(), SchemaTransformError> {
    check_query_is_valid_to_split(&schema(), &parse_query(query).unwrap(), &TransformConfig::default())
}

#[rstest]
#[case::properties_then_vertex(
    r#"{
        Animal {
            name @output(out_name: "name")
            uuid @filter(op_name: "=", value: ["$uuid"])
            out_Animal_OfSpecies @optional {
                name @output(out_name: "species")
            }
        }
    }"#
)]
#[case::nested_type_coercion(
    r#"{
        Animal {
            name @output(out_name: "name")
            out_Entity_Related {
                ... on Species {
                    name @output(out_name: "related_species")
                }
            }
        }
    }"#
)]
#[case::named_query_with_variables(
    r#"query AnimalsByName($names: [String!]) {
        Animal {
            name @filter(op_name: "in_collection", value: ["$names"]) @output(out_name: "name")
        }
    }"#
)]
fn splittable_queries(#[case] query: &str) {
    check(query).unwrap();
}

#[rstest]
#[case::vertex_then_property(
    r#"{ Animal { out_Animal_OfSpecies { name } name } }"#,
    "In the selections [out_Animal_OfSpecies, name], the property field name occurs after a vertex field or a type coercion statement, which is not allowed, as all property fields must appear before all vertex fields."
)]
#[case::type_coercion_with_siblings(
    r#"{ Animal { out_Entity_Related { name ... on Species { uuid } } } }"#,
    "The selections [name, ... on Species] contain both inline fragments and fields, which may not coexist in one selection."
)]
#[case::unsupported_directive(
    r#"{ Animal { out_Animal_OfSpecies @fold { name } } }"#,
    r#"Directive "fold" is not yet supported, only "filter", "optional", "output" are currently supported."#
)]
#[case::invalid_against_schema(
    r#"{ Animal { out_Animal_OfSpecies { color } } }"#,
    r#"Cannot query field "color" on type "Species"."#
)]
fn unsplittable_queries(#[case] query: &str, #[case] message: &str) {
    let err = check(query).unwrap_err();

    assert!(matches!(err, SchemaTransformError::GraphQLValidation(_)));
    pretty_assertions::assert_eq!(err.to_string(), message);
}

#[test]
fn syntax_errors_are_validation_errors() {
    let err = parse_query("{ Animal { name }").unwrap_err();

    assert!(matches!(err, SchemaTransformError::GraphQLValidation(_)));
}

#[test]
fn directives_from_configuration() {
    let config = TransformConfig::from_toml_str(r#"split_directives = ["output", "fold"]"#).unwrap();
    let query = parse_query(r#"{ Animal { out_Animal_OfSpecies @fold { name @output(out_name: "names") } } }"#).unwrap();

    check_query_is_valid_to_split(&schema(), &query, &config).unwrap();

    let query = parse_query(r#"{ Animal { name @filter(op_name: "is_not_null", value: []) } }"#).unwrap();
    let err = check_query_is_valid_to_split(&schema(), &query, &config).unwrap_err();

    insta::assert_snapshot!(err, @r#"Directive "filter" is not yet supported, only "fold", "output" are currently supported."#);
}
