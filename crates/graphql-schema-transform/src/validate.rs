//! Checks that a schema document only uses the subset of GraphQL that renaming and merging
//! support.

use crate::{
    ast::{
        visit::{visit, Visitor},
        Document, NodeKind, NodeRef,
    },
    names, Schema, SchemaTransformError,
};

/// Node kinds a schema document may not contain.
const DISALLOWED: &[NodeKind] = &[NodeKind::InputObjectTypeDefinition, NodeKind::TypeExtension];

/// Node kinds that only belong in executable documents.
const UNEXPECTED_IN_SCHEMA: &[NodeKind] = &[
    NodeKind::Field,
    NodeKind::FragmentDefinition,
    NodeKind::FragmentSpread,
    NodeKind::InlineFragment,
    NodeKind::ObjectField,
    NodeKind::ObjectValue,
    NodeKind::OperationDefinition,
    NodeKind::SelectionSet,
    NodeKind::Variable,
    NodeKind::VariableDefinition,
];

/// Node kinds whose name must be a legal, unreserved type name.
const NAME_CHECKED: &[NodeKind] = &[
    NodeKind::EnumTypeDefinition,
    NodeKind::InterfaceTypeDefinition,
    NodeKind::ObjectTypeDefinition,
    NodeKind::ScalarTypeDefinition,
    NodeKind::UnionTypeDefinition,
];

struct ValidTypesAndNames;

impl<'a> Visitor<'a> for ValidTypesAndNames {
    type Error = SchemaTransformError;

    fn enter(&mut self, node: NodeRef<'a>) -> Result<(), SchemaTransformError> {
        let kind = node.kind();

        if DISALLOWED.contains(&kind) {
            return Err(SchemaTransformError::structure(format!("Node type \"{kind}\" not allowed.")));
        }

        if UNEXPECTED_IN_SCHEMA.contains(&kind) {
            return Err(SchemaTransformError::structure(format!(
                "Node type \"{kind}\" unexpected in schema AST."
            )));
        }

        if NAME_CHECKED.contains(&kind) {
            let name = node.name().unwrap_or_default();

            if !names::is_nonreserved_type_name(name) {
                return Err(SchemaTransformError::InvalidTypeName { name: name.to_owned() });
            }
        }

        Ok(())
    }
}

/// Reject disallowed node kinds, executable nodes and illegal or reserved type names. Stops at the
/// first offending node.
pub fn check_valid_types_and_names(document: &Document) -> Result<(), SchemaTransformError> {
    visit(&mut ValidTypesAndNames, document)
}

struct QueryTypeFieldsMatch<'q> {
    query_type: &'q str,
    in_query_type: bool,
}

impl<'a> Visitor<'a> for QueryTypeFieldsMatch<'_> {
    type Error = SchemaTransformError;

    fn enter(&mut self, node: NodeRef<'a>) -> Result<(), SchemaTransformError> {
        match node {
            NodeRef::ObjectTypeDefinition(object) if *object.name == *self.query_type => {
                self.in_query_type = true;
            }
            NodeRef::FieldDefinition(field) if self.in_query_type => {
                let queried_type = &field.ty.named_type().name;

                if field.name != *queried_type {
                    return Err(SchemaTransformError::structure(format!(
                        "Query type's field name \"{}\" does not match corresponding queried type name \"{queried_type}\"",
                        field.name
                    )));
                }
            }
            _ => (),
        }

        Ok(())
    }

    fn exit(&mut self, node: NodeRef<'a>) -> Result<(), SchemaTransformError> {
        if let NodeRef::ObjectTypeDefinition(object) = node {
            if *object.name == *self.query_type {
                self.in_query_type = false;
            }
        }

        Ok(())
    }
}

/// Check that every field of the root query type is named after the type it queries, e.g.
/// `Animal: [Animal]`.
pub fn check_query_type_fields_match(document: &Document, query_type: &str) -> Result<(), SchemaTransformError> {
    let mut visitor = QueryTypeFieldsMatch {
        query_type,
        in_query_type: false,
    };

    visit(&mut visitor, document)
}

/// Check that a schema can be renamed or merged, and return the schema built from it.
///
/// The schema must build, must not have mutation or subscription root types, must pass
/// [check_valid_types_and_names] and then [check_query_type_fields_match], in that order.
pub fn check_schema_is_valid(document: &Document) -> Result<Schema, SchemaTransformError> {
    tracing::debug!(definitions = document.definitions.len(), "checking schema validity");

    let schema = Schema::build(document)?;

    if schema.mutation_type_name().is_some() {
        return Err(SchemaTransformError::structure(
            "Renaming schemas that contain mutations is currently not supported.",
        ));
    }

    if schema.subscription_type_name().is_some() {
        return Err(SchemaTransformError::structure(
            "Renaming schemas that contain subscriptions is currently not supported.",
        ));
    }

    check_valid_types_and_names(document)?;
    check_query_type_fields_match(document, schema.query_type_name())?;

    tracing::debug!(query_type = schema.query_type_name(), "schema is valid");

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_query, parse_schema};
    use rstest::rstest;

    const ANIMALS: &str = r#"
        schema {
            query: SchemaQuery
        }

        directive @stitch(source_field: String!, sink_field: String!) on FIELD_DEFINITION

        scalar Date

        enum Height {
            TALL
            SHORT
        }

        interface Entity {
            uuid: ID
        }

        type Animal implements Entity {
            uuid: ID
            name(locale: String = "en"): String
            birthday: Date
            height: Height
            parent: Animal @stitch(source_field: "uuid", sink_field: "uuid")
        }

        type Dog {
            name: String
        }

        union Pet = Animal | Dog

        type SchemaQuery {
            Animal: [Animal!]!
            Entity: Entity
            Pet: Pet
            Height: Height
        }
    "#;

    #[test]
    fn supported_schema_is_valid() {
        let schema = check_schema_is_valid(&parse_schema(ANIMALS).unwrap()).unwrap();

        assert_eq!(schema.query_type_name(), "SchemaQuery");
    }

    #[test]
    fn checks_are_idempotent() {
        let document = parse_schema("type Query { Animal: Animal } type Animal { name: String } input Filter { name: String }").unwrap();

        let first = check_valid_types_and_names(&document).unwrap_err().to_string();
        let second = check_valid_types_and_names(&document).unwrap_err().to_string();

        assert_eq!(first, second);
    }

    #[test]
    fn query_type_fields_must_match_their_type() {
        let valid = parse_schema("type Query { Animal: Animal } type Animal { name: String }").unwrap();
        assert!(check_schema_is_valid(&valid).is_ok());

        let invalid = parse_schema("type Query { pet: Animal } type Animal { name: String }").unwrap();
        let err = check_schema_is_valid(&invalid).unwrap_err();

        assert!(matches!(err, SchemaTransformError::SchemaStructure(_)));
        insta::assert_snapshot!(err, @r#"Query type's field name "pet" does not match corresponding queried type name "Animal""#);
    }

    #[test]
    fn only_the_query_type_is_matched() {
        let document = parse_schema("type Query { Animal: Animal } type Animal { pet: Animal }").unwrap();

        assert!(check_query_type_fields_match(&document, "Query").is_ok());
        assert!(check_query_type_fields_match(&document, "Animal").is_err());
    }

    #[rstest]
    #[case::input_object(
        "type Query { Animal(filter: Filter): Animal } type Animal { name: String } input Filter { name: String }",
        "Node type \"InputObjectTypeDefinition\" not allowed."
    )]
    #[case::type_extension(
        "type Query { Animal: Animal } type Animal { name: String } extend type Animal { age: Int }",
        "Node type \"TypeExtension\" not allowed."
    )]
    #[case::mutation(
        "type Query { Animal: Animal } type Mutation { Animal: Animal } type Animal { name: String }",
        "Renaming schemas that contain mutations is currently not supported."
    )]
    #[case::subscription(
        "type Query { Animal: Animal } type Subscription { Animal: Animal } type Animal { name: String }",
        "Renaming schemas that contain subscriptions is currently not supported."
    )]
    fn unsupported_structures(#[case] sdl: &str, #[case] message: &str) {
        let err = check_schema_is_valid(&parse_schema(sdl).unwrap()).unwrap_err();

        assert!(matches!(err, SchemaTransformError::SchemaStructure(_)));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn executable_definitions_are_unexpected() {
        let schema = parse_schema("type Query { Animal: Animal } type Animal { name: String }").unwrap();
        let query = parse_query("{ Animal { name } }").unwrap();
        let document: Document = schema
            .definitions
            .iter()
            .chain(query.definitions.iter())
            .cloned()
            .collect();

        let err = check_schema_is_valid(&document).unwrap_err();

        insta::assert_snapshot!(err, @r#"Node type "OperationDefinition" unexpected in schema AST."#);
    }

    #[test]
    fn object_values_are_unexpected() {
        let document = parse_schema(
            r#"
            directive @config(value: String) on OBJECT
            type Query { Animal: Animal }
            type Animal @config(value: { nested: "object" }) { name: String }
            "#,
        )
        .unwrap();

        let err = check_valid_types_and_names(&document).unwrap_err();

        insta::assert_snapshot!(err, @r#"Node type "ObjectValue" unexpected in schema AST."#);
    }

    #[rstest]
    #[case("type Query { __Animal: __Animal } type __Animal { name: String }", "__Animal")]
    #[case("type Query { Animal: Animal } type Animal { name: String } enum __Height { TALL }", "__Height")]
    #[case("type Query { Animal: Animal } type Animal { name: String } scalar __Date", "__Date")]
    fn reserved_type_names(#[case] sdl: &str, #[case] name: &str) {
        let err = check_schema_is_valid(&parse_schema(sdl).unwrap()).unwrap_err();

        assert!(matches!(err, SchemaTransformError::InvalidTypeName { name: ref invalid } if invalid == name));
    }
}
