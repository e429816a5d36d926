#![allow(unused_crate_dependencies)]

use graphql_schema_transform::{
    check_schema_is_valid, parse_schema, rename_schema, CascadeViolation, RenamingPlan, SchemaTransformError,
    TransformConfig,
};

const SCHEMA: &str = r#"
    schema {
        query: RootSchemaQuery
    }

    directive @output(out_name: String!) on FIELD
    directive @filter(op_name: String!, value: [String!]) repeatable on FIELD | INLINE_FRAGMENT

    scalar Date

    enum Height {
        TALL
        SHORT
    }

    interface Entity {
        uuid: ID
        name: String
    }

    type Person implements Entity {
        uuid: ID
        name: String
        birthday: Date
        pet: Pet
        friends: [Person!]
    }

    type Pet implements Entity {
        uuid: ID
        name: String
        height: Height
        owner: Person
    }

    type Dog {
        name: String
    }

    type Cat {
        name: String
    }

    union Animal = Dog | Cat

    type RootSchemaQuery {
        Person: [Person]
        Pet: [Pet]
        Entity: [Entity]
        Animal: [Animal]
        Height: Height
    }
"#;

/// Apply the plan, and once the cascade check is happy, check the result is a valid schema too.
fn rename(plan: &RenamingPlan) -> Result<graphql_schema_transform::RenamedSchema, SchemaTransformError> {
    let renamed = rename_schema(&parse_schema(SCHEMA).unwrap(), plan, &TransformConfig::default())?;
    check_schema_is_valid(&renamed.document).unwrap();
    Ok(renamed)
}

#[test]
fn rename_and_suppress() {
    let plan = RenamingPlan::new()
        .with_type_renamed("Person", "Human")
        .with_type_renamed("Height", "Size")
        .with_type_suppressed("Cat");

    let renamed = rename(&plan).unwrap();
    let schema = check_schema_is_valid(&renamed.document).unwrap();

    let names: Vec<_> = schema.type_definitions().map(|ty| ty.name()).collect();
    assert_eq!(
        names,
        ["Date", "Size", "Entity", "Human", "Pet", "Dog", "Animal", "RootSchemaQuery"]
    );

    let human = schema.type_definition("Human").unwrap();
    assert_eq!(human.field("friends").unwrap().ty.to_string(), "[Human!]");
    assert_eq!(schema.type_definition("Pet").unwrap().field("owner").unwrap().ty.to_string(), "Human");

    let query = schema.query_type().unwrap();
    assert_eq!(query.field("Human").unwrap().ty.to_string(), "[Human]");
    assert_eq!(query.field("Size").unwrap().ty.to_string(), "Size");
    assert!(query.field("Person").is_none());

    insta::assert_json_snapshot!(renamed.reverse_name_map, @r#"
    {
      "Human": "Person",
      "Size": "Height"
    }
    "#);
}

#[test]
fn suppressing_a_type_requires_suppressing_its_references() {
    let plan = RenamingPlan::new().with_type_suppressed("Pet");

    let Err(SchemaTransformError::CascadingSuppression(violations)) = rename(&plan) else {
        panic!("expected a cascading suppression");
    };
    assert_eq!(
        violations,
        [CascadeViolation::DanglingReference {
            type_name: String::from("Person"),
            field_name: String::from("pet"),
            referenced_type: String::from("Pet"),
        }]
    );

    let plan = plan.with_field_suppressed("Person", "pet");
    let renamed = rename(&plan).unwrap();

    let schema = check_schema_is_valid(&renamed.document).unwrap();
    assert!(schema.type_definition("Pet").is_none());
    assert!(schema.type_definition("Person").unwrap().field("pet").is_none());
}

#[test]
fn violations_are_machine_readable() {
    let plan = RenamingPlan::new()
        .with_type_suppressed("Dog")
        .with_type_suppressed("Cat")
        .with_field_suppressed("Dog", "name");

    let Err(SchemaTransformError::CascadingSuppression(violations)) = rename(&plan) else {
        panic!("expected a cascading suppression");
    };

    let json = serde_json::to_value(&violations).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "kind": "dangling_union_member", "union_name": "Animal" }])
    );
}

#[test]
fn renaming_conflicts_are_reported_together() {
    let plan = RenamingPlan::new()
        .with_type_renamed("Dog", "Pet")
        .with_type_renamed("Cat", "Date")
        .with_type_renamed("Animal", "Boolean");

    let err = rename(&plan).unwrap_err();

    insta::assert_snapshot!(err, @r#"
    Applying the renaming would produce a schema in which multiple types have the same name, which is an illegal schema state. For each key k in name_conflicts, name_conflicts[k] is the set of types in the original schema that get mapped to k in the new schema. To fix this, modify the renaming plan to ensure that no two types in the renamed schema have the same name. name_conflicts: {"Date": {"Cat", "Date"}, "Pet": {"Dog", "Pet"}}
    Applying the renaming would rename type(s) to a name already used by a built-in GraphQL scalar type. To fix this, ensure that no type name is mapped to a scalar's name. The following map has each to-be-renamed type and the scalar name it was mapped to: {"Animal": "Boolean"}
    "#);
}

#[test]
fn swapping_names() {
    let plan = RenamingPlan::new()
        .with_type_renamed("Dog", "Cat")
        .with_type_renamed("Cat", "Dog");

    let renamed = rename(&plan).unwrap();

    assert_eq!(renamed.reverse_name_map["Cat"], "Dog");
    assert_eq!(renamed.reverse_name_map["Dog"], "Cat");
}

#[test]
fn invalid_schemas_are_rejected_before_renaming() {
    let document = parse_schema(
        r#"
        type Query { Person: Person }
        type Person { name: String }
        input PersonFilter { name: String }
        "#,
    )
    .unwrap();

    let err = rename_schema(&document, &RenamingPlan::new(), &TransformConfig::default()).unwrap_err();

    insta::assert_snapshot!(err, @r#"Node type "InputObjectTypeDefinition" not allowed."#);
}
