use crate::{
    ast::{Definition, DirectiveDefinition, Document, Name, SchemaDefinition, Type, TypeDefinition},
    names, SchemaTransformError,
};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// A schema built from a type system [Document]: type and directive definitions indexed by name,
/// in definition order, and the resolved root operation types.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    types: IndexMap<Name, TypeDefinition>,
    directives: IndexMap<Name, DirectiveDefinition>,
    query_type: Name,
    mutation_type: Option<Name>,
    subscription_type: Option<Name>,
}

impl Schema {
    /// Build the schema.
    ///
    /// Root operation types come from the `schema { ... }` definition when there is one, and
    /// otherwise from the types named `Query`, `Mutation` and `Subscription`. Type extensions and
    /// executable definitions are not part of the schema and are skipped.
    pub fn build(document: &Document) -> Result<Schema, SchemaTransformError> {
        let mut types: IndexMap<Name, TypeDefinition> = IndexMap::new();

        for definition in document.type_definitions() {
            let name = definition.name();

            if names::is_builtin_scalar(name) {
                return Err(SchemaTransformError::structure(format!(
                    "Type \"{name}\" has the name of a built-in scalar type."
                )));
            }

            if types.insert(Name::from(name), definition.clone()).is_some() {
                return Err(SchemaTransformError::structure(format!(
                    "There can be only one type named \"{name}\"."
                )));
            }
        }

        let mut directives: IndexMap<Name, DirectiveDefinition> = IndexMap::new();

        for definition in document.definitions.iter() {
            let Definition::Directive(directive) = definition else {
                continue;
            };

            if directives.insert(directive.name.clone(), directive.clone()).is_some() {
                return Err(SchemaTransformError::structure(format!(
                    "There can be only one directive named \"@{}\".",
                    directive.name
                )));
            }
        }

        let schema_definition = document.definitions.iter().find_map(|definition| match definition {
            Definition::Schema(schema) => Some(schema),
            _ => None,
        });

        let (query_type, mutation_type, subscription_type) = match schema_definition {
            Some(SchemaDefinition {
                query,
                mutation,
                subscription,
                ..
            }) => (
                query.as_ref().map(|named| named.name.clone()),
                mutation.as_ref().map(|named| named.name.clone()),
                subscription.as_ref().map(|named| named.name.clone()),
            ),
            None => {
                let by_convention = |name: &str| types.get_key_value(name).map(|(name, _)| name.clone());
                (
                    by_convention("Query"),
                    by_convention("Mutation"),
                    by_convention("Subscription"),
                )
            }
        };

        let Some(query_type) = query_type else {
            return Err(SchemaTransformError::structure("The schema does not define a query root type."));
        };

        for (operation, root) in [
            ("query", Some(&query_type)),
            ("mutation", mutation_type.as_ref()),
            ("subscription", subscription_type.as_ref()),
        ] {
            let Some(root) = root else { continue };

            match types.get(root) {
                Some(TypeDefinition::Object(_)) => (),
                Some(_) => {
                    return Err(SchemaTransformError::structure(format!(
                        "The {operation} root type \"{root}\" must be an object type."
                    )))
                }
                None => {
                    return Err(SchemaTransformError::structure(format!(
                        "The {operation} root type \"{root}\" is not defined."
                    )))
                }
            }
        }

        let schema = Schema {
            types,
            directives,
            query_type,
            mutation_type,
            subscription_type,
        };

        schema.check_references()?;

        Ok(schema)
    }

    fn check_references(&self) -> Result<(), SchemaTransformError> {
        let check_type = |ty: &Type, location: &dyn Fn() -> String| {
            let name = &ty.named_type().name;
            if self.is_defined(name) {
                Ok(())
            } else {
                Err(SchemaTransformError::structure(format!(
                    "Unknown type \"{name}\" referenced by {}.",
                    location()
                )))
            }
        };

        for definition in self.types.values() {
            let type_name = definition.name();

            match definition {
                TypeDefinition::Object(object) => {
                    self.check_interfaces(type_name, object.interfaces.iter().map(|named| &*named.name))?
                }
                TypeDefinition::Interface(interface) => {
                    self.check_interfaces(type_name, interface.interfaces.iter().map(|named| &*named.name))?
                }
                TypeDefinition::Union(union) => {
                    for member in union.members.iter() {
                        match self.types.get(&member.name) {
                            Some(TypeDefinition::Object(_)) => (),
                            Some(_) => {
                                return Err(SchemaTransformError::structure(format!(
                                    "Union \"{type_name}\" can only include object types, \"{}\" is not one.",
                                    member.name
                                )))
                            }
                            None => {
                                return Err(SchemaTransformError::structure(format!(
                                    "Unknown type \"{}\" referenced as a member of union \"{type_name}\".",
                                    member.name
                                )))
                            }
                        }
                    }
                }
                TypeDefinition::InputObject(input_object) => {
                    for field in input_object.fields.iter() {
                        check_type(&field.ty, &|| format!("field \"{type_name}.{}\"", field.name))?;
                    }
                }
                TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => (),
            }

            for field in definition.fields() {
                check_type(&field.ty, &|| format!("field \"{type_name}.{}\"", field.name))?;

                for argument in field.arguments.iter() {
                    check_type(&argument.ty, &|| {
                        format!("argument \"{}\" of field \"{type_name}.{}\"", argument.name, field.name)
                    })?;
                }
            }
        }

        for directive in self.directives.values() {
            for argument in directive.arguments.iter() {
                check_type(&argument.ty, &|| {
                    format!("argument \"{}\" of directive \"@{}\"", argument.name, directive.name)
                })?;
            }
        }

        Ok(())
    }

    fn check_interfaces<'a>(
        &self,
        type_name: &str,
        interfaces: impl Iterator<Item = &'a str>,
    ) -> Result<(), SchemaTransformError> {
        for interface in interfaces {
            match self.types.get(interface) {
                Some(TypeDefinition::Interface(_)) => (),
                Some(_) => {
                    return Err(SchemaTransformError::structure(format!(
                        "Type \"{type_name}\" can only implement interfaces, \"{interface}\" is not one."
                    )))
                }
                None => {
                    return Err(SchemaTransformError::structure(format!(
                        "Unknown interface \"{interface}\" implemented by \"{type_name}\"."
                    )))
                }
            }
        }

        Ok(())
    }

    /// Built-in scalars are always defined.
    pub fn is_defined(&self, name: &str) -> bool {
        names::is_builtin_scalar(name) || self.types.contains_key(name)
    }

    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    pub fn query_type(&self) -> Option<&TypeDefinition> {
        self.types.get(&self.query_type)
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Every type definition, in definition order.
    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn directive_definition(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directives.get(name)
    }

    /// Every directive definition, in definition order.
    pub fn directive_definitions(&self) -> impl Iterator<Item = &DirectiveDefinition> {
        self.directives.values()
    }

    /// The object types a value of the named type can have: the type itself for an object type,
    /// the implementers of an interface and the members of a union. Empty for any other type.
    pub fn possible_types(&self, name: &str) -> BTreeSet<&str> {
        match self.types.get(name) {
            Some(TypeDefinition::Object(object)) => BTreeSet::from([&*object.name]),
            Some(TypeDefinition::Interface(interface)) => self
                .types
                .values()
                .filter_map(|definition| match definition {
                    TypeDefinition::Object(object)
                        if object.interfaces.iter().any(|implemented| implemented.name == interface.name) =>
                    {
                        Some(&*object.name)
                    }
                    _ => None,
                })
                .collect(),
            Some(TypeDefinition::Union(union)) => union.members.iter().map(|member| &*member.name).collect(),
            _ => BTreeSet::new(),
        }
    }

    /// The names of the scalars defined by the schema itself.
    pub fn custom_scalar_names(&self) -> BTreeSet<&str> {
        self.types
            .values()
            .filter(|definition| matches!(definition, TypeDefinition::Scalar(_)))
            .map(TypeDefinition::name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_schema;

    fn build(sdl: &str) -> Result<Schema, SchemaTransformError> {
        Schema::build(&parse_schema(sdl).unwrap())
    }

    #[test]
    fn roots_by_convention() {
        let schema = build(
            r#"
            scalar Date
            type Query { Animal: Animal }
            type Animal { name: String, birthday: Date }
            "#,
        )
        .unwrap();

        assert_eq!(schema.query_type_name(), "Query");
        assert_eq!(schema.mutation_type_name(), None);
        assert_eq!(schema.subscription_type_name(), None);
        assert_eq!(
            schema.type_definitions().map(TypeDefinition::name).collect::<Vec<_>>(),
            ["Date", "Query", "Animal"]
        );
        assert_eq!(schema.custom_scalar_names(), BTreeSet::from(["Date"]));
        assert!(schema.is_defined("String"));
        assert!(!schema.is_defined("Pet"));
    }

    #[test]
    fn roots_from_schema_definition() {
        let schema = build(
            r#"
            schema { query: RootSchemaQuery mutation: Mutations }
            type RootSchemaQuery { Animal: Animal }
            type Mutations { addAnimal(name: String!): Animal }
            type Animal { name: String }
            "#,
        )
        .unwrap();

        assert_eq!(schema.query_type_name(), "RootSchemaQuery");
        assert_eq!(schema.mutation_type_name(), Some("Mutations"));
        assert!(matches!(schema.query_type(), Some(TypeDefinition::Object(_))));
    }

    #[test]
    fn build_errors() {
        let missing_query = build("type Animal { name: String }").unwrap_err();
        insta::assert_snapshot!(missing_query, @"The schema does not define a query root type.");

        let duplicate = build("type Query { Animal: Animal } type Animal { name: String } enum Animal { DOG }").unwrap_err();
        insta::assert_snapshot!(duplicate, @r#"There can be only one type named "Animal"."#);

        let builtin = build("type Query { Animal: Animal } type Animal { name: String } scalar String").unwrap_err();
        insta::assert_snapshot!(builtin, @r#"Type "String" has the name of a built-in scalar type."#);

        let unknown = build("type Query { Animal: Animal } type Animal { name: Name }").unwrap_err();
        insta::assert_snapshot!(unknown, @r#"Unknown type "Name" referenced by field "Animal.name"."#);

        let root_not_object = build("schema { query: Animal } interface Animal { name: String }").unwrap_err();
        insta::assert_snapshot!(root_not_object, @r#"The query root type "Animal" must be an object type."#);

        let bad_member = build("type Query { Pet: Pet } union Pet = Dog | Named type Dog { name: String } interface Named { name: String }").unwrap_err();
        insta::assert_snapshot!(bad_member, @r#"Union "Pet" can only include object types, "Named" is not one."#);

        let bad_interface = build("type Query { Dog: Dog } type Dog implements Cat { name: String } type Cat { name: String }").unwrap_err();
        insta::assert_snapshot!(bad_interface, @r#"Type "Dog" can only implement interfaces, "Cat" is not one."#);

        let bad_argument = build("type Query { Dog(age: Age): Dog } type Dog { name: String }").unwrap_err();
        insta::assert_snapshot!(bad_argument, @r#"Unknown type "Age" referenced by argument "age" of field "Query.Dog"."#);

        let duplicate_directive = build(
            "directive @output(out_name: String!) on FIELD directive @output on FIELD type Query { Dog: Dog } type Dog { name: String }",
        )
        .unwrap_err();
        insta::assert_snapshot!(duplicate_directive, @r#"There can be only one directive named "@output"."#);

        let bad_directive_argument = build("directive @filter(op: Op!) on FIELD type Query { Dog: Dog } type Dog { name: String }").unwrap_err();
        insta::assert_snapshot!(bad_directive_argument, @r#"Unknown type "Op" referenced by argument "op" of directive "@filter"."#);
    }

    #[test]
    fn directive_definitions() {
        let schema = build(
            r#"
            directive @output(out_name: String!) on FIELD
            directive @optional on FIELD
            type Query { Animal: Animal }
            type Animal { name: String }
            "#,
        )
        .unwrap();

        assert_eq!(
            schema.directive_definitions().map(|directive| &*directive.name).collect::<Vec<_>>(),
            ["output", "optional"]
        );
        assert_eq!(schema.directive_definition("output").unwrap().arguments.len(), 1);
        assert!(schema.directive_definition("recurse").is_none());
    }

    #[test]
    fn possible_types() {
        let schema = build(
            r#"
            type Query { Entity: Entity, Pet: Pet }
            interface Entity { name: String }
            interface Unimplemented { name: String }
            type Animal implements Entity { name: String }
            type Species implements Entity { name: String }
            type Dog { name: String }
            type Cat { name: String }
            union Pet = Dog | Cat
            enum Color { BROWN }
            "#,
        )
        .unwrap();

        assert_eq!(schema.possible_types("Animal"), BTreeSet::from(["Animal"]));
        assert_eq!(schema.possible_types("Entity"), BTreeSet::from(["Animal", "Species"]));
        assert_eq!(schema.possible_types("Pet"), BTreeSet::from(["Cat", "Dog"]));
        assert!(schema.possible_types("Unimplemented").is_empty());
        assert!(schema.possible_types("Color").is_empty());
        assert!(schema.possible_types("Plant").is_empty());
    }

    #[test]
    fn extensions_are_not_part_of_the_schema() {
        let schema = build(
            r#"
            type Query { Animal: Animal }
            type Animal { name: String }
            extend type Animal { age: Int }
            "#,
        )
        .unwrap();

        let animal = schema.type_definition("Animal").unwrap();
        assert_eq!(animal.fields().len(), 1);
    }
}
