use crate::{
    ast::{
        Definition, DirectiveDefinition, Document, FieldDefinition, InputObjectTypeDefinition, InputValueDefinition,
        InterfaceTypeDefinition, NamedType, ObjectTypeDefinition, SchemaDefinition, Type, TypeDefinition,
        UnionTypeDefinition,
    },
    check_cascading_suppression, check_rename_conflicts, check_schema_is_valid, names,
    suppression::is_field_live,
    Rename, Renaming, RenamingPlan, Schema, SchemaTransformError, SuppressionSet, TransformConfig,
};
use std::{collections::BTreeMap, sync::Arc};

/// A schema document with a [RenamingPlan] applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RenamedSchema {
    pub document: Document,
    /// New type name -> original type name, for every renamed type.
    pub reverse_name_map: BTreeMap<String, String>,
}

/// Apply a renaming plan to a schema document.
///
/// The plan is checked completely before anything is built: the schema must be valid, every new
/// name legal, the renaming free of conflicts and the suppressions free of cascades. Suppressed
/// types disappear together with the fields, union members and `implements` entries that
/// reference them, and root query fields follow the renaming of the type they are named after.
/// Plan entries for types or fields the schema doesn't have are ignored.
pub fn rename_schema(
    document: &Document,
    plan: &RenamingPlan,
    config: &TransformConfig,
) -> Result<RenamedSchema, SchemaTransformError> {
    let schema = check_schema_is_valid(document)?;

    check_plan_entries(&schema, plan)?;
    check_rename_conflicts(&schema, plan, config)?;

    let suppressions = plan.suppression_set();
    check_cascading_suppression(&schema, &suppressions)?;

    let renamer = SchemaRenamer {
        schema: &schema,
        plan,
        suppressions: &suppressions,
    };

    let mut definitions: Vec<Definition> = document
        .definitions
        .iter()
        .filter_map(|definition| renamer.rename_definition(definition))
        .collect();

    let has_schema_definition = definitions
        .iter()
        .any(|definition| matches!(definition, Definition::Schema(_)));
    let query_type = renamer.new_name(schema.query_type_name());

    if !has_schema_definition && query_type != schema.query_type_name() {
        definitions.insert(
            0,
            Definition::Schema(SchemaDefinition {
                directives: Vec::new().into(),
                query: Some(NamedType::new(query_type)),
                mutation: None,
                subscription: None,
            }),
        );
    }

    let reverse_name_map: BTreeMap<String, String> = plan
        .type_renamings()
        .filter_map(|(original_name, renaming)| match renaming {
            Renaming::RenameTo(new_name) if new_name != original_name && schema.is_defined(original_name) => {
                Some((new_name.clone(), original_name.to_owned()))
            }
            _ => None,
        })
        .collect();

    tracing::debug!(
        renamed = reverse_name_map.len(),
        suppressed = suppressions.suppressed_types().count(),
        "renamed schema"
    );

    Ok(RenamedSchema {
        document: Document::new(definitions),
        reverse_name_map,
    })
}

fn check_plan_entries(schema: &Schema, plan: &RenamingPlan) -> Result<(), SchemaTransformError> {
    for (type_name, renaming) in plan.type_renamings() {
        match schema.type_definition(type_name) {
            None => {
                tracing::warn!(type_name, "ignoring renaming of a type the schema does not define");
                continue;
            }
            Some(TypeDefinition::Scalar(_)) => {
                return Err(SchemaTransformError::structure(format!(
                    "Type \"{type_name}\" is a scalar. Scalars cannot be renamed or suppressed."
                )));
            }
            Some(_) => (),
        }

        match renaming {
            Renaming::RenameTo(new_name) if !names::is_nonreserved_type_name(new_name) => {
                return Err(SchemaTransformError::InvalidTypeName {
                    name: new_name.clone(),
                });
            }
            Renaming::Suppress if type_name == schema.query_type_name() => {
                return Err(SchemaTransformError::structure(format!(
                    "The query type \"{type_name}\" cannot be suppressed. Suppress the types it queries instead."
                )));
            }
            Renaming::RenameTo(_) | Renaming::Suppress => (),
        }
    }

    for (type_name, fields) in plan.field_suppressions() {
        let Some(definition) = schema.type_definition(type_name) else {
            tracing::warn!(type_name, "ignoring field suppressions on a type the schema does not define");
            continue;
        };

        for field_name in fields {
            if definition.field(field_name).is_none() {
                tracing::warn!(
                    type_name,
                    field_name = field_name.as_str(),
                    "ignoring suppression of a field the type does not define"
                );
            }
        }
    }

    Ok(())
}

struct SchemaRenamer<'a> {
    schema: &'a Schema,
    plan: &'a RenamingPlan,
    suppressions: &'a SuppressionSet,
}

impl<'a> SchemaRenamer<'a> {
    /// The new name of a type that is not suppressed.
    fn new_name<'n>(&'n self, type_name: &'n str) -> &'n str {
        self.plan.new_type_name(type_name).unwrap_or(type_name)
    }

    fn rename_definition(&self, definition: &Definition) -> Option<Definition> {
        let renamed = match definition {
            Definition::Schema(schema) => Definition::Schema(SchemaDefinition {
                query: schema.query.as_ref().map(|named| self.rename_named_type(named)),
                ..schema.clone()
            }),
            Definition::Type(ty) => {
                if self.suppressions.is_type_suppressed(ty.name()) {
                    return None;
                }
                Definition::Type(self.rename_type_definition(ty))
            }
            Definition::Directive(directive) => Definition::Directive(DirectiveDefinition {
                arguments: self.rename_input_values(&directive.arguments),
                ..directive.clone()
            }),
            Definition::TypeExtension(_) | Definition::Operation(_) | Definition::Fragment(_) => definition.clone(),
        };

        Some(renamed)
    }

    fn rename_type_definition(&self, definition: &TypeDefinition) -> TypeDefinition {
        let type_name = definition.name();
        let new_name = self.new_name(type_name);

        match definition {
            TypeDefinition::Object(object) => {
                let object = if new_name == type_name {
                    object.clone()
                } else {
                    object.renamed(new_name)
                };

                TypeDefinition::Object(ObjectTypeDefinition {
                    interfaces: self.rename_named_types(&object.interfaces),
                    fields: self.rename_fields(type_name, &object.fields),
                    ..object
                })
            }
            TypeDefinition::Interface(interface) => {
                let interface = if new_name == type_name {
                    interface.clone()
                } else {
                    interface.renamed(new_name)
                };

                TypeDefinition::Interface(InterfaceTypeDefinition {
                    interfaces: self.rename_named_types(&interface.interfaces),
                    fields: self.rename_fields(type_name, &interface.fields),
                    ..interface
                })
            }
            TypeDefinition::Union(union) => {
                let union = if new_name == type_name {
                    union.clone()
                } else {
                    union.renamed(new_name)
                };

                TypeDefinition::Union(UnionTypeDefinition {
                    members: self.rename_named_types(&union.members),
                    ..union
                })
            }
            TypeDefinition::Enum(enum_type) if new_name != type_name => {
                TypeDefinition::Enum(enum_type.renamed(new_name))
            }
            TypeDefinition::InputObject(input_object) => {
                TypeDefinition::InputObject(InputObjectTypeDefinition {
                    fields: self.rename_input_values(&input_object.fields),
                    ..input_object.clone()
                })
            }
            TypeDefinition::Enum(_) | TypeDefinition::Scalar(_) => definition.clone(),
        }
    }

    /// Drop the suppressed fields and rename the types of the others. Root query fields are
    /// renamed along with the type they are named after.
    fn rename_fields(&self, type_name: &str, fields: &[FieldDefinition]) -> Arc<[FieldDefinition]> {
        let is_query_type = type_name == self.schema.query_type_name();

        fields
            .iter()
            .filter(|field| is_field_live(self.schema, self.suppressions, type_name, field))
            .map(|field| {
                let field = if is_query_type && self.new_name(&field.name) != &*field.name {
                    field.renamed(self.new_name(&field.name))
                } else {
                    field.clone()
                };

                FieldDefinition {
                    arguments: self.rename_input_values(&field.arguments),
                    ty: self.rename_type(&field.ty),
                    ..field
                }
            })
            .collect()
    }

    fn rename_input_values(&self, values: &[InputValueDefinition]) -> Arc<[InputValueDefinition]> {
        values
            .iter()
            .map(|value| InputValueDefinition {
                ty: self.rename_type(&value.ty),
                ..value.clone()
            })
            .collect()
    }

    /// Drop suppressed types from a list of type references, and rename the others.
    fn rename_named_types(&self, named_types: &[NamedType]) -> Arc<[NamedType]> {
        named_types
            .iter()
            .filter(|named| !self.suppressions.is_type_suppressed(&named.name))
            .map(|named| self.rename_named_type(named))
            .collect()
    }

    fn rename_named_type(&self, named: &NamedType) -> NamedType {
        let new_name = self.new_name(&named.name);

        if new_name == &*named.name {
            named.clone()
        } else {
            named.renamed(new_name)
        }
    }

    fn rename_type(&self, ty: &Type) -> Type {
        if self.new_name(&ty.named_type().name) == &*ty.named_type().name {
            return ty.clone();
        }

        match ty {
            Type::Named(named) => Type::Named(self.rename_named_type(named)),
            Type::List(inner) => Type::List(Arc::new(self.rename_type(inner))),
            Type::NonNull(inner) => Type::NonNull(Arc::new(self.rename_type(inner))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_schema, CascadeViolation};

    const SCHEMA: &str = r#"
        directive @output(out_name: String!) on FIELD

        type Query {
            Person: [Person]
            Dog: [Dog]
            Cat: [Cat]
            Pet: [Pet]
        }

        interface Named {
            name: String
        }

        type Person implements Named {
            name: String
            dogs: [Dog!]!
            cat: Cat
            pets(kind: Kind): [Pet]
        }

        type Dog implements Named {
            name: String
            kind: Kind
        }

        type Cat implements Named {
            name: String
        }

        enum Kind {
            DOG
            CAT
        }

        union Pet = Dog | Cat
    "#;

    fn document() -> Document {
        parse_schema(SCHEMA).unwrap()
    }

    fn type_names(document: &Document) -> Vec<&str> {
        document.type_definitions().map(TypeDefinition::name).collect()
    }

    #[test]
    fn renames_definitions_and_references() {
        let document = document();
        let plan = RenamingPlan::new()
            .with_type_renamed("Dog", "Canine")
            .with_type_renamed("Kind", "Species");

        let renamed = rename_schema(&document, &plan, &TransformConfig::default()).unwrap();

        assert_eq!(
            type_names(&renamed.document),
            ["Query", "Named", "Person", "Canine", "Cat", "Species", "Pet"]
        );
        assert_eq!(
            renamed.reverse_name_map,
            BTreeMap::from([
                (String::from("Canine"), String::from("Dog")),
                (String::from("Species"), String::from("Kind")),
            ])
        );

        let schema = check_schema_is_valid(&renamed.document).unwrap();

        let query = schema.query_type().unwrap();
        assert!(query.field("Dog").is_none());
        assert_eq!(query.field("Canine").unwrap().ty.to_string(), "[Canine]");

        let person = schema.type_definition("Person").unwrap();
        assert_eq!(person.field("dogs").unwrap().ty.to_string(), "[Canine!]!");
        assert_eq!(person.field("pets").unwrap().arguments[0].ty.to_string(), "Species");

        let Some(TypeDefinition::Union(pet)) = schema.type_definition("Pet") else {
            panic!("Pet is a union");
        };
        assert_eq!(&*pet.members[0].name, "Canine");

        // The input is untouched.
        assert_eq!(type_names(&document)[3], "Dog");
        assert_eq!(document, parse_schema(SCHEMA).unwrap());
    }

    #[test]
    fn unchanged_definitions_are_shared() {
        let document = document();
        let plan = RenamingPlan::new().with_type_renamed("Dog", "Canine");

        let renamed = rename_schema(&document, &plan, &TransformConfig::default()).unwrap();

        let (Some(TypeDefinition::Object(before)), Some(TypeDefinition::Object(after))) =
            (document.type_definition("Cat"), renamed.document.type_definition("Cat"))
        else {
            panic!("Cat is an object type");
        };
        assert!(Arc::ptr_eq(&before.fields[0].directives, &after.fields[0].directives));
        assert!(Arc::ptr_eq(&before.directives, &after.directives));
    }

    #[test]
    fn suppressions_remove_types_and_references() {
        let plan = RenamingPlan::new()
            .with_type_suppressed("Cat")
            .with_field_suppressed("Person", "cat");

        let renamed = rename_schema(&document(), &plan, &TransformConfig::default()).unwrap();
        let schema = check_schema_is_valid(&renamed.document).unwrap();

        assert_eq!(
            type_names(&renamed.document),
            ["Query", "Named", "Person", "Dog", "Kind", "Pet"]
        );
        assert!(schema.query_type().unwrap().field("Cat").is_none());
        assert!(schema.type_definition("Person").unwrap().field("cat").is_none());

        let Some(TypeDefinition::Union(pet)) = schema.type_definition("Pet") else {
            panic!("Pet is a union");
        };
        assert_eq!(pet.members.len(), 1);
        assert!(renamed.reverse_name_map.is_empty());
    }

    #[test]
    fn suppressed_argument_types_are_caught_before_building() {
        let document = document();
        let plan = RenamingPlan::new()
            .with_type_suppressed("Kind")
            .with_field_suppressed("Dog", "kind");

        let err = rename_schema(&document, &plan, &TransformConfig::default()).unwrap_err();
        let SchemaTransformError::CascadingSuppression(violations) = &err else {
            panic!("expected a cascading suppression, got {err:?}");
        };
        assert_eq!(
            violations,
            &[CascadeViolation::DanglingFieldArgument {
                type_name: String::from("Person"),
                field_name: String::from("pets"),
                argument_name: String::from("kind"),
                referenced_type: String::from("Kind"),
            }]
        );

        let plan = plan.with_field_suppressed("Person", "pets");
        let renamed = rename_schema(&document, &plan, &TransformConfig::default()).unwrap();
        let schema = check_schema_is_valid(&renamed.document).unwrap();

        assert_eq!(
            type_names(&renamed.document),
            ["Query", "Named", "Person", "Dog", "Cat", "Pet"]
        );
        assert!(schema.type_definition("Person").unwrap().field("pets").is_none());
    }

    #[test]
    fn suppressed_directive_argument_types_are_caught_before_building() {
        let document = parse_schema(
            r#"
            directive @filter(kind: Kind) on FIELD
            type Query { Dog: Dog }
            type Dog { name: String }
            enum Kind { DOG, CAT }
            "#,
        )
        .unwrap();

        let err = rename_schema(&document, &RenamingPlan::new().with_type_suppressed("Kind"), &TransformConfig::default())
            .unwrap_err();

        insta::assert_snapshot!(err, @r"
        Applying the suppressions would leave the schema in an illegal state. Suppressing the following types and fields may require further suppressions of their own:
        - Argument kind of directive @filter is of type Kind, which is suppressed. Directives cannot be suppressed, so stop suppressing Kind.
        ");
    }

    #[test]
    fn renamed_query_type_gets_a_schema_definition() {
        let document = parse_schema("type Query { Animal: Animal } type Animal { name: String }").unwrap();
        let plan = RenamingPlan::new().with_type_renamed("Query", "RootSchemaQuery");

        let renamed = rename_schema(&document, &plan, &TransformConfig::default()).unwrap();
        let schema = check_schema_is_valid(&renamed.document).unwrap();

        assert_eq!(schema.query_type_name(), "RootSchemaQuery");
    }

    #[test]
    fn nothing_is_built_when_a_check_fails() {
        let config = TransformConfig::default();

        let conflict = RenamingPlan::new()
            .with_type_renamed("Dog", "Pet")
            .with_type_renamed("Cat", "Pet");
        assert!(matches!(
            rename_schema(&document(), &conflict, &config),
            Err(SchemaTransformError::SchemaRenameNameConflict(_))
        ));

        let cascade = RenamingPlan::new().with_type_suppressed("Cat");
        assert!(matches!(
            rename_schema(&document(), &cascade, &config),
            Err(SchemaTransformError::CascadingSuppression(_))
        ));

        let invalid_name = RenamingPlan::new().with_type_renamed("Dog", "__Dog");
        assert!(matches!(
            rename_schema(&document(), &invalid_name, &config),
            Err(SchemaTransformError::InvalidTypeName { name }) if name == "__Dog"
        ));
    }

    #[test]
    fn scalars_and_the_query_type_are_protected() {
        let document = parse_schema("scalar Date type Query { Animal: Animal } type Animal { birthday: Date }").unwrap();
        let config = TransformConfig::default();

        let err = rename_schema(&document, &RenamingPlan::new().with_type_renamed("Date", "Day"), &config).unwrap_err();
        insta::assert_snapshot!(err, @r#"Type "Date" is a scalar. Scalars cannot be renamed or suppressed."#);

        let err = rename_schema(&document, &RenamingPlan::new().with_type_suppressed("Query"), &config).unwrap_err();
        insta::assert_snapshot!(err, @r#"The query type "Query" cannot be suppressed. Suppress the types it queries instead."#);
    }

    #[test]
    fn unknown_entries_are_ignored() {
        let plan = RenamingPlan::new()
            .with_type_renamed("Bird", "Avian")
            .with_field_suppressed("Person", "age")
            .with_field_suppressed("Plant", "name");

        let renamed = rename_schema(&document(), &plan, &TransformConfig::default()).unwrap();

        assert_eq!(renamed.document, document());
        assert!(renamed.reverse_name_map.is_empty());
    }
}
