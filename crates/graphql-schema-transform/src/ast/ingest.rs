//! Conversion from the parser's documents into our [Document].
//!
//! This is a separate module so the rest of the crate never sees `async_graphql_parser` types.

use super::*;
use crate::SchemaTransformError;
use async_graphql_parser::{types as parser, Positioned};
use async_graphql_value::{ConstValue, Value as ParserValue};

/// Parse a schema (type system) document.
pub fn parse_schema(sdl: &str) -> Result<Document, SchemaTransformError> {
    let document = async_graphql_parser::parse_schema(sdl)
        .map_err(|err| SchemaTransformError::SchemaStructure(format!("Schema could not be parsed: {err}")))?;

    Ok(Document::from(&document))
}

/// Parse an executable document.
pub fn parse_query(query: &str) -> Result<Document, SchemaTransformError> {
    let document = async_graphql_parser::parse_query(query)
        .map_err(|err| SchemaTransformError::GraphQLValidation(format!("Query could not be parsed: {err}")))?;

    Ok(Document::from(&document))
}

impl From<&parser::ServiceDocument> for Document {
    fn from(document: &parser::ServiceDocument) -> Self {
        document
            .definitions
            .iter()
            .map(|definition| match definition {
                parser::TypeSystemDefinition::Schema(schema) if schema.node.extend => {
                    Definition::TypeExtension(TypeExtension {
                        extended: Arc::new(ExtendedDefinition::Schema(ingest_schema_definition(&schema.node))),
                    })
                }
                parser::TypeSystemDefinition::Schema(schema) => {
                    Definition::Schema(ingest_schema_definition(&schema.node))
                }
                parser::TypeSystemDefinition::Type(ty) if ty.node.extend => Definition::TypeExtension(TypeExtension {
                    extended: Arc::new(ExtendedDefinition::Type(ingest_type_definition(&ty.node))),
                }),
                parser::TypeSystemDefinition::Type(ty) => Definition::Type(ingest_type_definition(&ty.node)),
                parser::TypeSystemDefinition::Directive(directive) => {
                    Definition::Directive(ingest_directive_definition(&directive.node))
                }
            })
            .collect()
    }
}

impl From<&parser::ExecutableDocument> for Document {
    fn from(document: &parser::ExecutableDocument) -> Self {
        let mut operations: Vec<_> = document.operations.iter().collect();
        operations.sort_by_key(|(name, _)| name.map(|name| name.to_string()));

        let mut fragments: Vec<_> = document.fragments.iter().collect();
        fragments.sort_by_key(|(name, _)| name.to_string());

        let operations = operations
            .into_iter()
            .map(|(name, operation)| Definition::Operation(ingest_operation(name, &operation.node)));

        let fragments = fragments.into_iter().map(|(name, fragment)| {
            Definition::Fragment(FragmentDefinition {
                name: ingest_name(name),
                type_condition: NamedType {
                    name: ingest_name(&fragment.node.type_condition.node.on.node),
                },
                directives: ingest_directives(&fragment.node.directives),
                selection_set: ingest_selection_set(&fragment.node.selection_set.node),
            })
        });

        operations.chain(fragments).collect()
    }
}

fn ingest_name(name: &async_graphql_value::Name) -> Name {
    Arc::from(name.as_str())
}

fn ingest_description(description: &Option<Positioned<String>>) -> Option<Arc<str>> {
    description.as_ref().map(|description| Arc::from(description.node.as_str()))
}

fn ingest_named_types(names: &[Positioned<async_graphql_value::Name>]) -> Arc<[NamedType]> {
    names
        .iter()
        .map(|name| NamedType {
            name: ingest_name(&name.node),
        })
        .collect()
}

fn ingest_schema_definition(definition: &parser::SchemaDefinition) -> SchemaDefinition {
    let root = |name: &Option<Positioned<async_graphql_value::Name>>| {
        name.as_ref().map(|name| NamedType {
            name: ingest_name(&name.node),
        })
    };

    SchemaDefinition {
        directives: ingest_const_directives(&definition.directives),
        query: root(&definition.query),
        mutation: root(&definition.mutation),
        subscription: root(&definition.subscription),
    }
}

fn ingest_type_definition(definition: &parser::TypeDefinition) -> TypeDefinition {
    let description = ingest_description(&definition.description);
    let name = ingest_name(&definition.name.node);
    let directives = ingest_const_directives(&definition.directives);

    match &definition.kind {
        parser::TypeKind::Scalar => TypeDefinition::Scalar(ScalarTypeDefinition {
            description,
            name,
            directives,
        }),
        parser::TypeKind::Object(object) => TypeDefinition::Object(ObjectTypeDefinition {
            description,
            name,
            interfaces: ingest_named_types(&object.implements),
            directives,
            fields: object.fields.iter().map(|field| ingest_field_definition(&field.node)).collect(),
        }),
        parser::TypeKind::Interface(interface) => TypeDefinition::Interface(InterfaceTypeDefinition {
            description,
            name,
            interfaces: ingest_named_types(&interface.implements),
            directives,
            fields: interface
                .fields
                .iter()
                .map(|field| ingest_field_definition(&field.node))
                .collect(),
        }),
        parser::TypeKind::Union(union) => TypeDefinition::Union(UnionTypeDefinition {
            description,
            name,
            directives,
            members: ingest_named_types(&union.members),
        }),
        parser::TypeKind::Enum(enum_type) => TypeDefinition::Enum(EnumTypeDefinition {
            description,
            name,
            directives,
            values: enum_type
                .values
                .iter()
                .map(|value| EnumValueDefinition {
                    description: ingest_description(&value.node.description),
                    name: ingest_name(&value.node.value.node),
                    directives: ingest_const_directives(&value.node.directives),
                })
                .collect(),
        }),
        parser::TypeKind::InputObject(input_object) => TypeDefinition::InputObject(InputObjectTypeDefinition {
            description,
            name,
            directives,
            fields: input_object
                .fields
                .iter()
                .map(|field| ingest_input_value_definition(&field.node))
                .collect(),
        }),
    }
}

fn ingest_field_definition(field: &parser::FieldDefinition) -> FieldDefinition {
    FieldDefinition {
        description: ingest_description(&field.description),
        name: ingest_name(&field.name.node),
        arguments: field
            .arguments
            .iter()
            .map(|argument| ingest_input_value_definition(&argument.node))
            .collect(),
        ty: ingest_type(&field.ty.node),
        directives: ingest_const_directives(&field.directives),
    }
}

fn ingest_input_value_definition(definition: &parser::InputValueDefinition) -> InputValueDefinition {
    InputValueDefinition {
        description: ingest_description(&definition.description),
        name: ingest_name(&definition.name.node),
        ty: ingest_type(&definition.ty.node),
        default_value: definition
            .default_value
            .as_ref()
            .map(|value| ingest_const_value(&value.node)),
        directives: ingest_const_directives(&definition.directives),
    }
}

fn ingest_directive_definition(definition: &parser::DirectiveDefinition) -> DirectiveDefinition {
    DirectiveDefinition {
        description: ingest_description(&definition.description),
        name: ingest_name(&definition.name.node),
        arguments: definition
            .arguments
            .iter()
            .map(|argument| ingest_input_value_definition(&argument.node))
            .collect(),
        is_repeatable: definition.is_repeatable,
        locations: definition
            .locations
            .iter()
            .map(|location| directive_location_name(&location.node))
            .collect(),
    }
}

/// `FieldDefinition` -> `FIELD_DEFINITION`
fn directive_location_name(location: &parser::DirectiveLocation) -> Name {
    let camel_case = format!("{location:?}");
    let mut name = String::with_capacity(camel_case.len() + 4);

    for (idx, char) in camel_case.chars().enumerate() {
        if idx > 0 && char.is_ascii_uppercase() {
            name.push('_');
        }
        name.push(char.to_ascii_uppercase());
    }

    name.into()
}

fn ingest_type(ty: &parser::Type) -> Type {
    let base = match &ty.base {
        parser::BaseType::Named(name) => Type::Named(NamedType {
            name: ingest_name(name),
        }),
        parser::BaseType::List(inner) => Type::List(Arc::new(ingest_type(inner))),
    };

    if ty.nullable {
        base
    } else {
        Type::NonNull(Arc::new(base))
    }
}

fn ingest_const_directives(directives: &[Positioned<parser::ConstDirective>]) -> Arc<[Directive]> {
    directives
        .iter()
        .map(|directive| Directive {
            name: ingest_name(&directive.node.name.node),
            arguments: directive
                .node
                .arguments
                .iter()
                .map(|(name, value)| Argument {
                    name: ingest_name(&name.node),
                    value: ingest_const_value(&value.node),
                })
                .collect(),
        })
        .collect()
}

fn ingest_directives(directives: &[Positioned<parser::Directive>]) -> Arc<[Directive]> {
    directives
        .iter()
        .map(|directive| Directive {
            name: ingest_name(&directive.node.name.node),
            arguments: ingest_arguments(&directive.node.arguments),
        })
        .collect()
}

fn ingest_arguments(arguments: &[(Positioned<async_graphql_value::Name>, Positioned<ParserValue>)]) -> Arc<[Argument]> {
    arguments
        .iter()
        .map(|(name, value)| Argument {
            name: ingest_name(&name.node),
            value: ingest_value(&value.node),
        })
        .collect()
}

fn ingest_number(number: &async_graphql_value::Number) -> Value {
    if number.is_f64() {
        Value::Float(number.to_string().into())
    } else {
        Value::Int(number.to_string().into())
    }
}

fn ingest_const_value(value: &ConstValue) -> Value {
    match value {
        ConstValue::Null => Value::Null,
        ConstValue::Number(number) => ingest_number(number),
        ConstValue::String(string) => Value::String(string.as_str().into()),
        ConstValue::Boolean(boolean) => Value::Boolean(*boolean),
        ConstValue::Binary(bytes) => Value::String(String::from_utf8_lossy(bytes).as_ref().into()),
        ConstValue::Enum(name) => Value::Enum(ingest_name(name)),
        ConstValue::List(values) => Value::List(values.iter().map(ingest_const_value).collect()),
        ConstValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| ObjectField {
                    name: ingest_name(name),
                    value: ingest_const_value(value),
                })
                .collect(),
        ),
    }
}

fn ingest_value(value: &ParserValue) -> Value {
    match value {
        ParserValue::Variable(name) => Value::Variable(Variable {
            name: ingest_name(name),
        }),
        ParserValue::Null => Value::Null,
        ParserValue::Number(number) => ingest_number(number),
        ParserValue::String(string) => Value::String(string.as_str().into()),
        ParserValue::Boolean(boolean) => Value::Boolean(*boolean),
        ParserValue::Binary(bytes) => Value::String(String::from_utf8_lossy(bytes).as_ref().into()),
        ParserValue::Enum(name) => Value::Enum(ingest_name(name)),
        ParserValue::List(values) => Value::List(values.iter().map(ingest_value).collect()),
        ParserValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| ObjectField {
                    name: ingest_name(name),
                    value: ingest_value(value),
                })
                .collect(),
        ),
    }
}

fn ingest_operation(name: Option<&async_graphql_value::Name>, operation: &parser::OperationDefinition) -> OperationDefinition {
    OperationDefinition {
        ty: match operation.ty {
            parser::OperationType::Query => OperationType::Query,
            parser::OperationType::Mutation => OperationType::Mutation,
            parser::OperationType::Subscription => OperationType::Subscription,
        },
        name: name.map(ingest_name),
        variable_definitions: operation
            .variable_definitions
            .iter()
            .map(|definition| VariableDefinition {
                variable: Variable {
                    name: ingest_name(&definition.node.name.node),
                },
                ty: ingest_type(&definition.node.var_type.node),
                default_value: definition
                    .node
                    .default_value
                    .as_ref()
                    .map(|value| ingest_const_value(&value.node)),
                directives: ingest_directives(&definition.node.directives),
            })
            .collect(),
        directives: ingest_directives(&operation.directives),
        selection_set: ingest_selection_set(&operation.selection_set.node),
    }
}

fn ingest_selection_set(selection_set: &parser::SelectionSet) -> SelectionSet {
    SelectionSet {
        selections: selection_set
            .items
            .iter()
            .map(|selection| ingest_selection(&selection.node))
            .collect(),
    }
}

fn ingest_selection(selection: &parser::Selection) -> Selection {
    match selection {
        parser::Selection::Field(field) => Selection::Field(Field {
            alias: field.node.alias.as_ref().map(|alias| ingest_name(&alias.node)),
            name: ingest_name(&field.node.name.node),
            arguments: ingest_arguments(&field.node.arguments),
            directives: ingest_directives(&field.node.directives),
            selection_set: ingest_selection_set(&field.node.selection_set.node),
        }),
        parser::Selection::FragmentSpread(spread) => Selection::FragmentSpread(FragmentSpread {
            name: ingest_name(&spread.node.fragment_name.node),
            directives: ingest_directives(&spread.node.directives),
        }),
        parser::Selection::InlineFragment(fragment) => Selection::InlineFragment(InlineFragment {
            type_condition: fragment.node.type_condition.as_ref().map(|condition| NamedType {
                name: ingest_name(&condition.node.on.node),
            }),
            directives: ingest_directives(&fragment.node.directives),
            selection_set: ingest_selection_set(&fragment.node.selection_set.node),
        }),
    }
}
