//! Depth-first traversal of a [Document].
//!
//! There is exactly one traversal function, [visit]. It matches on every kind of node, so adding a
//! node kind without deciding how it is traversed is a compile error.

use super::*;

/// Hooks called on every node, in document order. An error stops the traversal.
pub trait Visitor<'a> {
    type Error;

    fn enter(&mut self, node: NodeRef<'a>) -> Result<(), Self::Error> {
        let _ = node;
        Ok(())
    }

    fn exit(&mut self, node: NodeRef<'a>) -> Result<(), Self::Error> {
        let _ = node;
        Ok(())
    }
}

/// Visit the whole document, starting with the [NodeRef::Document] node itself.
pub fn visit<'a, V: Visitor<'a>>(visitor: &mut V, document: &'a Document) -> Result<(), V::Error> {
    walk(visitor, NodeRef::Document(document))
}

fn walk<'a, V: Visitor<'a>>(v: &mut V, node: NodeRef<'a>) -> Result<(), V::Error> {
    v.enter(node)?;

    match node {
        NodeRef::Document(document) => {
            for definition in document.definitions.iter() {
                walk_definition(v, definition)?;
            }
        }
        NodeRef::SchemaDefinition(schema) => {
            walk_directives(v, &schema.directives)?;
            for root in [&schema.query, &schema.mutation, &schema.subscription]
                .into_iter()
                .flatten()
            {
                walk(v, NodeRef::NamedType(root))?;
            }
        }
        NodeRef::ScalarTypeDefinition(scalar) => walk_directives(v, &scalar.directives)?,
        NodeRef::ObjectTypeDefinition(object) => {
            for interface in object.interfaces.iter() {
                walk(v, NodeRef::NamedType(interface))?;
            }
            walk_directives(v, &object.directives)?;
            for field in object.fields.iter() {
                walk(v, NodeRef::FieldDefinition(field))?;
            }
        }
        NodeRef::InterfaceTypeDefinition(interface) => {
            for implemented in interface.interfaces.iter() {
                walk(v, NodeRef::NamedType(implemented))?;
            }
            walk_directives(v, &interface.directives)?;
            for field in interface.fields.iter() {
                walk(v, NodeRef::FieldDefinition(field))?;
            }
        }
        NodeRef::UnionTypeDefinition(union) => {
            walk_directives(v, &union.directives)?;
            for member in union.members.iter() {
                walk(v, NodeRef::NamedType(member))?;
            }
        }
        NodeRef::EnumTypeDefinition(enum_type) => {
            walk_directives(v, &enum_type.directives)?;
            for value in enum_type.values.iter() {
                walk(v, NodeRef::EnumValueDefinition(value))?;
            }
        }
        NodeRef::EnumValueDefinition(value) => walk_directives(v, &value.directives)?,
        NodeRef::InputObjectTypeDefinition(input_object) => {
            walk_directives(v, &input_object.directives)?;
            for field in input_object.fields.iter() {
                walk(v, NodeRef::InputValueDefinition(field))?;
            }
        }
        NodeRef::InputValueDefinition(definition) => {
            walk_type(v, &definition.ty)?;
            if let Some(default_value) = &definition.default_value {
                walk_value(v, default_value)?;
            }
            walk_directives(v, &definition.directives)?;
        }
        NodeRef::FieldDefinition(field) => {
            for argument in field.arguments.iter() {
                walk(v, NodeRef::InputValueDefinition(argument))?;
            }
            walk_type(v, &field.ty)?;
            walk_directives(v, &field.directives)?;
        }
        NodeRef::TypeExtension(extension) => match extension.extended.as_ref() {
            ExtendedDefinition::Schema(schema) => walk(v, NodeRef::SchemaDefinition(schema))?,
            ExtendedDefinition::Type(ty) => walk(v, ty.as_node())?,
        },
        NodeRef::DirectiveDefinition(directive) => {
            for argument in directive.arguments.iter() {
                walk(v, NodeRef::InputValueDefinition(argument))?;
            }
        }
        NodeRef::NamedType(_) => (),
        NodeRef::ListType(ty) | NodeRef::NonNullType(ty) => match ty {
            Type::List(inner) | Type::NonNull(inner) => walk_type(v, inner)?,
            Type::Named(named) => walk(v, NodeRef::NamedType(named))?,
        },
        NodeRef::Directive(directive) => {
            for argument in directive.arguments.iter() {
                walk(v, NodeRef::Argument(argument))?;
            }
        }
        NodeRef::Argument(argument) => walk_value(v, &argument.value)?,
        NodeRef::OperationDefinition(operation) => {
            for definition in operation.variable_definitions.iter() {
                walk(v, NodeRef::VariableDefinition(definition))?;
            }
            walk_directives(v, &operation.directives)?;
            walk(v, NodeRef::SelectionSet(&operation.selection_set))?;
        }
        NodeRef::VariableDefinition(definition) => {
            walk(v, NodeRef::Variable(&definition.variable))?;
            walk_type(v, &definition.ty)?;
            if let Some(default_value) = &definition.default_value {
                walk_value(v, default_value)?;
            }
            walk_directives(v, &definition.directives)?;
        }
        NodeRef::Variable(_) => (),
        NodeRef::SelectionSet(selection_set) => {
            for selection in selection_set.selections.iter() {
                walk(v, selection.as_node())?;
            }
        }
        NodeRef::Field(field) => {
            for argument in field.arguments.iter() {
                walk(v, NodeRef::Argument(argument))?;
            }
            walk_directives(v, &field.directives)?;
            walk(v, NodeRef::SelectionSet(&field.selection_set))?;
        }
        NodeRef::FragmentSpread(spread) => walk_directives(v, &spread.directives)?,
        NodeRef::InlineFragment(fragment) => {
            if let Some(type_condition) = &fragment.type_condition {
                walk(v, NodeRef::NamedType(type_condition))?;
            }
            walk_directives(v, &fragment.directives)?;
            walk(v, NodeRef::SelectionSet(&fragment.selection_set))?;
        }
        NodeRef::FragmentDefinition(fragment) => {
            walk(v, NodeRef::NamedType(&fragment.type_condition))?;
            walk_directives(v, &fragment.directives)?;
            walk(v, NodeRef::SelectionSet(&fragment.selection_set))?;
        }
        NodeRef::Value(value) => match value {
            Value::List(values) => {
                for value in values.iter() {
                    walk_value(v, value)?;
                }
            }
            Value::Object(fields) => {
                for field in fields.iter() {
                    walk(v, NodeRef::ObjectField(field))?;
                }
            }
            Value::Variable(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::String(_)
            | Value::Boolean(_)
            | Value::Null
            | Value::Enum(_) => (),
        },
        NodeRef::ObjectField(field) => walk_value(v, &field.value)?,
    }

    v.exit(node)
}

fn walk_definition<'a, V: Visitor<'a>>(v: &mut V, definition: &'a Definition) -> Result<(), V::Error> {
    let node = match definition {
        Definition::Schema(schema) => NodeRef::SchemaDefinition(schema),
        Definition::Type(ty) => ty.as_node(),
        Definition::TypeExtension(extension) => NodeRef::TypeExtension(extension),
        Definition::Directive(directive) => NodeRef::DirectiveDefinition(directive),
        Definition::Operation(operation) => NodeRef::OperationDefinition(operation),
        Definition::Fragment(fragment) => NodeRef::FragmentDefinition(fragment),
    };

    walk(v, node)
}

fn walk_type<'a, V: Visitor<'a>>(v: &mut V, ty: &'a Type) -> Result<(), V::Error> {
    match ty {
        Type::Named(named) => walk(v, NodeRef::NamedType(named)),
        Type::List(_) => walk(v, NodeRef::ListType(ty)),
        Type::NonNull(_) => walk(v, NodeRef::NonNullType(ty)),
    }
}

fn walk_value<'a, V: Visitor<'a>>(v: &mut V, value: &'a Value) -> Result<(), V::Error> {
    match value {
        Value::Variable(variable) => walk(v, NodeRef::Variable(variable)),
        _ => walk(v, NodeRef::Value(value)),
    }
}

fn walk_directives<'a, V: Visitor<'a>>(v: &mut V, directives: &'a [Directive]) -> Result<(), V::Error> {
    for directive in directives {
        walk(v, NodeRef::Directive(directive))?;
    }
    Ok(())
}
