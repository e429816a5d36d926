//! Checks that a query can be split across backends.
//!
//! The splitter walks each selection scope once, resolving property fields in the current backend
//! and following vertex fields, which may cross into another backend. That only works when every
//! scope lists its property fields first and inline fragments stand alone.

use crate::{
    ast::{
        visit::{visit, Visitor},
        Argument, Directive, Document, Field, FragmentDefinition, InlineFragment, InputValueDefinition, NodeRef,
        OperationType, Selection, SelectionSet, Type, TypeDefinition, Value,
    },
    Schema, SchemaTransformError, TransformConfig,
};
use itertools::Itertools;
use std::collections::{BTreeSet, HashMap};

/// A field without subselections.
pub fn is_property_field(field: &Field) -> bool {
    field.selection_set.is_empty()
}

/// The inline fragment that is the sole selection of a scope, if there is one.
///
/// Fails when an inline fragment shares its scope with other selections.
pub fn try_get_inline_fragment(selections: &[Selection]) -> Result<Option<&InlineFragment>, SchemaTransformError> {
    let mut inline_fragments = selections.iter().filter_map(|selection| match selection {
        Selection::InlineFragment(fragment) => Some(fragment),
        _ => None,
    });

    let Some(inline_fragment) = inline_fragments.next() else {
        return Ok(None);
    };

    if inline_fragments.next().is_some() {
        return Err(SchemaTransformError::validation(format!(
            "The selections {} contain multiple inline fragments, which is not allowed.",
            describe_selections(selections)
        )));
    }

    if selections.len() > 1 {
        return Err(SchemaTransformError::validation(format!(
            "The selections {} contain both inline fragments and fields, which may not coexist in one selection.",
            describe_selections(selections)
        )));
    }

    Ok(Some(inline_fragment))
}

/// Check that the query is a single query operation that is valid against the schema: every field
/// exists on its parent type, every argument is known and every required one provided, composite
/// fields have subselections and leaf fields don't, fragments condition on composite types that
/// can overlap with the type they are used on, fragment spreads refer to defined fragments and
/// every variable is defined by the operation.
///
/// Directives the schema doesn't define are left to the split checks.
pub fn validate_query_against_schema(schema: &Schema, query: &Document) -> Result<(), SchemaTransformError> {
    let operations: Vec<_> = query.operations().collect();
    let [operation] = operations[..] else {
        return Err(SchemaTransformError::validation(format!(
            "The query must contain exactly one operation, found {}.",
            operations.len()
        )));
    };

    if operation.ty != OperationType::Query {
        return Err(SchemaTransformError::validation(format!(
            "Only query operations are supported, found a {} operation.",
            operation.ty
        )));
    }

    let Some(query_type) = schema.query_type() else {
        return Err(SchemaTransformError::validation(format!(
            "The schema's query type \"{}\" is not defined.",
            schema.query_type_name()
        )));
    };

    let mut validator = QueryValidator {
        schema,
        operation_name: operation.name.as_deref(),
        variables: operation
            .variable_definitions
            .iter()
            .map(|definition| &*definition.variable.name)
            .collect(),
        fragments: query.fragments().map(|fragment| (&*fragment.name, fragment)).collect(),
        used_fragments: BTreeSet::new(),
    };

    validator.validate_directives(&operation.directives)?;
    validator.validate_selection_set(query_type, &operation.selection_set)?;

    for fragment in query.fragments() {
        validator.validate_fragment_definition(fragment)?;
    }

    if let Some(unused) = query
        .fragments()
        .find(|fragment| !validator.used_fragments.contains(&*fragment.name))
    {
        return Err(SchemaTransformError::validation(format!(
            "Fragment \"{}\" is never used.",
            unused.name
        )));
    }

    Ok(())
}

struct QueryValidator<'a> {
    schema: &'a Schema,
    operation_name: Option<&'a str>,
    variables: BTreeSet<&'a str>,
    fragments: HashMap<&'a str, &'a FragmentDefinition>,
    used_fragments: BTreeSet<&'a str>,
}

impl<'a> QueryValidator<'a> {
    fn validate_fragment_definition(&mut self, fragment: &'a FragmentDefinition) -> Result<(), SchemaTransformError> {
        let parent = self.composite_type(&fragment.type_condition.name)?;
        self.validate_directives(&fragment.directives)?;
        self.validate_selection_set(parent, &fragment.selection_set)
    }

    fn validate_selection_set(
        &mut self,
        parent: &'a TypeDefinition,
        selection_set: &'a SelectionSet,
    ) -> Result<(), SchemaTransformError> {
        for selection in selection_set.selections.iter() {
            match selection {
                Selection::Field(field) => self.validate_field(parent, field)?,
                Selection::InlineFragment(fragment) => {
                    self.validate_directives(&fragment.directives)?;

                    let condition = match &fragment.type_condition {
                        Some(type_condition) => {
                            let condition = self.composite_type(&type_condition.name)?;
                            if !self.can_overlap(parent, condition) {
                                return Err(SchemaTransformError::validation(format!(
                                    "Fragment cannot be spread here as objects of type \"{}\" can never be of type \"{}\".",
                                    parent.name(),
                                    condition.name()
                                )));
                            }
                            condition
                        }
                        None => parent,
                    };

                    self.validate_selection_set(condition, &fragment.selection_set)?;
                }
                Selection::FragmentSpread(spread) => {
                    self.validate_directives(&spread.directives)?;

                    let Some(fragment) = self.fragments.get(&*spread.name) else {
                        return Err(SchemaTransformError::validation(format!(
                            "Unknown fragment \"{}\".",
                            spread.name
                        )));
                    };

                    let condition = self.composite_type(&fragment.type_condition.name)?;
                    if !self.can_overlap(parent, condition) {
                        return Err(SchemaTransformError::validation(format!(
                            "Fragment \"{}\" cannot be spread here as objects of type \"{}\" can never be of type \"{}\".",
                            spread.name,
                            parent.name(),
                            condition.name()
                        )));
                    }

                    self.used_fragments.insert(&spread.name);
                }
            }
        }

        Ok(())
    }

    fn validate_field(&mut self, parent: &'a TypeDefinition, field: &'a Field) -> Result<(), SchemaTransformError> {
        self.validate_directives(&field.directives)?;

        if &*field.name == "__typename" {
            if !is_property_field(field) {
                return Err(SchemaTransformError::validation(
                    "Field \"__typename\" must not have a selection since type \"String\" has no subfields.",
                ));
            }
            return Ok(());
        }

        let Some(definition) = parent.field(&field.name) else {
            return Err(SchemaTransformError::validation(format!(
                "Cannot query field \"{}\" on type \"{}\".",
                field.name,
                parent.name()
            )));
        };

        if let Some(argument) = unknown_argument(&definition.arguments, &field.arguments) {
            return Err(SchemaTransformError::validation(format!(
                "Unknown argument \"{}\" on field \"{}.{}\".",
                argument.name,
                parent.name(),
                field.name
            )));
        }

        if let Some(required) = missing_argument(&definition.arguments, &field.arguments) {
            return Err(SchemaTransformError::validation(format!(
                "Field \"{}.{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                parent.name(),
                field.name,
                required.name,
                required.ty
            )));
        }

        self.validate_arguments(&field.arguments)?;

        let field_type = &definition.ty.named_type().name;

        match self.schema.type_definition(field_type) {
            Some(ty) if ty.is_composite() => {
                if is_property_field(field) {
                    return Err(SchemaTransformError::validation(format!(
                        "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                        field.name, definition.ty
                    )));
                }
                self.validate_selection_set(ty, &field.selection_set)
            }
            _ if self.schema.is_defined(field_type) => {
                if !is_property_field(field) {
                    return Err(SchemaTransformError::validation(format!(
                        "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                        field.name, definition.ty
                    )));
                }
                Ok(())
            }
            _ => Err(SchemaTransformError::validation(format!(
                "Unknown type \"{field_type}\"."
            ))),
        }
    }

    fn validate_directives(&self, directives: &[Directive]) -> Result<(), SchemaTransformError> {
        for directive in directives {
            if let Some(definition) = self.schema.directive_definition(&directive.name) {
                if let Some(argument) = unknown_argument(&definition.arguments, &directive.arguments) {
                    return Err(SchemaTransformError::validation(format!(
                        "Unknown argument \"{}\" on directive \"@{}\".",
                        argument.name, directive.name
                    )));
                }

                if let Some(required) = missing_argument(&definition.arguments, &directive.arguments) {
                    return Err(SchemaTransformError::validation(format!(
                        "Directive \"@{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                        directive.name, required.name, required.ty
                    )));
                }
            }

            self.validate_arguments(&directive.arguments)?;
        }

        Ok(())
    }

    fn validate_arguments(&self, arguments: &[Argument]) -> Result<(), SchemaTransformError> {
        arguments
            .iter()
            .try_for_each(|argument| self.validate_variables(&argument.value))
    }

    fn validate_variables(&self, value: &Value) -> Result<(), SchemaTransformError> {
        match value {
            Value::Variable(variable) if !self.variables.contains(&*variable.name) => {
                let message = match self.operation_name {
                    Some(operation) => format!(
                        "Variable \"${}\" is not defined by operation \"{operation}\".",
                        variable.name
                    ),
                    None => format!("Variable \"${}\" is not defined.", variable.name),
                };
                Err(SchemaTransformError::validation(message))
            }
            Value::List(values) => values.iter().try_for_each(|value| self.validate_variables(value)),
            Value::Object(fields) => fields
                .iter()
                .try_for_each(|field| self.validate_variables(&field.value)),
            _ => Ok(()),
        }
    }

    fn composite_type(&self, name: &str) -> Result<&'a TypeDefinition, SchemaTransformError> {
        match self.schema.type_definition(name) {
            Some(ty) if ty.is_composite() => Ok(ty),
            Some(_) => Err(SchemaTransformError::validation(format!(
                "Fragment cannot condition on non composite type \"{name}\"."
            ))),
            None => Err(SchemaTransformError::validation(format!("Unknown type \"{name}\"."))),
        }
    }

    /// Whether some object type is a possible type of both.
    fn can_overlap(&self, parent: &TypeDefinition, condition: &TypeDefinition) -> bool {
        !self
            .schema
            .possible_types(parent.name())
            .is_disjoint(&self.schema.possible_types(condition.name()))
    }
}

fn unknown_argument<'q>(definitions: &[InputValueDefinition], arguments: &'q [Argument]) -> Option<&'q Argument> {
    arguments
        .iter()
        .find(|argument| !definitions.iter().any(|definition| definition.name == argument.name))
}

/// A non-null argument without a default value that is not provided.
fn missing_argument<'d>(definitions: &'d [InputValueDefinition], arguments: &[Argument]) -> Option<&'d InputValueDefinition> {
    definitions.iter().find(|definition| {
        matches!(definition.ty, Type::NonNull(_))
            && definition.default_value.is_none()
            && !arguments.iter().any(|argument| argument.name == definition.name)
    })
}

struct SplitValidator<'c> {
    config: &'c TransformConfig,
}

impl<'a> Visitor<'a> for SplitValidator<'_> {
    type Error = SchemaTransformError;

    fn enter(&mut self, node: NodeRef<'a>) -> Result<(), SchemaTransformError> {
        match node {
            NodeRef::Directive(directive) if !self.config.is_split_directive(&directive.name) => {
                Err(SchemaTransformError::validation(format!(
                    "Directive \"{}\" is not yet supported, only {} are currently supported.",
                    directive.name,
                    self.config
                        .split_directives
                        .iter()
                        .map(|name| format!("\"{name}\""))
                        .join(", ")
                )))
            }
            NodeRef::SelectionSet(selection_set) => check_scope(&selection_set.selections),
            _ => Ok(()),
        }
    }
}

fn check_scope(selections: &[Selection]) -> Result<(), SchemaTransformError> {
    if let Some(spread) = selections.iter().find_map(|selection| match selection {
        Selection::FragmentSpread(spread) => Some(spread),
        _ => None,
    }) {
        return Err(SchemaTransformError::validation(format!(
            "Fragments (not to be confused with inline fragments) are not supported. However, the \
             selections {} contain a spread of the fragment {}.",
            describe_selections(selections),
            spread.name
        )));
    }

    if try_get_inline_fragment(selections)?.is_some() {
        return Ok(());
    }

    let mut seen_vertex_field = false;

    for field in selections.iter().filter_map(|selection| match selection {
        Selection::Field(field) => Some(field),
        _ => None,
    }) {
        if !is_property_field(field) {
            seen_vertex_field = true;
        } else if seen_vertex_field {
            return Err(SchemaTransformError::validation(format!(
                "In the selections {}, the property field {} occurs after a vertex field or a type \
                 coercion statement, which is not allowed, as all property fields must appear before \
                 all vertex fields.",
                describe_selections(selections),
                field.name
            )));
        }
    }

    Ok(())
}

fn describe_selections(selections: &[Selection]) -> String {
    let selections = selections.iter().map(|selection| match selection {
        Selection::Field(field) => field.alias.as_ref().unwrap_or(&field.name).to_string(),
        Selection::FragmentSpread(spread) => format!("...{}", spread.name),
        Selection::InlineFragment(fragment) => match &fragment.type_condition {
            Some(type_condition) => format!("... on {}", type_condition.name),
            None => String::from("..."),
        },
    });

    format!("[{}]", selections.format(", "))
}

/// Check that a query is valid against the schema and can be split across backends.
///
/// After [validate_query_against_schema], every directive must be one of
/// [TransformConfig::split_directives] and every selection scope must either be a single inline
/// fragment, or contain no fragments and list its property fields before its vertex fields.
pub fn check_query_is_valid_to_split(
    schema: &Schema,
    query: &Document,
    config: &TransformConfig,
) -> Result<(), SchemaTransformError> {
    tracing::debug!("checking query can be split");

    validate_query_against_schema(schema, query)?;
    visit(&mut SplitValidator { config }, query)?;

    tracing::debug!("query can be split");

    Ok(())
}
