//! Preconditions of merging several schemas into one.
//!
//! Assembling the merged schema is up to the caller. This module checks that the schemas can be
//! merged: their identifiers are usable, each one is valid on its own, they don't define the same
//! type twice, and the cross-schema edges joining them are well formed.

use crate::{
    ast::{Document, TypeDefinition},
    check_schema_identifier, check_schema_is_valid, names, MergeNameConflict, Schema, SchemaTransformError,
    TransformConfig,
};
use indexmap::IndexMap;
use std::collections::{hash_map::Entry, BTreeSet, HashMap};

/// A field of a type in one of the merged schemas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FieldReference {
    pub schema_id: String,
    pub type_name: String,
    pub field_name: String,
}

/// An edge joining a type of one schema to a type of another, where the values of two scalar
/// fields are equal.
///
/// Merging adds `out_<edge_name>` to the outbound type and, unless `out_edge_only` is set,
/// `in_<edge_name>` to the inbound type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CrossSchemaEdgeDescriptor {
    pub edge_name: String,
    pub outbound: FieldReference,
    pub inbound: FieldReference,
    #[serde(default)]
    pub out_edge_only: bool,
}

impl CrossSchemaEdgeDescriptor {
    pub fn out_field_name(&self) -> String {
        format!("out_{}", self.edge_name)
    }

    pub fn in_field_name(&self) -> String {
        format!("in_{}", self.edge_name)
    }
}

/// Schemas and edges that passed [check_merge_inputs].
#[derive(Debug, Clone)]
pub struct MergeInputs {
    schemas: IndexMap<String, Schema>,
    edges: Vec<CrossSchemaEdgeDescriptor>,
}

impl MergeInputs {
    /// The schemas by identifier, in the order they were given.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(id, schema)| (id.as_str(), schema))
    }

    pub fn schema(&self, schema_id: &str) -> Option<&Schema> {
        self.schemas.get(schema_id)
    }

    pub fn edges(&self) -> &[CrossSchemaEdgeDescriptor] {
        &self.edges
    }
}

/// Check that the schemas can be merged and joined by the edges.
///
/// Every query root type is merged into one, and scalars defined by several schemas are the same
/// scalar. Any other type defined by two schemas is a [MergeNameConflict::Type].
pub fn check_merge_inputs(
    schemas: &IndexMap<String, Document>,
    edges: &[CrossSchemaEdgeDescriptor],
    config: &TransformConfig,
) -> Result<MergeInputs, SchemaTransformError> {
    tracing::debug!(schemas = schemas.len(), edges = edges.len(), "checking merge inputs");

    let mut built = IndexMap::with_capacity(schemas.len());

    for (schema_id, document) in schemas {
        check_schema_identifier(schema_id)?;
        built.insert(schema_id.clone(), check_schema_is_valid(document)?);
    }

    check_type_conflicts(&built, config)?;

    let mut edge_names = BTreeSet::new();
    for edge in edges {
        if !edge_names.insert(edge.edge_name.as_str()) {
            return Err(SchemaTransformError::InvalidCrossSchemaEdge(format!(
                "The cross-schema edge {} is defined more than once.",
                edge.edge_name
            )));
        }

        check_edge(&built, edge)?;
    }

    tracing::debug!("merge inputs are valid");

    Ok(MergeInputs {
        schemas: built,
        edges: edges.to_vec(),
    })
}

fn check_type_conflicts(schemas: &IndexMap<String, Schema>, config: &TransformConfig) -> Result<(), SchemaTransformError> {
    struct Seen<'a> {
        schema_id: &'a str,
        is_query_type: bool,
        is_scalar: bool,
    }

    let mut seen: HashMap<&str, Seen<'_>> = HashMap::new();

    for (schema_id, schema) in schemas {
        for definition in schema.type_definitions() {
            let type_name = definition.name();

            if config.is_builtin_scalar(type_name) && matches!(definition, TypeDefinition::Scalar(_)) {
                continue;
            }

            let current = Seen {
                schema_id,
                is_query_type: type_name == schema.query_type_name(),
                is_scalar: matches!(definition, TypeDefinition::Scalar(_)),
            };

            let previous = match seen.entry(type_name) {
                Entry::Vacant(entry) => {
                    entry.insert(current);
                    continue;
                }
                Entry::Occupied(entry) => entry.into_mut(),
            };

            let mergeable =
                (previous.is_query_type && current.is_query_type) || (previous.is_scalar && current.is_scalar);

            if !mergeable {
                return Err(SchemaTransformError::SchemaMergeNameConflict(MergeNameConflict::Type {
                    type_name: type_name.to_owned(),
                    first_schema: previous.schema_id.to_owned(),
                    second_schema: schema_id.clone(),
                }));
            }
        }
    }

    Ok(())
}

fn check_edge(schemas: &IndexMap<String, Schema>, edge: &CrossSchemaEdgeDescriptor) -> Result<(), SchemaTransformError> {
    let invalid = |reason: String| {
        SchemaTransformError::InvalidCrossSchemaEdge(format!(
            "The cross-schema edge {} is invalid: {reason}",
            edge.edge_name
        ))
    };

    if !names::is_legal_identifier(&edge.edge_name) {
        return Err(invalid(String::from(
            "edge names must consist of alphanumeric characters and underscores, and not start with a digit.",
        )));
    }

    if edge.outbound.schema_id == edge.inbound.schema_id {
        return Err(invalid(format!(
            "both of its endpoints are in schema {}, but cross-schema edges must join two different schemas.",
            edge.outbound.schema_id
        )));
    }

    let outbound_type = endpoint_type(schemas, &edge.outbound).map_err(invalid)?;
    let inbound_type = endpoint_type(schemas, &edge.inbound).map_err(invalid)?;

    if outbound_type != inbound_type {
        return Err(invalid(format!(
            "the outbound field {}.{} is of type {outbound_type}, but the inbound field {}.{} is of type {inbound_type}.",
            edge.outbound.type_name, edge.outbound.field_name, edge.inbound.type_name, edge.inbound.field_name
        )));
    }

    check_edge_field(schemas, &edge.outbound, &edge.out_field_name())?;

    if !edge.out_edge_only {
        check_edge_field(schemas, &edge.inbound, &edge.in_field_name())?;
    }

    Ok(())
}

/// The scalar type of the field an edge endpoint refers to.
fn endpoint_type<'a>(schemas: &'a IndexMap<String, Schema>, endpoint: &FieldReference) -> Result<&'a str, String> {
    let FieldReference {
        schema_id,
        type_name,
        field_name,
    } = endpoint;

    let Some(schema) = schemas.get(schema_id) else {
        return Err(format!("schema {schema_id} is not one of the merged schemas."));
    };

    if type_name == schema.query_type_name() {
        return Err(format!(
            "{type_name} is the query type of schema {schema_id}, which cannot be joined."
        ));
    }

    let definition = match schema.type_definition(type_name) {
        Some(definition @ (TypeDefinition::Object(_) | TypeDefinition::Interface(_))) => definition,
        Some(_) => {
            return Err(format!(
                "type {type_name} of schema {schema_id} is not an object or interface type."
            ))
        }
        None => return Err(format!("schema {schema_id} does not define the type {type_name}.")),
    };

    let Some(field) = definition.field(field_name) else {
        return Err(format!("type {type_name} of schema {schema_id} has no field {field_name}."));
    };

    let field_type = &*field.ty.named_type().name;

    match schema.type_definition(field_type) {
        Some(TypeDefinition::Scalar(_)) => Ok(field_type),
        None if names::is_builtin_scalar(field_type) => Ok(field_type),
        _ => Err(format!(
            "the field {type_name}.{field_name} of schema {schema_id} is of type {field_type}, but edges can only join scalar fields."
        )),
    }
}

fn check_edge_field(
    schemas: &IndexMap<String, Schema>,
    endpoint: &FieldReference,
    edge_field_name: &str,
) -> Result<(), SchemaTransformError> {
    let exists = schemas
        .get(&endpoint.schema_id)
        .and_then(|schema| schema.type_definition(&endpoint.type_name))
        .is_some_and(|definition| definition.field(edge_field_name).is_some());

    if exists {
        return Err(SchemaTransformError::SchemaMergeNameConflict(MergeNameConflict::EdgeField {
            schema: endpoint.schema_id.clone(),
            type_name: endpoint.type_name.clone(),
            field_name: edge_field_name.to_owned(),
        }));
    }

    Ok(())
}
