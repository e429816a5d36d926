use crate::{ast::NodeKind, CascadeViolation, ConflictReport};
use itertools::Itertools;
use std::fmt;

/// Why a schema or query cannot be transformed.
///
/// Every check in this crate is all-or-nothing: when one of these is returned, nothing was
/// transformed.
#[derive(Debug, thiserror::Error)]
pub enum SchemaTransformError {
    /// A schema identifier used in a merge is empty or contains characters other than
    /// alphanumerics and underscores.
    #[error("Schema identifier {identifier:?} is invalid: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },
    /// A type name is not a legal GraphQL name, or is reserved for introspection.
    #[error(
        "Name {name:?} is not a valid, unreserved GraphQL name. Valid, unreserved GraphQL names must \
         consist of only alphanumeric characters and underscores, must not start with a numeric \
         character, and must not start with double underscores."
    )]
    InvalidTypeName { name: String },
    /// The schema uses an unsupported construct, or breaks the rule that root query fields are
    /// named after the type they query.
    #[error("{0}")]
    SchemaStructure(String),
    /// Applying a renaming would give two types the same name, or a type the name of a built-in
    /// scalar.
    #[error("{0}")]
    SchemaRenameNameConflict(ConflictReport),
    /// Schemas being merged define the same name twice.
    #[error("{0}")]
    SchemaMergeNameConflict(MergeNameConflict),
    /// A suppression leaves something that still depends on a suppressed type or field.
    #[error("{}", render_cascade_violations(.0))]
    CascadingSuppression(Vec<CascadeViolation>),
    /// A cross-schema edge refers to schemas, types or fields that cannot be joined.
    #[error("{0}")]
    InvalidCrossSchemaEdge(String),
    /// A query is not valid against its schema, or uses something the query splitter does not
    /// support.
    #[error("{0}")]
    GraphQLValidation(String),
    /// [rename_node](crate::rename_node) was called on a node that has no renameable name.
    #[error("Nodes of kind {kind} cannot be renamed, only {} nodes can.", crate::rename::RENAMEABLE_KINDS.iter().join(", "))]
    UnsupportedNodeKind { kind: NodeKind },
}

impl SchemaTransformError {
    /// Wrap a conflict report.
    ///
    /// # Panics
    ///
    /// If the report is clean: there is no conflict to report.
    pub fn rename_name_conflict(report: ConflictReport) -> Self {
        assert!(
            !report.is_clean(),
            "Cannot report a renaming conflict without at least one conflict."
        );

        SchemaTransformError::SchemaRenameNameConflict(report)
    }

    pub fn structure(message: impl Into<String>) -> Self {
        SchemaTransformError::SchemaStructure(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        SchemaTransformError::GraphQLValidation(message.into())
    }
}

fn render_cascade_violations(violations: &[CascadeViolation]) -> String {
    let mut message = String::from(
        "Applying the suppressions would leave the schema in an illegal state. Suppressing the \
         following types and fields may require further suppressions of their own:",
    );

    for violation in violations {
        message.push_str("\n- ");
        message.push_str(&violation.to_string());
    }

    message
}

/// A name defined twice across the schemas taking part in a merge.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeNameConflict {
    /// Two schemas define a type with the same name.
    Type {
        type_name: String,
        first_schema: String,
        second_schema: String,
    },
    /// A cross-schema edge would add a field that already exists.
    EdgeField {
        schema: String,
        type_name: String,
        field_name: String,
    },
}

impl fmt::Display for MergeNameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeNameConflict::Type {
                type_name,
                first_schema,
                second_schema,
            } => write!(
                f,
                "Type {type_name} is defined in both schema {first_schema} and schema {second_schema}. \
                 Rename or suppress it in one of them before merging."
            ),
            MergeNameConflict::EdgeField {
                schema,
                type_name,
                field_name,
            } => write!(
                f,
                "The cross-schema edge field {type_name}.{field_name} conflicts with an existing field of \
                 {type_name} in schema {schema}. Choose a different edge name."
            ),
        }
    }
}
