//! Structural safety checks for GraphQL schema and query transformations.
//!
//! Renaming or suppressing schema types, merging several schemas and splitting a query across
//! backends all rely on a handful of global invariants: only a supported subset of GraphQL is
//! used, every name is legal, the root query type's fields are named after the types they query,
//! renamings don't collide and suppressions don't leave anything dangling. This crate checks those
//! invariants and provides the renaming primitive the transformations are built from.
//!
//! Nothing here mutates its input. Every check either succeeds or returns the first (or, for
//! rename conflicts and cascading suppressions, every) problem as a [SchemaTransformError].

#![deny(unsafe_code, rust_2018_idioms)]
#![allow(unused_crate_dependencies)]

pub mod ast;

mod config;
mod conflicts;
mod error;
mod merge;
mod names;
mod plan;
mod rename;
mod rename_schema;
mod schema;
mod split;
mod suppression;
mod validate;

pub use self::{
    ast::{
        ingest::{parse_query, parse_schema},
        Document, NodeKind, NodeRef,
    },
    config::{ConfigError, TransformConfig},
    conflicts::{check_rename_conflicts, find_rename_conflicts, ConflictReport},
    error::{MergeNameConflict, SchemaTransformError},
    merge::{check_merge_inputs, CrossSchemaEdgeDescriptor, FieldReference, MergeInputs},
    names::{
        builtin_scalar_names, check_schema_identifier, is_builtin_scalar, is_legal_identifier,
        is_nonreserved_type_name, BUILTIN_SCALAR_NAMES,
    },
    plan::{Renaming, RenamingPlan, SuppressionSet},
    rename::{rename_node, Rename, RenameableNode},
    rename_schema::{rename_schema, RenamedSchema},
    schema::Schema,
    split::{check_query_is_valid_to_split, is_property_field, try_get_inline_fragment, validate_query_against_schema},
    suppression::{check_cascading_suppression, find_cascade_violations, CascadeViolation},
    validate::{check_query_type_fields_match, check_schema_is_valid, check_valid_types_and_names},
};
