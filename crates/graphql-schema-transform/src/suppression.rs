use crate::{
    ast::{FieldDefinition, Type, TypeDefinition},
    Schema, SchemaTransformError, SuppressionSet,
};
use std::fmt;

/// Something a suppression leaves behind that still depends on what was suppressed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CascadeViolation {
    /// Every field of the type is suppressed, but the type is not.
    DanglingFieldOwner { type_name: String },
    /// Every member of the union is suppressed, but the union is not.
    DanglingUnionMember { union_name: String },
    /// A field that is not suppressed has a suppressed type.
    DanglingReference {
        type_name: String,
        field_name: String,
        referenced_type: String,
    },
    /// An argument of a field that is not suppressed has a suppressed type.
    DanglingFieldArgument {
        type_name: String,
        field_name: String,
        argument_name: String,
        referenced_type: String,
    },
    /// An argument of a directive definition has a suppressed type.
    DanglingDirectiveArgument {
        directive_name: String,
        argument_name: String,
        referenced_type: String,
    },
}

impl fmt::Display for CascadeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeViolation::DanglingFieldOwner { type_name } => write!(
                f,
                "Type {type_name} has all of its fields suppressed. Suppress {type_name} as well, or keep at \
                 least one of its fields."
            ),
            CascadeViolation::DanglingUnionMember { union_name } => write!(
                f,
                "Union {union_name} has all of its member types suppressed. Suppress {union_name} as well, or \
                 keep at least one of its members."
            ),
            CascadeViolation::DanglingReference {
                type_name,
                field_name,
                referenced_type,
            } => write!(
                f,
                "Field {type_name}.{field_name} is of type {referenced_type}, which is suppressed. Suppress \
                 {type_name}.{field_name} as well, or stop suppressing {referenced_type}."
            ),
            CascadeViolation::DanglingFieldArgument {
                type_name,
                field_name,
                argument_name,
                referenced_type,
            } => write!(
                f,
                "Argument {argument_name} of field {type_name}.{field_name} is of type {referenced_type}, which \
                 is suppressed. Suppress {type_name}.{field_name} as well, or stop suppressing {referenced_type}."
            ),
            CascadeViolation::DanglingDirectiveArgument {
                directive_name,
                argument_name,
                referenced_type,
            } => write!(
                f,
                "Argument {argument_name} of directive @{directive_name} is of type {referenced_type}, which is \
                 suppressed. Directives cannot be suppressed, so stop suppressing {referenced_type}."
            ),
        }
    }
}

/// Whether the field survives the suppressions. A root query field goes away with the type it is
/// named after.
pub(crate) fn is_field_live(
    schema: &Schema,
    suppressions: &SuppressionSet,
    type_name: &str,
    field: &FieldDefinition,
) -> bool {
    if suppressions.is_field_suppressed(type_name, &field.name) {
        return false;
    }

    !(type_name == schema.query_type_name() && suppressions.is_type_suppressed(&field.name))
}

fn is_suppressed_type(suppressions: &SuppressionSet, ty: &Type) -> bool {
    suppressions.is_type_suppressed(&ty.named_type().name)
}

fn live_types<'a>(
    schema: &'a Schema,
    suppressions: &'a SuppressionSet,
) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
    schema
        .type_definitions()
        .filter(move |definition| !suppressions.is_type_suppressed(definition.name()))
}

/// Collect every violation the suppressions introduce: types left without fields first, then
/// unions left without members, then fields and field arguments referencing suppressed types, then
/// directive arguments referencing suppressed types. Each group is in schema definition order.
pub fn find_cascade_violations(schema: &Schema, suppressions: &SuppressionSet) -> Vec<CascadeViolation> {
    let dangling_field_owners = live_types(schema, suppressions)
        .filter(|definition| {
            let fields = definition.fields();
            !fields.is_empty()
                && fields
                    .iter()
                    .all(|field| !is_field_live(schema, suppressions, definition.name(), field))
        })
        .map(|definition| CascadeViolation::DanglingFieldOwner {
            type_name: definition.name().to_owned(),
        });

    let dangling_union_members = live_types(schema, suppressions)
        .filter_map(|definition| match definition {
            TypeDefinition::Union(union) => Some(union),
            _ => None,
        })
        .filter(|union| suppressions.suppressed_members(union).count() == union.members.len())
        .map(|union| CascadeViolation::DanglingUnionMember {
            union_name: union.name.to_string(),
        });

    let dangling_references = live_types(schema, suppressions).flat_map(move |definition| {
        definition
            .fields()
            .iter()
            .filter(move |field| is_field_live(schema, suppressions, definition.name(), field))
            .flat_map(move |field| dangling_field_references(suppressions, definition.name(), field))
    });

    let dangling_directive_arguments = schema.directive_definitions().flat_map(move |directive| {
        directive
            .arguments
            .iter()
            .filter(move |argument| is_suppressed_type(suppressions, &argument.ty))
            .map(move |argument| CascadeViolation::DanglingDirectiveArgument {
                directive_name: directive.name.to_string(),
                argument_name: argument.name.to_string(),
                referenced_type: argument.ty.named_type().name.to_string(),
            })
    });

    dangling_field_owners
        .chain(dangling_union_members)
        .chain(dangling_references)
        .chain(dangling_directive_arguments)
        .collect()
}

/// The field's own type first, then its arguments.
fn dangling_field_references<'a>(
    suppressions: &'a SuppressionSet,
    type_name: &'a str,
    field: &'a FieldDefinition,
) -> impl Iterator<Item = CascadeViolation> + 'a {
    let dangling_type = is_suppressed_type(suppressions, &field.ty).then(|| CascadeViolation::DanglingReference {
        type_name: type_name.to_owned(),
        field_name: field.name.to_string(),
        referenced_type: field.ty.named_type().name.to_string(),
    });

    let dangling_arguments = field
        .arguments
        .iter()
        .filter(move |argument| is_suppressed_type(suppressions, &argument.ty))
        .map(move |argument| CascadeViolation::DanglingFieldArgument {
            type_name: type_name.to_owned(),
            field_name: field.name.to_string(),
            argument_name: argument.name.to_string(),
            referenced_type: argument.ty.named_type().name.to_string(),
        });

    dangling_type.into_iter().chain(dangling_arguments)
}

/// Fail with [SchemaTransformError::CascadingSuppression] listing every violation when the
/// suppressions leave anything dangling.
///
/// Fixing the reported violations may require suppressing more types or fields, which can cause
/// violations of their own: callers iterate until the check passes.
pub fn check_cascading_suppression(schema: &Schema, suppressions: &SuppressionSet) -> Result<(), SchemaTransformError> {
    let violations = find_cascade_violations(schema, suppressions);

    tracing::debug!(violations = violations.len(), "checked suppressions for cascades");

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaTransformError::CascadingSuppression(violations))
    }
}
