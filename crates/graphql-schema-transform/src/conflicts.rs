use crate::{RenamingPlan, Schema, SchemaTransformError, TransformConfig};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

/// Every name collision a renaming would introduce.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ConflictReport {
    /// New name -> the original names of the types renamed to it. Only names claimed by two or
    /// more types are present.
    pub name_conflicts: BTreeMap<String, BTreeSet<String>>,
    /// Original name -> the built-in scalar name the type would be renamed to.
    pub builtin_conflicts: BTreeMap<String, String>,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.name_conflicts.is_empty() && self.builtin_conflicts.is_empty()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paragraphs = Vec::with_capacity(2);

        if !self.name_conflicts.is_empty() {
            paragraphs.push(format!(
                "Applying the renaming would produce a schema in which multiple types have the same name, \
                 which is an illegal schema state. For each key k in name_conflicts, name_conflicts[k] is \
                 the set of types in the original schema that get mapped to k in the new schema. To fix \
                 this, modify the renaming plan to ensure that no two types in the renamed schema have the \
                 same name. name_conflicts: {:?}",
                self.name_conflicts
            ));
        }

        if !self.builtin_conflicts.is_empty() {
            paragraphs.push(format!(
                "Applying the renaming would rename type(s) to a name already used by a built-in GraphQL \
                 scalar type. To fix this, ensure that no type name is mapped to a scalar's name. The \
                 following map has each to-be-renamed type and the scalar name it was mapped to: {:?}",
                self.builtin_conflicts
            ));
        }

        f.write_str(&paragraphs.join("\n"))
    }
}

/// Compute the name collisions applying `plan` to `schema` would introduce. Suppressed types take
/// no part in the renamed schema and can't collide.
pub fn find_rename_conflicts(schema: &Schema, plan: &RenamingPlan, config: &TransformConfig) -> ConflictReport {
    let mut claimed_names: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut report = ConflictReport::default();

    for definition in schema.type_definitions() {
        let original_name = definition.name();

        let Some(new_name) = plan.new_type_name(original_name) else {
            continue;
        };

        claimed_names.entry(new_name).or_default().insert(original_name);

        if new_name != original_name && config.is_builtin_scalar(new_name) {
            report
                .builtin_conflicts
                .insert(original_name.to_owned(), new_name.to_owned());
        }
    }

    report.name_conflicts = claimed_names
        .into_iter()
        .filter(|(_, original_names)| original_names.len() > 1)
        .map(|(new_name, original_names)| {
            (
                new_name.to_owned(),
                original_names.into_iter().map(str::to_owned).collect(),
            )
        })
        .collect();

    report
}

/// Fail with [SchemaTransformError::SchemaRenameNameConflict] carrying every collision when the
/// renaming is not clean.
pub fn check_rename_conflicts(
    schema: &Schema,
    plan: &RenamingPlan,
    config: &TransformConfig,
) -> Result<(), SchemaTransformError> {
    let report = find_rename_conflicts(schema, plan, config);

    tracing::debug!(
        name_conflicts = report.name_conflicts.len(),
        builtin_conflicts = report.builtin_conflicts.len(),
        "checked renaming for name conflicts"
    );

    if report.is_clean() {
        Ok(())
    } else {
        Err(SchemaTransformError::rename_name_conflict(report))
    }
}
