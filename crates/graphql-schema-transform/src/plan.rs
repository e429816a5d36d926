use crate::ast::{NamedType, UnionTypeDefinition};
use std::collections::{BTreeMap, BTreeSet};

/// What happens to one type of the schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Renaming {
    RenameTo(String),
    Suppress,
}

/// The renamings and suppressions to apply to a schema.
///
/// Types without an entry keep their name. Only object, interface, union and enum types can be
/// renamed or suppressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamingPlan {
    type_renamings: BTreeMap<String, Renaming>,
    field_suppressions: BTreeMap<String, BTreeSet<String>>,
}

impl RenamingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_renamed(mut self, type_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        self.type_renamings
            .insert(type_name.into(), Renaming::RenameTo(new_name.into()));
        self
    }

    pub fn with_type_suppressed(mut self, type_name: impl Into<String>) -> Self {
        self.type_renamings.insert(type_name.into(), Renaming::Suppress);
        self
    }

    pub fn with_field_suppressed(mut self, type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.field_suppressions
            .entry(type_name.into())
            .or_default()
            .insert(field_name.into());
        self
    }

    pub fn type_renaming(&self, type_name: &str) -> Option<&Renaming> {
        self.type_renamings.get(type_name)
    }

    /// The name the type has after the renaming, `None` if it is suppressed.
    pub fn new_type_name<'a>(&'a self, type_name: &'a str) -> Option<&'a str> {
        match self.type_renamings.get(type_name) {
            None => Some(type_name),
            Some(Renaming::RenameTo(new_name)) => Some(new_name.as_str()),
            Some(Renaming::Suppress) => None,
        }
    }

    pub fn type_renamings(&self) -> impl Iterator<Item = (&str, &Renaming)> {
        self.type_renamings
            .iter()
            .map(|(type_name, renaming)| (type_name.as_str(), renaming))
    }

    pub fn field_suppressions(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.field_suppressions
            .iter()
            .map(|(type_name, fields)| (type_name.as_str(), fields))
    }

    pub fn suppression_set(&self) -> SuppressionSet {
        SuppressionSet {
            types: self
                .type_renamings
                .iter()
                .filter(|(_, renaming)| **renaming == Renaming::Suppress)
                .map(|(type_name, _)| type_name.clone())
                .collect(),
            fields: self.field_suppressions.clone(),
        }
    }
}

impl FromIterator<(String, Renaming)> for RenamingPlan {
    fn from_iter<T: IntoIterator<Item = (String, Renaming)>>(iter: T) -> Self {
        RenamingPlan {
            type_renamings: iter.into_iter().collect(),
            field_suppressions: BTreeMap::new(),
        }
    }
}

/// The types and fields a renaming suppresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    types: BTreeSet<String>,
    fields: BTreeMap<String, BTreeSet<String>>,
}

impl SuppressionSet {
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.insert(type_name.into());
        self
    }

    pub fn with_field(mut self, type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.fields
            .entry(type_name.into())
            .or_default()
            .insert(field_name.into());
        self
    }

    pub fn is_type_suppressed(&self, type_name: &str) -> bool {
        self.types.contains(type_name)
    }

    /// Whether the field was suppressed explicitly. Suppressing a type does not suppress its
    /// fields.
    pub fn is_field_suppressed(&self, type_name: &str, field_name: &str) -> bool {
        self.fields
            .get(type_name)
            .is_some_and(|fields| fields.contains(field_name))
    }

    pub fn suppressed_types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn suppressed_fields(&self, type_name: &str) -> impl Iterator<Item = &str> {
        self.fields.get(type_name).into_iter().flatten().map(String::as_str)
    }

    /// The members of the union that are suppressed.
    pub fn suppressed_members<'a>(&'a self, union: &'a UnionTypeDefinition) -> impl Iterator<Item = &'a NamedType> {
        union
            .members
            .iter()
            .filter(|member| self.is_type_suppressed(&member.name))
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.fields.values().all(BTreeSet::is_empty)
    }
}
