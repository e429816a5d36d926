use crate::SchemaTransformError;
use std::collections::BTreeSet;

/// The scalar types every GraphQL schema has without defining them.
pub const BUILTIN_SCALAR_NAMES: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

pub fn builtin_scalar_names() -> BTreeSet<&'static str> {
    BUILTIN_SCALAR_NAMES.into_iter().collect()
}

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALAR_NAMES.contains(&name)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_legal_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_') && chars.all(|char| char.is_ascii_alphanumeric() || char == '_')
}

/// A legal identifier that is not reserved for introspection, i.e. does not start with `__`.
pub fn is_nonreserved_type_name(name: &str) -> bool {
    is_legal_identifier(name) && !name.starts_with("__")
}

/// Check an identifier used to label one of the schemas taking part in a merge.
///
/// Unlike type names, schema identifiers may start with a digit.
pub fn check_schema_identifier(identifier: &str) -> Result<(), SchemaTransformError> {
    if identifier.is_empty() {
        return Err(SchemaTransformError::InvalidIdentifier {
            identifier: identifier.to_owned(),
            reason: String::from("schema identifiers must be nonempty"),
        });
    }

    let illegal_characters: BTreeSet<char> = identifier
        .chars()
        .filter(|char| !(char.is_ascii_alphanumeric() || *char == '_'))
        .collect();

    if illegal_characters.is_empty() {
        return Ok(());
    }

    Err(SchemaTransformError::InvalidIdentifier {
        identifier: identifier.to_owned(),
        reason: format!("illegal characters {illegal_characters:?}"),
    })
}
