use crate::names;
use std::collections::BTreeSet;

/// Settings shared by the checks of this crate.
///
/// ```toml
/// extra_builtin_scalars = ["Date", "DateTime", "Decimal"]
/// split_directives = ["filter", "output", "optional"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Scalars the host schema treats as built in, on top of the GraphQL specified ones. Types
    /// can't be renamed to these names.
    pub extra_builtin_scalars: BTreeSet<String>,
    /// The directives a query may use and still be split across backends.
    pub split_directives: BTreeSet<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            extra_builtin_scalars: BTreeSet::new(),
            split_directives: ["filter", "output", "optional"].into_iter().map(String::from).collect(),
        }
    }
}

impl TransformConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    pub fn with_extra_builtin_scalar(mut self, name: impl Into<String>) -> Self {
        self.extra_builtin_scalars.insert(name.into());
        self
    }

    pub fn is_builtin_scalar(&self, name: &str) -> bool {
        names::is_builtin_scalar(name) || self.extra_builtin_scalars.contains(name)
    }

    pub fn is_split_directive(&self, name: &str) -> bool {
        self.split_directives.contains(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid transform configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TransformConfig::default();

        assert!(config.is_split_directive("filter"));
        assert!(config.is_split_directive("output"));
        assert!(config.is_split_directive("optional"));
        assert!(!config.is_split_directive("recurse"));
        assert!(config.is_builtin_scalar("Int"));
        assert!(!config.is_builtin_scalar("Date"));
    }

    #[test]
    fn empty_toml_is_the_default() {
        assert_eq!(TransformConfig::from_toml_str("").unwrap(), TransformConfig::default());
    }

    #[test]
    fn from_toml() {
        let config = TransformConfig::from_toml_str(
            r#"
            extra_builtin_scalars = ["Date", "Decimal"]
            split_directives = ["filter", "output"]
            "#,
        )
        .unwrap();

        assert!(config.is_builtin_scalar("Date"));
        assert!(config.is_builtin_scalar("String"));
        assert!(!config.is_split_directive("optional"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = TransformConfig::from_toml_str("split_directive = []").unwrap_err();

        assert!(err.to_string().starts_with("Invalid transform configuration: "));
        assert!(err.to_string().contains("unknown field `split_directive`"));
    }
}
