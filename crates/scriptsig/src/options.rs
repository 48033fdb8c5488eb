//! Bridge configuration
//!
//! Options can be built in code or loaded from a TOML table:
//!
//! ```toml
//! [catalog]
//! inherit_superclass_methods = true
//! warn_on_conflict = true
//!
//! [resolver]
//! fallback_classes = ["ScriptMethodSignatures"]
//! class_agnostic_fallback = true
//! reject_ambiguous = false
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Catalog behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    /// Copy a registered superclass's descriptors into a subclass that does
    /// not override them
    pub inherit_superclass_methods: bool,
    /// Log when a class registers a selector another class defines with a
    /// different signature
    pub warn_on_conflict: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            inherit_superclass_methods: true,
            warn_on_conflict: true,
        }
    }
}

/// Resolution order for script-initiated calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Classes consulted, in order, after the hinted class
    pub fallback_classes: Vec<String>,
    /// Fall back to a lookup by selector alone
    pub class_agnostic_fallback: bool,
    /// Fail class-agnostic resolution when definers disagree
    pub reject_ambiguous: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            fallback_classes: Vec::new(),
            class_agnostic_fallback: true,
            reject_ambiguous: false,
        }
    }
}

/// Top-level options for a script bridge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Catalog section
    pub catalog: CatalogOptions,
    /// Resolver section
    pub resolver: ResolverOptions,
}

impl BridgeOptions {
    /// Parse options from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        let options: BridgeOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), OptionsError> {
        let mut seen = FxHashSet::default();
        for class in &self.resolver.fallback_classes {
            if class.trim().is_empty() {
                return Err(OptionsError::Invalid(
                    "fallback class names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(class.as_str()) {
                return Err(OptionsError::Invalid(format!(
                    "fallback class '{}' listed more than once",
                    class
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BridgeOptions::default();
        assert!(options.catalog.inherit_superclass_methods);
        assert!(options.catalog.warn_on_conflict);
        assert!(options.resolver.fallback_classes.is_empty());
        assert!(options.resolver.class_agnostic_fallback);
        assert!(!options.resolver.reject_ambiguous);
    }

    #[test]
    fn test_parse_full() {
        let options = BridgeOptions::from_toml_str(
            r#"
            [catalog]
            inherit_superclass_methods = false
            warn_on_conflict = false

            [resolver]
            fallback_classes = ["ScriptMethodSignatures", "Element"]
            class_agnostic_fallback = false
            reject_ambiguous = true
            "#,
        )
        .unwrap();

        assert!(!options.catalog.inherit_superclass_methods);
        assert_eq!(
            options.resolver.fallback_classes,
            vec!["ScriptMethodSignatures".to_string(), "Element".to_string()]
        );
        assert!(!options.resolver.class_agnostic_fallback);
        assert!(options.resolver.reject_ambiguous);
    }

    #[test]
    fn test_parse_partial_uses_defaults() {
        let options = BridgeOptions::from_toml_str("[resolver]\nreject_ambiguous = true\n").unwrap();
        assert!(options.resolver.reject_ambiguous);
        assert!(options.resolver.class_agnostic_fallback);
        assert!(options.catalog.inherit_superclass_methods);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(BridgeOptions::from_toml_str("").unwrap(), BridgeOptions::default());
    }

    #[test]
    fn test_duplicate_fallback_rejected() {
        let result =
            BridgeOptions::from_toml_str("[resolver]\nfallback_classes = [\"A\", \"A\"]\n");
        assert!(matches!(result, Err(OptionsError::Invalid(_))));
    }

    #[test]
    fn test_validate_in_code() {
        let mut options = BridgeOptions::default();
        options.resolver.fallback_classes = vec!["Element".to_string(), "Widget".to_string()];
        assert!(options.validate().is_ok());

        options.resolver.fallback_classes.push("Element".to_string());
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("'Element' listed more than once"), "{err}");
    }

    #[test]
    fn test_empty_fallback_rejected() {
        let result = BridgeOptions::from_toml_str("[resolver]\nfallback_classes = [\" \"]\n");
        assert!(matches!(result, Err(OptionsError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml() {
        let result = BridgeOptions::from_toml_str("[resolver\n");
        assert!(matches!(result, Err(OptionsError::Parse(_))));
    }
}
