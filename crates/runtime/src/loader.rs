//! Runtime configuration loader.

use std::path::Path;

use crate::config::RuntimeConfig;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Loader for runtime configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing tables and fields fall back to their defaults.
    pub fn load(path: &Path) -> LoadResult<RuntimeConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    /// Parse config data from TOML text.
    pub fn from_toml_str(content: &str) -> LoadResult<RuntimeConfig> {
        let config: RuntimeConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ConfigLoader::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.planner.max_plan_length, 8);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = ConfigLoader::from_toml_str(
            r#"
            [planner]
            max_plan_length = 3

            [coordinator]
            apply_confirmed_effects = false
            "#,
        )
        .unwrap();

        assert_eq!(config.planner.max_plan_length, 3);
        assert_eq!(config.planner.max_expansions, 4096);
        assert!(config.planner.fallback_to_lower_goals);
        assert!(!config.coordinator.apply_confirmed_effects);
        assert!(config.coordinator.revalidate_before_dispatch);
    }

    #[test]
    fn wrong_types_are_reported() {
        let err = ConfigLoader::from_toml_str("[planner]\nmax_plan_length = \"deep\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }
}
